//! Video generation node.

use crate::client::{RunwayClient, RunwayClientBuilder};
use crate::error::{Result, RunwayError};
use crate::node::{
    InputKind, InputSpec, Node, NodeDescriptor, NodeInputs, OutputKind, OutputSpec, OutputValue,
    CATEGORY,
};
use crate::types::{AspectRatio, GenerationRequest, DEFAULT_MODEL};
use async_trait::async_trait;
use image::DynamicImage;
use std::time::Duration;

const DEFAULT_PROMPT: &str = "A cinematic scene";
const RATIO_OPTIONS: &[&str] = &["1280:768", "768:1280"];

const DURATION_MIN: i64 = 5;
const DURATION_MAX: i64 = 10;
const SEED_MAX: i64 = u32::MAX as i64;
const MAX_WAIT_DEFAULT: i64 = 60;
const MAX_WAIT_MIN: i64 = 10;
const MAX_WAIT_MAX: i64 = 300;

/// Typed inputs for [`VideoGeneratorNode::generate`].
#[derive(Debug, Clone)]
pub struct GeneratorInputs {
    /// First frame of the generated video.
    pub first_frame: DynamicImage,
    /// Last frame of the generated video.
    pub last_frame: DynamicImage,
    /// Text prompt describing the desired motion.
    pub prompt_text: String,
    /// Model identifier.
    pub model: String,
    /// Video duration in seconds (5-10).
    pub duration: u32,
    /// Output aspect ratio.
    pub ratio: AspectRatio,
    /// Generation seed.
    pub seed: u32,
    /// Watermark flag.
    pub watermark: bool,
    /// API key; empty falls back to the `RUNWAY_API_KEY` env var.
    pub api_key: String,
    /// Whether to actually run the generation.
    pub trigger: bool,
    /// Maximum time to wait for the task to finish.
    pub max_wait: Duration,
}

impl GeneratorInputs {
    /// Creates inputs with schema defaults for everything but the frames.
    pub fn new(first_frame: DynamicImage, last_frame: DynamicImage) -> Self {
        Self {
            first_frame,
            last_frame,
            prompt_text: DEFAULT_PROMPT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            duration: DURATION_MIN as u32,
            ratio: AspectRatio::default(),
            seed: 0,
            watermark: false,
            api_key: String::new(),
            trigger: false,
            max_wait: Duration::from_secs(MAX_WAIT_DEFAULT as u64),
        }
    }
}

/// Result of one generator invocation.
#[derive(Debug, Clone)]
pub enum GeneratorOutput {
    /// Trigger was off; nothing was submitted. The first frame passes
    /// through as preview.
    Skip {
        /// Passthrough preview image.
        preview: DynamicImage,
    },
    /// Generation completed.
    Generated {
        /// URL of the generated video.
        video_url: String,
        /// Remote task id.
        task_id: String,
        /// Passthrough preview image.
        preview: DynamicImage,
    },
}

/// Node that submits an image pair to the video generation API and polls
/// the task to completion.
pub struct VideoGeneratorNode {
    client_builder: RunwayClientBuilder,
}

impl Default for VideoGeneratorNode {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoGeneratorNode {
    /// Creates a node targeting the production API.
    pub fn new() -> Self {
        Self {
            client_builder: RunwayClient::builder(),
        }
    }

    /// Creates a node whose clients are built from the given builder.
    /// The per-invocation API key input still applies.
    pub fn with_client_builder(builder: RunwayClientBuilder) -> Self {
        Self {
            client_builder: builder,
        }
    }

    /// Runs one generation.
    ///
    /// Returns [`GeneratorOutput::Skip`] immediately when `trigger` is off;
    /// no client is built and no request is made.
    pub async fn generate(&self, inputs: GeneratorInputs) -> Result<GeneratorOutput> {
        if !inputs.trigger {
            tracing::debug!("trigger not set, skipping generation");
            return Ok(GeneratorOutput::Skip {
                preview: inputs.first_frame,
            });
        }

        let mut builder = self.client_builder.clone();
        if !inputs.api_key.is_empty() {
            builder = builder.api_key(&inputs.api_key);
        }
        let client = builder.build()?;

        let preview = inputs.first_frame.clone();
        let request = GenerationRequest::new(
            inputs.first_frame,
            inputs.last_frame,
            inputs.prompt_text,
        )
        .with_model(inputs.model)
        .with_duration(inputs.duration)
        .with_ratio(inputs.ratio)
        .with_seed(inputs.seed)
        .with_watermark(inputs.watermark);

        let (handle, video_url) = client.generate(&request, inputs.max_wait).await?;
        tracing::debug!(task_id = %handle.task_id, url = %video_url, "generation finished");

        Ok(GeneratorOutput::Generated {
            video_url,
            task_id: handle.task_id,
            preview,
        })
    }

    fn parse_inputs(&self, inputs: &NodeInputs) -> Result<GeneratorInputs> {
        let ratio_str = inputs.text("ratio", RATIO_OPTIONS[0])?;
        let ratio = AspectRatio::parse(&ratio_str).ok_or_else(|| {
            RunwayError::InvalidInput(format!("unsupported ratio '{ratio_str}'"))
        })?;

        Ok(GeneratorInputs {
            first_frame: inputs.image("first_frame")?.clone(),
            last_frame: inputs.image("last_frame")?.clone(),
            prompt_text: inputs.text("promptText", DEFAULT_PROMPT)?,
            model: inputs.text("model", DEFAULT_MODEL)?,
            duration: inputs.int("duration", DURATION_MIN, DURATION_MIN, DURATION_MAX)? as u32,
            ratio,
            seed: inputs.int("seed", 0, 0, SEED_MAX)? as u32,
            watermark: inputs.bool("watermark", false)?,
            api_key: inputs.text("api_key", "")?,
            trigger: inputs.bool("trigger", false)?,
            max_wait: Duration::from_secs(inputs.int(
                "max_wait",
                MAX_WAIT_DEFAULT,
                MAX_WAIT_MIN,
                MAX_WAIT_MAX,
            )? as u64),
        })
    }
}

#[async_trait]
impl Node for VideoGeneratorNode {
    fn descriptor(&self) -> NodeDescriptor {
        NodeDescriptor {
            name: "RunwayVideoGenerator",
            display_name: "Runway Video Gen",
            category: CATEGORY,
            inputs: vec![
                InputSpec {
                    name: "first_frame",
                    kind: InputKind::Image,
                },
                InputSpec {
                    name: "last_frame",
                    kind: InputKind::Image,
                },
                InputSpec {
                    name: "promptText",
                    kind: InputKind::Text {
                        default: DEFAULT_PROMPT,
                    },
                },
                InputSpec {
                    name: "model",
                    kind: InputKind::Text {
                        default: DEFAULT_MODEL,
                    },
                },
                InputSpec {
                    name: "duration",
                    kind: InputKind::Int {
                        default: DURATION_MIN,
                        min: DURATION_MIN,
                        max: DURATION_MAX,
                    },
                },
                InputSpec {
                    name: "ratio",
                    kind: InputKind::Select {
                        options: RATIO_OPTIONS,
                        default: RATIO_OPTIONS[0],
                    },
                },
                InputSpec {
                    name: "seed",
                    kind: InputKind::Int {
                        default: 0,
                        min: 0,
                        max: SEED_MAX,
                    },
                },
                InputSpec {
                    name: "watermark",
                    kind: InputKind::Bool { default: false },
                },
                InputSpec {
                    name: "api_key",
                    kind: InputKind::Text { default: "" },
                },
                InputSpec {
                    name: "trigger",
                    kind: InputKind::Bool { default: false },
                },
                InputSpec {
                    name: "max_wait",
                    kind: InputKind::Int {
                        default: MAX_WAIT_DEFAULT,
                        min: MAX_WAIT_MIN,
                        max: MAX_WAIT_MAX,
                    },
                },
            ],
            outputs: vec![
                OutputSpec {
                    name: "video_url",
                    kind: OutputKind::Text,
                },
                OutputSpec {
                    name: "generation_id",
                    kind: OutputKind::Text,
                },
                OutputSpec {
                    name: "preview",
                    kind: OutputKind::Image,
                },
            ],
        }
    }

    async fn execute(&self, inputs: NodeInputs) -> Result<Vec<OutputValue>> {
        let inputs = self.parse_inputs(&inputs)?;
        // Host consumers expect empty url/id strings for the skip case.
        let outputs = match self.generate(inputs).await? {
            GeneratorOutput::Skip { preview } => vec![
                OutputValue::Text(String::new()),
                OutputValue::Text(String::new()),
                OutputValue::Image(preview),
            ],
            GeneratorOutput::Generated {
                video_url,
                task_id,
                preview,
            } => vec![
                OutputValue::Text(video_url),
                OutputValue::Text(task_id),
                OutputValue::Image(preview),
            ],
        };
        Ok(outputs)
    }
}
