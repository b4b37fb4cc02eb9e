//! Core types for video generation requests and job tracking.

use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::SystemTime;

/// Default model identifier for generation requests.
pub const DEFAULT_MODEL: &str = "gen3a_turbo";

/// Supported output aspect ratios.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    /// 1280x768 landscape output (default).
    #[default]
    #[serde(rename = "1280:768")]
    Landscape,
    /// 768x1280 portrait output.
    #[serde(rename = "768:1280")]
    Portrait,
}

impl AspectRatio {
    /// Returns the API ratio string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Landscape => "1280:768",
            Self::Portrait => "768:1280",
        }
    }

    /// Parses a ratio string as accepted by the node schema.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "1280:768" => Some(Self::Landscape),
            "768:1280" => Some(Self::Portrait),
            _ => None,
        }
    }
}

impl std::fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A request to generate a video from a first and last frame.
///
/// Immutable once submitted; `submit` borrows the request and never
/// changes it.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// First frame of the generated video.
    pub first_frame: DynamicImage,
    /// Last frame of the generated video.
    pub last_frame: DynamicImage,
    /// Text prompt describing the desired motion.
    pub prompt_text: String,
    /// Model identifier (e.g., "gen3a_turbo").
    pub model: String,
    /// Desired video duration in seconds (5-10).
    pub duration: u32,
    /// Output aspect ratio.
    pub ratio: AspectRatio,
    /// Seed for deterministic generation (0..=u32::MAX).
    pub seed: u32,
    /// Whether to apply the provider watermark.
    pub watermark: bool,
}

impl GenerationRequest {
    /// Creates a new request with default model, duration, ratio, and seed.
    pub fn new(
        first_frame: DynamicImage,
        last_frame: DynamicImage,
        prompt_text: impl Into<String>,
    ) -> Self {
        Self {
            first_frame,
            last_frame,
            prompt_text: prompt_text.into(),
            model: DEFAULT_MODEL.to_string(),
            duration: 5,
            ratio: AspectRatio::default(),
            seed: 0,
            watermark: false,
        }
    }

    /// Sets the model identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the video duration in seconds.
    pub fn with_duration(mut self, secs: u32) -> Self {
        self.duration = secs;
        self
    }

    /// Sets the output aspect ratio.
    pub fn with_ratio(mut self, ratio: AspectRatio) -> Self {
        self.ratio = ratio;
        self
    }

    /// Sets the generation seed.
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the watermark flag.
    pub fn with_watermark(mut self, watermark: bool) -> Self {
        self.watermark = watermark;
        self
    }
}

/// Handle to one remote generation task.
///
/// Created on successful submission and never mutated; every status check
/// for the job references the same `task_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobHandle {
    /// Opaque task identifier assigned by the API.
    pub task_id: String,
    /// When the submission succeeded.
    pub submitted_at: SystemTime,
}

impl JobHandle {
    /// Creates a handle for a freshly submitted task.
    pub fn new(task_id: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            submitted_at: SystemTime::now(),
        }
    }
}

/// Remote job status as observed by one poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    /// Task is still being processed.
    Running,
    /// Task finished; the first output entry is the video URL.
    Succeeded {
        /// URL of the generated video.
        result_url: String,
    },
    /// Task failed remotely.
    Failed {
        /// Failure detail reported by the API.
        reason: String,
    },
    /// Task was canceled remotely.
    Canceled {
        /// Cancellation detail reported by the API.
        reason: String,
    },
    /// Any status string the client does not recognize.
    Unknown,
}

impl JobStatus {
    /// Returns true for statuses that end the poll loop.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Succeeded { .. } | Self::Failed { .. } | Self::Canceled { .. }
        )
    }
}

/// Outcome of fetching a result URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    /// The remote URL, unchanged (download not requested or failed).
    Remote(String),
    /// Path of the locally saved video.
    Downloaded(PathBuf),
}

impl FetchResult {
    /// Returns the location as a string: the URL or the local path.
    pub fn location(&self) -> String {
        match self {
            Self::Remote(url) => url.clone(),
            Self::Downloaded(path) => path.display().to_string(),
        }
    }
}

impl std::fmt::Display for FetchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.location())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aspect_ratio_round_trip() {
        assert_eq!(AspectRatio::Landscape.as_str(), "1280:768");
        assert_eq!(AspectRatio::Portrait.as_str(), "768:1280");
        assert_eq!(AspectRatio::parse("1280:768"), Some(AspectRatio::Landscape));
        assert_eq!(AspectRatio::parse("768:1280"), Some(AspectRatio::Portrait));
        assert_eq!(AspectRatio::parse("16:9"), None);
    }

    #[test]
    fn test_aspect_ratio_serializes_as_ratio_string() {
        let json = serde_json::to_value(AspectRatio::Landscape).unwrap();
        assert_eq!(json, "1280:768");
    }

    #[test]
    fn test_request_builder_defaults() {
        let frame = DynamicImage::new_rgb8(4, 4);
        let req = GenerationRequest::new(frame.clone(), frame, "A cinematic scene");
        assert_eq!(req.model, DEFAULT_MODEL);
        assert_eq!(req.duration, 5);
        assert_eq!(req.ratio, AspectRatio::Landscape);
        assert_eq!(req.seed, 0);
        assert!(!req.watermark);
    }

    #[test]
    fn test_request_builder_overrides() {
        let frame = DynamicImage::new_rgb8(4, 4);
        let req = GenerationRequest::new(frame.clone(), frame, "prompt")
            .with_model("gen3a")
            .with_duration(10)
            .with_ratio(AspectRatio::Portrait)
            .with_seed(42)
            .with_watermark(true);
        assert_eq!(req.model, "gen3a");
        assert_eq!(req.duration, 10);
        assert_eq!(req.ratio, AspectRatio::Portrait);
        assert_eq!(req.seed, 42);
        assert!(req.watermark);
    }

    #[test]
    fn test_job_status_terminal() {
        assert!(JobStatus::Succeeded {
            result_url: "https://x/video.mp4".into()
        }
        .is_terminal());
        assert!(JobStatus::Failed { reason: "".into() }.is_terminal());
        assert!(JobStatus::Canceled { reason: "".into() }.is_terminal());
        assert!(!JobStatus::Running.is_terminal());
        assert!(!JobStatus::Unknown.is_terminal());
    }

    #[test]
    fn test_fetch_result_location() {
        let remote = FetchResult::Remote("https://x/video.mp4".into());
        assert_eq!(remote.location(), "https://x/video.mp4");

        let local = FetchResult::Downloaded(PathBuf::from("output/runway_video.mp4"));
        assert_eq!(local.location(), "output/runway_video.mp4");
    }
}
