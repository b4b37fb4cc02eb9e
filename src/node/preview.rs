//! Video preview/download node.

use crate::error::Result;
use crate::fetch::ResultFetcher;
use crate::node::{
    InputKind, InputSpec, Node, NodeDescriptor, NodeInputs, OutputKind, OutputSpec, OutputValue,
    CATEGORY,
};
use crate::types::FetchResult;
use async_trait::async_trait;
use std::path::PathBuf;

const DEFAULT_FILENAME: &str = "runway_video.mp4";

/// Node that resolves a generated video URL, optionally downloading it to
/// the output directory.
pub struct VideoPreviewNode {
    fetcher: ResultFetcher,
}

impl Default for VideoPreviewNode {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoPreviewNode {
    /// Creates a node writing into the default `output/` directory.
    pub fn new() -> Self {
        Self {
            fetcher: ResultFetcher::new(),
        }
    }

    /// Creates a node writing into the given directory.
    pub fn with_output_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            fetcher: ResultFetcher::with_output_dir(dir),
        }
    }

    /// Resolves the URL, downloading when requested. Never errors: download
    /// failures fall back to the remote URL.
    pub async fn preview(&self, video_url: &str, download: bool, filename: &str) -> FetchResult {
        self.fetcher.fetch(video_url, download, filename).await
    }
}

#[async_trait]
impl Node for VideoPreviewNode {
    fn descriptor(&self) -> NodeDescriptor {
        NodeDescriptor {
            name: "RunwayVideoPreview",
            display_name: "Runway Video Preview",
            category: CATEGORY,
            inputs: vec![
                InputSpec {
                    name: "video_url",
                    kind: InputKind::Text { default: "" },
                },
                InputSpec {
                    name: "download",
                    kind: InputKind::Bool { default: false },
                },
                InputSpec {
                    name: "filename",
                    kind: InputKind::Text {
                        default: DEFAULT_FILENAME,
                    },
                },
            ],
            outputs: vec![OutputSpec {
                name: "video_path",
                kind: OutputKind::Text,
            }],
        }
    }

    async fn execute(&self, inputs: NodeInputs) -> Result<Vec<OutputValue>> {
        let video_url = inputs.text("video_url", "")?;
        let download = inputs.bool("download", false)?;
        let filename = inputs.text("filename", DEFAULT_FILENAME)?;

        let result = self.preview(&video_url, download, &filename).await;
        Ok(vec![OutputValue::Text(result.location())])
    }
}
