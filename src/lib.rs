#![warn(missing_docs)]
//! Runway image-to-video generation nodes for node-graph media hosts.
//!
//! This crate wraps the Runway image-to-video REST API behind two
//! registrable nodes: one submits a first/last frame pair plus a text
//! prompt and polls the task to completion, the other optionally downloads
//! the finished video.
//!
//! # Quick Start - Client
//!
//! ```no_run
//! use runway_nodes::{GenerationRequest, RunwayClient};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> runway_nodes::Result<()> {
//!     let client = RunwayClient::builder().build()?; // RUNWAY_API_KEY env
//!     let first = image::open("first.png")?;
//!     let last = image::open("last.png")?;
//!
//!     let request = GenerationRequest::new(first, last, "A cinematic scene")
//!         .with_duration(5);
//!     let handle = client.submit(&request).await?;
//!     let status = client.poll(&handle, Duration::from_secs(120)).await?;
//!     println!("{status:?}");
//!     Ok(())
//! }
//! ```
//!
//! # Quick Start - Nodes
//!
//! ```no_run
//! use runway_nodes::node::{GeneratorInputs, GeneratorOutput, VideoGeneratorNode};
//!
//! #[tokio::main]
//! async fn main() -> runway_nodes::Result<()> {
//!     let node = VideoGeneratorNode::new();
//!     let first = image::open("first.png")?;
//!     let last = image::open("last.png")?;
//!
//!     let mut inputs = GeneratorInputs::new(first, last);
//!     inputs.trigger = true;
//!     match node.generate(inputs).await? {
//!         GeneratorOutput::Generated { video_url, .. } => println!("{video_url}"),
//!         GeneratorOutput::Skip { .. } => println!("skipped"),
//!     }
//!     Ok(())
//! }
//! ```

mod client;
mod encode;
mod error;
mod fetch;
pub mod node;
mod types;

pub use client::{RunwayClient, RunwayClientBuilder};
pub use encode::{encode_data_uri, JPEG_QUALITY, TARGET_SIZE};
pub use error::{Result, RunwayError};
pub use fetch::{ResultFetcher, DEFAULT_OUTPUT_DIR};
pub use types::{
    AspectRatio, FetchResult, GenerationRequest, JobHandle, JobStatus, DEFAULT_MODEL,
};
