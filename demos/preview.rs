//! Download a generated video to the output directory.
//!
//! Run with: `cargo run --example preview -- https://host/video.mp4`

use runway_nodes::node::VideoPreviewNode;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().init();

    let url = std::env::args().nth(1).unwrap_or_default();

    let node = VideoPreviewNode::new();
    let result = node.preview(&url, true, "runway_video.mp4").await;
    println!("Video at: {result}");
}
