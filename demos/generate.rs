//! End-to-end generation example.
//!
//! Run with: `cargo run --example generate -- first.jpg last.jpg`
//!
//! Requires `RUNWAY_API_KEY` environment variable.

use runway_nodes::node::{GeneratorInputs, GeneratorOutput, VideoGeneratorNode};

#[tokio::main]
async fn main() -> runway_nodes::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "runway_nodes=debug".into()),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let first_path = args.next().unwrap_or_else(|| "first.jpg".into());
    let last_path = args.next().unwrap_or_else(|| "last.jpg".into());

    let first = image::open(&first_path)?;
    let last = image::open(&last_path)?;

    let node = VideoGeneratorNode::new();
    let mut inputs = GeneratorInputs::new(first, last);
    inputs.prompt_text = "A cinematic scene".into();
    inputs.trigger = true;
    inputs.max_wait = std::time::Duration::from_secs(300);

    println!("Generating video (this may take a few minutes)...");
    match node.generate(inputs).await? {
        GeneratorOutput::Generated {
            video_url, task_id, ..
        } => println!("Task {task_id} finished: {video_url}"),
        GeneratorOutput::Skip { .. } => println!("Trigger was off, nothing submitted"),
    }

    Ok(())
}
