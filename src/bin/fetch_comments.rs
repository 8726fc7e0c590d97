//! Fetch YouTube comments and save them as a dataset
//!
//! This utility runs the collector on its own:
//! - Connects to the YouTube Data API
//! - Collects all top-level comments for a channel or video
//! - Prints collection stats and a sample
//! - Saves the batch as JSON under data/

use anyhow::{bail, Context, Result};
use comment_clustering::api::youtube::YouTubeClient;
use comment_clustering::pipeline::{AnalysisError, AnalysisTarget, CommentAnalyzer};
use comment_clustering::utils::io::{ensure_directory, CommentDataset};
use std::path::PathBuf;

fn main() -> Result<()> {
    env_logger::init();

    println!("=== YouTube Comment Fetcher ===\n");

    let target = parse_target()?;
    let api_key = std::env::var("YOUTUBE_API_KEY")
        .context("YOUTUBE_API_KEY must be set to a YouTube Data API key")?;
    let client = YouTubeClient::new(api_key)?;
    let analyzer = CommentAnalyzer::new(client);

    println!("Collecting comments...");
    let collected = match analyzer.collect_comments(&target, |done, total| {
        println!("  video {}/{} done", done, total);
    }) {
        Ok(collected) => collected,
        Err(AnalysisError::NoVideosFound) => {
            println!("No videos found for this channel. Nothing to save.");
            return Ok(());
        }
        Err(AnalysisError::NoCommentsFound) => {
            println!("No comments found for this target. Nothing to save.");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    println!(
        "\nCollected {} comments from {} video(s)",
        collected.comments.len(),
        collected.videos_scanned
    );

    println!("\n=== Sample Comments ===\n");
    for (i, comment) in collected.comments.iter().take(5).enumerate() {
        let preview: String = comment.chars().take(100).collect();
        println!("{}. {}", i + 1, preview);
    }

    let (name, source) = match &target {
        AnalysisTarget::Channel(id) => (format!("channel_{}", id), format!("channel {}", id)),
        AnalysisTarget::Video(id) => (format!("video_{}", id), format!("video {}", id)),
    };
    let dataset = CommentDataset::new(name.clone(), source, collected.comments);

    let data_dir = PathBuf::from("data");
    ensure_directory(&data_dir)?;
    let path = data_dir.join(format!("{}.json", name));
    dataset.save_json(&path)?;
    println!("\n✓ Saved {} comments to {:?}", dataset.len(), path);

    Ok(())
}

fn parse_target() -> Result<AnalysisTarget> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    match args.as_slice() {
        [mode, id] if mode == "channel" => Ok(AnalysisTarget::Channel(id.clone())),
        [mode, id] if mode == "video" => Ok(AnalysisTarget::Video(id.clone())),
        _ => bail!("usage: fetch_comments <channel|video> <id>"),
    }
}
