//! Interactive comment cluster analysis
//!
//! This binary drives a full analysis session:
//! - Resolves the target (channel or single video) from the arguments
//! - Runs the collect -> cluster -> record pipeline on demand
//! - Renders the grouped comments, the cluster distribution, and the
//!   run-over-run trend once at least two runs have completed
//!
//! The run history lives for the lifetime of the process and is gone
//! when it exits.

use anyhow::{bail, Context, Result};
use comment_clustering::api::youtube::YouTubeClient;
use comment_clustering::history::RunHistory;
use comment_clustering::pipeline::{
    AnalysisError, AnalysisTarget, CommentAnalyzer, RunReport,
};
use comment_clustering::utils::visualization::{print_bar_chart, print_trend_table};
use std::io::{self, BufRead, Write};

fn main() -> Result<()> {
    env_logger::init();

    let target = parse_target()?;
    let api_key = std::env::var("YOUTUBE_API_KEY")
        .context("YOUTUBE_API_KEY must be set to a YouTube Data API key")?;
    let client = YouTubeClient::new(api_key)?;

    let analyzer = CommentAnalyzer::new(client);
    let mut history = RunHistory::new(analyzer.params().n_clusters);

    println!("=== YouTube Comment Cluster Analysis ===");
    match &target {
        AnalysisTarget::Channel(id) => println!("Target: channel {}\n", id),
        AnalysisTarget::Video(id) => println!("Target: video {}\n", id),
    }

    loop {
        run_once(&analyzer, &target, &mut history);

        if !prompt_rerun()? {
            break;
        }
        println!();
    }

    Ok(())
}

fn run_once(
    analyzer: &CommentAnalyzer<YouTubeClient>,
    target: &AnalysisTarget,
    history: &mut RunHistory,
) {
    println!("Collecting comments...");

    let result = analyzer.run(target, history, |done, total| {
        print!("\r  videos processed: {}/{}", done, total);
        let _ = io::stdout().flush();
    });
    println!();

    match result {
        Ok(report) => print_report(&report, history),
        Err(AnalysisError::NoVideosFound) => {
            println!("No videos found for this channel. Check the channel id.");
        }
        Err(AnalysisError::NoCommentsFound) => {
            println!("No data found. Check the id, or comments may be disabled.");
        }
        Err(err @ AnalysisError::TooFewComments { .. }) => {
            println!("{}", err);
        }
        Err(AnalysisError::EmptyVocabulary) => {
            println!("Cannot analyze: the collected comments contain no usable text.");
        }
        Err(err) => {
            println!("Run failed: {}", err);
        }
    }
}

fn print_report(report: &RunReport, history: &RunHistory) {
    println!(
        "Collected {} comments from {} video(s), {} vocabulary terms\n",
        report.comments.len(),
        report.videos_scanned,
        report.vocabulary_size
    );

    println!("Grouped comments (sample):");
    for (comment, label) in report.comments.iter().zip(report.labels.iter()).take(10) {
        let preview: String = comment.chars().take(60).collect();
        println!("  [cluster {}] {}", label, preview);
    }
    if report.comments.len() > 10 {
        println!("  ... and {} more", report.comments.len() - 10);
    }

    let labels: Vec<String> = (0..report.snapshot.n_clusters())
        .map(|cluster| format!("cluster {}", cluster))
        .collect();
    print_bar_chart(
        &labels,
        report.snapshot.counts(),
        40,
        "Comments per cluster",
    );

    if let Some(trend) = history.trend_series() {
        println!("\nCluster counts across runs:");
        print_trend_table(&trend);
    } else {
        println!("\nRun again to build a trend across runs.");
    }
}

fn parse_target() -> Result<AnalysisTarget> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    match args.as_slice() {
        [mode, id] if mode == "channel" => Ok(AnalysisTarget::Channel(id.clone())),
        [mode, id] if mode == "video" => Ok(AnalysisTarget::Video(id.clone())),
        _ => bail!("usage: analyze_comments <channel|video> <id>"),
    }
}

fn prompt_rerun() -> Result<bool> {
    print!("\nRun analysis again? [y/N]: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;

    let answer = line.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}
