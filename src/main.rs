mod core;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;

use crate::core::pipeline::{self, CompareMode, RunConfig};

/// Sample a video at fixed intervals and highlight the regions that
/// changed against a reference frame.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the video file
    video_path: String,

    /// Time interval between sampled frames, in seconds
    #[arg(short, long, default_value_t = 1.0)]
    interval: f64,

    /// Minimum per-pixel difference counted as changed (0-255)
    #[arg(short, long, default_value_t = 50)]
    threshold: u8,

    /// Compare each frame to the first frame
    #[arg(long, conflicts_with = "compare_last")]
    compare_first: bool,

    /// Compare each frame to the previous one, plus a final
    /// last-against-first comparison (default)
    #[arg(long)]
    compare_last: bool,

    /// Stitch the processed frames into output_video.mp4
    #[arg(long)]
    output_video: bool,

    /// Directory the processed frames are written to
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Highlight color as R,G,B
    #[arg(long, default_value = "0,255,0", value_parser = parse_color)]
    color: (u8, u8, u8),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mode = if cli.compare_first {
        CompareMode::FirstFrame
    } else {
        CompareMode::Previous
    };

    let config = RunConfig {
        video_path: cli.video_path,
        interval: cli.interval,
        threshold: cli.threshold,
        mode,
        highlight: cli.color,
        output_dir: cli.output_dir,
        output_video: cli.output_video,
    };

    let started = Instant::now();
    let summary = pipeline::run(&config)?;

    println!(
        "Processing complete. {} frames written in {:.2}s",
        summary.frames_written,
        started.elapsed().as_secs_f64()
    );
    if let Some(path) = summary.video_path {
        println!("Video written to {}", path.display());
    }

    Ok(())
}

fn parse_color(s: &str) -> Result<(u8, u8, u8), String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 3 {
        return Err(format!("expected R,G,B, got '{}'", s));
    }
    let channel = |v: &str| {
        v.trim()
            .parse::<u8>()
            .map_err(|e| format!("invalid channel '{}': {}", v, e))
    };
    Ok((channel(parts[0])?, channel(parts[1])?, channel(parts[2])?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color_default_green() {
        assert_eq!(parse_color("0,255,0"), Ok((0, 255, 0)));
    }

    #[test]
    fn test_parse_color_with_spaces() {
        assert_eq!(parse_color("255, 0, 128"), Ok((255, 0, 128)));
    }

    #[test]
    fn test_parse_color_rejects_bad_input() {
        assert!(parse_color("0,255").is_err());
        assert!(parse_color("0,255,0,0").is_err());
        assert!(parse_color("0,256,0").is_err());
        assert!(parse_color("green").is_err());
    }
}
