use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::core::compositor;
use crate::core::frame::Frame;
use crate::core::output;
use crate::core::video_decoder::VideoDecoder;

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum CompareMode {
    /// Diff every sampled frame against the first sampled frame.
    FirstFrame,
    /// Diff each sampled frame against the previous sample, then append
    /// one last-against-first comparison after the main pass.
    Previous,
}

pub struct RunConfig {
    pub video_path: String,
    pub interval: f64,
    pub threshold: u8,
    pub mode: CompareMode,
    pub highlight: (u8, u8, u8),
    pub output_dir: PathBuf,
    pub output_video: bool,
}

pub struct RunSummary {
    pub frames_written: usize,
    pub video_path: Option<PathBuf>,
}

/// Run the whole pipeline: sample, diff, composite, save, optionally
/// reassemble. Strictly sequential; the first failure aborts the run.
pub fn run(config: &RunConfig) -> Result<RunSummary> {
    if config.interval <= 0.0 {
        bail!("Sampling interval must be positive (got {})", config.interval);
    }
    std::fs::create_dir_all(&config.output_dir)
        .with_context(|| format!("Failed to create {}", config.output_dir.display()))?;

    let mut decoder = VideoDecoder::open(&config.video_path)?;
    let times = sample_times(decoder.duration(), config.interval);

    let mut first_frame: Option<Frame> = None;
    let mut last_frame: Option<Frame> = None;
    let mut frame_paths = Vec::with_capacity(times.len());

    for &t in &times {
        println!("Processing frame at {} seconds...", t);
        let frame = decoder.frame_at(t)?;

        if first_frame.is_none() {
            first_frame = Some(frame.clone());
        }

        // On the very first iteration the frame is its own reference,
        // which yields an empty mask.
        let reference = match config.mode {
            CompareMode::FirstFrame => first_frame.as_ref().unwrap_or(&frame),
            CompareMode::Previous => last_frame.as_ref().unwrap_or(&frame),
        };

        let mask = compositor::difference_mask(reference, &frame, config.threshold)?;
        let composited = compositor::composite_highlight(&frame, &mask, config.highlight);

        let path = config.output_dir.join(frame_filename(t));
        output::save_frame(&composited, &path)?;
        frame_paths.push(path);

        last_frame = Some(frame);
    }

    // In to-previous mode the run closes with one extra comparison of the
    // last frame back against the first, composited onto the first frame.
    if config.mode == CompareMode::Previous {
        if let (Some(first), Some(last)) = (&first_frame, &last_frame) {
            let t = times.last().copied().unwrap_or(0.0) + config.interval;
            println!("Processing frame at {} seconds...", t);

            let mask = compositor::difference_mask(last, first, config.threshold)?;
            let composited = compositor::composite_highlight(first, &mask, config.highlight);

            let path = config.output_dir.join(frame_filename(t));
            output::save_frame(&composited, &path)?;
            frame_paths.push(path);
        }
    }

    let video_path = if config.output_video {
        let out = config.output_dir.join("output_video.mp4");
        println!("Writing {}...", out.display());
        output::assemble_video(&frame_paths, 1.0 / config.interval, &out)?;
        Some(out)
    } else {
        None
    };

    Ok(RunSummary {
        frames_written: frame_paths.len(),
        video_path,
    })
}

/// Sampled timestamps from zero up to and including the duration,
/// stepped by `interval`.
pub fn sample_times(duration: f64, interval: f64) -> Vec<f64> {
    let mut times = Vec::new();
    let mut t = 0.0;
    while t <= duration {
        times.push(t);
        t += interval;
    }
    times
}

pub fn frame_filename(seconds: f64) -> String {
    format!("frame_at_{}s.png", seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_count_matches_duration() {
        // floor(duration / interval) + 1
        assert_eq!(sample_times(10.0, 1.0).len(), 11);
        assert_eq!(sample_times(2.5, 1.0).len(), 3);
        assert_eq!(sample_times(1.0, 0.25).len(), 5);
    }

    #[test]
    fn test_sample_times_start_at_zero() {
        let times = sample_times(3.0, 1.5);
        assert_eq!(times, vec![0.0, 1.5, 3.0]);
    }

    #[test]
    fn test_zero_duration_still_samples_once() {
        assert_eq!(sample_times(0.0, 1.0), vec![0.0]);
    }

    #[test]
    fn test_frame_filename_format() {
        assert_eq!(frame_filename(0.0), "frame_at_0s.png");
        assert_eq!(frame_filename(1.5), "frame_at_1.5s.png");
        assert_eq!(frame_filename(12.0), "frame_at_12s.png");
    }
}
