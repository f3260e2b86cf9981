use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use image::RgbImage;
use opencv::{core, imgcodecs, prelude::*, videoio};

use crate::core::frame::Frame;

/// Write a composited frame to disk as PNG.
pub fn save_frame(frame: &Frame, path: &Path) -> Result<()> {
    let img = RgbImage::from_raw(frame.width, frame.height, frame.data.clone())
        .ok_or_else(|| anyhow!("Frame buffer does not match its dimensions"))?;
    img.save(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Re-read the saved frames and stitch them into an mp4 at the given
/// frame rate. Frames are written in the order given.
pub fn assemble_video(frame_paths: &[PathBuf], fps: f64, output: &Path) -> Result<()> {
    if frame_paths.is_empty() {
        bail!("No frames to assemble into a video");
    }

    let first = read_image(&frame_paths[0])?;
    let size = core::Size::new(first.cols(), first.rows());

    let fourcc = videoio::VideoWriter::fourcc('m', 'p', '4', 'v')?;
    let mut writer = videoio::VideoWriter::new(
        &output.to_string_lossy(),
        fourcc,
        fps,
        size,
        true,
    )?;
    if !writer.is_opened()? {
        return Err(anyhow!(
            "Failed to open video writer for {}",
            output.display()
        ));
    }

    writer.write(&first)?;
    for path in &frame_paths[1..] {
        let mat = read_image(path)?;
        writer.write(&mat)?;
    }
    writer.release()?;

    Ok(())
}

fn read_image(path: &Path) -> Result<Mat> {
    let mat = imgcodecs::imread(&path.to_string_lossy(), imgcodecs::IMREAD_COLOR)?;
    if mat.empty() {
        bail!("Failed to re-read {}", path.display());
    }
    Ok(mat)
}
