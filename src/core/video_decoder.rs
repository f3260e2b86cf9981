use anyhow::{anyhow, Result};
use opencv::{imgproc, prelude::*, videoio};

use crate::core::frame::Frame;

pub struct VideoDecoder {
    capture: videoio::VideoCapture,
    fps: f64,
    frame_count: f64,
}

impl VideoDecoder {
    pub fn open(path: &str) -> Result<Self> {
        // CAP_ANY lets OpenCV pick the best backend for the platform
        let capture = videoio::VideoCapture::from_file(path, videoio::CAP_ANY)?;
        if !capture.is_opened()? {
            return Err(anyhow!("Failed to open video file: {}", path));
        }

        let fps = capture.get(videoio::CAP_PROP_FPS)?;
        let frame_count = capture.get(videoio::CAP_PROP_FRAME_COUNT)?;
        if fps <= 0.0 || frame_count < 1.0 {
            return Err(anyhow!(
                "Video reports no usable timing ({} fps, {} frames): {}",
                fps,
                frame_count,
                path
            ));
        }

        let width = capture.get(videoio::CAP_PROP_FRAME_WIDTH)? as u32;
        let height = capture.get(videoio::CAP_PROP_FRAME_HEIGHT)? as u32;

        println!(
            "Opened {} ({}x{}, {:.2} fps, {} frames)",
            path, width, height, fps, frame_count as u64
        );

        Ok(Self {
            capture,
            fps,
            frame_count,
        })
    }

    /// Timestamp of the last decodable frame, in seconds. Sampling up to
    /// this value inclusive always lands on a real frame.
    pub fn duration(&self) -> f64 {
        (self.frame_count - 1.0).max(0.0) / self.fps
    }

    /// Seek to the given timestamp and decode one frame as packed RGB.
    pub fn frame_at(&mut self, seconds: f64) -> Result<Frame> {
        self.capture
            .set(videoio::CAP_PROP_POS_MSEC, seconds * 1000.0)?;

        let mut bgr = Mat::default();
        if !self.capture.read(&mut bgr)? || bgr.empty() {
            return Err(anyhow!("No frame decodable at {}s", seconds));
        }

        let mut rgb = Mat::default();
        imgproc::cvt_color(&bgr, &mut rgb, imgproc::COLOR_BGR2RGB, 0)?;

        if !rgb.is_continuous() {
            return Err(anyhow!("Frame data is not continuous"));
        }

        Ok(Frame::new(
            rgb.cols() as u32,
            rgb.rows() as u32,
            rgb.data_bytes()?.to_vec(),
        ))
    }
}
