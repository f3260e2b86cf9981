/// A decoded frame as tightly packed RGB bytes, row-major.
///
/// Frames are ephemeral: one lives in memory for a single pipeline
/// iteration, gets composited and written out, then is dropped (the
/// reference frame is the only one kept around longer).
#[derive(Clone, PartialEq, Debug)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl Frame {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), (width * height * 3) as usize);
        Self {
            width,
            height,
            data,
        }
    }

    /// A frame filled with a single color. Mostly useful in tests.
    #[allow(dead_code)]
    pub fn filled(width: u32, height: u32, color: (u8, u8, u8)) -> Self {
        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for _ in 0..width * height {
            data.extend_from_slice(&[color.0, color.1, color.2]);
        }
        Self::new(width, height, data)
    }

    pub fn pixel_count(&self) -> usize {
        (self.width * self.height) as usize
    }
}
