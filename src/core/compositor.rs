use anyhow::{bail, Result};

use crate::core::frame::Frame;

/// Per-pixel absolute difference between two frames, reduced to grayscale
/// and thresholded into a binary mask.
///
/// The RGB difference is collapsed with ITU-R 601 luma weights
/// (299/587/114 per mille) and a pixel is flagged only when the result is
/// strictly above the threshold. Returns one byte per pixel:
/// 255 = changed, 0 = unchanged.
pub fn difference_mask(reference: &Frame, current: &Frame, threshold: u8) -> Result<Vec<u8>> {
    if reference.width != current.width || reference.height != current.height {
        bail!(
            "Frame size mismatch: reference is {}x{}, current is {}x{}",
            reference.width,
            reference.height,
            current.width,
            current.height
        );
    }

    let mask = reference
        .data
        .chunks_exact(3)
        .zip(current.data.chunks_exact(3))
        .map(|(a, b)| {
            let dr = a[0].abs_diff(b[0]) as u32;
            let dg = a[1].abs_diff(b[1]) as u32;
            let db = a[2].abs_diff(b[2]) as u32;
            let gray = (dr * 299 + dg * 587 + db * 114) / 1000;
            if gray > threshold as u32 {
                255
            } else {
                0
            }
        })
        .collect();

    Ok(mask)
}

/// Paint the highlight color onto the frame wherever the mask is set.
/// Unmasked pixels pass through untouched.
pub fn composite_highlight(frame: &Frame, mask: &[u8], color: (u8, u8, u8)) -> Frame {
    debug_assert_eq!(mask.len(), frame.pixel_count());
    let mut data = Vec::with_capacity(frame.data.len());
    for (px, &m) in frame.data.chunks_exact(3).zip(mask) {
        if m == 255 {
            data.extend_from_slice(&[color.0, color.1, color.2]);
        } else {
            data.extend_from_slice(px);
        }
    }
    Frame::new(frame.width, frame.height, data)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GREEN: (u8, u8, u8) = (0, 255, 0);

    #[test]
    fn test_identical_frames_empty_mask() {
        let a = Frame::filled(8, 8, (120, 40, 200));
        let b = a.clone();
        let mask = difference_mask(&a, &b, 50).unwrap();
        assert_eq!(mask.len(), a.pixel_count());
        assert!(mask.iter().all(|&m| m == 0));

        let out = composite_highlight(&b, &mask, GREEN);
        assert_eq!(out, b);
    }

    #[test]
    fn test_fully_different_frames_full_mask() {
        let a = Frame::filled(8, 8, (0, 0, 0));
        let b = Frame::filled(8, 8, (255, 255, 255));
        let mask = difference_mask(&a, &b, 50).unwrap();
        assert!(mask.iter().all(|&m| m == 255));

        let out = composite_highlight(&b, &mask, GREEN);
        assert_eq!(out, Frame::filled(8, 8, GREEN));
    }

    #[test]
    fn test_threshold_is_strict() {
        // (50,50,50) against black reduces to exactly gray 50
        let a = Frame::filled(4, 4, (0, 0, 0));
        let b = Frame::filled(4, 4, (50, 50, 50));

        let mask = difference_mask(&a, &b, 50).unwrap();
        assert!(mask.iter().all(|&m| m == 0));

        let mask = difference_mask(&a, &b, 49).unwrap();
        assert!(mask.iter().all(|&m| m == 255));
    }

    #[test]
    fn test_partial_mask_keeps_unmasked_pixels() {
        let mut a = Frame::filled(2, 1, (10, 10, 10));
        let b = Frame::filled(2, 1, (10, 10, 10));
        // change only the first pixel of the reference
        a.data[0] = 255;
        a.data[1] = 255;
        a.data[2] = 255;

        let mask = difference_mask(&a, &b, 50).unwrap();
        assert_eq!(mask, vec![255, 0]);

        let out = composite_highlight(&b, &mask, GREEN);
        assert_eq!(&out.data[0..3], &[0, 255, 0]);
        assert_eq!(&out.data[3..6], &[10, 10, 10]);
    }

    #[test]
    fn test_size_mismatch_is_an_error() {
        let a = Frame::filled(4, 4, (0, 0, 0));
        let b = Frame::filled(4, 2, (0, 0, 0));
        assert!(difference_mask(&a, &b, 50).is_err());
    }
}
