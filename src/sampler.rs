// Reads color out of a frame buffer. Two flavors: the exact pixel, and the
// mean over a small square patch around it. Averaging smooths sensor noise
// when a fingertip hovers over a textured surface.

use crate::color::ColorSample;
use crate::error::Error;
use crate::types::{FrameBuffer, PixelCoord};

/// Sample the single pixel at `p`.
pub fn sample(frame: &FrameBuffer, p: PixelCoord) -> Result<ColorSample, Error> {
    if frame.is_empty() {
        return Err(Error::BufferUnavailable);
    }
    let [r, g, b, _a] = frame.rgba_at(p).ok_or(Error::BufferUnavailable)?;
    Ok(ColorSample::new(r, g, b))
}

/// Sample the mean color of the square patch of half-width `radius` centered
/// at `p`, clipped to the frame. `radius == 0` is the single-pixel case.
pub fn sample_region(frame: &FrameBuffer, p: PixelCoord, radius: u32) -> Result<ColorSample, Error> {
    if radius == 0 {
        return sample(frame, p);
    }
    if frame.is_empty() {
        return Err(Error::BufferUnavailable);
    }
    if p.x >= frame.width || p.y >= frame.height {
        return Err(Error::BufferUnavailable);
    }

    let x0 = p.x.saturating_sub(radius);
    let y0 = p.y.saturating_sub(radius);
    let x1 = (p.x + radius).min(frame.width - 1);
    let y1 = (p.y + radius).min(frame.height - 1);

    let mut sum = [0u64; 3];
    for y in y0..=y1 {
        for x in x0..=x1 {
            // In bounds by construction of the clipped patch.
            if let Some([r, g, b, _]) = frame.rgba_at(PixelCoord { x, y }) {
                sum[0] += r as u64;
                sum[1] += g as u64;
                sum[2] += b as u64;
            }
        }
    }
    let count = ((x1 - x0 + 1) as u64) * ((y1 - y0 + 1) as u64);
    Ok(ColorSample::new(
        (sum[0] / count) as u8,
        (sum[1] / count) as u8,
        (sum[2] / count) as u8,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, rgb: [u8; 3]) -> FrameBuffer {
        let mut rgba = Vec::with_capacity((width * height * 4) as usize);
        for _ in 0..width * height {
            rgba.extend_from_slice(&[rgb[0], rgb[1], rgb[2], 255]);
        }
        FrameBuffer::new(width, height, rgba)
    }

    #[test]
    fn samples_the_exact_pixel() {
        let mut fb = solid(3, 3, [10, 20, 30]);
        // Paint the center (row 1, col 1) a different color.
        let idx = (3 + 1) * 4;
        fb.rgba[idx..idx + 3].copy_from_slice(&[200, 100, 50]);

        let s = sample(&fb, PixelCoord { x: 1, y: 1 }).unwrap();
        assert_eq!((s.r, s.g, s.b), (200, 100, 50));
        assert_eq!(s.hex, "#C86432");

        let s = sample(&fb, PixelCoord { x: 0, y: 2 }).unwrap();
        assert_eq!((s.r, s.g, s.b), (10, 20, 30));
    }

    #[test]
    fn empty_buffer_is_unavailable() {
        let fb = FrameBuffer::empty();
        assert!(matches!(sample(&fb, PixelCoord { x: 0, y: 0 }), Err(Error::BufferUnavailable)));
        assert!(matches!(
            sample_region(&fb, PixelCoord { x: 0, y: 0 }, 2),
            Err(Error::BufferUnavailable)
        ));
    }

    #[test]
    fn out_of_bounds_pixel_is_unavailable() {
        let fb = solid(2, 2, [1, 2, 3]);
        assert!(matches!(sample(&fb, PixelCoord { x: 2, y: 0 }), Err(Error::BufferUnavailable)));
        assert!(matches!(
            sample_region(&fb, PixelCoord { x: 0, y: 5 }, 1),
            Err(Error::BufferUnavailable)
        ));
    }

    #[test]
    fn region_mean_over_uniform_patch() {
        let fb = solid(5, 5, [40, 80, 120]);
        let s = sample_region(&fb, PixelCoord { x: 2, y: 2 }, 1).unwrap();
        assert_eq!((s.r, s.g, s.b), (40, 80, 120));
    }

    #[test]
    fn region_averages_mixed_pixels() {
        // 2x1: black and white; the patch covers both.
        let fb = FrameBuffer::new(2, 1, vec![0, 0, 0, 255, 255, 255, 255, 255]);
        let s = sample_region(&fb, PixelCoord { x: 0, y: 0 }, 1).unwrap();
        assert_eq!((s.r, s.g, s.b), (127, 127, 127));
    }

    #[test]
    fn region_clips_at_the_frame_edge() {
        // Corner pixel with a big radius: only the in-frame quarter counts,
        // so a uniform frame still averages to its own color.
        let fb = solid(4, 4, [9, 9, 9]);
        let s = sample_region(&fb, PixelCoord { x: 0, y: 0 }, 10).unwrap();
        assert_eq!((s.r, s.g, s.b), (9, 9, 9));
    }

    #[test]
    fn zero_radius_matches_single_pixel() {
        let fb = solid(3, 3, [5, 6, 7]);
        let a = sample(&fb, PixelCoord { x: 1, y: 2 }).unwrap();
        let b = sample_region(&fb, PixelCoord { x: 1, y: 2 }, 0).unwrap();
        assert_eq!(a, b);
    }
}
