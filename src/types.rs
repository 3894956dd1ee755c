// Core geometry + frame types shared by the mapper, sampler and session.

/// One decoded camera frame at its native resolution.
/// Row-major RGBA, 4 bytes per pixel. The capture side writes it once per
/// tick; the sampling side only ever reads.
#[derive(Clone, Default)]
pub struct FrameBuffer {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>, // length = width * height * 4
}

impl FrameBuffer {
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Self {
        debug_assert_eq!(rgba.len(), (width as usize) * (height as usize) * 4);
        Self { width, height, rgba }
    }

    /// A zero-sized buffer, the state before the first camera frame lands.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Read the RGBA channels at `p`, or `None` when `p` is outside the frame.
    pub fn rgba_at(&self, p: PixelCoord) -> Option<[u8; 4]> {
        if p.x >= self.width || p.y >= self.height {
            return None;
        }
        let idx = ((p.y as usize) * (self.width as usize) + p.x as usize) * 4;
        let px = self.rgba.get(idx..idx + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Repack into 0x00RRGGBB words, the layout minifb presents.
    pub fn to_packed(&self) -> Vec<u32> {
        self.rgba
            .chunks_exact(4)
            .map(|px| ((px[0] as u32) << 16) | ((px[1] as u32) << 8) | px[2] as u32)
            .collect()
    }
}

/// Where the feed is rendered on screen, in display pixels. Distinct from the
/// frame's native resolution; the mapper bridges the two.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl DisplayRect {
    /// A rect anchored at the origin, the common case for a 1:1 window.
    pub fn sized(width: f64, height: f64) -> Self {
        Self { left: 0.0, top: 0.0, width, height }
    }
}

/// A tracked fingertip position, both coordinates normalized to [0, 1]
/// relative to the display rect. Positions slightly outside [0, 1] happen
/// whenever the hand drifts past the frame edge and are fine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
}

/// An integer pixel position inside a frame buffer. Only the mapper makes
/// these, and it always clamps, so a `PixelCoord` is in bounds by
/// construction for the buffer it was mapped against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelCoord {
    pub x: u32,
    pub y: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkerboard() -> FrameBuffer {
        // 2x2: red, green / blue, white
        let rgba = vec![
            255, 0, 0, 255, /**/ 0, 255, 0, 255, //
            0, 0, 255, 255, /**/ 255, 255, 255, 255,
        ];
        FrameBuffer::new(2, 2, rgba)
    }

    #[test]
    fn reads_each_pixel() {
        let fb = checkerboard();
        assert_eq!(fb.rgba_at(PixelCoord { x: 0, y: 0 }), Some([255, 0, 0, 255]));
        assert_eq!(fb.rgba_at(PixelCoord { x: 1, y: 0 }), Some([0, 255, 0, 255]));
        assert_eq!(fb.rgba_at(PixelCoord { x: 0, y: 1 }), Some([0, 0, 255, 255]));
        assert_eq!(fb.rgba_at(PixelCoord { x: 1, y: 1 }), Some([255, 255, 255, 255]));
    }

    #[test]
    fn out_of_bounds_reads_are_none() {
        let fb = checkerboard();
        assert_eq!(fb.rgba_at(PixelCoord { x: 2, y: 0 }), None);
        assert_eq!(fb.rgba_at(PixelCoord { x: 0, y: 2 }), None);
        assert_eq!(FrameBuffer::empty().rgba_at(PixelCoord { x: 0, y: 0 }), None);
    }

    #[test]
    fn packs_for_the_window() {
        let fb = checkerboard();
        assert_eq!(
            fb.to_packed(),
            vec![0x00FF0000, 0x0000FF00, 0x000000FF, 0x00FFFFFF]
        );
    }
}
