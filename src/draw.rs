// Window + software overlay drawing: the live feed with a crosshair at the
// sampling point, a swatch panel for the current color, the history strip,
// and a tiny 5x7 bitmap font for the HUD readouts.

use crate::error::Error;
use crate::types::FrameBuffer;
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

/// The composed image for one tick: the camera frame repacked for minifb,
/// with overlays drawn on top before presenting.
pub struct Canvas {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u32>,
}

impl Canvas {
    pub fn from_frame(frame: &FrameBuffer) -> Self {
        Self {
            width: frame.width as usize,
            height: frame.height as usize,
            pixels: frame.to_packed(),
        }
    }
}

/// Pack channels into the 0x00RRGGBB word minifb expects.
pub fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

pub struct Drawer {
    window: Window,
    left_was_down: bool,
}

impl Drawer {
    /// Create a window sized to the camera feed.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self, Error> {
        let window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        Ok(Self { window, left_was_down: false })
    }

    /// Push this tick's pixels to the screen.
    pub fn present(&mut self, canvas: &Canvas) -> Result<(), Error> {
        self.window
            .update_with_buffer(&canvas.pixels, canvas.width, canvas.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    /// Mouse position in window coordinates. `Pass` mode keeps reporting
    /// beyond the edges; the mapper clamps, matching how a tracked hand at
    /// the frame border behaves.
    pub fn mouse_pos(&self) -> Option<(f64, f64)> {
        self.window
            .get_mouse_pos(MouseMode::Pass)
            .map(|(x, y)| (x as f64, y as f64))
    }

    /// True exactly once per physical click (edge detection on the held
    /// button state minifb exposes).
    pub fn left_clicked(&mut self) -> bool {
        let down = self.window.get_mouse_down(MouseButton::Left);
        let clicked = down && !self.left_was_down;
        self.left_was_down = down;
        clicked
    }

    // Key bindings: capture, clear, drop-last, pause.
    pub fn space_pressed_once(&self) -> bool {
        self.window.is_key_pressed(Key::Space, KeyRepeat::No)
    }

    pub fn c_pressed_once(&self) -> bool {
        self.window.is_key_pressed(Key::C, KeyRepeat::No)
    }

    pub fn d_pressed_once(&self) -> bool {
        self.window.is_key_pressed(Key::D, KeyRepeat::No)
    }

    pub fn p_pressed_once(&self) -> bool {
        self.window.is_key_pressed(Key::P, KeyRepeat::No)
    }
}

/* ---------- Software drawing: pixels, rects, crosshair, bitmap font ---------- */

/// Put a pixel if (x, y) is inside the canvas.
#[inline]
fn put_pixel(canvas: &mut Canvas, x: i32, y: i32, color: u32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= canvas.width || y >= canvas.height {
        return;
    }
    canvas.pixels[y * canvas.width + x] = color;
}

/// Thin Bresenham line.
fn draw_line(canvas: &mut Canvas, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
    let (mut x0, mut y0, x1, y1) = (x0, y0, x1, y1);
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        put_pixel(canvas, x0, y0, color);
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

/// Crosshair with a gap at the center, marking the sampling point.
pub fn draw_crosshair(canvas: &mut Canvas, cx: i32, cy: i32, size: i32, color: u32) {
    draw_line(canvas, cx - size, cy, cx - 2, cy, color);
    draw_line(canvas, cx + 2, cy, cx + size, cy, color);
    draw_line(canvas, cx, cy - size, cx, cy - 2, color);
    draw_line(canvas, cx, cy + 2, cx, cy + size, color);
    put_pixel(canvas, cx, cy, color);
}

pub fn fill_rect(canvas: &mut Canvas, x: i32, y: i32, w: i32, h: i32, color: u32) {
    for py in y..y + h {
        for px in x..x + w {
            put_pixel(canvas, px, py, color);
        }
    }
}

pub fn outline_rect(canvas: &mut Canvas, x: i32, y: i32, w: i32, h: i32, color: u32) {
    draw_line(canvas, x, y, x + w - 1, y, color);
    draw_line(canvas, x, y + h - 1, x + w - 1, y + h - 1, color);
    draw_line(canvas, x, y, x, y + h - 1, color);
    draw_line(canvas, x + w - 1, y, x + w - 1, y + h - 1, color);
}

/* ---------- 5x7 bitmap font (uppercase ASCII subset for the HUD) ---------- */

/// Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch {
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'B' => g!(0b11110,0b10001,0b10001,0b11110,0b10001,0b10001,0b11110),
        'C' => g!(0b01110,0b10001,0b10000,0b10000,0b10000,0b10001,0b01110),
        'D' => g!(0b11100,0b10010,0b10001,0b10001,0b10001,0b10010,0b11100),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'F' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b10000),
        'G' => g!(0b01110,0b10001,0b10000,0b10111,0b10001,0b10001,0b01111),
        'H' => g!(0b10001,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'I' => g!(0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'J' => g!(0b00111,0b00010,0b00010,0b00010,0b00010,0b10010,0b01100),
        'K' => g!(0b10001,0b10010,0b10100,0b11000,0b10100,0b10010,0b10001),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'M' => g!(0b10001,0b11011,0b10101,0b10101,0b10001,0b10001,0b10001),
        'N' => g!(0b10001,0b11001,0b10101,0b10011,0b10001,0b10001,0b10001),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'P' => g!(0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000),
        'Q' => g!(0b01110,0b10001,0b10001,0b10001,0b10101,0b10010,0b01101),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        'U' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'V' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b01010,0b00100),
        'W' => g!(0b10001,0b10001,0b10001,0b10101,0b10101,0b11011,0b10001),
        'X' => g!(0b10001,0b10001,0b01010,0b00100,0b01010,0b10001,0b10001),
        'Y' => g!(0b10001,0b10001,0b01010,0b00100,0b00100,0b00100,0b00100),
        'Z' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b10000,0b11111),

        '#' => g!(0b01010,0b01010,0b11111,0b01010,0b11111,0b01010,0b01010),
        '%' => g!(0b11000,0b11001,0b00010,0b00100,0b01000,0b10011,0b00011),
        '/' => g!(0b00001,0b00001,0b00010,0b00100,0b01000,0b10000,0b10000),
        '(' => g!(0b00010,0b00100,0b01000,0b01000,0b01000,0b00100,0b00010),
        ')' => g!(0b01000,0b00100,0b00010,0b00010,0b00010,0b00100,0b01000),
        '-' => g!(0b00000,0b00000,0b00000,0b11111,0b00000,0b00000,0b00000),
        ',' => g!(0b00000,0b00000,0b00000,0b00000,0b00110,0b00100,0b01000),
        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        '|' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b00000),

        _ => None,
    }
}

/// One glyph with a 1-pixel black shadow for contrast over live video.
fn draw_char_5x7(canvas: &mut Canvas, x: i32, y: i32, ch: char, color: u32) {
    if let Some(rows) = glyph5x7(ch) {
        for (ry, rowbits) in rows.iter().enumerate() {
            for rx in 0..5 {
                if (rowbits & (1 << (4 - rx))) != 0 {
                    put_pixel(canvas, x + rx as i32 + 1, y + ry as i32 + 1, 0x00000000);
                }
            }
        }
        for (ry, rowbits) in rows.iter().enumerate() {
            for rx in 0..5 {
                if (rowbits & (1 << (4 - rx))) != 0 {
                    put_pixel(canvas, x + rx as i32, y + ry as i32, color);
                }
            }
        }
    }
}

/// Draw a HUD string. Lowercase input renders as uppercase; characters the
/// font lacks are skipped (the x advance still happens, keeping columns
/// aligned).
pub fn draw_text_5x7(canvas: &mut Canvas, mut x: i32, y: i32, text: &str, color: u32) {
    for ch in text.chars() {
        draw_char_5x7(canvas, x, y, ch.to_ascii_uppercase(), color);
        x += 6; // 5 pixels glyph width + 1 pixel spacing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PixelCoord;

    fn blank(w: usize, h: usize) -> Canvas {
        Canvas { width: w, height: h, pixels: vec![0; w * h] }
    }

    #[test]
    fn canvas_repacks_the_frame() {
        let fb = FrameBuffer::new(1, 1, vec![0xAB, 0xCD, 0xEF, 255]);
        let c = Canvas::from_frame(&fb);
        assert_eq!((c.width, c.height), (1, 1));
        assert_eq!(c.pixels, vec![0x00ABCDEF]);
        assert_eq!(pack_rgb(0xAB, 0xCD, 0xEF), 0x00ABCDEF);
        // Same packing as FrameBuffer::rgba_at would imply.
        assert_eq!(fb.rgba_at(PixelCoord { x: 0, y: 0 }), Some([0xAB, 0xCD, 0xEF, 255]));
    }

    #[test]
    fn fill_rect_clips_to_canvas() {
        let mut c = blank(4, 4);
        fill_rect(&mut c, 2, 2, 10, 10, 0xFF);
        // In-bounds corner painted, everything above/left untouched.
        assert_eq!(c.pixels[2 * 4 + 2], 0xFF);
        assert_eq!(c.pixels[3 * 4 + 3], 0xFF);
        assert_eq!(c.pixels[0], 0);
        assert_eq!(c.pixels[1 * 4 + 1], 0);
    }

    #[test]
    fn hud_font_covers_every_hud_character() {
        let hud = "LIVE PAUSED | #0F9ACD RGB(0, 15, 255) HSL(240, 100%, 50%) 8/12 FPS: 29.7 SAVED DUPLICATE CLEARED";
        for ch in hud.chars() {
            assert!(glyph5x7(ch.to_ascii_uppercase()).is_some(), "missing glyph {ch:?}");
        }
    }

    #[test]
    fn text_draws_something_and_clips_safely() {
        let mut c = blank(40, 10);
        draw_text_5x7(&mut c, 0, 0, "A1", 0xFFFFFF);
        assert!(c.pixels.iter().any(|&p| p == 0xFFFFFF));
        // Way off-canvas: must not panic.
        draw_text_5x7(&mut c, -100, -100, "CLIP", 0xFFFFFF);
        draw_crosshair(&mut c, 1000, 1000, 12, 0xFF);
    }
}
