// Color notations. One sampled pixel is carried around as a `ColorSample`:
// raw channels plus the hex and HSL renderings derived from them. The
// conversions are pure functions of (r, g, b) with no hidden state.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Integer HSL triple: h in [0, 360] degrees, s and l in [0, 100] percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hsl {
    pub h: u16,
    pub s: u8,
    pub l: u8,
}

impl Display for Hsl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hsl({}, {}%, {}%)", self.h, self.s, self.l)
    }
}

/// One captured color. `hex` and `hsl` are always consistent with the
/// channels because they are only ever produced through `ColorSample::new`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorSample {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub hex: String,
    pub hsl: Hsl,
}

impl ColorSample {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, hex: rgb_to_hex(r, g, b), hsl: rgb_to_hsl(r, g, b) }
    }

    /// The `rgb(r, g, b)` rendering used next to hex and HSL in the panel.
    pub fn rgb_string(&self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// `#RRGGBB`, uppercase, each channel zero-padded to two digits.
pub fn rgb_to_hex(r: u8, g: u8, b: u8) -> String {
    format!("#{r:02X}{g:02X}{b:02X}")
}

/// Inverse of `rgb_to_hex`. Accepts either case and a missing `#`.
pub fn hex_to_rgb(hex: &str) -> Result<(u8, u8, u8), Error> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(Error::InvalidChannelValue(format!("not a #RRGGBB string: {hex:?}")));
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16)
            .map_err(|e| Error::InvalidChannelValue(format!("{hex:?}: {e}")))
    };
    Ok((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Standard normalized RGB -> HSL. Achromatic input (r == g == b) gives
/// h = 0, s = 0; otherwise hue branches on whichever channel is the max.
pub fn rgb_to_hsl(r: u8, g: u8, b: u8) -> Hsl {
    let r = r as f64 / 255.0;
    let g = g as f64 / 255.0;
    let b = b as f64 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    let (h, s) = if max == min {
        (0.0, 0.0)
    } else {
        let d = max - min;
        let s = if l > 0.5 { d / (2.0 - max - min) } else { d / (max + min) };
        let h = if max == r {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };
        (h / 6.0, s)
    };

    Hsl {
        h: (h * 360.0).round() as u16,
        s: (s * 100.0).round() as u8,
        l: (l * 100.0).round() as u8,
    }
}

/// Relative luminance in [0, 1] (Rec. 601 weights).
pub fn luminance(r: u8, g: u8, b: u8) -> f64 {
    0.299 * (r as f64 / 255.0) + 0.587 * (g as f64 / 255.0) + 0.114 * (b as f64 / 255.0)
}

/// Black or white, whichever reads better on top of the given color.
pub fn contrast_color(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
    if luminance(r, g, b) > 0.5 { (0, 0, 0) } else { (255, 255, 255) }
}
