// Translates display-space positions (mouse) and normalized fingertip
// landmarks into pixel coordinates inside the frame buffer's native
// resolution. The window may render the feed scaled, so the two coordinate
// spaces rarely match.

use crate::error::Error;
use crate::types::{DisplayRect, Landmark, PixelCoord};
use serde::{Deserialize, Serialize};

/// Calibration constants for landmark-to-cursor alignment. Trackers report
/// the fingertip slightly away from where people feel they are pointing, so
/// deployments nudge the mapped position by a fixed offset/scale. These are
/// tuning data, not computed values; different setups ship different numbers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    /// Pixel nudge applied after scaling a landmark into display space.
    pub offset_x: f64,
    pub offset_y: f64,
    /// Stretch applied to the landmark position within the display rect.
    pub scale_x: f64,
    pub scale_y: f64,
    /// Extra slack, in display pixels, around the rect when deciding whether
    /// a fingertip still counts as "at the video". Generous on purpose: a
    /// hand hovering just past the frame edge should keep the cursor alive.
    pub margin_x: f64,
    pub margin_y: f64,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            margin_x: 200.0,
            margin_y: 300.0,
        }
    }
}

/// Whether a fingertip is close enough to the feed for sampling to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reach {
    InRange,
    OutOfRange,
}

pub struct CoordinateMapper {
    cfg: MapperConfig,
}

impl CoordinateMapper {
    pub fn new(cfg: MapperConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &MapperConfig {
        &self.cfg
    }

    /// Map an absolute display-space position (e.g. a mouse event) to a
    /// buffer pixel. Positions beyond the rect clamp to the nearest edge
    /// pixel; a cursor skimming the border is normal, not an error.
    pub fn map_display(
        &self,
        x: f64,
        y: f64,
        rect: &DisplayRect,
        buf_width: u32,
        buf_height: u32,
    ) -> Result<PixelCoord, Error> {
        to_buffer(x - rect.left, y - rect.top, rect, buf_width, buf_height)
    }

    /// Map a normalized landmark to a buffer pixel, applying the calibration
    /// scale and offset first.
    pub fn map_landmark(
        &self,
        lm: Landmark,
        rect: &DisplayRect,
        buf_width: u32,
        buf_height: u32,
    ) -> Result<PixelCoord, Error> {
        let x = lm.x * rect.width * self.cfg.scale_x + self.cfg.offset_x;
        let y = lm.y * rect.height * self.cfg.scale_y + self.cfg.offset_y;
        to_buffer(x, y, rect, buf_width, buf_height)
    }

    /// Is the *raw* landmark position within the rect expanded by the
    /// configured margins? Calibration offsets deliberately do not apply
    /// here: range gating is about where the hand actually is.
    pub fn classify(&self, lm: Landmark, rect: &DisplayRect) -> Reach {
        let x = lm.x * rect.width;
        let y = lm.y * rect.height;
        let in_x = x >= -self.cfg.margin_x && x <= rect.width + self.cfg.margin_x;
        let in_y = y >= -self.cfg.margin_y && y <= rect.height + self.cfg.margin_y;
        if in_x && in_y { Reach::InRange } else { Reach::OutOfRange }
    }
}

/// Shared tail of both mapping paths: scale rect-local coordinates into the
/// buffer, floor, then clamp each axis to [0, dim - 1].
fn to_buffer(
    local_x: f64,
    local_y: f64,
    rect: &DisplayRect,
    buf_width: u32,
    buf_height: u32,
) -> Result<PixelCoord, Error> {
    if rect.width <= 0.0 || rect.height <= 0.0 {
        // Element not laid out yet; dividing here would poison everything.
        return Err(Error::InvalidGeometry);
    }
    if buf_width == 0 || buf_height == 0 {
        return Err(Error::InvalidGeometry);
    }
    let x = (local_x * buf_width as f64 / rect.width).floor();
    let y = (local_y * buf_height as f64 / rect.height).floor();
    Ok(PixelCoord {
        x: x.clamp(0.0, (buf_width - 1) as f64) as u32,
        y: y.clamp(0.0, (buf_height - 1) as f64) as u32,
    })
}
