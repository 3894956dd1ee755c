// One picker session ties everything together: the latest frame from the
// capture side, the coordinate mapper, the sampler, and the history manager.
// Page-style globals become fields here, so two sessions with different
// calibration or capacity can coexist.

use crate::color::ColorSample;
use crate::error::Error;
use crate::history::{CaptureOutcome, ColorHistory, HistoryStore};
use crate::mapper::{CoordinateMapper, MapperConfig, Reach};
use crate::sampler;
use crate::types::{DisplayRect, FrameBuffer, Landmark, PixelCoord};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cooperative cancellation for anything in flight: a camera start that is
/// still negotiating formats, or the periodic sampling loop. Cloning shares
/// the flag.
#[derive(Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Subscription seam for hand trackers. An implementation delivers at most
/// one update per pump: the current fingertip landmark, or `None` when the
/// hand is lost. The session never learns which tracking library is behind
/// this.
pub trait TrackerSource {
    fn pump(&mut self, handler: &mut dyn FnMut(Option<Landmark>));
}

/// What one tracker update amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackOutcome {
    /// Sampled successfully; the cursor belongs at this buffer pixel.
    Sampled(PixelCoord),
    /// Hand visible but outside the expanded detection area; hide cursor.
    OutOfRange,
    /// No hand this update; hide cursor.
    Lost,
    /// Paused, cancelled, or a recoverable sampling failure (logged). The
    /// next update simply tries again.
    Skipped,
}

/// What a capture request amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(u64),
    Duplicate,
    /// Nothing sampled yet this session.
    NoColor,
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub mapper: MapperConfig,
    pub history_capacity: usize,
    pub history_key: String,
    /// Half-width of the averaged sampling patch; 0 reads a single pixel.
    pub sample_radius: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            mapper: MapperConfig::default(),
            history_capacity: 12,
            history_key: "color_history".to_string(),
            sample_radius: 0,
        }
    }
}

pub struct PickerSession {
    mapper: CoordinateMapper,
    frame: FrameBuffer,
    history: ColorHistory,
    current: Option<ColorSample>,
    active: bool,
    token: CancelToken,
    sample_radius: u32,
}

impl PickerSession {
    pub fn new(cfg: SessionConfig, store: Box<dyn HistoryStore>) -> Self {
        let history = ColorHistory::open(cfg.history_capacity, cfg.history_key, store);
        log::info!("session ready, {} colors restored from history", history.len());
        Self {
            mapper: CoordinateMapper::new(cfg.mapper),
            frame: FrameBuffer::empty(),
            history,
            current: None,
            active: true,
            token: CancelToken::new(),
            sample_radius: cfg.sample_radius,
        }
    }

    /// Token shared with the capture side; `shutdown` trips it.
    pub fn cancel_token(&self) -> CancelToken {
        self.token.clone()
    }

    /// The capture collaborator hands over each finished frame here. The
    /// session only ever reads it afterwards.
    pub fn set_frame(&mut self, frame: FrameBuffer) {
        self.frame = frame;
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    /// Pause/resume periodic sampling. Returns the new state.
    pub fn toggle_active(&mut self) -> bool {
        self.active = !self.active;
        self.active
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn current(&self) -> Option<&ColorSample> {
        self.current.as_ref()
    }

    /// Pointer path: map a display-space position and sample there.
    pub fn sample_at_pointer(
        &mut self,
        x: f64,
        y: f64,
        rect: &DisplayRect,
    ) -> Result<&ColorSample, Error> {
        let px = self.mapper.map_display(x, y, rect, self.frame.width, self.frame.height)?;
        let sample = sampler::sample_region(&self.frame, px, self.sample_radius)?;
        Ok(&*self.current.insert(sample))
    }

    /// Landmark path: one tracker update in, one outcome out. Range gating
    /// runs before any mapping, so a hand far off-frame costs nothing.
    pub fn on_tracker_update(
        &mut self,
        update: Option<Landmark>,
        rect: &DisplayRect,
    ) -> TrackOutcome {
        if !self.active || self.token.is_cancelled() {
            return TrackOutcome::Skipped;
        }
        let Some(lm) = update else {
            return TrackOutcome::Lost;
        };
        if self.mapper.classify(lm, rect) == Reach::OutOfRange {
            return TrackOutcome::OutOfRange;
        }
        let sampled = self
            .mapper
            .map_landmark(lm, rect, self.frame.width, self.frame.height)
            .and_then(|px| sampler::sample_region(&self.frame, px, self.sample_radius).map(|s| (px, s)));
        match sampled {
            Ok((px, sample)) => {
                self.current = Some(sample);
                TrackOutcome::Sampled(px)
            }
            Err(e) => {
                // Recoverable per tick: skip the color update, retry on the
                // next event.
                log::debug!("sampling skipped this tick: {e}");
                TrackOutcome::Skipped
            }
        }
    }

    /// Push the current color into the history.
    pub fn capture_current(&mut self) -> Result<SaveOutcome, Error> {
        let Some(sample) = self.current.clone() else {
            return Ok(SaveOutcome::NoColor);
        };
        match self.history.capture(&sample)? {
            CaptureOutcome::Saved(id) => Ok(SaveOutcome::Saved(id)),
            CaptureOutcome::Duplicate => Ok(SaveOutcome::Duplicate),
        }
    }

    pub fn history(&self) -> &ColorHistory {
        &self.history
    }

    pub fn remove_entry(&mut self, id: u64) -> Result<bool, Error> {
        self.history.remove(id)
    }

    /// Delete the most recently captured entry, if any.
    pub fn drop_newest(&mut self) -> Result<Option<u64>, Error> {
        let Some(id) = self.history.newest().map(|e| e.id) else {
            return Ok(None);
        };
        self.history.remove(id)?;
        Ok(Some(id))
    }

    pub fn clear_history(&mut self) -> Result<(), Error> {
        self.history.clear()
    }

    /// Stop sampling and trip the shared token so any in-flight camera
    /// start aborts instead of racing teardown.
    pub fn shutdown(&mut self) {
        self.active = false;
        self.token.cancel();
    }
}
