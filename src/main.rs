// What you SEE:
// • Live camera feed fills the window; a crosshair follows your mouse.
// • The color under the crosshair is shown top-left as HEX / RGB / HSL.
// • Click or Space saves it into the strip along the bottom (newest left).
// • C clears the strip, D drops the newest entry, P pauses sampling,
//   ESC quits. The strip survives restarts (JSON file next to the binary).

use color_dropper::camera::CameraCapture;
use color_dropper::color::contrast_color;
use color_dropper::config::{AppConfig, DEFAULT_CONFIG_FILE};
use color_dropper::draw::{self, Canvas, Drawer};
use color_dropper::error::Error;
use color_dropper::history::JsonFileStore;
use color_dropper::session::{PickerSession, SaveOutcome, SessionConfig};
use color_dropper::types::DisplayRect;

use std::path::Path;
use std::time::{Duration, Instant};

const FLASH_DURATION: Duration = Duration::from_secs(3);

fn main() -> Result<(), Error> {
    env_logger::init();

    /* --- Configuration + session --- */
    let cfg = AppConfig::load(Path::new(DEFAULT_CONFIG_FILE));
    let mut session = PickerSession::new(
        SessionConfig {
            mapper: cfg.mapper,
            history_capacity: cfg.history_capacity,
            history_key: cfg.history_key.clone(),
            sample_radius: cfg.sample_radius,
        },
        Box::new(JsonFileStore::new(&cfg.history_dir)),
    );

    /* --- Camera + window setup ---
       The open is cancellable: closing before the camera negotiates a
       format aborts instead of leaving a stream behind. */
    let token = session.cancel_token();
    let mut cam =
        CameraCapture::open(cfg.camera_index, cfg.camera_width, cfg.camera_height, &token)?;
    let (w, h) = cam.resolution();
    let mut drawer = Drawer::new("Color Dropper", w as usize, h as usize)?;

    // The window renders the feed 1:1, so the display rect is simply the
    // delivered resolution at the origin. Sampling still goes through the
    // mapper, which also handles scaled/offset setups.
    let rect = DisplayRect::sized(w as f64, h as f64);

    /* --- HUD state --- */
    let mut flash = String::new();
    let mut flash_until = Instant::now();
    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;
    let mut hud_fps = String::from("FPS: 0.0");

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        /* 1) Fresh frame. A failed grab keeps showing the previous frame;
           sampling against it is stale but harmless for one tick. */
        match cam.next_frame() {
            Ok(frame) => session.set_frame(frame),
            Err(e) => log::warn!("frame grab failed, reusing previous: {e}"),
        }

        /* 2) Key inputs */
        if drawer.p_pressed_once() {
            let active = session.toggle_active();
            flash = if active { "RESUMED".into() } else { "PAUSED".into() };
            flash_until = Instant::now() + FLASH_DURATION;
        }
        if drawer.c_pressed_once() {
            match session.clear_history() {
                Ok(()) => flash = "HISTORY CLEARED".into(),
                Err(e) => {
                    log::warn!("clearing history: {e}");
                    flash = "CLEAR FAILED".into();
                }
            }
            flash_until = Instant::now() + FLASH_DURATION;
        }
        if drawer.d_pressed_once() {
            match session.drop_newest() {
                Ok(Some(_)) => flash = "DROPPED NEWEST".into(),
                Ok(None) => flash = "HISTORY EMPTY".into(),
                Err(e) => {
                    log::warn!("dropping newest: {e}");
                    flash = "DROP FAILED".into();
                }
            }
            flash_until = Instant::now() + FLASH_DURATION;
        }

        /* 3) Hover sampling: map the mouse into the frame and read the
           color there. Failures just skip this tick's update. */
        let mut cursor = None;
        if session.is_active() {
            if let Some((mx, my)) = drawer.mouse_pos() {
                match session.sample_at_pointer(mx, my, &rect) {
                    Ok(_) => cursor = Some((mx, my)),
                    Err(e) => log::debug!("hover sample skipped: {e}"),
                }
            }
        }

        /* 4) Capture on click or Space */
        if drawer.left_clicked() || drawer.space_pressed_once() {
            let hex = session.current().map(|s| s.hex.clone()).unwrap_or_default();
            match session.capture_current() {
                Ok(SaveOutcome::Saved(_)) => flash = format!("SAVED {hex}"),
                Ok(SaveOutcome::Duplicate) => flash = "ALREADY IN HISTORY".into(),
                Ok(SaveOutcome::NoColor) => flash = "NO COLOR YET".into(),
                Err(e) => {
                    log::warn!("saving color: {e}");
                    flash = "SAVE FAILED".into();
                }
            }
            flash_until = Instant::now() + FLASH_DURATION;
        }

        /* 5) Compose the output image: feed, crosshair, color panel,
           history strip, HUD line. */
        let mut canvas = Canvas::from_frame(session.frame());

        if let Some((mx, my)) = cursor {
            draw::draw_crosshair(&mut canvas, mx as i32, my as i32, 12, draw::pack_rgb(255, 204, 51));
        }

        if let Some(sample) = session.current().cloned() {
            let swatch = draw::pack_rgb(sample.r, sample.g, sample.b);
            let (or_, og, ob) = contrast_color(sample.r, sample.g, sample.b);
            draw::fill_rect(&mut canvas, 8, 22, 34, 34, swatch);
            draw::outline_rect(&mut canvas, 8, 22, 34, 34, draw::pack_rgb(or_, og, ob));
            draw::draw_text_5x7(&mut canvas, 48, 24, &sample.hex, 0x00FFFFFF);
            draw::draw_text_5x7(&mut canvas, 48, 34, &sample.rgb_string(), 0x00FFFFFF);
            draw::draw_text_5x7(&mut canvas, 48, 44, &sample.hsl.to_string(), 0x00FFFFFF);
        }

        let strip_y = canvas.height as i32 - 32;
        let mut x = 8;
        for entry in session.history().iter() {
            let c = &entry.color;
            draw::fill_rect(&mut canvas, x, strip_y, 24, 24, draw::pack_rgb(c.r, c.g, c.b));
            let (or_, og, ob) = contrast_color(c.r, c.g, c.b);
            draw::outline_rect(&mut canvas, x, strip_y, 24, 24, draw::pack_rgb(or_, og, ob));
            x += 28;
        }
        let count = format!("{}/{}", session.history().len(), session.history().capacity());
        draw::draw_text_5x7(&mut canvas, 8, strip_y - 12, &count, 0x00FFFFFF);

        let status = if session.is_active() { "LIVE" } else { "PAUSED" };
        let hud = if Instant::now() < flash_until {
            format!("{status} | {flash} | {hud_fps}")
        } else {
            format!("{status} | SPACE: SAVE  C: CLEAR  D: DROP  P: PAUSE | {hud_fps}")
        };
        draw::draw_text_5x7(&mut canvas, 8, 8, &hud, 0x00FFFFFF);

        /* 6) Present */
        drawer.present(&canvas)?;

        /* 7) FPS, once per second */
        frames_this_second += 1;
        let now = Instant::now();
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let fps = frames_this_second as f32 / now.duration_since(last_fps_time).as_secs_f32();
            hud_fps = format!("FPS: {fps:.1}");
            log::debug!("{hud_fps}");
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    /* --- Teardown: stop sampling, trip the token, release the camera --- */
    session.shutdown();
    cam.stop();
    log::info!("shut down with {} colors in history", session.history().len());
    Ok(())
}
