// On-disk configuration. Everything has a default, so a missing or partial
// file is fine; a malformed one falls back to defaults with a warning. The
// mapper block is calibration data that differs per deployment, which is
// exactly why it lives in a file instead of the source.

use crate::mapper::MapperConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "color-dropper.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Which camera to open; 0 is the default webcam.
    pub camera_index: u32,
    /// Requested capture resolution. The device may deliver something close
    /// instead; the actual resolution wins everywhere downstream.
    pub camera_width: u32,
    pub camera_height: u32,
    /// Distinct captured colors kept before the oldest is evicted.
    pub history_capacity: usize,
    /// Key the history blob is stored under.
    pub history_key: String,
    /// Directory the file store writes into.
    pub history_dir: PathBuf,
    /// Half-width of the averaged sampling patch; 0 samples one pixel.
    pub sample_radius: u32,
    pub mapper: MapperConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            camera_index: 0,
            camera_width: 1280,
            camera_height: 720,
            history_capacity: 12,
            history_key: "color_history".to_string(),
            history_dir: PathBuf::from("."),
            sample_radius: 0,
            mapper: MapperConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load from `path`, falling back to defaults when the file is missing
    /// or unreadable. Never fails: configuration problems should not keep
    /// the picker from starting.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(text) => match serde_json::from_str::<AppConfig>(&text) {
                Ok(cfg) => {
                    log::info!("loaded config from {}", path.display());
                    cfg
                }
                Err(e) => {
                    log::warn!("failed to parse {}: {e}, using defaults", path.display());
                    AppConfig::default()
                }
            },
            Err(_) => {
                log::info!("no config at {}, using defaults", path.display());
                AppConfig::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let cfg = AppConfig::load(Path::new("/nonexistent/color-dropper.json"));
        assert_eq!(cfg.camera_width, 1280);
        assert_eq!(cfg.history_capacity, 12);
        assert_eq!(cfg.history_key, "color_history");
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let cfg: AppConfig =
            serde_json::from_str(r#"{"history_capacity": 50, "mapper": {"offset_x": -75.0}}"#)
                .unwrap();
        assert_eq!(cfg.history_capacity, 50);
        assert_eq!(cfg.mapper.offset_x, -75.0);
        // Untouched fields keep their defaults.
        assert_eq!(cfg.mapper.scale_x, 1.0);
        assert_eq!(cfg.mapper.margin_y, 300.0);
        assert_eq!(cfg.camera_index, 0);
    }

    #[test]
    fn malformed_file_gives_defaults() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("color-dropper-cfg-test-{}.json", std::process::id()));
        fs::write(&path, "{ this is not json").unwrap();
        let cfg = AppConfig::load(&path);
        assert_eq!(cfg.history_capacity, AppConfig::default().history_capacity);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn round_trips_through_json() {
        let mut cfg = AppConfig::default();
        cfg.mapper.offset_y = -150.0;
        cfg.history_capacity = 10;
        let text = serde_json::to_string(&cfg).unwrap();
        let back: AppConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(back.mapper.offset_y, -150.0);
        assert_eq!(back.history_capacity, 10);
    }
}
