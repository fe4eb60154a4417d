//! Tunable constants for the gesture core, loadable from TOML.
//!
//! Every field has a default matching a 1280×720 webcam feed, so an empty
//! file (or no file at all) gives a working setup.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Width/height pair in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

/// The interior of the camera frame that maps onto the full screen.
///
/// Fingertips inside the margin outside this box would otherwise be hard to
/// reach, so the box is stretched to the screen edges.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActiveRegion {
    pub x_min: f32,
    pub x_max: f32,
    pub y_min: f32,
    pub y_max: f32,
}

/// Vertical span of the HUD volume bar, in frame pixels.
/// `bottom` is 0 %, `top` is 100 %.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BarSpan {
    pub top: f32,
    pub bottom: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Camera frame size; used to scale normalized landmarks.
    pub frame: Size,
    /// Screen the cursor is mapped onto.
    pub screen: Size,
    pub camera_active_region: ActiveRegion,
    /// Average finger-pair distance (pixels) mapped onto the volume range.
    pub volume_distance_range: [f32; 2],
    pub volume_bar: BarSpan,
    /// Fraction of the remaining distance the cursor covers per frame.
    pub smoothing_factor: f32,
    /// Minimum time between two table gestures.
    pub cooldown_seconds: f64,
    /// Minimum time between two volume updates.
    pub volume_interval_seconds: f64,
    /// Minimum time between two clicks.
    pub click_cooldown_seconds: f64,
    /// Clamp the cursor target to the screen instead of extrapolating.
    pub clamp_cursor: bool,
    /// Screenshots always overwrite this file.
    pub screenshot_path: PathBuf,
}

impl Default for GestureConfig {
    fn default() -> Self {
        GestureConfig {
            frame: Size { width: 1280, height: 720 },
            screen: Size { width: 1920, height: 1080 },
            camera_active_region: ActiveRegion {
                x_min: 75.0,
                x_max: 1205.0,
                y_min: 75.0,
                y_max: 645.0,
            },
            volume_distance_range: [50.0, 300.0],
            volume_bar: BarSpan { top: 150.0, bottom: 720.0 },
            smoothing_factor: 1.0 / 8.0,
            cooldown_seconds: 0.2,
            volume_interval_seconds: 0.1,
            click_cooldown_seconds: 0.2,
            clamp_cursor: true,
            screenshot_path: PathBuf::from("screenshot.png"),
        }
    }
}

impl GestureConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(src: &str) -> Result<Self> {
        let cfg: GestureConfig = toml::from_str(src)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Reject values that would make a remap divide by zero or a filter
    /// diverge.
    pub fn validate(&self) -> Result<()> {
        let r = &self.camera_active_region;
        if !(r.x_min < r.x_max) || !(r.y_min < r.y_max) {
            return Err(Error::InvalidConfig(format!(
                "camera_active_region must have min < max (got x {}..{}, y {}..{})",
                r.x_min, r.x_max, r.y_min, r.y_max
            )));
        }
        let [lo, hi] = self.volume_distance_range;
        if !(lo < hi) {
            return Err(Error::InvalidConfig(format!(
                "volume_distance_range must be increasing (got {}..{})",
                lo, hi
            )));
        }
        if !(self.smoothing_factor > 0.0 && self.smoothing_factor <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "smoothing_factor must be in (0, 1] (got {})",
                self.smoothing_factor
            )));
        }
        for (name, secs) in [
            ("cooldown_seconds", self.cooldown_seconds),
            ("volume_interval_seconds", self.volume_interval_seconds),
            ("click_cooldown_seconds", self.click_cooldown_seconds),
        ] {
            if !(secs >= 0.0) {
                return Err(Error::InvalidConfig(format!("{} must be >= 0 (got {})", name, secs)));
            }
        }
        let sizes = [self.frame, self.screen];
        if sizes.iter().any(|s| s.width == 0 || s.height == 0) {
            return Err(Error::InvalidConfig("frame and screen sizes must be non-zero".into()));
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let cfg = GestureConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, GestureConfig::default());
        assert_eq!(cfg.smoothing_factor, 0.125);
        assert_eq!(cfg.screenshot_path, PathBuf::from("screenshot.png"));
    }

    #[test]
    fn partial_override() {
        let cfg = GestureConfig::from_toml_str(
            r#"
            cooldown_seconds = 0.5
            screen = { width = 2560, height = 1440 }
            volume_distance_range = [40.0, 400.0]
            "#,
        )
        .unwrap();
        assert_eq!(cfg.cooldown_seconds, 0.5);
        assert_eq!(cfg.screen, Size { width: 2560, height: 1440 });
        assert_eq!(cfg.volume_distance_range, [40.0, 400.0]);
        // Untouched fields keep their defaults.
        assert_eq!(cfg.click_cooldown_seconds, 0.2);
    }

    #[test]
    fn rejects_inverted_region() {
        let err = GestureConfig::from_toml_str(
            "camera_active_region = { x_min = 500.0, x_max = 100.0, y_min = 0.0, y_max = 10.0 }",
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn rejects_zero_smoothing() {
        let err = GestureConfig::from_toml_str("smoothing_factor = 0.0").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn rejects_negative_cooldown() {
        let err = GestureConfig::from_toml_str("click_cooldown_seconds = -1.0").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn bad_toml_is_parse_error() {
        let err = GestureConfig::from_toml_str("cooldown_seconds = \"soon\"").unwrap_err();
        assert!(matches!(err, Error::ConfigParse(_)));
    }
}
