//! Two-hand volume control.
//!
//! With two hands in view, the spread between them sets the volume: the
//! mean of the pinky-tip and ring-tip distances is mapped from the
//! configured distance range onto the audio device's native range.
//! Updates are throttled independently of the gesture cooldown.

use tracing::debug;

use crate::config::{BarSpan, GestureConfig};
use crate::dispatch::Cooldown;
use crate::landmarks::{FrameHands, Hand, PINKY_TIP, RING_TIP};
use crate::remap::{remap, remap_clamped};

/// The audio device's native volume range, queried once at startup.
/// The units are whatever the device uses (dB, raw steps, …).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VolumeRange {
    pub min: f32,
    pub max: f32,
}

impl VolumeRange {
    pub fn new(min: f32, max: f32) -> Self {
        VolumeRange { min, max }
    }
}

/// Mean of the pinky-to-pinky and ring-to-ring distances, in pixels.
/// Symmetric in its arguments.
pub fn average_finger_distance(a: &Hand, b: &Hand) -> f32 {
    let pinky = a.point(PINKY_TIP).distance(&b.point(PINKY_TIP));
    let ring = a.point(RING_TIP).distance(&b.point(RING_TIP));
    (pinky + ring) / 2.0
}

/// One volume change plus what the HUD needs to show it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VolumeUpdate {
    /// Value for the audio device, within its native range.
    pub native: f32,
    /// Display percentage, 0–100.
    pub percent: f32,
    /// Top edge of the filled bar in frame pixels.
    pub bar_top: f32,
}

impl VolumeUpdate {
    pub fn percent_label(&self) -> String {
        format!("{}%", self.percent as i32)
    }
}

#[derive(Clone, Debug)]
pub struct VolumeController {
    range: VolumeRange,
    distance_range: (f32, f32),
    bar: BarSpan,
    throttle: Cooldown,
}

impl VolumeController {
    pub fn new(
        range: VolumeRange,
        distance_range: (f32, f32),
        bar: BarSpan,
        interval_seconds: f64,
    ) -> Self {
        VolumeController {
            range,
            distance_range,
            bar,
            throttle: Cooldown::new(interval_seconds),
        }
    }

    pub fn from_config(cfg: &GestureConfig, range: VolumeRange) -> Self {
        let [lo, hi] = cfg.volume_distance_range;
        Self::new(range, (lo, hi), cfg.volume_bar, cfg.volume_interval_seconds)
    }

    /// Map a hand spread to a volume.  Distances outside the configured
    /// range saturate at the ends of the native range.
    pub fn map_distance(&self, distance: f32) -> VolumeUpdate {
        let native = remap_clamped(distance, self.distance_range, (self.range.min, self.range.max));
        let percent = remap_clamped(native, (self.range.min, self.range.max), (0.0, 100.0));
        let bar_top = remap(percent, (0.0, 100.0), (self.bar.bottom, self.bar.top));
        VolumeUpdate { native, percent, bar_top }
    }

    /// Fewer than two hands, or called again inside the throttle window,
    /// yields `None`.
    pub fn update(&mut self, hands: &FrameHands, now: f64) -> Option<VolumeUpdate> {
        let (a, b) = hands.pair()?;
        if !self.throttle.ready(now) {
            return None;
        }
        let distance = average_finger_distance(a, b);
        let update = self.map_distance(distance);
        self.throttle.mark(now);
        debug!(distance, native = update.native, percent = update.percent, "volume");
        Some(update)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
