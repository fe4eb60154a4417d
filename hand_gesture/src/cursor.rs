//! Cursor controller: index fingertip → smoothed, mirrored screen position.

use crate::config::{ActiveRegion, GestureConfig, Size};
use crate::finger::FingerState;
use crate::landmarks::Hand;
use crate::remap::{remap, remap_clamped};

/// First-order exponential smoothing of a 2D position.
///
/// Starts at `(0, 0)` and moves `factor` of the remaining distance toward
/// the target on every step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Smoother {
    factor: f32,
    prev: (f32, f32),
}

impl Smoother {
    pub fn new(factor: f32) -> Self {
        Smoother { factor, prev: (0.0, 0.0) }
    }

    pub fn step(&mut self, target: (f32, f32)) -> (f32, f32) {
        let x = self.prev.0 + (target.0 - self.prev.0) * self.factor;
        let y = self.prev.1 + (target.1 - self.prev.1) * self.factor;
        self.prev = (x, y);
        self.prev
    }

    /// The last smoothed (un-mirrored) position.
    pub fn position(&self) -> (f32, f32) {
        self.prev
    }
}

/// A cursor move in screen pixels, already mirrored horizontally.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CursorMove {
    pub x: f32,
    pub y: f32,
}

/// The pointing pose: index up, middle down.  Thumb, ring and pinky are
/// ignored.
pub fn is_pointing(state: FingerState) -> bool {
    state.index() && !state.middle()
}

#[derive(Clone, Debug)]
pub struct CursorController {
    region: ActiveRegion,
    screen: Size,
    clamp: bool,
    smoother: Smoother,
}

impl CursorController {
    pub fn new(region: ActiveRegion, screen: Size, smoothing_factor: f32, clamp: bool) -> Self {
        CursorController {
            region,
            screen,
            clamp,
            smoother: Smoother::new(smoothing_factor),
        }
    }

    pub fn from_config(cfg: &GestureConfig) -> Self {
        Self::new(cfg.camera_active_region, cfg.screen, cfg.smoothing_factor, cfg.clamp_cursor)
    }

    /// Where the fingertip points on screen before smoothing or mirroring.
    pub fn target(&self, hand: &Hand) -> (f32, f32) {
        let tip = hand.index_tip();
        let map: fn(f32, (f32, f32), (f32, f32)) -> f32 =
            if self.clamp { remap_clamped } else { remap };
        let r = &self.region;
        let x = map(tip.x, (r.x_min, r.x_max), (0.0, self.screen.width as f32));
        let y = map(tip.y, (r.y_min, r.y_max), (0.0, self.screen.height as f32));
        (x, y)
    }

    /// Advance the smoothing state and return the move to emit, when the
    /// hand is pointing.  Any other pose leaves the state untouched.
    pub fn update(&mut self, state: FingerState, hand: &Hand) -> Option<CursorMove> {
        if !is_pointing(state) {
            return None;
        }
        let target = self.target(hand);
        let (x, y) = self.smoother.step(target);
        // Front cameras show a mirror image; flip x so moving right moves right.
        Some(CursorMove { x: self.screen.width as f32 - x, y })
    }

    pub fn smoother(&self) -> &Smoother {
        &self.smoother
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
