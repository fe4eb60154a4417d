//! Click gesture: thumb out with the index folded.
//!
//! Repeat clicks from one folding motion are suppressed with a cooldown of
//! its own, separate from the gesture dispatcher's.

use tracing::debug;

use crate::dispatch::Cooldown;
use crate::finger::FingerState;

/// Index down, thumb up.  Middle, ring and pinky are ignored.
pub fn is_click_pose(state: FingerState) -> bool {
    !state.index() && state.thumb()
}

#[derive(Clone, Debug)]
pub struct ClickGesture {
    cooldown: Cooldown,
}

impl ClickGesture {
    pub fn new(cooldown_seconds: f64) -> Self {
        ClickGesture { cooldown: Cooldown::new(cooldown_seconds) }
    }

    /// True when a click should be emitted for this frame.
    pub fn update(&mut self, state: FingerState, now: f64) -> bool {
        if !is_click_pose(state) {
            return false;
        }
        let fired = self.cooldown.try_fire(now);
        if fired {
            debug!(fingers = %state, "click");
        }
        fired
    }
}
