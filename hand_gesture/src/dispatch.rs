//! Gesture dispatcher: exact-match finger patterns to discrete actions.
//!
//! One cooldown covers the whole table, so after any gesture fires nothing
//! else can fire until the cooldown has elapsed.

use tracing::debug;

use crate::finger::FingerState;

// ════════════════════════════════════════════════════════════════════════════
// Cooldown
// ════════════════════════════════════════════════════════════════════════════

/// Last-fired timestamp plus a minimum interval, in seconds.
///
/// A clock that has never fired is ready.  A negative elapsed time (clock
/// stepped backwards) also counts as ready so a bad clock can't lock the
/// action out forever.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cooldown {
    interval: f64,
    last: Option<f64>,
}

impl Cooldown {
    pub fn new(interval: f64) -> Self {
        Cooldown { interval, last: None }
    }

    pub fn last(&self) -> Option<f64> {
        self.last
    }

    pub fn ready(&self, now: f64) -> bool {
        match self.last {
            None => true,
            Some(last) => {
                let elapsed = now - last;
                elapsed < 0.0 || elapsed >= self.interval
            }
        }
    }

    pub fn mark(&mut self, now: f64) {
        self.last = Some(now);
    }

    /// `ready` + `mark` in one step; returns whether it fired.
    pub fn try_fire(&mut self, now: f64) -> bool {
        if self.ready(now) {
            self.mark(now);
            true
        } else {
            false
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Keys and actions
// ════════════════════════════════════════════════════════════════════════════

/// Keys the dispatcher can press.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Space,
    Right,
    Left,
    Up,
    Down,
}

impl Key {
    /// Key name as understood by common input-automation tools.
    pub fn name(self) -> &'static str {
        match self {
            Key::Space => "space",
            Key::Right => "right",
            Key::Left => "left",
            Key::Up => "up",
            Key::Down => "down",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GestureAction {
    Confirm,
    Next,
    Previous,
    VolumeUp,
    VolumeDown,
    Screenshot,
}

impl GestureAction {
    /// The key this action presses; `None` for the screenshot.
    pub fn key(self) -> Option<Key> {
        match self {
            GestureAction::Confirm => Some(Key::Space),
            GestureAction::Next => Some(Key::Right),
            GestureAction::Previous => Some(Key::Left),
            GestureAction::VolumeUp => Some(Key::Up),
            GestureAction::VolumeDown => Some(Key::Down),
            GestureAction::Screenshot => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            GestureAction::Confirm => "confirm",
            GestureAction::Next => "next",
            GestureAction::Previous => "previous",
            GestureAction::VolumeUp => "volume-up",
            GestureAction::VolumeDown => "volume-down",
            GestureAction::Screenshot => "screenshot",
        }
    }
}

/// Finger patterns, matched in order by exact equality.
pub const GESTURE_TABLE: [(FingerState, GestureAction); 6] = [
    (FingerState::from_bits([1, 1, 1, 1, 1]), GestureAction::Confirm),
    (FingerState::from_bits([0, 1, 0, 0, 1]), GestureAction::Next),
    (FingerState::from_bits([0, 1, 1, 0, 1]), GestureAction::Previous),
    (FingerState::from_bits([0, 1, 1, 1, 1]), GestureAction::VolumeUp),
    (FingerState::from_bits([0, 1, 1, 1, 0]), GestureAction::VolumeDown),
    (FingerState::from_bits([0, 1, 1, 0, 0]), GestureAction::Screenshot),
];

/// Table lookup without any timing.
pub fn match_gesture(state: FingerState) -> Option<GestureAction> {
    GESTURE_TABLE
        .iter()
        .find(|(pattern, _)| *pattern == state)
        .map(|&(_, action)| action)
}

// ════════════════════════════════════════════════════════════════════════════
// GestureDispatcher
// ════════════════════════════════════════════════════════════════════════════

/// Table lookup behind a global cooldown.  Safe to call every frame.
#[derive(Clone, Debug)]
pub struct GestureDispatcher {
    cooldown: Cooldown,
}

impl GestureDispatcher {
    pub fn new(cooldown_seconds: f64) -> Self {
        GestureDispatcher { cooldown: Cooldown::new(cooldown_seconds) }
    }

    /// Returns the action to perform, if any.  The cooldown is only advanced
    /// when a pattern matches, so an unrecognised pose never delays the next
    /// real gesture.
    pub fn dispatch(&mut self, state: FingerState, now: f64) -> Option<GestureAction> {
        if !self.cooldown.ready(now) {
            return None;
        }
        let action = match_gesture(state)?;
        self.cooldown.mark(now);
        debug!(fingers = %state, action = action.name(), "gesture fired");
        Some(action)
    }

    pub fn cooldown(&self) -> &Cooldown {
        &self.cooldown
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_table_entry_fires_once_within_cooldown() {
        for (pattern, action) in GESTURE_TABLE {
            let mut d = GestureDispatcher::new(0.2);
            assert_eq!(d.dispatch(pattern, 10.0), Some(action));
            assert_eq!(d.dispatch(pattern, 10.1), None);
        }
    }

    #[test]
    fn unknown_pattern_never_fires() {
        let mut d = GestureDispatcher::new(0.2);
        assert_eq!(d.dispatch(FingerState::from_bits([1, 0, 1, 0, 1]), 0.0), None);
        assert_eq!(d.cooldown().last(), None);
    }

    #[test]
    fn cooldown_boundary() {
        let open = FingerState::from_bits([1, 1, 1, 1, 1]);

        let mut d = GestureDispatcher::new(0.2);
        assert!(d.dispatch(open, 0.0).is_some());
        assert!(d.dispatch(open, 0.19).is_none());

        let mut d = GestureDispatcher::new(0.2);
        assert!(d.dispatch(open, 0.0).is_some());
        assert!(d.dispatch(open, 0.21).is_some());
    }

    #[test]
    fn cooldown_is_global_across_gestures() {
        let mut d = GestureDispatcher::new(0.2);
        let next = FingerState::from_bits([0, 1, 0, 0, 1]);
        let previous = FingerState::from_bits([0, 1, 1, 0, 1]);
        assert_eq!(d.dispatch(next, 1.0), Some(GestureAction::Next));
        // A different gesture inside the window is still blocked.
        assert_eq!(d.dispatch(previous, 1.1), None);
        assert_eq!(d.dispatch(previous, 1.25), Some(GestureAction::Previous));
    }

    #[test]
    fn non_matching_call_does_not_advance_clock() {
        let mut d = GestureDispatcher::new(0.2);
        assert!(d.dispatch(FingerState::from_bits([1, 1, 1, 1, 1]), 0.0).is_some());
        assert!(d.dispatch(FingerState::from_bits([0, 0, 0, 0, 0]), 0.3).is_none());
        assert_eq!(d.cooldown().last(), Some(0.0));
    }

    #[test]
    fn matching_is_exact_not_subset() {
        // Superset of "next" (0,1,0,0,1) with the thumb also up.
        assert_eq!(match_gesture(FingerState::from_bits([1, 1, 0, 0, 1])), None);
        // Subset of "volume up".
        assert_eq!(
            match_gesture(FingerState::from_bits([0, 1, 1, 1, 0])),
            Some(GestureAction::VolumeDown)
        );
        assert_eq!(match_gesture(FingerState::from_bits([0, 0, 1, 1, 0])), None);
    }

    #[test]
    fn table_patterns_are_distinct() {
        for (i, (a, _)) in GESTURE_TABLE.iter().enumerate() {
            for (b, _) in &GESTURE_TABLE[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn backwards_clock_counts_as_ready() {
        let mut c = Cooldown::new(0.2);
        assert!(c.try_fire(100.0));
        assert!(!c.ready(100.1));
        assert!(c.ready(99.0));
    }

    #[test]
    fn key_names() {
        assert_eq!(GestureAction::Confirm.key().map(Key::name), Some("space"));
        assert_eq!(GestureAction::VolumeDown.key().map(Key::name), Some("down"));
        assert_eq!(GestureAction::Screenshot.key(), None);
    }
}
