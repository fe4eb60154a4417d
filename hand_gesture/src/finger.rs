//! Finger state classifier.
//!
//! Purely per-frame: no smoothing or hysteresis, so a finger held near the
//! threshold can flicker between frames.

use std::fmt;

use crate::landmarks::{Hand, TIP_IDS};

/// Up/down state of `[thumb, index, middle, ring, pinky]`; `true` = extended.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FingerState([bool; 5]);

impl FingerState {
    pub const THUMB: usize = 0;
    pub const INDEX: usize = 1;
    pub const MIDDLE: usize = 2;

    /// Build from a 0/1 bit array, e.g. `FingerState::from_bits([0, 1, 0, 0, 1])`.
    pub const fn from_bits(bits: [u8; 5]) -> Self {
        FingerState([bits[0] != 0, bits[1] != 0, bits[2] != 0, bits[3] != 0, bits[4] != 0])
    }

    pub fn is_up(&self, finger: usize) -> bool {
        self.0[finger]
    }

    pub fn thumb(&self) -> bool {
        self.0[Self::THUMB]
    }

    pub fn index(&self) -> bool {
        self.0[Self::INDEX]
    }

    pub fn middle(&self) -> bool {
        self.0[Self::MIDDLE]
    }
}

impl fmt::Display for FingerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for up in self.0 {
            f.write_str(if up { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Classify which fingers of `hand` are extended.
///
/// The thumb moves sideways, so it is judged on x: up when its tip lies to
/// the right of the joint below it (landmark 3).  This is orientation
/// sensitive and reads mirrored for a hand shown to a front camera.  The
/// other four fingers are up when the tip sits strictly higher in the image
/// (smaller y) than the PIP joint two landmarks below it.
pub fn classify(hand: &Hand) -> FingerState {
    let mut state = [false; 5];

    let thumb_tip = hand.point(TIP_IDS[0]);
    let thumb_ip = hand.point(TIP_IDS[0] - 1);
    state[0] = thumb_tip.x > thumb_ip.x;

    for (finger, &tip) in TIP_IDS.iter().enumerate().skip(1) {
        state[finger] = hand.point(tip).y < hand.point(tip - 2).y;
    }

    FingerState(state)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::{Point2D, INDEX_PIP, INDEX_TIP, THUMB_IP, THUMB_TIP};

    fn flat_hand() -> [Point2D; 21] {
        [Point2D::new(100.0, 100.0); 21]
    }

    #[test]
    fn flat_hand_is_all_down() {
        // Equal coordinates never count as extended: both tests are strict.
        let state = classify(&Hand::new(flat_hand()));
        assert_eq!(state, FingerState::from_bits([0, 0, 0, 0, 0]));
    }

    #[test]
    fn index_up_when_tip_above_pip() {
        let mut pts = flat_hand();
        pts[INDEX_TIP] = Point2D::new(100.0, 40.0);
        pts[INDEX_PIP] = Point2D::new(100.0, 80.0);
        let state = classify(&Hand::new(pts));
        assert!(state.index());
        assert!(!state.middle());
    }

    #[test]
    fn thumb_uses_x_not_y() {
        let mut pts = flat_hand();
        // Tip lower in the image but to the right: still "up".
        pts[THUMB_TIP] = Point2D::new(130.0, 160.0);
        pts[THUMB_IP] = Point2D::new(110.0, 100.0);
        assert!(classify(&Hand::new(pts)).thumb());

        // Tip higher but to the left: "down".
        pts[THUMB_TIP] = Point2D::new(90.0, 20.0);
        assert!(!classify(&Hand::new(pts)).thumb());
    }

    #[test]
    fn displays_as_bit_string() {
        let s = FingerState::from_bits([0, 1, 0, 0, 1]);
        assert_eq!(s.to_string(), "01001");
        assert!(s.is_up(4) && !s.is_up(3));
    }
}
