//! Synthetic hands with a chosen finger pose.
//!
//! Lets the keyboard/mouse simulator and the tests produce landmarks
//! without a camera.  Geometry is loosely proportioned on a palm about
//! 80 px wide at `scale = 1.0`; only the relationships the classifier looks
//! at are guaranteed.

use crate::finger::FingerState;
use crate::landmarks::{
    Hand, Point2D, LANDMARK_COUNT, THUMB_CMC, THUMB_IP, THUMB_MCP, THUMB_TIP, WRIST,
};

/// Horizontal offsets of the index, middle, ring and pinky columns.
const FINGER_COLUMNS: [f32; 4] = [-30.0, -10.0, 10.0, 30.0];

/// Build a hand around `palm` whose classification is exactly `state`.
///
/// An extended finger points up from its knuckle; a folded one curls back
/// down so its tip ends below the PIP joint.  The thumb sticks out to the
/// right of its IP joint when up and tucks left of it when down.
pub fn posed_hand(palm: Point2D, state: FingerState, scale: f32) -> Hand {
    let at = |dx: f32, dy: f32| Point2D::new(palm.x + dx * scale, palm.y + dy * scale);
    let mut pts = [palm; LANDMARK_COUNT];

    pts[WRIST] = at(0.0, 70.0);
    pts[THUMB_CMC] = at(-30.0, 50.0);
    pts[THUMB_MCP] = at(-45.0, 30.0);
    pts[THUMB_IP] = at(-55.0, 15.0);
    pts[THUMB_TIP] = if state.thumb() { at(-40.0, 0.0) } else { at(-70.0, 5.0) };

    for (finger, &dx) in FINGER_COLUMNS.iter().enumerate() {
        // Landmarks 5..=8 for the index, 9..=12 for the middle, …
        let mcp = 5 + finger * 4;
        let up = state.is_up(finger + 1);
        pts[mcp] = at(dx, 0.0);
        if up {
            pts[mcp + 1] = at(dx, -30.0);
            pts[mcp + 2] = at(dx, -50.0);
            pts[mcp + 3] = at(dx, -70.0);
        } else {
            pts[mcp + 1] = at(dx, -25.0);
            pts[mcp + 2] = at(dx, -10.0);
            pts[mcp + 3] = at(dx, 5.0);
        }
    }

    Hand::new(pts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finger::classify;

    #[test]
    fn every_pose_classifies_back() {
        for bits in 0u8..32 {
            let state = FingerState::from_bits([
                bits & 1,
                (bits >> 1) & 1,
                (bits >> 2) & 1,
                (bits >> 3) & 1,
                (bits >> 4) & 1,
            ]);
            for scale in [0.5, 1.0, 2.5] {
                let hand = posed_hand(Point2D::new(400.0, 300.0), state, scale);
                assert_eq!(classify(&hand), state, "pose {} at scale {}", state, scale);
            }
        }
    }
}
