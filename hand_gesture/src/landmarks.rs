//! Hand landmarks: the per-frame snapshot every other module consumes.
//!
//! A [`Hand`] is always exactly 21 points in the usual hand-landmark
//! ordering (0 = wrist, 4 = thumb tip, 8 = index tip, …, 20 = pinky tip).
//! [`FrameHands`] is whatever the detector reported for one frame, in the
//! order it reported them.  Hand identity is not tracked across frames.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Error, Result};

// ════════════════════════════════════════════════════════════════════════════
// Landmark indices
// ════════════════════════════════════════════════════════════════════════════

pub const LANDMARK_COUNT: usize = 21;

pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

/// Finger tips in `[thumb, index, middle, ring, pinky]` order.
pub const TIP_IDS: [usize; 5] = [THUMB_TIP, INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];

/// Skeleton edges for drawing a hand.
pub const HAND_CONNECTIONS: [(usize, usize); 21] = [
    (WRIST, THUMB_CMC),
    (THUMB_CMC, THUMB_MCP),
    (THUMB_MCP, THUMB_IP),
    (THUMB_IP, THUMB_TIP),
    (WRIST, INDEX_MCP),
    (INDEX_MCP, INDEX_PIP),
    (INDEX_PIP, INDEX_DIP),
    (INDEX_DIP, INDEX_TIP),
    (INDEX_MCP, MIDDLE_MCP),
    (MIDDLE_MCP, MIDDLE_PIP),
    (MIDDLE_PIP, MIDDLE_DIP),
    (MIDDLE_DIP, MIDDLE_TIP),
    (MIDDLE_MCP, RING_MCP),
    (RING_MCP, RING_PIP),
    (RING_PIP, RING_DIP),
    (RING_DIP, RING_TIP),
    (RING_MCP, PINKY_MCP),
    (PINKY_MCP, PINKY_PIP),
    (PINKY_PIP, PINKY_DIP),
    (PINKY_DIP, PINKY_TIP),
    (WRIST, PINKY_MCP),
];

/// The detector never reports more than two hands.
pub const MAX_HANDS: usize = 2;

// ════════════════════════════════════════════════════════════════════════════
// Point2D / Hand / FrameHands
// ════════════════════════════════════════════════════════════════════════════

/// A landmark position in camera-frame pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f32,
    pub y: f32,
}

impl Point2D {
    pub const fn new(x: f32, y: f32) -> Self {
        Point2D { x, y }
    }

    pub fn distance(&self, other: &Point2D) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// One hand: exactly [`LANDMARK_COUNT`] points.
#[derive(Clone, Debug, PartialEq)]
pub struct Hand {
    points: [Point2D; LANDMARK_COUNT],
}

impl Hand {
    pub fn new(points: [Point2D; LANDMARK_COUNT]) -> Self {
        Hand { points }
    }

    /// Build a hand from a slice, failing unless it holds exactly 21 points.
    pub fn from_slice(points: &[Point2D]) -> Result<Self> {
        let points: [Point2D; LANDMARK_COUNT] =
            points.try_into().map_err(|_| Error::LandmarkCount {
                expected: LANDMARK_COUNT,
                found: points.len(),
            })?;
        Ok(Hand { points })
    }

    pub fn point(&self, index: usize) -> Point2D {
        self.points[index]
    }

    pub fn points(&self) -> &[Point2D; LANDMARK_COUNT] {
        &self.points
    }

    pub fn index_tip(&self) -> Point2D {
        self.points[INDEX_TIP]
    }
}

/// All hands reported for a single frame, at most [`MAX_HANDS`].
///
/// Index 0 is "first hand reported this frame", not a persistent identity.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameHands {
    hands: Vec<Hand>,
}

impl FrameHands {
    pub fn empty() -> Self {
        FrameHands::default()
    }

    /// Keeps the first two hands; any further ones are dropped.
    pub fn new(mut hands: Vec<Hand>) -> Self {
        hands.truncate(MAX_HANDS);
        FrameHands { hands }
    }

    pub fn is_empty(&self) -> bool {
        self.hands.is_empty()
    }

    pub fn len(&self) -> usize {
        self.hands.len()
    }

    pub fn hands(&self) -> &[Hand] {
        &self.hands
    }

    /// The hand that drives gestures, cursor and click.
    pub fn primary(&self) -> Option<&Hand> {
        self.hands.first()
    }

    /// Both hands, when two are present.
    pub fn pair(&self) -> Option<(&Hand, &Hand)> {
        match self.hands.as_slice() {
            [a, b, ..] => Some((a, b)),
            _ => None,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Detector wire format
// ════════════════════════════════════════════════════════════════════════════

/// Coordinate space of incoming keypoints.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordSpace {
    /// 0.0–1.0 relative to the camera frame.
    #[default]
    Normalized,
    /// Already in frame pixels.
    Pixel,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawPoint {
    pub x: f32,
    pub y: f32,
    /// Depth is reported by most detectors but unused here.
    #[serde(default)]
    pub z: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawHand {
    pub landmarks: Vec<RawPoint>,
}

/// One frame of detector output, as received over the wire.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawFrame {
    #[serde(default)]
    pub coords: CoordSpace,
    #[serde(default)]
    pub hands: Vec<RawHand>,
}

// ════════════════════════════════════════════════════════════════════════════
// Normalizer
// ════════════════════════════════════════════════════════════════════════════

/// Converts raw detector output into pixel-space [`FrameHands`].
#[derive(Clone, Copy, Debug)]
pub struct Normalizer {
    pub frame_width: u32,
    pub frame_height: u32,
}

impl Normalizer {
    pub fn new(frame_width: u32, frame_height: u32) -> Self {
        Normalizer { frame_width, frame_height }
    }

    /// Normalized coordinates are scaled to the frame and truncated to whole
    /// pixels.  Hands without exactly 21 landmarks are skipped.
    pub fn normalize(&self, frame: &RawFrame) -> FrameHands {
        let hands = frame
            .hands
            .iter()
            .filter_map(|raw| match self.normalize_hand(raw, frame.coords) {
                Ok(hand) => Some(hand),
                Err(e) => {
                    warn!("skipping hand: {}", e);
                    None
                }
            })
            .collect();
        FrameHands::new(hands)
    }

    pub fn normalize_hand(&self, raw: &RawHand, coords: CoordSpace) -> Result<Hand> {
        let (sx, sy) = (self.frame_width as f32, self.frame_height as f32);
        let points: Vec<Point2D> = raw
            .landmarks
            .iter()
            .map(|p| match coords {
                CoordSpace::Normalized => Point2D::new((p.x * sx).trunc(), (p.y * sy).trunc()),
                CoordSpace::Pixel => Point2D::new(p.x, p.y),
            })
            .collect();
        Hand::from_slice(&points)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_hand(n: usize, x: f32, y: f32) -> RawHand {
        RawHand {
            landmarks: (0..n).map(|_| RawPoint { x, y, z: 0.0 }).collect(),
        }
    }

    #[test]
    fn hand_requires_21_points() {
        let short = vec![Point2D::default(); 20];
        match Hand::from_slice(&short) {
            Err(Error::LandmarkCount { expected: 21, found: 20 }) => {}
            other => panic!("unexpected: {:?}", other),
        }
        assert!(Hand::from_slice(&[Point2D::default(); 21]).is_ok());
    }

    #[test]
    fn normalized_coords_scale_and_truncate() {
        let n = Normalizer::new(1280, 720);
        let frame = RawFrame {
            coords: CoordSpace::Normalized,
            hands: vec![raw_hand(21, 0.5004, 0.2507)],
        };
        let hands = n.normalize(&frame);
        assert_eq!(hands.len(), 1);
        // 0.5004 * 1280 = 640.51…, 0.2507 * 720 = 180.50…
        assert_eq!(hands.hands()[0].point(WRIST), Point2D::new(640.0, 180.0));
    }

    #[test]
    fn pixel_coords_pass_through() {
        let n = Normalizer::new(1280, 720);
        let frame = RawFrame {
            coords: CoordSpace::Pixel,
            hands: vec![raw_hand(21, 312.5, 48.25)],
        };
        let hands = n.normalize(&frame);
        assert_eq!(hands.hands()[0].index_tip(), Point2D::new(312.5, 48.25));
    }

    #[test]
    fn malformed_hand_is_skipped() {
        let n = Normalizer::new(1280, 720);
        let frame = RawFrame {
            coords: CoordSpace::Normalized,
            hands: vec![raw_hand(5, 0.1, 0.1), raw_hand(21, 0.2, 0.2)],
        };
        let hands = n.normalize(&frame);
        assert_eq!(hands.len(), 1);
        assert_eq!(hands.hands()[0].point(0), Point2D::new(256.0, 144.0));
    }

    #[test]
    fn frame_keeps_at_most_two_hands() {
        let h = Hand::new([Point2D::default(); 21]);
        let frame = FrameHands::new(vec![h.clone(), h.clone(), h]);
        assert_eq!(frame.len(), 2);
        assert!(frame.pair().is_some());
    }

    #[test]
    fn empty_frame_has_no_primary() {
        let frame = FrameHands::empty();
        assert!(frame.primary().is_none());
        assert!(frame.pair().is_none());
    }

    #[test]
    fn raw_frame_defaults_to_normalized() {
        let frame: RawFrame = toml::from_str("hands = []").unwrap();
        assert_eq!(frame.coords, CoordSpace::Normalized);
    }

    #[test]
    fn point_distance_is_euclidean() {
        let a = Point2D::new(0.0, 0.0);
        let b = Point2D::new(3.0, 4.0);
        assert_eq!(a.distance(&b), 5.0);
    }
}
