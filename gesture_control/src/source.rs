//! Landmark sources: an external detector or the keyboard/mouse simulator.
//!
//! The public interface is [`SourceEvent`] delivered over a `mpsc` channel.
//! The frame loop doesn't need to know whether hands came from a real pose
//! model or from the simulator.

use std::io::BufRead;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use hand_gesture::config::Size;
use hand_gesture::synth::posed_hand;
use hand_gesture::{FingerState, FrameHands, Normalizer, Point2D, RawFrame};
use tracing::{debug, info};

// ════════════════════════════════════════════════════════════════════════════
// SourceEvent
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq)]
pub enum SourceEvent {
    /// A fresh landmark snapshot.
    Frame(FrameHands),
    /// Acquisition failed; the loop must stop.
    Failed(String),
    /// The source has ended normally.
    Quit,
}

// ════════════════════════════════════════════════════════════════════════════
// LandmarkSource trait — unified interface for detector and simulator
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver [`SourceEvent`]s over a channel.
pub trait LandmarkSource: Send + 'static {
    fn run(self: Box<Self>, tx: Sender<SourceEvent>);
}

/// Spawn a landmark source on its own thread and return the receiving end.
pub fn spawn_landmark_source<S: LandmarkSource>(source: S) -> Receiver<SourceEvent> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || Box::new(source).run(tx));
    rx
}

// ════════════════════════════════════════════════════════════════════════════
// JsonLinesSource — external detector over a pipe
// ════════════════════════════════════════════════════════════════════════════

/// Reads one [`RawFrame`] JSON document per line, e.g. from a pose-model
/// process piped into stdin:
///
/// ```text
/// {"coords":"normalized","hands":[{"landmarks":[{"x":0.51,"y":0.62}, …]}]}
/// ```
///
/// Blank lines are ignored.  A line that fails to parse is a fatal
/// acquisition error; end of input ends the source cleanly.
pub struct JsonLinesSource<R> {
    reader: R,
    normalizer: Normalizer,
}

impl<R: BufRead + Send + 'static> JsonLinesSource<R> {
    pub fn new(reader: R, normalizer: Normalizer) -> Self {
        JsonLinesSource { reader, normalizer }
    }
}

impl<R: BufRead + Send + 'static> LandmarkSource for JsonLinesSource<R> {
    fn run(self: Box<Self>, tx: Sender<SourceEvent>) {
        let JsonLinesSource { reader, normalizer } = *self;
        for (n, line) in reader.lines().enumerate() {
            let line = match line {
                Ok(l) => l,
                Err(e) => {
                    let _ = tx.send(SourceEvent::Failed(format!("read error: {}", e)));
                    return;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            let event = match serde_json::from_str::<RawFrame>(&line) {
                Ok(raw) => SourceEvent::Frame(normalizer.normalize(&raw)),
                Err(e) => SourceEvent::Failed(format!("line {}: {}", n + 1, e)),
            };
            let failed = matches!(event, SourceEvent::Failed(_));
            if tx.send(event).is_err() || failed {
                return;
            }
        }
        info!("landmark stream ended");
        let _ = tx.send(SourceEvent::Quit);
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SimLandmarkSource — keyboard/mouse simulation (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Raw input from the preview window, in camera-frame pixels.
#[derive(Clone, Debug, PartialEq)]
pub enum SimInput {
    /// Mouse position; the primary palm follows it.  One frame per pointer
    /// event.
    Pointer { x: f32, y: f32 },
    Pose(SimPose),
    /// Show/hide a second hand mirrored across the frame's vertical centre.
    ToggleSecondHand,
    /// Show/hide all hands ("nothing detected").
    ToggleHidden,
    Quit,
}

/// Poses reachable from the keyboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimPose {
    OpenPalm,   // 1
    Next,       // 2
    Previous,   // 3
    VolumeUp,   // 4
    VolumeDown, // 5
    Screenshot, // 6
    Point,      // P
    Click,      // C
    Fist,       // F
}

impl SimPose {
    pub fn fingers(self) -> FingerState {
        let bits = match self {
            SimPose::OpenPalm => [1, 1, 1, 1, 1],
            SimPose::Next => [0, 1, 0, 0, 1],
            SimPose::Previous => [0, 1, 1, 0, 1],
            SimPose::VolumeUp => [0, 1, 1, 1, 1],
            SimPose::VolumeDown => [0, 1, 1, 1, 0],
            SimPose::Screenshot => [0, 1, 1, 0, 0],
            SimPose::Point => [0, 1, 0, 0, 0],
            SimPose::Click => [1, 0, 0, 0, 0],
            SimPose::Fist => [0, 0, 0, 0, 0],
        };
        FingerState::from_bits(bits)
    }
}

/// Landmark source driven by [`SimInput`] events from the preview window.
///
/// The window sends `SimInput` here; this translator turns them into
/// synthetic hands.  This keeps the window event loop free of landmark
/// geometry.
pub struct SimLandmarkSource {
    pub rx: Receiver<SimInput>,
    pub frame: Size,
    /// Palm size multiplier for the synthetic hands.
    pub hand_scale: f32,
}

impl SimLandmarkSource {
    pub fn new(rx: Receiver<SimInput>, frame: Size) -> Self {
        SimLandmarkSource { rx, frame, hand_scale: 1.5 }
    }
}

/// Mutable simulator state, kept apart so it can be tested without threads.
#[derive(Clone, Debug)]
struct SimHands {
    pose: FingerState,
    second_hand: bool,
    hidden: bool,
    frame_width: f32,
    scale: f32,
}

impl SimHands {
    fn frame_at(&self, x: f32, y: f32) -> FrameHands {
        if self.hidden {
            return FrameHands::empty();
        }
        let mut hands = vec![posed_hand(Point2D::new(x, y), self.pose, self.scale)];
        if self.second_hand {
            let fist = SimPose::Fist.fingers();
            hands.push(posed_hand(Point2D::new(self.frame_width - x, y), fist, self.scale));
        }
        FrameHands::new(hands)
    }
}

impl LandmarkSource for SimLandmarkSource {
    fn run(self: Box<Self>, tx: Sender<SourceEvent>) {
        let mut sim = SimHands {
            pose: SimPose::Fist.fingers(),
            second_hand: false,
            hidden: false,
            frame_width: self.frame.width as f32,
            scale: self.hand_scale,
        };
        for input in self.rx {
            let event = match input {
                SimInput::Pointer { x, y } => SourceEvent::Frame(sim.frame_at(x, y)),
                SimInput::Pose(pose) => {
                    debug!(?pose, "sim pose");
                    sim.pose = pose.fingers();
                    continue;
                }
                SimInput::ToggleSecondHand => {
                    sim.second_hand = !sim.second_hand;
                    continue;
                }
                SimInput::ToggleHidden => {
                    sim.hidden = !sim.hidden;
                    continue;
                }
                SimInput::Quit => {
                    let _ = tx.send(SourceEvent::Quit);
                    return;
                }
            };
            if tx.send(event).is_err() {
                return;
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use hand_gesture::classify;
    use hand_gesture::volume::average_finger_distance;
    use std::io::Cursor;

    fn frame_size() -> Size {
        Size { width: 1280, height: 720 }
    }

    fn drain(rx: Receiver<SourceEvent>) -> Vec<SourceEvent> {
        rx.iter().collect()
    }

    fn json_hand(x: f32, y: f32) -> String {
        let pts: Vec<String> = (0..21).map(|_| format!(r#"{{"x":{},"y":{}}}"#, x, y)).collect();
        format!(r#"{{"landmarks":[{}]}}"#, pts.join(","))
    }

    #[test]
    fn json_lines_frames_then_quit() {
        let input = format!(
            "{{\"hands\":[{}]}}\n\n{{\"coords\":\"pixel\",\"hands\":[]}}\n",
            json_hand(0.5, 0.5)
        );
        let src = JsonLinesSource::new(Cursor::new(input), Normalizer::new(1280, 720));
        let events = drain(spawn_landmark_source(src));
        assert_eq!(events.len(), 3);
        match &events[0] {
            SourceEvent::Frame(hands) => {
                assert_eq!(hands.len(), 1);
                assert_eq!(hands.hands()[0].index_tip(), Point2D::new(640.0, 360.0));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(events[1], SourceEvent::Frame(FrameHands::empty()));
        assert_eq!(events[2], SourceEvent::Quit);
    }

    #[test]
    fn json_lines_bad_line_is_fatal() {
        let input = "{\"hands\":[]}\nnot json\n{\"hands\":[]}\n";
        let src = JsonLinesSource::new(Cursor::new(input), Normalizer::new(1280, 720));
        let events = drain(spawn_landmark_source(src));
        assert_eq!(events.len(), 2);
        assert!(matches!(&events[1], SourceEvent::Failed(msg) if msg.starts_with("line 2")));
    }

    #[test]
    fn sim_pose_applies_to_next_pointer() {
        let (tx, rx) = mpsc::channel();
        let out = spawn_landmark_source(SimLandmarkSource::new(rx, frame_size()));
        tx.send(SimInput::Pose(SimPose::Next)).unwrap();
        tx.send(SimInput::Pointer { x: 400.0, y: 300.0 }).unwrap();
        tx.send(SimInput::Quit).unwrap();
        let events = drain(out);
        assert_eq!(events.len(), 2);
        match &events[0] {
            SourceEvent::Frame(hands) => {
                assert_eq!(classify(&hands.hands()[0]), SimPose::Next.fingers());
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(events[1], SourceEvent::Quit);
    }

    #[test]
    fn sim_second_hand_spread_follows_pointer() {
        let sim = SimHands {
            pose: SimPose::Fist.fingers(),
            second_hand: true,
            hidden: false,
            frame_width: 1280.0,
            scale: 1.0,
        };
        let near = sim.frame_at(600.0, 300.0);
        let far = sim.frame_at(300.0, 300.0);
        let (a, b) = near.pair().unwrap();
        let (c, d) = far.pair().unwrap();
        assert!(average_finger_distance(a, b) < average_finger_distance(c, d));
    }

    #[test]
    fn sim_hidden_sends_empty_frames() {
        let sim = SimHands {
            pose: SimPose::OpenPalm.fingers(),
            second_hand: true,
            hidden: true,
            frame_width: 1280.0,
            scale: 1.0,
        };
        assert!(sim.frame_at(10.0, 10.0).is_empty());
    }

    #[test]
    fn sim_poses_are_distinct() {
        let poses = [
            SimPose::OpenPalm, SimPose::Next, SimPose::Previous, SimPose::VolumeUp,
            SimPose::VolumeDown, SimPose::Screenshot, SimPose::Point, SimPose::Click, SimPose::Fist,
        ];
        for (i, a) in poses.iter().enumerate() {
            for b in &poses[i + 1..] {
                assert_ne!(a.fingers(), b.fingers());
            }
        }
    }
}
