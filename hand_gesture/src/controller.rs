//! Per-frame composition of the gesture core.
//!
//! [`Controller`] owns everything that survives between frames: the cursor
//! smoother and a separate cooldown clock each for gestures, clicks and
//! volume.  It turns one [`FrameHands`] snapshot into a list of
//! [`Command`]s and performs no I/O itself.

use std::path::PathBuf;

use crate::click::ClickGesture;
use crate::config::GestureConfig;
use crate::cursor::CursorController;
use crate::dispatch::{GestureAction, GestureDispatcher, Key};
use crate::finger::{classify, FingerState};
use crate::landmarks::FrameHands;
use crate::volume::{VolumeController, VolumeRange, VolumeUpdate};

/// Something for the OS or audio collaborator to do.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    PressKey(Key),
    Click,
    /// Absolute screen position, already mirrored.
    MoveCursor { x: f32, y: f32 },
    /// Write a screenshot to this path, replacing any earlier file.  The
    /// shipped app saves its own preview canvas here; there is no OS-level
    /// screen capture.
    Screenshot(PathBuf),
    /// Device-native volume value.
    SetVolume(f32),
}

/// Everything one frame produced.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameOutput {
    /// Pose of the primary hand, if any hand was seen.
    pub fingers: Option<FingerState>,
    /// The gesture that fired this frame, if any.
    pub gesture: Option<GestureAction>,
    /// Commands in the order they were produced.
    pub commands: Vec<Command>,
    /// Volume change for the HUD, when one happened this frame.
    pub volume: Option<VolumeUpdate>,
}

impl FrameOutput {
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

pub struct Controller {
    dispatcher: GestureDispatcher,
    cursor: CursorController,
    click: ClickGesture,
    volume: VolumeController,
    screenshot_path: PathBuf,
}

impl Controller {
    /// `volume_range` is the audio device's native range, queried once by
    /// the caller at startup.
    pub fn new(cfg: &GestureConfig, volume_range: VolumeRange) -> Self {
        Controller {
            dispatcher: GestureDispatcher::new(cfg.cooldown_seconds),
            cursor: CursorController::from_config(cfg),
            click: ClickGesture::new(cfg.click_cooldown_seconds),
            volume: VolumeController::from_config(cfg, volume_range),
            screenshot_path: cfg.screenshot_path.clone(),
        }
    }

    /// Run one frame: classify → dispatch → cursor → click → volume.
    ///
    /// `now` is in seconds on any clock; only differences matter.  An empty
    /// frame produces an empty output and leaves all state untouched.
    pub fn process(&mut self, hands: &FrameHands, now: f64) -> FrameOutput {
        let mut out = FrameOutput::default();

        if let Some(hand) = hands.primary() {
            let fingers = classify(hand);
            out.fingers = Some(fingers);

            if let Some(action) = self.dispatcher.dispatch(fingers, now) {
                out.gesture = Some(action);
                out.commands.push(match action.key() {
                    Some(key) => Command::PressKey(key),
                    None => Command::Screenshot(self.screenshot_path.clone()),
                });
            }

            if let Some(mv) = self.cursor.update(fingers, hand) {
                out.commands.push(Command::MoveCursor { x: mv.x, y: mv.y });
            }

            if self.click.update(fingers, now) {
                out.commands.push(Command::Click);
            }
        }

        if let Some(update) = self.volume.update(hands, now) {
            out.commands.push(Command::SetVolume(update.native));
            out.volume = Some(update);
        }

        out
    }

    pub fn cursor(&self) -> &CursorController {
        &self.cursor
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
