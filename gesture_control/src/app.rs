//! Top-level frame loop.
//!
//! `AppState` owns the gesture [`Controller`] and the latest landmark
//! snapshot.  It consumes `SourceEvent`s, runs the controller once per
//! tick and hands the resulting commands to the input and audio
//! collaborators.

use std::io::{self, BufReader};
use std::path::Path;
use std::sync::mpsc::{self, TryRecvError};
use std::time::Instant;

use hand_gesture::config::{BarSpan, Size};
use hand_gesture::{
    Command, Controller, FingerState, FrameHands, FrameOutput, GestureConfig, Normalizer,
    VolumeRange, VolumeUpdate,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::audio::{open_volume_backend, AudioConfig, VolumeBackend};
use crate::error::{AppError, Result};
use crate::hud::{Hud, HudConfig, HudView};
use crate::input::{open_input_sink, InputSink};
use crate::source::{spawn_landmark_source, JsonLinesSource, SimLandmarkSource, SourceEvent};

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

/// Configuration for the full application, one TOML file:
///
/// ```toml
/// stale_frame_limit = 1
///
/// [gesture]
/// cooldown_seconds = 0.2
///
/// [hud]
/// scale = 0.5
///
/// [audio]
/// midi_port = "fluid"
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub gesture: GestureConfig,
    pub hud: HudConfig,
    pub audio: AudioConfig,
    /// Ticks a landmark snapshot may be reused after the one it arrived in.
    /// Lets the detector run on alternate frames.
    pub stale_frame_limit: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            gesture: GestureConfig::default(),
            hud: HudConfig::default(),
            audio: AudioConfig::default(),
            stale_frame_limit: 1,
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(src: &str) -> Result<Self> {
        let cfg: AppConfig = toml::from_str(src).map_err(hand_gesture::Error::from)?;
        cfg.gesture.validate()?;
        if !(cfg.hud.scale > 0.0 && cfg.hud.scale <= 4.0) {
            return Err(hand_gesture::Error::InvalidConfig(format!(
                "hud.scale must be in (0, 4] (got {})",
                cfg.hud.scale
            ))
            .into());
        }
        Ok(cfg)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(hand_gesture::Error::from)?;
        Self::from_toml_str(&content)
    }
}

/// Where hands come from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceKind {
    /// Keyboard/mouse simulation in the preview window.
    Sim,
    /// JSON lines from an external detector on stdin.
    Stdin,
}

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState {
    controller: Controller,

    // ── landmark snapshot ────────────────────────────────────────────────
    snapshot: FrameHands,
    /// Ticks since `snapshot` arrived.
    age: u32,
    stale_limit: u32,

    // ── HUD state ────────────────────────────────────────────────────────
    fingers: Option<FingerState>,
    last_volume: Option<VolumeUpdate>,
    screen: Size,
    bar: BarSpan,
    pub status: String,
}

impl AppState {
    pub fn new(cfg: &AppConfig, volume_range: VolumeRange) -> Self {
        AppState {
            controller: Controller::new(&cfg.gesture, volume_range),
            snapshot: FrameHands::empty(),
            age: 0,
            stale_limit: cfg.stale_frame_limit,
            fingers: None,
            last_volume: None,
            screen: cfg.gesture.screen,
            bar: cfg.gesture.volume_bar,
            status: "Ready".to_string(),
        }
    }

    /// Returns `Ok(false)` when the source ended and the loop should stop.
    pub fn handle_event(&mut self, event: SourceEvent) -> Result<bool> {
        match event {
            SourceEvent::Frame(hands) => {
                self.snapshot = hands;
                self.age = 0;
                Ok(true)
            }
            SourceEvent::Failed(msg) => Err(AppError::Acquisition(msg)),
            SourceEvent::Quit => Ok(false),
        }
    }

    // ── Per-frame tick ────────────────────────────────────────────────────

    pub fn tick(&mut self, now: f64) -> FrameOutput {
        if self.age > self.stale_limit {
            self.snapshot = FrameHands::empty();
        }
        self.age = self.age.saturating_add(1);

        let out = self.controller.process(&self.snapshot, now);
        self.fingers = out.fingers;
        if let Some(action) = out.gesture {
            debug!(gesture = action.name(), "gesture fired");
            self.status = format!("Gesture: {}", action.name());
        }
        if let Some(vol) = out.volume {
            self.last_volume = Some(vol);
        }
        out
    }

    // ── Accessors for the render loop ─────────────────────────────────────

    pub fn hands(&self) -> &FrameHands {
        &self.snapshot
    }

    pub fn view(&self, cursor: Option<(f32, f32)>) -> HudView<'_> {
        HudView {
            hands: &self.snapshot,
            fingers: self.fingers,
            volume: self.last_volume,
            cursor,
            screen: self.screen,
            bar: self.bar,
            status: &self.status,
        }
    }
}

/// Forward one frame's commands, in order.
pub fn execute(commands: &[Command], input: &mut dyn InputSink, audio: &mut dyn VolumeBackend) {
    for command in commands {
        match command {
            Command::PressKey(key) => input.press_key(*key),
            Command::Click => input.click(),
            Command::MoveCursor { x, y } => input.move_cursor(*x, *y),
            Command::Screenshot(path) => input.write_screenshot(path),
            Command::SetVolume(native) => audio.set(*native),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// run() — the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Run the full application until the window closes, Q is pressed or the
/// source ends.  A failing source stops the loop with
/// [`AppError::Acquisition`].
pub fn run(mut cfg: AppConfig, source: SourceKind) -> Result<()> {
    let frame = cfg.gesture.frame;

    // ── Keyboard/mouse (decides the screen the cursor maps onto) ──────────
    let (mut input, screen) = open_input_sink(cfg.gesture.screen);
    cfg.gesture.screen = screen;
    info!(backend = input.name(), width = screen.width, height = screen.height, "input");

    // ── Audio ─────────────────────────────────────────────────────────────
    let mut audio = open_volume_backend(&cfg.audio);
    let range = audio.range();
    info!(backend = audio.name(), min = range.min, max = range.max, "volume output");

    // ── Landmark source ───────────────────────────────────────────────────
    let (sim_tx, events) = match source {
        SourceKind::Sim => {
            let (tx, rx) = mpsc::channel();
            (Some(tx), spawn_landmark_source(SimLandmarkSource::new(rx, frame)))
        }
        SourceKind::Stdin => {
            let reader = BufReader::new(io::stdin());
            let normalizer = Normalizer::new(frame.width, frame.height);
            (None, spawn_landmark_source(JsonLinesSource::new(reader, normalizer)))
        }
    };

    // ── HUD (owns the window and the sim input sender) ────────────────────
    let mut hud = Hud::new(frame, &cfg.hud, sim_tx)?;

    let mut app = AppState::new(&cfg, range);
    let start = Instant::now();

    // ── Main loop ─────────────────────────────────────────────────────────
    'frames: while hud.is_open() {
        // 1. Window input → SimInput
        if !hud.poll_input() {
            break;
        }

        // 2. Drain landmark events
        loop {
            match events.try_recv() {
                Ok(event) => {
                    if !app.handle_event(event)? {
                        break 'frames;
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => break 'frames,
            }
        }

        // 3. Gesture core
        let out = app.tick(start.elapsed().as_secs_f64());
        execute(&out.commands, input.as_mut(), audio.as_mut());

        // 4. Render, then capture the rendered frame if asked to
        hud.render(&app.view(input.cursor()))?;
        if let Some(path) = input.take_screenshot() {
            if let Err(e) = hud.save_png(&path) {
                warn!("could not write {}: {}", path.display(), e);
            }
        }
    }

    info!("shutting down");
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
