//! # hand_gesture
//!
//! Turns per-frame hand landmarks (21 2D keypoints per hand, from any
//! external pose model) into discrete desktop control events.
//!
//! ## Gesture → Action mapping
//!
//! Fingers are listed `[thumb, index, middle, ring, pinky]`, 1 = extended.
//!
//! | Fingers | Action |
//! |---|---|
//! | `11111` | press `space` |
//! | `01001` | press `right` |
//! | `01101` | press `left` |
//! | `01111` | press `up` |
//! | `01110` | press `down` |
//! | `01100` | screenshot |
//! | `?10??` (index up, middle down) | move the cursor |
//! | `10???` (thumb up, index down) | left click |
//! | two hands | spread sets the system volume |
//!
//! Table gestures share one cooldown; clicks and volume updates each have
//! their own.
//!
//! ## Quick start
//!
//! ```rust
//! use hand_gesture::{Controller, FrameHands, GestureConfig, VolumeRange};
//!
//! let cfg = GestureConfig::default();
//! let mut controller = Controller::new(&cfg, VolumeRange::new(-65.25, 0.0));
//!
//! let out = controller.process(&FrameHands::empty(), 0.0);
//! assert!(out.commands.is_empty());
//! ```

pub mod click;
pub mod config;
pub mod controller;
pub mod cursor;
pub mod dispatch;
pub mod error;
pub mod finger;
pub mod landmarks;
pub mod remap;
pub mod synth;
pub mod volume;

pub use config::GestureConfig;
pub use controller::{Command, Controller, FrameOutput};
pub use dispatch::{Cooldown, GestureAction, GestureDispatcher, Key};
pub use error::{Error, Result};
pub use finger::{classify, FingerState};
pub use landmarks::{FrameHands, Hand, Normalizer, Point2D, RawFrame};
pub use volume::{VolumeRange, VolumeUpdate};
