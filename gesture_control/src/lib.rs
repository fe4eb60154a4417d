//! # gesture_control
//!
//! Desktop controller driven by hand gestures, with a live preview window.
//! Hand landmarks come from an external detector (JSON lines on stdin) or
//! from the built-in keyboard/mouse simulator; the `hand_gesture` core turns
//! them into key presses, clicks, cursor motion, screenshots and volume.
//!
//! ## Gesture → Action mapping
//!
//! | Gesture | Hands | Action |
//! |---|---|---|
//! | Open palm | One | `space` |
//! | Index + pinky | One | `right` |
//! | Index + middle + pinky | One | `left` |
//! | Four fingers, no thumb | One | `up` |
//! | Index + middle + ring | One | `down` |
//! | Index + middle ("V") | One | Screenshot of the preview |
//! | Index up, middle down | One | Move the cursor |
//! | Thumb out, index folded | One | Click |
//! | Spread hands apart / together | Both | Volume up / down |
//!
//! ## Sources
//!
//! * `--source sim` (default): **Simulation mode**, the mouse moves the hand,
//!   keys pick its pose.
//! * `--source stdin`: one `RawFrame` JSON document per line, e.g. piped
//!   from a pose-model process.
//!
//! ## OS input
//!
//! By default commands are only logged.  Build with `--features os-input`
//! to press real keys, click and move the pointer (via `enigo`); the cursor
//! is then mapped onto the detected display instead of `gesture.screen`.
//!
//! ### Simulation keyboard shortcuts
//!
//! | Key | Pose |
//! |---|---|
//! | `1`–`6` | The six table gestures, in order |
//! | `P` | Point (moves the cursor) |
//! | `C` | Click |
//! | `F` | Fist (nothing) |
//! | `V` | Toggle a mirrored second hand |
//! | `H` | Hide all hands |
//! | `Q` | Quit |

pub mod app;
pub mod audio;
pub mod error;
pub mod hud;
pub mod input;
pub mod source;

pub use app::{run, AppConfig, SourceKind};
pub use error::{AppError, Result};
