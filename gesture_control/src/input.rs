//! OS-automation commands.
//!
//! [`InputSink`] is the seam between the frame loop and the desktop.
//! With the `os-input` feature, `EnigoInput` presses real keys, clicks
//! and moves the pointer through `enigo`.  [`LoggedInput`] only reports
//! commands through `tracing`; it is the fallback when no OS backend is
//! available and the double used by tests.  Both keep the last cursor
//! position and any pending screenshot for the HUD.

use std::path::{Path, PathBuf};

use hand_gesture::config::Size;
use hand_gesture::Key;
use tracing::{debug, info};

pub trait InputSink {
    fn press_key(&mut self, key: Key);
    fn click(&mut self);
    /// Absolute screen coordinates.
    fn move_cursor(&mut self, x: f32, y: f32);
    /// Ask for a screenshot at `path`, overwriting any previous file.
    fn write_screenshot(&mut self, path: &Path);

    /// Last cursor position sent, for the HUD.
    fn cursor(&self) -> Option<(f32, f32)>;
    /// Screenshot requested since the previous call, if any.
    fn take_screenshot(&mut self) -> Option<PathBuf>;
    fn name(&self) -> &str;
}

// ── logging backend (fallback and test double) ────────────────────────────

#[derive(Debug, Default)]
pub struct LoggedInput {
    pub cursor: Option<(f32, f32)>,
    pub last_key: Option<Key>,
    pub clicks: u64,
    /// Screenshot requested this frame; the frame loop writes it once the
    /// preview has been rendered.
    pub pending_screenshot: Option<PathBuf>,
}

impl LoggedInput {
    pub fn new() -> Self {
        Self::default()
    }
}

impl InputSink for LoggedInput {
    fn press_key(&mut self, key: Key) {
        info!(key = key.name(), "press key");
        self.last_key = Some(key);
    }

    fn click(&mut self) {
        self.clicks += 1;
        info!(clicks = self.clicks, "click");
    }

    fn move_cursor(&mut self, x: f32, y: f32) {
        debug!(x, y, "move cursor");
        self.cursor = Some((x, y));
    }

    fn write_screenshot(&mut self, path: &Path) {
        info!(path = %path.display(), "screenshot");
        self.pending_screenshot = Some(path.to_path_buf());
    }

    fn cursor(&self) -> Option<(f32, f32)> {
        self.cursor
    }

    fn take_screenshot(&mut self) -> Option<PathBuf> {
        self.pending_screenshot.take()
    }

    fn name(&self) -> &str {
        "log"
    }
}

// ── enigo backend (only with `--features os-input`) ───────────────────────

#[cfg(feature = "os-input")]
pub use os::{enigo_key, EnigoInput};

#[cfg(feature = "os-input")]
mod os {
    use std::path::{Path, PathBuf};

    use enigo::{Button, Coordinate, Direction, Enigo, Keyboard, Mouse, Settings};
    use hand_gesture::Key;
    use tracing::warn;

    use super::{InputSink, LoggedInput};

    pub fn enigo_key(key: Key) -> enigo::Key {
        match key {
            Key::Space => enigo::Key::Space,
            Key::Right => enigo::Key::RightArrow,
            Key::Left => enigo::Key::LeftArrow,
            Key::Up => enigo::Key::UpArrow,
            Key::Down => enigo::Key::DownArrow,
        }
    }

    /// Real keyboard and mouse.  Failures to inject an event are logged and
    /// otherwise ignored: commands are fire-and-forget.
    pub struct EnigoInput {
        enigo: Enigo,
        log: LoggedInput,
    }

    impl EnigoInput {
        pub fn new() -> Result<Self, String> {
            let enigo = Enigo::new(&Settings::default()).map_err(|e| format!("{:?}", e))?;
            Ok(EnigoInput { enigo, log: LoggedInput::new() })
        }
    }

    impl InputSink for EnigoInput {
        fn press_key(&mut self, key: Key) {
            self.log.press_key(key);
            if let Err(e) = self.enigo.key(enigo_key(key), Direction::Click) {
                warn!("key {} failed: {:?}", key.name(), e);
            }
        }

        fn click(&mut self) {
            self.log.click();
            if let Err(e) = self.enigo.button(Button::Left, Direction::Click) {
                warn!("click failed: {:?}", e);
            }
        }

        fn move_cursor(&mut self, x: f32, y: f32) {
            self.log.move_cursor(x, y);
            let (px, py) = (x.round() as i32, y.round() as i32);
            if let Err(e) = self.enigo.move_mouse(px, py, Coordinate::Abs) {
                warn!("move to ({}, {}) failed: {:?}", px, py, e);
            }
        }

        fn write_screenshot(&mut self, path: &Path) {
            self.log.write_screenshot(path);
        }

        fn cursor(&self) -> Option<(f32, f32)> {
            self.log.cursor()
        }

        fn take_screenshot(&mut self) -> Option<PathBuf> {
            self.log.take_screenshot()
        }

        fn name(&self) -> &str {
            "enigo"
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// open_input_sink — pick a backend and the screen it drives
// ════════════════════════════════════════════════════════════════════════════

/// Open the OS input backend when built with `os-input`, else the logging
/// one.  The returned size is the screen the cursor is mapped onto: the
/// detected display with the OS backend, `configured` otherwise.
pub fn open_input_sink(configured: Size) -> (Box<dyn InputSink>, Size) {
    match open_os_input(configured) {
        Some(found) => found,
        None => (Box::new(LoggedInput::new()), configured),
    }
}

#[cfg(feature = "os-input")]
fn open_os_input(configured: Size) -> Option<(Box<dyn InputSink>, Size)> {
    match EnigoInput::new() {
        Ok(input) => {
            let screen = screen_size(rdev::display_size().ok(), configured);
            info!(width = screen.width, height = screen.height, "OS input via enigo");
            Some((Box::new(input), screen))
        }
        Err(e) => {
            tracing::warn!("enigo init failed: {}; commands will only be logged", e);
            None
        }
    }
}

#[cfg(not(feature = "os-input"))]
fn open_os_input(_configured: Size) -> Option<(Box<dyn InputSink>, Size)> {
    info!("OS input disabled (build with --features os-input); commands will only be logged");
    None
}

/// A detected display size, unless missing or degenerate.
pub fn screen_size(detected: Option<(u64, u64)>, configured: Size) -> Size {
    match detected {
        Some((w, h)) if w > 0 && h > 0 && w <= u32::MAX as u64 && h <= u32::MAX as u64 => {
            Size { width: w as u32, height: h as u32 }
        }
        _ => configured,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> Size {
        Size { width: 1920, height: 1080 }
    }

    #[test]
    fn records_commands() {
        let mut input = LoggedInput::new();
        input.press_key(Key::Right);
        input.click();
        input.click();
        input.move_cursor(12.5, 40.0);
        assert_eq!(input.last_key, Some(Key::Right));
        assert_eq!(input.clicks, 2);
        assert_eq!(input.cursor(), Some((12.5, 40.0)));
    }

    #[test]
    fn screenshot_is_taken_once() {
        let mut input = LoggedInput::new();
        input.write_screenshot(Path::new("shot.png"));
        assert_eq!(input.take_screenshot(), Some(PathBuf::from("shot.png")));
        assert_eq!(input.take_screenshot(), None);
    }

    #[test]
    fn detected_display_wins_over_config() {
        let size = screen_size(Some((2560, 1440)), configured());
        assert_eq!(size, Size { width: 2560, height: 1440 });
    }

    #[test]
    fn missing_or_empty_display_falls_back() {
        assert_eq!(screen_size(None, configured()), configured());
        assert_eq!(screen_size(Some((0, 1080)), configured()), configured());
    }

    #[cfg(not(feature = "os-input"))]
    #[test]
    fn without_os_input_commands_are_logged_on_configured_screen() {
        let (mut sink, screen) = open_input_sink(configured());
        assert_eq!(screen, configured());
        assert_eq!(sink.name(), "log");
        sink.move_cursor(100.0, 200.0);
        assert_eq!(sink.cursor(), Some((100.0, 200.0)));
    }

    #[cfg(feature = "os-input")]
    #[test]
    fn gesture_keys_map_to_enigo_keys() {
        assert_eq!(enigo_key(Key::Space), enigo::Key::Space);
        assert_eq!(enigo_key(Key::Right), enigo::Key::RightArrow);
        assert_eq!(enigo_key(Key::Left), enigo::Key::LeftArrow);
        assert_eq!(enigo_key(Key::Up), enigo::Key::UpArrow);
        assert_eq!(enigo_key(Key::Down), enigo::Key::DownArrow);
    }
}
