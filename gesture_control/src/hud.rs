//! Software-rendered preview window using `minifb`.
//!
//! Layout (camera-frame coordinates, scaled down by `HudConfig::scale`):
//!
//! ```text
//! ┌────────────────────────────────────────────────────┬──────────┐
//! │ 50%                                                │  screen  │
//! │ ┌──┐                                               │   [·]    │
//! │ │  │          hand skeletons                       └──────────┤
//! │ │██│                                                          │
//! │ │██│                                                          │
//! │ status bar                                                    │
//! │ key legend                                                    │
//! └───────────────────────────────────────────────────────────────┘
//! ```

use std::path::Path;
use std::sync::mpsc::Sender;
use std::time::Duration;

use hand_gesture::config::{BarSpan, Size};
use hand_gesture::landmarks::HAND_CONNECTIONS;
use hand_gesture::{FingerState, FrameHands, VolumeUpdate};
use minifb::{Key, KeyRepeat, MouseMode, Window, WindowOptions};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::source::{SimInput, SimPose};

// ════════════════════════════════════════════════════════════════════════════
// Colors and layout constants
// ════════════════════════════════════════════════════════════════════════════

const BG_COLOR: u32 = 0xFF1A1A2E;
const BONE_COLOR: u32 = 0xFF4FC3F7;
const JOINT_COLOR: u32 = 0xFFFF5252;
const SECOND_HAND_COLOR: u32 = 0xFF81C784;
const VOLUME_COLOR: u32 = 0xFF00FF00;
const TEXT_COLOR: u32 = 0xFFEEEEEE;
const LEGEND_COLOR: u32 = 0xFF888888;
const TEXT_BG: u32 = 0xFF0F3460;
const MINIMAP_BG: u32 = 0xFF16213E;
const CURSOR_COLOR: u32 = 0xFFFFD700;

/// Volume bar left/right edges in frame pixels.
const BAR_X0: f32 = 50.0;
const BAR_X1: f32 = 85.0;
const MINIMAP_W: usize = 160;
const STATUS_H: usize = 28;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HudConfig {
    /// Window size relative to the camera frame.
    pub scale: f32,
}

impl Default for HudConfig {
    fn default() -> Self {
        HudConfig { scale: 0.5 }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Canvas — ARGB framebuffer with primitive drawing
// ════════════════════════════════════════════════════════════════════════════

pub struct Canvas {
    pub width: usize,
    pub height: usize,
    pub buf: Vec<u32>,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Canvas { width, height, buf: vec![BG_COLOR; width * height] }
    }

    pub fn clear(&mut self, color: u32) {
        self.buf.fill(color);
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        (x < self.width && y < self.height).then(|| self.buf[y * self.width + x])
    }

    pub fn set_pixel(&mut self, x: isize, y: isize, color: u32) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.buf[y as usize * self.width + x as usize] = color;
        }
    }

    pub fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y + h).min(self.height) {
            for col in x..(x + w).min(self.width) {
                self.buf[row * self.width + col] = color;
            }
        }
    }

    pub fn draw_border(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        if w == 0 || h == 0 {
            return;
        }
        let (x, y, w, h) = (x as isize, y as isize, w as isize, h as isize);
        for col in x..x + w {
            self.set_pixel(col, y, color);
            self.set_pixel(col, y + h - 1, color);
        }
        for row in y..y + h {
            self.set_pixel(x, row, color);
            self.set_pixel(x + w - 1, row, color);
        }
    }

    /// Bresenham line.
    pub fn draw_line(&mut self, from: (isize, isize), to: (isize, isize), color: u32) {
        let (mut x0, mut y0) = from;
        let (x1, y1) = to;
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.set_pixel(x0, y0, color);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    pub fn draw_dot(&mut self, cx: isize, cy: isize, r: isize, color: u32) {
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy <= r * r {
                    self.set_pixel(cx + dx, cy + dy, color);
                }
            }
        }
    }

    /// 3×5 bitmap text, each font pixel drawn as a `px`×`px` block.
    pub fn draw_text(&mut self, text: &str, x: usize, y: usize, color: u32, px: usize) {
        let mut cx = x;
        for ch in text.chars() {
            let glyph = char_glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) != 0 {
                        self.fill_rect(cx + col * px, y + row * px, px, px, color);
                    }
                }
            }
            cx += 4 * px; // 3 wide + 1 gap
            if cx + 4 * px > self.width {
                break;
            }
        }
    }

    /// Save as PNG (or any format the extension names), dropping alpha.
    pub fn save(&self, path: &Path) -> Result<()> {
        let img = image::RgbImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            let c = self.buf[y as usize * self.width + x as usize];
            image::Rgb([(c >> 16) as u8, (c >> 8) as u8, c as u8])
        });
        img.save(path)?;
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HudView — one frame's worth of things to show
// ════════════════════════════════════════════════════════════════════════════

pub struct HudView<'a> {
    pub hands: &'a FrameHands,
    pub fingers: Option<FingerState>,
    /// Most recent volume update, kept on screen between updates.
    pub volume: Option<VolumeUpdate>,
    /// Last cursor position on the controlled screen.
    pub cursor: Option<(f32, f32)>,
    pub screen: Size,
    /// Volume bar span in frame pixels.
    pub bar: BarSpan,
    pub status: &'a str,
}

/// Draw a full frame onto `canvas`; `scale` maps frame pixels to canvas pixels.
pub fn draw_view(canvas: &mut Canvas, view: &HudView<'_>, scale: f32) {
    canvas.clear(BG_COLOR);

    // ── Hand skeletons ───────────────────────────────────────────────────
    for (i, hand) in view.hands.hands().iter().enumerate() {
        let bone = if i == 0 { BONE_COLOR } else { SECOND_HAND_COLOR };
        let to_px = |idx: usize| {
            let p = hand.point(idx);
            ((p.x * scale) as isize, (p.y * scale) as isize)
        };
        for &(a, b) in HAND_CONNECTIONS.iter() {
            canvas.draw_line(to_px(a), to_px(b), bone);
        }
        for idx in 0..hand.points().len() {
            let (x, y) = to_px(idx);
            canvas.draw_dot(x, y, 2, JOINT_COLOR);
        }
    }

    // ── Volume bar ───────────────────────────────────────────────────────
    if let Some(vol) = view.volume {
        let x0 = (BAR_X0 * scale) as usize;
        let w = ((BAR_X1 - BAR_X0) * scale) as usize;
        let top = (view.bar.top * scale) as usize;
        let bottom = ((view.bar.bottom * scale) as usize).min(view_bottom(canvas)).max(top);
        let fill_top = ((vol.bar_top * scale) as usize).clamp(top, bottom);
        canvas.draw_border(x0, top, w, bottom - top, VOLUME_COLOR);
        canvas.fill_rect(x0, fill_top, w, bottom - fill_top, VOLUME_COLOR);
        let label = vol.percent_label();
        let label_x = (40.0 * scale) as usize;
        canvas.draw_text(&label, label_x, top.saturating_sub(16), VOLUME_COLOR, 2);
    }

    // ── Screen minimap with the cursor ───────────────────────────────────
    let map_h = MINIMAP_W * view.screen.height as usize / view.screen.width.max(1) as usize;
    let map_x = canvas.width.saturating_sub(MINIMAP_W + 8);
    canvas.fill_rect(map_x, 8, MINIMAP_W, map_h, MINIMAP_BG);
    canvas.draw_border(map_x, 8, MINIMAP_W, map_h, LEGEND_COLOR);
    if let Some((cx, cy)) = view.cursor {
        let mx = map_x as f32 + cx / view.screen.width as f32 * MINIMAP_W as f32;
        let my = 8.0 + cy / view.screen.height as f32 * map_h as f32;
        canvas.draw_dot(mx as isize, my as isize, 3, CURSOR_COLOR);
    }

    // ── Status bar ───────────────────────────────────────────────────────
    let status_y = canvas.height.saturating_sub(STATUS_H + 12);
    canvas.fill_rect(0, status_y, canvas.width, STATUS_H + 12, TEXT_BG);
    let fingers = view.fingers.map(|f| f.to_string()).unwrap_or_else(|| "-----".into());
    canvas.draw_text(&format!("{}  {}", fingers, view.status), 8, status_y + 6, TEXT_COLOR, 2);

    // ── Key legend ───────────────────────────────────────────────────────
    canvas.draw_text(
        "1-6=poses  P=point  C=click  F=fist  V=two hands  H=hide  Q=quit",
        8,
        canvas.height.saturating_sub(9),
        LEGEND_COLOR,
        1,
    );
}

/// Bottom of the drawable area above the status bar.
fn view_bottom(canvas: &Canvas) -> usize {
    canvas.height.saturating_sub(STATUS_H + 12)
}

// ════════════════════════════════════════════════════════════════════════════
// Hud — the window
// ════════════════════════════════════════════════════════════════════════════

pub struct Hud {
    window: Window,
    canvas: Canvas,
    scale: f32,
    sim_tx: Option<Sender<SimInput>>,
}

impl Hud {
    /// `sim_tx` is set when the simulator drives the hands; mouse and pose
    /// keys are then forwarded to it.
    pub fn new(frame: Size, cfg: &HudConfig, sim_tx: Option<Sender<SimInput>>) -> Result<Self> {
        let width = ((frame.width as f32 * cfg.scale) as usize).max(1);
        let height = ((frame.height as f32 * cfg.scale) as usize).max(1);
        let mut window = Window::new(
            "Hand Gesture Control",
            width,
            height,
            WindowOptions { resize: false, ..WindowOptions::default() },
        )
        .map_err(|e| AppError::Window(e.to_string()))?;

        window.limit_update_rate(Some(Duration::from_millis(16))); // ~60fps

        Ok(Hud {
            window,
            canvas: Canvas::new(width, height),
            scale: cfg.scale,
            sim_tx,
        })
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// Poll the keyboard and mouse.  Returns false once the user asked to
    /// quit (Q / Escape) or closed the window.
    pub fn poll_input(&mut self) -> bool {
        if !self.window.is_open() {
            return false;
        }
        let one_shot = |w: &Window, k: Key| w.is_key_pressed(k, KeyRepeat::No);

        if one_shot(&self.window, Key::Q) || one_shot(&self.window, Key::Escape) {
            self.send(SimInput::Quit);
            return false;
        }

        let Some(tx) = &self.sim_tx else { return true };

        const POSE_KEYS: [(Key, SimPose); 9] = [
            (Key::Key1, SimPose::OpenPalm),
            (Key::Key2, SimPose::Next),
            (Key::Key3, SimPose::Previous),
            (Key::Key4, SimPose::VolumeUp),
            (Key::Key5, SimPose::VolumeDown),
            (Key::Key6, SimPose::Screenshot),
            (Key::P, SimPose::Point),
            (Key::C, SimPose::Click),
            (Key::F, SimPose::Fist),
        ];
        let mut inputs = Vec::new();
        for (key, pose) in POSE_KEYS {
            if one_shot(&self.window, key) {
                inputs.push(SimInput::Pose(pose));
            }
        }
        if one_shot(&self.window, Key::V) {
            inputs.push(SimInput::ToggleSecondHand);
        }
        if one_shot(&self.window, Key::H) {
            inputs.push(SimInput::ToggleHidden);
        }
        // Pointer last so a new pose shows up in this frame already.
        if let Some((mx, my)) = self.window.get_mouse_pos(MouseMode::Clamp) {
            inputs.push(SimInput::Pointer { x: mx / self.scale, y: my / self.scale });
        }
        for input in inputs {
            let _ = tx.send(input);
        }
        true
    }

    fn send(&self, input: SimInput) {
        if let Some(tx) = &self.sim_tx {
            let _ = tx.send(input);
        }
    }

    /// Render one frame.
    pub fn render(&mut self, view: &HudView<'_>) -> Result<()> {
        draw_view(&mut self.canvas, view, self.scale);
        self.window
            .update_with_buffer(&self.canvas.buf, self.canvas.width, self.canvas.height)
            .map_err(|e| AppError::Window(e.to_string()))
    }

    /// Write the current preview to `path`, replacing any previous file.
    pub fn save_png(&self, path: &Path) -> Result<()> {
        self.canvas.save(path)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' | 'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' | 'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' | 'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' | 'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' | 'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' | 'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' | 'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' | 'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' | 'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' | 'J' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'k' | 'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' | 'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' | 'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'n' | 'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'o' | 'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' | 'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'q' | 'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'r' | 'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' | 'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' | 'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' | 'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' | 'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'w' | 'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'x' | 'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' | 'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'z' | 'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '%' => [0b101, 0b001, 0b010, 0b100, 0b101],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _ => [0b000, 0b000, 0b010, 0b000, 0b000], // fallback dot
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use hand_gesture::synth::posed_hand;
    use hand_gesture::Point2D;

    fn view<'a>(hands: &'a FrameHands, volume: Option<VolumeUpdate>) -> HudView<'a> {
        HudView {
            hands,
            fingers: None,
            volume,
            cursor: Some((960.0, 540.0)),
            screen: Size { width: 1920, height: 1080 },
            bar: BarSpan { top: 150.0, bottom: 720.0 },
            status: "ready",
        }
    }

    #[test]
    fn line_hits_both_ends() {
        let mut c = Canvas::new(20, 20);
        c.draw_line((2, 3), (15, 11), 0xFFFFFFFF);
        assert_eq!(c.pixel(2, 3), Some(0xFFFFFFFF));
        assert_eq!(c.pixel(15, 11), Some(0xFFFFFFFF));
    }

    #[test]
    fn drawing_off_canvas_is_ignored() {
        let mut c = Canvas::new(10, 10);
        c.draw_line((-5, -5), (30, 30), 0xFFFFFFFF);
        c.draw_dot(-3, 50, 4, 0xFFFFFFFF);
        c.fill_rect(8, 8, 10, 10, 0xFF00FF00);
        assert_eq!(c.pixel(9, 9), Some(0xFF00FF00));
        assert_eq!(c.pixel(10, 10), None);
    }

    #[test]
    fn hand_joints_are_drawn() {
        let hands = FrameHands::new(vec![posed_hand(
            Point2D::new(640.0, 360.0),
            FingerState::from_bits([1, 1, 1, 1, 1]),
            1.0,
        )]);
        let mut c = Canvas::new(640, 360);
        draw_view(&mut c, &view(&hands, None), 0.5);
        // Index tip of the open hand sits 70 px above the palm in frame space.
        let tip = hands.hands()[0].index_tip();
        assert_eq!(c.pixel((tip.x * 0.5) as usize, (tip.y * 0.5) as usize), Some(JOINT_COLOR));
    }

    #[test]
    fn volume_bar_fills_from_bottom() {
        let hands = FrameHands::empty();
        let mut c = Canvas::new(640, 360);
        let vol = VolumeUpdate { native: 0.0, percent: 100.0, bar_top: 150.0 };
        draw_view(&mut c, &view(&hands, Some(vol)), 0.5);
        // Inside the bar, just above the status area.
        let x = (60.0 * 0.5) as usize;
        let y = view_bottom(&c) - 2;
        assert_eq!(c.pixel(x, y), Some(VOLUME_COLOR));
    }

    #[test]
    fn text_stays_in_bounds() {
        let mut c = Canvas::new(30, 10);
        c.draw_text("a long line of text that overflows", 0, 0, TEXT_COLOR, 2);
        assert_eq!(c.buf.len(), 300);
    }
}
