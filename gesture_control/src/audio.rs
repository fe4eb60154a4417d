//! System volume output.
//!
//! The volume is sent as a MIDI Universal SysEx *Master Volume* message, so
//! any synth or audio bridge listening on a MIDI port follows the hands.
//! With no usable port the null backend keeps the loop running and only
//! reports the range from config.

use hand_gesture::VolumeRange;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// 14-bit master volume: 0 = silent, 16383 = full.
pub const MASTER_VOLUME_MAX: u16 = 0x3FFF;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Case-insensitive substring of the preferred MIDI port name.
    pub midi_port: Option<String>,
    /// Range reported when no MIDI port is available, in dB.
    pub fallback_min_db: f32,
    pub fallback_max_db: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        AudioConfig {
            midi_port: None,
            fallback_min_db: -65.25,
            fallback_max_db: 0.0,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// VolumeBackend — abstraction over midir / null (for testing)
// ════════════════════════════════════════════════════════════════════════════

pub trait VolumeBackend {
    /// Native range, asked once at startup.
    fn range(&self) -> VolumeRange;
    /// Fire-and-forget.
    fn set(&mut self, native: f32);
    fn name(&self) -> &str;
}

// ── midir backend ─────────────────────────────────────────────────────────

pub struct MidiVolume {
    conn: midir::MidiOutputConnection,
    port_name: String,
}

impl VolumeBackend for MidiVolume {
    fn range(&self) -> VolumeRange {
        VolumeRange::new(0.0, MASTER_VOLUME_MAX as f32)
    }

    fn set(&mut self, native: f32) {
        if let Err(e) = self.conn.send(&master_volume_sysex(native)) {
            warn!("MIDI send failed: {}", e);
        }
    }

    fn name(&self) -> &str {
        &self.port_name
    }
}

/// `F0 7F 7F 04 01 <lsb> <msb> F7`, device ID 7F (all devices).
pub fn master_volume_sysex(native: f32) -> [u8; 8] {
    let v = native.round().clamp(0.0, MASTER_VOLUME_MAX as f32) as u16;
    let lsb = (v & 0x7F) as u8;
    let msb = ((v >> 7) & 0x7F) as u8;
    [0xF0, 0x7F, 0x7F, 0x04, 0x01, lsb, msb, 0xF7]
}

// ── null backend (used when no MIDI port is available) ────────────────────

/// Remembers the last value instead of sending it anywhere.
pub struct NullVolume {
    range: VolumeRange,
    pub last: Option<f32>,
}

impl NullVolume {
    pub fn new(range: VolumeRange) -> Self {
        NullVolume { range, last: None }
    }
}

impl VolumeBackend for NullVolume {
    fn range(&self) -> VolumeRange {
        self.range
    }

    fn set(&mut self, native: f32) {
        self.last = Some(native);
    }

    fn name(&self) -> &str {
        "null"
    }
}

// ════════════════════════════════════════════════════════════════════════════
// open_volume_backend — enumerate ports and pick one
// ════════════════════════════════════════════════════════════════════════════

/// Try to open a MIDI output port, preferring one whose name contains the
/// configured hint, then anything that looks like a synth.
/// Falls back to [`NullVolume`] with a warning if none found.
pub fn open_volume_backend(cfg: &AudioConfig) -> Box<dyn VolumeBackend> {
    let fallback = || -> Box<dyn VolumeBackend> {
        Box::new(NullVolume::new(VolumeRange::new(cfg.fallback_min_db, cfg.fallback_max_db)))
    };

    let midi_out = match midir::MidiOutput::new("gesture_control") {
        Ok(m) => m,
        Err(e) => {
            warn!("MIDI init error: {}; using null volume output", e);
            return fallback();
        }
    };

    let ports = midi_out.ports();
    if ports.is_empty() {
        warn!("no MIDI output ports found; using null volume output");
        return fallback();
    }

    let names: Vec<String> = ports
        .iter()
        .map(|p| midi_out.port_name(p).unwrap_or_else(|_| "Unknown".to_string()))
        .collect();
    let port_idx = pick_port(&names, cfg.midi_port.as_deref());
    let name = names[port_idx].clone();
    info!("opening MIDI port for volume: {}", name);

    match midi_out.connect(&ports[port_idx], "gesture-volume") {
        Ok(conn) => Box::new(MidiVolume { conn, port_name: name }),
        Err(e) => {
            warn!("failed to connect to {}: {}; using null volume output", name, e);
            fallback()
        }
    }
}

/// Index of the port to use; `names` must be non-empty.
fn pick_port(names: &[String], hint: Option<&str>) -> usize {
    const SYNTH_HINTS: [&str; 5] = ["fluid", "timidity", "microsoft", "gm", "synth"];
    let lower: Vec<String> = names.iter().map(|n| n.to_lowercase()).collect();

    if let Some(hint) = hint {
        let hint = hint.to_lowercase();
        if let Some(i) = lower.iter().position(|n| n.contains(hint.as_str())) {
            return i;
        }
        warn!("no MIDI port matching {:?}", hint);
    }

    lower
        .iter()
        .position(|n| SYNTH_HINTS.iter().any(|k| n.contains(k)))
        .unwrap_or(0)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sysex_full_and_silent() {
        assert_eq!(master_volume_sysex(16383.0), [0xF0, 0x7F, 0x7F, 0x04, 0x01, 0x7F, 0x7F, 0xF7]);
        assert_eq!(master_volume_sysex(0.0), [0xF0, 0x7F, 0x7F, 0x04, 0x01, 0x00, 0x00, 0xF7]);
    }

    #[test]
    fn sysex_splits_14_bits() {
        // 8192 = 0x2000 → lsb 0x00, msb 0x40
        assert_eq!(&master_volume_sysex(8192.0)[5..7], &[0x00, 0x40]);
        // Out-of-range values saturate.
        assert_eq!(&master_volume_sysex(-5.0)[5..7], &[0x00, 0x00]);
        assert_eq!(&master_volume_sysex(99999.0)[5..7], &[0x7F, 0x7F]);
    }

    #[test]
    fn pick_port_prefers_hint_then_synth() {
        let names: Vec<String> = ["Midi Through", "FLUID Synth (1234)", "USB Mixer"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(pick_port(&names, Some("usb")), 2);
        assert_eq!(pick_port(&names, None), 1);
        assert_eq!(pick_port(&names, Some("nothing")), 1);
        assert_eq!(pick_port(&names[..1], None), 0);
    }

    #[test]
    fn null_backend_records_last_value() {
        let mut v = NullVolume::new(VolumeRange::new(-65.25, 0.0));
        assert_eq!(v.range(), VolumeRange::new(-65.25, 0.0));
        v.set(-12.0);
        assert_eq!(v.last, Some(-12.0));
    }
}
