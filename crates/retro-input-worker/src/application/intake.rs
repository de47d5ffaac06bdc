//! InputIntake: routes network input frames into the session's input state.
//!
//! This use case sits between the TCP connection tasks and the lock-free
//! state.  It delegates every write to an [`InputSink`] trait object so the
//! routing rules can be tested without a real session.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use retro_input_core::wire::payload::decode_mouse_buttons;
use retro_input_core::{InputError, InputSession};
use tracing::debug;

use crate::application::held::HeldInput;

// ── Frames ────────────────────────────────────────────────────────────────────

/// Kind byte of an input frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum FrameKind {
    Key = 0x01,
    MouseMove = 0x02,
    MouseButtons = 0x03,
    Axis = 0x04,
    Keyboard = 0x05,
}

impl TryFrom<u8> for FrameKind {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x01 => Ok(FrameKind::Key),
            0x02 => Ok(FrameKind::MouseMove),
            0x03 => Ok(FrameKind::MouseButtons),
            0x04 => Ok(FrameKind::Axis),
            0x05 => Ok(FrameKind::Keyboard),
            _ => Err(()),
        }
    }
}

/// One input event as delivered by a network connection.
///
/// `port` is only meaningful for [`FrameKind::Key`] and [`FrameKind::Axis`];
/// the mouse and keyboard are shared by the whole session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFrame {
    pub kind: FrameKind,
    pub port: u8,
    pub payload: Vec<u8>,
}

// ── Sink seam ─────────────────────────────────────────────────────────────────

/// Write side of the input state.
///
/// Implemented for [`InputSession`]; mocked in tests.
#[cfg_attr(test, mockall::automock)]
pub trait InputSink: Send + Sync {
    /// Applies a key event payload to a player port.
    fn key(&self, port: usize, payload: &[u8]) -> Result<(), InputError>;

    /// Applies an analog axis payload to a player port.
    fn axis(&self, port: usize, payload: &[u8]) -> Result<(), InputError>;

    /// Adds a relative motion payload to the mouse accumulators.
    fn mouse_move(&self, payload: &[u8]) -> Result<(), InputError>;

    /// Replaces the mouse button mask with the one in the payload.
    fn mouse_buttons(&self, payload: &[u8]) -> Result<(), InputError>;

    /// Applies a keyboard key payload.
    fn keyboard(&self, payload: &[u8]) -> Result<(), InputError>;

    /// Undoes what one input source is still holding.
    ///
    /// Only the bits in `held` are cleared.  A stick or modifier mask is reset
    /// only while it still carries the value that source wrote.  Pending mouse
    /// motion is never touched.
    fn release(&self, held: &HeldInput);
}

impl InputSink for InputSession {
    fn key(&self, port: usize, payload: &[u8]) -> Result<(), InputError> {
        self.keys().input(port, payload)
    }

    fn axis(&self, port: usize, payload: &[u8]) -> Result<(), InputError> {
        self.keys().set_axis(port, payload)
    }

    fn mouse_move(&self, payload: &[u8]) -> Result<(), InputError> {
        self.mouse().shift_pos(payload)
    }

    fn mouse_buttons(&self, payload: &[u8]) -> Result<(), InputError> {
        let mask = decode_mouse_buttons(payload)?;
        self.mouse().set_buttons(mask);
        Ok(())
    }

    fn keyboard(&self, payload: &[u8]) -> Result<(), InputError> {
        self.keyboard().press(payload)
    }

    fn release(&self, held: &HeldInput) {
        for (port, mask) in held.held_buttons() {
            self.keys().release_mask(port, mask);
        }
        for (port, axis, value) in held.off_center_axes() {
            self.keys().center_axis_if(port, axis, value);
        }
        if held.mouse_buttons() != 0 {
            self.mouse().release_buttons(held.mouse_buttons());
        }
        for key in held.held_keys() {
            self.keyboard().release_key(key);
        }
        if held.modifiers() != 0 {
            self.keyboard().clear_modifiers_if(held.modifiers());
        }
    }
}

// ── Statistics ────────────────────────────────────────────────────────────────

/// Counters of accepted and rejected frames.
///
/// Relaxed atomics: the counts are diagnostics, not synchronisation.
#[derive(Debug, Default)]
pub struct IntakeStats {
    accepted: AtomicU64,
    rejected: AtomicU64,
}

/// Point-in-time copy of [`IntakeStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IntakeSnapshot {
    pub accepted: u64,
    pub rejected: u64,
}

impl IntakeStats {
    pub fn snapshot(&self) -> IntakeSnapshot {
        IntakeSnapshot {
            accepted: self.accepted.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
        }
    }

    fn record(&self, result: &Result<(), InputError>) {
        let counter = if result.is_ok() {
            &self.accepted
        } else {
            &self.rejected
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

// ── Use case ──────────────────────────────────────────────────────────────────

/// The input intake use case.
///
/// Shared by every connection task through an `Arc`.  All methods take
/// `&self`; the sink and the counters are both safe for concurrent use.
pub struct InputIntake {
    sink: Arc<dyn InputSink>,
    stats: IntakeStats,
}

impl InputIntake {
    /// Creates an intake writing into `sink`.
    pub fn new(sink: Arc<dyn InputSink>) -> Self {
        Self {
            sink,
            stats: IntakeStats::default(),
        }
    }

    /// Routes one frame to the matching sink operation.
    ///
    /// A rejected frame is logged at `debug` and counted, then returned to
    /// the caller as an error.  It has no effect on the input state.
    ///
    /// # Errors
    ///
    /// Returns the [`InputError`] produced by the sink.
    pub fn dispatch(&self, frame: &InputFrame) -> Result<(), InputError> {
        let port = usize::from(frame.port);
        let payload = frame.payload.as_slice();
        let result = match frame.kind {
            FrameKind::Key => self.sink.key(port, payload),
            FrameKind::Axis => self.sink.axis(port, payload),
            FrameKind::MouseMove => self.sink.mouse_move(payload),
            FrameKind::MouseButtons => self.sink.mouse_buttons(payload),
            FrameKind::Keyboard => self.sink.keyboard(payload),
        };
        if let Err(e) = &result {
            debug!(kind = ?frame.kind, port, "input frame rejected: {e}");
        }
        self.stats.record(&result);
        result
    }

    /// Releases what a departing input source was holding.
    ///
    /// Does nothing when `held` is empty.
    pub fn release(&self, held: &HeldInput) {
        if held.is_empty() {
            return;
        }
        debug!(
            ports = held.held_buttons().count(),
            mouse = held.mouse_buttons(),
            keys = held.held_keys().count(),
            "releasing held input"
        );
        self.sink.release(held);
    }

    /// Accepted/rejected counters.
    pub fn stats(&self) -> &IntakeStats {
        &self.stats
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
