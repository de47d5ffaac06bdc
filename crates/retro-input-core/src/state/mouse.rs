//! Relative mouse motion accumulators and the mouse button mask.
//!
//! # Accumulate, then drain (for beginners)
//!
//! A browser can report several small mouse movements between two emulated
//! frames.  Keeping only the latest one would throw motion away, so every
//! delta is *added* to a running total.  When the core polls, it *drains*
//! the total: reads it and resets it to zero in one atomic `swap`.  Motion
//! that arrives after the swap belongs to the next frame, and motion that
//! arrived before it is reported exactly once.

use std::sync::atomic::{AtomicI32, AtomicU8, Ordering};

use crate::state::InputError;
use crate::wire::MouseDelta;

/// Left button bit in the mouse button mask.
pub const BUTTON_LEFT: u8 = 1 << 0;
/// Right button bit in the mouse button mask.
pub const BUTTON_RIGHT: u8 = 1 << 1;
/// Middle button bit in the mouse button mask.
pub const BUTTON_MIDDLE: u8 = 1 << 2;
/// All defined button bits.
pub const BUTTON_MASK: u8 = BUTTON_LEFT | BUTTON_RIGHT | BUTTON_MIDDLE;

/// Decoded mouse button state at the moment of a read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MouseButtons {
    pub left: bool,
    pub right: bool,
    pub middle: bool,
}

impl MouseButtons {
    /// Decodes the three named buttons from a mask.  Undefined bits are ignored.
    pub fn from_mask(mask: u8) -> Self {
        Self {
            left: mask & BUTTON_LEFT != 0,
            right: mask & BUTTON_RIGHT != 0,
            middle: mask & BUTTON_MIDDLE != 0,
        }
    }

    /// Packs the three buttons back into a mask.
    pub fn to_mask(self) -> u8 {
        let mut mask = 0;
        if self.left {
            mask |= BUTTON_LEFT;
        }
        if self.right {
            mask |= BUTTON_RIGHT;
        }
        if self.middle {
            mask |= BUTTON_MIDDLE;
        }
        mask
    }
}

/// Mouse state for a single pointing device.
///
/// The accumulators are 32 bits wide while each wire delta is 16 bits, so
/// tens of thousands of full-scale deltas fit between two drains.  Addition
/// wraps rather than panics if that bound is ever exceeded.
pub struct MouseState {
    dx: AtomicI32,
    dy: AtomicI32,
    buttons: AtomicU8,
}

impl MouseState {
    /// Creates a mouse with no pending motion and no buttons held.
    pub fn new() -> Self {
        Self {
            dx: AtomicI32::new(0),
            dy: AtomicI32::new(0),
            buttons: AtomicU8::new(0),
        }
    }

    /// Decodes a 4-byte motion payload and adds it to the accumulators.
    ///
    /// Addition commutes, so concurrent callers need no coordination: each
    /// `fetch_add` lands regardless of how the calls interleave.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::MalformedPayload`] for a payload shorter than
    /// 4 bytes.  Neither axis is touched in that case.
    pub fn shift_pos(&self, payload: &[u8]) -> Result<(), InputError> {
        let delta = MouseDelta::decode(payload)?;
        self.dx.fetch_add(i32::from(delta.dx), Ordering::AcqRel);
        self.dy.fetch_add(i32::from(delta.dy), Ordering::AcqRel);
        Ok(())
    }

    /// Drains the X accumulator and returns the motion since the last drain.
    pub fn pop_x(&self) -> i32 {
        self.dx.swap(0, Ordering::AcqRel)
    }

    /// Drains the Y accumulator and returns the motion since the last drain.
    pub fn pop_y(&self) -> i32 {
        self.dy.swap(0, Ordering::AcqRel)
    }

    /// Replaces the button mask.  Bits above the middle button are dropped.
    pub fn set_buttons(&self, mask: u8) {
        self.buttons.store(mask & BUTTON_MASK, Ordering::Release);
    }

    /// Returns the button state as of this read.
    pub fn buttons(&self) -> MouseButtons {
        MouseButtons::from_mask(self.buttons.load(Ordering::Acquire))
    }

    /// Clears the button bits in `mask`.  Pending motion is never touched.
    pub fn release_buttons(&self, mask: u8) {
        self.buttons.fetch_and(!mask, Ordering::AcqRel);
    }
}

impl Default for MouseState {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
