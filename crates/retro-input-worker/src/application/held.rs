//! HeldInput: what one input source is still holding down.
//!
//! Several sources can share a port, the mouse, and the keyboard.  When one
//! of them disconnects, only its own contribution may be undone: another
//! source's buttons must stay held and pending mouse motion must still reach
//! the next poll.  Each connection keeps a `HeldInput`, updates it after
//! every accepted frame, and hands it to
//! [`InputIntake::release`](crate::application::intake::InputIntake::release)
//! when it closes.

use retro_input_core::domain::keyboard::KEY_COUNT;
use retro_input_core::domain::retropad::AXIS_COUNT;
use retro_input_core::state::mouse::BUTTON_MASK;
use retro_input_core::wire::payload::decode_mouse_buttons;
use retro_input_core::wire::{AxisEvent, KeyEvent, KeyboardEvent};
use retro_input_core::{AnalogAxis, MAX_PORT};

use crate::application::intake::{FrameKind, InputFrame};

const KEY_WORDS: usize = (KEY_COUNT / u64::BITS) as usize;

/// Per-source record of held buttons, off-center sticks, mouse buttons,
/// keyboard keys, and the last modifier mask.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeldInput {
    buttons: [u64; MAX_PORT],
    axes: [[i16; AXIS_COUNT]; MAX_PORT],
    mouse_buttons: u8,
    keys: [u64; KEY_WORDS],
    modifiers: u16,
}

impl HeldInput {
    /// Folds an accepted frame into the record.
    ///
    /// Frames that do not decode are ignored; the intake has already rejected
    /// them.  Mouse motion is not recorded: it is drained by the poll and is
    /// never undone.
    pub fn record(&mut self, frame: &InputFrame) {
        let port = usize::from(frame.port);
        let payload = frame.payload.as_slice();
        match frame.kind {
            FrameKind::Key => {
                let held = self.buttons.get_mut(port);
                if let (Ok(event), Some(held)) = (KeyEvent::decode(payload), held) {
                    let bit = 1u64 << event.button;
                    if event.pressed {
                        *held |= bit;
                    } else {
                        *held &= !bit;
                    }
                }
            }
            FrameKind::Axis => {
                let axes = self.axes.get_mut(port);
                if let (Ok(event), Some(axes)) = (AxisEvent::decode(payload), axes) {
                    axes[event.axis.slot()] = event.value;
                }
            }
            FrameKind::MouseMove => {}
            FrameKind::MouseButtons => {
                if let Ok(mask) = decode_mouse_buttons(payload) {
                    self.mouse_buttons = mask & BUTTON_MASK;
                }
            }
            FrameKind::Keyboard => {
                if let Ok(event) = KeyboardEvent::decode(payload) {
                    let word = (event.key / u64::BITS) as usize;
                    let bit = 1u64 << (event.key % u64::BITS);
                    if event.pressed {
                        self.keys[word] |= bit;
                    } else {
                        self.keys[word] &= !bit;
                    }
                    self.modifiers = event.modifiers;
                }
            }
        }
    }

    /// True when there is nothing to release.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// `(port, mask)` for every port where this source holds a button.
    pub fn held_buttons(&self) -> impl Iterator<Item = (usize, u64)> + '_ {
        self.buttons
            .iter()
            .enumerate()
            .filter(|(_, mask)| **mask != 0)
            .map(|(port, mask)| (port, *mask))
    }

    /// `(port, axis, value)` for every stick this source left off center.
    pub fn off_center_axes(&self) -> impl Iterator<Item = (usize, AnalogAxis, i16)> + '_ {
        self.axes.iter().enumerate().flat_map(|(port, axes)| {
            AnalogAxis::ALL
                .into_iter()
                .map(move |axis| (port, axis, axes[axis.slot()]))
                .filter(|(_, _, value)| *value != 0)
        })
    }

    /// Mouse buttons in the last mask this source reported.
    pub fn mouse_buttons(&self) -> u8 {
        self.mouse_buttons
    }

    /// Keyboard key codes this source holds.
    pub fn held_keys(&self) -> impl Iterator<Item = u32> + '_ {
        self.keys.iter().enumerate().flat_map(|(word, bits)| {
            (0..u64::BITS)
                .filter(move |bit| bits & (1u64 << bit) != 0)
                .map(move |bit| word as u32 * u64::BITS + bit)
        })
    }

    /// Modifier mask carried by this source's last keyboard event.
    pub fn modifiers(&self) -> u16 {
        self.modifiers
    }
}
