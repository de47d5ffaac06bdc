//! PollAdapter: the read side, shaped the way a libretro core asks for input.
//!
//! A libretro core calls `retro_input_state(port, device, index, id)` many
//! times per frame.  The adapter answers each query from the session's
//! atomic state.  Every query is a handful of atomic loads or swaps, so the
//! adapter never blocks the emulation thread and never logs.

use std::sync::Arc;

use retro_input_core::{AnalogAxis, InputSession, RetroPadButton, MAX_PORT};

/// libretro device classes (`RETRO_DEVICE_*`).
pub mod device {
    pub const NONE: u32 = 0;
    pub const JOYPAD: u32 = 1;
    pub const MOUSE: u32 = 2;
    pub const KEYBOARD: u32 = 3;
    pub const ANALOG: u32 = 5;
}

/// libretro mouse ids (`RETRO_DEVICE_ID_MOUSE_*`).
pub mod mouse_id {
    pub const X: u32 = 0;
    pub const Y: u32 = 1;
    pub const LEFT: u32 = 2;
    pub const RIGHT: u32 = 3;
    pub const MIDDLE: u32 = 6;
}

/// `RETRO_DEVICE_ID_JOYPAD_MASK`: query the whole joypad bitmask at once.
pub const JOYPAD_MASK: u32 = 256;

/// Everything one frame's poll pass read from the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PollFrame {
    /// Held retropad buttons per port, one bit per [`RetroPadButton`] id.
    pub buttons: [u64; MAX_PORT],
    pub mouse_dx: i32,
    pub mouse_dy: i32,
    /// Mouse button mask (bit 0 left, bit 1 right, bit 2 middle).
    pub mouse_buttons: u8,
}

impl PollFrame {
    /// True when any button is held or the mouse moved.
    pub fn has_activity(&self) -> bool {
        self.buttons.iter().any(|&b| b != 0)
            || self.mouse_dx != 0
            || self.mouse_dy != 0
            || self.mouse_buttons != 0
    }
}

/// Answers libretro input queries from an [`InputSession`].
pub struct PollAdapter {
    session: Arc<InputSession>,
}

impl PollAdapter {
    pub fn new(session: Arc<InputSession>) -> Self {
        Self { session }
    }

    /// Answers one `retro_input_state` query.
    ///
    /// Unknown devices, ids, and out-of-range ports read as 0.  `MOUSE` X and Y
    /// drain the accumulator, so each motion is reported once.
    pub fn input_state(&self, port: u32, device: u32, index: u32, id: u32) -> i16 {
        let port = port as usize;
        match device {
            device::JOYPAD => self.joypad(port, id),
            device::ANALOG => AnalogAxis::from_libretro(index, id)
                .map_or(0, |axis| self.session.keys().axis(port, axis)),
            device::MOUSE => self.mouse(id),
            device::KEYBOARD => i16::from(self.session.keyboard().is_pressed(id)),
            _ => 0,
        }
    }

    fn joypad(&self, port: usize, id: u32) -> i16 {
        let keys = self.session.keys();
        if id == JOYPAD_MASK {
            // The retropad uses the low 16 bits; the i16 return carries them as-is.
            return keys.keys(port) as u16 as i16;
        }
        i16::from(keys.is_key_pressed(port, id))
    }

    fn mouse(&self, id: u32) -> i16 {
        let mouse = self.session.mouse();
        match id {
            mouse_id::X => saturate(mouse.pop_x()),
            mouse_id::Y => saturate(mouse.pop_y()),
            mouse_id::LEFT => i16::from(mouse.buttons().left),
            mouse_id::RIGHT => i16::from(mouse.buttons().right),
            mouse_id::MIDDLE => i16::from(mouse.buttons().middle),
            _ => 0,
        }
    }

    /// Runs one full poll pass over `active_ports` ports.
    ///
    /// Reads every retropad button on every active port, then drains the
    /// mouse X and Y accumulators, then reads the mouse buttons.
    pub fn sample_frame(&self, active_ports: usize) -> PollFrame {
        let keys = self.session.keys();
        let mut frame = PollFrame::default();

        for (port, held) in frame
            .buttons
            .iter_mut()
            .enumerate()
            .take(active_ports.min(MAX_PORT))
        {
            for button in RetroPadButton::ALL {
                if keys.is_key_pressed(port, u32::from(button.id())) {
                    *held |= button.mask();
                }
            }
        }

        let mouse = self.session.mouse();
        frame.mouse_dx = mouse.pop_x();
        frame.mouse_dy = mouse.pop_y();
        frame.mouse_buttons = mouse.buttons().to_mask();
        frame
    }
}

fn saturate(v: i32) -> i16 {
    v.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16
}
