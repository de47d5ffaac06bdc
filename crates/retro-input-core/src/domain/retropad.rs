//! RetroPad button and analog axis identifiers.
//!
//! The RetroPad is libretro's abstract controller: a SNES-style pad with
//! shoulder, trigger and stick-click buttons, plus two analog sticks.  A
//! button's id is also its bit position in the per-port key bitmask.

/// Width of the per-port key bitmask in bits.
///
/// Only the first sixteen bits have named RetroPad buttons, but any index in
/// `0..KEY_BITMASK_WIDTH` is a valid wire button so cores with extra inputs
/// can still be driven.
pub const KEY_BITMASK_WIDTH: u8 = 64;

/// Number of analog axes tracked per port.
pub const AXIS_COUNT: usize = 4;

/// A named RetroPad button.  The discriminant is the libretro joypad id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RetroPadButton {
    B = 0,
    Y = 1,
    Select = 2,
    Start = 3,
    Up = 4,
    Down = 5,
    Left = 6,
    Right = 7,
    A = 8,
    X = 9,
    L = 10,
    R = 11,
    L2 = 12,
    R2 = 13,
    L3 = 14,
    R3 = 15,
}

impl RetroPadButton {
    /// All named buttons in id order.
    pub const ALL: [RetroPadButton; 16] = [
        RetroPadButton::B,
        RetroPadButton::Y,
        RetroPadButton::Select,
        RetroPadButton::Start,
        RetroPadButton::Up,
        RetroPadButton::Down,
        RetroPadButton::Left,
        RetroPadButton::Right,
        RetroPadButton::A,
        RetroPadButton::X,
        RetroPadButton::L,
        RetroPadButton::R,
        RetroPadButton::L2,
        RetroPadButton::R2,
        RetroPadButton::L3,
        RetroPadButton::R3,
    ];

    /// The libretro joypad id, which is also the bit index.
    pub fn id(self) -> u8 {
        self as u8
    }

    /// The single-bit mask for this button.
    pub fn mask(self) -> u64 {
        1u64 << self.id()
    }
}

impl TryFrom<u8> for RetroPadButton {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        RetroPadButton::ALL
            .get(usize::from(value))
            .copied()
            .ok_or(())
    }
}

/// One analog stick axis.  The discriminant is the slot in the per-port axis array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum AnalogAxis {
    LeftX = 0,
    LeftY = 1,
    RightX = 2,
    RightY = 3,
}

impl AnalogAxis {
    /// All axes in slot order.
    pub const ALL: [AnalogAxis; AXIS_COUNT] = [
        AnalogAxis::LeftX,
        AnalogAxis::LeftY,
        AnalogAxis::RightX,
        AnalogAxis::RightY,
    ];

    /// Maps a libretro analog `(index, id)` pair to an axis.
    ///
    /// libretro addresses sticks by index (0 = left, 1 = right) and the axis
    /// within the stick by id (0 = X, 1 = Y).
    pub fn from_libretro(index: u32, id: u32) -> Option<Self> {
        match (index, id) {
            (0, 0) => Some(AnalogAxis::LeftX),
            (0, 1) => Some(AnalogAxis::LeftY),
            (1, 0) => Some(AnalogAxis::RightX),
            (1, 1) => Some(AnalogAxis::RightY),
            _ => None,
        }
    }

    /// Slot of this axis in the per-port axis array.
    pub fn slot(self) -> usize {
        self as usize
    }
}

impl TryFrom<u8> for AnalogAxis {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(AnalogAxis::LeftX),
            1 => Ok(AnalogAxis::LeftY),
            2 => Ok(AnalogAxis::RightX),
            3 => Ok(AnalogAxis::RightY),
            _ => Err(()),
        }
    }
}
