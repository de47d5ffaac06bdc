//! libretro keyboard constants.
//!
//! Key codes on the wire are libretro `retro_key` values (`RETROK_*`), which
//! follow SDL 1.2 numbering.  The highest defined code is below 512, so a
//! fixed 512-bit set covers every key.

/// Number of distinct key codes the keyboard state can track.
pub const KEY_COUNT: u32 = 512;

/// libretro keyboard modifier bits (`RETROKMOD_*`).
pub mod modifiers {
    pub const SHIFT: u16 = 0x01;
    pub const CTRL: u16 = 0x02;
    pub const ALT: u16 = 0x04;
    pub const META: u16 = 0x08;
    pub const NUMLOCK: u16 = 0x10;
    pub const CAPSLOCK: u16 = 0x20;
    pub const SCROLLOCK: u16 = 0x40;
}
