//! Binary layouts for single input events.
//!
//! Wire formats (all multi-byte integers are big-endian):
//! ```text
//! key event      [button:1][state:1]                    2 bytes
//! mouse delta    [dx:i16][dy:i16]                       4 bytes
//! mouse buttons  [mask:1]                               1 byte
//! axis event     [axis:1][value:i16]                    3 bytes
//! keyboard       [key:u32][state:1][modifiers:u16]      7 bytes
//! ```
//! `state` is `0x00` for released and `0x01` for pressed.  Any other value is
//! rejected.  Bytes past the fixed length are ignored.
//!
//! Decoding validates every field before it returns, so a caller either gets
//! a complete event or an error and never a half-applied update.

use thiserror::Error;

use crate::domain::keyboard::KEY_COUNT;
use crate::domain::retropad::{AnalogAxis, KEY_BITMASK_WIDTH};

/// Length of an encoded [`KeyEvent`].
pub const KEY_EVENT_LEN: usize = 2;
/// Length of an encoded [`MouseDelta`].
pub const MOUSE_DELTA_LEN: usize = 4;
/// Length of an encoded mouse button mask.
pub const MOUSE_BUTTONS_LEN: usize = 1;
/// Length of an encoded [`AxisEvent`].
pub const AXIS_EVENT_LEN: usize = 3;
/// Length of an encoded [`KeyboardEvent`].
pub const KEYBOARD_EVENT_LEN: usize = 7;

const STATE_RELEASED: u8 = 0x00;
const STATE_PRESSED: u8 = 0x01;

/// Errors that can occur while decoding an input payload.
#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum WireError {
    /// The payload is shorter than the fixed layout requires.
    #[error("insufficient data: need at least {needed} bytes, got {available}")]
    InsufficientData { needed: usize, available: usize },

    /// The button index does not fit in the key bitmask.
    #[error("button index {0} out of range")]
    ButtonOutOfRange(u8),

    /// The press-state byte is neither released (0) nor pressed (1).
    #[error("invalid press state: 0x{0:02X}")]
    InvalidPressState(u8),

    /// The axis byte does not name one of the four analog axes.
    #[error("axis index {0} out of range")]
    AxisOutOfRange(u8),

    /// The keyboard key code is beyond the tracked key set.
    #[error("key code {0} out of range")]
    KeyOutOfRange(u32),
}

// ── Event types ───────────────────────────────────────────────────────────────

/// A single retropad button press or release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// Bit index in the port's key bitmask, `0..64`.
    pub button: u8,
    /// `true` for press, `false` for release.
    pub pressed: bool,
}

impl KeyEvent {
    /// Decodes a key event from the start of `payload`.
    ///
    /// # Errors
    ///
    /// Returns [`WireError`] if the payload is too short, the button index is
    /// out of range, or the state byte is not `0` or `1`.
    pub fn decode(payload: &[u8]) -> Result<Self, WireError> {
        require_len(payload, KEY_EVENT_LEN)?;
        let button = payload[0];
        if button >= KEY_BITMASK_WIDTH {
            return Err(WireError::ButtonOutOfRange(button));
        }
        let pressed = decode_state(payload[1])?;
        Ok(Self { button, pressed })
    }

    /// Encodes this event into its 2-byte wire form.
    pub fn encode(&self) -> [u8; KEY_EVENT_LEN] {
        [self.button, encode_state(self.pressed)]
    }
}

/// Relative pointer motion since the previous mouse event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseDelta {
    pub dx: i16,
    pub dy: i16,
}

impl MouseDelta {
    /// Decodes `(dx, dy)` as two big-endian two's-complement `i16` values.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::InsufficientData`] if fewer than 4 bytes are given.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use retro_input_core::wire::MouseDelta;
    ///
    /// let delta = MouseDelta::decode(&[0x04, 0x57, 0x08, 0xAE]).unwrap();
    /// assert_eq!((delta.dx, delta.dy), (1111, 2222));
    /// ```
    pub fn decode(payload: &[u8]) -> Result<Self, WireError> {
        require_len(payload, MOUSE_DELTA_LEN)?;
        Ok(Self {
            dx: i16::from_be_bytes([payload[0], payload[1]]),
            dy: i16::from_be_bytes([payload[2], payload[3]]),
        })
    }

    /// Encodes this delta into its 4-byte wire form.
    pub fn encode(&self) -> [u8; MOUSE_DELTA_LEN] {
        let [x0, x1] = self.dx.to_be_bytes();
        let [y0, y1] = self.dy.to_be_bytes();
        [x0, x1, y0, y1]
    }
}

/// An absolute analog stick position for one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisEvent {
    pub axis: AnalogAxis,
    pub value: i16,
}

impl AxisEvent {
    /// Decodes an axis event from the start of `payload`.
    ///
    /// # Errors
    ///
    /// Returns [`WireError`] if the payload is too short or the axis byte is
    /// not `0..4`.
    pub fn decode(payload: &[u8]) -> Result<Self, WireError> {
        require_len(payload, AXIS_EVENT_LEN)?;
        let axis =
            AnalogAxis::try_from(payload[0]).map_err(|_| WireError::AxisOutOfRange(payload[0]))?;
        let value = i16::from_be_bytes([payload[1], payload[2]]);
        Ok(Self { axis, value })
    }

    /// Encodes this event into its 3-byte wire form.
    pub fn encode(&self) -> [u8; AXIS_EVENT_LEN] {
        let [v0, v1] = self.value.to_be_bytes();
        [self.axis as u8, v0, v1]
    }
}

/// A keyboard key press or release together with the active modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyboardEvent {
    /// libretro key code (`RETROK_*`).
    pub key: u32,
    pub pressed: bool,
    /// libretro modifier mask (`RETROKMOD_*`) at the time of the event.
    pub modifiers: u16,
}

impl KeyboardEvent {
    /// Decodes a keyboard event from the start of `payload`.
    ///
    /// # Errors
    ///
    /// Returns [`WireError`] if the payload is too short, the key code is not
    /// below [`KEY_COUNT`], or the state byte is not `0` or `1`.
    pub fn decode(payload: &[u8]) -> Result<Self, WireError> {
        require_len(payload, KEYBOARD_EVENT_LEN)?;
        let key = u32::from_be_bytes([payload[0], payload[1], payload[2], payload[3]]);
        if key >= KEY_COUNT {
            return Err(WireError::KeyOutOfRange(key));
        }
        let pressed = decode_state(payload[4])?;
        let modifiers = u16::from_be_bytes([payload[5], payload[6]]);
        Ok(Self {
            key,
            pressed,
            modifiers,
        })
    }

    /// Encodes this event into its 7-byte wire form.
    pub fn encode(&self) -> [u8; KEYBOARD_EVENT_LEN] {
        let [k0, k1, k2, k3] = self.key.to_be_bytes();
        let [m0, m1] = self.modifiers.to_be_bytes();
        [k0, k1, k2, k3, encode_state(self.pressed), m0, m1]
    }
}

/// Decodes a 1-byte mouse button mask.
///
/// # Errors
///
/// Returns [`WireError::InsufficientData`] for an empty payload.
pub fn decode_mouse_buttons(payload: &[u8]) -> Result<u8, WireError> {
    require_len(payload, MOUSE_BUTTONS_LEN)?;
    Ok(payload[0])
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn require_len(payload: &[u8], needed: usize) -> Result<(), WireError> {
    if payload.len() < needed {
        return Err(WireError::InsufficientData {
            needed,
            available: payload.len(),
        });
    }
    Ok(())
}

fn decode_state(byte: u8) -> Result<bool, WireError> {
    match byte {
        STATE_RELEASED => Ok(false),
        STATE_PRESSED => Ok(true),
        other => Err(WireError::InvalidPressState(other)),
    }
}

fn encode_state(pressed: bool) -> u8 {
    if pressed {
        STATE_PRESSED
    } else {
        STATE_RELEASED
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── Key events ────────────────────────────────────────────────────────────

    #[test]
    fn test_key_event_decodes_button_and_press() {
        // Arrange
        let payload = [0x08, 0x01];

        // Act
        let event = KeyEvent::decode(&payload).unwrap();

        // Assert
        assert_eq!(
            event,
            KeyEvent {
                button: 8,
                pressed: true
            }
        );
    }

    #[test]
    fn test_key_event_decodes_release() {
        let event = KeyEvent::decode(&[0x03, 0x00]).unwrap();
        assert!(!event.pressed);
        assert_eq!(event.button, 3);
    }

    #[test]
    fn test_key_event_rejects_short_payload() {
        assert_eq!(
            KeyEvent::decode(&[0x01]),
            Err(WireError::InsufficientData {
                needed: 2,
                available: 1
            })
        );
        assert!(KeyEvent::decode(&[]).is_err());
    }

    #[test]
    fn test_key_event_rejects_button_beyond_bitmask() {
        assert_eq!(
            KeyEvent::decode(&[64, 0x01]),
            Err(WireError::ButtonOutOfRange(64))
        );
        // The highest bit is still valid.
        assert!(KeyEvent::decode(&[63, 0x01]).is_ok());
    }

    #[test]
    fn test_key_event_rejects_unknown_state_byte() {
        assert_eq!(
            KeyEvent::decode(&[0x00, 0x02]),
            Err(WireError::InvalidPressState(0x02))
        );
    }

    #[test]
    fn test_key_event_ignores_trailing_bytes() {
        let event = KeyEvent::decode(&[0x05, 0x01, 0xFF, 0xFF]).unwrap();
        assert_eq!(event.button, 5);
    }

    // ── Mouse deltas ──────────────────────────────────────────────────────────

    #[test]
    fn test_mouse_delta_decodes_big_endian_pair() {
        // Arrange: 1111 = 0x0457, 2222 = 0x08AE
        let payload = [0x04, 0x57, 0x08, 0xAE];

        // Act
        let delta = MouseDelta::decode(&payload).unwrap();

        // Assert
        assert_eq!(delta, MouseDelta { dx: 1111, dy: 2222 });
    }

    #[test]
    fn test_mouse_delta_decodes_negative_values() {
        // 0xFFFF = -1, 0x8000 = i16::MIN
        let delta = MouseDelta::decode(&[0xFF, 0xFF, 0x80, 0x00]).unwrap();
        assert_eq!(delta.dx, -1);
        assert_eq!(delta.dy, i16::MIN);
    }

    #[test]
    fn test_mouse_delta_rejects_three_bytes() {
        assert_eq!(
            MouseDelta::decode(&[0x00, 0x01, 0x00]),
            Err(WireError::InsufficientData {
                needed: 4,
                available: 3
            })
        );
    }

    #[test]
    fn test_mouse_delta_encode_matches_documented_bytes() {
        let bytes = MouseDelta { dx: 1111, dy: 2222 }.encode();
        assert_eq!(bytes, [0x04, 0x57, 0x08, 0xAE]);
    }

    // ── Mouse buttons ─────────────────────────────────────────────────────────

    #[test]
    fn test_mouse_buttons_returns_first_byte() {
        assert_eq!(decode_mouse_buttons(&[0x05]), Ok(0x05));
        assert!(decode_mouse_buttons(&[]).is_err());
    }

    // ── Axis events ───────────────────────────────────────────────────────────

    #[test]
    fn test_axis_event_decodes_axis_and_value() {
        let event = AxisEvent::decode(&[0x02, 0x80, 0x01]).unwrap();
        assert_eq!(event.axis, AnalogAxis::RightX);
        assert_eq!(event.value, -32767);
    }

    #[test]
    fn test_axis_event_rejects_unknown_axis() {
        assert_eq!(
            AxisEvent::decode(&[0x04, 0x00, 0x00]),
            Err(WireError::AxisOutOfRange(4))
        );
    }

    #[test]
    fn test_axis_event_encode_decode_agree() {
        let original = AxisEvent {
            axis: AnalogAxis::LeftY,
            value: 12345,
        };
        assert_eq!(AxisEvent::decode(&original.encode()), Ok(original));
    }

    // ── Keyboard events ───────────────────────────────────────────────────────

    #[test]
    fn test_keyboard_event_decodes_all_fields() {
        // Arrange: key 97 ('a'), pressed, Shift|Ctrl
        let payload = [0x00, 0x00, 0x00, 0x61, 0x01, 0x00, 0x03];

        // Act
        let event = KeyboardEvent::decode(&payload).unwrap();

        // Assert
        assert_eq!(event.key, 97);
        assert!(event.pressed);
        assert_eq!(event.modifiers, 0x03);
    }

    #[test]
    fn test_keyboard_event_rejects_key_outside_set() {
        let payload = [0x00, 0x00, 0x02, 0x00, 0x01, 0x00, 0x00];
        assert_eq!(
            KeyboardEvent::decode(&payload),
            Err(WireError::KeyOutOfRange(512))
        );
    }

    #[test]
    fn test_keyboard_event_rejects_short_payload() {
        assert!(matches!(
            KeyboardEvent::decode(&[0x00, 0x00, 0x00, 0x61, 0x01, 0x00]),
            Err(WireError::InsufficientData { needed: 7, .. })
        ));
    }
}
