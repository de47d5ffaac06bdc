//! Per-port retropad button bitmasks and analog stick axes.

use std::sync::atomic::{AtomicI16, AtomicU64, Ordering};

use crate::domain::retropad::{AnalogAxis, AXIS_COUNT, KEY_BITMASK_WIDTH};
use crate::domain::MAX_PORT;
use crate::state::{check_port, InputError};
use crate::wire::{AxisEvent, KeyEvent};

/// Button and stick state for every player port.
///
/// Each port owns one `AtomicU64` whose bit `i` means "retropad button `i`
/// is held", plus four `AtomicI16` stick axes.  Ports never share a word, so
/// updates on different ports cannot interfere.
///
/// Button updates are per-event: a key event sets or clears exactly one bit
/// and leaves every other bit alone.  Network clients report independent
/// key-down and key-up notifications, not full controller snapshots.
///
/// # Examples
///
/// ```rust
/// use retro_input_core::{InputState, RetroPadButton};
///
/// let state = InputState::new();
/// state.input(0, &[RetroPadButton::A.id(), 1]).unwrap();
/// assert!(state.is_key_pressed(0, RetroPadButton::A.id().into()));
/// assert!(!state.is_key_pressed(1, RetroPadButton::A.id().into()));
/// ```
pub struct InputState {
    keys: [AtomicU64; MAX_PORT],
    axes: [[AtomicI16; AXIS_COUNT]; MAX_PORT],
}

impl InputState {
    /// Creates a state with no buttons held and every stick centered.
    pub fn new() -> Self {
        Self {
            keys: std::array::from_fn(|_| AtomicU64::new(0)),
            axes: std::array::from_fn(|_| std::array::from_fn(|_| AtomicI16::new(0))),
        }
    }

    /// Applies a key event payload to `port`.
    ///
    /// The port is checked and the payload fully decoded before anything is
    /// written, so a rejected call has no effect.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::InvalidPort`] for a port outside `0..MAX_PORT`,
    /// or [`InputError::MalformedPayload`] if the payload does not decode.
    pub fn input(&self, port: usize, payload: &[u8]) -> Result<(), InputError> {
        let port = check_port(port)?;
        let event = KeyEvent::decode(payload)?;
        self.apply_key(port, event);
        Ok(())
    }

    /// Sets or clears one bit of `port`'s bitmask.
    ///
    /// `fetch_or` / `fetch_and` are single atomic instructions, so two writers
    /// changing different bits of the same port at the same time both land.
    fn apply_key(&self, port: usize, event: KeyEvent) {
        let mask = 1u64 << event.button;
        if event.pressed {
            self.keys[port].fetch_or(mask, Ordering::AcqRel);
        } else {
            self.keys[port].fetch_and(!mask, Ordering::AcqRel);
        }
    }

    /// Returns whether `button` is held on `port`.
    ///
    /// Out-of-range ports and buttons report "not pressed" so the poll
    /// callback can query any id the core defines.
    pub fn is_key_pressed(&self, port: usize, button: u32) -> bool {
        if button >= u32::from(KEY_BITMASK_WIDTH) {
            return false;
        }
        self.keys(port) & (1u64 << button) != 0
    }

    /// Returns the whole button bitmask for `port`, or 0 for an invalid port.
    pub fn keys(&self, port: usize) -> u64 {
        self.keys
            .get(port)
            .map_or(0, |word| word.load(Ordering::Acquire))
    }

    /// Applies an analog axis payload to `port`.
    ///
    /// Each event replaces the axis value: sticks report where they are, not
    /// how far they moved.
    ///
    /// # Errors
    ///
    /// Same policy as [`InputState::input`].
    pub fn set_axis(&self, port: usize, payload: &[u8]) -> Result<(), InputError> {
        let port = check_port(port)?;
        let event = AxisEvent::decode(payload)?;
        self.axes[port][event.axis.slot()].store(event.value, Ordering::Release);
        Ok(())
    }

    /// Returns the current value of `axis` on `port`, or 0 for an invalid port.
    pub fn axis(&self, port: usize, axis: AnalogAxis) -> i16 {
        self.axes
            .get(port)
            .map_or(0, |axes| axes[axis.slot()].load(Ordering::Acquire))
    }

    /// Clears the buttons in `mask` on `port` and leaves every other bit alone.
    ///
    /// Used when an input source goes away: it lets go of what it still
    /// holds, so presses from other sources on the same port survive.
    /// Invalid ports are ignored.
    pub fn release_mask(&self, port: usize, mask: u64) {
        if let Some(word) = self.keys.get(port) {
            word.fetch_and(!mask, Ordering::AcqRel);
        }
    }

    /// Re-centers `axis` on `port` only if it still reads `expected`.
    ///
    /// One compare-exchange: if another source has moved the stick since,
    /// its value stays.  Returns whether the axis was centered.
    pub fn center_axis_if(&self, port: usize, axis: AnalogAxis, expected: i16) -> bool {
        self.axes.get(port).is_some_and(|axes| {
            axes[axis.slot()]
                .compare_exchange(expected, 0, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
        })
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::retropad::RetroPadButton;
    use crate::wire::WireError;
    use std::sync::Arc;
    use std::thread;

    fn press(button: u8) -> [u8; 2] {
        [button, 1]
    }

    fn release(button: u8) -> [u8; 2] {
        [button, 0]
    }

    #[test]
    fn test_new_state_has_no_buttons_held() {
        let state = InputState::new();
        for port in 0..MAX_PORT {
            assert_eq!(state.keys(port), 0);
        }
    }

    #[test]
    fn test_input_press_sets_single_bit() {
        // Arrange
        let state = InputState::new();

        // Act
        state.input(1, &press(RetroPadButton::Start.id())).unwrap();

        // Assert
        assert!(state.is_key_pressed(1, 3));
        assert_eq!(state.keys(1), RetroPadButton::Start.mask());
        assert_eq!(state.keys(0), 0, "other ports must be untouched");
    }

    #[test]
    fn test_input_release_clears_only_that_bit() {
        // Arrange
        let state = InputState::new();
        state.input(0, &press(0)).unwrap();
        state.input(0, &press(8)).unwrap();

        // Act
        state.input(0, &release(0)).unwrap();

        // Assert
        assert!(!state.is_key_pressed(0, 0));
        assert!(state.is_key_pressed(0, 8));
    }

    /// Button updates are per-event set/clear rather than full-state
    /// snapshots.  If a snapshot encoding is ever introduced this test will
    /// need revisiting.
    #[test]
    fn test_input_is_per_button_not_snapshot() {
        let state = InputState::new();
        state.input(0, &press(4)).unwrap();

        // An event for a different button must not clear button 4.
        state.input(0, &press(5)).unwrap();
        state.input(0, &release(6)).unwrap();

        assert!(state.is_key_pressed(0, 4));
        assert!(state.is_key_pressed(0, 5));
        assert!(!state.is_key_pressed(0, 6));
    }

    #[test]
    fn test_input_press_is_idempotent() {
        let state = InputState::new();
        state.input(2, &press(9)).unwrap();
        state.input(2, &press(9)).unwrap();
        assert_eq!(state.keys(2), 1 << 9);
    }

    #[test]
    fn test_input_highest_bit_is_addressable() {
        let state = InputState::new();
        state.input(0, &press(63)).unwrap();
        assert!(state.is_key_pressed(0, 63));
        assert_eq!(state.keys(0), 1u64 << 63);
    }

    #[test]
    fn test_input_rejects_invalid_port_without_side_effects() {
        // Arrange
        let state = InputState::new();
        state.input(0, &press(1)).unwrap();

        // Act
        let result = state.input(MAX_PORT, &press(2));

        // Assert
        assert_eq!(
            result,
            Err(InputError::InvalidPort {
                port: MAX_PORT,
                max_port: MAX_PORT
            })
        );
        for port in 0..MAX_PORT {
            let expected = if port == 0 { 1 << 1 } else { 0 };
            assert_eq!(state.keys(port), expected);
        }
        assert!(state.input(usize::MAX, &press(2)).is_err());
    }

    #[test]
    fn test_input_rejects_truncated_payload_without_side_effects() {
        let state = InputState::new();
        state.input(0, &press(7)).unwrap();

        let result = state.input(0, &[7]);

        assert_eq!(
            result,
            Err(InputError::MalformedPayload(WireError::InsufficientData {
                needed: 2,
                available: 1
            }))
        );
        assert!(state.is_key_pressed(0, 7), "state must be unchanged");
    }

    #[test]
    fn test_input_rejects_bad_state_byte_without_side_effects() {
        let state = InputState::new();
        state.input(0, &press(7)).unwrap();

        assert!(state.input(0, &[7, 0xFF]).is_err());

        assert!(state.is_key_pressed(0, 7));
    }

    #[test]
    fn test_is_key_pressed_out_of_range_returns_false() {
        let state = InputState::new();
        state.input(0, &press(0)).unwrap();

        assert!(!state.is_key_pressed(0, 64));
        assert!(!state.is_key_pressed(0, 100));
        assert!(!state.is_key_pressed(0, u32::MAX));
        assert!(!state.is_key_pressed(MAX_PORT, 0));
        assert!(!state.is_key_pressed(usize::MAX, 0));
    }

    #[test]
    fn test_set_axis_replaces_value() {
        // Arrange
        let state = InputState::new();
        let first = AxisEvent {
            axis: AnalogAxis::LeftX,
            value: 1000,
        };
        let second = AxisEvent {
            axis: AnalogAxis::LeftX,
            value: -250,
        };

        // Act
        state.set_axis(0, &first.encode()).unwrap();
        state.set_axis(0, &second.encode()).unwrap();

        // Assert
        assert_eq!(state.axis(0, AnalogAxis::LeftX), -250);
        assert_eq!(state.axis(0, AnalogAxis::LeftY), 0);
    }

    #[test]
    fn test_set_axis_rejects_invalid_port_and_payload() {
        let state = InputState::new();
        let payload = AxisEvent {
            axis: AnalogAxis::RightY,
            value: 5,
        }
        .encode();

        assert!(state.set_axis(MAX_PORT, &payload).is_err());
        assert!(state.set_axis(0, &payload[..2]).is_err());
        assert_eq!(state.axis(0, AnalogAxis::RightY), 0);
        assert_eq!(state.axis(MAX_PORT, AnalogAxis::RightY), 0);
    }

    #[test]
    fn test_release_mask_clears_only_masked_bits() {
        // Arrange
        let state = InputState::new();
        state.input(0, &press(1)).unwrap();
        state.input(0, &press(5)).unwrap();
        state.input(1, &press(1)).unwrap();

        // Act
        state.release_mask(0, 1 << 1);
        state.release_mask(MAX_PORT, u64::MAX);

        // Assert
        assert_eq!(state.keys(0), 1 << 5, "unmasked bits survive");
        assert!(state.is_key_pressed(1, 1), "other ports keep their state");
    }

    #[test]
    fn test_center_axis_if_only_when_value_unchanged() {
        // Arrange
        let state = InputState::new();
        let at = |value| {
            AxisEvent {
                axis: AnalogAxis::RightX,
                value,
            }
            .encode()
        };
        state.set_axis(0, &at(900)).unwrap();

        // Act / Assert: a stale expectation leaves the axis alone
        assert!(!state.center_axis_if(0, AnalogAxis::RightX, 400));
        assert_eq!(state.axis(0, AnalogAxis::RightX), 900);

        assert!(state.center_axis_if(0, AnalogAxis::RightX, 900));
        assert_eq!(state.axis(0, AnalogAxis::RightX), 0);

        assert!(!state.center_axis_if(MAX_PORT, AnalogAxis::RightX, 0));
    }

    #[test]
    fn test_concurrent_presses_on_one_port_are_not_lost() {
        // Arrange: 64 threads each press a different bit of port 3
        let state = Arc::new(InputState::new());

        // Act
        let handles: Vec<_> = (0..KEY_BITMASK_WIDTH)
            .map(|bit| {
                let s = Arc::clone(&state);
                thread::spawn(move || s.input(3, &press(bit)).expect("valid input"))
            })
            .collect();
        for h in handles {
            h.join().expect("thread panicked");
        }

        // Assert
        assert_eq!(state.keys(3), u64::MAX);
    }
}
