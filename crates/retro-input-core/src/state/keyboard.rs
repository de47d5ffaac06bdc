//! Held keyboard keys and the active modifier mask.

use std::sync::atomic::{AtomicU16, AtomicU64, Ordering};

use crate::domain::keyboard::KEY_COUNT;
use crate::state::InputError;
use crate::wire::KeyboardEvent;

const WORD_BITS: u32 = u64::BITS;
const WORDS: usize = (KEY_COUNT / WORD_BITS) as usize;

/// The set of keyboard keys currently held, indexed by libretro key code.
///
/// Stored as a fixed 512-bit set split over eight `AtomicU64` words.  A key
/// event flips one bit in one word, so concurrent events for different keys
/// never overwrite each other.
pub struct KeyboardState {
    keys: [AtomicU64; WORDS],
    modifiers: AtomicU16,
}

impl KeyboardState {
    /// Creates a keyboard with nothing held.
    pub fn new() -> Self {
        Self {
            keys: std::array::from_fn(|_| AtomicU64::new(0)),
            modifiers: AtomicU16::new(0),
        }
    }

    /// Applies a keyboard payload: sets or clears the key and replaces the
    /// modifier mask with the one carried by the event.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::MalformedPayload`] if the payload does not
    /// decode.  Nothing is written in that case.
    pub fn press(&self, payload: &[u8]) -> Result<(), InputError> {
        let event = KeyboardEvent::decode(payload)?;
        let (word, mask) = locate(event.key);
        if event.pressed {
            self.keys[word].fetch_or(mask, Ordering::AcqRel);
        } else {
            self.keys[word].fetch_and(!mask, Ordering::AcqRel);
        }
        self.modifiers.store(event.modifiers, Ordering::Release);
        Ok(())
    }

    /// Returns whether `key` is held.  Codes outside the set are never held.
    pub fn is_pressed(&self, key: u32) -> bool {
        if key >= KEY_COUNT {
            return false;
        }
        let (word, mask) = locate(key);
        self.keys[word].load(Ordering::Acquire) & mask != 0
    }

    /// Returns the modifier mask reported by the most recent key event.
    pub fn modifiers(&self) -> u16 {
        self.modifiers.load(Ordering::Acquire)
    }

    /// Releases `key` and leaves every other key alone.  Codes outside the
    /// set are ignored.
    pub fn release_key(&self, key: u32) {
        if key >= KEY_COUNT {
            return;
        }
        let (word, mask) = locate(key);
        self.keys[word].fetch_and(!mask, Ordering::AcqRel);
    }

    /// Clears the modifier mask only if it still equals `expected`.
    ///
    /// Returns whether the mask was cleared.
    pub fn clear_modifiers_if(&self, expected: u16) -> bool {
        self.modifiers
            .compare_exchange(expected, 0, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

impl Default for KeyboardState {
    fn default() -> Self {
        Self::new()
    }
}

/// Maps a key code below [`KEY_COUNT`] to its word index and bit mask.
fn locate(key: u32) -> (usize, u64) {
    ((key / WORD_BITS) as usize, 1u64 << (key % WORD_BITS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::keyboard::modifiers;

    fn event(key: u32, pressed: bool, mods: u16) -> [u8; 7] {
        KeyboardEvent {
            key,
            pressed,
            modifiers: mods,
        }
        .encode()
    }

    #[test]
    fn test_press_and_release_key() {
        let kb = KeyboardState::new();

        kb.press(&event(97, true, 0)).unwrap();
        assert!(kb.is_pressed(97));

        kb.press(&event(97, false, 0)).unwrap();
        assert!(!kb.is_pressed(97));
    }

    #[test]
    fn test_keys_in_different_words_are_independent() {
        let kb = KeyboardState::new();
        kb.press(&event(1, true, 0)).unwrap();
        kb.press(&event(300, true, 0)).unwrap();
        kb.press(&event(511, true, 0)).unwrap();

        kb.press(&event(300, false, 0)).unwrap();

        assert!(kb.is_pressed(1));
        assert!(!kb.is_pressed(300));
        assert!(kb.is_pressed(511));
    }

    #[test]
    fn test_modifiers_replaced_by_each_event() {
        let kb = KeyboardState::new();
        kb.press(&event(304, true, modifiers::SHIFT)).unwrap();
        assert_eq!(kb.modifiers(), modifiers::SHIFT);

        kb.press(&event(97, true, modifiers::SHIFT | modifiers::CTRL))
            .unwrap();
        assert_eq!(kb.modifiers(), modifiers::SHIFT | modifiers::CTRL);
    }

    #[test]
    fn test_malformed_payload_leaves_state_unchanged() {
        let kb = KeyboardState::new();
        kb.press(&event(13, true, modifiers::ALT)).unwrap();

        assert!(kb.press(&event(13, true, 0)[..6]).is_err());
        assert!(kb.press(&event(KEY_COUNT, true, 0)).is_err());

        assert!(kb.is_pressed(13));
        assert_eq!(kb.modifiers(), modifiers::ALT);
    }

    #[test]
    fn test_is_pressed_out_of_range_returns_false() {
        let kb = KeyboardState::new();
        assert!(!kb.is_pressed(KEY_COUNT));
        assert!(!kb.is_pressed(u32::MAX));
    }

    #[test]
    fn test_release_key_leaves_other_keys_held() {
        let kb = KeyboardState::new();
        kb.press(&event(32, true, 0)).unwrap();
        kb.press(&event(33, true, 0)).unwrap();

        kb.release_key(32);
        kb.release_key(KEY_COUNT);

        assert!(!kb.is_pressed(32));
        assert!(kb.is_pressed(33));
    }

    #[test]
    fn test_clear_modifiers_if_respects_newer_mask() {
        let kb = KeyboardState::new();
        kb.press(&event(32, true, modifiers::META)).unwrap();

        assert!(!kb.clear_modifiers_if(modifiers::SHIFT));
        assert_eq!(kb.modifiers(), modifiers::META);

        assert!(kb.clear_modifiers_if(modifiers::META));
        assert_eq!(kb.modifiers(), 0);
    }
}
