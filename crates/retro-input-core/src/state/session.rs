//! InputSession: the input state owned by one play session.

use tracing::debug;
use uuid::Uuid;

use crate::state::keyboard::KeyboardState;
use crate::state::keys::InputState;
use crate::state::mouse::MouseState;

/// All input state for a single play session.
///
/// Created when a core instance starts and dropped when it stops.  The
/// worker wraps it in an `Arc` and hands clones to every network intake
/// task and to the poll adapter; there is no global instance.
pub struct InputSession {
    id: Uuid,
    keys: InputState,
    mouse: MouseState,
    keyboard: KeyboardState,
}

impl InputSession {
    /// Creates a session with a fresh random id and empty state.
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4())
    }

    /// Creates a session with a caller-chosen id.
    pub fn with_id(id: Uuid) -> Self {
        debug!(session = %id, "input session created");
        Self {
            id,
            keys: InputState::new(),
            mouse: MouseState::new(),
            keyboard: KeyboardState::new(),
        }
    }

    /// Identifier used to correlate log lines for this session.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Retropad buttons and analog axes for every port.
    pub fn keys(&self) -> &InputState {
        &self.keys
    }

    /// The session's single pointing device.
    pub fn mouse(&self) -> &MouseState {
        &self.mouse
    }

    /// The session's keyboard.
    pub fn keyboard(&self) -> &KeyboardState {
        &self.keyboard
    }
}

impl Default for InputSession {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for InputSession {
    fn drop(&mut self) {
        debug!(session = %self.id, "input session closed");
    }
}
