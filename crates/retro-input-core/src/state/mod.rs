//! Lock-free input state shared between network writers and the poll callback.
//!
//! # Why atomics instead of a Mutex? (for beginners)
//!
//! A `Mutex` makes a thread wait while another thread holds the lock.  That
//! is fine for most code, but the emulation core's poll callback runs once
//! per frame on a tight deadline.  If it ever had to wait for a network task
//! to finish an update, the frame would be late and the video stream would
//! stutter.
//!
//! Every field in this module is an atomic integer instead.  Updates use a
//! single read-modify-write instruction (`fetch_or`, `fetch_and`, `fetch_add`,
//! `swap`), so no thread ever waits on another and no update is lost when two
//! writers touch the same word at the same instant.
//!
//! # Sub-modules
//!
//! - **`keys`** – per-port retropad bitmask and analog axes.
//! - **`mouse`** – relative motion accumulators and the button mask.
//! - **`keyboard`** – held keyboard keys and the modifier mask.
//! - **`session`** – owns one of each for the lifetime of a play session.

pub mod keyboard;
pub mod keys;
pub mod mouse;
pub mod session;

use thiserror::Error;

use crate::domain::MAX_PORT;
use crate::wire::WireError;

/// Error type for write-side input operations.
///
/// A write that fails leaves every piece of state exactly as it was.
#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum InputError {
    /// The port is outside `0..MAX_PORT`.
    #[error("invalid port {port}: must be below {max_port}")]
    InvalidPort { port: usize, max_port: usize },

    /// The payload could not be decoded.
    #[error("malformed payload: {0}")]
    MalformedPayload(#[from] WireError),
}

/// Validates a port index against [`MAX_PORT`].
pub(crate) fn check_port(port: usize) -> Result<usize, InputError> {
    if port < MAX_PORT {
        Ok(port)
    } else {
        Err(InputError::InvalidPort {
            port,
            max_port: MAX_PORT,
        })
    }
}
