//! TCP intake: one connection per input source.
//!
//! - **`framing`** – Reads and writes the tagged frame envelope
//!   `[kind][port][len u16 BE][payload]` around one wire payload.
//! - **`server`** – Accept loop and per-connection tasks that feed frames to
//!   the [`crate::application::intake::InputIntake`].

pub mod framing;
pub mod server;
