//! retro-input-worker library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does the worker do? (for beginners)
//!
//! The worker hosts one play session.  Remote players connect over TCP and
//! stream small input frames (button presses, mouse motion, key events).
//! The worker:
//!
//! 1. Accepts one TCP connection per input source and reads frames from it
//!    in its own Tokio task.
//! 2. Hands each frame to the intake, which decodes the payload into the
//!    session's lock-free input state and counts anything it rejects.
//! 3. Runs a fixed-interval frame clock that plays the part of the emulation
//!    core's poll callback, reading the state through the poll adapter exactly
//!    the way a libretro core would.
//!
//! The state itself lives in `retro_input_core`; this crate only moves bytes
//! in and answers poll queries.

/// Application layer: intake dispatch and the poll adapter.
pub mod application;

/// Infrastructure layer: configuration file and TCP intake server.
pub mod infrastructure;
