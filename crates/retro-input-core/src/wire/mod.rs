//! Wire payload decoding.
//!
//! Each input event arrives from the network layer as a short byte slice.
//! The [`payload`] module turns those slices into typed events and back.
//! Framing (how payloads are delimited on a stream) is the transport's job
//! and does not live here.

pub mod payload;

pub use payload::{AxisEvent, KeyEvent, KeyboardEvent, MouseDelta, WireError};
