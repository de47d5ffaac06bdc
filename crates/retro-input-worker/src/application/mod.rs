//! Application layer use cases for the worker.
//!
//! - **`held`** – What one input source is still holding, so that its
//!   disconnect releases its own input and nothing else.
//!
//! - **`intake`** – Routes decoded network frames to the session's input
//!   state through the [`intake::InputSink`] seam, and keeps counters of
//!   accepted and rejected events.  Rejections stop here; they never reach
//!   the poll path.
//!
//! - **`poll`** – The consumer side: answers libretro `input_state` queries
//!   and samples a whole frame's worth of input in the order the emulation
//!   core reads it.

pub mod held;
pub mod intake;
pub mod poll;
