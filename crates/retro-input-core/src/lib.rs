//! # retro-input-core
//!
//! Input synchronization layer for a libretro streaming worker.
//!
//! Remote players send small binary input events over the network.  Each
//! input source is served by its own task or thread, so many writers update
//! the input state at once.  On the other side sits the emulation core,
//! which calls a single poll callback once per emulated frame (~16 ms) and
//! must never be made to wait.
//!
//! This crate is the meeting point of those two worlds.  It has no knowledge
//! of sockets, frame loops, or the libretro ABI:
//!
//! - **`domain`** – Fixed constants and identifiers: the port bound, retropad
//!   button ids, analog axes, and libretro keyboard modifier bits.
//!
//! - **`wire`** – Decoders (and matching encoders) for the compact payloads
//!   that carry one input event each.  Decoding is all-or-nothing.
//!
//! - **`state`** – The lock-free state itself: per-port button bitmasks and
//!   analog axes, the mouse accumulators, the keyboard key set, and the
//!   [`InputSession`] that owns one of each for a play session.
//!
//! Every shared field is an atomic integer.  Writers use single atomic
//! read-modify-write instructions, the poll side uses plain atomic loads and
//! swaps, so every operation completes in a bounded number of steps.

pub mod domain;
pub mod state;
pub mod wire;

// Re-export the most-used types at the crate root so callers can write
// `retro_input_core::InputSession` instead of the full module path.
pub use domain::retropad::{AnalogAxis, RetroPadButton};
pub use domain::MAX_PORT;
pub use state::keyboard::KeyboardState;
pub use state::keys::InputState;
pub use state::mouse::{MouseButtons, MouseState};
pub use state::session::InputSession;
pub use state::InputError;
pub use wire::payload::WireError;
