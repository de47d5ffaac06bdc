//! Identifiers and constants shared by the wire decoders and the state types.
//!
//! Nothing in here touches shared memory.  These are the vocabulary types
//! that the rest of the crate is written in: which ports exist, what each
//! retropad bit means, and which keyboard modifier bits libretro defines.

pub mod keyboard;
pub mod retropad;

/// Number of player ports (controller slots) a session exposes.
///
/// Ports are numbered `0..MAX_PORT`.  The per-port state arrays are sized by
/// this constant at compile time, so growing it means rebuilding.
pub const MAX_PORT: usize = 4;
