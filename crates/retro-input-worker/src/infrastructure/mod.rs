//! Infrastructure layer for the worker.
//!
//! Contains the OS-facing adapters: the TOML config file and the TCP intake
//! server.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `retro_input_core`, but MUST NOT be imported by the `application` layer.

pub mod config;
pub mod network;
