//! Shared utilities for depsel.
//!
//! This crate holds the cross-cutting error type used by the other depsel
//! crates when reading configuration, parsing declarations, or reporting a
//! resolve that cannot continue.

pub mod errors;
