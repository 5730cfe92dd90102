//! Core data types for depsel.
//!
//! This crate defines the values that flow through a resolve pass: module and
//! component coordinates, component selectors and version constraints,
//! dependency declarations, resolution failures, selection reasons, and the
//! resolve configuration.
//!
//! This crate is intentionally free of resolution logic.

pub mod config;
pub mod constraint;
pub mod coordinate;
pub mod declaration;
pub mod failure;
pub mod reason;
