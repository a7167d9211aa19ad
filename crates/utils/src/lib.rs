//! Shared utilities for warmstart
//!
//! Currently the tracing subscriber setup used by the binary.

pub mod tracing;
