//! Configuration for warmstart
//!
//! Maps tracked application identifiers to their preload file lists and holds
//! the tunables of the preload engine and the launch trigger.

pub mod config;
pub mod loader;


pub use config::*;
pub use loader::*;
