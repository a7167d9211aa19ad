//! Launch trigger controller for warmstart
//!
//! Reads launch events line by line, matches them against the tracked
//! applications and runs the matching application's preload at most once per
//! minimum interval.

pub mod clock;
pub mod controller;
pub mod source;

pub use clock::{Clock, ManualClock, SystemClock};
pub use controller::{ControllerStats, Decision, TrackedApplication, TriggerController, Warmup};
pub use source::EventSource;
