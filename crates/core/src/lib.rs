//! Core errors and constants for the `warmstart` page-cache preloader.
//!
//! - **`errors`**: the `Error` enum and `Result` alias shared by every crate in
//!   the workspace. Per-file and per-chunk failures are not errors; they are
//!   reported as skip reasons and byte counts by `warmstart-preload`.
//! - **`constants`**: block size, worker count, rate-limit interval and the
//!   other defaults the configuration falls back to.

pub mod constants;
pub mod errors;

pub use self::{
    constants::*,
    errors::{Error, Result},
};
