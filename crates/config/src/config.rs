//! The `Config` struct shared by the preload engine and the trigger controller.
//!
//! The configuration is immutable after loading and is handed to the
//! controller at construction; nothing reads it through a global.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use warmstart_core::{
    constants::{
        DEFAULT_BLOCK_SIZE, DEFAULT_EVENT_COMMAND, DEFAULT_LAUNCH_MARKER, DEFAULT_LIST_DIR,
        DEFAULT_MIN_INTERVAL_SECS, DEFAULT_WORKERS, MAX_BLOCK_SIZE, MAX_WORKERS,
    },
    Error, Result,
};

/// Packages tracked when no configuration file is supplied, with the name of
/// their file list under [`DEFAULT_LIST_DIR`].
const DEFAULT_APPLICATIONS: &[(&str, &str)] = &[
    ("com.booking", "Booking_large.txt"),
    ("com.adobe.psmobile", "Photoshop_large.txt"),
    ("com.twitter.android", "Twitter_large.txt"),
    ("com.tencent.ig", "PUBG_large.txt"),
    ("com.zhiliaoapp.musically", "TikTok_large.txt"),
    ("com.xingin.xhs", "RedNote_large.txt"),
    ("com.lemon.lvoverseas", "Capcut_large.txt"),
    ("com.campmobile.snow", "Snow_large.txt"),
    ("com.google.earth", "GoogleEarth_large.txt"),
    ("com.roblox.client", "Roblox_large.txt"),
    ("com.tinder", "Tinder_large.txt"),
    ("com.einnovation.temu", "Temu_large.txt"),
    ("com.ubercab", "Uber_large.txt"),
];

/// Complete warmstart configuration.
///
/// Every field has a default, so a configuration file only needs to name what
/// it changes. Unknown keys are rejected to catch typos early.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Substring a line must contain to count as a launch event
    pub launch_marker: String,

    /// Minimum time between two preloads of the same application
    pub min_interval_secs: f64,

    /// Number of preload worker threads per session
    pub workers: usize,

    /// Maximum length of one chunk in bytes
    pub block_size: u64,

    /// Program and arguments producing the launch-event stream
    pub event_command: Vec<String>,

    /// Tracked application identifier to preload file-list path, in scan order
    pub applications: IndexMap<String, PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        let list_dir = Path::new(DEFAULT_LIST_DIR);
        Self {
            launch_marker: DEFAULT_LAUNCH_MARKER.to_string(),
            min_interval_secs: DEFAULT_MIN_INTERVAL_SECS,
            workers: DEFAULT_WORKERS,
            block_size: DEFAULT_BLOCK_SIZE,
            event_command: DEFAULT_EVENT_COMMAND
                .iter()
                .map(|s| s.to_string())
                .collect(),
            applications: DEFAULT_APPLICATIONS
                .iter()
                .map(|(id, list)| (id.to_string(), list_dir.join(list)))
                .collect(),
        }
    }
}

impl Config {
    /// Parse a configuration from JSON text and validate it
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every field against the ranges the engine accepts
    pub fn validate(&self) -> Result<()> {
        if self.launch_marker.is_empty() {
            return Err(Error::configuration("launch_marker must not be empty"));
        }

        if Duration::try_from_secs_f64(self.min_interval_secs).is_err() {
            return Err(Error::configuration(format!(
                "min_interval_secs must be a non-negative number of seconds a duration can hold (got {})",
                self.min_interval_secs
            )));
        }

        if self.workers == 0 || self.workers > MAX_WORKERS {
            return Err(Error::configuration(format!(
                "workers must be between 1 and {MAX_WORKERS} (got {})",
                self.workers
            )));
        }

        if self.block_size == 0 || self.block_size > MAX_BLOCK_SIZE {
            return Err(Error::configuration(format!(
                "block_size must be between 1 and {MAX_BLOCK_SIZE} bytes (got {})",
                self.block_size
            )));
        }

        if self.event_command.first().map_or(true, |c| c.is_empty()) {
            return Err(Error::configuration("event_command must name a program"));
        }

        if let Some((id, _)) = self.applications.iter().find(|(id, _)| id.is_empty()) {
            return Err(Error::configuration(format!(
                "application identifiers must not be empty (got {id:?})"
            )));
        }

        Ok(())
    }

    /// Minimum interval between two triggers of one application
    ///
    /// Values `validate` rejects saturate to `Duration::MAX`.
    pub fn min_interval(&self) -> Duration {
        Duration::try_from_secs_f64(self.min_interval_secs).unwrap_or(Duration::MAX)
    }

    /// File-list path for a tracked application
    pub fn list_path(&self, identifier: &str) -> Option<&Path> {
        self.applications.get(identifier).map(PathBuf::as_path)
    }

    /// Event command rendered as a single string for diagnostics
    pub fn event_command_line(&self) -> String {
        self.event_command.join(" ")
    }
}
