/// Constants used throughout the warmstart codebase
// Preload engine defaults
pub const DEFAULT_BLOCK_SIZE: u64 = 16 * 1024 * 1024;
pub const DEFAULT_WORKERS: usize = 4;

// Upper bounds accepted from configuration
pub const MAX_BLOCK_SIZE: u64 = 1024 * 1024 * 1024;
pub const MAX_WORKERS: usize = 64;

// Largest per-worker read buffer; bigger chunks are read in several steps
pub const MAX_SCRATCH_SIZE: usize = 16 * 1024 * 1024;

// Binary gigabyte, used for throughput reporting
pub const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

// Launch trigger defaults
pub const DEFAULT_MIN_INTERVAL_SECS: f64 = 2.0;
pub const DEFAULT_LAUNCH_MARKER: &str = "START u0";
pub const DEFAULT_EVENT_COMMAND: &[&str] = &["logcat", "-v", "brief", "ActivityTaskManager:I", "*:S"];

// Environment variable names
pub const WARMSTART_CONFIG_VAR: &str = "WARMSTART_CONFIG";
pub const WARMSTART_LOG_VAR: &str = "WARMSTART_LOG";

// Directory holding the default per-application file lists
pub const DEFAULT_LIST_DIR: &str = "/data/local/tmp/log";
