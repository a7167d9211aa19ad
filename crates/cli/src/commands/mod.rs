use clap::Subcommand;
use std::path::PathBuf;

pub mod check;
pub mod run;
pub mod warm;

#[derive(Subcommand)]
pub enum Commands {
    /// Watch launch events and preload tracked applications (default)
    Run {
        /// Read launch events from standard input instead of the event command
        #[arg(long)]
        stdin: bool,
    },

    /// Preload one file list immediately and report throughput
    Warm {
        /// Newline-delimited list of files to warm
        list: PathBuf,

        /// Label used in log output
        #[arg(long, default_value = "manual")]
        label: String,
    },

    /// Validate the configuration and prepare every application's file list
    Check,
}
