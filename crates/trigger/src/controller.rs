//! Rate-limited launch trigger controller
//!
//! Each tracked application is either cold (never triggered, or triggered at
//! least `min_interval` ago) or cooling. A launch line for a cold application
//! runs its preload synchronously and starts a new cooling period; a launch
//! line for a cooling application is logged and skipped.

use crate::clock::{Clock, SystemClock};
use std::fmt;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use warmstart_config::Config;
use warmstart_core::{Error, Result};
use warmstart_preload::{PreloadOptions, PreloadSession, SessionReport};

/// Something the controller can run when an application launches
pub trait Warmup {
    fn warm(&mut self) -> SessionReport;
}

impl Warmup for PreloadSession {
    fn warm(&mut self) -> SessionReport {
        self.run()
    }
}

/// An application identifier with its preload and cooling state
#[derive(Debug)]
pub struct TrackedApplication<W> {
    identifier: String,
    list_path: PathBuf,
    last_trigger: Option<Instant>,
    warmup: W,
}

impl<W> TrackedApplication<W> {
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn list_path(&self) -> &Path {
        &self.list_path
    }

    /// When the last preload was triggered, `None` if never
    pub fn last_trigger(&self) -> Option<Instant> {
        self.last_trigger
    }

    pub fn warmup(&self) -> &W {
        &self.warmup
    }
}

/// Outcome of one input line
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// No launch marker in the line
    Ignored,
    /// A launch of an application that is not tracked
    Unmatched,
    /// The application was cold and its preload ran
    Triggered {
        app: String,
        /// Time since the previous trigger, `None` on the first one
        since_last: Option<Duration>,
        report: SessionReport,
    },
    /// The application is still cooling
    Skipped { app: String, elapsed: Duration },
}

/// Counters over the lifetime of one controller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControllerStats {
    pub lines: u64,
    pub launches: u64,
    pub triggers: u64,
    pub skips: u64,
    pub bytes_warmed: u64,
}

impl fmt::Display for ControllerStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} lines, {} launches, {} triggers, {} skipped, {} bytes warmed",
            self.lines, self.launches, self.triggers, self.skips, self.bytes_warmed
        )
    }
}

/// Consumes launch events and drives per-application preloads
pub struct TriggerController<W, C = SystemClock> {
    marker: String,
    min_interval: Duration,
    apps: Vec<TrackedApplication<W>>,
    clock: C,
    stats: ControllerStats,
}

impl TriggerController<PreloadSession, SystemClock> {
    /// Prepare a preload session for every configured application, in
    /// configuration order. Applications whose list cannot be read are still
    /// tracked and simply warm nothing.
    pub fn from_config(config: &Config) -> Self {
        let options = PreloadOptions {
            block_size: config.block_size,
            workers: config.workers,
        };

        let mut controller = Self::new(
            config.launch_marker.clone(),
            config.min_interval(),
            SystemClock,
        );
        for (identifier, list_path) in &config.applications {
            let session = PreloadSession::prepare(identifier.as_str(), list_path, &options);
            controller.track(identifier.as_str(), list_path.as_path(), session);
        }
        controller
    }
}

impl<W: Warmup, C: Clock> TriggerController<W, C> {
    pub fn new(marker: impl Into<String>, min_interval: Duration, clock: C) -> Self {
        Self {
            marker: marker.into(),
            min_interval,
            apps: Vec::new(),
            clock,
            stats: ControllerStats::default(),
        }
    }

    /// Track an application. Identifiers are matched in the order they were
    /// added; the first one contained in a line wins.
    pub fn track(
        &mut self,
        identifier: impl Into<String>,
        list_path: impl Into<PathBuf>,
        warmup: W,
    ) -> &mut Self {
        self.apps.push(TrackedApplication {
            identifier: identifier.into(),
            list_path: list_path.into(),
            last_trigger: None,
            warmup,
        });
        self
    }

    pub fn applications(&self) -> &[TrackedApplication<W>] {
        &self.apps
    }

    pub fn stats(&self) -> ControllerStats {
        self.stats
    }

    /// Apply one input line
    pub fn handle_line(&mut self, line: &str) -> Decision {
        self.stats.lines += 1;
        if !line.contains(self.marker.as_str()) {
            return Decision::Ignored;
        }
        self.stats.launches += 1;

        let Some(app) = self
            .apps
            .iter_mut()
            .find(|app| line.contains(app.identifier.as_str()))
        else {
            return Decision::Unmatched;
        };

        let now = self.clock.now();
        let since_last = app.last_trigger.map(|at| now.saturating_duration_since(at));

        if let Some(elapsed) = since_last.filter(|elapsed| *elapsed < self.min_interval) {
            self.stats.skips += 1;
            tracing::info!(
                app = %app.identifier,
                elapsed_secs = elapsed.as_secs_f64(),
                "[skip] {} triggered too soon ({:.3}s)",
                app.identifier,
                elapsed.as_secs_f64()
            );
            return Decision::Skipped {
                app: app.identifier.clone(),
                elapsed,
            };
        }

        match since_last {
            Some(elapsed) => tracing::info!(
                app = %app.identifier,
                list = %app.list_path.display(),
                since_last_secs = elapsed.as_secs_f64(),
                "[trigger] launch of {}, preloading",
                app.identifier
            ),
            None => tracing::info!(
                app = %app.identifier,
                list = %app.list_path.display(),
                "[trigger] first launch of {}, preloading",
                app.identifier
            ),
        }

        let report = app.warmup.warm();
        app.last_trigger = Some(now);
        self.stats.triggers += 1;
        self.stats.bytes_warmed += report.total_bytes;

        Decision::Triggered {
            app: app.identifier.clone(),
            since_last,
            report,
        }
    }

    /// Consume `input` until it ends, returning the lifetime counters.
    ///
    /// Lines are decoded lossily; preload failures never stop the loop. Only
    /// a failing read of the input itself is returned as an error.
    pub fn run<R: BufRead>(&mut self, mut input: R) -> Result<ControllerStats> {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let read = input
                .read_until(b'\n', &mut buf)
                .map_err(|e| Error::event_source_io("input", "read failed", e))?;
            if read == 0 {
                break;
            }
            let line = String::from_utf8_lossy(&buf);
            self.handle_line(&line);
        }

        tracing::info!(stats = %self.stats, "event stream ended");
        Ok(self.stats)
    }
}
