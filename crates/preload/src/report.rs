//! Throughput report of one preload session

use std::fmt;
use std::time::Duration;
use warmstart_core::constants::GIB;

/// Aggregate result of one worker-pool run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionReport {
    /// Bytes made resident, summed over all chunks
    pub total_bytes: u64,
    /// Wall-clock time from pool start to the last worker joining
    pub elapsed: Duration,
    pub chunks: usize,
    pub workers: usize,
}

impl SessionReport {
    /// Report of a session that had nothing to do
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(total_bytes: u64, elapsed: Duration, chunks: usize, workers: usize) -> Self {
        Self {
            total_bytes,
            elapsed,
            chunks,
            workers,
        }
    }

    pub fn gib(&self) -> f64 {
        self.total_bytes as f64 / GIB
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    /// Throughput in binary gigabytes per second, 0 when no time elapsed
    pub fn gib_per_sec(&self) -> f64 {
        let secs = self.elapsed_secs();
        if secs > 0.0 {
            self.gib() / secs
        } else {
            0.0
        }
    }
}

impl fmt::Display for SessionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Preloaded {:.3} GiB in {:.3} s ({:.3} GiB/s)",
            self.gib(),
            self.elapsed_secs(),
            self.gib_per_sec()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throughput_zero_elapsed_is_zero() {
        let report = SessionReport::new(1 << 30, Duration::ZERO, 64, 4);
        assert_eq!(report.gib(), 1.0);
        assert_eq!(report.gib_per_sec(), 0.0);
    }

    #[test]
    fn test_throughput_zero_bytes_is_zero() {
        let report = SessionReport::new(0, Duration::from_millis(250), 0, 4);
        assert_eq!(report.gib_per_sec(), 0.0);
        assert!(!report.gib_per_sec().is_nan());
    }

    #[test]
    fn test_throughput_binary_gigabytes() {
        let report = SessionReport::new(3 << 30, Duration::from_secs(2), 192, 4);
        assert!((report.gib_per_sec() - 1.5).abs() < f64::EPSILON);
        assert_eq!(
            report.to_string(),
            "Preloaded 3.000 GiB in 2.000 s (1.500 GiB/s)"
        );
    }

    #[test]
    fn test_empty_report() {
        let report = SessionReport::empty();
        assert_eq!(report.total_bytes, 0);
        assert_eq!(report.elapsed, Duration::ZERO);
        assert_eq!(report.gib_per_sec(), 0.0);
    }
}
