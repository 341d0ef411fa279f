//! Download progress snapshot

use std::time::Duration;

/// Snapshot of a running download
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    /// Bytes received so far
    pub downloaded: u64,
    /// Expected size in bytes, 0 when the server did not announce it
    pub total: u64,
    /// Time since the attempt started
    pub elapsed: Duration,
}

impl Progress {
    pub fn new(downloaded: u64, total: u64, elapsed: Duration) -> Self {
        Self {
            downloaded,
            total,
            elapsed,
        }
    }

    /// Completion in percent, 0 when the total is unknown
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.downloaded as f64 * 100.0 / self.total as f64).min(100.0)
    }

    /// Average speed in bytes per second
    pub fn speed(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.downloaded as f64 / secs
        } else {
            0.0
        }
    }

    /// Estimated time left at the current average speed
    pub fn eta(&self) -> Duration {
        let speed = self.speed();
        if speed <= 0.0 || self.downloaded >= self.total {
            return Duration::ZERO;
        }
        Duration::from_secs_f64((self.total - self.downloaded) as f64 / speed)
    }

    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.downloaded >= self.total
    }
}
