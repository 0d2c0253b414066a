//! Sliding-window rate limiting for the password-recovery endpoint.
//!
//! Attempts are appended to a durable log, one `<epoch_millis>|<client>`
//! record per line, and counted over a trailing window on admission checks.
//! The log is append-only; this module never truncates or rotates it.
//!
//! Failure semantics: log I/O errors surface as [`AppError::StoreIo`], and
//! callers degrade fail-open — a request whose attempt cannot be read or
//! durably recorded still proceeds. Availability is deliberately preferred
//! over strict enforcement here.
//!
//! [`AppError::StoreIo`]: crate::error::AppError::StoreIo

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Duration;
use tracing::debug;

use crate::clock::Clock;
use crate::error::Result;

pub struct RecoveryRateLimiter {
    log_path: PathBuf,
    max_attempts: u32,
    window: Duration,
    clock: Arc<dyn Clock>,
}

impl RecoveryRateLimiter {
    pub fn new(
        log_path: impl Into<PathBuf>,
        max_attempts: u32,
        window: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            log_path: log_path.into(),
            max_attempts,
            window,
            clock,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Count attempts by `client_id` within the trailing window.
    ///
    /// Malformed lines are skipped; a missing log file counts as zero.
    pub fn recent_attempts(&self, client_id: &str) -> Result<u32> {
        if !self.log_path.exists() {
            return Ok(0);
        }

        let now_millis = self.clock.now().timestamp_millis();
        let cutoff = now_millis - self.window.num_milliseconds();

        let contents = fs::read_to_string(&self.log_path)?;
        let mut count = 0;
        for line in contents.lines() {
            let Some((timestamp, entry_client)) = line.split_once('|') else {
                continue;
            };
            let Ok(timestamp) = timestamp.parse::<i64>() else {
                continue;
            };
            if entry_client == client_id && timestamp >= cutoff && timestamp <= now_millis {
                count += 1;
            }
        }
        Ok(count)
    }

    /// Append an attempt record for `client_id`, creating the log directory
    /// on first use.
    ///
    /// Recording is unconditional at the call site: every admitted request
    /// is logged whether or not the recovery flow afterwards succeeds.
    pub fn record_attempt(&self, client_id: &str) -> Result<()> {
        if let Some(parent) = self.log_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)?;
        writeln!(file, "{}|{}", self.clock.now().timestamp_millis(), client_id)?;

        debug!(client_id, "recorded password-recovery attempt");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn test_limiter() -> (RecoveryRateLimiter, Arc<ManualClock>, TempDir) {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap(),
        ));
        let dir = tempfile::tempdir().unwrap();
        let limiter = RecoveryRateLimiter::new(
            dir.path().join("logs/forgot-password.log"),
            3,
            Duration::minutes(10),
            clock.clone(),
        );
        (limiter, clock, dir)
    }

    #[test]
    fn test_missing_log_counts_zero() {
        let (limiter, _clock, _dir) = test_limiter();
        assert_eq!(limiter.recent_attempts("1.2.3.4").unwrap(), 0);
    }

    #[test]
    fn test_attempts_are_counted_per_client() {
        let (limiter, _clock, _dir) = test_limiter();

        limiter.record_attempt("1.2.3.4").unwrap();
        limiter.record_attempt("1.2.3.4").unwrap();
        limiter.record_attempt("5.6.7.8").unwrap();

        assert_eq!(limiter.recent_attempts("1.2.3.4").unwrap(), 2);
        assert_eq!(limiter.recent_attempts("5.6.7.8").unwrap(), 1);
        assert_eq!(limiter.recent_attempts("9.9.9.9").unwrap(), 0);
    }

    #[test]
    fn test_attempts_age_out_of_the_window() {
        let (limiter, clock, _dir) = test_limiter();

        limiter.record_attempt("1.2.3.4").unwrap();
        limiter.record_attempt("1.2.3.4").unwrap();
        limiter.record_attempt("1.2.3.4").unwrap();
        assert_eq!(limiter.recent_attempts("1.2.3.4").unwrap(), 3);

        clock.advance(Duration::minutes(11));
        assert_eq!(limiter.recent_attempts("1.2.3.4").unwrap(), 0);
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let (limiter, _clock, _dir) = test_limiter();

        limiter.record_attempt("1.2.3.4").unwrap();
        {
            let mut file = OpenOptions::new()
                .append(true)
                .open(&limiter.log_path)
                .unwrap();
            writeln!(file, "garbage line without separator").unwrap();
            writeln!(file, "not-a-timestamp|1.2.3.4").unwrap();
        }
        limiter.record_attempt("1.2.3.4").unwrap();

        assert_eq!(limiter.recent_attempts("1.2.3.4").unwrap(), 2);
    }

    #[test]
    fn test_log_is_append_only() {
        let (limiter, _clock, _dir) = test_limiter();

        limiter.record_attempt("1.2.3.4").unwrap();
        limiter.record_attempt("5.6.7.8").unwrap();

        let contents = fs::read_to_string(&limiter.log_path).unwrap();
        assert_eq!(contents.lines().count(), 2);
        assert!(contents.lines().all(|l| l.contains('|')));
    }
}
