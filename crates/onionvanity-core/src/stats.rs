//! Live search statistics

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Thread-safe search statistics
#[derive(Debug)]
pub struct SearchStats {
    /// Total keys tested
    keys_tested: AtomicU64,
    /// Keys that matched a filter
    matches: AtomicU64,
    start_time: Instant,
    running: AtomicBool,
}

impl SearchStats {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Increment keys tested by amount
    pub fn add_keys(&self, count: u64) {
        self.keys_tested.fetch_add(count, Ordering::Relaxed);
    }

    pub fn total_keys(&self) -> u64 {
        self.keys_tested.load(Ordering::Relaxed)
    }

    /// Count a match, returning the running total including it
    pub fn record_match(&self) -> u64 {
        self.matches.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn matches(&self) -> u64 {
        self.matches.load(Ordering::Relaxed)
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn keys_per_second(&self) -> f64 {
        let elapsed = self.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.total_keys() as f64 / elapsed
        } else {
            0.0
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Stop the search
    pub fn stop(&self) {
        self.running.store(false, Ordering::Relaxed);
    }

    /// Status line: rate, total, matches, probability of a match so far, ETA
    pub fn format(&self, difficulty: f64) -> String {
        let keys = self.total_keys();
        let kps = self.keys_per_second();

        let prob = if difficulty > 0.0 {
            1.0 - (-(keys as f64) / difficulty).exp()
        } else {
            0.0
        };

        // ETA for 50%
        let remaining_for_50 = if prob < 0.5 && kps > 0.0 {
            let keys_needed = difficulty * std::f64::consts::LN_2 - keys as f64;
            keys_needed / kps
        } else {
            0.0
        };

        format!(
            "[{:.2} Mkey/s][Total {}][Found {}][Prob {:.1}%][50% in {}]",
            kps / 1_000_000.0,
            format_keys(keys),
            self.matches(),
            prob * 100.0,
            format_eta(remaining_for_50)
        )
    }
}

impl Default for SearchStats {
    fn default() -> Self {
        Self {
            keys_tested: AtomicU64::new(0),
            matches: AtomicU64::new(0),
            start_time: Instant::now(),
            running: AtomicBool::new(true),
        }
    }
}

fn format_keys(keys: u64) -> String {
    if keys >= 1_000_000_000_000 {
        format!("{:.2}T", keys as f64 / 1e12)
    } else if keys >= 1_000_000_000 {
        format!("{:.2}G", keys as f64 / 1e9)
    } else if keys >= 1_000_000 {
        format!("{:.2}M", keys as f64 / 1e6)
    } else if keys >= 1000 {
        format!("{:.2}K", keys as f64 / 1e3)
    } else {
        format!("{}", keys)
    }
}

fn format_eta(seconds: f64) -> String {
    if seconds <= 0.0 {
        return "now".to_string();
    }
    if !seconds.is_finite() {
        return "never".to_string();
    }
    if seconds < 1.0 {
        format!("{:.0}ms", seconds * 1000.0)
    } else if seconds < 60.0 {
        format!("{:.0}s", seconds)
    } else if seconds < 3600.0 {
        format!("{:.0}m", seconds / 60.0)
    } else if seconds < 86400.0 {
        format!("{:.1}h", seconds / 3600.0)
    } else if seconds < 86400.0 * 365.0 {
        format!("{:.1}d", seconds / 86400.0)
    } else {
        format!("{:.1}y", seconds / (86400.0 * 365.0))
    }
}
