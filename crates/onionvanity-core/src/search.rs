//! Vanity search engine

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chrono::Utc;
use crossbeam_channel::{bounded, RecvTimeoutError, Sender};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use onionvanity_crypto::{hex, Ed25519Keypair};
use onionvanity_filter::{format_difficulty, Filters, PackedInt};

use crate::keys::KeyDocument;
use crate::stats::SearchStats;

/// How often the collector wakes up to report progress
const TICK: Duration = Duration::from_millis(250);

/// Search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Number of threads (0 = auto)
    pub threads: usize,
    /// Keys generated between limit checks
    pub batch_size: usize,
    /// Maximum attempts (0 = unlimited)
    pub max_attempts: u64,
    /// Maximum time in seconds (0 = unlimited)
    pub max_time_secs: u64,
    /// Stop after this many matches (0 = unlimited)
    pub max_results: usize,
    /// No status line
    pub quiet: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            threads: 0,
            batch_size: 1000,
            max_attempts: 0,
            max_time_secs: 0,
            max_results: 1,
            quiet: false,
        }
    }
}

impl SearchConfig {
    fn is_bounded(&self) -> bool {
        self.max_attempts > 0 || self.max_time_secs > 0
    }
}

/// A generated key whose hostname matched a filter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// Onion v3 hostname, including `.onion`
    pub hostname: String,
    pub public_key_hex: String,
    /// 32-byte ed25519 seed
    pub secret_key_hex: String,
    /// Filter that matched, as printed by the filter listing
    pub filter: String,
    /// Total keys tested when the match was found
    pub keys_tested: u64,
    pub time_secs: f64,
    pub keys_per_second: f64,
    /// Tor key files for the hostname
    pub keys: KeyDocument,
}

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("no filters and no attempt or time limit, the search would never end")]
    Unbounded,

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Vanity search engine
pub struct VanitySearch<I = u64> {
    filters: Arc<Filters<I>>,
    config: SearchConfig,
    difficulty: f64,
}

impl<I: PackedInt> VanitySearch<I> {
    pub fn new(filters: Filters<I>, config: SearchConfig) -> Self {
        Self::from_shared(Arc::new(filters), config)
    }

    /// Search over filters that are also used elsewhere
    pub fn from_shared(filters: Arc<Filters<I>>, config: SearchConfig) -> Self {
        let difficulty = filters.expected_attempts();
        Self {
            filters,
            config,
            difficulty,
        }
    }

    /// Expected keys per match
    pub fn difficulty(&self) -> f64 {
        self.difficulty
    }

    pub fn filters(&self) -> &Filters<I> {
        &self.filters
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Run the search, blocking until a limit is reached, with a live
    /// status line on stderr unless quiet
    pub fn run(&self) -> Result<Vec<SearchResult>, SearchError> {
        let quiet = self.config.quiet;
        let difficulty = self.difficulty;
        let results = self.run_with_callback(|stats| {
            if !quiet {
                eprint!("\r{}", stats.format(difficulty));
            }
        })?;
        if !quiet {
            eprintln!();
        }
        Ok(results)
    }

    /// Run the search, calling `callback` with the live statistics a few
    /// times per second and once more when the search ends
    pub fn run_with_callback<F>(&self, mut callback: F) -> Result<Vec<SearchResult>, SearchError>
    where
        F: FnMut(&SearchStats),
    {
        if self.filters.is_empty() && !self.config.is_bounded() {
            return Err(SearchError::Unbounded);
        }

        let num_threads = if self.config.threads == 0 {
            num_cpus::get()
        } else {
            self.config.threads
        };
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build()?;

        if !self.config.quiet {
            info!(
                threads = num_threads,
                filters = self.filters.len(),
                difficulty = %format_difficulty(self.difficulty),
                "starting search"
            );
        }

        let stats = SearchStats::default();
        let max_results = self.config.max_results;
        let (tx, rx) = bounded::<SearchResult>(num_threads.max(1) * 2);

        let mut results = thread::scope(|scope| {
            let stats = &stats;
            let workers = scope.spawn(move || {
                pool.install(|| {
                    (0..num_threads)
                        .into_par_iter()
                        .for_each_with(tx, |tx, _| self.worker(stats, tx));
                })
            });

            let mut results = Vec::new();
            loop {
                match rx.recv_timeout(TICK) {
                    Ok(result) => {
                        debug!(hostname = %result.hostname, filter = %result.filter, "match");
                        results.push(result);
                        if max_results > 0 && results.len() >= max_results {
                            stats.stop();
                        }
                    }
                    Err(RecvTimeoutError::Timeout) => callback(stats),
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }

            if let Err(panic) = workers.join() {
                std::panic::resume_unwind(panic);
            }
            results
        });

        stats.stop();
        callback(&stats);

        if max_results > 0 {
            results.truncate(max_results);
        }
        if !self.config.quiet {
            info!(
                keys = stats.total_keys(),
                found = results.len(),
                secs = stats.elapsed().as_secs_f64(),
                "search finished"
            );
        }
        Ok(results)
    }

    fn limits_reached(&self, stats: &SearchStats) -> bool {
        let max_attempts = self.config.max_attempts;
        let max_time = self.config.max_time_secs;
        (max_attempts > 0 && stats.total_keys() >= max_attempts)
            || (max_time > 0 && stats.elapsed().as_secs() >= max_time)
    }

    fn worker(&self, stats: &SearchStats, tx: &Sender<SearchResult>) {
        let batch_size = self.config.batch_size.max(1);
        let max_results = self.config.max_results as u64;

        while stats.is_running() {
            if self.limits_reached(stats) {
                stats.stop();
                break;
            }

            let mut pending = 0u64;
            for _ in 0..batch_size {
                let keypair = Ed25519Keypair::generate();
                pending += 1;

                if let Some(index) = self.filters.find(&keypair.public_key_bytes()) {
                    stats.add_keys(pending);
                    pending = 0;
                    let found = stats.record_match();
                    if max_results > 0 && found >= max_results {
                        stats.stop();
                    }
                    if tx.send(self.result(&keypair, index, stats)).is_err() {
                        return;
                    }
                    if !stats.is_running() {
                        return;
                    }
                }
            }
            stats.add_keys(pending);
        }
    }

    fn result(&self, keypair: &Ed25519Keypair, index: usize, stats: &SearchStats) -> SearchResult {
        SearchResult {
            hostname: keypair.onion_hostname(),
            public_key_hex: hex::encode(keypair.public_key_bytes()),
            secret_key_hex: hex::encode(keypair.secret_key_bytes()),
            filter: self.filters.prefix(index).unwrap_or_default(),
            keys_tested: stats.total_keys(),
            time_secs: stats.elapsed().as_secs_f64(),
            keys_per_second: stats.keys_per_second(),
            keys: KeyDocument::new(keypair, Utc::now()),
        }
    }
}
