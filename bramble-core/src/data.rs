//! Core data types for Bramble runs: the seeded random source and run configuration.

use crate::error::*;
use std::fmt;
use std::time::Duration;

/// Deterministic random source handed to properties during generation.
///
/// Built once per run from a seed. Two sources created from the same seed
/// and advanced the same number of times produce identical output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Random {
    seed: u64,
    state: u64,
    gamma: u64,
}

impl Random {
    /// Create a new random source from a seed.
    pub fn new(seed: u64) -> Self {
        let state = splitmix64_mix(seed);
        let gamma = mix_gamma(state);
        Random { seed, state, gamma }
    }

    /// The seed this source was built from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generate the next random value and advance the source.
    /// Uses SplitMix64 algorithm for high-quality randomness.
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(self.gamma);
        splitmix64_mix(self.state)
    }

    /// Generate a bounded random value [0, bound).
    pub fn next_bounded(&mut self, bound: u64) -> u64 {
        let value = self.next_u64();
        (value as u128 * bound as u128 >> 64) as u64
    }

    /// Generate an integer in the inclusive range [min, max].
    pub fn next_int(&mut self, min: i64, max: i64) -> i64 {
        let (low, high) = if min <= max { (min, max) } else { (max, min) };
        let span = (high as i128 - low as i128 + 1) as u128;
        if span > u64::MAX as u128 {
            return self.next_u64() as i64;
        }
        let offset = self.next_bounded(span as u64);
        (low as i128 + offset as i128) as i64
    }

    /// Generate a random bool.
    pub fn next_bool(&mut self) -> bool {
        self.next_u64() & 1 == 1
    }
}

impl fmt::Display for Random {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Random(seed: {})", self.seed)
    }
}

/// Draw a fresh seed for runs that were not given one.
pub fn random_seed() -> u64 {
    use rand::Rng;
    rand::thread_rng().gen()
}

/// Configuration for a property run.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Seed for the random source. A fresh one is drawn per run when absent.
    pub seed: Option<u64>,

    /// Number of non-skipped trials that must pass.
    pub num_runs: usize,

    /// Per-evaluation limit for asynchronous properties.
    pub timeout: Option<Duration>,

    /// Keep every failing value visited while shrinking.
    pub verbose: bool,

    /// Counterexample path to replay instead of a fresh run, e.g. `"3:0:5"`.
    pub path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            seed: None,
            num_runs: 100,
            timeout: None,
            verbose: false,
            path: None,
        }
    }
}

impl Config {
    /// Use a fixed seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the number of passing trials required.
    pub fn with_runs(mut self, runs: usize) -> Self {
        self.num_runs = runs;
        self
    }

    /// Bound each asynchronous evaluation by the given duration.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Bound each asynchronous evaluation by the given number of milliseconds.
    pub fn with_timeout_millis(self, millis: u64) -> Self {
        self.with_timeout(Duration::from_millis(millis))
    }

    /// Record every failing value visited during shrinking.
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    /// Replay a previously reported counterexample path.
    pub fn with_path(mut self, path: &str) -> Self {
        self.path = Some(path.to_string());
        self
    }

    /// Parse the replay path, if any, into sibling indices.
    pub fn replay_path(&self) -> Result<Option<Vec<usize>>> {
        let Some(path) = self.path.as_deref() else {
            return Ok(None);
        };

        path.split(':')
            .map(|segment| {
                segment
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| BrambleError::InvalidConfig {
                        message: format!(
                            "replay path {path:?} has a non-numeric segment {segment:?}"
                        ),
                    })
            })
            .collect::<Result<Vec<_>>>()
            .map(Some)
    }
}

/// SplitMix64 mixing function for high-quality output.
fn splitmix64_mix(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9e3779b97f4a7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}

/// Generate a good gamma value for SplitMix64.
fn mix_gamma(mut z: u64) -> u64 {
    z = splitmix64_mix(z);
    // Ensure gamma is odd for maximal period
    (z | 1).wrapping_mul(0x9e3779b97f4a7c15)
}
