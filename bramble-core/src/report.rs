//! Run reports and the bookkeeping that produces them.

use std::fmt;

/// Structured outcome of a property run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunDetails<T> {
    /// Whether a counterexample was found. Always `counterexample.is_some()`.
    pub failed: bool,
    /// Non-skipped trials performed, including the failing one.
    pub total_runs: usize,
    /// Trials whose precondition did not hold.
    pub total_skips: usize,
    /// Number of shrink descents taken from the original failure.
    pub shrink_depth: usize,
    /// Seed the run was started with.
    pub seed: u64,
    /// Minimal counterexample found by the shrink search.
    pub counterexample: Option<T>,
    /// Colon-joined trial index followed by one sibling index per descent.
    pub counterexample_path: Option<String>,
    /// Every failing value visited, root first. Empty unless verbose.
    pub visited_failures: Vec<T>,
    /// Cause reported by the last failing evaluation.
    pub error_cause: Option<String>,
}

impl<T> RunDetails<T> {
    /// Check if the run passed.
    pub fn passed(&self) -> bool {
        !self.failed
    }
}

impl<T: fmt::Debug> RunDetails<T> {
    /// Render the failure message, or `None` if the run passed.
    pub fn failure_message(&self) -> Option<String> {
        let counterexample = self.counterexample.as_ref()?;
        let mut message = format!(
            "Property failed after {} tests (seed: {}, path: {}): {:?}\nGot error: {}",
            self.total_runs,
            self.seed,
            self.counterexample_path.as_deref().unwrap_or(""),
            counterexample,
            self.error_cause.as_deref().unwrap_or(""),
        );

        if !self.visited_failures.is_empty() {
            message.push_str("\n\nEncountered failures were:");
            for failure in &self.visited_failures {
                message.push_str(&format!("\n- {failure:?}"));
            }
        }

        Some(message)
    }
}

impl<T: fmt::Debug> fmt::Display for RunDetails<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.failure_message() {
            Some(message) => f.write_str(&message),
            None => write!(
                f,
                "Property passed {} tests (seed: {}, skipped: {})",
                self.total_runs, self.seed, self.total_skips
            ),
        }
    }
}

/// Mutable state of one in-flight run, assembled into [`RunDetails`] at the end.
#[derive(Debug)]
pub struct RunExecution<T> {
    verbose: bool,
    total_runs: usize,
    total_skips: usize,
    path: Vec<usize>,
    visited_failures: Vec<T>,
    error_cause: Option<String>,
}

impl<T: Clone> RunExecution<T> {
    /// Start bookkeeping for a new run.
    pub fn new(verbose: bool) -> Self {
        RunExecution {
            verbose,
            total_runs: 0,
            total_skips: 0,
            path: Vec::new(),
            visited_failures: Vec::new(),
            error_cause: None,
        }
    }

    /// Non-skipped trials so far.
    pub fn total_runs(&self) -> usize {
        self.total_runs
    }

    /// Skipped trials so far.
    pub fn total_skips(&self) -> usize {
        self.total_skips
    }

    /// Record a passing trial.
    pub fn success(&mut self) {
        self.total_runs += 1;
    }

    /// Record a trial whose precondition did not hold.
    pub fn skip(&mut self) {
        self.total_skips += 1;
    }

    /// Record the failing trial reached through `path`.
    ///
    /// `path` is the trial index for a fresh run, or the whole replay path.
    pub fn fail(&mut self, path: &[usize], value: &T, cause: String) {
        self.total_runs += 1;
        self.path = path.to_vec();
        self.record(value, cause);
    }

    /// Record a descent into the failing child at `index`.
    pub fn shrink(&mut self, index: usize, value: &T, cause: String) {
        self.path.push(index);
        self.record(value, cause);
    }

    fn record(&mut self, value: &T, cause: String) {
        if self.verbose {
            self.visited_failures.push(value.clone());
        }
        self.error_cause = Some(cause);
    }

    /// Produce the final report. `counterexample` is the value the shrink search settled on.
    pub fn into_details(self, seed: u64, counterexample: Option<T>) -> RunDetails<T> {
        let failed = counterexample.is_some();
        let (shrink_depth, counterexample_path) = if failed {
            let path = self
                .path
                .iter()
                .map(|index| index.to_string())
                .collect::<Vec<_>>()
                .join(":");
            (self.path.len().saturating_sub(1), Some(path))
        } else {
            (0, None)
        };

        RunDetails {
            failed,
            total_runs: self.total_runs,
            total_skips: self.total_skips,
            shrink_depth,
            seed,
            counterexample,
            counterexample_path,
            visited_failures: if failed {
                self.visited_failures
            } else {
                Vec::new()
            },
            error_cause: if failed { self.error_cause } else { None },
        }
    }
}
