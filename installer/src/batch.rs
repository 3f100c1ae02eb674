//! Runs one operation per tool on a bounded pool of worker threads.
//!
//! Workers pull the next item index from a shared counter and send
//! `(index, outcome)` pairs back over a channel. Outcomes are re-ordered by
//! index so callers always see results in request order, whatever order the
//! workers finished in. A failing item never stops the others.

use crate::error::{InstallerError, Result};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;

/// Outcomes of a batch, in the order the items were given.
#[derive(Debug)]
pub struct BatchReport<T> {
    outcomes: Vec<Result<T>>,
}

impl<T> BatchReport<T> {
    /// All outcomes, in input order.
    #[must_use]
    pub fn outcomes(&self) -> &[Result<T>] {
        &self.outcomes
    }

    /// Consume the report and return every outcome, in input order.
    #[must_use]
    pub fn into_outcomes(self) -> Vec<Result<T>> {
        self.outcomes
    }

    /// Successful results, in input order.
    pub fn successes(&self) -> impl Iterator<Item = &T> {
        self.outcomes.iter().filter_map(|outcome| outcome.as_ref().ok())
    }

    /// Failures, in input order.
    pub fn failures(&self) -> impl Iterator<Item = &InstallerError> {
        self.outcomes.iter().filter_map(|outcome| outcome.as_ref().err())
    }

    /// Number of items attempted.
    #[must_use]
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// Number of failed items.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failures().count()
    }

    /// Whether every item succeeded.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(Result::is_ok)
    }

    /// Collapse the report into a single result.
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::BatchFailed`] if any item failed.
    pub fn into_result(self) -> Result<Vec<T>> {
        let failed = self.failed();
        if failed > 0 {
            return Err(InstallerError::BatchFailed {
                failed,
                total: self.total(),
            });
        }
        Ok(self.outcomes.into_iter().filter_map(Result::ok).collect())
    }
}

/// Run `op` once per item on up to `jobs` worker threads.
///
/// A `jobs` value of zero is treated as one. No more workers are started
/// than there are items.
pub fn run_batch<I, T, F>(items: &[I], jobs: usize, op: F) -> BatchReport<T>
where
    I: Sync,
    T: Send,
    F: Fn(&I) -> Result<T> + Sync,
{
    let workers = jobs.clamp(1, items.len().max(1));
    log::debug!("running {} item(s) on {workers} worker(s)", items.len());

    if workers == 1 {
        return BatchReport {
            outcomes: items.iter().map(&op).collect(),
        };
    }

    let next = AtomicUsize::new(0);
    let (tx, rx) = mpsc::channel();

    thread::scope(|scope| {
        for _ in 0..workers {
            let tx = tx.clone();
            let next = &next;
            let op = &op;
            scope.spawn(move || {
                loop {
                    let index = next.fetch_add(1, Ordering::Relaxed);
                    let Some(item) = items.get(index) else {
                        break;
                    };
                    if tx.send((index, op(item))).is_err() {
                        break;
                    }
                }
            });
        }
    });
    drop(tx);

    let mut indexed: Vec<(usize, Result<T>)> = rx.into_iter().collect();
    indexed.sort_by_key(|(index, _)| *index);
    BatchReport {
        outcomes: indexed.into_iter().map(|(_, outcome)| outcome).collect(),
    }
}
