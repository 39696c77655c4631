//! Parallel batch execution.
//!
//! Each instance index in the configured range becomes one task on a
//! fixed-size rayon pool. A task loads its instance, runs NEH with its own
//! evaluator, and writes one row of the shared [`ResultsTable`].
//!
//! The first failing task stops the dispatch of instances that have not
//! started yet. Tasks already running finish normally and keep their rows.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

use rayon::prelude::*;
use tracing::{debug, error, info};

use super::config::BatchConfig;
use super::table::{ResultRecord, ResultsTable};
use crate::error::{Error, Result};
use crate::flowshop::{Evaluator, Variant};
use crate::neh::{NehConfig, NehRunner, TiePolicy};

/// Status of a task, and of a batch as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Ok,
    /// The instance file could not be read or parsed.
    LoadFailed,
    /// The NEH search returned an error.
    SearchFailed,
    /// The result row or the time-matrix files could not be written.
    OutputFailed,
    /// Not started because the batch was cancelled.
    Cancelled,
}

impl TaskStatus {
    /// Process-style status code; zero means success.
    pub fn code(self) -> i32 {
        match self {
            TaskStatus::Ok => 0,
            TaskStatus::LoadFailed => 1,
            TaskStatus::SearchFailed => 2,
            TaskStatus::OutputFailed => 3,
            TaskStatus::Cancelled => 4,
        }
    }

    #[inline]
    pub fn is_ok(self) -> bool {
        self == TaskStatus::Ok
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TaskStatus::Ok => "ok",
            TaskStatus::LoadFailed => "instance load failed",
            TaskStatus::SearchFailed => "search failed",
            TaskStatus::OutputFailed => "output failed",
            TaskStatus::Cancelled => "cancelled",
        };
        f.write_str(text)
    }
}

/// Result of a batch run.
#[derive(Debug)]
pub struct BatchOutcome {
    /// First failure, or [`TaskStatus::Ok`].
    pub status: TaskStatus,

    /// Rows written by tasks that completed.
    pub table: ResultsTable,

    /// Number of instances whose task started.
    pub attempted: usize,

    /// Wall-clock time of the whole batch.
    pub elapsed: Duration,
}

/// Executes one NEH search per instance on a bounded worker pool.
///
/// # Usage
///
/// ```no_run
/// use flowshop_neh::batch::{BatchConfig, BatchRunner};
///
/// let config = BatchConfig::from_file("params.toml").unwrap();
/// let outcome = BatchRunner::run(&config).unwrap();
/// std::process::exit(outcome.status.code());
/// ```
pub struct BatchRunner;

impl BatchRunner {
    /// Runs the batch and exports the results CSV when configured.
    pub fn run(config: &BatchConfig) -> Result<BatchOutcome> {
        Self::run_with_cancel(config, None)
    }

    /// Runs the batch with an optional cancellation token.
    ///
    /// When `cancel` is set, no further instances are started and the
    /// batch reports [`TaskStatus::Cancelled`]. The results CSV is only
    /// written for successful batches.
    pub fn run_with_cancel(
        config: &BatchConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<BatchOutcome> {
        config.validate()?;

        let threads = config.threads();
        let variant = config.variant();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("neh-worker-{i}"))
            .build()
            .map_err(|e| Error::Runtime(format!("failed to start worker pool: {e}")))?;

        info!(
            threads,
            variant = %variant,
            first = config.min_test_file,
            last = config.max_test_file,
            "Running NEH batch"
        );

        let table = ResultsTable::new(config.min_test_file, config.max_test_file);
        let failed = AtomicBool::new(false);
        let first_failure: OnceLock<TaskStatus> = OnceLock::new();
        let attempted = AtomicUsize::new(0);
        let started = Instant::now();

        let dispatched = pool.install(|| {
            (config.min_test_file..=config.max_test_file)
                .into_par_iter()
                .try_for_each(|index| {
                    let cancelled = cancel
                        .as_ref()
                        .is_some_and(|flag| flag.load(Ordering::Relaxed));
                    if cancelled || failed.load(Ordering::Acquire) {
                        return Err(TaskStatus::Cancelled);
                    }

                    attempted.fetch_add(1, Ordering::Relaxed);
                    run_instance(config, variant, index, &table).map_err(|status| {
                        if first_failure.set(status).is_ok() {
                            failed.store(true, Ordering::Release);
                        }
                        status
                    })
                })
        });

        let status = first_failure
            .get()
            .copied()
            .unwrap_or_else(|| dispatched.err().unwrap_or(TaskStatus::Ok));
        let elapsed = started.elapsed();

        if status.is_ok() {
            info!(
                instances = table.completed(),
                elapsed_ms = elapsed.as_millis() as u64,
                "Batch finished"
            );
            if !config.results_file.is_empty() {
                table.export_csv(&config.results_file)?;
                info!(path = %config.results_file, "Results exported");
            }
        } else {
            error!(
                status = %status,
                code = status.code(),
                completed = table.completed(),
                "Batch stopped"
            );
        }

        Ok(BatchOutcome {
            status,
            table,
            attempted: attempted.into_inner(),
            elapsed,
        })
    }
}

/// Solves one instance and records its row.
fn run_instance(
    config: &BatchConfig,
    variant: Variant,
    index: u32,
    table: &ResultsTable,
) -> std::result::Result<(), TaskStatus> {
    let path = config.instance_path(index);
    let evaluator = Evaluator::from_file(&path, variant).map_err(|e| {
        error!(instance = index, error = %e, "Failed to load instance");
        TaskStatus::LoadFailed
    })?;

    // One seeded stream per instance, independent of scheduling order.
    let neh_config = NehConfig {
        tie_policy: TiePolicy::CoinFlip,
        seed: config.seed.map(|s| s.wrapping_add(u64::from(index))),
    };
    let result = NehRunner::run(&evaluator, &neh_config).map_err(|e| {
        error!(instance = index, error = %e, "NEH search failed");
        TaskStatus::SearchFailed
    })?;

    let schedule = &result.schedule;
    table
        .insert(ResultRecord {
            instance: index,
            makespan: schedule.makespan(),
            total_flow_time: schedule.total_flow_time(),
            evaluations: evaluator.call_count(),
            elapsed: result.elapsed,
            sequence: schedule.to_string(),
        })
        .map_err(|e| {
            error!(instance = index, error = %e, "Failed to record result");
            TaskStatus::OutputFailed
        })?;

    if let Some(prefix) = config.times_prefix(index) {
        schedule.write_times_csv(&prefix).map_err(|e| {
            error!(instance = index, error = %e, "Failed to write time matrices");
            TaskStatus::OutputFailed
        })?;
    }

    debug!(
        instance = index,
        makespan = schedule.makespan(),
        evaluations = evaluator.call_count(),
        elapsed_ms = result.elapsed.as_millis() as u64,
        "Instance solved"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(TaskStatus::Ok.code(), 0);
        assert!(TaskStatus::Ok.is_ok());
        for status in [
            TaskStatus::LoadFailed,
            TaskStatus::SearchFailed,
            TaskStatus::OutputFailed,
            TaskStatus::Cancelled,
        ] {
            assert_ne!(status.code(), 0);
            assert!(!status.is_ok());
        }
    }

    #[test]
    fn test_invalid_range_rejected() {
        let config = BatchConfig::default().with_range(3, 1);
        assert!(matches!(BatchRunner::run(&config), Err(Error::Config(_))));
    }

    #[test]
    fn test_missing_instance_reports_load_failure() {
        let config = BatchConfig::default()
            .with_range(0, 0)
            .with_input_dir("/nonexistent/flowshop/");
        let outcome = BatchRunner::run(&config).unwrap();
        assert_eq!(outcome.status, TaskStatus::LoadFailed);
        assert_eq!(outcome.status.code(), 1);
        assert_eq!(outcome.attempted, 1);
        assert_eq!(outcome.table.completed(), 0);
    }
}
