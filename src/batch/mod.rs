//! Bounded-concurrency batch runner.
//!
//! Solves a contiguous range of instance files (`<dir><index>.txt`) with
//! NEH, one task per instance, on a pool of 1 to 16 worker threads.
//!
//! # Key Types
//!
//! - [`BatchConfig`]: run options, loadable from a TOML parameter file
//! - [`BatchRunner`]: pool setup, dispatch, fail-fast aggregation
//! - [`ResultsTable`]: index-keyed, write-once result rows with CSV export
//! - [`TaskStatus`]: per-task and per-batch status codes

mod config;
mod runner;
mod table;

pub use config::{BatchConfig, MAX_THREADS, TEST_PLACEHOLDER};
pub use runner::{BatchOutcome, BatchRunner, TaskStatus};
pub use table::{ResultRecord, ResultsTable, RESULT_COLUMNS};
