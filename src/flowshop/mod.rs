//! Permutation flow-shop model and objective evaluation.
//!
//! Every job visits machines `1..=M` in the same order. Given a job
//! sequence, an [`Evaluator`] computes when each job starts and leaves
//! each machine under one of three buffer policies:
//!
//! - **Unlimited**: jobs may queue between machines without limit.
//! - **Blocking**: no intermediate buffers; a finished job occupies its
//!   machine until the next machine is free.
//! - **NoWait**: a job, once started, moves through all machines without
//!   waiting; its start is delayed instead.
//!
//! # Key Types
//!
//! - [`Instance`]: processing-time matrix (machines x jobs)
//! - [`Evaluator`]: sequence → [`Schedule`] driver for one [`Variant`]
//! - [`Schedule`]: start/completion matrices, makespan, total flow time
//!
//! # Reference
//!
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 6

mod evaluator;
mod instance;
mod schedule;

pub use evaluator::{Evaluator, Variant};
pub use instance::Instance;
pub use schedule::{read_matrix_csv, write_matrix_csv, Schedule};
