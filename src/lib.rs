//! Permutation flow-shop scheduling with the NEH heuristic.
//!
//! Provides:
//!
//! - **Objective evaluation**: start/completion time matrices, makespan and
//!   total flow time of a job sequence under three buffer policies
//!   (unlimited, blocking, no-wait).
//! - **NEH**: Nawaz-Enscore-Ham greedy insertion heuristic over any
//!   [`neh::SequenceObjective`], with a seedable tie-break generator.
//! - **Batch runner**: solves many instance files concurrently on a bounded
//!   rayon pool with fail-fast aggregation into an index-keyed results table.
//!
//! # Architecture
//!
//! `flowshop` holds the domain model and evaluators, `neh` the search, and
//! `batch` the parallel driver used by the `flowshop-neh` binary. Errors from
//! every layer share [`Error`].
//!
//! # Quick Start
//!
//! ```
//! use flowshop_neh::flowshop::{Evaluator, Instance, Variant};
//! use flowshop_neh::neh::{NehConfig, NehRunner};
//!
//! let inst = Instance::from_rows(vec![vec![5, 2, 7, 3], vec![1, 6, 4, 8]]).unwrap();
//! let eval = Evaluator::new(inst, Variant::NoWait);
//! let result = NehRunner::run(&eval, &NehConfig::default().with_seed(42)).unwrap();
//! println!("{} -> C_max {}", result.schedule, result.schedule.makespan());
//! ```

pub mod batch;
pub mod error;
pub mod flowshop;
pub mod matrix;
pub mod neh;

pub use error::{Error, Result, ValidationError, ValidationErrorKind};
