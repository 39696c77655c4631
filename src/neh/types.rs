//! Core trait for NEH problems.

use crate::error::Result;
use crate::flowshop::{Evaluator, Schedule};

/// A permutation objective that NEH can minimize.
///
/// Jobs are identified by `1..=job_count()`. [`evaluate`](SequenceObjective::evaluate)
/// must accept any duplicate-free partial sequence of those ids.
///
/// [`Evaluator`] is the production implementation; tests plug in
/// synthetic objectives to observe the search.
pub trait SequenceObjective: Send + Sync {
    /// Number of jobs to place.
    fn job_count(&self) -> usize;

    /// Ordering weight of a job. NEH inserts heavier jobs first.
    fn job_weight(&self, job: usize) -> u64;

    /// Evaluates a (partial) sequence.
    fn evaluate(&self, sequence: &[usize]) -> Result<Schedule>;
}

impl SequenceObjective for Evaluator {
    fn job_count(&self) -> usize {
        self.total_jobs()
    }

    /// Total processing time of the job over all machines.
    fn job_weight(&self, job: usize) -> u64 {
        self.instance().job_total(job)
    }

    fn evaluate(&self, sequence: &[usize]) -> Result<Schedule> {
        Evaluator::evaluate(self, sequence)
    }
}

/// A job and its total processing time, used to build the insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobTimePair {
    pub job: usize,
    pub time: u64,
}

impl JobTimePair {
    pub fn new(job: usize, time: u64) -> Self {
        Self { job, time }
    }
}
