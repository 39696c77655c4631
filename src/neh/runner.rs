//! NEH execution loop.
//!
//! # Algorithm
//!
//! 1. Order jobs by decreasing total processing time (ties: ascending id)
//! 2. Start the partial sequence with the first job
//! 3. For each remaining job:
//!    a. Evaluate every insertion position `0..=k` of the partial sequence
//!    b. Keep the strictly best makespan; on an exact tie, switch with
//!       probability 0.5 (or keep the first, per [`TiePolicy`])
//! 4. The final partial sequence is the result

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::config::{NehConfig, TiePolicy};
use super::types::{JobTimePair, SequenceObjective};
use crate::error::{Error, Result};
use crate::flowshop::Schedule;

/// Result of an NEH run.
#[derive(Debug, Clone)]
pub struct NehResult {
    /// Schedule of the final sequence.
    pub schedule: Schedule,

    /// Number of objective evaluations performed.
    pub evaluations: usize,

    /// Wall-clock time spent in the search.
    pub elapsed: Duration,
}

/// Executes the NEH heuristic.
///
/// # Usage
///
/// ```
/// use flowshop_neh::flowshop::{Evaluator, Instance, Variant};
/// use flowshop_neh::neh::{NehConfig, NehRunner, TiePolicy};
///
/// let inst = Instance::from_rows(vec![vec![2, 3, 1], vec![4, 1, 5]]).unwrap();
/// let eval = Evaluator::new(inst, Variant::Unlimited);
/// let config = NehConfig::default().with_tie_policy(TiePolicy::KeepFirst);
///
/// let result = NehRunner::run(&eval, &config).unwrap();
/// assert_eq!(result.schedule.makespan(), 11);
/// ```
pub struct NehRunner;

impl NehRunner {
    /// Runs NEH with a generator seeded from `config.seed`.
    pub fn run<P: SequenceObjective>(problem: &P, config: &NehConfig) -> Result<NehResult> {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };
        Self::run_with_rng(problem, config.tie_policy, &mut rng)
    }

    /// Runs NEH drawing tie-break coin flips from `rng`.
    ///
    /// Any evaluation error aborts the search and is returned as-is.
    pub fn run_with_rng<P: SequenceObjective, R: Rng>(
        problem: &P,
        tie_policy: TiePolicy,
        rng: &mut R,
    ) -> Result<NehResult> {
        let started = Instant::now();

        let order = Self::initial_order(problem);
        let mut remaining = order.iter().map(|pair| pair.job);
        let first = remaining
            .next()
            .ok_or_else(|| Error::Runtime("NEH requires at least one job".into()))?;

        let mut partial = vec![first];
        let mut best: Option<Schedule> = None;
        let mut evaluations = 0usize;

        for job in remaining {
            let schedule = best_insertion(problem, &partial, job, tie_policy, rng)?;
            evaluations += partial.len() + 1;
            partial.clear();
            partial.extend_from_slice(schedule.sequence());
            best = Some(schedule);
        }

        let schedule = match best {
            Some(schedule) => schedule,
            None => {
                evaluations += 1;
                problem.evaluate(&partial)?
            }
        };

        Ok(NehResult {
            schedule,
            evaluations,
            elapsed: started.elapsed(),
        })
    }

    /// Jobs sorted by decreasing weight, ties by ascending job id.
    pub fn initial_order<P: SequenceObjective>(problem: &P) -> Vec<JobTimePair> {
        let mut pairs: Vec<JobTimePair> = (1..=problem.job_count())
            .map(|job| JobTimePair::new(job, problem.job_weight(job)))
            .collect();
        pairs.sort_by(|a, b| b.time.cmp(&a.time).then(a.job.cmp(&b.job)));
        pairs
    }
}

/// Tries `job` at every position of `base` and returns the winning schedule.
fn best_insertion<P: SequenceObjective, R: Rng>(
    problem: &P,
    base: &[usize],
    job: usize,
    tie_policy: TiePolicy,
    rng: &mut R,
) -> Result<Schedule> {
    let mut candidate = Vec::with_capacity(base.len() + 1);
    let mut best: Option<Schedule> = None;

    for pos in 0..=base.len() {
        candidate.clear();
        candidate.extend_from_slice(&base[..pos]);
        candidate.push(job);
        candidate.extend_from_slice(&base[pos..]);

        let schedule = problem.evaluate(&candidate)?;
        let replace = match &best {
            None => true,
            Some(incumbent) if schedule.makespan() < incumbent.makespan() => true,
            Some(incumbent) if schedule.makespan() == incumbent.makespan() => {
                tie_policy == TiePolicy::CoinFlip && rng.random_bool(0.5)
            }
            Some(_) => false,
        };
        if replace {
            best = Some(schedule);
        }
    }

    best.ok_or_else(|| Error::Runtime(format!("no insertion evaluated for job {job}")))
}

// ============================================================================
// Tests
// ============================================================================
