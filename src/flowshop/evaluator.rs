//! Objective evaluation: job sequence to schedule.
//!
//! A single driver handles validation, allocation, and the derivation of
//! start times and scalar objectives. The three flow-shop variants differ
//! only in how the first column is seeded and how each later column is
//! advanced from its predecessor; both steps dispatch on [`Variant`].
//!
//! # Recurrences
//!
//! With `p[r][c]` the processing time of the job at position `c` on
//! machine `r` and `D` the completion (departure) matrix:
//!
//! | Variant | Column `c > 0` |
//! |---------|----------------|
//! | Unlimited | `D[r][c] = max(D[r-1][c], D[r][c-1]) + p[r][c]` |
//! | Blocking | `D[r][c] = max(D[r-1][c] + p[r][c], D[r+1][c-1])`, last row unblocked |
//! | NoWait | `D[r][c] = D[r-1][c] + p[r][c]`, shifting `D[0..r][c]` forward when machine `r` is still busy |
//!
//! All variants run in O(machines x sequence length).
//!
//! # References
//!
//! - Nawaz, Enscore & Ham (1983), "A heuristic algorithm for the m-machine,
//!   n-job flow-shop sequencing problem"
//! - Hall & Sriskandarajah (1996), "A survey of machine scheduling problems
//!   with blocking and no-wait in process"

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::instance::Instance;
use super::schedule::Schedule;
use crate::error::{Result, ValidationError, ValidationErrorKind};
use crate::matrix::Matrix;

/// Flow-shop variant selecting the column recurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Variant {
    /// Unlimited buffers between machines.
    #[default]
    Unlimited,
    /// No buffers: a machine holds a finished job until the next machine is free.
    Blocking,
    /// A job flows through every machine without waiting.
    NoWait,
}

impl Variant {
    /// All variants in selector order.
    pub const ALL: [Variant; 3] = [Variant::Unlimited, Variant::Blocking, Variant::NoWait];

    /// Maps the numeric selector `0 | 1 | 2` used in run configurations.
    pub fn from_selector(selector: i64) -> Option<Self> {
        match selector {
            0 => Some(Variant::Unlimited),
            1 => Some(Variant::Blocking),
            2 => Some(Variant::NoWait),
            _ => None,
        }
    }

    /// Numeric selector of this variant.
    pub fn selector(self) -> i64 {
        match self {
            Variant::Unlimited => 0,
            Variant::Blocking => 1,
            Variant::NoWait => 2,
        }
    }

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            Variant::Unlimited => "Flow Shop",
            Variant::Blocking => "Flow Shop with Blocking",
            Variant::NoWait => "Flow Shop with No Wait",
        }
    }

    /// Seeds column 0: the first job passes every machine back to back.
    /// Identical for all variants.
    fn init_column(self, p: &ProcView<'_>, depart: &mut Matrix<u64>) {
        depart[(0, 0)] = p.at(0, 0);
        for r in 1..p.rows {
            depart[(r, 0)] = depart[(r - 1, 0)] + p.at(r, 0);
        }
    }

    /// Fills column `c > 0` from column `c - 1`.
    fn advance_column(self, p: &ProcView<'_>, depart: &mut Matrix<u64>, c: usize) {
        match self {
            Variant::Unlimited => advance_unlimited(p, depart, c),
            Variant::Blocking => advance_blocking(p, depart, c),
            Variant::NoWait => advance_no_wait(p, depart, c),
        }
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Processing times permuted by a sequence, 0-based position access.
struct ProcView<'a> {
    times: &'a Matrix<u32>,
    sequence: &'a [usize],
    rows: usize,
}

impl ProcView<'_> {
    #[inline]
    fn at(&self, row: usize, pos: usize) -> u64 {
        u64::from(self.times[(row, self.sequence[pos] - 1)])
    }
}

fn advance_unlimited(p: &ProcView<'_>, d: &mut Matrix<u64>, c: usize) {
    d[(0, c)] = d[(0, c - 1)] + p.at(0, c);
    for r in 1..p.rows {
        d[(r, c)] = d[(r - 1, c)].max(d[(r, c - 1)]) + p.at(r, c);
    }
}

fn advance_blocking(p: &ProcView<'_>, d: &mut Matrix<u64>, c: usize) {
    let rows = p.rows;
    if rows == 1 {
        // Nothing downstream can block a single machine.
        d[(0, c)] = d[(0, c - 1)] + p.at(0, c);
        return;
    }

    d[(0, c)] = (d[(0, c - 1)] + p.at(0, c)).max(d[(1, c - 1)]);
    for r in 1..rows - 1 {
        d[(r, c)] = (d[(r - 1, c)] + p.at(r, c)).max(d[(r + 1, c - 1)]);
    }
    d[(rows - 1, c)] = d[(rows - 2, c)] + p.at(rows - 1, c);
}

fn advance_no_wait(p: &ProcView<'_>, d: &mut Matrix<u64>, c: usize) {
    d[(0, c)] = d[(0, c - 1)] + p.at(0, c);
    for r in 1..p.rows {
        let arrival = d[(r - 1, c)];
        let free = d[(r, c - 1)];
        if arrival < free {
            // Delay the whole upstream chain so the job arrives exactly
            // when machine r frees up.
            let deficit = free - arrival;
            for upstream in 0..r {
                d[(upstream, c)] += deficit;
            }
        }
        d[(r, c)] = d[(r - 1, c)] + p.at(r, c);
    }
}

/// Evaluates job sequences against one instance under one variant.
///
/// Owns its [`Instance`]. Every successful [`evaluate`](Evaluator::evaluate)
/// increments an internal call counter.
///
/// # Examples
///
/// ```
/// use flowshop_neh::flowshop::{Evaluator, Instance, Variant};
///
/// let inst = Instance::from_rows(vec![vec![2, 3, 1], vec![4, 1, 5]]).unwrap();
/// let eval = Evaluator::new(inst, Variant::Unlimited);
///
/// let schedule = eval.evaluate(&[1, 2, 3]).unwrap();
/// assert_eq!(schedule.makespan(), 12);
/// assert_eq!(schedule.total_flow_time(), 25);
/// assert_eq!(eval.call_count(), 1);
/// ```
#[derive(Debug)]
pub struct Evaluator {
    instance: Instance,
    variant: Variant,
    calls: AtomicUsize,
}

impl Evaluator {
    pub fn new(instance: Instance, variant: Variant) -> Self {
        Self {
            instance,
            variant,
            calls: AtomicUsize::new(0),
        }
    }

    /// Loads an instance file and wraps it.
    pub fn from_file<P: AsRef<Path>>(path: P, variant: Variant) -> Result<Self> {
        Ok(Self::new(Instance::from_file(path)?, variant))
    }

    #[inline]
    pub fn variant(&self) -> Variant {
        self.variant
    }

    #[inline]
    pub fn instance(&self) -> &Instance {
        &self.instance
    }

    #[inline]
    pub fn total_jobs(&self) -> usize {
        self.instance.jobs()
    }

    #[inline]
    pub fn total_machines(&self) -> usize {
        self.instance.machines()
    }

    /// Processing time of `job` on `machine`, both 1-based.
    pub fn processing_time(&self, machine: usize, job: usize) -> Option<u32> {
        self.instance.processing_time(machine, job)
    }

    /// Number of successful evaluations so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    /// Checks a sequence without evaluating it.
    ///
    /// Rejects empty sequences, sequences longer than the job count, ids
    /// outside `[1, total_jobs]`, and repeated ids.
    pub fn validate(&self, sequence: &[usize]) -> Result<()> {
        let n = self.total_jobs();
        if sequence.is_empty() {
            return Err(ValidationError::new(
                ValidationErrorKind::EmptySequence,
                "sequence is empty",
            )
            .into());
        }
        if sequence.len() > n {
            return Err(ValidationError::new(
                ValidationErrorKind::SequenceTooLong,
                format!("sequence has {} jobs, instance has {n}", sequence.len()),
            )
            .into());
        }

        let mut seen = vec![false; n];
        for (pos, &job) in sequence.iter().enumerate() {
            if job == 0 || job > n {
                return Err(ValidationError::new(
                    ValidationErrorKind::JobOutOfRange,
                    format!("job {job} at position {pos} is outside [1, {n}]"),
                )
                .into());
            }
            if std::mem::replace(&mut seen[job - 1], true) {
                return Err(ValidationError::new(
                    ValidationErrorKind::DuplicateJob,
                    format!("job {job} appears more than once"),
                )
                .into());
            }
        }
        Ok(())
    }

    /// Computes start and completion times for `sequence`.
    pub fn evaluate(&self, sequence: &[usize]) -> Result<Schedule> {
        self.validate(sequence)?;

        let rows = self.total_machines();
        let cols = sequence.len();
        let p = ProcView {
            times: self.instance.times(),
            sequence,
            rows,
        };

        let mut depart = Matrix::try_new(rows, cols)?;
        self.variant.init_column(&p, &mut depart);
        for c in 1..cols {
            self.variant.advance_column(&p, &mut depart, c);
        }

        let mut start = Matrix::try_new(rows, cols)?;
        for r in 0..rows {
            for c in 0..cols {
                start[(r, c)] = depart[(r, c)] - p.at(r, c);
            }
        }

        self.calls.fetch_add(1, Ordering::Relaxed);
        Ok(Schedule::new(sequence.to_vec(), start, depart))
    }
}
