//! Index-keyed results table shared by batch workers.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

use crate::error::{Error, Result};

/// CSV header of the results export.
pub const RESULT_COLUMNS: [&str; 6] = [
    "Data Set",
    "cMax",
    "TFT",
    "Func Calls",
    "Execution Time (ms)",
    "Sequence",
];

/// Outcome of one instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRecord {
    /// Instance index (the `<index>` of `<index>.txt`).
    pub instance: u32,
    pub makespan: u64,
    pub total_flow_time: u64,
    /// Objective evaluations performed by the instance's evaluator.
    pub evaluations: usize,
    pub elapsed: Duration,
    /// Final sequence rendered as `[j1-j2-...-jn]`.
    pub sequence: String,
}

impl ResultRecord {
    /// Elapsed search time in milliseconds.
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }
}

/// One slot per instance index in `first..=last`.
///
/// Each slot is written at most once. Readers see either nothing or the
/// complete record, so workers never need a lock.
#[derive(Debug)]
pub struct ResultsTable {
    first: u32,
    rows: Vec<OnceLock<ResultRecord>>,
}

impl ResultsTable {
    /// Creates an empty table covering `first..=last`.
    pub fn new(first: u32, last: u32) -> Self {
        let len = if last < first {
            0
        } else {
            (last - first) as usize + 1
        };
        Self {
            first,
            rows: (0..len).map(|_| OnceLock::new()).collect(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn slot(&self, instance: u32) -> Option<&OnceLock<ResultRecord>> {
        let offset = instance.checked_sub(self.first)? as usize;
        self.rows.get(offset)
    }

    /// Stores a record at its instance's row.
    ///
    /// Fails if the index is outside the table or the row is already set.
    pub fn insert(&self, record: ResultRecord) -> Result<()> {
        let instance = record.instance;
        let slot = self.slot(instance).ok_or_else(|| {
            Error::Runtime(format!("instance {instance} is outside the results table"))
        })?;
        slot.set(record)
            .map_err(|_| Error::Runtime(format!("results row {instance} written twice")))
    }

    /// Record for `instance`, if written.
    pub fn get(&self, instance: u32) -> Option<&ResultRecord> {
        self.slot(instance)?.get()
    }

    /// Number of rows written so far.
    pub fn completed(&self) -> usize {
        self.rows.iter().filter(|r| r.get().is_some()).count()
    }

    /// Whether every row has been written.
    pub fn is_complete(&self) -> bool {
        self.rows.iter().all(|r| r.get().is_some())
    }

    /// Iterates over `(instance, record)` in index order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, Option<&ResultRecord>)> {
        self.rows
            .iter()
            .enumerate()
            .map(|(offset, row)| (self.first + offset as u32, row.get()))
    }

    /// Writes the table as CSV. Unwritten rows keep only their index.
    pub fn write_csv<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        writeln!(out, "{}", RESULT_COLUMNS.join(","))?;
        for (instance, record) in self.iter() {
            match record {
                Some(r) => writeln!(
                    out,
                    "{},{},{},{},{:.3},{}",
                    instance,
                    r.makespan,
                    r.total_flow_time,
                    r.evaluations,
                    r.elapsed_ms(),
                    r.sequence
                )?,
                None => writeln!(out, "{instance},,,,,")?,
            }
        }
        Ok(())
    }

    /// Exports the table to a CSV file, truncating any existing file.
    pub fn export_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| Error::io(path, e))?;
        let mut out = BufWriter::new(file);
        self.write_csv(&mut out)
            .and_then(|_| out.flush())
            .map_err(|e| Error::io(path, e))
    }
}
