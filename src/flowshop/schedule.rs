//! Evaluated schedule for one job sequence.

use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::matrix::Matrix;

/// Start and completion times produced by evaluating a job sequence.
///
/// Row `m` of each matrix is machine `m + 1`; column `c` is the job at
/// position `c` of [`sequence`](Schedule::sequence). For the blocking and
/// no-wait variants the completion matrix holds departure times.
///
/// `Clone` deep-copies both matrices. [`Schedule::take`] moves the contents
/// out and leaves an empty schedule behind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schedule {
    sequence: Vec<usize>,
    start: Matrix<u64>,
    completion: Matrix<u64>,
    makespan: u64,
    total_flow_time: u64,
}

impl Schedule {
    pub(crate) fn new(sequence: Vec<usize>, start: Matrix<u64>, completion: Matrix<u64>) -> Self {
        let (makespan, total_flow_time) = if completion.is_empty() {
            (0, 0)
        } else {
            let last = completion.row(completion.rows() - 1);
            (last[last.len() - 1], last.iter().sum())
        };
        Self {
            sequence,
            start,
            completion,
            makespan,
            total_flow_time,
        }
    }

    /// Job ids (1-based) in processing order.
    #[inline]
    pub fn sequence(&self) -> &[usize] {
        &self.sequence
    }

    #[inline]
    pub fn start_times(&self) -> &Matrix<u64> {
        &self.start
    }

    #[inline]
    pub fn completion_times(&self) -> &Matrix<u64> {
        &self.completion
    }

    /// C_max: completion of the last job on the last machine.
    #[inline]
    pub fn makespan(&self) -> u64 {
        self.makespan
    }

    /// Sum of completion times on the last machine.
    #[inline]
    pub fn total_flow_time(&self) -> u64 {
        self.total_flow_time
    }

    /// Whether this schedule holds no sequence (default or taken-from).
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Moves the contents out, leaving an empty schedule in place.
    pub fn take(&mut self) -> Schedule {
        std::mem::take(self)
    }

    /// Writes `<prefix>_start.csv` and `<prefix>_depart.csv`.
    ///
    /// Returns the two paths written, start file first.
    pub fn write_times_csv(&self, prefix: &str) -> Result<(PathBuf, PathBuf)> {
        let start_path = PathBuf::from(format!("{prefix}_start.csv"));
        let depart_path = PathBuf::from(format!("{prefix}_depart.csv"));
        write_matrix_csv(&start_path, &self.start)?;
        write_matrix_csv(&depart_path, &self.completion)?;
        Ok((start_path, depart_path))
    }
}

/// Renders the sequence as `[j1-j2-...-jn]`.
impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, job) in self.sequence.iter().enumerate() {
            if i > 0 {
                f.write_str("-")?;
            }
            write!(f, "{job}")?;
        }
        f.write_str("]")
    }
}

/// Writes a time matrix as comma-separated lines, one per machine.
pub fn write_matrix_csv<P: AsRef<Path>>(path: P, matrix: &Matrix<u64>) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    let mut out = BufWriter::new(file);
    let write_all = |out: &mut BufWriter<File>| -> std::io::Result<()> {
        for row in matrix.iter_rows() {
            let line: Vec<String> = row.iter().map(u64::to_string).collect();
            writeln!(out, "{}", line.join(","))?;
        }
        out.flush()
    };
    write_all(&mut out).map_err(|e| Error::io(path, e))
}

/// Reads a matrix written by [`write_matrix_csv`].
pub fn read_matrix_csv<P: AsRef<Path>>(path: P) -> Result<Matrix<u64>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let rows = content
        .lines()
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty())
        .map(|(i, line)| {
            line.split(',')
                .map(|tok| {
                    tok.trim().parse::<u64>().map_err(|_| {
                        Error::parse(path, format!("line {}: invalid value `{tok}`", i + 1))
                    })
                })
                .collect::<Result<Vec<u64>>>()
        })
        .collect::<Result<Vec<_>>>()?;
    Matrix::from_rows(rows).ok_or_else(|| Error::parse(path, "rows have unequal lengths"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Schedule {
        let start = Matrix::from_rows(vec![vec![0, 2, 5], vec![2, 6, 7]]).unwrap();
        let completion = Matrix::from_rows(vec![vec![2, 5, 6], vec![6, 7, 12]]).unwrap();
        Schedule::new(vec![1, 2, 3], start, completion)
    }

    #[test]
    fn test_scalars() {
        let s = sample();
        assert_eq!(s.makespan(), 12);
        assert_eq!(s.total_flow_time(), 25);
    }

    #[test]
    fn test_display() {
        assert_eq!(sample().to_string(), "[1-2-3]");
        assert_eq!(Schedule::default().to_string(), "[]");
    }

    #[test]
    fn test_take_empties_source() {
        let mut s = sample();
        let moved = s.take();
        assert!(s.is_empty());
        assert_eq!(s.makespan(), 0);
        assert!(s.completion_times().is_empty());
        assert_eq!(moved.makespan(), 12);
    }

    #[test]
    fn test_clone_independent() {
        let s = sample();
        let mut c = s.clone();
        let _ = c.take();
        assert_eq!(s.sequence(), &[1, 2, 3]);
        assert_eq!(s.completion_times()[(1, 2)], 12);
    }

    #[test]
    fn test_times_csv_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("times_7");
        let s = sample();

        let (start_path, depart_path) = s.write_times_csv(prefix.to_str().unwrap()).unwrap();
        assert!(start_path.ends_with("times_7_start.csv"));

        let text = fs::read_to_string(&depart_path).unwrap();
        assert_eq!(text, "2,5,6\n6,7,12\n");

        assert_eq!(&read_matrix_csv(&start_path).unwrap(), s.start_times());
        assert_eq!(&read_matrix_csv(&depart_path).unwrap(), s.completion_times());
    }

    #[test]
    fn test_read_matrix_csv_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        fs::write(&path, "1,2\n3,x\n").unwrap();
        assert!(matches!(read_matrix_csv(&path), Err(Error::Parse { .. })));
    }
}
