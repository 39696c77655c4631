//! Processing-time matrix for one flow-shop instance.
//!
//! # File Format
//!
//! ```text
//! 2 3
//! 2 3 1
//! 4 1 5
//! ```
//!
//! The first non-empty line holds `machines jobs`. Each of the next
//! `machines` non-empty lines holds `jobs` whitespace-separated
//! non-negative integers. Anything after the last machine row is ignored.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::matrix::Matrix;

/// Immutable `machines x jobs` matrix of processing times.
///
/// Row `m` holds the durations on machine `m + 1`; column `j` holds the
/// durations of job `j + 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    times: Matrix<u32>,
}

impl Instance {
    /// Wraps an existing matrix. At least one machine and one job are required.
    pub fn new(times: Matrix<u32>) -> Result<Self> {
        if times.rows() == 0 || times.cols() == 0 {
            return Err(Error::Runtime(format!(
                "processing-time matrix must be at least 1x1, got {}x{}",
                times.rows(),
                times.cols()
            )));
        }
        Ok(Self { times })
    }

    /// Builds an instance from machine-major rows.
    ///
    /// # Examples
    ///
    /// ```
    /// use flowshop_neh::flowshop::Instance;
    ///
    /// let inst = Instance::from_rows(vec![vec![2, 3, 1], vec![4, 1, 5]]).unwrap();
    /// assert_eq!(inst.machines(), 2);
    /// assert_eq!(inst.jobs(), 3);
    /// assert_eq!(inst.processing_time(2, 3), Some(5));
    /// ```
    pub fn from_rows(rows: Vec<Vec<u32>>) -> Result<Self> {
        let times = Matrix::from_rows(rows)
            .ok_or_else(|| Error::Runtime("processing-time rows have unequal lengths".into()))?;
        Self::new(times)
    }

    /// Loads an instance file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::parse(&content, path)
    }

    /// Parses instance text. `origin` is only used in error messages.
    pub fn parse<P: AsRef<Path>>(content: &str, origin: P) -> Result<Self> {
        let origin = origin.as_ref();
        let mut lines = content
            .lines()
            .enumerate()
            .filter(|(_, l)| !l.trim().is_empty());

        let (header_no, header) = lines
            .next()
            .ok_or_else(|| Error::parse(origin, "empty file"))?;
        let dims = parse_numbers::<usize>(header, header_no + 1, origin)?;
        let (rows, cols) = match dims.as_slice() {
            [r, c] => (*r, *c),
            _ => {
                return Err(Error::parse(
                    origin,
                    format!("line {}: expected `rows cols`", header_no + 1),
                ))
            }
        };
        if rows == 0 || cols == 0 {
            return Err(Error::parse(
                origin,
                format!("matrix dimensions must be positive, got {rows}x{cols}"),
            ));
        }

        let mut times = Matrix::try_new(rows, cols)?;
        for r in 0..rows {
            let (line_no, line) = lines.next().ok_or_else(|| {
                Error::parse(origin, format!("expected {rows} machine rows, found {r}"))
            })?;
            let values = parse_numbers::<u32>(line, line_no + 1, origin)?;
            if values.len() != cols {
                return Err(Error::parse(
                    origin,
                    format!(
                        "line {}: expected {cols} values, found {}",
                        line_no + 1,
                        values.len()
                    ),
                ));
            }
            for (c, v) in values.into_iter().enumerate() {
                times[(r, c)] = v;
            }
        }

        Ok(Self { times })
    }

    /// Number of machines.
    #[inline]
    pub fn machines(&self) -> usize {
        self.times.rows()
    }

    /// Number of jobs.
    #[inline]
    pub fn jobs(&self) -> usize {
        self.times.cols()
    }

    /// Processing time of `job` on `machine`, both 1-based.
    pub fn processing_time(&self, machine: usize, job: usize) -> Option<u32> {
        if machine == 0 || job == 0 {
            return None;
        }
        self.times.get(machine - 1, job - 1).copied()
    }

    /// Sum of a job's processing times over all machines (1-based job id).
    pub fn job_total(&self, job: usize) -> u64 {
        (0..self.machines())
            .map(|m| u64::from(self.times[(m, job - 1)]))
            .sum()
    }

    /// Raw matrix view, 0-based.
    #[inline]
    pub fn times(&self) -> &Matrix<u32> {
        &self.times
    }
}

fn parse_numbers<T: std::str::FromStr>(line: &str, line_no: usize, origin: &Path) -> Result<Vec<T>> {
    line.split_whitespace()
        .map(|tok| {
            tok.parse::<T>().map_err(|_| {
                Error::parse(origin, format!("line {line_no}: invalid number `{tok}`"))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let text = "\n2 3\n2 3 1\n\n4 1 5\n";
        let inst = Instance::parse(text, "mem").unwrap();
        assert_eq!(inst.machines(), 2);
        assert_eq!(inst.jobs(), 3);
        assert_eq!(inst.processing_time(1, 1), Some(2));
        assert_eq!(inst.processing_time(2, 2), Some(1));
        assert_eq!(inst.processing_time(3, 1), None);
        assert_eq!(inst.processing_time(0, 1), None);
    }

    #[test]
    fn test_job_total() {
        let inst = Instance::from_rows(vec![vec![2, 3, 1], vec![4, 1, 5]]).unwrap();
        assert_eq!(inst.job_total(1), 6);
        assert_eq!(inst.job_total(2), 4);
        assert_eq!(inst.job_total(3), 6);
    }

    #[test]
    fn test_parse_truncated() {
        let err = Instance::parse("3 2\n1 2\n3 4\n", "mem").unwrap_err();
        assert!(matches!(err, Error::Parse { .. }), "got {err:?}");
    }

    #[test]
    fn test_parse_short_row() {
        let err = Instance::parse("2 3\n1 2 3\n4 5\n", "mem").unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn test_parse_bad_token() {
        let err = Instance::parse("1 2\n1 x\n", "mem").unwrap_err();
        assert!(err.to_string().contains("invalid number `x`"));
    }

    #[test]
    fn test_parse_negative_rejected() {
        assert!(Instance::parse("1 2\n1 -4\n", "mem").is_err());
    }

    #[test]
    fn test_parse_bad_header() {
        assert!(Instance::parse("3\n1 2 3\n", "mem").is_err());
        assert!(Instance::parse("0 3\n", "mem").is_err());
        assert!(Instance::parse("   \n\n", "mem").is_err());
    }

    #[test]
    fn test_from_file_missing() {
        let err = Instance::from_file("/nonexistent/flowshop/1.txt").unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_new_rejects_empty() {
        assert!(Instance::from_rows(vec![]).is_err());
        assert!(Instance::from_rows(vec![vec![]]).is_err());
    }
}
