//! Batch run configuration.
//!
//! Parameter files are TOML with a `[test]` section:
//!
//! ```toml
//! [test]
//! minTestFile = 1
//! maxTestFile = 120
//! numThreads = 8
//! algorithm = 2
//! inputFilesDir = "data/"
//! resultsFile = "results/nowait.csv"
//! timesFile = "results/times/nowait_%TEST%"
//! ```
//!
//! String values must be quoted, unlike the bare values of `.ini` files.
//!
//! Out-of-range or non-integer thread counts and algorithm selectors are
//! corrected with a warning rather than rejected.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};
use tracing::warn;

use crate::error::{Error, Result};
use crate::flowshop::Variant;

/// Maximum worker threads for a batch.
pub const MAX_THREADS: usize = 16;

/// Placeholder substituted with the instance index in `times_file`.
pub const TEST_PLACEHOLDER: &str = "%TEST%";

/// Configuration for a batch of NEH runs.
///
/// # Examples
///
/// ```
/// use flowshop_neh::batch::BatchConfig;
/// use flowshop_neh::flowshop::Variant;
///
/// let config = BatchConfig::default()
///     .with_range(1, 10)
///     .with_threads(4)
///     .with_variant(Variant::NoWait)
///     .with_input_dir("data/");
/// assert_eq!(config.instance_path(3).to_str(), Some("data/3.txt"));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchConfig {
    /// First instance index (inclusive).
    #[serde(default)]
    pub min_test_file: u32,

    /// Last instance index (inclusive).
    #[serde(default = "default_max_test_file")]
    pub max_test_file: u32,

    /// Worker thread count. Valid range `1..=16`.
    #[serde(default = "default_num_threads", deserialize_with = "lenient_int")]
    pub num_threads: i64,

    /// Variant selector: 0 = unlimited, 1 = blocking, 2 = no-wait.
    #[serde(default, deserialize_with = "lenient_int")]
    pub algorithm: i64,

    /// Prefix prepended to `<index>.txt` to locate instance files.
    #[serde(default)]
    pub input_files_dir: String,

    /// Aggregate results CSV. Empty to skip.
    #[serde(default)]
    pub results_file: String,

    /// Per-instance time-matrix prefix containing `%TEST%`. Empty to skip.
    #[serde(default)]
    pub times_file: String,

    /// Random seed for NEH tie-breaking (None for random).
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_max_test_file() -> u32 {
    120
}

fn default_num_threads() -> i64 {
    1
}

/// Reads an integer option, mapping values that are not integers to
/// [`i64::MIN`] so that [`BatchConfig::normalized`] replaces them.
/// Quoted integers such as `"8"` are accepted.
fn lenient_int<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match toml::Value::deserialize(deserializer)? {
        toml::Value::Integer(n) => n,
        toml::Value::String(s) => s.trim().parse().unwrap_or(i64::MIN),
        _ => i64::MIN,
    })
}

/// On-disk layout: options live under `[test]`.
#[derive(Debug, Deserialize)]
struct ParamsFile {
    #[serde(default)]
    test: Option<BatchConfig>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            min_test_file: 0,
            max_test_file: default_max_test_file(),
            num_threads: default_num_threads(),
            algorithm: 0,
            input_files_dir: String::new(),
            results_file: String::new(),
            times_file: String::new(),
            seed: None,
        }
    }
}

impl BatchConfig {
    /// Loads and normalizes a parameter file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_toml_str(&content)
    }

    /// Parses and normalizes parameter text. A missing `[test]` section
    /// yields the defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let params: ParamsFile = toml::from_str(content)
            .map_err(|e| Error::Config(format!("failed to parse parameters: {e}")))?;
        Ok(params.test.unwrap_or_default().normalized())
    }

    /// Clamps the thread count and algorithm selector to usable values,
    /// logging a warning for each correction.
    pub fn normalized(mut self) -> Self {
        if self.num_threads < 1 || self.num_threads > MAX_THREADS as i64 {
            warn!(
                num_threads = self.num_threads,
                "Number of threads invalid, defaulting to 1"
            );
            self.num_threads = 1;
        }
        if Variant::from_selector(self.algorithm).is_none() {
            warn!(
                algorithm = self.algorithm,
                "Algorithm selection invalid, defaulting to 0"
            );
            self.algorithm = 0;
        }
        self
    }

    pub fn with_range(mut self, min: u32, max: u32) -> Self {
        self.min_test_file = min;
        self.max_test_file = max;
        self
    }

    pub fn with_threads(mut self, n: usize) -> Self {
        self.num_threads = i64::try_from(n).unwrap_or(i64::MAX);
        self
    }

    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.algorithm = variant.selector();
        self
    }

    pub fn with_input_dir(mut self, dir: impl Into<String>) -> Self {
        self.input_files_dir = dir.into();
        self
    }

    pub fn with_results_file(mut self, path: impl Into<String>) -> Self {
        self.results_file = path.into();
        self
    }

    pub fn with_times_file(mut self, template: impl Into<String>) -> Self {
        self.times_file = template.into();
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Thread count clamped to `1..=16`.
    pub fn threads(&self) -> usize {
        usize::try_from(self.num_threads)
            .ok()
            .filter(|n| (1..=MAX_THREADS).contains(n))
            .unwrap_or(1)
    }

    /// Selected variant; unknown selectors map to [`Variant::Unlimited`].
    pub fn variant(&self) -> Variant {
        Variant::from_selector(self.algorithm).unwrap_or_default()
    }

    /// Number of instances in the range.
    pub fn instance_count(&self) -> usize {
        if self.min_test_file > self.max_test_file {
            0
        } else {
            (self.max_test_file - self.min_test_file) as usize + 1
        }
    }

    /// Path of the instance file for `index`.
    pub fn instance_path(&self, index: u32) -> PathBuf {
        PathBuf::from(format!("{}{index}.txt", self.input_files_dir))
    }

    /// Time-matrix prefix for `index`, or `None` when dumps are disabled.
    pub fn times_prefix(&self, index: u32) -> Option<String> {
        if self.times_file.is_empty() {
            None
        } else {
            Some(self.times_file.replace(TEST_PLACEHOLDER, &index.to_string()))
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.min_test_file > self.max_test_file {
            return Err(Error::Config(format!(
                "minTestFile ({}) must not exceed maxTestFile ({})",
                self.min_test_file, self.max_test_file
            )));
        }
        Ok(())
    }
}
