//! NEH constructive heuristic.
//!
//! Builds a permutation by inserting jobs one at a time, heaviest first,
//! at the position that minimizes the partial makespan. The search is
//! exhaustive per insertion (`k + 1` positions for a partial sequence of
//! length `k`), giving O(n²) evaluations overall.
//!
//! # References
//!
//! - Nawaz, M., Enscore, E. E. & Ham, I. (1983). "A heuristic algorithm for
//!   the m-machine, n-job flow-shop sequencing problem", *Omega* 11(1), 91-95.
//! - Taillard, E. (1990). "Some efficient heuristic methods for the flow shop
//!   sequencing problem", *EJOR* 47(1), 65-74.

mod config;
mod runner;
mod types;

pub use config::{NehConfig, TiePolicy};
pub use runner::{NehResult, NehRunner};
pub use types::{JobTimePair, SequenceObjective};
