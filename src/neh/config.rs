//! NEH configuration.

/// How NEH resolves insertion positions with equal makespan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TiePolicy {
    /// Accept an equally good later position with probability 0.5.
    #[default]
    CoinFlip,
    /// Keep the earliest position found.
    KeepFirst,
}

/// Configuration for the NEH heuristic.
///
/// # Examples
///
/// ```
/// use flowshop_neh::neh::{NehConfig, TiePolicy};
///
/// let config = NehConfig::default()
///     .with_seed(42)
///     .with_tie_policy(TiePolicy::KeepFirst);
/// assert_eq!(config.seed, Some(42));
/// ```
#[derive(Debug, Clone, Default)]
pub struct NehConfig {
    /// Tie resolution between insertion positions.
    pub tie_policy: TiePolicy,
    /// Random seed for the tie coin flip (None for random).
    pub seed: Option<u64>,
}

impl NehConfig {
    /// Sets the tie policy.
    pub fn with_tie_policy(mut self, policy: TiePolicy) -> Self {
        self.tie_policy = policy;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = NehConfig::default();
        assert_eq!(config.tie_policy, TiePolicy::CoinFlip);
        assert!(config.seed.is_none());
    }
}
