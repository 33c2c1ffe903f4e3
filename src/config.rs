use std::time::Duration;

/// Deepest bound the IDA* search will try before giving up.
pub const DEFAULT_MAX_DEPTH: u8 = 16;

/// Tuning knobs that stay the same across solve requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverConfig {
    pub max_depth: u8,
    /// Moves whose notation starts with one of these are tried last at every
    /// branch point. This only changes which optimal solution is found.
    pub deferred_prefixes: Vec<String>,
    /// Wall-clock budget for a single solve. `None` searches until the depth
    /// cap is exhausted.
    pub time_limit: Option<Duration>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            deferred_prefixes: vec!["Bw".to_owned(), "Dw".to_owned()],
            time_limit: None,
        }
    }
}

impl SolverConfig {
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: u8) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[must_use]
    pub fn with_deferred_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.deferred_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = Some(time_limit);
        self
    }
}
