//! Configuration for the benchmark runner.
//!
//! Only presentation and selection are configurable. The sampling protocol
//! (sample count, warmup and exercise minimums) is fixed.

/// Configuration for the benchmark runner.
#[derive(Debug, Clone, Default)]
pub struct RunnerConfig {
    /// Only run kernels whose name contains this substring.
    pub filter: Option<String>,
    /// Emit debug-level progress logs.
    pub verbose: bool,
    /// Emit JSON lines instead of the plain-text report.
    pub json: bool,
}

impl RunnerConfig {
    /// Create a new config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse config from environment variables.
    ///
    /// Supported variables:
    /// - `TON80_FILTER`: run only kernels whose name contains this value
    /// - `TON80_VERBOSE`: verbose logging (default: false)
    /// - `TON80_JSON`: JSON-lines output (default: false)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();

        if let Some(v) = lookup("TON80_FILTER") {
            if !v.is_empty() {
                cfg.filter = Some(v);
            }
        }
        if let Some(v) = lookup("TON80_VERBOSE") {
            cfg.verbose = is_truthy(&v);
        }
        if let Some(v) = lookup("TON80_JSON") {
            cfg.json = is_truthy(&v);
        }

        cfg
    }

    /// Set filter pattern.
    pub fn filter(mut self, pattern: impl Into<String>) -> Self {
        self.filter = Some(pattern.into());
        self
    }

    /// Clear filter pattern.
    pub fn no_filter(mut self) -> Self {
        self.filter = None;
        self
    }

    /// Set verbose output.
    pub fn verbose(mut self, v: bool) -> Self {
        self.verbose = v;
        self
    }

    /// Set JSON output.
    pub fn json(mut self, v: bool) -> Self {
        self.json = v;
        self
    }

    pub(crate) fn selects(&self, name: &str) -> bool {
        match &self.filter {
            Some(f) => name.contains(f.as_str()),
            None => true,
        }
    }
}

fn is_truthy(v: &str) -> bool {
    v != "0" && !v.eq_ignore_ascii_case("false")
}
