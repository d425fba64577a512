//! Benchmark result types.

use serde::Serialize;
use std::time::Duration;

use crate::error::Result;
use crate::stats::{self, Summary};

/// Label placed between the best score and the confidence interval in
/// report lines.
pub const METRIC_LABEL: &str = "\t";

/// Outcome of the full sample set for one kernel.
#[derive(Debug, Clone, Serialize)]
pub struct KernelReport {
    /// Kernel display name
    pub name: String,
    /// Raw samples, µs per exercise call, in measurement order
    pub samples: Vec<f64>,
    /// Exercise calls per second, one per sample
    pub scores: Vec<f64>,
    /// Mean of the raw samples (the "avg us" field)
    pub mean_micros: f64,
    /// Statistics over `scores`
    pub summary: Summary,
}

impl KernelReport {
    /// Derive scores and statistics from raw samples.
    pub fn from_samples(name: impl Into<String>, samples: Vec<f64>) -> Result<Self> {
        let scores: Vec<f64> = samples.iter().map(|&s| stats::score(s)).collect();
        let summary = Summary::from_scores(&scores)?;
        let mean_micros = stats::mean(&samples);

        Ok(Self {
            name: name.into(),
            samples,
            scores,
            mean_micros,
            summary,
        })
    }

    /// The formatted best score with its confidence interval.
    pub fn formatted_stats(&self) -> String {
        self.summary.format(METRIC_LABEL)
    }

    /// `<name>:(runs/sec)\t<stats>\tavg us:\t<raw mean>`
    pub fn line(&self) -> String {
        format!(
            "{}:(runs/sec)\t{}\tavg us:\t{}",
            self.name,
            self.formatted_stats(),
            self.mean_micros
        )
    }
}

/// A single protocol cycle for one kernel, without statistics.
#[derive(Debug, Clone, Serialize)]
pub struct SingleSample {
    pub name: String,
    pub micros: f64,
}

impl SingleSample {
    /// `<name>(us)\t<sample>`
    pub fn line(&self) -> String {
        format!("{}(us)\t{}", self.name, self.micros)
    }
}

/// Results of one runner pass.
#[derive(Debug, Clone)]
pub struct SuiteResult {
    /// Suite name
    pub suite: String,
    /// Reports in kernel order
    pub reports: Vec<KernelReport>,
    /// Wall time of the whole pass
    pub total_duration: Duration,
    /// Unix milliseconds when the pass started
    pub started_at: String,
}
