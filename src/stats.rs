//! Sample statistics and the 95% confidence interval.

use serde::Serialize;

use crate::error::{BenchError, Result};

/// Two-tailed 95% Student's t critical values, indexed directly by sample
/// count. Indices 0 and 1 are unused.
#[rustfmt::skip]
pub const T_TABLE: [f64; 97] = [
    f64::NAN, f64::NAN, 12.71,
    4.30, 3.18, 2.78, 2.57, 2.45, 2.36, 2.31, 2.26, 2.23, 2.20, 2.18, 2.16,
    2.14, 2.13, 2.12, 2.11, 2.10, 2.09, 2.09, 2.08, 2.07, 2.07, 2.06, 2.06,
    2.06, 2.05, 2.05, 2.05, 2.04, 2.04, 2.04, 2.03, 2.03, 2.03, 2.03, 2.03,
    2.02, 2.02, 2.02, 2.02, 2.02, 2.02, 2.02, 2.01, 2.01, 2.01, 2.01, 2.01,
    2.01, 2.01, 2.01, 2.01, 2.00, 2.00, 2.00, 2.00, 2.00, 2.00, 2.00, 2.00,
    2.00, 2.00, 2.00, 2.00, 2.00, 2.00, 2.00, 1.99, 1.99, 1.99, 1.99, 1.99,
    1.99, 1.99, 1.99, 1.99, 1.99, 1.99, 1.99, 1.99, 1.99, 1.99, 1.99, 1.99,
    1.99, 1.99, 1.99, 1.99, 1.99, 1.99, 1.99, 1.99, 1.99, 1.99,
];

/// Critical t value for `n` samples.
///
/// The large-sample thresholds are checked before the table bound, so every
/// `n` from the end of the table up to 159 gets 1.98.
pub fn t_critical(n: usize) -> f64 {
    if n >= 474 {
        1.96
    } else if n >= 160 {
        1.97
    } else if n >= T_TABLE.len() {
        1.98
    } else {
        T_TABLE[n]
    }
}

/// Convert a sample (µs per exercise call) into exercise calls per second.
pub fn score(sample_micros: f64) -> f64 {
    1.0e6 / sample_micros
}

pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Highest value; for throughput scores, the best run.
pub fn best(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

/// Bessel-corrected sample standard deviation. Needs at least two values.
pub fn std_dev(values: &[f64], mean: f64) -> f64 {
    let squared: f64 = values
        .iter()
        .map(|v| {
            let delta = v - mean;
            delta * delta
        })
        .sum();
    (squared / (values.len() - 1) as f64).sqrt()
}

/// Aggregate statistics over a sequence of scores.
///
/// The dispersion fields are `None` for a single score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub best: f64,
    pub mean: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub std_dev: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub standard_error: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub t_critical: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence_percent: Option<f64>,
}

impl Summary {
    pub fn from_scores(scores: &[f64]) -> Result<Self> {
        if scores.is_empty() {
            return Err(BenchError::EmptySampleSet);
        }

        let n = scores.len();
        let mean = mean(scores);
        let best = best(scores);

        if n == 1 {
            return Ok(Self {
                count: n,
                best,
                mean,
                std_dev: None,
                standard_error: None,
                t_critical: None,
                confidence_percent: None,
            });
        }

        let std_dev = std_dev(scores, mean);
        let standard_error = std_dev / (n as f64).sqrt();
        let t = t_critical(n);
        let confidence_percent = (t * standard_error / mean) * 100.0;

        Ok(Self {
            count: n,
            best,
            mean,
            std_dev: Some(std_dev),
            standard_error: Some(standard_error),
            t_critical: Some(t),
            confidence_percent: Some(confidence_percent),
        })
    }

    /// `"<best> <metric>"`, followed by `" (<mean>±<pct>%)"` when a
    /// confidence interval exists.
    pub fn format(&self, metric: &str) -> String {
        let score = format_best(self.best);
        match self.confidence_percent {
            None => format!("{} {}", score, metric),
            Some(pct) => format!("{} {} ({:.2}±{:.1}%)", score, metric, self.mean, pct),
        }
    }
}

/// Two decimals with no mandatory integer digit: `0.5` renders as `.50`.
fn format_best(value: f64) -> String {
    let s = format!("{:.2}", value);
    match s.strip_prefix("0.") {
        Some(frac) => format!(".{}", frac),
        None => s,
    }
}
