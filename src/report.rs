//! Pluggable reporters for benchmark output.
//!
//! Reporters write complete lines only, so a kernel that fails mid-run never
//! leaves a partial report line behind.

use crate::result::{KernelReport, SingleSample, SuiteResult};
use serde::Serialize;
use std::io::Write;
use std::sync::Mutex;

/// Trait for benchmark result reporters.
pub trait Reporter: Send + Sync {
    /// Called when a suite starts.
    fn suite_start(&self, _suite: &str, _kernels: usize) {}

    /// Called before the first measurement cycle of a kernel.
    fn kernel_start(&self, _name: &str) {}

    /// Called once all cycles of a kernel have succeeded.
    fn kernel_end(&self, _report: &KernelReport) {}

    /// Called for each kernel in single-cycle mode.
    fn single_sample(&self, _sample: &SingleSample) {}

    /// Called when every kernel has completed. Not called on failure.
    fn suite_end(&self, _result: &SuiteResult) {}
}

/// Serializes whole-line writes to stdout.
#[derive(Default)]
struct LineWriter {
    lock: Mutex<()>,
}

impl LineWriter {
    /// Never panics; a failed write is logged and dropped.
    fn write_line(&self, line: &str) {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut stdout = std::io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{}", line) {
            tracing::warn!(error = %e, "failed to write report line");
        }
    }
}

/// Plain-text reporter: one tab-separated line per kernel on stdout.
#[derive(Default)]
pub struct ConsoleReporter {
    out: LineWriter,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Reporter for ConsoleReporter {
    fn kernel_end(&self, report: &KernelReport) {
        self.out.write_line(&report.line());
    }

    fn single_sample(&self, sample: &SingleSample) {
        self.out.write_line(&sample.line());
    }
}

/// JSON-lines reporter: one object per kernel on stdout, then a suite footer.
#[derive(Default)]
pub struct JsonReporter {
    out: LineWriter,
}

#[derive(Serialize)]
struct SuiteFooter<'a> {
    suite: &'a str,
    kernels: usize,
    total_nanos: u128,
    started_at: &'a str,
}

impl JsonReporter {
    pub fn new() -> Self {
        Self::default()
    }

    fn emit<T: Serialize>(&self, value: &T) {
        match serde_json::to_string(value) {
            Ok(json) => self.out.write_line(&json),
            Err(e) => tracing::warn!(error = %e, "failed to serialize report"),
        }
    }
}

impl Reporter for JsonReporter {
    fn kernel_end(&self, report: &KernelReport) {
        self.emit(report);
    }

    fn single_sample(&self, sample: &SingleSample) {
        self.emit(sample);
    }

    fn suite_end(&self, result: &SuiteResult) {
        self.emit(&SuiteFooter {
            suite: &result.suite,
            kernels: result.reports.len(),
            total_nanos: result.total_duration.as_nanos(),
            started_at: &result.started_at,
        });
    }
}

/// Logs progress through `tracing`; report lines stay on stdout.
#[derive(Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn suite_start(&self, suite: &str, kernels: usize) {
        tracing::info!(suite, kernels, "starting benchmark suite");
    }

    fn kernel_start(&self, name: &str) {
        tracing::info!(kernel = name, "measuring kernel");
    }

    fn kernel_end(&self, report: &KernelReport) {
        tracing::debug!(
            kernel = %report.name,
            best = report.summary.best,
            mean_micros = report.mean_micros,
            confidence = ?report.summary.confidence_percent,
            "kernel complete"
        );
    }

    fn suite_end(&self, result: &SuiteResult) {
        tracing::info!(
            suite = %result.suite,
            kernels = result.reports.len(),
            elapsed_ms = result.total_duration.as_millis() as u64,
            "benchmark suite complete"
        );
    }
}

/// Combines multiple reporters.
pub struct MultiReporter {
    reporters: Vec<Box<dyn Reporter>>,
}

impl MultiReporter {
    pub fn new(reporters: Vec<Box<dyn Reporter>>) -> Self {
        Self { reporters }
    }
}

impl Reporter for MultiReporter {
    fn suite_start(&self, suite: &str, kernels: usize) {
        for r in &self.reporters {
            r.suite_start(suite, kernels);
        }
    }

    fn kernel_start(&self, name: &str) {
        for r in &self.reporters {
            r.kernel_start(name);
        }
    }

    fn kernel_end(&self, report: &KernelReport) {
        for r in &self.reporters {
            r.kernel_end(report);
        }
    }

    fn single_sample(&self, sample: &SingleSample) {
        for r in &self.reporters {
            r.single_sample(sample);
        }
    }

    fn suite_end(&self, result: &SuiteResult) {
        for r in &self.reporters {
            r.suite_end(result);
        }
    }
}

#[cfg(test)]
pub(crate) mod capture {
    use super::*;
    use std::sync::Arc;

    /// Records every line a console reporter would print.
    #[derive(Clone, Default)]
    pub struct CaptureReporter {
        pub lines: Arc<Mutex<Vec<String>>>,
        pub finished: Arc<Mutex<bool>>,
    }

    impl CaptureReporter {
        pub fn lines(&self) -> Vec<String> {
            self.lines.lock().unwrap().clone()
        }

        pub fn finished(&self) -> bool {
            *self.finished.lock().unwrap()
        }
    }

    impl Reporter for CaptureReporter {
        fn kernel_end(&self, report: &KernelReport) {
            self.lines.lock().unwrap().push(report.line());
        }

        fn single_sample(&self, sample: &SingleSample) {
            self.lines.lock().unwrap().push(sample.line());
        }

        fn suite_end(&self, _result: &SuiteResult) {
            *self.finished.lock().unwrap() = true;
        }
    }
}
