//! The main benchmark runner.

use crate::clock::{Clock, Stopwatch};
use crate::config::RunnerConfig;
use crate::error::Result;
use crate::kernel::Kernel;
use crate::measure::measure;
use crate::report::{ConsoleReporter, JsonReporter, LogReporter, Reporter};
use crate::result::{KernelReport, SingleSample, SuiteResult};
use std::time::Instant;

/// Measurement cycles per kernel.
pub const SAMPLE_COUNT: usize = 10;

/// Runs registered kernels in order and reports throughput for each.
///
/// Kernels run strictly one after another. The first failure aborts the
/// pass: no line is reported for the failing kernel or any kernel after it.
///
/// # Example
///
/// ```rust,no_run
/// use ton80::{Kernel, KernelResult, Runner};
///
/// struct Noop;
///
/// impl Kernel for Noop {
///     fn name(&self) -> &str {
///         "Noop"
///     }
///
///     fn run(&mut self) -> KernelResult {
///         Ok(())
///     }
/// }
///
/// let mut runner = Runner::new("demo");
/// runner.register(Noop);
/// let suite = runner.run().expect("benchmark failed");
/// assert_eq!(suite.reports.len(), 1);
/// ```
pub struct Runner<C: Clock = Stopwatch> {
    suite: String,
    config: RunnerConfig,
    clock: C,
    kernels: Vec<Box<dyn Kernel>>,
    reporters: Vec<Box<dyn Reporter>>,
}

impl Runner<Stopwatch> {
    /// Create a runner with default config and a wall-clock stopwatch.
    pub fn new(suite: &str) -> Self {
        Self::with_config(suite, RunnerConfig::default())
    }

    /// Create a runner with explicit config.
    pub fn with_config(suite: &str, config: RunnerConfig) -> Self {
        Self::with_clock(suite, config, Stopwatch::new())
    }
}

impl<C: Clock> Runner<C> {
    /// Create a runner timed by `clock`.
    pub fn with_clock(suite: &str, config: RunnerConfig, clock: C) -> Self {
        let output: Box<dyn Reporter> = if config.json {
            Box::new(JsonReporter::new())
        } else {
            Box::new(ConsoleReporter::new())
        };

        Self {
            suite: suite.to_string(),
            config,
            clock,
            kernels: Vec::new(),
            reporters: vec![Box::new(LogReporter), output],
        }
    }

    /// Replace reporters with a custom set.
    pub fn reporters(&mut self, reporters: Vec<Box<dyn Reporter>>) -> &mut Self {
        self.reporters = reporters;
        self
    }

    /// Add an additional reporter.
    pub fn add_reporter(&mut self, reporter: Box<dyn Reporter>) -> &mut Self {
        self.reporters.push(reporter);
        self
    }

    /// Append a kernel to the run order.
    pub fn register(&mut self, kernel: impl Kernel + 'static) -> &mut Self {
        self.kernels.push(Box::new(kernel));
        self
    }

    /// Append an already boxed kernel.
    pub fn register_boxed(&mut self, kernel: Box<dyn Kernel>) -> &mut Self {
        self.kernels.push(kernel);
        self
    }

    /// Names of the kernels selected by the current filter, in run order.
    pub fn kernel_names(&self) -> Vec<&str> {
        self.kernels
            .iter()
            .map(|k| k.name())
            .filter(|name| self.config.selects(name))
            .collect()
    }

    /// Measure every selected kernel [`SAMPLE_COUNT`] times and report it.
    pub fn run(&mut self) -> Result<SuiteResult> {
        let started = Instant::now();
        let started_at = unix_millis();
        let selected = self.kernel_names().len();

        for r in &self.reporters {
            r.suite_start(&self.suite, selected);
        }

        let mut reports = Vec::with_capacity(selected);
        for kernel in self.kernels.iter_mut() {
            if !self.config.selects(kernel.name()) {
                continue;
            }

            for r in &self.reporters {
                r.kernel_start(kernel.name());
            }

            let samples = sample_set(&mut self.clock, kernel.as_mut())?;
            let report = KernelReport::from_samples(kernel.name(), samples)?;

            for r in &self.reporters {
                r.kernel_end(&report);
            }
            reports.push(report);
        }

        let result = SuiteResult {
            suite: self.suite.clone(),
            reports,
            total_duration: started.elapsed(),
            started_at,
        };

        for r in &self.reporters {
            r.suite_end(&result);
        }

        Ok(result)
    }

    /// Run one measurement cycle per selected kernel and report the raw
    /// microseconds, without statistics.
    pub fn run_single(&mut self) -> Result<Vec<SingleSample>> {
        let mut samples = Vec::new();
        for kernel in self.kernels.iter_mut() {
            if !self.config.selects(kernel.name()) {
                continue;
            }

            for r in &self.reporters {
                r.kernel_start(kernel.name());
            }

            let sample = SingleSample {
                name: kernel.name().to_string(),
                micros: measure(&mut self.clock, kernel.as_mut())?,
            };

            for r in &self.reporters {
                r.single_sample(&sample);
            }
            samples.push(sample);
        }
        Ok(samples)
    }
}

/// Run the full protocol [`SAMPLE_COUNT`] times on one kernel instance.
fn sample_set<C: Clock>(clock: &mut C, kernel: &mut dyn Kernel) -> Result<Vec<f64>> {
    let mut samples = Vec::with_capacity(SAMPLE_COUNT);
    for cycle in 0..SAMPLE_COUNT {
        let sample = measure(&mut *clock, &mut *kernel).inspect_err(|e| {
            tracing::debug!(cycle, error = %e, "measurement cycle failed");
        })?;
        tracing::debug!(cycle, sample_micros = sample, "measurement cycle complete");
        samples.push(sample);
    }
    Ok(samples)
}

fn unix_millis() -> String {
    let now = std::time::SystemTime::now();
    let duration = now
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}", duration.as_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::fake::SteppingClock;
    use crate::error::{BenchError, Phase};
    use crate::kernel::KernelResult;
    use crate::report::capture::CaptureReporter;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Stub {
        name: &'static str,
        setups: Arc<AtomicUsize>,
    }

    impl Stub {
        fn new(name: &'static str) -> Self {
            Self {
                name,
                setups: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    impl Kernel for Stub {
        fn name(&self) -> &str {
            self.name
        }

        fn setup(&mut self) -> KernelResult {
            self.setups.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn run(&mut self) -> KernelResult {
            Ok(())
        }
    }

    /// Fails on the third `run()`; warmup does not call `run()`.
    struct FailsOnThirdRun {
        runs: usize,
    }

    impl Kernel for FailsOnThirdRun {
        fn name(&self) -> &str {
            "Flaky"
        }

        fn warmup(&mut self) -> KernelResult {
            Ok(())
        }

        fn run(&mut self) -> KernelResult {
            self.runs += 1;
            if self.runs == 3 {
                anyhow::bail!("run #3 exploded");
            }
            Ok(())
        }
    }

    fn test_runner(config: RunnerConfig) -> (Runner<SteppingClock>, CaptureReporter) {
        let capture = CaptureReporter::default();
        let mut runner = Runner::with_clock("test", config, SteppingClock::new(1));
        runner.reporters(vec![Box::new(capture.clone())]);
        (runner, capture)
    }

    #[test]
    fn should_emit_one_line_for_noop_kernel() {
        let (mut runner, capture) = test_runner(RunnerConfig::new());
        let stub = Stub::new("Noop");
        let setups = stub.setups.clone();
        runner.register(stub);

        let suite = runner.run().unwrap();

        assert_eq!(setups.load(Ordering::SeqCst), SAMPLE_COUNT);
        assert_eq!(suite.reports.len(), 1);

        let report = &suite.reports[0];
        assert_eq!(report.samples.len(), SAMPLE_COUNT);
        assert!(report.summary.best >= 0.0);
        let pct = report.summary.confidence_percent.unwrap();
        assert!((0.0..=100.0).contains(&pct));

        let lines = capture.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("Noop:(runs/sec)\t"));
        assert!(lines[0].contains("\tavg us:\t"));
        assert!(capture.finished());
    }

    #[test]
    fn should_abort_before_reporting_failing_kernel() {
        let (mut runner, capture) = test_runner(RunnerConfig::new());
        let after = Stub::new("After");
        let after_setups = after.setups.clone();
        runner
            .register(Stub::new("Before"))
            .register(FailsOnThirdRun { runs: 0 })
            .register(after);

        let err = runner.run().unwrap_err();

        match &err {
            BenchError::Kernel { kernel, phase, .. } => {
                assert_eq!(kernel, "Flaky");
                assert_eq!(*phase, Phase::Exercise);
            }
            other => panic!("unexpected error: {other}"),
        }

        let lines = capture.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("Before:"));
        assert_eq!(after_setups.load(Ordering::SeqCst), 0);
        assert!(!capture.finished());
    }

    #[test]
    fn should_run_kernels_in_registration_order() {
        let (mut runner, capture) = test_runner(RunnerConfig::new());
        runner.register(Stub::new("B")).register(Stub::new("A"));

        runner.run().unwrap();

        let names: Vec<String> = capture
            .lines()
            .iter()
            .map(|l| l.split(':').next().unwrap().to_string())
            .collect();
        assert_eq!(names, ["B", "A"]);
    }

    #[test]
    fn should_skip_kernels_outside_filter() {
        let (mut runner, capture) = test_runner(RunnerConfig::new().filter("keep"));
        runner.register(Stub::new("keep_this")).register(Stub::new("skip_this"));

        assert_eq!(runner.kernel_names(), ["keep_this"]);
        let suite = runner.run().unwrap();

        assert_eq!(suite.reports.len(), 1);
        assert_eq!(capture.lines().len(), 1);
    }

    #[test]
    fn should_report_raw_sample_in_single_mode() {
        let (mut runner, capture) = test_runner(RunnerConfig::new());
        let stub = Stub::new("Once");
        let setups = stub.setups.clone();
        runner.register(stub);

        let samples = runner.run_single().unwrap();

        assert_eq!(setups.load(Ordering::SeqCst), 1);
        assert_eq!(samples.len(), 1);
        // Stepping clock: 1ms per exercise call.
        assert_eq!(samples[0].micros, 1000.0);
        assert_eq!(capture.lines(), ["Once(us)\t1000"]);
    }
}
