//! # ton80
//!
//! A micro-benchmark harness that reports throughput with a 95% confidence
//! interval.
//!
//! Each kernel is measured ten times. One measurement is a full lifecycle
//! cycle: `setup`, a warmup phase of at least 100ms whose timing is thrown
//! away, an exercise phase of at least 2000ms that yields the sample
//! (microseconds per `exercise()` call), then `teardown`. Samples become
//! scores (calls per second) and the report shows the best score, the mean
//! score and the confidence half-width as a percentage of that mean.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ton80::{Kernel, KernelResult, Runner};
//!
//! struct Fib {
//!     out: u64,
//! }
//!
//! impl Kernel for Fib {
//!     fn name(&self) -> &str {
//!         "Fib"
//!     }
//!
//!     fn run(&mut self) -> KernelResult {
//!         self.out = fib(std::hint::black_box(20));
//!         Ok(())
//!     }
//! }
//!
//! fn fib(n: u64) -> u64 {
//!     if n < 2 { n } else { fib(n - 1) + fib(n - 2) }
//! }
//!
//! let mut runner = Runner::new("my_suite");
//! runner.register(Fib { out: 0 });
//! runner.run().expect("benchmark failed");
//! // Fib:(runs/sec)	1234.56 	 (1200.00±1.3%)	avg us:	833.2
//! ```

mod clock;
mod config;
mod error;
mod kernel;
mod measure;
mod report;
mod result;
mod runner;
pub mod kernels;
pub mod stats;

pub use clock::{Clock, Stopwatch};
pub use config::RunnerConfig;
pub use error::{BenchError, Phase, Result};
pub use kernel::{Kernel, KernelResult, EXERCISE_RUNS};
pub use measure::{measure, measure_for, EXERCISE_MILLIS, WARMUP_MILLIS};
pub use report::{ConsoleReporter, JsonReporter, LogReporter, MultiReporter, Reporter};
pub use result::{KernelReport, SingleSample, SuiteResult, METRIC_LABEL};
pub use runner::{Runner, SAMPLE_COUNT};

/// A runner loaded with the bundled kernels in their fixed order.
pub fn default_runner(config: RunnerConfig) -> Runner {
    let mut runner = Runner::with_config("ton80", config);
    for kernel in kernels::default_kernels() {
        runner.register_boxed(kernel);
    }
    runner
}

/// Run the bundled kernels and print one report line per kernel to stdout.
///
/// Stops at the first kernel failure.
pub fn run_all() -> Result<SuiteResult> {
    default_runner(RunnerConfig::default()).run()
}
