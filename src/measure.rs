//! The adaptive measurement loop and the per-kernel timing protocol.

use crate::clock::Clock;
use crate::error::{BenchError, Phase, Result};
use crate::kernel::Kernel;

/// Minimum duration of the discarded warmup phase.
pub const WARMUP_MILLIS: u64 = 100;

/// Minimum duration of the measured exercise phase.
pub const EXERCISE_MILLIS: u64 = 2000;

/// Repeatedly run `work` until at least `minimum_millis` have elapsed.
///
/// Returns the average cost of one invocation in microseconds,
/// `1000 * elapsed / iterations`. `work` always runs at least once. The loop
/// never exits early, so the total time is the minimum plus whatever the
/// final call overshoots.
///
/// A zero minimum is rejected before anything runs.
pub fn measure_for<C, F>(clock: &mut C, mut work: F, minimum_millis: u64) -> Result<f64>
where
    C: Clock + ?Sized,
    F: FnMut() -> anyhow::Result<()>,
{
    if minimum_millis == 0 {
        return Err(BenchError::InvalidMinimum { minimum_millis });
    }

    clock.start();
    let mut iterations: u64 = 0;
    let mut elapsed: u64 = 0;

    while elapsed < minimum_millis {
        work().map_err(BenchError::Work)?;
        elapsed = clock.elapsed_millis();
        iterations += 1;
    }

    tracing::trace!(iterations, elapsed, minimum_millis, "measurement loop finished");

    Ok(1000.0 * elapsed as f64 / iterations as f64)
}

/// Run one full measurement cycle and return microseconds per `exercise()`.
///
/// `setup`, a warmup of at least [`WARMUP_MILLIS`] whose result is thrown
/// away, an exercise phase of at least [`EXERCISE_MILLIS`], then `teardown`.
/// Any lifecycle failure is returned as [`BenchError::Kernel`]; `teardown`
/// is skipped in that case.
pub fn measure<C, K>(clock: &mut C, kernel: &mut K) -> Result<f64>
where
    C: Clock + ?Sized,
    K: Kernel + ?Sized,
{
    let name = kernel.name().to_string();

    kernel
        .setup()
        .map_err(|e| BenchError::Work(e).in_phase(&name, Phase::Setup))?;

    measure_for(clock, || kernel.warmup(), WARMUP_MILLIS)
        .map_err(|e| e.in_phase(&name, Phase::Warmup))?;

    let result = measure_for(clock, || kernel.exercise(), EXERCISE_MILLIS)
        .map_err(|e| e.in_phase(&name, Phase::Exercise))?;

    kernel
        .teardown()
        .map_err(|e| BenchError::Work(e).in_phase(&name, Phase::Teardown))?;

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::fake::SteppingClock;
    use crate::clock::Stopwatch;
    use crate::kernel::{KernelResult, EXERCISE_RUNS};

    #[test]
    fn should_average_elapsed_over_iterations() {
        let mut clock = SteppingClock::new(3);
        let mut calls = 0u64;

        let avg = measure_for(
            &mut clock,
            || {
                calls += 1;
                Ok(())
            },
            10,
        )
        .unwrap();

        // Reads return 3, 6, 9, 12: four iterations, 12ms observed.
        assert_eq!(calls, 4);
        assert_eq!(avg, 1000.0 * 12.0 / 4.0);
    }

    #[test]
    fn should_run_work_once_when_minimum_is_tiny_relative_to_cost() {
        let mut clock = SteppingClock::new(10_000);
        let mut calls = 0;

        let avg = measure_for(
            &mut clock,
            || {
                calls += 1;
                Ok(())
            },
            1,
        )
        .unwrap();

        assert_eq!(calls, 1);
        assert_eq!(avg, 10_000_000.0);
    }

    #[test]
    fn should_run_work_at_least_once_with_real_clock() {
        let mut clock = Stopwatch::new();
        let mut calls = 0;
        measure_for(
            &mut clock,
            || {
                calls += 1;
                std::thread::sleep(std::time::Duration::from_millis(5));
                Ok(())
            },
            1,
        )
        .unwrap();
        assert!(calls >= 1);
    }

    #[test]
    fn should_reject_zero_minimum() {
        let mut clock = SteppingClock::new(1);
        let mut calls = 0;
        let err = measure_for(
            &mut clock,
            || {
                calls += 1;
                Ok(())
            },
            0,
        )
        .unwrap_err();

        assert!(matches!(err, BenchError::InvalidMinimum { minimum_millis: 0 }));
        assert_eq!(calls, 0);
        assert_eq!(clock.reads(), 0);
    }

    #[test]
    fn should_stop_loop_when_work_fails() {
        let mut clock = SteppingClock::new(1);
        let mut calls = 0;
        let err = measure_for(
            &mut clock,
            || {
                calls += 1;
                if calls == 5 {
                    anyhow::bail!("broken");
                }
                Ok(())
            },
            1000,
        )
        .unwrap_err();

        assert!(matches!(err, BenchError::Work(_)));
        assert_eq!(calls, 5);
    }

    #[derive(Default)]
    struct Recording {
        events: Vec<&'static str>,
        runs: usize,
    }

    impl Kernel for Recording {
        fn name(&self) -> &str {
            "recording"
        }

        fn setup(&mut self) -> KernelResult {
            self.events.push("setup");
            Ok(())
        }

        fn run(&mut self) -> KernelResult {
            self.runs += 1;
            Ok(())
        }

        fn warmup(&mut self) -> KernelResult {
            if self.events.last() != Some(&"warmup") {
                self.events.push("warmup");
            }
            Ok(())
        }

        fn exercise(&mut self) -> KernelResult {
            if self.events.last() != Some(&"exercise") {
                self.events.push("exercise");
            }
            for _ in 0..EXERCISE_RUNS {
                self.run()?;
            }
            Ok(())
        }

        fn teardown(&mut self) -> KernelResult {
            self.events.push("teardown");
            Ok(())
        }
    }

    #[test]
    fn should_follow_lifecycle_order() {
        let mut clock = SteppingClock::new(1);
        let mut kernel = Recording::default();

        let sample = measure(&mut clock, &mut kernel).unwrap();

        assert_eq!(kernel.events, ["setup", "warmup", "exercise", "teardown"]);
        // One ms per exercise call with the stepping clock.
        assert_eq!(sample, 1000.0);
        assert_eq!(kernel.runs, EXERCISE_MILLIS as usize * EXERCISE_RUNS);
    }

    #[test]
    fn should_tag_failure_with_phase_and_skip_teardown() {
        struct BadWarmup {
            torn_down: bool,
        }
        impl Kernel for BadWarmup {
            fn name(&self) -> &str {
                "bad"
            }
            fn run(&mut self) -> KernelResult {
                Ok(())
            }
            fn warmup(&mut self) -> KernelResult {
                anyhow::bail!("cold")
            }
            fn teardown(&mut self) -> KernelResult {
                self.torn_down = true;
                Ok(())
            }
        }

        let mut clock = SteppingClock::new(1);
        let mut kernel = BadWarmup { torn_down: false };
        let err = measure(&mut clock, &mut kernel).unwrap_err();

        assert_eq!(err.phase(), Some(Phase::Warmup));
        assert!(err.to_string().contains("'bad'"));
        assert!(!kernel.torn_down);
    }

    #[test]
    fn should_report_setup_failure() {
        struct BadSetup;
        impl Kernel for BadSetup {
            fn name(&self) -> &str {
                "bad-setup"
            }
            fn setup(&mut self) -> KernelResult {
                anyhow::bail!("no resources")
            }
            fn run(&mut self) -> KernelResult {
                unreachable!("run after failed setup")
            }
        }

        let mut clock = SteppingClock::new(1);
        let err = measure(&mut clock, &mut BadSetup).unwrap_err();
        assert_eq!(err.phase(), Some(Phase::Setup));
    }
}
