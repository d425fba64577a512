//! The lifecycle contract every workload implements.

/// Outcome of a kernel lifecycle method. Kernels may fail with any error type.
pub type KernelResult = anyhow::Result<()>;

/// Number of `run()` calls performed by the default [`Kernel::exercise`].
pub const EXERCISE_RUNS: usize = 10;

/// A benchmarkable workload.
///
/// One instance is reused for every measurement cycle of a sample set:
/// `setup` → `warmup`* → `exercise`* → `teardown`, then back to `setup`.
/// `setup` must reset whatever `run` mutates, otherwise later cycles
/// measure a different workload than earlier ones.
///
/// # Example
///
/// ```rust
/// use ton80::{Kernel, KernelResult};
///
/// struct Sum {
///     total: u64,
/// }
///
/// impl Kernel for Sum {
///     fn name(&self) -> &str {
///         "Sum"
///     }
///
///     fn setup(&mut self) -> KernelResult {
///         self.total = 0;
///         Ok(())
///     }
///
///     fn run(&mut self) -> KernelResult {
///         self.total += (0..1000u64).sum::<u64>();
///         Ok(())
///     }
/// }
/// ```
pub trait Kernel {
    /// Display name used in report lines.
    fn name(&self) -> &str;

    /// Prepare kernel state for a fresh cycle.
    fn setup(&mut self) -> KernelResult {
        Ok(())
    }

    /// One indivisible unit of work. Must tolerate back-to-back calls.
    fn run(&mut self) -> KernelResult;

    /// Untimed-for-results warmup step. Runs the workload once by default.
    fn warmup(&mut self) -> KernelResult {
        self.run()
    }

    /// The measured batch: [`EXERCISE_RUNS`] consecutive `run()` calls.
    fn exercise(&mut self) -> KernelResult {
        for _ in 0..EXERCISE_RUNS {
            self.run()?;
        }
        Ok(())
    }

    /// Release per-cycle state; the kernel must accept another `setup()`.
    fn teardown(&mut self) -> KernelResult {
        Ok(())
    }
}

impl<K: Kernel + ?Sized> Kernel for Box<K> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn setup(&mut self) -> KernelResult {
        (**self).setup()
    }

    fn run(&mut self) -> KernelResult {
        (**self).run()
    }

    fn warmup(&mut self) -> KernelResult {
        (**self).warmup()
    }

    fn exercise(&mut self) -> KernelResult {
        (**self).exercise()
    }

    fn teardown(&mut self) -> KernelResult {
        (**self).teardown()
    }
}
