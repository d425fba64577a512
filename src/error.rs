//! Error types for the harness.

use std::fmt;

use thiserror::Error;

/// Lifecycle step a kernel was in when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Setup,
    Warmup,
    Exercise,
    Teardown,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Setup => "setup",
            Phase::Warmup => "warmup",
            Phase::Exercise => "exercise",
            Phase::Teardown => "teardown",
        };
        f.write_str(s)
    }
}

/// Everything that can stop a benchmark run.
#[derive(Debug, Error)]
pub enum BenchError {
    /// A kernel lifecycle method returned an error. The run is aborted.
    #[error("kernel '{kernel}' failed during {phase}: {source}")]
    Kernel {
        kernel: String,
        phase: Phase,
        #[source]
        source: anyhow::Error,
    },

    /// The measurement loop needs a strictly positive minimum duration.
    #[error("minimum duration must be positive, got {minimum_millis}ms")]
    InvalidMinimum { minimum_millis: u64 },

    /// Statistics were requested for zero samples.
    #[error("cannot summarize an empty sample set")]
    EmptySampleSet,

    /// The measurement loop's unit of work failed. Re-tagged with the kernel
    /// name and phase by the protocol before it reaches callers.
    #[error("unit of work failed: {0}")]
    Work(#[source] anyhow::Error),
}

impl BenchError {
    /// Attach kernel context to a bare work failure.
    pub(crate) fn in_phase(self, kernel: &str, phase: Phase) -> Self {
        match self {
            BenchError::Work(source) => BenchError::Kernel {
                kernel: kernel.to_string(),
                phase,
                source,
            },
            other => other,
        }
    }

    /// The phase of a kernel failure, if this is one.
    pub fn phase(&self) -> Option<Phase> {
        match self {
            BenchError::Kernel { phase, .. } => Some(*phase),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, BenchError>;
