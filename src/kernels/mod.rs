//! Workloads bundled with the harness.

mod nth_prime;
mod particles;
mod tracer;

pub use nth_prime::{nth_prime, NthPrime};
pub use particles::ParticleMotion;
pub use tracer::Tracer;

use crate::kernel::Kernel;

/// The fixed kernel list run by [`crate::run_all`], in report order.
pub fn default_kernels() -> Vec<Box<dyn Kernel>> {
    vec![
        Box::new(NthPrime::new()),
        Box::new(ParticleMotion::new()),
        Box::new(Tracer::new()),
    ]
}
