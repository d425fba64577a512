use crate::kernel::{Kernel, KernelResult};

/// Finds the n-th prime by trial division.
pub struct NthPrime {
    nth: u32,
    expected: u64,
    found: u64,
}

impl NthPrime {
    /// The 100th prime is 541.
    pub fn new() -> Self {
        Self::with_target(100, 541)
    }

    pub fn with_target(nth: u32, expected: u64) -> Self {
        Self {
            nth,
            expected,
            found: 0,
        }
    }
}

impl Default for NthPrime {
    fn default() -> Self {
        Self::new()
    }
}

fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    let mut i = 2;
    while i * i <= n {
        if n % i == 0 {
            return false;
        }
        i += 1;
    }
    true
}

/// The n-th prime, counting 2 as the first. `n` must be at least 1.
pub fn nth_prime(n: u32) -> u64 {
    let mut count = 0;
    let mut candidate = 1;
    loop {
        candidate += 1;
        if is_prime(candidate) {
            count += 1;
            if count == n {
                return candidate;
            }
        }
    }
}

impl Kernel for NthPrime {
    fn name(&self) -> &str {
        "NthPrime"
    }

    fn setup(&mut self) -> KernelResult {
        anyhow::ensure!(self.nth > 0, "prime index must be at least 1");
        self.found = 0;
        Ok(())
    }

    fn run(&mut self) -> KernelResult {
        self.found = nth_prime(std::hint::black_box(self.nth));
        anyhow::ensure!(
            self.found == self.expected,
            "prime #{} was {}, expected {}",
            self.nth,
            self.found,
            self.expected
        );
        Ok(())
    }

    // A much cheaper search is enough to fault in code and caches.
    fn warmup(&mut self) -> KernelResult {
        std::hint::black_box(nth_prime(10));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_find_small_primes() {
        assert_eq!(nth_prime(1), 2);
        assert_eq!(nth_prime(2), 3);
        assert_eq!(nth_prime(10), 29);
        assert_eq!(nth_prime(100), 541);
    }

    #[test]
    fn should_fail_run_on_wrong_expectation() {
        let mut kernel = NthPrime::with_target(10, 31);
        kernel.setup().unwrap();
        assert!(kernel.run().is_err());
    }

    #[test]
    fn should_reject_zero_index_in_setup() {
        let mut kernel = NthPrime::with_target(0, 0);
        assert!(kernel.setup().is_err());
    }
}
