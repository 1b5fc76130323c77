//! The profiled calculator

use proxy::intercept;
use std::thread::sleep;
use std::time::Duration;

intercept! {
    /// Operations the demo times.
    pub trait Arithmetic {
        fn add(&self, a: i64, b: i64) -> i64;
        fn multiply(&self, a: i64, b: i64) -> i64;
        /// Naive recursive Fibonacci.
        fn fibonacci(&self, n: u32) -> u64;
    }
}

/// Calculator with simulated work in `add` and `multiply`.
#[derive(Debug, Clone)]
pub struct Calculator {
    add_delay: Duration,
    multiply_delay: Duration,
}

impl Calculator {
    pub fn new() -> Self {
        Self {
            add_delay: Duration::from_millis(10),
            multiply_delay: Duration::from_millis(20),
        }
    }

    /// Calculator that does no simulated work.
    #[cfg(test)]
    pub fn instant() -> Self {
        Self {
            add_delay: Duration::ZERO,
            multiply_delay: Duration::ZERO,
        }
    }
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new()
    }
}

impl Arithmetic for Calculator {
    fn add(&self, a: i64, b: i64) -> i64 {
        sleep(self.add_delay);
        a + b
    }

    fn multiply(&self, a: i64, b: i64) -> i64 {
        sleep(self.multiply_delay);
        a * b
    }

    fn fibonacci(&self, n: u32) -> u64 {
        if n <= 1 {
            return n as u64;
        }
        self.fibonacci(n - 1) + self.fibonacci(n - 2)
    }
}
