//! Run a [`Calculator`] on a set of worker threads and time it.
use std::panic::{self, AssertUnwindSafe};
use std::thread;
use std::time::{Duration, Instant};

use crate::bridge::Calculator;

/// Each of `workers` threads computes `calculator.sum_of_fibs(count, n)` once.
/// Results come back in worker order.
pub fn run_with_workers(
    workers: usize,
    count: i32,
    n: i32,
    calculator: &dyn Calculator,
) -> Result<Vec<i64>, String> {
    // a panic must not escape the worker, or the scope re-panics on exit
    thread::scope(|s| {
        let handles: Vec<_> = (0..workers)
            .map(|_| {
                s.spawn(move || {
                    panic::catch_unwind(AssertUnwindSafe(|| calculator.sum_of_fibs(count, n)))
                })
            })
            .collect();
        handles
            .into_iter()
            .enumerate()
            .map(|(i, h)| match h.join() {
                Ok(Ok(sum)) => Ok(sum),
                _ => Err(format!("worker {i} of {} panicked", calculator.name())),
            })
            .collect()
    })
}

pub fn sum_results(results: &[i64]) -> i64 {
    results.iter().fold(0i64, |acc, r| acc.wrapping_add(*r))
}

#[derive(Debug, Clone)]
pub struct RunResult {
    pub name: String,
    pub results: Vec<i64>,
    pub total: i64,
    pub elapsed: Duration,
}

pub fn timed_run(
    workers: usize,
    count: i32,
    n: i32,
    calculator: &dyn Calculator,
) -> Result<RunResult, String> {
    log::info!(
        "{}: {workers} workers x {count} evaluations of fib({n})",
        calculator.name()
    );
    let start = Instant::now();
    let results = run_with_workers(workers, count, n, calculator)?;
    let elapsed = start.elapsed();
    log::info!("{}: done in {elapsed:?}", calculator.name());
    Ok(RunResult {
        name: calculator.name().to_string(),
        total: sum_results(&results),
        results,
        elapsed,
    })
}

/// A bridge run against a native run of the same workload.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub bridge: RunResult,
    pub native: RunResult,
}

impl Comparison {
    // ties go to native
    pub fn winner(&self) -> &str {
        if self.bridge.elapsed < self.native.elapsed {
            &self.bridge.name
        } else {
            &self.native.name
        }
    }

    pub fn difference(&self) -> Duration {
        if self.bridge.elapsed < self.native.elapsed {
            self.native.elapsed - self.bridge.elapsed
        } else {
            self.bridge.elapsed - self.native.elapsed
        }
    }

    pub fn totals_agree(&self) -> bool {
        self.bridge.total == self.native.total
    }
}
