//! Iterative Fibonacci numbers and repeated sums of them.
//!
//! The two core functions are total over their inputs and never panic.
//! Values past `fib(92)` do not fit in an `i64`; they wrap with
//! two's-complement arithmetic, and that wrapped value is what every
//! caller (Rust, C or JVM) gets back.
//!
//! [`ffi`] exports the same computation to host runtimes, [`bridge`] puts
//! the native and exported paths behind one [`bridge::Calculator`] trait,
//! and [`workers`] runs a calculator on many threads and times it.
pub mod bridge;
pub mod ffi;
pub mod workers;

/// The `n`-th Fibonacci number, with `fib(0) == 0` and `fib(1) == 1`.
///
/// Non-positive `n` gives 0. Overflow wraps.
pub fn fib(n: i32) -> i64 {
    if n <= 0 {
        return 0;
    }
    if n == 1 {
        return 1;
    }
    let (mut a, mut b) = (0i64, 1i64);
    for _ in 2..=n {
        let next = a.wrapping_add(b);
        a = b;
        b = next;
    }
    b
}

/// Evaluates `fib(n)` exactly `count` times and adds the results up.
///
/// A non-positive `count` gives 0. The total wraps like `fib` does.
pub fn sum_of_fibs(count: i32, n: i32) -> i64 {
    let mut total_sum = 0i64;
    for _ in 0..count.max(0) {
        total_sum = total_sum.wrapping_add(fib(n));
    }
    total_sum
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_cases() {
        assert_eq!(fib(0), 0);
        assert_eq!(fib(1), 1);
        assert_eq!(fib(2), 1);
        assert_eq!(fib(10), 55);
        assert_eq!(fib(20), 6765);
    }

    #[test]
    fn negative_index_is_zero() {
        assert_eq!(fib(-1), 0);
        assert_eq!(fib(i32::MIN), 0);
    }

    #[test]
    fn recurrence_holds_through_overflow() {
        for n in 2..300 {
            assert_eq!(fib(n), fib(n - 1).wrapping_add(fib(n - 2)), "n = {n}");
        }
    }

    #[test]
    fn largest_exact_value() {
        assert_eq!(fib(92), 7540113804746346429);
    }

    #[test]
    fn wrapped_values() {
        assert_eq!(fib(93), -6246583658587674878);
        assert_eq!(fib(94), 1293530146158671551);
        assert_eq!(fib(100), 3736710778780434371);
        assert_eq!(fib(200), -1123705814761610347);
        assert_eq!(fib(1000), 817770325994397771);
    }

    #[test]
    fn sum_with_no_repeats() {
        assert_eq!(sum_of_fibs(0, 10), 0);
        assert_eq!(sum_of_fibs(0, 93), 0);
        assert_eq!(sum_of_fibs(-5, 10), 0);
        assert_eq!(sum_of_fibs(i32::MIN, 10), 0);
    }

    #[test]
    fn sum_is_count_times_fib() {
        assert_eq!(sum_of_fibs(5, 10), 275);
        for count in 1..20 {
            for n in 0..40 {
                assert_eq!(sum_of_fibs(count, n), i64::from(count) * fib(n));
            }
        }
    }

    #[test]
    fn sum_wraps() {
        assert_eq!(sum_of_fibs(2, 92), -3366516464216858758);
        assert_eq!(sum_of_fibs(3, 93), -293006902053473018);
    }
}
