//! Symbols exported from the `cdylib` for host runtimes.
//!
//! `calculate_sum_of_fibs` is what JNA (`Native.load("fibsum", ...)`) and
//! cgo bind; the JNI entry point serves `dev.tsvinc.fib.FibCalculatorJNI`.
//! None of them do anything beyond converting the integer widths.
use std::os::raw::{c_int, c_longlong};

#[no_mangle]
pub extern "C" fn calculate_sum_of_fibs(count: c_int, n: c_int) -> c_longlong {
    crate::sum_of_fibs(count, n) as c_longlong
}

// exported as plain `fib`, like the C library it replaces
#[export_name = "fib"]
pub extern "C" fn c_fib(n: c_int) -> c_longlong {
    crate::fib(n) as c_longlong
}

#[cfg(feature = "jni")]
pub use self::jni::Java_dev_tsvinc_fib_FibCalculatorJNI_calculateSumOfFibsNative;

#[cfg(feature = "jni")]
mod jni {
    use std::ffi::c_void;

    // jni.h: jint is int32_t, jlong is int64_t
    pub type JInt = i32;
    pub type JLong = i64;

    /// `private static native long calculateSumOfFibsNative(int count, int n)`.
    ///
    /// `env` and `class` are never dereferenced.
    #[no_mangle]
    #[allow(non_snake_case)]
    pub extern "system" fn Java_dev_tsvinc_fib_FibCalculatorJNI_calculateSumOfFibsNative(
        _env: *mut c_void,
        _class: *mut c_void,
        count: JInt,
        n: JInt,
    ) -> JLong {
        crate::sum_of_fibs(count, n)
    }
}
