//! Ways of reaching `sum_of_fibs`: directly, through the in-process C export,
//! or through a separately compiled shared library.
use std::ffi::OsStr;
use std::os::raw::{c_int, c_longlong};
use std::sync::Arc;

type SumFn = extern "C" fn(c_int, c_int) -> c_longlong;

const SUM_SYMBOL: &[u8] = b"calculate_sum_of_fibs\0";

/// Anything that can compute `count` repeated evaluations of `fib(n)`.
pub trait Calculator: Sync {
    fn name(&self) -> &str;

    fn sum_of_fibs(&self, count: i32, n: i32) -> i64;
}

/// Plain Rust call.
#[derive(Clone, Copy, Debug, Default)]
pub struct Native;

impl Calculator for Native {
    fn name(&self) -> &str {
        "native"
    }

    fn sum_of_fibs(&self, count: i32, n: i32) -> i64 {
        crate::sum_of_fibs(count, n)
    }
}

/// Goes through the `extern "C"` export of this crate via a function pointer.
#[derive(Clone, Copy, Debug)]
pub struct Exported {
    function: SumFn,
}

impl Default for Exported {
    fn default() -> Self {
        Exported {
            function: crate::ffi::calculate_sum_of_fibs,
        }
    }
}

impl Calculator for Exported {
    fn name(&self) -> &str {
        "c-abi"
    }

    fn sum_of_fibs(&self, count: i32, n: i32) -> i64 {
        (self.function)(count, n)
    }
}

/// `calculate_sum_of_fibs` resolved from a shared library on disk.
/// Keeps the library loaded for as long as the function pointer is around.
#[derive(Clone)]
pub struct LoadedLibrary {
    #[allow(dead_code)]
    library: Arc<libloading::Library>,
    function: SumFn,
    name: String,
}

impl LoadedLibrary {
    pub fn open<P: AsRef<OsStr>>(path: P) -> Result<LoadedLibrary, String> {
        let path = path.as_ref();
        log::debug!("loading {}", path.to_string_lossy());
        // Loading runs the library's initialisers; a fibsum cdylib has none.
        let library = unsafe { libloading::Library::new(path) }
            .map_err(|e| format!("cannot load {}: {e}", path.to_string_lossy()))?;
        // The symbol is declared with exactly this signature in `ffi`.
        let function = unsafe { library.get::<SumFn>(SUM_SYMBOL) }
            .map(|sym| *sym)
            .map_err(|e| {
                format!(
                    "{} does not export calculate_sum_of_fibs: {e}",
                    path.to_string_lossy()
                )
            })?;
        Ok(LoadedLibrary {
            library: Arc::new(library),
            function,
            name: format!("dylib {}", path.to_string_lossy()),
        })
    }
}

impl Calculator for LoadedLibrary {
    fn name(&self) -> &str {
        &self.name
    }

    fn sum_of_fibs(&self, count: i32, n: i32) -> i64 {
        (self.function)(count, n)
    }
}
