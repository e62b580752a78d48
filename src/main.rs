//! Benchmark the cost of calling `sum_of_fibs` across a native bridge.
//!
//! The same workload runs twice on a set of worker threads: once through
//! the bridge (the exported C symbol, or a compiled fibsum cdylib) and
//! once as a plain Rust call.
extern crate easy_shortcuts as es;

use es::traits::*;
use std::env;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use fibsum::bridge::{Calculator, Exported, LoadedLibrary, Native};
use fibsum::workers::{self, Comparison};

mod compile;
mod crate_utils;
mod state;

use state::{ConfigFile, State};

const VERSION: &str = env!("CARGO_PKG_VERSION");

const DELIMITER: &str = "----------------------------------------";

const USAGE: &str = "
Benchmark repeated Fibonacci sums across a native bridge
  -w, --workers (integer) worker threads, one per CPU if not given
  -i, --iterations (integer) fib evaluations per worker, 10000000 if not given
  -n, --fib (integer) Fibonacci index, 92 if not given
  -p, --pause (integer) milliseconds to sleep between runs, 500 if not given
  -l, --library (string) compiled fibsum cdylib to benchmark
  -b, --build build the fibsum cdylib with cargo, then benchmark it
  -r, --release with --build, build in release mode
  -c, --config (string) TOML configuration file
  -e, --eval print sum_of_fibs(iterations, n) once and exit

  -v, --verbose describe what's happening
  -V, --version version of fibsum
";

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

// defaults < user config < --config < flags
fn resolve_state(args: &lapp::Args) -> State {
    let mut state = State::default();
    if let Some(user) = state::user_config_file() {
        if user.is_file() {
            log::debug!("reading {}", user.display());
            state = state.merge(ConfigFile::read(&user).or_then_die(|e| e.to_string()));
        }
    }
    if let Ok(file) = args.get_string_result("config") {
        let cfg = ConfigFile::read(&PathBuf::from(file)).or_then_die(|e| e.to_string());
        state = state.merge(cfg);
    }
    if let Ok(w) = args.get_integer_result("workers") {
        if w < 1 {
            args.quit("--workers must be at least 1");
        }
        state.workers = w as usize;
    }
    if let Ok(i) = args.get_integer_result("iterations") {
        state.iterations = i;
    }
    if let Ok(n) = args.get_integer_result("fib") {
        state.fib_n = n;
    }
    if let Ok(p) = args.get_integer_result("pause") {
        if p < 0 {
            args.quit("--pause cannot be negative");
        }
        state.pause_ms = p as u64;
    }
    if let Ok(lib) = args.get_string_result("library") {
        state.library = Some(lib.into());
    }
    // config files skip the flag checks above
    if let Err(msg) = state.validate() {
        args.quit(&msg);
    }
    state
}

fn print_run(label: &str, run: &workers::RunResult) {
    println!("{label} time: \t\t{:?}", run.elapsed);
    println!("{label} total sum: \t\t{}", run.total);
    println!("{DELIMITER}");
}

fn benchmark(state: &State, bridge: &dyn Calculator) {
    println!("number of workers: {}", state.workers);
    println!("iterations per worker: {}", state.iterations);
    println!("fibonacci n: {}", state.fib_n);
    println!("{DELIMITER}");

    let bridge_run = workers::timed_run(state.workers, state.iterations, state.fib_n, bridge)
        .or_then_die(|e| e.to_string());
    print_run(bridge.name(), &bridge_run);

    thread::sleep(Duration::from_millis(state.pause_ms));

    let native_run = workers::timed_run(state.workers, state.iterations, state.fib_n, &Native)
        .or_then_die(|e| e.to_string());
    print_run(Native.name(), &native_run);

    let cmp = Comparison {
        bridge: bridge_run,
        native: native_run,
    };
    println!(
        "{} time:\t\t{:?}\n{} time:\t\t{:?}",
        cmp.bridge.name, cmp.bridge.elapsed, cmp.native.name, cmp.native.elapsed
    );
    println!("{DELIMITER}");
    println!("{} wins with diff: \t{:?}", cmp.winner(), cmp.difference());
    if !cmp.totals_agree() {
        log::warn!(
            "totals differ: {} {} vs {} {}",
            cmp.bridge.name,
            cmp.bridge.total,
            cmp.native.name,
            cmp.native.total
        );
    }
}

fn main() {
    let args = lapp::parse_args(USAGE);
    let b = |p| args.get_bool(p);

    if b("version") {
        println!("fibsum {VERSION}");
        return;
    }
    let verbose = b("verbose");
    init_logging(verbose);

    if b("release") && !b("build") {
        args.quit("--release only makes sense with --build");
    }

    let mut state = resolve_state(&args);
    log::debug!("{state:?}");

    if b("build") {
        let here = env::current_dir().or_die("no current directory?");
        let lib = compile::build_library(&here, b("release"), verbose)
            .or_then_die(|e| e.to_string());
        if verbose {
            eprintln!("built {}", lib.display());
        }
        state.library = Some(lib);
    }

    let loaded = state
        .library
        .as_ref()
        .map(|path| LoadedLibrary::open(path).or_then_die(|e| e.to_string()));
    let exported = Exported::default();
    let bridge: &dyn Calculator = match loaded {
        Some(ref lib) => lib,
        None => &exported,
    };

    if b("eval") {
        println!("{}", bridge.sum_of_fibs(state.iterations, state.fib_n));
        return;
    }

    benchmark(&state, bridge);
}
