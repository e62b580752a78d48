// building the fibsum cdylib with cargo and finding what it produced
use std::env;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::crate_utils;

fn cargo_command() -> String {
    // set when we are ourselves run by cargo
    env::var("CARGO").unwrap_or_else(|_| "cargo".into())
}

/// The human-readable text of every `compiler-message` record.
pub fn rendered_messages(messages: &str) -> Vec<String> {
    messages
        .lines()
        .filter(|l| l.starts_with('{'))
        .filter_map(|line| json::parse(line).ok())
        .filter(|doc| doc["reason"].as_str() == Some("compiler-message"))
        .filter_map(|doc| doc["message"]["rendered"].as_str().map(|s| s.to_string()))
        .collect()
}

/// Picks the cdylib out of `cargo build --message-format json` output.
/// Other records and non-JSON lines are skipped.
pub fn cdylib_artifact(messages: &str) -> Option<PathBuf> {
    let mut found = None;
    for line in messages.lines().filter(|l| l.starts_with('{')) {
        let doc = match json::parse(line) {
            Ok(doc) => doc,
            Err(_) => continue,
        };
        if doc["reason"].as_str() != Some("compiler-artifact") {
            continue;
        }
        let kinds = &doc["target"]["kind"];
        if !kinds.members().any(|k| k.as_str() == Some("cdylib")) {
            continue;
        }
        // filenames also lists the rlib; keep the shared library
        let dylib = doc["filenames"]
            .members()
            .filter_map(|f| f.as_str())
            .find(|f| f.ends_with(env::consts::DLL_SUFFIX));
        if let Some(f) = dylib {
            found = Some(PathBuf::from(f));
        }
    }
    found
}

fn cargo_build(project: &Path, release: bool, verbose: bool) -> Result<String, String> {
    let mut c = Command::new(cargo_command());
    c.current_dir(project).arg("build").arg("--lib");
    if release {
        c.arg("--release");
    }
    if isatty::stderr_isatty() {
        c.args(["--color", "always"]);
    }
    c.arg("--message-format").arg("json");
    c.stdout(Stdio::piped());
    if verbose {
        eprintln!("running {c:?}");
    }

    let mut res = c.spawn().map_err(|e| format!("can't run cargo: {e}"))?;

    // collect all JSON records, and let the rest
    // pass through...
    let stdout = res.stdout.take().ok_or("cargo stdout not captured")?;
    let mut out = String::new();
    for line in BufReader::new(stdout).lines().map_while(Result::ok) {
        if line.starts_with('{') {
            out += &line;
            out.push('\n');
        } else {
            println!("{line}");
        }
    }

    let status = res.wait().map_err(|e| format!("cargo build error: {e}"))?;
    if status.success() {
        Ok(out)
    } else {
        // with json output, rustc's diagnostics only live in the records
        for rendered in rendered_messages(&out) {
            eprint!("{rendered}");
        }
        Err(format!("cargo build failed with {status}"))
    }
}

/// Builds the library of the nearest Cargo project above `start` and
/// returns the path of the cdylib.
pub fn build_library(start: &Path, release: bool, verbose: bool) -> Result<PathBuf, String> {
    let (project, cargo_toml) = crate_utils::cargo_dir(start)?;
    let messages = cargo_build(&project, release, verbose)?;
    if let Some(lib) = cdylib_artifact(&messages) {
        return Ok(lib);
    }
    // older cargos, or an artifact that was already fresh without a record
    let name = crate_utils::crate_lib_name(&cargo_toml)?;
    let lib = crate_utils::default_library_path(&project, &name, release);
    if lib.exists() {
        Ok(lib)
    } else {
        Err(format!(
            "cargo produced no cdylib for {} (expected {})",
            name,
            lib.display()
        ))
    }
}
