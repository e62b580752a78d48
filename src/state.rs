// benchmark settings: defaults, then config files, then the command line
use std::fs;
use std::path::{Path, PathBuf};

use serde_derive::Deserialize;

pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

pub const DEFAULT_ITERATIONS: i32 = 10_000_000;
// largest index whose value still fits in an i64
pub const DEFAULT_FIB_N: i32 = 92;
pub const DEFAULT_PAUSE_MS: u64 = 500;

/// What a config file may set. Every key is optional.
#[derive(Deserialize, Default, Debug, PartialEq)]
pub struct ConfigFile {
    pub workers: Option<usize>,
    pub iterations: Option<i32>,
    pub fib_n: Option<i32>,
    pub pause_ms: Option<u64>,
    pub library: Option<PathBuf>,
}

impl ConfigFile {
    pub fn parse(body: &str) -> Result<ConfigFile, String> {
        toml::from_str(body).map_err(|e| format!("bad config: {e}"))
    }

    pub fn read(path: &Path) -> Result<ConfigFile, String> {
        let body = fs::read_to_string(path)
            .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
        ConfigFile::parse(&body).map_err(|e| format!("{}: {e}", path.display()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct State {
    pub(crate) workers: usize,
    pub(crate) iterations: i32,
    pub(crate) fib_n: i32,
    pub(crate) pause_ms: u64,
    pub(crate) library: Option<PathBuf>,
}

impl Default for State {
    fn default() -> State {
        State {
            workers: default_workers(),
            iterations: DEFAULT_ITERATIONS,
            fib_n: DEFAULT_FIB_N,
            pause_ms: DEFAULT_PAUSE_MS,
            library: None,
        }
    }
}

impl State {
    /// Later layers win; a key missing from `cfg` leaves the current value.
    pub fn merge(mut self, cfg: ConfigFile) -> State {
        if let Some(w) = cfg.workers {
            self.workers = w;
        }
        if let Some(i) = cfg.iterations {
            self.iterations = i;
        }
        if let Some(n) = cfg.fib_n {
            self.fib_n = n;
        }
        if let Some(p) = cfg.pause_ms {
            self.pause_ms = p;
        }
        if cfg.library.is_some() {
            self.library = cfg.library;
        }
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.workers < 1 {
            return Err("workers must be at least 1".into());
        }
        Ok(())
    }
}

pub fn user_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("fibsum").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let s = State::default();
        assert!(s.workers >= 1);
        assert_eq!(s.iterations, 10_000_000);
        assert_eq!(s.fib_n, 92);
        assert_eq!(s.pause_ms, 500);
        assert_eq!(s.library, None);
    }

    #[test]
    fn empty_file_changes_nothing() {
        let cfg = ConfigFile::parse("").unwrap();
        assert_eq!(cfg, ConfigFile::default());
        assert_eq!(State::default().merge(cfg), State::default());
    }

    #[test]
    fn partial_file_overrides() {
        let cfg = ConfigFile::parse(
            r#"
workers = 3
fib_n = 93
library = "target/release/libfibsum.so"
"#,
        )
        .unwrap();
        let s = State::default().merge(cfg);
        assert_eq!(s.workers, 3);
        assert_eq!(s.fib_n, 93);
        assert_eq!(s.iterations, DEFAULT_ITERATIONS);
        assert_eq!(s.library, Some(PathBuf::from("target/release/libfibsum.so")));
    }

    #[test]
    fn later_layer_wins() {
        let first = ConfigFile::parse("iterations = 5\npause_ms = 0").unwrap();
        let second = ConfigFile::parse("iterations = 7").unwrap();
        let s = State::default().merge(first).merge(second);
        assert_eq!(s.iterations, 7);
        assert_eq!(s.pause_ms, 0);
    }

    #[test]
    fn zero_workers_from_file_rejected() {
        let cfg = ConfigFile::parse("workers = 0").unwrap();
        let s = State::default().merge(cfg);
        assert_eq!(s.workers, 0);
        assert!(s.validate().is_err());
        assert!(State::default().validate().is_ok());
    }

    #[test]
    fn wrong_type_is_reported() {
        let err = ConfigFile::parse("workers = \"many\"").unwrap_err();
        assert!(err.starts_with("bad config"), "{err}");
    }
}
