use std::env::consts::{DLL_PREFIX, DLL_SUFFIX};
use std::fs;
use std::path::{Path, PathBuf};

pub fn proper_crate_name(crate_name: &str) -> String {
    crate_name.replace('-', "_")
}

pub fn cargo_dir(dir: &Path) -> Result<(PathBuf, PathBuf), String> {
    let mut path = dir.to_path_buf();
    let mut ok = true;
    while ok {
        let cargo_toml = path.join("Cargo.toml");
        if cargo_toml.exists() {
            return Ok((path, cargo_toml));
        }
        ok = path.pop();
    }
    Err("No Cargo project in this path".into())
}

// the name the library is built under: [lib] name, else the package name
pub fn lib_name(body: &str) -> Result<String, String> {
    let toml = body
        .parse::<toml::Value>()
        .map_err(|e| format!("cannot parse Cargo.toml: {e}"))?;
    let explicit = toml
        .get("lib")
        .and_then(|lib| lib.get("name"))
        .and_then(|name| name.as_str());
    if let Some(name) = explicit {
        return Ok(name.to_string());
    }
    toml.get("package")
        .and_then(|package| package.get("name"))
        .and_then(|name| name.as_str())
        .map(proper_crate_name)
        .ok_or_else(|| "Cargo.toml has no package name".to_string())
}

pub fn crate_lib_name(cargo_toml: &Path) -> Result<String, String> {
    let body = fs::read_to_string(cargo_toml)
        .map_err(|e| format!("cannot read {}: {e}", cargo_toml.display()))?;
    lib_name(&body)
}

// where cargo puts the cdylib when CARGO_TARGET_DIR is not set
pub fn default_library_path(project: &Path, lib_name: &str, release: bool) -> PathBuf {
    project
        .join("target")
        .join(if release { "release" } else { "debug" })
        .join(format!("{DLL_PREFIX}{lib_name}{DLL_SUFFIX}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_lib_name() {
        let body = "[package]\nname = \"fib-sum\"\n\n[lib]\nname = \"fibsum\"\n";
        assert_eq!(lib_name(body).unwrap(), "fibsum");
    }

    #[test]
    fn package_name_is_made_proper() {
        let body = "[package]\nname = \"fib-calculator\"\nversion = \"0.1.0\"\n";
        assert_eq!(lib_name(body).unwrap(), "fib_calculator");
    }

    #[test]
    fn no_package() {
        assert!(lib_name("[workspace]\nmembers = []\n").is_err());
    }

    #[test]
    fn finds_own_manifest() {
        let here = Path::new(env!("CARGO_MANIFEST_DIR")).join("src");
        let (dir, cargo_toml) = cargo_dir(&here).unwrap();
        assert_eq!(dir, Path::new(env!("CARGO_MANIFEST_DIR")));
        assert_eq!(crate_lib_name(&cargo_toml).unwrap(), "fibsum");
    }

    #[test]
    fn library_path_layout() {
        let p = default_library_path(Path::new("/work"), "fibsum", true);
        let expected = format!("/work/target/release/{DLL_PREFIX}fibsum{DLL_SUFFIX}");
        assert_eq!(p, PathBuf::from(expected));
    }
}
