use anyhow::{Context, Result};
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;

/// `$SIFT_HOME`, else `$HOME/.sift`.
pub fn sift_home() -> Result<PathBuf> {
    resolve_home(std::env::var_os("SIFT_HOME"), std::env::var_os("HOME"))
}

pub fn ensure_sift_home() -> Result<PathBuf> {
    let dir = sift_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

fn resolve_home(sift_home: Option<OsString>, home: Option<OsString>) -> Result<PathBuf> {
    if let Some(dir) = sift_home.filter(|d| !d.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    let home = home.context("neither SIFT_HOME nor HOME is set")?;
    Ok(PathBuf::from(home).join(".sift"))
}
