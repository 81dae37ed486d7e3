use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// `$FINLENS_HOME`, or `~/.finlens`.
pub fn finlens_home() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os("FINLENS_HOME").filter(|d| !d.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".finlens"))
}

pub fn ensure_finlens_home() -> Result<PathBuf> {
    let dir = finlens_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}
