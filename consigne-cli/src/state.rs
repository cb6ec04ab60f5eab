use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// `$CONSIGNE_HOME`, else `~/.consigne`.
pub fn consigne_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("CONSIGNE_HOME") {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let home = std::env::var("HOME").context("HOME is not set (or set CONSIGNE_HOME)")?;
    Ok(PathBuf::from(home).join(".consigne"))
}

pub fn ensure_consigne_home() -> Result<PathBuf> {
    let dir = consigne_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}
