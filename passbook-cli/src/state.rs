//! Where the CLI keeps its files: `$PASSBOOK_HOME`, else `~/.passbook`.

use anyhow::{Context, Result, bail};
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;

pub const HOME_ENV: &str = "PASSBOOK_HOME";
pub const CONFIG_FILE: &str = "config.toml";

fn resolve_home(explicit: Option<OsString>, user_home: Option<OsString>) -> Result<PathBuf> {
    if let Some(dir) = explicit.filter(|d| !d.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    match user_home.filter(|d| !d.is_empty()) {
        Some(home) => Ok(PathBuf::from(home).join(".passbook")),
        None => bail!("neither {} nor HOME is set", HOME_ENV),
    }
}

pub fn passbook_home() -> Result<PathBuf> {
    resolve_home(std::env::var_os(HOME_ENV), std::env::var_os("HOME"))
}

/// Default config file, creating its directory on first use.
pub fn config_file() -> Result<PathBuf> {
    let dir = passbook_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir.join(CONFIG_FILE))
}
