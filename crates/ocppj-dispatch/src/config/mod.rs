//! Dispatcher config loader (strict parsing).

pub mod schema;

use std::fs;
use std::path::Path;

use ocppj_core::error::{OcppError, Result};

pub use schema::{DispatchConfig, DispatchSection, DuplicatePolicy, HooksSection, ReplaySection};

pub fn load_from_file(path: impl AsRef<Path>) -> Result<DispatchConfig> {
    let path = path.as_ref();
    let s = fs::read_to_string(path)
        .map_err(|e| OcppError::Config(format!("read {} failed: {e}", path.display())))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<DispatchConfig> {
    let cfg: DispatchConfig =
        serde_yaml::from_str(s).map_err(|e| OcppError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
