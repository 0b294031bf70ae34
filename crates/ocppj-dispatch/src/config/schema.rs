use serde::Deserialize;

use ocppj_core::error::{OcppError, Result};

use crate::actions;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DispatchConfig {
    pub version: u32,

    #[serde(default)]
    pub dispatch: DispatchSection,

    #[serde(default)]
    pub hooks: HooksSection,

    #[serde(default)]
    pub replay: ReplaySection,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            version: 1,
            dispatch: DispatchSection::default(),
            hooks: HooksSection::default(),
            replay: ReplaySection::default(),
        }
    }
}

impl DispatchConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(OcppError::Config(format!(
                "unsupported config version: {}",
                self.version
            )));
        }

        self.dispatch.validate()?;
        self.replay.validate()?;

        Ok(())
    }
}

/// What to do when an action is registered twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Fail startup.
    #[default]
    Reject,
    /// Keep the last registration.
    Replace,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DispatchSection {
    #[serde(default = "default_max_frame_bytes")]
    pub max_frame_bytes: usize,

    #[serde(default = "default_true")]
    pub freeze_registry: bool,

    #[serde(default)]
    pub on_duplicate: DuplicatePolicy,

    /// Built-in actions to enable. Empty means all of them.
    #[serde(default)]
    pub actions: Vec<String>,
}

impl Default for DispatchSection {
    fn default() -> Self {
        Self {
            max_frame_bytes: default_max_frame_bytes(),
            freeze_registry: true,
            on_duplicate: DuplicatePolicy::default(),
            actions: Vec::new(),
        }
    }
}

impl DispatchSection {
    pub fn validate(&self) -> Result<()> {
        if !(64..=16 * 1024 * 1024).contains(&self.max_frame_bytes) {
            return Err(OcppError::Config(
                "dispatch.max_frame_bytes must be between 64 and 16777216".into(),
            ));
        }
        for a in &self.actions {
            if !actions::builtin_actions().any(|b| b == a) {
                return Err(OcppError::Config(format!(
                    "dispatch.actions: unknown action {a}"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HooksSection {
    #[serde(default = "default_true")]
    pub log: bool,

    #[serde(default = "default_true")]
    pub metrics: bool,
}

impl Default for HooksSection {
    fn default() -> Self {
        Self {
            log: true,
            metrics: true,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReplaySection {
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for ReplaySection {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
        }
    }
}

impl ReplaySection {
    pub fn validate(&self) -> Result<()> {
        if !(1..=256).contains(&self.concurrency) {
            return Err(OcppError::Config(
                "replay.concurrency must be between 1 and 256".into(),
            ));
        }
        Ok(())
    }
}

fn default_max_frame_bytes() -> usize {
    65536
}
fn default_true() -> bool {
    true
}
fn default_concurrency() -> usize {
    4
}
