//! Deployment configuration loaded from JSON.
//!
//! Every field has a default, so an empty object `{}` is a valid
//! configuration for a single-event deployment: 6-digit
//! tokens, 30 groups, phone required.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::runtime::handle::RuntimeConfig;

/// Problems reading or validating a [`RaceConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("reading config: {0}")]
    Io(#[from] std::io::Error),
    /// The JSON did not match the schema.
    #[error("parsing config: {0}")]
    Parse(#[from] serde_json::Error),
    /// A field holds an unusable value.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Rules applied by `register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrationPolicy {
    /// Token width. Wider tokens never start with `0`, so the space holds
    /// `9 * 10^(digits-1)` tokens; a single digit uses `0..=9`, 10 tokens.
    pub id_digits: u32,
    /// Random draws before falling back to a sequential walk.
    pub id_max_attempts: u32,
    /// Whether a non-empty phone number is mandatory.
    pub phone_required: bool,
    /// Groups are numbered `1..=group_count`.
    pub group_count: u8,
}

impl Default for RegistrationPolicy {
    fn default() -> Self {
        Self {
            id_digits: 6,
            id_max_attempts: 64,
            phone_required: true,
            group_count: 30,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RaceConfig {
    /// Registration rules.
    pub registration: RegistrationPolicy,
    /// Shared admin password; admin login is refused while unset.
    pub admin_password: Option<String>,
    /// Writer-loop tuning.
    pub runtime: RuntimeConfig,
}

impl RaceConfig {
    /// Parses and validates a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reads, parses and validates a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Checks ranges serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let reg = &self.registration;
        if !(1..=18).contains(&reg.id_digits) {
            return Err(ConfigError::Invalid(format!(
                "id_digits must be within 1..=18, got {}",
                reg.id_digits
            )));
        }
        if reg.id_max_attempts == 0 {
            return Err(ConfigError::Invalid("id_max_attempts must be at least 1".into()));
        }
        if reg.group_count == 0 {
            return Err(ConfigError::Invalid("group_count must be at least 1".into()));
        }
        if self.admin_password.as_deref().is_some_and(|p| p.is_empty()) {
            return Err(ConfigError::Invalid("admin_password must not be empty".into()));
        }
        let rt = &self.runtime;
        if rt.command_queue_bound == 0 || rt.event_capacity == 0 {
            return Err(ConfigError::Invalid("runtime queue sizes must be non-zero".into()));
        }
        if rt.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid("poll_interval_ms must be non-zero".into()));
        }
        Ok(())
    }
}
