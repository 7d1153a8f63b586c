//! Configuration for title rendering, validation and storage.
//!
//! Load order: `.contact/config.toml` → environment variables → defaults.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactConfig {
    pub titles: TitlesConfig,
    pub validation: ValidationConfig,
    pub storage: StorageConfig,
}

/// How composite titles are rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TitlesConfig {
    /// Joins organization chain titles: "Armée de terre / Corps A".
    pub organization_separator: String,
    /// Joins organization and position inside a held position's parentheses.
    pub position_separator: String,
    /// Which organization label a held position's full title shows.
    pub held_position_context: HeldPositionContext,
}

/// Organization label used inside a held position's full title.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeldPositionContext {
    /// Title of the root organization only.
    #[default]
    Root,
    /// Full chain title of the organization.
    Chain,
}

impl FromStr for HeldPositionContext {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "root" => Ok(HeldPositionContext::Root),
            "chain" => Ok(HeldPositionContext::Chain),
            other => Err(format!("unknown held position context: {other}")),
        }
    }
}

/// Validation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Reject organization and position types missing from the directory vocabularies.
    pub enforce_vocabularies: bool,
}

/// Storage configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Compress directory.json with zstd before writing.
    /// Decompression on load is automatic (detected by magic bytes).
    pub compress: bool,
}

impl Default for TitlesConfig {
    fn default() -> Self {
        Self {
            organization_separator: " / ".to_string(),
            position_separator: " - ".to_string(),
            held_position_context: HeldPositionContext::Root,
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            enforce_vocabularies: true,
        }
    }
}

/// Helper to parse an env var and apply it to a config field.
fn env_override<T: FromStr>(var: &str, target: &mut T) {
    if let Ok(v) = std::env::var(var)
        && let Ok(n) = v.parse()
    {
        *target = n;
    }
}

impl ContactConfig {
    /// Load config from `.contact/config.toml` in the project root, with env var overrides.
    /// Falls back to defaults if no config file exists.
    pub fn load(project_root: &Path) -> Result<Self> {
        let config_path = crate::storage::contact_dir(project_root).join("config.toml");

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            Self::default()
        };

        env_override(
            "CONTACT_ORG_SEPARATOR",
            &mut config.titles.organization_separator,
        );
        env_override(
            "CONTACT_POSITION_SEPARATOR",
            &mut config.titles.position_separator,
        );
        env_override(
            "CONTACT_HELD_POSITION_CONTEXT",
            &mut config.titles.held_position_context,
        );
        env_override(
            "CONTACT_ENFORCE_VOCABULARIES",
            &mut config.validation.enforce_vocabularies,
        );
        env_override("CONTACT_COMPRESS", &mut config.storage.compress);

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.titles.organization_separator.is_empty() {
            anyhow::bail!("titles.organization_separator must not be empty");
        }
        if self.titles.position_separator.is_empty() {
            anyhow::bail!("titles.position_separator must not be empty");
        }
        Ok(())
    }
}
