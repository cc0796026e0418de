use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fs, path::Path, path::PathBuf};
use tracing::warn;

use crate::{model::UnitSystem, provider::ProviderId};

/// Configuration for a single provider (e.g., API key).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub api_key: String,
}

/// Display preferences, re-persisted on every mutation through the state
/// core's setters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Preferences {
    #[serde(default)]
    pub units: UnitSystem,
    #[serde(default = "default_provider")]
    pub provider: String,
}

fn default_provider() -> String {
    ProviderId::default().as_str().to_string()
}

// Manual Default so an absent [preferences] table and a missing file agree.
impl Default for Preferences {
    fn default() -> Self {
        Self { units: UnitSystem::default(), provider: default_provider() }
    }
}

impl Preferences {
    pub fn provider_id(&self) -> ProviderId {
        ProviderId::try_from(self.provider.as_str()).unwrap_or_default()
    }
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub preferences: Preferences,

    /// Example TOML:
    /// [providers.weatherapi]
    /// api_key = "..."
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

impl Config {
    /// Load config from the given path. A missing file yields defaults; an
    /// unreadable or unparseable file also yields defaults, with the corrupt
    /// file removed so the next save starts clean.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not read config, using defaults");
                return Self::default();
            }
        };

        match toml::from_str(&contents) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "corrupt config, resetting to defaults");
                let _ = fs::remove_file(path);
                Self::default()
            }
        }
    }

    /// Load from the platform config directory.
    pub fn load() -> Result<Self> {
        Ok(Self::load_from(&Self::default_path()?))
    }

    /// Save config to the given path, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Save to the platform config directory.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_path()?)
    }

    /// Path to the config file.
    pub fn default_path() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().join("config.toml"))
    }

    /// Path to the favorites file, kept alongside the config.
    pub fn favorites_path() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().join("favorites.json"))
    }

    /// Convenience helper: set/replace a provider API key.
    pub fn upsert_provider_api_key(&mut self, provider_id: ProviderId, api_key: String) {
        self.providers.insert(provider_id.as_str().to_string(), ProviderConfig { api_key });
    }

    /// Returns API key for a provider, if present.
    pub fn provider_api_key(&self, provider_id: ProviderId) -> Option<&str> {
        self.providers.get(provider_id.as_str()).map(|cfg| cfg.api_key.as_str())
    }

    pub fn is_provider_configured(&self, provider_id: ProviderId) -> bool {
        self.provider_api_key(provider_id).is_some()
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("dev", "clima", "clima")
        .ok_or_else(|| anyhow!("Could not determine platform config directory"))
}
