//! Engine configuration using Figment
//!
//! Sources are merged in precedence order (later sources override earlier ones):
//! 1. Built-in defaults
//! 2. `kanban-document.toml` in the working directory, or an explicit file
//! 3. Environment variables prefixed with `KANBAN_DOC_`

use crate::error::{DocumentError, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, trace};

/// Default configuration file name, looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "kanban-document.toml";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "KANBAN_DOC_";

/// Tunables for the document engine and its persistence session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Random color attempts before falling back to the palette cycle
    pub color_retry_limit: usize,
    /// Smallest generated display id
    pub display_id_min: u32,
    /// Largest generated display id
    pub display_id_max: u32,
    /// Quiet period after the last edit before a session saves
    pub save_debounce_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            color_retry_limit: 20,
            display_id_min: 100,
            display_id_max: 999,
            save_debounce_ms: 1000,
        }
    }
}

impl EngineConfig {
    /// Load from defaults, `kanban-document.toml` (if present) and the environment
    pub fn load() -> Result<Self> {
        Self::extract(Self::figment(Some(Path::new(CONFIG_FILE_NAME))))
    }

    /// Load from defaults, the given TOML file and the environment
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DocumentError::invalid_value(
                "config",
                format!("file not found: {}", path.display()),
            ));
        }
        Self::extract(Self::figment(Some(path)))
    }

    /// Build the figment with all sources in precedence order
    pub fn figment(file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(EngineConfig::default()));
        if let Some(path) = file {
            trace!("Merging config file: {}", path.display());
            // Toml::file tolerates a missing file
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).lowercase(true))
    }

    fn extract(figment: Figment) -> Result<Self> {
        let config: EngineConfig = figment.extract()?;
        config.validate()?;
        debug!(?config, "Loaded engine configuration");
        Ok(config)
    }

    /// Reject settings the engine cannot honor
    pub fn validate(&self) -> Result<()> {
        if self.color_retry_limit == 0 {
            return Err(DocumentError::invalid_value(
                "color_retry_limit",
                "must be at least 1",
            ));
        }
        if self.display_id_min > self.display_id_max {
            return Err(DocumentError::invalid_value(
                "display_id_min",
                format!(
                    "{} is greater than display_id_max {}",
                    self.display_id_min, self.display_id_max
                ),
            ));
        }
        Ok(())
    }

    pub fn save_debounce(&self) -> Duration {
        Duration::from_millis(self.save_debounce_ms)
    }
}
