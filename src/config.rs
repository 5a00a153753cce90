//! Application configuration module
//!
//! Settings are stored with `confy`, which picks the OS-specific config
//! directory and handles serialization.

use crate::constant::{APP_NAME, DEFAULT_REWRITE_SIMILARITY};
use crate::error::Result;
use crate::normalize::NormalizeOptions;
use crate::replace::AnchorPosition;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{info, warn};

pub struct Config {
    pub settings: Settings,
}

impl Config {
    /// Load configuration from disk, creating default if it doesn't exist
    pub fn load() -> Result<Self> {
        let settings: Settings = confy::load(APP_NAME, None)?;
        info!("Load config from {:?}", Self::config_path()?);
        Ok(Self { settings })
    }

    /// Save current configuration to disk
    pub fn save(&self) -> Result<()> {
        confy::store(APP_NAME, None, &self.settings)?;
        info!("Save config to {:?}", Self::config_path()?);
        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(confy::get_configuration_file_path(APP_NAME, None)?)
    }

    pub fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions {
            canonical_lines: self.settings.canonical_lines,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::load().unwrap_or_else(|e| {
            warn!("Falling back to default settings: {}", e);
            Self {
                settings: Settings::default(),
            }
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Run every paragraph through line canonicalization (NFKC, dash and
    /// spacing cleanup) before comparing
    #[serde(default)]
    pub canonical_lines: bool,

    /// Minimum `similar` ratio for a removed/added pair to count as a rewrite
    #[serde(default = "default_rewrite_similarity")]
    pub rewrite_similarity: f32,

    /// Side of the anchor where recovered insertions are placed
    #[serde(default)]
    pub anchor_position: AnchorPosition,
}

fn default_rewrite_similarity() -> f32 {
    DEFAULT_REWRITE_SIMILARITY
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            canonical_lines: false,
            rewrite_similarity: DEFAULT_REWRITE_SIMILARITY,
            anchor_position: AnchorPosition::default(),
        }
    }
}
