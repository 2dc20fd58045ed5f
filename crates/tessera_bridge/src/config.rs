//! # Bridge Configuration
//!
//! Deployment parameters, loaded once at startup from TOML. Client and
//! server share one window implementation and differ only in configuration.
//!
//! ```toml
//! scale_percent = 100
//!
//! [window]
//! radius = 7
//! band = 6
//! capacity = 128
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use tessera_core::Scale;

use crate::builder::WindowConfig;
use crate::error::BridgeResult;

/// Top-level bridge configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Surface-window geometry.
    #[serde(default)]
    pub window: WindowConfig,
    /// Character scale as a percentage (100 = one tile-width per engine
    /// unit-block).
    #[serde(default = "default_scale_percent")]
    pub scale_percent: u32,
}

fn default_scale_percent() -> u32 {
    100
}

impl BridgeConfig {
    /// Client deployment preset.
    #[must_use]
    pub fn client() -> Self {
        Self {
            window: WindowConfig::CLIENT,
            scale_percent: default_scale_percent(),
        }
    }

    /// Server deployment preset.
    #[must_use]
    pub fn server() -> Self {
        Self {
            window: WindowConfig::SERVER,
            scale_percent: default_scale_percent(),
        }
    }

    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Parse errors and out-of-range values are both rejected.
    pub fn from_toml_str(text: &str) -> BridgeResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses, and validates a TOML config file.
    ///
    /// # Errors
    ///
    /// I/O errors, parse errors, and out-of-range values are all rejected.
    pub fn load(path: &Path) -> BridgeResult<Self> {
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }

    /// Validates every parameter.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn validate(&self) -> BridgeResult<()> {
        self.window.validate()?;
        Scale::from_percent(self.scale_percent)?;
        Ok(())
    }

    /// The configured default character scale.
    ///
    /// # Errors
    ///
    /// Fails only if the percentage is invalid (caught earlier by
    /// [`BridgeConfig::validate`]).
    pub fn default_scale(&self) -> BridgeResult<Scale> {
        Ok(Scale::from_percent(self.scale_percent)?)
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self::client()
    }
}
