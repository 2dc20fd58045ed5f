//! # Bridge Error Types
//!
//! All errors that can cross the bridge's public boundary. Engine calls are
//! assumed infallible after spawn (the collaborator documents no error path),
//! so the taxonomy is small: spawn refusal, host API misuse, and
//! configuration problems.

use thiserror::Error;

use tessera_core::ScaleError;

use crate::host::CharacterId;

/// Errors that can occur in the bridge.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// The external engine refused to create a character.
    ///
    /// The entity is torn down immediately; there is no retry.
    #[error("engine refused to create a character at ({x:.1}, {y:.1})")]
    SpawnRefused {
        /// World X of the attempted spawn.
        x: f32,
        /// World Y of the attempted spawn.
        y: f32,
    },

    /// A spawn position contained NaN or infinity.
    #[error("spawn position ({x}, {y}) is not finite")]
    SpawnPositionNotFinite {
        /// World X as supplied.
        x: f32,
        /// World Y as supplied.
        y: f32,
    },

    /// The host referenced a character that was never spawned or was already
    /// despawned.
    #[error("unknown character: {0}")]
    UnknownCharacter(CharacterId),

    /// A scale factor failed validation.
    #[error("invalid scale: {0}")]
    Scale(#[from] ScaleError),

    /// A configuration file could not be read.
    #[error("config I/O error: {0}")]
    ConfigIo(#[from] std::io::Error),

    /// A configuration file could not be parsed.
    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;
