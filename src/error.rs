//! Error types
//!
//! Everything that can go wrong here happens at startup. Once the frame loop
//! is running, stale handles and duplicate contacts are absorbed rather than
//! reported as errors.

use std::path::PathBuf;

/// Result alias used across the crate
pub type SimResult<T> = Result<T, SimError>;

#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("Invalid settings: {field} {reason}")]
    InvalidSettings { field: &'static str, reason: String },

    #[error("Physics world initialization failed: {0}")]
    WorldInit(String),

    #[error("Could not read settings file {path}: {source}")]
    SettingsIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not parse settings file {path}: {source}")]
    SettingsParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Could not install interrupt handler: {0}")]
    Interrupt(#[from] ctrlc::Error),

    #[error("The frame loop has already shut down")]
    AlreadyShutDown,
}

impl SimError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        SimError::InvalidSettings {
            field,
            reason: reason.into(),
        }
    }
}
