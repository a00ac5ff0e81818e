//! Layered error definitions
//!
//! Categorized by source: config / timeline / store

use thiserror::Error;

use crate::Frame;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Timeline Errors =====
    /// Strip with an empty visible interval
    #[error("strip '{strip}' has an empty visible interval [{start}, {end})")]
    InvalidStripRange {
        strip: String,
        start: Frame,
        end: Frame,
    },

    /// Two strips overlap on one channel
    #[error("strip '{incoming}' overlaps strip '{existing}' on channel {channel}")]
    StripOverlap {
        channel: u32,
        existing: String,
        incoming: String,
    },

    // ===== Store Errors =====
    /// Scene lookup failed
    #[error("scene not found: {scene}")]
    SceneNotFound { scene: String },

    /// Scene name already taken
    #[error("scene name already in use: {scene}")]
    DuplicateSceneName { scene: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create invalid strip range error
    pub fn invalid_strip_range(strip: impl Into<String>, start: Frame, end: Frame) -> Self {
        Self::InvalidStripRange {
            strip: strip.into(),
            start,
            end,
        }
    }

    /// Create strip overlap error
    pub fn strip_overlap(
        channel: u32,
        existing: impl Into<String>,
        incoming: impl Into<String>,
    ) -> Self {
        Self::StripOverlap {
            channel,
            existing: existing.into(),
            incoming: incoming.into(),
        }
    }

    /// Create scene not found error
    pub fn scene_not_found(scene: impl Into<String>) -> Self {
        Self::SceneNotFound {
            scene: scene.into(),
        }
    }

    /// Create duplicate scene name error
    pub fn duplicate_scene_name(scene: impl Into<String>) -> Self {
        Self::DuplicateSceneName {
            scene: scene.into(),
        }
    }
}
