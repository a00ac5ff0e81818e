//! Error types for CLI operations.

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Project file not found
    #[error("Project file not found: {path}")]
    ProjectNotFound { path: String },

    /// Scene named on the command line does not exist
    #[error("Scene not found in project: {scene}")]
    SceneNotFound { scene: String },

    /// Nothing to play or scrub against
    #[error("No master scene configured (set [sync].master_scene or pass --master)")]
    NoMasterScene,

    /// Frame range is empty
    #[error("Empty frame range: {start}..={end}")]
    EmptyRange { start: i64, end: i64 },

    /// Playback execution error
    #[error("Playback failed: {message}")]
    Playback { message: String },
}

impl CliError {
    pub fn project_not_found(path: impl Into<String>) -> Self {
        Self::ProjectNotFound { path: path.into() }
    }

    pub fn scene_not_found(scene: impl Into<String>) -> Self {
        Self::SceneNotFound {
            scene: scene.into(),
        }
    }

    pub fn playback(message: impl Into<String>) -> Self {
        Self::Playback {
            message: message.into(),
        }
    }
}
