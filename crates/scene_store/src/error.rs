//! Scene store error types

use contracts::ContractError;
use thiserror::Error;

/// Scene store specific error
#[derive(Debug, Error)]
pub enum SceneStoreError {
    /// Object lookup failed
    #[error("object '{object}' not found in scene '{scene}'")]
    ObjectNotFound { scene: String, object: String },

    /// Object name already used in the scene
    #[error("object '{object}' already exists in scene '{scene}'")]
    DuplicateObject { scene: String, object: String },

    /// Camera lookup failed
    #[error("camera '{camera}' not found in scene '{scene}'")]
    CameraNotFound { scene: String, camera: String },

    /// Strip lookup failed
    #[error("strip '{strip}' not found on the timeline of '{master}'")]
    StripNotFound { master: String, strip: String },

    /// Wrapped ContractError
    #[error(transparent)]
    Contract(#[from] ContractError),
}

impl SceneStoreError {
    /// Create object not found error
    pub fn object_not_found(scene: impl Into<String>, object: impl Into<String>) -> Self {
        Self::ObjectNotFound {
            scene: scene.into(),
            object: object.into(),
        }
    }

    /// Create strip not found error
    pub fn strip_not_found(master: impl Into<String>, strip: impl Into<String>) -> Self {
        Self::StripNotFound {
            master: master.into(),
            strip: strip.into(),
        }
    }
}

/// Result alias
pub type Result<T> = std::result::Result<T, SceneStoreError>;
