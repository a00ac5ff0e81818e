//! SyncSettings - per-document synchronization configuration.

use serde::{Deserialize, Serialize};

use crate::SceneId;

/// Timeline synchronization settings.
///
/// Owned by the project document and mutated by the user only. The sync
/// controller reads it on every notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSettings {
    /// Master switch
    #[serde(default)]
    pub enabled: bool,

    /// Scene holding the edit timeline (weak reference by name)
    #[serde(default)]
    pub master_scene: Option<SceneId>,

    /// Propagate shot clock changes back to the master clock
    #[serde(default = "default_true")]
    pub bidirectional: bool,

    /// Mark the strip under the playhead as the timeline's active strip
    #[serde(default)]
    pub active_follows_playhead: bool,

    /// Carry brush / interaction mode / material across shot switches
    #[serde(default)]
    pub keep_gpencil_tool_settings: bool,
}

fn default_true() -> bool {
    true
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            master_scene: None,
            bidirectional: true,
            active_follows_playhead: false,
            keep_gpencil_tool_settings: false,
        }
    }
}

impl SyncSettings {
    /// Whether the controller should be in its Active state.
    pub fn is_active(&self) -> bool {
        self.enabled && self.master_scene.is_some()
    }
}
