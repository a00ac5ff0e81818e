//! Frame-change notifications and sync controller outcomes.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Frame, SceneId, StripId};

/// Notification that a scene's `frame_current` changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameChange {
    /// Scene whose clock moved
    pub scene: SceneId,

    /// New frame value
    pub frame: Frame,
}

impl FrameChange {
    pub fn new(scene: impl Into<SceneId>, frame: Frame) -> Self {
        Self {
            scene: scene.into(),
            frame,
        }
    }
}

/// Which clock a propagation started from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncOrigin {
    Master,
    Shot,
}

impl SyncOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Master => "master",
            Self::Shot => "shot",
        }
    }
}

/// Direction of a boundary crossing on a shot clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossingDirection {
    /// Stepped from the first valid frame to the one before it
    Backward,
    /// Stepped from the last valid frame to the one after it
    Forward,
}

impl CrossingDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Backward => "backward",
            Self::Forward => "forward",
        }
    }
}

/// Result of handling one frame-change notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SyncOutcome {
    /// Synchronization is disabled or has no master scene
    Inactive,

    /// The notification does not concern the synchronized clocks
    Ignored { scene: SceneId },

    /// A shot clock left its valid range without a single-step crossing;
    /// only that shot's own frame changed
    Scrubbed { scene: SceneId, frame: Frame },

    /// Master and active shot clocks are consistent
    Synced {
        origin: SyncOrigin,
        master_frame: Frame,
        active_strip: Option<StripId>,
        active_scene: Option<SceneId>,
        /// Local frame written to the active shot, if any
        shot_frame: Option<Frame>,
        /// The active strip changed while handling this notification
        switched: bool,
        /// A single-step boundary crossing carried the shot clock over
        crossing: Option<CrossingDirection>,
    },
}

impl SyncOutcome {
    pub fn is_switch(&self) -> bool {
        matches!(self, Self::Synced { switched: true, .. })
    }

    pub fn active_strip(&self) -> Option<&StripId> {
        match self {
            Self::Synced { active_strip, .. } => active_strip.as_ref(),
            _ => None,
        }
    }
}

impl fmt::Display for SyncOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inactive => write!(f, "inactive"),
            Self::Ignored { scene } => write!(f, "ignored ({scene})"),
            Self::Scrubbed { scene, frame } => write!(f, "scrub {scene}@{frame} (not propagated)"),
            Self::Synced {
                origin,
                master_frame,
                active_strip,
                shot_frame,
                switched,
                crossing,
                ..
            } => {
                write!(f, "{} master@{master_frame}", origin.as_str())?;
                match (active_strip, shot_frame) {
                    (Some(strip), Some(local)) => write!(f, " -> {strip}@{local}")?,
                    (Some(strip), None) => write!(f, " -> {strip}")?,
                    _ => write!(f, " -> <gap>")?,
                }
                if *switched {
                    write!(f, " [switch]")?;
                }
                if let Some(direction) = crossing {
                    write!(f, " [crossing {}]", direction.as_str())?;
                }
                Ok(())
            }
        }
    }
}
