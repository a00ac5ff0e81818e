//! Tool-state carryover across active-shot switches.

use contracts::{BrushId, InteractionMode, MaterialId, ObjectId, SceneId, SceneStore};
use tracing::{debug, instrument};

/// Transient authoring state carried from one shot to the next.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolStateSnapshot {
    pub brush: Option<BrushId>,
    pub interaction_mode: Option<InteractionMode>,
    /// Scene and object the state was captured from
    pub active_object: Option<(SceneId, ObjectId)>,
    pub active_material: Option<MaterialId>,
}

impl ToolStateSnapshot {
    pub fn is_empty(&self) -> bool {
        self.brush.is_none() && self.interaction_mode.is_none() && self.active_material.is_none()
    }

    /// Source object, or `None` once it has been deleted from its scene.
    pub fn active_object<S: SceneStore>(&self, store: &S) -> Option<&ObjectId> {
        self.active_object
            .as_ref()
            .filter(|(scene, object)| store.object_exists(scene, object))
            .map(|(_, object)| object)
    }
}

/// Owner of the single persistent [`ToolStateSnapshot`].
#[derive(Debug, Clone, Default)]
pub struct ToolCarryover {
    snapshot: ToolStateSnapshot,
}

impl ToolCarryover {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> &ToolStateSnapshot {
        &self.snapshot
    }

    /// Record the tool state of a scene being left.
    ///
    /// Only a scene with a paint object and a current brush overwrites the
    /// snapshot; anything else leaves it untouched. Returns whether it was
    /// overwritten.
    #[instrument(name = "carryover_capture", level = "debug", skip(self, store), fields(scene = %scene))]
    pub fn capture<S: SceneStore>(&mut self, store: &S, scene: &SceneId) -> bool {
        let Some(paint_object) = store.active_paint_object(scene) else {
            debug!("no paint object, snapshot kept");
            return false;
        };
        let Some(brush) = store.paint_brush(scene) else {
            debug!("no current brush, snapshot kept");
            return false;
        };

        self.snapshot = ToolStateSnapshot {
            brush: Some(brush),
            interaction_mode: Some(paint_object.mode),
            active_object: Some((scene.clone(), paint_object.object)),
            active_material: paint_object.active_material,
        };
        debug!(snapshot = ?self.snapshot, "tool state captured");
        true
    }

    /// Apply the snapshot to a scene being entered.
    ///
    /// The brush goes to the scene's paint settings; mode and material go to
    /// its active paint object. Always overrides what the scene had. Returns
    /// whether anything was written.
    #[instrument(name = "carryover_apply", level = "debug", skip(self, store), fields(scene = %scene))]
    pub fn apply<S: SceneStore>(&self, store: &mut S, scene: &SceneId) -> bool {
        let mut applied = false;

        if let Some(brush) = &self.snapshot.brush {
            applied |= store.set_paint_brush(scene, brush);
        }

        if let Some(paint_object) = store.active_paint_object(scene) {
            if let Some(mode) = self.snapshot.interaction_mode {
                applied |= store.set_object_mode(scene, &paint_object.object, mode);
            }
            if let Some(material) = &self.snapshot.active_material {
                applied |= store.set_active_material(scene, &paint_object.object, material);
            }
        }

        debug!(applied, "tool state applied");
        applied
    }
}
