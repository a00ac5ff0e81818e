//! SceneStore trait - external scene data store abstraction
//!
//! The synchronization core never owns scenes, strips or objects. It reads and
//! writes them through this trait, which the host application (or the
//! in-memory store used by tests and the CLI) implements.
//!
//! # Contract
//!
//! 1. **Non-owning lookups**: every accessor takes an identifier and returns
//!    `None` / `false` when the entity no longer exists.
//! 2. **Silent writes**: writes issued through this trait never produce a
//!    frame-change notification. Notifications are only raised for clock
//!    changes made by the user or by playback.
//! 3. **Best effort**: setters return whether the write was applied and never
//!    fail; a missing target is simply skipped.

use crate::{
    BrushId, Frame, FrameRange, InteractionMode, MaterialId, ObjectId, PaintObject, SceneId,
    StripId, Timeline,
};

/// Read/write access to scenes and the master timeline.
pub trait SceneStore {
    /// Whether `scene` currently exists.
    fn scene_exists(&self, scene: &SceneId) -> bool;

    /// Timeline owned by `master`, if that scene has one.
    fn timeline(&self, master: &SceneId) -> Option<&Timeline>;

    /// Current frame of a scene's clock.
    fn frame_current(&self, scene: &SceneId) -> Option<Frame>;

    /// Inclusive `frame_start..=frame_end` of a scene.
    fn frame_range(&self, scene: &SceneId) -> Option<FrameRange>;

    /// Set a scene's current frame without notifying.
    fn set_frame_current(&mut self, scene: &SceneId, frame: Frame) -> bool;

    /// Make `camera` the scene's active camera.
    fn set_scene_camera(&mut self, scene: &SceneId, camera: &ObjectId) -> bool;

    /// Scene currently shown to the user.
    fn focused_scene(&self) -> Option<SceneId>;

    /// Change the scene shown to the user.
    fn set_focused_scene(&mut self, scene: &SceneId) -> bool;

    /// Mark a strip as the timeline's selected/active strip.
    fn set_active_strip(&mut self, master: &SceneId, strip: &StripId) -> bool;

    /// Whether `object` still exists in `scene`.
    fn object_exists(&self, scene: &SceneId, object: &ObjectId) -> bool;

    /// Active object of `scene` if it is a paint (grease pencil) object.
    fn active_paint_object(&self, scene: &SceneId) -> Option<PaintObject>;

    /// Current brush of the scene's paint settings.
    ///
    /// `None` when the scene has no paint settings or no brush.
    fn paint_brush(&self, scene: &SceneId) -> Option<BrushId>;

    /// Assign a brush to the scene's paint settings (no-op without settings).
    fn set_paint_brush(&mut self, scene: &SceneId, brush: &BrushId) -> bool;

    /// Switch a paint object into `mode`.
    fn set_object_mode(&mut self, scene: &SceneId, object: &ObjectId, mode: InteractionMode)
        -> bool;

    /// Select `material` on the object if one of its slots holds it.
    fn set_active_material(
        &mut self,
        scene: &SceneId,
        object: &ObjectId,
        material: &MaterialId,
    ) -> bool;
}
