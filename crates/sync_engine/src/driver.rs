//! Synchronous notification delivery over an owned store.

use contracts::{Frame, FrameChange, SceneId, SceneStore, SyncOutcome, SyncSettings};

use crate::controller::SyncController;
use crate::error::Result;

/// Store plus controller, wired so that user clock changes notify the
/// controller and controller writes do not.
///
/// This plays the role of the host's frame-change subscription: every
/// [`SyncDriver::frame_set`] is delivered to the controller before it
/// returns, one at a time.
#[derive(Debug)]
pub struct SyncDriver<S: SceneStore> {
    store: S,
    controller: SyncController,
}

impl<S: SceneStore> SyncDriver<S> {
    /// Wrap `store` with a controller; nothing is synchronized until the
    /// first notification or [`update`](Self::update).
    pub fn new(store: S, settings: SyncSettings) -> Self {
        Self {
            store,
            controller: SyncController::new(settings),
        }
    }

    /// User-driven clock change: write the frame, then notify.
    pub fn frame_set(&mut self, scene: impl Into<SceneId>, frame: Frame) -> Result<SyncOutcome> {
        let change = FrameChange::new(scene, frame);
        self.notify(&change)
    }

    /// Apply and deliver an already-built notification.
    pub fn notify(&mut self, change: &FrameChange) -> Result<SyncOutcome> {
        self.store.set_frame_current(&change.scene, change.frame);
        self.controller.on_frame_change(&mut self.store, change)
    }

    pub fn toggle(&mut self, master: Option<SceneId>) -> Result<SyncOutcome> {
        self.controller.toggle(&mut self.store, master)
    }

    pub fn configure(&mut self, edit: impl FnOnce(&mut SyncSettings)) -> Result<SyncOutcome> {
        self.controller.configure(&mut self.store, edit)
    }

    pub fn update(&mut self) -> Result<SyncOutcome> {
        self.controller.update(&mut self.store)
    }

    pub fn settings(&self) -> &SyncSettings {
        self.controller.settings()
    }

    pub fn controller(&self) -> &SyncController {
        &self.controller
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Direct store access; edits made here are silent.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}
