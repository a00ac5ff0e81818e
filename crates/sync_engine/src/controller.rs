//! Sync controller: the reactive state machine tying the master clock to the
//! active shot's clock.

use contracts::{
    CrossingDirection, Frame, FrameChange, SceneId, SceneStore, Strip, StripId, SyncOrigin,
    SyncOutcome, SyncSettings,
};
use tracing::{debug, info, instrument, warn};

use crate::carryover::ToolCarryover;
use crate::detector::{BoundaryDetector, Crossing};
use crate::error::Result;
use crate::mapper::{local_to_master, master_to_local, StripMapping};
use crate::resolver::resolve;

/// Controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// Disabled, or no usable master scene
    Disabled,
    /// Propagating frame changes
    Active,
}

impl SyncState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::Active => "active",
        }
    }
}

/// Which shot is active and where each clock was last seen.
#[derive(Debug, Clone, Default)]
pub struct ActiveShotRecord {
    pub active_strip: Option<StripId>,
    pub active_scene: Option<SceneId>,
    pub last_master_frame: Option<Frame>,
    /// Last frame per shot clock
    pub detector: BoundaryDetector,
}

/// Per-activation state, built on Disabled -> Active and dropped on the way
/// back.
#[derive(Debug)]
pub struct SyncSession {
    master: SceneId,
    record: ActiveShotRecord,
    carryover: ToolCarryover,
}

impl SyncSession {
    fn new(master: SceneId) -> Self {
        Self {
            master,
            record: ActiveShotRecord::default(),
            carryover: ToolCarryover::new(),
        }
    }

    pub fn master(&self) -> &SceneId {
        &self.master
    }

    pub fn record(&self) -> &ActiveShotRecord {
        &self.record
    }

    pub fn carryover(&self) -> &ToolCarryover {
        &self.carryover
    }

    /// Current definition of the active strip, looked up by id.
    fn active_strip<S: SceneStore>(&self, store: &S) -> Option<Strip> {
        let id = self.record.active_strip.as_ref()?;
        store.timeline(&self.master)?.strip(id).cloned()
    }

    /// Master clock moved to `frame`: resolve, switch if needed, snap the
    /// active shot.
    fn sync_master<S: SceneStore>(
        &mut self,
        store: &mut S,
        settings: &SyncSettings,
        frame: Frame,
        origin: SyncOrigin,
        crossing: Option<CrossingDirection>,
    ) -> SyncOutcome {
        let previous = self.record.last_master_frame.replace(frame);
        metrics::gauge!("shot_sync_master_frame").set(frame as f64);

        let resolved = store
            .timeline(&self.master)
            .and_then(|timeline| resolve(timeline, frame, |scene| store.scene_exists(scene)))
            .cloned();

        let switched = resolved.as_ref().map(|s| (&s.id, s.scene.as_ref()))
            != self
                .record
                .active_strip
                .as_ref()
                .map(|id| (id, self.record.active_scene.as_ref()));
        if switched {
            self.switch_active(store, settings, resolved.as_ref());
        }

        let shot_frame = resolved
            .as_ref()
            .and_then(|strip| self.snap_shot(store, strip, frame));

        if settings.active_follows_playhead {
            if let Some(strip) = &resolved {
                store.set_active_strip(&self.master, &strip.id);
            }
        }

        debug!(frame, ?previous, strip = ?self.record.active_strip, ?shot_frame, "master synced");

        SyncOutcome::Synced {
            origin,
            master_frame: frame,
            active_strip: self.record.active_strip.clone(),
            active_scene: self.record.active_scene.clone(),
            shot_frame,
            switched,
            crossing,
        }
    }

    /// Set the shot clock of `strip` to match `master_frame`.
    fn snap_shot<S: SceneStore>(
        &mut self,
        store: &mut S,
        strip: &Strip,
        master_frame: Frame,
    ) -> Option<Frame> {
        let scene = strip.scene.as_ref()?;
        let range = store.frame_range(scene)?;
        let local = master_to_local(master_frame, &StripMapping::new(strip, range.start));
        store.set_frame_current(scene, local);
        self.record.detector.reset(scene, local);
        Some(local)
    }

    /// Active-shot switch: capture, focus, camera, apply.
    #[instrument(
        name = "sync_switch_active",
        skip(self, store, settings, incoming),
        fields(
            from = ?self.record.active_strip,
            to = ?incoming.map(|s| &s.id),
        )
    )]
    fn switch_active<S: SceneStore>(
        &mut self,
        store: &mut S,
        settings: &SyncSettings,
        incoming: Option<&Strip>,
    ) {
        let outgoing = self.record.active_scene.take();
        self.record.active_strip = None;

        if settings.keep_gpencil_tool_settings {
            if let Some(scene) = outgoing.as_ref().filter(|s| store.scene_exists(s)) {
                self.carryover.capture(store, scene);
            }
        }

        let Some(strip) = incoming else {
            info!("active shot vacated");
            return;
        };
        let Some(scene) = strip.scene.clone() else {
            return;
        };

        store.set_focused_scene(&scene);

        if let Some(camera) = &strip.scene_camera {
            if !store.set_scene_camera(&scene, camera) {
                warn!(strip = %strip.id, camera = %camera, "strip camera not found in shot scene");
            }
        }

        if settings.keep_gpencil_tool_settings {
            self.carryover.apply(store, &scene);
        }

        info!(strip = %strip.id, scene = %scene, "active shot switched");
        self.record.active_strip = Some(strip.id.clone());
        self.record.active_scene = Some(scene);
    }

    /// Shot clock moved: classify and, when accepted, carry it to the master.
    ///
    /// One hop at most: the master pass that follows only writes shot clocks,
    /// and controller writes never notify, so the cascade ends there.
    fn sync_shot<S: SceneStore>(
        &mut self,
        store: &mut S,
        settings: &SyncSettings,
        change: &FrameChange,
    ) -> SyncOutcome {
        let active = self
            .active_strip(store)
            .filter(|strip| strip.scene.as_ref() == Some(&change.scene));

        let (Some(strip), true) = (active, settings.bidirectional) else {
            self.record.detector.reset(&change.scene, change.frame);
            return SyncOutcome::Ignored {
                scene: change.scene.clone(),
            };
        };
        let Some(range) = store.frame_range(&change.scene) else {
            warn!(scene = %change.scene, "shot scene has no frame range");
            return SyncOutcome::Ignored {
                scene: change.scene.clone(),
            };
        };

        let mapping = StripMapping::new(&strip, range.start);
        let crossing = self
            .record
            .detector
            .observe(&change.scene, change.frame, mapping.local_range());

        let direction = match crossing {
            Crossing::Scrub => {
                debug!(scene = %change.scene, frame = change.frame, "out-of-range scrub, not propagated");
                return SyncOutcome::Scrubbed {
                    scene: change.scene.clone(),
                    frame: change.frame,
                };
            }
            Crossing::Inside => None,
            Crossing::Advance(direction) => {
                debug!(scene = %change.scene, direction = direction.as_str(), "boundary crossing");
                Some(direction)
            }
        };

        let master_frame = local_to_master(change.frame, &mapping);
        store.set_frame_current(&self.master, master_frame);
        self.sync_master(store, settings, master_frame, SyncOrigin::Shot, direction)
    }
}

/// Sync controller
///
/// Owns the settings and, while Active, the session state. All methods run to
/// completion synchronously; callers deliver one notification at a time.
#[derive(Debug)]
pub struct SyncController {
    settings: SyncSettings,
    session: Option<SyncSession>,
}

impl SyncController {
    pub fn new(settings: SyncSettings) -> Self {
        Self {
            settings,
            session: None,
        }
    }

    pub fn settings(&self) -> &SyncSettings {
        &self.settings
    }

    pub fn state(&self) -> SyncState {
        if self.session.is_some() {
            SyncState::Active
        } else {
            SyncState::Disabled
        }
    }

    pub fn session(&self) -> Option<&SyncSession> {
        self.session.as_ref()
    }

    pub fn active_strip(&self) -> Option<&StripId> {
        self.session.as_ref()?.record.active_strip.as_ref()
    }

    pub fn active_scene(&self) -> Option<&SceneId> {
        self.session.as_ref()?.record.active_scene.as_ref()
    }

    /// Flip `enabled`, optionally taking `master` as the new master scene
    /// when enabling, then reconcile.
    #[instrument(name = "sync_toggle", skip(self, store))]
    pub fn toggle<S: SceneStore>(
        &mut self,
        store: &mut S,
        master: Option<SceneId>,
    ) -> Result<SyncOutcome> {
        self.settings.enabled = !self.settings.enabled;
        if self.settings.enabled {
            if let Some(master) = master {
                self.settings.master_scene = Some(master);
            }
        }
        self.update(store)
    }

    /// Edit the settings, then reconcile.
    pub fn configure<S, F>(&mut self, store: &mut S, edit: F) -> Result<SyncOutcome>
    where
        S: SceneStore,
        F: FnOnce(&mut SyncSettings),
    {
        edit(&mut self.settings);
        self.update(store)
    }

    /// Reconcile the state machine with the settings and run one master pass
    /// at the master scene's current frame.
    #[instrument(name = "sync_update", skip(self, store))]
    pub fn update<S: SceneStore>(&mut self, store: &mut S) -> Result<SyncOutcome> {
        if self.reconcile(store) == Reconciled::Inactive {
            return Ok(SyncOutcome::Inactive);
        }
        Ok(self.resync(store).unwrap_or(SyncOutcome::Inactive))
    }

    /// Handle one frame-change notification.
    ///
    /// A shot notification that finds the controller freshly activated first
    /// settles the session on the master's current frame, then keeps the
    /// shot frame the user set.
    #[instrument(
        name = "sync_on_frame_change",
        skip(self, store),
        fields(scene = %change.scene, frame = change.frame)
    )]
    pub fn on_frame_change<S: SceneStore>(
        &mut self,
        store: &mut S,
        change: &FrameChange,
    ) -> Result<SyncOutcome> {
        let reconciled = self.reconcile(store);
        if reconciled == Reconciled::Inactive {
            return Ok(SyncOutcome::Inactive);
        }
        let from_master = self.session.as_ref().map(|s| &s.master) == Some(&change.scene);
        if reconciled == Reconciled::Activated && !from_master {
            self.resync(store);
            store.set_frame_current(&change.scene, change.frame);
        }

        let settings = &self.settings;
        let Some(session) = self.session.as_mut() else {
            return Ok(SyncOutcome::Inactive);
        };

        let outcome = if change.scene == session.master {
            session.sync_master(store, settings, change.frame, SyncOrigin::Master, None)
        } else {
            session.sync_shot(store, settings, change)
        };
        observability::record_sync_outcome(&outcome);
        Ok(outcome)
    }

    /// One master pass at the master scene's current frame.
    fn resync<S: SceneStore>(&mut self, store: &mut S) -> Option<SyncOutcome> {
        let settings = &self.settings;
        let session = self.session.as_mut()?;
        let frame = store.frame_current(&session.master)?;

        let outcome = session.sync_master(store, settings, frame, SyncOrigin::Master, None);
        observability::record_sync_outcome(&outcome);
        Some(outcome)
    }

    /// Build or tear down the session to match the settings.
    fn reconcile<S: SceneStore>(&mut self, store: &S) -> Reconciled {
        let master = self
            .settings
            .master_scene
            .as_ref()
            .filter(|_| self.settings.enabled)
            .filter(|master| store.scene_exists(master))
            .cloned();
        let current = self.session.as_ref().map(|session| session.master.clone());

        match (master, current) {
            (Some(master), Some(current)) if master == current => Reconciled::Running,
            (Some(master), _) => {
                info!(master = %master, "synchronization active");
                self.session = Some(SyncSession::new(master));
                observability::record_state_transition(SyncState::Active.as_str());
                Reconciled::Activated
            }
            (None, Some(_)) => {
                info!("synchronization disabled");
                self.session = None;
                observability::record_state_transition(SyncState::Disabled.as_str());
                Reconciled::Inactive
            }
            (None, None) => Reconciled::Inactive,
        }
    }
}

/// Result of matching the session to the settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reconciled {
    Inactive,
    /// A new, still empty session was built
    Activated,
    Running,
}
