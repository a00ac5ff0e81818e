//! Project loading shared by the commands.

use anyhow::{Context, Result};
use config_loader::ConfigLoader;
use contracts::{Frame, ProjectBlueprint, SceneId, SceneStore, SyncSettings};
use scene_store::{MemoryStore, SceneFactory};
use std::path::Path;
use sync_engine::SyncDriver;
use tracing::info;

use crate::cli::SyncOverrides;
use crate::error::CliError;

/// Load and validate a project file
pub fn load(path: &Path) -> Result<ProjectBlueprint> {
    if !path.exists() {
        return Err(CliError::project_not_found(path.display().to_string()).into());
    }

    let blueprint = ConfigLoader::load_from_path(path)
        .with_context(|| format!("Failed to load project from {}", path.display()))?;

    info!(
        scenes = blueprint.scenes.len(),
        strips = blueprint.timeline.strips.len(),
        master = ?blueprint.master_scene(),
        "Project loaded"
    );
    Ok(blueprint)
}

/// Apply command-line overrides to the project's sync settings
pub fn apply_overrides(settings: &mut SyncSettings, overrides: &SyncOverrides) {
    if overrides.enable {
        settings.enabled = true;
    }
    if let Some(master) = &overrides.master {
        settings.master_scene = Some(master.as_str().into());
    }
    if overrides.no_bidirectional {
        settings.bidirectional = false;
    }
    if overrides.active_follows_playhead {
        settings.active_follows_playhead = true;
    }
    if overrides.keep_tool_settings {
        settings.keep_gpencil_tool_settings = true;
    }
}

/// Build the scene store and wrap it in a driver with the effective settings
pub fn build_driver(
    blueprint: &ProjectBlueprint,
    overrides: &SyncOverrides,
) -> Result<SyncDriver<MemoryStore>> {
    let store = SceneFactory::new()
        .build(blueprint)
        .context("Failed to build scenes from project")?;

    let mut settings = blueprint.sync.clone();
    apply_overrides(&mut settings, overrides);

    if !settings.enabled {
        tracing::warn!("Synchronization is disabled; pass --enable to force it on");
    }

    Ok(SyncDriver::new(store, settings))
}

/// Scene named on the command line, or the master scene
pub fn target_scene<S: SceneStore>(
    driver: &SyncDriver<S>,
    scene: Option<&str>,
) -> Result<SceneId> {
    let scene = match scene {
        Some(name) => SceneId::from(name),
        None => driver
            .settings()
            .master_scene
            .clone()
            .ok_or(CliError::NoMasterScene)?,
    };

    if !driver.store().scene_exists(&scene) {
        return Err(CliError::scene_not_found(scene.as_str()).into());
    }
    Ok(scene)
}

/// Default inclusive frame range for playing `scene`
///
/// The master plays across its strips; any other scene plays its own range.
pub fn default_range<S: SceneStore>(driver: &SyncDriver<S>, scene: &SceneId) -> Option<(Frame, Frame)> {
    let is_master = driver.settings().master_scene.as_ref() == Some(scene);
    let strips = driver
        .store()
        .timeline(scene)
        .filter(|_| is_master)
        .and_then(|timeline| timeline.bounds());

    match strips {
        Some((start, end)) => Some((start, end - 1)),
        None => driver
            .store()
            .frame_range(scene)
            .map(|range| (range.start, range.end)),
    }
}
