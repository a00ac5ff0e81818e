//! `info` command implementation.

use anyhow::{Context, Result};
use contracts::{ProjectBlueprint, SceneId, SceneStore};
use scene_store::{MemoryStore, SceneFactory};
use serde::Serialize;
use sync_engine::{shot_map, ShotSegment};
use tracing::info;

use crate::cli::InfoArgs;

/// Project info for JSON output
#[derive(Serialize)]
struct ProjectInfo {
    version: String,
    sync_settings: contracts::SyncSettings,
    scenes: Vec<SceneInfo>,
    strips: Vec<StripInfo>,
    shot_map: Vec<SegmentInfo>,
}

#[derive(Serialize)]
struct SceneInfo {
    name: String,
    frame_start: i64,
    frame_end: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    camera: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    brush: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    objects: Vec<ObjectInfo>,
}

#[derive(Serialize)]
struct ObjectInfo {
    name: String,
    kind: String,
    mode: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    active_material: Option<String>,
    active: bool,
}

#[derive(Serialize)]
struct StripInfo {
    name: String,
    scene: Option<String>,
    channel: u32,
    frame_final_start: i64,
    frame_final_end: i64,
    mute: bool,
    channel_mute: bool,
}

#[derive(Serialize)]
struct SegmentInfo {
    strip: String,
    scene: String,
    channel: u32,
    start: i64,
    end: i64,
}

impl From<&ShotSegment> for SegmentInfo {
    fn from(segment: &ShotSegment) -> Self {
        Self {
            strip: segment.strip.to_string(),
            scene: segment.scene.to_string(),
            channel: segment.channel,
            start: segment.master_range.start,
            end: segment.master_range.end,
        }
    }
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading project info");

    if !args.config.exists() {
        anyhow::bail!("Project file not found: {}", args.config.display());
    }

    let blueprint = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load project from {}", args.config.display()))?;
    let store = SceneFactory::new()
        .build(&blueprint)
        .context("Failed to build scenes from project")?;

    let info = build_project_info(&blueprint, &store, args.objects);
    if args.json {
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize project info")?;
        println!("{}", json);
    } else {
        print_project_info(&info, args.objects);
    }

    Ok(())
}

fn build_project_info(blueprint: &ProjectBlueprint, store: &MemoryStore, objects: bool) -> ProjectInfo {
    let scenes = store
        .scene_ids()
        .filter_map(|id| store.scene(id).map(|data| (id, data)))
        .map(|(id, data)| SceneInfo {
            name: id.to_string(),
            frame_start: data.frame_range.start,
            frame_end: data.frame_range.end,
            camera: data.camera.as_ref().map(|c| c.to_string()),
            brush: data
                .paint
                .as_ref()
                .and_then(|p| p.brush.as_ref())
                .map(|b| b.to_string()),
            objects: if objects {
                data.objects()
                    .iter()
                    .map(|o| ObjectInfo {
                        name: o.id.to_string(),
                        kind: format!("{:?}", o.kind),
                        mode: o.mode.to_string(),
                        active_material: o.active_material().map(|m| m.to_string()),
                        active: data.active_object().is_some_and(|a| a.id == o.id),
                    })
                    .collect()
            } else {
                Vec::new()
            },
        })
        .collect();

    let (strips, segments) = match master_timeline(blueprint, store) {
        Some(timeline) => {
            let strips = timeline
                .channels()
                .iter()
                .flat_map(|channel| {
                    channel.strips().iter().map(move |s| StripInfo {
                        name: s.id.to_string(),
                        scene: s.scene.as_ref().map(|sc| sc.to_string()),
                        channel: s.channel,
                        frame_final_start: s.frame_final_start,
                        frame_final_end: s.frame_final_end,
                        mute: s.mute,
                        channel_mute: channel.mute,
                    })
                })
                .collect();
            let segments = timeline
                .bounds()
                .map(|(start, end)| shot_map(timeline, start..end, |scene| store.scene_exists(scene)))
                .unwrap_or_default()
                .iter()
                .map(SegmentInfo::from)
                .collect();
            (strips, segments)
        }
        None => (Vec::new(), Vec::new()),
    };

    ProjectInfo {
        version: format!("{:?}", blueprint.version),
        sync_settings: blueprint.sync.clone(),
        scenes,
        strips,
        shot_map: segments,
    }
}

fn master_timeline<'a>(
    blueprint: &ProjectBlueprint,
    store: &'a MemoryStore,
) -> Option<&'a contracts::Timeline> {
    let master: &SceneId = blueprint.master_scene()?;
    store.timeline(master)
}

fn branch(i: usize, len: usize) -> &'static str {
    if i + 1 == len {
        "└─"
    } else {
        "├─"
    }
}

fn print_project_info(info: &ProjectInfo, objects: bool) {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                  Shot Sync Project                           ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    // Sync Settings
    let sync = &info.sync_settings;
    println!("⚙️  Sync Settings");
    println!("   ├─ Version: {}", info.version);
    println!("   ├─ Enabled: {}", sync.enabled);
    println!(
        "   ├─ Master scene: {}",
        sync.master_scene.as_deref().unwrap_or("(none)")
    );
    println!("   ├─ Bidirectional: {}", sync.bidirectional);
    println!("   ├─ Active follows playhead: {}", sync.active_follows_playhead);
    println!("   └─ Keep tool settings: {}", sync.keep_gpencil_tool_settings);

    // Scenes
    println!("\n🎞  Scenes ({})", info.scenes.len());
    for (i, scene) in info.scenes.iter().enumerate() {
        let child_prefix = if i + 1 == info.scenes.len() { "   " } else { "│  " };
        println!(
            "   {} {} [{}..={}] camera: {}, brush: {}",
            branch(i, info.scenes.len()),
            scene.name,
            scene.frame_start,
            scene.frame_end,
            scene.camera.as_deref().unwrap_or("-"),
            scene.brush.as_deref().unwrap_or("-"),
        );

        if objects {
            for (j, object) in scene.objects.iter().enumerate() {
                println!(
                    "   {}  {} {} ({}, {}){}{}",
                    child_prefix,
                    branch(j, scene.objects.len()),
                    object.name,
                    object.kind,
                    object.mode,
                    object
                        .active_material
                        .as_deref()
                        .map(|m| format!(" material: {m}"))
                        .unwrap_or_default(),
                    if object.active { " *active*" } else { "" },
                );
            }
        }
    }

    // Strips
    println!("\n🎬 Strips ({})", info.strips.len());
    for (i, strip) in info.strips.iter().enumerate() {
        let mute = match (strip.channel_mute, strip.mute) {
            (true, _) => " [channel muted]",
            (false, true) => " [muted]",
            _ => "",
        };
        println!(
            "   {} ch{} {} -> {} [{}, {}){}",
            branch(i, info.strips.len()),
            strip.channel,
            strip.name,
            strip.scene.as_deref().unwrap_or("<unset>"),
            strip.frame_final_start,
            strip.frame_final_end,
            mute,
        );
    }

    // Shot Map
    println!("\n🗺  Shot Map ({} segments)", info.shot_map.len());
    for (i, segment) in info.shot_map.iter().enumerate() {
        println!(
            "   {} [{}, {}) {} (ch{}, {})",
            branch(i, info.shot_map.len()),
            segment.start,
            segment.end,
            segment.strip,
            segment.channel,
            segment.scene,
        );
    }

    println!();
}
