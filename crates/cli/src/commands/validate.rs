//! `validate` command implementation.

use std::collections::HashSet;

use anyhow::{Context, Result};
use contracts::{ProjectBlueprint, SceneStore};
use scene_store::SceneFactory;
use serde::Serialize;
use sync_engine::shot_map;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ProjectSummary>,
}

#[derive(Serialize)]
struct ProjectSummary {
    version: String,
    master_scene: Option<String>,
    sync_enabled: bool,
    scene_count: usize,
    strip_count: usize,
    channel_count: usize,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating project");

    let result = validate_project(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Project validation failed")
    }
}

fn validate_project(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    // Check file exists
    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    // Load, validate, then make sure the scene store can actually be built
    let checked = config_loader::ConfigLoader::load_from_path(&args.config)
        .map_err(|e| e.to_string())
        .and_then(|blueprint| match collect_warnings(&blueprint) {
            Ok(warnings) => Ok((blueprint, warnings)),
            Err(e) => Err(e.to_string()),
        });

    match checked {
        Ok((blueprint, warnings)) => {
            let channels: HashSet<u32> =
                blueprint.timeline.strips.iter().map(|s| s.channel).collect();

            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ProjectSummary {
                    version: format!("{:?}", blueprint.version),
                    master_scene: blueprint.master_scene().map(|s| s.to_string()),
                    sync_enabled: blueprint.sync.enabled,
                    scene_count: blueprint.scenes.len(),
                    strip_count: blueprint.timeline.strips.len(),
                    channel_count: channels.len(),
                }),
            }
        }
        Err(error) => ValidationResult {
            valid: false,
            config_path,
            error: Some(error),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect project warnings (non-fatal issues)
fn collect_warnings(blueprint: &ProjectBlueprint) -> Result<Vec<String>> {
    let mut warnings = Vec::new();

    if !blueprint.sync.enabled {
        warnings.push("sync.enabled is false - clocks will not be synchronized".to_string());
    }

    let Some(master) = blueprint.master_scene() else {
        warnings.push("No master scene configured - nothing to synchronize".to_string());
        return Ok(warnings);
    };

    let store = SceneFactory::new().build(blueprint)?;
    let Some(timeline) = store.timeline(master).filter(|t| !t.is_empty()) else {
        warnings.push(format!("Master scene '{master}' has an empty timeline"));
        return Ok(warnings);
    };

    // Strips that never win resolution anywhere in their own interval
    let visible: HashSet<_> = timeline
        .bounds()
        .map(|(start, end)| shot_map(timeline, start..end, |scene| store.scene_exists(scene)))
        .unwrap_or_default()
        .into_iter()
        .map(|segment| segment.strip)
        .collect();

    for channel in timeline.channels().iter().filter(|c| !c.mute) {
        for strip in channel.strips().iter().filter(|s| !s.mute) {
            if !visible.contains(&strip.id) {
                warnings.push(format!(
                    "Strip '{}' on channel {} is fully covered by higher channels",
                    strip.id, strip.channel
                ));
            }
        }
    }

    Ok(warnings)
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Project is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!(
                "  Master scene: {}",
                summary.master_scene.as_deref().unwrap_or("(none)")
            );
            println!("  Sync enabled: {}", summary.sync_enabled);
            println!("  Scenes: {}", summary.scene_count);
            println!("  Strips: {}", summary.strip_count);
            println!("  Channels: {}", summary.channel_count);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Project is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
