//! `scrub` command implementation.

use anyhow::{Context, Result};
use contracts::{Frame, SyncOutcome};
use serde::Serialize;
use tracing::info;

use crate::cli::ScrubArgs;
use crate::project;

#[derive(Serialize)]
struct ScrubStep {
    frame: Frame,
    outcome: SyncOutcome,
}

/// Execute the `scrub` command
pub fn run_scrub(args: &ScrubArgs) -> Result<()> {
    info!(config = %args.config.display(), frames = args.frames.len(), "Loading project");

    let blueprint = project::load(&args.config)?;
    let mut driver = project::build_driver(&blueprint, &args.sync)?;
    let scene = project::target_scene(&driver, args.scene.as_deref())?;

    driver.update().context("Initial sync failed")?;

    let mut steps = Vec::with_capacity(args.frames.len());
    for &frame in &args.frames {
        let outcome = driver
            .frame_set(scene.clone(), frame)
            .with_context(|| format!("Sync failed at {scene}@{frame}"))?;
        steps.push(ScrubStep { frame, outcome });
    }

    if args.json {
        let json = serde_json::to_string_pretty(&steps).context("Failed to serialize outcomes")?;
        println!("{}", json);
    } else {
        println!("Scrubbing {}:", scene);
        for step in &steps {
            println!("  {:>6}  {}", step.frame, step.outcome);
        }
    }

    Ok(())
}
