//! `play` command implementation.

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::PlayArgs;
use crate::error::CliError;
use crate::playback::{Playback, PlaybackConfig};
use crate::project;

/// Execute the `play` command
pub async fn run_play(args: &PlayArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading project");

    let blueprint = project::load(&args.config)?;
    let mut driver = project::build_driver(&blueprint, &args.sync)?;
    let scene = project::target_scene(&driver, args.scene.as_deref())?;

    let default = project::default_range(&driver, &scene);
    let start = args.start.or(default.map(|(start, _)| start));
    let end = args.end.or(default.map(|(_, end)| end));
    let (Some(start), Some(end)) = (start, end) else {
        return Err(CliError::playback(format!("no frame range for scene {scene}")).into());
    };

    // Initialize Metrics (optional)
    if args.metrics_port != 0 {
        observability::init_metrics_only(args.metrics_port)?;
        info!("Metrics endpoint available on port {}", args.metrics_port);
    }

    let outcome = driver.update().context("Initial sync failed")?;
    info!(%outcome, "Initial sync");

    let playback = Playback::new(PlaybackConfig {
        scene,
        start,
        end,
        fps: (args.fps > 0.0).then_some(args.fps),
        loop_playback: args.loop_playback,
        max_frames: (args.max_frames > 0).then_some(args.max_frames),
        buffer_size: args.buffer_size,
        trace_outcomes: args.trace_outcomes,
    })?;

    let stats = playback.run(&mut driver, shutdown_signal()).await?;

    info!(
        frames = stats.frames_played,
        switches = stats.sync_metrics.switches,
        fps = format!("{:.2}", stats.fps()),
        "Playback completed"
    );
    stats.print_summary();

    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
///
/// A handler that fails to install never resolves.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
