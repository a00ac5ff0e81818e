//! Playback orchestrator - a clock task feeding the sync driver.
//!
//! The clock runs as its own task and only produces `FrameChange`s; the
//! driver stays on the calling task and consumes them one at a time.

use std::future::Future;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use contracts::{Frame, FrameChange, SceneId, SceneStore};
use sync_engine::SyncDriver;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use super::PlaybackStats;
use crate::error::CliError;

/// Playback configuration
#[derive(Debug, Clone)]
pub struct PlaybackConfig {
    /// Scene whose clock is driven
    pub scene: SceneId,

    /// First frame
    pub start: Frame,

    /// Last frame (inclusive)
    pub end: Frame,

    /// Ticks per second (None = as fast as possible)
    pub fps: Option<f64>,

    /// Restart from `start` after `end`
    pub loop_playback: bool,

    /// Maximum number of frames to play (None = unlimited)
    pub max_frames: Option<u64>,

    /// Channel buffer size
    pub buffer_size: usize,

    /// Print each outcome as it is produced
    pub trace_outcomes: bool,
}

/// Playback run
pub struct Playback {
    config: PlaybackConfig,
}

impl Playback {
    /// Create a new playback with the given configuration
    pub fn new(config: PlaybackConfig) -> Result<Self> {
        if config.end < config.start {
            return Err(CliError::EmptyRange {
                start: config.start,
                end: config.end,
            }
            .into());
        }
        if config.fps.is_some_and(|fps| !(fps > 0.0 && fps.is_finite())) {
            return Err(CliError::playback(format!("invalid fps: {:?}", config.fps)).into());
        }
        Ok(Self { config })
    }

    /// Run until the clock finishes or `shutdown` resolves
    pub async fn run<S, F>(self, driver: &mut SyncDriver<S>, shutdown: F) -> Result<PlaybackStats>
    where
        S: SceneStore,
        F: Future<Output = ()>,
    {
        let start_time = Instant::now();
        let (tx, mut rx) = mpsc::channel::<FrameChange>(self.config.buffer_size.max(1));
        let clock = spawn_clock(self.config.clone(), tx);

        info!(
            scene = %self.config.scene,
            start = self.config.start,
            end = self.config.end,
            fps = ?self.config.fps,
            "Playback started"
        );

        let mut stats = PlaybackStats::default();
        tokio::pin!(shutdown);

        let result = loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    warn!("Received shutdown signal, stopping playback...");
                    stats.interrupted = true;
                    break Ok(());
                }
                change = rx.recv() => {
                    let Some(change) = change else {
                        debug!("Clock finished");
                        break Ok(());
                    };

                    match driver.notify(&change) {
                        Ok(outcome) => {
                            stats.frames_played += 1;
                            stats.sync_metrics.update(&outcome);
                            if self.config.trace_outcomes {
                                println!("{:>6}  {}", change.frame, outcome);
                            }
                        }
                        Err(e) => break Err(e),
                    }
                }
            }
        };

        clock.abort();
        stats.duration = start_time.elapsed();

        result.with_context(|| {
            format!(
                "Sync failed after {} frames of {}",
                stats.frames_played, self.config.scene
            )
        })?;

        info!(
            frames = stats.frames_played,
            duration_secs = stats.duration.as_secs_f64(),
            interrupted = stats.interrupted,
            "Playback finished"
        );
        Ok(stats)
    }
}

/// Spawn the clock task
///
/// Ends when the range is exhausted (without looping), the frame limit is
/// reached, or the receiver is dropped.
fn spawn_clock(config: PlaybackConfig, tx: mpsc::Sender<FrameChange>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = config.fps.map(|fps| {
            let mut interval = tokio::time::interval(Duration::from_secs_f64(1.0 / fps));
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval
        });
        let mut sent = 0u64;

        loop {
            for frame in config.start..=config.end {
                if config.max_frames.is_some_and(|max| sent >= max) {
                    return;
                }
                match ticker.as_mut() {
                    Some(interval) => {
                        interval.tick().await;
                    }
                    None => tokio::task::yield_now().await,
                }
                if tx.send(FrameChange::new(config.scene.clone(), frame)).await.is_err() {
                    return;
                }
                sent += 1;
            }

            if !config.loop_playback {
                return;
            }
        }
    })
}
