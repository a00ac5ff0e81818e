//! Playback clock module.

mod orchestrator;
mod stats;

pub use orchestrator::{Playback, PlaybackConfig};
pub use stats::PlaybackStats;
