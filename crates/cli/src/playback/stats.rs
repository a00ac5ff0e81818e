//! Playback statistics.

use std::time::Duration;

use observability::SyncMetricsAggregator;

/// Statistics from a playback run
#[derive(Debug, Clone, Default)]
pub struct PlaybackStats {
    /// Frame changes delivered to the controller
    pub frames_played: u64,

    /// Playback stopped by Ctrl+C / SIGTERM
    pub interrupted: bool,

    /// Wall-clock duration of the run
    pub duration: Duration,

    /// Sync outcome aggregation
    pub sync_metrics: SyncMetricsAggregator,
}

impl PlaybackStats {
    /// Effective playback rate
    pub fn fps(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.frames_played as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                    Playback Statistics                       ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");

        println!("📊 Overview");
        println!("   ├─ Duration: {:.2}s", self.duration.as_secs_f64());
        println!("   ├─ Frames played: {}", self.frames_played);
        println!("   ├─ FPS: {:.2}", self.fps());
        println!("   └─ Interrupted: {}", if self.interrupted { "yes" } else { "no" });

        let summary = self.sync_metrics.summary();

        println!("\n📈 Sync");
        println!("   ├─ Shot switches: {}", summary.switches);
        println!(
            "   ├─ Boundary crossings: {} forward / {} backward",
            summary.forward_crossings, summary.backward_crossings
        );
        println!("   ├─ Scrubs: {}", summary.scrubs);
        println!("   ├─ Gap frames: {}", summary.gap_frames);
        println!(
            "   └─ Shot dwell (frames): mean {:.1}, min {:.0}, max {:.0}",
            summary.dwell.mean, summary.dwell.min, summary.dwell.max
        );

        if !summary.frames_per_strip.is_empty() {
            println!("\n🎬 Frames per Shot");
            let last = summary.frames_per_strip.len() - 1;
            for (i, (strip, count)) in summary.frames_per_strip.iter().enumerate() {
                let prefix = if i == last { "└─" } else { "├─" };
                println!("   {} {}: {}", prefix, strip, count);
            }
        }

        println!();
    }
}
