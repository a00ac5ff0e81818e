//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Shot Sync - keep an edit timeline and its shot scenes on one clock
#[derive(Parser, Debug)]
#[command(
    name = "shot-sync",
    author,
    version,
    about = "Editorial timeline shot synchronization",
    long_about = "Keeps the clock of an edit timeline and the clocks of the shot scenes \n\
                  its strips reference consistent.\n\n\
                  Loads a project blueprint, builds an in-memory scene store from it, \n\
                  and drives playback or scrubbing through the sync controller."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "SHOT_SYNC_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "compact",
        global = true,
        env = "SHOT_SYNC_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Play the master (or a shot) clock frame by frame
    Play(PlayArgs),

    /// Apply an explicit list of frame changes to one scene
    Scrub(ScrubArgs),

    /// Validate a project file without running
    Validate(ValidateArgs),

    /// Display the project and its shot map
    Info(InfoArgs),
}

/// Sync settings overrides shared by `play` and `scrub`
#[derive(Parser, Debug, Clone, Default)]
pub struct SyncOverrides {
    /// Force synchronization on regardless of the project setting
    #[arg(long)]
    pub enable: bool,

    /// Override the master scene
    #[arg(long, env = "SHOT_SYNC_MASTER")]
    pub master: Option<String>,

    /// Do not propagate shot clock changes back to the master
    #[arg(long)]
    pub no_bidirectional: bool,

    /// Mark the strip under the playhead as the active strip
    #[arg(long)]
    pub active_follows_playhead: bool,

    /// Carry brush, interaction mode and material across shot switches
    #[arg(long)]
    pub keep_tool_settings: bool,
}

/// Arguments for the `play` command
#[derive(Parser, Debug, Clone)]
pub struct PlayArgs {
    /// Path to project file (TOML or JSON)
    #[arg(
        short,
        long,
        default_value = "project.toml",
        env = "SHOT_SYNC_PROJECT"
    )]
    pub config: PathBuf,

    /// Scene whose clock is played (defaults to the master scene)
    #[arg(long)]
    pub scene: Option<String>,

    /// First frame (defaults to the start of the timeline or scene)
    #[arg(long)]
    pub start: Option<i64>,

    /// Last frame, inclusive (defaults to the end of the timeline or scene)
    #[arg(long)]
    pub end: Option<i64>,

    /// Playback rate in frames per second (0 = as fast as possible)
    #[arg(long, default_value = "24", env = "SHOT_SYNC_FPS")]
    pub fps: f64,

    /// Loop back to the first frame when the last one is reached
    #[arg(long = "loop")]
    pub loop_playback: bool,

    /// Stop after this many frames (0 = unlimited)
    #[arg(long, default_value = "0", env = "SHOT_SYNC_MAX_FRAMES")]
    pub max_frames: u64,

    /// Print every sync outcome
    #[arg(long)]
    pub trace_outcomes: bool,

    /// Channel buffer size between the clock and the controller
    #[arg(long, default_value = "64", env = "SHOT_SYNC_BUFFER_SIZE")]
    pub buffer_size: usize,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "SHOT_SYNC_METRICS_PORT")]
    pub metrics_port: u16,

    #[command(flatten)]
    pub sync: SyncOverrides,
}

/// Arguments for the `scrub` command
#[derive(Parser, Debug, Clone)]
pub struct ScrubArgs {
    /// Path to project file (TOML or JSON)
    #[arg(
        short,
        long,
        default_value = "project.toml",
        env = "SHOT_SYNC_PROJECT"
    )]
    pub config: PathBuf,

    /// Scene whose clock is changed (defaults to the master scene)
    #[arg(long)]
    pub scene: Option<String>,

    /// Frames to apply in order
    #[arg(required = true, num_args = 1.., allow_negative_numbers = true)]
    pub frames: Vec<i64>,

    /// Output outcomes as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub sync: SyncOverrides,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to project file to validate
    #[arg(short, long, default_value = "project.toml", env = "SHOT_SYNC_PROJECT")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to project file
    #[arg(short, long, default_value = "project.toml", env = "SHOT_SYNC_PROJECT")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Show scene objects and paint settings
    #[arg(long)]
    pub objects: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    Pretty,
    /// Compact single-line format
    #[default]
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}
