//! # Shot Sync CLI
//!
//! 命令行接口入口点。
//!
//! 提供：
//! - 项目文件加载与验证
//! - 镜头映射查看
//! - 播放 / 拖动时钟并驱动同步控制器
//! - 优雅关闭处理

mod cli;
mod commands;
mod error;
mod playback;
mod project;

use anyhow::Result;
use clap::Parser;
use observability::ObservabilityConfig;
use tracing::info;

use cli::{Cli, Commands};
use commands::{run_info, run_play, run_scrub, run_validate};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize logging based on CLI options
    init_logging(&cli)?;

    info!(version = env!("CARGO_PKG_VERSION"), "Shot Sync CLI starting");

    // Execute command
    let result = match &cli.command {
        Commands::Play(args) => run_play(args).await,
        Commands::Scrub(args) => run_scrub(args),
        Commands::Validate(args) => run_validate(args),
        Commands::Info(args) => run_info(args),
    };

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Command failed");
    }

    result
}

/// Initialize logging based on CLI options
///
/// Metrics are installed later by `play`, which is the only long-running command.
fn init_logging(cli: &Cli) -> Result<()> {
    let mut config = ObservabilityConfig {
        log_format: cli.log_format.into(),
        ..Default::default()
    }
    .with_verbosity(cli.verbose);

    if cli.quiet {
        config.default_log_level = "warn".to_string();
    }

    observability::init_with_config(config)
}
