//! # Observability
//!
//! 可观测性模块：Tracing + Prometheus 指标。
//!
//! ## 功能
//!
//! - Tracing 初始化 (JSON/Pretty/Compact 格式)
//! - Prometheus 指标导出
//! - SyncOutcome 指标收集与统计
//!
//! ## 使用示例
//!
//! ```ignore
//! use observability::{init, SyncMetricsAggregator};
//!
//! // 初始化
//! observability::init()?;
//!
//! // 汇总同步结果（计数器由控制器自行记录）
//! let mut aggregator = SyncMetricsAggregator::new();
//! let outcome = driver.frame_set("EDIT", 251)?;
//! aggregator.update(&outcome);
//! println!("{}", aggregator.summary());
//! ```

pub mod metrics;

use anyhow::{Context, Result};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// Re-exports
pub use crate::metrics::{
    record_state_transition, record_sync_outcome, MetricsSummary, RunningStats, StatsSummary,
    SyncMetricsAggregator,
};

/// 初始化可观测性（Tracing，默认不导出指标）
///
/// - Tracing: 紧凑格式，支持 RUST_LOG 环境变量
pub fn init() -> Result<()> {
    init_with_config(ObservabilityConfig::default())
}

/// 可观测性配置
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// 日志格式
    pub log_format: LogFormat,
    /// Prometheus 端口 (None = 禁用)
    pub metrics_port: Option<u16>,
    /// 默认日志级别（RUST_LOG 未设置时使用）
    pub default_log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Compact,
            metrics_port: None,
            default_log_level: "info".to_string(),
        }
    }
}

impl ObservabilityConfig {
    /// 按 `-v` 次数选择默认日志级别
    pub fn with_verbosity(mut self, verbose: u8) -> Self {
        self.default_log_level = match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
        .to_string();
        self
    }
}

/// 日志格式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// JSON 结构化日志
    Json,
    /// 人类可读格式
    Pretty,
    /// 紧凑单行格式
    #[default]
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            other => anyhow::bail!("unknown log format '{other}' (expected json, pretty or compact)"),
        }
    }
}

/// 使用自定义配置初始化
pub fn init_with_config(config: ObservabilityConfig) -> Result<()> {
    // 1. Initialize Tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_log_level));

    let registry = tracing_subscriber::registry().with(filter);
    match config.log_format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().pretty().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Compact => registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .try_init(),
    }
    .context("Failed to initialize tracing subscriber")?;

    // 2. Initialize Prometheus Exporter (if enabled)
    if let Some(port) = config.metrics_port {
        install_prometheus(port)?;
    }

    tracing::debug!(
        log_format = ?config.log_format,
        metrics_port = ?config.metrics_port,
        "Observability initialized"
    );

    Ok(())
}

/// 仅初始化 Prometheus 指标（不初始化 Tracing）
///
/// 用于 Tracing 已由其他模块初始化的场景。
pub fn init_metrics_only(port: u16) -> Result<()> {
    install_prometheus(port)
}

fn install_prometheus(port: u16) -> Result<()> {
    PrometheusBuilder::new()
        .with_http_listener(([0, 0, 0, 0], port))
        .install()
        .context("Failed to install Prometheus recorder")?;

    tracing::info!(port = port, "Prometheus metrics endpoint initialized");
    Ok(())
}
