//! Shot sync 指标收集模块
//!
//! 基于 SyncOutcome 收集和统计同步控制器的运行指标。

use std::collections::BTreeMap;

use contracts::{CrossingDirection, SyncOrigin, SyncOutcome};
use metrics::counter;

/// 从 SyncOutcome 记录指标
///
/// 控制器每处理完一次帧变化通知调用一次。
///
/// # Example
///
/// ```ignore
/// use observability::metrics::record_sync_outcome;
///
/// let outcome = controller.on_frame_change(&mut store, &change)?;
/// record_sync_outcome(&outcome);
/// ```
pub fn record_sync_outcome(outcome: &SyncOutcome) {
    let origin = match outcome {
        SyncOutcome::Synced { origin, .. } => origin.as_str(),
        SyncOutcome::Scrubbed { .. } | SyncOutcome::Ignored { .. } => SyncOrigin::Shot.as_str(),
        SyncOutcome::Inactive => "none",
    };
    counter!("shot_sync_events_total", "origin" => origin).increment(1);

    match outcome {
        SyncOutcome::Synced {
            switched, crossing, ..
        } => {
            if *switched {
                counter!("shot_sync_shot_switches_total").increment(1);
            }
            if let Some(direction) = crossing {
                counter!(
                    "shot_sync_boundary_crossings_total",
                    "direction" => direction.as_str()
                )
                .increment(1);
            }
        }
        SyncOutcome::Scrubbed { .. } => {
            counter!("shot_sync_scrubs_total").increment(1);
        }
        SyncOutcome::Ignored { .. } | SyncOutcome::Inactive => {}
    }
}

/// 记录 Disabled/Active 状态切换
pub fn record_state_transition(state: &'static str) {
    counter!("shot_sync_state_transitions_total", "state" => state).increment(1);
}

/// 同步指标聚合器
///
/// 在内存中聚合指标，便于统计和输出摘要。
#[derive(Debug, Clone, Default)]
pub struct SyncMetricsAggregator {
    /// 通知总数
    pub total_events: u64,

    /// 主场景发起的同步
    pub master_events: u64,

    /// 镜头场景发起并传播到主场景的同步
    pub shot_events: u64,

    /// 活动镜头切换次数
    pub switches: u64,

    /// 向前跨越边界次数
    pub forward_crossings: u64,

    /// 向后跨越边界次数
    pub backward_crossings: u64,

    /// 未传播的拖动
    pub scrubs: u64,

    /// 被忽略的通知
    pub ignored: u64,

    /// 同步未启用时收到的通知
    pub inactive: u64,

    /// 落在空隙中的主帧
    pub gap_frames: u64,

    /// 各条带的主帧数
    pub frames_per_strip: BTreeMap<String, u64>,

    /// 镜头停留长度统计（以通知计）
    pub dwell_stats: RunningStats,

    /// 当前镜头已停留的通知数
    current_dwell: u64,
}

impl SyncMetricsAggregator {
    /// 创建新的聚合器
    pub fn new() -> Self {
        Self::default()
    }

    /// 更新聚合统计
    pub fn update(&mut self, outcome: &SyncOutcome) {
        self.total_events += 1;

        match outcome {
            SyncOutcome::Inactive => self.inactive += 1,
            SyncOutcome::Ignored { .. } => self.ignored += 1,
            SyncOutcome::Scrubbed { .. } => self.scrubs += 1,
            SyncOutcome::Synced {
                origin,
                active_strip,
                switched,
                crossing,
                ..
            } => {
                match origin {
                    SyncOrigin::Master => self.master_events += 1,
                    SyncOrigin::Shot => self.shot_events += 1,
                }

                if *switched {
                    self.switches += 1;
                    self.close_dwell();
                }

                match crossing {
                    Some(CrossingDirection::Forward) => self.forward_crossings += 1,
                    Some(CrossingDirection::Backward) => self.backward_crossings += 1,
                    None => {}
                }

                match active_strip {
                    Some(strip) => {
                        *self.frames_per_strip.entry(strip.to_string()).or_insert(0) += 1;
                        self.current_dwell += 1;
                    }
                    None => self.gap_frames += 1,
                }
            }
        }
    }

    fn close_dwell(&mut self) {
        if self.current_dwell > 0 {
            self.dwell_stats.push(self.current_dwell as f64);
            self.current_dwell = 0;
        }
    }

    /// 生成摘要报告
    pub fn summary(&self) -> MetricsSummary {
        // 未结束的停留也计入
        let mut dwell = self.dwell_stats.clone();
        if self.current_dwell > 0 {
            dwell.push(self.current_dwell as f64);
        }

        let synced = self.master_events + self.shot_events;
        MetricsSummary {
            total_events: self.total_events,
            master_events: self.master_events,
            shot_events: self.shot_events,
            switches: self.switches,
            forward_crossings: self.forward_crossings,
            backward_crossings: self.backward_crossings,
            scrubs: self.scrubs,
            ignored: self.ignored,
            inactive: self.inactive,
            gap_frames: self.gap_frames,
            switch_rate: if synced > 0 {
                self.switches as f64 / synced as f64 * 100.0
            } else {
                0.0
            },
            dwell: StatsSummary::from(&dwell),
            frames_per_strip: self.frames_per_strip.clone(),
        }
    }

    /// 重置统计
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// 指标摘要
#[derive(Debug, Clone, Default)]
pub struct MetricsSummary {
    pub total_events: u64,
    pub master_events: u64,
    pub shot_events: u64,
    pub switches: u64,
    pub forward_crossings: u64,
    pub backward_crossings: u64,
    pub scrubs: u64,
    pub ignored: u64,
    pub inactive: u64,
    pub gap_frames: u64,
    pub switch_rate: f64,
    pub dwell: StatsSummary,
    pub frames_per_strip: BTreeMap<String, u64>,
}

impl std::fmt::Display for MetricsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Shot Sync Summary ===")?;
        writeln!(f, "Total events: {}", self.total_events)?;
        writeln!(
            f,
            "Synced: {} from master, {} from shots",
            self.master_events, self.shot_events
        )?;
        writeln!(
            f,
            "Shot switches: {} ({:.2}%)",
            self.switches, self.switch_rate
        )?;
        writeln!(
            f,
            "Boundary crossings: {} forward, {} backward",
            self.forward_crossings, self.backward_crossings
        )?;
        writeln!(f, "Scrubs (not propagated): {}", self.scrubs)?;
        if self.ignored > 0 || self.inactive > 0 {
            writeln!(f, "Ignored: {}, inactive: {}", self.ignored, self.inactive)?;
        }
        writeln!(f, "Gap frames: {}", self.gap_frames)?;
        writeln!(f, "Shot dwell (events): {}", self.dwell)?;

        if !self.frames_per_strip.is_empty() {
            writeln!(f, "Frames per strip:")?;
            for (strip, count) in &self.frames_per_strip {
                writeln!(f, "  {}: {}", strip, count)?;
            }
        }

        Ok(())
    }
}

/// 统计摘要
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// 在线统计计算器 (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// 添加新值
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    /// 样本数量
    pub fn count(&self) -> u64 {
        self.count
    }

    /// 均值
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// 方差
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    /// 标准差
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// 最小值
    pub fn min(&self) -> f64 {
        self.min
    }

    /// 最大值
    pub fn max(&self) -> f64 {
        self.max
    }
}
