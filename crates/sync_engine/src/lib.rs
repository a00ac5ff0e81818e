//! # Sync Engine
//!
//! 剪辑时间线与镜头场景之间的帧同步核心。
//!
//! 负责：
//! - 主时间线帧与镜头本地帧的互相换算（`mapper`）
//! - 多通道重叠条带中的活动镜头选择（`resolver`）
//! - 镜头边界的单步跨越与任意拖动的区分（`detector`）
//! - 镜头切换时的工具状态延续（`carryover`）
//! - 事件驱动的同步状态机（`controller`）与同步通知分发（`driver`）
//!
//! ## 使用示例
//!
//! ```ignore
//! use scene_store::MemoryStore;
//! use sync_engine::SyncDriver;
//!
//! let mut driver = SyncDriver::new(store, blueprint.sync.clone());
//! driver.update()?;
//!
//! // 用户在主场景上改变当前帧
//! let outcome = driver.frame_set("EDIT", 251)?;
//! if outcome.is_switch() {
//!     println!("{outcome}");
//! }
//! ```

pub mod carryover;
pub mod controller;
pub mod detector;
pub mod driver;
mod error;
pub mod mapper;
pub mod resolver;

pub use carryover::{ToolCarryover, ToolStateSnapshot};
pub use controller::{ActiveShotRecord, SyncController, SyncSession, SyncState};
pub use detector::{BoundaryDetector, Crossing};
pub use driver::SyncDriver;
pub use error::{Result, SyncError};
pub use mapper::{local_to_master, master_to_local, StripMapping};
pub use resolver::{resolve, shot_map, ShotSegment};

// Re-export contracts types
pub use contracts::{FrameChange, SyncOutcome, SyncSettings};
