//! ProjectBlueprint - Config Loader 输出
//!
//! 描述完整的项目配置：场景、主时间线（通道与条带）、同步设置。

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{Frame, FrameRange, InteractionMode, SceneId, Strip, SyncSettings};

/// 配置版本
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// 完整的项目配置蓝图
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProjectBlueprint {
    /// 配置版本
    #[serde(default)]
    pub version: ConfigVersion,

    /// 同步设置
    #[serde(default)]
    pub sync: SyncSettings,

    /// 场景定义列表（主场景与镜头场景）
    #[validate(nested)]
    pub scenes: Vec<SceneConfig>,

    /// 主场景的时间线
    #[serde(default)]
    #[validate(nested)]
    pub timeline: TimelineConfig,
}

/// 场景配置
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SceneConfig {
    /// 场景名称（唯一）
    #[validate(length(min = 1, message = "scene name cannot be empty"))]
    pub name: String,

    /// 起始帧
    #[serde(default = "default_frame_start")]
    pub frame_start: Frame,

    /// 结束帧（包含）
    #[serde(default = "default_frame_end")]
    pub frame_end: Frame,

    /// 当前帧，缺省为起始帧
    #[serde(default)]
    pub frame_current: Option<Frame>,

    /// 活动相机
    #[serde(default)]
    pub camera: Option<String>,

    /// 场景中的相机对象
    #[serde(default)]
    pub cameras: Vec<String>,

    /// 绘制笔刷（仅当场景有绘制设置时生效）
    #[serde(default)]
    pub brush: Option<String>,

    /// 场景中的对象
    #[serde(default)]
    #[validate(nested)]
    pub objects: Vec<ObjectConfig>,
}

fn default_frame_start() -> Frame {
    1
}

fn default_frame_end() -> Frame {
    250
}

impl SceneConfig {
    /// 场景帧范围
    pub fn frame_range(&self) -> FrameRange {
        FrameRange::new(self.frame_start, self.frame_end)
    }
}

/// 对象配置
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ObjectConfig {
    /// 对象名称（场景内唯一）
    #[validate(length(min = 1, message = "object name cannot be empty"))]
    pub name: String,

    /// 对象类型
    #[serde(default)]
    pub kind: ObjectKind,

    /// 交互模式
    #[serde(default)]
    pub mode: InteractionMode,

    /// 材质槽
    #[serde(default)]
    pub materials: Vec<String>,

    /// 活动材质
    #[serde(default)]
    pub active_material: Option<String>,

    /// 是否为场景的活动对象
    #[serde(default)]
    pub active: bool,
}

/// 对象类型
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    /// 蜡笔对象
    Gpencil,
    /// 相机
    Camera,
    /// 空对象
    #[default]
    Empty,
}

/// 时间线配置
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct TimelineConfig {
    /// 通道属性（未列出的通道使用默认值）
    #[serde(default)]
    pub channels: Vec<ChannelConfig>,

    /// 条带列表
    #[serde(default)]
    #[validate(nested)]
    pub strips: Vec<StripConfig>,
}

/// 通道配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelConfig {
    pub index: u32,
    #[serde(default)]
    pub mute: bool,
}

/// 条带配置
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StripConfig {
    /// 条带名称（时间线内唯一）
    #[validate(length(min = 1, message = "strip name cannot be empty"))]
    pub name: String,

    /// 引用的镜头场景
    #[validate(length(min = 1, message = "strip scene cannot be empty"))]
    pub scene: String,

    /// 通道索引
    #[serde(default = "default_channel")]
    pub channel: u32,

    /// 镜头场景起始帧在主时间线上的位置
    pub frame_start: Frame,

    /// 从镜头开头裁掉的帧数
    #[serde(default)]
    pub frame_offset_start: Frame,

    /// 可见长度，缺省为镜头剩余长度
    #[serde(default)]
    pub frame_final_duration: Option<Frame>,

    /// 静音
    #[serde(default)]
    pub mute: bool,

    /// 条带相机
    #[serde(default)]
    pub camera: Option<String>,
}

fn default_channel() -> u32 {
    1
}

impl StripConfig {
    /// 计算主时间线上的可见区间 `[start, end)`
    pub fn final_range(&self, scene_range: FrameRange) -> (Frame, Frame) {
        let start = self.frame_start + self.frame_offset_start;
        let duration = self
            .frame_final_duration
            .unwrap_or(scene_range.len() - self.frame_offset_start);
        (start, start + duration)
    }

    /// 构造运行时条带
    pub fn to_strip(&self, scene_range: FrameRange) -> Strip {
        let (frame_final_start, frame_final_end) = self.final_range(scene_range);
        Strip {
            id: self.name.as_str().into(),
            channel: self.channel,
            frame_final_start,
            frame_final_end,
            frame_offset_start: self.frame_offset_start,
            mute: self.mute,
            scene: Some(self.scene.as_str().into()),
            scene_camera: self.camera.as_deref().map(Into::into),
        }
    }
}

impl ProjectBlueprint {
    /// 按名称查找场景
    pub fn scene(&self, name: &str) -> Option<&SceneConfig> {
        self.scenes.iter().find(|s| s.name == name)
    }

    /// 主场景名称
    pub fn master_scene(&self) -> Option<&SceneId> {
        self.sync.master_scene.as_ref()
    }
}
