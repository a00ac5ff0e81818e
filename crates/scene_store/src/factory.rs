//! SceneFactory 核心实现
//!
//! 从 ProjectBlueprint 构建内存场景存储。

use contracts::{
    ContractError, ObjectConfig, ObjectKind, ProjectBlueprint, SceneConfig, SceneId, SceneStore,
};
use tracing::{debug, info, instrument};

use crate::error::{Result, SceneStoreError};
use crate::memory::MemoryStore;

/// Scene Factory
///
/// 负责按蓝图创建场景、对象与主时间线。
/// 任何一步失败都直接返回错误，半成品存储随之丢弃。
#[derive(Debug, Default)]
pub struct SceneFactory;

impl SceneFactory {
    /// 创建新的 SceneFactory
    pub fn new() -> Self {
        Self
    }

    /// 从 ProjectBlueprint 构建存储
    #[instrument(
        name = "scene_factory_build",
        skip(self, blueprint),
        fields(scene_count = blueprint.scenes.len(), strip_count = blueprint.timeline.strips.len())
    )]
    pub fn build(&self, blueprint: &ProjectBlueprint) -> Result<MemoryStore> {
        let mut store = MemoryStore::new();

        for scene in &blueprint.scenes {
            self.build_scene(&mut store, scene)?;
        }

        self.build_timeline(&mut store, blueprint)?;

        // 初始焦点放在主场景上
        if let Some(master) = blueprint.master_scene() {
            store.set_focused_scene(master);
        }

        info!(
            scenes = blueprint.scenes.len(),
            strips = blueprint.timeline.strips.len(),
            "build completed successfully"
        );
        Ok(store)
    }

    /// 创建单个场景及其对象
    #[instrument(
        name = "scene_factory_build_scene",
        skip(self, store, config),
        fields(scene = %config.name)
    )]
    fn build_scene(&self, store: &mut MemoryStore, config: &SceneConfig) -> Result<()> {
        let id = store.add_scene(config.name.as_str(), config.frame_range())?;

        for camera in &config.cameras {
            store.add_camera(&id, camera)?;
        }
        if let Some(camera) = &config.camera {
            if !store.set_scene_camera(&id, &camera.as_str().into()) {
                return Err(SceneStoreError::CameraNotFound {
                    scene: config.name.clone(),
                    camera: camera.clone(),
                });
            }
        }

        for object in &config.objects {
            self.build_object(store, &id, object)?;
        }

        if let Some(brush) = &config.brush {
            store.set_brush(&id, brush.as_str())?;
        }
        if let Some(frame) = config.frame_current {
            store.set_frame_current(&id, frame);
        }

        debug!(objects = config.objects.len(), "scene built");
        Ok(())
    }

    fn build_object(
        &self,
        store: &mut MemoryStore,
        scene: &SceneId,
        config: &ObjectConfig,
    ) -> Result<()> {
        let materials: Vec<&str> = config.materials.iter().map(String::as_str).collect();
        let id = match config.kind {
            ObjectKind::Gpencil => store.add_gpencil_object(scene, &config.name, &materials)?,
            ObjectKind::Camera => store.add_camera(scene, &config.name)?,
            ObjectKind::Empty => store.add_empty_object(scene, &config.name)?,
        };

        store.set_mode(scene, &id, config.mode)?;

        if let Some(material) = &config.active_material {
            let index = config
                .materials
                .iter()
                .position(|m| m == material)
                .ok_or_else(|| {
                    ContractError::config_validation(
                        format!("scenes[name={scene}].objects[name={id}].active_material"),
                        format!("material '{material}' is not in the object's slots"),
                    )
                })?;
            store.set_active_material_index(scene, &id, index)?;
        }

        // 对象创建时总会成为活动对象，这里按配置修正
        let active = store
            .scene(scene)
            .and_then(|s| s.active_object())
            .map(|o| o.id.clone());
        if config.active {
            store.set_active_object(scene, Some(&id))?;
        } else if active.as_ref() == Some(&id) {
            store.set_active_object(scene, None)?;
        }
        Ok(())
    }

    /// 创建主时间线的通道与条带
    fn build_timeline(&self, store: &mut MemoryStore, blueprint: &ProjectBlueprint) -> Result<()> {
        let timeline = &blueprint.timeline;
        if timeline.channels.is_empty() && timeline.strips.is_empty() {
            return Ok(());
        }

        let master = blueprint.master_scene().ok_or_else(|| {
            ContractError::config_validation("sync.master_scene", "a timeline needs a master scene")
        })?;

        for channel in &timeline.channels {
            store.set_channel_mute(master, channel.index, channel.mute)?;
        }

        for strip in &timeline.strips {
            let scene = blueprint
                .scene(&strip.scene)
                .ok_or_else(|| ContractError::scene_not_found(strip.scene.as_str()))?;
            store.add_strip(master, strip.to_strip(scene.frame_range()))?;
        }
        Ok(())
    }
}
