//! 内存场景存储
//!
//! `SceneStore` 的内存实现，供测试与 CLI 使用。所有写操作都是静默的：
//! 帧变化通知只由 `SyncDriver` 发出。

use std::collections::{BTreeMap, HashMap};

use contracts::{
    BrushId, ContractError, Frame, FrameRange, InteractionMode, MaterialId, ObjectId, ObjectKind,
    PaintObject, SceneId, SceneStore, Strip, StripId, Timeline,
};
use tracing::{debug, instrument};

use crate::error::{Result, SceneStoreError};

/// 新建绘制设置时的默认笔刷
pub const DEFAULT_BRUSH: &str = "Pencil";

/// `add_shot` 创建的镜头场景的默认帧范围
pub const DEFAULT_SHOT_RANGE: FrameRange = FrameRange {
    start: 1,
    end: 250,
};

/// 场景的绘制设置
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaintSettings {
    pub brush: Option<BrushId>,
}

/// 场景中的对象
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectData {
    pub id: ObjectId,
    pub kind: ObjectKind,
    pub mode: InteractionMode,
    /// 材质槽
    pub materials: Vec<MaterialId>,
    /// 活动材质槽索引
    pub active_material_index: Option<usize>,
}

impl ObjectData {
    pub fn new(id: impl Into<ObjectId>, kind: ObjectKind) -> Self {
        Self {
            id: id.into(),
            kind,
            mode: InteractionMode::Object,
            materials: Vec::new(),
            active_material_index: None,
        }
    }

    /// 活动材质
    pub fn active_material(&self) -> Option<&MaterialId> {
        self.materials.get(self.active_material_index?)
    }
}

/// 单个场景的数据
#[derive(Debug, Clone)]
pub struct SceneData {
    pub frame_range: FrameRange,
    pub frame_current: Frame,
    /// 活动相机
    pub camera: Option<ObjectId>,
    /// 绘制设置（未使用蜡笔的场景没有）
    pub paint: Option<PaintSettings>,
    objects: Vec<ObjectData>,
    active_object: Option<ObjectId>,
}

impl SceneData {
    fn new(frame_range: FrameRange) -> Self {
        Self {
            frame_range,
            frame_current: frame_range.start,
            camera: None,
            paint: None,
            objects: Vec::new(),
            active_object: None,
        }
    }

    pub fn objects(&self) -> &[ObjectData] {
        &self.objects
    }

    pub fn object(&self, id: &ObjectId) -> Option<&ObjectData> {
        self.objects.iter().find(|o| &o.id == id)
    }

    fn object_mut(&mut self, id: &ObjectId) -> Option<&mut ObjectData> {
        self.objects.iter_mut().find(|o| &o.id == id)
    }

    /// 活动对象
    pub fn active_object(&self) -> Option<&ObjectData> {
        self.object(self.active_object.as_ref()?)
    }
}

/// 内存场景存储
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    /// 场景（按名称排序，便于输出稳定）
    scenes: BTreeMap<SceneId, SceneData>,
    /// 主场景的时间线
    timelines: HashMap<SceneId, Timeline>,
    /// 时间线上的活动条带
    active_strips: HashMap<SceneId, StripId>,
    /// 当前显示的场景
    focused: Option<SceneId>,
}

impl MemoryStore {
    /// 创建空存储
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加场景
    ///
    /// 第一个添加的场景自动获得焦点。
    #[instrument(name = "memory_store_add_scene", skip(self, name, range), fields(scene))]
    pub fn add_scene(&mut self, name: impl Into<SceneId>, range: FrameRange) -> Result<SceneId> {
        let id = name.into();
        tracing::Span::current().record("scene", id.as_str());

        if self.scenes.contains_key(&id) {
            return Err(ContractError::duplicate_scene_name(id.as_str()).into());
        }
        if range.start > range.end {
            return Err(ContractError::config_validation(
                format!("scenes[name={id}].frame_end"),
                format!("frame_end {} is before frame_start {}", range.end, range.start),
            )
            .into());
        }

        self.scenes.insert(id.clone(), SceneData::new(range));
        if self.focused.is_none() {
            self.focused = Some(id.clone());
        }
        debug!("scene added");
        Ok(id)
    }

    /// 删除场景
    ///
    /// 引用该场景的条带保持悬空，不会被删除。
    #[instrument(name = "memory_store_remove_scene", skip(self), fields(scene = %scene))]
    pub fn remove_scene(&mut self, scene: &SceneId) -> Option<SceneData> {
        let removed = self.scenes.remove(scene)?;
        self.timelines.remove(scene);
        self.active_strips.remove(scene);
        if self.focused.as_ref() == Some(scene) {
            self.focused = None;
        }
        debug!("scene removed");
        Some(removed)
    }

    pub fn scene(&self, scene: &SceneId) -> Option<&SceneData> {
        self.scenes.get(scene)
    }

    pub fn scene_ids(&self) -> impl Iterator<Item = &SceneId> {
        self.scenes.keys()
    }

    fn scene_mut(&mut self, scene: &SceneId) -> Result<&mut SceneData> {
        self.scenes
            .get_mut(scene)
            .ok_or_else(|| ContractError::scene_not_found(scene.as_str()).into())
    }

    /// 主场景的时间线，不存在时创建
    pub fn timeline_mut(&mut self, master: &SceneId) -> Result<&mut Timeline> {
        if !self.scenes.contains_key(master) {
            return Err(ContractError::scene_not_found(master.as_str()).into());
        }
        Ok(self.timelines.entry(master.clone()).or_default())
    }

    /// 添加条带
    ///
    /// # Errors
    /// - 主场景或条带引用的场景不存在
    /// - 条带区间为空、重名或与同通道条带重叠
    pub fn add_strip(&mut self, master: &SceneId, strip: Strip) -> Result<StripId> {
        if let Some(scene) = strip.scene.as_ref().filter(|s| !self.scenes.contains_key(*s)) {
            return Err(ContractError::scene_not_found(scene.as_str()).into());
        }
        let id = strip.id.clone();
        self.timeline_mut(master)?.insert_strip(strip)?;
        debug!(master = %master, strip = %id, "strip added");
        Ok(id)
    }

    /// 为已有场景在 `frame_start` 处添加完整长度的条带
    pub fn add_scene_strip(
        &mut self,
        master: &SceneId,
        name: impl Into<StripId>,
        scene: &SceneId,
        channel: u32,
        frame_start: Frame,
    ) -> Result<StripId> {
        let range = self
            .scene(scene)
            .map(|data| data.frame_range)
            .ok_or_else(|| ContractError::scene_not_found(scene.as_str()))?;
        self.add_strip(
            master,
            Strip {
                id: name.into(),
                channel,
                frame_final_start: frame_start,
                frame_final_end: frame_start + range.len(),
                frame_offset_start: 0,
                mute: false,
                scene: Some(scene.clone()),
                scene_camera: None,
            },
        )
    }

    /// 新建默认长度的镜头场景，并在主时间线上放置同名条带
    pub fn add_shot(
        &mut self,
        master: &SceneId,
        name: &str,
        channel: u32,
        frame_start: Frame,
    ) -> Result<StripId> {
        let scene = self.add_scene(name, DEFAULT_SHOT_RANGE)?;
        match self.add_scene_strip(master, name, &scene, channel, frame_start) {
            Ok(strip) => Ok(strip),
            Err(e) => {
                self.scenes.remove(&scene);
                Err(e)
            }
        }
    }

    pub fn strip(&self, master: &SceneId, strip: &StripId) -> Option<&Strip> {
        self.timelines.get(master)?.strip(strip)
    }

    fn edit_strip(
        &mut self,
        master: &SceneId,
        strip: &StripId,
        edit: impl FnOnce(&mut Strip),
    ) -> Result<()> {
        let timeline = self
            .timelines
            .get_mut(master)
            .filter(|t| t.strip(strip).is_some())
            .ok_or_else(|| SceneStoreError::strip_not_found(master.as_str(), strip.as_str()))?;
        timeline.update_strip(strip, edit)?;
        Ok(())
    }

    pub fn set_strip_mute(&mut self, master: &SceneId, strip: &StripId, mute: bool) -> Result<()> {
        self.edit_strip(master, strip, |s| s.mute = mute)
    }

    /// 修改条带可见长度（保持起点）
    pub fn set_strip_duration(
        &mut self,
        master: &SceneId,
        strip: &StripId,
        duration: Frame,
    ) -> Result<()> {
        self.edit_strip(master, strip, |s| {
            s.frame_final_end = s.frame_final_start + duration;
        })
    }

    pub fn set_strip_camera(
        &mut self,
        master: &SceneId,
        strip: &StripId,
        camera: Option<ObjectId>,
    ) -> Result<()> {
        self.edit_strip(master, strip, |s| s.scene_camera = camera)
    }

    pub fn set_channel_mute(&mut self, master: &SceneId, channel: u32, mute: bool) -> Result<()> {
        self.timeline_mut(master)?.channel_mut(channel).mute = mute;
        Ok(())
    }

    /// 时间线上的活动条带
    pub fn active_strip(&self, master: &SceneId) -> Option<&StripId> {
        self.active_strips.get(master)
    }

    fn add_object(&mut self, scene: &SceneId, object: ObjectData) -> Result<ObjectId> {
        let data = self.scene_mut(scene)?;
        if data.object(&object.id).is_some() {
            return Err(SceneStoreError::DuplicateObject {
                scene: scene.to_string(),
                object: object.id.to_string(),
            });
        }
        let id = object.id.clone();
        data.objects.push(object);
        Ok(id)
    }

    /// 添加相机；场景尚无活动相机时设为活动相机
    pub fn add_camera(&mut self, scene: &SceneId, name: &str) -> Result<ObjectId> {
        let id = self.add_object(scene, ObjectData::new(name, ObjectKind::Camera))?;
        let data = self.scene_mut(scene)?;
        data.camera.get_or_insert_with(|| id.clone());
        Ok(id)
    }

    /// 场景的活动相机
    pub fn camera(&self, scene: &SceneId) -> Option<&ObjectId> {
        self.scene(scene)?.camera.as_ref()
    }

    /// 添加蜡笔对象并设为活动对象
    ///
    /// 场景没有绘制设置时以 [`DEFAULT_BRUSH`] 创建。
    pub fn add_gpencil_object(
        &mut self,
        scene: &SceneId,
        name: &str,
        materials: &[&str],
    ) -> Result<ObjectId> {
        let mut object = ObjectData::new(name, ObjectKind::Gpencil);
        object.materials = materials.iter().map(|m| MaterialId::new(m)).collect();
        object.active_material_index = (!object.materials.is_empty()).then_some(0);

        let id = self.add_object(scene, object)?;
        let data = self.scene_mut(scene)?;
        data.active_object = Some(id.clone());
        data.paint.get_or_insert_with(|| PaintSettings {
            brush: Some(BrushId::new(DEFAULT_BRUSH)),
        });
        Ok(id)
    }

    /// 添加空对象并设为活动对象
    pub fn add_empty_object(&mut self, scene: &SceneId, name: &str) -> Result<ObjectId> {
        let id = self.add_object(scene, ObjectData::new(name, ObjectKind::Empty))?;
        self.scene_mut(scene)?.active_object = Some(id.clone());
        Ok(id)
    }

    /// 删除对象
    pub fn remove_object(&mut self, scene: &SceneId, object: &ObjectId) -> Result<ObjectData> {
        let data = self.scene_mut(scene)?;
        let pos = data
            .objects
            .iter()
            .position(|o| &o.id == object)
            .ok_or_else(|| SceneStoreError::object_not_found(scene.as_str(), object.as_str()))?;
        if data.active_object.as_ref() == Some(object) {
            data.active_object = None;
        }
        if data.camera.as_ref() == Some(object) {
            data.camera = None;
        }
        Ok(data.objects.remove(pos))
    }

    pub fn object(&self, scene: &SceneId, object: &ObjectId) -> Option<&ObjectData> {
        self.scene(scene)?.object(object)
    }

    fn object_mut(&mut self, scene: &SceneId, object: &ObjectId) -> Result<&mut ObjectData> {
        self.scene_mut(scene)?
            .object_mut(object)
            .ok_or_else(|| SceneStoreError::object_not_found(scene.as_str(), object.as_str()))
    }

    /// 设置活动对象（`None` 取消）
    pub fn set_active_object(&mut self, scene: &SceneId, object: Option<&ObjectId>) -> Result<()> {
        if let Some(object) = object {
            self.object_mut(scene, object)?;
        }
        self.scene_mut(scene)?.active_object = object.cloned();
        Ok(())
    }

    pub fn set_mode(
        &mut self,
        scene: &SceneId,
        object: &ObjectId,
        mode: InteractionMode,
    ) -> Result<()> {
        self.object_mut(scene, object)?.mode = mode;
        Ok(())
    }

    /// 设置活动材质槽
    pub fn set_active_material_index(
        &mut self,
        scene: &SceneId,
        object: &ObjectId,
        index: usize,
    ) -> Result<()> {
        let data = self.object_mut(scene, object)?;
        if index >= data.materials.len() {
            return Err(ContractError::config_validation(
                format!("objects[name={object}].active_material"),
                format!("slot {index} out of {} material slots", data.materials.len()),
            )
            .into());
        }
        data.active_material_index = Some(index);
        Ok(())
    }

    /// 设置绘制笔刷，必要时创建绘制设置
    pub fn set_brush(&mut self, scene: &SceneId, brush: impl Into<BrushId>) -> Result<()> {
        self.scene_mut(scene)?.paint.get_or_insert_with(PaintSettings::default).brush =
            Some(brush.into());
        Ok(())
    }

    pub fn paint_settings(&self, scene: &SceneId) -> Option<&PaintSettings> {
        self.scene(scene)?.paint.as_ref()
    }
}

impl SceneStore for MemoryStore {
    fn scene_exists(&self, scene: &SceneId) -> bool {
        self.scenes.contains_key(scene)
    }

    fn timeline(&self, master: &SceneId) -> Option<&Timeline> {
        self.timelines.get(master)
    }

    fn frame_current(&self, scene: &SceneId) -> Option<Frame> {
        self.scene(scene).map(|data| data.frame_current)
    }

    fn frame_range(&self, scene: &SceneId) -> Option<FrameRange> {
        self.scene(scene).map(|data| data.frame_range)
    }

    fn set_frame_current(&mut self, scene: &SceneId, frame: Frame) -> bool {
        match self.scenes.get_mut(scene) {
            Some(data) => {
                data.frame_current = frame;
                true
            }
            None => false,
        }
    }

    fn set_scene_camera(&mut self, scene: &SceneId, camera: &ObjectId) -> bool {
        match self.scenes.get_mut(scene) {
            Some(data) if data.object(camera).is_some() => {
                data.camera = Some(camera.clone());
                true
            }
            _ => false,
        }
    }

    fn focused_scene(&self) -> Option<SceneId> {
        self.focused.clone()
    }

    fn set_focused_scene(&mut self, scene: &SceneId) -> bool {
        if !self.scenes.contains_key(scene) {
            return false;
        }
        self.focused = Some(scene.clone());
        true
    }

    fn set_active_strip(&mut self, master: &SceneId, strip: &StripId) -> bool {
        if self.strip(master, strip).is_none() {
            return false;
        }
        self.active_strips.insert(master.clone(), strip.clone());
        true
    }

    fn object_exists(&self, scene: &SceneId, object: &ObjectId) -> bool {
        self.object(scene, object).is_some()
    }

    fn active_paint_object(&self, scene: &SceneId) -> Option<PaintObject> {
        let object = self
            .scene(scene)?
            .active_object()
            .filter(|o| o.kind == ObjectKind::Gpencil)?;
        Some(PaintObject {
            object: object.id.clone(),
            mode: object.mode,
            active_material: object.active_material().cloned(),
        })
    }

    fn paint_brush(&self, scene: &SceneId) -> Option<BrushId> {
        self.paint_settings(scene)?.brush.clone()
    }

    fn set_paint_brush(&mut self, scene: &SceneId, brush: &BrushId) -> bool {
        match self.scenes.get_mut(scene).and_then(|data| data.paint.as_mut()) {
            Some(paint) => {
                paint.brush = Some(brush.clone());
                true
            }
            None => false,
        }
    }

    fn set_object_mode(
        &mut self,
        scene: &SceneId,
        object: &ObjectId,
        mode: InteractionMode,
    ) -> bool {
        match self.object_mut(scene, object) {
            Ok(data) if data.kind == ObjectKind::Gpencil || mode == InteractionMode::Object => {
                data.mode = mode;
                true
            }
            _ => false,
        }
    }

    fn set_active_material(
        &mut self,
        scene: &SceneId,
        object: &ObjectId,
        material: &MaterialId,
    ) -> bool {
        let Ok(data) = self.object_mut(scene, object) else {
            return false;
        };
        match data.materials.iter().position(|m| m == material) {
            Some(index) => {
                data.active_material_index = Some(index);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edit() -> SceneId {
        "EDIT".into()
    }

    fn store_with_edit() -> MemoryStore {
        let mut store = MemoryStore::new();
        store.add_scene("EDIT", FrameRange::new(1, 500)).unwrap();
        store
    }

    #[test]
    fn test_duplicate_scene_rejected() {
        let mut store = store_with_edit();
        let err = store.add_scene("EDIT", FrameRange::new(1, 10)).unwrap_err();
        assert!(matches!(
            err,
            SceneStoreError::Contract(ContractError::DuplicateSceneName { .. })
        ));
    }

    #[test]
    fn test_first_scene_is_focused() {
        let mut store = store_with_edit();
        store.add_scene("SH010", FrameRange::new(1, 10)).unwrap();
        assert_eq!(store.focused_scene(), Some(edit()));
    }

    #[test]
    fn test_add_shot_places_full_length_strip() {
        let mut store = store_with_edit();
        let strip = store.add_shot(&edit(), "SH010", 1, 101).unwrap();
        let strip = store.strip(&edit(), &strip).unwrap();
        assert_eq!((strip.frame_final_start, strip.frame_final_end), (101, 351));
        assert_eq!(store.frame_current(&"SH010".into()), Some(1));
    }

    #[test]
    fn test_overlapping_shot_rolls_back_scene() {
        let mut store = store_with_edit();
        store.add_shot(&edit(), "SH010", 1, 1).unwrap();
        let err = store.add_shot(&edit(), "SH020", 1, 100).unwrap_err();
        assert!(matches!(
            err,
            SceneStoreError::Contract(ContractError::StripOverlap { .. })
        ));
        assert!(!store.scene_exists(&"SH020".into()));
    }

    #[test]
    fn test_remove_scene_leaves_strip_dangling() {
        let mut store = store_with_edit();
        let strip = store.add_shot(&edit(), "SH010", 1, 1).unwrap();
        store.remove_scene(&"SH010".into()).unwrap();
        let strip = store.strip(&edit(), &strip).unwrap();
        assert_eq!(strip.scene, Some("SH010".into()));
        assert!(!store.scene_exists(&"SH010".into()));
    }

    #[test]
    fn test_strip_duration_edit() {
        let mut store = store_with_edit();
        let strip = store.add_shot(&edit(), "SH010", 1, 1).unwrap();
        store.set_strip_duration(&edit(), &strip, 10).unwrap();
        assert_eq!(store.strip(&edit(), &strip).unwrap().frame_final_end, 11);
        assert!(store.set_strip_duration(&edit(), &strip, 0).is_err());
        assert_eq!(store.strip(&edit(), &strip).unwrap().frame_final_end, 11);
    }

    #[test]
    fn test_gpencil_object_creates_paint_settings() {
        let mut store = store_with_edit();
        let scene: SceneId = "SH010".into();
        store.add_scene(scene.clone(), FrameRange::new(1, 10)).unwrap();
        assert_eq!(store.paint_brush(&scene), None);

        let object = store
            .add_gpencil_object(&scene, "Stroke", &["Black", "White"])
            .unwrap();

        assert_eq!(store.paint_brush(&scene), Some(DEFAULT_BRUSH.into()));
        let paint = store.active_paint_object(&scene).unwrap();
        assert_eq!(paint.object, object);
        assert_eq!(paint.active_material, Some("Black".into()));
    }

    #[test]
    fn test_brush_write_needs_paint_settings() {
        let mut store = store_with_edit();
        assert!(!store.set_paint_brush(&edit(), &"Pen".into()));
        store.set_brush(&edit(), "Pen").unwrap();
        assert_eq!(store.paint_brush(&edit()), Some("Pen".into()));
    }

    #[test]
    fn test_empty_object_is_not_a_paint_object() {
        let mut store = store_with_edit();
        let empty = store.add_empty_object(&edit(), "Null").unwrap();
        assert!(store.active_paint_object(&edit()).is_none());
        assert!(!store.set_object_mode(&edit(), &empty, InteractionMode::PaintGpencil));
    }

    #[test]
    fn test_material_selection_by_name() {
        let mut store = store_with_edit();
        let object = store
            .add_gpencil_object(&edit(), "Stroke", &["Black", "White"])
            .unwrap();
        assert!(store.set_active_material(&edit(), &object, &"White".into()));
        assert!(!store.set_active_material(&edit(), &object, &"Red".into()));
        let data = store.object(&edit(), &object).unwrap();
        assert_eq!(data.active_material(), Some(&"White".into()));
    }

    #[test]
    fn test_camera_must_live_in_scene() {
        let mut store = store_with_edit();
        let cam = store.add_camera(&edit(), "Cam1").unwrap();
        assert_eq!(store.camera(&edit()), Some(&cam));
        assert!(!store.set_scene_camera(&edit(), &"Cam9".into()));
        let cam2 = store.add_camera(&edit(), "Cam2").unwrap();
        assert!(store.set_scene_camera(&edit(), &cam2));
        assert_eq!(store.camera(&edit()), Some(&cam2));
    }
}
