//! 配置校验模块
//!
//! 校验规则：
//! - 字段级规则（名称非空）由 `validator` derive 声明
//! - scene name 唯一，frame_start <= frame_end
//! - 场景内 object name 唯一，活动材质属于对象的材质槽，活动相机存在
//! - master_scene 存在且不被条带引用；有条带时必须设置 master_scene
//! - strip name 唯一，引用的场景存在，条带相机属于引用的场景
//! - 可见长度 >= 1，同一通道内条带不重叠

use std::collections::{BTreeMap, HashMap, HashSet};

use ::validator::{Validate, ValidationErrors, ValidationErrorsKind};
use contracts::{ContractError, Frame, ObjectKind, ProjectBlueprint, SceneConfig};

/// 校验 ProjectBlueprint 配置
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(blueprint: &ProjectBlueprint) -> Result<(), ContractError> {
    validate_fields(blueprint)?;
    validate_scenes(blueprint)?;
    validate_master(blueprint)?;
    validate_strips(blueprint)?;
    validate_overlaps(blueprint)?;
    Ok(())
}

/// 字段级校验（derive 规则）
fn validate_fields(blueprint: &ProjectBlueprint) -> Result<(), ContractError> {
    match blueprint.validate() {
        Ok(()) => Ok(()),
        Err(errors) => {
            let (field, message) = first_field_error(&errors, "")
                .unwrap_or_else(|| (String::from("<root>"), errors.to_string()));
            Err(ContractError::config_validation(field, message))
        }
    }
}

/// 取出第一个字段错误及其路径（按字段名排序，保证结果稳定）
fn first_field_error(errors: &ValidationErrors, prefix: &str) -> Option<(String, String)> {
    let mut entries: Vec<_> = errors.errors().iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    for (field, kind) in entries {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(errs) => {
                if let Some(err) = errs.first() {
                    let message = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| err.code.to_string());
                    return Some((path, message));
                }
            }
            ValidationErrorsKind::Struct(inner) => {
                if let Some(found) = first_field_error(inner, &path) {
                    return Some(found);
                }
            }
            ValidationErrorsKind::List(items) => {
                for (idx, inner) in items {
                    if let Some(found) = first_field_error(inner, &format!("{path}[{idx}]")) {
                        return Some(found);
                    }
                }
            }
        }
    }
    None
}

/// 场景内可用的相机名
fn scene_cameras(scene: &SceneConfig) -> HashSet<&str> {
    scene
        .cameras
        .iter()
        .map(String::as_str)
        .chain(
            scene
                .objects
                .iter()
                .filter(|o| o.kind == ObjectKind::Camera)
                .map(|o| o.name.as_str()),
        )
        .collect()
}

/// 校验场景定义
fn validate_scenes(blueprint: &ProjectBlueprint) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for scene in &blueprint.scenes {
        if !seen.insert(scene.name.as_str()) {
            return Err(ContractError::config_validation(
                format!("scenes[name={}]", scene.name),
                "duplicate scene name",
            ));
        }

        if scene.frame_start > scene.frame_end {
            return Err(ContractError::config_validation(
                format!("scenes[name={}].frame_end", scene.name),
                format!(
                    "frame_end ({}) must be >= frame_start ({})",
                    scene.frame_end, scene.frame_start
                ),
            ));
        }

        let cameras = scene_cameras(scene);
        let mut object_names: HashSet<&str> = scene.cameras.iter().map(String::as_str).collect();
        if object_names.len() != scene.cameras.len() {
            return Err(ContractError::config_validation(
                format!("scenes[name={}].cameras", scene.name),
                "duplicate camera name",
            ));
        }

        for object in &scene.objects {
            if !object_names.insert(object.name.as_str()) {
                return Err(ContractError::config_validation(
                    format!("scenes[name={}].objects[name={}]", scene.name, object.name),
                    "duplicate object name",
                ));
            }
            if let Some(material) = &object.active_material {
                if !object.materials.contains(material) {
                    return Err(ContractError::config_validation(
                        format!(
                            "scenes[name={}].objects[name={}].active_material",
                            scene.name, object.name
                        ),
                        format!("material '{material}' is not in the object's slots"),
                    ));
                }
            }
        }

        if let Some(camera) = &scene.camera {
            if !cameras.contains(camera.as_str()) {
                return Err(ContractError::config_validation(
                    format!("scenes[name={}].camera", scene.name),
                    format!("camera '{camera}' not found in scene"),
                ));
            }
        }
    }
    Ok(())
}

/// 校验主场景设置
fn validate_master(blueprint: &ProjectBlueprint) -> Result<(), ContractError> {
    let timeline = &blueprint.timeline;
    let Some(master) = blueprint.master_scene() else {
        if !timeline.strips.is_empty() || !timeline.channels.is_empty() {
            return Err(ContractError::config_validation(
                "sync.master_scene",
                "a timeline is defined but no master scene owns it",
            ));
        }
        return Ok(());
    };

    if blueprint.scene(master).is_none() {
        return Err(ContractError::config_validation(
            "sync.master_scene",
            format!("master scene '{master}' not found in scenes"),
        ));
    }

    if let Some(strip) = timeline.strips.iter().find(|s| s.scene == master.as_str()) {
        return Err(ContractError::config_validation(
            format!("timeline.strips[name={}].scene", strip.name),
            "a strip cannot reference the master scene",
        ));
    }
    Ok(())
}

/// 校验条带定义
fn validate_strips(blueprint: &ProjectBlueprint) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for strip in &blueprint.timeline.strips {
        let field = format!("timeline.strips[name={}]", strip.name);

        if !seen.insert(strip.name.as_str()) {
            return Err(ContractError::config_validation(field, "duplicate strip name"));
        }

        let scene = blueprint.scene(&strip.scene).ok_or_else(|| {
            ContractError::config_validation(
                format!("{field}.scene"),
                format!("scene '{}' not found in scenes", strip.scene),
            )
        })?;

        if strip.channel == 0 {
            return Err(ContractError::config_validation(
                format!("{field}.channel"),
                "channels start at 1",
            ));
        }

        if strip.frame_offset_start < 0 {
            return Err(ContractError::config_validation(
                format!("{field}.frame_offset_start"),
                format!("offset must be >= 0, got {}", strip.frame_offset_start),
            ));
        }

        let (start, end) = strip.final_range(scene.frame_range());
        if end - start < 1 {
            return Err(ContractError::config_validation(
                format!("{field}.frame_final_duration"),
                format!("visible duration must be >= 1, got {}", end - start),
            ));
        }

        if let Some(camera) = &strip.camera {
            if !scene_cameras(scene).contains(camera.as_str()) {
                return Err(ContractError::config_validation(
                    format!("{field}.camera"),
                    format!("camera '{camera}' not found in scene '{}'", scene.name),
                ));
            }
        }
    }
    Ok(())
}

/// 校验同一通道内条带不重叠
fn validate_overlaps(blueprint: &ProjectBlueprint) -> Result<(), ContractError> {
    let lengths: HashMap<&str, _> = blueprint
        .scenes
        .iter()
        .map(|s| (s.name.as_str(), s.frame_range()))
        .collect();

    let mut channels: BTreeMap<u32, Vec<(Frame, Frame, &str)>> = BTreeMap::new();
    for strip in &blueprint.timeline.strips {
        // 引用已在 validate_strips 中校验
        let Some(range) = lengths.get(strip.scene.as_str()) else {
            continue;
        };
        let (start, end) = strip.final_range(*range);
        channels
            .entry(strip.channel)
            .or_default()
            .push((start, end, strip.name.as_str()));
    }

    for (channel, mut strips) in channels {
        strips.sort();
        for pair in strips.windows(2) {
            let (_, prev_end, prev) = pair[0];
            let (next_start, _, next) = pair[1];
            if next_start < prev_end {
                return Err(ContractError::config_validation(
                    format!("timeline.strips[name={next}]"),
                    format!("overlaps strip '{prev}' on channel {channel}"),
                ));
            }
        }
    }
    Ok(())
}
