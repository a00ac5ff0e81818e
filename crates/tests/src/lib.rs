//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 合约快照测试
//! - 主时间线与镜头时钟同步场景
//! - 工具状态延续场景
//! - 配置 → 存储 → 同步的端到端流程

#[cfg(test)]
mod fixtures {
    use contracts::{Frame, FrameRange, SceneId, StripId, SyncSettings};
    use scene_store::MemoryStore;
    use sync_engine::SyncDriver;

    pub const MASTER: &str = "EDIT";

    /// 主场景 EDIT 与一个默认长度（250 帧）的镜头 SH010，同步已启用
    pub fn basic_synced_setup() -> (SyncDriver<MemoryStore>, StripId) {
        let mut store = MemoryStore::new();
        let master = store.add_scene(MASTER, FrameRange::new(1, 1000)).unwrap();
        let shot = store.add_shot(&master, "SH010", 1, 1).unwrap();

        let settings = SyncSettings {
            enabled: true,
            master_scene: Some(master),
            ..Default::default()
        };
        (SyncDriver::new(store, settings), shot)
    }

    /// 在基础场景上再叠加三个同起点的镜头，通道 2..=4
    pub fn complex_synced_setup() -> (SyncDriver<MemoryStore>, Vec<StripId>) {
        let (mut driver, shot_1) = basic_synced_setup();
        let start = strip_start(&driver, &shot_1);
        let mut shots = vec![shot_1];
        for (channel, name) in [(2, "SH020"), (3, "SH030"), (4, "SH040")] {
            shots.push(create_shot_scene(&mut driver, name, channel, start));
        }
        (driver, shots)
    }

    /// 新建镜头场景并放到主时间线上（静默编辑，不触发同步）
    pub fn create_shot_scene(
        driver: &mut SyncDriver<MemoryStore>,
        name: &str,
        channel: u32,
        frame_start: Frame,
    ) -> StripId {
        driver
            .store_mut()
            .add_shot(&master(), name, channel, frame_start)
            .unwrap()
    }

    pub fn master() -> SceneId {
        MASTER.into()
    }

    pub fn strip_start(driver: &SyncDriver<MemoryStore>, strip: &StripId) -> Frame {
        driver.store().strip(&master(), strip).unwrap().frame_final_start
    }

    pub fn strip_end(driver: &SyncDriver<MemoryStore>, strip: &StripId) -> Frame {
        driver.store().strip(&master(), strip).unwrap().frame_final_end
    }

    pub fn strip_scene(driver: &SyncDriver<MemoryStore>, strip: &StripId) -> SceneId {
        driver
            .store()
            .strip(&master(), strip)
            .and_then(|s| s.scene.clone())
            .unwrap()
    }
}

#[cfg(test)]
mod contract_tests {
    use contracts::{FrameChange, SyncOrigin, SyncOutcome};

    #[test]
    fn test_contracts_compile() {
        // 验证 contracts crate 可编译
        let _ = contracts::ConfigVersion::V1;
    }

    #[test]
    fn test_outcome_json_shape() {
        let outcome = SyncOutcome::Synced {
            origin: SyncOrigin::Master,
            master_frame: 251,
            active_strip: Some("SH020".into()),
            active_scene: Some("SH020".into()),
            shot_frame: Some(1),
            switched: true,
            crossing: None,
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["kind"], "synced");
        assert_eq!(json["origin"], "master");
        assert_eq!(json["active_strip"], "SH020");

        let change = FrameChange::new("EDIT", 4);
        let json = serde_json::to_value(&change).unwrap();
        assert_eq!(json["scene"], "EDIT");
    }
}

#[cfg(test)]
mod sync_tests {
    use contracts::{SceneStore, SyncOutcome};
    use sync_engine::{local_to_master, master_to_local, StripMapping};

    use crate::fixtures::*;

    #[test]
    fn test_change_edit_time() {
        let (mut driver, shot) = basic_synced_setup();
        let scene = strip_scene(&driver, &shot);

        // Shorten the strip length
        driver
            .store_mut()
            .set_strip_duration(&master(), &shot, 10)
            .unwrap();

        // Inside the strip: the shot clock follows
        driver.frame_set(MASTER, 4).unwrap();
        let strip = driver.store().strip(&master(), &shot).unwrap().clone();
        let mapping = StripMapping::new(&strip, 1);
        let shot_frame = master_to_local(4, &mapping);
        assert_eq!(driver.store().frame_current(&scene), Some(shot_frame));

        // Outside the strip: the shot keeps its last synced frame
        driver.frame_set(MASTER, 20).unwrap();
        assert_eq!(driver.store().frame_current(&scene), Some(shot_frame));
    }

    #[test]
    fn test_disable_sync() {
        let (mut driver, shot) = basic_synced_setup();
        let scene = strip_scene(&driver, &shot);

        driver.configure(|s| s.enabled = false).unwrap();

        let before = driver.store().frame_current(&scene);
        let outcome = driver.frame_set(MASTER, 4).unwrap();
        assert_eq!(outcome, SyncOutcome::Inactive);
        assert_eq!(driver.store().frame_current(&scene), before);
    }

    #[test]
    fn test_change_master_scene() {
        let (mut driver, shot) = basic_synced_setup();
        let scene = strip_scene(&driver, &shot);

        driver.configure(|s| s.master_scene = None).unwrap();

        let before = driver.store().frame_current(&scene);
        driver.frame_set(MASTER, 4).unwrap();
        assert_eq!(driver.store().frame_current(&scene), before);
    }

    #[test]
    fn test_window_scene_sync() {
        let (mut driver, shot_1) = basic_synced_setup();
        let end = strip_end(&driver, &shot_1);
        let shot_2 = create_shot_scene(&mut driver, "SH020", 1, end);

        // Start from a neutral frame
        driver.frame_set(MASTER, 0).unwrap();
        assert_eq!(driver.store().focused_scene(), Some(master()));

        for strip in [&shot_1, &shot_2] {
            driver.frame_set(MASTER, strip_start(&driver, strip)).unwrap();
            assert_eq!(
                driver.store().focused_scene(),
                Some(strip_scene(&driver, strip))
            );
        }
    }

    #[test]
    fn test_bidirectional_within_shot_range() {
        let (mut driver, shot) = basic_synced_setup();
        let scene = strip_scene(&driver, &shot);
        let start = strip_start(&driver, &shot);

        driver.frame_set(MASTER, start).unwrap();
        assert_eq!(driver.store().focused_scene(), Some(scene.clone()));

        let current = driver.store().frame_current(&scene).unwrap();
        driver.frame_set(scene, current + 1).unwrap();
        assert_eq!(driver.store().frame_current(&master()), Some(start + 1));
    }

    /// 构造后第一条通知来自镜头：先按主时钟建立活动镜头，再回传
    #[test]
    fn test_bidirectional_before_any_master_change() {
        let (mut driver, shot) = basic_synced_setup();
        let scene = strip_scene(&driver, &shot);
        let start = strip_start(&driver, &shot);
        driver.store_mut().set_frame_current(&master(), start);

        let outcome = driver.frame_set(scene.clone(), 5).unwrap();

        assert_eq!(outcome.active_strip(), Some(&shot));
        assert_eq!(driver.store().frame_current(&master()), Some(start + 4));
        assert_eq!(driver.store().focused_scene(), Some(scene));
    }

    #[test]
    fn test_bidirectional_outside_shot_range() {
        let (mut driver, shot) = basic_synced_setup();
        let scene = strip_scene(&driver, &shot);
        let start = strip_start(&driver, &shot);
        driver.frame_set(MASTER, start).unwrap();

        let frame_end = driver.store().frame_range(&scene).unwrap().end;
        let outcome = driver.frame_set(scene.clone(), frame_end + 10).unwrap();

        assert!(matches!(outcome, SyncOutcome::Scrubbed { .. }));
        assert_eq!(driver.store().frame_current(&master()), Some(start));
        assert_eq!(driver.store().frame_current(&scene), Some(frame_end + 10));
    }

    #[test]
    fn test_bidirectional_outside_shot_range_to_surrounding_shots() {
        let (mut driver, shot_1) = basic_synced_setup();
        let scene_1 = strip_scene(&driver, &shot_1);
        driver
            .frame_set(MASTER, strip_start(&driver, &shot_1))
            .unwrap();

        // Another shot right after the first one
        let end_1 = strip_end(&driver, &shot_1);
        let shot_2 = create_shot_scene(&mut driver, "SH020", 1, end_1);
        let scene_2 = strip_scene(&driver, &shot_2);
        let range_1 = driver.store().frame_range(&scene_1).unwrap();

        // Jumping past the end without sitting on it first is a scrub
        driver.frame_set(scene_1.clone(), range_1.end + 1).unwrap();
        assert_eq!(driver.store().focused_scene(), Some(scene_1.clone()));

        // Step onto the last frame, then one past it
        driver.frame_set(scene_1.clone(), range_1.end).unwrap();
        driver.frame_set(scene_1.clone(), range_1.end + 1).unwrap();
        assert_eq!(
            driver.store().frame_current(&master()),
            Some(strip_start(&driver, &shot_2))
        );
        assert_eq!(driver.store().focused_scene(), Some(scene_2.clone()));

        // One frame before the second shot's start walks back
        let range_2 = driver.store().frame_range(&scene_2).unwrap();
        driver.frame_set(scene_2, range_2.start - 1).unwrap();
        assert_eq!(driver.store().frame_current(&master()), Some(end_1 - 1));
        assert_eq!(driver.store().focused_scene(), Some(scene_1));
    }

    #[test]
    fn test_bidirectional_off() {
        let (mut driver, shot) = basic_synced_setup();
        let scene = strip_scene(&driver, &shot);
        driver.configure(|s| s.bidirectional = false).unwrap();

        let start = strip_start(&driver, &shot);
        driver.frame_set(MASTER, start).unwrap();
        let current = driver.store().frame_current(&scene).unwrap();
        driver.frame_set(scene, current + 10).unwrap();

        assert_eq!(driver.store().frame_current(&master()), Some(start));
    }

    #[test]
    fn test_camera_strip() {
        let (mut driver, shot_1) = basic_synced_setup();
        let scene = strip_scene(&driver, &shot_1);
        let end = strip_end(&driver, &shot_1);

        let store = driver.store_mut();
        let cam1 = store.add_camera(&scene, "Cam1").unwrap();
        let cam2 = store.add_camera(&scene, "Cam2").unwrap();

        // A second strip pointing at the same scene
        let shot_2 = store
            .add_scene_strip(&master(), "SH010_2", &scene, 1, end)
            .unwrap();
        store
            .set_strip_camera(&master(), &shot_1, Some(cam1.clone()))
            .unwrap();
        store
            .set_strip_camera(&master(), &shot_2, Some(cam2.clone()))
            .unwrap();

        driver.frame_set(MASTER, strip_start(&driver, &shot_1)).unwrap();
        assert_eq!(driver.store().camera(&scene), Some(&cam1));

        let outcome = driver.frame_set(MASTER, strip_start(&driver, &shot_2)).unwrap();
        assert!(outcome.is_switch());
        assert_eq!(driver.store().camera(&scene), Some(&cam2));
    }

    #[test]
    fn test_skip_muted_strips() {
        let (mut driver, shots) = complex_synced_setup();

        // Highest channel wins
        driver.frame_set(MASTER, 1).unwrap();
        assert_eq!(
            driver.store().focused_scene(),
            Some(strip_scene(&driver, &shots[3]))
        );

        // Mute channel 4
        driver
            .store_mut()
            .set_channel_mute(&master(), 4, true)
            .unwrap();
        driver.frame_set(MASTER, 2).unwrap();
        assert_eq!(
            driver.store().focused_scene(),
            Some(strip_scene(&driver, &shots[2]))
        );

        // Mute strip 3
        driver
            .store_mut()
            .set_strip_mute(&master(), &shots[2], true)
            .unwrap();
        driver.frame_set(MASTER, 3).unwrap();
        assert_eq!(
            driver.store().focused_scene(),
            Some(strip_scene(&driver, &shots[1]))
        );
    }

    #[test]
    fn test_active_follows_playhead() {
        let (mut driver, shot_1) = basic_synced_setup();
        driver.store_mut().set_active_strip(&master(), &shot_1);
        driver.configure(|s| s.active_follows_playhead = true).unwrap();

        let end = strip_end(&driver, &shot_1);
        let shot_2 = create_shot_scene(&mut driver, "SH020", 1, end + 1);

        driver.frame_set(MASTER, strip_start(&driver, &shot_2)).unwrap();
        assert_eq!(driver.store().active_strip(&master()), Some(&shot_2));
    }

    #[test]
    fn test_active_strip_untouched_without_follow() {
        let (mut driver, shot_1) = basic_synced_setup();
        let end = strip_end(&driver, &shot_1);
        let shot_2 = create_shot_scene(&mut driver, "SH020", 1, end);
        driver.store_mut().set_active_strip(&master(), &shot_1);

        driver.frame_set(MASTER, strip_start(&driver, &shot_2)).unwrap();
        assert_eq!(driver.store().active_strip(&master()), Some(&shot_1));
    }

    #[test]
    fn test_dangling_strip_is_skipped() {
        let (mut driver, shots) = complex_synced_setup();
        let top = strip_scene(&driver, &shots[3]);

        driver.store_mut().remove_scene(&top);
        driver.frame_set(MASTER, 10).unwrap();

        assert_eq!(
            driver.store().focused_scene(),
            Some(strip_scene(&driver, &shots[2]))
        );
        assert_eq!(driver.controller().active_strip(), Some(&shots[2]));
    }

    #[test]
    fn test_frame_mapping_round_trip() {
        let (mut driver, shot) = basic_synced_setup();
        // Trimmed strip placed away from the scene start
        let scene = strip_scene(&driver, &shot);
        let strip = contracts::Strip {
            id: "SH010_trim".into(),
            channel: 2,
            frame_final_start: 400,
            frame_final_end: 450,
            frame_offset_start: 20,
            mute: false,
            scene: Some(scene.clone()),
            scene_camera: None,
        };
        driver.store_mut().add_strip(&master(), strip.clone()).unwrap();

        let mapping = StripMapping::new(&strip, 1);
        for master_frame in [400, 401, 425, 449] {
            let local = master_to_local(master_frame, &mapping);
            assert_eq!(local_to_master(local, &mapping), master_frame);
        }
        // First visible frame is the scene start plus the trim
        assert_eq!(master_to_local(400, &mapping), 21);

        driver.frame_set(MASTER, 425).unwrap();
        assert_eq!(
            driver.store().frame_current(&scene),
            Some(master_to_local(425, &mapping))
        );
    }
}

#[cfg(test)]
mod tool_settings_tests {
    use contracts::{InteractionMode, MaterialId, SceneStore};

    use crate::fixtures::*;

    const MONKEY_MATERIALS: &[&str] = &["Black", "Skin", "Eyes", "Pupils"];

    #[test]
    fn test_keep_gp_toolsettings() {
        let (mut driver, shot_1) = basic_synced_setup();
        driver
            .configure(|s| s.keep_gpencil_tool_settings = true)
            .unwrap();
        let scene_1 = strip_scene(&driver, &shot_1);

        // Shot 1: GP object, Pencil brush
        let gp_1 = driver
            .store_mut()
            .add_gpencil_object(&scene_1, "Suzanne", MONKEY_MATERIALS)
            .unwrap();
        driver.store_mut().set_brush(&scene_1, "Pencil").unwrap();

        // Shot 2: GP object with the same materials, Pen brush
        let end_1 = strip_end(&driver, &shot_1);
        let shot_2 = create_shot_scene(&mut driver, "SH020", 1, end_1);
        let scene_2 = strip_scene(&driver, &shot_2);
        let gp_2 = driver
            .store_mut()
            .add_gpencil_object(&scene_2, "Suzanne", MONKEY_MATERIALS)
            .unwrap();
        driver.store_mut().set_brush(&scene_2, "Pen").unwrap();

        // Shot 3: empty
        let end_2 = strip_end(&driver, &shot_2);
        let shot_3 = create_shot_scene(&mut driver, "SH030", 1, end_2);
        let scene_3 = strip_scene(&driver, &shot_3);

        driver.frame_set(MASTER, 0).unwrap();

        // Shot 1, then change the active material
        driver.frame_set(MASTER, strip_start(&driver, &shot_1)).unwrap();
        driver
            .store_mut()
            .set_active_material_index(&scene_1, &gp_1, 2)
            .unwrap();

        driver.frame_set(MASTER, strip_start(&driver, &shot_2)).unwrap();
        driver.frame_set(MASTER, strip_start(&driver, &shot_3)).unwrap();

        let store = driver.store();
        assert_eq!(store.paint_brush(&scene_2), store.paint_brush(&scene_1));
        assert_eq!(store.paint_brush(&scene_2), Some("Pencil".into()));
        assert_eq!(
            store.object(&scene_2, &gp_2).unwrap().active_material(),
            Some(&MaterialId::new("Eyes"))
        );
        // A shot without any GP does not break the system
        assert!(store.paint_settings(&scene_3).is_none());
    }

    #[test]
    fn test_keep_gp_toolsettings_interaction_mode() {
        let (mut driver, shot_1) = basic_synced_setup();
        driver
            .configure(|s| s.keep_gpencil_tool_settings = true)
            .unwrap();
        let scene_1 = strip_scene(&driver, &shot_1);

        // Shot 1: GP object in paint mode
        let gp_1 = driver
            .store_mut()
            .add_gpencil_object(&scene_1, "Suzanne", MONKEY_MATERIALS)
            .unwrap();
        driver
            .store_mut()
            .set_mode(&scene_1, &gp_1, InteractionMode::PaintGpencil)
            .unwrap();

        // Shot 2: empty
        let end_1 = strip_end(&driver, &shot_1);
        let shot_2 = create_shot_scene(&mut driver, "SH020", 1, end_1);

        // Shot 3: a single GP object in object mode
        let end_2 = strip_end(&driver, &shot_2);
        let shot_3 = create_shot_scene(&mut driver, "SH030", 1, end_2);
        let scene_3 = strip_scene(&driver, &shot_3);
        let gp_3 = driver
            .store_mut()
            .add_gpencil_object(&scene_3, "Suzanne", MONKEY_MATERIALS)
            .unwrap();

        driver.frame_set(MASTER, 0).unwrap();
        for shot in [&shot_1, &shot_2, &shot_3] {
            driver.frame_set(MASTER, strip_start(&driver, shot)).unwrap();
        }

        let store = driver.store();
        assert_eq!(
            store.object(&scene_1, &gp_1).unwrap().mode,
            InteractionMode::PaintGpencil
        );
        assert_eq!(
            store.object(&scene_3, &gp_3).unwrap().mode,
            InteractionMode::PaintGpencil
        );
    }

    #[test]
    fn test_tool_settings_untouched_when_disabled() {
        let (mut driver, shot_1) = basic_synced_setup();
        let scene_1 = strip_scene(&driver, &shot_1);
        driver
            .store_mut()
            .add_gpencil_object(&scene_1, "Suzanne", MONKEY_MATERIALS)
            .unwrap();
        driver.store_mut().set_brush(&scene_1, "Marker").unwrap();

        let end_1 = strip_end(&driver, &shot_1);
        let shot_2 = create_shot_scene(&mut driver, "SH020", 1, end_1);
        let scene_2 = strip_scene(&driver, &shot_2);
        driver
            .store_mut()
            .add_gpencil_object(&scene_2, "Suzanne", MONKEY_MATERIALS)
            .unwrap();

        driver.frame_set(MASTER, 1).unwrap();
        driver.frame_set(MASTER, strip_start(&driver, &shot_2)).unwrap();

        assert_eq!(driver.store().paint_brush(&scene_2), Some("Pencil".into()));
    }

    /// Capture always overwrites the snapshot with the latest qualifying
    /// scene; apply always pushes it, even when returning to a shot that
    /// was edited in between.
    #[test]
    fn test_latest_capture_wins_on_return() {
        let (mut driver, shot_1) = basic_synced_setup();
        driver
            .configure(|s| s.keep_gpencil_tool_settings = true)
            .unwrap();
        let scene_1 = strip_scene(&driver, &shot_1);
        driver
            .store_mut()
            .add_gpencil_object(&scene_1, "Suzanne", MONKEY_MATERIALS)
            .unwrap();
        driver.store_mut().set_brush(&scene_1, "Pencil").unwrap();

        let end_1 = strip_end(&driver, &shot_1);
        let shot_2 = create_shot_scene(&mut driver, "SH020", 1, end_1);
        let scene_2 = strip_scene(&driver, &shot_2);
        driver
            .store_mut()
            .add_gpencil_object(&scene_2, "Suzanne", MONKEY_MATERIALS)
            .unwrap();

        driver.frame_set(MASTER, 1).unwrap();
        driver.frame_set(MASTER, strip_start(&driver, &shot_2)).unwrap();
        // Change the brush while in shot 2, then go back
        driver.store_mut().set_brush(&scene_2, "Ink").unwrap();
        driver.frame_set(MASTER, 1).unwrap();

        assert_eq!(driver.store().paint_brush(&scene_1), Some("Ink".into()));
    }
}

#[cfg(test)]
mod e2e_tests {
    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{FrameChange, InteractionMode, SceneId, SceneStore, SyncOutcome};
    use observability::SyncMetricsAggregator;
    use scene_store::SceneFactory;
    use sync_engine::SyncDriver;
    use tokio::sync::mpsc;

    const PROJECT: &str = r#"
[sync]
enabled = true
master_scene = "EDIT"
keep_gpencil_tool_settings = true

[[scenes]]
name = "EDIT"
frame_end = 400

[[scenes]]
name = "SH010"
frame_end = 100
brush = "Pen"

[[scenes.objects]]
name = "Stroke"
kind = "gpencil"
mode = "paint_gpencil"
materials = ["Black", "White"]
active_material = "White"
active = true

[[scenes]]
name = "SH020"
frame_start = 1001
frame_end = 1100

[[scenes.objects]]
name = "Stroke"
kind = "gpencil"
materials = ["Black", "White"]
active = true

[[scenes]]
name = "SH030"
frame_end = 50

[[timeline.channels]]
index = 2
mute = true

[[timeline.strips]]
name = "SH010"
scene = "SH010"
frame_start = 1

[[timeline.strips]]
name = "SH020"
scene = "SH020"
frame_start = 101
frame_offset_start = 10

[[timeline.strips]]
name = "SH030"
scene = "SH030"
channel = 2
frame_start = 120
"#;

    /// 配置 → 存储 → 驱动器：主时钟逐帧播放
    ///
    /// 时钟任务通过 mpsc 发送帧变化，驱动器在当前任务中逐个处理。
    #[tokio::test]
    async fn test_e2e_project_playback() {
        let blueprint = ConfigLoader::load_from_str(PROJECT, ConfigFormat::Toml).unwrap();
        let store = SceneFactory::new().build(&blueprint).unwrap();
        let mut driver = SyncDriver::new(store, blueprint.sync.clone());

        let (tx, mut rx) = mpsc::channel::<FrameChange>(16);
        let clock = tokio::spawn(async move {
            for frame in 95..=115 {
                if tx.send(FrameChange::new("EDIT", frame)).await.is_err() {
                    break;
                }
            }
        });

        let mut aggregator = SyncMetricsAggregator::new();
        while let Some(change) = rx.recv().await {
            let outcome = driver.notify(&change).unwrap();
            aggregator.update(&outcome);
        }
        clock.await.unwrap();

        // Strip SH020 starts at master 111 after the trim, so 101..=110 is a gap
        let summary = aggregator.summary();
        assert_eq!(summary.total_events, 21);
        assert_eq!(summary.switches, 3);
        assert_eq!(summary.gap_frames, 10);
        assert_eq!(summary.frames_per_strip.get("SH010"), Some(&6));
        assert_eq!(summary.frames_per_strip.get("SH020"), Some(&5));

        let store = driver.store();
        let sh020: SceneId = "SH020".into();
        assert_eq!(store.frame_current(&"SH010".into()), Some(100));
        assert_eq!(store.frame_current(&sh020), Some(1015));
        assert_eq!(store.focused_scene(), Some(sh020.clone()));

        // Tool state left SH010 at the gap and landed in SH020
        assert_eq!(store.paint_brush(&sh020), Some("Pen".into()));
        let paint = store.active_paint_object(&sh020).unwrap();
        assert_eq!(paint.mode, InteractionMode::PaintGpencil);
        assert_eq!(paint.active_material, Some("White".into()));
    }

    #[test]
    fn test_e2e_muted_channel_and_shot_walk() {
        let blueprint = ConfigLoader::load_from_str(PROJECT, ConfigFormat::Toml).unwrap();
        let store = SceneFactory::new().build(&blueprint).unwrap();
        let mut driver = SyncDriver::new(store, blueprint.sync.clone());

        // SH030 sits on a muted channel over SH020
        let outcome = driver.frame_set("EDIT", 130).unwrap();
        assert_eq!(outcome.active_strip().map(|s| s.as_str()), Some("SH020"));
        // master 130 -> local 130 + (10 + 1001 - 111) = 1030
        assert_eq!(driver.store().frame_current(&"SH020".into()), Some(1030));

        // Walk the shot clock back over its first valid frame
        driver.frame_set("EDIT", 111).unwrap();
        assert_eq!(driver.store().frame_current(&"SH020".into()), Some(1011));
        let outcome = driver.frame_set("SH020", 1010).unwrap();
        assert!(matches!(outcome, SyncOutcome::Synced { master_frame: 110, .. }));
        assert_eq!(driver.store().frame_current(&"EDIT".into()), Some(110));
    }
}
