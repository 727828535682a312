//! 整合測試 - 以腳本化的引擎驅動完整的編輯流程

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Result, anyhow};
use clip_trimmer::component::playback_sync::{
    PlaybackEngine, PlaybackEvent, PreviewStatus, ToggleOutcome,
};
use clip_trimmer::component::trim_selector::PressOutcome;
use clip_trimmer::component::{EditorSession, ExportOptions, ExportStatus, ProbeStatus};
use clip_trimmer::config::TrackSize;
use clip_trimmer::menu::set_trim_seconds;
use clip_trimmer::tools::{
    ExportRequest, FrameSize, MediaAsset, MediaEngine, OutputFormat, VideoOptions,
};

const PROBE_LOG: &[&str] = &[
    "Input #0, mov,mp4,m4a,3gp,3g2,mj2, from 'input.mp4':",
    "  Duration: 00:00:30.00, start: 0.000000, bitrate: 1205 kb/s",
    "  Stream #0:0(und): Video: h264 (High) (avc1 / 0x31637661), yuv420p, 1280x720 [SAR 1:1 DAR 16:9], 1070 kb/s, 30 fps, 30 tbr, 15360 tbn (default)",
    "  Stream #0:1(und): Audio: aac (LC), 44100 Hz, stereo, fltp, 128 kb/s (default)",
];

/// 轉檔請求的摘要
#[derive(Debug, Clone, PartialEq)]
struct RecordedRequest {
    seek_offset: Option<f64>,
    clip_duration: Option<f64>,
    target_format: OutputFormat,
    video: Option<VideoOptions>,
}

#[derive(Debug, Default)]
struct EngineLog {
    extract_requests: Vec<f64>,
    transcode_requests: Vec<RecordedRequest>,
    releases: usize,
}

/// 依腳本回應的解碼／編碼引擎
struct ScriptedEngine {
    log: Rc<RefCell<EngineLog>>,
    probe_lines: Vec<String>,
    fail_extract_every: Option<usize>,
    cancel_after_extracts: Option<(usize, Arc<AtomicBool>)>,
    transcode_fails: bool,
}

impl ScriptedEngine {
    fn new(log: Rc<RefCell<EngineLog>>) -> Self {
        Self {
            log,
            probe_lines: PROBE_LOG.iter().map(ToString::to_string).collect(),
            fail_extract_every: None,
            cancel_after_extracts: None,
            transcode_fails: false,
        }
    }
}

impl MediaEngine for ScriptedEngine {
    fn probe(&mut self, _asset: &MediaAsset, on_message: &mut dyn FnMut(&str)) -> Result<()> {
        for line in &self.probe_lines {
            on_message(line);
        }
        Ok(())
    }

    fn extract_frame(&mut self, _asset: &MediaAsset, timestamp: f64) -> Result<Vec<u8>> {
        let mut log = self.log.borrow_mut();
        log.extract_requests.push(timestamp);
        let count = log.extract_requests.len();

        if let Some((limit, signal)) = &self.cancel_after_extracts {
            if count >= *limit {
                signal.store(true, Ordering::SeqCst);
            }
        }

        if self.fail_extract_every.is_some_and(|n| count % n == 0) {
            return Err(anyhow!("decode error at {timestamp}"));
        }
        Ok(vec![0xFF, 0xD8, count as u8])
    }

    fn transcode(
        &mut self,
        request: &ExportRequest<'_>,
        on_progress: &mut dyn FnMut(u64),
    ) -> Result<Vec<u8>> {
        self.log.borrow_mut().transcode_requests.push(RecordedRequest {
            seek_offset: request.seek_offset,
            clip_duration: request.clip_duration,
            target_format: request.target_format,
            video: request.video,
        });
        if self.transcode_fails {
            return Err(anyhow!("encoder exited with status 1"));
        }
        for frame in [0, 300, 600, 900] {
            on_progress(frame);
        }
        Ok(b"GIF89a".to_vec())
    }

    fn release_resources(&mut self) {
        self.log.borrow_mut().releases += 1;
    }
}

#[derive(Debug, Default)]
struct PlaybackLog {
    seeks: Vec<f64>,
    plays: usize,
    pauses: usize,
}

/// 手動推進時間的預覽播放
struct ScriptedPlayback {
    log: Rc<RefCell<PlaybackLog>>,
    time: f64,
    pending: Vec<PlaybackEvent>,
}

impl PlaybackEngine for ScriptedPlayback {
    fn current_time(&self) -> f64 {
        self.time
    }

    fn duration(&self) -> Option<f64> {
        Some(30.0)
    }

    fn play(&mut self) {
        self.log.borrow_mut().plays += 1;
        self.pending.push(PlaybackEvent::Play);
    }

    fn pause(&mut self) {
        self.log.borrow_mut().pauses += 1;
        self.pending.push(PlaybackEvent::Pause);
    }

    fn seek(&mut self, time: f64) {
        self.log.borrow_mut().seeks.push(time);
        self.time = time;
        self.pending.push(PlaybackEvent::Seeked);
    }

    fn supports_frame_callback(&self) -> bool {
        false
    }

    fn request_frame_callback(&mut self) {}

    fn poll_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.pending)
    }
}

fn asset() -> MediaAsset {
    MediaAsset::new("holiday.mp4", "video/mp4", vec![0; 64])
}

fn session_with(engine: ScriptedEngine) -> EditorSession {
    EditorSession::new(
        Box::new(engine),
        TrackSize::default(),
        Arc::new(AtomicBool::new(false)),
    )
}

/// 測試 1: 取樣後依裁剪範圍匯出
#[test]
fn test_sample_then_export_with_and_without_trim() {
    let log = Rc::new(RefCell::new(EngineLog::default()));
    let mut session = session_with(ScriptedEngine::new(Rc::clone(&log)));

    let mut published = Vec::new();
    let outcome = session.load_asset(asset(), |frame| published.push(frame.timestamp));

    let ProbeStatus::Ready(metadata) = session.probe_status() else {
        panic!("probe should succeed");
    };
    assert!((metadata.duration - 30.0).abs() < 1e-9);
    assert_eq!((metadata.width, metadata.height), (1280, 720));
    assert!((metadata.fps - 30.0).abs() < 1e-9);

    // 軌道 960x54 → 縮圖寬 96 → 11 張
    assert_eq!(outcome.attempted, 11);
    assert_eq!(outcome.extracted, 11);
    assert_eq!(session.thumbnails().len(), 11);
    assert_eq!(published.len(), 11);
    assert!(published.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(log.borrow().releases, 1);

    // 未裁剪：不帶任何覆寫
    let mut progress = Vec::new();
    let status = session
        .export(&ExportOptions::default(), |p| progress.push(p))
        .unwrap();
    let ExportStatus::Completed(file) = status else {
        panic!("export should complete");
    };
    assert_eq!(file.suggested_filename, "holiday.gif");
    assert_eq!(file.mime_type, "image/gif");
    assert_eq!(progress, vec![0, 33, 67, 100]);

    // 裁剪 5s ~ 15s
    let range = set_trim_seconds(&mut session, Some(5.0), Some(15.0));
    assert!((range.start.unwrap() - 5.0).abs() < 1e-6);
    assert!((range.stop.unwrap() - 15.0).abs() < 1e-6);

    session.export(&ExportOptions::default(), |_| {}).unwrap();

    let log = log.borrow();
    assert_eq!(log.transcode_requests.len(), 2);

    let first = &log.transcode_requests[0];
    assert_eq!(first.seek_offset, None);
    assert_eq!(first.clip_duration, None);
    assert_eq!(first.target_format, OutputFormat::Gif);
    assert_eq!(first.video, None);

    let second = &log.transcode_requests[1];
    assert!((second.seek_offset.unwrap() - 5.0).abs() < 1e-6);
    assert!((second.clip_duration.unwrap() - 10.0).abs() < 1e-6);
}

/// 測試 2: 動畫輸出帶入尺寸與幀率
#[test]
fn test_export_gif_with_video_options() {
    let log = Rc::new(RefCell::new(EngineLog::default()));
    let mut session = session_with(ScriptedEngine::new(Rc::clone(&log)));
    session.load_asset(asset(), |_| {});

    let size = FrameSize {
        width: 640,
        height: 360,
    };
    let options = ExportOptions {
        format: OutputFormat::Gif,
        size: Some(size),
        framerate: Some(15.0),
    };
    session.export(&options, |_| {}).unwrap();

    let webm = ExportOptions {
        format: OutputFormat::Webm,
        ..options
    };
    let status = session.export(&webm, |_| {}).unwrap();
    let ExportStatus::Completed(file) = status else {
        panic!("export should complete");
    };
    assert_eq!(file.suggested_filename, "holiday.webm");
    assert_eq!(file.mime_type, "video/webm");

    let log = log.borrow();
    assert_eq!(
        log.transcode_requests[0].video,
        Some(VideoOptions {
            size: Some(size),
            framerate: Some(15.0),
        })
    );
    assert_eq!(log.transcode_requests[1].video, None);
}

/// 測試 3: 個別縮圖失敗不中斷取樣
#[test]
fn test_failed_extractions_are_skipped() {
    let log = Rc::new(RefCell::new(EngineLog::default()));
    let mut engine = ScriptedEngine::new(Rc::clone(&log));
    engine.fail_extract_every = Some(3);
    let mut session = session_with(engine);

    let outcome = session.load_asset(asset(), |_| {});

    assert_eq!(outcome.attempted, 11);
    assert_eq!(outcome.extracted, 8);
    assert_eq!(session.thumbnails().len(), 8);
    assert_eq!(log.borrow().extract_requests.len(), 11);
}

/// 測試 4: 探測失敗時不能裁剪，但仍可匯出整支影片
#[test]
fn test_probe_failure_blocks_trim_but_not_export() {
    let log = Rc::new(RefCell::new(EngineLog::default()));
    let mut engine = ScriptedEngine::new(Rc::clone(&log));
    engine.probe_lines = vec!["garbage".to_string()];
    let mut session = session_with(engine);

    let outcome = session.load_asset(asset(), |_| {});
    assert!(outcome.metadata.is_none());
    assert_eq!(session.probe_status(), ProbeStatus::Failed);
    assert!(session.thumbnails().is_empty());
    assert!(log.borrow().extract_requests.is_empty());

    // 左把手在軌道最左邊
    assert_eq!(session.pointer_press(5.0), PressOutcome::Blocked);
    let range = set_trim_seconds(&mut session, Some(5.0), Some(10.0));
    assert!(range.is_unset());

    // 預設資訊不回報進度
    let mut progress = Vec::new();
    let status = session
        .export(&ExportOptions::default(), |p| progress.push(p))
        .unwrap();
    assert!(matches!(status, ExportStatus::Completed(_)));
    assert!(progress.is_empty());
}

/// 測試 5: 取樣中途取消，進行中的縮圖結果被丟棄
#[test]
fn test_cancel_during_sampling() {
    let log = Rc::new(RefCell::new(EngineLog::default()));
    let signal = Arc::new(AtomicBool::new(false));
    let mut engine = ScriptedEngine::new(Rc::clone(&log));
    engine.cancel_after_extracts = Some((3, Arc::clone(&signal)));

    let mut session = EditorSession::new(Box::new(engine), TrackSize::default(), signal);
    let outcome = session.load_asset(asset(), |_| {});

    assert!(outcome.cancelled);
    assert_eq!(log.borrow().extract_requests.len(), 3);
    assert_eq!(session.thumbnails().len(), 2);
    assert_eq!(log.borrow().releases, 0);
}

/// 測試 6: 轉檔失敗只影響這次匯出
#[test]
fn test_export_failure_keeps_editor_state() {
    let log = Rc::new(RefCell::new(EngineLog::default()));
    let mut engine = ScriptedEngine::new(Rc::clone(&log));
    engine.transcode_fails = true;
    let mut session = session_with(engine);
    session.load_asset(asset(), |_| {});
    set_trim_seconds(&mut session, Some(2.0), Some(8.0));

    let result = session.export(&ExportOptions::default(), |_| {});
    assert!(result.is_err());
    assert!(!session.is_exporting());

    let range = session.trim_range();
    assert!((range.start.unwrap() - 2.0).abs() < 1e-6);
    assert!(session.asset().is_some());
}

/// 測試 7: 預覽播放在裁剪範圍內循環
#[test]
fn test_preview_loops_inside_trim_range() {
    let log = Rc::new(RefCell::new(EngineLog::default()));
    let mut session = session_with(ScriptedEngine::new(Rc::clone(&log)));
    session.load_asset(asset(), |_| {});
    set_trim_seconds(&mut session, Some(10.0), Some(20.0));

    let playback_log = Rc::new(RefCell::new(PlaybackLog::default()));
    let playback = ScriptedPlayback {
        log: Rc::clone(&playback_log),
        time: 0.0,
        pending: Vec::new(),
    };
    session.attach_preview(Box::new(playback));
    assert_eq!(session.preview_status(), PreviewStatus::Available);

    // 目前位置在起點之前：先跳轉，跳轉完成後才播放
    assert_eq!(session.toggle_play(), ToggleOutcome::AwaitingSeek);
    assert_eq!(playback_log.borrow().plays, 0);
    session.pump_playback();
    assert_eq!(playback_log.borrow().plays, 1);
    session.pump_playback();
    assert!(session.playback_state().unwrap().playing);
    assert!((session.cursor_px().unwrap() - 320.0).abs() < 1e-3);

    // 點擊軌道中間（非把手處）跳到 15s
    let outcome = session.pointer_press(480.0);
    assert!(matches!(outcome, PressOutcome::Seek { .. }));
    assert!((playback_log.borrow().seeks.last().unwrap() - 15.0).abs() < 1e-9);
    session.pump_playback();
    assert!((session.playback_state().unwrap().current_time - 15.0).abs() < 1e-9);

    session.cancel();
    assert!(session.playback_state().is_none());
    assert_eq!(session.preview_status(), PreviewStatus::Unavailable);
}

/// 測試 8: 換新影片時丟棄前一支的狀態
#[test]
fn test_new_asset_discards_previous_state() {
    let log = Rc::new(RefCell::new(EngineLog::default()));
    let mut session = session_with(ScriptedEngine::new(Rc::clone(&log)));
    session.load_asset(asset(), |_| {});
    set_trim_seconds(&mut session, Some(3.0), Some(6.0));

    let playback = ScriptedPlayback {
        log: Rc::new(RefCell::new(PlaybackLog::default())),
        time: 0.0,
        pending: Vec::new(),
    };
    session.attach_preview(Box::new(playback));

    let metadata = session.probe_asset(MediaAsset::new("other.webm", "video/webm", vec![1; 8]));
    assert!(metadata.is_some());
    assert!(session.trim_range().is_unset());
    assert!(session.thumbnails().is_empty());
    assert!(session.playback_state().is_none());
    assert_eq!(session.asset().unwrap().file_name(), "other.webm");
}

/// 測試 9: 軌道寬度改變後，把手、游標與點擊跳轉都以新寬度換算
#[test]
fn test_track_resize_rescales_trim_and_cursor() {
    let log = Rc::new(RefCell::new(EngineLog::default()));
    let mut session = session_with(ScriptedEngine::new(Rc::clone(&log)));
    session.load_asset(asset(), |_| {});
    set_trim_seconds(&mut session, Some(10.0), Some(20.0));

    let playback_log = Rc::new(RefCell::new(PlaybackLog::default()));
    session.attach_preview(Box::new(ScriptedPlayback {
        log: Rc::clone(&playback_log),
        time: 0.0,
        pending: Vec::new(),
    }));
    session.toggle_play();
    session.pump_playback();
    assert!((session.cursor_px().unwrap() - 320.0).abs() < 1e-3);

    session.set_track_width(480.0);
    assert!((session.track().width_px - 480.0).abs() < 1e-9);
    assert!((session.cursor_px().unwrap() - 160.0).abs() < 1e-3);

    let geometry = session.trim_geometry();
    assert!((geometry.track_width_px - 480.0).abs() < 1e-9);
    assert!((geometry.left_px - 160.0).abs() < 1e-3);
    assert!((geometry.right_px - 320.0).abs() < 1e-3);

    // 裁剪範圍以秒為單位，不受寬度影響
    let range = session.trim_range();
    assert!((range.start.unwrap() - 10.0).abs() < 1e-3);
    assert!((range.stop.unwrap() - 20.0).abs() < 1e-3);

    let range = set_trim_seconds(&mut session, Some(5.0), Some(25.0));
    assert!((range.start.unwrap() - 5.0).abs() < 1e-3);
    assert!((range.stop.unwrap() - 25.0).abs() < 1e-3);

    let outcome = session.pointer_press(240.0);
    assert!(matches!(outcome, PressOutcome::Seek { .. }));
    assert!((playback_log.borrow().seeks.last().unwrap() - 15.0).abs() < 1e-9);
}
