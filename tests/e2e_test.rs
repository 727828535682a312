//! E2E Integration Tests
//!
//! 以真正的 ffmpeg 執行探測、縮圖取樣與匯出；找不到 ffmpeg 時跳過

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use clip_trimmer::component::{EditorSession, ExportOptions, ExportStatus, ProbeStatus};
use clip_trimmer::config::{Config, TrackSize};
use clip_trimmer::menu::{load_media_asset, save_exported_file, set_trim_seconds};
use clip_trimmer::tools::{FfmpegEngine, FrameSize, OutputFormat};
use tempfile::TempDir;

/// 以 lavfi 產生 4 秒、320x240、10 fps 的測試影片
fn generate_test_video(dir: &Path) -> Option<PathBuf> {
    let path = dir.join("sample.mp4");
    let status = Command::new("ffmpeg")
        .args([
            "-hide_banner",
            "-loglevel",
            "error",
            "-f",
            "lavfi",
            "-i",
            "testsrc=duration=4:size=320x240:rate=10",
            "-pix_fmt",
            "yuv420p",
            "-y",
        ])
        .arg(&path)
        .stdin(Stdio::null())
        .status()
        .ok()?;

    (status.success() && path.exists()).then_some(path)
}

/// 建立工作階段並載入測試影片；環境不支援時回傳 `None`
fn open_session(dir: &Path) -> Option<(EditorSession, PathBuf)> {
    let Ok(engine) = FfmpegEngine::new() else {
        println!("跳過測試：找不到 ffmpeg");
        return None;
    };
    let Some(video) = generate_test_video(dir) else {
        println!("跳過測試：無法產生測試影片");
        return None;
    };

    let session = EditorSession::new(
        Box::new(engine),
        TrackSize {
            width_px: 640.0,
            height_px: 54.0,
        },
        Arc::new(AtomicBool::new(false)),
    );
    Some((session, video))
}

/// 測試 1: 探測與縮圖取樣
#[test]
fn test_probe_and_sample_e2e() {
    let dir = TempDir::new().unwrap();
    let Some((mut session, video)) = open_session(dir.path()) else {
        return;
    };

    let config = Config::new().unwrap();
    let asset = load_media_asset(&config, &video).unwrap();
    assert_eq!(asset.mime_type(), "video/mp4");

    let outcome = session.load_asset(asset, |_| {});

    let ProbeStatus::Ready(metadata) = session.probe_status() else {
        panic!("ffmpeg 應該能探測測試影片");
    };
    println!(
        "影片資訊: {:.2}s, {}x{}, {:.2} fps",
        metadata.duration, metadata.width, metadata.height, metadata.fps
    );
    assert!((metadata.duration - 4.0).abs() < 0.2);
    assert_eq!((metadata.width, metadata.height), (320, 240));
    assert!((metadata.fps - 10.0).abs() < 0.01);

    // 640 / 96 → round(6.67) + 1 = 8
    assert_eq!(outcome.attempted, 8);
    assert!(outcome.extracted > 0, "應該至少擷取一張縮圖");
    for frame in session.thumbnails() {
        assert_eq!(&frame.thumbnail[..2], &[0xFF, 0xD8], "縮圖應為 JPEG");
    }

    println!("✓ 探測與取樣測試通過");
}

/// 測試 2: 裁剪後匯出 GIF
#[test]
fn test_trimmed_gif_export_e2e() {
    let dir = TempDir::new().unwrap();
    let Some((mut session, video)) = open_session(dir.path()) else {
        return;
    };

    let config = Config::new().unwrap();
    session.load_asset(load_media_asset(&config, &video).unwrap(), |_| {});
    let range = set_trim_seconds(&mut session, Some(1.0), Some(3.0));
    assert!(range.start.is_some() && range.stop.is_some());

    let options = ExportOptions {
        format: OutputFormat::Gif,
        size: Some(FrameSize {
            width: 213,
            height: 160,
        }),
        framerate: Some(5.0),
    };

    let mut progress = Vec::new();
    let status = session.export(&options, |p| progress.push(p)).unwrap();
    let ExportStatus::Completed(file) = status else {
        panic!("匯出應該完成");
    };

    assert!(file.bytes.starts_with(b"GIF8"), "輸出應為 GIF");
    assert_eq!(file.suggested_filename, "sample.gif");
    assert!(progress.iter().all(|&p| p <= 100));

    let saved = save_exported_file(&dir.path().join("output"), &file).unwrap();
    assert!(saved.exists());

    println!("✓ GIF 匯出測試通過: {}", saved.display());
}

/// 測試 3: 整支影片轉成 AVI
#[test]
fn test_whole_asset_avi_export_e2e() {
    let dir = TempDir::new().unwrap();
    let Some((mut session, video)) = open_session(dir.path()) else {
        return;
    };

    let config = Config::new().unwrap();
    session.probe_asset(load_media_asset(&config, &video).unwrap());

    let options = ExportOptions {
        format: OutputFormat::Avi,
        ..ExportOptions::default()
    };
    let status = session.export(&options, |_| {}).unwrap();
    let ExportStatus::Completed(file) = status else {
        panic!("匯出應該完成");
    };

    assert!(file.bytes.starts_with(b"RIFF"), "輸出應為 AVI");
    assert_eq!(file.mime_type, "video/avi");
    assert_eq!(file.suggested_filename, "sample.avi");

    println!("✓ AVI 匯出測試通過");
}

/// 測試 4: 引擎不存在時無法開啟編輯器
#[test]
fn test_missing_engine_is_rejected() {
    let result = FfmpegEngine::with_binary("/nonexistent/bin/ffmpeg");
    assert!(result.is_err());
}
