use crate::tools::{ExportRequest, MediaAsset, MediaEngine};
use anyhow::{Context, Result, anyhow, bail};
use log::{debug, info, warn};
use std::fs;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use tempfile::TempDir;
use uuid::Uuid;

/// 兩段式 seek 的前置緩衝時間（秒）
const SEEK_MARGIN: f64 = 2.0;

/// 時間軸縮圖高度
pub const THUMBNAIL_HEIGHT: u32 = 180;

/// 以 `ffmpeg` 執行檔實作的引擎
///
/// 影片內容寫入暫存資料夾後再交給 ffmpeg 處理，暫存資料夾在引擎釋放時一併刪除
pub struct FfmpegEngine {
    binary: PathBuf,
    scratch: TempDir,
    staged_input: Option<(Uuid, PathBuf)>,
}

impl FfmpegEngine {
    /// 使用 `PATH` 中的 ffmpeg
    pub fn new() -> Result<Self> {
        Self::with_binary("ffmpeg")
    }

    /// 使用指定路徑的 ffmpeg；無法執行時回傳錯誤，編輯器不應開啟
    pub fn with_binary(binary: impl Into<PathBuf>) -> Result<Self> {
        let binary = binary.into();

        let output = Command::new(&binary)
            .args(["-hide_banner", "-version"])
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("找不到 ffmpeg 引擎: {}", binary.display()))?;

        if !output.status.success() {
            bail!("ffmpeg 引擎無法使用: {}", binary.display());
        }

        let version = String::from_utf8_lossy(&output.stdout);
        info!(
            "ffmpeg 引擎就緒: {}",
            version.lines().next().unwrap_or("unknown version")
        );

        let scratch = TempDir::new().context("無法建立引擎暫存資料夾")?;

        Ok(Self {
            binary,
            scratch,
            staged_input: None,
        })
    }

    /// 將影片寫入暫存資料夾，同一支影片只寫一次
    fn stage_input(&mut self, asset: &MediaAsset) -> Result<PathBuf> {
        if let Some((id, path)) = &self.staged_input {
            if *id == asset.id() && path.exists() {
                return Ok(path.clone());
            }
        }

        let path = self.scratch.path().join(format!("input_{}", asset.id()));
        fs::write(&path, asset.bytes())
            .with_context(|| format!("無法寫入暫存影片: {}", path.display()))?;
        debug!("影片已寫入暫存: {}", path.display());

        self.staged_input = Some((asset.id(), path.clone()));
        Ok(path)
    }

    fn scratch_file(&self, name: &str) -> PathBuf {
        self.scratch.path().join(name)
    }
}

impl MediaEngine for FfmpegEngine {
    fn probe(&mut self, asset: &MediaAsset, on_message: &mut dyn FnMut(&str)) -> Result<()> {
        let input = self.stage_input(asset)?;

        // 沒有指定輸出，ffmpeg 會以非零狀態結束，但影片資訊已輸出到 stderr
        let output = Command::new(&self.binary)
            .args(["-hide_banner", "-nostdin", "-i"])
            .arg(&input)
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("無法執行 ffmpeg 探測: {}", asset.file_name()))?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        for line in stderr.lines() {
            on_message(line);
        }

        Ok(())
    }

    fn extract_frame(&mut self, asset: &MediaAsset, timestamp: f64) -> Result<Vec<u8>> {
        let input = self.stage_input(asset)?;
        let output_path = self.scratch_file("frame.jpg");
        if output_path.exists() {
            fs::remove_file(&output_path)?;
        }

        let args = build_frame_args(&input, timestamp, &output_path);
        let output = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("無法執行 ffmpeg 擷取影格: {timestamp:.3}s"))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("ffmpeg 擷取影格失敗: {}", stderr.trim());
        }

        if !output_path.exists() {
            bail!("影格檔案未建立: {timestamp:.3}s");
        }

        let bytes = fs::read(&output_path)
            .with_context(|| format!("無法讀取影格檔案: {}", output_path.display()))?;
        let _ = fs::remove_file(&output_path);
        Ok(bytes)
    }

    fn transcode(
        &mut self,
        request: &ExportRequest<'_>,
        on_progress: &mut dyn FnMut(u64),
    ) -> Result<Vec<u8>> {
        let input = self.stage_input(request.source)?;
        let output_path = self.scratch_file(&format!(
            "export_{}.{}",
            Uuid::new_v4(),
            request.target_format.extension()
        ));

        let args = build_transcode_args(request, &input, &output_path);
        debug!("ffmpeg 轉檔參數: {}", args.join(" "));

        let mut child = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .context("無法啟動 ffmpeg 轉檔")?;

        // stderr 必須與 stdout 同時讀取，管線塞滿時 ffmpeg 會停在寫入
        let stderr_reader = child.stderr.take().map(|mut stderr| {
            thread::spawn(move || {
                let mut buffer = Vec::new();
                let _ = stderr.read_to_end(&mut buffer);
                buffer
            })
        });

        // 從 -progress 輸出讀取已處理的影格數
        if let Some(stdout) = child.stdout.take() {
            for line in BufReader::new(stdout).lines().map_while(std::result::Result::ok) {
                if let Some(("frame", value)) = line.trim().split_once('=') {
                    if let Ok(frame) = value.trim().parse::<u64>() {
                        on_progress(frame);
                    }
                }
            }
        }

        let status = child.wait().context("等待 ffmpeg 轉檔結束失敗")?;
        let stderr = match stderr_reader {
            Some(handle) => handle
                .join()
                .map_err(|_| anyhow!("讀取 ffmpeg 錯誤輸出的執行緒異常結束"))?,
            None => Vec::new(),
        };

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr);
            let _ = fs::remove_file(&output_path);
            bail!("ffmpeg 轉檔失敗: {}", stderr.trim());
        }

        let bytes = fs::read(&output_path)
            .with_context(|| format!("無法讀取轉檔結果: {}", output_path.display()))?;
        let _ = fs::remove_file(&output_path);
        Ok(bytes)
    }

    fn release_resources(&mut self) {
        if let Some((_, path)) = self.staged_input.take() {
            if let Err(e) = fs::remove_file(&path) {
                warn!("無法刪除暫存影片 {}: {}", path.display(), e);
            }
        }
        let _ = fs::remove_file(self.scratch_file("frame.jpg"));
        debug!("引擎暫存資源已釋放");
    }
}

/// 擷取單張影格的參數（兩段式 seek）
///
/// 1. `-ss` 在 `-i` 前：快速跳轉到最近的關鍵幀
/// 2. `-ss` 在 `-i` 後：精準解碼到目標時間點
fn build_frame_args(input: &Path, timestamp: f64, output: &Path) -> Vec<String> {
    let t0 = (timestamp - SEEK_MARGIN).max(0.0);
    let delta = timestamp - t0;

    let mut args = vec![
        "-hide_banner".to_string(),
        "-nostdin".to_string(),
        "-loglevel".to_string(),
        "error".to_string(),
    ];

    if t0 > 0.0 {
        args.push("-ss".to_string());
        args.push(format!("{t0:.3}"));
    }

    args.push("-i".to_string());
    args.push(input.to_string_lossy().to_string());

    if delta > 0.0 {
        args.push("-ss".to_string());
        args.push(format!("{delta:.3}"));
    }

    args.extend([
        "-frames:v".to_string(),
        "1".to_string(),
        "-an".to_string(),
        "-sn".to_string(),
        "-dn".to_string(),
        "-vf".to_string(),
        format!("scale=-2:{THUMBNAIL_HEIGHT}"),
        "-q:v".to_string(),
        "2".to_string(),
        "-y".to_string(),
        output.to_string_lossy().to_string(),
    ]);

    args
}

/// 轉檔參數
fn build_transcode_args(request: &ExportRequest<'_>, input: &Path, output: &Path) -> Vec<String> {
    let mut args = vec![
        "-hide_banner".to_string(),
        "-nostdin".to_string(),
        "-loglevel".to_string(),
        "error".to_string(),
        "-progress".to_string(),
        "pipe:1".to_string(),
        "-nostats".to_string(),
    ];

    if let Some(seek) = request.seek_offset {
        args.push("-ss".to_string());
        args.push(format!("{seek:.3}"));
    }

    args.push("-i".to_string());
    args.push(input.to_string_lossy().to_string());

    if let Some(duration) = request.clip_duration {
        args.push("-t".to_string());
        args.push(format!("{duration:.3}"));
    }

    if let Some(video) = request.video {
        if let Some(size) = video.size {
            args.push("-vf".to_string());
            args.push(format!("scale={}:{}", size.width, size.height));
        }
        if let Some(framerate) = video.framerate {
            args.push("-r".to_string());
            args.push(framerate.to_string());
        }
    }

    args.push("-y".to_string());
    args.push(output.to_string_lossy().to_string());
    args
}
