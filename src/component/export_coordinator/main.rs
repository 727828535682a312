use crate::component::trim_selector::TrimRange;
use crate::tools::{
    AssetMetadata, ExportRequest, FrameSize, MediaAsset, MediaEngine, OutputFormat, VideoOptions,
    suggested_filename,
};
use anyhow::{Result, bail};
use log::{debug, error, info};
use std::sync::atomic::{AtomicBool, Ordering};

/// 使用者選擇的輸出選項
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ExportOptions {
    pub format: OutputFormat,
    pub size: Option<FrameSize>,
    pub framerate: Option<f64>,
}

/// 轉檔完成的檔案
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub bytes: Vec<u8>,
    pub suggested_filename: String,
    pub mime_type: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportStatus {
    Completed(ExportedFile),
    /// 已有匯出進行中，這次請求被忽略
    Busy,
}

/// 依裁剪範圍與輸出選項建立匯出請求
///
/// 只有設定了起點才加上 `seek_offset`；設定了終點時長度為 `stop - (start ?? 0)`。
/// 尺寸與幀率只用於動畫輸出，兩者皆未指定時不帶影像設定。
#[must_use]
pub fn build_request<'a>(
    source: &'a MediaAsset,
    trim: &TrimRange,
    options: &ExportOptions,
) -> ExportRequest<'a> {
    let video = VideoOptions {
        size: options.size,
        framerate: options.framerate,
    };

    ExportRequest {
        source,
        seek_offset: trim.start,
        clip_duration: trim.stop.map(|stop| stop - trim.start_or_zero()),
        target_format: options.format,
        video: (options.format.is_animated() && !video.is_empty()).then_some(video),
    }
}

/// 匯出協調器
#[derive(Debug, Default)]
pub struct ExportCoordinator {
    busy: AtomicBool,
}

/// 離開作用域時清除忙碌旗標
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl ExportCoordinator {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            busy: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// 執行匯出
    ///
    /// `on_progress` 收到 0–100 的百分比，只在影片資訊已知時才會呼叫。
    /// 任何階段失敗都放棄整次匯出，不回傳部分結果。
    pub fn export(
        &self,
        engine: &mut dyn MediaEngine,
        asset: &MediaAsset,
        metadata: &AssetMetadata,
        trim: &TrimRange,
        options: &ExportOptions,
        mut on_progress: impl FnMut(u8),
    ) -> Result<ExportStatus> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("匯出進行中，忽略新的匯出請求");
            return Ok(ExportStatus::Busy);
        }
        let _guard = BusyGuard(&self.busy);

        let request = build_request(asset, trim, options);
        info!(
            "開始匯出 {} → {} (seek: {:?}, duration: {:?})",
            asset.file_name(),
            options.format,
            request.seek_offset,
            request.clip_duration
        );

        let report_progress = metadata.is_known();
        let total_frames = metadata.total_frames();
        let mut forward_progress = |frame: u64| {
            if report_progress && total_frames > 0.0 {
                let percent = (frame as f64 * 100.0 / total_frames).round().clamp(0.0, 100.0);
                on_progress(percent as u8);
            }
        };

        let bytes = match engine.transcode(&request, &mut forward_progress) {
            Ok(bytes) => bytes,
            Err(e) => {
                error!("匯出失敗 {}: {e:#}", asset.file_name());
                return Err(e);
            }
        };

        if bytes.is_empty() {
            error!("匯出失敗 {}: 引擎沒有輸出任何資料", asset.file_name());
            bail!("轉檔結果為空");
        }

        let file = ExportedFile {
            bytes,
            suggested_filename: suggested_filename(asset.file_name(), options.format),
            mime_type: options.format.mime_type(),
        };
        info!(
            "匯出完成: {} ({} bytes)",
            file.suggested_filename,
            file.bytes.len()
        );

        Ok(ExportStatus::Completed(file))
    }
}
