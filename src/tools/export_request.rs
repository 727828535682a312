use crate::tools::{FrameSize, MediaAsset, OutputFormat};

/// 動畫輸出的影像設定
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VideoOptions {
    pub size: Option<FrameSize>,
    pub framerate: Option<f64>,
}

impl VideoOptions {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size.is_none() && self.framerate.is_none()
    }
}

/// 單次匯出請求，送出後不再變動
#[derive(Debug, Clone)]
pub struct ExportRequest<'a> {
    pub source: &'a MediaAsset,
    pub seek_offset: Option<f64>,
    pub clip_duration: Option<f64>,
    pub target_format: OutputFormat,
    pub video: Option<VideoOptions>,
}
