use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;
use uuid::Uuid;

/// 編輯工作階段中載入的原始影片
///
/// 由主程式持有，核心元件只讀取內容
#[derive(Debug, Clone)]
pub struct MediaAsset {
    id: Uuid,
    file_name: String,
    mime_type: String,
    bytes: Vec<u8>,
}

impl MediaAsset {
    #[must_use]
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            id: Uuid::new_v4(),
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// 從磁碟讀取影片檔案
    pub fn load(path: &Path, mime_type: &str) -> Result<Self> {
        if !path.is_file() {
            bail!("檔案不存在: {}", path.display());
        }

        let bytes =
            fs::read(path).with_context(|| format!("無法讀取影片檔案: {}", path.display()))?;
        if bytes.is_empty() {
            bail!("影片檔案是空的: {}", path.display());
        }

        let file_name = path
            .file_name()
            .map_or_else(|| "video".to_string(), |s| s.to_string_lossy().to_string());

        Ok(Self::new(file_name, mime_type, bytes))
    }

    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// 探測得到的影片資訊
///
/// 探測完成前維持預設值 `{1, 1, 1, 1}`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssetMetadata {
    pub duration: f64,
    pub width: u32,
    pub height: u32,
    pub fps: f64,
}

impl Default for AssetMetadata {
    fn default() -> Self {
        Self {
            duration: 1.0,
            width: 1,
            height: 1,
            fps: 1.0,
        }
    }
}

impl AssetMetadata {
    /// 長度與幀率都已脫離預設值
    #[must_use]
    pub fn is_known(&self) -> bool {
        self.duration > 1.0 && self.fps > 1.0
    }

    /// 估計總幀數
    #[must_use]
    pub fn total_frames(&self) -> f64 {
        (self.duration * self.fps).round()
    }
}
