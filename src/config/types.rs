use crate::tools::OutputFormat;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

/// 最近使用路徑的保留數量
pub const MAX_RECENT_PATHS: usize = 10;

/// 來源格式與可轉換的輸出格式對照表
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatTable {
    /// MIME 類型 → 來源格式
    pub mime_types: HashMap<String, OutputFormat>,
    /// 副檔名（含 `.`）→ MIME 類型
    pub extensions: HashMap<String, String>,
    /// 來源格式 → 允許的輸出格式
    pub conversions: HashMap<OutputFormat, Vec<OutputFormat>>,
}

impl FormatTable {
    /// 依副檔名判斷 MIME 類型
    #[must_use]
    pub fn mime_for_path(&self, path: &Path) -> Option<&str> {
        let ext = path.extension()?.to_str()?;
        self.extensions
            .get(&format!(".{}", ext.to_lowercase()))
            .map(String::as_str)
    }

    #[must_use]
    pub fn is_supported(&self, mime_type: &str) -> bool {
        self.mime_types.contains_key(mime_type)
    }

    /// 此 MIME 類型可以轉換成的輸出格式；不支援的類型回傳空集合
    #[must_use]
    pub fn allowed_formats(&self, mime_type: &str) -> Vec<OutputFormat> {
        self.mime_types
            .get(mime_type)
            .and_then(|source| self.conversions.get(source))
            .cloned()
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en-US")]
    EnUs,
    #[serde(rename = "zh-TW")]
    ZhTw,
}

impl Language {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EnUs => "en-US",
            Self::ZhTw => "zh-TW",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EnUs => write!(f, "English"),
            Self::ZhTw => write!(f, "繁體中文"),
        }
    }
}

/// 時間軸軌道的虛擬尺寸（像素）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackSize {
    pub width_px: f64,
    pub height_px: f64,
}

impl Default for TrackSize {
    fn default() -> Self {
        Self {
            width_px: 960.0,
            height_px: 54.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub language: Language,
    /// 匯出檔案存放的資料夾
    pub output_directory: String,
    pub default_format: OutputFormat,
    pub track: TrackSize,
    pub recent_paths: Vec<String>,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            language: Language::default(),
            output_directory: "output".to_string(),
            default_format: OutputFormat::default(),
            track: TrackSize::default(),
            recent_paths: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub format_table: FormatTable,
    pub settings: UserSettings,
}
