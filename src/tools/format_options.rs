//! 輸出格式、尺寸與幀率選項

use serde::{Deserialize, Serialize};
use std::fmt;

/// 可供選擇的輸出幀率（低於原始幀率者）
const CANDIDATE_FRAMERATES: [f64; 4] = [15.0, 24.0, 25.0, 30.0];

/// 輸出尺寸的縮小倍率
const SIZE_DIVISORS: [f64; 5] = [1.0, 1.5, 2.0, 2.5, 3.0];

/// 輸出寬度下限（不含）
const MIN_OUTPUT_WIDTH: u32 = 200;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Avi,
    #[default]
    Gif,
    Wmv,
    Ogg,
    Mov,
    Webm,
    Mp4,
}

impl OutputFormat {
    pub const ALL: [Self; 7] = [
        Self::Gif,
        Self::Mp4,
        Self::Webm,
        Self::Mov,
        Self::Avi,
        Self::Wmv,
        Self::Ogg,
    ];

    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Avi => "avi",
            Self::Gif => "gif",
            Self::Wmv => "wmv",
            Self::Ogg => "ogg",
            Self::Mov => "mov",
            Self::Webm => "webm",
            Self::Mp4 => "mp4",
        }
    }

    #[must_use]
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Avi => "video/avi",
            Self::Gif => "image/gif",
            Self::Wmv => "video/x-ms-wmv",
            Self::Ogg => "audio/ogg",
            Self::Mov => "video/quicktime",
            Self::Webm => "video/webm",
            Self::Mp4 => "video/mp4",
        }
    }

    /// 動畫圖片輸出，才適用尺寸與幀率設定
    #[must_use]
    pub const fn is_animated(self) -> bool {
        matches!(self, Self::Gif)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension().to_uppercase())
    }
}

/// 輸出影像尺寸
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl fmt::Display for FrameSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// 列出可選的輸出幀率：低於原始幀率的候選值，加上原始幀率本身（不取整）
#[must_use]
pub fn available_framerates(source_fps: f64) -> Vec<f64> {
    let mut rates: Vec<f64> = CANDIDATE_FRAMERATES
        .iter()
        .copied()
        .filter(|&f| f < source_fps)
        .collect();
    rates.push(source_fps);
    rates
}

/// 列出可選的輸出尺寸：原始尺寸依倍率縮小，只保留寬度大於 200 者
#[must_use]
pub fn available_sizes(width: u32, height: u32) -> Vec<FrameSize> {
    SIZE_DIVISORS
        .iter()
        .map(|m| FrameSize {
            width: (f64::from(width) / m).round() as u32,
            height: (f64::from(height) / m).round() as u32,
        })
        .filter(|size| size.width > MIN_OUTPUT_WIDTH)
        .collect()
}

/// 建議的輸出檔名：原檔名第一個 `.` 之前的部分加上新副檔名
#[must_use]
pub fn suggested_filename(source_file_name: &str, format: OutputFormat) -> String {
    let stem = source_file_name
        .split('.')
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or("output");
    format!("{stem}.{}", format.extension())
}
