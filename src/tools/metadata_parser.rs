//! 影片資訊狀態訊息解析
//!
//! 引擎以逐行文字回報影片資訊，解析器只負責從中取出長度、解析度與幀率。
//! 引擎輸出格式改變時只需替換 `StatusParser` 實作。

use crate::tools::AssetMetadata;
use log::debug;
use regex::Regex;
use std::sync::LazyLock;

static REGEX_DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Duration:\s*(\d+):(\d{1,2}):(\d{1,2}(?:\.\d+)?)").expect("Invalid regex")
});

static REGEX_FRAME_SIZE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)x(\d+)(?:\s|$)").expect("Invalid regex"));

/// 第一條串流的標記
const FIRST_STREAM_MARKER: &str = "Stream #0:0";

/// 狀態訊息解析器
pub trait StatusParser {
    /// 餵入一行訊息；資訊已齊全後的訊息會被忽略
    fn feed(&mut self, line: &str);

    /// 長度、解析度與幀率都已取得
    fn is_complete(&self) -> bool;

    /// 是否取得影片長度（探測成功的最低條件）
    fn has_duration(&self) -> bool;

    /// 目前解析到的資訊，缺少的欄位維持預設值
    fn metadata(&self) -> AssetMetadata;
}

/// 解析 ffmpeg 的 `-i` 輸出
#[derive(Debug, Default)]
pub struct FfmpegLogParser {
    metadata: AssetMetadata,
    duration_found: bool,
    stream_found: bool,
}

impl FfmpegLogParser {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn parse_duration_line(&mut self, line: &str) {
        if let Some(seconds) = parse_duration(line).filter(|&s| s > 0.0) {
            debug!("解析到影片長度: {seconds:.3}s");
            self.metadata.duration = seconds;
            self.duration_found = true;
        }
    }

    fn parse_stream_line(&mut self, line: &str) {
        let mut size = None;
        let mut fps = None;

        for token in line.split(',').map(str::trim) {
            if size.is_none() {
                size = parse_frame_size(token);
            }
            if fps.is_none() {
                fps = parse_fps(token);
            }
        }

        if let Some((width, height)) = size {
            self.metadata.width = width;
            self.metadata.height = height;
        }
        if let Some(fps) = fps {
            self.metadata.fps = fps;
        }

        if size.is_some() || fps.is_some() {
            debug!("解析到串流資訊: size={size:?}, fps={fps:?}");
            self.stream_found = true;
        }
    }
}

impl StatusParser for FfmpegLogParser {
    fn feed(&mut self, line: &str) {
        if self.is_complete() {
            return;
        }

        if !self.duration_found && line.contains("Duration:") {
            self.parse_duration_line(line);
        } else if !self.stream_found && line.contains(FIRST_STREAM_MARKER) {
            self.parse_stream_line(line);
        }
    }

    fn is_complete(&self) -> bool {
        self.duration_found && self.stream_found
    }

    fn has_duration(&self) -> bool {
        self.duration_found
    }

    fn metadata(&self) -> AssetMetadata {
        self.metadata
    }
}

/// 解析 `Duration: HH:MM:SS.ms` 為總秒數
fn parse_duration(line: &str) -> Option<f64> {
    let caps = REGEX_DURATION.captures(line)?;
    let hours: f64 = caps.get(1)?.as_str().parse().ok()?;
    let minutes: f64 = caps.get(2)?.as_str().parse().ok()?;
    let seconds: f64 = caps.get(3)?.as_str().parse().ok()?;
    Some(hours * 3600.0 + minutes * 60.0 + seconds)
}

/// 解析 `1280x720 [SAR 1:1 DAR 16:9]` 形式的解析度
fn parse_frame_size(token: &str) -> Option<(u32, u32)> {
    let caps = REGEX_FRAME_SIZE.captures(token)?;
    let width: u32 = caps.get(1)?.as_str().parse().ok()?;
    let height: u32 = caps.get(2)?.as_str().parse().ok()?;
    (width > 0 && height > 0).then_some((width, height))
}

/// 解析 `29.97 fps` 形式的幀率
fn parse_fps(token: &str) -> Option<f64> {
    let value = token.strip_suffix("fps")?.trim();
    value.parse::<f64>().ok().filter(|f| *f > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_LOG: &str = "\
Input #0, mov,mp4,m4a,3gp,3g2,mj2, from 'probe':
  Metadata:
    major_brand     : isom
  Duration: 00:01:30.50, start: 0.000000, bitrate: 2500 kb/s
  Stream #0:0[0x1](und): Video: h264 (High) (avc1 / 0x31637661), yuv420p(tv, bt709, progressive), 1280x720 [SAR 1:1 DAR 16:9], 2362 kb/s, 29.97 fps, 29.97 tbr, 30k tbn (default)
  Stream #0:1[0x2](und): Audio: aac (LC) (mp4a / 0x6134706D), 48000 Hz, stereo, fltp, 128 kb/s (default)
At least one output file must be specified";

    fn parse_all(log: &str) -> FfmpegLogParser {
        let mut parser = FfmpegLogParser::new();
        for line in log.lines() {
            parser.feed(line);
        }
        parser
    }

    #[test]
    fn test_parse_full_log() {
        let parser = parse_all(SAMPLE_LOG);
        assert!(parser.is_complete());

        let meta = parser.metadata();
        assert!((meta.duration - 90.5).abs() < 0.001);
        assert_eq!(meta.width, 1280);
        assert_eq!(meta.height, 720);
        assert!((meta.fps - 29.97).abs() < 0.001);
    }

    #[test]
    fn test_parse_duration_hours() {
        let hours = parse_duration("  Duration: 01:02:03.25, start").unwrap();
        assert!((hours - 3723.25).abs() < 0.001);
        assert!((parse_duration("Duration: 00:00:07, bitrate").unwrap() - 7.0).abs() < 0.001);
        assert!(parse_duration("Duration: N/A, start: 0.0").is_none());
    }

    #[test]
    fn test_hex_codec_tag_is_not_a_frame_size() {
        assert!(parse_frame_size("Video: h264 (High) (avc1 / 0x31637661)").is_none());
        assert_eq!(parse_frame_size("640x360 [SAR 1:1 DAR 16:9]"), Some((640, 360)));
        assert_eq!(parse_frame_size("1920x1080"), Some((1920, 1080)));
    }

    #[test]
    fn test_parse_fps_token() {
        assert!((parse_fps("25 fps").unwrap() - 25.0).abs() < 0.001);
        assert!(parse_fps("25 tbr").is_none());
        assert!(parse_fps("abc fps").is_none());
    }

    #[test]
    fn test_malformed_fields_keep_defaults() {
        let parser = parse_all("  Duration: N/A\n  Stream #0:0: Video: rawvideo, unknown");
        assert!(!parser.has_duration());
        assert!(!parser.is_complete());
        assert_eq!(parser.metadata(), AssetMetadata::default());
    }

    #[test]
    fn test_audio_only_stream_leaves_size_default() {
        let parser = parse_all(
            "  Duration: 00:00:12.00, start: 0\n  Stream #0:0: Audio: vorbis, 44100 Hz, stereo, fltp",
        );
        assert!(parser.has_duration());
        let meta = parser.metadata();
        assert!((meta.duration - 12.0).abs() < 0.001);
        assert_eq!(meta.width, 1);
        assert!((meta.fps - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_lines_after_completion_are_ignored() {
        let mut parser = parse_all(SAMPLE_LOG);
        parser.feed("  Duration: 00:00:01.00, start: 0");
        parser.feed("  Stream #0:0: Video: vp9, 320x240, 5 fps");
        let meta = parser.metadata();
        assert!((meta.duration - 90.5).abs() < 0.001);
        assert_eq!(meta.width, 1280);
    }
}
