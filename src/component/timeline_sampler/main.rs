use super::thumbnail_layout::ThumbnailLayout;
use crate::config::TrackSize;
use crate::tools::{AssetMetadata, FfmpegLogParser, MediaAsset, MediaEngine, StatusParser};
use log::{debug, info, warn};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// 時間軸上的一張縮圖
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineFrame {
    pub timestamp: f64,
    pub thumbnail: Vec<u8>,
}

/// 取樣過程中依序發布的事件
#[derive(Debug, Clone, PartialEq)]
pub enum SamplerEvent {
    MetadataReady(AssetMetadata),
    Frame(TimelineFrame),
}

/// 單次取樣的結果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SamplerOutcome {
    /// 探測失敗時為 `None`，此時不會進行取樣
    pub metadata: Option<AssetMetadata>,
    pub attempted: usize,
    pub extracted: usize,
    pub cancelled: bool,
}

/// 時間軸縮圖取樣器
///
/// 兩個階段：
/// A. 探測影片資訊
/// B. 依軌道大小均勻擷取縮圖
///
/// 每支影片只執行一次；取消後不會自動重新開始
pub struct TimelineSampler {
    cancel_signal: Arc<AtomicBool>,
}

impl TimelineSampler {
    pub const fn new(cancel_signal: Arc<AtomicBool>) -> Self {
        Self { cancel_signal }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel_signal.load(Ordering::SeqCst)
    }

    /// 以 ffmpeg 訊息格式解析探測結果
    pub fn run(
        &self,
        engine: &mut dyn MediaEngine,
        asset: &MediaAsset,
        track: TrackSize,
        publish: impl FnMut(SamplerEvent),
    ) -> SamplerOutcome {
        self.run_with_parser(engine, asset, track, FfmpegLogParser::new(), publish)
    }

    pub fn run_with_parser(
        &self,
        engine: &mut dyn MediaEngine,
        asset: &MediaAsset,
        track: TrackSize,
        parser: impl StatusParser,
        mut publish: impl FnMut(SamplerEvent),
    ) -> SamplerOutcome {
        let mut outcome = SamplerOutcome::default();

        if self.is_cancelled() {
            outcome.cancelled = true;
            return outcome;
        }

        // Stage A: 探測影片資訊
        let metadata = probe_metadata(engine, asset, parser);
        if self.is_cancelled() {
            debug!("取樣已取消，丟棄探測結果");
            outcome.cancelled = true;
            return outcome;
        }

        let Some(metadata) = metadata else {
            warn!("無法取得影片資訊，略過縮圖取樣: {}", asset.file_name());
            engine.release_resources();
            return outcome;
        };

        info!(
            "影片資訊: {:.2}s, {}x{}, {:.2} fps",
            metadata.duration, metadata.width, metadata.height, metadata.fps
        );
        outcome.metadata = Some(metadata);
        publish(SamplerEvent::MetadataReady(metadata));

        // Stage B: 擷取縮圖
        let layout = ThumbnailLayout::compute(track.width_px, track.height_px, metadata.duration);
        debug!(
            "縮圖配置: count={}, step={:.3}s",
            layout.count, layout.step
        );

        for timestamp in layout.timestamps() {
            if self.is_cancelled() {
                outcome.cancelled = true;
                return outcome;
            }

            outcome.attempted += 1;
            let result = engine.extract_frame(asset, timestamp);

            if self.is_cancelled() {
                debug!("取樣已取消，丟棄 {timestamp:.3}s 的縮圖");
                outcome.cancelled = true;
                return outcome;
            }

            match result {
                Ok(thumbnail) => {
                    outcome.extracted += 1;
                    publish(SamplerEvent::Frame(TimelineFrame {
                        timestamp,
                        thumbnail,
                    }));
                }
                Err(e) => debug!("略過 {timestamp:.3}s 的縮圖: {e}"),
            }
        }

        engine.release_resources();

        info!(
            "縮圖取樣完成 - 成功: {}, 略過: {}",
            outcome.extracted,
            outcome.attempted - outcome.extracted
        );

        outcome
    }
}

/// 探測影片資訊；探測失敗或取不到長度時回傳 `None`
pub fn probe_metadata(
    engine: &mut dyn MediaEngine,
    asset: &MediaAsset,
    mut parser: impl StatusParser,
) -> Option<AssetMetadata> {
    let result = engine.probe(asset, &mut |line| parser.feed(line));

    if let Err(e) = result {
        warn!("影片探測失敗 {}: {e:#}", asset.file_name());
        return None;
    }

    parser.has_duration().then(|| parser.metadata())
}

/// 已擷取的縮圖，只能依時間順序往後追加
#[derive(Debug, Default)]
pub struct ThumbnailStrip {
    frames: Vec<TimelineFrame>,
}

impl ThumbnailStrip {
    #[must_use]
    pub const fn new() -> Self {
        Self { frames: Vec::new() }
    }

    /// 追加一張縮圖；時間早於最後一張者不予接受
    pub fn push(&mut self, frame: TimelineFrame) -> bool {
        if self
            .frames
            .last()
            .is_some_and(|last| frame.timestamp < last.timestamp)
        {
            warn!("縮圖時間倒退，忽略: {:.3}s", frame.timestamp);
            return false;
        }
        self.frames.push(frame);
        true
    }

    #[must_use]
    pub fn frames(&self) -> &[TimelineFrame] {
        &self.frames
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// 釋放所有縮圖
    pub fn clear(&mut self) {
        self.frames.clear();
        self.frames.shrink_to_fit();
    }
}
