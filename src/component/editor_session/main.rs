use crate::component::export_coordinator::{ExportCoordinator, ExportOptions, ExportStatus};
use crate::component::playback_sync::{
    PlaybackEngine, PlaybackState, PlaybackSync, PreviewStatus, ToggleOutcome,
};
use crate::component::timeline_sampler::{
    SamplerEvent, SamplerOutcome, ThumbnailStrip, TimelineFrame, TimelineSampler, probe_metadata,
};
use crate::component::trim_selector::{PressOutcome, TrimGeometry, TrimRange, TrimSelector};
use crate::config::TrackSize;
use crate::tools::{AssetMetadata, FfmpegLogParser, MediaAsset, MediaEngine, OutputFormat};
use anyhow::{Result, bail};
use log::{debug, info};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// 影片資訊探測狀態
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum ProbeStatus {
    #[default]
    Pending,
    Ready(AssetMetadata),
    Failed,
}

struct Preview {
    engine: Box<dyn PlaybackEngine>,
    sync: PlaybackSync,
}

/// 單支影片的編輯工作階段
///
/// 持有唯一的解碼／編碼引擎；取樣與匯出都經由 `&mut self` 依序使用它。
/// 換新影片時丟棄所有縮圖、裁剪範圍與播放狀態。
pub struct EditorSession {
    engine: Box<dyn MediaEngine>,
    cancel_signal: Arc<AtomicBool>,
    track: TrackSize,
    asset: Option<MediaAsset>,
    probe: ProbeStatus,
    strip: ThumbnailStrip,
    trim: TrimSelector,
    preview: Option<Preview>,
    exporter: ExportCoordinator,
}

impl EditorSession {
    pub fn new(
        engine: Box<dyn MediaEngine>,
        track: TrackSize,
        cancel_signal: Arc<AtomicBool>,
    ) -> Self {
        Self {
            engine,
            cancel_signal,
            track,
            asset: None,
            probe: ProbeStatus::Pending,
            strip: ThumbnailStrip::new(),
            trim: TrimSelector::new(track.width_px),
            preview: None,
            exporter: ExportCoordinator::new(),
        }
    }

    /// 載入新影片並執行縮圖取樣
    ///
    /// 每取得一張縮圖就呼叫 `on_frame`。取樣途中收到取消信號時提早結束。
    pub fn load_asset(
        &mut self,
        asset: MediaAsset,
        mut on_frame: impl FnMut(&TimelineFrame),
    ) -> SamplerOutcome {
        info!("載入影片: {} ({})", asset.file_name(), asset.mime_type());
        self.discard_asset_state();

        let asset = self.asset.insert(asset);
        let sampler = TimelineSampler::new(Arc::clone(&self.cancel_signal));
        let strip = &mut self.strip;
        let probe = &mut self.probe;

        let outcome = sampler.run(self.engine.as_mut(), asset, self.track, |event| match event {
            SamplerEvent::MetadataReady(metadata) => *probe = ProbeStatus::Ready(metadata),
            SamplerEvent::Frame(frame) => {
                on_frame(&frame);
                strip.push(frame);
            }
        });

        if outcome.metadata.is_none() && !outcome.cancelled {
            self.probe = ProbeStatus::Failed;
        }

        outcome
    }

    /// 只探測影片資訊，不擷取縮圖
    pub fn probe_asset(&mut self, asset: MediaAsset) -> Option<AssetMetadata> {
        info!("探測影片: {} ({})", asset.file_name(), asset.mime_type());
        self.discard_asset_state();

        let asset = self.asset.insert(asset);
        let metadata = probe_metadata(self.engine.as_mut(), asset, FfmpegLogParser::new());
        self.engine.release_resources();

        self.probe = metadata.map_or(ProbeStatus::Failed, ProbeStatus::Ready);
        metadata
    }

    fn discard_asset_state(&mut self) {
        self.preview = None;
        self.trim.reset();
        self.strip.clear();
        self.probe = ProbeStatus::Pending;
        self.cancel_signal.store(false, Ordering::SeqCst);
    }

    /// 連接預覽播放；影片長度未知時以探測結果為準
    pub fn attach_preview(&mut self, engine: Box<dyn PlaybackEngine>) {
        let sync = PlaybackSync::new(engine.as_ref(), self.track.width_px);
        self.preview = Some(Preview { engine, sync });
    }

    /// 結束工作階段：停止取樣並解除預覽
    pub fn cancel(&mut self) {
        debug!("關閉編輯工作階段");
        self.cancel_signal.store(true, Ordering::SeqCst);
        if let Some(mut preview) = self.preview.take() {
            preview.engine.pause();
        }
    }

    #[must_use]
    pub const fn asset(&self) -> Option<&MediaAsset> {
        self.asset.as_ref()
    }

    #[must_use]
    pub const fn probe_status(&self) -> ProbeStatus {
        self.probe
    }

    /// 探測完成前為預設值
    #[must_use]
    pub fn metadata(&self) -> AssetMetadata {
        match self.probe {
            ProbeStatus::Ready(metadata) => metadata,
            ProbeStatus::Pending | ProbeStatus::Failed => AssetMetadata::default(),
        }
    }

    #[must_use]
    pub const fn track(&self) -> TrackSize {
        self.track
    }

    /// 軌道寬度改變：裁剪把手與播放游標改用新寬度換算
    ///
    /// 已取得的縮圖不會重新取樣
    pub fn set_track_width(&mut self, width_px: f64) {
        let width_px = width_px.max(0.0);
        if (self.trim.track_width() - width_px).abs() < f64::EPSILON {
            return;
        }

        debug!("軌道寬度: {:.1} → {width_px:.1}", self.trim.track_width());
        self.track.width_px = width_px;
        self.trim.set_track_width(width_px);
        if let Some(preview) = self.preview.as_mut() {
            preview.sync.set_track_width(width_px);
        }
    }

    #[must_use]
    pub fn thumbnails(&self) -> &[TimelineFrame] {
        self.strip.frames()
    }

    #[must_use]
    pub const fn trim_range(&self) -> TrimRange {
        self.trim.range()
    }

    #[must_use]
    pub fn trim_geometry(&self) -> TrimGeometry {
        self.trim.geometry(self.metadata().duration)
    }

    #[must_use]
    pub fn playback_state(&self) -> Option<PlaybackState> {
        self.preview.as_ref().map(|p| p.sync.state())
    }

    /// 沒有連接預覽時視為無法使用
    #[must_use]
    pub fn preview_status(&self) -> PreviewStatus {
        self.preview
            .as_ref()
            .map_or(PreviewStatus::Unavailable, |p| p.sync.preview())
    }

    #[must_use]
    pub fn cursor_px(&self) -> Option<f64> {
        self.preview.as_ref().map(|p| p.sync.cursor_px())
    }

    #[must_use]
    pub fn is_exporting(&self) -> bool {
        self.exporter.is_busy()
    }

    /// 只有探測成功後才提供長度給裁剪換算
    fn trim_duration(&self) -> Option<f64> {
        match self.probe {
            ProbeStatus::Ready(metadata) => Some(metadata.duration),
            ProbeStatus::Pending | ProbeStatus::Failed => None,
        }
    }

    pub fn pointer_press(&mut self, px: f64) -> PressOutcome {
        let outcome = self.trim.press(px, self.trim_duration());

        if let PressOutcome::Seek { ratio } = outcome {
            let fallback = self.metadata().duration;
            if let Some(preview) = self.preview.as_mut() {
                preview
                    .sync
                    .seek_to_ratio(preview.engine.as_mut(), ratio, fallback);
            }
        }

        outcome
    }

    pub fn pointer_move(&mut self, px: f64) {
        self.trim.pointer_move(px);
    }

    pub fn pointer_release(&mut self) -> Option<TrimRange> {
        self.trim.release(self.trim_duration())
    }

    pub fn toggle_play(&mut self) -> ToggleOutcome {
        let range = self.trim.range();
        match self.preview.as_mut() {
            Some(preview) => preview.sync.toggle_play(preview.engine.as_mut(), &range),
            None => ToggleOutcome::Unavailable,
        }
    }

    /// 取出預覽累積的事件並更新游標與循環
    pub fn pump_playback(&mut self) {
        let range = self.trim.range();
        let fallback = self.metadata().duration;
        let Some(preview) = self.preview.as_mut() else {
            return;
        };

        for event in preview.engine.poll_events() {
            preview
                .sync
                .handle_event(preview.engine.as_mut(), event, &range, fallback);
        }
    }

    /// 依目前裁剪範圍匯出
    pub fn export(
        &mut self,
        options: &ExportOptions,
        on_progress: impl FnMut(u8),
    ) -> Result<ExportStatus> {
        let metadata = self.metadata();
        let range = self.trim.range();
        let Some(asset) = self.asset.as_ref() else {
            bail!("尚未載入影片");
        };

        self.exporter
            .export(self.engine.as_mut(), asset, &metadata, &range, options, on_progress)
    }

    /// 整支影片直接轉成 GIF，不套用裁剪
    pub fn quick_convert(&mut self, on_progress: impl FnMut(u8)) -> Result<ExportStatus> {
        let metadata = self.metadata();
        let Some(asset) = self.asset.as_ref() else {
            bail!("尚未載入影片");
        };

        let options = ExportOptions {
            format: OutputFormat::Gif,
            ..ExportOptions::default()
        };
        self.exporter.export(
            self.engine.as_mut(),
            asset,
            &metadata,
            &TrimRange::default(),
            &options,
            on_progress,
        )
    }
}
