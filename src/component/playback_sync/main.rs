use super::frame_tick::{FrameTickProvider, PlaybackEngine, PlaybackEvent};
use crate::component::trim_selector::TrimRange;
use crate::tools::time_to_pixel;
use log::{debug, warn};

/// 播放狀態，由播放引擎的事件更新
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlaybackState {
    pub current_time: f64,
    pub playing: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PreviewStatus {
    #[default]
    Available,
    /// 預覽無法解碼；游標與循環停止運作，裁剪與匯出不受影響
    Unavailable,
}

/// 切換播放的結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Playing,
    Paused,
    /// 先跳到裁剪起點，跳轉完成後才開始播放
    AwaitingSeek,
    /// 預覽無法使用
    Unavailable,
}

/// 播放游標同步
///
/// 每次更新都重新計算游標位置並檢查裁剪範圍：
/// 播放到終點時暫停並回到起點
pub struct PlaybackSync {
    provider: FrameTickProvider,
    state: PlaybackState,
    preview: PreviewStatus,
    cursor_px: f64,
    track_width_px: f64,
    play_after_seek: bool,
}

impl PlaybackSync {
    /// 依引擎能力選擇更新來源
    pub fn new(engine: &dyn PlaybackEngine, track_width_px: f64) -> Self {
        let provider = FrameTickProvider::detect(engine);
        debug!("播放位置更新來源: {provider}");

        Self {
            provider,
            state: PlaybackState::default(),
            preview: PreviewStatus::Available,
            cursor_px: 0.0,
            track_width_px,
            play_after_seek: false,
        }
    }

    #[must_use]
    pub const fn provider(&self) -> FrameTickProvider {
        self.provider
    }

    #[must_use]
    pub const fn state(&self) -> PlaybackState {
        self.state
    }

    #[must_use]
    pub const fn preview(&self) -> PreviewStatus {
        self.preview
    }

    #[must_use]
    pub const fn cursor_px(&self) -> f64 {
        self.cursor_px
    }

    /// 軌道寬度改變時等比例移動游標，不必等下一次更新
    pub fn set_track_width(&mut self, track_width_px: f64) {
        let width = track_width_px.max(0.0);
        self.cursor_px = if self.track_width_px > 0.0 {
            self.cursor_px * width / self.track_width_px
        } else {
            0.0
        };
        self.track_width_px = width;
    }

    /// 換新影片時重設
    pub fn reset(&mut self, engine: &dyn PlaybackEngine) {
        self.provider = FrameTickProvider::detect(engine);
        self.state = PlaybackState::default();
        self.preview = PreviewStatus::Available;
        self.cursor_px = 0.0;
        self.play_after_seek = false;
    }

    /// 處理播放引擎的事件
    ///
    /// `fallback_duration` 在預覽本身無法回報長度時使用
    pub fn handle_event(
        &mut self,
        engine: &mut dyn PlaybackEngine,
        event: PlaybackEvent,
        trim: &TrimRange,
        fallback_duration: f64,
    ) {
        if self.preview == PreviewStatus::Unavailable {
            return;
        }

        if let Some(time) = self.provider.tick_time(&event) {
            self.tick(engine, time, trim, fallback_duration);
            if self.provider == FrameTickProvider::FrameCallback && self.state.playing {
                engine.request_frame_callback();
            }
            return;
        }

        match event {
            PlaybackEvent::Play => {
                self.state.playing = true;
                if self.provider == FrameTickProvider::FrameCallback {
                    engine.request_frame_callback();
                }
            }
            PlaybackEvent::Pause => {
                self.state.playing = false;
            }
            PlaybackEvent::Seeked => {
                self.state.current_time = engine.current_time();
                self.update_cursor(engine, fallback_duration);
                if self.play_after_seek {
                    self.play_after_seek = false;
                    engine.play();
                }
            }
            PlaybackEvent::Error => {
                warn!("預覽無法播放，改以縮圖顯示");
                self.preview = PreviewStatus::Unavailable;
                self.state.playing = false;
                self.play_after_seek = false;
            }
            PlaybackEvent::TimeUpdate(_) | PlaybackEvent::FrameRendered { .. } => {}
        }
    }

    /// 切換播放／暫停
    ///
    /// 目前位置在裁剪起點之前時，先跳到起點並等待跳轉完成才播放
    pub fn toggle_play(
        &mut self,
        engine: &mut dyn PlaybackEngine,
        trim: &TrimRange,
    ) -> ToggleOutcome {
        if self.preview == PreviewStatus::Unavailable {
            return ToggleOutcome::Unavailable;
        }

        if self.state.playing || self.play_after_seek {
            self.play_after_seek = false;
            engine.pause();
            return ToggleOutcome::Paused;
        }

        if let Some(start) = trim.start {
            if engine.current_time() < start {
                debug!("播放前先跳到裁剪起點: {start:.3}s");
                self.play_after_seek = true;
                engine.seek(start);
                return ToggleOutcome::AwaitingSeek;
            }
        }

        engine.play();
        ToggleOutcome::Playing
    }

    /// 點擊軌道跳轉，`ratio` 為軌道上的相對位置
    pub fn seek_to_ratio(
        &mut self,
        engine: &mut dyn PlaybackEngine,
        ratio: f64,
        fallback_duration: f64,
    ) {
        if self.preview == PreviewStatus::Unavailable {
            return;
        }
        let duration = preview_duration(engine, fallback_duration);
        engine.seek(ratio.clamp(0.0, 1.0) * duration);
    }

    fn tick(
        &mut self,
        engine: &mut dyn PlaybackEngine,
        time: f64,
        trim: &TrimRange,
        fallback_duration: f64,
    ) {
        self.state.current_time = time;
        self.update_cursor(engine, fallback_duration);

        if let Some(stop) = trim.stop {
            if time >= stop {
                let start = trim.start_or_zero();
                debug!("到達裁剪終點 {stop:.3}s，回到 {start:.3}s");
                engine.pause();
                engine.seek(start);
                self.state.playing = false;
                self.state.current_time = start;
            }
        }
    }

    fn update_cursor(&mut self, engine: &dyn PlaybackEngine, fallback_duration: f64) {
        let duration = preview_duration(engine, fallback_duration);
        self.cursor_px = time_to_pixel(self.state.current_time, self.track_width_px, duration);
    }
}

fn preview_duration(engine: &dyn PlaybackEngine, fallback_duration: f64) -> f64 {
    engine
        .duration()
        .filter(|d| d.is_finite() && *d > 0.0)
        .unwrap_or(fallback_duration)
}
