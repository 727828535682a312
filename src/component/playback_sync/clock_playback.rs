use super::frame_tick::{PlaybackEngine, PlaybackEvent};
use std::time::Instant;

/// 以系統時鐘模擬的預覽播放
///
/// 終端機沒有真正的影像輸出，只推進播放時間並送出時間更新通知
pub struct ClockPlayback {
    duration: f64,
    position: f64,
    started_at: Option<Instant>,
    pending: Vec<PlaybackEvent>,
}

impl ClockPlayback {
    #[must_use]
    pub const fn new(duration: f64) -> Self {
        Self {
            duration,
            position: 0.0,
            started_at: None,
            pending: Vec::new(),
        }
    }

    #[must_use]
    pub const fn is_playing(&self) -> bool {
        self.started_at.is_some()
    }

    fn elapsed_position(&self) -> f64 {
        let elapsed = self
            .started_at
            .map_or(0.0, |started| started.elapsed().as_secs_f64());
        (self.position + elapsed).min(self.duration)
    }
}

impl PlaybackEngine for ClockPlayback {
    fn current_time(&self) -> f64 {
        self.elapsed_position()
    }

    fn duration(&self) -> Option<f64> {
        (self.duration > 0.0).then_some(self.duration)
    }

    fn play(&mut self) {
        if self.started_at.is_some() {
            return;
        }
        if self.position >= self.duration {
            self.position = 0.0;
        }
        self.started_at = Some(Instant::now());
        self.pending.push(PlaybackEvent::Play);
    }

    fn pause(&mut self) {
        if self.started_at.is_none() {
            return;
        }
        self.position = self.elapsed_position();
        self.started_at = None;
        self.pending.push(PlaybackEvent::Pause);
    }

    fn seek(&mut self, time: f64) {
        self.position = time.clamp(0.0, self.duration.max(0.0));
        if self.started_at.is_some() {
            self.started_at = Some(Instant::now());
        }
        self.pending.push(PlaybackEvent::Seeked);
    }

    fn supports_frame_callback(&self) -> bool {
        false
    }

    fn request_frame_callback(&mut self) {}

    fn poll_events(&mut self) -> Vec<PlaybackEvent> {
        if self.started_at.is_some() {
            let now = self.elapsed_position();
            self.pending.push(PlaybackEvent::TimeUpdate(now));
            if now >= self.duration {
                self.pause();
            }
        }
        std::mem::take(&mut self.pending)
    }
}
