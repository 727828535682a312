use std::fmt;

/// 播放引擎送出的事件
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaybackEvent {
    Play,
    Pause,
    /// 跳轉已完成
    Seeked,
    /// 解碼或載入失敗
    Error,
    /// 一般的時間更新通知（輪詢用）
    TimeUpdate(f64),
    /// 每顯示一個影格觸發一次
    FrameRendered { media_time: f64 },
}

/// 預覽播放引擎
pub trait PlaybackEngine {
    fn current_time(&self) -> f64;

    /// 預覽本身回報的長度，未知時為 `None`
    fn duration(&self) -> Option<f64>;

    fn play(&mut self);

    fn pause(&mut self);

    /// 跳轉完成後會送出 `PlaybackEvent::Seeked`
    fn seek(&mut self, time: f64);

    /// 是否支援逐影格回呼
    fn supports_frame_callback(&self) -> bool;

    /// 要求下一個影格顯示時送出 `PlaybackEvent::FrameRendered`
    fn request_frame_callback(&mut self);

    /// 取出累積的事件
    fn poll_events(&mut self) -> Vec<PlaybackEvent>;
}

/// 播放位置更新的來源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameTickProvider {
    /// 逐影格回呼，每次回呼後重新註冊
    FrameCallback,
    /// 退而使用時間更新通知
    TimeUpdatePolling,
}

impl FrameTickProvider {
    /// 依引擎能力選擇來源，支援逐影格回呼者優先
    #[must_use]
    pub fn detect(engine: &dyn PlaybackEngine) -> Self {
        if engine.supports_frame_callback() {
            Self::FrameCallback
        } else {
            Self::TimeUpdatePolling
        }
    }

    /// 從事件取出播放時間；不屬於此來源的事件回傳 `None`
    #[must_use]
    pub const fn tick_time(self, event: &PlaybackEvent) -> Option<f64> {
        match (self, event) {
            (Self::FrameCallback, PlaybackEvent::FrameRendered { media_time }) => Some(*media_time),
            (Self::TimeUpdatePolling, PlaybackEvent::TimeUpdate(time)) => Some(*time),
            _ => None,
        }
    }
}

impl fmt::Display for FrameTickProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FrameCallback => write!(f, "frame-callback"),
            Self::TimeUpdatePolling => write!(f, "time-update"),
        }
    }
}
