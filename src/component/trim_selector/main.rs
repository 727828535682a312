use super::geometry::{MIN_SELECTION_PX, TrimGeometry};
use crate::tools::pixel_to_time;
use log::debug;

/// 目前的裁剪範圍（秒），未設定的邊界代表影片起點或終點
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrimRange {
    pub start: Option<f64>,
    pub stop: Option<f64>,
}

impl TrimRange {
    #[must_use]
    pub const fn is_unset(&self) -> bool {
        self.start.is_none() && self.stop.is_none()
    }

    /// 播放起點，未設定時為 0
    #[must_use]
    pub fn start_or_zero(&self) -> f64 {
        self.start.unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    Left,
    Right,
}

/// 拖曳狀態機
///
/// `anchor` 是按下時的幾何快照，拖曳過程中不重新量測
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrimState {
    Idle,
    DraggingLeft { anchor: TrimGeometry, offset_px: f64 },
    DraggingRight { anchor: TrimGeometry, offset_px: f64 },
}

/// 按下指標的結果
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PressOutcome {
    /// 開始拖曳把手
    DragStarted(Handle),
    /// 點在把手以外，要求跳轉到軌道上的相對位置 `[0, 1]`
    Seek { ratio: f64 },
    /// 影片資訊尚未就緒，不允許調整裁剪範圍
    Blocked,
    /// 已在拖曳中
    Ignored,
}

/// 裁剪範圍選取器
pub struct TrimSelector {
    state: TrimState,
    range: TrimRange,
    track_width_px: f64,
}

impl TrimSelector {
    #[must_use]
    pub const fn new(track_width_px: f64) -> Self {
        Self {
            state: TrimState::Idle,
            range: TrimRange {
                start: None,
                stop: None,
            },
            track_width_px,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &TrimState {
        &self.state
    }

    #[must_use]
    pub const fn range(&self) -> TrimRange {
        self.range
    }

    #[must_use]
    pub const fn track_width(&self) -> f64 {
        self.track_width_px
    }

    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        !matches!(self.state, TrimState::Idle)
    }

    /// 軌道寬度改變時呼叫；進行中的拖曳仍沿用按下時的快照
    pub fn set_track_width(&mut self, track_width_px: f64) {
        self.track_width_px = track_width_px.max(0.0);
    }

    /// 載入新影片時清空裁剪範圍
    pub fn reset(&mut self) {
        self.state = TrimState::Idle;
        self.range = TrimRange::default();
    }

    /// 目前要顯示的幾何；拖曳中反映即時位置
    #[must_use]
    pub fn geometry(&self, duration: f64) -> TrimGeometry {
        match self.state {
            TrimState::Idle => TrimGeometry::from_range(&self.range, self.track_width_px, duration),
            TrimState::DraggingLeft { anchor, offset_px } => TrimGeometry {
                left_px: offset_px,
                ..anchor
            },
            TrimState::DraggingRight { anchor, offset_px } => TrimGeometry {
                right_px: offset_px,
                ..anchor
            },
        }
    }

    /// 按下指標
    ///
    /// `duration` 為 `None` 表示影片資訊尚未探測完成，此時不允許拖曳把手。
    /// 兩個把手的命中範圍重疊時由左把手優先。
    pub fn press(&mut self, px: f64, duration: Option<f64>) -> PressOutcome {
        if self.is_dragging() {
            return PressOutcome::Ignored;
        }

        let anchor = self.geometry(duration.unwrap_or(1.0));
        let handle = if anchor.left_handle().contains(px) {
            Some(Handle::Left)
        } else if anchor.right_handle().contains(px) {
            Some(Handle::Right)
        } else {
            None
        };

        let Some(handle) = handle else {
            let ratio = if self.track_width_px > 0.0 {
                (px / self.track_width_px).clamp(0.0, 1.0)
            } else {
                0.0
            };
            return PressOutcome::Seek { ratio };
        };

        if duration.is_none() {
            debug!("影片資訊尚未就緒，忽略把手拖曳");
            return PressOutcome::Blocked;
        }

        self.state = match handle {
            Handle::Left => TrimState::DraggingLeft {
                anchor,
                offset_px: anchor.left_px,
            },
            Handle::Right => TrimState::DraggingRight {
                anchor,
                offset_px: anchor.right_px,
            },
        };
        debug!("開始拖曳 {handle:?} 把手: px={px:.1}");

        PressOutcome::DragStarted(handle)
    }

    /// 移動指標；左邊界永遠至少比右邊界小 `MIN_SELECTION_PX`
    pub fn pointer_move(&mut self, px: f64) {
        match &mut self.state {
            TrimState::Idle => {}
            TrimState::DraggingLeft { anchor, offset_px } => {
                let upper = (anchor.right_px - MIN_SELECTION_PX).max(0.0);
                *offset_px = px.clamp(0.0, upper);
            }
            TrimState::DraggingRight { anchor, offset_px } => {
                let width = anchor.track_width_px;
                let lower = (anchor.left_px + MIN_SELECTION_PX).min(width);
                *offset_px = px.clamp(lower, width);
            }
        }
    }

    /// 放開指標（包含在軌道外放開），將拖曳結果寫入裁剪範圍
    ///
    /// 換算使用放開當下的影片長度；沒有拖曳時回傳 `None`
    pub fn release(&mut self, duration: Option<f64>) -> Option<TrimRange> {
        let state = std::mem::replace(&mut self.state, TrimState::Idle);

        let Some(duration) = duration else {
            if state != TrimState::Idle {
                debug!("影片資訊不存在，放棄本次拖曳");
            }
            return None;
        };

        match state {
            TrimState::Idle => return None,
            TrimState::DraggingLeft { anchor, offset_px } => {
                self.range.start = (offset_px > 0.0)
                    .then(|| pixel_to_time(offset_px, anchor.track_width_px, duration));
            }
            TrimState::DraggingRight { anchor, offset_px } => {
                self.range.stop = (offset_px < anchor.track_width_px)
                    .then(|| pixel_to_time(offset_px, anchor.track_width_px, duration));
            }
        }

        debug!(
            "裁剪範圍更新: start={:?}, stop={:?}",
            self.range.start, self.range.stop
        );
        Some(self.range)
    }
}
