use super::main::TrimRange;
use crate::tools::time_to_pixel;

/// 把手寬度（像素）
pub const HANDLE_WIDTH_PX: f64 = 10.0;

/// 左右邊界的最小像素距離，避免選取範圍寬度為零
pub const MIN_SELECTION_PX: f64 = HANDLE_WIDTH_PX * 2.0;

/// 把手的水平命中範圍
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandleBox {
    pub x: f64,
    pub width: f64,
}

impl HandleBox {
    #[must_use]
    pub fn contains(&self, px: f64) -> bool {
        px >= self.x && px <= self.x + self.width
    }

    #[must_use]
    pub fn center(&self) -> f64 {
        self.x + self.width / 2.0
    }
}

/// 裁剪範圍在軌道上的像素位置
///
/// 一律由 `TrimRange` 推導，不從畫面反讀
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrimGeometry {
    pub track_width_px: f64,
    pub left_px: f64,
    pub right_px: f64,
}

impl TrimGeometry {
    /// 由裁剪範圍推導；未設定的邊界貼齊軌道兩端
    #[must_use]
    pub fn from_range(range: &TrimRange, track_width_px: f64, duration: f64) -> Self {
        let width = track_width_px.max(0.0);
        let left_px = range
            .start
            .map_or(0.0, |start| time_to_pixel(start, width, duration));
        let right_px = range
            .stop
            .map_or(width, |stop| time_to_pixel(stop, width, duration));

        Self {
            track_width_px: width,
            left_px,
            right_px,
        }
    }

    /// 左側遮罩寬度
    #[must_use]
    pub fn left_margin(&self) -> f64 {
        self.left_px
    }

    /// 右側遮罩寬度
    #[must_use]
    pub fn right_margin(&self) -> f64 {
        (self.track_width_px - self.right_px).max(0.0)
    }

    /// 左把手位於選取範圍內側左緣
    #[must_use]
    pub fn left_handle(&self) -> HandleBox {
        HandleBox {
            x: self.left_px,
            width: HANDLE_WIDTH_PX,
        }
    }

    /// 右把手位於選取範圍內側右緣
    #[must_use]
    pub fn right_handle(&self) -> HandleBox {
        HandleBox {
            x: self.right_px - HANDLE_WIDTH_PX,
            width: HANDLE_WIDTH_PX,
        }
    }
}
