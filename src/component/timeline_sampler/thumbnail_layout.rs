/// 縮圖長寬比（16:9）
const THUMBNAIL_ASPECT: f64 = 16.0 / 9.0;

/// 時間軸縮圖的數量與間隔
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThumbnailLayout {
    pub count: usize,
    pub step: f64,
}

impl ThumbnailLayout {
    /// 依軌道大小計算縮圖配置
    ///
    /// 縮圖寬度由軌道高度以 16:9 推算，
    /// `count = round(軌道寬 / 縮圖寬) + 1`，`step = duration / count`
    #[must_use]
    pub fn compute(track_width_px: f64, track_height_px: f64, duration: f64) -> Self {
        let thumbnail_width = track_height_px * THUMBNAIL_ASPECT;
        if thumbnail_width <= 0.0 || track_width_px <= 0.0 || duration <= 0.0 {
            return Self {
                count: 0,
                step: 0.0,
            };
        }

        let count = (track_width_px / thumbnail_width).round() as usize + 1;
        Self {
            count,
            step: duration / count as f64,
        }
    }

    /// 依序產生每張縮圖的時間點
    pub fn timestamps(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.count).map(|i| i as f64 * self.step)
    }
}
