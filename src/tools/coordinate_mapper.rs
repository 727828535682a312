//! 軌道像素位置與影片時間的換算

/// 將軌道上的像素位置換算為秒數，結果限制在 `[0, duration]`
#[must_use]
pub fn pixel_to_time(px: f64, track_width_px: f64, duration: f64) -> f64 {
    if track_width_px <= 0.0 || duration <= 0.0 {
        return 0.0;
    }
    ((px / track_width_px) * duration).clamp(0.0, duration)
}

/// 將秒數換算為軌道上的像素位置，結果限制在 `[0, track_width_px]`
#[must_use]
pub fn time_to_pixel(time: f64, track_width_px: f64, duration: f64) -> f64 {
    if track_width_px <= 0.0 || duration <= 0.0 {
        return 0.0;
    }
    ((time / duration) * track_width_px).clamp(0.0, track_width_px)
}
