//! 終端機上的時間軸軌道

use crate::component::trim_selector::TrimGeometry;

/// 軌道顯示的字元寬度上限，設定中的軌道寬度對應這個欄數
pub const TRACK_COLUMNS: usize = 60;

/// 軌道顯示的字元寬度下限
const MIN_TRACK_COLUMNS: usize = 20;

/// 軌道左右的縮排與時間標示
const TRACK_MARGIN: usize = 14;

/// 依終端機寬度決定軌道欄數
#[must_use]
pub fn track_columns(terminal_width: u16) -> usize {
    usize::from(terminal_width)
        .saturating_sub(TRACK_MARGIN)
        .clamp(MIN_TRACK_COLUMNS, TRACK_COLUMNS)
}

/// 欄數對應的軌道像素寬度
#[must_use]
pub fn track_width_for(columns: usize, full_width_px: f64) -> f64 {
    full_width_px * columns as f64 / TRACK_COLUMNS as f64
}

/// 把軌道畫成一行文字
///
/// 裁剪範圍外為 `░`，範圍內為 `█`，把手為 `┃`，播放游標為 `▼`（取代該欄字元）
#[must_use]
pub fn render_track(geometry: &TrimGeometry, cursor_px: Option<f64>, columns: usize) -> String {
    if columns == 0 || geometry.track_width_px <= 0.0 {
        return String::new();
    }

    let px_per_column = geometry.track_width_px / columns as f64;
    let column_of = |px: f64| ((px / px_per_column).floor() as usize).min(columns - 1);

    let left_column = column_of(geometry.left_px);
    let right_column = column_of(geometry.right_px);
    let cursor_column = cursor_px.map(column_of);

    (0..columns)
        .map(|column| {
            if cursor_column == Some(column) {
                '▼'
            } else if column == left_column || column == right_column {
                '┃'
            } else if column > left_column && column < right_column {
                '█'
            } else {
                '░'
            }
        })
        .collect()
}

/// 秒數格式化為 `mm:ss.s`
#[must_use]
pub fn format_timestamp(seconds: f64) -> String {
    let seconds = seconds.max(0.0);
    let minutes = (seconds / 60.0).floor() as u64;
    let rest = seconds - minutes as f64 * 60.0;
    format!("{minutes:02}:{rest:04.1}")
}
