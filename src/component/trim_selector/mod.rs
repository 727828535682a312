//! 裁剪範圍選取元件
//!
//! 指標操作（按下、移動、放開）驅動的狀態機，擁有目前的裁剪範圍。
//! 畫面上的遮罩與把手位置一律由裁剪範圍推導。

mod geometry;
mod main;

pub use geometry::{HANDLE_WIDTH_PX, HandleBox, MIN_SELECTION_PX, TrimGeometry};
pub use main::{Handle, PressOutcome, TrimRange, TrimSelector, TrimState};
