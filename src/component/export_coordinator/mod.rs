//! 匯出協調元件
//!
//! 依目前的裁剪範圍與輸出選項建立匯出請求，交給引擎轉檔並回報進度。
//! 同一個編輯工作階段同時只允許一個匯出。

mod main;

pub use main::{ExportCoordinator, ExportOptions, ExportStatus, ExportedFile, build_request};
