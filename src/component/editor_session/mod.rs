//! 編輯工作階段
//!
//! 把取樣、裁剪、預覽與匯出串在一起，提供給互動介面使用。

mod main;

pub use main::{EditorSession, ProbeStatus};
