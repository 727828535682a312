//! 解碼／編碼引擎邊界
//!
//! 引擎不支援同時處理多個請求，所有呼叫都經由 `&mut self` 依序完成。

use crate::tools::{ExportRequest, MediaAsset};
use anyhow::Result;

pub trait MediaEngine {
    /// 分析影片，每一行狀態訊息都交給 `on_message`
    fn probe(&mut self, asset: &MediaAsset, on_message: &mut dyn FnMut(&str)) -> Result<()>;

    /// 擷取指定秒數的單張影格，回傳 JPEG 位元組
    fn extract_frame(&mut self, asset: &MediaAsset, timestamp: f64) -> Result<Vec<u8>>;

    /// 完整轉檔，每處理一個影格就以影格序號呼叫 `on_progress`
    fn transcode(
        &mut self,
        request: &ExportRequest<'_>,
        on_progress: &mut dyn FnMut(u64),
    ) -> Result<Vec<u8>>;

    /// 釋放探測與取樣過程中的暫存資源
    fn release_resources(&mut self);
}
