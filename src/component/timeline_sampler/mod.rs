//! 時間軸縮圖取樣元件
//!
//! 兩階段流程：
//! A. 探測影片資訊（長度、解析度、幀率）
//! B. 依軌道寬度均勻擷取縮圖，逐張發布

mod main;
mod thumbnail_layout;

pub use main::{
    SamplerEvent, SamplerOutcome, ThumbnailStrip, TimelineFrame, TimelineSampler, probe_metadata,
};
pub use thumbnail_layout::ThumbnailLayout;
