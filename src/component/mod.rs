//! 功能元件模組
//!
//! 每個子模組實現一個獨立的功能，包含主要邏輯和專用工具

pub mod editor_session;
pub mod export_coordinator;
pub mod playback_sync;
pub mod timeline_sampler;
pub mod trim_selector;

pub use editor_session::{EditorSession, ProbeStatus};
pub use export_coordinator::{ExportCoordinator, ExportOptions, ExportStatus, ExportedFile};
pub use playback_sync::{ClockPlayback, PlaybackSync};
pub use timeline_sampler::TimelineSampler;
pub use trim_selector::TrimSelector;
