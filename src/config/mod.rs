pub mod load;
pub mod save;
pub mod types;

pub use types::{Config, FormatTable, Language, MAX_RECENT_PATHS, TrackSize, UserSettings};
