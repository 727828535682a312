mod editor_menu;
mod handlers;
mod main_menu;
mod track_view;

pub use editor_menu::set_trim_seconds;
pub use handlers::{load_media_asset, save_exported_file};
pub use main_menu::show_main_menu;
pub use track_view::{TRACK_COLUMNS, format_timestamp, render_track, track_columns, track_width_for};
