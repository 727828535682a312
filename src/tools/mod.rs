mod coordinate_mapper;
mod export_request;
mod ffmpeg_engine;
mod format_options;
mod media_asset;
mod media_engine;
mod metadata_parser;
mod path_validator;

pub use coordinate_mapper::{pixel_to_time, time_to_pixel};
pub use export_request::{ExportRequest, VideoOptions};
pub use ffmpeg_engine::{FfmpegEngine, THUMBNAIL_HEIGHT};
pub use format_options::{
    FrameSize, OutputFormat, available_framerates, available_sizes, suggested_filename,
};
pub use media_asset::{AssetMetadata, MediaAsset};
pub use media_engine::MediaEngine;
pub use metadata_parser::{FfmpegLogParser, StatusParser};
pub use path_validator::{ensure_directory_exists, unique_output_path, validate_directory_exists};
