mod clock_playback;
mod frame_tick;
mod main;

pub use clock_playback::ClockPlayback;
pub use frame_tick::{FrameTickProvider, PlaybackEngine, PlaybackEvent};
pub use main::{PlaybackState, PlaybackSync, PreviewStatus, ToggleOutcome};
