pub mod camera;
pub mod config;
pub mod frame_loop;
pub mod input;
pub mod time;
pub mod watcher;

pub use camera::{CameraMovement, CameraSettings, FlyCamera};
pub use config::{
    load_config_or_default, FrameLoopSettings, ProjectionSettings, RedrawPolicy, ViewerConfig,
};
pub use frame_loop::{
    Clock, EventSource, FrameLoop, FrameView, LoopState, LoopStats, StopReason, SystemClock,
};
pub use input::{InputEvent, Key, KeyTable, MouseTracker};
pub use time::FrameClock;
pub use watcher::FileWatcher;
