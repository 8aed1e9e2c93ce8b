//! Core library for merging ordered video files with ffmpeg's concat
//! demuxer in stream-copy mode.
//!
//! The pipeline runs in fixed stages: discover and order the inputs,
//! probe each one with ffprobe, write the concat list, run the merge
//! while translating ffmpeg's `time=` markers into a monotonic integer
//! percentage, and finally re-probe the output. Progress and status are
//! reported through injected [`events::EventHandler`]s.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use vidcat_core::{CoreConfig, EventDispatcher};
//! use std::path::PathBuf;
//!
//! let config = CoreConfig::new(PathBuf::from("video"), PathBuf::from("output"));
//! vidcat_core::check_external_tools().unwrap();
//!
//! let (files, _order) =
//!     vidcat_core::find_video_files(&config.input_dir, &config.container_ext).unwrap();
//! let videos = vidcat_core::probe_all(&files).unwrap();
//!
//! let output = config.output_dir.join("merged.mp4");
//! let events = EventDispatcher::new();
//! let result = vidcat_core::merge_videos(&config, &videos, &output, &events).unwrap();
//! println!("wrote {} bytes", result.output_size);
//! ```

pub mod concat;
pub mod config;
pub mod discovery;
pub mod error;
pub mod events;
pub mod external;
pub mod media;
pub mod merge;
pub mod progress;
pub mod utils;

// Re-exports for public API
pub use config::CoreConfig;
pub use discovery::{find_video_files, MergeOrder};
pub use error::{CoreError, CoreResult};
pub use events::{Event, EventDispatcher, EventHandler};
pub use external::{
    check_external_tools, probe_all, probe_video, verify_output, FfmpegMergeEngine, MergeEngine,
};
pub use media::VideoInfo;
pub use merge::{merge_videos, merge_videos_with};
pub use progress::ProgressTracker;
pub use utils::{format_bytes, format_duration, parse_ffmpeg_time};

use std::path::PathBuf;
use std::time::Duration;

/// Result of a completed merge, returned by [`merge_videos`].
#[derive(Debug, Clone)]
pub struct MergeResult {
    pub output_path: PathBuf,
    pub output_size: u64,
    pub input_count: usize,
    /// Sum of the probed input durations in seconds.
    pub total_input_duration: f64,
    /// Wall time spent merging and verifying.
    pub elapsed: Duration,
}
