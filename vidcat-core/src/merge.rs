//! Merge orchestration.
//!
//! Drives one merge invocation end to end: input-set checks, the
//! progress denominator, the concat list, the ffmpeg process, and output
//! verification. Stages run strictly in sequence; the first failure
//! aborts everything after it. The concat list is removed before this
//! function returns, success or failure, because it lives in a drop
//! scope around the subprocess.

use crate::concat::ConcatList;
use crate::config::CoreConfig;
use crate::error::{CoreError, CoreResult};
use crate::events::{Event, EventDispatcher};
use crate::external::{verify_output, FfmpegMergeEngine, MergeEngine};
use crate::media::VideoInfo;
use crate::progress::ProgressTracker;
use crate::MergeResult;

use std::path::Path;
use std::time::Instant;

/// Merges `videos`, in the given order, into `output_path`.
///
/// Requires at least two inputs and a positive total duration; both are
/// checked before any file is written or process spawned. On success the
/// output has been re-probed and verified. On failure a partial output
/// file is deliberately left on disk for inspection.
pub fn merge_videos(
    config: &CoreConfig,
    videos: &[VideoInfo],
    output_path: &Path,
    events: &EventDispatcher,
) -> CoreResult<MergeResult> {
    merge_videos_with(&FfmpegMergeEngine, config, videos, output_path, events)
}

/// Same as [`merge_videos`] but with the process runner injected, so the
/// orchestration around it can be tested without a real ffmpeg.
pub fn merge_videos_with(
    engine: &dyn MergeEngine,
    config: &CoreConfig,
    videos: &[VideoInfo],
    output_path: &Path,
    events: &EventDispatcher,
) -> CoreResult<MergeResult> {
    if videos.len() < 2 {
        return Err(CoreError::NotEnoughInputs(videos.len()));
    }

    let total_duration: f64 = videos.iter().map(|v| v.duration_secs).sum();
    let mut tracker = ProgressTracker::new(total_duration)?;

    let start = Instant::now();
    {
        let list = ConcatList::create(&config.output_dir, videos)?;

        events.emit(Event::MergeStarted {
            output_file: output_path.display().to_string(),
            input_count: videos.len(),
            total_duration_secs: total_duration,
        });
        log::info!(
            "Merging {} files ({:.1}s total) into {}",
            videos.len(),
            total_duration,
            output_path.display()
        );

        engine.run(
            list.path(),
            output_path,
            &mut tracker,
            events,
            config.merge_timeout,
        )?;
        // list drops here, removing the manifest whether or not the
        // merge succeeded
    }

    verify_output(output_path)?;

    let output_size = std::fs::metadata(output_path)?.len();
    let elapsed = start.elapsed();
    events.emit(Event::MergeComplete {
        output_file: output_path.display().to_string(),
        output_size,
        elapsed,
    });

    Ok(MergeResult {
        output_path: output_path.to_path_buf(),
        output_size,
        input_count: videos.len(),
        total_input_duration: total_duration,
        elapsed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use std::time::Duration;

    fn video(name: &str, duration_secs: f64) -> VideoInfo {
        VideoInfo {
            filename: name.to_string(),
            path: PathBuf::from("video").join(name),
            duration_secs,
            codec: "h264".to_string(),
            width: 1280,
            height: 720,
            bitrate_kbps: 2000,
            fps: 30.0,
        }
    }

    fn test_config() -> CoreConfig {
        CoreConfig::new(PathBuf::from("video"), std::env::temp_dir())
    }

    /// Records the list path it was handed and fails like a real ffmpeg
    /// that could not open an input.
    struct FailingEngine {
        seen_list: Mutex<Option<PathBuf>>,
    }

    impl MergeEngine for FailingEngine {
        fn run(
            &self,
            list_path: &Path,
            _output_path: &Path,
            _tracker: &mut ProgressTracker,
            _events: &EventDispatcher,
            _timeout: Option<Duration>,
        ) -> CoreResult<()> {
            assert!(list_path.exists(), "list must exist while the engine runs");
            *self.seen_list.lock().unwrap() = Some(list_path.to_path_buf());
            Err(CoreError::MergeFailed {
                status: "exit status: 1".to_string(),
                log: "video/1.mp4: No such file or directory\n".to_string(),
            })
        }
    }

    /// Claims success without writing any output file.
    struct NoOutputEngine;

    impl MergeEngine for NoOutputEngine {
        fn run(
            &self,
            _list_path: &Path,
            _output_path: &Path,
            _tracker: &mut ProgressTracker,
            _events: &EventDispatcher,
            _timeout: Option<Duration>,
        ) -> CoreResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_rejects_empty_set() {
        let result = merge_videos(
            &test_config(),
            &[],
            Path::new("out.mp4"),
            &EventDispatcher::new(),
        );
        assert!(matches!(result, Err(CoreError::NotEnoughInputs(0))));
    }

    #[test]
    fn test_rejects_single_input() {
        let result = merge_videos(
            &test_config(),
            &[video("1.mp4", 10.0)],
            Path::new("out.mp4"),
            &EventDispatcher::new(),
        );
        assert!(matches!(result, Err(CoreError::NotEnoughInputs(1))));
    }

    #[test]
    fn test_zero_total_duration_fails_before_spawn() {
        // Both guards fire before the concat list is written, so this
        // never touches ffmpeg even on machines without it.
        let result = merge_videos(
            &test_config(),
            &[video("1.mp4", 0.0), video("2.mp4", 0.0)],
            Path::new("out.mp4"),
            &EventDispatcher::new(),
        );
        assert!(matches!(result, Err(CoreError::ZeroTotalDuration)));
    }

    #[test]
    fn test_failed_merge_keeps_diagnostics_and_removes_list() {
        let dir = tempfile::tempdir().unwrap();
        let config = CoreConfig::new(PathBuf::from("video"), dir.path().to_path_buf());
        let engine = FailingEngine {
            seen_list: Mutex::new(None),
        };

        let result = merge_videos_with(
            &engine,
            &config,
            &[video("1.mp4", 10.0), video("2.mp4", 10.0)],
            &dir.path().join("out.mp4"),
            &EventDispatcher::new(),
        );

        match result {
            Err(CoreError::MergeFailed { status, log }) => {
                assert_eq!(status, "exit status: 1");
                assert!(log.contains("No such file or directory"));
            }
            other => panic!("expected MergeFailed, got {other:?}"),
        }

        // The manifest must not outlive the failed run.
        let list_path = engine.seen_list.into_inner().unwrap().unwrap();
        assert!(!list_path.exists());
    }

    #[test]
    fn test_missing_output_fails_verification() {
        let dir = tempfile::tempdir().unwrap();
        let config = CoreConfig::new(PathBuf::from("video"), dir.path().to_path_buf());
        let output = dir.path().join("out.mp4");

        let result = merge_videos_with(
            &NoOutputEngine,
            &config,
            &[video("1.mp4", 10.0), video("2.mp4", 10.0)],
            &output,
            &EventDispatcher::new(),
        );

        assert!(matches!(result, Err(CoreError::OutputMissing(p)) if p == output));
    }
}
