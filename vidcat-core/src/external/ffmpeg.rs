//! FFmpeg concat execution.
//!
//! Builds the stream-copy concat command and runs it while draining the
//! process's diagnostic output. `ffmpeg-sidecar` reads the child's stderr
//! on a dedicated thread and hands it to us as parsed events, so the
//! child can never stall on a full pipe while we do per-line work.

use crate::error::{CoreError, CoreResult};
use crate::events::{Event, EventDispatcher};
use crate::progress::ProgressTracker;
use crate::utils::parse_ffmpeg_time;

use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel};
use std::path::Path;
use std::time::{Duration, Instant};

/// Seam for running the merge process, so orchestration can be exercised
/// without a real ffmpeg binary.
pub trait MergeEngine {
    fn run(
        &self,
        list_path: &Path,
        output_path: &Path,
        tracker: &mut ProgressTracker,
        events: &EventDispatcher,
        timeout: Option<Duration>,
    ) -> CoreResult<()>;
}

/// Production engine backed by ffmpeg-sidecar.
#[derive(Debug, Clone, Default)]
pub struct FfmpegMergeEngine;

impl MergeEngine for FfmpegMergeEngine {
    fn run(
        &self,
        list_path: &Path,
        output_path: &Path,
        tracker: &mut ProgressTracker,
        events: &EventDispatcher,
        timeout: Option<Duration>,
    ) -> CoreResult<()> {
        run_concat_merge(list_path, output_path, tracker, events, timeout)
    }
}

/// Builds `ffmpeg -f concat -safe 0 -i <list> -c copy -y <output>`.
///
/// Stream copy only: the inputs are joined byte-for-byte with no
/// re-encoding. An existing destination file is overwritten.
fn build_concat_command(list_path: &Path, output_path: &Path) -> FfmpegCommand {
    let mut cmd = FfmpegCommand::new();
    cmd.format("concat");
    cmd.args(["-safe", "0"]);
    cmd.input(list_path.to_string_lossy().as_ref());
    cmd.args(["-c", "copy"]);
    cmd.overwrite();
    cmd.output(output_path.to_string_lossy().as_ref());
    cmd
}

/// Translates the diagnostic stream of one merge run.
///
/// Progress markers feed the tracker and fan out as `MergeProgress`
/// events; error-level lines accumulate so a failed run can hand the
/// captured text back to the caller.
struct MergeEventHandler<'a> {
    tracker: &'a mut ProgressTracker,
    events: &'a EventDispatcher,
    diagnostic_log: String,
}

impl<'a> MergeEventHandler<'a> {
    fn new(tracker: &'a mut ProgressTracker, events: &'a EventDispatcher) -> Self {
        Self {
            tracker,
            events,
            diagnostic_log: String::new(),
        }
    }

    fn handle_event(&mut self, event: FfmpegEvent) {
        match event {
            FfmpegEvent::Progress(progress) => self.handle_progress(&progress.time),
            FfmpegEvent::Log(LogLevel::Error | LogLevel::Fatal, message) => {
                self.handle_error_line(&message);
            }
            FfmpegEvent::Log(LogLevel::Warning, message) => self.handle_warning(message),
            FfmpegEvent::Error(message) => self.handle_error_line(&message),
            _ => {}
        }
    }

    fn handle_progress(&mut self, time: &str) {
        if let Some(elapsed) = parse_ffmpeg_time(time) {
            if let Some(percent) = self.tracker.advance(elapsed) {
                self.events.emit(Event::MergeProgress { percent });
            }
        }
    }

    fn handle_warning(&mut self, message: String) {
        log::debug!("ffmpeg: {message}");
        self.events.emit(Event::Warning { message });
    }

    fn handle_error_line(&mut self, message: &str) {
        log::debug!("ffmpeg: {message}");
        self.diagnostic_log.push_str(message);
        self.diagnostic_log.push('\n');
    }

    fn into_log(self) -> String {
        self.diagnostic_log
    }
}

/// Spawns the merge process and pumps its diagnostic stream until it
/// terminates.
///
/// Each `time=HH:MM:SS[.frac]` marker is converted to elapsed seconds and
/// fed to the tracker; an `Event::MergeProgress` goes out only when the
/// integer percentage advances. Error-level diagnostic lines are
/// accumulated and returned inside `MergeFailed` on a non-zero exit.
pub fn run_concat_merge(
    list_path: &Path,
    output_path: &Path,
    tracker: &mut ProgressTracker,
    events: &EventDispatcher,
    timeout: Option<Duration>,
) -> CoreResult<()> {
    let mut cmd = build_concat_command(list_path, output_path);
    log::debug!("FFmpeg command: {cmd:?}");

    let start = Instant::now();
    let mut child = cmd.spawn().map_err(spawn_error)?;
    let mut handler = MergeEventHandler::new(tracker, events);

    for event in child.iter().map_err(spawn_error)? {
        handler.handle_event(event);

        if let Some(limit) = timeout {
            if start.elapsed() > limit {
                log::error!("Merge ran past {limit:?}, killing ffmpeg");
                child.kill()?;
                let _ = child.wait();
                return Err(CoreError::MergeTimeout(limit));
            }
        }
    }

    let status = child.wait()?;
    if status.success() {
        log::info!("ffmpeg merge finished in {:.1?}", start.elapsed());
        Ok(())
    } else {
        Err(CoreError::MergeFailed {
            status: status.to_string(),
            log: handler.into_log(),
        })
    }
}

/// Normalizes sidecar spawn errors into `CommandStart`.
fn spawn_error(err: impl std::fmt::Display) -> CoreError {
    CoreError::CommandStart(
        "ffmpeg".to_string(),
        std::io::Error::new(std::io::ErrorKind::Other, err.to_string()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventHandler;
    use std::sync::{Arc, Mutex};

    struct Recorder(Mutex<Vec<u8>>);

    impl EventHandler for Recorder {
        fn handle(&self, event: &Event) {
            if let Event::MergeProgress { percent } = event {
                self.0.lock().unwrap().push(*percent);
            }
        }
    }

    #[test]
    fn test_progress_markers_drive_the_tracker() {
        let recorder = Arc::new(Recorder(Mutex::new(Vec::new())));
        let mut dispatcher = EventDispatcher::new();
        dispatcher.add_handler(recorder.clone());

        let mut tracker = ProgressTracker::new(100.0).unwrap();
        let mut handler = MergeEventHandler::new(&mut tracker, &dispatcher);

        handler.handle_progress("00:00:10.00");
        handler.handle_progress("00:00:50.00");
        handler.handle_progress("00:00:50.00"); // repeat must not re-emit
        handler.handle_progress("not-a-time");
        handler.handle_progress("00:01:40.00");

        assert_eq!(*recorder.0.lock().unwrap(), vec![10, 50, 100]);
    }

    #[test]
    fn test_error_lines_accumulate_in_order() {
        let dispatcher = EventDispatcher::new();
        let mut tracker = ProgressTracker::new(10.0).unwrap();
        let mut handler = MergeEventHandler::new(&mut tracker, &dispatcher);

        handler.handle_error_line("output/video/1.mp4: No such file or directory");
        handler.handle_progress("00:00:01.00");
        handler.handle_error_line("Error opening input file");

        assert_eq!(
            handler.into_log(),
            "output/video/1.mp4: No such file or directory\nError opening input file\n"
        );
    }
}
