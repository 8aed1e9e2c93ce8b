//! Interactions with the external ffmpeg and ffprobe binaries.
//!
//! Probing and verification go through the `ffprobe` crate; the merge
//! itself runs through `ffmpeg-sidecar`, which turns ffmpeg's stderr into
//! a typed event stream.

use crate::error::{CoreError, CoreResult};

use std::io;
use std::process::{Command, Stdio};

pub mod ffmpeg;
pub mod ffprobe;

pub use ffmpeg::{run_concat_merge, FfmpegMergeEngine, MergeEngine};
pub use ffprobe::{probe_all, probe_video, verify_output};

/// Checks that both ffmpeg and ffprobe are on the execution path.
///
/// Run once before the pipeline starts; a missing tool is fatal.
pub fn check_external_tools() -> CoreResult<()> {
    check_dependency("ffmpeg")?;
    check_dependency("ffprobe")?;
    Ok(())
}

/// Verifies a required external command is available and executable by
/// running it with `-version` and discarding the output.
fn check_dependency(cmd_name: &str) -> CoreResult<()> {
    let result = Command::new(cmd_name)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(_) => {
            log::debug!("Found dependency: {cmd_name}");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("Dependency '{cmd_name}' not found.");
            Err(CoreError::DependencyNotFound(cmd_name.to_string()))
        }
        Err(e) => {
            log::error!("Failed to start dependency check command '{cmd_name}': {e}");
            Err(CoreError::CommandStart(cmd_name.to_string(), e))
        }
    }
}
