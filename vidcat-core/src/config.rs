//! Configuration for a merge run.

use crate::error::{CoreError, CoreResult};
use std::path::PathBuf;
use std::time::Duration;

/// Default container extension for inputs and the merged output.
pub const DEFAULT_CONTAINER_EXT: &str = "mp4";

/// Settings shared by every stage of one merge invocation.
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Directory scanned for input files.
    pub input_dir: PathBuf,
    /// Directory the merged output (and the transient concat list) is written to.
    pub output_dir: PathBuf,
    /// Container extension matched during discovery and given to the output.
    pub container_ext: String,
    /// Wall-clock limit for the ffmpeg merge process. `None` means no limit.
    pub merge_timeout: Option<Duration>,
}

impl CoreConfig {
    pub fn new(input_dir: PathBuf, output_dir: PathBuf) -> Self {
        Self {
            input_dir,
            output_dir,
            container_ext: DEFAULT_CONTAINER_EXT.to_string(),
            merge_timeout: None,
        }
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.container_ext.is_empty() || self.container_ext.contains('.') {
            return Err(CoreError::Config(format!(
                "invalid container extension {:?}",
                self.container_ext
            )));
        }
        Ok(())
    }
}
