//! Error types for the vidcat core library.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by the merge pipeline.
///
/// Nothing in the pipeline is retried: every variant is fatal for the
/// current invocation and carries whatever diagnostic text the external
/// tool produced, so a failure can be diagnosed without re-running.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("required external tool not found: {0}")]
    DependencyNotFound(String),

    #[error("failed to start '{0}': {1}")]
    CommandStart(String, std::io::Error),

    #[error("no .{extension} files found in {dir}")]
    NoFilesFound { extension: String, dir: PathBuf },

    #[error("found {0} input file(s); merging needs at least 2")]
    NotEnoughInputs(usize),

    #[error("ffprobe failed for {path}: {detail}")]
    Probe { path: PathBuf, detail: String },

    #[error("failed to write concat list: {0}")]
    ListWrite(std::io::Error),

    #[error("total input duration is zero; cannot compute merge progress")]
    ZeroTotalDuration,

    #[error("ffmpeg merge failed ({status}): {log}")]
    MergeFailed { status: String, log: String },

    #[error("merge exceeded the configured timeout of {0:?}")]
    MergeTimeout(Duration),

    #[error("merged output file does not exist: {0}")]
    OutputMissing(PathBuf),

    #[error("merged output failed verification: {0}")]
    VerifyFailed(String),
}

/// Result type for vidcat-core operations.
pub type CoreResult<T> = std::result::Result<T, CoreError>;
