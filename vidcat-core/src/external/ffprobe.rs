//! FFprobe integration for metadata probing and output verification.

use crate::error::{CoreError, CoreResult};
use crate::media::{parse_frame_rate, VideoInfo};

use ffprobe::{ffprobe, FfProbeError};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// Probes one input file for duration and first-video-stream parameters.
///
/// Duration is mandatory: it seeds the progress denominator, so a file
/// that probes without one fails the whole merge. The cosmetic fields
/// have explicit defaults (bitrate falls back from stream to container to
/// 0; fps defaults to 0.0 when the rational is absent or malformed).
pub fn probe_video(path: &Path) -> CoreResult<VideoInfo> {
    log::debug!("Running ffprobe on: {}", path.display());

    let metadata = ffprobe(path).map_err(|err| map_ffprobe_error(path, err))?;

    let duration_secs = metadata
        .format
        .duration
        .as_deref()
        .and_then(|d| d.parse::<f64>().ok())
        .filter(|d| *d > 0.0)
        .ok_or_else(|| CoreError::Probe {
            path: path.to_path_buf(),
            detail: "missing or unparsable container duration".to_string(),
        })?;

    let video_stream = metadata
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| CoreError::Probe {
            path: path.to_path_buf(),
            detail: "no video stream found".to_string(),
        })?;

    let (width, height) = match (video_stream.width, video_stream.height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => (w as u32, h as u32),
        _ => {
            return Err(CoreError::Probe {
                path: path.to_path_buf(),
                detail: format!(
                    "invalid stream dimensions: width={:?}, height={:?}",
                    video_stream.width, video_stream.height
                ),
            });
        }
    };

    let bitrate_kbps = video_stream
        .bit_rate
        .as_deref()
        .or(metadata.format.bit_rate.as_deref())
        .and_then(|b| b.parse::<u64>().ok())
        .map_or(0, |bits| bits / 1000);

    let fps = parse_frame_rate(&video_stream.avg_frame_rate).unwrap_or_else(|| {
        log::warn!(
            "Unusable frame rate {:?} for {}, reporting 0",
            video_stream.avg_frame_rate,
            path.display()
        );
        0.0
    });

    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Ok(VideoInfo {
        filename,
        path: path.to_path_buf(),
        duration_secs,
        codec: video_stream
            .codec_name
            .clone()
            .unwrap_or_else(|| "unknown".to_string()),
        width,
        height,
        bitrate_kbps,
        fps,
    })
}

/// Probes every file in parallel, failing on the first error.
///
/// Probe calls are independent, so completion order does not matter; the
/// returned vector keeps the merge order fixed by discovery.
pub fn probe_all(files: &[PathBuf]) -> CoreResult<Vec<VideoInfo>> {
    files
        .par_iter()
        .map(|path| probe_video(path))
        .collect::<CoreResult<Vec<_>>>()
}

/// Confirms the merged output is a well-formed media file.
///
/// A nonexistent path fails immediately without invoking ffprobe. For an
/// existing file success is purely exit-code based; no content-level
/// validation is attempted.
pub fn verify_output(path: &Path) -> CoreResult<()> {
    if !path.exists() {
        return Err(CoreError::OutputMissing(path.to_path_buf()));
    }

    match ffprobe(path) {
        Ok(_) => {
            log::info!("Output verified: {}", path.display());
            Ok(())
        }
        Err(err) => Err(CoreError::VerifyFailed(describe_ffprobe_error(&err))),
    }
}

fn map_ffprobe_error(path: &Path, err: FfProbeError) -> CoreError {
    match err {
        FfProbeError::Io(io_err) => CoreError::CommandStart("ffprobe".to_string(), io_err),
        other => CoreError::Probe {
            path: path.to_path_buf(),
            detail: describe_ffprobe_error(&other),
        },
    }
}

fn describe_ffprobe_error(err: &FfProbeError) -> String {
    match err {
        FfProbeError::Status(output) => format!(
            "ffprobe exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        ),
        other => format!("{other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_missing_output_skips_ffprobe() {
        // The path cannot exist, so this must fail fast with OutputMissing
        // rather than reporting an ffprobe failure.
        let result = verify_output(Path::new("/nonexistent/vidcat/out.mp4"));
        assert!(matches!(result, Err(CoreError::OutputMissing(_))));
    }
}
