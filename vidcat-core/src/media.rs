//! Per-file video metadata.

use std::path::PathBuf;

/// Metadata for one input file, filled in by the probe stage.
///
/// Immutable once constructed; every later stage reads it as-is. The
/// duration is the only field the merge itself depends on (it seeds the
/// progress denominator), the rest is reported to the user.
#[derive(Debug, Clone)]
pub struct VideoInfo {
    pub filename: String,
    pub path: PathBuf,
    /// Container duration in seconds. Always > 0 for a probed file.
    pub duration_secs: f64,
    /// Codec name of the first video stream, e.g. "h264".
    pub codec: String,
    pub width: u32,
    pub height: u32,
    /// Stream bitrate in kbps (bits/s divided by 1000, floored).
    pub bitrate_kbps: u64,
    /// Average frame rate, rounded to 2 decimal places. 0.0 when unknown.
    pub fps: f64,
}

impl VideoInfo {
    pub fn resolution(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }

    /// One-line summary in the form "h264 1920x1080 4500kbps 29.97fps".
    pub fn summary(&self) -> String {
        format!(
            "{} {} {}kbps {}fps",
            self.codec,
            self.resolution(),
            self.bitrate_kbps,
            self.fps
        )
    }
}

/// Parses a rational frame-rate string such as "30000/1001" into a float
/// rounded to 2 decimal places.
///
/// A plain number without a slash is accepted as-is. Returns `None` for a
/// zero denominator or unparsable input; callers decide the fallback.
pub fn parse_frame_rate(rate: &str) -> Option<f64> {
    let value = match rate.split_once('/') {
        Some((num, den)) => {
            let num = num.trim().parse::<f64>().ok()?;
            let den = den.trim().parse::<f64>().ok()?;
            if den == 0.0 {
                return None;
            }
            num / den
        }
        None => rate.trim().parse::<f64>().ok()?,
    };

    if !value.is_finite() {
        return None;
    }
    Some((value * 100.0).round() / 100.0)
}
