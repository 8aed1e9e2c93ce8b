//! Merge progress tracking.
//!
//! Converts the elapsed-time markers on ffmpeg's stderr into an integer
//! percentage that only ever moves forward. The tracker lives for one
//! merge invocation and is discarded afterward.

use crate::error::{CoreError, CoreResult};

/// Tracks merge progress against the summed input duration.
///
/// Percentages are integers in `[0, 100]` and strictly increase between
/// emissions, so a caller sees at most 101 events per merge no matter how
/// often ffmpeg reports.
#[derive(Debug)]
pub struct ProgressTracker {
    total_duration: f64,
    last_emitted: u8,
}

impl ProgressTracker {
    /// Creates a tracker for the given progress denominator.
    ///
    /// Fails with `ZeroTotalDuration` when the denominator is zero or
    /// non-finite. The orchestrator calls this before spawning ffmpeg, so
    /// a merge with no usable duration never starts a subprocess.
    pub fn new(total_duration: f64) -> CoreResult<Self> {
        if total_duration <= 0.0 || !total_duration.is_finite() {
            return Err(CoreError::ZeroTotalDuration);
        }
        Ok(Self {
            total_duration,
            last_emitted: 0,
        })
    }

    pub fn total_duration(&self) -> f64 {
        self.total_duration
    }

    /// Feeds an elapsed-seconds sample and returns the new percentage if
    /// it advanced past the last emitted value.
    ///
    /// Non-finite samples are ignored; `f64::min` would otherwise discard
    /// the NaN operand and report a spurious 100%.
    pub fn advance(&mut self, elapsed_secs: f64) -> Option<u8> {
        if !elapsed_secs.is_finite() {
            return None;
        }
        let candidate = (elapsed_secs / self.total_duration * 100.0).min(100.0).floor() as u8;
        if candidate > self.last_emitted {
            self.last_emitted = candidate;
            Some(candidate)
        } else {
            None
        }
    }
}
