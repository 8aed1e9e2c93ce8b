//! Logging setup for the CLI.
//!
//! Every run logs to stderr and to a timestamped file in the output
//! directory, so a failed merge leaves a record of the ffmpeg diagnostics
//! alongside the partial output.

use anyhow::Context;
use log::LevelFilter;
use std::path::{Path, PathBuf};

/// Returns the current local timestamp formatted as "YYYYMMDD_HHMMSS".
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Configures fern to log to stderr and `<log_dir>/vidcat_<timestamp>.log`.
///
/// Returns the path of the log file. `verbose` raises the console level
/// from info to debug; the file always records debug.
pub fn setup(log_dir: &Path, verbose: bool) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("creating log directory {}", log_dir.display()))?;
    let log_path = log_dir.join(format!("vidcat_{}.log", get_timestamp()));

    let console_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let console = fern::Dispatch::new()
        .level(console_level)
        .format(|out, message, record| {
            out.finish(format_args!("[{}] {}", record.level(), message));
        })
        .chain(std::io::stderr());

    let file = fern::Dispatch::new()
        .level(LevelFilter::Debug)
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} [{}] [{}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.target(),
                message
            ));
        })
        .chain(fern::log_file(&log_path).context("opening log file")?);

    fern::Dispatch::new()
        .chain(console)
        .chain(file)
        .apply()
        .context("installing logger")?;

    Ok(log_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_shape() {
        let ts = get_timestamp();
        assert_eq!(ts.len(), 15);
        assert_eq!(&ts[8..9], "_");
        assert!(ts.replace('_', "").chars().all(|c| c.is_ascii_digit()));
    }
}
