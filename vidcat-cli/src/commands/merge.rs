//! The `merge` command: discover, probe, concatenate, verify.

use crate::logging::get_timestamp;
use crate::progress::ProgressBarHandler;
use crate::MergeArgs;

use anyhow::Context;
use console::style;
use log::info;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use vidcat_core::{
    format_bytes, format_duration, CoreConfig, Event, EventDispatcher,
};

pub fn run_merge(args: MergeArgs) -> anyhow::Result<()> {
    vidcat_core::check_external_tools()
        .context("ffmpeg and ffprobe must be installed and on PATH")?;

    let mut config = CoreConfig::new(args.input_dir, args.output_dir);
    config.merge_timeout = args.timeout_secs.map(Duration::from_secs);
    config.validate()?;

    // Input dir self-heals so a first run leaves somewhere to put files
    std::fs::create_dir_all(&config.input_dir)
        .with_context(|| format!("creating input directory {}", config.input_dir.display()))?;
    std::fs::create_dir_all(&config.output_dir)
        .with_context(|| format!("creating output directory {}", config.output_dir.display()))?;

    let (files, order) = vidcat_core::find_video_files(&config.input_dir, &config.container_ext)?;

    let mut events = EventDispatcher::new();
    events.add_handler(Arc::new(ProgressBarHandler::new()));
    events.emit(Event::DiscoveryComplete {
        file_count: files.len(),
        order,
    });

    info!("Probing {} input file(s)...", files.len());
    let videos = vidcat_core::probe_all(&files)?;
    for video in &videos {
        info!(
            "[{}] {} {}",
            video.filename,
            format_duration(video.duration_secs),
            video.summary()
        );
        events.emit(Event::FileProbed {
            filename: video.filename.clone(),
            duration_secs: video.duration_secs,
            summary: video.summary(),
        });
    }

    let output_path = config.output_dir.join(output_name(
        args.output_name,
        &config.container_ext,
    ));

    let result = vidcat_core::merge_videos(&config, &videos, &output_path, &events)?;

    println!();
    println!(
        "{} {}",
        style("Output:").bold(),
        result.output_path.display()
    );
    println!(
        "{} {} ({} inputs, {} of video, merged in {})",
        style("Size:").bold(),
        format_bytes(result.output_size),
        result.input_count,
        format_duration(result.total_input_duration),
        format_duration(result.elapsed.as_secs_f64())
    );

    Ok(())
}

/// Resolves the output filename: the caller-supplied name with the
/// container extension appended when missing, or a timestamped default.
fn output_name(requested: Option<String>, ext: &str) -> PathBuf {
    let suffix = format!(".{ext}");
    match requested {
        Some(name) if name.to_ascii_lowercase().ends_with(&suffix) => PathBuf::from(name),
        Some(name) => PathBuf::from(format!("{name}{suffix}")),
        None => PathBuf::from(format!("merged_{}{suffix}", get_timestamp())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_name_appends_extension() {
        assert_eq!(
            output_name(Some("holiday".to_string()), "mp4"),
            PathBuf::from("holiday.mp4")
        );
        assert_eq!(
            output_name(Some("holiday.mp4".to_string()), "mp4"),
            PathBuf::from("holiday.mp4")
        );
        assert_eq!(
            output_name(Some("HOLIDAY.MP4".to_string()), "mp4"),
            PathBuf::from("HOLIDAY.MP4")
        );
    }

    #[test]
    fn test_default_output_name_is_timestamped() {
        let name = output_name(None, "mp4");
        let name = name.to_string_lossy().into_owned();
        assert!(name.starts_with("merged_"));
        assert!(name.ends_with(".mp4"));
    }
}
