//! The `info` command: probe and report without merging.

use crate::InfoArgs;

use anyhow::Context;
use console::style;
use vidcat_core::{format_duration, CoreConfig};

pub fn run_info(args: InfoArgs) -> anyhow::Result<()> {
    vidcat_core::check_external_tools()
        .context("ffmpeg and ffprobe must be installed and on PATH")?;

    let config = CoreConfig::new(args.input_dir, std::env::temp_dir());
    let (files, order) = vidcat_core::find_video_files(&config.input_dir, &config.container_ext)?;

    println!(
        "{} {} file(s) in {} ({:?} order)",
        style("Found").bold(),
        files.len(),
        config.input_dir.display(),
        order
    );

    let videos = vidcat_core::probe_all(&files)?;
    for video in &videos {
        println!(
            "  {}  {}  {}",
            style(&video.filename).bold(),
            format_duration(video.duration_secs),
            video.summary()
        );
    }

    let total: f64 = videos.iter().map(|v| v.duration_secs).sum();
    println!(
        "{} {}",
        style("Total duration:").bold(),
        format_duration(total)
    );

    Ok(())
}
