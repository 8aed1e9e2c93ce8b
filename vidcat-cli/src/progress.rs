//! Terminal progress rendering.

use indicatif::{ProgressBar, ProgressStyle};
use vidcat_core::{format_bytes, format_duration, Event, EventHandler};

/// Renders core merge events as an indicatif bar on stderr.
///
/// The bar spans 0-100 and only ever moves forward, mirroring the
/// percentage contract of the core tracker. Safe to register alongside
/// other handlers; it ignores events it does not render.
pub struct ProgressBarHandler {
    bar: ProgressBar,
}

impl ProgressBarHandler {
    pub fn new() -> Self {
        let bar = ProgressBar::hidden();
        bar.set_style(
            ProgressStyle::with_template("{msg} [{bar:40.cyan/blue}] {pos:>3}%")
                .expect("static template is valid")
                .progress_chars("=> "),
        );
        Self { bar }
    }
}

impl Default for ProgressBarHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl EventHandler for ProgressBarHandler {
    fn handle(&self, event: &Event) {
        match event {
            Event::MergeStarted {
                input_count,
                total_duration_secs,
                ..
            } => {
                self.bar.set_length(100);
                self.bar.set_position(0);
                self.bar.set_message(format!(
                    "Merging {} files ({})",
                    input_count,
                    format_duration(*total_duration_secs)
                ));
                self.bar
                    .set_draw_target(indicatif::ProgressDrawTarget::stderr());
            }
            Event::MergeProgress { percent } => {
                self.bar.set_position(u64::from(*percent));
            }
            Event::MergeComplete {
                output_size,
                elapsed,
                ..
            } => {
                self.bar.finish_with_message(format!(
                    "Merged {} in {}",
                    format_bytes(*output_size),
                    format_duration(elapsed.as_secs_f64())
                ));
            }
            Event::Warning { message } => {
                self.bar.println(format!("warning: {message}"));
            }
            _ => {}
        }
    }
}
