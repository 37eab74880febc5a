//! Progress bar utilities for device processing.

use indicatif::{ProgressBar, ProgressStyle};

/// Create a progress bar for the files of one device.
pub fn create_device_progress(
    total_files: usize,
    device: &str,
    enabled: bool,
) -> Option<ProgressBar> {
    if !enabled || total_files == 0 {
        return None;
    }

    let pb = ProgressBar::new(total_files as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(&format!(
                "[{{elapsed_precise}}] {{bar:40.cyan/blue}} {{pos}}/{{len}} files - {device}"
            ))
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓▒░ "),
    );
    Some(pb)
}

/// Finish a progress bar with a message.
pub fn finish_progress(pb: Option<ProgressBar>, message: &str) {
    if let Some(pb) = pb {
        pb.finish_with_message(message.to_string());
    }
}
