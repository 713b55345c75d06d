use crate::concatenator::ConcatProgress;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

pub struct ProgressManager {
    enabled: bool,
}

impl ProgressManager {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn create_file_progress(&self, total_files: u64) -> ProgressBar {
        if !self.enabled {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::with_draw_target(Some(total_files), ProgressDrawTarget::stderr());
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>7}/{len:7} files {msg}"
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-")
        );
        pb.set_message("Concatenating files...");
        pb
    }
}

pub fn update_file_progress(pb: &ProgressBar, progress: &ConcatProgress) {
    pb.set_position(progress.files_written as u64);

    match progress.current_file {
        Some(ref current_file) => pb.set_message(format!("Appended {}", current_file)),
        None => pb.set_message("Concatenating files..."),
    }
}

pub fn finish_progress_with_summary(pb: &ProgressBar, message: &str, duration: Duration) {
    let final_message = format!("{} (completed in {})", message, format_duration(duration));
    pb.finish_with_message(final_message);
}

pub(crate) fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 60 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs > 0 {
        format!("{}s", secs)
    } else {
        format!("{}ms", duration.as_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enabled_progress_bar() {
        let manager = ProgressManager::new(true);
        let pb = manager.create_file_progress(5);
        assert_eq!(pb.length(), Some(5));
    }

    #[test]
    fn test_disabled_progress_bar() {
        let manager = ProgressManager::new(false);
        assert!(manager.create_file_progress(10).is_hidden());
    }

    #[test]
    fn test_progress_updates() {
        let pb = ProgressBar::hidden();
        let mut progress = ConcatProgress::new(3);
        progress.update_file("src/lib.rs".to_string(), 40);

        update_file_progress(&pb, &progress);
        assert_eq!(pb.position(), 1);
        assert_eq!(pb.message(), "Appended src/lib.rs");

        finish_progress_with_summary(&pb, "Done", Duration::from_millis(3));
        assert!(pb.is_finished());
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(30)), "30s");
        assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
        assert_eq!(format_duration(Duration::from_secs(3661)), "61m 1s");
        assert_eq!(format_duration(Duration::from_millis(500)), "500ms");
    }
}
