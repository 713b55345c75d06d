use crate::concatenator::ConcatProgress;
use crate::scanner::SourceFile;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

/// Outcome of a run, printed by the CLI in the selected output format.
#[derive(Debug, Clone, Serialize)]
pub struct ConcatReport {
    pub extension: String,
    pub root: PathBuf,
    pub output_path: PathBuf,
    pub dry_run: bool,
    pub files: Vec<ReportedFile>,
    pub total_files: usize,
    pub total_source_bytes: u64,
    pub bytes_written: u64,
    pub duration: Duration,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportedFile {
    pub path: String,
    pub size: u64,
}

impl From<&SourceFile> for ReportedFile {
    fn from(file: &SourceFile) -> Self {
        Self {
            path: file.display_path(),
            size: file.size,
        }
    }
}

impl ConcatReport {
    pub fn new(
        extension: &str,
        root: PathBuf,
        output_path: PathBuf,
        files: &[SourceFile],
        progress: Option<&ConcatProgress>,
        duration: Duration,
    ) -> Self {
        Self {
            extension: extension.to_string(),
            root,
            output_path,
            dry_run: progress.is_none(),
            files: files.iter().map(ReportedFile::from).collect(),
            total_files: files.len(),
            total_source_bytes: files.iter().map(|f| f.size).sum(),
            bytes_written: progress.map(|p| p.bytes_written).unwrap_or(0),
            duration,
            completed_at: Utc::now(),
        }
    }

    /// The line printed once the output file has been written.
    pub fn completion_message(&self) -> String {
        format!(
            "All .{} files have been concatenated into '{}'",
            self.extension,
            self.output_path.display()
        )
    }
}
