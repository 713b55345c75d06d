use crate::error::{ConcatError, Result};
use crate::scanner::SourceFile;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct ConcatProgress {
    pub files_written: usize,
    pub total_files: usize,
    pub bytes_written: u64,
    pub current_file: Option<String>,
    pub start_time: Instant,
}

impl ConcatProgress {
    pub fn new(total_files: usize) -> Self {
        Self {
            files_written: 0,
            total_files,
            bytes_written: 0,
            current_file: None,
            start_time: Instant::now(),
        }
    }

    pub fn update_file(&mut self, display_path: String, bytes: u64) {
        self.files_written += 1;
        self.bytes_written += bytes;
        self.current_file = Some(display_path);
    }

    pub fn percentage(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            (self.files_written as f64 / self.total_files as f64) * 100.0
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Writes one block: `# <header>`, a blank line, the contents, then `\n\n`.
///
/// Returns the number of bytes written.
pub fn write_block<W: Write>(writer: &mut W, header: &str, contents: &str) -> std::io::Result<u64> {
    let prefix = format!("# {}\n\n", header);
    writer.write_all(prefix.as_bytes())?;
    writer.write_all(contents.as_bytes())?;
    writer.write_all(b"\n\n")?;

    Ok((prefix.len() + contents.len() + 2) as u64)
}

pub struct Concatenator {
    output_path: PathBuf,
    buffer_size: usize,
}

impl Concatenator {
    pub fn new<P: Into<PathBuf>>(output_path: P) -> Self {
        Self {
            output_path: output_path.into(),
            buffer_size: 64 * 1024, // 64KB buffer
        }
    }

    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.max(4096); // Minimum 4KB buffer
        self
    }

    /// Truncates the output file and writes one block per file, in order.
    ///
    /// Each input is read completely into memory before it is written, so
    /// peak memory follows the largest single input. The first unreadable
    /// input aborts the run and leaves whatever was already written behind.
    pub fn concatenate(
        &self,
        files: &[SourceFile],
        progress_callback: Option<&dyn Fn(&ConcatProgress)>,
    ) -> Result<ConcatProgress> {
        let mut progress = ConcatProgress::new(files.len());

        let output = fs::File::create(&self.output_path).map_err(|e| self.write_error(e))?;
        let mut writer = BufWriter::with_capacity(self.buffer_size, output);

        for file in files {
            if let Some(callback) = progress_callback {
                callback(&progress);
            }

            let contents = fs::read_to_string(&file.source_path)
                .map_err(|e| ConcatError::read_failure(file.source_path.clone(), e))?;

            let header = file.display_path();
            let written = write_block(&mut writer, &header, &contents)
                .map_err(|e| self.write_error(e))?;

            debug!(file = %header, bytes = written, "appended block");
            progress.update_file(header, written);
        }

        writer.flush().map_err(|e| self.write_error(e))?;

        if let Some(callback) = progress_callback {
            callback(&progress);
        }

        Ok(progress)
    }

    fn write_error(&self, source: std::io::Error) -> ConcatError {
        ConcatError::WriteOutput {
            path: self.output_path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::path::Path;
    use tempfile::TempDir;

    fn source(root: &Path, relative: &str, content: &str) -> SourceFile {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        SourceFile::new(path, PathBuf::from(relative), content.len() as u64)
    }

    #[test]
    fn test_block_format() {
        let mut buffer = Vec::new();
        let written = write_block(&mut buffer, "src/a.rs", "fn a() {}").unwrap();

        assert_eq!(String::from_utf8(buffer).unwrap(), "# src/a.rs\n\nfn a() {}\n\n");
        assert_eq!(written, 23);
    }

    #[test]
    fn test_two_files_in_order() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let files = vec![source(root, "a.ext", "X"), source(root, "b.ext", "Y")];

        let output = root.join("concat.txt");
        let progress = Concatenator::new(&output).concatenate(&files, None).unwrap();

        assert_eq!(progress.files_written, 2);
        assert_eq!(progress.percentage(), 100.0);
        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            "# a.ext\n\nX\n\n# b.ext\n\nY\n\n"
        );
    }

    #[test]
    fn test_no_files_creates_empty_output() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("concat.txt");

        let progress = Concatenator::new(&output).concatenate(&[], None).unwrap();

        assert_eq!(progress.files_written, 0);
        assert!(output.exists());
        assert_eq!(fs::read_to_string(&output).unwrap(), "");
    }

    #[test]
    fn test_existing_output_is_truncated() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let output = root.join("concat.txt");
        fs::write(&output, "stale content that is much longer than the new output").unwrap();

        let files = vec![source(root, "one.md", "1")];
        Concatenator::new(&output).concatenate(&files, None).unwrap();

        assert_eq!(fs::read_to_string(&output).unwrap(), "# one.md\n\n1\n\n");
    }

    #[test]
    fn test_invalid_utf8_aborts() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let binary = root.join("blob.dat");
        fs::write(&binary, [0xff, 0xfe, 0x00, 0x80]).unwrap();

        let files = vec![SourceFile::new(binary, PathBuf::from("blob.dat"), 4)];
        let result = Concatenator::new(root.join("concat.txt")).concatenate(&files, None);

        assert!(matches!(result, Err(ConcatError::InvalidEncoding { .. })));
    }

    #[test]
    fn test_missing_input_aborts() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let files = vec![SourceFile::new(root.join("gone.rs"), PathBuf::from("gone.rs"), 0)];

        let result = Concatenator::new(root.join("concat.txt")).concatenate(&files, None);

        assert!(matches!(result, Err(ConcatError::ReadFile { .. })));
    }

    #[test]
    fn test_unwritable_output() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("missing_dir").join("concat.txt");

        let result = Concatenator::new(&output).concatenate(&[], None);

        assert!(matches!(result, Err(ConcatError::WriteOutput { .. })));
    }

    #[test]
    fn test_progress_callback() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let files = vec![source(root, "a.rs", "a"), source(root, "b.rs", "b")];

        let calls = Cell::new(0);
        let callback = |_: &ConcatProgress| calls.set(calls.get() + 1);

        Concatenator::new(root.join("concat.txt"))
            .with_buffer_size(1)
            .concatenate(&files, Some(&callback))
            .unwrap();

        // once per file plus the final update
        assert_eq!(calls.get(), 3);
    }
}
