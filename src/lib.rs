pub mod cli;
pub mod concatenator;
pub mod config;
pub mod error;
pub mod logging;
pub mod scanner;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use config::{CliOverrides, Config, OutputConfig, ScanConfig};
pub use error::{ConcatError, Result, UserFriendlyError};

// Core functionality re-exports
pub use concatenator::{ConcatProgress, ConcatReport, Concatenator};
pub use scanner::{ExtensionFilter, FileScanner, SourceFile};
pub use ui::{OutputFormatter, OutputMode, ProgressManager};

use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

/// Main library interface: discovers matching files and writes them into
/// the output file.
pub struct Concat {
    config: Config,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
}

impl Concat {
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(!quiet && output_mode == OutputMode::Human);

        Self {
            config,
            output_formatter,
            progress_manager,
        }
    }

    /// Create a Concat instance from CLI arguments
    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        let output_mode = match cli_args.output_format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        };

        Ok(Self::new(config, output_mode, cli_args.verbose, cli_args.quiet))
    }

    /// Concatenates every `*.<extension>` file under `root` into the output
    /// file inside `root`.
    ///
    /// Discovery finishes before the output file is opened, so a missing
    /// root never leaves an output file behind. The output file itself is
    /// never part of its own input.
    pub fn concatenate(&self, root: &Path, extension: &str) -> Result<ConcatReport> {
        let start_time = Instant::now();
        let extension = normalize_extension(extension)?;
        let output_path = self.config.output_path(root);

        let files = self.discover(root, &extension, &output_path)?;

        let pb = self.progress_manager.create_file_progress(files.len() as u64);
        let progress_callback = {
            let pb = pb.clone();
            move |progress: &ConcatProgress| ui::progress::update_file_progress(&pb, progress)
        };

        let progress = Concatenator::new(&output_path).concatenate(&files, Some(&progress_callback));
        let progress = match progress {
            Ok(progress) => progress,
            Err(e) => {
                pb.abandon();
                return Err(e);
            }
        };

        ui::progress::finish_progress_with_summary(
            &pb,
            &format!("Concatenated {} files", progress.files_written),
            progress.elapsed(),
        );

        info!(
            output = %output_path.display(),
            files = progress.files_written,
            bytes = progress.bytes_written,
            "concatenation complete"
        );

        Ok(ConcatReport::new(
            &extension,
            root.to_path_buf(),
            output_path,
            &files,
            Some(&progress),
            start_time.elapsed(),
        ))
    }

    /// Runs discovery only and reports what [`Concat::concatenate`] would write.
    pub fn plan(&self, root: &Path, extension: &str) -> Result<ConcatReport> {
        let start_time = Instant::now();
        let extension = normalize_extension(extension)?;
        let output_path = self.config.output_path(root);

        let files = self.discover(root, &extension, &output_path)?;

        Ok(ConcatReport::new(
            &extension,
            root.to_path_buf(),
            output_path,
            &files,
            None,
            start_time.elapsed(),
        ))
    }

    fn discover(&self, root: &Path, extension: &str, output_path: &Path) -> Result<Vec<SourceFile>> {
        self.output_formatter.info(&format!(
            "Searching {} for .{} files",
            root.display(),
            extension
        ));

        let scanner = FileScanner::new(extension, &self.config.scan).excluding(output_path);
        let files = scanner.scan_directory(root)?;

        self.output_formatter
            .debug(&scanner.get_statistics(&files).display_summary());

        if files.is_empty() {
            self.output_formatter.warning(&format!(
                "No .{} files found under {}",
                extension,
                root.display()
            ));
        }

        Ok(files)
    }

    /// Get output formatter reference
    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    /// Handle error with user-friendly output
    pub fn handle_error(&self, error: &ConcatError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}

/// Concatenates with default settings and no terminal output.
pub fn concatenate_files<P: Into<PathBuf>>(root: P, extension: &str) -> Result<ConcatReport> {
    let root = root.into();
    Concat::new(Config::default(), OutputMode::Plain, 0, true).concatenate(&root, extension)
}

fn normalize_extension(extension: &str) -> Result<String> {
    cli::validate_extension(extension).map_err(|_| ConcatError::InvalidExtension {
        extension: extension.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn quiet_concat() -> Concat {
        Concat::new(Config::default(), OutputMode::Plain, 0, true)
    }

    #[test]
    fn test_round_trip_two_files() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("a.ext"), "X").unwrap();
        fs::write(root.join("b.ext"), "Y").unwrap();
        fs::write(root.join("c.other"), "Z").unwrap();

        let report = quiet_concat().concatenate(root, "ext").unwrap();

        assert_eq!(report.total_files, 2);
        assert_eq!(report.output_path, root.join("concat.txt"));
        assert_eq!(
            fs::read_to_string(root.join("concat.txt")).unwrap(),
            "# a.ext\n\nX\n\n# b.ext\n\nY\n\n"
        );
    }

    #[test]
    fn test_rerun_is_byte_identical() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir(root.join("nested")).unwrap();
        fs::write(root.join("one.txt"), "first\n").unwrap();
        fs::write(root.join("nested/two.txt"), "second\n").unwrap();

        // The output shares the extension, so a second run must not read it back
        quiet_concat().concatenate(root, "txt").unwrap();
        let first = fs::read(root.join("concat.txt")).unwrap();

        quiet_concat().concatenate(root, "txt").unwrap();
        let second = fs::read(root.join("concat.txt")).unwrap();

        assert_eq!(first, second);
        assert_eq!(
            String::from_utf8(first).unwrap(),
            "# nested/two.txt\n\nsecond\n\n\n# one.txt\n\nfirst\n\n\n"
        );
    }

    #[test]
    fn test_no_matches_creates_empty_output() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("readme.md"), "docs").unwrap();

        let report = quiet_concat().concatenate(root, "rs").unwrap();

        assert_eq!(report.total_files, 0);
        assert_eq!(fs::read_to_string(root.join("concat.txt")).unwrap(), "");
    }

    #[test]
    fn test_missing_root_creates_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("absent");

        let result = quiet_concat().concatenate(&missing, "rs");

        assert!(matches!(result, Err(ConcatError::RootNotFound { .. })));
        assert!(!missing.join("concat.txt").exists());
        assert!(!missing.exists());
    }

    #[test]
    fn test_plan_does_not_write() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("a.rs"), "fn main() {}").unwrap();

        let report = quiet_concat().plan(root, "rs").unwrap();

        assert!(report.dry_run);
        assert_eq!(report.files[0].path, "a.rs");
        assert!(!root.join("concat.txt").exists());
    }

    #[test]
    fn test_custom_output_name() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("a.rs"), "a").unwrap();

        let mut config = Config::default();
        config.output.file_name = "bundle.rs".to_string();
        let concat = Concat::new(config, OutputMode::Plain, 0, true);

        concat.concatenate(root, "rs").unwrap();
        concat.concatenate(root, "rs").unwrap();

        assert_eq!(
            fs::read_to_string(root.join("bundle.rs")).unwrap(),
            "# a.rs\n\na\n\n"
        );
    }

    #[test]
    fn test_invalid_extension() {
        let temp_dir = TempDir::new().unwrap();
        let result = quiet_concat().concatenate(temp_dir.path(), "");
        assert!(matches!(result, Err(ConcatError::InvalidExtension { .. })));
    }

    #[test]
    fn test_convenience_function() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("x.md"), "# Title").unwrap();

        let report = concatenate_files(temp_dir.path(), ".md").unwrap();

        assert_eq!(report.extension, "md");
        assert!(report.completion_message().contains("All .md files"));
    }
}
