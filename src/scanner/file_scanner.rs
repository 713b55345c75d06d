use crate::config::ScanConfig;
use crate::error::{ConcatError, Result};
use crate::scanner::extension_filter::ExtensionFilter;
use crate::ui::output::format_bytes;
use std::fs::{self, Metadata};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, trace};
use walkdir::{DirEntry, WalkDir};

#[derive(Debug, Clone)]
pub struct SourceFile {
    pub source_path: PathBuf,
    pub relative_path: PathBuf,
    pub size: u64,
}

impl SourceFile {
    pub fn new(source_path: PathBuf, relative_path: PathBuf, size: u64) -> Self {
        Self {
            source_path,
            relative_path,
            size,
        }
    }

    /// Relative path with `/` separators, as written into block headers.
    pub fn display_path(&self) -> String {
        self.relative_path
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/")
    }
}

pub struct FileScanner {
    filter: ExtensionFilter,
    follow_links: bool,
    max_depth: Option<usize>,
}

impl FileScanner {
    pub fn new(extension: &str, config: &ScanConfig) -> Self {
        Self {
            filter: ExtensionFilter::new(extension, config),
            follow_links: config.follow_links,
            max_depth: config.max_depth,
        }
    }

    /// Keep `path` out of the results; used for the output file itself.
    pub fn excluding<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.filter = self.filter.with_excluded_path(path);
        self
    }

    /// Walks `root` recursively and returns every matching file.
    ///
    /// Entries are visited in file name order within each directory, so the
    /// result is stable across runs over an unchanged tree. Any traversal
    /// error aborts the scan.
    pub fn scan_directory<P: AsRef<Path>>(&self, root: P) -> Result<Vec<SourceFile>> {
        let root_path = root.as_ref();

        if !root_path.exists() {
            return Err(ConcatError::RootNotFound {
                path: root_path.to_path_buf(),
            });
        }

        if !root_path.is_dir() {
            return Err(ConcatError::NotADirectory {
                path: root_path.to_path_buf(),
            });
        }

        let mut walker = WalkDir::new(root_path)
            .follow_links(self.follow_links)
            .sort_by_file_name();
        if let Some(depth) = self.max_depth {
            walker = walker.max_depth(depth);
        }

        let mut files = Vec::new();
        for entry in walker.into_iter().filter_entry(|e| self.should_visit(e)) {
            let entry = entry?;

            if entry.file_type().is_dir() {
                continue;
            }

            if !self.filter.is_match(entry.path()) {
                trace!(path = %entry.path().display(), "skipped");
                continue;
            }

            let Some(metadata) = file_metadata(&entry)? else {
                continue;
            };

            files.push(self.process_file(&entry, &metadata, root_path)?);
        }

        debug!(
            root = %root_path.display(),
            suffix = self.filter.suffix(),
            count = files.len(),
            "scan finished"
        );

        Ok(files)
    }

    fn should_visit(&self, entry: &DirEntry) -> bool {
        // The root is always walked, even when it is itself a hidden directory
        entry.depth() == 0 || self.filter.is_hidden_allowed(entry.file_name())
    }

    fn process_file(
        &self,
        entry: &DirEntry,
        metadata: &Metadata,
        root_path: &Path,
    ) -> Result<SourceFile> {
        let path = entry.path();

        let relative_path = path
            .strip_prefix(root_path)
            .map_err(|_| ConcatError::Walk {
                path: path.to_path_buf(),
                message: format!("not located under {}", root_path.display()),
            })?
            .to_path_buf();

        Ok(SourceFile::new(path.to_path_buf(), relative_path, metadata.len()))
    }

    pub fn get_statistics(&self, files: &[SourceFile]) -> ScanStatistics {
        let (largest_file_size, largest_file_path) = files
            .iter()
            .max_by_key(|f| f.size)
            .map(|f| (f.size, f.relative_path.clone()))
            .unwrap_or((0, PathBuf::new()));

        ScanStatistics {
            total_files: files.len(),
            total_size: files.iter().map(|f| f.size).sum(),
            largest_file_size,
            largest_file_path,
        }
    }
}

/// Metadata of the file an entry names, or `None` when it is not a file.
///
/// A symlink is resolved even when links are not followed, so a link to a
/// file counts as that file. A dangling link is a read error.
fn file_metadata(entry: &DirEntry) -> Result<Option<Metadata>> {
    if entry.path_is_symlink() && !entry.file_type().is_file() {
        let metadata = fs::metadata(entry.path()).map_err(|source| ConcatError::ReadFile {
            path: entry.path().to_path_buf(),
            source,
        })?;
        return Ok(metadata.is_file().then_some(metadata));
    }

    if entry.file_type().is_file() {
        Ok(Some(entry.metadata()?))
    } else {
        Ok(None)
    }
}

#[derive(Debug, Default)]
pub struct ScanStatistics {
    pub total_files: usize,
    pub total_size: u64,
    pub largest_file_size: u64,
    pub largest_file_path: PathBuf,
}

impl ScanStatistics {
    pub fn display_summary(&self) -> String {
        let mut summary = format!(
            "Scan Results:\n  Total files: {}\n  Total size: {}\n",
            self.total_files,
            format_bytes(self.total_size)
        );

        if self.largest_file_size > 0 {
            summary.push_str(&format!(
                "  Largest file: {} ({})\n",
                self.largest_file_path.display(),
                format_bytes(self.largest_file_size)
            ));
        }

        summary
    }
}
