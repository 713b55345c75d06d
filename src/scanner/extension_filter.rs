use crate::config::ScanConfig;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Decides which directory entries take part in a scan.
pub struct ExtensionFilter {
    suffix: String,
    include_hidden: bool,
    excluded: Option<PathBuf>,
}

impl ExtensionFilter {
    /// `extension` is expected without its leading dot.
    pub fn new(extension: &str, config: &ScanConfig) -> Self {
        Self {
            suffix: format!(".{}", extension),
            include_hidden: config.include_hidden,
            excluded: None,
        }
    }

    /// Never match `path`, even if its name carries the extension.
    pub fn with_excluded_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.excluded = Some(path.into());
        self
    }

    /// Same rule as the shell glob `*.<ext>`: case-sensitive, and the suffix
    /// alone (a file literally named `.rs`) does not count.
    pub fn matches_name(&self, name: &str) -> bool {
        name.len() > self.suffix.len() && name.ends_with(&self.suffix)
    }

    pub fn is_match(&self, path: &Path) -> bool {
        if self.is_excluded(path) {
            return false;
        }

        match path.file_name().and_then(OsStr::to_str) {
            Some(name) => self.matches_name(name),
            None => false,
        }
    }

    pub fn is_excluded(&self, path: &Path) -> bool {
        self.excluded.as_deref() == Some(path)
    }

    pub fn is_hidden_allowed(&self, name: &OsStr) -> bool {
        self.include_hidden || !name.to_string_lossy().starts_with('.')
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }
}
