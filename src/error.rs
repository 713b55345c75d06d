use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConcatError {
    #[error("Root directory not found: {}", .path.display())]
    RootNotFound { path: PathBuf },

    #[error("Root path is not a directory: {}", .path.display())]
    NotADirectory { path: PathBuf },

    #[error("Failed to traverse {}: {message}", .path.display())]
    Walk { path: PathBuf, message: String },

    #[error("Failed to read {}: {source}", .path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File is not valid UTF-8 text: {}", .path.display())]
    InvalidEncoding { path: PathBuf },

    #[error("Failed to write output file {}: {source}", .path.display())]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid extension: {extension}")]
    InvalidExtension { extension: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),
}

impl ConcatError {
    /// Process exit code reported by the binary for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            ConcatError::InvalidExtension { .. } => 1,
            ConcatError::RootNotFound { .. } | ConcatError::NotADirectory { .. } => 2,
            ConcatError::Walk { .. }
            | ConcatError::ReadFile { .. }
            | ConcatError::InvalidEncoding { .. } => 3,
            ConcatError::WriteOutput { .. } | ConcatError::Io(_) => 4,
            ConcatError::Config { .. } => 5,
        }
    }

    /// Wraps a read failure, turning `InvalidData` into an encoding error.
    pub fn read_failure(path: PathBuf, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::InvalidData {
            ConcatError::InvalidEncoding { path }
        } else {
            ConcatError::ReadFile { path, source }
        }
    }
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for ConcatError {
    fn user_message(&self) -> String {
        match self {
            ConcatError::RootNotFound { path } => {
                format!("Root directory does not exist: {}", path.display())
            }
            ConcatError::NotADirectory { path } => {
                format!("Not a directory: {}", path.display())
            }
            ConcatError::ReadFile { path, source } => {
                format!("Could not read {}: {}", path.display(), source)
            }
            ConcatError::InvalidEncoding { path } => {
                format!("{} does not contain valid UTF-8 text", path.display())
            }
            ConcatError::WriteOutput { path, source } => {
                format!("Could not write {}: {}", path.display(), source)
            }
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            ConcatError::RootNotFound { .. } | ConcatError::NotADirectory { .. } => Some(
                "Pass an existing directory with --root, or run the command from inside it.".to_string()
            ),
            ConcatError::ReadFile { source, .. }
                if source.kind() == std::io::ErrorKind::PermissionDenied =>
            {
                Some("Ensure you have read permission for every matching file.".to_string())
            }
            ConcatError::InvalidEncoding { .. } => Some(
                "Only text files can be concatenated. Choose an extension that selects text files only.".to_string()
            ),
            ConcatError::WriteOutput { .. } => Some(
                "Ensure the root directory is writable and has free space.".to_string()
            ),
            ConcatError::InvalidExtension { .. } => Some(
                "Pass a bare extension such as `rs` or `md`.".to_string()
            ),
            ConcatError::Config { .. } => Some(
                "Check your configuration file syntax and the values of its fields.".to_string()
            ),
            _ => None,
        }
    }
}

impl From<walkdir::Error> for ConcatError {
    fn from(error: walkdir::Error) -> Self {
        let path = error.path().map(|p| p.to_path_buf()).unwrap_or_default();
        let message = error.to_string();
        match error.into_io_error() {
            Some(source) => ConcatError::ReadFile { path, source },
            None => ConcatError::Walk { path, message },
        }
    }
}

pub type Result<T> = std::result::Result<T, ConcatError>;
