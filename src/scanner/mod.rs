pub mod extension_filter;
pub mod file_scanner;

pub use extension_filter::ExtensionFilter;
pub use file_scanner::{FileScanner, ScanStatistics, SourceFile};
