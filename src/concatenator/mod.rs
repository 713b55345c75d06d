pub mod block_writer;
pub mod report;

pub use block_writer::{write_block, ConcatProgress, Concatenator};
pub use report::{ConcatReport, ReportedFile};
