pub mod filesystem;
pub mod hasher;
pub mod output;
pub mod progress;

pub use filesystem::WalkEnumerator;
pub use hasher::StreamingHasher;
pub use output::{CsvReportAdapter, JsonReportAdapter, PipeReportAdapter};
pub use progress::ProgressBarAdapter;
