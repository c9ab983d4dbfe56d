use crate::domain::{DuplicateRecord, HashAlgorithm, PartialHash, ScanConfig, ScanSummary};
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Lazily yields the file paths under the configured roots. Fails only when
/// a root cannot be used at all; per-entry access errors are skipped inside
/// the implementation.
pub trait EnumeratorPort {
    fn enumerate(&self, config: &ScanConfig) -> Result<Box<dyn Iterator<Item = PathBuf>>>;
}

pub trait HashingPort {
    /// Digest of the entire file content, streamed in bounded chunks.
    fn full_hash(&self, path: &Path, algorithm: HashAlgorithm) -> Result<String>;

    /// Digest of at most `threshold` leading bytes. For files no longer than
    /// the threshold this equals `full_hash` and `is_partial` is false.
    fn partial_hash(
        &self,
        path: &Path,
        threshold: u64,
        algorithm: HashAlgorithm,
    ) -> Result<PartialHash>;
}

/// Receives duplicate records in emission order, one at a time.
pub trait ReportPort {
    fn record(&mut self, record: &DuplicateRecord) -> Result<()>;
    fn finish(&mut self, summary: &ScanSummary) -> Result<()>;
}

pub trait ProgressPort {
    fn start(&self);
    fn update(&self, files_seen: u64, duplicates: u64);
    fn finish(&self);
}
