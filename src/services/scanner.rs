use crate::domain::{ScanConfig, ScanSummary};
use crate::ports::{EnumeratorPort, HashingPort, ProgressPort, ReportPort};
use crate::services::DuplicateIndex;
use anyhow::Result;

/// Drives one scan: walks the configured roots in a single pass and pushes
/// each confirmed duplicate to the report sink the moment it is known.
pub struct ScanService<E, H, P> {
    enumerator: E,
    hasher: H,
    progress: P,
}

impl<E, H, P> ScanService<E, H, P>
where
    E: EnumeratorPort,
    H: HashingPort,
    P: ProgressPort,
{
    pub fn new(enumerator: E, hasher: H, progress: P) -> Self {
        Self {
            enumerator,
            hasher,
            progress,
        }
    }

    pub fn run(&self, config: &ScanConfig, report: &mut dyn ReportPort) -> Result<ScanSummary> {
        let paths = self.enumerator.enumerate(config)?;
        let mut index =
            DuplicateIndex::new(&self.hasher, config.partial_hash_size, config.hash_algorithm);
        let mut summary = ScanSummary::default();

        self.progress.start();
        for path in paths {
            summary.files_scanned += 1;
            for record in index.observe(&path) {
                summary.duplicate_files += 1;
                if record.duplicate_num == 1 {
                    summary.duplicate_groups += 1;
                }
                report.record(&record)?;
            }
            self.progress.update(summary.files_scanned, summary.duplicate_files);
        }
        self.progress.finish();

        summary.read_errors = index.read_errors();
        report.finish(&summary)?;
        Ok(summary)
    }
}
