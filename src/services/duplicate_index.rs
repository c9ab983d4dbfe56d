use crate::domain::{DuplicateGroup, DuplicateRecord, FileRecord, HashAlgorithm, HashKey};
use crate::ports::HashingPort;
use log::debug;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::Path;

/// Streaming duplicate-detection engine.
///
/// Each observed path is first keyed by a cheap hash of its leading bytes.
/// Only when a second file shares that prefix does the index escalate to full
/// content hashes, so unique files are never read twice. Confirmed duplicates
/// are reported incrementally: a group's first member is emitted lazily at
/// the moment its second member arrives.
pub struct DuplicateIndex<'a, H> {
    hasher: &'a H,
    groups: HashMap<HashKey, DuplicateGroup>,
    partial_threshold: u64,
    algorithm: HashAlgorithm,
    read_errors: u64,
}

impl<'a, H: HashingPort> DuplicateIndex<'a, H> {
    pub fn new(hasher: &'a H, partial_threshold: u64, algorithm: HashAlgorithm) -> Self {
        Self {
            hasher,
            groups: HashMap::new(),
            partial_threshold,
            algorithm,
            read_errors: 0,
        }
    }

    /// Paths that could not be read; they are excluded from all grouping.
    pub fn read_errors(&self) -> u64 {
        self.read_errors
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Classify one path and return the records it confirms, in emission
    /// order. A unique file yields nothing; the second member of a group
    /// yields two records (the first member's, then its own); each later
    /// member yields one. Each path must be observed at most once per scan;
    /// re-observing a path registers a spurious duplicate of itself.
    pub fn observe(&mut self, path: &Path) -> Vec<DuplicateRecord> {
        let probe = match self
            .hasher
            .partial_hash(path, self.partial_threshold, self.algorithm)
        {
            Ok(probe) => probe,
            Err(err) => return self.skip_unreadable(path, err),
        };

        let key = probe.key();
        let promote = match self.groups.entry(key.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(DuplicateGroup::seed(FileRecord {
                    path: path.to_path_buf(),
                    size: probe.file_size,
                }));
                return Vec::new();
            }
            Entry::Occupied(mut group) => {
                if !key.is_partial() {
                    // Full digests matched outright, no verification needed.
                    return Self::confirm(group.get_mut(), key.digest(), path);
                }
                debug!("partial hash collision on {}", path.display());
                let group = group.get_mut();
                let promote = (group.locations.len() == 1).then(|| FileRecord {
                    path: group.locations[0].clone(),
                    size: group.file_size,
                });
                // The partial group keeps collecting colliders as bookkeeping;
                // it is never reported on once escalation happens.
                group.locations.push(path.to_path_buf());
                promote
            }
        };

        // Escalation: the prefix matched, only full digests can settle it.
        if let Some(first) = promote {
            match self.hasher.full_hash(&first.path, self.algorithm) {
                Ok(digest) => {
                    self.groups
                        .entry(HashKey::Full(digest))
                        .or_insert_with(|| DuplicateGroup::seed(first));
                }
                Err(err) => {
                    // The first member stays unpromoted and unreported.
                    self.skip_unreadable(&first.path, err);
                }
            }
        }

        let digest = match self.hasher.full_hash(path, self.algorithm) {
            Ok(digest) => digest,
            Err(err) => return self.skip_unreadable(path, err),
        };

        match self.groups.entry(HashKey::Full(digest.clone())) {
            Entry::Occupied(mut group) => {
                debug!("confirmed duplicate: {}", path.display());
                Self::confirm(group.get_mut(), &digest, path)
            }
            Entry::Vacant(slot) => {
                // Same leading bytes, different content past the threshold.
                debug!("false partial collision on {}", path.display());
                slot.insert(DuplicateGroup::seed(FileRecord {
                    path: path.to_path_buf(),
                    size: probe.file_size,
                }));
                Vec::new()
            }
        }
    }

    fn confirm(group: &mut DuplicateGroup, digest: &str, path: &Path) -> Vec<DuplicateRecord> {
        group.locations.push(path.to_path_buf());

        let mut records = Vec::with_capacity(2);
        if group.locations.len() == 2 {
            // The group just became confirmed; report its first member now.
            records.push(DuplicateRecord {
                checksum: digest.to_string(),
                duplicate_num: 0,
                file_size: group.file_size,
                path: group.locations[0].clone(),
            });
        }
        records.push(DuplicateRecord {
            checksum: digest.to_string(),
            duplicate_num: group.locations.len() - 1,
            file_size: group.file_size,
            path: path.to_path_buf(),
        });
        records
    }

    fn skip_unreadable(&mut self, path: &Path, err: anyhow::Error) -> Vec<DuplicateRecord> {
        debug!("skipping unreadable file {}: {err:#}", path.display());
        self.read_errors += 1;
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PartialHash;
    use anyhow::{Context, Result};
    use sha2::{Digest, Sha256};
    use std::collections::HashMap;
    use std::path::PathBuf;

    const THRESHOLD: u64 = 4096;

    /// In-memory stand-in for the filesystem-backed hasher. Paths absent
    /// from the map behave like unreadable files.
    struct FakeHasher {
        files: HashMap<PathBuf, Vec<u8>>,
    }

    impl FakeHasher {
        fn new(files: &[(&str, Vec<u8>)]) -> Self {
            Self {
                files: files
                    .iter()
                    .map(|(path, content)| (PathBuf::from(path), content.clone()))
                    .collect(),
            }
        }
    }

    impl HashingPort for FakeHasher {
        fn full_hash(&self, path: &Path, _algorithm: HashAlgorithm) -> Result<String> {
            let content = self
                .files
                .get(path)
                .with_context(|| format!("no such file: {}", path.display()))?;
            Ok(sha256_hex(content))
        }

        fn partial_hash(
            &self,
            path: &Path,
            threshold: u64,
            _algorithm: HashAlgorithm,
        ) -> Result<PartialHash> {
            let content = self
                .files
                .get(path)
                .with_context(|| format!("no such file: {}", path.display()))?;
            let take = content.len().min(threshold as usize);
            Ok(PartialHash {
                digest: sha256_hex(&content[..take]),
                is_partial: content.len() > take,
                file_size: content.len() as u64,
            })
        }
    }

    fn sha256_hex(data: &[u8]) -> String {
        format!("{:x}", Sha256::digest(data))
    }

    fn with_prefix(prefix: &[u8], tail: &[u8]) -> Vec<u8> {
        let mut content = prefix.to_vec();
        content.extend_from_slice(tail);
        content
    }

    #[test]
    fn unique_files_emit_nothing() {
        let hasher = FakeHasher::new(&[
            ("a.txt", vec![1u8; 100]),
            ("b.txt", vec![2u8; 200]),
        ]);
        let mut index = DuplicateIndex::new(&hasher, THRESHOLD, HashAlgorithm::Sha256);

        assert!(index.observe(Path::new("a.txt")).is_empty());
        assert!(index.observe(Path::new("b.txt")).is_empty());
        assert_eq!(index.read_errors(), 0);
        assert_eq!(index.group_count(), 2);
    }

    #[test]
    fn three_identical_large_files_in_discovery_order() {
        let content = vec![0xAB; 10_000];
        let digest = sha256_hex(&content);
        let hasher = FakeHasher::new(&[
            ("a.txt", content.clone()),
            ("b.txt", content.clone()),
            ("c.txt", content),
        ]);
        let mut index = DuplicateIndex::new(&hasher, THRESHOLD, HashAlgorithm::Sha256);

        assert!(index.observe(Path::new("a.txt")).is_empty());

        let records = index.observe(Path::new("b.txt"));
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].duplicate_num, 0);
        assert_eq!(records[0].path, PathBuf::from("a.txt"));
        assert_eq!(records[1].duplicate_num, 1);
        assert_eq!(records[1].path, PathBuf::from("b.txt"));
        for record in &records {
            assert_eq!(record.checksum, digest);
            assert_eq!(record.file_size, 10_000);
        }

        let records = index.observe(Path::new("c.txt"));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].duplicate_num, 2);
        assert_eq!(records[0].path, PathBuf::from("c.txt"));
        assert_eq!(records[0].checksum, digest);
    }

    #[test]
    fn shared_prefix_with_divergent_tails_is_not_a_duplicate() {
        let prefix = vec![b'A'; 4096];
        let hasher = FakeHasher::new(&[
            ("x.txt", with_prefix(&prefix, &[b'x'; 904])),
            ("y.txt", with_prefix(&prefix, &[b'y'; 904])),
        ]);
        let mut index = DuplicateIndex::new(&hasher, THRESHOLD, HashAlgorithm::Sha256);

        assert!(index.observe(Path::new("x.txt")).is_empty());
        assert!(index.observe(Path::new("y.txt")).is_empty());
        assert_eq!(index.read_errors(), 0);
        // One partial group plus one full group per file.
        assert_eq!(index.group_count(), 3);
    }

    #[test]
    fn small_identical_files_confirm_without_escalation() {
        let content = b"hello".to_vec();
        let digest = sha256_hex(&content);
        let hasher = FakeHasher::new(&[
            ("a.txt", content.clone()),
            ("b.txt", content),
        ]);
        let mut index = DuplicateIndex::new(&hasher, THRESHOLD, HashAlgorithm::Sha256);

        assert!(index.observe(Path::new("a.txt")).is_empty());
        let records = index.observe(Path::new("b.txt"));
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].checksum, digest);
        assert_eq!(records[0].file_size, 5);
        // Small files register under full keys directly.
        assert_eq!(index.group_count(), 1);
    }

    #[test]
    fn false_collision_then_true_duplicate_confirms_against_promoted_group() {
        let prefix = vec![b'P'; 4096];
        let content_a = with_prefix(&prefix, b"tail-a");
        let digest_a = sha256_hex(&content_a);
        let hasher = FakeHasher::new(&[
            ("a.txt", content_a.clone()),
            ("x.txt", with_prefix(&prefix, b"tail-x")),
            ("b.txt", content_a),
        ]);
        let mut index = DuplicateIndex::new(&hasher, THRESHOLD, HashAlgorithm::Sha256);

        assert!(index.observe(Path::new("a.txt")).is_empty());
        // x collides on the prefix only; a gets promoted, nothing reported.
        assert!(index.observe(Path::new("x.txt")).is_empty());

        // b matches a in full; the partial group already has two locations,
        // so no second promotion happens and a is reported exactly once.
        let records = index.observe(Path::new("b.txt"));
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].duplicate_num, 0);
        assert_eq!(records[0].path, PathBuf::from("a.txt"));
        assert_eq!(records[1].duplicate_num, 1);
        assert_eq!(records[1].path, PathBuf::from("b.txt"));
        assert_eq!(records[0].checksum, digest_a);
    }

    #[test]
    fn escalated_duplicates_number_against_the_full_group() {
        let content = vec![0x5C; 8192];
        let hasher = FakeHasher::new(&[
            ("a.bin", content.clone()),
            ("b.bin", content.clone()),
            ("c.bin", content),
        ]);
        let mut index = DuplicateIndex::new(&hasher, THRESHOLD, HashAlgorithm::Sha256);

        assert!(index.observe(Path::new("a.bin")).is_empty());
        let records = index.observe(Path::new("b.bin"));
        assert_eq!(
            records.iter().map(|r| r.duplicate_num).collect::<Vec<_>>(),
            vec![0, 1]
        );
        let records = index.observe(Path::new("c.bin"));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].duplicate_num, 2);
    }

    #[test]
    fn unreadable_path_is_counted_and_excluded() {
        let content = vec![7u8; 5000];
        let hasher = FakeHasher::new(&[
            ("a.txt", content.clone()),
            ("b.txt", content),
        ]);
        let mut index = DuplicateIndex::new(&hasher, THRESHOLD, HashAlgorithm::Sha256);

        assert!(index.observe(Path::new("missing.txt")).is_empty());
        assert_eq!(index.read_errors(), 1);

        // The rest of the scan is unaffected.
        assert!(index.observe(Path::new("a.txt")).is_empty());
        let records = index.observe(Path::new("b.txt"));
        assert_eq!(records.len(), 2);
        assert_eq!(index.read_errors(), 1);
    }

    #[test]
    fn empty_files_group_together() {
        let digest = sha256_hex(b"");
        let hasher = FakeHasher::new(&[
            ("a.txt", Vec::new()),
            ("b.txt", Vec::new()),
        ]);
        let mut index = DuplicateIndex::new(&hasher, THRESHOLD, HashAlgorithm::Sha256);

        assert!(index.observe(Path::new("a.txt")).is_empty());
        let records = index.observe(Path::new("b.txt"));
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].checksum, digest);
        assert_eq!(records[0].file_size, 0);
    }
}
