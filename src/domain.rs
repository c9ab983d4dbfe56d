use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HashAlgorithm {
    Blake3,
    Md5,
    Sha1,
    #[default]
    Sha256,
}

impl HashAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::Blake3 => "blake3",
            HashAlgorithm::Md5 => "md5",
            HashAlgorithm::Sha1 => "sha1",
            HashAlgorithm::Sha256 => "sha256",
        }
    }
}

/// Content fingerprint used to file groups in the duplicate index.
///
/// A partial digest and a full digest are distinct keys even when their hex
/// values coincide; the variant is the discriminant, never a naming
/// convention on the digest string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HashKey {
    /// Digest over the leading bytes of a file only.
    Partial(String),
    /// Digest over the entire file content.
    Full(String),
}

impl HashKey {
    pub fn digest(&self) -> &str {
        match self {
            HashKey::Partial(digest) | HashKey::Full(digest) => digest,
        }
    }

    pub fn is_partial(&self) -> bool {
        matches!(self, HashKey::Partial(_))
    }
}

/// One observed file occurrence, captured when the file is first read for
/// hashing. The size is never re-checked afterwards.
#[derive(Debug, Clone)]
pub struct FileRecord {
    pub path: PathBuf,
    pub size: u64,
}

/// Result of the cheap first-pass hash over a file's leading bytes.
#[derive(Debug, Clone)]
pub struct PartialHash {
    pub digest: String,
    /// True when the file had more content than the partial read consumed.
    pub is_partial: bool,
    /// Total file length observed at read time.
    pub file_size: u64,
}

impl PartialHash {
    pub fn key(&self) -> HashKey {
        if self.is_partial {
            HashKey::Partial(self.digest.clone())
        } else {
            HashKey::Full(self.digest.clone())
        }
    }
}

/// Running membership for one content fingerprint. Holds at least one
/// location from the moment it exists; unconfirmed until the second one.
#[derive(Debug, Clone)]
pub struct DuplicateGroup {
    pub locations: Vec<PathBuf>,
    /// Size of the first member, used for every record of the group.
    pub file_size: u64,
}

impl DuplicateGroup {
    pub fn seed(first: FileRecord) -> Self {
        Self {
            locations: vec![first.path],
            file_size: first.size,
        }
    }

    pub fn is_confirmed(&self) -> bool {
        self.locations.len() > 1
    }
}

/// One confirmed duplicate occurrence, emitted the moment it is known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateRecord {
    pub checksum: String,
    /// 0 for the group's first member, locations - 1 for every later one.
    pub duplicate_num: usize,
    pub file_size: u64,
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub paths: Vec<PathBuf>,
    pub recursive: bool,
    pub filter: Option<String>,
    pub min_size: u64,
    pub max_depth: Option<usize>,
    pub follow_symlinks: bool,
    pub partial_hash_size: u64,
    pub hash_algorithm: HashAlgorithm,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            paths: vec![PathBuf::from(".")],
            recursive: true,
            filter: None,
            min_size: 0,
            max_depth: None,
            follow_symlinks: false,
            partial_hash_size: 4096,
            hash_algorithm: HashAlgorithm::default(),
        }
    }
}

impl ScanConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.paths = paths;
        self
    }

    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn with_min_size(mut self, size: u64) -> Self {
        self.min_size = size;
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn with_partial_hash_size(mut self, size: u64) -> Self {
        self.partial_hash_size = size;
        self
    }

    pub fn with_hash_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.hash_algorithm = algorithm;
        self
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanSummary {
    pub files_scanned: u64,
    /// Every member of a confirmed group counts, the first one included.
    pub duplicate_files: u64,
    pub duplicate_groups: u64,
    pub read_errors: u64,
}
