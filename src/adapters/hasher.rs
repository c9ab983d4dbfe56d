use crate::domain::{HashAlgorithm, PartialHash};
use crate::ports::HashingPort;
use anyhow::Result;
use sha1::Sha1;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

const READ_BUF_SIZE: usize = 64 * 1024;

/// Buffered streaming hasher; file content never lands in memory whole.
pub struct StreamingHasher;

impl StreamingHasher {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StreamingHasher {
    fn default() -> Self {
        Self::new()
    }
}

enum DigestState {
    Blake3(blake3::Hasher),
    Md5(md5::Context),
    Sha1(Sha1),
    Sha256(Sha256),
}

impl DigestState {
    fn new(algorithm: HashAlgorithm) -> Self {
        match algorithm {
            HashAlgorithm::Blake3 => DigestState::Blake3(blake3::Hasher::new()),
            HashAlgorithm::Md5 => DigestState::Md5(md5::Context::new()),
            HashAlgorithm::Sha1 => DigestState::Sha1(Sha1::new()),
            HashAlgorithm::Sha256 => DigestState::Sha256(Sha256::new()),
        }
    }

    fn update(&mut self, data: &[u8]) {
        match self {
            DigestState::Blake3(hasher) => {
                hasher.update(data);
            }
            DigestState::Md5(hasher) => hasher.consume(data),
            DigestState::Sha1(hasher) => hasher.update(data),
            DigestState::Sha256(hasher) => hasher.update(data),
        }
    }

    fn finalize_hex(self) -> String {
        match self {
            DigestState::Blake3(hasher) => hasher.finalize().to_hex().to_string(),
            DigestState::Md5(hasher) => format!("{:x}", hasher.compute()),
            DigestState::Sha1(hasher) => format!("{:x}", hasher.finalize()),
            DigestState::Sha256(hasher) => format!("{:x}", hasher.finalize()),
        }
    }
}

impl HashingPort for StreamingHasher {
    fn full_hash(&self, path: &Path, algorithm: HashAlgorithm) -> Result<String> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        let mut digest = DigestState::new(algorithm);
        let mut buf = [0u8; READ_BUF_SIZE];
        loop {
            let n = reader.read(&mut buf)?;
            if n == 0 {
                break;
            }
            digest.update(&buf[..n]);
        }
        Ok(digest.finalize_hex())
    }

    fn partial_hash(
        &self,
        path: &Path,
        threshold: u64,
        algorithm: HashAlgorithm,
    ) -> Result<PartialHash> {
        let mut file = File::open(path)?;
        let file_size = file.metadata()?.len();

        // One bounded buffer, filled from the front of the file.
        let mut buf = vec![0u8; threshold as usize];
        let mut filled = 0;
        while filled < buf.len() {
            let n = file.read(&mut buf[filled..])?;
            if n == 0 {
                break;
            }
            filled += n;
        }

        let mut digest = DigestState::new(algorithm);
        digest.update(&buf[..filled]);
        Ok(PartialHash {
            digest: digest.finalize_hex(),
            is_partial: file_size > filled as u64,
            file_size,
        })
    }
}
