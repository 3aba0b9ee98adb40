use crate::core::{JarvaultError, JarvaultResult};
use sha1::Sha1;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

/// Checksum algorithm for content hashes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChecksumAlgorithm {
    /// SHA-256
    Sha256,
    /// BLAKE3 (default)
    #[default]
    Blake3,
}

impl ChecksumAlgorithm {
    pub fn prefix(&self) -> &'static str {
        match self {
            ChecksumAlgorithm::Sha256 => "sha256",
            ChecksumAlgorithm::Blake3 => "blake3",
        }
    }
}

impl FromStr for ChecksumAlgorithm {
    type Err = JarvaultError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sha256" => Ok(ChecksumAlgorithm::Sha256),
            "blake3" => Ok(ChecksumAlgorithm::Blake3),
            other => Err(JarvaultError::Config(format!(
                "Unknown checksum algorithm '{}' (expected 'blake3' or 'sha256')",
                other
            ))),
        }
    }
}

enum ContentHasher {
    Sha256(Sha256),
    Blake3(Box<blake3::Hasher>),
}

/// Incremental hasher fed while a download streams to disk.
///
/// Produces the configured content hash and, alongside it, the SHA-1 digest
/// that Maven repositories publish in `.sha1` sidecars.
pub struct StreamingChecksum {
    algorithm: ChecksumAlgorithm,
    content: ContentHasher,
    sha1: Sha1,
}

/// Digests of one byte stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digests {
    /// `algo:hex`
    pub content_hash: String,
    /// Bare lowercase hex
    pub sha1: String,
}

impl StreamingChecksum {
    pub fn new(algorithm: ChecksumAlgorithm) -> Self {
        let content = match algorithm {
            ChecksumAlgorithm::Sha256 => ContentHasher::Sha256(Sha256::new()),
            ChecksumAlgorithm::Blake3 => ContentHasher::Blake3(Box::new(blake3::Hasher::new())),
        };
        Self {
            algorithm,
            content,
            sha1: Sha1::new(),
        }
    }

    pub fn update(&mut self, data: &[u8]) {
        match &mut self.content {
            ContentHasher::Sha256(hasher) => hasher.update(data),
            ContentHasher::Blake3(hasher) => {
                hasher.update(data);
            }
        }
        self.sha1.update(data);
    }

    pub fn finish(self) -> Digests {
        let hex_digest = match self.content {
            ContentHasher::Sha256(hasher) => hex::encode(hasher.finalize()),
            ContentHasher::Blake3(hasher) => hasher.finalize().to_hex().to_string(),
        };
        Digests {
            content_hash: format!("{}:{}", self.algorithm.prefix(), hex_digest),
            sha1: hex::encode(self.sha1.finalize()),
        }
    }
}

/// Hash a byte slice
pub fn checksum_bytes(data: &[u8], algorithm: ChecksumAlgorithm) -> Digests {
    let mut hasher = StreamingChecksum::new(algorithm);
    hasher.update(data);
    hasher.finish()
}

/// Calculate the content hash of a file
pub fn checksum_file(path: &Path, algorithm: ChecksumAlgorithm) -> JarvaultResult<String> {
    let mut file = fs::File::open(path)?;
    let mut hasher = StreamingChecksum::new(algorithm);
    let mut buffer = [0u8; 64 * 1024];
    loop {
        let read = file.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }
    Ok(hasher.finish().content_hash)
}

/// Extract the digest from a `.sha1` sidecar body.
///
/// Sidecars hold either the bare digest or `digest  filename`. Anything that
/// is not 40 hex characters is rejected.
pub fn parse_sha1_sidecar(body: &str) -> Option<String> {
    let digest = body.split_whitespace().next()?;
    if digest.len() == 40 && digest.chars().all(|c| c.is_ascii_hexdigit()) {
        Some(digest.to_ascii_lowercase())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_checksum_is_deterministic() {
        let a = checksum_bytes(b"artifact bytes", ChecksumAlgorithm::Blake3);
        let b = checksum_bytes(b"artifact bytes", ChecksumAlgorithm::Blake3);
        assert_eq!(a, b);
        assert!(a.content_hash.starts_with("blake3:"));
    }

    #[test]
    fn test_checksum_differs_for_different_content() {
        let a = checksum_bytes(b"artifact bytes", ChecksumAlgorithm::Sha256);
        let b = checksum_bytes(b"artifact bytez", ChecksumAlgorithm::Sha256);
        assert_ne!(a.content_hash, b.content_hash);
        assert_ne!(a.sha1, b.sha1);
    }

    #[test]
    fn test_known_sha1() {
        let digests = checksum_bytes(b"abc", ChecksumAlgorithm::Sha256);
        assert_eq!(digests.sha1, "a9993e364706816aba3e25717850c26c9cd0d89d");
        assert_eq!(
            digests.content_hash,
            "sha256:ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_streaming_matches_one_shot() {
        let mut streaming = StreamingChecksum::new(ChecksumAlgorithm::Blake3);
        streaming.update(b"hello ");
        streaming.update(b"world");
        assert_eq!(
            streaming.finish(),
            checksum_bytes(b"hello world", ChecksumAlgorithm::Blake3)
        );
    }

    #[test]
    fn test_checksum_file_matches_bytes() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a.jar");
        fs::write(&path, b"jar content").unwrap();

        let checksum = checksum_file(&path, ChecksumAlgorithm::Sha256).unwrap();
        assert!(checksum.starts_with("sha256:"));
        assert_eq!(
            checksum,
            checksum_bytes(b"jar content", ChecksumAlgorithm::Sha256).content_hash
        );
    }

    #[test]
    fn test_checksum_file_missing() {
        let temp = TempDir::new().unwrap();
        assert!(checksum_file(&temp.path().join("missing.jar"), ChecksumAlgorithm::Blake3).is_err());
    }

    #[test]
    fn test_parse_sha1_sidecar() {
        let digest = "a9993e364706816aba3e25717850c26c9cd0d89d";
        assert_eq!(parse_sha1_sidecar(digest), Some(digest.to_string()));
        assert_eq!(
            parse_sha1_sidecar(&format!("{}  gson-2.8.9.jar\n", digest.to_uppercase())),
            Some(digest.to_string())
        );
        assert_eq!(parse_sha1_sidecar("<html>not found</html>"), None);
        assert_eq!(parse_sha1_sidecar(""), None);
    }

    #[test]
    fn test_algorithm_from_str() {
        assert_eq!("SHA256".parse::<ChecksumAlgorithm>().unwrap(), ChecksumAlgorithm::Sha256);
        assert_eq!("blake3".parse::<ChecksumAlgorithm>().unwrap(), ChecksumAlgorithm::Blake3);
        assert!("crc32".parse::<ChecksumAlgorithm>().is_err());
    }
}
