//! Integrity verification for fetched payloads.
//!
//! A payload is accepted only when its SHA-256 digest equals the digest
//! pinned in its descriptor. Digests are compared as plain strings.

use super::sha256_digest::Sha256Digest;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{self, Read};
use std::path::Path;

/// The digests involved in a failed verification.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("checksum mismatch: expected {expected}, got {actual}")]
pub struct ChecksumMismatch {
    /// Digest pinned by the descriptor.
    pub expected: Sha256Digest,
    /// Digest of the bytes actually fetched.
    pub actual: Sha256Digest,
}

/// Verify `bytes` against `expected`.
///
/// # Errors
///
/// Returns [`ChecksumMismatch`] carrying both digests when they differ.
///
/// # Examples
///
/// ```
/// use git_plugins_installer::artefact::sha256_digest::Sha256Digest;
/// use git_plugins_installer::artefact::verification::verify;
///
/// let expected = Sha256Digest::of_bytes(b"payload");
/// assert!(verify(b"payload", &expected).is_ok());
/// assert!(verify(b"tampered", &expected).is_err());
/// ```
pub fn verify(bytes: &[u8], expected: &Sha256Digest) -> Result<Sha256Digest, ChecksumMismatch> {
    let actual = Sha256Digest::of_bytes(bytes);
    if &actual != expected {
        return Err(ChecksumMismatch {
            expected: expected.clone(),
            actual,
        });
    }
    Ok(actual)
}

/// Compute the SHA-256 digest of a file on disk.
///
/// Reads in fixed-size chunks to keep memory use bounded.
///
/// # Errors
///
/// Returns any I/O error raised while opening or reading the file.
pub fn compute_file_sha256(path: &Path) -> io::Result<Sha256Digest> {
    let mut file = fs::File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];
    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(buffer.get(..bytes_read).unwrap_or_default());
    }
    Ok(Sha256Digest::from_hasher(hasher))
}
