//! Artefact descriptors, retrieval, and integrity verification.
//!
//! # Sub-modules
//!
//! - [`catalogue`] - The compiled-in set of managed tools (`Catalogue`).
//! - [`descriptor`] - Validated tool metadata (`ArtefactDescriptor`).
//! - [`download`] - Payload fetch trait and HTTP implementation.
//! - [`error`] - Semantic error types for validation failures.
//! - [`sha256_digest`] - SHA-256 digest newtype (`Sha256Digest`).
//! - [`verification`] - Digest comparison and on-disk hashing.

pub mod catalogue;
pub mod descriptor;
pub mod download;
pub mod error;
pub mod sha256_digest;
pub mod verification;
