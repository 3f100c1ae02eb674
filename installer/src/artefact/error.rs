//! Error types for artefact descriptors and the catalogue.
//!
//! Each variant provides a descriptive message identifying the invalid input
//! and the constraint that was violated.

use thiserror::Error;

/// Errors arising from invalid artefact-related values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArtefactError {
    /// A tool name cannot be used as an installed file name.
    #[error("invalid tool name \"{value}\": {reason}")]
    InvalidToolName {
        /// The rejected name.
        value: String,
        /// Description of the validation failure.
        reason: String,
    },

    /// A source URL is not an absolute HTTP(S) location.
    #[error("invalid source URL \"{value}\": {reason}")]
    InvalidSourceUrl {
        /// The rejected URL.
        value: String,
        /// Description of the validation failure.
        reason: String,
    },

    /// A version string is empty or contains whitespace.
    #[error("invalid version \"{value}\": {reason}")]
    InvalidVersion {
        /// The rejected version string.
        value: String,
        /// Description of the validation failure.
        reason: String,
    },

    /// A SHA-256 digest is not a valid 64-character hex string.
    #[error("invalid SHA-256 digest: {reason}")]
    InvalidSha256Digest {
        /// Description of the validation failure.
        reason: String,
    },

    /// Two descriptors in one catalogue share a name.
    #[error("duplicate tool name \"{name}\" in catalogue")]
    DuplicateToolName {
        /// The repeated name.
        name: String,
    },
}

/// Result type alias using [`ArtefactError`].
pub type Result<T> = std::result::Result<T, ArtefactError>;
