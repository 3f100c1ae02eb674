//! Error types for the git-plugins installer.
//!
//! Pipeline failures carry the tool they belong to and the stage that
//! failed, so one line on stderr tells the user what broke and where.

use crate::artefact::download::FetchError;
use crate::artefact::error::ArtefactError;
use crate::artefact::sha256_digest::Sha256Digest;
use crate::self_test::SelfTestError;
use crate::stager::StagingError;
use crate::tool_name::ToolName;
use camino::Utf8PathBuf;
use std::fmt;
use thiserror::Error;

/// A step of the fetch-verify-install-test pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Retrieving the payload.
    Fetch,
    /// Comparing the payload digest with the pinned digest.
    Verify,
    /// Writing the payload into the binary directory.
    Install,
    /// Running `<tool> --version`.
    SelfTest,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Fetch => "fetch",
            Self::Verify => "verify",
            Self::Install => "install",
            Self::SelfTest => "self-test",
        })
    }
}

/// Errors that can occur while running installer commands.
#[derive(Debug, Error)]
pub enum InstallerError {
    /// The payload could not be retrieved.
    #[error("{tool}: fetch failed: {source}")]
    Fetch {
        /// The affected tool.
        tool: ToolName,
        /// The underlying fetch failure.
        #[source]
        source: FetchError,
    },

    /// The payload digest does not match the pinned digest.
    #[error("{tool}: verify failed: checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch {
        /// The affected tool.
        tool: ToolName,
        /// Digest pinned by the descriptor.
        expected: Sha256Digest,
        /// Digest of the fetched payload.
        actual: Sha256Digest,
    },

    /// The verified payload could not be written into place.
    #[error("{tool}: install failed: {source}")]
    Install {
        /// The affected tool.
        tool: ToolName,
        /// The underlying filesystem failure.
        #[source]
        source: StagingError,
    },

    /// The installed tool failed its self-test.
    #[error("{tool}: self-test failed: {source}")]
    SelfTest {
        /// The affected tool.
        tool: ToolName,
        /// The underlying self-test failure.
        #[source]
        source: SelfTestError,
    },

    /// An installed tool could not be removed.
    #[error("{tool}: uninstall failed: {source}")]
    Uninstall {
        /// The affected tool.
        tool: ToolName,
        /// The underlying filesystem failure.
        #[source]
        source: StagingError,
    },

    /// The binary directory could not be prepared.
    #[error("binary directory unavailable: {source}")]
    BinDir {
        /// The underlying filesystem failure.
        #[source]
        source: StagingError,
    },

    /// No default binary directory could be determined.
    #[error("could not determine a binary directory; pass --bin-dir or set bin_dir in the config file")]
    BinDirUnavailable,

    /// A requested tool is not in the catalogue.
    #[error("unknown tool {name}; known tools: {known}")]
    UnknownTool {
        /// The requested name.
        name: String,
        /// Comma-separated list of known names.
        known: String,
    },

    /// A descriptor or catalogue entry is malformed.
    #[error("invalid descriptor: {0}")]
    InvalidDescriptor(#[from] ArtefactError),

    /// The configuration file could not be read or parsed.
    #[error("invalid configuration at {path}: {reason}")]
    Config {
        /// Path to the configuration file.
        path: Utf8PathBuf,
        /// Description of the failure.
        reason: String,
    },

    /// One or more tools in a batch failed.
    #[error("{failed} of {total} tool(s) failed")]
    BatchFailed {
        /// Number of failed tools.
        failed: usize,
        /// Number of tools attempted.
        total: usize,
    },

    /// Failed to write output.
    #[error("failed to write output: {source}")]
    WriteFailed {
        /// The underlying error that caused the write to fail.
        #[source]
        source: std::io::Error,
    },
}

impl InstallerError {
    /// The tool a pipeline error belongs to, if any.
    #[must_use]
    pub fn tool(&self) -> Option<&ToolName> {
        match self {
            Self::Fetch { tool, .. }
            | Self::ChecksumMismatch { tool, .. }
            | Self::Install { tool, .. }
            | Self::SelfTest { tool, .. }
            | Self::Uninstall { tool, .. } => Some(tool),
            _ => None,
        }
    }

    /// The pipeline stage that failed, if any.
    #[must_use]
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Fetch { .. } => Some(Stage::Fetch),
            Self::ChecksumMismatch { .. } => Some(Stage::Verify),
            Self::Install { .. } => Some(Stage::Install),
            Self::SelfTest { .. } => Some(Stage::SelfTest),
            _ => None,
        }
    }
}

/// Result type alias using [`InstallerError`].
pub type Result<T> = std::result::Result<T, InstallerError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn git_get() -> ToolName {
        ToolName::try_from("git-get").expect("valid name")
    }

    #[test]
    fn checksum_mismatch_names_tool_stage_and_digests() {
        let err = InstallerError::ChecksumMismatch {
            tool: git_get(),
            expected: Sha256Digest::try_from("2".repeat(64)).expect("digest"),
            actual: Sha256Digest::try_from("0".repeat(64)).expect("digest"),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("git-get: verify failed"));
        assert!(msg.contains(&"2".repeat(64)));
        assert!(msg.contains(&"0".repeat(64)));
        assert_eq!(err.stage(), Some(Stage::Verify));
    }

    #[test]
    fn fetch_error_preserves_source() {
        let err = InstallerError::Fetch {
            tool: git_get(),
            source: FetchError::NotFound {
                url: "https://example.test/git-get".to_owned(),
            },
        };
        assert!(err.to_string().contains("not found"));
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(err.tool(), Some(&git_get()));
    }

    #[test]
    fn unknown_tool_lists_known_names() {
        let err = InstallerError::UnknownTool {
            name: "git-nope".to_owned(),
            known: "git-autocommit, git-get".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("git-nope"));
        assert!(msg.contains("git-autocommit, git-get"));
        assert!(err.tool().is_none());
        assert!(err.stage().is_none());
    }

    #[rstest]
    #[case(Stage::Fetch, "fetch")]
    #[case(Stage::Verify, "verify")]
    #[case(Stage::Install, "install")]
    #[case(Stage::SelfTest, "self-test")]
    fn stage_display(#[case] stage: Stage, #[case] expected: &str) {
        assert_eq!(stage.to_string(), expected);
    }

    #[test]
    fn batch_failed_reports_counts() {
        let err = InstallerError::BatchFailed {
            failed: 1,
            total: 3,
        };
        assert_eq!(err.to_string(), "1 of 3 tool(s) failed");
    }

    #[test]
    fn write_failed_includes_cause() {
        let err = InstallerError::WriteFailed {
            source: std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed"),
        };
        assert_eq!(err.to_string(), "failed to write output: pipe closed");
    }
}
