//! The per-tool fetch, verify, install, and self-test pipeline.
//!
//! Stages run strictly in order and the first failure ends the pipeline for
//! that tool. Bytes that fail verification are dropped without touching the
//! binary directory.

use crate::artefact::descriptor::ArtefactDescriptor;
use crate::artefact::download::ArtefactFetcher;
use crate::artefact::sha256_digest::Sha256Digest;
use crate::artefact::verification::verify;
use crate::error::{InstallerError, Result};
use crate::self_test::SelfTester;
use crate::stager::Stager;
use crate::tool_name::ToolName;
use camino::Utf8PathBuf;

/// A tool that passed every pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledArtefact {
    /// The installed tool.
    pub name: ToolName,
    /// The pinned version that was installed.
    pub version: String,
    /// Where the executable now lives.
    pub path: Utf8PathBuf,
    /// Digest of the installed bytes.
    pub digest: Sha256Digest,
}

/// Wires a fetcher, stager, and self-tester into one pipeline.
///
/// The pipeline holds only shared references, so one instance can serve
/// several worker threads at once.
pub struct InstallPipeline<'a> {
    fetcher: &'a dyn ArtefactFetcher,
    stager: &'a Stager,
    tester: &'a dyn SelfTester,
    run_self_test: bool,
}

impl<'a> InstallPipeline<'a> {
    /// Create a pipeline that self-tests every installed tool.
    #[must_use]
    pub fn new(
        fetcher: &'a dyn ArtefactFetcher,
        stager: &'a Stager,
        tester: &'a dyn SelfTester,
    ) -> Self {
        Self {
            fetcher,
            stager,
            tester,
            run_self_test: true,
        }
    }

    /// Enable or disable the post-install self-test.
    #[must_use]
    pub fn with_self_test(mut self, enabled: bool) -> Self {
        self.run_self_test = enabled;
        self
    }

    /// Run fetch, verify, install, and (unless disabled) self-test.
    ///
    /// # Errors
    ///
    /// Returns the first stage failure, tagged with the tool name.
    pub fn install(&self, descriptor: &ArtefactDescriptor) -> Result<InstalledArtefact> {
        let tool = descriptor.name();

        log::info!("fetching {tool} {}", descriptor.version());
        let bytes = self
            .fetcher
            .fetch(descriptor.source_url())
            .map_err(|source| InstallerError::Fetch {
                tool: tool.clone(),
                source,
            })?;

        let digest = verify(&bytes, descriptor.expected_digest()).map_err(|mismatch| {
            InstallerError::ChecksumMismatch {
                tool: tool.clone(),
                expected: mismatch.expected,
                actual: mismatch.actual,
            }
        })?;

        let path = self
            .stager
            .stage(tool, &bytes)
            .map_err(|source| InstallerError::Install {
                tool: tool.clone(),
                source,
            })?;

        if self.run_self_test {
            self.test(tool)?;
        }

        Ok(InstalledArtefact {
            name: tool.clone(),
            version: descriptor.version().to_owned(),
            path,
            digest,
        })
    }

    /// Run only the self-test against the installed copy of `tool`.
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::SelfTest`] if the tool is missing or fails.
    pub fn test(&self, tool: &ToolName) -> Result<Utf8PathBuf> {
        let path = self.stager.installed_path(tool);
        self.tester
            .self_test(&path)
            .map_err(|source| InstallerError::SelfTest {
                tool: tool.clone(),
                source,
            })?;
        Ok(path)
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
