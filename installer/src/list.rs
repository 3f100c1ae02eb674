//! List and info command implementation.
//!
//! The install state of each tool is derived from the binary directory
//! alone: a file whose digest matches the pinned digest is `installed`, any
//! other file under the tool's name is `modified`, and no file is `missing`.

use camino::Utf8PathBuf;
use serde::Serialize;
use std::fmt;
use std::io::Write;

use crate::artefact::catalogue::Catalogue;
use crate::artefact::descriptor::ArtefactDescriptor;
use crate::artefact::verification::compute_file_sha256;
use crate::cli::ListArgs;
use crate::error::{InstallerError, Result};
use crate::list_output::{format_human, format_info, format_json};
use crate::stager::Stager;

/// Install state of one tool in the binary directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallState {
    /// Present with the pinned digest.
    Installed,
    /// Present, but the digest differs from the pinned one.
    Modified,
    /// Not present.
    Missing,
}

impl fmt::Display for InstallState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Installed => "installed",
            Self::Modified => "modified",
            Self::Missing => "missing",
        })
    }
}

/// A catalogue entry paired with its install state.
#[derive(Debug, Clone)]
pub struct ToolStatus<'a> {
    /// The catalogue entry.
    pub descriptor: &'a ArtefactDescriptor,
    /// Where the tool is or would be installed.
    pub path: Utf8PathBuf,
    /// Current state on disk.
    pub state: InstallState,
}

/// Determine the install state of `descriptor` under `stager`.
#[must_use]
pub fn install_state(stager: &Stager, descriptor: &ArtefactDescriptor) -> InstallState {
    let path = stager.installed_path(descriptor.name());
    if !path.is_file() {
        return InstallState::Missing;
    }
    match compute_file_sha256(path.as_std_path()) {
        Ok(digest) if &digest == descriptor.expected_digest() => InstallState::Installed,
        Ok(digest) => {
            log::debug!(
                "{path} has digest {digest}, expected {}",
                descriptor.expected_digest()
            );
            InstallState::Modified
        }
        Err(e) => {
            log::warn!("could not read {path}: {e}");
            InstallState::Modified
        }
    }
}

/// Status of every catalogue entry, in catalogue order.
#[must_use]
pub fn scan<'a>(catalogue: &'a Catalogue, stager: &Stager) -> Vec<ToolStatus<'a>> {
    catalogue
        .descriptors()
        .iter()
        .map(|descriptor| ToolStatus {
            descriptor,
            path: stager.installed_path(descriptor.name()),
            state: install_state(stager, descriptor),
        })
        .collect()
}

/// Lists every known tool with its version and install state.
///
/// Output is written to stdout (human-readable by default, JSON with `--json`).
///
/// # Errors
///
/// Returns [`InstallerError::WriteFailed`] if writing to stdout fails.
pub fn run_list(
    args: &ListArgs,
    catalogue: &Catalogue,
    stager: &Stager,
    stdout: &mut dyn Write,
) -> Result<()> {
    let statuses = scan(catalogue, stager);
    let output = if args.json {
        format_json(&statuses, stager.bin_dir())
    } else {
        format_human(&statuses, stager.bin_dir())
    };

    writeln!(stdout, "{output}").map_err(|e| InstallerError::WriteFailed { source: e })
}

/// Prints the metadata of one tool and where it is installed.
///
/// # Errors
///
/// Returns [`InstallerError::WriteFailed`] if writing to stdout fails.
pub fn run_info(
    descriptor: &ArtefactDescriptor,
    stager: &Stager,
    stdout: &mut dyn Write,
) -> Result<()> {
    let status = ToolStatus {
        descriptor,
        path: stager.installed_path(descriptor.name()),
        state: install_state(stager, descriptor),
    };

    writeln!(stdout, "{}", format_info(&status))
        .map_err(|e| InstallerError::WriteFailed { source: e })
}
