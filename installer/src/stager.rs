//! Placement of verified payloads into the binary directory.
//!
//! Payloads are written to a uniquely named temporary file inside the
//! binary directory, marked executable, and renamed onto `<bin_dir>/<name>`.
//! The rename is atomic on the same filesystem, so a partially written
//! executable is never visible under its final name.

use crate::tool_name::ToolName;
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use std::io::Write;

const PROBE_FILENAME: &str = ".git-plugins-installer-probe";

/// Errors arising while placing or removing installed files.
#[derive(Debug, thiserror::Error)]
pub enum StagingError {
    /// The binary directory could not be created or written to.
    #[error("binary directory {path} is not writable: {source}")]
    NotWritable {
        /// The directory that was checked.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Writing the temporary file failed.
    #[error("failed to write {path}: {source}")]
    Write {
        /// The intended destination.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Setting the executable bit failed.
    #[error("failed to set permissions on {path}: {source}")]
    Permissions {
        /// The intended destination.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Renaming the temporary file onto the destination failed.
    #[error("failed to move payload into place at {path}: {source}")]
    Persist {
        /// The intended destination.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The artefact is not installed.
    #[error("{path} is not installed")]
    NotInstalled {
        /// The path that was expected to exist.
        path: Utf8PathBuf,
    },

    /// Removing an installed artefact failed.
    #[error("failed to remove {path}: {source}")]
    Remove {
        /// The installed path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Handles placement of verified payloads in one binary directory.
#[derive(Debug, Clone)]
pub struct Stager {
    bin_dir: Utf8PathBuf,
}

impl Stager {
    /// Create a stager targeting `bin_dir`.
    #[must_use]
    pub fn new(bin_dir: Utf8PathBuf) -> Self {
        Self { bin_dir }
    }

    /// The binary directory.
    #[must_use]
    pub fn bin_dir(&self) -> &Utf8Path {
        &self.bin_dir
    }

    /// Ensure the binary directory exists and is writable.
    ///
    /// # Errors
    ///
    /// Returns [`StagingError::NotWritable`] if the directory cannot be
    /// created or a probe file cannot be written inside it.
    pub fn prepare(&self) -> Result<(), StagingError> {
        let not_writable = |source| StagingError::NotWritable {
            path: self.bin_dir.clone(),
            source,
        };

        fs::create_dir_all(&self.bin_dir).map_err(not_writable)?;

        let probe = self.bin_dir.join(PROBE_FILENAME);
        fs::write(&probe, b"probe").map_err(not_writable)?;
        if let Err(e) = fs::remove_file(&probe) {
            log::debug!("could not remove probe file {probe}: {e}");
        }
        Ok(())
    }

    /// Path the artefact called `name` is installed at.
    #[must_use]
    pub fn installed_path(&self, name: &ToolName) -> Utf8PathBuf {
        self.bin_dir.join(name.as_str())
    }

    /// Whether `name` is currently installed.
    #[must_use]
    pub fn is_installed(&self, name: &ToolName) -> bool {
        self.installed_path(name).is_file()
    }

    /// Atomically install `bytes` as an executable called `name`.
    ///
    /// An existing file with the same name is replaced.
    ///
    /// # Errors
    ///
    /// Returns a [`StagingError`] describing the step that failed. The
    /// temporary file is removed on every failure path.
    pub fn stage(&self, name: &ToolName, bytes: &[u8]) -> Result<Utf8PathBuf, StagingError> {
        let dest = self.installed_path(name);

        let mut temp = tempfile::Builder::new()
            .prefix(&format!(".{name}."))
            .suffix(".partial")
            .tempfile_in(&self.bin_dir)
            .map_err(|source| StagingError::Write {
                path: dest.clone(),
                source,
            })?;

        temp.write_all(bytes)
            .and_then(|()| temp.as_file().sync_all())
            .map_err(|source| StagingError::Write {
                path: dest.clone(),
                source,
            })?;

        make_executable(temp.as_file()).map_err(|source| StagingError::Permissions {
            path: dest.clone(),
            source,
        })?;

        temp.persist(&dest).map_err(|e| StagingError::Persist {
            path: dest.clone(),
            source: e.error,
        })?;

        log::debug!("installed {name} at {dest}");
        Ok(dest)
    }

    /// Remove the installed artefact called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`StagingError::NotInstalled`] if there is nothing to remove,
    /// or [`StagingError::Remove`] if deletion fails.
    pub fn remove(&self, name: &ToolName) -> Result<Utf8PathBuf, StagingError> {
        let path = self.installed_path(name);
        if !path.is_file() {
            return Err(StagingError::NotInstalled { path });
        }
        fs::remove_file(&path).map_err(|source| StagingError::Remove {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}

/// Set mode `rwxr-xr-x` on the open file.
#[cfg(unix)]
fn make_executable(file: &fs::File) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    file.set_permissions(fs::Permissions::from_mode(0o755))
}

#[cfg(not(unix))]
fn make_executable(_file: &fs::File) -> std::io::Result<()> {
    Ok(())
}
