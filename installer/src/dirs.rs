//! Directory resolution abstraction for platform-specific paths.
//!
//! The [`BaseDirs`] trait lets tests substitute fixed directories for the
//! user's real home, binary, and configuration directories.

use camino::Utf8PathBuf;
use std::path::PathBuf;

/// Directory name used under the platform configuration directory.
pub const APP_DIR_NAME: &str = "git-plugins-installer";

/// File name of the configuration file.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Abstraction over platform base directories.
#[cfg_attr(test, mockall::automock)]
pub trait BaseDirs {
    /// The user's home directory.
    fn home_dir(&self) -> Option<PathBuf>;

    /// The platform directory for user executables, where one exists.
    fn bin_dir(&self) -> Option<PathBuf>;

    /// The platform configuration directory.
    fn config_dir(&self) -> Option<PathBuf>;
}

/// [`BaseDirs`] backed by `directories-next`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBaseDirs;

impl BaseDirs for SystemBaseDirs {
    fn home_dir(&self) -> Option<PathBuf> {
        directories_next::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
    }

    fn bin_dir(&self) -> Option<PathBuf> {
        directories_next::BaseDirs::new()
            .and_then(|dirs| dirs.executable_dir().map(std::path::Path::to_path_buf))
    }

    fn config_dir(&self) -> Option<PathBuf> {
        directories_next::BaseDirs::new().map(|dirs| dirs.config_dir().to_path_buf())
    }
}

/// The default binary directory.
///
/// Uses the platform executable directory when there is one, otherwise
/// `~/.local/bin`. Returns `None` when neither can be determined or the
/// path is not valid UTF-8.
#[must_use]
pub fn default_bin_dir(dirs: &dyn BaseDirs) -> Option<Utf8PathBuf> {
    let path = dirs
        .bin_dir()
        .or_else(|| dirs.home_dir().map(|home| home.join(".local").join("bin")))?;
    utf8(path)
}

/// The default configuration file path.
#[must_use]
pub fn default_config_path(dirs: &dyn BaseDirs) -> Option<Utf8PathBuf> {
    let path = dirs.config_dir()?.join(APP_DIR_NAME).join(CONFIG_FILE_NAME);
    utf8(path)
}

fn utf8(path: PathBuf) -> Option<Utf8PathBuf> {
    match Utf8PathBuf::from_path_buf(path) {
        Ok(path) => Some(path),
        Err(path) => {
            log::warn!("ignoring non-UTF-8 directory {}", path.display());
            None
        }
    }
}
