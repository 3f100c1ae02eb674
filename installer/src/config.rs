//! Installer configuration loaded from an optional TOML file.
//!
//! Values are layered: command-line flags win over the file, and the file
//! wins over built-in defaults. The default file lives at
//! `<config_dir>/git-plugins-installer/config.toml` and may be absent. A file
//! named explicitly with `--config` must exist.

use crate::artefact::download::DEFAULT_FETCH_TIMEOUT;
use crate::dirs::{BaseDirs, default_bin_dir, default_config_path};
use crate::error::{InstallerError, Result};
use crate::self_test::DEFAULT_SELF_TEST_TIMEOUT;
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use std::time::Duration;

/// Default number of tools processed in parallel.
pub const DEFAULT_JOBS: usize = 4;

/// Settings read from `config.toml`.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct InstallerConfig {
    /// Directory that receives installed tools.
    pub bin_dir: Option<Utf8PathBuf>,
    /// Number of tools processed in parallel.
    pub jobs: usize,
    /// Whole-request timeout for downloads, in seconds.
    pub fetch_timeout_secs: u64,
    /// Timeout for `<tool> --version`, in seconds.
    pub self_test_timeout_secs: u64,
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            bin_dir: None,
            jobs: DEFAULT_JOBS,
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT.as_secs(),
            self_test_timeout_secs: DEFAULT_SELF_TEST_TIMEOUT.as_secs(),
        }
    }
}

impl InstallerConfig {
    /// Parse configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::Config`] naming `origin` if the text is not
    /// valid TOML, contains unknown keys, or sets a zero timeout.
    pub fn from_toml_str(text: &str, origin: &Utf8Path) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| InstallerError::Config {
            path: origin.to_owned(),
            reason: e.message().to_owned(),
        })?;
        config.validate(origin)?;
        Ok(config)
    }

    /// Load the configuration file.
    ///
    /// With `explicit` set, that file is read and must exist. Otherwise the
    /// default location is tried and a missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::Config`] if a required file is missing, a
    /// file cannot be read, or its contents are invalid.
    pub fn load(explicit: Option<&Utf8Path>, dirs: &dyn BaseDirs) -> Result<Self> {
        let (path, required) = match explicit {
            Some(path) => (path.to_owned(), true),
            None => match default_config_path(dirs) {
                Some(path) => (path, false),
                None => {
                    log::debug!("no configuration directory; using defaults");
                    return Ok(Self::default());
                }
            },
        };

        match std::fs::read_to_string(&path) {
            Ok(text) => {
                log::debug!("loading configuration from {path}");
                Self::from_toml_str(&text, &path)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && !required => {
                log::debug!("no configuration at {path}; using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(InstallerError::Config {
                path,
                reason: e.to_string(),
            }),
        }
    }

    /// Resolve the binary directory: `cli`, then the file, then the platform
    /// default.
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::BinDirUnavailable`] if no directory can be
    /// determined.
    pub fn resolve_bin_dir(
        &self,
        cli: Option<&Utf8Path>,
        dirs: &dyn BaseDirs,
    ) -> Result<Utf8PathBuf> {
        cli.map(Utf8Path::to_owned)
            .or_else(|| self.bin_dir.clone())
            .or_else(|| default_bin_dir(dirs))
            .ok_or(InstallerError::BinDirUnavailable)
    }

    /// Resolve the job count: `cli`, then the file. Never less than one.
    #[must_use]
    pub fn resolve_jobs(&self, cli: Option<usize>) -> usize {
        cli.unwrap_or(self.jobs).max(1)
    }

    /// Download timeout.
    #[must_use]
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Self-test timeout.
    #[must_use]
    pub fn self_test_timeout(&self) -> Duration {
        Duration::from_secs(self.self_test_timeout_secs)
    }

    fn validate(&self, origin: &Utf8Path) -> Result<()> {
        let zero = |key: &str| InstallerError::Config {
            path: origin.to_owned(),
            reason: format!("{key} must be at least 1"),
        };
        if self.fetch_timeout_secs == 0 {
            return Err(zero("fetch_timeout_secs"));
        }
        if self.self_test_timeout_secs == 0 {
            return Err(zero("self_test_timeout_secs"));
        }
        Ok(())
    }
}
