//! Shared test utilities for the installer crate.

use crate::artefact::descriptor::{ArtefactDescriptor, DescriptorFields};
use crate::artefact::download::{ArtefactFetcher, FetchError};
use crate::artefact::sha256_digest::Sha256Digest;
use camino::Utf8Path;
use std::collections::HashMap;
use std::sync::Mutex;

/// Lowercase hex SHA-256 of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    Sha256Digest::of_bytes(bytes).into_inner()
}

/// A POSIX shell script that prints a version for `--version` and then
/// exits with `exit_code`.
pub fn version_script(name: &str, exit_code: i32) -> Vec<u8> {
    format!(
        "#!/bin/sh\nif [ \"$1\" = \"--version\" ]; then\n  echo '{name} 1.0.0'\nfi\nexit {exit_code}\n"
    )
    .into_bytes()
}

/// Write `body` to `path` and mark it executable.
///
/// # Panics
///
/// Panics if the file cannot be written.
pub fn write_executable(path: &Utf8Path, body: &[u8]) {
    std::fs::write(path, body).expect("write executable");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
            .expect("set executable bit");
    }
}

/// Build a descriptor served from `https://example.test/<name>` whose pinned
/// digest matches `bytes`.
///
/// # Panics
///
/// Panics if `name` is not a valid tool name.
pub fn descriptor_for(name: &str, bytes: &[u8]) -> ArtefactDescriptor {
    let url = stub_url(name);
    let sha = sha256_hex(bytes);
    ArtefactDescriptor::from_fields(&DescriptorFields {
        name,
        description: "stub tool",
        homepage: "https://example.test",
        source_url: &url,
        version: "1.0.0",
        sha256: &sha,
        license: "MIT",
    })
    .expect("valid stub descriptor")
}

/// The URL [`descriptor_for`] pins a tool to.
pub fn stub_url(name: &str) -> String {
    format!("https://example.test/{name}")
}

/// How a [`StubFetcher`] answers for one URL.
#[derive(Debug, Clone)]
pub enum StubResponse {
    /// Serve these bytes.
    Bytes(Vec<u8>),
    /// Answer with [`FetchError::NotFound`].
    NotFound,
    /// Answer with [`FetchError::Network`] and this reason.
    Network(String),
}

/// An [`ArtefactFetcher`] that serves canned responses keyed by URL.
///
/// Unknown URLs answer [`FetchError::NotFound`]. Every requested URL is
/// recorded so tests can assert how often the network would have been hit.
#[derive(Debug, Default)]
pub struct StubFetcher {
    responses: HashMap<String, StubResponse>,
    requests: Mutex<Vec<String>>,
}

impl StubFetcher {
    /// Create a fetcher with no responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `response` for `url`.
    #[must_use]
    pub fn with(mut self, url: impl Into<String>, response: StubResponse) -> Self {
        self.responses.insert(url.into(), response);
        self
    }

    /// URLs requested so far, in order.
    ///
    /// # Panics
    ///
    /// Panics if the request log mutex is poisoned.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("request log lock").clone()
    }
}

impl ArtefactFetcher for StubFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.requests
            .lock()
            .expect("request log lock")
            .push(url.to_owned());
        match self.responses.get(url) {
            Some(StubResponse::Bytes(bytes)) => Ok(bytes.clone()),
            Some(StubResponse::Network(reason)) => Err(FetchError::Network {
                url: url.to_owned(),
                reason: reason.clone(),
            }),
            Some(StubResponse::NotFound) | None => Err(FetchError::NotFound {
                url: url.to_owned(),
            }),
        }
    }
}
