//! git-plugins installer library.
//!
//! This crate provides the core functionality for fetching, verifying,
//! installing, and self-testing the single-file tools of the git-plugins
//! project. It is used by the `git-plugins-installer` CLI binary and can be
//! consumed programmatically for testing or custom installation workflows.
//!
//! # Modules
//!
//! - [`artefact`] - Descriptors, the built-in catalogue, fetching, and digest
//!   verification
//! - [`batch`] - Bounded parallel execution with ordered outcomes
//! - [`cli`] - Command-line argument definitions
//! - [`config`] - Configuration file loading and precedence
//! - [`dirs`] - Directory resolution abstraction for platform-specific paths
//! - [`error`] - Error types naming the failed tool and stage
//! - [`install_flow`] - Handlers for `install`, `test`, and `uninstall`
//! - [`list`] - Install state detection and the `list`/`info` handlers
//! - [`list_output`] - Output formatting for tool listing
//! - [`observability`] - Diagnostic logging setup on stderr
//! - [`output`] - Progress messages and PATH guidance
//! - [`pipeline`] - The per-tool fetch, verify, install, and self-test pipeline
//! - [`self_test`] - Running `<tool> --version` with a timeout
//! - [`stager`] - Atomic placement of verified payloads
//! - [`tool_name`] - Semantic wrapper for tool names

pub mod artefact;
pub mod batch;
pub mod cli;
pub mod config;
pub mod dirs;
pub mod error;
pub mod install_flow;
pub mod list;
pub mod list_output;
pub mod observability;
pub mod output;
pub mod pipeline;
pub mod stager;
pub mod tool_name;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
