//! Progress and summary messages for the installer CLI.
//!
//! Progress goes to stderr through [`write_stderr_line`] so that `list` and
//! `info` data on stdout stays machine-readable.

use crate::pipeline::InstalledArtefact;
use crate::tool_name::ToolName;
use camino::Utf8Path;
use std::ffi::OsStr;
use std::io::Write;

/// Length of the digest prefix shown in progress lines.
const SHORT_DIGEST_LEN: usize = 12;

/// Write one line to `stderr`, ignoring write failures.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort logging; ignore write failures.
    }
}

/// Line reported for one successfully installed tool.
#[must_use]
pub fn installed_line(installed: &InstalledArtefact) -> String {
    format!(
        "installed {} {} to {} (sha256 {})",
        installed.name,
        installed.version,
        installed.path,
        installed.digest.short(SHORT_DIGEST_LEN)
    )
}

/// Line reported for one tool that passed its self-test.
#[must_use]
pub fn tested_line(name: &ToolName, path: &Utf8Path) -> String {
    format!("{name}: self-test passed ({path})")
}

/// Line reported after removing a tool.
#[must_use]
pub fn removed_line(name: &ToolName, path: &Utf8Path) -> String {
    format!("removed {name} from {path}")
}

/// Format a success message after installation.
#[must_use]
pub fn success_message(count: usize, bin_dir: &Utf8Path) -> String {
    let plural = if count == 1 { "tool" } else { "tools" };
    format!("Successfully installed {count} {plural} to {bin_dir}")
}

/// Whether `dir` appears in the `PATH`-style list `path_var`.
#[must_use]
pub fn is_directory_in_path(dir: &Utf8Path, path_var: Option<&OsStr>) -> bool {
    path_var.is_some_and(|path| std::env::split_paths(path).any(|p| p == dir.as_std_path()))
}

/// Instructions for adding a directory to `PATH`.
#[must_use]
pub fn path_instructions(bin_dir: &Utf8Path) -> String {
    #[cfg(windows)]
    {
        format!(
            concat!(
                "Add the following directory to your PATH:\n",
                "  {}\n\n",
                "Or run in PowerShell:\n",
                "  [Environment]::SetEnvironmentVariable(",
                "\"PATH\", \"$env:PATH;{}\", \"User\")"
            ),
            bin_dir, bin_dir
        )
    }
    #[cfg(not(windows))]
    {
        format!(
            concat!(
                "{} is not on your PATH. Add the following to your shell profile ",
                "(~/.bashrc or ~/.zshrc):\n",
                "  export PATH=\"{}:$PATH\""
            ),
            bin_dir, bin_dir
        )
    }
}
