//! Output formatting for tool listing and details.
//!
//! This module renders [`ToolStatus`] values as a human-readable table, as
//! JSON, or as a detail block for `info`.

use camino::Utf8Path;
use serde::Serialize;

use crate::list::{InstallState, ToolStatus};

/// Format tool statuses as an aligned table.
#[must_use]
pub fn format_human(statuses: &[ToolStatus<'_>], bin_dir: &Utf8Path) -> String {
    if statuses.is_empty() {
        return String::from("No tools known.");
    }

    let name_width = column_width(statuses.iter().map(|s| s.descriptor.name().as_str()));
    let version_width = column_width(statuses.iter().map(|s| s.descriptor.version()));

    let mut output = format!("Tools in {bin_dir}:\n\n");
    for status in statuses {
        output.push_str(&format!(
            "  {:<name_width$}  {:<version_width$}  {}\n",
            status.descriptor.name().as_str(),
            status.descriptor.version(),
            status.state,
        ));
    }

    let missing = statuses
        .iter()
        .filter(|s| s.state != InstallState::Installed)
        .count();
    if missing > 0 {
        output.push_str("\nRun `git-plugins-installer install --all` to install or repair.");
    }

    output
}

fn column_width<'a>(values: impl Iterator<Item = &'a str>) -> usize {
    values.map(str::len).max().unwrap_or(0)
}

/// Format tool statuses as JSON.
#[must_use]
pub fn format_json(statuses: &[ToolStatus<'_>], bin_dir: &Utf8Path) -> String {
    let json_data = ToolListJson {
        bin_dir: bin_dir.as_str(),
        tools: statuses.iter().map(ToolEntry::from_status).collect(),
    };

    // Use pretty printing for readability
    serde_json::to_string_pretty(&json_data).unwrap_or_else(|_| "{}".to_owned())
}

/// Format the details of one tool for `info`.
#[must_use]
pub fn format_info(status: &ToolStatus<'_>) -> String {
    let descriptor = status.descriptor;
    [
        format!("{} {}", descriptor.name(), descriptor.version()),
        format!("  {}", descriptor.description()),
        String::new(),
        format!("  homepage: {}", descriptor.homepage()),
        format!("  source:   {}", descriptor.source_url()),
        format!("  sha256:   {}", descriptor.expected_digest()),
        format!("  license:  {}", descriptor.license()),
        format!("  path:     {}", status.path),
        format!("  state:    {}", status.state),
    ]
    .join("\n")
}

/// JSON-serializable tool listing.
#[derive(Debug, Serialize)]
pub struct ToolListJson<'a> {
    /// Binary directory that was inspected.
    pub bin_dir: &'a str,
    /// One entry per known tool.
    pub tools: Vec<ToolEntry<'a>>,
}

/// JSON entry for one tool.
#[derive(Debug, Serialize)]
pub struct ToolEntry<'a> {
    /// Tool name.
    pub name: &'a str,
    /// Pinned version.
    pub version: &'a str,
    /// Install state.
    pub state: InstallState,
    /// Install path.
    pub path: &'a str,
    /// Pinned SHA-256 digest.
    pub sha256: &'a str,
}

impl<'a> ToolEntry<'a> {
    fn from_status(status: &'a ToolStatus<'_>) -> Self {
        Self {
            name: status.descriptor.name().as_str(),
            version: status.descriptor.version(),
            state: status.state,
            path: status.path.as_str(),
            sha256: status.descriptor.expected_digest().as_str(),
        }
    }
}
