//! The compiled-in set of managed tools.
//!
//! Each entry pins a `git-plugins` script to its upstream URL and checksum.
//! Names are unique across a catalogue because they double as the
//! installed file names.

use super::descriptor::{ArtefactDescriptor, DescriptorFields};
use super::error::{ArtefactError, Result};
use crate::tool_name::ToolName;
use std::collections::HashSet;

const HOMEPAGE: &str = "https://github.com/rfussien/git-plugins";

/// Raw entries for the built-in catalogue.
pub const BUILTIN_TOOLS: &[DescriptorFields<'static>] = &[
    DescriptorFields {
        name: "git-autocommit",
        description: "Git plugin to automatically create formatted commits based on branch names",
        homepage: HOMEPAGE,
        source_url: "https://raw.githubusercontent.com/rfussien/git-plugins/main/src/git-autocommit",
        version: "1.0.0",
        sha256: "ec8b643bd9f749c33ec2c469894c133bf0a5b5aa12cba75c35134ff3ab330e2c",
        license: "MIT",
    },
    DescriptorFields {
        name: "git-branch-cleanup",
        description: "Git plugin to clean up merged and stale branches",
        homepage: HOMEPAGE,
        source_url: "https://raw.githubusercontent.com/rfussien/git-plugins/main/src/git-branch-cleanup",
        version: "1.0.0",
        sha256: "642299ff4b7d37398fbe4270651d4408894f19b12a6da6fc02142b04ef58fc86",
        license: "MIT",
    },
    DescriptorFields {
        name: "git-get",
        description: "Git plugin to clone and manage repositories in an organized directory structure",
        homepage: HOMEPAGE,
        source_url: "https://raw.githubusercontent.com/rfussien/git-plugins/main/src/git-get",
        version: "1.0.0",
        sha256: "276b7dd33cdff671b3407f5e4a7f3d4128feaeac72b7f9673d120c9bbf24e0b0",
        license: "MIT",
    },
];

/// An ordered set of descriptors with unique names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalogue {
    descriptors: Vec<ArtefactDescriptor>,
}

impl Catalogue {
    /// Build a catalogue, rejecting duplicate names.
    ///
    /// # Errors
    ///
    /// Returns [`ArtefactError::DuplicateToolName`] if two descriptors share
    /// a name.
    pub fn new(descriptors: Vec<ArtefactDescriptor>) -> Result<Self> {
        let mut seen = HashSet::new();
        for descriptor in &descriptors {
            if !seen.insert(descriptor.name().as_str()) {
                return Err(ArtefactError::DuplicateToolName {
                    name: descriptor.name().to_string(),
                });
            }
        }
        Ok(Self { descriptors })
    }

    /// Build a catalogue from raw field sets.
    ///
    /// # Errors
    ///
    /// Returns the first validation error encountered.
    pub fn from_entries(entries: &[DescriptorFields<'_>]) -> Result<Self> {
        let descriptors = entries
            .iter()
            .map(ArtefactDescriptor::from_fields)
            .collect::<Result<Vec<_>>>()?;
        Self::new(descriptors)
    }

    /// The catalogue of `git-plugins` tools shipped with this installer.
    ///
    /// # Errors
    ///
    /// Returns an error only if a compiled-in entry is malformed.
    ///
    /// # Examples
    ///
    /// ```
    /// use git_plugins_installer::artefact::catalogue::Catalogue;
    ///
    /// let catalogue = Catalogue::builtin().unwrap();
    /// assert!(catalogue.get("git-get").is_some());
    /// ```
    pub fn builtin() -> Result<Self> {
        Self::from_entries(BUILTIN_TOOLS)
    }

    /// Look up a descriptor by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ArtefactDescriptor> {
        self.descriptors
            .iter()
            .find(|descriptor| descriptor.name().as_str() == name)
    }

    /// All descriptors, in catalogue order.
    #[must_use]
    pub fn descriptors(&self) -> &[ArtefactDescriptor] {
        &self.descriptors
    }

    /// All tool names, in catalogue order.
    pub fn names(&self) -> impl Iterator<Item = &ToolName> {
        self.descriptors.iter().map(ArtefactDescriptor::name)
    }

    /// Number of descriptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Whether the catalogue is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalogue_is_valid() {
        let catalogue = Catalogue::builtin().expect("built-in entries must validate");
        assert_eq!(catalogue.len(), 3);
    }

    #[test]
    fn builtin_catalogue_lists_tools_in_order() {
        let catalogue = Catalogue::builtin().expect("valid catalogue");
        let names: Vec<&str> = catalogue.names().map(ToolName::as_str).collect();
        assert_eq!(names, ["git-autocommit", "git-branch-cleanup", "git-get"]);
    }

    #[test]
    fn builtin_git_get_is_pinned() {
        let catalogue = Catalogue::builtin().expect("valid catalogue");
        let git_get = catalogue.get("git-get").expect("git-get present");
        assert_eq!(git_get.version(), "1.0.0");
        assert!(git_get.expected_digest().as_str().starts_with("276b7dd3"));
        assert!(git_get.source_url().ends_with("/src/git-get"));
    }

    #[test]
    fn get_returns_none_for_unknown_tool() {
        let catalogue = Catalogue::builtin().expect("valid catalogue");
        assert!(catalogue.get("git-unknown").is_none());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let first = BUILTIN_TOOLS.first().copied().expect("non-empty table");
        let err = Catalogue::from_entries(&[first, first]).expect_err("duplicates rejected");
        assert!(matches!(
            err,
            ArtefactError::DuplicateToolName { ref name } if name == first.name
        ));
    }

    #[test]
    fn empty_catalogue_is_allowed() {
        let catalogue = Catalogue::new(Vec::new()).expect("empty catalogue");
        assert!(catalogue.is_empty());
    }
}
