//! Semantic wrapper for managed tool names.
//!
//! This module provides the [`ToolName`] newtype. A tool name doubles as the
//! installed file name, so construction rejects anything that could escape
//! the binary directory or produce a hidden file.

use crate::artefact::error::ArtefactError;
use std::fmt;

/// The name of a managed tool, valid as a single path component.
///
/// # Examples
///
/// ```
/// use git_plugins_installer::tool_name::ToolName;
///
/// let name = ToolName::try_from("git-get").unwrap();
/// assert_eq!(name.as_str(), "git-get");
/// assert!(ToolName::try_from("../git-get").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ToolName(String);

impl ToolName {
    /// Get the tool name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for ToolName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for ToolName {
    type Error = ArtefactError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        validate_tool_name(value)?;
        Ok(Self(value.to_owned()))
    }
}

impl TryFrom<String> for ToolName {
    type Error = ArtefactError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        validate_tool_name(&value)?;
        Ok(Self(value))
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn validate_tool_name(value: &str) -> Result<(), ArtefactError> {
    let reject = |reason: &str| {
        Err(ArtefactError::InvalidToolName {
            value: value.to_owned(),
            reason: reason.to_owned(),
        })
    };

    if value.is_empty() {
        return reject("name must not be empty");
    }
    if value.starts_with('.') {
        return reject("name must not start with '.'");
    }
    if value.contains(['/', '\\']) {
        return reject("name must not contain path separators");
    }
    if value.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return reject("name must not contain whitespace or control characters");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("git-get")]
    #[case("git-branch-cleanup")]
    #[case("tool_v2")]
    fn accepts_plain_file_names(#[case] value: &str) {
        let name = ToolName::try_from(value).expect("valid name");
        assert_eq!(name.as_str(), value);
    }

    #[rstest]
    #[case::empty("")]
    #[case::dot(".")]
    #[case::dot_dot("..")]
    #[case::hidden(".git-get")]
    #[case::slash("bin/git-get")]
    #[case::backslash("bin\\git-get")]
    #[case::space("git get")]
    fn rejects_unsafe_names(#[case] value: &str) {
        let err = ToolName::try_from(value).expect_err("name should be rejected");
        assert!(matches!(err, ArtefactError::InvalidToolName { .. }));
    }

    #[test]
    fn display_matches_inner_value() {
        let name = ToolName::try_from("git-autocommit".to_owned()).expect("valid name");
        assert_eq!(name.to_string(), "git-autocommit");
        assert_eq!(name.into_inner(), "git-autocommit");
    }
}
