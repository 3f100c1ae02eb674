//! Immutable metadata describing one downloadable tool.
//!
//! A descriptor pins a tool to a single source URL and the SHA-256 digest
//! its payload must hash to. Construction validates every field, so a
//! descriptor in hand is always well formed.

use super::error::{ArtefactError, Result};
use super::sha256_digest::Sha256Digest;
use crate::tool_name::ToolName;
use serde::Serialize;

/// Raw descriptor fields, before validation.
///
/// Used for compiled-in catalogue entries and by tests that build
/// descriptors for stub payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DescriptorFields<'a> {
    /// Tool name, also the installed file name.
    pub name: &'a str,
    /// One-line summary of what the tool does.
    pub description: &'a str,
    /// Project homepage.
    pub homepage: &'a str,
    /// Location of the single-file payload.
    pub source_url: &'a str,
    /// Pinned version, informational only.
    pub version: &'a str,
    /// Expected lowercase hex SHA-256 of the payload.
    pub sha256: &'a str,
    /// License identifier.
    pub license: &'a str,
}

/// A validated artefact descriptor.
///
/// # Examples
///
/// ```
/// use git_plugins_installer::artefact::descriptor::{ArtefactDescriptor, DescriptorFields};
///
/// let descriptor = ArtefactDescriptor::from_fields(&DescriptorFields {
///     name: "git-get",
///     description: "Clone repositories into an organised layout",
///     homepage: "https://github.com/rfussien/git-plugins",
///     source_url: "https://example.test/git-get",
///     version: "1.0.0",
///     sha256: &"a".repeat(64),
///     license: "MIT",
/// })
/// .unwrap();
/// assert_eq!(descriptor.name().as_str(), "git-get");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtefactDescriptor {
    #[serde(serialize_with = "serialize_display")]
    name: ToolName,
    description: String,
    homepage: String,
    source_url: String,
    version: String,
    #[serde(rename = "sha256", serialize_with = "serialize_display")]
    expected_digest: Sha256Digest,
    license: String,
}

impl ArtefactDescriptor {
    /// Validate raw fields and build a descriptor.
    ///
    /// # Errors
    ///
    /// Returns an [`ArtefactError`] naming the first invalid field.
    pub fn from_fields(fields: &DescriptorFields<'_>) -> Result<Self> {
        let name = ToolName::try_from(fields.name)?;
        validate_source_url(fields.source_url)?;
        validate_version(fields.version)?;
        let expected_digest = Sha256Digest::try_from(fields.sha256)?;

        Ok(Self {
            name,
            description: fields.description.to_owned(),
            homepage: fields.homepage.to_owned(),
            source_url: fields.source_url.to_owned(),
            version: fields.version.to_owned(),
            expected_digest,
            license: fields.license.to_owned(),
        })
    }

    /// The tool name.
    #[must_use]
    pub fn name(&self) -> &ToolName {
        &self.name
    }

    /// One-line description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Project homepage.
    #[must_use]
    pub fn homepage(&self) -> &str {
        &self.homepage
    }

    /// Where the payload is fetched from.
    #[must_use]
    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    /// Pinned version string.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Digest the fetched payload must match.
    #[must_use]
    pub fn expected_digest(&self) -> &Sha256Digest {
        &self.expected_digest
    }

    /// License identifier.
    #[must_use]
    pub fn license(&self) -> &str {
        &self.license
    }
}

fn serialize_display<T, S>(value: &T, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    T: std::fmt::Display,
    S: serde::Serializer,
{
    serializer.collect_str(value)
}

fn validate_source_url(value: &str) -> Result<()> {
    let reject = |reason: &str| {
        Err(ArtefactError::InvalidSourceUrl {
            value: value.to_owned(),
            reason: reason.to_owned(),
        })
    };

    let Some(rest) = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"))
    else {
        return reject("scheme must be http or https");
    };
    let host = rest.split('/').next().unwrap_or_default();
    if host.is_empty() {
        return reject("missing host");
    }
    if value.chars().any(char::is_whitespace) {
        return reject("must not contain whitespace");
    }
    Ok(())
}

fn validate_version(value: &str) -> Result<()> {
    let reject = |reason: &str| {
        Err(ArtefactError::InvalidVersion {
            value: value.to_owned(),
            reason: reason.to_owned(),
        })
    };

    if value.is_empty() {
        return reject("version must not be empty");
    }
    if value.chars().any(char::is_whitespace) {
        return reject("version must not contain whitespace");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn fields() -> DescriptorFields<'static> {
        DescriptorFields {
            name: "git-get",
            description: "Git plugin to clone and manage repositories",
            homepage: "https://github.com/rfussien/git-plugins",
            source_url: "https://example.test/git-get",
            version: "1.0.0",
            sha256: "276b7dd33cdff671b3407f5e4a7f3d4128feaeac72b7f9673d120c9bbf24e0b0",
            license: "MIT",
        }
    }

    #[rstest]
    fn from_fields_keeps_all_fields(fields: DescriptorFields<'static>) {
        let descriptor = ArtefactDescriptor::from_fields(&fields).expect("valid fields");
        assert_eq!(descriptor.name().as_str(), "git-get");
        assert_eq!(descriptor.source_url(), fields.source_url);
        assert_eq!(descriptor.version(), "1.0.0");
        assert_eq!(descriptor.expected_digest().as_str(), fields.sha256);
        assert_eq!(descriptor.license(), "MIT");
        assert_eq!(descriptor.homepage(), fields.homepage);
        assert_eq!(descriptor.description(), fields.description);
    }

    #[rstest]
    #[case::plain_http("http://example.test/tool")]
    #[case::https_with_path("https://raw.githubusercontent.com/a/b/main/src/tool")]
    fn accepts_http_and_https_urls(fields: DescriptorFields<'static>, #[case] url: &'static str) {
        let fields = DescriptorFields {
            source_url: url,
            ..fields
        };
        assert!(ArtefactDescriptor::from_fields(&fields).is_ok());
    }

    #[rstest]
    #[case::ftp("ftp://example.test/tool")]
    #[case::relative("example.test/tool")]
    #[case::no_host("https:///tool")]
    #[case::whitespace("https://example.test/my tool")]
    fn rejects_bad_urls(fields: DescriptorFields<'static>, #[case] url: &'static str) {
        let fields = DescriptorFields {
            source_url: url,
            ..fields
        };
        let err = ArtefactDescriptor::from_fields(&fields).expect_err("url should be rejected");
        assert!(matches!(err, ArtefactError::InvalidSourceUrl { .. }));
    }

    #[rstest]
    #[case::empty("")]
    #[case::whitespace("1.0 beta")]
    fn rejects_bad_versions(fields: DescriptorFields<'static>, #[case] version: &'static str) {
        let fields = DescriptorFields { version, ..fields };
        let err = ArtefactDescriptor::from_fields(&fields).expect_err("version should be rejected");
        assert!(matches!(err, ArtefactError::InvalidVersion { .. }));
    }

    #[rstest]
    fn rejects_bad_digest(fields: DescriptorFields<'static>) {
        let fields = DescriptorFields {
            sha256: "not-a-digest",
            ..fields
        };
        let err = ArtefactDescriptor::from_fields(&fields).expect_err("digest should be rejected");
        assert!(matches!(err, ArtefactError::InvalidSha256Digest { .. }));
    }

    #[rstest]
    fn serialises_name_and_digest_as_strings(fields: DescriptorFields<'static>) {
        let descriptor = ArtefactDescriptor::from_fields(&fields).expect("valid fields");
        let json = serde_json::to_value(&descriptor).expect("serialise descriptor");
        assert_eq!(json["name"], "git-get");
        assert_eq!(json["sha256"], fields.sha256);
        assert_eq!(json["version"], "1.0.0");
    }
}
