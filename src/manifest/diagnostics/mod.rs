//! Translates Wirefile loading errors into actionable diagnostics.
//!
//! [`WirefileSource`] retains the YAML content and [`WirefileName`] labels
//! its origin, so [`map_yaml_error`] can attach spans and hints to parser
//! failures.
//
// The unused_assignments lint fires on miette/thiserror derive expansions in
// some compiler versions only, so `#[expect]` cannot be used here.
#![allow(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    unused_assignments
)]

use camino::Utf8PathBuf;
use miette::Diagnostic;
use semver::Version;
use thiserror::Error;

mod yaml;

pub use yaml::map_yaml_error;

/// YAML source content of a Wirefile.
///
/// ```rust
/// use stepwire::manifest::WirefileSource;
/// let source = WirefileSource::from("wire_version: 1.0.0");
/// assert_eq!(source.as_str(), "wire_version: 1.0.0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WirefileSource(String);

impl WirefileSource {
    /// Wrap a source buffer.
    #[must_use]
    pub fn new(src: impl Into<String>) -> Self {
        Self(src.into())
    }

    /// View the buffer.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for WirefileSource {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl AsRef<str> for WirefileSource {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Label for a Wirefile used in diagnostics, usually its path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WirefileName(String);

impl WirefileName {
    /// Construct a label.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// View the label.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for WirefileName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl AsRef<str> for WirefileName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for WirefileName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0.as_str())
    }
}

/// Errors raised while loading a Wirefile.
#[derive(Debug, Error, Diagnostic)]
pub enum ManifestError {
    /// The file could not be read.
    #[error("failed to read Wirefile {path}")]
    #[diagnostic(code(stepwire::manifest::read))]
    Read {
        /// Path that was read.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The YAML did not match the Wirefile schema.
    #[error("failed to parse Wirefile {name}")]
    #[diagnostic(code(stepwire::manifest::parse))]
    Parse {
        /// Label of the Wirefile.
        name: WirefileName,
        /// Diagnostic produced by [`map_yaml_error`].
        #[source]
        #[diagnostic_source]
        source: Box<dyn Diagnostic + Send + Sync + 'static>,
    },
    /// The format version is not understood by this build.
    #[error("unsupported wire_version {found}; this build reads 1.x Wirefiles")]
    #[diagnostic(
        code(stepwire::manifest::unsupported_version),
        help("set wire_version to a 1.x version such as \"1.0.0\"")
    )]
    UnsupportedVersion {
        /// Version declared by the Wirefile.
        found: Version,
    },
}
