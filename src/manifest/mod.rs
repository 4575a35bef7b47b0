//! Wirefile loading.
//!
//! Parses a `Wirefile.yml` with `serde_saphyr`, mapping failures to
//! [`miette`] diagnostics, and checks that the declared format version is
//! one this build understands.

use camino::Utf8Path;
use tracing::debug;

use crate::ast::Wirefile;

mod diagnostics;
mod hints;

pub use diagnostics::{ManifestError, WirefileName, WirefileSource, map_yaml_error};

/// Major format version accepted by this build.
pub const SUPPORTED_MAJOR: u64 = 1;

fn from_str_named(yaml: &str, name: &WirefileName) -> Result<Wirefile, ManifestError> {
    let wirefile: Wirefile = serde_saphyr::from_str(yaml).map_err(|e| ManifestError::Parse {
        name: name.clone(),
        source: map_yaml_error(e, &WirefileSource::from(yaml), name),
    })?;
    if wirefile.wire_version.major != SUPPORTED_MAJOR {
        return Err(ManifestError::UnsupportedVersion {
            found: wirefile.wire_version,
        });
    }
    debug!(
        %name,
        types = wirefile.types.len(),
        steps = wirefile.steps.len(),
        "loaded Wirefile"
    );
    Ok(wirefile)
}

/// Parse a Wirefile from a string.
///
/// # Errors
///
/// Returns [`ManifestError::Parse`] when the YAML is invalid or does not
/// match the schema, and [`ManifestError::UnsupportedVersion`] when
/// `wire_version` has an unsupported major version.
///
/// # Examples
///
/// ```rust
/// let wirefile = stepwire::manifest::from_str("wire_version: \"1.0.0\"\n")?;
/// assert!(wirefile.steps.is_empty());
/// # Ok::<(), stepwire::manifest::ManifestError>(())
/// ```
pub fn from_str(yaml: &str) -> Result<Wirefile, ManifestError> {
    from_str_named(yaml, &WirefileName::new("Wirefile.yml"))
}

/// Load a Wirefile from `path`.
///
/// # Errors
///
/// Returns [`ManifestError::Read`] when the file cannot be read, otherwise as
/// [`from_str`].
pub fn from_path(path: &Utf8Path) -> Result<Wirefile, ManifestError> {
    let data = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
        path: path.to_owned(),
        source,
    })?;
    from_str_named(&data, &WirefileName::new(path.as_str()))
}
