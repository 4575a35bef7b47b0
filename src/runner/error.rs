//! Error types for the runner module.
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
use thiserror::Error;

/// Errors raised during command execution.
#[derive(Debug, Error, Diagnostic)]
pub enum RunnerError {
    /// The Wirefile does not exist at the expected path.
    #[error("Wirefile '{name}' not found in {directory}")]
    #[diagnostic(
        code(stepwire::runner::wirefile_not_found),
        help("create {name} or pass its location with --file")
    )]
    WirefileNotFound {
        /// File name that was expected, e.g. `Wirefile.yml`.
        name: String,
        /// Human-readable directory description.
        directory: String,
        /// Full path that was tried.
        path: Utf8PathBuf,
    },
    /// The round completed but reported errors.
    #[error("generation failed with {errors} error(s) and {warnings} warning(s)")]
    #[diagnostic(code(stepwire::runner::round_failed))]
    RoundFailed {
        /// Error issues plus write failures.
        errors: usize,
        /// Warning issues.
        warnings: usize,
    },
}
