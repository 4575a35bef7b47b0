//! One generation round.
//!
//! A round rebuilds the structure model from scratch, plans the wiring,
//! validates platform coverage (emitting stubs), then emits the planned
//! artifacts. Nothing is carried over between rounds.

use miette::Diagnostic;
use thiserror::Error;
use tracing::{debug, info};

use crate::diagnostics::{DiagnosticSink, Severity};
use crate::emit::{ArtifactSink, ArtifactWriteError};
use crate::generator::{GenerateError, Generator, WiringLayout};
use crate::host::{RequirementSource, TypeLookup};
use crate::platform::{EmptyPlatformSetError, PlatformSet};
use crate::structure::StructureModel;
use crate::type_ref::TypeRef;
use crate::validator::{ValidationIssue, Validator};

/// Settings for a round.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundConfig {
    /// Platforms to validate and generate providers for.
    pub platforms: PlatformSet,
    /// Names of the generated types.
    pub layout: WiringLayout,
}

/// Errors that abort a round before anything is emitted.
#[derive(Debug, Error, Diagnostic)]
pub enum RoundError {
    /// Planning failed.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Generate(#[from] GenerateError),
    /// No platform was selected, so coverage cannot be checked.
    #[error(transparent)]
    #[diagnostic(transparent)]
    NoPlatforms(#[from] EmptyPlatformSetError),
}

/// Everything a completed round produced.
#[derive(Debug, Default)]
pub struct RoundOutcome {
    /// Number of Steps types in the model.
    pub steps_count: usize,
    /// Validation issues, warnings included.
    pub issues: Vec<ValidationIssue>,
    /// Stubs that were written.
    pub stubs: Vec<TypeRef>,
    /// Wiring artifacts that were written.
    pub artifacts: Vec<TypeRef>,
    /// Artifacts, stubs included, that could not be written.
    pub write_failures: Vec<ArtifactWriteError>,
}

impl RoundOutcome {
    /// The round succeeds when no error issue was raised and every write
    /// succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.write_failures.is_empty() && !self.issues.iter().any(ValidationIssue::is_error)
    }

    /// Number of warning issues.
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.issues.iter().filter(|i| !i.is_error()).count()
    }

    /// Number of failures: error issues plus write failures.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.issues.iter().filter(|i| i.is_error()).count() + self.write_failures.len()
    }
}

/// Run one round.
///
/// Validation issues and write failures are reported to `diagnostics` as
/// they are found and collected in the returned outcome.
///
/// # Errors
///
/// Returns [`RoundError`] when the platform selection is empty or planning
/// fails. Validation and emission have not run in that case, so nothing was
/// written.
pub fn run_round<S, L>(
    source: &S,
    lookup: &L,
    sink: &mut dyn ArtifactSink,
    diagnostics: &mut dyn DiagnosticSink,
    config: &RoundConfig,
) -> Result<RoundOutcome, RoundError>
where
    S: RequirementSource + ?Sized,
    L: TypeLookup + ?Sized,
{
    if config.platforms.is_empty() {
        return Err(EmptyPlatformSetError.into());
    }
    let declarations = source.requirement_declarations();
    let model = StructureModel::from_declarations(&declarations);
    if model.is_empty() {
        debug!("no steps declared; nothing to generate");
        return Ok(RoundOutcome::default());
    }
    debug!(steps = model.len(), "structure model:\n{model}");

    let generator = Generator::new(config.platforms.clone(), config.layout.clone());
    let artifacts = generator.plan(&model)?;

    let validation = Validator::new(config.platforms.clone()).validate(
        &model,
        lookup,
        &generator,
        &mut *sink,
    );
    for issue in &validation.issues {
        diagnostics.report(issue.severity, &issue.target.to_string(), &issue.message());
    }

    let emission = generator.emit(&artifacts, sink);
    let mut outcome = RoundOutcome {
        steps_count: model.len(),
        stubs: validation
            .stubs
            .iter()
            .map(|s| s.stub.clone())
            .filter(|stub| !validation.write_failures.iter().any(|f| &f.artifact == stub))
            .collect(),
        issues: validation.issues,
        artifacts: emission.emitted,
        write_failures: validation.write_failures,
    };
    outcome.write_failures.extend(emission.write_failures);
    for failure in &outcome.write_failures {
        diagnostics.report(
            Severity::Error,
            &failure.artifact.to_string(),
            &failure.to_string(),
        );
    }
    info!(
        artifacts = outcome.artifacts.len(),
        stubs = outcome.stubs.len(),
        warnings = outcome.warning_count(),
        errors = outcome.error_count(),
        "round finished"
    );
    Ok(outcome)
}
