//! Platform coverage validation.
//!
//! For every Actions type referenced by the structure model and every
//! selected platform, the validator looks for the platform-specific
//! implementation (`IOSPaymentActions` for `PaymentActions`, and so on):
//!
//! - missing, and the base type has no unimplemented abstract members: a
//!   warning is raised and an empty stub is requested;
//! - missing, and the base type leaves abstract members unimplemented: one
//!   error per member, and no stub, since it would not compile;
//! - present, but not assignable to the base type: one error naming the
//!   expected and the actual supertype.
//!
//! Every (Actions type, platform) pair is checked independently and issues
//! accumulate over the whole product, so one run reports every problem.

use miette::Diagnostic;
use thiserror::Error;
use tracing::debug;

use crate::diagnostics::Severity;
use crate::emit::{ArtifactSink, ArtifactWriteError};
use crate::generator::Generator;
use crate::host::{TypeKind, TypeLookup};
use crate::platform::{Platform, PlatformSet};
use crate::structure::StructureModel;
use crate::type_ref::TypeRef;

fn describe_supertype(actual: Option<&TypeRef>) -> String {
    actual.map_or_else(|| "no supertype".to_owned(), ToString::to_string)
}

/// What went wrong for one (Actions type, platform) pair.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum IssueKind {
    /// No platform implementation exists; an empty stub is generated.
    #[error("class [{expected}] was not found; generating an empty stub subtype of [{base}]")]
    #[diagnostic(
        code(stepwire::validate::missing_implementation),
        severity(Warning),
        help("declare {expected} to replace the generated stub")
    )]
    MissingImplementation {
        /// Platform being checked.
        platform: Platform,
        /// Expected platform-specific type.
        expected: TypeRef,
        /// Base Actions type.
        base: TypeRef,
    },
    /// No platform implementation exists and a stub cannot satisfy the base.
    #[error(
        "class [{expected}] was not found and cannot be stubbed: [{base}] leaves abstract member [{member}] unimplemented"
    )]
    #[diagnostic(
        code(stepwire::validate::unimplemented_abstract_member),
        help("implement {expected} so that it extends {base} and overrides {member}")
    )]
    UnimplementedAbstractMember {
        /// Platform being checked.
        platform: Platform,
        /// Expected platform-specific type.
        expected: TypeRef,
        /// Base Actions type.
        base: TypeRef,
        /// The unimplemented member.
        member: String,
    },
    /// The platform implementation exists but does not extend the base.
    #[error(
        "class [{found}] should extend [{expected}], but [{actual_name}] found instead",
        actual_name = describe_supertype(.actual.as_ref())
    )]
    #[diagnostic(code(stepwire::validate::supertype_mismatch))]
    SupertypeMismatch {
        /// Platform being checked.
        platform: Platform,
        /// The platform-specific type that was found.
        found: TypeRef,
        /// The base Actions type it should extend.
        expected: TypeRef,
        /// The supertype it declares instead.
        actual: Option<TypeRef>,
    },
}

impl IssueKind {
    /// Severity implied by the kind.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            Self::MissingImplementation { .. } => Severity::Warning,
            Self::UnimplementedAbstractMember { .. } | Self::SupertypeMismatch { .. } => {
                Severity::Error
            }
        }
    }

    /// Platform-specific type the issue is about.
    #[must_use]
    pub const fn target(&self) -> &TypeRef {
        match self {
            Self::MissingImplementation { expected, .. }
            | Self::UnimplementedAbstractMember { expected, .. } => expected,
            Self::SupertypeMismatch { found, .. } => found,
        }
    }
}

/// A single validation finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Warning or error.
    pub severity: Severity,
    /// Platform-specific type the issue is about.
    pub target: TypeRef,
    /// Details.
    pub kind: IssueKind,
}

impl ValidationIssue {
    fn new(kind: IssueKind) -> Self {
        Self {
            severity: kind.severity(),
            target: kind.target().clone(),
            kind,
        }
    }

    /// Human-readable description.
    #[must_use]
    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    /// Whether the issue fails the round.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Request to synthesise an empty platform implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubRequest {
    /// Platform the stub is for.
    pub platform: Platform,
    /// Identity of the stub type.
    pub stub: TypeRef,
    /// Base Actions type the stub derives from.
    pub base: TypeRef,
    /// Whether the base is an interface (implemented rather than extended).
    pub base_is_interface: bool,
}

/// Accumulated findings of one validation pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    /// Issues in (Actions type, platform) order.
    pub issues: Vec<ValidationIssue>,
    /// Stubs requested for pairs that raised a warning.
    pub stubs: Vec<StubRequest>,
    /// Stubs that could not be written.
    pub write_failures: Vec<ArtifactWriteError>,
}

impl ValidationReport {
    /// Whether any error issue was raised.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(ValidationIssue::is_error)
    }

    /// Validation succeeds when no error issue was raised.
    #[must_use]
    pub fn is_success(&self) -> bool {
        !self.has_errors()
    }

    /// Warning issues.
    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| !i.is_error())
    }

    /// Error issues.
    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.is_error())
    }
}

/// Outcome of checking one pair.
enum PairVerdict {
    Implemented,
    Stub(StubRequest, ValidationIssue),
    Invalid(Vec<ValidationIssue>),
}

/// Checks that every Actions type is implemented on every platform.
#[derive(Debug, Clone)]
pub struct Validator {
    platforms: PlatformSet,
}

impl Validator {
    /// Validate against `platforms`.
    #[must_use]
    pub const fn new(platforms: PlatformSet) -> Self {
        Self { platforms }
    }

    /// Platforms checked by this validator.
    #[must_use]
    pub const fn platforms(&self) -> &PlatformSet {
        &self.platforms
    }

    /// Check every (Actions type, platform) pair without emitting anything.
    ///
    /// Actions types are visited in sorted order, so the same model and the
    /// same lookup answers always produce the same report.
    #[must_use]
    pub fn check<L>(&self, model: &StructureModel, lookup: &L) -> ValidationReport
    where
        L: TypeLookup + ?Sized,
    {
        let mut actions: Vec<TypeRef> = model.all_actions_types().into_iter().collect();
        actions.sort();
        let mut report = ValidationReport::default();
        for base in &actions {
            for platform in self.platforms.iter() {
                match Self::check_pair(base, platform, lookup) {
                    PairVerdict::Implemented => {}
                    PairVerdict::Stub(request, issue) => {
                        report.issues.push(issue);
                        report.stubs.push(request);
                    }
                    PairVerdict::Invalid(issues) => report.issues.extend(issues),
                }
            }
        }
        report
    }

    /// Check every pair and emit one stub per missing, stub-able pair.
    ///
    /// A stub that fails to write is recorded in
    /// [`ValidationReport::write_failures`]; the remaining stubs are still
    /// emitted.
    pub fn validate<L>(
        &self,
        model: &StructureModel,
        lookup: &L,
        generator: &Generator,
        sink: &mut dyn ArtifactSink,
    ) -> ValidationReport
    where
        L: TypeLookup + ?Sized,
    {
        let mut report = self.check(model, lookup);
        for request in &report.stubs {
            if let Err(err) = generator.emit_stub(request, sink) {
                report.write_failures.push(err);
            }
        }
        report
    }

    fn check_pair<L>(base: &TypeRef, platform: Platform, lookup: &L) -> PairVerdict
    where
        L: TypeLookup + ?Sized,
    {
        let expected = base.with_platform_prefix(platform);
        let Some(found) = lookup.find_type(&expected) else {
            return Self::missing(base, expected, platform, lookup);
        };
        if lookup.is_assignable(&expected, base) {
            debug!(%expected, %base, "platform implementation found");
            return PairVerdict::Implemented;
        }
        PairVerdict::Invalid(vec![ValidationIssue::new(IssueKind::SupertypeMismatch {
            platform,
            actual: found.declared_supertype().cloned(),
            found: expected,
            expected: base.clone(),
        })])
    }

    fn missing<L>(base: &TypeRef, expected: TypeRef, platform: Platform, lookup: &L) -> PairVerdict
    where
        L: TypeLookup + ?Sized,
    {
        let unimplemented = lookup.unimplemented_abstract_members(base);
        if unimplemented.is_empty() {
            let base_is_interface = lookup
                .find_type(base)
                .is_some_and(|t| t.kind == TypeKind::Interface);
            let request = StubRequest {
                platform,
                stub: expected.clone(),
                base: base.clone(),
                base_is_interface,
            };
            let issue = ValidationIssue::new(IssueKind::MissingImplementation {
                platform,
                expected,
                base: base.clone(),
            });
            return PairVerdict::Stub(request, issue);
        }
        PairVerdict::Invalid(
            unimplemented
                .into_iter()
                .map(|member| {
                    ValidationIssue::new(IssueKind::UnimplementedAbstractMember {
                        platform,
                        expected: expected.clone(),
                        base: base.clone(),
                        member,
                    })
                })
                .collect(),
        )
    }
}
