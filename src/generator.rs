//! Wiring generator.
//!
//! The generator turns a [`StructureModel`] into five kinds of artifacts:
//!
//! 1. the capability-provider interface, one accessor per Actions type;
//! 2. one provider implementation per platform, each accessor returning a new
//!    platform-specific instance;
//! 3. the actions module, delegating every accessor to an injected provider
//!    so platform selection happens once at composition time;
//! 4. the steps module, constructing every Steps type from its Actions;
//! 5. the component interface aggregating both modules.
//!
//! Accessors are sorted by type identity and constructor parameters keep
//! their recorded order, so output is a pure function of the model, the
//! platform set and the [`WiringLayout`].

use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

use itertools::Itertools;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::artifact::{
    Annotation, AnnotationValue, Artifact, ArtifactKind, ArtifactRole, Field, Method, Modifier,
    Parameter, Statement,
};
use crate::emit::{ArtifactSink, ArtifactWriteError, write_artifact};
use crate::platform::{Platform, PlatformSet};
use crate::structure::{StructureModel, UnknownStepsError};
use crate::type_ref::TypeRef;
use crate::validator::StubRequest;

fn override_annotation() -> Annotation {
    Annotation::marker(TypeRef::new("java.lang", "Override"))
}

/// Names of the generated types and of the DI annotations they carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WiringLayout {
    /// Capability-provider interface.
    pub provider: TypeRef,
    /// Module delegating to the injected provider.
    pub actions_module: TypeRef,
    /// Module constructing Steps types.
    pub steps_module: TypeRef,
    /// Component aggregating both modules.
    pub component: TypeRef,
    /// Annotation marking a DI module.
    pub module_annotation: TypeRef,
    /// Annotation marking a providing method.
    pub provides_annotation: TypeRef,
    /// Annotation marking a DI component.
    pub component_annotation: TypeRef,
}

impl Default for WiringLayout {
    fn default() -> Self {
        Self {
            provider: TypeRef::new("actions.definitions", "ActionsDefinition"),
            actions_module: TypeRef::new("dagger", "ActionsModule"),
            steps_module: TypeRef::new("dagger", "StepsModule"),
            component: TypeRef::new("dagger", "StepsComponent"),
            module_annotation: TypeRef::new("dagger", "Module"),
            provides_annotation: TypeRef::new("dagger", "Provides"),
            component_annotation: TypeRef::new("dagger", "Component"),
        }
    }
}

/// Where a generated identifier would be declared twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamingScope {
    /// Accessors of the capability provider and the actions module.
    ActionsAccessors,
    /// Accessors of the steps module and the component.
    StepsAccessors,
    /// Parameters of one steps-module method.
    StepsParameters(TypeRef),
}

impl Display for NamingScope {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::ActionsAccessors => f.write_str("actions accessors"),
            Self::StepsAccessors => f.write_str("steps accessors"),
            Self::StepsParameters(steps) => write!(f, "constructor parameters of [{steps}]"),
        }
    }
}

/// One identifier derived from more than one declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingConflict {
    /// Where the duplicate would appear.
    pub scope: NamingScope,
    /// The duplicated identifier.
    pub name: String,
    /// Types the identifier was derived from, with repeats.
    pub sources: Vec<TypeRef>,
}

impl Display for NamingConflict {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' in {} is derived from [{}]",
            self.name,
            self.scope,
            self.sources.iter().join(", ")
        )
    }
}

/// Errors that abort generation before anything is emitted.
#[derive(Debug, Error, Diagnostic)]
pub enum GenerateError {
    /// Derived identifiers collide, so the generated code would not compile.
    #[error("generated identifiers collide: {}", .0.iter().join("; "))]
    #[diagnostic(
        code(stepwire::generate::naming_conflict),
        help("rename one of the listed types, or avoid requiring the same Actions type twice")
    )]
    NamingConflicts(Vec<NamingConflict>),
    /// The model was inconsistent while planning.
    #[error(transparent)]
    #[diagnostic(transparent)]
    UnknownSteps(#[from] UnknownStepsError),
}

/// Summary of one batch emission.
#[derive(Debug, Default)]
pub struct GenerationReport {
    /// Artifacts that were written.
    pub emitted: Vec<TypeRef>,
    /// Artifacts that could not be written.
    pub write_failures: Vec<ArtifactWriteError>,
}

impl GenerationReport {
    /// Whether every artifact was written.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.write_failures.is_empty()
    }
}

/// Builds and emits wiring artifacts.
#[derive(Debug, Clone)]
pub struct Generator {
    platforms: PlatformSet,
    layout: WiringLayout,
}

impl Generator {
    /// Generate for `platforms` using `layout`.
    #[must_use]
    pub const fn new(platforms: PlatformSet, layout: WiringLayout) -> Self {
        Self { platforms, layout }
    }

    /// Layout used for generated type names.
    #[must_use]
    pub const fn layout(&self) -> &WiringLayout {
        &self.layout
    }

    /// Build every artifact for `model` without emitting anything.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::NamingConflicts`] when derived identifiers
    /// collide, listing every collision, and [`GenerateError::UnknownSteps`]
    /// if the model is inconsistent.
    pub fn plan(&self, model: &StructureModel) -> Result<Vec<Artifact>, GenerateError> {
        let actions = sorted(model.all_actions_types());
        let steps = sorted(model.all_steps_types());
        let mut signatures = Vec::with_capacity(steps.len());
        for steps_ref in &steps {
            let requirements = model.requirements_of(steps_ref)?;
            signatures.push((steps_ref, requirements));
        }
        check_naming(&actions, &signatures)?;

        let mut artifacts = Vec::with_capacity(self.platforms.len() + 4);
        artifacts.push(self.capability_provider(&actions));
        artifacts.extend(
            self.platforms
                .iter()
                .map(|platform| self.platform_provider(platform, &actions)),
        );
        artifacts.push(self.actions_module(&actions));
        artifacts.push(self.steps_module(&signatures));
        artifacts.push(self.component(&steps));
        debug!(count = artifacts.len(), "planned wiring artifacts");
        Ok(artifacts)
    }

    /// Write `artifacts` to `sink`, continuing past individual failures.
    pub fn emit(&self, artifacts: &[Artifact], sink: &mut dyn ArtifactSink) -> GenerationReport {
        let mut report = GenerationReport::default();
        for artifact in artifacts {
            match write_artifact(sink, artifact) {
                Ok(()) => report.emitted.push(artifact.type_ref()),
                Err(err) => report.write_failures.push(err),
            }
        }
        report
    }

    /// Plan and emit every artifact for `model`.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError`] when planning fails; nothing is emitted in
    /// that case.
    pub fn generate(
        &self,
        model: &StructureModel,
        sink: &mut dyn ArtifactSink,
    ) -> Result<GenerationReport, GenerateError> {
        let artifacts = self.plan(model)?;
        Ok(self.emit(&artifacts, sink))
    }

    /// Empty platform implementation for `request`.
    #[must_use]
    pub fn stub(&self, request: &StubRequest) -> Artifact {
        let mut stub = Artifact::new(
            ArtifactRole::Stub(request.platform),
            &request.stub,
            ArtifactKind::Class,
        );
        if request.base_is_interface {
            stub.interfaces.push(request.base.clone());
        } else {
            stub.superclass = Some(request.base.clone());
        }
        stub
    }

    /// Emit the stub for `request`.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactWriteError`] when the sink fails.
    pub fn emit_stub(
        &self,
        request: &StubRequest,
        sink: &mut dyn ArtifactSink,
    ) -> Result<(), ArtifactWriteError> {
        write_artifact(sink, &self.stub(request))
    }

    /// Interface with one abstract accessor per Actions type.
    #[must_use]
    pub fn capability_provider(&self, actions: &[TypeRef]) -> Artifact {
        let mut provider = Artifact::new(
            ArtifactRole::CapabilityProvider,
            &self.layout.provider,
            ArtifactKind::Interface,
        );
        provider.methods = actions
            .iter()
            .map(|a| Method::abstract_accessor(a.accessor_name(), a.clone()))
            .collect();
        provider
    }

    /// Provider implementation for one platform.
    #[must_use]
    pub fn platform_provider(&self, platform: Platform, actions: &[TypeRef]) -> Artifact {
        let name = self.layout.provider.with_platform_prefix(platform);
        let mut provider = Artifact::new(
            ArtifactRole::PlatformProvider(platform),
            &name,
            ArtifactKind::Class,
        );
        provider.interfaces.push(self.layout.provider.clone());
        provider.methods = actions
            .iter()
            .map(|a| {
                Method::public(
                    a.accessor_name(),
                    a.clone(),
                    vec![Statement::ReturnNew {
                        type_ref: a.with_platform_prefix(platform),
                        arguments: Vec::new(),
                    }],
                )
                .annotated(override_annotation())
            })
            .collect();
        provider
    }

    /// Module exposing each Actions type through an injected provider.
    #[must_use]
    pub fn actions_module(&self, actions: &[TypeRef]) -> Artifact {
        let layout = &self.layout;
        let field = layout.provider.accessor_name();
        let mut module = Artifact::new(
            ArtifactRole::ActionsModule,
            &layout.actions_module,
            ArtifactKind::Class,
        );
        module
            .annotations
            .push(Annotation::marker(layout.module_annotation.clone()));
        module.interfaces.push(layout.provider.clone());
        module.fields.push(Field {
            name: field.clone(),
            type_ref: layout.provider.clone(),
            modifiers: vec![Modifier::Private, Modifier::Final],
        });
        module.methods.push(Method::constructor(
            &layout.actions_module,
            vec![Parameter {
                name: field.clone(),
                type_ref: layout.provider.clone(),
            }],
            vec![Statement::AssignField {
                field: field.clone(),
                parameter: field.clone(),
            }],
        ));
        module.methods.extend(actions.iter().map(|a| {
            let accessor = a.accessor_name();
            Method::public(
                accessor.clone(),
                a.clone(),
                vec![Statement::ReturnDelegate {
                    receiver: field.clone(),
                    method: accessor,
                }],
            )
            .annotated(override_annotation())
            .annotated(Annotation::marker(layout.provides_annotation.clone()))
        }));
        module
    }

    /// Module constructing each Steps type from its required Actions.
    #[must_use]
    pub fn steps_module(&self, signatures: &[(&TypeRef, &[TypeRef])]) -> Artifact {
        let layout = &self.layout;
        let mut module = Artifact::new(
            ArtifactRole::StepsModule,
            &layout.steps_module,
            ArtifactKind::Class,
        );
        module
            .annotations
            .push(Annotation::marker(layout.module_annotation.clone()));
        module.methods = signatures
            .iter()
            .map(|(steps, requirements)| {
                let parameters: Vec<Parameter> = requirements
                    .iter()
                    .map(|a| Parameter {
                        name: a.accessor_name(),
                        type_ref: a.clone(),
                    })
                    .collect();
                let arguments = parameters.iter().map(|p| p.name.clone()).collect();
                Method::public(
                    steps.accessor_name(),
                    (*steps).clone(),
                    vec![Statement::ReturnNew {
                        type_ref: (*steps).clone(),
                        arguments,
                    }],
                )
                .annotated(Annotation::marker(layout.provides_annotation.clone()))
                .with_parameters(parameters)
            })
            .collect();
        module
    }

    /// Component interface referencing both modules.
    #[must_use]
    pub fn component(&self, steps: &[TypeRef]) -> Artifact {
        let layout = &self.layout;
        let mut component = Artifact::new(
            ArtifactRole::Component,
            &layout.component,
            ArtifactKind::Interface,
        );
        component.annotations.push(
            Annotation::marker(layout.component_annotation.clone()).with_member(
                "modules",
                AnnotationValue::Classes(vec![
                    layout.actions_module.clone(),
                    layout.steps_module.clone(),
                ]),
            ),
        );
        component.methods = steps
            .iter()
            .map(|s| Method::abstract_accessor(s.accessor_name(), s.clone()))
            .collect();
        component
    }
}

fn sorted(types: impl IntoIterator<Item = TypeRef>) -> Vec<TypeRef> {
    types.into_iter().sorted().collect()
}

/// Group `sources` by derived name and report every name used more than once.
fn duplicates<'a>(
    scope: &NamingScope,
    sources: impl IntoIterator<Item = &'a TypeRef>,
) -> Vec<NamingConflict> {
    let mut by_name: BTreeMap<String, Vec<TypeRef>> = BTreeMap::new();
    for source in sources {
        by_name
            .entry(source.accessor_name())
            .or_default()
            .push(source.clone());
    }
    by_name
        .into_iter()
        .filter(|(_, sources)| sources.len() > 1)
        .map(|(name, sources)| NamingConflict {
            scope: scope.clone(),
            name,
            sources,
        })
        .collect()
}

fn check_naming(
    actions: &[TypeRef],
    signatures: &[(&TypeRef, &[TypeRef])],
) -> Result<(), GenerateError> {
    let mut conflicts = duplicates(&NamingScope::ActionsAccessors, actions);
    conflicts.extend(duplicates(
        &NamingScope::StepsAccessors,
        signatures.iter().map(|(steps, _)| *steps),
    ));
    for (steps, requirements) in signatures {
        conflicts.extend(duplicates(
            &NamingScope::StepsParameters((*steps).clone()),
            requirements.iter(),
        ));
    }
    if conflicts.is_empty() {
        Ok(())
    } else {
        Err(GenerateError::NamingConflicts(conflicts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::MemorySink;
    use rstest::{fixture, rstest};

    fn tr(name: &str) -> TypeRef {
        TypeRef::resolve(name).expect("valid type name")
    }

    #[fixture]
    fn generator() -> Generator {
        Generator::new(PlatformSet::all(), WiringLayout::default())
    }

    fn checkout_model() -> StructureModel {
        let mut model = StructureModel::new();
        model.record_requirement(tr("s.CheckoutSteps"), tr("a.PaymentActions"));
        model.record_requirement(tr("s.CheckoutSteps"), tr("a.NavigationActions"));
        model
    }

    #[rstest]
    fn plan_builds_every_artifact_kind(generator: Generator) {
        let artifacts = generator.plan(&checkout_model()).expect("plan");
        let roles: Vec<_> = artifacts.iter().map(|a| a.role).collect();
        assert_eq!(
            roles,
            [
                ArtifactRole::CapabilityProvider,
                ArtifactRole::PlatformProvider(Platform::Ios),
                ArtifactRole::PlatformProvider(Platform::Droid),
                ArtifactRole::ActionsModule,
                ArtifactRole::StepsModule,
                ArtifactRole::Component,
            ]
        );
    }

    #[rstest]
    fn steps_parameters_keep_constructor_order(generator: Generator) {
        let artifacts = generator.plan(&checkout_model()).expect("plan");
        let module = artifacts
            .iter()
            .find(|a| a.role == ArtifactRole::StepsModule)
            .expect("steps module");
        let method = module.methods.first().expect("one method");
        let names: Vec<_> = method.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["paymentActions", "navigationActions"]);
        assert_eq!(
            method.body,
            Some(vec![Statement::ReturnNew {
                type_ref: tr("s.CheckoutSteps"),
                arguments: vec!["paymentActions".into(), "navigationActions".into()],
            }])
        );
    }

    #[rstest]
    fn provider_accessors_are_sorted(generator: Generator) {
        let provider = generator.capability_provider(&sorted(checkout_model().all_actions_types()));
        let names: Vec<_> = provider.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["navigationActions", "paymentActions"]);
    }

    #[rstest]
    fn repeated_requirement_is_a_naming_conflict(generator: Generator) {
        let mut model = StructureModel::new();
        model.record_requirement(tr("s.DualSteps"), tr("a.NavigationActions"));
        model.record_requirement(tr("s.DualSteps"), tr("a.NavigationActions"));
        let err = generator.plan(&model).expect_err("duplicate parameter");
        let conflicts = match err {
            GenerateError::NamingConflicts(conflicts) => conflicts,
            other => panic!("expected naming conflicts, got {other:?}"),
        };
        assert_eq!(conflicts.len(), 1);
        let conflict = conflicts.first().expect("one conflict");
        assert_eq!(conflict.name, "navigationActions");
        assert_eq!(conflict.scope, NamingScope::StepsParameters(tr("s.DualSteps")));
    }

    #[rstest]
    fn same_simple_name_in_two_packages_conflicts(generator: Generator) {
        let mut model = StructureModel::new();
        model.record_requirement(tr("s.SearchSteps"), tr("one.SearchActions"));
        model.record_requirement(tr("s.OtherSearchSteps"), tr("two.SearchActions"));
        let err = generator.plan(&model).expect_err("accessor clash");
        let message = err.to_string();
        assert!(message.contains("'searchActions' in actions accessors"), "{message}");
    }

    #[rstest]
    fn conflicts_emit_nothing(generator: Generator) {
        let mut model = StructureModel::new();
        model.record_requirement(tr("s.DualSteps"), tr("a.NavigationActions"));
        model.record_requirement(tr("s.DualSteps"), tr("a.NavigationActions"));
        let mut sink = MemorySink::new();
        assert!(generator.generate(&model, &mut sink).is_err());
        assert!(sink.artifacts().is_empty());
    }

    #[rstest]
    fn plan_is_reproducible(generator: Generator) {
        let first = generator.plan(&checkout_model()).expect("plan");
        let second = generator.plan(&checkout_model()).expect("plan");
        assert_eq!(first, second);
    }

    #[rstest]
    fn platform_subset_limits_providers() {
        let generator = Generator::new(PlatformSet::new([Platform::Droid]), WiringLayout::default());
        let artifacts = generator.plan(&checkout_model()).expect("plan");
        let names: Vec<_> = artifacts.iter().map(|a| a.name.as_str()).collect();
        assert!(names.contains(&"DroidActionsDefinition"));
        assert!(!names.contains(&"IOSActionsDefinition"));
    }
}
