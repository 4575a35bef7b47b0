//! Steps-to-Actions structure model.
//!
//! The model is a bipartite relation populated once per round from reflected
//! constructor signatures. Each Steps type maps to the Actions types its
//! constructor takes, in parameter order. Repeated parameters are kept
//! because generated construction code passes arguments positionally.

use std::fmt::{self, Display, Formatter};

use indexmap::{IndexMap, IndexSet};
use itertools::Itertools;
use miette::Diagnostic;
use thiserror::Error;

use crate::host::RequirementDeclaration;
use crate::type_ref::TypeRef;

/// Requirements were requested for a Steps type that was never recorded.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("steps type [{steps}] was never recorded in the structure model")]
#[diagnostic(code(stepwire::structure::unknown_steps))]
pub struct UnknownStepsError {
    /// The missing Steps type.
    pub steps: TypeRef,
}

/// Steps types and the ordered Actions types each one requires.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructureModel {
    entries: IndexMap<TypeRef, Vec<TypeRef>>,
}

impl StructureModel {
    /// Create an empty model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a model from reflected declarations.
    #[must_use]
    pub fn from_declarations<'a>(
        declarations: impl IntoIterator<Item = &'a RequirementDeclaration>,
    ) -> Self {
        let mut model = Self::new();
        for declaration in declarations {
            model.record_declaration(declaration);
        }
        model
    }

    /// Append `actions` to the requirements of `steps`.
    ///
    /// Recording the same pair twice keeps both occurrences.
    pub fn record_requirement(&mut self, steps: TypeRef, actions: TypeRef) {
        self.entries.entry(steps).or_default().push(actions);
    }

    /// Register `declaration.steps`, then record each parameter in order.
    ///
    /// A Steps type whose constructor takes no parameters is still
    /// registered so that it receives wiring.
    pub fn record_declaration(&mut self, declaration: &RequirementDeclaration) {
        let requirements = self.entries.entry(declaration.steps.clone()).or_default();
        requirements.extend(declaration.parameters.iter().cloned());
    }

    /// Actions types required by `steps`, in recording order.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownStepsError`] if `steps` was never recorded.
    pub fn requirements_of(&self, steps: &TypeRef) -> Result<&[TypeRef], UnknownStepsError> {
        self.entries
            .get(steps)
            .map(Vec::as_slice)
            .ok_or_else(|| UnknownStepsError {
                steps: steps.clone(),
            })
    }

    /// Every Actions type referenced by any Steps type, without duplicates.
    #[must_use]
    pub fn all_actions_types(&self) -> IndexSet<TypeRef> {
        self.entries.values().flatten().cloned().collect()
    }

    /// Every recorded Steps type.
    #[must_use]
    pub fn all_steps_types(&self) -> IndexSet<TypeRef> {
        self.entries.keys().cloned().collect()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of recorded Steps types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterate over Steps types and their requirements.
    pub fn iter(&self) -> impl Iterator<Item = (&TypeRef, &[TypeRef])> {
        self.entries.iter().map(|(steps, actions)| (steps, actions.as_slice()))
    }

    /// Render the relation as a Graphviz digraph.
    ///
    /// Edges run from each Steps type to each distinct Actions type it needs.
    /// Nodes are sorted so the output is stable.
    #[must_use]
    pub fn to_dot(&self) -> String {
        DotGraph(self).to_string()
    }
}

/// Wrapper struct to display the model in DOT syntax.
struct DotGraph<'a>(&'a StructureModel);

impl Display for DotGraph<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "digraph stepwire {{")?;
        for (steps, actions) in self.0.entries.iter().sorted_by(|a, b| a.0.cmp(b.0)) {
            writeln!(f, "  \"{steps}\" [shape=box];")?;
            for action in actions.iter().unique().sorted() {
                writeln!(f, "  \"{steps}\" -> \"{action}\";")?;
            }
        }
        writeln!(f, "}}")
    }
}

impl Display for StructureModel {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (steps, actions) in &self.entries {
            writeln!(f, "{steps}: [{}]", actions.iter().join(", "))?;
        }
        Ok(())
    }
}
