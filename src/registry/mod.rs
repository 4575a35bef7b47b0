//! Type registry built from a Wirefile.
//!
//! [`TypeRegistry`] stands in for the host compiler: it answers the
//! validator's type queries from declared types and supplies the Steps
//! constructor signatures to the structure model.
//!
//! Supertype walks follow `extends` and `implements` edges transitively.
//! Types that are referenced but never declared, such as library base
//! classes, end the walk without error.

use std::collections::{HashSet, VecDeque};

use indexmap::IndexMap;
use itertools::Itertools;
use miette::Diagnostic;
use thiserror::Error;

use crate::ast::{TypeDecl, Wirefile};
use crate::host::{DeclaredType, RequirementDeclaration, RequirementSource, TypeLookup};
use crate::type_ref::TypeRef;

mod cycle;

/// Errors raised while building a registry.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum RegistryError {
    /// The same type was declared twice.
    #[error("type [{type_ref}] is declared more than once")]
    #[diagnostic(
        code(stepwire::registry::duplicate_type),
        help("merge the declarations into a single entry under `types`")
    )]
    DuplicateType {
        /// The repeated type.
        type_ref: TypeRef,
    },
    /// Declared supertypes form a cycle.
    #[error("inheritance cycle: {}", .cycle.iter().join(" -> "))]
    #[diagnostic(code(stepwire::registry::inheritance_cycle))]
    InheritanceCycle {
        /// The cycle, starting and ending at the same type.
        cycle: Vec<TypeRef>,
    },
}

/// Declared types and Steps constructors for one project.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: IndexMap<TypeRef, DeclaredType>,
    declarations: Vec<RequirementDeclaration>,
}

impl TypeRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a parsed Wirefile.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateType`] when a type is declared twice
    /// and [`RegistryError::InheritanceCycle`] when supertypes loop.
    pub fn from_wirefile(wirefile: &Wirefile) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for decl in &wirefile.types {
            registry.insert(declared_type(decl))?;
        }
        for steps in &wirefile.steps {
            registry.declare_steps(RequirementDeclaration::new(
                steps.name.clone(),
                steps.requires.iter().cloned(),
            ));
        }
        registry.check_acyclic()?;
        Ok(registry)
    }

    /// Add a declared type.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateType`] if the type is already
    /// present.
    pub fn insert(&mut self, declared: DeclaredType) -> Result<(), RegistryError> {
        if self.types.contains_key(&declared.type_ref) {
            return Err(RegistryError::DuplicateType {
                type_ref: declared.type_ref,
            });
        }
        self.types.insert(declared.type_ref.clone(), declared);
        Ok(())
    }

    /// Add a Steps constructor signature.
    pub fn declare_steps(&mut self, declaration: RequirementDeclaration) {
        self.declarations.push(declaration);
    }

    /// Fail if declared supertypes form a cycle.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InheritanceCycle`] naming one cycle.
    pub fn check_acyclic(&self) -> Result<(), RegistryError> {
        cycle::find_cycle(&self.types).map_or(Ok(()), |cycle| {
            Err(RegistryError::InheritanceCycle { cycle })
        })
    }

    /// Look up a declared type.
    #[must_use]
    pub fn get(&self, type_ref: &TypeRef) -> Option<&DeclaredType> {
        self.types.get(type_ref)
    }

    /// Number of declared types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether no types are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// `start` and its declared superclass chain, most derived first,
    /// followed by every declared interface reachable from that chain,
    /// breadth first. Each type appears once.
    fn hierarchy(&self, start: &TypeRef) -> Vec<&DeclaredType> {
        let mut seen: HashSet<&TypeRef> = HashSet::new();
        let mut order: Vec<&DeclaredType> = Vec::new();
        let mut next = Some(start);
        while let Some(current) = next {
            if !seen.insert(current) {
                break;
            }
            let Some(declared) = self.types.get(current) else {
                break;
            };
            order.push(declared);
            next = declared.superclass.as_ref();
        }
        let mut queue: VecDeque<&TypeRef> = order
            .iter()
            .copied()
            .flat_map(|t| t.interfaces.iter())
            .collect();
        while let Some(interface) = queue.pop_front() {
            if !seen.insert(interface) {
                continue;
            }
            let Some(declared) = self.types.get(interface) else {
                continue;
            };
            order.push(declared);
            queue.extend(declared.superclass.iter().chain(&declared.interfaces));
        }
        order
    }
}

fn declared_type(decl: &TypeDecl) -> DeclaredType {
    DeclaredType {
        type_ref: decl.name.clone(),
        kind: decl.kind,
        superclass: decl.extends.clone(),
        interfaces: decl.implements.clone(),
        members: decl.members.iter().map(|m| m.resolve(decl.kind)).collect(),
    }
}

impl TypeLookup for TypeRegistry {
    fn find_type(&self, type_ref: &TypeRef) -> Option<DeclaredType> {
        self.types.get(type_ref).cloned()
    }

    /// The most derived declaration of each member name decides whether it
    /// is abstract. Classes on the superclass chain take precedence over
    /// interfaces, so an interface member counts as implemented only when the
    /// chain, or a default method, provides a body.
    fn unimplemented_abstract_members(&self, type_ref: &TypeRef) -> Vec<String> {
        let mut decided: HashSet<&str> = HashSet::new();
        let mut unimplemented = Vec::new();
        for member in self.hierarchy(type_ref).into_iter().flat_map(|t| &t.members) {
            if decided.insert(member.name.as_str()) && member.is_abstract {
                unimplemented.push(member.name.clone());
            }
        }
        unimplemented
    }

    fn is_assignable(&self, from: &TypeRef, to: &TypeRef) -> bool {
        if from == to {
            return true;
        }
        let mut seen: HashSet<&TypeRef> = HashSet::new();
        let mut queue: VecDeque<&TypeRef> = VecDeque::from([from]);
        while let Some(next) = queue.pop_front() {
            if !seen.insert(next) {
                continue;
            }
            let Some(declared) = self.types.get(next) else {
                continue;
            };
            for supertype in declared.superclass.iter().chain(&declared.interfaces) {
                if supertype == to {
                    return true;
                }
                queue.push_back(supertype);
            }
        }
        false
    }
}

impl RequirementSource for TypeRegistry {
    fn requirement_declarations(&self) -> Vec<RequirementDeclaration> {
        self.declarations.clone()
    }
}
