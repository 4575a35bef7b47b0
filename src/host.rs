//! Host environment collaborators.
//!
//! The generator never inspects source text. Everything it needs to know about
//! the project comes through two narrow traits:
//!
//! - [`RequirementSource`] supplies the reflected Steps constructor
//!   signatures;
//! - [`TypeLookup`] answers the three type-system questions the validator
//!   asks: does a type exist, which abstract members does it leave
//!   unimplemented, and is one type assignable to another.
//!
//! [`crate::registry::TypeRegistry`] implements both from a Wirefile.

use serde::{Deserialize, Serialize};

use crate::type_ref::TypeRef;

/// One Steps constructor as reflected by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequirementDeclaration {
    /// The Steps type that owns the constructor.
    pub steps: TypeRef,
    /// Constructor parameter types, in declaration order.
    pub parameters: Vec<TypeRef>,
}

impl RequirementDeclaration {
    /// Pair a Steps type with its constructor parameter types.
    #[must_use]
    pub fn new(steps: TypeRef, parameters: impl IntoIterator<Item = TypeRef>) -> Self {
        Self {
            steps,
            parameters: parameters.into_iter().collect(),
        }
    }
}

/// Declaration kind of a type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    /// Concrete class.
    #[default]
    Class,
    /// Class with the `abstract` modifier.
    AbstractClass,
    /// Interface; its members are abstract unless declared otherwise.
    Interface,
}

/// A member method of a declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// Method name.
    pub name: String,
    /// Whether the declaring type leaves the member without a body.
    pub is_abstract: bool,
}

impl Member {
    /// A member with a body.
    #[must_use]
    pub fn concrete(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_abstract: false,
        }
    }

    /// A member without a body.
    #[must_use]
    pub fn abstract_member(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_abstract: true,
        }
    }
}

/// Shape of a type known to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredType {
    /// Identity of the type.
    pub type_ref: TypeRef,
    /// Declaration kind.
    pub kind: TypeKind,
    /// Declared superclass, if any.
    pub superclass: Option<TypeRef>,
    /// Directly implemented (or, for interfaces, extended) interfaces.
    pub interfaces: Vec<TypeRef>,
    /// Members declared directly on this type.
    pub members: Vec<Member>,
}

impl DeclaredType {
    /// A type with no supertypes or members.
    #[must_use]
    pub const fn new(type_ref: TypeRef, kind: TypeKind) -> Self {
        Self {
            type_ref,
            kind,
            superclass: None,
            interfaces: Vec::new(),
            members: Vec::new(),
        }
    }

    /// Set the superclass.
    #[must_use]
    pub fn extending(mut self, superclass: TypeRef) -> Self {
        self.superclass = Some(superclass);
        self
    }

    /// Add an implemented interface.
    #[must_use]
    pub fn implementing(mut self, interface: TypeRef) -> Self {
        self.interfaces.push(interface);
        self
    }

    /// Add a member.
    #[must_use]
    pub fn with_member(mut self, member: Member) -> Self {
        self.members.push(member);
        self
    }

    /// The supertype reported when this type fails an assignability check:
    /// the superclass if declared, otherwise the first interface.
    #[must_use]
    pub fn declared_supertype(&self) -> Option<&TypeRef> {
        self.superclass.as_ref().or_else(|| self.interfaces.first())
    }
}

/// Type-system queries answered by the host.
#[cfg_attr(test, mockall::automock)]
pub trait TypeLookup {
    /// Return the declared shape of `type_ref`, or `None` if no such type
    /// exists.
    fn find_type(&self, type_ref: &TypeRef) -> Option<DeclaredType>;

    /// Names of abstract members, declared or inherited, that `type_ref` does
    /// not implement. Unknown types report none.
    fn unimplemented_abstract_members(&self, type_ref: &TypeRef) -> Vec<String>;

    /// Whether a value of type `from` may be used where `to` is expected,
    /// following supertypes transitively.
    fn is_assignable(&self, from: &TypeRef, to: &TypeRef) -> bool;
}

/// Reflected constructor signatures for one round.
pub trait RequirementSource {
    /// Every Steps constructor that declares required Actions.
    fn requirement_declarations(&self) -> Vec<RequirementDeclaration>;
}

impl RequirementSource for [RequirementDeclaration] {
    fn requirement_declarations(&self) -> Vec<RequirementDeclaration> {
        self.to_vec()
    }
}

impl RequirementSource for Vec<RequirementDeclaration> {
    fn requirement_declarations(&self) -> Vec<RequirementDeclaration> {
        self.clone()
    }
}
