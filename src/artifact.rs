//! Abstract description of generated source artifacts.
//!
//! The generator produces [`Artifact`] values; an
//! [`ArtifactSink`](crate::emit::ArtifactSink) turns them into files. Nothing
//! here is tied to a concrete source syntax: statements are described by
//! intent ([`Statement::ReturnNew`], [`Statement::ReturnDelegate`],
//! [`Statement::AssignField`]) and rendered by [`crate::java_gen`].

use std::fmt::{self, Display, Formatter};

use crate::platform::Platform;
use crate::type_ref::TypeRef;

/// Whether the artifact declares an interface or a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// An interface declaration.
    Interface,
    /// A class declaration.
    Class,
}

/// Which part of the wiring an artifact provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactRole {
    /// Interface with one accessor per Actions type.
    CapabilityProvider,
    /// Provider implementation returning one platform's Actions.
    PlatformProvider(Platform),
    /// DI module delegating to an injected provider.
    ActionsModule,
    /// DI module constructing every Steps type.
    StepsModule,
    /// DI component aggregating both modules.
    Component,
    /// Empty platform implementation synthesised by the validator.
    Stub(Platform),
}

impl Display for ArtifactRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapabilityProvider => f.write_str("capability provider"),
            Self::PlatformProvider(p) => write!(f, "{p} capability provider"),
            Self::ActionsModule => f.write_str("actions module"),
            Self::StepsModule => f.write_str("steps module"),
            Self::Component => f.write_str("component"),
            Self::Stub(p) => write!(f, "{p} stub"),
        }
    }
}

/// Declaration modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Modifier {
    /// `public`
    Public,
    /// `private`
    Private,
    /// `abstract`
    Abstract,
    /// `final`
    Final,
}

impl Modifier {
    /// Source keyword.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
            Self::Abstract => "abstract",
            Self::Final => "final",
        }
    }
}

/// Value of an annotation member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotationValue {
    /// A list of class literals, e.g. `{A.class, B.class}`.
    Classes(Vec<TypeRef>),
}

/// An annotation applied to a type or method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    /// Annotation type.
    pub type_ref: TypeRef,
    /// Named members in declaration order.
    pub members: Vec<(String, AnnotationValue)>,
}

impl Annotation {
    /// A marker annotation without members.
    #[must_use]
    pub const fn marker(type_ref: TypeRef) -> Self {
        Self {
            type_ref,
            members: Vec::new(),
        }
    }

    /// Add a named member.
    #[must_use]
    pub fn with_member(mut self, name: impl Into<String>, value: AnnotationValue) -> Self {
        self.members.push((name.into(), value));
        self
    }
}

/// A field declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Field name.
    pub name: String,
    /// Field type.
    pub type_ref: TypeRef,
    /// Field modifiers.
    pub modifiers: Vec<Modifier>,
}

/// A method or constructor parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Parameter type.
    pub type_ref: TypeRef,
}

/// A statement inside a method body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// `return new Type(arguments...);`
    ReturnNew {
        /// Constructed type.
        type_ref: TypeRef,
        /// Argument expressions, passed positionally.
        arguments: Vec<String>,
    },
    /// `return receiver.method();`
    ReturnDelegate {
        /// Field holding the delegate.
        receiver: String,
        /// Method invoked on the delegate.
        method: String,
    },
    /// `this.field = parameter;`
    AssignField {
        /// Assigned field.
        field: String,
        /// Source parameter.
        parameter: String,
    },
}

/// A method or constructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    /// Method name; for constructors, the declaring type's simple name.
    pub name: String,
    /// Method modifiers.
    pub modifiers: Vec<Modifier>,
    /// Method annotations, in order.
    pub annotations: Vec<Annotation>,
    /// Parameters, in order.
    pub parameters: Vec<Parameter>,
    /// Return type; `None` for constructors.
    pub returns: Option<TypeRef>,
    /// Body statements; `None` when the method is abstract.
    pub body: Option<Vec<Statement>>,
}

impl Method {
    /// An abstract accessor returning `returns`.
    #[must_use]
    pub fn abstract_accessor(name: impl Into<String>, returns: TypeRef) -> Self {
        Self {
            name: name.into(),
            modifiers: vec![Modifier::Public, Modifier::Abstract],
            annotations: Vec::new(),
            parameters: Vec::new(),
            returns: Some(returns),
            body: None,
        }
    }

    /// A public method with a body.
    #[must_use]
    pub fn public(name: impl Into<String>, returns: TypeRef, body: Vec<Statement>) -> Self {
        Self {
            name: name.into(),
            modifiers: vec![Modifier::Public],
            annotations: Vec::new(),
            parameters: Vec::new(),
            returns: Some(returns),
            body: Some(body),
        }
    }

    /// A public constructor.
    #[must_use]
    pub fn constructor(owner: &TypeRef, parameters: Vec<Parameter>, body: Vec<Statement>) -> Self {
        Self {
            name: owner.simple_name().to_owned(),
            modifiers: vec![Modifier::Public],
            annotations: Vec::new(),
            parameters,
            returns: None,
            body: Some(body),
        }
    }

    /// Append an annotation.
    #[must_use]
    pub fn annotated(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Replace the parameter list.
    #[must_use]
    pub fn with_parameters(mut self, parameters: Vec<Parameter>) -> Self {
        self.parameters = parameters;
        self
    }

    /// Whether this is a constructor.
    #[must_use]
    pub const fn is_constructor(&self) -> bool {
        self.returns.is_none()
    }
}

/// A generated type declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// What the artifact is for.
    pub role: ArtifactRole,
    /// Package the type is declared in.
    pub package: String,
    /// Simple name of the type.
    pub name: String,
    /// Interface or class.
    pub kind: ArtifactKind,
    /// Type modifiers.
    pub modifiers: Vec<Modifier>,
    /// Type annotations, in order.
    pub annotations: Vec<Annotation>,
    /// Extended class.
    pub superclass: Option<TypeRef>,
    /// Implemented interfaces.
    pub interfaces: Vec<TypeRef>,
    /// Fields, in order.
    pub fields: Vec<Field>,
    /// Constructors and methods, in order.
    pub methods: Vec<Method>,
}

impl Artifact {
    /// Start a public declaration of `type_ref`.
    #[must_use]
    pub fn new(role: ArtifactRole, type_ref: &TypeRef, kind: ArtifactKind) -> Self {
        Self {
            role,
            package: type_ref.package().to_owned(),
            name: type_ref.simple_name().to_owned(),
            kind,
            modifiers: vec![Modifier::Public],
            annotations: Vec::new(),
            superclass: None,
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Identity of the declared type.
    #[must_use]
    pub fn type_ref(&self) -> TypeRef {
        TypeRef::new(self.package.clone(), self.name.clone())
    }

    /// Every type referenced by the declaration, excluding itself.
    ///
    /// Used by renderers to compute imports.
    #[must_use]
    pub fn referenced_types(&self) -> Vec<&TypeRef> {
        let annotations = self
            .annotations
            .iter()
            .chain(self.methods.iter().flat_map(|m| &m.annotations));
        let mut refs: Vec<&TypeRef> = Vec::new();
        for annotation in annotations {
            refs.push(&annotation.type_ref);
            for (_, AnnotationValue::Classes(classes)) in &annotation.members {
                refs.extend(classes);
            }
        }
        refs.extend(&self.superclass);
        refs.extend(&self.interfaces);
        refs.extend(self.fields.iter().map(|f| &f.type_ref));
        for method in &self.methods {
            refs.extend(method.parameters.iter().map(|p| &p.type_ref));
            refs.extend(&method.returns);
            for statement in method.body.iter().flatten() {
                if let Statement::ReturnNew { type_ref, .. } = statement {
                    refs.push(type_ref);
                }
            }
        }
        refs
    }
}

impl Display for Artifact {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}.{}]", self.role, self.package, self.name)
    }
}
