//! Wirefile syntax tree.
//!
//! A `Wirefile.yml` stands in for the host compiler when stepwire runs as a
//! standalone tool: it declares the types the validator may look up and the
//! Steps constructors the structure model is built from.
//!
//! ```rust
//! use stepwire::ast::Wirefile;
//!
//! let yaml = r#"
//! wire_version: "1.0.0"
//! steps:
//!   - name: com.example.steps.LoginSteps
//!     requires: [com.example.actions.NavigationActions]
//! "#;
//! let wirefile: Wirefile = serde_saphyr::from_str(yaml).expect("parse");
//! assert_eq!(wirefile.steps.len(), 1);
//! ```

use semver::Version;
use serde::{Deserialize, Serialize};

use crate::generator::WiringLayout;
use crate::host::{Member, TypeKind};
use crate::platform::PlatformSet;
use crate::type_ref::TypeRef;

/// Top-level Wirefile structure.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Wirefile {
    /// Semantic version of the Wirefile format.
    pub wire_version: Version,

    /// Platforms to generate for. Absent means every platform; an empty list
    /// is rejected.
    #[serde(default)]
    pub platforms: Option<PlatformSet>,

    /// Overrides for generated type and annotation names.
    #[serde(default)]
    pub layout: WiringLayout,

    /// Types known to the project.
    #[serde(default)]
    pub types: Vec<TypeDecl>,

    /// Steps constructors.
    #[serde(default)]
    pub steps: Vec<StepsDecl>,
}

/// A declared type.
///
/// ```yaml
/// name: com.example.actions.PaymentActions
/// kind: abstract_class
/// extends: com.example.actions.BaseActions
/// members:
///   - name: pay
///     abstract: true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TypeDecl {
    /// Fully qualified type name.
    pub name: TypeRef,

    /// Class, abstract class or interface.
    #[serde(default)]
    pub kind: TypeKind,

    /// Direct superclass.
    #[serde(default)]
    pub extends: Option<TypeRef>,

    /// Directly implemented (or, for interfaces, extended) interfaces.
    #[serde(default)]
    pub implements: Vec<TypeRef>,

    /// Declared methods.
    #[serde(default)]
    pub members: Vec<MemberDecl>,
}

/// A declared method.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MemberDecl {
    /// Method name.
    pub name: String,

    /// Explicit abstractness; interfaces default to abstract, classes do not.
    #[serde(default, rename = "abstract", skip_serializing_if = "Option::is_none")]
    pub is_abstract: Option<bool>,
}

impl MemberDecl {
    /// Resolve the member inside a type of `kind`.
    #[must_use]
    pub fn resolve(&self, kind: TypeKind) -> Member {
        let is_abstract = self
            .is_abstract
            .unwrap_or(matches!(kind, TypeKind::Interface));
        Member {
            name: self.name.clone(),
            is_abstract,
        }
    }
}

/// A Steps constructor signature.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StepsDecl {
    /// Fully qualified Steps type name.
    pub name: TypeRef,

    /// Constructor parameter types, in order.
    #[serde(default)]
    pub requires: Vec<TypeRef>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::Platform;
    use rstest::rstest;

    fn parse(yaml: &str) -> Result<Wirefile, serde_saphyr::Error> {
        serde_saphyr::from_str(yaml)
    }

    #[test]
    fn minimal_wirefile_uses_defaults() {
        let wirefile = parse("wire_version: \"1.0.0\"\n").expect("parse");
        assert!(wirefile.platforms.is_none());
        assert_eq!(wirefile.layout, WiringLayout::default());
        assert!(wirefile.types.is_empty());
        assert!(wirefile.steps.is_empty());
    }

    #[test]
    fn full_wirefile_parses() {
        let yaml = r#"
wire_version: "1.2.0"
platforms: [droid]
layout:
  component: wiring.AppComponent
types:
  - name: a.PaymentActions
    kind: interface
    members:
      - name: pay
  - name: a.DroidPaymentActions
    implements: [a.PaymentActions]
steps:
  - name: s.CheckoutSteps
    requires: [a.PaymentActions]
"#;
        let wirefile = parse(yaml).expect("parse");
        assert_eq!(
            wirefile.platforms,
            Some(PlatformSet::new([Platform::Droid]))
        );
        assert_eq!(wirefile.layout.component, TypeRef::new("wiring", "AppComponent"));
        assert_eq!(wirefile.layout.provider, WiringLayout::default().provider);
        let payment = wirefile.types.first().expect("payment type");
        assert_eq!(payment.kind, TypeKind::Interface);
        let steps = wirefile.steps.first().expect("steps");
        assert_eq!(steps.requires, [TypeRef::new("a", "PaymentActions")]);
    }

    #[rstest]
    #[case("wire_version: \"1.0.0\"\nextra: 1\n")]
    #[case("wire_version: \"1.0.0\"\nsteps:\n  - name: NoPackage\n")]
    #[case("wire_version: \"1.0.0\"\ntypes:\n  - name: a.B\n    kind: enum\n")]
    #[case("wire_version: \"1.0.0\"\nplatforms: [windows]\n")]
    fn invalid_wirefiles_are_rejected(#[case] yaml: &str) {
        assert!(parse(yaml).is_err());
    }

    #[rstest]
    #[case(TypeKind::Interface, None, true)]
    #[case(TypeKind::Class, None, false)]
    #[case(TypeKind::AbstractClass, Some(true), true)]
    #[case(TypeKind::Interface, Some(false), false)]
    fn member_abstractness_defaults_by_kind(
        #[case] kind: TypeKind,
        #[case] declared: Option<bool>,
        #[case] expected: bool,
    ) {
        let member = MemberDecl {
            name: "pay".into(),
            is_abstract: declared,
        };
        assert_eq!(member.resolve(kind).is_abstract, expected);
    }
}
