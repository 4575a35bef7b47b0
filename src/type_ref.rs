//! Canonical type identities.
//!
//! A [`TypeRef`] is the `(package, simple name)` pair derived from a
//! fully-qualified type name such as `com.example.actions.PaymentActions`.
//! Platform-specific implementations are located by prefixing the simple name
//! with a [`Platform`] tag while keeping the package, so
//! `com.example.actions.PaymentActions` becomes
//! `com.example.actions.IOSPaymentActions` on iOS.
//!
//! # Examples
//!
//! ```
//! use stepwire::platform::Platform;
//! use stepwire::type_ref::TypeRef;
//!
//! let base = TypeRef::resolve("com.example.actions.PaymentActions")?;
//! assert_eq!(base.package(), "com.example.actions");
//! assert_eq!(base.accessor_name(), "paymentActions");
//! let ios = base.with_platform_prefix(Platform::Ios);
//! assert_eq!(ios.to_string(), "com.example.actions.IOSPaymentActions");
//! # Ok::<(), stepwire::type_ref::MalformedNameError>(())
//! ```

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::platform::Platform;

/// Separator between package segments and the simple name.
pub const PACKAGE_SEPARATOR: char = '.';

/// Raised when a type name cannot be split into a package and a simple name.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("malformed type name '{name}': {reason}")]
#[diagnostic(
    code(stepwire::type_ref::malformed_name),
    help("use a fully-qualified name such as 'com.example.actions.NavigationActions'")
)]
pub struct MalformedNameError {
    /// The rejected input.
    pub name: String,
    /// Why the input was rejected.
    pub reason: &'static str,
}

/// Structural identity of a declared type.
///
/// Ordering is by package, then simple name, which the generator relies on
/// for stable output.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TypeRef {
    package: String,
    simple_name: String,
}

impl TypeRef {
    /// Build a reference from already-separated parts.
    #[must_use]
    pub fn new(package: impl Into<String>, simple_name: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            simple_name: simple_name.into(),
        }
    }

    /// Split a fully-qualified name at its final package separator.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedNameError`] when the name has no separator or when
    /// either side of the final separator is empty.
    pub fn resolve(qualified_name: &str) -> Result<Self, MalformedNameError> {
        let malformed = |reason| MalformedNameError {
            name: qualified_name.to_owned(),
            reason,
        };
        let (package, simple_name) = qualified_name
            .rsplit_once(PACKAGE_SEPARATOR)
            .ok_or_else(|| malformed("a type must belong to a package"))?;
        if package.is_empty() {
            return Err(malformed("the package is empty"));
        }
        if simple_name.is_empty() {
            return Err(malformed("the simple name is empty"));
        }
        Ok(Self::new(package, simple_name))
    }

    /// Package portion, e.g. `com.example.actions`.
    #[must_use]
    pub fn package(&self) -> &str {
        &self.package
    }

    /// Simple name, e.g. `PaymentActions`.
    #[must_use]
    pub fn simple_name(&self) -> &str {
        &self.simple_name
    }

    /// Fully-qualified name joined with [`PACKAGE_SEPARATOR`].
    #[must_use]
    pub fn qualified_name(&self) -> String {
        format!("{}{PACKAGE_SEPARATOR}{}", self.package, self.simple_name)
    }

    /// Same package, simple name prefixed with `prefix`.
    #[must_use]
    pub fn with_prefix(&self, prefix: &str) -> Self {
        Self::new(
            self.package.clone(),
            format!("{prefix}{}", self.simple_name),
        )
    }

    /// Identity of the `platform`-specific implementation of this type.
    #[must_use]
    pub fn with_platform_prefix(&self, platform: Platform) -> Self {
        self.with_prefix(platform.prefix())
    }

    /// Method and parameter name derived from the simple name.
    #[must_use]
    pub fn accessor_name(&self) -> String {
        decapitalize(&self.simple_name)
    }
}

/// Lower-case the first character of `name`, leaving the rest untouched.
///
/// ```
/// use stepwire::type_ref::decapitalize;
/// assert_eq!(decapitalize("LoginSteps"), "loginSteps");
/// assert_eq!(decapitalize("IOSActions"), "iOSActions");
/// assert_eq!(decapitalize(""), "");
/// ```
#[must_use]
pub fn decapitalize(name: &str) -> String {
    let mut chars = name.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_lowercase().chain(chars).collect()
    })
}

impl Display for TypeRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{PACKAGE_SEPARATOR}{}", self.package, self.simple_name)
    }
}

impl FromStr for TypeRef {
    type Err = MalformedNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::resolve(s)
    }
}

impl TryFrom<String> for TypeRef {
    type Error = MalformedNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::resolve(&value)
    }
}

impl From<TypeRef> for String {
    fn from(value: TypeRef) -> Self {
        value.qualified_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("com.example.LoginSteps", "com.example", "LoginSteps")]
    #[case("a.B", "a", "B")]
    #[case("com.example.Outer$Inner", "com.example", "Outer$Inner")]
    fn resolve_splits_at_last_separator(
        #[case] input: &str,
        #[case] package: &str,
        #[case] simple: &str,
    ) {
        let type_ref = TypeRef::resolve(input).expect("valid name");
        assert_eq!(type_ref.package(), package);
        assert_eq!(type_ref.simple_name(), simple);
        assert_eq!(type_ref.qualified_name(), input);
    }

    #[rstest]
    #[case("LoginSteps")]
    #[case(".LoginSteps")]
    #[case("com.example.")]
    #[case("")]
    fn resolve_rejects_names_without_package(#[case] input: &str) {
        let err = TypeRef::resolve(input).expect_err("malformed");
        assert_eq!(err.name, input);
    }

    #[test]
    fn equality_is_structural() {
        let a = TypeRef::resolve("com.example.NavigationActions").expect("valid");
        let b = TypeRef::new("com.example", "NavigationActions");
        assert_eq!(a, b);
        assert_ne!(a, TypeRef::new("com.other", "NavigationActions"));
    }

    #[rstest]
    #[case(Platform::Ios, "IOSNavigationActions")]
    #[case(Platform::Droid, "DroidNavigationActions")]
    fn platform_prefix_keeps_package(#[case] platform: Platform, #[case] expected: &str) {
        let base = TypeRef::new("com.example.actions", "NavigationActions");
        let derived = base.with_platform_prefix(platform);
        assert_eq!(derived.package(), "com.example.actions");
        assert_eq!(derived.simple_name(), expected);
    }

    #[test]
    fn deserialises_from_qualified_string() {
        let parsed: TypeRef =
            serde_saphyr::from_str("\"com.example.PaymentActions\"").expect("parse");
        assert_eq!(parsed, TypeRef::new("com.example", "PaymentActions"));
    }
}
