//! Wirefile fixtures for the end-to-end scenarios.

use anyhow::{Context, Result};
use stepwire::registry::TypeRegistry;

/// One Steps type requiring one Actions type with no platform
/// implementations and no abstract members.
pub const LOGIN_UNIMPLEMENTED: &str = r#"
wire_version: "1.0.0"
types:
  - name: com.example.actions.NavigationActions
steps:
  - name: com.example.steps.LoginSteps
    requires:
      - com.example.actions.NavigationActions
"#;

/// [`LOGIN_UNIMPLEMENTED`] after both platform implementations were added.
pub const LOGIN_IMPLEMENTED: &str = r#"
wire_version: "1.0.0"
types:
  - name: com.example.actions.NavigationActions
  - name: com.example.actions.IOSNavigationActions
    extends: com.example.actions.NavigationActions
  - name: com.example.actions.DroidNavigationActions
    extends: com.example.actions.NavigationActions
steps:
  - name: com.example.steps.LoginSteps
    requires:
      - com.example.actions.NavigationActions
"#;

/// One Steps type requiring two Actions types, both implemented on both
/// platforms.
pub const CHECKOUT_IMPLEMENTED: &str = r#"
wire_version: "1.0.0"
types:
  - name: com.example.actions.PaymentActions
  - name: com.example.actions.IOSPaymentActions
    extends: com.example.actions.PaymentActions
  - name: com.example.actions.DroidPaymentActions
    extends: com.example.actions.PaymentActions
  - name: com.example.actions.NavigationActions
  - name: com.example.actions.IOSNavigationActions
    extends: com.example.actions.NavigationActions
  - name: com.example.actions.DroidNavigationActions
    extends: com.example.actions.NavigationActions
steps:
  - name: com.example.steps.CheckoutSteps
    requires:
      - com.example.actions.PaymentActions
      - com.example.actions.NavigationActions
"#;

/// `PaymentActions` declares an abstract `pay` that only the iOS platform
/// implements.
pub const PAYMENT_ABSTRACT: &str = r#"
wire_version: "1.0.0"
types:
  - name: com.example.actions.PaymentActions
    kind: abstract_class
    members:
      - name: pay
        abstract: true
  - name: com.example.actions.IOSPaymentActions
    extends: com.example.actions.PaymentActions
    members:
      - name: pay
steps:
  - name: com.example.steps.CheckoutSteps
    requires:
      - com.example.actions.PaymentActions
"#;

/// `PaymentActions` redeclares the inherited concrete `pay` as abstract and
/// has no platform implementations.
pub const PAYMENT_REABSTRACTED: &str = r#"
wire_version: "1.0.0"
types:
  - name: com.example.actions.BaseActions
    members:
      - name: pay
  - name: com.example.actions.PaymentActions
    kind: abstract_class
    extends: com.example.actions.BaseActions
    members:
      - name: pay
        abstract: true
steps:
  - name: com.example.steps.CheckoutSteps
    requires:
      - com.example.actions.PaymentActions
"#;

/// A platform implementation extending the wrong base type.
pub const WRONG_SUPERTYPE: &str = r#"
wire_version: "1.0.0"
types:
  - name: com.example.actions.NavigationActions
  - name: com.example.actions.LegacyActions
  - name: com.example.actions.IOSNavigationActions
    extends: com.example.actions.LegacyActions
  - name: com.example.actions.DroidNavigationActions
    extends: com.example.actions.NavigationActions
steps:
  - name: com.example.steps.LoginSteps
    requires:
      - com.example.actions.NavigationActions
"#;

/// A Steps type requiring the same Actions type twice.
pub const REPEATED_REQUIREMENT: &str = r#"
wire_version: "1.0.0"
steps:
  - name: com.example.steps.DualSteps
    requires:
      - com.example.actions.NavigationActions
      - com.example.actions.NavigationActions
"#;

/// Parse `yaml` and build a registry from it.
///
/// # Errors
///
/// Returns an error if the Wirefile is invalid.
pub fn registry(yaml: &str) -> Result<TypeRegistry> {
    let wirefile = stepwire::manifest::from_str(yaml).context("parse Wirefile fixture")?;
    TypeRegistry::from_wirefile(&wirefile).context("build registry")
}
