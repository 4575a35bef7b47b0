//! Snapshot tests for rendered Java wiring sources.

use anyhow::{Context, Result};
use insta::assert_snapshot;
use stepwire::artifact::Artifact;
use stepwire::generator::{Generator, WiringLayout};
use stepwire::host::RequirementSource;
use stepwire::java_gen;
use stepwire::platform::PlatformSet;
use stepwire::structure::StructureModel;
use test_support::wirefiles::{CHECKOUT_IMPLEMENTED, LOGIN_UNIMPLEMENTED, registry};

fn planned(wirefile: &str) -> Result<Vec<Artifact>> {
    let registry = registry(wirefile)?;
    let model = StructureModel::from_declarations(&registry.requirement_declarations());
    Ok(Generator::new(PlatformSet::all(), WiringLayout::default()).plan(&model)?)
}

fn render_from(wirefile: &str, name: &str) -> Result<String> {
    let artifacts = planned(wirefile)?;
    let artifact = artifacts
        .iter()
        .find(|a| a.name == name)
        .with_context(|| format!("artifact {name}"))?;
    Ok(java_gen::render(artifact))
}

fn render(name: &str) -> Result<String> {
    render_from(CHECKOUT_IMPLEMENTED, name)
}

#[test]
fn steps_module_source() -> Result<()> {
    assert_snapshot!(render("StepsModule")?, @r###"
    package dagger;

    import com.example.actions.NavigationActions;
    import com.example.actions.PaymentActions;
    import com.example.steps.CheckoutSteps;

    @Module
    public class StepsModule {
      @Provides
      public CheckoutSteps checkoutSteps(PaymentActions paymentActions, NavigationActions navigationActions) {
        return new CheckoutSteps(paymentActions, navigationActions);
      }
    }
    "###);
    Ok(())
}

#[test]
fn actions_module_source() -> Result<()> {
    assert_snapshot!(render("ActionsModule")?, @r###"
    package dagger;

    import actions.definitions.ActionsDefinition;
    import com.example.actions.NavigationActions;
    import com.example.actions.PaymentActions;

    @Module
    public class ActionsModule implements ActionsDefinition {
      private final ActionsDefinition actionsDefinition;

      public ActionsModule(ActionsDefinition actionsDefinition) {
        this.actionsDefinition = actionsDefinition;
      }

      @Override
      @Provides
      public NavigationActions navigationActions() {
        return actionsDefinition.navigationActions();
      }

      @Override
      @Provides
      public PaymentActions paymentActions() {
        return actionsDefinition.paymentActions();
      }
    }
    "###);
    Ok(())
}

#[test]
fn platform_provider_source() -> Result<()> {
    assert_snapshot!(render("IOSActionsDefinition")?, @r###"
    package actions.definitions;

    import com.example.actions.IOSNavigationActions;
    import com.example.actions.IOSPaymentActions;
    import com.example.actions.NavigationActions;
    import com.example.actions.PaymentActions;

    public class IOSActionsDefinition implements ActionsDefinition {
      @Override
      public NavigationActions navigationActions() {
        return new IOSNavigationActions();
      }

      @Override
      public PaymentActions paymentActions() {
        return new IOSPaymentActions();
      }
    }
    "###);
    Ok(())
}

#[test]
fn component_source() -> Result<()> {
    assert_snapshot!(render("StepsComponent")?, @r###"
    package dagger;

    import com.example.steps.CheckoutSteps;

    @Component(modules = {ActionsModule.class, StepsModule.class})
    public interface StepsComponent {
      CheckoutSteps checkoutSteps();
    }
    "###);
    Ok(())
}

#[test]
fn login_steps_module_source() -> Result<()> {
    assert_snapshot!(render_from(LOGIN_UNIMPLEMENTED, "StepsModule")?, @r###"
    package dagger;

    import com.example.actions.NavigationActions;
    import com.example.steps.LoginSteps;

    @Module
    public class StepsModule {
      @Provides
      public LoginSteps loginSteps(NavigationActions navigationActions) {
        return new LoginSteps(navigationActions);
      }
    }
    "###);
    Ok(())
}

#[test]
fn login_component_source() -> Result<()> {
    assert_snapshot!(render_from(LOGIN_UNIMPLEMENTED, "StepsComponent")?, @r###"
    package dagger;

    import com.example.steps.LoginSteps;

    @Component(modules = {ActionsModule.class, StepsModule.class})
    public interface StepsComponent {
      LoginSteps loginSteps();
    }
    "###);
    Ok(())
}

#[test]
fn login_ios_provider_source() -> Result<()> {
    assert_snapshot!(render_from(LOGIN_UNIMPLEMENTED, "IOSActionsDefinition")?, @r###"
    package actions.definitions;

    import com.example.actions.IOSNavigationActions;
    import com.example.actions.NavigationActions;

    public class IOSActionsDefinition implements ActionsDefinition {
      @Override
      public NavigationActions navigationActions() {
        return new IOSNavigationActions();
      }
    }
    "###);
    Ok(())
}

#[test]
fn login_droid_provider_source() -> Result<()> {
    assert_snapshot!(render_from(LOGIN_UNIMPLEMENTED, "DroidActionsDefinition")?, @r###"
    package actions.definitions;

    import com.example.actions.DroidNavigationActions;
    import com.example.actions.NavigationActions;

    public class DroidActionsDefinition implements ActionsDefinition {
      @Override
      public NavigationActions navigationActions() {
        return new DroidNavigationActions();
      }
    }
    "###);
    Ok(())
}
