//! Integration tests for CLI execution using `assert_cmd`.
//!
//! These tests invoke the compiled binary against Wirefiles copied from
//! `tests/data` and check the generated sources and exit status.

use anyhow::{Context, Result, ensure};
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;
use test_support::Project;
use test_support::wirefiles::LOGIN_UNIMPLEMENTED;

fn copy_wirefile(fixture: &str, dir: &Path) -> Result<()> {
    let wirefile = dir.join("Wirefile.yml");
    fs::copy(format!("tests/data/{fixture}"), &wirefile)
        .with_context(|| format!("copy {fixture} to {}", wirefile.display()))?;
    Ok(())
}

fn stepwire() -> Result<Command> {
    Command::cargo_bin("stepwire").context("locate stepwire binary")
}

#[test]
fn generate_writes_wiring_below_default_out_dir() -> Result<()> {
    let temp = tempdir().context("create temp dir for generate test")?;
    copy_wirefile("checkout.yml", temp.path())?;
    stepwire()?
        .current_dir(temp.path())
        .arg("generate")
        .assert()
        .success();

    let generated = temp.path().join("build/generated/stepwire");
    for relative in [
        "actions/definitions/ActionsDefinition.java",
        "actions/definitions/IOSActionsDefinition.java",
        "actions/definitions/DroidActionsDefinition.java",
        "dagger/ActionsModule.java",
        "dagger/StepsModule.java",
        "dagger/StepsComponent.java",
    ] {
        ensure!(
            generated.join(relative).exists(),
            "generate should write {relative}"
        );
    }
    let steps_module = fs::read_to_string(generated.join("dagger/StepsModule.java"))
        .context("read StepsModule")?;
    ensure!(
        steps_module.contains("return new CheckoutSteps(paymentActions, navigationActions);"),
        "unexpected StepsModule: {steps_module}"
    );
    Ok(())
}

#[test]
fn bare_invocation_generates_and_writes_stubs() -> Result<()> {
    let project = Project::with_wirefile(LOGIN_UNIMPLEMENTED)?;
    stepwire()?.current_dir(project.root()).assert().success();

    let source = project.read_generated(
        "build/generated/stepwire",
        "com/example/actions/DroidNavigationActions.java",
    )?;
    ensure!(
        source.contains("public class DroidNavigationActions extends NavigationActions"),
        "unexpected stub: {source}"
    );
    Ok(())
}

#[test]
fn generate_respects_directory_and_out_dir() -> Result<()> {
    let temp = tempdir().context("create temp dir for -C test")?;
    let workdir = temp.path().join("app");
    fs::create_dir_all(&workdir).context("create app directory")?;
    copy_wirefile("checkout.yml", &workdir)?;
    stepwire()?
        .current_dir(temp.path())
        .args(["-C", "app", "generate", "--out-dir", "gen"])
        .assert()
        .success();
    ensure!(
        workdir.join("gen/dagger/StepsComponent.java").exists(),
        "--out-dir should resolve relative to -C"
    );
    Ok(())
}

#[test]
fn platform_flag_limits_generated_providers() -> Result<()> {
    let temp = tempdir().context("create temp dir for platform test")?;
    copy_wirefile("checkout.yml", temp.path())?;
    stepwire()?
        .current_dir(temp.path())
        .args(["--platform", "ios", "generate"])
        .assert()
        .success();
    let definitions = temp.path().join("build/generated/stepwire/actions/definitions");
    ensure!(definitions.join("IOSActionsDefinition.java").exists());
    ensure!(
        !definitions.join("DroidActionsDefinition.java").exists(),
        "unselected platforms get no provider"
    );
    Ok(())
}

#[test]
fn check_fails_on_unimplemented_abstract_member() -> Result<()> {
    let temp = tempdir().context("create temp dir for check test")?;
    copy_wirefile("payment_abstract.yml", temp.path())?;
    stepwire()?
        .current_dir(temp.path())
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("DroidPaymentActions"))
        .stderr(predicate::str::contains("generation failed"));
    ensure!(
        !temp.path().join("build").exists(),
        "check must not write sources"
    );
    Ok(())
}

#[test]
fn check_passes_when_every_platform_is_implemented() -> Result<()> {
    let temp = tempdir().context("create temp dir for passing check")?;
    copy_wirefile("checkout.yml", temp.path())?;
    stepwire()?
        .current_dir(temp.path())
        .arg("check")
        .assert()
        .success();
    Ok(())
}

#[test]
fn graph_prints_dot_to_stdout() -> Result<()> {
    let temp = tempdir().context("create temp dir for graph test")?;
    copy_wirefile("checkout.yml", temp.path())?;
    stepwire()?
        .current_dir(temp.path())
        .arg("graph")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("digraph"))
        .stdout(predicate::str::contains(
            "\"com.example.steps.CheckoutSteps\" -> \"com.example.actions.PaymentActions\";",
        ));
    Ok(())
}

#[test]
fn missing_wirefile_is_reported() -> Result<()> {
    let temp = tempdir().context("create temp dir for missing Wirefile")?;
    stepwire()?
        .current_dir(temp.path())
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found in the current directory"));
    Ok(())
}

#[test]
fn unsupported_version_is_rejected() -> Result<()> {
    let temp = tempdir().context("create temp dir for version test")?;
    copy_wirefile("unsupported_version.yml", temp.path())?;
    stepwire()?
        .current_dir(temp.path())
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported wire_version 2.0.0"));
    Ok(())
}

#[test]
fn empty_platform_list_is_rejected() -> Result<()> {
    let temp = tempdir().context("create temp dir for empty platform test")?;
    copy_wirefile("empty_platforms.yml", temp.path())?;
    stepwire()?
        .current_dir(temp.path())
        .arg("generate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("platform selection is empty"));
    ensure!(
        !temp.path().join("build").exists(),
        "a rejected Wirefile must not produce sources"
    );
    Ok(())
}
