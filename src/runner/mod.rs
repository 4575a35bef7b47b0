//! CLI execution and command dispatch logic.
//!
//! This module keeps `main` minimal by providing a single entry point that
//! loads the Wirefile, runs a round and reports the outcome.

mod error;
mod path_helpers;

pub use error::RunnerError;

use crate::cli::{Cli, Commands, GenerateArgs, PlatformArg};
use crate::diagnostics::TracingDiagnostics;
use crate::emit::{ArtifactSink, MemorySink, SourceTreeSink};
use crate::host::RequirementSource;
use crate::manifest;
use crate::pipeline::{RoundConfig, RoundOutcome, run_round};
use crate::platform::Platform;
use crate::registry::TypeRegistry;
use crate::structure::StructureModel;
use anyhow::{Context, Result};
use std::io::{self, Write};
use tracing::{debug, info};

use path_helpers::{ensure_wirefile_exists_or_error, resolve_cli_path, resolve_wirefile_path};

impl From<PlatformArg> for Platform {
    fn from(arg: PlatformArg) -> Self {
        match arg {
            PlatformArg::Ios => Self::Ios,
            PlatformArg::Droid => Self::Droid,
        }
    }
}

/// A loaded Wirefile ready for a round.
struct Project {
    registry: TypeRegistry,
    config: RoundConfig,
}

/// Execute the parsed [`Cli`] command.
///
/// # Errors
///
/// Returns an error if the Wirefile cannot be loaded, the round aborts or
/// the round reports errors.
pub fn run(cli: &Cli) -> Result<()> {
    let command = cli
        .command
        .clone()
        .unwrap_or_else(|| Commands::Generate(GenerateArgs::default()));
    match command {
        Commands::Generate(args) => handle_generate(cli, &args),
        Commands::Check => handle_check(cli),
        Commands::Graph => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            handle_graph(cli, &mut out)
        }
    }
}

fn load_project(cli: &Cli) -> Result<Project> {
    let path = resolve_wirefile_path(cli)?;
    ensure_wirefile_exists_or_error(cli, &path)?;
    let wirefile =
        manifest::from_path(&path).with_context(|| format!("loading Wirefile at {path}"))?;
    let registry = TypeRegistry::from_wirefile(&wirefile)
        .with_context(|| format!("reading types from {path}"))?;
    let platforms = if cli.platform.is_empty() {
        wirefile.platforms.clone().unwrap_or_default()
    } else {
        cli.platform.iter().copied().map(Platform::from).collect()
    };
    debug!(?platforms, "platform selection");
    Ok(Project {
        registry,
        config: RoundConfig {
            platforms,
            layout: wirefile.layout,
        },
    })
}

fn run_project(project: &Project, sink: &mut dyn ArtifactSink) -> Result<RoundOutcome> {
    let mut diagnostics = TracingDiagnostics::new();
    run_round(
        &project.registry,
        &project.registry,
        sink,
        &mut diagnostics,
        &project.config,
    )
    .context("generation round aborted")
}

fn ensure_success(outcome: &RoundOutcome) -> Result<()> {
    if outcome.is_success() {
        Ok(())
    } else {
        Err(RunnerError::RoundFailed {
            errors: outcome.error_count(),
            warnings: outcome.warning_count(),
        }
        .into())
    }
}

fn handle_generate(cli: &Cli, args: &GenerateArgs) -> Result<()> {
    let project = load_project(cli)?;
    let out_dir = resolve_cli_path(cli, &args.out_dir, "output directory")?;
    let mut sink = SourceTreeSink::open(&out_dir)
        .with_context(|| format!("opening output directory {out_dir}"))?;
    let outcome = run_project(&project, &mut sink)?;
    sink.finish()
        .with_context(|| format!("recording generated sources in {out_dir}"))?;
    info!(
        out_dir = %out_dir,
        written = sink.written().len(),
        unchanged = sink.unchanged().len(),
        removed = sink.removed().len(),
        stubs = outcome.stubs.len(),
        "generated wiring sources"
    );
    ensure_success(&outcome)
}

fn handle_check(cli: &Cli) -> Result<()> {
    let project = load_project(cli)?;
    let mut sink = MemorySink::new();
    let outcome = run_project(&project, &mut sink)?;
    ensure_success(&outcome)?;
    info!(
        steps = outcome.steps_count,
        warnings = outcome.warning_count(),
        "platform coverage is complete"
    );
    Ok(())
}

/// Write the Steps to Actions relation as DOT to `out`.
fn handle_graph(cli: &Cli, out: &mut dyn Write) -> Result<()> {
    let project = load_project(cli)?;
    let declarations = project.registry.requirement_declarations();
    let model = StructureModel::from_declarations(&declarations);
    out.write_all(model.to_dot().as_bytes())
        .context("writing graph to stdout")?;
    out.flush().context("flushing stdout")
}
