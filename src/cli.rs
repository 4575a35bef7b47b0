//! Command line interface definition using clap.
//!
//! This module defines the [`Cli`] structure and its subcommands. It is also
//! compiled by `build.rs` to render the manual page, so it depends on clap
//! and the standard library only.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Default directory for generated sources, relative to the working
/// directory.
pub const DEFAULT_OUT_DIR: &str = "build/generated/stepwire";

/// Generates DI wiring between Steps and per-platform Actions.
#[derive(Debug, Parser)]
#[command(name = "stepwire", author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the Wirefile describing types and Steps constructors.
    #[arg(short, long, value_name = "FILE", default_value = "Wirefile.yml")]
    pub file: PathBuf,

    /// Resolve relative paths against this directory.
    #[arg(short = 'C', long, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Enable verbose logging output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Restrict the round to these platforms; overrides the Wirefile.
    #[arg(long, value_enum, value_name = "PLATFORM")]
    pub platform: Vec<PlatformArg>,

    /// Optional subcommand to execute; defaults to `generate` when omitted.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Parse command-line arguments, providing `generate` as the default
    /// command.
    #[must_use]
    pub fn parse_with_default() -> Self {
        Self::parse().with_default_command()
    }

    /// Apply the default command if none was specified.
    #[must_use]
    pub fn with_default_command(mut self) -> Self {
        if self.command.is_none() {
            self.command = Some(Commands::Generate(GenerateArgs::default()));
        }
        self
    }
}

/// Platform names accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlatformArg {
    /// iPhone and iPad devices.
    Ios,
    /// Android devices.
    Droid,
}

/// Arguments accepted by the `generate` command.
#[derive(Debug, Args, PartialEq, Eq, Clone)]
pub struct GenerateArgs {
    /// Directory the generated Java sources are written below.
    #[arg(long, value_name = "DIR", default_value = DEFAULT_OUT_DIR)]
    pub out_dir: PathBuf,
}

impl Default for GenerateArgs {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
        }
    }
}

/// Available top-level commands.
#[derive(Debug, Subcommand, PartialEq, Eq, Clone)]
pub enum Commands {
    /// Validate platform coverage and write wiring sources `default`.
    Generate(GenerateArgs),

    /// Validate platform coverage without writing anything.
    Check,

    /// Print the Steps to Actions relation in DOT format.
    Graph,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn generate_is_the_default_command() {
        let cli = Cli::try_parse_from(["stepwire"])
            .expect("parse")
            .with_default_command();
        assert_eq!(cli.command, Some(Commands::Generate(GenerateArgs::default())));
        assert_eq!(cli.file, PathBuf::from("Wirefile.yml"));
    }

    #[rstest]
    #[case(&["stepwire", "--platform", "ios", "check"], &[PlatformArg::Ios])]
    #[case(
        &["stepwire", "--platform", "droid", "--platform", "ios", "graph"],
        &[PlatformArg::Droid, PlatformArg::Ios]
    )]
    #[case(&["stepwire", "check"], &[])]
    fn platforms_are_repeatable(#[case] args: &[&str], #[case] expected: &[PlatformArg]) {
        let cli = Cli::try_parse_from(args).expect("parse");
        assert_eq!(cli.platform, expected);
    }

    #[test]
    fn generate_accepts_an_output_directory() {
        let cli = Cli::try_parse_from(["stepwire", "-C", "app", "generate", "--out-dir", "gen"])
            .expect("parse");
        assert_eq!(cli.directory, Some(PathBuf::from("app")));
        assert_eq!(
            cli.command,
            Some(Commands::Generate(GenerateArgs {
                out_dir: PathBuf::from("gen"),
            }))
        );
    }

    #[test]
    fn unknown_platform_is_rejected() {
        assert!(Cli::try_parse_from(["stepwire", "--platform", "windows"]).is_err());
    }
}
