//! Path resolution helpers for the runner module.
//!
//! `-C/--directory` behaves like a working directory change for every path
//! given on the command line: relative paths are joined onto it.

use crate::cli::Cli;
use anyhow::{Result, anyhow};
use camino::{Utf8Path, Utf8PathBuf};
use std::path::Path;

use super::RunnerError;

fn utf8(path: &Path, what: &str) -> Result<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(path.to_path_buf())
        .map_err(|p| anyhow!("{what} path is not valid UTF-8: {}", p.display()))
}

/// Resolve `path` against the CLI directory when it is relative.
///
/// # Errors
///
/// Returns an error when either path is not valid UTF-8.
pub(super) fn resolve_cli_path(cli: &Cli, path: &Path, what: &str) -> Result<Utf8PathBuf> {
    let path = utf8(path, what)?;
    match &cli.directory {
        Some(dir) if path.is_relative() => Ok(utf8(dir, "directory")?.join(path)),
        _ => Ok(path),
    }
}

/// Determine the Wirefile path respecting the CLI's directory option.
///
/// # Errors
///
/// Returns an error when the path is not valid UTF-8 or has no file name.
pub(super) fn resolve_wirefile_path(cli: &Cli) -> Result<Utf8PathBuf> {
    let resolved = resolve_cli_path(cli, &cli.file, "Wirefile")?;
    if resolved.file_name().is_none() {
        return Err(anyhow!("Wirefile path '{resolved}' has no file name"));
    }
    Ok(resolved)
}

pub(super) fn ensure_wirefile_exists_or_error(cli: &Cli, path: &Utf8Path) -> Result<()> {
    if path.as_std_path().exists() {
        return Ok(());
    }
    let name = path
        .file_name()
        .map_or_else(|| path.to_string(), str::to_owned);
    let directory = if cli.directory.is_some() {
        let parent = path.parent().map_or_else(|| path.as_str(), Utf8Path::as_str);
        format!("directory '{parent}'")
    } else {
        "the current directory".to_owned()
    };
    Err(RunnerError::WirefileNotFound {
        name,
        directory,
        path: path.to_owned(),
    }
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).expect("parse")
    }

    #[test]
    fn directory_prefixes_relative_paths() {
        let cli = cli(&["stepwire", "-C", "app"]);
        let path = resolve_wirefile_path(&cli).expect("resolve");
        assert_eq!(path, Utf8PathBuf::from("app/Wirefile.yml"));
    }

    #[test]
    fn absolute_paths_ignore_directory() {
        let cli = cli(&["stepwire", "-C", "app", "--file", "/tmp/Wirefile.yml"]);
        let path = resolve_wirefile_path(&cli).expect("resolve");
        assert_eq!(path, Utf8PathBuf::from("/tmp/Wirefile.yml"));
    }

    #[test]
    fn missing_wirefile_names_the_directory() {
        let cli = cli(&["stepwire", "-C", "does-not-exist"]);
        let path = resolve_wirefile_path(&cli).expect("resolve");
        let err = ensure_wirefile_exists_or_error(&cli, &path).expect_err("missing");
        let message = err.to_string();
        assert!(
            message.contains("not found in directory 'does-not-exist'"),
            "{message}"
        );
    }
}
