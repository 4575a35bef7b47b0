//! Test utilities for stepwire integration tests.
//!
//! Provides artifact sinks with failure injection, Wirefile fixtures for the
//! end-to-end scenarios and helpers for temporary project directories.

pub mod sinks;
pub mod wirefiles;

pub use sinks::FailingSink;

use anyhow::{Context, Result, anyhow};
use camino::Utf8PathBuf;
use std::fs;
use tempfile::TempDir;

/// A temporary project directory holding a `Wirefile.yml`.
pub struct Project {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Project {
    /// Create a directory containing `Wirefile.yml` with `wirefile` as its
    /// content.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be created, or the
    /// temporary path is not valid UTF-8.
    pub fn with_wirefile(wirefile: &str) -> Result<Self> {
        let dir = TempDir::new().context("create temp dir")?;
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
            .map_err(|p| anyhow!("non-UTF-8 temp path {}", p.display()))?;
        fs::write(root.join("Wirefile.yml"), wirefile).context("write Wirefile")?;
        Ok(Self { _dir: dir, root })
    }

    /// Project root.
    #[must_use]
    pub fn root(&self) -> &camino::Utf8Path {
        &self.root
    }

    /// Read a generated source relative to `out_dir` below the root.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn read_generated(&self, out_dir: &str, relative: &str) -> Result<String> {
        let path = self.root.join(out_dir).join(relative);
        fs::read_to_string(&path).with_context(|| format!("read {path}"))
    }
}
