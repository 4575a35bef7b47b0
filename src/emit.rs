//! Artifact emission.
//!
//! The generator hands every [`Artifact`] to an [`ArtifactSink`]. Two sinks
//! are provided:
//!
//! - [`MemorySink`] keeps artifacts in memory, for dry runs and embedding
//!   hosts that render them elsewhere;
//! - [`SourceTreeSink`] renders Java sources with [`crate::java_gen`] and
//!   writes them below an output root through a capability-scoped directory
//!   handle.
//!
//! [`SourceTreeSink`] records the digest of every file it owns in
//! `.stepwire-sources` below the root. The next round uses the record to skip
//! unchanged files and, in [`SourceTreeSink::finish`], to delete files it
//! generated before but not this time, such as a stub whose real
//! implementation has since been declared.

use std::io::{self, Write};

use camino::{Utf8Path, Utf8PathBuf};
use indexmap::{IndexMap, IndexSet};
use cap_std::{ambient_authority, fs as cap_fs};
use miette::Diagnostic;
use thiserror::Error;
use tracing::{debug, info};

use crate::artifact::Artifact;
use crate::hasher::ContentHasher;
use crate::java_gen;
use crate::type_ref::TypeRef;

/// Writing one artifact failed. Emission of the other artifacts continues.
#[derive(Debug, Error, Diagnostic)]
#[error("failed to create source file [{artifact}]: {source}")]
#[diagnostic(code(stepwire::emit::write_failed))]
pub struct ArtifactWriteError {
    /// Identity of the artifact that could not be written.
    pub artifact: TypeRef,
    /// Underlying I/O failure.
    #[source]
    pub source: io::Error,
}

/// Destination for generated artifacts.
pub trait ArtifactSink {
    /// Persist `artifact`.
    ///
    /// # Errors
    ///
    /// Returns the I/O error that prevented the artifact from being written.
    fn write(&mut self, artifact: &Artifact) -> io::Result<()>;
}

/// Write `artifact` to `sink`, attaching its identity to any failure.
///
/// # Errors
///
/// Returns [`ArtifactWriteError`] when the sink fails.
pub fn write_artifact(
    sink: &mut dyn ArtifactSink,
    artifact: &Artifact,
) -> Result<(), ArtifactWriteError> {
    sink.write(artifact).map_err(|source| ArtifactWriteError {
        artifact: artifact.type_ref(),
        source,
    })
}

/// Keeps emitted artifacts in memory.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    artifacts: Vec<Artifact>,
}

impl MemorySink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Artifacts in emission order.
    #[must_use]
    pub fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }

    /// Find an emitted artifact by identity.
    #[must_use]
    pub fn get(&self, type_ref: &TypeRef) -> Option<&Artifact> {
        self.artifacts.iter().find(|a| &a.type_ref() == type_ref)
    }

    /// Consume the sink, returning its artifacts.
    #[must_use]
    pub fn into_artifacts(self) -> Vec<Artifact> {
        self.artifacts
    }
}

impl ArtifactSink for MemorySink {
    fn write(&mut self, artifact: &Artifact) -> io::Result<()> {
        self.artifacts.push(artifact.clone());
        Ok(())
    }
}

/// File below the output root listing the sources the sink owns.
pub const SOURCE_RECORD: &str = ".stepwire-sources";

/// Renders Java sources below an output directory.
pub struct SourceTreeSink {
    root: Utf8PathBuf,
    dir: cap_fs::Dir,
    previous: Vec<Utf8PathBuf>,
    digests: IndexMap<Utf8PathBuf, String>,
    attempted: IndexSet<Utf8PathBuf>,
    written: Vec<Utf8PathBuf>,
    unchanged: Vec<Utf8PathBuf>,
    removed: Vec<Utf8PathBuf>,
}

impl SourceTreeSink {
    /// Open (creating if needed) the output root and load the record of the
    /// previous round.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the directory cannot be created or opened, or
    /// an existing record cannot be read.
    pub fn open(root: &Utf8Path) -> io::Result<Self> {
        cap_fs::Dir::create_ambient_dir_all(root, ambient_authority())?;
        let dir = cap_fs::Dir::open_ambient_dir(root, ambient_authority())?;
        let digests = match dir.read_to_string(SOURCE_RECORD) {
            Ok(record) => parse_record(&record),
            Err(e) if e.kind() == io::ErrorKind::NotFound => IndexMap::new(),
            Err(e) => return Err(e),
        };
        Ok(Self {
            root: root.to_owned(),
            dir,
            previous: digests.keys().cloned().collect(),
            digests,
            attempted: IndexSet::new(),
            written: Vec::new(),
            unchanged: Vec::new(),
            removed: Vec::new(),
        })
    }

    /// Output root.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Files written by this sink, relative to the root.
    #[must_use]
    pub fn written(&self) -> &[Utf8PathBuf] {
        &self.written
    }

    /// Files whose content was already up to date, relative to the root.
    #[must_use]
    pub fn unchanged(&self) -> &[Utf8PathBuf] {
        &self.unchanged
    }

    /// Files from the previous round deleted by [`Self::finish`].
    #[must_use]
    pub fn removed(&self) -> &[Utf8PathBuf] {
        &self.removed
    }

    /// Delete sources recorded by the previous round that this round did not
    /// emit, then record this round's sources.
    ///
    /// Call once after a round that ran to completion. Files the sink never
    /// recorded are left alone.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if a stale file cannot be deleted or the record
    /// cannot be written.
    pub fn finish(&mut self) -> io::Result<()> {
        let stale: Vec<Utf8PathBuf> = self
            .previous
            .iter()
            .filter(|path| !self.attempted.contains(*path))
            .cloned()
            .collect();
        for path in stale {
            match self.dir.remove_file(path.as_str()) {
                Ok(()) => info!(path = %self.root.join(&path), "removed stale source"),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e),
            }
            self.digests.shift_remove(&path);
            self.removed.push(path);
        }
        self.previous = self.digests.keys().cloned().collect();
        let record: String = self
            .digests
            .iter()
            .map(|(path, digest)| format!("{digest} {path}\n"))
            .collect();
        self.write_file(Utf8Path::new(SOURCE_RECORD), &record)
    }

    fn is_up_to_date(&self, path: &Utf8Path, digest: &str) -> bool {
        self.digests.get(path).is_some_and(|recorded| recorded == digest)
            && self.dir.is_file(path.as_str())
    }

    fn write_file(&self, path: &Utf8Path, content: &str) -> io::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
            self.dir.create_dir_all(parent.as_str())?;
        }
        let mut file = self.dir.create(path.as_str())?;
        file.write_all(content.as_bytes())?;
        file.flush()?;
        file.sync_all()
    }
}

/// Parse `<digest> <path>` lines, skipping anything malformed.
fn parse_record(record: &str) -> IndexMap<Utf8PathBuf, String> {
    record
        .lines()
        .filter_map(|line| line.split_once(' '))
        .filter(|(digest, path)| !digest.is_empty() && !path.is_empty())
        .map(|(digest, path)| (Utf8PathBuf::from(path), digest.to_owned()))
        .collect()
}

impl ArtifactSink for SourceTreeSink {
    fn write(&mut self, artifact: &Artifact) -> io::Result<()> {
        let path = Utf8PathBuf::from(java_gen::relative_path(artifact));
        let content = java_gen::render(artifact);
        let digest = ContentHasher::digest(&content);
        self.attempted.insert(path.clone());
        if self.is_up_to_date(&path, &digest) {
            debug!(path = %path, "generated source unchanged");
            self.unchanged.push(path);
            return Ok(());
        }
        if let Err(e) = self.write_file(&path, &content) {
            self.digests.shift_remove(&path);
            return Err(e);
        }
        info!(
            path = %self.root.join(&path),
            digest = %digest,
            "wrote {artifact}"
        );
        self.digests.insert(path.clone(), digest);
        self.written.push(path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::{ArtifactKind, ArtifactRole};
    use crate::platform::Platform;
    use anyhow::{Context, Result, ensure};

    fn stub() -> Artifact {
        let mut stub = Artifact::new(
            ArtifactRole::Stub(Platform::Ios),
            &TypeRef::new("com.example.actions", "IOSNavigationActions"),
            ArtifactKind::Class,
        );
        stub.superclass = Some(TypeRef::new("com.example.actions", "NavigationActions"));
        stub
    }

    fn utf8_root(temp: &tempfile::TempDir) -> Result<Utf8PathBuf> {
        Utf8PathBuf::from_path_buf(temp.path().join("out"))
            .map_err(|p| anyhow::anyhow!("non-UTF-8 temp path {}", p.display()))
    }

    #[test]
    fn source_tree_sink_writes_package_directories() -> Result<()> {
        let temp = tempfile::tempdir().context("create temp dir")?;
        let root = utf8_root(&temp)?;
        let mut sink = SourceTreeSink::open(&root).context("open sink")?;
        sink.write(&stub()).context("write stub")?;

        let path = root.join("com/example/actions/IOSNavigationActions.java");
        let written = std::fs::read_to_string(&path).context("read stub")?;
        ensure!(
            written.contains("public class IOSNavigationActions extends NavigationActions"),
            "unexpected stub contents: {written}"
        );
        ensure!(sink.written().len() == 1, "one file should be recorded");
        Ok(())
    }

    #[test]
    fn source_tree_sink_skips_identical_content() -> Result<()> {
        let temp = tempfile::tempdir().context("create temp dir")?;
        let root = utf8_root(&temp)?;
        let mut sink = SourceTreeSink::open(&root).context("open sink")?;
        sink.write(&stub()).context("first write")?;
        sink.write(&stub()).context("second write")?;
        ensure!(sink.written().len() == 1, "second write should be skipped");
        ensure!(sink.unchanged().len() == 1, "unchanged file should be recorded");
        Ok(())
    }

    #[test]
    fn finish_removes_sources_no_longer_emitted() -> Result<()> {
        let temp = tempfile::tempdir().context("create temp dir")?;
        let root = utf8_root(&temp)?;
        let mut first = SourceTreeSink::open(&root).context("open sink")?;
        first.write(&stub()).context("write stub")?;
        first.finish().context("finish first round")?;
        let hand_written = root.join("com/example/actions/Notes.java");
        std::fs::write(&hand_written, "class Notes {}\n").context("write unrelated file")?;

        let mut second = SourceTreeSink::open(&root).context("reopen sink")?;
        second.finish().context("finish second round")?;
        ensure!(
            !root.join("com/example/actions/IOSNavigationActions.java").exists(),
            "stale stub should be removed"
        );
        ensure!(second.removed().len() == 1, "one stale file: {:?}", second.removed());
        ensure!(hand_written.exists(), "files the sink never wrote are kept");
        Ok(())
    }

    #[test]
    fn recorded_digest_marks_sources_unchanged_across_rounds() -> Result<()> {
        let temp = tempfile::tempdir().context("create temp dir")?;
        let root = utf8_root(&temp)?;
        let mut first = SourceTreeSink::open(&root).context("open sink")?;
        first.write(&stub()).context("write stub")?;
        first.finish().context("finish first round")?;

        let mut second = SourceTreeSink::open(&root).context("reopen sink")?;
        second.write(&stub()).context("rewrite stub")?;
        ensure!(second.written().is_empty(), "unchanged stub should be skipped");
        ensure!(second.unchanged().len() == 1);
        Ok(())
    }

    #[test]
    fn memory_sink_finds_artifacts_by_identity() {
        let mut sink = MemorySink::new();
        let artifact = stub();
        write_artifact(&mut sink, &artifact).expect("memory writes succeed");
        assert_eq!(sink.get(&artifact.type_ref()), Some(&artifact));
    }
}
