//! Artifact sinks for exercising emission failures.

use std::collections::HashSet;
use std::io;

use stepwire::artifact::Artifact;
use stepwire::emit::{ArtifactSink, MemorySink};

/// Records artifacts in memory, failing for selected simple names.
#[derive(Debug, Default)]
pub struct FailingSink {
    inner: MemorySink,
    failing: HashSet<String>,
    attempts: Vec<String>,
}

impl FailingSink {
    /// A sink that fails whenever an artifact named in `names` is written.
    pub fn failing_on<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            failing: names.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Artifacts that were written successfully.
    #[must_use]
    pub fn artifacts(&self) -> &[Artifact] {
        self.inner.artifacts()
    }

    /// Simple names of every write attempt, in order, failures included.
    #[must_use]
    pub fn attempts(&self) -> &[String] {
        &self.attempts
    }
}

impl ArtifactSink for FailingSink {
    fn write(&mut self, artifact: &Artifact) -> io::Result<()> {
        self.attempts.push(artifact.name.clone());
        if self.failing.contains(&artifact.name) {
            return Err(io::Error::other(format!("disk full while writing {}", artifact.name)));
        }
        self.inner.write(artifact)
    }
}
