//! Content hashing utilities.
//!
//! [`ContentHasher`] computes a stable SHA-256 digest of rendered source
//! text. The source-tree sink records the digest of every file it writes and
//! compares the next round's rendering against that record to leave
//! unchanged files untouched. The digest is also logged for every written
//! artifact so two builds can be compared.
//!
//! # Examples
//!
//! ```
//! use stepwire::hasher::ContentHasher;
//!
//! let digest = ContentHasher::digest("public interface ActionsDefinition {}\n");
//! assert_eq!(digest.len(), 64);
//! ```

use sha2::{Digest, Sha256};

/// Computes stable digests for rendered artifacts.
pub struct ContentHasher;

impl ContentHasher {
    /// Hex-encoded SHA-256 digest of `content`.
    #[must_use]
    pub fn digest(content: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}
