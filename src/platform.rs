//! Supported device platforms.
//!
//! The platform set is closed: every per-platform loop in the validator and
//! generator matches exhaustively on [`Platform`]. Which platforms take part
//! in a round is an explicit [`PlatformSet`] value handed to those components
//! rather than shared global state.

use std::collections::BTreeSet;
use std::fmt::{self, Display, Formatter};

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A device platform with its own Actions implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// iPhone and iPad devices.
    Ios,
    /// Android devices.
    Droid,
}

impl Platform {
    /// Every platform, in generation order.
    pub const ALL: [Self; 2] = [Self::Ios, Self::Droid];

    /// Prefix prepended to a base simple name to find the platform type.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Ios => "IOS",
            Self::Droid => "Droid",
        }
    }

    /// Lower-case identifier used in configuration.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ios => "ios",
            Self::Droid => "droid",
        }
    }
}

impl Display for Platform {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A platform selection that names no platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Diagnostic)]
#[error("platform selection is empty")]
#[diagnostic(
    code(stepwire::platform::empty_selection),
    help("list at least one of ios and droid, or omit the selection to use every platform")
)]
pub struct EmptyPlatformSetError;

/// Ordered, de-duplicated selection of platforms for one round.
///
/// Deserialisation rejects an empty list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Platform>", into = "Vec<Platform>")]
pub struct PlatformSet(Vec<Platform>);

impl PlatformSet {
    /// Select the given platforms; duplicates collapse and order follows
    /// [`Platform::ALL`].
    #[must_use]
    pub fn new(platforms: impl IntoIterator<Item = Platform>) -> Self {
        let unique: BTreeSet<Platform> = platforms.into_iter().collect();
        Self(unique.into_iter().collect())
    }

    /// Every supported platform.
    #[must_use]
    pub fn all() -> Self {
        Self::new(Platform::ALL)
    }

    /// Iterate over the selected platforms.
    pub fn iter(&self) -> impl Iterator<Item = Platform> + '_ {
        self.0.iter().copied()
    }

    /// Number of selected platforms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no platform is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `platform` is selected.
    #[must_use]
    pub fn contains(&self, platform: Platform) -> bool {
        self.0.contains(&platform)
    }
}

impl Default for PlatformSet {
    fn default() -> Self {
        Self::all()
    }
}

impl TryFrom<Vec<Platform>> for PlatformSet {
    type Error = EmptyPlatformSetError;

    fn try_from(value: Vec<Platform>) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Err(EmptyPlatformSetError);
        }
        Ok(Self::new(value))
    }
}

impl From<PlatformSet> for Vec<Platform> {
    fn from(value: PlatformSet) -> Self {
        value.0
    }
}

impl FromIterator<Platform> for PlatformSet {
    fn from_iter<I: IntoIterator<Item = Platform>>(iter: I) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Platform::Ios, "IOS")]
    #[case(Platform::Droid, "Droid")]
    fn prefixes_match_naming_convention(#[case] platform: Platform, #[case] prefix: &str) {
        assert_eq!(platform.prefix(), prefix);
    }

    #[test]
    fn platform_set_orders_and_deduplicates() {
        let set = PlatformSet::new([Platform::Droid, Platform::Ios, Platform::Droid]);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![Platform::Ios, Platform::Droid]);
    }

    #[test]
    fn empty_list_is_not_a_selection() {
        assert_eq!(PlatformSet::try_from(Vec::new()), Err(EmptyPlatformSetError));
        assert_eq!(
            PlatformSet::try_from(vec![Platform::Droid]),
            Ok(PlatformSet::new([Platform::Droid]))
        );
    }

    #[test]
    fn default_selects_every_platform() {
        assert_eq!(PlatformSet::default().len(), Platform::ALL.len());
    }
}
