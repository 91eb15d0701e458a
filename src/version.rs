//! Version numbers and semantic-version arithmetic.
//!
//! A version is `MAJOR.MINOR.PATCH`, optionally followed by a single
//! delimiter character and a pre-release tag (`1.2.3-rc1`). The delimiter is
//! whatever the project uses (commonly `-`) and is presentation only: it
//! takes no part in comparisons.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::diff::delta::Compatibility;

/// A semantic version.
///
/// Ordering is lexicographic on the `(major, minor, patch)` triple; at equal
/// triples a pre-release version is strictly less than the release, and two
/// pre-release tags compare lexicographically.
#[derive(Debug, Clone)]
pub struct Version {
    major: u64,
    minor: u64,
    patch: u64,
    separator: Option<char>,
    pre_release: Option<String>,
}

impl Version {
    /// Creates a release version.
    #[must_use]
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            separator: None,
            pre_release: None,
        }
    }

    /// Creates a pre-release version, e.g. `1.2.3-rc1`.
    #[must_use]
    pub fn with_pre_release(
        major: u64,
        minor: u64,
        patch: u64,
        separator: char,
        pre_release: impl Into<String>,
    ) -> Self {
        Self {
            major,
            minor,
            patch,
            separator: Some(separator),
            pre_release: Some(pre_release.into()),
        }
    }

    /// The major component.
    #[must_use]
    pub fn major(&self) -> u64 {
        self.major
    }

    /// The minor component.
    #[must_use]
    pub fn minor(&self) -> u64 {
        self.minor
    }

    /// The patch component.
    #[must_use]
    pub fn patch(&self) -> u64 {
        self.patch
    }

    /// The pre-release tag, if any.
    #[must_use]
    pub fn pre_release(&self) -> Option<&str> {
        self.pre_release.as_deref()
    }

    /// Whether this is a development version, i.e. one before the first
    /// stable release. Version inference is undefined for development
    /// baselines and validation against them is unconstrained.
    #[must_use]
    pub fn is_development(&self) -> bool {
        self.major == 0
    }

    /// The next version required by a change of the given compatibility.
    ///
    /// Bumping always yields a release version; any pre-release tag on the
    /// baseline is dropped.
    #[must_use]
    pub fn next(&self, compatibility: Compatibility) -> Self {
        match compatibility {
            Compatibility::NonBackwardCompatible => Self::new(self.major + 1, 0, 0),
            Compatibility::BackwardCompatibleUser => Self::new(self.major, self.minor + 1, 0),
            Compatibility::BackwardCompatibleImplementer => {
                Self::new(self.major, self.minor, self.patch + 1)
            }
        }
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self.major, self.minor, self.patch, &self.pre_release).hash(state);
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch)
            .cmp(&(other.major, other.minor, other.patch))
            .then_with(|| match (&self.pre_release, &other.pre_release) {
                (None, None) => Ordering::Equal,
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (Some(lhs), Some(rhs)) => lhs.cmp(rhs),
            })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let (Some(separator), Some(pre_release)) = (self.separator, &self.pre_release) {
            write!(f, "{separator}{pre_release}")?;
        }
        Ok(())
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let malformed = || VersionError::Malformed(input.to_owned());
        let (major, rest) = parse_component(input).ok_or_else(malformed)?;
        let rest = rest.strip_prefix('.').ok_or_else(malformed)?;
        let (minor, rest) = parse_component(rest).ok_or_else(malformed)?;
        let rest = rest.strip_prefix('.').ok_or_else(malformed)?;
        let (patch, rest) = parse_component(rest).ok_or_else(malformed)?;
        if rest.is_empty() {
            return Ok(Self::new(major, minor, patch));
        }
        let mut chars = rest.chars();
        let separator = chars.next().ok_or_else(malformed)?;
        let pre_release = chars.as_str();
        if pre_release.is_empty() {
            return Err(malformed());
        }
        Ok(Self::with_pre_release(
            major, minor, patch, separator, pre_release,
        ))
    }
}

fn parse_component(input: &str) -> Option<(u64, &str)> {
    let end = input
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(input.len());
    let (digits, rest) = input.split_at(end);
    digits.parse().ok().map(|number| (number, rest))
}

/// An invalid argument to version parsing, inference, or validation.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum VersionError {
    /// The string does not match `MAJOR.MINOR.PATCH(<sep><preRelease>)?`.
    #[error("cannot parse `{0}` as a version")]
    Malformed(String),
    /// Version inference from a pre-1.0 baseline is undefined.
    #[error("the baseline version {0} is a development version")]
    DevelopmentBaseline(Version),
    /// A proposed version must come strictly after its predecessor.
    #[error("version {current} does not come after {previous}")]
    NotIncremented {
        /// The baseline version.
        previous: Version,
        /// The proposed version.
        current: Version,
    },
}
