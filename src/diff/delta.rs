//! Aggregated differences and compatibility classification.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::jvm::Info;
use crate::version::{Version, VersionError};

/// How a set of differences affects consumers of the library.
///
/// The variants are ordered from most to least benign; a delta classifies as
/// the strongest category any of its differences reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub enum Compatibility {
    /// Only implementers of the API are affected; callers relink cleanly.
    /// Requires a patch bump.
    #[display("backward compatible (implementer)")]
    BackwardCompatibleImplementer,
    /// Callers keep working but the contract grew or was deprecated.
    /// Requires a minor bump.
    #[display("backward compatible (user)")]
    BackwardCompatibleUser,
    /// Existing callers may break. Requires a major bump.
    #[display("non backward compatible")]
    NonBackwardCompatible,
}

/// One difference between the old and the new snapshot.
///
/// Every variant names the class the difference belongs to; member payloads
/// additionally carry their declaring class inside the [`Info`]. Differences
/// order by `(class, kind, name, descriptor)`, which both makes reports
/// deterministic and keeps distinct overloads of one method name apart.
#[derive(Debug, Clone)]
pub enum Difference {
    /// A new visible entity appeared.
    Add {
        /// The class the entity belongs to.
        class_id: String,
        /// The added entity.
        info: Info,
    },
    /// A visible entity disappeared with no inherited replacement.
    Remove {
        /// The class the entity belonged to.
        class_id: String,
        /// The removed entity.
        info: Info,
    },
    /// A binary-incompatible change.
    Change {
        /// The class the entity belongs to.
        class_id: String,
        /// The entity as it was.
        old: Info,
        /// The entity as it is.
        new: Info,
    },
    /// A logical but binary-compatible change.
    CompatChange {
        /// The class the entity belongs to.
        class_id: String,
        /// The entity as it was.
        old: Info,
        /// The entity as it is.
        new: Info,
    },
    /// The only change is that the deprecation flag was set.
    Deprecate {
        /// The class the entity belongs to.
        class_id: String,
        /// The entity as it was.
        old: Info,
        /// The entity as it is.
        new: Info,
    },
}

impl Difference {
    /// The class this difference belongs to.
    #[must_use]
    pub fn class_id(&self) -> &str {
        match self {
            Self::Add { class_id, .. }
            | Self::Remove { class_id, .. }
            | Self::Change { class_id, .. }
            | Self::CompatChange { class_id, .. }
            | Self::Deprecate { class_id, .. } => class_id,
        }
    }

    /// The entity the difference is about, as it appears in the *old*
    /// snapshot where one exists, otherwise in the new one.
    #[must_use]
    pub fn info(&self) -> &Info {
        match self {
            Self::Add { info, .. } | Self::Remove { info, .. } => info,
            Self::Change { old, .. }
            | Self::CompatChange { old, .. }
            | Self::Deprecate { old, .. } => old,
        }
    }

    /// The entity as it appears in the new snapshot, for change-like
    /// differences.
    #[must_use]
    pub fn modified_info(&self) -> Option<&Info> {
        match self {
            Self::Add { .. } | Self::Remove { .. } => None,
            Self::Change { new, .. }
            | Self::CompatChange { new, .. }
            | Self::Deprecate { new, .. } => Some(new),
        }
    }

    /// The compatibility category this single difference requires.
    #[must_use]
    pub fn compatibility(&self) -> Compatibility {
        match self {
            Self::Change { .. } | Self::Remove { .. } => Compatibility::NonBackwardCompatible,
            Self::Add { .. } | Self::Deprecate { .. } => Compatibility::BackwardCompatibleUser,
            Self::CompatChange { .. } => Compatibility::BackwardCompatibleImplementer,
        }
    }

    fn kind_ordinal(&self) -> u8 {
        match self {
            Self::Add { .. } => 0,
            Self::Remove { .. } => 1,
            Self::Change { .. } => 2,
            Self::CompatChange { .. } => 3,
            Self::Deprecate { .. } => 4,
        }
    }

    fn sort_key(&self) -> (&str, u8, &str, &str) {
        (
            self.class_id(),
            self.kind_ordinal(),
            self.info().name(),
            self.info().descriptor().unwrap_or(""),
        )
    }
}

impl PartialEq for Difference {
    fn eq(&self, other: &Self) -> bool {
        self.sort_key() == other.sort_key()
    }
}

impl Eq for Difference {}

impl PartialOrd for Difference {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Difference {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

/// The set of differences between two snapshots.
///
/// Immutable once constructed; the usual way to obtain one is
/// [`DeltaBuilder`](super::handler::DeltaBuilder).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Delta {
    differences: BTreeSet<Difference>,
}

impl Delta {
    /// Creates a delta from a collection of differences.
    #[must_use]
    pub fn new(differences: impl IntoIterator<Item = Difference>) -> Self {
        Self {
            differences: differences.into_iter().collect(),
        }
    }

    /// The differences, in their deterministic order.
    pub fn differences(&self) -> impl Iterator<Item = &Difference> {
        self.differences.iter()
    }

    /// Whether the two snapshots were identical under the criteria.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.differences.is_empty()
    }

    /// The compatibility category of the delta as a whole: the strongest
    /// category among its differences, or
    /// [`Compatibility::BackwardCompatibleImplementer`] for an empty delta.
    #[must_use]
    pub fn compatibility(&self) -> Compatibility {
        self.differences
            .iter()
            .map(Difference::compatibility)
            .max()
            .unwrap_or(Compatibility::BackwardCompatibleImplementer)
    }

    /// Infers the next version from a baseline.
    ///
    /// # Errors
    /// [`VersionError::DevelopmentBaseline`] when the baseline is a pre-1.0
    /// version; versions before the first release carry no inference rules.
    pub fn infer_next_version(&self, baseline: &Version) -> Result<Version, VersionError> {
        if baseline.is_development() {
            return Err(VersionError::DevelopmentBaseline(baseline.clone()));
        }
        Ok(baseline.next(self.compatibility()))
    }

    /// Validates a proposed version against a baseline.
    ///
    /// A development baseline accepts any properly incremented version. An
    /// empty delta requires no bump beyond the increment itself, so e.g. a
    /// pre-release can step to the next pre-release. Otherwise the proposed
    /// version must reach at least the version [`infer_next_version`]
    /// (Self::infer_next_version) would produce.
    ///
    /// # Errors
    /// [`VersionError::NotIncremented`] when `current` does not come
    /// strictly after `previous`.
    pub fn validate(&self, previous: &Version, current: &Version) -> Result<bool, VersionError> {
        if current <= previous {
            return Err(VersionError::NotIncremented {
                previous: previous.clone(),
                current: current.clone(),
            });
        }
        if previous.is_development() {
            return Ok(true);
        }
        let minimum = if self.differences.is_empty() {
            previous.clone()
        } else {
            previous.next(self.compatibility())
        };
        Ok(*current >= minimum)
    }
}
