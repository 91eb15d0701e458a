#![warn(
    clippy::pedantic,
    future_incompatible,
    missing_debug_implementations,
    missing_docs,
    rust_2018_idioms,
    rust_2021_compatibility
)]
#![deny(rustdoc::broken_intra_doc_links)]

//! Welcome to `doppio`, a library for comparing two snapshots of a compiled
//! Java class library and deciding which semantic-version bump the changes
//! require.
//!
//! The crate consumes structured class-file parser events (it never reads
//! bytes itself), projects them into an immutable metadata model, diffs two
//! such models under a pluggable visibility policy, and classifies the
//! resulting differences for version inference and validation.
//!
//! ```
//! use doppio::diff::{self, criteria::PublicOnly, handler::DeltaBuilder};
//! use doppio::version::Version;
//! use std::collections::BTreeMap;
//!
//! let old_classes = BTreeMap::new();
//! let new_classes = BTreeMap::new();
//! let mut handler = DeltaBuilder::new();
//! diff::diff(&mut handler, &PublicOnly, "1.2.3", "1.3.0", &old_classes, &new_classes);
//! let delta = handler.build();
//! let previous: Version = "1.2.3".parse()?;
//! let current: Version = "1.3.0".parse()?;
//! assert!(delta.validate(&previous, &current)?);
//! # Ok::<(), doppio::version::VersionError>(())
//! ```

pub mod diff;
pub mod jvm;
pub mod version;
