//! The event sink the differ pushes into.
//!
//! The differ announces its findings as a stream of lifecycle events rather
//! than returning a materialized result, so that streaming consumers (e.g.
//! report printers that care about per-class boundaries) can coexist with
//! the canonical accumulator, [`DeltaBuilder`]. Every method has a no-op
//! default body; a sink implements only the events it consumes.

use std::collections::BTreeSet;

use crate::jvm::{ClassInfo, FieldInfo, Info, MethodInfo};

use super::delta::{Delta, Difference};

/// A sink for the differ's event stream.
///
/// For one [`diff`](super::diff) invocation the events arrive in a fixed
/// shape: `start_diff`; the old and new content announcements; the removed,
/// added, and changed class sections; `end_diff`. Within the changed
/// section each class gets a `start_class_changed` .. `end_class_changed`
/// block holding its member removals, additions, and changes, fields before
/// methods, everything in sorted key order.
#[allow(unused_variables)]
pub trait DiffHandler {
    /// The comparison begins.
    fn start_diff(&mut self, old_label: &str, new_label: &str) {}

    /// The announcement of the old snapshot's visible classes begins.
    fn start_old_contents(&mut self) {}

    /// The announcement of the old snapshot's visible classes ends.
    fn end_old_contents(&mut self) {}

    /// The announcement of the new snapshot's visible classes begins.
    fn start_new_contents(&mut self) {}

    /// The announcement of the new snapshot's visible classes ends.
    fn end_new_contents(&mut self) {}

    /// One visible class of the snapshot being announced.
    fn contains(&mut self, class: &ClassInfo) {}

    /// A removed section begins (top level: classes; nested: members).
    fn start_removed(&mut self) {}

    /// A visible class disappeared from the new snapshot.
    fn class_removed(&mut self, class: &ClassInfo) {}

    /// The removed section ends.
    fn end_removed(&mut self) {}

    /// An added section begins (top level: classes; nested: members).
    fn start_added(&mut self) {}

    /// A visible class appeared in the new snapshot.
    fn class_added(&mut self, class: &ClassInfo) {}

    /// The added section ends.
    fn end_added(&mut self) {}

    /// The changed-classes section begins. Fires once per comparison;
    /// the per-class blocks inside it open with
    /// [`start_class_changed`](Self::start_class_changed).
    fn start_changed(&mut self) {}

    /// The changed-classes section ends.
    fn end_changed(&mut self) {}

    /// The block of changes within one class begins.
    fn start_class_changed(&mut self, class_id: &str) {}

    /// The block of changes within one class ends.
    fn end_class_changed(&mut self) {}

    /// A visible field disappeared with no inherited replacement.
    fn field_removed(&mut self, field: &FieldInfo) {}

    /// A visible method disappeared with no inherited replacement.
    fn method_removed(&mut self, method: &MethodInfo) {}

    /// A visible field appeared.
    fn field_added(&mut self, field: &FieldInfo) {}

    /// A visible method appeared.
    fn method_added(&mut self, method: &MethodInfo) {}

    /// The class declaration itself changed incompatibly.
    fn class_changed(&mut self, old: &ClassInfo, new: &ClassInfo) {}

    /// The only change to the class declaration is its deprecation.
    fn class_deprecated(&mut self, old: &ClassInfo, new: &ClassInfo) {}

    /// A field changed binary-incompatibly.
    fn field_changed(&mut self, old: &FieldInfo, new: &FieldInfo) {}

    /// A field changed, but binary compatibly.
    fn field_changed_compat(&mut self, old: &FieldInfo, new: &FieldInfo) {}

    /// The only change to a field is its deprecation.
    fn field_deprecated(&mut self, old: &FieldInfo, new: &FieldInfo) {}

    /// A method changed binary-incompatibly.
    fn method_changed(&mut self, old: &MethodInfo, new: &MethodInfo) {}

    /// A method changed, but binary compatibly.
    fn method_changed_compat(&mut self, old: &MethodInfo, new: &MethodInfo) {}

    /// The only change to a method is its deprecation.
    fn method_deprecated(&mut self, old: &MethodInfo, new: &MethodInfo) {}

    /// The comparison ends.
    fn end_diff(&mut self) {}
}

/// The canonical handler: accumulates every difference event into a
/// [`Delta`].
///
/// ```
/// use doppio::diff::{self, criteria::PublicOnly, handler::DeltaBuilder};
/// use std::collections::BTreeMap;
///
/// let mut handler = DeltaBuilder::new();
/// diff::diff(&mut handler, &PublicOnly, "old", "new", &BTreeMap::new(), &BTreeMap::new());
/// assert!(handler.build().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct DeltaBuilder {
    differences: BTreeSet<Difference>,
}

impl DeltaBuilder {
    /// Creates an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The accumulated delta.
    #[must_use]
    pub fn build(self) -> Delta {
        Delta::new(self.differences)
    }

    fn push(&mut self, difference: Difference) {
        self.differences.insert(difference);
    }
}

impl DiffHandler for DeltaBuilder {
    fn class_removed(&mut self, class: &ClassInfo) {
        self.push(Difference::Remove {
            class_id: class.name.clone(),
            info: Info::Class(class.clone()),
        });
    }

    fn class_added(&mut self, class: &ClassInfo) {
        self.push(Difference::Add {
            class_id: class.name.clone(),
            info: Info::Class(class.clone()),
        });
    }

    fn field_removed(&mut self, field: &FieldInfo) {
        self.push(Difference::Remove {
            class_id: field.class_name.clone(),
            info: Info::Field(field.clone()),
        });
    }

    fn method_removed(&mut self, method: &MethodInfo) {
        self.push(Difference::Remove {
            class_id: method.class_name.clone(),
            info: Info::Method(method.clone()),
        });
    }

    fn field_added(&mut self, field: &FieldInfo) {
        self.push(Difference::Add {
            class_id: field.class_name.clone(),
            info: Info::Field(field.clone()),
        });
    }

    fn method_added(&mut self, method: &MethodInfo) {
        self.push(Difference::Add {
            class_id: method.class_name.clone(),
            info: Info::Method(method.clone()),
        });
    }

    fn class_changed(&mut self, old: &ClassInfo, new: &ClassInfo) {
        self.push(Difference::Change {
            class_id: old.name.clone(),
            old: Info::Class(old.clone()),
            new: Info::Class(new.clone()),
        });
    }

    fn class_deprecated(&mut self, old: &ClassInfo, new: &ClassInfo) {
        self.push(Difference::Deprecate {
            class_id: old.name.clone(),
            old: Info::Class(old.clone()),
            new: Info::Class(new.clone()),
        });
    }

    fn field_changed(&mut self, old: &FieldInfo, new: &FieldInfo) {
        self.push(Difference::Change {
            class_id: old.class_name.clone(),
            old: Info::Field(old.clone()),
            new: Info::Field(new.clone()),
        });
    }

    fn field_changed_compat(&mut self, old: &FieldInfo, new: &FieldInfo) {
        self.push(Difference::CompatChange {
            class_id: old.class_name.clone(),
            old: Info::Field(old.clone()),
            new: Info::Field(new.clone()),
        });
    }

    fn field_deprecated(&mut self, old: &FieldInfo, new: &FieldInfo) {
        self.push(Difference::Deprecate {
            class_id: old.class_name.clone(),
            old: Info::Field(old.clone()),
            new: Info::Field(new.clone()),
        });
    }

    fn method_changed(&mut self, old: &MethodInfo, new: &MethodInfo) {
        self.push(Difference::Change {
            class_id: old.class_name.clone(),
            old: Info::Method(old.clone()),
            new: Info::Method(new.clone()),
        });
    }

    fn method_changed_compat(&mut self, old: &MethodInfo, new: &MethodInfo) {
        self.push(Difference::CompatChange {
            class_id: old.class_name.clone(),
            old: Info::Method(old.clone()),
            new: Info::Method(new.clone()),
        });
    }

    fn method_deprecated(&mut self, old: &MethodInfo, new: &MethodInfo) {
        self.push(Difference::Deprecate {
            class_id: old.class_name.clone(),
            old: Info::Method(old.clone()),
            new: Info::Method(new.clone()),
        });
    }
}
