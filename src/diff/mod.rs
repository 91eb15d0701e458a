//! Comparing two snapshots of a class library.
//!
//! [`diff`] walks the old and the new class map under a
//! [`DiffCriteria`](criteria::DiffCriteria) policy and pushes its findings
//! into a [`DiffHandler`](handler::DiffHandler). The walk is fully
//! deterministic: classes in sorted id order, fields before methods, member
//! buckets in removed/added/changed order, each in sorted key order.

use std::collections::{BTreeMap, BTreeSet};

pub mod criteria;
pub mod delta;
pub mod handler;

pub use delta::{Compatibility, Delta, Difference};

use crate::jvm::{ClassInfo, FieldInfo, MethodInfo};
use criteria::DiffCriteria;
use handler::DiffHandler;

/// Compares `old_classes` against `new_classes` and reports every
/// difference visible under `criteria` to `handler`.
///
/// The labels name the two snapshots in the event stream (release ids,
/// file names, whatever the caller tracks); the differ does not interpret
/// them.
pub fn diff<H, C>(
    handler: &mut H,
    criteria: &C,
    old_label: &str,
    new_label: &str,
    old_classes: &BTreeMap<String, ClassInfo>,
    new_classes: &BTreeMap<String, ClassInfo>,
) where
    H: DiffHandler + ?Sized,
    C: DiffCriteria + ?Sized,
{
    handler.start_diff(old_label, new_label);

    handler.start_old_contents();
    for class in old_classes.values() {
        if criteria.valid_class(class) {
            handler.contains(class);
        }
    }
    handler.end_old_contents();

    handler.start_new_contents();
    for class in new_classes.values() {
        if criteria.valid_class(class) {
            handler.contains(class);
        }
    }
    handler.end_new_contents();

    handler.start_removed();
    for (class_id, class) in old_classes {
        if !new_classes.contains_key(class_id) && criteria.valid_class(class) {
            handler.class_removed(class);
        }
    }
    handler.end_removed();

    handler.start_added();
    for (class_id, class) in new_classes {
        if !old_classes.contains_key(class_id) && criteria.valid_class(class) {
            handler.class_added(class);
        }
    }
    handler.end_added();

    handler.start_changed();
    for (class_id, old_class) in old_classes {
        let Some(new_class) = new_classes.get(class_id) else {
            continue;
        };
        if criteria.valid_class(old_class) || criteria.valid_class(new_class) {
            diff_class(handler, criteria, old_class, new_class, new_classes);
        }
    }
    handler.end_changed();

    handler.end_diff();
}

fn diff_class<H, C>(
    handler: &mut H,
    criteria: &C,
    old_class: &ClassInfo,
    new_class: &ClassInfo,
    new_classes: &BTreeMap<String, ClassInfo>,
) where
    H: DiffHandler + ?Sized,
    C: DiffCriteria + ?Sized,
{
    let (extended_fields, extended_methods) = extended_member_keys(new_class, new_classes);

    let fields = member_buckets(
        &old_class.fields,
        &new_class.fields,
        &extended_fields,
        |field| criteria.valid_field(field),
        |old, new| criteria.field_differs(old, new),
    );
    let methods = member_buckets(
        &old_class.methods,
        &new_class.methods,
        &extended_methods,
        |method| criteria.valid_method(method),
        |old, new| criteria.method_differs(old, new),
    );
    let class_differs = criteria.class_differs(old_class, new_class);

    if fields.is_empty() && methods.is_empty() && !class_differs {
        return;
    }

    handler.start_class_changed(&new_class.name);

    handler.start_removed();
    for field in &fields.removed {
        handler.field_removed(field);
    }
    for method in &methods.removed {
        handler.method_removed(method);
    }
    handler.end_removed();

    handler.start_added();
    for field in &fields.added {
        handler.field_added(field);
    }
    for method in &methods.added {
        handler.method_added(method);
    }
    handler.end_added();

    if class_differs {
        if !old_class.access.is_deprecated()
            && new_class.access.is_deprecated()
            && !criteria.class_differs(&old_class.clone_deprecated(), new_class)
        {
            handler.class_deprecated(old_class, new_class);
        } else {
            handler.class_changed(old_class, new_class);
        }
    }
    for &(old_field, new_field) in &fields.changed {
        if !old_field.access.is_deprecated()
            && new_field.access.is_deprecated()
            && !criteria.field_differs(&old_field.clone_deprecated(), new_field)
        {
            handler.field_deprecated(old_field, new_field);
        } else if criteria.field_differs_binary(old_field, new_field) {
            handler.field_changed(old_field, new_field);
        } else {
            handler.field_changed_compat(old_field, new_field);
        }
    }
    for &(old_method, new_method) in &methods.changed {
        if !old_method.access.is_deprecated()
            && new_method.access.is_deprecated()
            && !criteria.method_differs(&old_method.clone_deprecated(), new_method)
        {
            handler.method_deprecated(old_method, new_method);
        } else if criteria.method_differs_binary(old_method, new_method) {
            handler.method_changed(old_method, new_method);
        } else {
            handler.method_changed_compat(old_method, new_method);
        }
    }

    handler.end_class_changed();
}

/// The member keys the new class appears to offer: its own plus every
/// non-private key reachable through its superclass chain within the new
/// snapshot. External superclasses end the walk; a cyclic chain is visited
/// once per class.
fn extended_member_keys<'a>(
    class: &'a ClassInfo,
    classes: &'a BTreeMap<String, ClassInfo>,
) -> (BTreeSet<&'a str>, BTreeSet<&'a str>) {
    let mut fields: BTreeSet<&str> = class.fields.keys().map(String::as_str).collect();
    let mut methods: BTreeSet<&str> = class.methods.keys().map(String::as_str).collect();
    let mut visited = BTreeSet::new();
    let mut super_name = class.super_name.as_deref();
    while let Some(name) = super_name {
        if !visited.insert(name) {
            break;
        }
        let Some(super_class) = classes.get(name) else {
            break;
        };
        for (key, field) in &super_class.fields {
            if !field.access.is_private() {
                fields.insert(key);
            }
        }
        for (key, method) in &super_class.methods {
            if !method.access.is_private() {
                methods.insert(key);
            }
        }
        super_name = super_class.super_name.as_deref();
    }
    (fields, methods)
}

struct MemberBuckets<'a, T> {
    removed: Vec<&'a T>,
    added: Vec<&'a T>,
    changed: Vec<(&'a T, &'a T)>,
}

impl<T> MemberBuckets<'_, T> {
    fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty() && self.changed.is_empty()
    }
}

/// Splits one member kind of a shared class into the removed, added, and
/// changed buckets.
///
/// A key present on both sides is a candidate change (and never a removal
/// or an addition), kept only if the policy sees a difference. A key gone
/// from the class itself but still reachable through the new superclass
/// chain is not a removal: the member merely moved up the hierarchy.
fn member_buckets<'a, T>(
    old: &'a BTreeMap<String, T>,
    new: &'a BTreeMap<String, T>,
    extended_new_keys: &BTreeSet<&str>,
    valid: impl Fn(&T) -> bool,
    differs: impl Fn(&T, &T) -> bool,
) -> MemberBuckets<'a, T> {
    let mut removed = Vec::new();
    let mut changed = Vec::new();
    let mut shared_keys = BTreeSet::new();
    for (key, old_member) in old {
        if !valid(old_member) {
            continue;
        }
        if let Some(new_member) = new.get(key) {
            shared_keys.insert(key.as_str());
            if differs(old_member, new_member) {
                changed.push((old_member, new_member));
            }
        } else if !extended_new_keys.contains(key.as_str()) {
            removed.push(old_member);
        }
    }
    let added = new
        .iter()
        .filter(|&(key, member)| valid(member) && !shared_keys.contains(key.as_str()))
        .map(|(_, member)| member)
        .collect();
    MemberBuckets {
        removed,
        added,
        changed,
    }
}
