//! Pluggable comparison policies.
//!
//! A policy decides three things: which entities are visible at all, what
//! counts as a logical difference, and which logical differences are also
//! binary incompatible. The canonical difference rules are shared by the
//! bundled policies as default trait bodies; custom policies usually only
//! pick a visibility filter.

use itertools::Itertools;

use crate::jvm::{AccessFlags, ClassInfo, FieldInfo, MethodInfo};

/// Access bits that do not make a class declaration differ on their own.
const CLASS_ACCESS_IGNORED: AccessFlags = AccessFlags::SUPER
    .union(AccessFlags::DEPRECATED)
    .union(AccessFlags::SYNTHETIC);

/// Access bits that do not make a member declaration differ on their own.
const MEMBER_ACCESS_IGNORED: AccessFlags =
    AccessFlags::DEPRECATED.union(AccessFlags::SYNTHETIC);

fn access_differs(old: AccessFlags, new: AccessFlags, ignored: AccessFlags) -> bool {
    old.difference(ignored) != new.difference(ignored)
}

/// Setting the deprecation flag is a difference; clearing it is not.
///
/// The differ probes a changed pair with `differs(clone_deprecated(old),
/// new)`: when that probe comes back `false`, deprecation was the only
/// change and the pair is reported as a deprecation instead of a change.
fn became_deprecated(old: AccessFlags, new: AccessFlags) -> bool {
    !old.is_deprecated() && new.is_deprecated()
}

/// Compares two name lists as sets: order and duplicates are ignored.
fn name_sets_differ(old: &[String], new: &[String]) -> bool {
    old.iter().sorted().dedup().ne(new.iter().sorted().dedup())
}

/// A comparison policy.
///
/// The `valid_*` predicates are total: every entity is either visible to
/// the comparison or not. The `*_differs` predicates detect logical
/// differences; the `*_differs_binary` predicates the subset of those that
/// break linking. The differ downgrades a logical-but-not-binary difference
/// to a compatible change.
pub trait DiffCriteria {
    /// Whether the class takes part in the comparison.
    fn valid_class(&self, class: &ClassInfo) -> bool;

    /// Whether the method takes part in the comparison.
    fn valid_method(&self, method: &MethodInfo) -> bool;

    /// Whether the field takes part in the comparison.
    fn valid_field(&self, field: &FieldInfo) -> bool;

    /// Whether the class declarations differ: access bits outside
    /// `SUPER`/`DEPRECATED`/`SYNTHETIC`, becoming deprecated, the
    /// superclass, or the interface set.
    fn class_differs(&self, old: &ClassInfo, new: &ClassInfo) -> bool {
        access_differs(old.access, new.access, CLASS_ACCESS_IGNORED)
            || became_deprecated(old.access, new.access)
            || old.super_name != new.super_name
            || name_sets_differ(&old.interfaces, &new.interfaces)
    }

    /// Whether the method declarations differ: access bits outside
    /// `DEPRECATED`/`SYNTHETIC`, becoming deprecated, or the declared
    /// exception set.
    ///
    /// The descriptor is deliberately not compared. It is part of the
    /// method key, so two members under the same key always share it and a
    /// changed descriptor shows up as a removal plus an addition instead.
    fn method_differs(&self, old: &MethodInfo, new: &MethodInfo) -> bool {
        access_differs(old.access, new.access, MEMBER_ACCESS_IGNORED)
            || became_deprecated(old.access, new.access)
            || name_sets_differ(
                old.exceptions.as_deref().unwrap_or_default(),
                new.exceptions.as_deref().unwrap_or_default(),
            )
    }

    /// Whether the field declarations differ: access bits outside
    /// `DEPRECATED`/`SYNTHETIC`, becoming deprecated, or the compile-time
    /// constant value (wire type included).
    fn field_differs(&self, old: &FieldInfo, new: &FieldInfo) -> bool {
        access_differs(old.access, new.access, MEMBER_ACCESS_IGNORED)
            || became_deprecated(old.access, new.access)
            || old.value != new.value
    }

    /// Whether a method difference breaks linking. Only the masked access
    /// comparison does; a changed throws clause is source-level only.
    fn method_differs_binary(&self, old: &MethodInfo, new: &MethodInfo) -> bool {
        access_differs(old.access, new.access, MEMBER_ACCESS_IGNORED)
    }

    /// Whether a field difference breaks linking. Only the masked access
    /// comparison does; a changed constant value links fine.
    fn field_differs_binary(&self, old: &FieldInfo, new: &FieldInfo) -> bool {
        access_differs(old.access, new.access, MEMBER_ACCESS_IGNORED)
    }
}

/// Compares the `public` API surface: non-synthetic, `public` entities.
#[derive(Debug, Clone, Copy, Default)]
pub struct PublicOnly;

impl DiffCriteria for PublicOnly {
    fn valid_class(&self, class: &ClassInfo) -> bool {
        !class.access.is_synthetic() && class.access.is_public()
    }

    fn valid_method(&self, method: &MethodInfo) -> bool {
        !method.access.is_synthetic() && method.access.is_public()
    }

    fn valid_field(&self, field: &FieldInfo) -> bool {
        !field.access.is_synthetic() && field.access.is_public()
    }
}

/// Compares the API surface visible to subclasses: non-synthetic, `public`
/// or `protected` entities.
#[derive(Debug, Clone, Copy, Default)]
pub struct PublicProtected;

impl DiffCriteria for PublicProtected {
    fn valid_class(&self, class: &ClassInfo) -> bool {
        !class.access.is_synthetic()
            && (class.access.is_public() || class.access.is_protected())
    }

    fn valid_method(&self, method: &MethodInfo) -> bool {
        !method.access.is_synthetic()
            && (method.access.is_public() || method.access.is_protected())
    }

    fn valid_field(&self, field: &FieldInfo) -> bool {
        !field.access.is_synthetic()
            && (field.access.is_public() || field.access.is_protected())
    }
}

/// Compares every non-synthetic entity, optionally including `private`
/// ones.
#[derive(Debug, Clone, Copy, Default)]
pub struct Simple {
    include_private: bool,
}

impl Simple {
    /// Creates the policy; `include_private` keeps `private` entities in
    /// the comparison.
    #[must_use]
    pub fn new(include_private: bool) -> Self {
        Self { include_private }
    }

    fn visible(self, access: AccessFlags) -> bool {
        !access.is_synthetic() && (self.include_private || !access.is_private())
    }
}

impl DiffCriteria for Simple {
    fn valid_class(&self, class: &ClassInfo) -> bool {
        self.visible(class.access)
    }

    fn valid_method(&self, method: &MethodInfo) -> bool {
        self.visible(method.access)
    }

    fn valid_field(&self, field: &FieldInfo) -> bool {
        self.visible(field.access)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn method(access: AccessFlags, exceptions: Option<Vec<&str>>) -> MethodInfo {
        MethodInfo {
            access,
            class_name: "org/doppio/Sample".to_owned(),
            name: "run".to_owned(),
            descriptor: "()V".to_owned(),
            signature: None,
            exceptions: exceptions
                .map(|names| names.into_iter().map(str::to_owned).collect()),
        }
    }

    fn field(access: AccessFlags, value: Option<crate::jvm::ConstantValue>) -> FieldInfo {
        FieldInfo {
            access,
            class_name: "org/doppio/Sample".to_owned(),
            name: "count".to_owned(),
            descriptor: "I".to_owned(),
            signature: None,
            value,
        }
    }

    #[test]
    fn visibility_varies_per_policy() {
        let protected_method = method(AccessFlags::PROTECTED, None);
        let private_method = method(AccessFlags::PRIVATE, None);
        let synthetic_method = method(AccessFlags::PUBLIC | AccessFlags::SYNTHETIC, None);

        assert!(!PublicOnly.valid_method(&protected_method));
        assert!(PublicProtected.valid_method(&protected_method));
        assert!(!PublicProtected.valid_method(&private_method));
        assert!(!Simple::new(false).valid_method(&private_method));
        assert!(Simple::new(true).valid_method(&private_method));
        assert!(
            !Simple::new(true).valid_method(&synthetic_method),
            "synthetic members are never visible",
        );
    }

    #[test]
    fn access_widening_is_a_difference() {
        let old = method(AccessFlags::PRIVATE, None);
        let new = method(AccessFlags::PUBLIC, None);
        assert!(PublicOnly.method_differs(&old, &new));
        assert!(PublicOnly.method_differs_binary(&old, &new));
    }

    #[test]
    fn becoming_deprecated_is_a_difference_the_probe_cancels() {
        let old = method(AccessFlags::PUBLIC, None);
        let new = method(AccessFlags::PUBLIC | AccessFlags::DEPRECATED, None);

        assert!(PublicOnly.method_differs(&old, &new));
        assert!(
            !PublicOnly.method_differs(&old.clone_deprecated(), &new),
            "with the flag forced on the pair must compare equal",
        );
        assert!(
            !PublicOnly.method_differs(&new, &old),
            "clearing the flag is not a difference",
        );
    }

    #[test]
    fn throws_clause_compares_as_a_set() {
        let old = method(AccessFlags::PUBLIC, Some(vec!["java/io/IOException"]));
        let reordered = method(
            AccessFlags::PUBLIC,
            Some(vec!["java/io/IOException", "java/io/IOException"]),
        );
        let widened = method(
            AccessFlags::PUBLIC,
            Some(vec!["java/sql/SQLException", "java/io/IOException"]),
        );

        assert!(!PublicOnly.method_differs(&old, &reordered));
        assert!(PublicOnly.method_differs(&old, &widened));
        assert!(
            !PublicOnly.method_differs_binary(&old, &widened),
            "a throws change is not binary incompatible",
        );
    }

    #[test]
    fn missing_throws_attribute_equals_empty_set() {
        let absent = method(AccessFlags::PUBLIC, None);
        let empty = method(AccessFlags::PUBLIC, Some(vec![]));
        assert!(!PublicOnly.method_differs(&absent, &empty));
    }

    #[test]
    fn constant_value_type_is_part_of_the_comparison() {
        use crate::jvm::ConstantValue;

        let old = field(AccessFlags::PUBLIC, Some(ConstantValue::Integer(0)));
        let same = field(AccessFlags::PUBLIC, Some(ConstantValue::Integer(0)));
        let retyped = field(AccessFlags::PUBLIC, Some(ConstantValue::Long(0)));

        assert!(!PublicOnly.field_differs(&old, &same));
        assert!(PublicOnly.field_differs(&old, &retyped));
        assert!(!PublicOnly.field_differs_binary(&old, &retyped));
    }

    #[test]
    fn class_super_bit_is_ignored() {
        let old = ClassInfo {
            version: crate::jvm::ClassVersion {
                major: 52,
                minor: 0,
            },
            access: AccessFlags::PUBLIC | AccessFlags::SUPER,
            name: "org/doppio/Sample".to_owned(),
            signature: None,
            super_name: Some("java/lang/Object".to_owned()),
            interfaces: vec![],
            methods: std::collections::BTreeMap::new(),
            fields: std::collections::BTreeMap::new(),
        };
        let new = ClassInfo {
            access: AccessFlags::PUBLIC,
            ..old.clone()
        };
        assert!(!PublicOnly.class_differs(&old, &new));

        let final_now = ClassInfo {
            access: AccessFlags::PUBLIC | AccessFlags::FINAL,
            ..old.clone()
        };
        assert!(PublicOnly.class_differs(&old, &final_now));

        let reparented = ClassInfo {
            super_name: Some("org/doppio/Base".to_owned()),
            ..old.clone()
        };
        assert!(PublicOnly.class_differs(&old, &reparented));
    }
}
