//! End-to-end scenarios: parser events in, version verdicts out.

use std::collections::BTreeMap;

use doppio::diff::{self, Delta, Difference, criteria::PublicOnly, handler::DeltaBuilder};
use doppio::jvm::{
    AccessFlags, ClassInfo, ClassVersion, ConstantValue, builder::ClassInfoBuilder,
};
use doppio::version::{Version, VersionError};

const VERSION: ClassVersion = ClassVersion {
    major: 52,
    minor: 0,
};

fn public_class(
    name: &str,
    super_name: &str,
    members: impl FnOnce(&mut ClassInfoBuilder),
) -> ClassInfo {
    let mut builder = ClassInfoBuilder::new();
    builder
        .visit_header(
            VERSION,
            AccessFlags::PUBLIC | AccessFlags::SUPER,
            name.to_owned(),
            None,
            Some(super_name.to_owned()),
            Vec::new(),
        )
        .unwrap();
    members(&mut builder);
    builder.visit_end().unwrap()
}

fn int_field(builder: &mut ClassInfoBuilder, access: AccessFlags, name: &str) {
    builder
        .visit_field(
            access,
            name.to_owned(),
            "I".to_owned(),
            None,
            Some(ConstantValue::Integer(0)),
        )
        .unwrap();
}

fn void_method(
    builder: &mut ClassInfoBuilder,
    access: AccessFlags,
    name: &str,
    exceptions: &[&str],
) {
    builder
        .visit_method(
            access,
            name.to_owned(),
            "()V".to_owned(),
            None,
            Some(exceptions.iter().map(|&name| name.to_owned()).collect()),
        )
        .unwrap();
}

fn snapshot(classes: impl IntoIterator<Item = ClassInfo>) -> BTreeMap<String, ClassInfo> {
    classes
        .into_iter()
        .map(|class| (class.name.clone(), class))
        .collect()
}

fn delta_between(
    old: &BTreeMap<String, ClassInfo>,
    new: &BTreeMap<String, ClassInfo>,
) -> Delta {
    let mut handler = DeltaBuilder::new();
    diff::diff(&mut handler, &PublicOnly, "old", "new", old, new);
    handler.build()
}

fn version(text: &str) -> Version {
    text.parse().unwrap()
}

#[test]
fn deprecating_a_method_needs_a_minor_bump() {
    let old = snapshot([public_class("org/doppio/X", "java/lang/Object", |b| {
        void_method(b, AccessFlags::PUBLIC, "m", &[]);
    })]);
    let new = snapshot([public_class("org/doppio/X", "java/lang/Object", |b| {
        void_method(b, AccessFlags::PUBLIC | AccessFlags::DEPRECATED, "m", &[]);
    })]);

    let delta = delta_between(&old, &new);
    let differences: Vec<_> = delta.differences().collect();
    assert_eq!(1, differences.len());
    let deprecation = differences[0];
    assert!(
        matches!(deprecation, Difference::Deprecate { .. }),
        "a deprecation-only change must not report as a change: {differences:?}",
    );
    assert!(!deprecation.info().is_deprecated());
    let modified = deprecation.modified_info().unwrap();
    assert!(modified.is_deprecated());
    assert!(modified.access().is_public());
    assert_eq!("m", modified.name());
    assert_eq!(
        version("1.3.0"),
        delta.infer_next_version(&version("1.2.3")).unwrap()
    );
}

#[test]
fn a_member_pushed_up_into_a_new_parent_is_not_a_removal() {
    // Old hierarchy: ClassA and DirectDescendant both extend Root and both
    // declare aField/aMethod. New hierarchy: ClassA extends
    // DirectDescendant, declares nothing itself, and the members it now
    // inherits carry the deprecation flag.
    let declare_members = |access: AccessFlags| {
        move |b: &mut ClassInfoBuilder| {
            int_field(b, access, "aField");
            void_method(b, access, "aMethod", &[]);
        }
    };

    let old = snapshot([
        public_class("org/doppio/Root", "java/lang/Object", |_| {}),
        public_class(
            "org/doppio/DirectDescendant",
            "org/doppio/Root",
            declare_members(AccessFlags::PUBLIC),
        ),
        public_class(
            "org/doppio/ClassA",
            "org/doppio/Root",
            declare_members(AccessFlags::PUBLIC),
        ),
    ]);
    let new = snapshot([
        public_class("org/doppio/Root", "java/lang/Object", |_| {}),
        public_class(
            "org/doppio/DirectDescendant",
            "org/doppio/Root",
            declare_members(AccessFlags::PUBLIC | AccessFlags::DEPRECATED),
        ),
        public_class("org/doppio/ClassA", "org/doppio/DirectDescendant", |_| {}),
    ]);

    let delta = delta_between(&old, &new);
    let differences: Vec<_> = delta.differences().collect();

    assert_eq!(3, differences.len(), "{differences:?}");
    assert!(
        differences
            .iter()
            .all(|difference| !matches!(difference, Difference::Remove { .. })),
        "the members are still inherited: {differences:?}",
    );
    assert!(
        differences
            .iter()
            .any(|difference| matches!(difference, Difference::Deprecate { .. })),
        "the inherited members became deprecated: {differences:?}",
    );
    assert!(
        differences.iter().any(|difference| matches!(
            difference,
            Difference::Change { class_id, .. } if class_id == "org/doppio/ClassA"
        )),
        "the superclass of ClassA changed: {differences:?}",
    );
}

#[test]
fn adding_a_public_method_needs_a_minor_bump() {
    let old = snapshot([public_class("org/doppio/X", "java/lang/Object", |b| {
        void_method(b, AccessFlags::PUBLIC, "x", &[]);
    })]);
    let new = snapshot([public_class("org/doppio/X", "java/lang/Object", |b| {
        void_method(b, AccessFlags::PUBLIC, "x", &[]);
        void_method(b, AccessFlags::PUBLIC, "y", &[]);
    })]);

    let delta = delta_between(&old, &new);
    let differences: Vec<_> = delta.differences().collect();
    assert_eq!(1, differences.len());
    assert!(matches!(differences[0], Difference::Add { .. }));

    let previous = version("1.2.3");
    assert_eq!(version("1.3.0"), delta.infer_next_version(&previous).unwrap());
    assert!(delta.validate(&previous, &version("1.3.0")).unwrap());
    assert!(!delta.validate(&previous, &version("1.2.4")).unwrap());
}

#[test]
fn removing_a_public_field_needs_a_major_bump() {
    let old = snapshot([public_class("org/doppio/X", "java/lang/Object", |b| {
        int_field(b, AccessFlags::PUBLIC, "gone");
    })]);
    let new = snapshot([public_class("org/doppio/X", "java/lang/Object", |_| {})]);

    let delta = delta_between(&old, &new);
    let differences: Vec<_> = delta.differences().collect();
    assert_eq!(1, differences.len());
    assert!(matches!(differences[0], Difference::Remove { .. }));

    let previous = version("1.2.3");
    assert_eq!(version("2.0.0"), delta.infer_next_version(&previous).unwrap());
    assert!(!delta.validate(&previous, &version("1.3.0")).unwrap());
    assert!(delta.validate(&previous, &version("2.0.0")).unwrap());
}

#[test]
fn widening_a_throws_clause_needs_a_patch_bump() {
    let old = snapshot([public_class("org/doppio/X", "java/lang/Object", |b| {
        void_method(b, AccessFlags::PUBLIC, "m", &["java/io/IOException"]);
    })]);
    let new = snapshot([public_class("org/doppio/X", "java/lang/Object", |b| {
        void_method(
            b,
            AccessFlags::PUBLIC,
            "m",
            &["java/io/IOException", "java/sql/SQLException"],
        );
    })]);

    let delta = delta_between(&old, &new);
    let differences: Vec<_> = delta.differences().collect();
    assert_eq!(1, differences.len());
    assert!(
        matches!(differences[0], Difference::CompatChange { .. }),
        "a throws change is logical but binary compatible: {differences:?}",
    );
    assert_eq!(
        version("1.2.4"),
        delta.infer_next_version(&version("1.2.3")).unwrap()
    );
}

#[test]
fn an_unchanged_api_accepts_the_next_pre_release() {
    let snapshot = snapshot([public_class("org/doppio/X", "java/lang/Object", |b| {
        void_method(b, AccessFlags::PUBLIC, "m", &[]);
    })]);

    let delta = delta_between(&snapshot, &snapshot);
    assert!(delta.is_empty());
    assert!(
        delta
            .validate(&version("1.1.0-rc1"), &version("1.1.0-rc2"))
            .unwrap()
    );
}

#[test]
fn validation_rejects_non_increments() {
    let delta = Delta::default();
    assert_eq!(
        Err(VersionError::NotIncremented {
            previous: version("1.2.3"),
            current: version("1.2.3"),
        }),
        delta.validate(&version("1.2.3"), &version("1.2.3"))
    );
}
