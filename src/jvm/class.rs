//! Class records and class file versions.

use std::collections::BTreeMap;

use super::{AccessFlags, FieldInfo, MethodInfo};

/// The declared API of one class.
///
/// Member maps are ordered so that every traversal over them is
/// deterministic. Methods are keyed by their [method key](MethodInfo::key)
/// (name plus descriptor, so overloads stay distinct); fields are keyed by
/// name, which the class file format guarantees to be unique per class.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassInfo {
    /// The class file format version the class was compiled to.
    pub version: ClassVersion,
    /// The access flags of the class.
    pub access: AccessFlags,
    /// The binary name of the class (e.g., `org/doppio/Outer$Inner`).
    pub name: String,
    /// The generic signature of the class, if any.
    pub signature: Option<String>,
    /// The binary name of the superclass.
    /// `None` for `java/lang/Object`, the root of the hierarchy.
    pub super_name: Option<String>,
    /// The binary names of the interfaces the class implements, in
    /// declaration order.
    pub interfaces: Vec<String>,
    /// The methods declared in the class, keyed by method key.
    pub methods: BTreeMap<String, MethodInfo>,
    /// The fields declared in the class, keyed by field name.
    pub fields: BTreeMap<String, FieldInfo>,
}

impl ClassInfo {
    /// Returns a copy of the class with the deprecation flag forced on.
    ///
    /// Everything else, members included, is unchanged.
    #[must_use]
    pub fn clone_deprecated(&self) -> Self {
        Self {
            access: self.access | AccessFlags::DEPRECATED,
            ..self.clone()
        }
    }
}

/// The format version of a class file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, derive_more::Display)]
#[display("{major}.{minor}")]
pub struct ClassVersion {
    /// The major version (45 for JDK 1.1, 52 for JDK 8, and so on).
    pub major: u16,
    /// The minor version.
    pub minor: u16,
}

#[cfg(test)]
mod test {
    use super::*;

    fn sample_class() -> ClassInfo {
        ClassInfo {
            version: ClassVersion {
                major: 52,
                minor: 0,
            },
            access: AccessFlags::PUBLIC | AccessFlags::SUPER,
            name: "org/doppio/Sample".to_owned(),
            signature: None,
            super_name: Some("java/lang/Object".to_owned()),
            interfaces: vec!["java/io/Closeable".to_owned()],
            methods: BTreeMap::new(),
            fields: BTreeMap::new(),
        }
    }

    #[test]
    fn clone_deprecated_sets_only_the_deprecation_flag() {
        let class = sample_class();
        let deprecated = class.clone_deprecated();

        assert!(deprecated.access.is_deprecated());
        assert_eq!(class.access | AccessFlags::DEPRECATED, deprecated.access);
        assert_eq!(class.name, deprecated.name);
        assert_eq!(class.super_name, deprecated.super_name);
        assert_eq!(class.interfaces, deprecated.interfaces);
    }

    #[test]
    fn clone_deprecated_never_clears_the_flag() {
        let already = sample_class().clone_deprecated();
        assert!(already.clone_deprecated().access.is_deprecated());
    }
}
