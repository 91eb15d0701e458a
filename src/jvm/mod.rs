//! The metadata model for JVM classes, methods, and fields.
//!
//! The records in this module are immutable snapshots of the declared API of
//! a class: access flags, inheritance, member signatures, and the
//! deprecation flag. They are produced once per class by a
//! [`ClassInfoBuilder`](builder::ClassInfoBuilder) and consulted read-only
//! by the differ.

use bitflags::bitflags;

pub mod builder;
pub mod class;
pub mod field;
pub mod method;

pub use class::{ClassInfo, ClassVersion};
pub use field::{ConstantValue, FieldInfo};
pub use method::MethodInfo;

bitflags! {
    /// The access flags of a class, method, or field.
    ///
    /// The bit values follow the class file format. The JVM overloads some
    /// bits per entity kind; those carry an alias here (`SUPER` /
    /// `SYNCHRONIZED`, `VOLATILE` / `BRIDGE`, `TRANSIENT` / `VARARGS`).
    #[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
    pub struct AccessFlags: u32 {
        /// Declared `public`; may be accessed from outside its package.
        const PUBLIC = 0x0001;
        /// Declared `private`; usable only within the defining class.
        const PRIVATE = 0x0002;
        /// Declared `protected`; may be accessed within subclasses.
        const PROTECTED = 0x0004;
        /// Declared `static`.
        const STATIC = 0x0008;
        /// Declared `final`; no subclasses, overrides, or reassignment.
        const FINAL = 0x0010;
        /// Treat superclass methods specially on `invokespecial` (classes).
        const SUPER = 0x0020;
        /// Declared `synchronized` (methods).
        const SYNCHRONIZED = 0x0020;
        /// Declared `volatile`; cannot be cached (fields).
        const VOLATILE = 0x0040;
        /// A bridge method generated by the compiler (methods).
        const BRIDGE = 0x0040;
        /// Declared `transient`; skipped by persistent object managers (fields).
        const TRANSIENT = 0x0080;
        /// Declared with a variable number of arguments (methods).
        const VARARGS = 0x0080;
        /// Declared `native`; implemented outside the JVM.
        const NATIVE = 0x0100;
        /// Is an interface, not a class.
        const INTERFACE = 0x0200;
        /// Declared `abstract`; must not be instantiated.
        const ABSTRACT = 0x0400;
        /// Declared `strictfp`; floating-point mode is FP-strict.
        const STRICT = 0x0800;
        /// Declared synthetic; not present in the source code.
        const SYNTHETIC = 0x1000;
        /// Declared as an annotation interface.
        const ANNOTATION = 0x2000;
        /// Declared as an enum class or enum constant.
        const ENUM = 0x4000;
        /// Carries the `Deprecated` attribute.
        ///
        /// Not a class file access bit; parsers fold the attribute into the
        /// flag set above the `u16` range, and this crate follows them.
        const DEPRECATED = 0x2_0000;
    }
}

impl AccessFlags {
    /// Whether the `public` flag is set.
    #[must_use]
    pub const fn is_public(self) -> bool {
        self.contains(Self::PUBLIC)
    }

    /// Whether the `private` flag is set.
    #[must_use]
    pub const fn is_private(self) -> bool {
        self.contains(Self::PRIVATE)
    }

    /// Whether the `protected` flag is set.
    #[must_use]
    pub const fn is_protected(self) -> bool {
        self.contains(Self::PROTECTED)
    }

    /// Whether the entity is package private, i.e. none of `public`,
    /// `protected`, or `private` is set.
    #[must_use]
    pub const fn is_package_private(self) -> bool {
        !self.intersects(Self::PUBLIC.union(Self::PRIVATE).union(Self::PROTECTED))
    }

    /// Whether the `static` flag is set.
    #[must_use]
    pub const fn is_static(self) -> bool {
        self.contains(Self::STATIC)
    }

    /// Whether the `final` flag is set.
    #[must_use]
    pub const fn is_final(self) -> bool {
        self.contains(Self::FINAL)
    }

    /// Whether the `abstract` flag is set.
    #[must_use]
    pub const fn is_abstract(self) -> bool {
        self.contains(Self::ABSTRACT)
    }

    /// Whether the entity is an interface.
    #[must_use]
    pub const fn is_interface(self) -> bool {
        self.contains(Self::INTERFACE)
    }

    /// Whether the entity is an annotation interface.
    #[must_use]
    pub const fn is_annotation(self) -> bool {
        self.contains(Self::ANNOTATION)
    }

    /// Whether the entity is an enum class or enum constant.
    #[must_use]
    pub const fn is_enum(self) -> bool {
        self.contains(Self::ENUM)
    }

    /// Whether the entity is compiler synthesized.
    #[must_use]
    pub const fn is_synthetic(self) -> bool {
        self.contains(Self::SYNTHETIC)
    }

    /// Whether the entity carries the deprecation flag.
    #[must_use]
    pub const fn is_deprecated(self) -> bool {
        self.contains(Self::DEPRECATED)
    }
}

/// A class, field, or method record, tagged by kind.
///
/// The three record kinds share a header of access flags and a name; this
/// union gives difference consumers uniform access to it.
#[derive(Debug, Clone, PartialEq)]
pub enum Info {
    /// A class record.
    Class(ClassInfo),
    /// A field record.
    Field(FieldInfo),
    /// A method record.
    Method(MethodInfo),
}

impl Info {
    /// The access flags of the underlying record.
    #[must_use]
    pub fn access(&self) -> AccessFlags {
        match self {
            Self::Class(class) => class.access,
            Self::Field(field) => field.access,
            Self::Method(method) => method.access,
        }
    }

    /// The name of the underlying record.
    ///
    /// For classes this is the binary name (`a/b/C$Inner`); for members it
    /// is the simple name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Class(class) => &class.name,
            Self::Field(field) => &field.name,
            Self::Method(method) => &method.name,
        }
    }

    /// The descriptor of the underlying member record, `None` for classes.
    #[must_use]
    pub fn descriptor(&self) -> Option<&str> {
        match self {
            Self::Class(_) => None,
            Self::Field(field) => Some(&field.descriptor),
            Self::Method(method) => Some(&method.descriptor),
        }
    }

    /// Whether the underlying record carries the deprecation flag.
    #[must_use]
    pub fn is_deprecated(&self) -> bool {
        self.access().is_deprecated()
    }
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;

    use super::AccessFlags;

    #[test]
    fn package_private_means_no_visibility_bit() {
        assert!(AccessFlags::STATIC.is_package_private());
        assert!(!AccessFlags::PUBLIC.is_package_private());
        assert!(!AccessFlags::PROTECTED.is_package_private());
        assert!(!(AccessFlags::PRIVATE | AccessFlags::FINAL).is_package_private());
    }

    #[test]
    fn deprecated_is_outside_the_class_file_range() {
        assert!(AccessFlags::DEPRECATED.bits() > u32::from(u16::MAX));
    }

    proptest! {

        #[test]
        fn predicates_match_bit_tests(bits in any::<u32>()) {
            let flags = AccessFlags::from_bits_truncate(bits);
            prop_assert_eq!(flags.is_public(), flags.contains(AccessFlags::PUBLIC));
            prop_assert_eq!(flags.is_deprecated(), flags.contains(AccessFlags::DEPRECATED));
            prop_assert_eq!(
                flags.is_package_private(),
                !flags.is_public() && !flags.is_private() && !flags.is_protected()
            );
        }
    }
}
