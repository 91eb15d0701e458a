//! Field records and compile-time constant values.

use super::AccessFlags;

/// The declared API of one field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldInfo {
    /// The access flags of the field.
    pub access: AccessFlags,
    /// The binary name of the class declaring the field.
    pub class_name: String,
    /// The name of the field.
    pub name: String,
    /// The type descriptor of the field, e.g. `Ljava/lang/String;`.
    pub descriptor: String,
    /// The generic signature of the field, if any.
    pub signature: Option<String>,
    /// The compile-time constant value, for `static final` fields that
    /// carry a `ConstantValue` attribute.
    pub value: Option<ConstantValue>,
}

impl FieldInfo {
    /// Returns a copy of the field with the deprecation flag forced on.
    #[must_use]
    pub fn clone_deprecated(&self) -> Self {
        Self {
            access: self.access | AccessFlags::DEPRECATED,
            ..self.clone()
        }
    }
}

/// A compile-time constant value of a field.
///
/// The wire type is part of the value: an `Integer(0)` and a `Long(0)` are
/// different constants.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstantValue {
    /// An `int` constant (also `short`, `char`, `byte`, and `boolean`).
    Integer(i32),
    /// A `float` constant.
    Float(f32),
    /// A `long` constant.
    Long(i64),
    /// A `double` constant.
    Double(f64),
    /// A `String` constant.
    String(String),
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn constant_type_participates_in_equality() {
        assert_ne!(
            ConstantValue::Integer(0),
            ConstantValue::Long(0),
            "an int zero is not a long zero",
        );
        assert_eq!(ConstantValue::Integer(0), ConstantValue::Integer(0));
    }

    #[test]
    fn clone_deprecated_preserves_the_value() {
        let field = FieldInfo {
            access: AccessFlags::PUBLIC | AccessFlags::STATIC | AccessFlags::FINAL,
            class_name: "org/doppio/Sample".to_owned(),
            name: "LIMIT".to_owned(),
            descriptor: "I".to_owned(),
            signature: None,
            value: Some(ConstantValue::Integer(42)),
        };
        let deprecated = field.clone_deprecated();

        assert!(deprecated.access.is_deprecated());
        assert_eq!(field.value, deprecated.value);
        assert_eq!(field.descriptor, deprecated.descriptor);
    }
}
