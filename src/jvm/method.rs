//! Method records.

use super::AccessFlags;

/// The declared API of one method.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodInfo {
    /// The access flags of the method.
    pub access: AccessFlags,
    /// The binary name of the class declaring the method.
    pub class_name: String,
    /// The simple name of the method.
    pub name: String,
    /// The descriptor encoding parameter and return types, e.g.
    /// `(Ljava/lang/String;I)V`.
    pub descriptor: String,
    /// The generic signature of the method, if any.
    pub signature: Option<String>,
    /// The binary names of the declared checked exceptions.
    /// `None` when the method declares no `Exceptions` attribute at all.
    pub exceptions: Option<Vec<String>>,
}

impl MethodInfo {
    /// The method key: name and descriptor concatenated.
    ///
    /// Uniquely identifies an overload within its declaring class.
    #[must_use]
    pub fn key(&self) -> String {
        format!("{}{}", self.name, self.descriptor)
    }

    /// Returns a copy of the method with the deprecation flag forced on.
    #[must_use]
    pub fn clone_deprecated(&self) -> Self {
        Self {
            access: self.access | AccessFlags::DEPRECATED,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn key_distinguishes_overloads() {
        let unary = MethodInfo {
            access: AccessFlags::PUBLIC,
            class_name: "org/doppio/Sample".to_owned(),
            name: "run".to_owned(),
            descriptor: "(I)V".to_owned(),
            signature: None,
            exceptions: None,
        };
        let nullary = MethodInfo {
            descriptor: "()V".to_owned(),
            ..unary.clone()
        };

        assert_eq!("run(I)V", unary.key());
        assert_ne!(unary.key(), nullary.key());
    }
}
