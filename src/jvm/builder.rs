//! Assembling [`ClassInfo`] records from class file parser events.
//!
//! The byte-level parser is a collaborator of this crate, not part of it.
//! Whatever parser is used, it reports one class as a header event, a
//! sequence of field and method events, and an end event; the builder here
//! folds that sequence into a single immutable [`ClassInfo`].

use std::collections::{BTreeMap, btree_map::Entry};

use super::{AccessFlags, ClassInfo, ClassVersion, ConstantValue, FieldInfo, MethodInfo};

/// An inconsistency in the event sequence for one class.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum MalformedClassError {
    /// A member or end event arrived before the header event.
    #[error("class member or end visited before the class header")]
    MissingHeader,
    /// A second header event arrived before the end event.
    #[error("class header visited twice")]
    DuplicateHeader,
    /// Two methods in one class share a method key.
    #[error("duplicate method key `{key}` within one class")]
    DuplicateMethod {
        /// The colliding method key (name plus descriptor).
        key: String,
    },
    /// Two fields in one class share a name.
    #[error("duplicate field `{name}` within one class")]
    DuplicateField {
        /// The colliding field name.
        name: String,
    },
}

/// Builds one [`ClassInfo`] per visited class.
///
/// [`visit_end`](Self::visit_end) yields the finished record and resets the
/// builder, so one instance can serve a whole artifact when classes are
/// parsed sequentially. The builder holds per-class state and is not meant
/// to be shared across threads; give each concurrent parse its own
/// instance.
#[derive(Debug, Default)]
pub struct ClassInfoBuilder {
    header: Option<Header>,
    methods: BTreeMap<String, MethodInfo>,
    fields: BTreeMap<String, FieldInfo>,
}

#[derive(Debug)]
struct Header {
    version: ClassVersion,
    access: AccessFlags,
    name: String,
    signature: Option<String>,
    super_name: Option<String>,
    interfaces: Vec<String>,
}

impl ClassInfoBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Visits the class header.
    ///
    /// # Errors
    /// [`MalformedClassError::DuplicateHeader`] if a header was already
    /// visited for the current class.
    pub fn visit_header(
        &mut self,
        version: ClassVersion,
        access: AccessFlags,
        name: String,
        signature: Option<String>,
        super_name: Option<String>,
        interfaces: Vec<String>,
    ) -> Result<(), MalformedClassError> {
        if self.header.is_some() {
            return Err(MalformedClassError::DuplicateHeader);
        }
        self.header = Some(Header {
            version,
            access,
            name,
            signature,
            super_name,
            interfaces,
        });
        Ok(())
    }

    /// Visits one declared field.
    ///
    /// # Errors
    /// [`MalformedClassError::MissingHeader`] if no header was visited yet,
    /// [`MalformedClassError::DuplicateField`] on a field name collision.
    pub fn visit_field(
        &mut self,
        access: AccessFlags,
        name: String,
        descriptor: String,
        signature: Option<String>,
        value: Option<ConstantValue>,
    ) -> Result<(), MalformedClassError> {
        let header = self.header.as_ref().ok_or(MalformedClassError::MissingHeader)?;
        let field = FieldInfo {
            access,
            class_name: header.name.clone(),
            name,
            descriptor,
            signature,
            value,
        };
        match self.fields.entry(field.name.clone()) {
            Entry::Occupied(entry) => Err(MalformedClassError::DuplicateField {
                name: entry.key().clone(),
            }),
            Entry::Vacant(entry) => {
                entry.insert(field);
                Ok(())
            }
        }
    }

    /// Visits one declared method.
    ///
    /// # Errors
    /// [`MalformedClassError::MissingHeader`] if no header was visited yet,
    /// [`MalformedClassError::DuplicateMethod`] on a method key collision.
    pub fn visit_method(
        &mut self,
        access: AccessFlags,
        name: String,
        descriptor: String,
        signature: Option<String>,
        exceptions: Option<Vec<String>>,
    ) -> Result<(), MalformedClassError> {
        let header = self.header.as_ref().ok_or(MalformedClassError::MissingHeader)?;
        let method = MethodInfo {
            access,
            class_name: header.name.clone(),
            name,
            descriptor,
            signature,
            exceptions,
        };
        match self.methods.entry(method.key()) {
            Entry::Occupied(entry) => Err(MalformedClassError::DuplicateMethod {
                key: entry.key().clone(),
            }),
            Entry::Vacant(entry) => {
                entry.insert(method);
                Ok(())
            }
        }
    }

    /// Finishes the current class and resets the builder for the next one.
    ///
    /// # Errors
    /// [`MalformedClassError::MissingHeader`] if no header was visited.
    pub fn visit_end(&mut self) -> Result<ClassInfo, MalformedClassError> {
        let header = self.header.take().ok_or(MalformedClassError::MissingHeader)?;
        Ok(ClassInfo {
            version: header.version,
            access: header.access,
            name: header.name,
            signature: header.signature,
            super_name: header.super_name,
            interfaces: header.interfaces,
            methods: std::mem::take(&mut self.methods),
            fields: std::mem::take(&mut self.fields),
        })
    }
}
