//! Annotated records.
//!
//! A record exposes its mapping descriptor through [`Resource::fields`]: one
//! [`Field`] per annotated field, in declaration order. Each field pairs the
//! annotation string with a [`Slot`] that reads the field's current value.
//!
//! ```
//! use jsonapi_fixture::{Field, Resource};
//!
//! struct Person {
//!     id: u64,
//!     name: String,
//! }
//!
//! struct Widget {
//!     id: String,
//!     name: String,
//!     color: Option<String>,
//!     owner: Option<Person>,
//! }
//!
//! impl Resource for Person {
//!     fn fields(&self) -> Vec<Field<'_>> {
//!         vec![
//!             Field::primary("primary,people", &self.id),
//!             Field::attr("attr,name", &self.name),
//!         ]
//!     }
//! }
//!
//! impl Resource for Widget {
//!     fn fields(&self) -> Vec<Field<'_>> {
//!         vec![
//!             Field::primary("primary,widgets", &self.id),
//!             Field::attr("attr,name", &self.name),
//!             Field::optional("attr,color", self.color.as_ref()),
//!             Field::relation("relation,owner", self.owner.as_ref()),
//!         ]
//!     }
//! }
//! ```

use std::rc::Rc;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

/// Object-safe conversion of a field value into the document tree.
///
/// Implemented for every `Serialize` type.
pub trait Encode {
    fn encode(&self) -> Result<Value, serde_json::Error>;
}

impl<T: Serialize + ?Sized> Encode for T {
    fn encode(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// A record whose fields carry role annotations.
pub trait Resource {
    /// The record's mapping descriptor, in declaration order.
    fn fields(&self) -> Vec<Field<'_>>;
}

impl<T: Resource + ?Sized> Resource for &T {
    fn fields(&self) -> Vec<Field<'_>> {
        (**self).fields()
    }
}

impl<T: Resource + ?Sized> Resource for Box<T> {
    fn fields(&self) -> Vec<Field<'_>> {
        (**self).fields()
    }
}

impl<T: Resource + ?Sized> Resource for Rc<T> {
    fn fields(&self) -> Vec<Field<'_>> {
        (**self).fields()
    }
}

impl<T: Resource + ?Sized> Resource for Arc<T> {
    fn fields(&self) -> Vec<Field<'_>> {
        (**self).fields()
    }
}

/// An unset optional reference has an empty descriptor, so it maps to a
/// record with no identity and no attributes.
impl<R: Resource> Resource for Option<R> {
    fn fields(&self) -> Vec<Field<'_>> {
        match self {
            Some(record) => record.fields(),
            None => Vec::new(),
        }
    }
}

/// Accessor for a field's current value.
pub enum Slot<'a> {
    /// A present value.
    Value(&'a dyn Encode),
    /// An optional reference that is unset.
    Absent,
    /// A present reference to another annotated record.
    Record(Box<dyn Resource + 'a>),
}

impl Slot<'_> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Slot::Absent)
    }
}

impl std::fmt::Debug for Slot<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Slot::Value(_) => f.write_str("Value(..)"),
            Slot::Absent => f.write_str("Absent"),
            Slot::Record(_) => f.write_str("Record(..)"),
        }
    }
}

/// One entry of a mapping descriptor: annotation plus accessor.
#[derive(Debug)]
pub struct Field<'a> {
    /// Raw annotation, e.g. `"attr,name"`. Empty means no role.
    pub tag: &'a str,
    pub slot: Slot<'a>,
}

impl<'a> Field<'a> {
    pub fn new(tag: &'a str, slot: Slot<'a>) -> Self {
        Self { tag, slot }
    }

    /// Identity field. The value is formatted as text for `id`.
    pub fn primary<T: Serialize>(tag: &'a str, value: &'a T) -> Self {
        Self::new(tag, Slot::Value(value))
    }

    /// Field holding a direct value.
    pub fn attr<T: Serialize>(tag: &'a str, value: &'a T) -> Self {
        Self::new(tag, Slot::Value(value))
    }

    /// Field holding an optional reference; `None` is omitted from the document.
    pub fn optional<T: Serialize>(tag: &'a str, value: Option<&'a T>) -> Self {
        let slot = match value {
            Some(value) => Slot::Value(value),
            None => Slot::Absent,
        };
        Self::new(tag, slot)
    }

    /// Field holding an optional reference to another record.
    pub fn relation<R: Resource>(tag: &'a str, record: Option<&'a R>) -> Self {
        let slot = match record {
            Some(record) => Slot::Record(Box::new(record)),
            None => Slot::Absent,
        };
        Self::new(tag, slot)
    }

    /// Field holding another record by value.
    ///
    /// A record equal to its `Default` is the zero value and counts as unset.
    pub fn embedded<R>(tag: &'a str, record: &'a R) -> Self
    where
        R: Resource + Default + PartialEq,
    {
        if *record == R::default() {
            Self::new(tag, Slot::Absent)
        } else {
            Self::new(tag, Slot::Record(Box::new(record)))
        }
    }
}
