//! JSON:API Fixture Generator
//!
//! Builds JSON:API-style response documents from annotated records, for mock
//! HTTP servers in client-library tests.
//!
//! A record describes itself with a mapping descriptor: one annotated
//! [`Field`] per field, in declaration order. The document mapper classifies
//! each field by its annotation and assembles the document.
//!
//! # Example
//!
//! ```
//! use jsonapi_fixture::{resource_document, Field, Resource};
//!
//! struct Widget {
//!     id: String,
//!     name: String,
//!     color: Option<String>,
//! }
//!
//! impl Resource for Widget {
//!     fn fields(&self) -> Vec<Field<'_>> {
//!         vec![
//!             Field::primary("primary,widgets", &self.id),
//!             Field::attr("attr,name", &self.name),
//!             Field::optional("attr,color", self.color.as_ref()),
//!         ]
//!     }
//! }
//!
//! let widget = Widget { id: "42".into(), name: "bolt".into(), color: None };
//! let doc = resource_document(&widget).unwrap();
//!
//! assert_eq!(
//!     doc.to_string(),
//!     r#"{"data":{"type":"widgets","id":"42","attributes":{"name":"bolt"}}}"#
//! );
//! ```
//!
//! # Annotation Format
//!
//! `role[,name]`, split on commas with no trimming:
//!
//! | Annotation | Effect |
//! |------------|--------|
//! | `"primary,widgets"` | `type` is `widgets`, `id` is the field value as text |
//! | `"attr,name"` | `attributes.name` holds the value; unset optionals are omitted |
//! | `"relation,owner"` | `relationships.owner.data` holds the related record's `{type, id}` |
//! | `""` or any other role | field ignored |
//!
//! Collections (`resource_list_document`) carry identity and attributes only;
//! relationships are not collected for them.

mod dynamic;
mod emit;
mod error;
mod linter;
mod loader;
mod mapper;
mod record;
#[cfg(feature = "server")]
mod server;
mod tag;
mod types;
mod validator;

pub use dynamic::{
    dynamic_document, dynamic_list_document, is_zero, render, Descriptor, DynamicRecord, FieldSpec,
};
pub use emit::{
    emit_error, emit_raw, emit_resource, emit_resource_list, RecordedResponse, ResponseWriter,
};
pub use error::{EmitError, LoadError, MapError, SchemaError, ValidateError};
pub use linter::{lint, lint_file, Diagnostic, FileResult, FileStatus, LintResult, Severity};
pub use loader::{is_url, load_descriptor, load_json, load_json_auto, load_json_str, parse_descriptor};
pub use mapper::{
    error_document, id_text, identify, resource_document, resource_list_document,
    ResourceIdentifier,
};
pub use record::{Encode, Field, Resource, Slot};
pub use tag::{parse_role, parse_tag};
pub use types::{
    json_type_name, RenderMode, RenderOptions, Role, JSONAPI_CONTENT_TYPE, JSON_CONTENT_TYPE,
    KNOWN_ROLES,
};
pub use validator::{document_schema, validate_against_schema, validate_document};

#[cfg(feature = "remote")]
pub use loader::load_json_url;

#[cfg(feature = "server")]
pub use server::{FixtureServer, MockFixture};
