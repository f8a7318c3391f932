//! Document mapping - turns annotated records into JSON:API document trees.
//!
//! Every annotated field is classified by its role:
//!
//! | Role | Effect |
//! |------|--------|
//! | `primary,<type>` | sets `type` and `id`; an anonymous `primary` yields an empty `type` |
//! | `attr,<name>` | adds `attributes.<name>` unless the value is unset |
//! | `relation,<name>` | adds `relationships.<name>` when the related record is set and has a `primary` field |
//! | anything else | ignored |
//!
//! Relationships are only collected for single resources. Collections carry
//! identity and attributes only.

use serde_json::{json, Map, Value};
use tracing::debug;

use crate::error::MapError;
use crate::record::{Encode, Resource, Slot};
use crate::tag::{parse_role, parse_tag};
use crate::types::Role;

/// Identity of a related resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceIdentifier {
    /// Resource type; empty when the `primary` annotation is anonymous.
    pub type_name: String,
    pub id: String,
}

impl ResourceIdentifier {
    /// Returns the `{type, id}` mapping.
    pub fn to_value(&self) -> Value {
        json!({ "type": self.type_name, "id": self.id })
    }
}

/// Build a single resource document: `{"data": {type, id, attributes, relationships?}}`.
///
/// # Errors
///
/// Returns `MapError::Encode` if a field value cannot be represented as JSON.
pub fn resource_document<R: Resource + ?Sized>(record: &R) -> Result<Value, MapError> {
    let object = resource_object(record, true)?;
    Ok(envelope("data", Value::Object(object)))
}

/// Build a collection document: `{"data": [{type, id, attributes}, ...]}`.
///
/// Relationships are never collected here, even when the records declare them.
///
/// # Errors
///
/// Returns `MapError::Encode` if a field value cannot be represented as JSON.
pub fn resource_list_document<I>(records: I) -> Result<Value, MapError>
where
    I: IntoIterator,
    I::Item: Resource,
{
    let data = records
        .into_iter()
        .map(|record| resource_object(&record, false).map(Value::Object))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(envelope("data", Value::Array(data)))
}

/// Build an error document: `{"errors": [{"detail": .., "status": ".."}]}`.
pub fn error_document(status: u16, detail: &str) -> Value {
    json!({
        "errors": [
            { "detail": detail, "status": status.to_string() }
        ]
    })
}

/// Find the identity of a record from its first `primary` field.
///
/// Returns `None` if the record has no `primary` field.
pub fn identify<R: Resource + ?Sized>(record: &R) -> Result<Option<ResourceIdentifier>, MapError> {
    for field in record.fields() {
        if let Some(Role::Primary { type_name }) = parse_role(field.tag) {
            return Ok(Some(ResourceIdentifier {
                type_name: type_name.unwrap_or_default().to_string(),
                id: format_id(field.tag, &field.slot)?,
            }));
        }
    }
    Ok(None)
}

/// Text form of an id value: strings verbatim, null as empty, others as JSON.
pub fn id_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

// --- Internal implementation ---

fn resource_object<R: Resource + ?Sized>(
    record: &R,
    with_relationships: bool,
) -> Result<Map<String, Value>, MapError> {
    let mut type_name = None;
    let mut id = None;
    let mut attributes = Map::new();
    let mut relationships = Map::new();

    for field in record.fields() {
        let tokens = parse_tag(field.tag);
        let Some(role) = Role::parse(&tokens) else {
            if !tokens.is_empty() {
                debug!(tag = field.tag, "ignoring field with unknown role");
            }
            continue;
        };

        match role {
            Role::Primary { type_name: name } => {
                // Last primary field wins.
                if let Some(name) = name {
                    type_name = Some(name.to_string());
                }
                id = Some(format_id(field.tag, &field.slot)?);
            }
            Role::Attr { name: Some(name) } => match field.slot {
                Slot::Value(value) => {
                    attributes.insert(name.to_string(), encode(field.tag, value)?);
                }
                Slot::Absent => debug!(attribute = name, "omitting unset attribute"),
                Slot::Record(_) => {
                    debug!(attribute = name, "ignoring attribute bound to a record accessor")
                }
            },
            Role::Relation { name: Some(name) } if with_relationships => match field.slot {
                Slot::Record(related) => match identify(&*related)? {
                    Some(identifier) => {
                        relationships
                            .insert(name.to_string(), envelope("data", identifier.to_value()));
                    }
                    None => debug!(
                        relationship = name,
                        "omitting relationship to record without primary field"
                    ),
                },
                Slot::Absent => debug!(relationship = name, "omitting unset relationship"),
                Slot::Value(_) => {
                    debug!(relationship = name, "ignoring relationship bound to a plain value")
                }
            },
            _ => {}
        }
    }

    let mut object = Map::new();
    if let Some(id) = id {
        object.insert("type".to_string(), Value::String(type_name.unwrap_or_default()));
        object.insert("id".to_string(), Value::String(id));
    }
    object.insert("attributes".to_string(), Value::Object(attributes));
    if !relationships.is_empty() {
        object.insert("relationships".to_string(), Value::Object(relationships));
    }
    Ok(object)
}

fn format_id(tag: &str, slot: &Slot<'_>) -> Result<String, MapError> {
    match slot {
        Slot::Value(value) => Ok(id_text(&encode(tag, *value)?)),
        // Unset identity formats as the zero value.
        Slot::Absent | Slot::Record(_) => Ok(String::new()),
    }
}

fn encode(tag: &str, value: &dyn Encode) -> Result<Value, MapError> {
    value.encode().map_err(|source| MapError::Encode {
        tag: tag.to_string(),
        source,
    })
}

fn envelope(key: &str, value: Value) -> Value {
    let mut map = Map::new();
    map.insert(key.to_string(), value);
    Value::Object(map)
}
