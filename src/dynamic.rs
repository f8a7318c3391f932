//! Data-driven records.
//!
//! Fixtures authored as JSON files pair a record value with a [`Descriptor`]
//! naming, per member, the annotation that applies to it. [`DynamicRecord`]
//! adapts the pair to [`Resource`] so the document mapper treats it exactly
//! like a hand-written record.
//!
//! ```
//! use jsonapi_fixture::{dynamic_document, Descriptor};
//! use serde_json::json;
//!
//! let descriptor: Descriptor = serde_json::from_value(json!({
//!     "fields": [
//!         { "field": "ID", "tag": "primary,widgets" },
//!         { "field": "Name", "tag": "attr,name" }
//!     ]
//! }))
//! .unwrap();
//!
//! let record = json!({ "ID": "42", "Name": "bolt" });
//! let doc = dynamic_document(&record, &descriptor).unwrap();
//! assert_eq!(doc["data"]["type"], "widgets");
//! assert_eq!(doc["data"]["attributes"]["name"], "bolt");
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::MapError;
use crate::mapper::{resource_document, resource_list_document};
use crate::record::{Field, Resource, Slot};
use crate::tag::parse_role;
use crate::types::{json_type_name, RenderMode, RenderOptions, Role};

/// Mapping descriptor for JSON-shaped records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Descriptor {
    pub fields: Vec<FieldSpec>,
}

/// One annotated member of a JSON record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Member name in the record object.
    pub field: String,
    /// Annotation, e.g. `"attr,name"`. Empty means no role.
    #[serde(default)]
    pub tag: String,
    /// Descriptor of the related record, for `relation` fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descriptor: Option<Box<Descriptor>>,
}

impl Descriptor {
    /// Create a descriptor from `(field, tag)` pairs.
    pub fn new<'s>(fields: impl IntoIterator<Item = (&'s str, &'s str)>) -> Self {
        Self {
            fields: fields
                .into_iter()
                .map(|(field, tag)| FieldSpec {
                    field: field.to_string(),
                    tag: tag.to_string(),
                    descriptor: None,
                })
                .collect(),
        }
    }

    /// Attach a nested descriptor to the named relation field.
    pub fn with_relation(mut self, field: &str, descriptor: Descriptor) -> Self {
        if let Some(spec) = self.fields.iter_mut().find(|spec| spec.field == field) {
            spec.descriptor = Some(Box::new(descriptor));
        }
        self
    }
}

/// A JSON value viewed through a descriptor.
#[derive(Debug, Clone, Copy)]
pub struct DynamicRecord<'a> {
    value: &'a Value,
    descriptor: &'a Descriptor,
}

impl<'a> DynamicRecord<'a> {
    pub fn new(value: &'a Value, descriptor: &'a Descriptor) -> Self {
        Self { value, descriptor }
    }
}

impl Resource for DynamicRecord<'_> {
    fn fields(&self) -> Vec<Field<'_>> {
        self.descriptor
            .fields
            .iter()
            .map(|spec| Field::new(&spec.tag, self.slot(spec)))
            .collect()
    }
}

impl<'a> DynamicRecord<'a> {
    fn slot(&self, spec: &'a FieldSpec) -> Slot<'a> {
        // Missing members and null are unset references.
        let member = match self.value.get(&spec.field) {
            None | Some(Value::Null) => return Slot::Absent,
            Some(member) => member,
        };

        match parse_role(&spec.tag) {
            Some(Role::Relation { .. }) => {
                if is_zero(member) {
                    return Slot::Absent;
                }
                match &spec.descriptor {
                    Some(nested) => Slot::Record(Box::new(DynamicRecord::new(member, nested))),
                    None => {
                        debug!(field = %spec.field, "relation field has no descriptor");
                        Slot::Absent
                    }
                }
            }
            _ => Slot::Value(member),
        }
    }
}

/// Whether a JSON value is the zero value of its type.
pub fn is_zero(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(arr) => arr.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

/// Build a single resource document from a JSON record.
pub fn dynamic_document(value: &Value, descriptor: &Descriptor) -> Result<Value, MapError> {
    resource_document(&DynamicRecord::new(value, descriptor))
}

/// Build a collection document from a JSON array of records.
///
/// # Errors
///
/// Returns `MapError::NotASequence` if `value` is not an array.
pub fn dynamic_list_document(value: &Value, descriptor: &Descriptor) -> Result<Value, MapError> {
    let Value::Array(items) = value else {
        return Err(MapError::NotASequence {
            actual: json_type_name(value),
        });
    };
    resource_list_document(
        items
            .iter()
            .map(|item| DynamicRecord::new(item, descriptor)),
    )
}

/// Map JSON records with a descriptor and encode the resulting document.
pub fn render(
    records: &Value,
    descriptor: &Descriptor,
    options: &RenderOptions,
) -> Result<String, MapError> {
    let document = match options.mode {
        RenderMode::Resource => dynamic_document(records, descriptor)?,
        RenderMode::List => dynamic_list_document(records, descriptor)?,
    };

    let encoded = if options.pretty {
        serde_json::to_string_pretty(&document)
    } else {
        serde_json::to_string(&document)
    };
    encoded.map_err(|source| MapError::Encode {
        tag: String::new(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn people() -> Descriptor {
        Descriptor::new([("ID", "primary,people"), ("Name", "attr,name")])
    }

    fn widgets() -> Descriptor {
        Descriptor::new([
            ("ID", "primary,widgets"),
            ("Name", "attr,name"),
            ("Color", "attr,color"),
            ("Owner", "relation,owner"),
            ("Notes", ""),
        ])
        .with_relation("Owner", people())
    }

    #[test]
    fn descriptor_from_json() {
        let descriptor: Descriptor = serde_json::from_value(json!({
            "fields": [
                { "field": "ID", "tag": "primary,widgets" },
                { "field": "Owner", "tag": "relation,owner", "descriptor": {
                    "fields": [ { "field": "ID", "tag": "primary,people" } ]
                } },
                { "field": "Notes" }
            ]
        }))
        .unwrap();

        assert_eq!(descriptor.fields.len(), 3);
        assert_eq!(descriptor.fields[2].tag, "");
        assert!(descriptor.fields[1].descriptor.is_some());
    }

    #[test]
    fn single_record_with_relationship() {
        let record = json!({
            "ID": "42",
            "Name": "bolt",
            "Color": null,
            "Owner": { "ID": 7, "Name": "ada" },
            "Notes": "skip me"
        });
        let doc = dynamic_document(&record, &widgets()).unwrap();

        assert_eq!(
            doc,
            json!({ "data": {
                "type": "widgets",
                "id": "42",
                "attributes": { "name": "bolt" },
                "relationships": { "owner": { "data": { "type": "people", "id": "7" } } }
            } })
        );
    }

    #[test]
    fn missing_and_null_members_are_absent() {
        let record = json!({ "ID": "1", "Owner": null });
        let doc = dynamic_document(&record, &widgets()).unwrap();

        assert_eq!(doc["data"]["attributes"], json!({}));
        assert!(doc["data"].get("relationships").is_none());
    }

    #[test]
    fn zero_relation_is_omitted() {
        let record = json!({ "ID": "1", "Owner": {} });
        let doc = dynamic_document(&record, &widgets()).unwrap();
        assert!(doc["data"].get("relationships").is_none());
    }

    #[test]
    fn relation_without_descriptor_is_omitted() {
        let descriptor = Descriptor::new([("ID", "primary,widgets"), ("Owner", "relation,owner")]);
        let record = json!({ "ID": "1", "Owner": { "ID": 2 } });
        let doc = dynamic_document(&record, &descriptor).unwrap();
        assert!(doc["data"].get("relationships").is_none());
    }

    #[test]
    fn attribute_keeps_nested_values() {
        let descriptor = Descriptor::new([("ID", "primary,widgets"), ("Size", "attr,size")]);
        let record = json!({ "ID": 5, "Size": { "w": 1, "h": [2, 3] } });
        let doc = dynamic_document(&record, &descriptor).unwrap();

        assert_eq!(doc["data"]["id"], "5");
        assert_eq!(doc["data"]["attributes"]["size"], json!({ "w": 1, "h": [2, 3] }));
    }

    #[test]
    fn list_skips_relationships() {
        let records = json!([
            { "ID": "1", "Name": "a", "Owner": { "ID": 7 } },
            { "ID": "2", "Name": "b" }
        ]);
        let doc = dynamic_list_document(&records, &widgets()).unwrap();

        assert_eq!(
            doc,
            json!({ "data": [
                { "type": "widgets", "id": "1", "attributes": { "name": "a" } },
                { "type": "widgets", "id": "2", "attributes": { "name": "b" } }
            ] })
        );
    }

    #[test]
    fn list_null_element_degrades_to_zero_identity() {
        let records = json!([null]);
        let doc = dynamic_list_document(&records, &widgets()).unwrap();
        assert_eq!(
            doc,
            json!({ "data": [ { "type": "widgets", "id": "", "attributes": {} } ] })
        );
    }

    #[test]
    fn list_requires_array() {
        let result = dynamic_list_document(&json!({ "ID": "1" }), &widgets());
        assert!(matches!(
            result,
            Err(MapError::NotASequence { actual: "object" })
        ));

        let result = dynamic_list_document(&json!("nope"), &widgets());
        assert!(matches!(
            result,
            Err(MapError::NotASequence { actual: "string" })
        ));
    }

    #[test]
    fn is_zero_values() {
        assert!(is_zero(&json!(null)));
        assert!(is_zero(&json!(false)));
        assert!(is_zero(&json!(0)));
        assert!(is_zero(&json!(0.0)));
        assert!(is_zero(&json!("")));
        assert!(is_zero(&json!([])));
        assert!(is_zero(&json!({})));
        assert!(!is_zero(&json!(1)));
        assert!(!is_zero(&json!("x")));
        assert!(!is_zero(&json!({ "ID": 1 })));
    }

    #[test]
    fn render_compact_and_pretty() {
        let record = json!({ "ID": "42", "Name": "bolt" });
        let compact = render(&record, &people(), &RenderOptions::new(RenderMode::Resource)).unwrap();
        assert_eq!(
            compact,
            r#"{"data":{"type":"people","id":"42","attributes":{"name":"bolt"}}}"#
        );

        let pretty = render(
            &record,
            &people(),
            &RenderOptions::new(RenderMode::Resource).pretty(true),
        )
        .unwrap();
        assert!(pretty.contains("{\n"));
    }

    #[test]
    fn render_list_requires_array() {
        let result = render(
            &json!({}),
            &people(),
            &RenderOptions::new(RenderMode::List),
        );
        assert!(matches!(result, Err(MapError::NotASequence { .. })));
    }
}
