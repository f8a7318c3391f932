//! Document validation against the emitted wire shapes.

use serde_json::{json, Value};

use crate::error::{SchemaError, ValidateError};

/// JSON Schema accepted by [`validate_document`].
///
/// Covers the three shapes this crate emits: a single resource document, a
/// collection document, and an error document.
pub fn document_schema() -> Value {
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "$defs": {
            "identifier": {
                "type": "object",
                "properties": {
                    "type": { "type": "string" },
                    "id": { "type": "string" }
                },
                "required": ["type", "id"]
            },
            "resource": {
                "type": "object",
                "properties": {
                    "type": { "type": "string" },
                    "id": { "type": "string" },
                    "attributes": { "type": "object" },
                    "relationships": {
                        "type": "object",
                        "additionalProperties": {
                            "type": "object",
                            "properties": {
                                "data": { "$ref": "#/$defs/identifier" }
                            },
                            "required": ["data"],
                            "additionalProperties": false
                        }
                    }
                },
                "required": ["attributes"],
                "dependentRequired": { "id": ["type"] },
                "additionalProperties": false
            },
            "collection_item": {
                "allOf": [
                    { "$ref": "#/$defs/resource" },
                    { "not": { "required": ["relationships"] } }
                ]
            },
            "error": {
                "type": "object",
                "properties": {
                    "detail": { "type": "string" },
                    "status": { "type": "string", "pattern": "^[0-9]+$" }
                },
                "required": ["detail", "status"],
                "additionalProperties": false
            }
        },
        "oneOf": [
            {
                "type": "object",
                "properties": {
                    "data": {
                        "oneOf": [
                            { "$ref": "#/$defs/resource" },
                            {
                                "type": "array",
                                "items": { "$ref": "#/$defs/collection_item" }
                            }
                        ]
                    }
                },
                "required": ["data"],
                "additionalProperties": false
            },
            {
                "type": "object",
                "properties": {
                    "errors": {
                        "type": "array",
                        "items": { "$ref": "#/$defs/error" },
                        "minItems": 1
                    }
                },
                "required": ["errors"],
                "additionalProperties": false
            }
        ]
    })
}

/// Validate a document against [`document_schema`].
///
/// # Errors
///
/// Returns `ValidateError::Invalid` with every violation found.
pub fn validate_document(document: &Value) -> Result<(), ValidateError> {
    validate_against_schema(&document_schema(), document)
}

/// Validate a payload against an arbitrary JSON Schema.
pub fn validate_against_schema(schema: &Value, payload: &Value) -> Result<(), ValidateError> {
    let validator =
        jsonschema::validator_for(schema).map_err(|e| ValidateError::InvalidSchema {
            message: e.to_string(),
        })?;

    let errors: Vec<SchemaError> = validator
        .iter_errors(payload)
        .map(|e| SchemaError {
            path: e.instance_path.to_string(),
            message: e.to_string(),
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidateError::Invalid { errors })
    }
}
