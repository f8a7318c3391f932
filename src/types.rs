//! Core types for JSON:API fixture generation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Content type of resource, collection and error documents.
pub const JSONAPI_CONTENT_TYPE: &str = "application/vnd.api+json";

/// Content type of raw (non resource-oriented) documents.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Role kinds understood by the document mapper.
pub const KNOWN_ROLES: &[&str] = &["primary", "attr", "relation"];

/// Returns the JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Role of an annotated field, classified from its parsed tag tokens.
///
/// The first token is the role kind; the second, when present, is the
/// resource type name (`primary`) or the wire name (`attr`, `relation`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role<'a> {
    /// Identity of the record: resource type plus id value.
    Primary { type_name: Option<&'a str> },
    /// Plain payload value stored under `attributes`.
    Attr { name: Option<&'a str> },
    /// Singular reference to another annotated record.
    Relation { name: Option<&'a str> },
}

impl<'a> Role<'a> {
    /// Classify a token list.
    ///
    /// Returns `None` for an empty list or an unrecognized role kind; the
    /// caller ignores such fields.
    pub fn parse(tokens: &[&'a str]) -> Option<Self> {
        let (kind, rest) = tokens.split_first()?;
        let name = rest.first().copied();
        match *kind {
            "primary" => Some(Role::Primary { type_name: name }),
            "attr" => Some(Role::Attr { name }),
            "relation" => Some(Role::Relation { name }),
            _ => None,
        }
    }

    /// Returns the role kind as written in a tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Role::Primary { .. } => "primary",
            Role::Attr { .. } => "attr",
            Role::Relation { .. } => "relation",
        }
    }

    /// Returns the second tag token, if any.
    pub fn name(&self) -> Option<&'a str> {
        match *self {
            Role::Primary { type_name } => type_name,
            Role::Attr { name } | Role::Relation { name } => name,
        }
    }
}

/// Shape of the document produced by [`render`](crate::render).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// One resource object under `data`, relationships included.
    #[default]
    Resource,
    /// An array of resource objects under `data`, relationships never included.
    List,
}

impl RenderMode {
    /// Create a mode from a list flag (true = List, false = Resource).
    pub fn from_list_flag(is_list: bool) -> Self {
        if is_list {
            RenderMode::List
        } else {
            RenderMode::Resource
        }
    }
}

/// Options for rendering dynamic records.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Single resource or collection.
    pub mode: RenderMode,
    /// Pretty-print the encoded document.
    pub pretty: bool,
}

impl RenderOptions {
    /// Create render options with compact output.
    pub fn new(mode: RenderMode) -> Self {
        Self {
            mode,
            pretty: false,
        }
    }

    /// Set pretty printing.
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}
