//! # Model Module
//!
//! Value types shared by the assembler and the composer.
//!
//! A generation run builds these once and never mutates them afterwards:
//!
//! ```text
//! ResourceConfig ──► Resource { title, path, Definition, Request }
//!                                      │
//!                                      └─► Vec<DefinitionField { FieldType }>
//! ```
//!
//! Field order inside a [`Definition`] is the column order reported by the
//! introspector, and it is visible in the rendered document.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Name of the server-assigned field that is left out of `<Name>Input` schemas.
pub const ID_FIELD: &str = "id";

/// Service metadata substituted into the document header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInfo {
    /// API title (`info.title`)
    pub name: String,
    /// Host the API is served from (`host`)
    pub host: String,
}

impl ServiceInfo {
    pub fn new(name: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
        }
    }
}

/// Schema-facing type of a field, e.g. `integer` with `format: int64`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldType {
    /// Swagger primitive name: `string`, `integer` or `boolean`
    pub name: String,
    /// Additional schema keys rendered next to `type`, in key order
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra_properties: BTreeMap<String, String>,
}

impl FieldType {
    /// A field type without extra properties.
    pub fn plain(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extra_properties: BTreeMap::new(),
        }
    }

    /// A field type carrying a `format` hint.
    pub fn with_format(name: impl Into<String>, format: impl Into<String>) -> Self {
        Self::plain(name).with_property("format", format)
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_properties.insert(key.into(), value.into());
        self
    }
}

/// One property of a definition; there is one per table column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinitionField {
    pub name: String,
    pub field_type: FieldType,
    pub is_nullable: bool,
}

impl DefinitionField {
    /// True for the server-assigned `id` field.
    pub fn is_id(&self) -> bool {
        self.name == ID_FIELD
    }
}

/// The schema describing the full representation of a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    pub name: String,
    pub fields: Vec<DefinitionField>,
}

impl Definition {
    pub fn new(name: impl Into<String>, fields: Vec<DefinitionField>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Name of the create/update body schema, `<Name>Input`.
    pub fn input_name(&self) -> String {
        format!("{}Input", self.name)
    }

    /// Fields accepted in request bodies: everything but `id`.
    pub fn input_fields(&self) -> Vec<&DefinitionField> {
        self.fields.iter().filter(|f| !f.is_id()).collect()
    }

    /// Names of the input fields that must be present, in field order.
    ///
    /// Nullable fields are never required.
    pub fn required_input_fields(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| !f.is_id() && !f.is_nullable)
            .map(|f| f.name.as_str())
            .collect()
    }
}

/// A request parameter, e.g. the `limit` query parameter of a list call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestParam {
    /// Parameter location (`query`, `path`, `body`)
    #[serde(rename = "in")]
    pub location: String,
    pub name: String,
    pub required: bool,
    pub field_type: FieldType,
    #[serde(default)]
    pub description: String,
}

impl RequestParam {
    /// An optional query parameter.
    pub fn query(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            location: "query".to_string(),
            name: name.into(),
            required: false,
            field_type,
            description: String::new(),
        }
    }
}

/// Parameters accepted by a request against a resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub params: Vec<RequestParam>,
}

/// A table exposed through CRUD-style operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// Human readable name used in summaries, e.g. `Product`
    pub title: String,
    /// URL path segment without the leading slash, e.g. `order-items`
    pub path: String,
    pub definition: Definition,
    pub get: Request,
}
