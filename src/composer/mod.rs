//! # Composer Module
//!
//! Renders assembled resources into the final Swagger 2.0 YAML document.
//!
//! ## Templates
//!
//! Three Askama templates are compiled into the crate from `templates/`:
//!
//! - `definition.yaml` - the `<Name>` and `<Name>Input` schemas of one resource
//! - `resource.yaml` - the paths of one resource (list, create, batch get,
//!   get, patch, put, delete)
//! - `document.yaml` - the document skeleton with the health check path and
//!   the built-in `Patch`, `AnyValue`, `Error` and `Principal` schemas
//!
//! Fragments are concatenated in resource order and spliced under `paths:`
//! and `definitions:`. Nothing is reordered, deduplicated or validated.
//!
//! ## Usage
//!
//! ```rust
//! use swagen::composer::DocumentComposer;
//! use swagen::model::ServiceInfo;
//!
//! let doc = DocumentComposer::new()
//!     .compose(&ServiceInfo::new("Catalog", "api.example.com"), &[])
//!     .unwrap();
//! assert!(doc.starts_with("swagger: '2.0'"));
//! ```

use crate::error::GenerateError;
use crate::model::{Definition, DefinitionField, Resource, ServiceInfo};
use askama::Template;
use tracing::debug;


/// Template data for the schemas of one resource
#[derive(Template)]
#[template(path = "definition.yaml", escape = "none")]
pub struct DefinitionTemplateData<'a> {
    /// Schema name
    pub name: &'a str,
    /// `<Name>Input` schema name
    pub input_name: String,
    /// Every field, in column order
    pub fields: Vec<&'a DefinitionField>,
    /// Fields of the input schema (no `id`)
    pub input_fields: Vec<&'a DefinitionField>,
    /// Required input field names
    pub required: Vec<&'a str>,
}

impl<'a> DefinitionTemplateData<'a> {
    pub fn new(definition: &'a Definition) -> Self {
        Self {
            name: &definition.name,
            input_name: definition.input_name(),
            fields: definition.fields.iter().collect(),
            input_fields: definition.input_fields(),
            required: definition.required_input_fields(),
        }
    }
}

/// Template data for the paths of one resource.
///
/// The fragment is fixed apart from these names; the collection `GET`
/// always lists `limit` and `offset`.
#[derive(Template)]
#[template(path = "resource.yaml", escape = "none")]
pub struct ResourceTemplateData<'a> {
    pub title: &'a str,
    /// Path without the leading slash
    pub path: &'a str,
    pub definition_name: &'a str,
    pub input_name: String,
}

impl<'a> ResourceTemplateData<'a> {
    pub fn new(resource: &'a Resource) -> Self {
        Self {
            title: &resource.title,
            path: &resource.path,
            definition_name: &resource.definition.name,
            input_name: resource.definition.input_name(),
        }
    }
}

/// Template data for the full document
#[derive(Template)]
#[template(path = "document.yaml", escape = "none")]
pub struct DocumentTemplateData<'a> {
    pub service: &'a ServiceInfo,
    /// Concatenated resource fragments
    pub resources: String,
    /// Concatenated definition fragments
    pub definitions: String,
}

/// Renders resources into a document.
///
/// The templates are compiled in, so a composer holds no state and can be
/// shared freely.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentComposer;

impl DocumentComposer {
    pub fn new() -> Self {
        DocumentComposer
    }

    /// Render the paths of one resource.
    pub fn render_resource(&self, resource: &Resource) -> Result<String, GenerateError> {
        Ok(ResourceTemplateData::new(resource).render()?)
    }

    /// Render the `<Name>` and `<Name>Input` schemas of one definition.
    pub fn render_definition(&self, definition: &Definition) -> Result<String, GenerateError> {
        Ok(DefinitionTemplateData::new(definition).render()?)
    }

    /// Render the full document for `resources`, in the order given.
    pub fn compose(
        &self,
        service: &ServiceInfo,
        resources: &[Resource],
    ) -> Result<String, GenerateError> {
        let mut paths = String::new();
        let mut definitions = String::new();
        for resource in resources {
            paths.push_str(&self.render_resource(resource)?);
            definitions.push_str(&self.render_definition(&resource.definition)?);
        }

        let document = DocumentTemplateData {
            service,
            resources: paths,
            definitions,
        }
        .render()?;

        debug!(
            resources = resources.len(),
            bytes = document.len(),
            "Composed document"
        );
        Ok(document)
    }
}
