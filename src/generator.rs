//! # Generator Module
//!
//! Runs one generation: assemble every configured table, then compose the
//! document.
//!
//! ```text
//! ResourceConfig[] ──► ResourceAssembler ──► Resource[] ──► DocumentComposer ──► YAML
//!                           │
//!                           ├─ ColumnIntrospector (columns per table)
//!                           └─ TypeRegistry (column type → field type)
//! ```
//!
//! The run is all or nothing: any error means no document.
//!
//! ## Usage
//!
//! ```rust
//! use swagen::assembler::ResourceConfig;
//! use swagen::generator::Generator;
//! use swagen::introspect::{ColumnMeta, MemoryIntrospector};
//! use swagen::model::ServiceInfo;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), swagen::GenerateError> {
//! let source = MemoryIntrospector::new().with_table(
//!     "products",
//!     vec![
//!         ColumnMeta::new("id", "BIGINT", false),
//!         ColumnMeta::new("name", "VARCHAR", false),
//!     ],
//! );
//! let doc = Generator::new(source, ServiceInfo::new("Catalog", "api.example.com"))
//!     .with_resources(vec![ResourceConfig::new("products", "Product")])
//!     .generate()
//!     .await?;
//! assert!(doc.contains("/products:"));
//! # Ok(())
//! # }
//! ```

use crate::assembler::{AssemblerOptions, ResourceAssembler, ResourceConfig};
use crate::composer::DocumentComposer;
use crate::error::GenerateError;
use crate::introspect::ColumnIntrospector;
use crate::model::ServiceInfo;
use crate::type_map::TypeRegistry;
use tracing::{info, info_span, Instrument};

/// Generates the document for a service and its configured tables.
pub struct Generator<I> {
    assembler: ResourceAssembler<I>,
    composer: DocumentComposer,
    service: ServiceInfo,
    resources: Vec<ResourceConfig>,
}

impl<I: ColumnIntrospector> Generator<I> {
    pub fn new(introspector: I, service: ServiceInfo) -> Self {
        Self {
            assembler: ResourceAssembler::new(introspector),
            composer: DocumentComposer::new(),
            service,
            resources: Vec::new(),
        }
    }

    /// Tables to expose, in document order.
    pub fn with_resources(mut self, resources: Vec<ResourceConfig>) -> Self {
        self.resources = resources;
        self
    }

    pub fn with_registry(mut self, registry: TypeRegistry) -> Self {
        self.assembler = self.assembler.with_registry(registry);
        self
    }

    pub fn with_options(mut self, options: AssemblerOptions) -> Self {
        self.assembler = self.assembler.with_options(options);
        self
    }

    pub fn service(&self) -> &ServiceInfo {
        &self.service
    }

    pub fn resources(&self) -> &[ResourceConfig] {
        &self.resources
    }

    /// Produce the document text.
    pub async fn generate(&self) -> Result<String, GenerateError> {
        let span = info_span!(
            "generate",
            service = %self.service.name,
            tables = self.resources.len()
        );
        async {
            let resources = self.assembler.assemble(&self.resources).await?;
            let document = self.composer.compose(&self.service, &resources)?;
            info!(resources = resources.len(), "Generated document");
            Ok::<_, GenerateError>(document)
        }
        .instrument(span)
        .await
    }
}
