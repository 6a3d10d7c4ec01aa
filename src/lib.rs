//! # swagen
//!
//! **swagen** generates a [Swagger 2.0](https://swagger.io/specification/v2/) document from
//! the column metadata of MySQL tables.
//!
//! ## Overview
//!
//! Each configured table becomes one REST resource: a collection path, a batch path and an
//! item path, plus a `<Name>` schema and a `<Name>Input` schema derived from the table's
//! columns. The document is rendered from Askama templates compiled into the crate.
//!
//! ## Architecture
//!
//! - **[`type_map`]** - Column type to schema type mapping
//! - **[`introspect`]** - Column listing: the [`ColumnIntrospector`] seam, MySQL and in-memory
//!   implementations
//! - **[`assembler`]** - Concurrent per-table assembly of [`model::Resource`] values
//! - **[`composer`]** - Template rendering of the final document
//! - **[`generator`]** - One end-to-end run
//! - **[`config`]** - YAML configuration and connection strings
//! - **[`cli`]** - The `swagen` binary
//! - **[`logging`]** - `tracing` subscriber setup
//!
//! ### Generation Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant CLI as CLI<br/>(swagen)
//!     participant Gen as Generator
//!     participant Asm as ResourceAssembler
//!     participant DB as ColumnIntrospector
//!     participant Comp as DocumentComposer
//!
//!     CLI->>Gen: generate()
//!     Gen->>Asm: assemble(resources)
//!     par each table
//!         Asm->>DB: columns_of(table)
//!         DB-->>Asm: Vec<ColumnMeta>
//!     end
//!     Asm-->>Gen: Vec<Resource> (configured order)
//!     Gen->>Comp: compose(service, resources)
//!     Comp-->>Gen: YAML
//!     Gen-->>CLI: YAML
//! ```
//!
//! Any failure aborts the run and no document is produced.
//!
//! ## Quick Start
//!
//! ```yaml
//! # swagen.yaml
//! db:
//!   dsn: "reader:secret@tcp(localhost:3306)/shop"
//! service:
//!   name: Catalog
//!   host: api.example.com
//! resources:
//!   products:
//!     title: Product
//! ```
//!
//! ```bash
//! swagen generate --config swagen.yaml > swagger.yaml
//! ```

pub mod assembler;
pub mod cli;
pub mod composer;
pub mod config;
pub mod error;
pub mod generator;
pub mod introspect;
pub mod logging;
pub mod model;
pub mod type_map;

pub use assembler::{AssemblerOptions, ErrorMode, ResourceAssembler, ResourceConfig};
pub use composer::DocumentComposer;
pub use error::GenerateError;
pub use generator::Generator;
pub use introspect::{ColumnIntrospector, ColumnMeta, IntrospectError};
pub use type_map::{map_column_type, TypeRegistry};
