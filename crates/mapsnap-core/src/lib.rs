//! Treat an ORM mapping as if it were a live database.
//!
//! `mapsnap-core` reads resolved mapping metadata (table mappings, entity
//! bindings, identifier generators) and produces the same schema object
//! graph a schema-comparison tool would get from a real connection.
//!
//! # Architecture
//!
//! - **Model** - [`Schema`](model::Schema), [`Table`](model::Table) and
//!   [`Column`](model::Column) objects with resolve-once snapshot identities
//! - **Metadata** - the [`MetadataProvider`](metadata::MetadataProvider) the
//!   generators query, and the in-memory [`MappingModel`](metadata::MappingModel)
//! - **Generators** - a registry of snapshot generators dispatched by object
//!   type: one default resolver per type, plus augmenters that attach
//!   children to results of other types
//! - **Identifier-generator adapters** - turn table-backed id strategies
//!   into synthetic helper tables
//! - **Snapshot** - the per-run session holding the cache and the scope
//!
//! # Example
//!
//! ```rust
//! use mapsnap_core::prelude::*;
//!
//! let model = MappingModel::new()
//!     .table(MappingEntry::physical("ITEM").column(ColumnMapping::new("ID").not_null()))
//!     .entity(
//!         EntityBinding::root("Item")
//!             .table("ITEM")
//!             .generator(IdGeneratorDescriptor::new(GeneratorStrategy::Table)),
//!     );
//!
//! let registry = GeneratorRegistry::standard()?;
//! let config = SnapshotConfig::default();
//! let mut snapshot = DatabaseSnapshot::new(&registry, &model, &config, SnapshotControl::all());
//!
//! let schema = snapshot
//!     .include(Schema::new("PUBLIC").into())?
//!     .and_then(DatabaseObject::into_schema)
//!     .expect("schemas always resolve");
//!
//! let names: Vec<_> = schema.tables().map(|t| t.name.as_str()).collect();
//! assert_eq!(names, ["ITEM", "hibernate_sequences"]);
//! # Ok::<(), mapsnap_core::error::SnapshotError>(())
//! ```

pub mod config;
pub mod control;
pub mod error;
pub mod generator;
pub mod idgen;
pub mod metadata;
pub mod model;
pub mod snapshot;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::{Dialect, SnapshotConfig, DEFAULT_SCHEMA};
    pub use crate::control::SnapshotControl;
    pub use crate::error::{Result, SnapshotError};
    pub use crate::generator::{
        ColumnSnapshotGenerator, GeneratorRegistry, HostResolver, RegistryBuilder, Resolution,
        SnapshotGenerator, StructuralResolver, TableSnapshotGenerator,
    };
    pub use crate::idgen::{
        IdGeneratorAdapter, MultipleHiLoPerTableAdapter, TableGeneratorAdapter,
    };
    pub use crate::metadata::{
        ColumnMapping, EntityBinding, GeneratorStrategy, IdGeneratorDescriptor, MappingEntry,
        MappingModel, MetadataProvider,
    };
    pub use crate::model::{
        Column, DatabaseObject, ObjectType, PrimaryKey, Schema, SchemaRef, SnapshotId, Table,
        TableOrigin,
    };
    pub use crate::snapshot::DatabaseSnapshot;
}
