#![allow(dead_code)]

use std::cell::Cell;
use std::io;

use mapsnap_core::prelude::*;

/// Wraps a mapping model and counts every query made against it.
pub struct CountingProvider {
    model: MappingModel,
    table_queries: Cell<usize>,
    entity_queries: Cell<usize>,
}

impl CountingProvider {
    pub fn new(model: MappingModel) -> Self {
        Self {
            model,
            table_queries: Cell::new(0),
            entity_queries: Cell::new(0),
        }
    }

    pub fn lookups(&self) -> usize {
        self.table_queries.get() + self.entity_queries.get()
    }
}

impl MetadataProvider for CountingProvider {
    fn table_mappings(&self) -> Result<&[MappingEntry]> {
        self.table_queries.set(self.table_queries.get() + 1);
        self.model.table_mappings()
    }

    fn entity_bindings(&self) -> Result<&[EntityBinding]> {
        self.entity_queries.set(self.entity_queries.get() + 1);
        self.model.entity_bindings()
    }
}

/// A provider whose mapping tree could not be loaded.
pub struct BrokenProvider;

impl MetadataProvider for BrokenProvider {
    fn table_mappings(&self) -> Result<&[MappingEntry]> {
        Err(SnapshotError::configuration_caused_by(
            "cannot enumerate table mappings",
            io::Error::new(io::ErrorKind::NotFound, "orm.xml is missing"),
        ))
    }

    fn entity_bindings(&self) -> Result<&[EntityBinding]> {
        Err(SnapshotError::configuration("cannot enumerate entity bindings"))
    }
}

pub fn standard_registry() -> GeneratorRegistry {
    GeneratorRegistry::standard().unwrap_or_else(|e| panic!("standard registry: {e}"))
}

/// Resolves one schema against `metadata` with the standard registry.
pub fn snapshot_schema(
    metadata: &dyn MetadataProvider,
    name: &str,
    control: SnapshotControl,
) -> Schema {
    let registry = standard_registry();
    let config = SnapshotConfig::default();
    let mut snapshot = DatabaseSnapshot::new(&registry, metadata, &config, control);
    match snapshot.include(Schema::new(name).into()) {
        Ok(Some(DatabaseObject::Schema(schema))) => schema,
        other => panic!("Expected a schema, got {other:?}"),
    }
}

pub fn table_names(schema: &Schema) -> Vec<&str> {
    schema.tables().map(|t| t.name.as_str()).collect()
}

/// Orders, customers and a view-like mapping.
pub fn shop_model() -> MappingModel {
    MappingModel::new()
        .table(
            MappingEntry::physical("ORDERS")
                .column(ColumnMapping::new("ID").sql_type("BIGINT").not_null())
                .column(ColumnMapping::new("CUSTOMER_ID").sql_type("BIGINT"))
                .primary_key(["ID"]),
        )
        .table(
            MappingEntry::physical("CUSTOMERS")
                .column(ColumnMapping::new("ID").sql_type("BIGINT").not_null())
                .primary_key(["ID"]),
        )
        .table(MappingEntry::logical("ORDER_VIEW"))
}
