use tracing::{debug, info, warn};

use super::{Resolution, SnapshotGenerator};
use crate::error::Result;
use crate::idgen::{self, IdGeneratorAdapter};
use crate::metadata::{IdGeneratorDescriptor, find_table_mapping};
use crate::model::{DatabaseObject, ObjectType, PrimaryKey, Schema, Table};
use crate::snapshot::DatabaseSnapshot;

/// Default resolver for tables; attaches mapped and identifier-generator
/// tables to schemas.
pub struct TableSnapshotGenerator {
    adapters: Vec<Box<dyn IdGeneratorAdapter>>,
    builtin: bool,
}

impl Default for TableSnapshotGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl TableSnapshotGenerator {
    /// Creates the generator with the built-in identifier-generator adapters.
    #[must_use]
    pub fn new() -> Self {
        Self {
            adapters: idgen::default_adapters(),
            builtin: true,
        }
    }

    /// Creates the generator with a custom adapter list, tried in order.
    ///
    /// Adapters may overlap; the earliest one claiming a descriptor wins.
    #[must_use]
    pub fn with_adapters(adapters: Vec<Box<dyn IdGeneratorAdapter>>) -> Self {
        Self {
            adapters,
            builtin: false,
        }
    }

    /// Names of the adapters in the order they are tried.
    pub fn adapter_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.adapters.iter().map(|a| a.name())
    }

    fn adapter_for(&self, descriptor: &IdGeneratorDescriptor) -> Option<&dyn IdGeneratorAdapter> {
        let mut claims = self.adapters.iter().filter(|a| a.supports(descriptor));
        let first = claims.next()?;
        if cfg!(debug_assertions) {
            let shadowed: Vec<&str> = claims.map(|a| a.name()).collect();
            debug_assert!(
                !self.builtin || shadowed.is_empty(),
                "built-in adapters overlap on {}: {} and {shadowed:?}",
                descriptor.strategy.tag(),
                first.name()
            );
            if !shadowed.is_empty() {
                warn!(
                    strategy = descriptor.strategy.tag(),
                    winner = first.name(),
                    ?shadowed,
                    "More than one identifier generator adapter claims the strategy"
                );
            }
        }
        Some(first.as_ref())
    }

    fn add_mapped_tables(
        &self,
        schema: &mut Schema,
        snapshot: &mut DatabaseSnapshot<'_>,
    ) -> Result<()> {
        let metadata = snapshot.metadata();
        for mapping in metadata.table_mappings()? {
            if !mapping.is_physical_table {
                debug!(table = %mapping.physical_name, "Skipping non-physical mapping");
                continue;
            }
            let example = Table::new(&mapping.physical_name).in_schema(schema.reference());
            info!("Found table {}", example.name);
            if let Some(table) = snapshot.include(example.into())? {
                schema.add_database_object(table)?;
            }
        }
        Ok(())
    }

    fn add_id_generator_tables(
        &self,
        schema: &mut Schema,
        snapshot: &mut DatabaseSnapshot<'_>,
    ) -> Result<()> {
        let metadata = snapshot.metadata();
        for binding in metadata.entity_bindings()? {
            if binding.is_inherited {
                debug!(
                    entity = %binding.entity_name,
                    "Subclass uses its root's identifier generator"
                );
                continue;
            }
            let Some(descriptor) = binding.identifier_generator.as_ref() else {
                continue;
            };
            let Some(adapter) = self.adapter_for(descriptor) else {
                continue;
            };
            let mut id_table = adapter.snapshot(descriptor);
            id_table.set_schema(schema.reference());
            info!(
                entity = %binding.entity_name,
                adapter = adapter.name(),
                "Found identifier generator table {}",
                id_table.name
            );
            let Some(DatabaseObject::Table(mut table)) = snapshot.include(id_table.clone().into())?
            else {
                continue;
            };
            // another strategy may already own a helper table of this name
            if merge_columns(&mut table, id_table, adapter.name()) {
                snapshot.remember(table.clone().into());
                schema.replace_database_object(table.into())?;
            } else {
                schema.add_database_object(table.into())?;
            }
        }
        Ok(())
    }
}

/// Adds the columns of `other` that `table` lacks. Returns whether any were
/// added.
fn merge_columns(table: &mut Table, other: Table, adapter: &str) -> bool {
    let mut added = Vec::new();
    for column in other.columns {
        let name = column.name.clone();
        if table.add_column(column) {
            added.push(name);
        }
    }
    if added.is_empty() {
        return false;
    }
    warn!(
        table = %table.name,
        adapter,
        ?added,
        "Identifier generator tables share a name, merging their columns"
    );
    true
}

impl SnapshotGenerator for TableSnapshotGenerator {
    fn name(&self) -> &'static str {
        "table"
    }

    fn default_for(&self) -> Option<ObjectType> {
        Some(ObjectType::Table)
    }

    fn adds_to(&self) -> &[ObjectType] {
        &[ObjectType::Schema]
    }

    fn snapshot_object(
        &self,
        example: DatabaseObject,
        snapshot: &mut DatabaseSnapshot<'_>,
    ) -> Result<Resolution> {
        if example.snapshot_id().is_some() {
            return Ok(Resolution::Found(example));
        }
        let mut example = match example {
            DatabaseObject::Table(table) => table,
            other => return Ok(Resolution::Unmapped(other)),
        };

        // identifier-generator tables are defined by their descriptor, never
        // by a table mapping
        if example.is_synthetic() {
            if example.schema.is_none() {
                example.set_schema(snapshot.config().default_schema_ref());
            }
            return Ok(Resolution::Found(example.into()));
        }

        let Some(mapping) = find_table_mapping(snapshot.metadata(), &example.name)? else {
            debug!(table = %example.name, "Table is not mapped");
            return Ok(Resolution::Unmapped(example.into()));
        };

        let schema = example
            .schema
            .clone()
            .unwrap_or_else(|| snapshot.config().default_schema_ref());
        let mut table = Table::new(&mapping.physical_name).in_schema(schema);
        if !mapping.primary_key.is_empty() {
            table = table.with_primary_key(PrimaryKey::new(mapping.primary_key.iter().cloned()));
        }
        Ok(Resolution::Found(table.into()))
    }

    fn add_to(
        &self,
        found: &mut DatabaseObject,
        snapshot: &mut DatabaseSnapshot<'_>,
    ) -> Result<()> {
        if !snapshot.control().should_include(ObjectType::Table) {
            return Ok(());
        }
        let DatabaseObject::Schema(schema) = found else {
            return Ok(());
        };
        self.add_mapped_tables(schema, snapshot)?;
        self.add_id_generator_tables(schema, snapshot)
    }
}
