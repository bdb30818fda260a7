use tracing::debug;

use super::{Resolution, SnapshotGenerator};
use crate::error::Result;
use crate::metadata::{ColumnMapping, find_table_mapping};
use crate::model::{Column, DatabaseObject, ObjectType, Table};
use crate::snapshot::DatabaseSnapshot;

/// Default resolver for columns; fills mapped tables with their columns.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColumnSnapshotGenerator;

fn column_from_mapping(mapping: &ColumnMapping, example: &Column) -> Column {
    let mut column = Column::new(&mapping.name);
    column.relation.clone_from(&example.relation);
    column.schema.clone_from(&example.schema);
    column.data_type.clone_from(&mapping.sql_type);
    column.nullable = mapping.nullable;
    column.default_value.clone_from(&mapping.default_value);
    column
}

impl SnapshotGenerator for ColumnSnapshotGenerator {
    fn name(&self) -> &'static str {
        "column"
    }

    fn default_for(&self) -> Option<ObjectType> {
        Some(ObjectType::Column)
    }

    fn adds_to(&self) -> &[ObjectType] {
        &[ObjectType::Table]
    }

    fn snapshot_object(
        &self,
        example: DatabaseObject,
        snapshot: &mut DatabaseSnapshot<'_>,
    ) -> Result<Resolution> {
        let column = match example {
            DatabaseObject::Column(column) if column.snapshot_id().is_none() => column,
            other => return Ok(Resolution::Unmapped(other)),
        };
        let Some(relation) = column.relation.clone() else {
            return Ok(Resolution::Unmapped(column.into()));
        };
        let found = find_table_mapping(snapshot.metadata(), &relation)?
            .and_then(|mapping| mapping.find_column(&column.name))
            .map(|mapping| column_from_mapping(mapping, &column));

        Ok(match found {
            Some(found) => Resolution::Found(found.into()),
            None => {
                debug!(table = %relation, column = %column.name, "Column is not mapped");
                Resolution::Unmapped(column.into())
            }
        })
    }

    fn add_to(
        &self,
        found: &mut DatabaseObject,
        snapshot: &mut DatabaseSnapshot<'_>,
    ) -> Result<()> {
        if !snapshot.control().should_include(ObjectType::Column) {
            return Ok(());
        }
        let DatabaseObject::Table(table) = found else {
            return Ok(());
        };
        if table.is_synthetic() {
            return Ok(());
        }
        let Some(mapping) = find_table_mapping(snapshot.metadata(), &table.name)? else {
            return Ok(());
        };
        for definition in &mapping.columns {
            add_column(table, &definition.name, snapshot)?;
        }
        Ok(())
    }
}

fn add_column(table: &mut Table, name: &str, snapshot: &mut DatabaseSnapshot<'_>) -> Result<()> {
    let example = Column::new(name).on_table(table);
    if let Some(DatabaseObject::Column(column)) = snapshot.include(example.into())? {
        table.add_column(column);
    }
    Ok(())
}
