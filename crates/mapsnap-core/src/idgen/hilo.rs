use super::{IdGeneratorAdapter, length_parameter};
use crate::metadata::{GeneratorStrategy, IdGeneratorDescriptor};
use crate::model::{Column, PrimaryKey, Table};

const TABLE: &str = "table";
const PK_COLUMN: &str = "primary_key_column";
const VALUE_COLUMN: &str = "value_column";
const PK_LENGTH: &str = "primary_key_length";

const DEFAULT_TABLE: &str = "hibernate_sequences";
const DEFAULT_PK_COLUMN: &str = "sequence_name";
const DEFAULT_VALUE_COLUMN: &str = "sequence_next_hi_value";
const DEFAULT_PK_LENGTH: u32 = 255;

/// Hi-lo generator keeping one row per key in a shared table.
#[derive(Debug, Clone, Copy, Default)]
pub struct MultipleHiLoPerTableAdapter;

impl IdGeneratorAdapter for MultipleHiLoPerTableAdapter {
    fn name(&self) -> &'static str {
        "multiple-hilo-per-table"
    }

    fn supports(&self, descriptor: &IdGeneratorDescriptor) -> bool {
        descriptor.strategy == GeneratorStrategy::MultipleHiLoPerTable
    }

    fn snapshot(&self, descriptor: &IdGeneratorDescriptor) -> Table {
        let key = descriptor.parameter_or(PK_COLUMN, DEFAULT_PK_COLUMN);
        let value = descriptor.parameter_or(VALUE_COLUMN, DEFAULT_VALUE_COLUMN);
        let length = length_parameter(descriptor, PK_LENGTH, DEFAULT_PK_LENGTH);

        Table::synthetic(
            descriptor.parameter_or(TABLE, DEFAULT_TABLE),
            descriptor.strategy.tag(),
        )
        .with_column(Column::new(key).of_type(format!("VARCHAR({length})")).not_null())
        .with_column(Column::new(value).of_type("INTEGER").not_null())
        .with_primary_key(PrimaryKey::new([key]))
    }
}
