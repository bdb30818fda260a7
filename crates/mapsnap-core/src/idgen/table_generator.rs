use super::{IdGeneratorAdapter, length_parameter};
use crate::metadata::{GeneratorStrategy, IdGeneratorDescriptor};
use crate::model::{Column, PrimaryKey, Table};

const TABLE: &str = "table_name";
const SEGMENT_COLUMN: &str = "segment_column_name";
const VALUE_COLUMN: &str = "value_column_name";
const SEGMENT_LENGTH: &str = "segment_value_length";

const DEFAULT_TABLE: &str = "hibernate_sequences";
const DEFAULT_SEGMENT_COLUMN: &str = "sequence_name";
const DEFAULT_VALUE_COLUMN: &str = "next_val";
const DEFAULT_SEGMENT_LENGTH: u32 = 255;

/// Generic table-backed generator: one segment row per sequence.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableGeneratorAdapter;

impl IdGeneratorAdapter for TableGeneratorAdapter {
    fn name(&self) -> &'static str {
        "table-generator"
    }

    fn supports(&self, descriptor: &IdGeneratorDescriptor) -> bool {
        descriptor.strategy == GeneratorStrategy::Table
    }

    fn snapshot(&self, descriptor: &IdGeneratorDescriptor) -> Table {
        let segment = descriptor.parameter_or(SEGMENT_COLUMN, DEFAULT_SEGMENT_COLUMN);
        let value = descriptor.parameter_or(VALUE_COLUMN, DEFAULT_VALUE_COLUMN);
        let length = length_parameter(descriptor, SEGMENT_LENGTH, DEFAULT_SEGMENT_LENGTH);

        Table::synthetic(
            descriptor.parameter_or(TABLE, DEFAULT_TABLE),
            descriptor.strategy.tag(),
        )
        .with_column(
            Column::new(segment)
                .of_type(format!("VARCHAR({length})"))
                .not_null(),
        )
        .with_column(Column::new(value).of_type("BIGINT").not_null())
        .with_primary_key(PrimaryKey::new([segment]))
    }
}
