//! Snapshot reports.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use mapsnap_core::config::Dialect;
use mapsnap_core::model::{Column, Schema, Table, TableOrigin};

use crate::bootstrap::MappingSession;

/// A resolved schema plus where and when it was captured.
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotReport {
    /// Product name of the mapping source.
    pub source: String,
    /// Connection URL of the mapping source.
    pub url: String,
    /// Dialect the mapping targets.
    pub dialect: Dialect,
    /// When the snapshot was taken.
    pub captured_at: DateTime<Utc>,
    /// Whether the dialect indexes every foreign key.
    pub creates_indexes_for_foreign_keys: bool,
    /// The resolved schema.
    pub schema: Schema,
}

impl SnapshotReport {
    /// Creates a report captured now.
    #[must_use]
    pub fn new(session: &MappingSession, schema: Schema) -> Self {
        let config = session.config();
        Self {
            source: session.url().kind().product_name().to_string(),
            url: session.url().to_string(),
            dialect: config.dialect,
            captured_at: Utc::now(),
            creates_indexes_for_foreign_keys: config.creates_indexes_for_foreign_keys(),
            schema,
        }
    }

    /// Renders the report as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    fn write_text(&self, out: &mut impl fmt::Write) -> fmt::Result {
        writeln!(out, "{} ({}), dialect {}", self.source, self.url, self.dialect)?;
        writeln!(
            out,
            "captured {}",
            self.captured_at.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        writeln!(
            out,
            "schema {}{}",
            self.schema.name,
            id_suffix(self.schema.snapshot_id())
        )?;
        for table in self.schema.tables() {
            write_table(out, table)?;
        }
        Ok(())
    }
}

fn id_suffix(id: Option<mapsnap_core::model::SnapshotId>) -> String {
    id.map(|id| format!(" {id}")).unwrap_or_default()
}

fn write_table(out: &mut impl fmt::Write, table: &Table) -> fmt::Result {
    write!(out, "  table {}", table.name)?;
    if let TableOrigin::IdentifierGenerator { strategy } = &table.origin {
        write!(out, " (identifier generator: {strategy})")?;
    }
    if let Some(pk) = &table.primary_key {
        write!(out, " [pk: {}]", pk.columns.join(", "))?;
    }
    writeln!(out, "{}", id_suffix(table.snapshot_id()))?;
    for column in &table.columns {
        write_column(out, column)?;
    }
    Ok(())
}

fn write_column(out: &mut impl fmt::Write, column: &Column) -> fmt::Result {
    write!(out, "    column {}", column.name)?;
    if let Some(data_type) = &column.data_type {
        write!(out, " {data_type}")?;
    }
    if !column.nullable {
        out.write_str(" NOT NULL")?;
    }
    if let Some(default) = &column.default_value {
        write!(out, " DEFAULT {default}")?;
    }
    writeln!(out, "{}", id_suffix(column.snapshot_id()))
}

impl fmt::Display for SnapshotReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_text(f)
    }
}
