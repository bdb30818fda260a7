//! Mapping metadata consumed by the snapshot generators.
//!
//! The ORM configuration has already been parsed by the time a snapshot
//! runs; generators only see it through [`MetadataProvider`]. The
//! [`MappingModel`] type is the in-memory provider produced by bootstrap.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::same_name;

/// Read-only access to a resolved mapping tree.
///
/// Both queries fail only when the mapping tree itself is unusable.
pub trait MetadataProvider {
    /// Every table-level mapping, physical or not, in declaration order.
    fn table_mappings(&self) -> Result<&[MappingEntry]>;

    /// Every entity binding, roots and subclasses, in declaration order.
    fn entity_bindings(&self) -> Result<&[EntityBinding]>;
}

/// Finds the first table mapping whose physical name matches, ignoring case.
pub fn find_table_mapping<'m>(
    metadata: &'m dyn MetadataProvider,
    name: &str,
) -> Result<Option<&'m MappingEntry>> {
    Ok(metadata
        .table_mappings()?
        .iter()
        .find(|m| same_name(&m.physical_name, name)))
}

const fn default_true() -> bool {
    true
}

/// A column declared by a table mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    /// Physical column name.
    pub name: String,
    /// SQL type, if the mapping fixes one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sql_type: Option<String>,
    /// Whether the column allows NULL values.
    #[serde(default = "default_true")]
    pub nullable: bool,
    /// Default value expression.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

impl ColumnMapping {
    /// Creates a nullable, untyped column mapping.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sql_type: None,
            nullable: true,
            default_value: None,
        }
    }

    /// Sets the SQL type.
    #[must_use]
    pub fn sql_type(mut self, sql_type: impl Into<String>) -> Self {
        self.sql_type = Some(sql_type.into());
        self
    }

    /// Sets the column as NOT NULL.
    #[must_use]
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }
}

/// One table-level unit of the mapping tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingEntry {
    /// Physical table name.
    pub physical_name: String,
    /// `false` for logical or view-like constructs.
    #[serde(default = "default_true")]
    pub is_physical_table: bool,
    /// Column definitions in mapping order.
    #[serde(default)]
    pub columns: Vec<ColumnMapping>,
    /// Primary key column names.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub primary_key: Vec<String>,
}

impl MappingEntry {
    /// Creates a physical table mapping.
    #[must_use]
    pub fn physical(name: impl Into<String>) -> Self {
        Self {
            physical_name: name.into(),
            is_physical_table: true,
            columns: Vec::new(),
            primary_key: Vec::new(),
        }
    }

    /// Creates a logical (non-physical) mapping.
    #[must_use]
    pub fn logical(name: impl Into<String>) -> Self {
        Self {
            is_physical_table: false,
            ..Self::physical(name)
        }
    }

    /// Adds a column definition.
    #[must_use]
    pub fn column(mut self, column: ColumnMapping) -> Self {
        self.columns.push(column);
        self
    }

    /// Sets the primary key columns.
    #[must_use]
    pub fn primary_key<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.primary_key = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Looks up a column definition by name, ignoring case.
    #[must_use]
    pub fn find_column(&self, name: &str) -> Option<&ColumnMapping> {
        self.columns
            .iter()
            .find(|c| same_name(&c.name, name))
    }
}

/// Identifier generation strategy of an entity hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeneratorStrategy {
    /// Hi-lo values kept in one shared table, one row per key.
    MultipleHiLoPerTable,
    /// Generic table-backed generator.
    Table,
    /// Database sequence.
    Sequence,
    /// Identity/auto-increment column.
    Identity,
    /// Application-assigned identifiers.
    Assigned,
    /// A strategy this crate does not know by name.
    Custom(String),
}

impl GeneratorStrategy {
    /// Returns the strategy tag.
    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            Self::MultipleHiLoPerTable => "multiple_hilo_per_table",
            Self::Table => "table",
            Self::Sequence => "sequence",
            Self::Identity => "identity",
            Self::Assigned => "assigned",
            Self::Custom(name) => name,
        }
    }
}

/// Strategy tag plus the strategy's configured parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdGeneratorDescriptor {
    /// Which strategy generates identifiers.
    pub strategy: GeneratorStrategy,
    /// Strategy-specific parameters.
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
}

impl IdGeneratorDescriptor {
    /// Creates a descriptor with no parameters.
    #[must_use]
    pub const fn new(strategy: GeneratorStrategy) -> Self {
        Self {
            strategy,
            parameters: BTreeMap::new(),
        }
    }

    /// Sets a parameter.
    #[must_use]
    pub fn parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    /// Returns a parameter, or `default` when it is missing or blank.
    #[must_use]
    pub fn parameter_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.parameters
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(default)
    }
}

/// One mapped class and its identity strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityBinding {
    /// Entity (class) name.
    pub entity_name: String,
    /// Table the entity maps to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    /// `true` for subclasses; only roots own an identifier generator.
    #[serde(default)]
    pub is_inherited: bool,
    /// Identifier generator of the hierarchy root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier_generator: Option<IdGeneratorDescriptor>,
}

impl EntityBinding {
    /// Creates a root binding with no identifier generator.
    #[must_use]
    pub fn root(entity_name: impl Into<String>) -> Self {
        Self {
            entity_name: entity_name.into(),
            table: None,
            is_inherited: false,
            identifier_generator: None,
        }
    }

    /// Creates a subclass binding.
    #[must_use]
    pub fn inherited(entity_name: impl Into<String>) -> Self {
        Self {
            is_inherited: true,
            ..Self::root(entity_name)
        }
    }

    /// Sets the mapped table.
    #[must_use]
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Sets the identifier generator.
    #[must_use]
    pub fn generator(mut self, descriptor: IdGeneratorDescriptor) -> Self {
        self.identifier_generator = Some(descriptor);
        self
    }
}

/// In-memory mapping tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingModel {
    /// Table mappings.
    #[serde(default)]
    pub tables: Vec<MappingEntry>,
    /// Entity bindings.
    #[serde(default)]
    pub entities: Vec<EntityBinding>,
}

impl MappingModel {
    /// Creates an empty model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a table mapping.
    #[must_use]
    pub fn table(mut self, entry: MappingEntry) -> Self {
        self.tables.push(entry);
        self
    }

    /// Adds an entity binding.
    #[must_use]
    pub fn entity(mut self, binding: EntityBinding) -> Self {
        self.entities.push(binding);
        self
    }
}

impl MetadataProvider for MappingModel {
    fn table_mappings(&self) -> Result<&[MappingEntry]> {
        Ok(&self.tables)
    }

    fn entity_bindings(&self) -> Result<&[EntityBinding]> {
        Ok(&self.entities)
    }
}
