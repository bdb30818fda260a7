//! Schema object model.
//!
//! These types make up the snapshot graph handed back to the host: schemas
//! own tables, tables own columns. Children refer to their parents by name
//! through [`SchemaRef`] and never own them. Names compare case-insensitively.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SnapshotError};

/// Kinds of object a snapshot can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectType {
    /// A schema (namespace of tables).
    Schema,
    /// A table, mapped or synthesized from an identifier generator.
    Table,
    /// A column of a table.
    Column,
}

impl ObjectType {
    /// Every object type, parents first.
    pub const ALL: [Self; 3] = [Self::Schema, Self::Table, Self::Column];

    /// Returns the lowercase type name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Schema => "schema",
            Self::Table => "table",
            Self::Column => "column",
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Opaque marker proving an object was already resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnapshotId(u64);

impl SnapshotId {
    pub(crate) const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Non-owning reference to the schema an object lives in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchemaRef {
    /// Catalog name, if the source supports catalogs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,
    /// Schema name.
    pub name: String,
}

impl SchemaRef {
    /// Creates a reference to a schema outside any catalog.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            catalog: None,
            name: name.into(),
        }
    }

    /// Sets the catalog.
    #[must_use]
    pub fn in_catalog(mut self, catalog: impl Into<String>) -> Self {
        self.catalog = Some(catalog.into());
        self
    }

    /// Returns whether both references name the same schema, ignoring case.
    #[must_use]
    pub fn matches(&self, other: &Self) -> bool {
        same_name(&self.name, &other.name)
            && same_name(
                self.catalog.as_deref().unwrap_or_default(),
                other.catalog.as_deref().unwrap_or_default(),
            )
    }
}

fn fold(name: &str) -> String {
    name.to_lowercase()
}

/// Returns whether two object names are equal, ignoring case.
///
/// Folds the same way snapshot identities do, so a lookup by name and a
/// cache hit always agree.
#[must_use]
pub fn same_name(a: &str, b: &str) -> bool {
    a == b || fold(a) == fold(b)
}

fn schema_path(schema: Option<&SchemaRef>) -> Vec<String> {
    schema.map_or_else(
        || vec![String::new(), String::new()],
        |s| {
            vec![
                fold(s.catalog.as_deref().unwrap_or_default()),
                fold(&s.name),
            ]
        },
    )
}

/// Identity of an object within one snapshot: type, case-folded path and
/// whether it was synthesized from an identifier generator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct ObjectKey {
    object_type: ObjectType,
    path: Vec<String>,
    synthetic: bool,
}

/// Primary key of a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryKey {
    /// Constraint name, if the mapping declares one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Key columns in order.
    pub columns: Vec<String>,
}

impl PrimaryKey {
    /// Creates an unnamed primary key over the given columns.
    #[must_use]
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: None,
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }
}

/// Where a table came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TableOrigin {
    /// A table (or view-like construct) declared in the mapping metadata.
    #[default]
    Mapped,
    /// A helper table backing an identifier generator.
    IdentifierGenerator {
        /// Strategy of the generator that produced it.
        strategy: String,
    },
}

/// A column of a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Column name.
    pub name: String,
    /// Name of the owning table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation: Option<String>,
    /// Schema of the owning table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaRef>,
    /// SQL type as declared by the mapping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    /// Whether the column allows NULL values.
    pub nullable: bool,
    /// Default value expression.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    snapshot_id: Option<SnapshotId>,
}

impl Column {
    /// Creates a nullable, untyped column.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            relation: None,
            schema: None,
            data_type: None,
            nullable: true,
            default_value: None,
            snapshot_id: None,
        }
    }

    /// Points the column at its owning table.
    #[must_use]
    pub fn on_table(mut self, table: &Table) -> Self {
        self.relation = Some(table.name.clone());
        self.schema = table.schema.clone();
        self
    }

    /// Sets the SQL type.
    #[must_use]
    pub fn of_type(mut self, data_type: impl Into<String>) -> Self {
        self.data_type = Some(data_type.into());
        self
    }

    /// Sets the column as NOT NULL.
    #[must_use]
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Sets the default value expression.
    #[must_use]
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Returns the snapshot identity, if resolved.
    #[must_use]
    pub const fn snapshot_id(&self) -> Option<SnapshotId> {
        self.snapshot_id
    }
}

/// A table inside a schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Table name.
    pub name: String,
    /// Schema the table lives in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaRef>,
    /// Columns in mapping order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<Column>,
    /// Primary key, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<PrimaryKey>,
    /// Whether the table is mapped or synthesized.
    #[serde(default)]
    pub origin: TableOrigin,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    snapshot_id: Option<SnapshotId>,
}

impl Table {
    /// Creates a mapped table with no schema.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: None,
            columns: Vec::new(),
            primary_key: None,
            origin: TableOrigin::Mapped,
            snapshot_id: None,
        }
    }

    /// Creates a helper table for an identifier generator strategy.
    #[must_use]
    pub fn synthetic(name: impl Into<String>, strategy: impl Into<String>) -> Self {
        Self {
            origin: TableOrigin::IdentifierGenerator {
                strategy: strategy.into(),
            },
            ..Self::new(name)
        }
    }

    /// Places the table, and its columns, in a schema.
    #[must_use]
    pub fn in_schema(mut self, schema: SchemaRef) -> Self {
        self.set_schema(schema);
        self
    }

    /// Places the table, and its columns, in a schema.
    pub fn set_schema(&mut self, schema: SchemaRef) {
        for column in &mut self.columns {
            column.schema = Some(schema.clone());
        }
        self.schema = Some(schema);
    }

    /// Appends a column, pointing it at this table.
    #[must_use]
    pub fn with_column(mut self, column: Column) -> Self {
        let column = column.on_table(&self);
        self.add_column(column);
        self
    }

    /// Sets the primary key.
    #[must_use]
    pub fn with_primary_key(mut self, primary_key: PrimaryKey) -> Self {
        self.primary_key = Some(primary_key);
        self
    }

    /// Adds a column unless one with the same name is already present.
    ///
    /// Returns whether the column was added.
    pub fn add_column(&mut self, column: Column) -> bool {
        if self.column(&column.name).is_some() {
            return false;
        }
        self.columns.push(column);
        true
    }

    /// Looks up a column by name, ignoring case.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|c| same_name(&c.name, name))
    }

    /// Returns whether the table backs an identifier generator.
    #[must_use]
    pub const fn is_synthetic(&self) -> bool {
        matches!(self.origin, TableOrigin::IdentifierGenerator { .. })
    }

    /// Returns the snapshot identity, if resolved.
    #[must_use]
    pub const fn snapshot_id(&self) -> Option<SnapshotId> {
        self.snapshot_id
    }
}

/// A schema and the objects attached to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// Schema name.
    pub name: String,
    /// Catalog name, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    snapshot_id: Option<SnapshotId>,
    #[serde(default)]
    objects: Vec<DatabaseObject>,
}

impl Schema {
    /// Creates an empty schema.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            catalog: None,
            snapshot_id: None,
            objects: Vec::new(),
        }
    }

    /// Sets the catalog.
    #[must_use]
    pub fn in_catalog(mut self, catalog: impl Into<String>) -> Self {
        self.catalog = Some(catalog.into());
        self
    }

    /// Returns a reference children can hold to this schema.
    #[must_use]
    pub fn reference(&self) -> SchemaRef {
        SchemaRef {
            catalog: self.catalog.clone(),
            name: self.name.clone(),
        }
    }

    /// Attaches a child object.
    ///
    /// Returns `Ok(false)` when an object with the same identity is already
    /// attached. Schemas cannot contain other schemas.
    pub fn add_database_object(&mut self, object: DatabaseObject) -> Result<bool> {
        if object.object_type() == ObjectType::Schema {
            return Err(SnapshotError::InvalidNesting {
                parent: ObjectType::Schema,
                child: ObjectType::Schema,
            });
        }
        let key = object.key();
        if self.objects.iter().any(|o| o.key() == key) {
            return Ok(false);
        }
        self.objects.push(object);
        Ok(true)
    }

    /// Attaches a child, replacing an attached object with the same
    /// identity in place.
    pub(crate) fn replace_database_object(&mut self, object: DatabaseObject) -> Result<()> {
        let key = object.key();
        if let Some(index) = self.objects.iter().position(|o| o.key() == key) {
            self.objects[index] = object;
            return Ok(());
        }
        self.add_database_object(object).map(|_| ())
    }

    /// All attached objects in attachment order.
    #[must_use]
    pub fn objects(&self) -> &[DatabaseObject] {
        &self.objects
    }

    /// Attached tables in attachment order.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.objects.iter().filter_map(DatabaseObject::as_table)
    }

    /// Looks up a table by name, ignoring case. Mapped tables win over
    /// identifier-generator tables of the same name.
    #[must_use]
    pub fn table(&self, name: &str) -> Option<&Table> {
        let mut matching = self
            .tables()
            .filter(|t| same_name(&t.name, name));
        let first = matching.next()?;
        if first.is_synthetic() {
            return matching.find(|t| !t.is_synthetic()).or(Some(first));
        }
        Some(first)
    }

    /// Returns the snapshot identity, if resolved.
    #[must_use]
    pub const fn snapshot_id(&self) -> Option<SnapshotId> {
        self.snapshot_id
    }
}

/// Any object that can appear in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DatabaseObject {
    /// A schema.
    Schema(Schema),
    /// A table.
    Table(Table),
    /// A column.
    Column(Column),
}

impl DatabaseObject {
    /// Returns the variant's object type.
    #[must_use]
    pub const fn object_type(&self) -> ObjectType {
        match self {
            Self::Schema(_) => ObjectType::Schema,
            Self::Table(_) => ObjectType::Table,
            Self::Column(_) => ObjectType::Column,
        }
    }

    /// Returns the object's name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Schema(s) => &s.name,
            Self::Table(t) => &t.name,
            Self::Column(c) => &c.name,
        }
    }

    /// Returns the schema the object lives in. Schemas have none.
    #[must_use]
    pub const fn schema(&self) -> Option<&SchemaRef> {
        match self {
            Self::Schema(_) => None,
            Self::Table(t) => t.schema.as_ref(),
            Self::Column(c) => c.schema.as_ref(),
        }
    }

    /// Returns the snapshot identity, if resolved.
    #[must_use]
    pub const fn snapshot_id(&self) -> Option<SnapshotId> {
        match self {
            Self::Schema(s) => s.snapshot_id,
            Self::Table(t) => t.snapshot_id,
            Self::Column(c) => c.snapshot_id,
        }
    }

    /// Sets the snapshot identity. An identity already present is kept.
    pub(crate) fn assign_snapshot_id(&mut self, id: SnapshotId) {
        let slot = match self {
            Self::Schema(s) => &mut s.snapshot_id,
            Self::Table(t) => &mut t.snapshot_id,
            Self::Column(c) => &mut c.snapshot_id,
        };
        debug_assert!(slot.is_none(), "snapshot identity assigned twice");
        if slot.is_none() {
            *slot = Some(id);
        }
    }

    /// Attaches a child to this object.
    ///
    /// Schemas accept tables and columns, tables accept columns.
    pub fn add_database_object(&mut self, child: Self) -> Result<bool> {
        match (self, child) {
            (Self::Schema(schema), child) => schema.add_database_object(child),
            (Self::Table(table), Self::Column(column)) => Ok(table.add_column(column)),
            (parent, child) => Err(SnapshotError::InvalidNesting {
                parent: parent.object_type(),
                child: child.object_type(),
            }),
        }
    }

    /// Returns the schema, if this is one.
    #[must_use]
    pub const fn as_schema(&self) -> Option<&Schema> {
        match self {
            Self::Schema(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the table, if this is one.
    #[must_use]
    pub const fn as_table(&self) -> Option<&Table> {
        match self {
            Self::Table(t) => Some(t),
            _ => None,
        }
    }

    /// Returns the column, if this is one.
    #[must_use]
    pub const fn as_column(&self) -> Option<&Column> {
        match self {
            Self::Column(c) => Some(c),
            _ => None,
        }
    }

    /// Converts into a schema, if this is one.
    #[must_use]
    pub fn into_schema(self) -> Option<Schema> {
        match self {
            Self::Schema(s) => Some(s),
            _ => None,
        }
    }

    /// Converts into a table, if this is one.
    #[must_use]
    pub fn into_table(self) -> Option<Table> {
        match self {
            Self::Table(t) => Some(t),
            _ => None,
        }
    }

    pub(crate) fn key(&self) -> ObjectKey {
        match self {
            Self::Schema(s) => ObjectKey {
                object_type: ObjectType::Schema,
                path: vec![
                    fold(s.catalog.as_deref().unwrap_or_default()),
                    fold(&s.name),
                ],
                synthetic: false,
            },
            Self::Table(t) => {
                let mut path = schema_path(t.schema.as_ref());
                path.push(fold(&t.name));
                ObjectKey {
                    object_type: ObjectType::Table,
                    path,
                    synthetic: t.is_synthetic(),
                }
            }
            Self::Column(c) => {
                let mut path = schema_path(c.schema.as_ref());
                path.push(fold(c.relation.as_deref().unwrap_or_default()));
                path.push(fold(&c.name));
                ObjectKey {
                    object_type: ObjectType::Column,
                    path,
                    synthetic: false,
                }
            }
        }
    }
}

impl From<Schema> for DatabaseObject {
    fn from(schema: Schema) -> Self {
        Self::Schema(schema)
    }
}

impl From<Table> for DatabaseObject {
    fn from(table: Table) -> Self {
        Self::Table(table)
    }
}

impl From<Column> for DatabaseObject {
    fn from(column: Column) -> Self {
        Self::Column(column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn public() -> SchemaRef {
        SchemaRef::new("PUBLIC")
    }

    #[test]
    fn test_keys_ignore_case() {
        let upper: DatabaseObject = Table::new("ORDERS").in_schema(public()).into();
        let lower: DatabaseObject = Table::new("orders")
            .in_schema(SchemaRef::new("public"))
            .into();
        assert_eq!(upper.key(), lower.key());
    }

    #[test]
    fn test_synthetic_table_keeps_own_identity() {
        let mapped: DatabaseObject = Table::new("hibernate_sequences")
            .in_schema(public())
            .into();
        let synthetic: DatabaseObject = Table::synthetic("hibernate_sequences", "table")
            .in_schema(public())
            .into();
        assert_ne!(mapped.key(), synthetic.key());

        let mut schema = Schema::new("PUBLIC");
        assert!(schema.add_database_object(mapped).unwrap());
        assert!(schema.add_database_object(synthetic).unwrap());
        assert_eq!(schema.tables().count(), 2);
        assert!(!schema.table("HIBERNATE_SEQUENCES").unwrap().is_synthetic());
    }

    #[test]
    fn test_schema_skips_duplicate_objects() {
        let mut schema = Schema::new("PUBLIC");
        assert!(schema
            .add_database_object(Table::new("ITEM").in_schema(public()).into())
            .unwrap());
        assert!(!schema
            .add_database_object(Table::new("item").in_schema(public()).into())
            .unwrap());
        assert_eq!(schema.objects().len(), 1);
    }

    #[test]
    fn test_invalid_nesting_is_rejected() {
        let mut schema = Schema::new("PUBLIC");
        let err = schema
            .add_database_object(Schema::new("OTHER").into())
            .unwrap_err();
        assert!(matches!(
            err,
            SnapshotError::InvalidNesting {
                parent: ObjectType::Schema,
                child: ObjectType::Schema
            }
        ));

        let mut table: DatabaseObject = Table::new("ITEM").into();
        assert!(table
            .add_database_object(Table::new("OTHER").into())
            .is_err());
        assert!(table
            .add_database_object(Column::new("ID").into())
            .unwrap());
    }

    #[test]
    fn test_snapshot_id_is_assigned_once() {
        let mut object: DatabaseObject = Table::new("ITEM").into();
        assert_eq!(object.snapshot_id(), None);
        object.assign_snapshot_id(SnapshotId::new(7));
        assert_eq!(object.snapshot_id().map(SnapshotId::get), Some(7));
    }

    #[test]
    fn test_table_builder_points_columns_at_table() {
        let table = Table::new("ITEM")
            .in_schema(public())
            .with_column(Column::new("ID").of_type("BIGINT").not_null());
        let id = table.column("id").unwrap();
        assert_eq!(id.relation.as_deref(), Some("ITEM"));
        assert_eq!(id.schema.as_ref(), Some(&public()));
        assert!(!id.nullable);
    }

    #[test]
    fn test_set_schema_moves_columns() {
        let mut table = Table::synthetic("hibernate_sequences", "table")
            .with_column(Column::new("next_val"));
        assert_eq!(table.columns[0].schema, None);

        table.set_schema(public());
        assert_eq!(table.columns[0].schema.as_ref(), Some(&public()));
    }

    #[test]
    fn test_schema_ref_matches_ignoring_case() {
        assert!(SchemaRef::new("Public").matches(&public()));
        assert!(!SchemaRef::new("PUBLIC")
            .in_catalog("MAIN")
            .matches(&public()));
    }

    #[test]
    fn test_same_name_folds_like_keys() {
        assert!(same_name("ÄRGER", "ärger"));
        assert!(!same_name("ORDERS", "ORDER"));

        let table = Table::new("ÄRGER").with_column(Column::new("Größe"));
        assert!(table.column("GRÖSSE").is_none());
        assert!(table.column("GRÖßE").is_some());
        assert_eq!(
            DatabaseObject::from(Table::new("ärger")).key(),
            DatabaseObject::from(Table::new("ÄRGER")).key()
        );
    }
}
