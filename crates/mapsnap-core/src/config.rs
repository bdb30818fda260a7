//! Session configuration.
//!
//! Bootstrap builds one [`SnapshotConfig`] per mapping source and hands it to
//! the snapshot by reference; nothing changes it afterwards.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::SchemaRef;

/// Schema name used when a request does not name one.
pub const DEFAULT_SCHEMA: &str = "PUBLIC";

/// Target database dialect of the mapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// No specific database.
    #[default]
    Generic,
    /// H2.
    H2,
    /// HSQLDB.
    Hsql,
    /// MySQL and MariaDB.
    MySql,
    /// PostgreSQL.
    PostgreSql,
    /// Oracle.
    Oracle,
    /// Microsoft SQL Server.
    SqlServer,
    /// SQLite.
    Sqlite,
}

impl Dialect {
    /// Returns the dialect name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::H2 => "h2",
            Self::Hsql => "hsql",
            Self::MySql => "mysql",
            Self::PostgreSql => "postgresql",
            Self::Oracle => "oracle",
            Self::SqlServer => "sqlserver",
            Self::Sqlite => "sqlite",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a dialect name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown dialect '{0}'")]
pub struct UnknownDialect(pub String);

impl FromStr for Dialect {
    type Err = UnknownDialect;

    /// Accepts short names (`mysql`) as well as qualified dialect class names
    /// (`org.hibernate.dialect.MySQL8Dialect`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        // first match wins
        let table: [(&str, Self); 12] = [
            ("mariadb", Self::MySql),
            ("mysql", Self::MySql),
            ("postgres", Self::PostgreSql),
            ("sqlserver", Self::SqlServer),
            ("mssql", Self::SqlServer),
            ("sqlite", Self::Sqlite),
            ("oracle", Self::Oracle),
            ("hsql", Self::Hsql),
            ("h2", Self::H2),
            ("generic", Self::Generic),
            ("ansi", Self::Generic),
            ("standard", Self::Generic),
        ];
        table
            .iter()
            .find(|(needle, _)| lowered.contains(needle))
            .map(|(_, dialect)| *dialect)
            .ok_or_else(|| UnknownDialect(s.to_string()))
    }
}

/// Immutable settings shared by every generator of one snapshot session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotConfig {
    /// Dialect the mapping targets.
    pub dialect: Dialect,
    /// Schema assumed for objects requested without one.
    pub default_schema: String,
    /// Catalog assumed for objects requested without one.
    pub default_catalog: Option<String>,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self::new(Dialect::Generic)
    }
}

impl SnapshotConfig {
    /// Creates a configuration for the given dialect.
    #[must_use]
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            default_schema: DEFAULT_SCHEMA.to_string(),
            default_catalog: None,
        }
    }

    /// Sets the default schema name.
    #[must_use]
    pub fn with_default_schema(mut self, schema: impl Into<String>) -> Self {
        self.default_schema = schema.into();
        self
    }

    /// Sets the default catalog name.
    #[must_use]
    pub fn with_default_catalog(mut self, catalog: impl Into<String>) -> Self {
        self.default_catalog = Some(catalog.into());
        self
    }

    /// Reference to the default schema.
    #[must_use]
    pub fn default_schema_ref(&self) -> SchemaRef {
        SchemaRef {
            catalog: self.default_catalog.clone(),
            name: self.default_schema.clone(),
        }
    }

    /// Whether the target creates an index for every foreign key.
    #[must_use]
    pub const fn creates_indexes_for_foreign_keys(&self) -> bool {
        matches!(self.dialect, Dialect::MySql)
    }

    /// Mapping sources always support schemas.
    #[must_use]
    pub const fn supports_schemas(&self) -> bool {
        true
    }

    /// Mapping sources never support catalogs.
    #[must_use]
    pub const fn supports_catalogs(&self) -> bool {
        false
    }

    /// Object names are compared case-insensitively.
    #[must_use]
    pub const fn is_case_sensitive(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_from_short_name() {
        assert_eq!("mysql".parse::<Dialect>().unwrap(), Dialect::MySql);
        assert_eq!("PostgreSQL".parse::<Dialect>().unwrap(), Dialect::PostgreSql);
        assert_eq!("h2".parse::<Dialect>().unwrap(), Dialect::H2);
    }

    #[test]
    fn test_dialect_from_class_name() {
        assert_eq!(
            "org.hibernate.dialect.MySQL8Dialect".parse::<Dialect>().unwrap(),
            Dialect::MySql
        );
        assert_eq!(
            "org.hibernate.dialect.HSQLDialect".parse::<Dialect>().unwrap(),
            Dialect::Hsql
        );
        assert_eq!(
            "org.hibernate.dialect.SQLServer2012Dialect"
                .parse::<Dialect>()
                .unwrap(),
            Dialect::SqlServer
        );
    }

    #[test]
    fn test_unknown_dialect() {
        let err = "db2".parse::<Dialect>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown dialect 'db2'");
    }

    #[test]
    fn test_foreign_key_indexes_only_for_mysql() {
        assert!(SnapshotConfig::new(Dialect::MySql).creates_indexes_for_foreign_keys());
        assert!(!SnapshotConfig::new(Dialect::PostgreSql).creates_indexes_for_foreign_keys());
    }

    #[test]
    fn test_default_schema_ref() {
        let config = SnapshotConfig::default();
        assert_eq!(config.default_schema_ref(), SchemaRef::new("PUBLIC"));
        assert!(!config.is_case_sensitive());
    }
}
