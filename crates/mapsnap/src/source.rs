//! Mapping sources.
//!
//! A connection URL resolves to a [`MappingDocument`]: either a registered
//! factory builds it, or the URL path is read as a JSON document.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use mapsnap_core::metadata::{EntityBinding, MappingEntry, MappingModel};

use crate::error::{BootstrapError, Result};
use crate::naming::PhysicalNamingStrategy;
use crate::url::{ConnectionUrl, SourceKind};

/// Keys naming the mapping dialect, in URL properties and document settings.
pub const DIALECT_KEYS: &[&str] = &["dialect", "hibernate.dialect"];

/// Keys naming the physical naming strategy.
pub const NAMING_STRATEGY_KEYS: &[&str] = &[
    "physical_naming_strategy",
    "hibernate.physical_naming_strategy",
];

/// An already-resolved mapping tree plus its settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingDocument {
    /// Configuration values such as the dialect.
    #[serde(default)]
    pub settings: BTreeMap<String, String>,
    /// Table mappings.
    #[serde(default)]
    pub tables: Vec<MappingEntry>,
    /// Entity bindings.
    #[serde(default)]
    pub entities: Vec<EntityBinding>,
}

impl MappingDocument {
    /// Reads a JSON mapping document.
    pub fn read(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| BootstrapError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| BootstrapError::Document {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Returns the first of `keys` with a non-blank value.
    #[must_use]
    pub fn setting(&self, keys: &[&str]) -> Option<&str> {
        keys.iter()
            .filter_map(|key| self.settings.get(*key))
            .map(String::as_str)
            .find(|v| !v.trim().is_empty())
    }

    /// Converts the document into the metadata the snapshot reads, applying
    /// the naming strategy to every table and column name.
    #[must_use]
    pub fn into_model(self, naming: PhysicalNamingStrategy) -> MappingModel {
        let tables = self
            .tables
            .into_iter()
            .map(|mut entry| {
                entry.physical_name = naming.apply(&entry.physical_name);
                for column in &mut entry.columns {
                    column.name = naming.apply(&column.name);
                }
                for key in &mut entry.primary_key {
                    *key = naming.apply(key);
                }
                entry
            })
            .collect();
        let entities = self
            .entities
            .into_iter()
            .map(|mut binding| {
                binding.table = binding.table.map(|t| naming.apply(&t));
                binding
            })
            .collect();
        MappingModel { tables, entities }
    }
}

/// Builds a mapping document for a URL.
pub type FactoryFn = fn(&ConnectionUrl) -> Result<MappingDocument>;

/// Named mapping factories, keyed by source kind.
#[derive(Debug, Clone, Default)]
pub struct SourceRegistry {
    factories: HashMap<(SourceKind, String), FactoryFn>,
}

impl SourceRegistry {
    /// Creates a registry with no factories.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a factory under a name for one source kind.
    #[must_use]
    pub fn register(
        mut self,
        kind: SourceKind,
        name: impl Into<String>,
        factory: FactoryFn,
    ) -> Self {
        self.factories.insert((kind, name.into()), factory);
        self
    }

    /// Returns the factory registered under `name`, if any.
    #[must_use]
    pub fn factory(&self, kind: SourceKind, name: &str) -> Option<FactoryFn> {
        self.factories.get(&(kind, name.to_string())).copied()
    }

    /// Loads the mapping document a URL points at.
    ///
    /// Paths containing a `/` are always files; other paths are first looked
    /// up as factory names.
    pub fn load(&self, url: &ConnectionUrl) -> Result<MappingDocument> {
        info!("Reading mapping configuration {url}");
        let path = url.path();
        if !path.contains('/') {
            if let Some(factory) = self.factory(url.kind(), path) {
                debug!(factory = path, kind = %url.kind(), "Using registered mapping factory");
                return factory(url);
            }
        }
        MappingDocument::read(Path::new(path))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use mapsnap_core::metadata::ColumnMapping;

    use super::*;

    fn auction(_url: &ConnectionUrl) -> Result<MappingDocument> {
        Ok(MappingDocument {
            tables: vec![MappingEntry::physical("ITEM")],
            ..MappingDocument::default()
        })
    }

    #[test]
    fn test_factory_wins_for_bare_name() {
        let registry =
            SourceRegistry::new().register(SourceKind::HibernateClassic, "auction", auction);
        let url: ConnectionUrl = "hibernate:classic:auction".parse().unwrap();

        let document = registry.load(&url).unwrap();
        assert_eq!(document.tables.len(), 1);
    }

    #[test]
    fn test_factory_is_per_kind() {
        let registry =
            SourceRegistry::new().register(SourceKind::HibernateClassic, "auction", auction);
        assert!(registry.factory(SourceKind::HibernateClassic, "auction").is_some());
        assert!(registry.factory(SourceKind::JpaPersistence, "auction").is_none());
    }

    #[test]
    fn test_reads_json_document() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let json = serde_json::json!({
            "settings": { "hibernate.dialect": "h2" },
            "tables": [{ "physical_name": "ITEM" }],
        });
        write!(file, "{json}").unwrap();

        let document = MappingDocument::read(file.path()).unwrap();
        assert_eq!(document.setting(DIALECT_KEYS), Some("h2"));
        assert!(document.tables[0].is_physical_table);
        assert!(document.entities.is_empty());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = MappingDocument::read(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, BootstrapError::Io { .. }));
    }

    #[test]
    fn test_malformed_file_is_document_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{\"tables\": 3}}").unwrap();
        let err = MappingDocument::read(file.path()).unwrap_err();
        assert!(matches!(err, BootstrapError::Document { .. }));
    }

    #[test]
    fn test_into_model_applies_naming() {
        let document = MappingDocument {
            tables: vec![MappingEntry::physical("OrderLine")
                .column(ColumnMapping::new("orderId"))
                .primary_key(["orderId"])],
            entities: vec![EntityBinding::root("OrderLine").table("OrderLine")],
            ..MappingDocument::default()
        };

        let model = document.into_model(PhysicalNamingStrategy::SnakeCase);
        assert_eq!(model.tables[0].physical_name, "order_line");
        assert_eq!(model.tables[0].columns[0].name, "order_id");
        assert_eq!(model.tables[0].primary_key, vec!["order_id"]);
        assert_eq!(model.entities[0].table.as_deref(), Some("order_line"));
        assert_eq!(model.entities[0].entity_name, "OrderLine");
    }

    #[test]
    fn test_blank_setting_is_ignored() {
        let mut document = MappingDocument::default();
        document.settings.insert("dialect".to_string(), "  ".to_string());
        document.settings.insert("hibernate.dialect".to_string(), "mysql".to_string());
        assert_eq!(document.setting(DIALECT_KEYS), Some("mysql"));
        assert_eq!(document.setting(NAMING_STRATEGY_KEYS), None);
    }
}
