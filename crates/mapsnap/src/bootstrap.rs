//! Opening mapping sources.
//!
//! [`Bootstrap::open`] parses a connection URL, loads the mapping document,
//! settles the dialect and naming strategy, and hands back a
//! [`MappingSession`] ready to be snapshotted.

use std::str::FromStr;

use tracing::info;

use mapsnap_core::config::{Dialect, SnapshotConfig, UnknownDialect};
use mapsnap_core::control::SnapshotControl;
use mapsnap_core::error::SnapshotError;
use mapsnap_core::generator::GeneratorRegistry;
use mapsnap_core::metadata::MappingModel;
use mapsnap_core::model::{DatabaseObject, Schema};
use mapsnap_core::snapshot::DatabaseSnapshot;

use crate::error::{BootstrapError, Result};
use crate::naming::PhysicalNamingStrategy;
use crate::source::{DIALECT_KEYS, MappingDocument, NAMING_STRATEGY_KEYS, SourceRegistry};
use crate::url::ConnectionUrl;

/// Opens mapping sources.
#[derive(Debug, Clone, Default)]
pub struct Bootstrap {
    sources: SourceRegistry,
}

impl Bootstrap {
    /// Creates a bootstrap that reads documents from disk and knows the
    /// given factories.
    #[must_use]
    pub const fn new(sources: SourceRegistry) -> Self {
        Self { sources }
    }

    /// Opens the mapping source a URL points at.
    ///
    /// The URL's `dialect` property wins over the document's `dialect`
    /// setting; without either the generic dialect is used. The naming
    /// strategy follows the same rule and defaults to `standard`.
    pub fn open(&self, url: &str) -> Result<MappingSession> {
        let url = ConnectionUrl::from_str(url)?;
        let document = self.sources.load(&url)?;

        let dialect = resolve_dialect(&url, &document)?;
        let naming = resolve_naming(&url, &document)?;
        info!(
            source = url.kind().product_name(),
            %dialect,
            %naming,
            tables = document.tables.len(),
            entities = document.entities.len(),
            "Opened mapping source"
        );

        Ok(MappingSession {
            url,
            model: document.into_model(naming),
            config: SnapshotConfig::new(dialect),
            naming,
        })
    }
}

fn configured<'a>(
    url: &'a ConnectionUrl,
    document: &'a MappingDocument,
    keys: &[&str],
) -> Option<&'a str> {
    url.property(keys)
        .filter(|v| !v.trim().is_empty())
        .or_else(|| document.setting(keys))
}

fn resolve_dialect(url: &ConnectionUrl, document: &MappingDocument) -> Result<Dialect> {
    match configured(url, document, DIALECT_KEYS) {
        Some(name) => name
            .parse()
            .map_err(|UnknownDialect(name)| BootstrapError::UnknownDialect(name)),
        None => {
            info!("Unable to determine dialect, using generic");
            Ok(Dialect::Generic)
        }
    }
}

fn resolve_naming(
    url: &ConnectionUrl,
    document: &MappingDocument,
) -> Result<PhysicalNamingStrategy> {
    configured(url, document, NAMING_STRATEGY_KEYS)
        .map_or(Ok(PhysicalNamingStrategy::default()), str::parse)
}

/// A loaded mapping source and the settings it resolved to.
#[derive(Debug, Clone)]
pub struct MappingSession {
    url: ConnectionUrl,
    model: MappingModel,
    config: SnapshotConfig,
    naming: PhysicalNamingStrategy,
}

impl MappingSession {
    /// The URL the session was opened from.
    #[must_use]
    pub const fn url(&self) -> &ConnectionUrl {
        &self.url
    }

    /// The mapping metadata, with physical names applied.
    #[must_use]
    pub const fn model(&self) -> &MappingModel {
        &self.model
    }

    /// The snapshot configuration.
    #[must_use]
    pub const fn config(&self) -> &SnapshotConfig {
        &self.config
    }

    /// The naming strategy applied to the mapping.
    #[must_use]
    pub const fn naming(&self) -> PhysicalNamingStrategy {
        self.naming
    }

    /// Resolves one schema with the standard generators.
    pub fn snapshot_schema(&self, name: &str, control: SnapshotControl) -> Result<Schema> {
        let registry = GeneratorRegistry::standard()?;
        let mut snapshot = DatabaseSnapshot::new(&registry, &self.model, &self.config, control);

        let resolved = snapshot.include(Schema::new(name).into())?;
        info!(schema = name, objects = snapshot.resolved_count(), "Snapshot complete");
        resolved
            .and_then(DatabaseObject::into_schema)
            .ok_or_else(|| {
                BootstrapError::from(SnapshotError::configuration(format!(
                    "schema '{name}' did not resolve"
                )))
            })
    }

    /// Resolves the configured default schema.
    pub fn snapshot_default_schema(&self, control: SnapshotControl) -> Result<Schema> {
        self.snapshot_schema(&self.config.default_schema, control)
    }
}

#[cfg(test)]
mod tests {
    use mapsnap_core::metadata::{
        EntityBinding, GeneratorStrategy, IdGeneratorDescriptor, MappingEntry,
    };
    use mapsnap_core::model::ObjectType;

    use super::*;
    use crate::url::SourceKind;

    fn shop(_url: &ConnectionUrl) -> Result<MappingDocument> {
        let mut document = MappingDocument {
            tables: vec![MappingEntry::physical("OrderLine"), MappingEntry::physical("Customer")],
            entities: vec![EntityBinding::root("OrderLine")
                .table("OrderLine")
                .generator(IdGeneratorDescriptor::new(GeneratorStrategy::Table))],
            ..MappingDocument::default()
        };
        document
            .settings
            .insert("hibernate.dialect".to_string(), "org.hibernate.dialect.H2Dialect".to_string());
        Ok(document)
    }

    fn broken(_url: &ConnectionUrl) -> Result<MappingDocument> {
        Err(BootstrapError::Factory {
            name: "broken".to_string(),
            message: "no annotated classes".to_string(),
        })
    }

    fn bootstrap() -> Bootstrap {
        Bootstrap::new(
            SourceRegistry::new()
                .register(SourceKind::HibernateClassic, "shop", shop)
                .register(SourceKind::HibernateClassic, "broken", broken),
        )
    }

    #[test]
    fn test_dialect_from_document() {
        let session = bootstrap().open("hibernate:classic:shop").unwrap();
        assert_eq!(session.config().dialect, Dialect::H2);
        assert!(!session.config().creates_indexes_for_foreign_keys());
    }

    #[test]
    fn test_url_dialect_wins() {
        let session = bootstrap().open("hibernate:classic:shop?dialect=mysql").unwrap();
        assert_eq!(session.config().dialect, Dialect::MySql);
        assert!(session.config().creates_indexes_for_foreign_keys());
    }

    #[test]
    fn test_unknown_dialect() {
        let err = bootstrap()
            .open("hibernate:classic:shop?dialect=cobol")
            .unwrap_err();
        assert!(matches!(err, BootstrapError::UnknownDialect(name) if name == "cobol"));
    }

    #[test]
    fn test_naming_strategy_from_url() {
        let session = bootstrap()
            .open("hibernate:classic:shop?physical_naming_strategy=snake_case")
            .unwrap();
        assert_eq!(session.naming(), PhysicalNamingStrategy::SnakeCase);
        assert_eq!(session.model().tables[0].physical_name, "order_line");
    }

    #[test]
    fn test_factory_error_propagates() {
        let err = bootstrap().open("hibernate:classic:broken").unwrap_err();
        assert!(matches!(err, BootstrapError::Factory { name, .. } if name == "broken"));
    }

    #[test]
    fn test_snapshot_schema() {
        let session = bootstrap()
            .open("hibernate:classic:shop?physical_naming_strategy=upper_case")
            .unwrap();
        let schema = session.snapshot_default_schema(SnapshotControl::all()).unwrap();

        assert_eq!(schema.name, "PUBLIC");
        let names: Vec<_> = schema.tables().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["ORDERLINE", "CUSTOMER", "hibernate_sequences"]);
    }

    #[test]
    fn test_snapshot_schema_respects_control() {
        let session = bootstrap().open("hibernate:classic:shop").unwrap();
        let schema = session
            .snapshot_schema("APP", SnapshotControl::of([ObjectType::Schema]))
            .unwrap();
        assert_eq!(schema.name, "APP");
        assert_eq!(schema.tables().count(), 0);
    }
}
