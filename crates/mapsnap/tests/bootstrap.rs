mod common;

use common::{AUCTION, MappingDir};
use mapsnap::prelude::*;
use mapsnap_core::config::Dialect;
use mapsnap_core::model::TableOrigin;

fn table_names(schema: &mapsnap_core::model::Schema) -> Vec<&str> {
    schema.tables().map(|t| t.name.as_str()).collect()
}

#[test]
fn test_classic_document_snapshot() {
    let dir = MappingDir::new();
    let url = dir.url("hibernate:classic:", "auction.json", AUCTION, "");

    let session = Bootstrap::default().open(&url).unwrap();
    assert_eq!(session.config().dialect, Dialect::Hsql);
    assert_eq!(session.naming(), PhysicalNamingStrategy::Standard);

    let schema = session.snapshot_schema("PUBLIC", SnapshotControl::all()).unwrap();
    assert_eq!(table_names(&schema), vec!["AuctionItem", "Bid", "hi_value"]);

    let item = schema.table("auctionitem").unwrap();
    let columns: Vec<_> = item.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(columns, vec!["itemId", "description", "status"]);
    assert_eq!(item.column("STATUS").unwrap().default_value.as_deref(), Some("'OPEN'"));
    assert!(!item.column("itemId").unwrap().nullable);

    let hi_value = schema.table("hi_value").unwrap();
    assert!(matches!(hi_value.origin, TableOrigin::IdentifierGenerator { .. }));
    let columns: Vec<_> = hi_value.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(columns, vec!["next", "sequence_next_hi_value"]);
}

#[test]
fn test_snake_case_naming_from_url() {
    let dir = MappingDir::new();
    let url = dir.url(
        "hibernate:ejb3:",
        "auction.json",
        AUCTION,
        "hibernate.physical_naming_strategy=snake_case&dialect=mysql",
    );

    let session = Bootstrap::default().open(&url).unwrap();
    assert_eq!(session.config().dialect, Dialect::MySql);

    let schema = session.snapshot_default_schema(SnapshotControl::all()).unwrap();
    assert_eq!(table_names(&schema), vec!["auction_item", "bid", "hi_value"]);
    let item = schema.table("auction_item").unwrap();
    assert!(item.column("item_id").is_some());
    assert_eq!(item.primary_key.as_ref().unwrap().columns, vec!["item_id"]);
}

#[test]
fn test_generic_dialect_without_settings() {
    let dir = MappingDir::new();
    let url = dir.url("hibernate:spring:", "empty.json", "{}", "");

    let session = Bootstrap::default().open(&url).unwrap();
    assert_eq!(session.config().dialect, Dialect::Generic);

    let schema = session.snapshot_default_schema(SnapshotControl::all()).unwrap();
    assert!(schema.snapshot_id().is_some());
    assert_eq!(schema.tables().count(), 0);
}

#[test]
fn test_tables_only_report_as_json() {
    let dir = MappingDir::new();
    let url = dir.url("jpa:persistence:", "auction.json", AUCTION, "");

    let session = Bootstrap::default().open(&url).unwrap();
    let control = SnapshotControl::all().excluding(ObjectType::Column);
    let schema = session.snapshot_schema("AUCTION", control).unwrap();
    let report = SnapshotReport::new(&session, schema);

    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(json["source"], "JPA Persistence");
    assert_eq!(json["dialect"], "hsql");
    assert_eq!(json["schema"]["name"], "AUCTION");
    let objects = json["schema"]["objects"].as_array().unwrap();
    assert_eq!(objects.len(), 3);
    assert!(objects[0].get("columns").is_none());
    assert_eq!(objects[0]["schema"]["name"], "AUCTION");
}

#[test]
fn test_malformed_document() {
    let dir = MappingDir::new();
    let url = dir.url("hibernate:classic:", "broken.json", "{\"tables\": [", "");

    let err = Bootstrap::default().open(&url).unwrap_err();
    assert!(matches!(err, BootstrapError::Document { .. }));
}

#[test]
fn test_unknown_naming_strategy() {
    let dir = MappingDir::new();
    let url = dir.url(
        "hibernate:classic:",
        "auction.json",
        AUCTION,
        "physical_naming_strategy=com.example.MyStrategy",
    );

    let err = Bootstrap::default().open(&url).unwrap_err();
    assert!(matches!(err, BootstrapError::UnknownNamingStrategy(_)));
}
