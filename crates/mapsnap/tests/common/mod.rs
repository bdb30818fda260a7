#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

/// An auction mapping: two physical tables, a view, a hi-lo root entity and
/// a subclass sharing the root's generator.
pub const AUCTION: &str = r#"{
    "settings": {
        "hibernate.dialect": "org.hibernate.dialect.HSQLDialect"
    },
    "tables": [
        {
            "physical_name": "AuctionItem",
            "columns": [
                {"name": "itemId", "sql_type": "BIGINT", "nullable": false},
                {"name": "description", "sql_type": "VARCHAR(255)"},
                {"name": "status", "sql_type": "VARCHAR(16)", "default_value": "'OPEN'"}
            ],
            "primary_key": ["itemId"]
        },
        {
            "physical_name": "Bid",
            "columns": [
                {"name": "bidId", "sql_type": "BIGINT", "nullable": false},
                {"name": "amount", "sql_type": "DECIMAL(19,2)"}
            ],
            "primary_key": ["bidId"]
        },
        {
            "physical_name": "OpenAuctions",
            "is_physical_table": false
        }
    ],
    "entities": [
        {
            "entity_name": "AuctionItem",
            "table": "AuctionItem",
            "identifier_generator": {
                "strategy": "multiple_hilo_per_table",
                "parameters": {"table": "hi_value", "primary_key_column": "next"}
            }
        },
        {
            "entity_name": "Bid",
            "table": "Bid",
            "identifier_generator": {"strategy": "sequence"}
        },
        {
            "entity_name": "BuyNowBid",
            "table": "Bid",
            "is_inherited": true,
            "identifier_generator": {
                "strategy": "multiple_hilo_per_table",
                "parameters": {"table": "never_created"}
            }
        }
    ]
}"#;

/// A directory holding mapping documents for one test.
pub struct MappingDir {
    dir: TempDir,
}

impl MappingDir {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap_or_else(|e| panic!("Failed to create temp dir: {e}")),
        }
    }

    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, contents).unwrap_or_else(|e| panic!("Failed to write {name}: {e}"));
        path
    }

    /// Writes the document and returns a URL of the given scheme for it.
    pub fn url(&self, prefix: &str, name: &str, contents: &str, query: &str) -> String {
        let path = self.write(name, contents);
        if query.is_empty() {
            format!("{prefix}{}", path.display())
        } else {
            format!("{prefix}{}?{query}", path.display())
        }
    }
}
