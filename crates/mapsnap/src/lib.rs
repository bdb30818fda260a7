//! Snapshot ORM mapping sources as if they were live databases.
//!
//! `mapsnap` is the glue around [`mapsnap_core`]: it turns a connection URL
//! into loaded mapping metadata and an immutable session configuration,
//! runs the snapshot and renders the result.
//!
//! # Architecture
//!
//! - **URL** - `hibernate:classic:`, `hibernate:ejb3:`, `hibernate:spring:`
//!   and `jpa:persistence:` sources with `?key=value` properties
//! - **Sources** - registered mapping factories, or JSON mapping documents
//! - **Naming** - physical naming strategies applied while loading
//! - **Bootstrap** - dialect and naming policy, snapshot sessions
//! - **Report** - JSON and text rendering of a resolved schema
//!
//! # Example
//!
//! ```rust,ignore
//! use mapsnap::prelude::*;
//!
//! let session = Bootstrap::default().open("hibernate:classic:mapping/auction.json?dialect=h2")?;
//! let schema = session.snapshot_schema("PUBLIC", SnapshotControl::all())?;
//! println!("{}", SnapshotReport::new(&session, schema));
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! # Print the tables and columns a mapping describes
//! mapsnap --url hibernate:classic:mapping/auction.json snapshot
//!
//! # Tables only, as JSON
//! mapsnap --url hibernate:classic:mapping/auction.json snapshot --exclude column --format json
//!
//! # Show what the URL resolves to
//! mapsnap --url jpa:persistence:mapping/shop.json?dialect=mysql describe
//! ```

pub mod bootstrap;
pub mod error;
pub mod naming;
pub mod report;
pub mod source;
pub mod url;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::bootstrap::{Bootstrap, MappingSession};
    pub use crate::error::{BootstrapError, Result};
    pub use crate::naming::PhysicalNamingStrategy;
    pub use crate::report::SnapshotReport;
    pub use crate::source::{FactoryFn, MappingDocument, SourceRegistry};
    pub use crate::url::{ConnectionUrl, SourceKind};
    pub use mapsnap_core::control::SnapshotControl;
    pub use mapsnap_core::model::ObjectType;
}
