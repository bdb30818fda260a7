//! Snapshot session.
//!
//! A [`DatabaseSnapshot`] plays the host's part during one resolution pass:
//! it owns the resolve-once cache, mints snapshot identities and gives
//! generators access to the metadata, configuration and scope.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::config::SnapshotConfig;
use crate::control::SnapshotControl;
use crate::error::Result;
use crate::generator::{GeneratorRegistry, Resolution};
use crate::metadata::MetadataProvider;
use crate::model::{DatabaseObject, ObjectKey, SnapshotId};

/// State of one snapshot operation.
pub struct DatabaseSnapshot<'a> {
    registry: &'a GeneratorRegistry,
    metadata: &'a dyn MetadataProvider,
    config: &'a SnapshotConfig,
    control: SnapshotControl,
    known: HashMap<ObjectKey, DatabaseObject>,
    next_id: u64,
}

impl<'a> DatabaseSnapshot<'a> {
    /// Starts a snapshot over the given metadata.
    #[must_use]
    pub fn new(
        registry: &'a GeneratorRegistry,
        metadata: &'a dyn MetadataProvider,
        config: &'a SnapshotConfig,
        control: SnapshotControl,
    ) -> Self {
        Self {
            registry,
            metadata,
            config,
            control,
            known: HashMap::new(),
            next_id: 1,
        }
    }

    /// The mapping metadata being snapshotted.
    #[must_use]
    pub fn metadata(&self) -> &'a dyn MetadataProvider {
        self.metadata
    }

    /// The session configuration.
    #[must_use]
    pub const fn config(&self) -> &'a SnapshotConfig {
        self.config
    }

    /// The snapshot scope.
    #[must_use]
    pub const fn control(&self) -> &SnapshotControl {
        &self.control
    }

    /// Resolves an object through the generator chain.
    ///
    /// An object already resolved in this snapshot is returned from the
    /// cache without consulting any generator. A newly found object gets a
    /// snapshot identity. An object the mapping does not know comes back as
    /// the unchanged example; `None` means the chain produced nothing.
    pub fn include(&mut self, example: DatabaseObject) -> Result<Option<DatabaseObject>> {
        let requested = example.key();
        if let Some(known) = self.known.get(&requested) {
            trace!(object_type = %known.object_type(), name = known.name(), "Already resolved");
            return Ok(Some(known.clone()));
        }

        let registry = self.registry;
        match registry.resolve(example, self)? {
            Resolution::Found(mut object) => {
                if object.snapshot_id().is_none() {
                    let id = self.next_snapshot_id();
                    object.assign_snapshot_id(id);
                }
                debug!(
                    object_type = %object.object_type(),
                    name = object.name(),
                    snapshot_id = ?object.snapshot_id(),
                    "Resolved"
                );
                let resolved = object.key();
                if resolved != requested {
                    self.known.insert(requested, object.clone());
                }
                self.known.insert(resolved, object.clone());
                Ok(Some(object))
            }
            Resolution::Unmapped(example) => Ok(Some(example)),
            Resolution::Absent => Ok(None),
        }
    }

    /// Returns the resolved object with the same identity as `example`.
    #[must_use]
    pub fn get(&self, example: &DatabaseObject) -> Option<&DatabaseObject> {
        self.known.get(&example.key())
    }

    /// Replaces every cached copy of an already resolved object.
    pub(crate) fn remember(&mut self, object: DatabaseObject) {
        let Some(id) = object.snapshot_id() else {
            return;
        };
        for known in self.known.values_mut() {
            if known.snapshot_id() == Some(id) {
                *known = object.clone();
            }
        }
    }

    /// Number of distinct objects resolved so far.
    #[must_use]
    pub fn resolved_count(&self) -> usize {
        let mut ids: Vec<SnapshotId> = self
            .known
            .values()
            .filter_map(DatabaseObject::snapshot_id)
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids.len()
    }

    fn next_snapshot_id(&mut self) -> SnapshotId {
        let id = SnapshotId::new(self.next_id);
        self.next_id += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{MappingEntry, MappingModel};
    use crate::model::{Schema, Table};

    fn model() -> MappingModel {
        MappingModel::new().table(MappingEntry::physical("ITEM"))
    }

    #[test]
    fn test_include_caches_by_identity() {
        let registry = GeneratorRegistry::standard().unwrap();
        let metadata = model();
        let config = SnapshotConfig::default();
        let mut snapshot =
            DatabaseSnapshot::new(&registry, &metadata, &config, SnapshotControl::all());

        let first = snapshot
            .include(Table::new("item").into())
            .unwrap()
            .unwrap();
        let second = snapshot
            .include(Table::new("ITEM").into())
            .unwrap()
            .unwrap();

        assert!(first.snapshot_id().is_some());
        assert_eq!(first.snapshot_id(), second.snapshot_id());
        assert_eq!(snapshot.resolved_count(), 1);
        assert!(snapshot.get(&Table::new("Item").into()).is_some());
    }

    #[test]
    fn test_include_mints_increasing_ids() {
        let registry = GeneratorRegistry::standard().unwrap();
        let metadata = model();
        let config = SnapshotConfig::default();
        let mut snapshot =
            DatabaseSnapshot::new(&registry, &metadata, &config, SnapshotControl::all());

        let schema = snapshot
            .include(Schema::new("PUBLIC").into())
            .unwrap()
            .unwrap();
        let table_id = schema.as_schema().unwrap().table("ITEM").unwrap().snapshot_id();

        // children resolve before their parent finishes
        assert!(table_id.unwrap() < schema.snapshot_id().unwrap());
    }
}
