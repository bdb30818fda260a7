//! Snapshot scope.

use std::collections::BTreeSet;

use crate::model::ObjectType;

/// Decides which object types a snapshot resolves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotControl {
    types: BTreeSet<ObjectType>,
}

impl Default for SnapshotControl {
    fn default() -> Self {
        Self::all()
    }
}

impl SnapshotControl {
    /// Includes every object type.
    #[must_use]
    pub fn all() -> Self {
        Self::of(ObjectType::ALL)
    }

    /// Includes exactly the given types.
    #[must_use]
    pub fn of(types: impl IntoIterator<Item = ObjectType>) -> Self {
        Self {
            types: types.into_iter().collect(),
        }
    }

    /// Removes a type from the scope.
    #[must_use]
    pub fn excluding(mut self, object_type: ObjectType) -> Self {
        self.types.remove(&object_type);
        self
    }

    /// Returns whether objects of this type should be resolved.
    #[must_use]
    pub fn should_include(&self, object_type: ObjectType) -> bool {
        self.types.contains(&object_type)
    }

    /// Included types in parent-first order.
    pub fn types(&self) -> impl Iterator<Item = ObjectType> + '_ {
        self.types.iter().copied()
    }
}
