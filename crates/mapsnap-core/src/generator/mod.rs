//! Snapshot generators and the chain that runs them.
//!
//! Each generator is the *default resolver* for at most one object type and
//! may *augment* results of other types by attaching children to them. The
//! [`GeneratorRegistry`] dispatches on [`ObjectType`]: one default resolver
//! (or the host's [`HostResolver`] when there is none), then every augmenter
//! in registration order.

mod column;
mod registry;
mod table;

pub use column::ColumnSnapshotGenerator;
pub use registry::{GeneratorRegistry, RegistryBuilder};
pub use table::TableSnapshotGenerator;

use crate::error::Result;
use crate::model::{DatabaseObject, ObjectType};
use crate::snapshot::DatabaseSnapshot;

/// Outcome of resolving one example object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The object exists in the mapping metadata.
    Found(DatabaseObject),
    /// The mapping has no such object; the example is handed back untouched.
    Unmapped(DatabaseObject),
    /// Nothing was produced.
    Absent,
}

impl Resolution {
    /// Returns whether the object was found.
    #[must_use]
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Returns the carried object, found or not.
    #[must_use]
    pub fn into_object(self) -> Option<DatabaseObject> {
        match self {
            Self::Found(object) | Self::Unmapped(object) => Some(object),
            Self::Absent => None,
        }
    }
}

/// A pluggable step of the resolution chain.
pub trait SnapshotGenerator {
    /// Name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Object type this generator produces canonical instances of.
    fn default_for(&self) -> Option<ObjectType>;

    /// Object types this generator attaches derived children to.
    fn adds_to(&self) -> &[ObjectType] {
        &[]
    }

    /// Resolves `example`, which is of the [`default_for`](Self::default_for)
    /// type and has no snapshot identity yet.
    fn snapshot_object(
        &self,
        example: DatabaseObject,
        snapshot: &mut DatabaseSnapshot<'_>,
    ) -> Result<Resolution> {
        let _ = snapshot;
        Ok(Resolution::Unmapped(example))
    }

    /// Attaches children to `found`, whose type is one of
    /// [`adds_to`](Self::adds_to). Children go through
    /// [`DatabaseSnapshot::include`] so they are resolved once.
    fn add_to(
        &self,
        found: &mut DatabaseObject,
        snapshot: &mut DatabaseSnapshot<'_>,
    ) -> Result<()> {
        let _ = (found, snapshot);
        Ok(())
    }
}

/// The host's own resolution step, consulted for types no generator
/// defaults for.
pub trait HostResolver {
    /// Resolves an example of a type with no default generator.
    fn resolve(
        &self,
        example: DatabaseObject,
        snapshot: &mut DatabaseSnapshot<'_>,
    ) -> Result<Resolution>;
}

/// Host step for mapping sources: every requested schema exists, anything
/// else is unknown.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralResolver;

impl HostResolver for StructuralResolver {
    fn resolve(
        &self,
        example: DatabaseObject,
        _snapshot: &mut DatabaseSnapshot<'_>,
    ) -> Result<Resolution> {
        Ok(match example {
            DatabaseObject::Schema(_) => Resolution::Found(example),
            other => Resolution::Unmapped(other),
        })
    }
}
