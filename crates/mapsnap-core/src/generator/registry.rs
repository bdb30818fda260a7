//! Generator registration and chain dispatch.

use std::collections::HashMap;
use std::fmt;

use tracing::trace;

use super::{
    ColumnSnapshotGenerator, HostResolver, Resolution, SnapshotGenerator, StructuralResolver,
    TableSnapshotGenerator,
};
use crate::error::{Result, SnapshotError};
use crate::model::{DatabaseObject, ObjectType};
use crate::snapshot::DatabaseSnapshot;

/// Collects generators before freezing them into a [`GeneratorRegistry`].
pub struct RegistryBuilder {
    generators: Vec<Box<dyn SnapshotGenerator>>,
    host: Box<dyn HostResolver>,
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self {
            generators: Vec::new(),
            host: Box::new(StructuralResolver),
        }
    }
}

impl RegistryBuilder {
    /// Appends a generator. Augmenters run in registration order.
    #[must_use]
    pub fn register(mut self, generator: impl SnapshotGenerator + 'static) -> Self {
        self.generators.push(Box::new(generator));
        self
    }

    /// Replaces the host step used for types without a default generator.
    #[must_use]
    pub fn host(mut self, host: impl HostResolver + 'static) -> Self {
        self.host = Box::new(host);
        self
    }

    /// Builds the dispatch tables.
    ///
    /// Fails with [`SnapshotError::AmbiguousBinding`] when two generators
    /// default for the same type.
    pub fn build(self) -> Result<GeneratorRegistry> {
        let mut defaults: HashMap<ObjectType, usize> = HashMap::new();
        let mut augmenters: HashMap<ObjectType, Vec<usize>> = HashMap::new();

        for (index, generator) in self.generators.iter().enumerate() {
            if let Some(object_type) = generator.default_for() {
                if let Some(&existing) = defaults.get(&object_type) {
                    return Err(SnapshotError::AmbiguousBinding {
                        object_type,
                        first: self.generators[existing].name(),
                        second: generator.name(),
                    });
                }
                defaults.insert(object_type, index);
            }
            for object_type in generator.adds_to() {
                let slots = augmenters.entry(*object_type).or_default();
                if !slots.contains(&index) {
                    slots.push(index);
                }
            }
        }

        Ok(GeneratorRegistry {
            generators: self.generators,
            defaults,
            augmenters,
            host: self.host,
        })
    }
}

/// Immutable set of generators, built once per snapshot session.
pub struct GeneratorRegistry {
    generators: Vec<Box<dyn SnapshotGenerator>>,
    defaults: HashMap<ObjectType, usize>,
    augmenters: HashMap<ObjectType, Vec<usize>>,
    host: Box<dyn HostResolver>,
}

impl fmt::Debug for GeneratorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorRegistry")
            .field(
                "generators",
                &self.generators.iter().map(|g| g.name()).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

impl GeneratorRegistry {
    /// Starts an empty registry with the [`StructuralResolver`] host step.
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Registry with the table and column generators.
    pub fn standard() -> Result<Self> {
        Self::builder()
            .register(TableSnapshotGenerator::new())
            .register(ColumnSnapshotGenerator)
            .build()
    }

    /// The default resolver for a type, if any.
    #[must_use]
    pub fn default_for(&self, object_type: ObjectType) -> Option<&dyn SnapshotGenerator> {
        self.defaults
            .get(&object_type)
            .map(|&index| self.generators[index].as_ref())
    }

    /// Augmenters of a type, in registration order.
    pub fn augmenters(
        &self,
        object_type: ObjectType,
    ) -> impl Iterator<Item = &dyn SnapshotGenerator> {
        self.augmenters
            .get(&object_type)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(|&index| self.generators[index].as_ref())
    }

    /// Runs the chain for one example.
    ///
    /// The default resolver for the example's type produces the base result;
    /// an example that already carries a snapshot identity is returned as
    /// is. Without a default resolver the host step answers. A found result
    /// is then handed to every augmenter of its type.
    pub fn resolve(
        &self,
        example: DatabaseObject,
        snapshot: &mut DatabaseSnapshot<'_>,
    ) -> Result<Resolution> {
        let object_type = example.object_type();
        let resolution = match self.default_for(object_type) {
            Some(generator) => {
                if example.snapshot_id().is_some() {
                    return Ok(Resolution::Found(example));
                }
                trace!(
                    generator = generator.name(),
                    %object_type,
                    name = example.name(),
                    "Resolving"
                );
                generator.snapshot_object(example, snapshot)?
            }
            None => self.host.resolve(example, snapshot)?,
        };

        let Resolution::Found(mut found) = resolution else {
            return Ok(resolution);
        };
        for augmenter in self.augmenters(object_type) {
            trace!(generator = augmenter.name(), %object_type, name = found.name(), "Augmenting");
            augmenter.add_to(&mut found, snapshot)?;
        }
        Ok(Resolution::Found(found))
    }
}
