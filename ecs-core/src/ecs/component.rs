// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Component storage
//!
//! Components are plain data records attached to entities. Every component
//! type lives in its own [`PackedStorage`], a dense array indexed indirectly
//! by entity so that iteration touches contiguous memory and insert, remove
//! and lookup stay O(1).

use crate::ecs::property::PropertyTable;
use crate::ecs::Entity;
use crate::error::{EcsError, EcsResult};
use std::collections::HashMap;

/// Trait that all components must implement
///
/// Components should be plain data structures without behavior. `NAME` is
/// the key under which the type is registered and looked up by loaders, so
/// it must be unique among the types registered on one coordinator.
pub trait Component: 'static + Send + Sync {
    /// Registration name of the component type
    const NAME: &'static str;

    /// Declare the fields settable by name
    ///
    /// The default exposes no properties.
    fn properties() -> PropertyTable<Self>
    where
        Self: Sized,
    {
        PropertyTable::new()
    }
}

/// Storage interface for components
pub trait ComponentStorage: Send + Sync {
    /// The component type this storage manages
    type Component: Component;

    /// Insert a component for the given entity
    ///
    /// Fails with [`EcsError::DuplicateComponent`] and leaves the storage
    /// unchanged if the entity already has one.
    fn insert(&mut self, entity: Entity, component: Self::Component) -> EcsResult<()>;

    /// Remove and return the component of the given entity
    fn remove(&mut self, entity: Entity) -> EcsResult<Self::Component>;

    /// Get a reference to a component for the given entity
    fn get(&self, entity: Entity) -> EcsResult<&Self::Component>;

    /// Get a mutable reference to a component for the given entity
    fn get_mut(&mut self, entity: Entity) -> EcsResult<&mut Self::Component>;

    /// Check if an entity has this component
    fn contains(&self, entity: Entity) -> bool;

    /// Clear all components
    fn clear(&mut self);

    /// Drop the entity's component if it has one
    fn on_entity_destroyed(&mut self, entity: Entity) {
        if self.contains(entity) {
            let _ = self.remove(entity);
        }
    }
}

/// Densely packed component storage
///
/// Components sit contiguously in one `Vec` with no gaps. Two index tables
/// translate between entities and dense slots:
///
/// ```text
/// components:      [c0, c1, c2]
/// index_to_entity: [e7, e2, e9]
/// entity_to_index: {e7: 0, e2: 1, e9: 2}
/// ```
///
/// Removing an entry moves the last component into the vacated slot and
/// repoints the moved entity, so the array stays dense.
///
/// # Example
///
/// ```
/// use ecs_core::ecs::{ComponentStorage, Entity, PackedStorage};
/// use ecs_core::ecs::components::Gravity;
///
/// let mut storage = PackedStorage::<Gravity>::new();
/// let entity = Entity::new(1);
///
/// storage.insert(entity, Gravity::default()).unwrap();
/// assert!(storage.contains(entity));
/// assert_eq!(storage.get(entity).unwrap().gravity, 9.81);
/// assert!(storage.insert(entity, Gravity::default()).is_err());
/// ```
pub struct PackedStorage<T: Component> {
    /// Mapping from Entity to dense array index
    entity_to_index: HashMap<Entity, usize>,
    /// Mapping from dense array index back to Entity (for swap_remove)
    index_to_entity: Vec<Entity>,
    /// The component data stored densely
    components: Vec<T>,
}

impl<T: Component> PackedStorage<T> {
    /// Create a new empty storage
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a new storage with room for `capacity` components
    pub fn with_capacity(capacity: usize) -> Self {
        PackedStorage {
            entity_to_index: HashMap::with_capacity(capacity),
            index_to_entity: Vec::with_capacity(capacity),
            components: Vec::with_capacity(capacity),
        }
    }

    /// Get the number of components stored
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Check if the storage is empty
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Reserve space for at least `additional` more components
    pub fn reserve(&mut self, additional: usize) {
        self.entity_to_index.reserve(additional);
        self.index_to_entity.reserve(additional);
        self.components.reserve(additional);
    }

    /// Entities with a component, in dense order
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.index_to_entity.iter().copied()
    }

    /// The dense component array
    pub fn components(&self) -> &[T] {
        &self.components
    }

    /// The dense component array, mutably
    pub fn components_mut(&mut self) -> &mut [T] {
        &mut self.components
    }

    /// Iterate over `(entity, component)` pairs in dense order
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> + '_ {
        self.index_to_entity.iter().copied().zip(self.components.iter())
    }

    /// Get the dense index of an entity's component
    pub fn index_of(&self, entity: Entity) -> Option<usize> {
        self.entity_to_index.get(&entity).copied()
    }

    /// Get the entity owning the component at a dense index
    pub fn entity_at(&self, index: usize) -> Option<Entity> {
        self.index_to_entity.get(index).copied()
    }

    fn missing(&self, entity: Entity) -> EcsError {
        EcsError::MissingComponent {
            entity,
            component: T::NAME,
        }
    }
}

impl<T: Component> Default for PackedStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Component> ComponentStorage for PackedStorage<T> {
    type Component = T;

    fn insert(&mut self, entity: Entity, component: T) -> EcsResult<()> {
        if self.entity_to_index.contains_key(&entity) {
            return Err(EcsError::DuplicateComponent {
                entity,
                component: T::NAME,
            });
        }

        let new_index = self.components.len();
        self.components.push(component);
        self.entity_to_index.insert(entity, new_index);
        self.index_to_entity.push(entity);

        debug_assert_eq!(self.entity_to_index.len(), self.index_to_entity.len());
        debug_assert_eq!(self.entity_to_index.len(), self.components.len());
        Ok(())
    }

    fn remove(&mut self, entity: Entity) -> EcsResult<T> {
        let index = match self.entity_to_index.remove(&entity) {
            Some(index) => index,
            None => return Err(self.missing(entity)),
        };

        // Last element moves into the hole
        let component = self.components.swap_remove(index);
        self.index_to_entity.swap_remove(index);
        if let Some(&moved) = self.index_to_entity.get(index) {
            self.entity_to_index.insert(moved, index);
        }

        debug_assert_eq!(self.entity_to_index.len(), self.index_to_entity.len());
        debug_assert_eq!(self.entity_to_index.len(), self.components.len());
        Ok(component)
    }

    fn get(&self, entity: Entity) -> EcsResult<&T> {
        match self.entity_to_index.get(&entity) {
            Some(&index) => Ok(&self.components[index]),
            None => Err(self.missing(entity)),
        }
    }

    fn get_mut(&mut self, entity: Entity) -> EcsResult<&mut T> {
        match self.entity_to_index.get(&entity) {
            Some(&index) => Ok(&mut self.components[index]),
            None => Err(self.missing(entity)),
        }
    }

    fn contains(&self, entity: Entity) -> bool {
        self.entity_to_index.contains_key(&entity)
    }

    fn clear(&mut self) {
        self.entity_to_index.clear();
        self.index_to_entity.clear();
        self.components.clear();
    }
}
