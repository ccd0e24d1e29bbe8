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
//! Entity management
//!
//! Entities are dense integer identifiers bounded by a fixed capacity.
//! The [`EntityRegistry`] hands identifiers out of a FIFO recycling pool,
//! binds a human-readable name to each live entity and stores the entity's
//! current component [`Signature`].

use crate::ecs::Signature;
use crate::error::{EcsError, EcsResult};
use log::{trace, warn};
use std::collections::{BTreeMap, VecDeque};
use std::fmt;

/// Default maximum number of simultaneously live entities
pub const MAX_ENTITIES: u32 = 5000;

/// Unique identifier for an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Entity(u32);

impl Entity {
    /// Create an Entity from a raw identifier
    pub fn new(id: u32) -> Self {
        Entity(id)
    }

    /// Get the raw identifier
    pub fn raw(&self) -> u32 {
        self.0
    }

    /// Get the identifier as an index into per-entity tables
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// Allocates entity identifiers and tracks their names and signatures
///
/// Identifiers `0..capacity` are queued in order at construction. Creating
/// an entity pops the front of the queue; destroying one pushes its
/// identifier to the back, so the most recently freed identifier is reused
/// last.
pub struct EntityRegistry {
    available: VecDeque<Entity>,
    signatures: Vec<Signature>,
    names: BTreeMap<String, Entity>,
    names_by_id: Vec<Option<String>>,
    living: u32,
    capacity: u32,
}

impl EntityRegistry {
    /// Create a registry managing `capacity` identifiers
    pub fn new(capacity: u32) -> Self {
        EntityRegistry {
            available: (0..capacity).map(Entity::new).collect(),
            signatures: vec![Signature::new(); capacity as usize],
            names: BTreeMap::new(),
            names_by_id: vec![None; capacity as usize],
            living: 0,
            capacity,
        }
    }

    /// Allocate an identifier and bind it to `name`
    ///
    /// # Errors
    ///
    /// - [`EcsError::EntityLimitReached`] when all identifiers are live
    /// - [`EcsError::DuplicateEntityName`] when `name` is already bound
    pub fn create(&mut self, name: &str) -> EcsResult<Entity> {
        if self.living >= self.capacity {
            warn!("Tried to create entity '{}' past the entity limit", name);
            return Err(EcsError::EntityLimitReached {
                capacity: self.capacity,
            });
        }
        if self.names.contains_key(name) {
            warn!("Tried to create a second entity named '{}'", name);
            return Err(EcsError::DuplicateEntityName(name.to_string()));
        }

        let entity = self
            .available
            .pop_front()
            .ok_or(EcsError::EntityLimitReached {
                capacity: self.capacity,
            })?;

        self.names.insert(name.to_string(), entity);
        self.names_by_id[entity.index()] = Some(name.to_string());
        self.living += 1;

        trace!("Created {} as '{}'", entity, name);
        Ok(entity)
    }

    /// Resolve a name to its entity
    pub fn lookup(&self, name: &str) -> EcsResult<Entity> {
        self.names.get(name).copied().ok_or_else(|| {
            warn!("Tried to find entity '{}' but couldn't", name);
            EcsError::EntityNotFound(name.to_string())
        })
    }

    /// Destroy the entity bound to `name`
    ///
    /// Clears the entity's signature, returns its identifier to the pool and
    /// drops the name binding. Returns the destroyed identifier so callers
    /// can run their own per-entity cleanup.
    pub fn destroy(&mut self, name: &str) -> EcsResult<Entity> {
        let entity = match self.names.remove(name) {
            Some(entity) => entity,
            None => {
                warn!("Tried to destroy entity '{}' which does not exist", name);
                return Err(EcsError::EntityNotFound(name.to_string()));
            }
        };

        self.signatures[entity.index()].clear();
        self.names_by_id[entity.index()] = None;
        self.available.push_back(entity);
        self.living -= 1;

        trace!("Destroyed {} ('{}')", entity, name);
        Ok(entity)
    }

    /// Destroy every live entity
    ///
    /// Equivalent to calling [`destroy`](Self::destroy) once per live entity,
    /// in name order. Returns the destroyed identifiers.
    pub fn destroy_all(&mut self) -> Vec<Entity> {
        let names: Vec<String> = self.names.keys().cloned().collect();
        names
            .iter()
            .filter_map(|name| self.destroy(name).ok())
            .collect()
    }

    /// Get the signature of an entity
    pub fn signature(&self, entity: Entity) -> EcsResult<&Signature> {
        self.check_range(entity)?;
        Ok(&self.signatures[entity.index()])
    }

    /// Replace the signature of an entity
    pub fn set_signature(&mut self, entity: Entity, signature: Signature) -> EcsResult<()> {
        self.check_range(entity)?;
        self.signatures[entity.index()] = signature;
        Ok(())
    }

    /// Check whether the identifier is currently allocated
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.names_by_id
            .get(entity.index())
            .map_or(false, |name| name.is_some())
    }

    /// Fail unless the identifier is in range and allocated
    pub fn ensure_alive(&self, entity: Entity) -> EcsResult<()> {
        self.check_range(entity)?;
        if self.is_alive(entity) {
            Ok(())
        } else {
            Err(EcsError::EntityNotAlive(entity))
        }
    }

    /// Get the name bound to a live entity
    pub fn name_of(&self, entity: Entity) -> Option<&str> {
        self.names_by_id
            .get(entity.index())
            .and_then(|name| name.as_deref())
    }

    /// Iterate over `(name, entity)` pairs of all live entities in name order
    pub fn entities(&self) -> impl Iterator<Item = (&str, Entity)> + '_ {
        self.names.iter().map(|(name, entity)| (name.as_str(), *entity))
    }

    /// Iterate over live entities paired with their signatures
    pub fn signatures(&self) -> impl Iterator<Item = (Entity, &Signature)> + '_ {
        self.names
            .values()
            .map(move |entity| (*entity, &self.signatures[entity.index()]))
    }

    /// Number of live entities
    pub fn living_count(&self) -> u32 {
        self.living
    }

    /// Maximum number of simultaneously live entities
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    fn check_range(&self, entity: Entity) -> EcsResult<()> {
        if entity.raw() >= self.capacity {
            warn!("{} is out of range (capacity {})", entity, self.capacity);
            return Err(EcsError::EntityOutOfRange {
                entity,
                capacity: self.capacity,
            });
        }
        Ok(())
    }
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new(MAX_ENTITIES)
    }
}
