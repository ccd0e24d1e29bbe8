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
//! System registration and subscription tracking
//!
//! Systems contain the logic that operates on entities and components. Each
//! registered system declares a required [`Signature`]; the
//! [`SystemRegistry`] keeps, per system, the set of entities whose current
//! signature contains every required bit. Membership is updated
//! incrementally as entity signatures change rather than recomputed each
//! frame.

use crate::ecs::{ComponentRegistry, Entity, Signature};
use crate::error::{EcsError, EcsResult};
use log::{trace, warn};
use std::any::{type_name, Any, TypeId};
use std::collections::{BTreeSet, HashMap};

/// Trait for systems that process subscribed entities
pub trait System: Any + Send + Sync {
    /// Process the entities currently matching this system
    ///
    /// Called by the host loop once per step through
    /// [`Coordinator::run_system`](crate::ecs::Coordinator::run_system) or
    /// [`Coordinator::run_systems`](crate::ecs::Coordinator::run_systems).
    fn run(&mut self, entities: &BTreeSet<Entity>, components: &mut ComponentRegistry) -> EcsResult<()>;

    /// Get the name of this system for debugging
    fn name(&self) -> &str {
        type_name::<Self>()
    }

    /// Components an entity must hold to be processed by this system
    ///
    /// Queried once when the system is registered through the coordinator.
    /// The default requires nothing, which matches every entity.
    fn required_signature(&self, components: &ComponentRegistry) -> EcsResult<Signature> {
        let _ = components;
        Ok(Signature::new())
    }
}

trait SystemObject: System {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<S: System> SystemObject for S {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

struct SystemEntry {
    type_name: &'static str,
    system: Box<dyn SystemObject>,
    required: Signature,
    entities: BTreeSet<Entity>,
}

/// Owns system instances, their required signatures and subscriptions
///
/// Systems are kept in registration order, which is also the order
/// [`run_all`](Self::run_all) executes them in.
pub struct SystemRegistry {
    entries: Vec<SystemEntry>,
    index: HashMap<TypeId, usize>,
}

impl SystemRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        SystemRegistry {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Register a system instance with an empty subscription set
    ///
    /// The required signature starts empty; see
    /// [`set_required_signature`](Self::set_required_signature).
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::DuplicateSystem`] if a system of type `S` is
    /// already registered.
    pub fn register<S: System>(&mut self, system: S) -> EcsResult<&mut S> {
        let type_id = TypeId::of::<S>();
        if self.index.contains_key(&type_id) {
            warn!("Registering system '{}' more than once", type_name::<S>());
            return Err(EcsError::DuplicateSystem(type_name::<S>()));
        }

        let slot = self.entries.len();
        self.entries.push(SystemEntry {
            type_name: type_name::<S>(),
            system: Box::new(system),
            required: Signature::new(),
            entities: BTreeSet::new(),
        });
        self.index.insert(type_id, slot);
        trace!("Registered system '{}'", type_name::<S>());

        self.entries[slot]
            .system
            .as_any_mut()
            .downcast_mut::<S>()
            .ok_or(EcsError::SystemNotRegistered(type_name::<S>()))
    }

    /// Store the signature entities must match to be processed by `S`
    ///
    /// Existing subscriptions are not recomputed; membership follows on the
    /// next [`on_signature_changed`](Self::on_signature_changed) for each
    /// entity, or on an explicit [`refresh`](Self::refresh).
    pub fn set_required_signature<S: System>(&mut self, signature: Signature) -> EcsResult<()> {
        let entry = self.entry_mut::<S>()?;
        entry.required = signature;
        Ok(())
    }

    /// Remove an entity from every subscription set
    pub fn on_entity_destroyed(&mut self, entity: Entity) {
        for entry in &mut self.entries {
            entry.entities.remove(&entity);
        }
    }

    /// Update every subscription set for an entity's new signature
    ///
    /// The entity is inserted into the set of each system whose required
    /// bits are all present in `signature` and erased from every other.
    pub fn on_signature_changed(&mut self, entity: Entity, signature: &Signature) {
        for entry in &mut self.entries {
            if signature.matches(&entry.required) {
                entry.entities.insert(entity);
            } else {
                entry.entities.remove(&entity);
            }
        }
    }

    /// Rebuild every subscription set from scratch
    pub fn refresh<'a, I>(&mut self, entities: I)
    where
        I: IntoIterator<Item = (Entity, &'a Signature)>,
    {
        for entry in &mut self.entries {
            entry.entities.clear();
        }
        for (entity, signature) in entities {
            self.on_signature_changed(entity, signature);
        }
    }

    /// Get a registered system
    pub fn get<S: System>(&self) -> EcsResult<&S> {
        self.entry::<S>()?
            .system
            .as_any()
            .downcast_ref::<S>()
            .ok_or(EcsError::SystemNotRegistered(type_name::<S>()))
    }

    /// Get a registered system mutably
    pub fn get_mut<S: System>(&mut self) -> EcsResult<&mut S> {
        self.entry_mut::<S>()?
            .system
            .as_any_mut()
            .downcast_mut::<S>()
            .ok_or(EcsError::SystemNotRegistered(type_name::<S>()))
    }

    /// Entities currently matching `S`, in ascending id order
    pub fn subscription<S: System>(&self) -> EcsResult<&BTreeSet<Entity>> {
        Ok(&self.entry::<S>()?.entities)
    }

    /// Signature required by `S`
    pub fn required_signature<S: System>(&self) -> EcsResult<&Signature> {
        Ok(&self.entry::<S>()?.required)
    }

    /// Check whether `S` is registered
    pub fn contains<S: System>(&self) -> bool {
        self.index.contains_key(&TypeId::of::<S>())
    }

    /// Run `S` over its subscription set
    pub fn run<S: System>(&mut self, components: &mut ComponentRegistry) -> EcsResult<()> {
        let entry = self.entry_mut::<S>()?;
        entry.system.run(&entry.entities, components)
    }

    /// Run every system over its subscription set in registration order
    ///
    /// Stops at the first system that fails.
    pub fn run_all(&mut self, components: &mut ComponentRegistry) -> EcsResult<()> {
        for entry in &mut self.entries {
            if let Err(err) = entry.system.run(&entry.entities, components) {
                warn!("System '{}' failed: {}", entry.system.name(), err);
                return Err(err);
            }
        }
        Ok(())
    }

    /// Get the number of registered systems
    pub fn system_count(&self) -> usize {
        self.entries.len()
    }

    /// Names of the registered systems in registration order
    pub fn system_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|entry| entry.system.name())
    }

    fn entry<S: System>(&self) -> EcsResult<&SystemEntry> {
        match self.index.get(&TypeId::of::<S>()) {
            Some(&slot) => Ok(&self.entries[slot]),
            None => Err(Self::not_registered::<S>()),
        }
    }

    fn entry_mut<S: System>(&mut self) -> EcsResult<&mut SystemEntry> {
        match self.index.get(&TypeId::of::<S>()) {
            Some(&slot) => Ok(&mut self.entries[slot]),
            None => Err(Self::not_registered::<S>()),
        }
    }

    fn not_registered<S: System>() -> EcsError {
        warn!("System '{}' is not registered", type_name::<S>());
        EcsError::SystemNotRegistered(type_name::<S>())
    }
}

impl Default for SystemRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SystemRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(
                self.entries
                    .iter()
                    .map(|entry| (entry.type_name, (&entry.required, entry.entities.len()))),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct CountingSystem {
        runs: usize,
        seen: usize,
    }

    impl System for CountingSystem {
        fn run(&mut self, entities: &BTreeSet<Entity>, _components: &mut ComponentRegistry) -> EcsResult<()> {
            self.runs += 1;
            self.seen += entities.len();
            Ok(())
        }

        fn name(&self) -> &str {
            "CountingSystem"
        }
    }

    #[derive(Default)]
    struct OtherSystem;

    impl System for OtherSystem {
        fn run(&mut self, _entities: &BTreeSet<Entity>, _components: &mut ComponentRegistry) -> EcsResult<()> {
            Ok(())
        }
    }

    struct FailingSystem;

    impl System for FailingSystem {
        fn run(&mut self, _entities: &BTreeSet<Entity>, _components: &mut ComponentRegistry) -> EcsResult<()> {
            Err(EcsError::InvalidConfig("boom".to_string()))
        }
    }

    fn components() -> ComponentRegistry {
        ComponentRegistry::new(8, 0)
    }

    #[test]
    fn test_register_and_duplicate() {
        let mut registry = SystemRegistry::new();
        registry.register(CountingSystem::default()).unwrap().runs = 3;
        assert_eq!(registry.system_count(), 1);
        assert_eq!(registry.get::<CountingSystem>().unwrap().runs, 3);

        let err = registry.register(CountingSystem::default()).unwrap_err();
        assert!(matches!(err, EcsError::DuplicateSystem(_)));
        assert_eq!(registry.get::<CountingSystem>().unwrap().runs, 3);
        assert!(registry.subscription::<CountingSystem>().unwrap().is_empty());
    }

    #[test]
    fn test_unregistered_system() {
        let mut registry = SystemRegistry::new();
        assert!(registry
            .set_required_signature::<OtherSystem>(Signature::new())
            .unwrap_err()
            .is_not_found());
        assert!(registry.subscription::<OtherSystem>().is_err());
        assert!(!registry.contains::<OtherSystem>());
    }

    #[test]
    fn test_signature_changes_drive_membership() {
        let mut registry = SystemRegistry::new();
        registry.register(CountingSystem::default()).unwrap();
        registry.register(OtherSystem).unwrap();
        registry
            .set_required_signature::<CountingSystem>(Signature::from_ids([0, 1]))
            .unwrap();
        registry
            .set_required_signature::<OtherSystem>(Signature::from_ids([1]))
            .unwrap();

        let e = Entity::new(7);
        registry.on_signature_changed(e, &Signature::from_ids([1]));
        assert!(!registry.subscription::<CountingSystem>().unwrap().contains(&e));
        assert!(registry.subscription::<OtherSystem>().unwrap().contains(&e));

        registry.on_signature_changed(e, &Signature::from_ids([0, 1, 2]));
        assert!(registry.subscription::<CountingSystem>().unwrap().contains(&e));

        // Losing a required bit drops membership, regaining it restores it
        registry.on_signature_changed(e, &Signature::from_ids([0, 2]));
        assert!(!registry.subscription::<CountingSystem>().unwrap().contains(&e));
        assert!(!registry.subscription::<OtherSystem>().unwrap().contains(&e));
        registry.on_signature_changed(e, &Signature::from_ids([0, 1]));
        assert!(registry.subscription::<CountingSystem>().unwrap().contains(&e));
    }

    #[test]
    fn test_required_signature_is_not_retroactive() {
        let mut registry = SystemRegistry::new();
        registry.register(OtherSystem).unwrap();
        let e = Entity::new(1);

        // Empty requirement matches everything
        registry.on_signature_changed(e, &Signature::new());
        assert!(registry.subscription::<OtherSystem>().unwrap().contains(&e));

        registry
            .set_required_signature::<OtherSystem>(Signature::from_ids([3]))
            .unwrap();
        assert!(registry.subscription::<OtherSystem>().unwrap().contains(&e));

        registry.refresh([(e, &Signature::new())]);
        assert!(registry.subscription::<OtherSystem>().unwrap().is_empty());
    }

    #[test]
    fn test_on_entity_destroyed_is_idempotent() {
        let mut registry = SystemRegistry::new();
        registry.register(OtherSystem).unwrap();
        let e = Entity::new(2);
        registry.on_signature_changed(e, &Signature::new());

        registry.on_entity_destroyed(e);
        registry.on_entity_destroyed(e);
        assert!(registry.subscription::<OtherSystem>().unwrap().is_empty());
    }

    #[test]
    fn test_run_and_run_all() {
        let mut registry = SystemRegistry::new();
        let mut components = components();
        registry.register(CountingSystem::default()).unwrap();
        registry.on_signature_changed(Entity::new(0), &Signature::new());
        registry.on_signature_changed(Entity::new(1), &Signature::new());

        registry.run::<CountingSystem>(&mut components).unwrap();
        registry.run_all(&mut components).unwrap();

        let system = registry.get::<CountingSystem>().unwrap();
        assert_eq!(system.runs, 2);
        assert_eq!(system.seen, 4);
        assert!(registry.run::<OtherSystem>(&mut components).is_err());
    }

    #[test]
    fn test_run_all_stops_on_failure() {
        let mut registry = SystemRegistry::new();
        let mut components = components();
        registry.register(FailingSystem).unwrap();
        registry.register(CountingSystem::default()).unwrap();

        assert!(registry.run_all(&mut components).is_err());
        assert_eq!(registry.get::<CountingSystem>().unwrap().runs, 0);
    }

    #[test]
    fn test_system_names_in_order() {
        let mut registry = SystemRegistry::new();
        registry.register(CountingSystem::default()).unwrap();
        registry.register(OtherSystem).unwrap();
        let names: Vec<_> = registry.system_names().collect();
        assert_eq!(names[0], "CountingSystem");
        assert!(names[1].ends_with("OtherSystem"));
    }
}
