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
//! Coordinator management
//!
//! The Coordinator is the central container for all ECS data. It owns the
//! entity, component and system registries and is the only way to change
//! what components an entity holds, so that every structural change is
//! applied together with its signature and subscription consequences.

use crate::config::EcsConfig;
use crate::ecs::property::{PropertyInfo, PropertyValue};
use crate::ecs::{
    Component, ComponentMut, ComponentRef, ComponentRegistry, ComponentTypeId, Entity,
    EntityRegistry, Signature, System, SystemRegistry,
};
use crate::error::EcsResult;
use log::debug;
use std::collections::BTreeSet;

/// The main ECS container
///
/// # Example
///
/// ```
/// use ecs_core::ecs::Coordinator;
/// use ecs_core::ecs::components::Gravity;
///
/// let mut coordinator = Coordinator::new();
/// coordinator.register_component::<Gravity>().unwrap();
///
/// let ball = coordinator.create_entity("ball").unwrap();
/// coordinator.add_component_by_name(ball, "Gravity").unwrap();
/// assert_eq!(coordinator.get_component::<Gravity>(ball).unwrap().gravity, 9.81);
///
/// coordinator.remove_component::<Gravity>(ball).unwrap();
/// assert!(coordinator.get_component::<Gravity>(ball).is_err());
/// ```
pub struct Coordinator {
    config: EcsConfig,
    entities: EntityRegistry,
    components: ComponentRegistry,
    systems: SystemRegistry,
}

impl Coordinator {
    /// Create a coordinator with the default limits
    pub fn new() -> Self {
        Self::build(EcsConfig::default())
    }

    /// Create a coordinator with custom limits
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::InvalidConfig`](crate::error::EcsError::InvalidConfig)
    /// if the configuration fails validation.
    pub fn with_config(config: EcsConfig) -> EcsResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: EcsConfig) -> Self {
        Coordinator {
            entities: EntityRegistry::new(config.max_entities),
            components: ComponentRegistry::new(config.max_components, config.initial_capacity),
            systems: SystemRegistry::new(),
            config,
        }
    }

    /// The configuration this coordinator was built with
    pub fn config(&self) -> &EcsConfig {
        &self.config
    }

    // Entities

    /// Create a named entity
    pub fn create_entity(&mut self, name: &str) -> EcsResult<Entity> {
        let entity = self.entities.create(name)?;
        if self.config.log_structural_changes {
            debug!("Created {} '{}'", entity, name);
        }
        Ok(entity)
    }

    /// Resolve an entity by name
    pub fn entity(&self, name: &str) -> EcsResult<Entity> {
        self.entities.lookup(name)
    }

    /// Name bound to a live entity
    pub fn entity_name(&self, entity: Entity) -> Option<&str> {
        self.entities.name_of(entity)
    }

    /// Destroy a named entity
    ///
    /// The entity's components are dropped and it leaves every subscription
    /// set. Destroying an unknown name fails without side effects.
    pub fn destroy_entity(&mut self, name: &str) -> EcsResult<Entity> {
        let entity = self.entities.destroy(name)?;
        self.components.on_entity_destroyed(entity);
        self.systems.on_entity_destroyed(entity);
        if self.config.log_structural_changes {
            debug!("Destroyed {} '{}'", entity, name);
        }
        Ok(entity)
    }

    /// Destroy every live entity with the same cleanup as
    /// [`destroy_entity`](Self::destroy_entity)
    pub fn destroy_all_entities(&mut self) -> Vec<Entity> {
        let names: Vec<String> = self
            .entities
            .entities()
            .map(|(name, _)| name.to_string())
            .collect();
        names
            .iter()
            .filter_map(|name| self.destroy_entity(name).ok())
            .collect()
    }

    /// Number of live entities
    pub fn entity_count(&self) -> u32 {
        self.entities.living_count()
    }

    /// Read-only view of the entity registry
    pub fn entities(&self) -> &EntityRegistry {
        &self.entities
    }

    /// Current signature of an entity
    pub fn signature(&self, entity: Entity) -> EcsResult<&Signature> {
        self.entities.signature(entity)
    }

    // Components

    /// Register a component type
    pub fn register_component<T: Component + Default>(&mut self) -> EcsResult<ComponentTypeId> {
        self.components.register::<T>()
    }

    /// Type id assigned to `T`
    pub fn component_type<T: Component>(&self) -> EcsResult<ComponentTypeId> {
        self.components.type_id_of::<T>()
    }

    /// Attach a component to an entity
    ///
    /// On success the entity's signature gains the bit of `T` and every
    /// system subscription is updated. On failure nothing changes.
    ///
    /// # Errors
    ///
    /// - [`EcsError::EntityNotAlive`](crate::error::EcsError::EntityNotAlive)
    ///   or `EntityOutOfRange` for a dead or invalid entity
    /// - `ComponentNotRegistered` if `T` was never registered
    /// - `DuplicateComponent` if the entity already holds a `T`
    pub fn add_component<T: Component>(&mut self, entity: Entity, component: T) -> EcsResult<()> {
        self.entities.ensure_alive(entity)?;
        let type_id = self.components.add(entity, component)?;
        self.update_signature(entity, type_id, true)?;
        if self.config.log_structural_changes {
            debug!("Added '{}' to {}", T::NAME, entity);
        }
        Ok(())
    }

    /// Attach a default-constructed `T` to an entity
    pub fn add_default_component<T: Component + Default>(&mut self, entity: Entity) -> EcsResult<()> {
        self.entities.ensure_alive(entity)?;
        let type_id = self.components.add_default::<T>(entity)?;
        self.update_signature(entity, type_id, true)?;
        if self.config.log_structural_changes {
            debug!("Added default '{}' to {}", T::NAME, entity);
        }
        Ok(())
    }

    /// Attach a default-constructed component chosen by registration name
    pub fn add_component_by_name(&mut self, entity: Entity, name: &str) -> EcsResult<()> {
        self.entities.ensure_alive(entity)?;
        let type_id = self.components.add_by_name(entity, name)?;
        self.update_signature(entity, type_id, true)?;
        if self.config.log_structural_changes {
            debug!("Added '{}' to {} by name", name, entity);
        }
        Ok(())
    }

    /// Detach and return an entity's `T`
    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> EcsResult<T> {
        self.entities.ensure_alive(entity)?;
        let (type_id, component) = self.components.remove::<T>(entity)?;
        self.update_signature(entity, type_id, false)?;
        if self.config.log_structural_changes {
            debug!("Removed '{}' from {}", T::NAME, entity);
        }
        Ok(component)
    }

    /// Get an entity's `T`
    pub fn get_component<T: Component>(&self, entity: Entity) -> EcsResult<&T> {
        self.components.get::<T>(entity)
    }

    /// Get an entity's `T` mutably
    pub fn get_component_mut<T: Component>(&mut self, entity: Entity) -> EcsResult<&mut T> {
        self.components.get_mut::<T>(entity)
    }

    /// Check whether an entity holds a `T`
    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        self.components.contains::<T>(entity)
    }

    /// Untyped handle to the component registered under `name`
    pub fn get_component_by_name(&self, name: &str, entity: Entity) -> EcsResult<ComponentRef<'_>> {
        self.components.get_by_name(name, entity)
    }

    /// Untyped exclusive handle to the component registered under `name`
    pub fn get_component_by_name_mut(
        &mut self,
        name: &str,
        entity: Entity,
    ) -> EcsResult<ComponentMut<'_>> {
        self.components.get_by_name_mut(name, entity)
    }

    /// Assign one property of an entity's component
    pub fn set_property(
        &mut self,
        entity: Entity,
        component: &str,
        property: &str,
        value: PropertyValue,
    ) -> EcsResult<()> {
        self.components.set_property(component, entity, property, value)
    }

    /// Read one property of an entity's component
    pub fn get_property(
        &self,
        entity: Entity,
        component: &str,
        property: &str,
    ) -> EcsResult<PropertyValue> {
        self.components.get_property(component, entity, property)
    }

    /// Registered component names in registration order
    pub fn component_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.components.component_names()
    }

    /// Settable properties of a registered component type
    pub fn property_schema(&self, name: &str) -> EcsResult<Vec<PropertyInfo>> {
        self.components.property_schema(name)
    }

    /// Read-only view of the component registry
    pub fn components(&self) -> &ComponentRegistry {
        &self.components
    }

    // Systems

    /// Register a default-constructed system
    ///
    /// The system's [`required_signature`](System::required_signature) is
    /// evaluated against the registered components before registration, so
    /// the components it needs must be registered first. Entities whose
    /// signatures changed earlier are picked up by
    /// [`refresh_subscriptions`](Self::refresh_subscriptions).
    pub fn register_system<S: System + Default>(&mut self) -> EcsResult<&mut S> {
        self.register_system_instance(S::default())
    }

    /// Register a system instance
    pub fn register_system_instance<S: System>(&mut self, system: S) -> EcsResult<&mut S> {
        let required = system.required_signature(&self.components)?;
        self.systems.register(system)?;
        self.systems.set_required_signature::<S>(required)?;
        if self.config.log_structural_changes {
            debug!("Registered system '{}'", std::any::type_name::<S>());
        }
        self.systems.get_mut::<S>()
    }

    /// Get a registered system
    pub fn system<S: System>(&self) -> EcsResult<&S> {
        self.systems.get::<S>()
    }

    /// Get a registered system mutably
    pub fn system_mut<S: System>(&mut self) -> EcsResult<&mut S> {
        self.systems.get_mut::<S>()
    }

    /// Replace the signature `S` requires
    ///
    /// Subscriptions are not recomputed until entities change signature or
    /// [`refresh_subscriptions`](Self::refresh_subscriptions) is called.
    pub fn set_system_signature<S: System>(&mut self, signature: Signature) -> EcsResult<()> {
        self.systems.set_required_signature::<S>(signature)
    }

    /// Entities currently processed by `S`
    pub fn subscription<S: System>(&self) -> EcsResult<&BTreeSet<Entity>> {
        self.systems.subscription::<S>()
    }

    /// Recompute every subscription set from the live entities
    pub fn refresh_subscriptions(&mut self) {
        self.systems.refresh(self.entities.signatures());
    }

    /// Run one system over its subscription set
    pub fn run_system<S: System>(&mut self) -> EcsResult<()> {
        self.systems.run::<S>(&mut self.components)
    }

    /// Run every system in registration order
    pub fn run_systems(&mut self) -> EcsResult<()> {
        self.systems.run_all(&mut self.components)
    }

    /// Read-only view of the system registry
    pub fn systems(&self) -> &SystemRegistry {
        &self.systems
    }

    fn update_signature(&mut self, entity: Entity, type_id: ComponentTypeId, present: bool) -> EcsResult<()> {
        let mut signature = self.entities.signature(entity)?.clone();
        signature.set(type_id, present);
        self.entities.set_signature(entity, signature)?;

        let signature = self.entities.signature(entity)?;
        self.systems.on_signature_changed(entity, signature);
        Ok(())
    }
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new()
    }
}
