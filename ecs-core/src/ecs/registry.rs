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
//! Component type registry
//!
//! The [`ComponentRegistry`] owns one [`PackedStorage`] per registered
//! component type and hands out the type ids that index entity signatures.
//! Each storage is wrapped in a small capability object so that loaders can
//! construct, read and write components knowing only the type's name.
//!
//! Structural mutators (add, remove, destroy fan-out) are crate-private:
//! they must go through the [`Coordinator`](crate::ecs::Coordinator) so that
//! signatures and system subscriptions stay in step. Systems receive the
//! registry by mutable reference and may freely read or modify component
//! values.

use crate::ecs::property::{PropertyAccess, PropertyInfo, PropertyTable, PropertyValue};
use crate::ecs::{Component, ComponentStorage, ComponentTypeId, Entity, PackedStorage};
use crate::error::{EcsError, EcsResult};
use log::{trace, warn};
use std::any::Any;
use std::collections::HashMap;

/// Per-type capability set used for name-keyed access
trait ErasedStorage: Send + Sync {
    fn component_name(&self) -> &'static str;
    fn construct(&mut self, entity: Entity) -> EcsResult<()>;
    fn access(&self, entity: Entity) -> EcsResult<ComponentRef<'_>>;
    fn access_mut(&mut self, entity: Entity) -> EcsResult<ComponentMut<'_>>;
    fn contains(&self, entity: Entity) -> bool;
    fn len(&self) -> usize;
    fn on_entity_destroyed(&mut self, entity: Entity);
    fn schema(&self) -> Vec<PropertyInfo>;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

struct ComponentColumn<T: Component> {
    storage: PackedStorage<T>,
    properties: PropertyTable<T>,
}

impl<T: Component + Default> ErasedStorage for ComponentColumn<T> {
    fn component_name(&self) -> &'static str {
        T::NAME
    }

    fn construct(&mut self, entity: Entity) -> EcsResult<()> {
        self.storage.insert(entity, T::default())
    }

    fn access(&self, entity: Entity) -> EcsResult<ComponentRef<'_>> {
        let value = self.storage.get(entity)?;
        Ok(ComponentRef {
            name: T::NAME,
            value,
            properties: &self.properties,
        })
    }

    fn access_mut(&mut self, entity: Entity) -> EcsResult<ComponentMut<'_>> {
        let value = self.storage.get_mut(entity)?;
        Ok(ComponentMut {
            name: T::NAME,
            value,
            properties: &self.properties,
        })
    }

    fn contains(&self, entity: Entity) -> bool {
        self.storage.contains(entity)
    }

    fn len(&self) -> usize {
        self.storage.len()
    }

    fn on_entity_destroyed(&mut self, entity: Entity) {
        self.storage.on_entity_destroyed(entity);
    }

    fn schema(&self) -> Vec<PropertyInfo> {
        self.properties.schema()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Untyped shared handle to one entity's component
pub struct ComponentRef<'a> {
    name: &'static str,
    value: &'a dyn Any,
    properties: &'a dyn PropertyAccess,
}

impl<'a> ComponentRef<'a> {
    /// Registration name of the component type
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Recover the concrete component
    pub fn downcast_ref<T: Component>(&self) -> Option<&'a T> {
        self.value.downcast_ref::<T>()
    }

    /// Read a property by name
    pub fn get(&self, property: &str) -> EcsResult<PropertyValue> {
        self.properties.read(self.value, property)
    }

    /// Names and kinds of the component's properties
    pub fn properties(&self) -> Vec<PropertyInfo> {
        self.properties.schema()
    }
}

/// Untyped exclusive handle to one entity's component
pub struct ComponentMut<'a> {
    name: &'static str,
    value: &'a mut dyn Any,
    properties: &'a dyn PropertyAccess,
}

impl<'a> ComponentMut<'a> {
    /// Registration name of the component type
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Recover the concrete component
    pub fn downcast_ref<T: Component>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Recover the concrete component mutably
    pub fn downcast_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.value.downcast_mut::<T>()
    }

    /// Read a property by name
    pub fn get(&self, property: &str) -> EcsResult<PropertyValue> {
        self.properties.read(&*self.value, property)
    }

    /// Assign a property by name
    pub fn set(&mut self, property: &str, value: PropertyValue) -> EcsResult<()> {
        self.properties.write(&mut *self.value, property, value)
    }

    /// Names and kinds of the component's properties
    pub fn properties(&self) -> Vec<PropertyInfo> {
        self.properties.schema()
    }
}

/// Owns every component storage and assigns component type ids
pub struct ComponentRegistry {
    /// Indexed by type id
    columns: Vec<Box<dyn ErasedStorage>>,
    by_name: HashMap<&'static str, ComponentTypeId>,
    max_components: usize,
    initial_capacity: usize,
}

impl ComponentRegistry {
    pub(crate) fn new(max_components: usize, initial_capacity: usize) -> Self {
        ComponentRegistry {
            columns: Vec::new(),
            by_name: HashMap::new(),
            max_components,
            initial_capacity,
        }
    }

    /// Register component type `T` and return its type id
    ///
    /// # Errors
    ///
    /// - [`EcsError::DuplicateComponentType`] if `T::NAME` is taken; the
    ///   existing registration is left untouched
    /// - [`EcsError::ComponentLimitReached`] once every signature bit is assigned
    pub fn register<T: Component + Default>(&mut self) -> EcsResult<ComponentTypeId> {
        if self.by_name.contains_key(T::NAME) {
            warn!("Tried to register component type '{}' twice", T::NAME);
            return Err(EcsError::DuplicateComponentType(T::NAME));
        }
        if self.columns.len() >= self.max_components {
            warn!(
                "Cannot register '{}': component type limit of {} reached",
                T::NAME,
                self.max_components
            );
            return Err(EcsError::ComponentLimitReached {
                capacity: self.max_components,
            });
        }

        let type_id = self.columns.len() as ComponentTypeId;
        self.columns.push(Box::new(ComponentColumn::<T> {
            storage: PackedStorage::with_capacity(self.initial_capacity),
            properties: T::properties(),
        }));
        self.by_name.insert(T::NAME, type_id);

        trace!("Registered component type '{}' as {}", T::NAME, type_id);
        Ok(type_id)
    }

    /// Type id assigned to `T`
    pub fn type_id_of<T: Component>(&self) -> EcsResult<ComponentTypeId> {
        self.type_id_by_name(T::NAME)
    }

    /// Type id assigned to the component type registered under `name`
    pub fn type_id_by_name(&self, name: &str) -> EcsResult<ComponentTypeId> {
        self.by_name.get(name).copied().ok_or_else(|| {
            warn!("Component type '{}' is not registered", name);
            EcsError::ComponentNotRegistered(name.to_string())
        })
    }

    /// Check whether `T` is registered
    pub fn is_registered<T: Component>(&self) -> bool {
        self.by_name.contains_key(T::NAME)
    }

    /// Number of registered component types
    pub fn registered_count(&self) -> usize {
        self.columns.len()
    }

    /// Registered component names in registration (type id) order
    pub fn component_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(|column| column.component_name())
    }

    /// Names and kinds of the settable properties of a component type
    pub fn property_schema(&self, name: &str) -> EcsResult<Vec<PropertyInfo>> {
        Ok(self.column_by_name(name)?.schema())
    }

    /// Storage of component type `T`
    pub fn storage<T: Component>(&self) -> EcsResult<&PackedStorage<T>> {
        let column = self.column_by_name(T::NAME)?;
        column
            .as_any()
            .downcast_ref::<ComponentColumn<T>>()
            .map(|column| &column.storage)
            .ok_or(EcsError::ComponentTypeMismatch(T::NAME))
    }

    fn storage_mut<T: Component>(&mut self) -> EcsResult<&mut PackedStorage<T>> {
        let column = self.column_by_name_mut(T::NAME)?;
        column
            .as_any_mut()
            .downcast_mut::<ComponentColumn<T>>()
            .map(|column| &mut column.storage)
            .ok_or(EcsError::ComponentTypeMismatch(T::NAME))
    }

    /// Component `T` of `entity`
    pub fn get<T: Component>(&self, entity: Entity) -> EcsResult<&T> {
        self.storage::<T>()?.get(entity)
    }

    /// Component `T` of `entity`, mutably
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> EcsResult<&mut T> {
        self.storage_mut::<T>()?.get_mut(entity)
    }

    /// Check whether `entity` holds a `T`
    pub fn contains<T: Component>(&self, entity: Entity) -> bool {
        self.storage::<T>()
            .map_or(false, |storage| storage.contains(entity))
    }

    /// Untyped handle to the component registered under `name`
    pub fn get_by_name(&self, name: &str, entity: Entity) -> EcsResult<ComponentRef<'_>> {
        self.column_by_name(name)?.access(entity)
    }

    /// Untyped exclusive handle to the component registered under `name`
    pub fn get_by_name_mut(&mut self, name: &str, entity: Entity) -> EcsResult<ComponentMut<'_>> {
        self.column_by_name_mut(name)?.access_mut(entity)
    }

    /// Read one property of an entity's component
    pub fn get_property(
        &self,
        component: &str,
        entity: Entity,
        property: &str,
    ) -> EcsResult<PropertyValue> {
        self.get_by_name(component, entity)?.get(property)
    }

    /// Assign one property of an entity's component
    ///
    /// # Errors
    ///
    /// - [`EcsError::ComponentNotRegistered`] for an unknown component name
    /// - [`EcsError::MissingComponent`] if the entity lacks the component
    /// - [`EcsError::UnknownProperty`] or [`EcsError::PropertyTypeMismatch`]
    ///   if the assignment itself is rejected
    pub fn set_property(
        &mut self,
        component: &str,
        entity: Entity,
        property: &str,
        value: PropertyValue,
    ) -> EcsResult<()> {
        let mut handle = self.get_by_name_mut(component, entity)?;
        handle.set(property, value).map_err(|err| {
            warn!("Rejected {}.{} on {}: {}", component, property, entity, err);
            err
        })
    }

    /// Number of `name` components currently stored
    pub fn stored_count(&self, name: &str) -> EcsResult<usize> {
        Ok(self.column_by_name(name)?.len())
    }

    /// Check whether `entity` holds the component registered as `name`
    pub fn contains_by_name(&self, name: &str, entity: Entity) -> bool {
        self.column_by_name(name)
            .map_or(false, |column| column.contains(entity))
    }

    pub(crate) fn add<T: Component>(&mut self, entity: Entity, component: T) -> EcsResult<ComponentTypeId> {
        let type_id = self.type_id_of::<T>()?;
        self.storage_mut::<T>()?.insert(entity, component)?;
        Ok(type_id)
    }

    pub(crate) fn add_default<T: Component + Default>(&mut self, entity: Entity) -> EcsResult<ComponentTypeId> {
        self.add(entity, T::default())
    }

    pub(crate) fn add_by_name(&mut self, entity: Entity, name: &str) -> EcsResult<ComponentTypeId> {
        let type_id = self.type_id_by_name(name)?;
        self.columns[type_id as usize].construct(entity)?;
        Ok(type_id)
    }

    pub(crate) fn remove<T: Component>(&mut self, entity: Entity) -> EcsResult<(ComponentTypeId, T)> {
        let type_id = self.type_id_of::<T>()?;
        let component = self.storage_mut::<T>()?.remove(entity)?;
        Ok((type_id, component))
    }

    pub(crate) fn on_entity_destroyed(&mut self, entity: Entity) {
        for column in &mut self.columns {
            column.on_entity_destroyed(entity);
        }
    }

    fn column_by_name(&self, name: &str) -> EcsResult<&dyn ErasedStorage> {
        let type_id = self.type_id_by_name(name)?;
        Ok(self.columns[type_id as usize].as_ref())
    }

    fn column_by_name_mut(&mut self, name: &str) -> EcsResult<&mut dyn ErasedStorage> {
        let type_id = self.type_id_by_name(name)?;
        Ok(self.columns[type_id as usize].as_mut())
    }
}
