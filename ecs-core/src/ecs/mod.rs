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
//! Entity Component System (ECS) core implementation
//!
//! This module provides the bookkeeping layer of the ECS:
//! - Entity allocation, recycling and naming
//! - Densely packed per-type component storage
//! - Name-keyed component construction and property access
//! - System subscriptions maintained from entity signatures

mod component;
mod coordinator;
mod entity;
pub mod property;
mod registry;
mod signature;
mod system;

/// Standard components
pub mod components;

/// Standard systems
pub mod systems;

pub use component::{Component, ComponentStorage, PackedStorage};
pub use coordinator::Coordinator;
pub use entity::{Entity, EntityRegistry, MAX_ENTITIES};
pub use property::{PropertyAccess, PropertyInfo, PropertyKind, PropertyTable, PropertyType, PropertyValue};
pub use registry::{ComponentMut, ComponentRef, ComponentRegistry};
pub use signature::{ComponentTypeId, Signature, MAX_COMPONENTS};
pub use system::{System, SystemRegistry};
