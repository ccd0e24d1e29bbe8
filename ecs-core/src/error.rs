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
//! Error types for entity, component and system bookkeeping
//!
//! Every fallible operation in the crate returns [`EcsResult`]. The variants
//! are deliberately fine grained so that callers can tell "no such entity"
//! from "entity exists but lacks this component" from "component type never
//! registered". [`EcsError::kind`] collapses them into the coarse
//! [`ErrorKind`] taxonomy for callers that only care about the category.

use crate::ecs::Entity;
use crate::ecs::property::PropertyKind;
use thiserror::Error;

/// Coarse classification of an [`EcsError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// An entity or component-type limit was reached
    Capacity,
    /// Re-registration or a duplicate insert
    Duplicate,
    /// Unknown name, unregistered type/system, or missing component
    NotFound,
    /// Entity identifier beyond the allocated bound
    OutOfRange,
    /// A dynamically-typed value did not match the declared type
    TypeMismatch,
    /// Configuration or plugin setup was rejected
    InvalidConfig,
}

/// Errors produced by the ECS core
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EcsError {
    /// All entity identifiers are in use.
    #[error("entity limit reached: capacity {capacity}")]
    EntityLimitReached {
        /// Maximum number of simultaneously live entities.
        capacity: u32,
    },

    /// All component type slots of the signature are in use.
    #[error("component type limit reached: capacity {capacity}")]
    ComponentLimitReached {
        /// Maximum number of registered component types.
        capacity: usize,
    },

    /// An entity with this name is already alive.
    #[error("entity name '{0}' is already in use")]
    DuplicateEntityName(String),

    /// The component type name was registered before.
    #[error("component type '{0}' is already registered")]
    DuplicateComponentType(&'static str),

    /// The entity already holds a component of this type.
    #[error("{entity} already has a '{component}' component")]
    DuplicateComponent {
        /// Entity that was targeted.
        entity: Entity,
        /// Name of the component type.
        component: &'static str,
    },

    /// The system type was registered before.
    #[error("system '{0}' is already registered")]
    DuplicateSystem(&'static str),

    /// A plugin with this name was registered before.
    #[error("plugin '{0}' is already registered")]
    DuplicatePlugin(String),

    /// No live entity carries this name.
    #[error("no entity named '{0}'")]
    EntityNotFound(String),

    /// The identifier is in range but not currently allocated.
    #[error("{0} is not alive")]
    EntityNotAlive(Entity),

    /// The identifier lies beyond the entity bound.
    #[error("{entity} is out of range (capacity {capacity})")]
    EntityOutOfRange {
        /// Offending identifier.
        entity: Entity,
        /// Number of identifiers the registry manages.
        capacity: u32,
    },

    /// The component type was never registered.
    #[error("component type '{0}' is not registered")]
    ComponentNotRegistered(String),

    /// A component name resolved to a storage holding a different Rust type.
    #[error("component type '{0}' is registered with a different Rust type")]
    ComponentTypeMismatch(&'static str),

    /// The entity exists but does not hold this component.
    #[error("{entity} has no '{component}' component")]
    MissingComponent {
        /// Entity that was queried.
        entity: Entity,
        /// Name of the component type.
        component: &'static str,
    },

    /// The system type was never registered.
    #[error("system '{0}' is not registered")]
    SystemNotRegistered(&'static str),

    /// The component type has no property with this name.
    #[error("component '{component}' has no property '{property}'")]
    UnknownProperty {
        /// Name of the component type.
        component: &'static str,
        /// Requested property name.
        property: String,
    },

    /// A property was assigned a value of the wrong dynamic type.
    #[error("property '{component}.{property}' expects {expected:?}, got {found:?}")]
    PropertyTypeMismatch {
        /// Name of the component type.
        component: &'static str,
        /// Property that was assigned.
        property: &'static str,
        /// Declared kind of the property.
        expected: PropertyKind,
        /// Kind of the supplied value.
        found: PropertyKind,
    },

    /// A plugin depends on a plugin that was never registered.
    #[error("plugin '{plugin}' depends on '{dependency}' which is not registered")]
    MissingPluginDependency {
        /// Dependent plugin.
        plugin: String,
        /// Missing dependency.
        dependency: String,
    },

    /// The plugin dependency graph contains a cycle.
    #[error("circular dependency detected in plugin dependencies")]
    PluginDependencyCycle,

    /// The plugin was built against an incompatible API version.
    #[error("plugin '{plugin}' API version {plugin_api} is incompatible with engine API version {engine_api}")]
    IncompatiblePlugin {
        /// Plugin name.
        plugin: String,
        /// API version the plugin declares.
        plugin_api: String,
        /// API version of this crate.
        engine_api: &'static str,
    },

    /// Plugins were already built into a coordinator.
    #[error("plugin registry already built")]
    PluginsAlreadyBuilt,

    /// An earlier build stopped part way, leaving the coordinator partly set up.
    #[error("plugin '{0}' failed to build; the registry cannot be built again")]
    PluginBuildAborted(String),

    /// A configuration value was rejected.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl EcsError {
    /// Classify the error into its coarse [`ErrorKind`]
    pub fn kind(&self) -> ErrorKind {
        match self {
            EcsError::EntityLimitReached { .. } | EcsError::ComponentLimitReached { .. } => {
                ErrorKind::Capacity
            }
            EcsError::DuplicateEntityName(_)
            | EcsError::DuplicateComponentType(_)
            | EcsError::DuplicateComponent { .. }
            | EcsError::DuplicateSystem(_)
            | EcsError::DuplicatePlugin(_) => ErrorKind::Duplicate,
            EcsError::EntityNotFound(_)
            | EcsError::EntityNotAlive(_)
            | EcsError::ComponentNotRegistered(_)
            | EcsError::MissingComponent { .. }
            | EcsError::SystemNotRegistered(_)
            | EcsError::UnknownProperty { .. }
            | EcsError::MissingPluginDependency { .. } => ErrorKind::NotFound,
            EcsError::EntityOutOfRange { .. } => ErrorKind::OutOfRange,
            EcsError::ComponentTypeMismatch(_) | EcsError::PropertyTypeMismatch { .. } => {
                ErrorKind::TypeMismatch
            }
            EcsError::PluginDependencyCycle
            | EcsError::IncompatiblePlugin { .. }
            | EcsError::PluginsAlreadyBuilt
            | EcsError::PluginBuildAborted(_)
            | EcsError::InvalidConfig(_) => ErrorKind::InvalidConfig,
        }
    }

    /// Shorthand for `self.kind() == ErrorKind::NotFound`
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

/// Result type for ECS operations
pub type EcsResult<T> = Result<T, EcsError>;
