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
//! Coordinator configuration
//!
//! Limits and storage sizing for a [`Coordinator`](crate::ecs::Coordinator).
//! Values can be set through the builder methods or read from the
//! environment:
//!
//! ```bash
//! export ECS_MAX_ENTITIES=10000
//! export ECS_MAX_COMPONENTS=64
//! export ECS_INITIAL_CAPACITY=256
//! ```

use crate::ecs::{MAX_COMPONENTS, MAX_ENTITIES};
use crate::error::{EcsError, EcsResult};
use log::debug;
use std::str::FromStr;

/// Environment variable overriding [`EcsConfig::max_entities`]
pub const ENV_MAX_ENTITIES: &str = "ECS_MAX_ENTITIES";
/// Environment variable overriding [`EcsConfig::max_components`]
pub const ENV_MAX_COMPONENTS: &str = "ECS_MAX_COMPONENTS";
/// Environment variable overriding [`EcsConfig::initial_capacity`]
pub const ENV_INITIAL_CAPACITY: &str = "ECS_INITIAL_CAPACITY";

/// Configuration for coordinator limits and storage sizing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EcsConfig {
    /// Maximum number of simultaneously live entities
    pub max_entities: u32,
    /// Maximum number of registered component types (at most [`MAX_COMPONENTS`])
    pub max_components: usize,
    /// Capacity pre-reserved in every new component store
    pub initial_capacity: usize,
    /// Whether to log every successful structural change at debug level
    pub log_structural_changes: bool,
}

impl Default for EcsConfig {
    fn default() -> Self {
        EcsConfig {
            max_entities: MAX_ENTITIES,
            max_components: MAX_COMPONENTS,
            initial_capacity: 0,
            log_structural_changes: false,
        }
    }
}

impl EcsConfig {
    /// Create a configuration with the default limits
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the entity limit
    pub fn with_max_entities(mut self, max_entities: u32) -> Self {
        self.max_entities = max_entities;
        self
    }

    /// Set the component type limit
    pub fn with_max_components(mut self, max_components: usize) -> Self {
        self.max_components = max_components;
        self
    }

    /// Pre-reserve capacity in every component store
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Log successful structural changes
    pub fn with_structural_logging(mut self) -> Self {
        self.log_structural_changes = true;
        self
    }

    /// Build a configuration from the default values overridden by any
    /// `ECS_*` environment variables that are set
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::InvalidConfig`] if a variable is set but cannot be
    /// parsed, or if the resulting configuration fails [`validate`](Self::validate).
    pub fn from_env() -> EcsResult<Self> {
        let mut config = EcsConfig::default();

        if let Some(value) = read_env(ENV_MAX_ENTITIES)? {
            config.max_entities = value;
        }
        if let Some(value) = read_env(ENV_MAX_COMPONENTS)? {
            config.max_components = value;
        }
        if let Some(value) = read_env(ENV_INITIAL_CAPACITY)? {
            config.initial_capacity = value;
        }

        config.validate()?;
        debug!("Loaded ECS configuration from environment: {:?}", config);
        Ok(config)
    }

    /// Check that all limits are usable
    pub fn validate(&self) -> EcsResult<()> {
        if self.max_entities == 0 {
            return Err(EcsError::InvalidConfig(
                "max_entities must be at least 1".to_string(),
            ));
        }
        if self.max_components == 0 || self.max_components > MAX_COMPONENTS {
            return Err(EcsError::InvalidConfig(format!(
                "max_components must be between 1 and {}, got {}",
                MAX_COMPONENTS, self.max_components
            )));
        }
        Ok(())
    }
}

fn read_env<T: FromStr>(key: &str) -> EcsResult<Option<T>> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| EcsError::InvalidConfig(format!("{} has invalid value '{}'", key, raw))),
        Err(_) => Ok(None),
    }
}
