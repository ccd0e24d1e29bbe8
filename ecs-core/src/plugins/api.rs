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
//! Plugin API trait
//!
//! A plugin is a named bundle of component types and systems that it
//! registers on a [`Coordinator`] when built.
//!
//! # Contracts
//!
//! Plugins must:
//! - Register every component type their systems require before the systems
//! - Declare the plugins whose components they use as dependencies
//! - Not create circular dependencies with other plugins

use crate::ecs::Coordinator;
use crate::error::EcsResult;
use std::any::Any;

/// Version of the plugin API
///
/// Format: MAJOR.MINOR.PATCH following semantic versioning.
pub const PLUGIN_API_VERSION: &str = "0.1.0";

/// A bundle of registrations applied to a coordinator
pub trait Plugin: Send + Sync {
    /// Get the name of this plugin
    ///
    /// Must be unique across all registered plugins.
    fn name(&self) -> &str;

    /// Get the version of this plugin
    ///
    /// Should follow semantic versioning (MAJOR.MINOR.PATCH).
    fn version(&self) -> &str;

    /// Get the plugin API version this plugin was built against
    fn api_version(&self) -> &str {
        PLUGIN_API_VERSION
    }

    /// Get the list of plugin names this plugin depends on
    ///
    /// Dependencies are built before this plugin.
    fn dependencies(&self) -> Vec<&str> {
        Vec::new()
    }

    /// Register this plugin's component types and systems
    ///
    /// Called once, after every dependency was built.
    fn build(&mut self, coordinator: &mut Coordinator) -> EcsResult<()>;

    /// Allow downcasting to concrete plugin types
    fn as_any(&self) -> &dyn Any;

    /// Allow mutable downcasting to concrete plugin types
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
