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
//! Plugin system
//!
//! Plugins bundle component types and systems so that an application can
//! assemble a [`Coordinator`](crate::ecs::Coordinator) from reusable parts.
//!
//! # Features
//!
//! - **Dependency Management**: plugins are built in dependency order with
//!   circular dependency detection
//! - **Version Checking**: API version compatibility between crate and plugins
//!
//! # Example
//!
//! ```rust
//! use ecs_core::ecs::Coordinator;
//! use ecs_core::ecs::components::Gravity;
//! use ecs_core::error::EcsResult;
//! use ecs_core::plugins::{Plugin, PluginRegistry, StandardPlugin, STANDARD_PLUGIN_NAME};
//! use std::any::Any;
//!
//! struct Falling;
//!
//! impl Plugin for Falling {
//!     fn name(&self) -> &str { "falling" }
//!     fn version(&self) -> &str { "1.0.0" }
//!     fn dependencies(&self) -> Vec<&str> { vec![STANDARD_PLUGIN_NAME] }
//!
//!     fn build(&mut self, coordinator: &mut Coordinator) -> EcsResult<()> {
//!         let ball = coordinator.create_entity("ball")?;
//!         coordinator.add_default_component::<Gravity>(ball)
//!     }
//!
//!     fn as_any(&self) -> &dyn Any { self }
//!     fn as_any_mut(&mut self) -> &mut dyn Any { self }
//! }
//!
//! let mut coordinator = Coordinator::new();
//! let mut plugins = PluginRegistry::new();
//! plugins.register(Box::new(Falling)).unwrap();
//! plugins.register(Box::new(StandardPlugin::new())).unwrap();
//! plugins.build_all(&mut coordinator).unwrap();
//!
//! assert_eq!(plugins.load_order(), &["standard", "falling"]);
//! ```
//!
//! # Version Compatibility
//!
//! The plugin API follows semantic versioning. Plugins declare the API
//! version they target through [`Plugin::api_version`], which defaults to
//! [`PLUGIN_API_VERSION`].

pub mod api;
pub mod registry;
pub mod standard;

pub use api::{Plugin, PLUGIN_API_VERSION};
pub use registry::PluginRegistry;
pub use standard::{StandardPlugin, STANDARD_PLUGIN_NAME};
