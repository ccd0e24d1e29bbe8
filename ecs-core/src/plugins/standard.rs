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
//! Built-in plugin registering the standard components and systems

use crate::ecs::components::{Gravity, RectangleCollider, Transform};
use crate::ecs::systems::CollisionSystem;
use crate::ecs::Coordinator;
use crate::error::EcsResult;
use crate::plugins::api::Plugin;
use std::any::Any;

/// Name under which [`StandardPlugin`] registers
pub const STANDARD_PLUGIN_NAME: &str = "standard";

/// Registers [`Transform`], [`Gravity`], [`RectangleCollider`] and the
/// [`CollisionSystem`]
///
/// # Example
///
/// ```
/// use ecs_core::ecs::Coordinator;
/// use ecs_core::ecs::systems::CollisionSystem;
/// use ecs_core::plugins::{PluginRegistry, StandardPlugin};
///
/// let mut coordinator = Coordinator::new();
/// let mut plugins = PluginRegistry::new();
/// plugins.register(Box::new(StandardPlugin::new())).unwrap();
/// plugins.build_all(&mut coordinator).unwrap();
///
/// assert_eq!(
///     coordinator.component_names().collect::<Vec<_>>(),
///     vec!["Transform", "Gravity", "RectangleCollider"]
/// );
/// assert!(coordinator.system::<CollisionSystem>().is_ok());
/// ```
#[derive(Debug, Default)]
pub struct StandardPlugin {
    with_collisions: bool,
}

impl StandardPlugin {
    /// Create the plugin with collision detection enabled
    pub fn new() -> Self {
        StandardPlugin {
            with_collisions: true,
        }
    }

    /// Register only the components, without the collision system
    pub fn components_only() -> Self {
        StandardPlugin {
            with_collisions: false,
        }
    }
}

impl Plugin for StandardPlugin {
    fn name(&self) -> &str {
        STANDARD_PLUGIN_NAME
    }

    fn version(&self) -> &str {
        env!("CARGO_PKG_VERSION")
    }

    fn build(&mut self, coordinator: &mut Coordinator) -> EcsResult<()> {
        coordinator.register_component::<Transform>()?;
        coordinator.register_component::<Gravity>()?;
        coordinator.register_component::<RectangleCollider>()?;
        if self.with_collisions {
            coordinator.register_system::<CollisionSystem>()?;
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
