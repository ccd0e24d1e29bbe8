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
//! Plugin loading end to end

use ecs_core::ecs::components::{Collision, Gravity, RectangleCollider, Transform};
use ecs_core::ecs::systems::CollisionSystem;
use ecs_core::error::EcsResult;
use ecs_core::plugins::{Plugin, PluginRegistry, StandardPlugin, STANDARD_PLUGIN_NAME};
use ecs_core::{Coordinator, EcsError, ErrorKind};
use std::any::Any;

/// Spawns a small scene on top of the standard plugin
struct Scene {
    bodies: Vec<(&'static str, f64, f64)>,
}

impl Plugin for Scene {
    fn name(&self) -> &str {
        "scene"
    }

    fn version(&self) -> &str {
        "0.3.1"
    }

    fn dependencies(&self) -> Vec<&str> {
        vec![STANDARD_PLUGIN_NAME]
    }

    fn build(&mut self, coordinator: &mut Coordinator) -> EcsResult<()> {
        for &(name, x, y) in &self.bodies {
            let entity = coordinator.create_entity(name)?;
            coordinator.add_component(entity, Transform::new(x, y, 0.0))?;
            coordinator.add_component(entity, RectangleCollider::new(10.0, 10.0))?;
            coordinator.add_default_component::<Gravity>(entity)?;
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

/// Declares an API version from a future major release
struct FuturePlugin;

impl Plugin for FuturePlugin {
    fn name(&self) -> &str {
        "future"
    }

    fn version(&self) -> &str {
        "1.0.0"
    }

    fn api_version(&self) -> &str {
        "9.0.0"
    }

    fn build(&mut self, _coordinator: &mut Coordinator) -> EcsResult<()> {
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[test]
fn test_scene_collides_after_build() {
    let mut coordinator = Coordinator::new();
    let mut plugins = PluginRegistry::new();
    plugins
        .register(Box::new(Scene {
            bodies: vec![("floor", 0.0, 8.0), ("box", 0.0, 0.0), ("far", 500.0, 500.0)],
        }))
        .unwrap();
    plugins.register(Box::new(StandardPlugin::new())).unwrap();

    plugins.build_all(&mut coordinator).unwrap();
    assert!(plugins.is_built());
    assert_eq!(plugins.load_order(), &["standard", "scene"]);
    assert_eq!(coordinator.subscription::<CollisionSystem>().unwrap().len(), 3);

    coordinator.run_systems().unwrap();
    assert_eq!(coordinator.system::<CollisionSystem>().unwrap().last_contact_count(), 1);

    let floor = coordinator.entity("floor").unwrap();
    let falling = coordinator.entity("box").unwrap();
    let far = coordinator.entity("far").unwrap();

    // The box sits on top of the floor, overlapping by two units
    let hits = &coordinator.get_component::<RectangleCollider>(falling).unwrap().collisions;
    assert_eq!(hits, &vec![Collision::new(Collision::BOTTOM, floor)]);
    let hits = &coordinator.get_component::<RectangleCollider>(floor).unwrap().collisions;
    assert_eq!(hits, &vec![Collision::new(Collision::TOP, falling)]);
    assert!(coordinator
        .get_component::<RectangleCollider>(far)
        .unwrap()
        .collisions
        .is_empty());

    // Moving apart clears the contacts on the next pass
    coordinator.get_component_mut::<Transform>(falling).unwrap().y = -50.0;
    coordinator.run_systems().unwrap();
    assert!(!coordinator
        .get_component::<RectangleCollider>(floor)
        .unwrap()
        .is_colliding_with(falling));
}

#[test]
fn test_missing_dependency_fails_build() {
    let mut coordinator = Coordinator::new();
    let mut plugins = PluginRegistry::new();
    plugins.register(Box::new(Scene { bodies: Vec::new() })).unwrap();

    assert_eq!(
        plugins.build_all(&mut coordinator).unwrap_err(),
        EcsError::MissingPluginDependency {
            plugin: "scene".to_string(),
            dependency: STANDARD_PLUGIN_NAME.to_string(),
        }
    );
    assert!(!plugins.is_built());
}

#[test]
fn test_incompatible_plugin_is_rejected() {
    let mut plugins = PluginRegistry::new();
    let err = plugins.register(Box::new(FuturePlugin)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidConfig);
    assert_eq!(plugins.plugin_count(), 0);
}

#[test]
fn test_build_error_propagates() {
    let mut coordinator = Coordinator::new();
    let mut plugins = PluginRegistry::new();
    plugins.register(Box::new(StandardPlugin::new())).unwrap();
    plugins
        .register(Box::new(Scene {
            bodies: vec![("twin", 0.0, 0.0), ("twin", 5.0, 5.0)],
        }))
        .unwrap();

    assert_eq!(
        plugins.build_all(&mut coordinator).unwrap_err(),
        EcsError::DuplicateEntityName("twin".to_string())
    );

    // The standard plugin already registered its components, so a retry
    // is refused instead of failing on duplicate registrations
    assert_eq!(coordinator.components().registered_count(), 3);
    assert_eq!(plugins.aborted_by(), Some("scene"));
    assert_eq!(
        plugins.build_all(&mut coordinator).unwrap_err(),
        EcsError::PluginBuildAborted("scene".to_string())
    );
    assert_eq!(coordinator.components().registered_count(), 3);
}

#[test]
fn test_downcast_registered_plugin() {
    let mut plugins = PluginRegistry::new();
    plugins
        .register(Box::new(Scene {
            bodies: vec![("a", 0.0, 0.0)],
        }))
        .unwrap();

    let scene = plugins
        .get_mut("scene")
        .and_then(|p| p.as_any_mut().downcast_mut::<Scene>())
        .unwrap();
    scene.bodies.push(("b", 1.0, 1.0));

    let scene = plugins
        .get("scene")
        .and_then(|p| p.as_any().downcast_ref::<Scene>())
        .unwrap();
    assert_eq!(scene.bodies.len(), 2);
}
