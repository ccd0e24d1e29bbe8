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
//! # ECS Core
//!
//! The bookkeeping core of an ECS (Entity Component System) game engine.
//!
//! ## Features
//!
//! - **Entity Registry**: named entities with recycled identifiers and a fixed capacity
//! - **Packed Storage**: one dense array per component type with O(1) removal
//! - **Reflection**: component construction and property access by name
//! - **Subscriptions**: systems track the entities whose signatures match theirs
//! - **Extensibility**: plugins bundle component types and systems
//!
//! ## Example
//!
//! ```rust
//! use ecs_core::Coordinator;
//! use ecs_core::ecs::components::{RectangleCollider, Transform};
//! use ecs_core::ecs::systems::CollisionSystem;
//!
//! let mut coordinator = Coordinator::new();
//! coordinator.register_component::<Transform>().unwrap();
//! coordinator.register_component::<RectangleCollider>().unwrap();
//! coordinator.register_system::<CollisionSystem>().unwrap();
//!
//! let crate_box = coordinator.create_entity("crate").unwrap();
//! coordinator.add_component(crate_box, Transform::new(0.0, 0.0, 0.0)).unwrap();
//! coordinator.add_component(crate_box, RectangleCollider::new(32.0, 32.0)).unwrap();
//!
//! assert!(coordinator.subscription::<CollisionSystem>().unwrap().contains(&crate_box));
//! ```

#![warn(missing_docs)]

/// Runtime configuration
pub mod config;

/// Entity Component System implementation
pub mod ecs;

/// Error types
pub mod error;

/// Plugin system for extensibility
pub mod plugins;

pub use config::EcsConfig;
pub use ecs::{Coordinator, Entity};
pub use error::{EcsError, EcsResult, ErrorKind};
