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
//! Standard 2D game components
//!
//! Plain records with property tables, so scene loaders can create and
//! configure them by name. Screen coordinates are used throughout: `x` grows
//! to the right and `y` grows downward.

use crate::ecs::{Component, Entity, PropertyTable};

/// Position of an entity
///
/// # Examples
///
/// ```
/// use ecs_core::ecs::components::Transform;
///
/// let t = Transform::new(1.0, 2.0, 3.0);
/// assert_eq!(t.y, 2.0);
/// assert_eq!(Transform::default(), Transform::new(0.0, 0.0, 0.0));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Transform {
    /// Horizontal coordinate
    pub x: f64,
    /// Vertical coordinate
    pub y: f64,
    /// Depth, used for draw ordering
    pub z: f64,
}

impl Transform {
    /// Create a transform at the given coordinates
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Transform { x, y, z }
    }
}

impl Component for Transform {
    const NAME: &'static str = "Transform";

    fn properties() -> PropertyTable<Self> {
        PropertyTable::new()
            .field("x", |t: &Transform| &t.x, |t: &mut Transform| &mut t.x)
            .field("y", |t: &Transform| &t.y, |t: &mut Transform| &mut t.y)
            .field("z", |t: &Transform| &t.z, |t: &mut Transform| &mut t.z)
    }
}

/// Default gravitational acceleration
pub const STANDARD_GRAVITY: f64 = 9.81;

/// Constant downward acceleration applied to an entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gravity {
    /// Acceleration in units per second squared
    pub gravity: f64,
}

impl Default for Gravity {
    fn default() -> Self {
        Gravity {
            gravity: STANDARD_GRAVITY,
        }
    }
}

impl Component for Gravity {
    const NAME: &'static str = "Gravity";

    fn properties() -> PropertyTable<Self> {
        PropertyTable::new().field(
            "gravity",
            |g: &Gravity| &g.gravity,
            |g: &mut Gravity| &mut g.gravity,
        )
    }
}

/// One contact recorded by the collision system
///
/// `sides` is a bit set of [`Collision::LEFT`], [`Collision::TOP`],
/// [`Collision::RIGHT`] and [`Collision::BOTTOM`] naming the side of the
/// collider that was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collision {
    /// Side flags
    pub sides: u8,
    /// The other entity of the contact
    pub other: Entity,
}

impl Collision {
    /// Contact on the left edge
    pub const LEFT: u8 = 1;
    /// Contact on the top edge
    pub const TOP: u8 = 2;
    /// Contact on the right edge
    pub const RIGHT: u8 = 4;
    /// Contact on the bottom edge
    pub const BOTTOM: u8 = 8;
    /// Every side
    pub const ALL: u8 = Self::LEFT | Self::TOP | Self::RIGHT | Self::BOTTOM;

    /// Create a contact with `other` on the given sides
    pub fn new(sides: u8, other: Entity) -> Self {
        Collision { sides, other }
    }

    /// Check whether every flag in `side` is set
    pub fn has_side(&self, side: u8) -> bool {
        self.sides & side == side
    }

    /// Set the flags in `side`
    pub fn add_side(&mut self, side: u8) {
        self.sides |= side;
    }
}

/// Axis-aligned rectangle attached to an entity's [`Transform`]
///
/// `collisions` is rewritten by the collision system every time it runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RectangleCollider {
    /// Horizontal offset from the transform
    pub offset_x: f64,
    /// Vertical offset from the transform
    pub offset_y: f64,
    /// Rectangle width
    pub width: f64,
    /// Rectangle height
    pub height: f64,
    /// Contacts found during the last collision pass
    pub collisions: Vec<Collision>,
}

impl RectangleCollider {
    /// Create a collider of the given size with no offset
    pub fn new(width: f64, height: f64) -> Self {
        RectangleCollider {
            width,
            height,
            ..Default::default()
        }
    }

    /// Set the offset from the transform
    pub fn with_offset(mut self, offset_x: f64, offset_y: f64) -> Self {
        self.offset_x = offset_x;
        self.offset_y = offset_y;
        self
    }

    /// World-space bounds as `(left, top, right, bottom)`
    pub fn bounds(&self, transform: &Transform) -> (f64, f64, f64, f64) {
        let left = transform.x + self.offset_x;
        let top = transform.y + self.offset_y;
        (left, top, left + self.width, top + self.height)
    }

    /// Check whether a contact with `other` was recorded
    pub fn is_colliding_with(&self, other: Entity) -> bool {
        self.collisions.iter().any(|c| c.other == other)
    }
}

impl Component for RectangleCollider {
    const NAME: &'static str = "RectangleCollider";

    fn properties() -> PropertyTable<Self> {
        PropertyTable::new()
            .field(
                "offsetX",
                |c: &RectangleCollider| &c.offset_x,
                |c: &mut RectangleCollider| &mut c.offset_x,
            )
            .field(
                "offsetY",
                |c: &RectangleCollider| &c.offset_y,
                |c: &mut RectangleCollider| &mut c.offset_y,
            )
            .field(
                "width",
                |c: &RectangleCollider| &c.width,
                |c: &mut RectangleCollider| &mut c.width,
            )
            .field(
                "height",
                |c: &RectangleCollider| &c.height,
                |c: &mut RectangleCollider| &mut c.height,
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::PropertyValue;

    #[test]
    fn test_defaults() {
        assert_eq!(Gravity::default().gravity, 9.81);
        assert_eq!(Transform::default(), Transform::new(0.0, 0.0, 0.0));

        let collider = RectangleCollider::default();
        assert_eq!(collider.offset_x, 0.0);
        assert!(collider.collisions.is_empty());
    }

    #[test]
    fn test_collision_flags() {
        let mut c = Collision::new(Collision::LEFT, Entity::new(3));
        assert!(c.has_side(Collision::LEFT));
        assert!(!c.has_side(Collision::TOP));

        c.add_side(Collision::TOP);
        assert!(c.has_side(Collision::LEFT | Collision::TOP));
        assert!(!c.has_side(Collision::ALL));
        assert_eq!(Collision::ALL, 15);
    }

    #[test]
    fn test_bounds_include_offset() {
        let collider = RectangleCollider::new(4.0, 2.0).with_offset(1.0, -1.0);
        let transform = Transform::new(10.0, 20.0, 0.0);
        assert_eq!(collider.bounds(&transform), (11.0, 19.0, 15.0, 21.0));
    }

    #[test]
    fn test_collider_properties_use_loader_names() {
        let table = RectangleCollider::properties();
        let names: Vec<_> = table.schema().iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["offsetX", "offsetY", "width", "height"]);

        let mut collider = RectangleCollider::default();
        table
            .set(&mut collider, "width", PropertyValue::Float(32.0))
            .unwrap();
        assert_eq!(collider.width, 32.0);
    }

    #[test]
    fn test_transform_clone_keeps_property_view() {
        let table = Transform::properties();
        let mut original = Transform::default();
        table.set(&mut original, "x", PropertyValue::Float(5.0)).unwrap();

        let copy = original;
        assert_eq!(table.get(&copy, "x").unwrap(), PropertyValue::Float(5.0));
    }
}
