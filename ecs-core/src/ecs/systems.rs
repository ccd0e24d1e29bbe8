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
//! Standard systems
//!
//! This module provides the rectangle collision pass over entities holding
//! both a [`Transform`] and a [`RectangleCollider`].

use crate::ecs::components::{Collision, RectangleCollider, Transform};
use crate::ecs::{ComponentRegistry, Entity, Signature, System};
use crate::error::EcsResult;
use log::trace;
use std::collections::BTreeSet;

/// World-space rectangle as `(left, top, right, bottom)`
type Bounds = (f64, f64, f64, f64);

/// Pairwise axis-aligned rectangle collision detection
///
/// Each run first clears every subscribed collider's contact list, then
/// tests every pair of subscribed entities. For an overlapping pair, both
/// colliders receive a [`Collision`] naming the other entity and the side
/// of their own rectangle that was hit, chosen along the axis of least
/// penetration. Equal penetration on both axes reports two sides.
///
/// Rectangles that merely share an edge do not collide.
///
/// Each entity reports the side of its own rectangle facing the other, not
/// [`Collision::ALL`], and the partner's flags are always the mirror image
/// (`LEFT` with `RIGHT`, `TOP` with `BOTTOM`). A box resting on a floor
/// reports `BOTTOM` while the floor reports `TOP`.
#[derive(Debug, Default)]
pub struct CollisionSystem {
    last_contacts: usize,
}

impl CollisionSystem {
    /// Create a new collision system
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of overlapping pairs found by the last run
    pub fn last_contact_count(&self) -> usize {
        self.last_contacts
    }
}

impl System for CollisionSystem {
    fn run(&mut self, entities: &BTreeSet<Entity>, components: &mut ComponentRegistry) -> EcsResult<()> {
        let mut boxes: Vec<(Entity, Bounds)> = Vec::with_capacity(entities.len());
        for &entity in entities {
            let transform = *components.get::<Transform>(entity)?;
            let collider = components.get_mut::<RectangleCollider>(entity)?;
            collider.collisions.clear();
            boxes.push((entity, collider.bounds(&transform)));
        }

        let mut contacts = Vec::new();
        for (i, &(first, first_box)) in boxes.iter().enumerate() {
            for &(second, second_box) in &boxes[i + 1..] {
                if let Some(sides) = contact_sides(first_box, second_box) {
                    contacts.push((first, Collision::new(sides, second)));
                    contacts.push((second, Collision::new(opposite_sides(sides), first)));
                }
            }
        }

        self.last_contacts = contacts.len() / 2;
        for (entity, collision) in contacts {
            components
                .get_mut::<RectangleCollider>(entity)?
                .collisions
                .push(collision);
        }

        trace!(
            "Collision pass over {} entities found {} contacts",
            boxes.len(),
            self.last_contacts
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "CollisionSystem"
    }

    fn required_signature(&self, components: &ComponentRegistry) -> EcsResult<Signature> {
        Ok(Signature::from_ids([
            components.type_id_of::<Transform>()?,
            components.type_id_of::<RectangleCollider>()?,
        ]))
    }
}

/// Sides of `a` touched by `b`, or `None` if they do not overlap
fn contact_sides(a: Bounds, b: Bounds) -> Option<u8> {
    let (a_left, a_top, a_right, a_bottom) = a;
    let (b_left, b_top, b_right, b_bottom) = b;

    let overlaps = a_left < b_right && a_right > b_left && a_top < b_bottom && a_bottom > b_top;
    if !overlaps {
        return None;
    }

    let overlap_x = a_right.min(b_right) - a_left.max(b_left);
    let overlap_y = a_bottom.min(b_bottom) - a_top.max(b_top);

    let horizontal = if b_left + b_right >= a_left + a_right {
        Collision::RIGHT
    } else {
        Collision::LEFT
    };
    let vertical = if b_top + b_bottom >= a_top + a_bottom {
        Collision::BOTTOM
    } else {
        Collision::TOP
    };

    let sides = if overlap_x < overlap_y {
        horizontal
    } else if overlap_y < overlap_x {
        vertical
    } else {
        horizontal | vertical
    };
    Some(sides)
}

/// Mirror side flags: left and right swap, top and bottom swap
fn opposite_sides(sides: u8) -> u8 {
    ((sides & (Collision::LEFT | Collision::TOP)) << 2)
        | ((sides & (Collision::RIGHT | Collision::BOTTOM)) >> 2)
}
