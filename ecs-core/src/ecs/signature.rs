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
//! Component signatures
//!
//! A [`Signature`] is a fixed-width bitset with one bit per registered
//! component type. Entities carry the signature of the components they
//! currently hold; systems carry the signature of the components they
//! require. An entity matches a system when its signature is a superset of
//! the system's.

use fixedbitset::FixedBitSet;
use std::fmt;
use std::ops::BitAnd;

/// Identifier assigned to a component type at registration
pub type ComponentTypeId = u16;

/// Width of every signature, and therefore the hard limit on registered
/// component types
pub const MAX_COMPONENTS: usize = 256;

/// Fixed-width component bitset
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    bits: FixedBitSet,
}

impl Signature {
    /// Create an empty signature
    pub fn new() -> Self {
        Signature {
            bits: FixedBitSet::with_capacity(MAX_COMPONENTS),
        }
    }

    /// Create a signature with the given component bits set
    pub fn from_ids<I>(ids: I) -> Self
    where
        I: IntoIterator<Item = ComponentTypeId>,
    {
        let mut signature = Signature::new();
        for id in ids {
            signature.insert(id);
        }
        signature
    }

    /// Builder-style variant of [`insert`](Self::insert)
    pub fn with(mut self, id: ComponentTypeId) -> Self {
        self.insert(id);
        self
    }

    /// Set the bit for a component type
    pub fn insert(&mut self, id: ComponentTypeId) {
        self.set(id, true);
    }

    /// Clear the bit for a component type
    pub fn remove(&mut self, id: ComponentTypeId) {
        self.set(id, false);
    }

    /// Set or clear the bit for a component type
    ///
    /// Ids at or beyond [`MAX_COMPONENTS`] are ignored; the component
    /// registry never hands them out.
    pub fn set(&mut self, id: ComponentTypeId, present: bool) {
        let index = id as usize;
        if index < MAX_COMPONENTS {
            self.bits.set(index, present);
        }
    }

    /// Check whether the bit for a component type is set
    pub fn contains(&self, id: ComponentTypeId) -> bool {
        self.bits.contains(id as usize)
    }

    /// Check whether this signature holds every bit of `required`
    ///
    /// Equivalent to `(self & required) == required`.
    pub fn matches(&self, required: &Signature) -> bool {
        required.bits.is_subset(&self.bits)
    }

    /// Clear every bit
    pub fn clear(&mut self) {
        self.bits.clear();
    }

    /// Check whether no bit is set
    pub fn is_empty(&self) -> bool {
        self.bits.count_ones(..) == 0
    }

    /// Number of bits set
    pub fn len(&self) -> usize {
        self.bits.count_ones(..)
    }

    /// Iterate over the set component type ids in ascending order
    pub fn ids(&self) -> impl Iterator<Item = ComponentTypeId> + '_ {
        self.bits.ones().map(|index| index as ComponentTypeId)
    }
}

impl Default for Signature {
    fn default() -> Self {
        Signature::new()
    }
}

impl BitAnd for &Signature {
    type Output = Signature;

    fn bitand(self, rhs: &Signature) -> Signature {
        Signature {
            bits: &self.bits & &rhs.bits,
        }
    }
}

impl FromIterator<ComponentTypeId> for Signature {
    fn from_iter<I: IntoIterator<Item = ComponentTypeId>>(iter: I) -> Self {
        Signature::from_ids(iter)
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.ids()).finish()
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature{:?}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_signature() {
        let sig = Signature::new();
        assert!(sig.is_empty());
        assert_eq!(sig.len(), 0);
        assert!(!sig.contains(0));
    }

    #[test]
    fn test_set_and_clear_bits() {
        let mut sig = Signature::new();
        sig.insert(3);
        sig.insert(255);
        assert!(sig.contains(3));
        assert!(sig.contains(255));
        assert_eq!(sig.len(), 2);

        sig.remove(3);
        assert!(!sig.contains(3));
        assert_eq!(sig.ids().collect::<Vec<_>>(), vec![255]);

        sig.clear();
        assert!(sig.is_empty());
    }

    #[test]
    fn test_out_of_width_ids_are_ignored() {
        let mut sig = Signature::new();
        sig.insert(MAX_COMPONENTS as ComponentTypeId);
        assert!(sig.is_empty());
        assert!(!sig.contains(MAX_COMPONENTS as ComponentTypeId));
    }

    #[test]
    fn test_matching() {
        let required = Signature::from_ids([0, 2]);
        let entity = Signature::from_ids([0, 1, 2]);
        let partial = Signature::from_ids([0, 1]);

        assert!(entity.matches(&required));
        assert!(!partial.matches(&required));
        assert_eq!(&entity & &required, required);
        assert_ne!(&partial & &required, required);

        // The empty requirement is matched by everything
        assert!(Signature::new().matches(&Signature::new()));
        assert!(partial.matches(&Signature::new()));
    }

    #[test]
    fn test_debug_lists_ids() {
        let sig: Signature = [1, 4].into_iter().collect();
        assert_eq!(format!("{:?}", sig), "{1, 4}");
        assert_eq!(sig.to_string(), "Signature{1, 4}");
    }
}
