//! Fixed-width component bitsets.
//!
//! A [`Signature`] is used two ways:
//! - per entity, bit `c` is set while the entity owns a component whose [`component::Id`] is `c`;
//! - per system, bit `c` is set when the system requires component `c`.
//!
//! An entity belongs to a system's working set exactly when its signature
//! [contains all](Signature::contains_all) of the system's bits.

use core::fmt;

use fixedbitset::FixedBitSet;

use crate::ecs::component;

/// A fixed-width bitset with one bit per component kind.
///
/// The width is chosen at construction (normally
/// [`Config::max_component_kinds`](crate::ecs::Config::max_component_kinds)) and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    bits: FixedBitSet,
}

impl Signature {
    /// Create an empty signature `width` bits wide.
    #[inline]
    pub fn new(width: u32) -> Self {
        Self {
            bits: FixedBitSet::with_capacity(width as usize),
        }
    }

    /// Create a signature `width` bits wide with the given component bits set.
    ///
    /// # Panics
    /// - If any id is not below `width`.
    pub fn from_ids(width: u32, ids: impl IntoIterator<Item = component::Id>) -> Self {
        let mut signature = Self::new(width);
        for id in ids {
            signature.insert(id);
        }
        signature
    }

    /// The number of component kinds this signature can describe.
    #[inline]
    pub fn width(&self) -> u32 {
        self.bits.len() as u32
    }

    /// Set the bit for a component.
    ///
    /// # Panics
    /// - If `id` is not below [`width`](Self::width).
    #[inline]
    pub fn insert(&mut self, id: component::Id) {
        self.bits.insert(id.index());
    }

    /// Clear the bit for a component. Ids outside the signature are already clear.
    #[inline]
    pub fn remove(&mut self, id: component::Id) {
        if id.index() < self.bits.len() {
            self.bits.set(id.index(), false);
        }
    }

    /// Check whether the bit for a component is set.
    #[inline]
    pub fn contains(&self, id: component::Id) -> bool {
        self.bits.contains(id.index())
    }

    /// Check whether every bit set in `required` is also set here, i.e.
    /// `(self & required) == required`.
    #[inline]
    pub fn contains_all(&self, required: &Signature) -> bool {
        self.bits.is_superset(&required.bits)
    }

    /// Clear every bit.
    #[inline]
    pub fn clear(&mut self) {
        self.bits.clear();
    }

    /// Check whether no bit is set.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits.is_clear()
    }

    /// The number of bits set.
    #[inline]
    pub fn len(&self) -> usize {
        self.bits.count_ones(..)
    }

    /// Iterate the component ids whose bits are set, in ascending order.
    #[inline]
    pub fn ids(&self) -> impl Iterator<Item = component::Id> + '_ {
        self.bits.ones().map(component::Id::from)
    }
}

/// Formats the bits most-significant first, e.g. `0101` for components 0 and 2 in a 4-wide set.
impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for index in (0..self.bits.len()).rev() {
            f.write_str(if self.bits.contains(index) { "1" } else { "0" })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(value: u32) -> component::Id {
        component::Id::new(value)
    }

    #[test]
    fn insert_and_remove_bits() {
        // Given
        let mut signature = Signature::new(16);

        // When
        signature.insert(id(3));
        signature.insert(id(15));

        // Then
        assert!(signature.contains(id(3)));
        assert!(signature.contains(id(15)));
        assert!(!signature.contains(id(4)));
        assert_eq!(signature.len(), 2);

        // When
        signature.remove(id(3));

        // Then
        assert!(!signature.contains(id(3)));
        assert_eq!(signature.ids().collect::<Vec<_>>(), vec![id(15)]);
    }

    #[test]
    fn width_is_fixed() {
        let signature = Signature::new(32);

        assert_eq!(signature.width(), 32);
        assert!(signature.is_empty());
        assert!(!signature.contains(id(40)));
    }

    #[test]
    #[should_panic]
    fn insert_beyond_width_panics() {
        let mut signature = Signature::new(4);
        signature.insert(id(4));
    }

    #[test]
    fn remove_beyond_width_is_noop() {
        let mut signature = Signature::from_ids(4, [id(1)]);
        signature.remove(id(9));
        assert_eq!(signature.len(), 1);
    }

    #[test]
    fn contains_all_is_superset_match() {
        // Given
        let required = Signature::from_ids(8, [id(0), id(1)]);
        let exact = Signature::from_ids(8, [id(0), id(1)]);
        let more = Signature::from_ids(8, [id(0), id(1), id(5)]);
        let partial = Signature::from_ids(8, [id(1), id(5)]);

        // Then
        assert!(exact.contains_all(&required));
        assert!(more.contains_all(&required));
        assert!(!partial.contains_all(&required));

        // Then - an empty requirement matches everything, including an empty signature
        let empty = Signature::new(8);
        assert!(empty.contains_all(&empty));
        assert!(partial.contains_all(&empty));
    }

    #[test]
    fn clear_resets_all_bits() {
        let mut signature = Signature::from_ids(8, [id(0), id(7)]);

        signature.clear();

        assert!(signature.is_empty());
        assert_eq!(signature.width(), 8);
    }

    #[test]
    fn display_most_significant_first() {
        let signature = Signature::from_ids(4, [id(0), id(2)]);

        assert_eq!(signature.to_string(), "0101");
    }
}
