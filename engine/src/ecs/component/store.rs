//! Packed per-type component storage.
//!
//! A [`Store`] is a sparse set: component values live contiguously in a dense `Vec` with no
//! gaps, a parallel dense `Vec` records which entity owns each slot, and a sparse index maps an
//! entity back to its dense slot.
//!
//! ```text
//! sparse:   [ -, 1, -, 0, 2 ]        (indexed by entity id)
//! entities: [ 3, 1, 4 ]
//! values:   [ c3, c1, c4 ]
//! ```
//!
//! Removal is a swap-remove: the last dense element moves into the vacated slot and its sparse
//! entry is updated. Every operation is O(1), iteration is a straight walk over memory, and the
//! price is that dense order is not stable across removals. Never pair `values()` of two stores
//! by position; correlate them through [`Entity`] lookups.

use std::any::Any;

use crate::ecs::{component::Component, entity::Entity};

/// Packed storage for every value of the component type `C`.
#[derive(Debug)]
pub struct Store<C: Component> {
    /// Component values, contiguous, in the same order as `entities`.
    values: Vec<C>,

    /// The entity owning each dense slot.
    entities: Vec<Entity>,

    /// Dense slot of each entity, indexed by entity id. Grows on demand.
    sparse: Vec<Option<usize>>,
}

impl<C: Component> Default for Store<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Component> Store<C> {
    /// Create an empty store.
    #[inline]
    pub const fn new() -> Self {
        Self {
            values: Vec::new(),
            entities: Vec::new(),
            sparse: Vec::new(),
        }
    }

    /// Create an empty store with room for `capacity` values before reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
            entities: Vec::with_capacity(capacity),
            sparse: Vec::with_capacity(capacity),
        }
    }

    /// Append a value for `entity`.
    ///
    /// If the entity already has a value in this store nothing changes and the rejected value is
    /// handed back.
    pub fn insert(&mut self, entity: Entity, value: C) -> Result<(), C> {
        if self.contains(entity) {
            return Err(value);
        }

        let index = entity.index();
        if index >= self.sparse.len() {
            self.sparse.resize(index + 1, None);
        }

        self.sparse[index] = Some(self.values.len());
        self.values.push(value);
        self.entities.push(entity);
        Ok(())
    }

    /// Remove and return the value for `entity`, or `None` if it has none.
    pub fn remove(&mut self, entity: Entity) -> Option<C> {
        let slot = self.slot(entity)?;

        // Swap-remove both dense arrays, then repoint whichever entity now occupies `slot`.
        let value = self.values.swap_remove(slot);
        self.entities.swap_remove(slot);
        if let Some(moved) = self.entities.get(slot) {
            self.sparse[moved.index()] = Some(slot);
        }
        self.sparse[entity.index()] = None;

        Some(value)
    }

    /// Get the value for `entity`.
    #[inline]
    pub fn get(&self, entity: Entity) -> Option<&C> {
        self.slot(entity).map(|slot| &self.values[slot])
    }

    /// Get the value for `entity` mutably.
    #[inline]
    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut C> {
        self.slot(entity).map(|slot| &mut self.values[slot])
    }

    /// Check whether `entity` has a value in this store.
    #[inline]
    pub fn contains(&self, entity: Entity) -> bool {
        self.slot(entity).is_some()
    }

    /// The number of stored values.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Owning entities in dense order.
    #[inline]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Values in dense order.
    #[inline]
    pub fn values(&self) -> &[C] {
        &self.values
    }

    /// Values in dense order, mutably.
    #[inline]
    pub fn values_mut(&mut self) -> &mut [C] {
        &mut self.values
    }

    /// Iterate `(entity, value)` pairs in dense order.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &C)> {
        self.entities.iter().copied().zip(self.values.iter())
    }

    /// Iterate `(entity, value)` pairs in dense order, with mutable values.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut C)> {
        self.entities.iter().copied().zip(self.values.iter_mut())
    }

    /// Dense slot of `entity`, if present.
    #[inline]
    fn slot(&self, entity: Entity) -> Option<usize> {
        self.sparse.get(entity.index()).copied().flatten()
    }

    /// Assert the dense and sparse halves agree.
    #[cfg(test)]
    pub(crate) fn assert_packed(&self) {
        assert_eq!(self.values.len(), self.entities.len());
        for (slot, entity) in self.entities.iter().enumerate() {
            assert_eq!(self.sparse[entity.index()], Some(slot));
        }
        let mapped = self.sparse.iter().filter(|slot| slot.is_some()).count();
        assert_eq!(mapped, self.entities.len());
    }
}

/// Type-erased interface for component stores.
///
/// The [`Registry`](super::Registry) keeps heterogeneous `Store<C>` instances in one collection
/// as `Box<dyn ErasedStore>` and uses [`as_any()`](Self::as_any) /
/// [`as_any_mut()`](Self::as_any_mut) to downcast back to the concrete store when typed access
/// is needed. Entity teardown only needs the erased operations.
pub(crate) trait ErasedStore: Send + Sync {
    /// Drop the entity's value if present. Returns `true` if something was removed.
    fn entity_destroyed(&mut self, entity: Entity) -> bool;

    /// Check whether the entity has a value in this store.
    fn contains(&self, entity: Entity) -> bool;

    /// The number of stored values.
    fn len(&self) -> usize;

    /// The Rust type name of the stored component.
    fn type_name(&self) -> &'static str;

    /// Returns a reference to self as `&dyn Any` for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Returns a mutable reference to self as `&mut dyn Any` for downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<C: Component> ErasedStore for Store<C> {
    fn entity_destroyed(&mut self, entity: Entity) -> bool {
        self.remove(entity).is_some()
    }

    fn contains(&self, entity: Entity) -> bool {
        Store::contains(self, entity)
    }

    fn len(&self) -> usize {
        Store::len(self)
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<C>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
