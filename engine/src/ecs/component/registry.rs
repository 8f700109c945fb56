use std::{
    any::{TypeId, type_name},
    collections::HashMap,
};

use log::debug;

use crate::ecs::{
    component::{
        Component, Id, Store,
        store::ErasedStore,
    },
    entity::Entity,
    error::{Error, Kind, Result},
};

/// The component registry. This is responsible for assigning component ids and owning one
/// [`Store`] per registered component type, routing typed operations to the matching store.
///
/// Ids are assigned sequentially from zero in registration order and never change. Because an
/// id doubles as a signature bit index, at most `max_kinds` types can be registered.
///
/// The registry does not know about signatures or systems: keeping those consistent with the
/// stores is the [`Coordinator`](crate::ecs::Coordinator)'s job.
pub struct Registry {
    /// Map from a Rust type to its component id.
    type_map: HashMap<TypeId, Id>,

    /// One store per registered component, indexed by [`Id`].
    stores: Vec<Box<dyn ErasedStore>>,

    /// The number of ids that fit in a signature.
    max_kinds: u32,
}

impl Registry {
    /// Create an empty registry that accepts up to `max_kinds` component types.
    pub fn new(max_kinds: u32) -> Self {
        Self {
            type_map: HashMap::new(),
            stores: Vec::new(),
            max_kinds,
        }
    }

    /// Register a new component type and get its unique identifier.
    ///
    /// Fails with [`Error::AlreadyRegistered`] if `C` was registered before, and with
    /// [`Error::KindsExhausted`] if every id that fits in a signature is taken.
    pub fn register<C: Component>(&mut self) -> Result<Id> {
        if self.type_map.contains_key(&TypeId::of::<C>()) {
            return Err(Error::AlreadyRegistered {
                kind: Kind::Component,
                name: type_name::<C>().to_string(),
            });
        }
        self.insert_store::<C>()
    }

    /// Get the id for `C`, registering it first if it has never been seen.
    pub fn get_or_register<C: Component>(&mut self) -> Result<Id> {
        match self.get::<C>() {
            Some(id) => Ok(id),
            None => self.insert_store::<C>(),
        }
    }

    /// Get the component ID for `C`, failing with [`Error::NotRegistered`] if unknown.
    #[inline]
    pub fn id<C: Component>(&self) -> Result<Id> {
        self.get::<C>()
            .ok_or_else(|| Error::NotRegistered(type_name::<C>()))
    }

    /// Get the component ID for `C`, if registered.
    #[inline]
    pub fn get<C: Component>(&self) -> Option<Id> {
        self.type_map.get(&TypeId::of::<C>()).copied()
    }

    /// Check whether `C` has been registered.
    #[inline]
    pub fn is_registered<C: Component>(&self) -> bool {
        self.type_map.contains_key(&TypeId::of::<C>())
    }

    /// Store `value` for `entity`, registering `C` if needed. Returns `C`'s id.
    ///
    /// Fails with [`Error::DuplicateComponent`] if the entity already has a `C`; the store is left
    /// untouched and `value` is dropped.
    pub fn add<C: Component>(&mut self, entity: Entity, value: C) -> Result<Id> {
        let id = self.get_or_register::<C>()?;
        let store = self.typed_store_mut::<C>(id)?;
        if store.insert(entity, value).is_err() {
            return Err(Error::DuplicateComponent {
                entity,
                component: type_name::<C>(),
            });
        }
        Ok(id)
    }

    /// Remove and return the `C` owned by `entity`, along with `C`'s id.
    ///
    /// Fails with [`Error::ComponentNotPresent`] if the entity has no `C`, including when `C` was
    /// never registered.
    pub fn remove<C: Component>(&mut self, entity: Entity) -> Result<(Id, C)> {
        let id = self.get::<C>().ok_or_else(|| not_present::<C>(entity))?;
        let value = self
            .typed_store_mut::<C>(id)?
            .remove(entity)
            .ok_or_else(|| not_present::<C>(entity))?;
        Ok((id, value))
    }

    /// Get the `C` owned by `entity`.
    ///
    /// The borrow ends before any mutation of the registry, so references can never observe a
    /// swap-remove relocating the value.
    pub fn component<C: Component>(&self, entity: Entity) -> Result<&C> {
        self.store::<C>()
            .and_then(|store| store.get(entity))
            .ok_or_else(|| not_present::<C>(entity))
    }

    /// Get the `C` owned by `entity` mutably.
    pub fn component_mut<C: Component>(&mut self, entity: Entity) -> Result<&mut C> {
        self.store_mut::<C>()
            .and_then(|store| store.get_mut(entity))
            .ok_or_else(|| not_present::<C>(entity))
    }

    /// Check whether `entity` owns a `C`. Unregistered types are owned by nobody.
    #[inline]
    pub fn contains<C: Component>(&self, entity: Entity) -> bool {
        self.store::<C>().is_some_and(|store| store.contains(entity))
    }

    /// Check whether `entity` owns the component with the given id.
    #[inline]
    pub fn contains_id(&self, id: Id, entity: Entity) -> bool {
        self.stores
            .get(id.index())
            .is_some_and(|store| store.contains(entity))
    }

    /// Drop whatever data `entity` owns in every store. Idempotent; never fails.
    pub fn entity_destroyed(&mut self, entity: Entity) {
        for store in self.stores.iter_mut() {
            store.entity_destroyed(entity);
        }
    }

    /// Get the store for `C`, if registered.
    pub fn store<C: Component>(&self) -> Option<&Store<C>> {
        let id = self.get::<C>()?;
        self.stores
            .get(id.index())?
            .as_any()
            .downcast_ref::<Store<C>>()
    }

    /// Get the store for `C` mutably, if registered.
    pub fn store_mut<C: Component>(&mut self) -> Option<&mut Store<C>> {
        let id = self.get::<C>()?;
        self.stores
            .get_mut(id.index())?
            .as_any_mut()
            .downcast_mut::<Store<C>>()
    }

    /// The Rust type name recorded for a component id.
    #[inline]
    pub fn name_of(&self, id: Id) -> Option<&'static str> {
        self.stores.get(id.index()).map(|store| store.type_name())
    }

    /// Iterate `(id, type name)` for every registered component, in id order.
    pub fn registered(&self) -> impl Iterator<Item = (Id, &'static str)> + '_ {
        self.stores
            .iter()
            .enumerate()
            .map(|(index, store)| (Id::from(index), store.type_name()))
    }

    /// The number of registered component types.
    #[inline]
    pub fn len(&self) -> usize {
        self.stores.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }

    /// The maximum number of component types this registry accepts.
    #[inline]
    pub fn max_kinds(&self) -> u32 {
        self.max_kinds
    }

    /// Forget every type registered at or after position `len`, freeing their ids for reuse.
    ///
    /// Only types registered since `len` was observed may be dropped, and their stores must
    /// still be empty: no entity signature may reference a forgotten id.
    pub(crate) fn forget_from(&mut self, len: usize) {
        if len >= self.stores.len() {
            return;
        }
        for store in self.stores.drain(len..) {
            debug_assert_eq!(store.len(), 0, "forgetting a populated {}", store.type_name());
            debug!("forgot component {}", store.type_name());
        }
        self.type_map.retain(|_, id| id.index() < len);
    }

    /// Assign the next id to `C` and create its empty store.
    fn insert_store<C: Component>(&mut self) -> Result<Id> {
        if self.stores.len() >= self.max_kinds as usize {
            return Err(Error::KindsExhausted {
                name: type_name::<C>(),
                max: self.max_kinds,
            });
        }

        let id = Id::from(self.stores.len());
        self.stores.push(Box::new(Store::<C>::new()));
        self.type_map.insert(TypeId::of::<C>(), id);

        debug!("registered component {} as {}", type_name::<C>(), id);
        Ok(id)
    }

    /// Get the concrete store behind a known id.
    fn typed_store_mut<C: Component>(&mut self, id: Id) -> Result<&mut Store<C>> {
        self.stores
            .get_mut(id.index())
            .and_then(|store| store.as_any_mut().downcast_mut::<Store<C>>())
            .ok_or_else(|| Error::NotRegistered(type_name::<C>()))
    }
}

/// Build the error for a missing component.
#[inline]
fn not_present<C: Component>(entity: Entity) -> Error {
    Error::ComponentNotPresent {
        entity,
        component: type_name::<C>(),
    }
}
