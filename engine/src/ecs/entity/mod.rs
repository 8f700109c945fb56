//! Entity management for the ECS (Entity Component System).
//!
//! This module provides the entity handle and the registry that issues, recycles and tracks
//! them. Entities are lightweight handles that tie together components; the registry knows
//! nothing about component data and only records which component kinds each entity owns through
//! its [`Signature`].
//!
//! # Architecture
//!
//! - **[`Entity`]**: A small integer identifier, unique among live entities.
//!
//! - **[`Registry`]**: Issues entity ids from a fixed pool of `max_entities` ids, tracks liveness,
//!   optional display names and the per-entity [`Signature`].
//!
//! - **[`Ref`]** / **[`RefMut`]**: Short-lived handles bundling an entity with a borrow of the
//!   [`Coordinator`](crate::ecs::Coordinator) for ergonomic component access.
//!
//! # Recycling
//!
//! Free ids live in a FIFO queue seeded with `0..max_entities` in ascending order. Creation pops
//! the front and destruction pushes to the back, so a destroyed id is only reissued after every
//! other free id has been handed out:
//!
//! ```rust,ignore
//! let mut registry = Registry::new(3, 32);
//! let e0 = registry.create_next(None)?; // 0
//! let e1 = registry.create_next(None)?; // 1
//! registry.destroy(e0)?;
//! let e2 = registry.create_next(None)?; // 2, not 0
//! let e3 = registry.create_next(None)?; // 0
//! ```
//!
//! There is no generation counter: a handle kept past destruction silently refers to whichever
//! entity reuses the id.

mod reference;

use core::fmt;
use std::collections::HashMap;

use crossbeam::queue::SegQueue;
use log::{debug, warn};

use crate::ecs::{
    error::{Error, Result},
    signature::Signature,
};

/// Export the reference module for entity references.
pub use reference::{Ref, RefMut};

/// An entity in the ECS (Entity Component System).
///
/// An opaque small integer, unique among currently live entities and reused after destruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Entity(u32);

impl Entity {
    /// Construct an entity handle from a raw id.
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw id of this entity.
    #[inline]
    pub const fn id(&self) -> u32 {
        self.0
    }

    /// Get the index of this entity if it were to live in indexable storage (e.g. Vec)
    #[inline]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for Entity {
    #[inline]
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Bookkeeping for one live entity.
#[derive(Debug)]
struct Entry {
    signature: Signature,
    name: Option<String>,
}

/// The entity registry. Issues entity ids, recycles them and stores per-entity signatures.
#[derive(Debug)]
pub struct Registry {
    /// One slot per possible entity id; `Some` while the entity is alive.
    entries: Vec<Option<Entry>>,

    /// Ids available for reuse, in the order they will be handed out.
    free: SegQueue<Entity>,

    /// Display name to entity, for live named entities only.
    names: HashMap<String, Entity>,

    /// The number of live entities.
    alive: usize,

    /// Width of every signature handed out.
    signature_width: u32,
}

impl Registry {
    /// Create a registry able to hold `max_entities` live entities whose signatures are
    /// `signature_width` bits wide.
    pub fn new(max_entities: u32, signature_width: u32) -> Self {
        let free = SegQueue::new();
        for id in 0..max_entities {
            free.push(Entity::new(id));
        }

        Self {
            entries: (0..max_entities).map(|_| None).collect(),
            free,
            names: HashMap::new(),
            alive: 0,
            signature_width,
        }
    }

    /// Create a new entity with an empty signature, optionally giving it a display name.
    ///
    /// Fails with [`Error::CapacityExceeded`] when every id is in use, and with
    /// [`Error::DuplicateName`] when a live entity already carries `name`. Neither failure
    /// consumes an id.
    pub fn create_next(&mut self, name: Option<&str>) -> Result<Entity> {
        if self.alive >= self.entries.len() {
            warn!("Attempted to create an entity with all {} slots alive", self.entries.len());
            return Err(Error::CapacityExceeded {
                max: self.capacity(),
            });
        }

        if let Some(name) = name
            && self.names.contains_key(name)
        {
            warn!("Attempted to create a second entity named '{name}'");
            return Err(Error::DuplicateName(name.to_string()));
        }

        let Some(entity) = self.free.pop() else {
            return Err(Error::CapacityExceeded {
                max: self.capacity(),
            });
        };

        if let Some(name) = name {
            self.names.insert(name.to_string(), entity);
        }
        self.entries[entity.index()] = Some(Entry {
            signature: Signature::new(self.signature_width),
            name: name.map(str::to_string),
        });
        self.alive += 1;

        debug!("created entity {entity}{}", display_name(name));
        Ok(entity)
    }

    /// Destroy a live entity, clearing its signature and name and returning its id to the back of
    /// the free queue.
    pub fn destroy(&mut self, entity: Entity) -> Result<()> {
        let Some(entry) = self.entries.get_mut(entity.index()).and_then(Option::take) else {
            warn!("Attempted to destroy entity {entity} which is not alive");
            return Err(Error::UnknownEntity(entity));
        };

        if let Some(name) = &entry.name {
            self.names.remove(name);
        }
        self.free.push(entity);
        self.alive -= 1;

        debug!("destroyed entity {entity}{}", display_name(entry.name.as_deref()));
        Ok(())
    }

    /// Check whether the entity is alive. Independent of what its signature holds.
    #[inline]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entry(entity).is_some()
    }

    /// Get the signature of a live entity.
    pub fn signature(&self, entity: Entity) -> Result<&Signature> {
        self.entry(entity)
            .map(|entry| &entry.signature)
            .ok_or(Error::UnknownEntity(entity))
    }

    /// Replace the signature of a live entity.
    pub fn set_signature(&mut self, entity: Entity, signature: Signature) -> Result<()> {
        *self.signature_mut(entity)? = signature;
        Ok(())
    }

    /// Get the signature of a live entity mutably.
    pub(crate) fn signature_mut(&mut self, entity: Entity) -> Result<&mut Signature> {
        self.entries
            .get_mut(entity.index())
            .and_then(Option::as_mut)
            .map(|entry| &mut entry.signature)
            .ok_or(Error::UnknownEntity(entity))
    }

    /// Get the display name of a live entity, if it was given one.
    pub fn name(&self, entity: Entity) -> Result<Option<&str>> {
        self.entry(entity)
            .map(|entry| entry.name.as_deref())
            .ok_or(Error::UnknownEntity(entity))
    }

    /// Find the live entity with the given display name.
    pub fn entity_by_name(&self, name: &str) -> Result<Entity> {
        self.try_entity_by_name(name)
            .ok_or_else(|| Error::UnknownName(name.to_string()))
    }

    /// Find the live entity with the given display name, if any.
    #[inline]
    pub fn try_entity_by_name(&self, name: &str) -> Option<Entity> {
        self.names.get(name).copied()
    }

    /// Iterate `(name, entity)` for every live named entity, in no particular order.
    pub fn named_entities(&self) -> impl Iterator<Item = (&str, Entity)> + '_ {
        self.names
            .iter()
            .map(|(name, entity)| (name.as_str(), *entity))
    }

    /// Iterate every live entity in ascending id order.
    pub fn alive(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.is_some())
            .map(|(index, _)| Entity::new(index as u32))
    }

    /// The number of live entities.
    #[inline]
    pub fn len(&self) -> usize {
        self.alive
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.alive == 0
    }

    /// The maximum number of simultaneously live entities.
    #[inline]
    pub fn capacity(&self) -> u32 {
        self.entries.len() as u32
    }

    #[inline]
    fn entry(&self, entity: Entity) -> Option<&Entry> {
        self.entries.get(entity.index()).and_then(Option::as_ref)
    }
}

fn display_name(name: Option<&str>) -> String {
    name.map(|name| format!(" ('{name}')")).unwrap_or_default()
}
