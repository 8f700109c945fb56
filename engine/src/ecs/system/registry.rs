//! System registry for tracking which entities each named system operates on.
//!
//! The [`Registry`] stores, per system name, the required [`Signature`] and the set of entities
//! currently matching it. The [`Coordinator`](crate::ecs::Coordinator) notifies it of every
//! signature change and every destruction.

use std::collections::{BTreeSet, HashMap};

use log::{debug, trace};

use crate::ecs::{
    component,
    entity::Entity,
    error::{Error, Kind, Result},
    signature::Signature,
};

/// Requirements and working set of one system.
#[derive(Debug)]
struct Record {
    name: String,
    required: Signature,
    entities: BTreeSet<Entity>,
}

impl Record {
    /// Insert or erase `entity` according to `signature`.
    fn update(&mut self, entity: Entity, signature: &Signature) {
        if signature.contains_all(&self.required) {
            if self.entities.insert(entity) {
                trace!("entity {entity} joined system '{}'", self.name);
            }
        } else if self.entities.remove(&entity) {
            trace!("entity {entity} left system '{}'", self.name);
        }
    }
}

/// A registry of named systems and their matching entities.
///
/// Systems are kept in registration order.
#[derive(Debug)]
pub struct Registry {
    /// All registered systems, in registration order.
    records: Vec<Record>,

    /// Map from a system name to its index in `records`.
    index: HashMap<String, usize>,

    /// Width of every required signature.
    signature_width: u32,
}

impl Registry {
    /// Create a new, empty system registry whose signatures are `signature_width` bits wide.
    #[inline]
    pub fn new(signature_width: u32) -> Self {
        Self {
            records: Vec::new(),
            index: HashMap::new(),
            signature_width,
        }
    }

    /// Register a system with no requirements and an empty working set.
    pub fn register(&mut self, name: &str) -> Result<()> {
        if self.index.contains_key(name) {
            return Err(Error::AlreadyRegistered {
                kind: Kind::System,
                name: name.to_string(),
            });
        }

        self.index.insert(name.to_string(), self.records.len());
        self.records.push(Record {
            name: name.to_string(),
            required: Signature::new(self.signature_width),
            entities: BTreeSet::new(),
        });

        debug!("registered system '{name}'");
        Ok(())
    }

    /// Remove a system and its working set. Later systems keep their relative order.
    pub fn unregister(&mut self, name: &str) -> Result<()> {
        let index = self
            .index
            .remove(name)
            .ok_or_else(|| Error::UnknownSystem(name.to_string()))?;
        self.records.remove(index);
        for position in self.index.values_mut() {
            if *position > index {
                *position -= 1;
            }
        }

        debug!("unregistered system '{name}'");
        Ok(())
    }

    /// Add a required component to a system.
    ///
    /// Entities already alive are not re-evaluated; they are picked up on their next signature
    /// change.
    pub fn add_requirement(&mut self, name: &str, component: component::Id) -> Result<()> {
        let record = self.record_mut(name)?;
        record.required.insert(component);
        debug!("system '{name}' now requires component {component}");
        Ok(())
    }

    /// Re-evaluate one entity against every system after its signature changed.
    pub fn on_signature_changed(&mut self, entity: Entity, signature: &Signature) {
        for record in self.records.iter_mut() {
            record.update(entity, signature);
        }
    }

    /// Drop a destroyed entity from every working set.
    pub fn entity_destroyed(&mut self, entity: Entity) {
        for record in self.records.iter_mut() {
            if record.entities.remove(&entity) {
                trace!("entity {entity} left system '{}'", record.name);
            }
        }
    }

    /// The entities currently matching a system, in ascending id order.
    pub fn entities(&self, name: &str) -> Result<&BTreeSet<Entity>> {
        self.record(name).map(|record| &record.entities)
    }

    /// The components a system requires.
    pub fn requirements(&self, name: &str) -> Result<&Signature> {
        self.record(name).map(|record| &record.required)
    }

    /// Check whether a system requires a component.
    pub fn requires(&self, name: &str, component: component::Id) -> Result<bool> {
        self.record(name)
            .map(|record| record.required.contains(component))
    }

    /// Check whether an entity is in a system's working set.
    pub fn is_member(&self, name: &str, entity: Entity) -> Result<bool> {
        self.record(name)
            .map(|record| record.entities.contains(&entity))
    }

    /// Check whether a system is registered under `name`.
    #[inline]
    pub fn is_registered(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Iterate system names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.records.iter().map(|record| record.name.as_str())
    }

    /// The number of registered systems.
    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn record(&self, name: &str) -> Result<&Record> {
        self.index
            .get(name)
            .map(|&index| &self.records[index])
            .ok_or_else(|| Error::UnknownSystem(name.to_string()))
    }

    fn record_mut(&mut self, name: &str) -> Result<&mut Record> {
        let index = *self
            .index
            .get(name)
            .ok_or_else(|| Error::UnknownSystem(name.to_string()))?;
        Ok(&mut self.records[index])
    }
}
