//! The single facade over the entity, component and system registries.
//!
//! Every mutation is sequenced here so that component storage, the entity's signature and system
//! membership change together. A step that fails stops the sequence before anything after it
//! runs, and entity liveness is always checked before a store is touched.

use std::collections::BTreeSet;

use log::{Level, debug, log_enabled, warn};

use crate::ecs::{
    component::{self, Component, Spec, Store},
    config::Config,
    entity::{self, Entity, Ref, RefMut},
    error::{Error, Result},
    signature::Signature,
    system,
};

/// Owns every entity, component store and system record of one ECS instance.
///
/// There is no global instance: an application creates a coordinator and passes it by reference
/// to whatever needs it.
pub struct Coordinator {
    config: Config,
    entities: entity::Registry,
    components: component::Registry,
    systems: system::Registry,
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Coordinator {
    /// Create an empty coordinator with the given limits.
    pub fn new(config: Config) -> Self {
        debug!(
            "creating ECS with {} entities and {} component kinds",
            config.max_entities, config.max_component_kinds
        );
        Self {
            config,
            entities: entity::Registry::new(config.max_entities, config.max_component_kinds),
            components: component::Registry::new(config.max_component_kinds),
            systems: system::Registry::new(config.max_component_kinds),
        }
    }

    /// The limits this coordinator was created with.
    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    // Entities

    /// Create a new entity, optionally with a unique display name.
    ///
    /// The entity starts with an empty signature, so it immediately joins every system with no
    /// requirements.
    pub fn create_entity(&mut self, name: Option<&str>) -> Result<Entity> {
        let entity = self.entities.create_next(name)?;
        let signature = self.entities.signature(entity)?;
        self.systems.on_signature_changed(entity, signature);
        Ok(entity)
    }

    /// Create a new entity and return a handle for attaching its components.
    pub fn spawn(&mut self, name: Option<&str>) -> Result<RefMut<'_>> {
        let entity = self.create_entity(name)?;
        RefMut::new(self, entity)
    }

    /// Destroy an entity: its id is recycled, its components dropped and it leaves every system.
    pub fn destroy_entity(&mut self, entity: Entity) -> Result<()> {
        self.entities.destroy(entity)?;
        self.components.entity_destroyed(entity);
        self.systems.entity_destroyed(entity);
        Ok(())
    }

    /// Check whether an entity is alive.
    #[inline]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    /// Get a read-only handle for a live entity.
    #[inline]
    pub fn entity(&self, entity: Entity) -> Result<Ref<'_>> {
        Ref::new(self, entity)
    }

    /// Get a mutable handle for a live entity.
    #[inline]
    pub fn entity_mut(&mut self, entity: Entity) -> Result<RefMut<'_>> {
        RefMut::new(self, entity)
    }

    /// The signature of a live entity.
    #[inline]
    pub fn signature(&self, entity: Entity) -> Result<&Signature> {
        self.entities.signature(entity)
    }

    /// Find a live entity by display name.
    #[inline]
    pub fn entity_by_name(&self, name: &str) -> Result<Entity> {
        self.entities.entity_by_name(name)
    }

    /// Find a live entity by display name, if any.
    #[inline]
    pub fn try_entity_by_name(&self, name: &str) -> Option<Entity> {
        self.entities.try_entity_by_name(name)
    }

    /// The display name of a live entity, if it has one.
    #[inline]
    pub fn entity_name(&self, entity: Entity) -> Result<Option<&str>> {
        self.entities.name(entity)
    }

    /// Iterate `(name, entity)` for every named live entity.
    #[inline]
    pub fn named_entities(&self) -> impl Iterator<Item = (&str, Entity)> + '_ {
        self.entities.named_entities()
    }

    /// Iterate every live entity in ascending id order.
    #[inline]
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entities.alive()
    }

    /// The number of live entities.
    #[inline]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    // Components

    /// Register a component type ahead of its first use.
    #[inline]
    pub fn register_component<C: Component>(&mut self) -> Result<component::Id> {
        self.components.register::<C>()
    }

    /// The id of a registered component type.
    #[inline]
    pub fn component_id<C: Component>(&self) -> Result<component::Id> {
        self.components.id::<C>()
    }

    /// Attach a component to a live entity, registering its type on first use.
    ///
    /// Sets the entity's signature bit and re-evaluates its system membership.
    pub fn add_component<C: Component>(&mut self, entity: Entity, value: C) -> Result<()> {
        self.ensure_alive(entity)?;

        let id = self.components.add(entity, value).inspect_err(|err| {
            warn!("Rejected component for entity {entity}: {err}");
        })?;

        let signature = self.entities.signature_mut(entity)?;
        signature.insert(id);
        self.systems.on_signature_changed(entity, signature);
        Ok(())
    }

    /// Detach and return a component from a live entity.
    ///
    /// Clears the entity's signature bit and re-evaluates its system membership.
    pub fn remove_component<C: Component>(&mut self, entity: Entity) -> Result<C> {
        self.ensure_alive(entity)?;

        let (id, value) = self.components.remove::<C>(entity)?;

        let signature = self.entities.signature_mut(entity)?;
        signature.remove(id);
        self.systems.on_signature_changed(entity, signature);
        Ok(value)
    }

    /// Get a component of a live entity.
    pub fn component<C: Component>(&self, entity: Entity) -> Result<&C> {
        self.ensure_alive(entity)?;
        self.components.component::<C>(entity)
    }

    /// Get a component of a live entity mutably.
    pub fn component_mut<C: Component>(&mut self, entity: Entity) -> Result<&mut C> {
        self.ensure_alive(entity)?;
        self.components.component_mut::<C>(entity)
    }

    /// Check whether a live entity owns a `C`. A type that was never registered is owned by no
    /// entity.
    pub fn has_component<C: Component>(&self, entity: Entity) -> Result<bool> {
        let signature = self.entities.signature(entity)?;
        Ok(self
            .components
            .get::<C>()
            .is_some_and(|id| signature.contains(id)))
    }

    /// The ids of the components a live entity owns, in ascending order.
    pub fn component_ids(&self, entity: Entity) -> Result<Vec<component::Id>> {
        Ok(self.entities.signature(entity)?.ids().collect())
    }

    /// The type names of the components a live entity owns, in id order.
    pub fn component_names(&self, entity: Entity) -> Result<Vec<&'static str>> {
        Ok(self
            .entities
            .signature(entity)?
            .ids()
            .filter_map(|id| self.components.name_of(id))
            .collect())
    }

    /// The packed store of every `C`, if the type is registered.
    ///
    /// Dense order is not stable across removals; correlate two stores through entity lookups,
    /// never by position.
    #[inline]
    pub fn store<C: Component>(&self) -> Option<&Store<C>> {
        self.components.store::<C>()
    }

    /// Iterate `(entity, value)` over every `C` in dense order, with mutable values. Empty if the
    /// type was never registered.
    pub fn components_mut<C: Component>(&mut self) -> impl Iterator<Item = (Entity, &mut C)> {
        self.components
            .store_mut::<C>()
            .into_iter()
            .flat_map(|store| store.iter_mut())
    }

    /// Iterate `(id, type name)` for every registered component type.
    #[inline]
    pub fn registered_components(&self) -> impl Iterator<Item = (component::Id, &'static str)> + '_ {
        self.components.registered()
    }

    // Systems

    /// Register a system with no requirements.
    #[inline]
    pub fn register_system(&mut self, name: &str) -> Result<()> {
        self.systems.register(name)
    }

    /// Require component `C` for a system, registering `C` on first use.
    ///
    /// Fails with [`Error::UnknownSystem`] before registering anything if the system is unknown.
    /// Live entities are not re-evaluated; add requirements before populating the world.
    pub fn add_component_requirement<C: Component>(&mut self, name: &str) -> Result<()> {
        self.add_component_requirements::<C>(name)
    }

    /// Require every component in `S`, a component type or a tuple of them.
    ///
    /// All or nothing: if any type in `S` cannot be registered, the types registered on the way
    /// are forgotten again and the system's requirements are unchanged.
    pub fn add_component_requirements<S: Spec>(&mut self, name: &str) -> Result<()> {
        if !self.systems.is_registered(name) {
            return Err(Error::UnknownSystem(name.to_string()));
        }

        let checkpoint = self.components.len();
        let ids = S::ids(&mut self.components).inspect_err(|err| {
            warn!("Rejected requirements for system '{name}': {err}");
            self.components.forget_from(checkpoint);
        })?;

        for id in ids {
            self.systems.add_requirement(name, id)?;
        }
        Ok(())
    }

    /// The live entities matching a system's requirements, in ascending id order.
    #[inline]
    pub fn associated_entities(&self, name: &str) -> Result<&BTreeSet<Entity>> {
        self.systems.entities(name)
    }

    /// Check whether a system is registered.
    #[inline]
    pub fn is_system_registered(&self, name: &str) -> bool {
        self.systems.is_registered(name)
    }

    /// Check whether a system requires the component with the given id.
    #[inline]
    pub fn system_requires(&self, name: &str, id: component::Id) -> Result<bool> {
        self.systems.requires(name, id)
    }

    /// Check whether a system requires `C`. An unregistered type is required by no system.
    pub fn is_component_required_by_system<C: Component>(&self, name: &str) -> Result<bool> {
        match self.components.get::<C>() {
            Some(id) => self.systems.requires(name, id),
            None => self.systems.requirements(name).map(|_| false),
        }
    }

    /// Check whether an entity is in a system's working set.
    #[inline]
    pub fn is_entity_associated_with_system(&self, name: &str, entity: Entity) -> Result<bool> {
        self.systems.is_member(name, entity)
    }

    /// Drop a system and its working set.
    #[inline]
    pub(crate) fn unregister_system(&mut self, name: &str) -> Result<()> {
        self.systems.unregister(name)
    }

    /// Iterate system names in registration order.
    #[inline]
    pub fn system_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.systems.names()
    }

    // Diagnostics

    /// Dump systems with their members, live entities and registered components at `debug`
    /// level. Does nothing if `debug` logging is disabled.
    pub fn log_status(&self, context: &str) {
        if !log_enabled!(Level::Debug) {
            return;
        }

        debug!("==== ECS status: {context} ====");
        debug!("Systems with their associated entities:");
        for name in self.systems.names() {
            let (Ok(required), Ok(members)) =
                (self.systems.requirements(name), self.systems.entities(name))
            else {
                continue;
            };
            debug!("  system '{name}' | signature {required}");
            if members.is_empty() {
                debug!("    none");
            }
            for &entity in members {
                self.log_entity(entity);
            }
        }

        debug!("Live entities:");
        for entity in self.entities.alive() {
            self.log_entity(entity);
        }

        debug!("Registered components:");
        for (id, name) in self.components.registered() {
            debug!("  {id}: {name}");
        }
    }

    fn log_entity(&self, entity: Entity) {
        let name = self.entity_name(entity).ok().flatten().unwrap_or("<unnamed>");
        let signature = self
            .signature(entity)
            .map(ToString::to_string)
            .unwrap_or_default();
        let components = self.component_names(entity).unwrap_or_default();
        debug!(
            "    entity {entity} '{name}' | signature {signature} | components {components:?}"
        );
    }

    fn ensure_alive(&self, entity: Entity) -> Result<()> {
        if self.entities.is_alive(entity) {
            Ok(())
        } else {
            warn!("Attempted to use entity {entity} which is not alive");
            Err(Error::UnknownEntity(entity))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeSet, HashMap};

    use rand::{SeedableRng, seq::SliceRandom};
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use rusty_ecs_macros::Component;

    #[derive(Component, Debug, Clone, Copy, PartialEq)]
    struct Position {
        x: f32,
        y: f32,
    }

    #[derive(Component, Debug, Clone, Copy, PartialEq)]
    struct Velocity {
        x: f32,
        y: f32,
    }

    #[derive(Component, Debug, Clone, Copy, PartialEq)]
    struct Health(u32);

    #[derive(Component, Debug, Clone, Copy, PartialEq)]
    struct Tag;

    fn origin() -> Position {
        Position { x: 0.0, y: 0.0 }
    }

    fn still() -> Velocity {
        Velocity { x: 0.0, y: 0.0 }
    }

    #[test]
    fn movement_membership_follows_components() {
        // Given
        let mut ecs = Coordinator::new(Config::default());
        assert_eq!(ecs.register_component::<Position>(), Ok(component::Id::new(0)));
        assert_eq!(ecs.register_component::<Velocity>(), Ok(component::Id::new(1)));
        ecs.register_system("Movement").unwrap();
        ecs.add_component_requirement::<Position>("Movement").unwrap();
        ecs.add_component_requirement::<Velocity>("Movement").unwrap();
        let a = ecs.create_entity(None).unwrap();

        // When - Position only
        ecs.add_component(a, origin()).unwrap();

        // Then
        assert!(ecs.associated_entities("Movement").unwrap().is_empty());

        // When - Position and Velocity
        ecs.add_component(a, still()).unwrap();

        // Then
        assert!(ecs.associated_entities("Movement").unwrap().contains(&a));

        // When - Position removed
        ecs.remove_component::<Position>(a).unwrap();

        // Then
        assert!(!ecs.associated_entities("Movement").unwrap().contains(&a));

        // When - destroyed
        ecs.destroy_entity(a).unwrap();

        // Then
        assert_eq!(ecs.has_component::<Position>(a), Err(Error::UnknownEntity(a)));
        assert_eq!(ecs.has_component::<Velocity>(a), Err(Error::UnknownEntity(a)));
        assert!(ecs.associated_entities("Movement").unwrap().is_empty());
    }

    #[test]
    fn capacity_and_fifo_recycling() {
        // Given
        let mut ecs = Coordinator::new(Config::default().with_max_entities(3));
        let e0 = ecs.create_entity(None).unwrap();
        let e1 = ecs.create_entity(None).unwrap();
        let e2 = ecs.create_entity(None).unwrap();
        assert_eq!(
            (e0, e1, e2),
            (Entity::new(0), Entity::new(1), Entity::new(2))
        );

        // When
        let fourth = ecs.create_entity(None);

        // Then
        assert_eq!(fourth, Err(Error::CapacityExceeded { max: 3 }));

        // When
        ecs.destroy_entity(e1).unwrap();

        // Then - the only free id comes back, then the pool is exhausted again
        assert_eq!(ecs.create_entity(None), Ok(e1));
        assert_eq!(
            ecs.create_entity(None),
            Err(Error::CapacityExceeded { max: 3 })
        );

        // When - free two ids in a chosen order
        ecs.destroy_entity(e2).unwrap();
        ecs.destroy_entity(e0).unwrap();

        // Then - reissued in the order they were freed
        assert_eq!(ecs.create_entity(None), Ok(e2));
        assert_eq!(ecs.create_entity(None), Ok(e0));
    }

    #[test]
    fn mutations_on_dead_entities_touch_nothing() {
        // Given
        let mut ecs = Coordinator::new(Config::default());
        let entity = ecs.create_entity(None).unwrap();
        ecs.destroy_entity(entity).unwrap();

        // When
        let added = ecs.add_component(entity, Health(1));
        let removed = ecs.remove_component::<Health>(entity);

        // Then - the type was never registered and no store gained data
        assert_eq!(added, Err(Error::UnknownEntity(entity)));
        assert_eq!(removed, Err(Error::UnknownEntity(entity)));
        assert!(ecs.component_id::<Health>().is_err());
        assert!(ecs.store::<Health>().is_none());
        assert_eq!(ecs.destroy_entity(entity), Err(Error::UnknownEntity(entity)));
        assert_eq!(ecs.component::<Health>(entity), Err(Error::UnknownEntity(entity)));
    }

    #[test]
    fn duplicate_component_keeps_original() {
        // Given
        let mut ecs = Coordinator::new(Config::default());
        let entity = ecs.create_entity(None).unwrap();
        ecs.add_component(entity, Health(10)).unwrap();

        // When
        let result = ecs.add_component(entity, Health(99));

        // Then
        assert!(matches!(result, Err(Error::DuplicateComponent { .. })));
        assert_eq!(ecs.component::<Health>(entity), Ok(&Health(10)));
        assert_eq!(ecs.store::<Health>().unwrap().len(), 1);
    }

    #[test]
    fn remove_missing_component_keeps_signature() {
        // Given
        let mut ecs = Coordinator::new(Config::default());
        let entity = ecs.create_entity(None).unwrap();
        ecs.add_component(entity, Tag).unwrap();

        // When
        let result = ecs.remove_component::<Health>(entity);

        // Then
        assert!(matches!(result, Err(Error::ComponentNotPresent { .. })));
        assert_eq!(ecs.component_ids(entity).unwrap().len(), 1);
    }

    #[test]
    fn fresh_entities_join_systems_without_requirements() {
        // Given
        let mut ecs = Coordinator::new(Config::default());
        ecs.register_system("debug").unwrap();
        ecs.register_system("movement").unwrap();
        ecs.add_component_requirement::<Position>("movement").unwrap();

        // When
        let fresh = ecs.create_entity(None).unwrap();
        let churned = ecs.create_entity(None).unwrap();
        ecs.add_component(churned, Tag).unwrap();
        ecs.remove_component::<Tag>(churned).unwrap();

        // Then - same empty signature, same membership
        assert_eq!(ecs.signature(fresh), ecs.signature(churned));
        assert_eq!(ecs.is_entity_associated_with_system("debug", fresh), Ok(true));
        assert_eq!(ecs.is_entity_associated_with_system("debug", churned), Ok(true));
        assert_eq!(ecs.is_entity_associated_with_system("movement", fresh), Ok(false));
    }

    #[test]
    fn failed_requirements_register_nothing() {
        // Given
        let mut ecs = Coordinator::new(Config::default().with_max_component_kinds(1));
        ecs.register_system("greedy").unwrap();

        // When
        let result = ecs.add_component_requirements::<(Position, Velocity)>("greedy");

        // Then - Position was rolled back and the system still requires nothing
        assert!(matches!(result, Err(Error::KindsExhausted { max: 1, .. })));
        assert!(ecs.component_id::<Position>().is_err());
        assert_eq!(ecs.registered_components().count(), 0);
        assert_eq!(ecs.system_requires("greedy", component::Id::new(0)), Ok(false));

        // Then - the freed kind is still usable
        assert_eq!(ecs.add_component_requirement::<Velocity>("greedy"), Ok(()));
        assert_eq!(ecs.component_id::<Velocity>(), Ok(component::Id::new(0)));
    }

    #[test]
    fn failed_requirements_keep_earlier_types() {
        // Given
        let mut ecs = Coordinator::new(Config::default().with_max_component_kinds(2));
        ecs.register_system("physics").unwrap();
        let entity = ecs.create_entity(None).unwrap();
        ecs.add_component(entity, Health(5)).unwrap();

        // When - Health already exists, Position fits, Velocity does not
        let result = ecs.add_component_requirements::<(Health, Position, Velocity)>("physics");

        // Then
        assert!(matches!(result, Err(Error::KindsExhausted { max: 2, .. })));
        assert_eq!(ecs.component_id::<Health>(), Ok(component::Id::new(0)));
        assert!(ecs.component_id::<Position>().is_err());
        assert_eq!(ecs.component::<Health>(entity), Ok(&Health(5)));
        assert_eq!(ecs.is_component_required_by_system::<Health>("physics"), Ok(false));
    }

    #[test]
    fn has_component_of_unregistered_type_is_false() {
        let mut ecs = Coordinator::new(Config::default());
        let entity = ecs.create_entity(None).unwrap();

        assert_eq!(ecs.has_component::<Position>(entity), Ok(false));
    }

    #[test]
    fn requirement_on_unknown_system_registers_nothing() {
        // Given
        let mut ecs = Coordinator::new(Config::default());

        // When
        let result = ecs.add_component_requirement::<Position>("ghost");

        // Then
        assert_eq!(result, Err(Error::UnknownSystem("ghost".to_string())));
        assert!(ecs.component_id::<Position>().is_err());
    }

    #[test]
    fn requirement_tuple_registers_every_type() {
        // Given
        let mut ecs = Coordinator::new(Config::default());
        ecs.register_system("physics").unwrap();

        // When
        ecs.add_component_requirements::<(Position, Velocity, Health)>("physics")
            .unwrap();

        // Then
        assert_eq!(ecs.is_component_required_by_system::<Velocity>("physics"), Ok(true));
        assert_eq!(ecs.is_component_required_by_system::<Tag>("physics"), Ok(false));
        assert!(ecs.is_component_required_by_system::<Tag>("ghost").is_err());
        assert_eq!(ecs.registered_components().count(), 3);
    }

    #[test]
    fn component_queries_describe_entity() {
        // Given
        let mut ecs = Coordinator::new(Config::default());
        let entity = ecs.create_entity(Some("player")).unwrap();
        ecs.add_component(entity, Health(3)).unwrap();
        ecs.add_component(entity, origin()).unwrap();

        // When
        let ids = ecs.component_ids(entity).unwrap();
        let names = ecs.component_names(entity).unwrap();

        // Then
        assert_eq!(ids, vec![component::Id::new(0), component::Id::new(1)]);
        assert!(names[0].ends_with("Health"));
        assert!(names[1].ends_with("Position"));
        assert_eq!(ecs.signature(entity).unwrap().to_string().len(), 32);
        assert_eq!(ecs.entity_name(entity), Ok(Some("player")));
        assert_eq!(ecs.named_entities().collect::<Vec<_>>(), vec![("player", entity)]);
    }

    #[test]
    fn component_mut_and_dense_iteration() {
        // Given
        let mut ecs = Coordinator::new(Config::default());
        let entities: Vec<_> = (0..4)
            .map(|i| {
                let entity = ecs.create_entity(None).unwrap();
                ecs.add_component(entity, Health(i)).unwrap();
                entity
            })
            .collect();

        // When
        ecs.component_mut::<Health>(entities[0]).unwrap().0 = 100;
        for (_, health) in ecs.components_mut::<Health>() {
            health.0 += 1;
        }

        // Then
        assert_eq!(ecs.component::<Health>(entities[0]), Ok(&Health(101)));
        assert_eq!(ecs.component::<Health>(entities[3]), Ok(&Health(4)));
        assert_eq!(ecs.components_mut::<Tag>().count(), 0);
    }

    #[test]
    fn component_kinds_are_bounded() {
        // Given
        let mut ecs = Coordinator::new(Config::default().with_max_component_kinds(2));
        let entity = ecs.create_entity(None).unwrap();
        ecs.add_component(entity, Health(1)).unwrap();
        ecs.add_component(entity, Tag).unwrap();

        // When
        let result = ecs.add_component(entity, origin());

        // Then
        assert!(matches!(result, Err(Error::KindsExhausted { max: 2, .. })));
        assert_eq!(ecs.component_ids(entity).unwrap().len(), 2);
    }

    #[test]
    fn system_queries() {
        // Given
        let mut ecs = Coordinator::new(Config::default());
        ecs.register_system("render").unwrap();
        ecs.register_system("audio").unwrap();
        ecs.add_component_requirement::<Position>("render").unwrap();
        let entity = ecs.create_entity(None).unwrap();
        ecs.add_component(entity, origin()).unwrap();

        // Then
        assert!(ecs.is_system_registered("render"));
        assert_eq!(ecs.is_entity_associated_with_system("render", entity), Ok(true));
        assert_eq!(ecs.is_entity_associated_with_system("audio", entity), Ok(true));
        assert!(ecs.is_entity_associated_with_system("ghost", entity).is_err());
        assert_eq!(ecs.system_names().collect::<Vec<_>>(), vec!["render", "audio"]);
        assert!(matches!(
            ecs.register_system("render"),
            Err(Error::AlreadyRegistered { .. })
        ));
    }

    #[test]
    fn log_status_runs_without_logger() {
        let mut ecs = Coordinator::new(Config::default());
        ecs.register_system("render").unwrap();
        let entity = ecs.create_entity(Some("camera")).unwrap();
        ecs.add_component(entity, origin()).unwrap();

        ecs.log_status("test");
    }

    /// Operations applied by the randomized test.
    #[derive(Debug, Clone, Copy)]
    enum Op {
        Create,
        Destroy,
        AddPosition,
        AddVelocity,
        AddHealth,
        RemovePosition,
        RemoveVelocity,
        RemoveHealth,
    }

    const OPS: [Op; 8] = [
        Op::Create,
        Op::Destroy,
        Op::AddPosition,
        Op::AddVelocity,
        Op::AddHealth,
        Op::RemovePosition,
        Op::RemoveVelocity,
        Op::RemoveHealth,
    ];

    /// Check every cross-registry invariant for every id in the pool.
    fn assert_consistent(ecs: &Coordinator, alive: &BTreeSet<Entity>, freed: &[Entity]) {
        let systems = [
            ("movement", vec![ecs.component_id::<Position>(), ecs.component_id::<Velocity>()]),
            ("damage", vec![ecs.component_id::<Health>()]),
        ];

        assert_eq!(ecs.entity_count(), alive.len());
        for id in 0..ecs.config().max_entities {
            let entity = Entity::new(id);
            assert_eq!(ecs.is_alive(entity), alive.contains(&entity));

            if !ecs.is_alive(entity) {
                // Destruction cleanup
                assert!(ecs.has_component::<Position>(entity).is_err());
                assert!(!ecs.components.contains::<Position>(entity));
                assert!(!ecs.components.contains::<Velocity>(entity));
                assert!(!ecs.components.contains::<Health>(entity));
                for (name, _) in &systems {
                    assert_eq!(ecs.is_entity_associated_with_system(name, entity), Ok(false));
                }
                continue;
            }

            // Signature bit set exactly when the store holds data
            assert_eq!(
                ecs.has_component::<Position>(entity).unwrap(),
                ecs.components.contains::<Position>(entity)
            );
            assert_eq!(
                ecs.has_component::<Velocity>(entity).unwrap(),
                ecs.components.contains::<Velocity>(entity)
            );
            assert_eq!(
                ecs.has_component::<Health>(entity).unwrap(),
                ecs.components.contains::<Health>(entity)
            );

            // Membership exactly when the signature covers the requirements
            let signature = ecs.signature(entity).unwrap();
            for (name, required) in &systems {
                let matches = required
                    .iter()
                    .all(|id| id.as_ref().is_ok_and(|id| signature.contains(*id)));
                assert_eq!(
                    ecs.is_entity_associated_with_system(name, entity),
                    Ok(matches)
                );
            }
        }

        // Freed ids are never alive
        assert!(freed.iter().all(|entity| !alive.contains(entity)));

        for store in [
            ecs.store::<Position>().map(|s| s.len()),
            ecs.store::<Velocity>().map(|s| s.len()),
            ecs.store::<Health>().map(|s| s.len()),
        ]
        .into_iter()
        .flatten()
        {
            assert!(store <= alive.len());
        }
    }

    #[test]
    fn random_operations_keep_registries_consistent() {
        // Given
        let mut rng = ChaCha8Rng::seed_from_u64(0xec5);
        let mut ecs = Coordinator::new(Config::default().with_max_entities(16));
        ecs.register_system("movement").unwrap();
        ecs.add_component_requirements::<(Position, Velocity)>("movement")
            .unwrap();
        ecs.register_system("damage").unwrap();
        ecs.add_component_requirement::<Health>("damage").unwrap();

        let mut alive: BTreeSet<Entity> = BTreeSet::new();
        let mut freed: Vec<Entity> = Vec::new();
        let mut healths: HashMap<Entity, u32> = HashMap::new();

        // When
        for step in 0..4_000u32 {
            let target = alive.iter().copied().collect::<Vec<_>>().choose(&mut rng).copied();
            let op = *OPS.choose(&mut rng).unwrap();
            match (op, target) {
                (Op::Create, _) => match ecs.create_entity(None) {
                    Ok(entity) => {
                        // Then - fresh and unique among the living
                        assert!(alive.insert(entity));
                        if let Some(position) = freed.iter().position(|e| *e == entity) {
                            // FIFO: only the oldest freed id may come back
                            assert_eq!(position, 0);
                            freed.remove(position);
                        }
                    }
                    Err(err) => {
                        assert_eq!(err, Error::CapacityExceeded { max: 16 });
                        assert_eq!(alive.len(), 16);
                    }
                },
                (Op::Destroy, Some(entity)) => {
                    ecs.destroy_entity(entity).unwrap();
                    alive.remove(&entity);
                    healths.remove(&entity);
                    freed.push(entity);
                }
                (Op::AddPosition, Some(entity)) => {
                    let had = ecs.has_component::<Position>(entity).unwrap();
                    assert_eq!(ecs.add_component(entity, origin()).is_ok(), !had);
                }
                (Op::AddVelocity, Some(entity)) => {
                    let had = ecs.has_component::<Velocity>(entity).unwrap();
                    assert_eq!(ecs.add_component(entity, still()).is_ok(), !had);
                }
                (Op::AddHealth, Some(entity)) => {
                    let result = ecs.add_component(entity, Health(step));
                    assert_eq!(result.is_ok(), !healths.contains_key(&entity));
                    healths.entry(entity).or_insert(step);
                }
                (Op::RemovePosition, Some(entity)) => {
                    let had = ecs.has_component::<Position>(entity).unwrap();
                    assert_eq!(ecs.remove_component::<Position>(entity).is_ok(), had);
                }
                (Op::RemoveVelocity, Some(entity)) => {
                    let had = ecs.has_component::<Velocity>(entity).unwrap();
                    assert_eq!(ecs.remove_component::<Velocity>(entity).is_ok(), had);
                }
                (Op::RemoveHealth, Some(entity)) => {
                    let removed = ecs.remove_component::<Health>(entity).ok().map(|h| h.0);
                    assert_eq!(removed, healths.remove(&entity));
                }
                (_, None) => {}
            }

            // Then
            assert_consistent(&ecs, &alive, &freed);
        }

        // Then - surviving values are the ones written
        for (entity, value) in &healths {
            assert_eq!(ecs.component::<Health>(*entity), Ok(&Health(*value)));
        }
        for store in [ecs.store::<Health>()].into_iter().flatten() {
            store.assert_packed();
        }
    }
}
