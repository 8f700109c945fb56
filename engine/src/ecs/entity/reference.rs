use crate::ecs::{
    Coordinator,
    component::Component,
    entity::Entity,
    error::Result,
    signature::Signature,
};

/// A reference to a live entity with read-only access to its components.
/// The lifetime `'w` ties the reference to a shared borrow of the [`Coordinator`], so the entity
/// cannot be destroyed or re-shaped while the reference exists.
pub struct Ref<'w> {
    /// The entity this reference points to.
    entity: Entity,
    /// The coordinator owning the entity.
    ecs: &'w Coordinator,
    /// The entity's signature.
    signature: &'w Signature,
}

impl<'w> Ref<'w> {
    /// Create a new Ref, failing if the entity is not alive.
    #[inline]
    pub(crate) fn new(ecs: &'w Coordinator, entity: Entity) -> Result<Self> {
        let signature = ecs.signature(entity)?;
        Ok(Self {
            entity,
            ecs,
            signature,
        })
    }

    /// Get a reference to a component on this entity.
    /// Returns `None` if the component is not registered or not present on the entity.
    #[inline]
    pub fn get<C: Component>(&self) -> Option<&'w C> {
        self.ecs.component::<C>(self.entity).ok()
    }

    /// Check whether the entity owns a `C`.
    #[inline]
    pub fn has<C: Component>(&self) -> bool {
        self.ecs.has_component::<C>(self.entity).unwrap_or(false)
    }

    /// Get the entity this reference points to.
    #[inline]
    pub fn entity(&self) -> Entity {
        self.entity
    }

    /// Get the display name of the entity, if it has one.
    #[inline]
    pub fn name(&self) -> Option<&'w str> {
        self.ecs.entity_name(self.entity).ok().flatten()
    }

    /// Get the signature of the referenced entity.
    #[inline]
    pub fn signature(&self) -> &'w Signature {
        self.signature
    }
}

/// A mutable reference to a live entity.
/// The lifetime `'w` ties the reference to an exclusive borrow of the [`Coordinator`]. Every
/// mutation goes through the coordinator, so signatures and system membership stay in step.
pub struct RefMut<'w> {
    /// The entity this reference points to.
    entity: Entity,
    /// The coordinator owning the entity.
    ecs: &'w mut Coordinator,
}

impl<'w> RefMut<'w> {
    /// Create a new RefMut, failing if the entity is not alive.
    #[inline]
    pub(crate) fn new(ecs: &'w mut Coordinator, entity: Entity) -> Result<Self> {
        ecs.signature(entity)?;
        Ok(Self { entity, ecs })
    }

    /// Get a reference to a component on this entity.
    /// Returns `None` if the component is not registered or not present on the entity.
    #[inline]
    pub fn get<C: Component>(&self) -> Option<&C> {
        self.ecs.component::<C>(self.entity).ok()
    }

    /// Get a mutable reference to a component on this entity.
    /// Returns `None` if the component is not registered or not present on the entity.
    #[inline]
    pub fn get_mut<C: Component>(&mut self) -> Option<&mut C> {
        self.ecs.component_mut::<C>(self.entity).ok()
    }

    /// Check whether the entity owns a `C`.
    #[inline]
    pub fn has<C: Component>(&self) -> bool {
        self.ecs.has_component::<C>(self.entity).unwrap_or(false)
    }

    /// Attach a component to the entity.
    #[inline]
    pub fn insert<C: Component>(&mut self, value: C) -> Result<()> {
        self.ecs.add_component(self.entity, value)
    }

    /// Attach a component and return the reference for chaining.
    ///
    /// ```rust,ignore
    /// ecs.spawn(Some("ball"))?
    ///     .with(Position { x: 0.0, y: 0.0 })?
    ///     .with(Velocity { x: 1.0, y: 0.0 })?;
    /// ```
    #[inline]
    pub fn with<C: Component>(&mut self, value: C) -> Result<&mut Self> {
        self.insert(value)?;
        Ok(self)
    }

    /// Detach and return a component from the entity.
    #[inline]
    pub fn remove<C: Component>(&mut self) -> Result<C> {
        self.ecs.remove_component::<C>(self.entity)
    }

    /// Get the entity this reference points to.
    #[inline]
    pub fn entity(&self) -> Entity {
        self.entity
    }

    /// Get the display name of the entity, if it has one.
    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.ecs.entity_name(self.entity).ok().flatten()
    }

    /// Destroy the entity, consuming the reference.
    #[inline]
    pub fn destroy(self) -> Result<()> {
        self.ecs.destroy_entity(self.entity)
    }
}
