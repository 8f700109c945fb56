//! Systems: named per-frame consumers of entities matching a component requirement.
//!
//! # Overview
//!
//! A system is identified by a name and carries a required [`Signature`](crate::ecs::Signature).
//! The [`Registry`] keeps, for every system, the set of live entities whose signature contains
//! all of the required bits. The set is maintained incrementally: whenever an entity's signature
//! changes the [`Coordinator`] re-evaluates that single entity against every system, so reading
//! a working set never scans storage.
//!
//! The [`System`] trait is the frontend for logic that runs once per frame over its working set.
//! Systems are added to a [`Schedule`](crate::ecs::Schedule), which registers them with the
//! [`Coordinator`] and calls [`System::update`] in registration order:
//!
//! ```rust,ignore
//! use rusty_ecs::ecs::{Coordinator, Entity, Result, System};
//!
//! struct Movement;
//!
//! impl System for Movement {
//!     fn name(&self) -> &str {
//!         "movement"
//!     }
//!
//!     fn require(&self, ecs: &mut Coordinator) -> Result<()> {
//!         ecs.add_component_requirements::<(Position, Velocity)>(self.name())
//!     }
//!
//!     fn update(&mut self, ecs: &mut Coordinator, entities: &[Entity]) -> Result<()> {
//!         for &entity in entities {
//!             let velocity = *ecs.component::<Velocity>(entity)?;
//!             let position = ecs.component_mut::<Position>(entity)?;
//!             position.x += velocity.x;
//!             position.y += velocity.y;
//!         }
//!         Ok(())
//!     }
//! }
//! ```
//!
//! # Membership
//!
//! Per entity and system there are two states. An entity becomes a member when its signature
//! becomes a superset of the system's requirements, and stops being one when it loses a
//! required component or is destroyed. Adding a requirement to a system does not re-scan
//! existing entities; register requirements before populating the world.

mod registry;

pub use registry::Registry;

use crate::ecs::{Coordinator, entity::Entity, error::Result};

/// Logic run once per frame over the entities matching its requirements.
pub trait System: 'static {
    /// The unique name this system is registered under.
    fn name(&self) -> &str;

    /// Declare the component types this system requires.
    ///
    /// Called once by [`Schedule::add`](crate::ecs::Schedule::add), right after the system's name
    /// has been registered. An error unregisters the name again.
    fn require(&self, _ecs: &mut Coordinator) -> Result<()> {
        Ok(())
    }

    /// Run one frame of logic.
    ///
    /// `entities` is a snapshot of the working set taken just before the call, in ascending id
    /// order. The system may freely mutate the coordinator; changes to membership become visible
    /// on the next frame.
    fn update(&mut self, ecs: &mut Coordinator, entities: &[Entity]) -> Result<()>;
}
