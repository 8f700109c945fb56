//! The ECS runtime core.
//!
//! Entities are bare recyclable IDs, components are plain Rust types stored in packed per-type
//! arrays, and systems are named consumers that declare which component types they need. Every
//! entity carries a [`Signature`] with one bit per component kind it owns, and every system
//! carries a [`Signature`] of the kinds it requires. Whenever an entity's signature changes the
//! [`Coordinator`] re-evaluates it against every system, so a system's working set is always
//! exactly the live entities whose signature is a superset of its requirements.
//!
//! ```rust,ignore
//! use rusty_ecs::ecs::{Config, Coordinator};
//! use rusty_ecs_macros::Component;
//!
//! #[derive(Component)]
//! struct Position { x: f32, y: f32 }
//!
//! #[derive(Component)]
//! struct Velocity { x: f32, y: f32 }
//!
//! let mut ecs = Coordinator::new(Config::default());
//! ecs.register_system("movement")?;
//! ecs.add_component_requirement::<Position>("movement")?;
//! ecs.add_component_requirement::<Velocity>("movement")?;
//!
//! let ball = ecs.create_entity(Some("ball"))?;
//! ecs.add_component(ball, Position { x: 0.0, y: 0.0 })?;
//! ecs.add_component(ball, Velocity { x: 1.0, y: 0.0 })?;
//!
//! assert!(ecs.associated_entities("movement")?.contains(&ball));
//! ```

pub mod component;
pub mod config;
pub mod coordinator;
pub mod entity;
pub mod error;
pub mod schedule;
pub mod signature;
pub mod system;

pub use component::Component;
pub use config::Config;
pub use coordinator::Coordinator;
pub use entity::{Entity, Ref, RefMut};
pub use error::{Error, Result};
pub use schedule::Schedule;
pub use signature::Signature;
pub use system::System;
