//! Component management for the ECS.
//!
//! This module provides the infrastructure for registering, storing, and looking up component
//! types. Components are the data containers that can be attached to entities to give them
//! properties and behaviors.
//!
//! ## Architecture
//!
//! - [`Component`]: The marker trait that all component types must implement
//! - [`Id`]: A small sequential identifier for each registered component type, doubling as the
//!   type's bit index in a [`Signature`](crate::ecs::Signature)
//! - [`Store`]: Packed storage for every value of one component type
//! - [`Registry`]: Assigns ids and owns one [`Store`] per registered type
//! - [`Spec`]: A compile-time list of component types (a single type or a tuple of them)
//!
//! ## Usage
//!
//! ```ignore
//! use rusty_ecs::ecs::component::Registry;
//! use rusty_ecs_macros::Component;
//!
//! #[derive(Component)]
//! struct Position { x: f32, y: f32 }
//!
//! let mut registry = Registry::new(32);
//! let pos_id = registry.register::<Position>()?;
//! ```

use core::fmt;

mod registry;
mod spec;
mod store;

pub use registry::Registry;
pub use spec::Spec;
pub use store::Store;

/// A component identifier. Ids are handed out sequentially from zero as types are registered.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(u32);

impl Id {
    /// Construct a new component Id from a raw u32 value.
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw id value.
    #[inline]
    pub const fn id(&self) -> u32 {
        self.0
    }

    /// Get the index of this component if it were to live in indexable storage (e.g. Vec), which
    /// is also its bit index in a signature.
    #[inline]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for Id {
    #[inline]
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl From<usize> for Id {
    #[inline]
    fn from(value: usize) -> Self {
        Self::new(value as u32)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A trait representing a component in the ECS (Entity Component System).
///
/// At present this only sets the required trait bounds for a type to be used as a component.
/// Use `#[derive(Component)]` from `rusty_ecs_macros` to implement it.
pub trait Component: 'static + Sized + Send + Sync {}
