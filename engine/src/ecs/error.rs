//! Errors reported by the ECS runtime.
//!
//! Every failure is detected synchronously at the offending call and returned to the caller. A
//! failed mutation never leaves a partially-updated signature, store or system membership set
//! behind, so callers may recover from any of these (for example by checking
//! [`has_component`](crate::ecs::Coordinator::has_component) first) without repairing state.

use core::fmt;

use thiserror::Error;

use crate::ecs::entity::Entity;

/// The kind of registration an [`Error`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// A component type.
    Component,
    /// A named system.
    System,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Component => write!(f, "component"),
            Kind::System => write!(f, "system"),
        }
    }
}

/// The error type for all ECS operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// An entity was requested while the live-entity count equals the configured maximum.
    #[error("cannot create entity: all {max} entity slots are alive")]
    CapacityExceeded { max: u32 },

    /// An entity was created with a display name that a live entity already uses.
    #[error("an entity named '{0}' already exists")]
    DuplicateName(String),

    /// No live entity carries the given display name.
    #[error("no entity is named '{0}'")]
    UnknownName(String),

    /// The entity is not alive: it was never created or has been destroyed.
    #[error("entity {0} is not alive")]
    UnknownEntity(Entity),

    /// A component type or system name was registered twice.
    #[error("{kind} '{name}' is already registered")]
    AlreadyRegistered { kind: Kind, name: String },

    /// A component type was used before it was registered.
    #[error("component '{0}' is not registered")]
    NotRegistered(&'static str),

    /// Every component ID that fits in a signature is already assigned.
    #[error("cannot register component '{name}': all {max} component kinds are in use")]
    KindsExhausted { name: &'static str, max: u32 },

    /// The entity already owns a component of this type.
    #[error("entity {entity} already has a '{component}' component")]
    DuplicateComponent {
        entity: Entity,
        component: &'static str,
    },

    /// The entity does not own a component of this type.
    #[error("entity {entity} has no '{component}' component")]
    ComponentNotPresent {
        entity: Entity,
        component: &'static str,
    },

    /// No system is registered under this name.
    #[error("system '{0}' is not registered")]
    UnknownSystem(String),
}

/// Result alias used throughout the ECS.
pub type Result<T, E = Error> = std::result::Result<T, E>;
