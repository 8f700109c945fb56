//! Rusty ECS: a signature-driven Entity Component System runtime.
//!
//! The crate is organised around a single [`ecs::Coordinator`] that owns the entity, component
//! and system registries and keeps them consistent with one another. See the [`ecs`] module for
//! an overview.

// Allows `::rusty_ecs::...` paths emitted by the derive macros to resolve inside this crate.
extern crate self as rusty_ecs;

pub mod ecs;
