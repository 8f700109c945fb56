//! Ordered per-frame execution of [`System`]s.
//!
//! A [`Schedule`] owns a list of systems. Adding a system registers its name with the
//! [`Coordinator`] and lets it declare its requirements; running the schedule calls every system's
//! [`update`](System::update) once, in the order the systems were added.
//!
//! # Usage
//!
//! ```rust,ignore
//! use rusty_ecs::ecs::{Config, Coordinator, Schedule};
//!
//! let mut ecs = Coordinator::new(Config::default());
//! let mut schedule = Schedule::new();
//!
//! schedule.add(&mut ecs, Movement)?;
//! schedule.add(&mut ecs, Render::default())?;
//!
//! // Game loop
//! loop {
//!     schedule.run(&mut ecs)?;
//! }
//! ```
//!
//! The schedule does not own the coordinator. Frame pacing and anything outside the ECS belong to
//! the caller's loop.

use log::{debug, warn};

use crate::ecs::{Coordinator, entity::Entity, error::Result, system::System};

/// A list of systems run once per frame in registration order.
///
/// # Working sets
///
/// Before each system runs, its working set is copied into a scratch buffer reused across
/// systems and frames. A system may therefore create, destroy or re-shape entities while it
/// iterates; entities it destroys may still appear later in its own slice, so lookups on them
/// report [`UnknownEntity`](crate::ecs::Error::UnknownEntity).
#[derive(Default)]
pub struct Schedule {
    /// Systems in the order they were added.
    systems: Vec<Box<dyn System>>,

    /// Reused snapshot of the working set of the system being run.
    scratch: Vec<Entity>,
}

impl Schedule {
    /// Creates a new empty schedule.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `system` with the coordinator, let it declare its requirements and append it to
    /// the schedule.
    ///
    /// Fails if the name is already registered or if declaring the requirements fails. In the
    /// latter case the name is unregistered again and the system is not scheduled, so the same
    /// name can be added later.
    pub fn add(&mut self, ecs: &mut Coordinator, system: impl System) -> Result<()> {
        ecs.register_system(system.name())?;
        if let Err(err) = system.require(ecs) {
            warn!("Failed to schedule system '{}': {err}", system.name());
            ecs.unregister_system(system.name())?;
            return Err(err);
        }

        debug!("scheduled system '{}'", system.name());
        self.systems.push(Box::new(system));
        Ok(())
    }

    /// Run one frame: call [`System::update`] on every system in order.
    ///
    /// Stops at the first system that returns an error and returns it; later systems do not run
    /// that frame.
    pub fn run(&mut self, ecs: &mut Coordinator) -> Result<()> {
        for system in self.systems.iter_mut() {
            self.scratch.clear();
            self.scratch
                .extend(ecs.associated_entities(system.name())?.iter().copied());
            system.update(ecs, &self.scratch)?;
        }
        Ok(())
    }

    /// Iterate the names of scheduled systems in run order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.systems.iter().map(|system| system.name())
    }

    /// The number of scheduled systems.
    #[inline]
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }
}
