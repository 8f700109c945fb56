//! Realistic game scenario benchmarks.
//!
//! These scenarios simulate real-world ECS usage patterns with representative
//! entity counts, component combinations, and system workloads.
//!
//! # Scenarios
//!
//! - **Particles**: High entity count, simple components, short lifetimes

pub mod particles;

pub use particles::{ParticleConfig, ParticleScenario};

/// Common trait for benchmark scenarios.
pub trait Scenario {
    /// Name of the scenario, used as its benchmark group.
    fn name(&self) -> &'static str;

    /// Number of entities updated per frame, used as the benchmark throughput.
    fn entity_count(&self) -> usize;

    /// Set up the scenario (spawn entities, register systems).
    fn setup(&mut self);

    /// Run one "frame" of the scenario.
    fn update(&mut self);

    /// Clean up the scenario.
    fn teardown(&mut self);
}
