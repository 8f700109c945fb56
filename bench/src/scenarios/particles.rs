//! Particle system benchmark scenario.
//!
//! Simulates a high-volume particle system with:
//! - Simple components: Particle, Position, Velocity, Lifetime, Color
//! - Systems: movement, lifetime decay, fade, respawn of expired particles
//!
//! This scenario tests:
//! - Working-set iteration with per-entity component lookups
//! - Signature maintenance under constant destroy/create churn
//! - FIFO id recycling at a full entity pool

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rusty_ecs::ecs::{Config, Coordinator, Entity, Result, Schedule, System};

use crate::components::{Color, Lifetime, Particle, Position, Velocity};
use crate::scenarios::Scenario;

/// Configuration for the particle benchmark.
pub struct ParticleConfig {
    /// Total number of particles to maintain.
    pub particle_count: usize,
    /// Simulated delta time per frame.
    pub delta_time: f32,
    /// Random seed for reproducibility.
    pub seed: u64,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            particle_count: 10_000,
            delta_time: 1.0 / 60.0, // 60 FPS
            seed: 12345,
        }
    }
}

struct ParticleFactory(ChaCha8Rng);

impl ParticleFactory {
    fn spawn(&mut self, ecs: &mut Coordinator) -> Result<Entity> {
        let rng = &mut self.0;
        let mut particle = ecs.spawn(None)?;
        particle
            .with(Particle)?
            .with(Position {
                x: rng.gen_range(-100.0..100.0),
                y: rng.gen_range(-100.0..100.0),
                z: rng.gen_range(-100.0..100.0),
            })?
            .with(Velocity {
                x: rng.gen_range(-10.0..10.0),
                y: rng.gen_range(-10.0..10.0),
                z: rng.gen_range(-10.0..10.0),
            })?
            .with(Lifetime {
                remaining: rng.gen_range(0.1..1.0),
                total: 1.0,
            })?
            .with(Color {
                r: rng.gen_range(0.0..1.0),
                g: rng.gen_range(0.0..1.0),
                b: rng.gen_range(0.0..1.0),
                a: 1.0,
            })?;
        Ok(particle.entity())
    }
}

/// System: Update particle positions based on velocity.
struct Movement {
    dt: f32,
}

impl System for Movement {
    fn name(&self) -> &str {
        "movement"
    }

    fn require(&self, ecs: &mut Coordinator) -> Result<()> {
        ecs.add_component_requirements::<(Position, Velocity)>(self.name())
    }

    fn update(&mut self, ecs: &mut Coordinator, entities: &[Entity]) -> Result<()> {
        for &entity in entities {
            let vel = *ecs.component::<Velocity>(entity)?;
            let pos = ecs.component_mut::<Position>(entity)?;
            pos.x += vel.x * self.dt;
            pos.y += vel.y * self.dt;
            pos.z += vel.z * self.dt;
        }
        Ok(())
    }
}

/// System: Decay particle lifetimes by walking the packed store directly.
struct LifetimeDecay {
    dt: f32,
}

impl System for LifetimeDecay {
    fn name(&self) -> &str {
        "lifetime_decay"
    }

    fn require(&self, ecs: &mut Coordinator) -> Result<()> {
        ecs.add_component_requirement::<Lifetime>(self.name())
    }

    fn update(&mut self, ecs: &mut Coordinator, _entities: &[Entity]) -> Result<()> {
        for (_, lifetime) in ecs.components_mut::<Lifetime>() {
            lifetime.remaining -= self.dt;
        }
        Ok(())
    }
}

/// System: Fade particles based on remaining lifetime.
struct Fade;

impl System for Fade {
    fn name(&self) -> &str {
        "fade"
    }

    fn require(&self, ecs: &mut Coordinator) -> Result<()> {
        ecs.add_component_requirements::<(Lifetime, Color)>(self.name())
    }

    fn update(&mut self, ecs: &mut Coordinator, entities: &[Entity]) -> Result<()> {
        for &entity in entities {
            let lifetime = *ecs.component::<Lifetime>(entity)?;
            ecs.component_mut::<Color>(entity)?.a = (lifetime.remaining / lifetime.total).max(0.0);
        }
        Ok(())
    }
}

/// System: Destroy expired particles and spawn a replacement for each.
struct Respawn {
    factory: ParticleFactory,
}

impl System for Respawn {
    fn name(&self) -> &str {
        "respawn"
    }

    fn require(&self, ecs: &mut Coordinator) -> Result<()> {
        ecs.add_component_requirements::<(Particle, Lifetime)>(self.name())
    }

    fn update(&mut self, ecs: &mut Coordinator, entities: &[Entity]) -> Result<()> {
        for &entity in entities {
            if ecs.component::<Lifetime>(entity)?.remaining <= 0.0 {
                ecs.destroy_entity(entity)?;
                self.factory.spawn(ecs)?;
            }
        }
        Ok(())
    }
}

/// Particle system benchmark scenario.
pub struct ParticleScenario {
    config: ParticleConfig,
    ecs: Coordinator,
    schedule: Schedule,
}

impl ParticleScenario {
    /// Create a new particle scenario with default config.
    pub fn new() -> Self {
        Self::with_config(ParticleConfig::default())
    }

    /// Create a new particle scenario with custom config.
    pub fn with_config(config: ParticleConfig) -> Self {
        let limits = Config::default().with_max_entities(config.particle_count as u32);
        Self {
            ecs: Coordinator::new(limits),
            schedule: Schedule::new(),
            config,
        }
    }

    /// Get current particle count.
    pub fn current_count(&self) -> usize {
        self.ecs.entity_count()
    }

    /// Borrow the coordinator driving the scenario.
    pub fn ecs(&self) -> &Coordinator {
        &self.ecs
    }
}

impl Default for ParticleScenario {
    fn default() -> Self {
        Self::new()
    }
}

impl Scenario for ParticleScenario {
    fn name(&self) -> &'static str {
        "particles"
    }

    fn entity_count(&self) -> usize {
        self.config.particle_count
    }

    fn setup(&mut self) {
        let dt = self.config.delta_time;
        let mut factory = ParticleFactory(ChaCha8Rng::seed_from_u64(self.config.seed));
        let respawn = Respawn {
            factory: ParticleFactory(ChaCha8Rng::seed_from_u64(self.config.seed + 1)),
        };

        // Requirements must be in place before particles exist.
        let ecs = &mut self.ecs;
        self.schedule.add(ecs, Movement { dt }).unwrap();
        self.schedule.add(ecs, LifetimeDecay { dt }).unwrap();
        self.schedule.add(ecs, Fade).unwrap();
        self.schedule.add(ecs, respawn).unwrap();

        for _ in 0..self.config.particle_count {
            factory.spawn(ecs).unwrap();
        }
    }

    fn update(&mut self) {
        self.schedule.run(&mut self.ecs).unwrap();
    }

    fn teardown(&mut self) {
        let entities = self.ecs.entities().collect::<Vec<_>>();
        for entity in entities {
            // Ids come straight from the live set.
            let _ = self.ecs.destroy_entity(entity);
        }
    }
}
