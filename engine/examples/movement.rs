use rusty_ecs::ecs::{Config, Coordinator, Entity, Result, Schedule, System};
use rusty_ecs_macros::Component;

const FRAMES: usize = 5;

#[derive(Component, Debug, Clone, Copy)]
struct Position {
    x: f32,
    y: f32,
}

#[derive(Component, Debug, Clone, Copy)]
struct Velocity {
    x: f32,
    y: f32,
}

/// Frames left before the entity stops moving.
#[derive(Component, Debug, Clone, Copy)]
struct Fuel(u32);

struct Movement;

impl System for Movement {
    fn name(&self) -> &str {
        "movement"
    }

    fn require(&self, ecs: &mut Coordinator) -> Result<()> {
        ecs.add_component_requirements::<(Position, Velocity)>(self.name())
    }

    fn update(&mut self, ecs: &mut Coordinator, entities: &[Entity]) -> Result<()> {
        for &entity in entities {
            let velocity = *ecs.component::<Velocity>(entity)?;
            let position = ecs.component_mut::<Position>(entity)?;
            position.x += velocity.x;
            position.y += velocity.y;
        }
        Ok(())
    }
}

/// Burns one unit of fuel per frame and takes the velocity away once the tank is empty.
struct Engine;

impl System for Engine {
    fn name(&self) -> &str {
        "engine"
    }

    fn require(&self, ecs: &mut Coordinator) -> Result<()> {
        ecs.add_component_requirements::<(Fuel, Velocity)>(self.name())
    }

    fn update(&mut self, ecs: &mut Coordinator, entities: &[Entity]) -> Result<()> {
        for &entity in entities {
            let fuel = ecs.component_mut::<Fuel>(entity)?;
            fuel.0 = fuel.0.saturating_sub(1);
            if fuel.0 == 0 {
                ecs.remove_component::<Velocity>(entity)?;
                println!("{} ran out of fuel", ecs.entity_name(entity)?.unwrap_or("?"));
            }
        }
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_toml_str("max_entities = 16\nmax_component_kinds = 8\n")?;
    let mut ecs = Coordinator::new(config);

    let mut schedule = Schedule::new();
    schedule.add(&mut ecs, Movement)?;
    schedule.add(&mut ecs, Engine)?;

    ecs.spawn(Some("rocket"))?
        .with(Position { x: 0.0, y: 0.0 })?
        .with(Velocity { x: 0.0, y: 2.0 })?
        .with(Fuel(3))?;
    ecs.spawn(Some("car"))?
        .with(Position { x: 0.0, y: 0.0 })?
        .with(Velocity { x: 1.0, y: 0.0 })?;
    ecs.spawn(Some("rock"))?
        .with(Position { x: 5.0, y: 5.0 })?;

    for frame in 1..=FRAMES {
        schedule.run(&mut ecs)?;

        println!("frame {frame}:");
        for (name, entity) in ["rocket", "car", "rock"]
            .into_iter()
            .filter_map(|name| ecs.try_entity_by_name(name).map(|entity| (name, entity)))
        {
            let position = ecs.component::<Position>(entity)?;
            println!("  {name:<6} at ({:>4.1}, {:>4.1})", position.x, position.y);
        }
    }

    let rock = ecs.entity_by_name("rock")?;
    println!(
        "rock moves: {}",
        ecs.is_entity_associated_with_system("movement", rock)?
    );
    println!("components on rock: {:?}", ecs.component_names(rock)?);

    ecs.log_status("end of demo");
    Ok(())
}
