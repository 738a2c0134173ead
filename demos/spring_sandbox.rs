//! Particles joined by springs, a rod and a wire
//!
//! Run with `RUST_LOG=forcebox=debug` to see the per-tick summary.

use forcebox::prelude::*;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("forcebox=info".parse()?))
        .init();

    let config = SimulationConfig {
        gravity_enabled: true,
        friction_enabled: true,
        ..SimulationConfig::default()
    };
    let mut world = World::new(config)?;

    let bob = world.add_object(ObjectDesc::particle(0.2).with_position(Vec3::new(2.0, 8.0, 0.0)))?;
    world.add_link(ForceLink::Anchored {
        body: bob,
        anchor: Vec3::new(0.0, 10.0, 0.0),
        stiffness: 20.0,
        rest_length: 2.0,
    })?;

    let left = world.add_object(ObjectDesc::particle(0.2).with_position(Vec3::new(-3.0, 5.0, 0.0)))?;
    let right = world.add_object(
        ObjectDesc::particle(0.2)
            .with_position(Vec3::new(-1.0, 5.0, 0.0))
            .with_mass(2.0),
    )?;
    world.add_link(ForceLink::Rod {
        a: left,
        b: right,
        stiffness: 200.0,
        rest_length: 2.0,
    })?;
    world.add_link(ForceLink::Wire {
        a: bob,
        b: right,
        stiffness: 50.0,
        rest_length: 5.0,
    })?;

    // Sideways kick at the start
    world.apply_force(left, Vec3::new(0.0, 0.0, 120.0), None)?;

    let dt = 1.0 / 120.0;
    for i in 0..600 {
        world.step(dt);

        if i % 60 == 0 {
            for (handle, body) in world.bodies() {
                let pos = body.as_body().position();
                println!(
                    "t={:.2}s {:?}: ({:.3}, {:.3}, {:.3})",
                    world.time(),
                    handle,
                    pos.x,
                    pos.y,
                    pos.z
                );
            }
        }
    }

    let spread = world
        .body(left)
        .zip(world.body(right))
        .map(|(l, r)| l.as_body().position().distance(r.as_body().position()));
    println!("\nrod length after 5s: {spread:?}");

    Ok(())
}
