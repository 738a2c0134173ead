//! Boxes dropped onto a fixed floor
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
        world_half_extent: 20.0,
        ..SimulationConfig::default()
    };
    let mut world = World::new(config)?;

    world.add_object(
        ObjectDesc::cuboid(Vec3::new(10.0, 0.5, 10.0))
            .fixed()
            .with_color([90, 90, 90]),
    )?;

    // A loose stack of tilted boxes
    let mut boxes = Vec::new();
    for i in 0..3 {
        let y = 1.5 + i as f32 * 1.2;
        let tilt = Quat::from_axis_angle(Vec3::new(1.0, 0.0, 1.0), 0.15 * i as f32);
        let handle = world.add_object(
            ObjectDesc::cuboid(Vec3::splat(0.5))
                .with_position(Vec3::new(0.1 * i as f32, y, 0.0))
                .with_orientation(tilt)
                .with_mass(1.0 + i as f32)
                .with_color([200, 60 + 60 * i as u8, 60]),
        )?;
        boxes.push(handle);
    }

    // A cone whose mass sits below its centroid
    world.add_object(
        ObjectDesc::cone(0.5, 1.5)
            .with_position(Vec3::new(3.0, 4.0, 0.0))
            .with_center_of_mass_offset(Vec3::new(0.0, -0.2, 0.0))
            .with_color([60, 160, 220]),
    )?;

    let dt = 1.0 / 60.0;
    let total_time = 3.0;
    let steps = (total_time / dt) as usize;

    println!("Simulating {total_time} seconds ({steps} steps at {}Hz)...\n", 1.0 / dt);

    for i in 0..steps {
        world.step(dt);

        if i % 30 == 0 {
            for &handle in &boxes {
                if let Some(body) = world.body(handle) {
                    let pos = body.as_body().position();
                    println!(
                        "t={:.2}s {:?}: position=({:.3}, {:.3}, {:.3})",
                        world.time(),
                        handle,
                        pos.x,
                        pos.y,
                        pos.z
                    );
                }
            }
        }
    }

    let counts = world.query_collision_counts();
    println!(
        "\nbroad phase pairs: {}, contacts: {}",
        counts.broad_phase_pairs, counts.narrow_phase_contacts
    );
    for transform in world.query_transforms() {
        println!("{:?} {:?}: {:?}", transform.handle, transform.shape, transform.matrix().translation());
    }

    Ok(())
}
