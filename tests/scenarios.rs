use forcebox::collision::{narrow_phase, resolve_contact, ResolutionParams};
use forcebox::prelude::*;

const EPSILON: f32 = 1e-3;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn vec3_approx_eq(a: Vec3, b: Vec3) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y) && approx_eq(a.z, b.z)
}

fn unit_box(x: f32, mass: f32) -> SimBody {
    RigidBody::new(Shape::cuboid(Vec3::ONE), mass)
        .unwrap()
        .with_position(Vec3::new(x, 0.0, 0.0))
        .into()
}

fn position(world: &World, handle: BodyHandle) -> Vec3 {
    world.body(handle).unwrap().as_body().position()
}

fn velocity(world: &World, handle: BodyHandle) -> Vec3 {
    world.body(handle).unwrap().as_body().velocity()
}

#[test]
fn separated_boxes_produce_no_candidates() {
    let a = unit_box(0.0, 1.0);
    let b = unit_box(10.0, 1.0);

    let mut octree = Octree::new(100.0);
    octree.rebuild([
        (BodyHandle::new(0), a.aabb()),
        (BodyHandle::new(1), b.aabb()),
    ]);
    assert!(octree.query_pairs().is_empty());

    let mut world = World::default();
    world.add_object(ObjectDesc::cuboid(Vec3::ONE)).unwrap();
    world
        .add_object(ObjectDesc::cuboid(Vec3::ONE).with_position(Vec3::X * 10.0))
        .unwrap();
    for _ in 0..10 {
        world.step(1.0 / 60.0);
    }

    let counts = world.query_collision_counts();
    assert_eq!(counts.broad_phase_pairs, 0);
    assert_eq!(counts.narrow_phase_contacts, 0);
}

#[test]
fn overlapping_boxes_are_separated() {
    let mut a = unit_box(0.0, 1.0);
    let mut b = unit_box(1.8, 1.0);

    let contact = narrow_phase::collide(&a, &b).expect("boxes overlap");
    assert!(approx_eq(contact.normal.x.abs(), 1.0));
    assert!(approx_eq(contact.normal.y, 0.0) && approx_eq(contact.normal.z, 0.0));
    assert!(approx_eq(contact.depth, 0.2));

    let params = ResolutionParams {
        restitution: 0.9,
        frame_time: 1.0 / 60.0,
        fallback_frame_time: 1.0 / 60.0,
    };
    resolve_contact(&mut a, &mut b, &contact, &params).unwrap();

    let gap = b.as_body().position().x - a.as_body().position().x;
    assert!(approx_eq(gap, 2.0));
    let remaining = narrow_phase::collide(&a, &b).map_or(0.0, |c| c.depth);
    assert!(remaining < EPSILON);
}

#[test]
fn particle_falls_like_explicit_euler() {
    let config = SimulationConfig {
        gravity_enabled: true,
        ..SimulationConfig::default()
    };
    let mut world = World::new(config).unwrap();
    let particle = world
        .add_object(ObjectDesc::particle(0.1).with_position(Vec3::new(0.0, 50.0, 0.0)))
        .unwrap();

    let dt = 1.0 / 60.0;
    for _ in 0..60 {
        world.step(dt);
    }

    assert!(approx_eq(velocity(&world, particle).y, -9.81));
    // Semi-implicit Euler: y = y0 - g dt² (1 + 2 + ... + 60)
    let expected = 50.0 - 9.81 * dt * dt * 1830.0;
    assert!(approx_eq(position(&world, particle).y, expected));

    let age = world.body(particle).unwrap().as_particle().unwrap().age;
    assert!(approx_eq(age, 1.0));
}

#[test]
fn free_particle_moves_linearly() {
    let mut world = World::default();
    let start = Vec3::new(1.0, 2.0, 3.0);
    let v = Vec3::new(0.5, -1.0, 2.0);
    let particle = world
        .add_object(ObjectDesc::particle(0.1).with_position(start).with_velocity(v))
        .unwrap();

    for _ in 0..120 {
        world.step(1.0 / 60.0);
    }

    assert_eq!(velocity(&world, particle), v);
    assert!(vec3_approx_eq(position(&world, particle), start + v * 2.0));
}

#[test]
fn heavier_box_moves_less() {
    let (m1, m2) = (2.0, 6.0);
    let mut world = World::default();
    let a = world.add_object(ObjectDesc::cuboid(Vec3::ONE).with_mass(m1)).unwrap();
    let b = world
        .add_object(ObjectDesc::cuboid(Vec3::ONE).with_mass(m2).with_position(Vec3::X * 1.8))
        .unwrap();

    world.step(1.0 / 60.0);

    let shift_a = position(&world, a).distance(Vec3::ZERO);
    let shift_b = position(&world, b).distance(Vec3::X * 1.8);
    assert!(shift_a > 0.0 && shift_b > 0.0);
    assert!(approx_eq(shift_a / shift_b, m2 / m1));
    assert!(approx_eq(shift_a + shift_b, 0.2));
}

#[test]
fn body_reflects_off_the_boundary() {
    let config = SimulationConfig {
        world_half_extent: 20.0,
        ..SimulationConfig::default()
    };
    let mut world = World::new(config).unwrap();
    let body = world
        .add_object(
            ObjectDesc::cuboid(Vec3::splat(0.5))
                .with_position(Vec3::new(19.5, 3.0, -4.0))
                .with_velocity(Vec3::new(30.0, 0.0, 1.0)),
        )
        .unwrap();

    world.step(0.1);

    assert_eq!(position(&world, body).x, 20.0);
    assert_eq!(velocity(&world, body), Vec3::new(-30.0, 0.0, 1.0));
    assert!(approx_eq(position(&world, body).z, -3.9));
}

#[test]
fn particles_bounce_apart() {
    let mut world = World::default();
    let a = world
        .add_object(
            ObjectDesc::particle(0.5)
                .with_position(Vec3::new(-0.45, 0.0, 0.0))
                .with_velocity(Vec3::X),
        )
        .unwrap();
    let b = world
        .add_object(
            ObjectDesc::particle(0.5)
                .with_position(Vec3::new(0.45, 0.0, 0.0))
                .with_velocity(-Vec3::X),
        )
        .unwrap();

    world.step(0.01);

    // Equal masses with restitution 0.9 swap and damp their velocities.
    assert!(approx_eq(velocity(&world, a).x, -0.9));
    assert!(approx_eq(velocity(&world, b).x, 0.9));
    assert!(position(&world, a).distance(position(&world, b)) >= 1.0 - EPSILON);
}

#[test]
fn config_loads_from_json() {
    let json = r#"{
        "gravity_enabled": true,
        "world_half_extent": 50.0,
        "gravity": { "x": 0.0, "y": -1.62, "z": 0.0 }
    }"#;
    let config: SimulationConfig = serde_json::from_str(json).unwrap();

    assert!(config.gravity_enabled);
    assert_eq!(config.world_half_extent, 50.0);
    assert_eq!(config.gravity, Vec3::new(0.0, -1.62, 0.0));
    assert!(config.spring_enabled);
    assert_eq!(config.restitution, 0.9);
    assert!(World::new(config).is_ok());

    let bad: SimulationConfig = serde_json::from_str(r#"{ "simulation_speed": 0.0 }"#).unwrap();
    assert!(matches!(
        World::new(bad),
        Err(PhysicsError::InvalidConfiguration(_))
    ));
}

#[test]
fn pausing_freezes_and_resuming_continues() {
    let mut world = World::default();
    let body = world
        .add_object(ObjectDesc::particle(0.1).with_velocity(Vec3::new(1.0, 0.0, 0.0)))
        .unwrap();

    let mut config = *world.config();
    config.paused = true;
    world.set_config(config).unwrap();
    world.apply_force(body, Vec3::new(0.0, 60.0, 0.0), None).unwrap();
    for _ in 0..5 {
        world.step(0.1);
    }
    assert_eq!(position(&world, body), Vec3::ZERO);

    config.paused = false;
    world.set_config(config).unwrap();
    world.step(0.1);

    // The force queued while paused is consumed by the first unpaused tick.
    assert!(approx_eq(velocity(&world, body).y, 6.0));
    assert!(approx_eq(position(&world, body).x, 0.1));
}

#[test]
fn remove_all_invalidates_old_handles() {
    let mut world = World::default();
    let handles: Vec<_> = (0..4)
        .map(|i| {
            world
                .add_object(ObjectDesc::cone(0.5, 1.0).with_position(Vec3::X * (3.0 * i as f32)))
                .unwrap()
        })
        .collect();

    world.remove_all();
    assert!(world.query_transforms().is_empty());

    for handle in handles {
        assert!(world.body(handle).is_none());
        assert_eq!(
            world.apply_force(handle, Vec3::Y, None),
            Err(PhysicsError::UnknownBody(handle))
        );
    }
}

#[test]
fn identical_worlds_stay_identical() {
    fn build() -> World {
        let config = SimulationConfig {
            gravity_enabled: true,
            friction_enabled: true,
            world_half_extent: 10.0,
            ..SimulationConfig::default()
        };
        let mut world = World::new(config).unwrap();
        world
            .add_object(ObjectDesc::cuboid(Vec3::new(10.0, 0.5, 10.0)).fixed())
            .unwrap();
        for i in 0..6 {
            let x = (i as f32 - 2.5) * 0.8;
            world
                .add_object(
                    ObjectDesc::cuboid(Vec3::splat(0.5))
                        .with_position(Vec3::new(x, 2.0 + i as f32, 0.0))
                        .with_orientation(Quat::from_axis_angle(Vec3::Z, 0.2 * i as f32)),
                )
                .unwrap();
        }
        world
    }

    let mut first = build();
    let mut second = build();
    for _ in 0..90 {
        first.step(1.0 / 60.0);
        second.step(1.0 / 60.0);
    }

    assert_eq!(first.query_transforms(), second.query_transforms());
    assert_eq!(first.query_collision_counts(), second.query_collision_counts());
}

#[test]
fn rod_keeps_particles_near_rest_length() {
    let mut world = World::default();
    let a = world.add_object(ObjectDesc::particle(0.1)).unwrap();
    let b = world
        .add_object(ObjectDesc::particle(0.1).with_position(Vec3::X * 2.0))
        .unwrap();
    world
        .add_link(ForceLink::Rod {
            a,
            b,
            stiffness: 50.0,
            rest_length: 2.0,
        })
        .unwrap();

    world.apply_force(b, Vec3::new(0.0, 30.0, 0.0), None).unwrap();
    for _ in 0..30 {
        world.step(1.0 / 120.0);
    }

    let length = position(&world, a).distance(position(&world, b));
    assert!((length - 2.0).abs() < 0.5, "rod length drifted to {length}");
    assert!(velocity(&world, a).y > 0.0, "rod should drag the other end along");
}
