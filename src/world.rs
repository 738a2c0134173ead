use serde::{Deserialize, Serialize};

use crate::collision::{narrow_phase, resolve_contact, BodyHandle, Octree, ResolutionParams};
use crate::dynamics::{Body, BodySet, Particle, RigidBody, SimBody};
use crate::error::{PhysicsError, Result};
use crate::forces::{AnchoredSpring, Drag, ForceGenerator, ForceRegistry, Gravity, Rod, Spring, Wire};
use crate::geometry::{Shape, ShapeType};
use crate::math::{Mat4, Quat, Vec3};

/// Per-tick switches and constants, supplied by the host.
///
/// Every field has a default, so a partial document deserializes into a
/// complete configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub gravity_enabled: bool,
    /// Enables velocity drag on every body
    pub friction_enabled: bool,
    /// Enables the declared force links
    pub spring_enabled: bool,
    pub collisions_enabled: bool,
    /// Multiplier applied to the elapsed frame time
    pub simulation_speed: f32,
    /// Bodies are kept inside the cube `[-half, half]³`
    pub world_half_extent: f32,
    pub gravity: Vec3,
    /// Linear drag coefficient k₁
    pub linear_drag: f32,
    /// Quadratic drag coefficient k₂
    pub quadratic_drag: f32,
    /// Frame time used by contact resolution when the elapsed time is zero
    pub fallback_frame_time: f32,
    pub restitution: f32,
    /// Freezes integration and collisions; boundaries are still enforced
    pub paused: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            gravity_enabled: false,
            friction_enabled: false,
            spring_enabled: true,
            collisions_enabled: true,
            simulation_speed: 1.0,
            world_half_extent: 100.0,
            gravity: Vec3::new(0.0, -9.81, 0.0),
            linear_drag: 0.1,
            quadratic_drag: 0.2,
            fallback_frame_time: 1.0 / 60.0,
            restitution: 0.9,
            paused: false,
        }
    }
}

impl SimulationConfig {
    /// Rejects values the world cannot simulate with
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("simulation_speed", self.simulation_speed),
            ("world_half_extent", self.world_half_extent),
            ("fallback_frame_time", self.fallback_frame_time),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(PhysicsError::InvalidConfiguration(format!(
                    "{name} must be positive and finite, got {value}"
                )));
            }
        }

        let non_negative = [
            ("linear_drag", self.linear_drag),
            ("quadratic_drag", self.quadratic_drag),
            ("restitution", self.restitution),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(PhysicsError::InvalidConfiguration(format!(
                    "{name} must be non-negative and finite, got {value}"
                )));
            }
        }

        if !self.gravity.is_finite() {
            return Err(PhysicsError::InvalidConfiguration("gravity must be finite".into()));
        }
        Ok(())
    }
}

/// What kind of object an [`ObjectDesc`] creates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ObjectKind {
    Cuboid { half_extents: Vec3 },
    Cone { radius: f32, height: f32 },
    Particle { radius: f32 },
}

/// Description used to add an object to the world
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObjectDesc {
    pub kind: ObjectKind,
    pub position: Vec3,
    pub rotation: Quat,
    pub linear_velocity: Vec3,
    pub angular_velocity: Vec3,
    /// `f32::INFINITY` creates an immovable object
    pub mass: f32,
    pub center_of_mass_offset: Vec3,
    pub color: [u8; 3],
}

impl ObjectDesc {
    fn with_kind(kind: ObjectKind) -> Self {
        Self {
            kind,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            linear_velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            mass: 1.0,
            center_of_mass_offset: Vec3::ZERO,
            color: [255, 255, 255],
        }
    }

    pub fn cuboid(half_extents: Vec3) -> Self {
        Self::with_kind(ObjectKind::Cuboid { half_extents })
    }

    pub fn cone(radius: f32, height: f32) -> Self {
        Self::with_kind(ObjectKind::Cone { radius, height })
    }

    pub fn particle(radius: f32) -> Self {
        Self::with_kind(ObjectKind::Particle { radius })
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Initial orientation; ignored for particles
    pub fn with_orientation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.linear_velocity = velocity;
        self
    }

    pub fn with_angular_velocity(mut self, velocity: Vec3) -> Self {
        self.angular_velocity = velocity;
        self
    }

    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    /// Makes the object immovable
    pub fn fixed(self) -> Self {
        self.with_mass(f32::INFINITY)
    }

    /// Moves the center of mass away from the geometric center
    pub fn with_center_of_mass_offset(mut self, offset: Vec3) -> Self {
        self.center_of_mass_offset = offset;
        self
    }

    pub fn with_color(mut self, color: [u8; 3]) -> Self {
        self.color = color;
        self
    }

    /// Builds the body this description names.
    pub fn build(&self) -> Result<SimBody> {
        if !self.position.is_finite()
            || !self.linear_velocity.is_finite()
            || !self.angular_velocity.is_finite()
            || !self.rotation.is_finite()
        {
            return Err(PhysicsError::InvalidConfiguration(
                "object placement must be finite".into(),
            ));
        }

        let shape = match self.kind {
            ObjectKind::Particle { radius } => {
                let particle = Particle::new(self.mass, radius)?
                    .with_position(self.position)
                    .with_velocity(self.linear_velocity)
                    .with_color(self.color);
                return Ok(particle.into());
            }
            ObjectKind::Cuboid { half_extents } => Shape::cuboid(half_extents),
            ObjectKind::Cone { radius, height } => Shape::cone(radius, height),
        };

        let rotation = self.rotation.try_normalize().ok_or(PhysicsError::DegenerateGeometry {
            context: "zero-length orientation",
        })?;

        let body = if self.mass == f32::INFINITY {
            RigidBody::fixed(shape)?
        } else {
            RigidBody::new(shape, self.mass)?
        };

        Ok(body
            .with_center_of_mass_offset(self.center_of_mass_offset)?
            .with_position(self.position)
            .with_rotation(rotation)
            .with_linear_velocity(self.linear_velocity)
            .with_angular_velocity(self.angular_velocity)
            .with_color(self.color)
            .into())
    }
}

/// A force link between a body and an anchor or between two bodies.
///
/// Links are active while `spring_enabled` is set. Two-body links push and
/// pull both ends equally.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ForceLink {
    Anchored {
        body: BodyHandle,
        anchor: Vec3,
        stiffness: f32,
        rest_length: f32,
    },
    Spring {
        a: BodyHandle,
        b: BodyHandle,
        stiffness: f32,
        rest_length: f32,
    },
    /// Resists both stretching and compression
    Rod {
        a: BodyHandle,
        b: BodyHandle,
        stiffness: f32,
        rest_length: f32,
    },
    /// Resists stretching only
    Wire {
        a: BodyHandle,
        b: BodyHandle,
        stiffness: f32,
        rest_length: f32,
    },
}

impl ForceLink {
    fn parameters(&self) -> (f32, f32) {
        match *self {
            ForceLink::Anchored { stiffness, rest_length, .. }
            | ForceLink::Spring { stiffness, rest_length, .. }
            | ForceLink::Rod { stiffness, rest_length, .. }
            | ForceLink::Wire { stiffness, rest_length, .. } => (stiffness, rest_length),
        }
    }

    /// One generator per linked end
    fn generators(&self) -> Vec<(BodyHandle, Box<dyn ForceGenerator>)> {
        fn boxed(generator: impl ForceGenerator + 'static) -> Box<dyn ForceGenerator> {
            Box::new(generator)
        }

        match *self {
            ForceLink::Anchored { body, anchor, stiffness, rest_length } => {
                vec![(body, boxed(AnchoredSpring::new(anchor, stiffness, rest_length)))]
            }
            ForceLink::Spring { a, b, stiffness, rest_length } => vec![
                (a, boxed(Spring::new(b, stiffness, rest_length))),
                (b, boxed(Spring::new(a, stiffness, rest_length))),
            ],
            ForceLink::Rod { a, b, stiffness, rest_length } => vec![
                (a, boxed(Rod::new(b, stiffness, rest_length))),
                (b, boxed(Rod::new(a, stiffness, rest_length))),
            ],
            ForceLink::Wire { a, b, stiffness, rest_length } => vec![
                (a, boxed(Wire::new(b, stiffness, rest_length))),
                (b, boxed(Wire::new(a, stiffness, rest_length))),
            ],
        }
    }

    fn bodies(&self) -> (BodyHandle, Option<BodyHandle>) {
        match *self {
            ForceLink::Anchored { body, .. } => (body, None),
            ForceLink::Spring { a, b, .. } | ForceLink::Rod { a, b, .. } | ForceLink::Wire { a, b, .. } => {
                (a, Some(b))
            }
        }
    }
}

/// Render-facing state of one body after a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyTransform {
    pub handle: BodyHandle,
    pub position: Vec3,
    pub rotation: Quat,
    /// Full size along each local axis
    pub extents: Vec3,
    pub color: [u8; 3],
    /// `None` for particles
    pub shape: Option<ShapeType>,
}

impl BodyTransform {
    /// Model matrix (rotation then translation)
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position)
    }
}

/// Pair counts accumulated since the world was created
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionCounts {
    /// Candidate pairs reported by the broad phase
    pub broad_phase_pairs: u64,
    /// Candidate pairs confirmed as touching
    pub narrow_phase_contacts: u64,
}

/// The simulated world.
///
/// A tick runs forces, integration, the broad phase, the narrow phase with
/// contact resolution, and the boundary clamp, in that order. Commands are
/// only accepted between ticks.
pub struct World {
    config: SimulationConfig,
    bodies: BodySet,
    broad_phase: Octree,
    links: Vec<ForceLink>,
    link_forces: Vec<(BodyHandle, Box<dyn ForceGenerator>)>,
    custom_forces: Vec<(BodyHandle, Box<dyn ForceGenerator>)>,
    counts: CollisionCounts,
    time: f32,
}

impl Default for World {
    fn default() -> Self {
        Self::with_valid_config(SimulationConfig::default())
    }
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("config", &self.config)
            .field("bodies", &self.bodies.len())
            .field("links", &self.links.len())
            .field("custom_forces", &self.custom_forces.len())
            .field("counts", &self.counts)
            .field("time", &self.time)
            .finish()
    }
}

impl World {
    /// Creates an empty world
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: SimulationConfig) -> Self {
        tracing::info!(
            half_extent = config.world_half_extent,
            speed = config.simulation_speed,
            "physics world created"
        );
        Self {
            broad_phase: Octree::new(config.world_half_extent),
            config,
            bodies: BodySet::new(),
            links: Vec::new(),
            link_forces: Vec::new(),
            custom_forces: Vec::new(),
            counts: CollisionCounts::default(),
            time: 0.0,
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Replaces the configuration; takes effect on the next tick
    pub fn set_config(&mut self, config: SimulationConfig) -> Result<()> {
        config.validate()?;
        if config.world_half_extent != self.config.world_half_extent {
            self.broad_phase.set_half_extent(config.world_half_extent);
        }
        self.config = config;
        Ok(())
    }

    /// Adds an object and returns its handle
    pub fn add_object(&mut self, desc: ObjectDesc) -> Result<BodyHandle> {
        let body = desc.build()?;
        let handle = self.bodies.insert(body);
        tracing::info!(?handle, kind = ?desc.kind, position = ?desc.position, "object added");
        Ok(handle)
    }

    /// Drops every body, link and custom force; outstanding handles become invalid
    pub fn remove_all(&mut self) {
        tracing::info!(bodies = self.bodies.len(), "removing all objects");
        self.bodies.clear();
        self.broad_phase.clear();
        self.links.clear();
        self.link_forces.clear();
        self.custom_forces.clear();
    }

    /// Declares a force link, active while springs are enabled
    pub fn add_link(&mut self, link: ForceLink) -> Result<()> {
        let (first, second) = link.bodies();
        for handle in std::iter::once(first).chain(second) {
            if !self.bodies.contains(handle) {
                return Err(PhysicsError::UnknownBody(handle));
            }
        }
        if second == Some(first) {
            return Err(PhysicsError::InvalidConfiguration(
                "a link needs two distinct bodies".into(),
            ));
        }

        let (stiffness, rest_length) = link.parameters();
        if !stiffness.is_finite() || stiffness < 0.0 || !rest_length.is_finite() || rest_length < 0.0 {
            return Err(PhysicsError::InvalidConfiguration(format!(
                "link stiffness and rest length must be non-negative, got {stiffness} and {rest_length}"
            )));
        }

        self.link_forces.extend(link.generators());
        self.links.push(link);
        Ok(())
    }

    pub fn links(&self) -> &[ForceLink] {
        &self.links
    }

    /// Attaches a host-defined generator to a body; it runs every unpaused tick
    pub fn add_force_generator(
        &mut self,
        handle: BodyHandle,
        generator: Box<dyn ForceGenerator>,
    ) -> Result<()> {
        if !self.bodies.contains(handle) {
            return Err(PhysicsError::UnknownBody(handle));
        }
        self.custom_forces.push((handle, generator));
        Ok(())
    }

    /// One-shot force, consumed by the next integration.
    ///
    /// With a `point`, the force also produces torque about the body's
    /// center of mass.
    pub fn apply_force(&mut self, handle: BodyHandle, force: Vec3, point: Option<Vec3>) -> Result<()> {
        if !force.is_finite() || !point.map_or(true, Vec3::is_finite) {
            return Err(PhysicsError::InvalidConfiguration(
                "applied force must be finite".into(),
            ));
        }

        let body = self
            .bodies
            .get_mut(handle)
            .ok_or(PhysicsError::UnknownBody(handle))?
            .as_body_mut();
        match point {
            Some(point) => body.add_force_at_point(force, point),
            None => body.add_force(force),
        }
        Ok(())
    }

    pub fn set_position(&mut self, handle: BodyHandle, position: Vec3) -> Result<()> {
        self.body_mut(handle)?.set_position(position);
        Ok(())
    }

    pub fn set_linear_velocity(&mut self, handle: BodyHandle, velocity: Vec3) -> Result<()> {
        self.body_mut(handle)?.set_velocity(velocity);
        Ok(())
    }

    /// Particles have no orientation and ignore the call
    pub fn set_angular_velocity(&mut self, handle: BodyHandle, velocity: Vec3) -> Result<()> {
        let body = self
            .bodies
            .get_mut(handle)
            .ok_or(PhysicsError::UnknownBody(handle))?;
        if let Some(rigid) = body.as_rigid_mut() {
            rigid.angular_velocity = velocity;
        }
        Ok(())
    }

    fn body_mut(&mut self, handle: BodyHandle) -> Result<&mut dyn Body> {
        self.bodies
            .get_mut(handle)
            .map(SimBody::as_body_mut)
            .ok_or(PhysicsError::UnknownBody(handle))
    }

    pub fn body(&self, handle: BodyHandle) -> Option<&SimBody> {
        self.bodies.get(handle)
    }

    pub fn bodies(&self) -> impl Iterator<Item = (BodyHandle, &SimBody)> {
        self.bodies.iter()
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Simulated time, the sum of every unpaused tick's `dt`
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Advances the world by one tick.
    ///
    /// `frame_time` is the elapsed wall time of the previous frame; the
    /// integration step is `frame_time * simulation_speed`.
    pub fn step(&mut self, frame_time: f32) {
        if !frame_time.is_finite() || frame_time < 0.0 {
            tracing::warn!(frame_time, "ignoring tick with invalid frame time");
            return;
        }

        let config = self.config;
        let dt = frame_time * config.simulation_speed;

        let gravity = Gravity::new(config.gravity);
        let drag = Drag::new(config.linear_drag, config.quadratic_drag);

        // The registry is rebuilt from the current toggles even while paused.
        let forces = {
            let mut registry = ForceRegistry::new();
            for handle in self.bodies.handles() {
                if config.gravity_enabled {
                    registry.add(handle, &gravity);
                }
                if config.friction_enabled {
                    registry.add(handle, &drag);
                }
            }
            if config.spring_enabled {
                for (handle, generator) in &self.link_forces {
                    registry.add(*handle, generator.as_ref());
                }
            }
            for (handle, generator) in &self.custom_forces {
                registry.add(*handle, generator.as_ref());
            }

            if !config.paused {
                registry.update_forces(&mut self.bodies, dt);
            }
            registry.len()
        };

        let mut broad_pairs = 0;
        let mut contacts = 0;

        if !config.paused {
            for (handle, body) in self.bodies.iter_mut() {
                if let Err(err) = body.as_body_mut().integrate(dt) {
                    tracing::warn!(?handle, %err, "integration skipped");
                }
            }

            if config.collisions_enabled {
                (broad_pairs, contacts) = self.detect_and_resolve(frame_time);
            }

            self.time += dt;
        }

        self.clamp_to_bounds();

        tracing::debug!(dt, bodies = self.bodies.len(), forces, broad_pairs, contacts, "tick");
    }

    /// Broad phase, narrow phase and resolution for one tick
    fn detect_and_resolve(&mut self, frame_time: f32) -> (usize, usize) {
        self.broad_phase
            .rebuild(self.bodies.iter().map(|(handle, body)| (handle, body.aabb())));
        let pairs = self.broad_phase.query_pairs();

        let params = ResolutionParams {
            restitution: self.config.restitution,
            frame_time,
            fallback_frame_time: self.config.fallback_frame_time,
        };

        let mut contacts = 0;
        for pair in &pairs {
            let Some((a, b)) = self.bodies.get_pair_mut(pair.body_a, pair.body_b) else {
                continue;
            };
            let Some(contact) = narrow_phase::collide(a, b) else {
                continue;
            };
            contacts += 1;

            if let Err(err) = resolve_contact(a, b, &contact, &params) {
                tracing::warn!(a = ?pair.body_a, b = ?pair.body_b, %err, "contact resolution skipped");
            }
        }

        self.counts.broad_phase_pairs += pairs.len() as u64;
        self.counts.narrow_phase_contacts += contacts as u64;
        (pairs.len(), contacts)
    }

    /// Reflective walls: clamp to the boundary and reverse the offending axis
    fn clamp_to_bounds(&mut self) {
        let half = self.config.world_half_extent;
        for (_, body) in self.bodies.iter_mut() {
            let body = body.as_body_mut();
            let mut position = body.position();
            let mut velocity = body.velocity();
            let mut clamped = false;

            for axis in 0..3 {
                if position[axis].abs() > half {
                    position[axis] = half.copysign(position[axis]);
                    velocity[axis] = -velocity[axis];
                    clamped = true;
                }
            }

            if clamped {
                body.set_position(position);
                body.set_velocity(velocity);
            }
        }
    }

    /// Post-tick state of every body, in insertion order
    pub fn query_transforms(&self) -> Vec<BodyTransform> {
        self.bodies
            .iter()
            .map(|(handle, body)| BodyTransform {
                handle,
                position: body.as_body().position(),
                rotation: body.rotation(),
                extents: body.extents(),
                color: body.color(),
                shape: body.shape().map(Shape::shape_type),
            })
            .collect()
    }

    pub fn query_collision_counts(&self) -> CollisionCounts {
        self.counts
    }
}
