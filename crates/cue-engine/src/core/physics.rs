use glam::{Quat, Vec3};
use rapier3d::prelude::*;

use crate::core::material::{ColliderMaterial, ContactPairing, ContactPairings, Material};
use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Conversion helpers (private): glam <-> nalgebra
// ---------------------------------------------------------------------------

fn vec3_to_na(v: Vec3) -> nalgebra::Vector3<f32> {
    nalgebra::Vector3::new(v.x, v.y, v.z)
}

fn na_to_vec3(v: &nalgebra::Vector3<f32>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

fn quat_to_na(q: Quat) -> nalgebra::UnitQuaternion<f32> {
    nalgebra::UnitQuaternion::from_quaternion(nalgebra::Quaternion::new(q.w, q.x, q.y, q.z))
}

fn na_iso_to_pose(iso: &nalgebra::Isometry3<f32>) -> (Vec3, Quat) {
    let pos = na_to_vec3(&iso.translation.vector);
    let c = iso.rotation.coords;
    (pos, Quat::from_xyzw(c.x, c.y, c.z, c.w))
}

fn pose_to_na_iso(pos: Vec3, rot: Quat) -> nalgebra::Isometry3<f32> {
    nalgebra::Isometry3::from_parts(nalgebra::Translation3::from(vec3_to_na(pos)), quat_to_na(rot))
}

/// Finite and strictly greater than zero. NaN fails.
pub(crate) fn is_positive(v: f32) -> bool {
    v.is_finite() && v > 0.0
}

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Geometric primitive of a single shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeKind {
    Ball { radius: f32 },
    Cuboid { half_extents: Vec3 },
}

/// One primitive of a (possibly compound) body, at a fixed offset in body space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeDesc {
    pub kind: ShapeKind,
    pub offset: Vec3,
}

impl ShapeDesc {
    pub fn ball(radius: f32) -> Self {
        Self {
            kind: ShapeKind::Ball { radius },
            offset: Vec3::ZERO,
        }
    }

    pub fn cuboid(half_extents: Vec3) -> Self {
        Self {
            kind: ShapeKind::Cuboid { half_extents },
            offset: Vec3::ZERO,
        }
    }

    pub fn with_offset(mut self, offset: Vec3) -> Self {
        self.offset = offset;
        self
    }

    /// Reject degenerate primitives, including NaN and infinite sizes. Never clamps.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.kind {
            ShapeKind::Ball { radius } if !is_positive(radius) => Err(ConfigError::NonPositiveExtent {
                shape: "ball",
                half_extents: Vec3::splat(radius),
            }),
            ShapeKind::Cuboid { half_extents }
                if !half_extents.to_array().into_iter().all(is_positive) =>
            {
                Err(ConfigError::NonPositiveExtent {
                    shape: "cuboid",
                    half_extents,
                })
            }
            _ => Ok(()),
        }
    }

    fn build_collider(&self) -> ColliderBuilder {
        let builder = match self.kind {
            ShapeKind::Ball { radius } => ColliderBuilder::ball(radius),
            ShapeKind::Cuboid { half_extents } => {
                ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            }
        };
        builder.translation(vec3_to_na(self.offset))
    }
}

/// Builder for describing a rigid body before creation.
/// A mass of zero makes the body static: it never moves under forces or contacts.
#[derive(Debug, Clone)]
pub struct BodyDesc {
    pub shapes: Vec<ShapeDesc>,
    pub mass: f32,
    pub material: Material,
    pub position: Vec3,
    pub rotation: Quat,
    pub velocity: Vec3,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub ccd: bool,
    /// Speculative contact reach; 0 disables soft CCD.
    pub soft_ccd: f32,
}

impl BodyDesc {
    /// A static (mass 0) body with no shapes yet.
    pub fn fixed() -> Self {
        Self::dynamic(0.0)
    }

    /// A body of the given mass with no shapes yet.
    pub fn dynamic(mass: f32) -> Self {
        Self {
            shapes: Vec::new(),
            mass,
            material: Material::Default,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            velocity: Vec3::ZERO,
            linear_damping: 0.0,
            angular_damping: 0.0,
            ccd: false,
            soft_ccd: 0.0,
        }
    }

    pub fn with_shape(mut self, shape: ShapeDesc) -> Self {
        self.shapes.push(shape);
        self
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    pub fn with_position(mut self, pos: Vec3) -> Self {
        self.position = pos;
        self
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_velocity(mut self, vel: Vec3) -> Self {
        self.velocity = vel;
        self
    }

    /// Velocity decay. Stands in for rolling resistance on the felt.
    pub fn with_linear_damping(mut self, damping: f32) -> Self {
        self.linear_damping = damping;
        self
    }

    pub fn with_angular_damping(mut self, damping: f32) -> Self {
        self.angular_damping = damping;
        self
    }

    pub fn with_ccd(mut self, enabled: bool) -> Self {
        self.ccd = enabled;
        self
    }

    /// Generate contacts ahead of the body up to `distance` along its path.
    /// Covers the speeds where swept CCD still skips a pair because the
    /// step is shorter than the two shapes' combined thickness.
    pub fn with_soft_ccd(mut self, distance: f32) -> Self {
        self.soft_ccd = distance;
        self
    }

    pub fn is_static(&self) -> bool {
        self.mass == 0.0
    }
}

/// Handle to a body living in a [`PhysicsWorld`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhysicsBody {
    pub(crate) handle: RigidBodyHandle,
}

// ---------------------------------------------------------------------------
// PhysicsWorld
// ---------------------------------------------------------------------------

/// Wraps all Rapier3D boilerplate into a single struct.
/// Owns every body in the room and the registered contact pairings.
pub struct PhysicsWorld {
    gravity: nalgebra::Vector3<f32>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    pairings: ContactPairings,
    fallback: ColliderMaterial,
    steps: u64,
}

impl PhysicsWorld {
    /// Create a world with the given gravity (Y-up, e.g. `Vec3::new(0.0, -9.81, 0.0)`).
    pub fn new(gravity: Vec3) -> Self {
        Self {
            gravity: vec3_to_na(gravity),
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            pairings: ContactPairings::new(),
            fallback: ColliderMaterial::default(),
            steps: 0,
        }
    }

    /// Set the integration timestep.
    pub fn set_dt(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
    }

    pub fn dt(&self) -> f32 {
        self.integration_parameters.dt
    }

    pub fn gravity(&self) -> Vec3 {
        na_to_vec3(&self.gravity)
    }

    /// Register a friction/restitution rule. Must happen before the bodies touch.
    pub fn register_pairing(&mut self, pairing: ContactPairing) {
        self.pairings.register(pairing);
    }

    pub fn pairings(&self) -> &ContactPairings {
        &self.pairings
    }

    /// Create a rigid body with all its shapes.
    /// Every collider carries the body's material in `user_data` for pairing lookups.
    pub fn create_body(&mut self, desc: &BodyDesc) -> Result<PhysicsBody, ConfigError> {
        if !(desc.mass.is_finite() && desc.mass >= 0.0) {
            return Err(ConfigError::InvalidBodyMass(desc.mass));
        }
        for shape in &desc.shapes {
            shape.validate()?;
        }

        let body_type = if desc.is_static() {
            RigidBodyType::Fixed
        } else {
            RigidBodyType::Dynamic
        };

        let rb = RigidBodyBuilder::new(body_type)
            .position(pose_to_na_iso(desc.position, desc.rotation))
            .linvel(vec3_to_na(desc.velocity))
            .linear_damping(desc.linear_damping)
            .angular_damping(desc.angular_damping)
            .ccd_enabled(desc.ccd)
            .soft_ccd_prediction(desc.soft_ccd)
            .build();

        let handle = self.bodies.insert(rb);

        let shape_mass = if desc.shapes.is_empty() {
            0.0
        } else {
            desc.mass / desc.shapes.len() as f32
        };

        for shape in &desc.shapes {
            let mut builder = shape
                .build_collider()
                .friction(self.fallback.friction)
                .restitution(self.fallback.restitution)
                .user_data(desc.material.to_user_data())
                .active_hooks(ActiveHooks::MODIFY_SOLVER_CONTACTS);
            if !desc.is_static() {
                builder = builder.mass(shape_mass);
            }
            self.colliders
                .insert_with_parent(builder.build(), handle, &mut self.bodies);
        }
        if let Some(rb) = self.bodies.get_mut(handle) {
            rb.recompute_mass_properties_from_colliders(&self.colliders);
        }

        Ok(PhysicsBody { handle })
    }

    /// Remove a body and all its colliders from the simulation.
    pub fn remove_body(&mut self, body: &PhysicsBody) {
        self.bodies.remove(
            body.handle,
            &mut self.island_manager,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    /// Advance the simulation by exactly one fixed step.
    pub fn step(&mut self) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            &self.pairings,
            &(),
        );
        self.steps += 1;
    }

    /// Overwrite the linear velocity of a body. No-op on static bodies.
    pub fn set_velocity(&mut self, body: &PhysicsBody, vel: Vec3) {
        if let Some(rb) = self.bodies.get_mut(body.handle) {
            if rb.is_dynamic() {
                rb.set_linvel(vec3_to_na(vel), true);
            }
        }
    }

    pub fn velocity(&self, body: &PhysicsBody) -> Vec3 {
        self.bodies
            .get(body.handle)
            .map(|rb| na_to_vec3(rb.linvel()))
            .unwrap_or(Vec3::ZERO)
    }

    pub fn angular_velocity(&self, body: &PhysicsBody) -> Vec3 {
        self.bodies
            .get(body.handle)
            .map(|rb| na_to_vec3(rb.angvel()))
            .unwrap_or(Vec3::ZERO)
    }

    /// World position and orientation of a body.
    pub fn body_pose(&self, body: &PhysicsBody) -> (Vec3, Quat) {
        self.bodies
            .get(body.handle)
            .map(|rb| na_iso_to_pose(rb.position()))
            .unwrap_or((Vec3::ZERO, Quat::IDENTITY))
    }

    pub fn is_static(&self, body: &PhysicsBody) -> bool {
        self.bodies
            .get(body.handle)
            .map(|rb| rb.is_fixed())
            .unwrap_or(true)
    }

    pub fn mass(&self, body: &PhysicsBody) -> f32 {
        self.bodies.get(body.handle).map(|rb| rb.mass()).unwrap_or(0.0)
    }

    /// Shapes of a body in body space, in insertion order.
    pub fn body_shapes(&self, body: &PhysicsBody) -> Vec<ShapeDesc> {
        let Some(rb) = self.bodies.get(body.handle) else {
            return Vec::new();
        };
        rb.colliders()
            .iter()
            .filter_map(|&ch| {
                let collider = self.colliders.get(ch)?;
                let offset = collider
                    .position_wrt_parent()
                    .map(|iso| na_to_vec3(&iso.translation.vector))
                    .unwrap_or(Vec3::ZERO);
                let shape = collider.shape();
                let kind = if let Some(ball) = shape.as_ball() {
                    ShapeKind::Ball { radius: ball.radius }
                } else if let Some(cuboid) = shape.as_cuboid() {
                    ShapeKind::Cuboid {
                        half_extents: na_to_vec3(&cuboid.half_extents),
                    }
                } else {
                    return None;
                };
                Some(ShapeDesc { kind, offset })
            })
            .collect()
    }

    /// Number of rigid bodies in the simulation.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Fixed steps executed since creation.
    pub fn step_count(&self) -> u64 {
        self.steps
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
