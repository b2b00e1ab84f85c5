use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::core::material::Material;
use crate::core::physics::{BodyDesc, PhysicsBody, PhysicsWorld, ShapeDesc};
use crate::error::ConfigError;

/// One room wall: full box size, centre position and XYZ Euler rotation (radians).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallConfig {
    pub position: [f32; 3],
    pub rotation: [f32; 3],
    /// Width, height, depth.
    pub size: [f32; 3],
}

impl WallConfig {
    pub fn new(position: Vec3, rotation_y: f32) -> Self {
        Self {
            position: position.to_array(),
            rotation: [0.0, rotation_y, 0.0],
            size: [50.0, 25.0, 0.5],
        }
    }

    /// Intrinsic X then Y then Z.
    pub fn quaternion(&self) -> Quat {
        let [x, y, z] = self.rotation;
        Quat::from_euler(EulerRot::XYZ, x, y, z)
    }

    /// The box's local +Z in world space.
    pub fn normal(&self) -> Vec3 {
        self.quaternion() * Vec3::Z
    }
}

/// A static box collider bounding the room.
#[derive(Debug, Clone)]
pub struct BoundaryWall {
    body: PhysicsBody,
    position: Vec3,
    rotation: Quat,
    half_extents: Vec3,
}

impl BoundaryWall {
    pub fn build(world: &mut PhysicsWorld, config: &WallConfig) -> Result<Self, ConfigError> {
        let half_extents = Vec3::from(config.size) / 2.0;
        let position = Vec3::from(config.position);
        let rotation = config.quaternion();

        let body = world.create_body(
            &BodyDesc::fixed()
                .with_shape(ShapeDesc::cuboid(half_extents))
                .with_material(Material::Wall)
                .with_position(position)
                .with_rotation(rotation),
        )?;

        Ok(Self {
            body,
            position,
            rotation,
            half_extents,
        })
    }

    pub fn body(&self) -> PhysicsBody {
        self.body
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    pub fn half_extents(&self) -> Vec3 {
        self.half_extents
    }

    pub fn inward_normal(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }
}

/// Every wall's +Z must point toward the centroid of all wall positions.
pub fn check_walls_face_inward(walls: &[WallConfig]) -> Result<(), ConfigError> {
    if walls.is_empty() {
        return Ok(());
    }
    let centroid = walls
        .iter()
        .map(|w| Vec3::from(w.position))
        .sum::<Vec3>()
        / walls.len() as f32;

    for (index, wall) in walls.iter().enumerate() {
        let to_center = centroid - Vec3::from(wall.position);
        let facing = wall.normal().dot(to_center);
        if facing.is_nan() || facing <= 0.0 {
            return Err(ConfigError::WallFacesOutward { index });
        }
    }
    Ok(())
}
