use glam::{Quat, Vec3};

use crate::core::material::Material;
use crate::core::physics::{BodyDesc, PhysicsBody, PhysicsWorld, ShapeDesc};
use crate::error::ConfigError;

/// Thin static slab under the room, laid flat (box z axis turned to world y).
#[derive(Debug, Clone)]
pub struct Floor {
    body: PhysicsBody,
}

impl Floor {
    pub const HALF_EXTENTS: Vec3 = Vec3::new(25.0, 25.0, 0.1);

    pub fn build(world: &mut PhysicsWorld) -> Result<Self, ConfigError> {
        let body = world.create_body(
            &BodyDesc::fixed()
                .with_shape(ShapeDesc::cuboid(Self::HALF_EXTENTS))
                .with_material(Material::Floor)
                .with_rotation(Quat::from_rotation_x(-std::f32::consts::FRAC_PI_2)),
        )?;
        Ok(Self { body })
    }

    pub fn body(&self) -> PhysicsBody {
        self.body
    }
}
