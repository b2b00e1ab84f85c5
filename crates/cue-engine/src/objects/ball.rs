use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::api::types::BallId;
use crate::core::material::Material;
use crate::core::physics::{is_positive, BodyDesc, PhysicsBody, PhysicsWorld, ShapeDesc};
use crate::error::ConfigError;
use crate::input::pointer::Ray;
use crate::renderer::instance::BallInstance;

/// Damping applied to both linear and angular velocity of every ball.
pub const BALL_DAMPING: f32 = 0.3;
/// Outline radius relative to the ball radius.
pub const OUTLINE_SCALE: f32 = 1.1;
/// How far ahead of a ball contacts are predicted. Must exceed ball radius
/// plus rail half-height: steps shorter than that are skipped by swept CCD.
pub const BALL_SOFT_CCD: f32 = 1.2;

/// Static description of one ball.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallConfig {
    /// Display name, unique across the set ("White" is the cue ball by default).
    pub name: String,
    pub radius: f32,
    pub position: [f32; 3],
    /// 0xRRGGBB.
    pub color: u32,
    pub mass: f32,
}

impl BallConfig {
    pub fn new(name: &str, position: Vec3, color: u32) -> Self {
        Self {
            name: name.to_string(),
            radius: 0.3,
            position: position.to_array(),
            color,
            mass: 1.0,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_positive(self.radius) {
            return Err(ConfigError::NonPositiveRadius {
                name: self.name.clone(),
                radius: self.radius,
            });
        }
        if !is_positive(self.mass) {
            return Err(ConfigError::NonPositiveMass {
                name: self.name.clone(),
                mass: self.mass,
            });
        }
        Ok(())
    }
}

/// Unpack 0xRRGGBB into [0, 1] floats.
pub fn color_to_rgb(color: u32) -> [f32; 3] {
    [
        ((color >> 16) & 0xff) as f32 / 255.0,
        ((color >> 8) & 0xff) as f32 / 255.0,
        (color & 0xff) as f32 / 255.0,
    ]
}

/// Highlight shell drawn around a ball (back faces only, slightly larger).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outline {
    pub radius: f32,
    pub visible: bool,
}

/// A dynamic sphere body paired with its render pose and highlight outline.
#[derive(Debug, Clone)]
pub struct Ball {
    id: BallId,
    name: String,
    radius: f32,
    color: u32,
    body: PhysicsBody,
    position: Vec3,
    rotation: Quat,
    outline: Outline,
}

impl Ball {
    /// Create the body at `config.position` shifted by `jitter` on x/z.
    pub fn spawn(
        world: &mut PhysicsWorld,
        id: BallId,
        config: &BallConfig,
        jitter: Vec2,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let position = Vec3::from(config.position) + Vec3::new(jitter.x, 0.0, jitter.y);
        let body = world.create_body(
            &BodyDesc::dynamic(config.mass)
                .with_shape(ShapeDesc::ball(config.radius))
                .with_material(Material::Ball)
                .with_position(position)
                .with_linear_damping(BALL_DAMPING)
                .with_angular_damping(BALL_DAMPING)
                .with_ccd(true)
                .with_soft_ccd(BALL_SOFT_CCD),
        )?;

        Ok(Self {
            id,
            name: config.name.clone(),
            radius: config.radius,
            color: config.color,
            body,
            position,
            rotation: Quat::IDENTITY,
            outline: Outline {
                radius: config.radius * OUTLINE_SCALE,
                visible: false,
            },
        })
    }

    /// Copy the body pose into the render pose.
    pub fn update(&mut self, world: &PhysicsWorld) {
        let (position, rotation) = world.body_pose(&self.body);
        self.position = position;
        self.rotation = rotation;
    }

    /// Toggle the outline. Has no effect on physics.
    pub fn set_highlight(&mut self, highlighted: bool) {
        self.outline.visible = highlighted;
    }

    /// Distance along `ray` to the rendered sphere, if hit.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        ray.intersect_sphere(self.position, self.radius)
    }

    pub fn id(&self) -> BallId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn color(&self) -> u32 {
        self.color
    }

    pub fn body(&self) -> PhysicsBody {
        self.body
    }

    /// Render position (as of the last `update`).
    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    pub fn outline(&self) -> Outline {
        self.outline
    }

    pub fn is_highlighted(&self) -> bool {
        self.outline.visible
    }

    pub fn instance(&self) -> BallInstance {
        let [r, g, b] = color_to_rgb(self.color);
        BallInstance {
            x: self.position.x,
            y: self.position.y,
            z: self.position.z,
            qx: self.rotation.x,
            qy: self.rotation.y,
            qz: self.rotation.z,
            qw: self.rotation.w,
            radius: self.radius,
            r,
            g,
            b,
            highlight: if self.outline.visible { 1.0 } else { 0.0 },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> PhysicsWorld {
        let mut world = PhysicsWorld::new(Vec3::new(0.0, -9.81, 0.0));
        world.set_dt(1.0 / 60.0);
        world
    }

    #[test]
    fn spawn_applies_jitter_on_xz_only() {
        let mut world = world();
        let config = BallConfig::new("Red", Vec3::new(4.0, 5.5, 0.0), 0xff0000);
        let ball = Ball::spawn(&mut world, BallId(1), &config, Vec2::new(0.004, -0.003)).unwrap();

        assert!((ball.position() - Vec3::new(4.004, 5.5, -0.003)).length() < 1e-5);
        let (body_pos, _) = world.body_pose(&ball.body());
        assert!((body_pos - ball.position()).length() < 1e-5);
    }

    #[test]
    fn outline_is_larger_and_hidden() {
        let mut world = world();
        let config = BallConfig::new("White", Vec3::ZERO, 0xffffff);
        let mut ball = Ball::spawn(&mut world, BallId(1), &config, Vec2::ZERO).unwrap();

        assert!(ball.outline().radius > ball.radius());
        assert!(!ball.is_highlighted());
        ball.set_highlight(true);
        assert!(ball.is_highlighted());
        assert_eq!(ball.instance().highlight, 1.0);
        ball.set_highlight(false);
        assert!(!ball.is_highlighted());
    }

    #[test]
    fn update_follows_body() {
        let mut world = world();
        let config = BallConfig::new("Blue", Vec3::new(0.0, 10.0, 0.0), 0x4169e1);
        let mut ball = Ball::spawn(&mut world, BallId(2), &config, Vec2::ZERO).unwrap();

        for _ in 0..20 {
            world.step();
        }
        // render pose is stale until update
        assert!((ball.position().y - 10.0).abs() < 1e-5);
        ball.update(&world);
        assert!(ball.position().y < 10.0);
    }

    #[test]
    fn ball_body_is_damped_with_ccd() {
        let mut world = PhysicsWorld::new(Vec3::ZERO);
        world.set_dt(1.0 / 60.0);
        let config = BallConfig::new("Green", Vec3::ZERO, 0x3cb371);
        let ball = Ball::spawn(&mut world, BallId(3), &config, Vec2::ZERO).unwrap();

        world.set_velocity(&ball.body(), Vec3::new(5.0, 0.0, 0.0));
        for _ in 0..60 {
            world.step();
        }
        let speed = world.velocity(&ball.body()).length();
        assert!(speed < 5.0 && speed > 3.0, "speed after 1s of damping: {}", speed);
    }

    #[test]
    fn invalid_ball_is_rejected() {
        let mut world = world();
        let mut config = BallConfig::new("Bad", Vec3::ZERO, 0);
        config.radius = 0.0;
        let err = Ball::spawn(&mut world, BallId(1), &config, Vec2::ZERO).unwrap_err();
        assert!(matches!(err, ConfigError::NonPositiveRadius { .. }));

        config.radius = 0.3;
        config.mass = 0.0;
        let err = Ball::spawn(&mut world, BallId(1), &config, Vec2::ZERO).unwrap_err();
        assert!(matches!(err, ConfigError::NonPositiveMass { .. }));
        assert_eq!(world.body_count(), 0);
    }

    #[test]
    fn non_finite_ball_is_rejected() {
        let mut world = world();
        for bad in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            let mut config = BallConfig::new("Bad", Vec3::ZERO, 0);
            config.radius = bad;
            assert!(matches!(config.validate(), Err(ConfigError::NonPositiveRadius { .. })));

            config.radius = 0.3;
            config.mass = bad;
            let err = Ball::spawn(&mut world, BallId(1), &config, Vec2::ZERO).unwrap_err();
            assert!(matches!(err, ConfigError::NonPositiveMass { .. }), "mass {}", bad);
        }
        assert_eq!(world.body_count(), 0);
    }

    #[test]
    fn intersect_ray_uses_render_pose() {
        let mut world = world();
        let config = BallConfig::new("White", Vec3::ZERO, 0xffffff);
        let ball = Ball::spawn(&mut world, BallId(1), &config, Vec2::ZERO).unwrap();

        let hit = Ray::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::X);
        assert!(ball.intersect_ray(&hit).is_some());
        let miss = Ray::new(Vec3::new(-5.0, 0.5, 0.0), Vec3::X);
        assert!(ball.intersect_ray(&miss).is_none());
    }

    #[test]
    fn color_unpacks() {
        assert_eq!(color_to_rgb(0xff0000), [1.0, 0.0, 0.0]);
        assert_eq!(color_to_rgb(0xffffff), [1.0, 1.0, 1.0]);
    }
}
