use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::core::material::Material;
use crate::core::physics::{is_positive, BodyDesc, PhysicsBody, PhysicsWorld, ShapeDesc};
use crate::error::ConfigError;

/// Authored table measurements, in world units, matched to the visual model at scale 7.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableDimensions {
    pub table_width: f32,
    pub table_depth: f32,
    /// Subtracted from width and depth to get the play area.
    pub margin: f32,
    pub surface_y: f32,
    pub surface_thickness: f32,
    pub rail_height: f32,
    pub rail_thickness: f32,
}

impl Default for TableDimensions {
    fn default() -> Self {
        Self {
            table_width: 18.54,
            table_depth: 10.78,
            margin: 2.5,
            surface_y: 4.7,
            surface_thickness: 1.0,
            rail_height: 0.8,
            rail_thickness: 1.2,
        }
    }
}

impl TableDimensions {
    pub fn play_area_width(&self) -> f32 {
        self.table_width - self.margin
    }

    pub fn play_area_depth(&self) -> f32 {
        self.table_depth - self.margin
    }

    /// Height of the surface top above the table origin.
    pub fn surface_top(&self) -> f32 {
        self.surface_y + self.surface_thickness / 2.0
    }

    /// Every measurement must be finite. Sizes are checked for sign by [`Self::shapes`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("table_width", self.table_width),
            ("table_depth", self.table_depth),
            ("margin", self.margin),
            ("surface_y", self.surface_y),
            ("surface_thickness", self.surface_thickness),
            ("rail_height", self.rail_height),
            ("rail_thickness", self.rail_thickness),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { field, value });
            }
        }
        Ok(())
    }

    /// Play surface followed by long rails (+z, -z) and short rails (-x, +x),
    /// all in table-local space.
    pub fn shapes(&self) -> Result<Vec<ShapeDesc>, ConfigError> {
        self.validate()?;
        let width = self.play_area_width();
        let depth = self.play_area_depth();
        let rail_y = self.surface_top() + self.rail_height / 2.0;

        let surface = ShapeDesc::cuboid(Vec3::new(
            width / 2.0,
            self.surface_thickness / 2.0,
            depth / 2.0,
        ))
        .with_offset(Vec3::new(0.0, self.surface_y, 0.0));

        let long_rail = Vec3::new(width / 2.0, self.rail_height / 2.0, self.rail_thickness / 2.0);
        // short rails reach past the long ones to close the corner seam
        let short_rail = Vec3::new(
            self.rail_thickness / 2.0,
            self.rail_height / 2.0,
            depth / 2.0 + self.rail_thickness,
        );
        let z_off = depth / 2.0 + self.rail_thickness / 2.0;
        let x_off = width / 2.0 + self.rail_thickness / 2.0;

        let shapes = vec![
            surface,
            ShapeDesc::cuboid(long_rail).with_offset(Vec3::new(0.0, rail_y, z_off)),
            ShapeDesc::cuboid(long_rail).with_offset(Vec3::new(0.0, rail_y, -z_off)),
            ShapeDesc::cuboid(short_rail).with_offset(Vec3::new(-x_off, rail_y, 0.0)),
            ShapeDesc::cuboid(short_rail).with_offset(Vec3::new(x_off, rail_y, 0.0)),
        ];

        for shape in &shapes {
            shape.validate()?;
        }
        Ok(shapes)
    }
}

/// Placement of the table in the room. `scale` only affects the visual model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub scale: f32,
    pub position: [f32; 3],
    pub dimensions: TableDimensions,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            scale: 7.0,
            position: [0.0; 3],
            dimensions: TableDimensions::default(),
        }
    }
}

impl TableConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_positive(self.scale) {
            return Err(ConfigError::NonFinite {
                field: "table scale",
                value: self.scale,
            });
        }
        if let Some(&value) = self.position.iter().find(|v| !v.is_finite()) {
            return Err(ConfigError::NonFinite {
                field: "table position",
                value,
            });
        }
        self.dimensions.shapes().map(|_| ())
    }
}

/// The static compound body the balls roll on: one surface box and four rails.
#[derive(Debug, Clone)]
pub struct TableCollider {
    body: PhysicsBody,
    position: Vec3,
    scale: f32,
    dimensions: TableDimensions,
}

impl TableCollider {
    pub fn build(world: &mut PhysicsWorld, config: &TableConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let shapes = config.dimensions.shapes()?;
        let position = Vec3::from(config.position);

        let desc = shapes.into_iter().fold(
            BodyDesc::fixed()
                .with_material(Material::Table)
                .with_position(position),
            BodyDesc::with_shape,
        );
        let body = world.create_body(&desc)?;

        log::info!(
            "table collider: play area {:.2} x {:.2} at y {:.2}",
            config.dimensions.play_area_width(),
            config.dimensions.play_area_depth(),
            position.y + config.dimensions.surface_top()
        );

        Ok(Self {
            body,
            position,
            scale: config.scale,
            dimensions: config.dimensions,
        })
    }

    pub fn body(&self) -> PhysicsBody {
        self.body
    }

    /// World y of the top of the play surface.
    pub fn play_height(&self) -> f32 {
        self.position.y + self.dimensions.surface_top()
    }

    /// Inner (min, max) corners of the play area on the x/z plane, in world space.
    pub fn play_bounds(&self) -> (Vec2, Vec2) {
        let half = Vec2::new(
            self.dimensions.play_area_width() / 2.0,
            self.dimensions.play_area_depth() / 2.0,
        );
        let center = Vec2::new(self.position.x, self.position.z);
        (center - half, center + half)
    }

    /// Transform for the visual model: (position, uniform scale).
    pub fn visual_transform(&self) -> (Vec3, f32) {
        (self.position, self.scale)
    }

    pub fn dimensions(&self) -> &TableDimensions {
        &self.dimensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::physics::ShapeKind;
    use crate::controllers::cue::MAX_HIT_POWER;
    use crate::objects::ball::{Ball, BallConfig};
    use crate::api::types::BallId;

    fn half_extents(shape: &ShapeDesc) -> Vec3 {
        match shape.kind {
            ShapeKind::Cuboid { half_extents } => half_extents,
            other => panic!("expected cuboid, got {:?}", other),
        }
    }

    #[test]
    fn default_layout_matches_measurements() {
        let shapes = TableDimensions::default().shapes().unwrap();
        assert_eq!(shapes.len(), 5);

        let surface = half_extents(&shapes[0]);
        assert!((surface - Vec3::new(8.02, 0.5, 4.14)).length() < 1e-4);
        assert!((shapes[0].offset - Vec3::new(0.0, 4.7, 0.0)).length() < 1e-4);

        let long = half_extents(&shapes[1]);
        assert!((long - Vec3::new(8.02, 0.4, 0.6)).length() < 1e-4);
        assert!((shapes[1].offset - Vec3::new(0.0, 5.6, 4.74)).length() < 1e-4);
        assert!((shapes[2].offset - Vec3::new(0.0, 5.6, -4.74)).length() < 1e-4);

        let short = half_extents(&shapes[3]);
        assert!((short - Vec3::new(0.6, 0.4, 5.34)).length() < 1e-4);
        assert!((shapes[3].offset - Vec3::new(-8.62, 5.6, 0.0)).length() < 1e-4);
        assert!((shapes[4].offset - Vec3::new(8.62, 5.6, 0.0)).length() < 1e-4);
    }

    #[test]
    fn rails_enclose_the_surface() {
        let dims = TableDimensions::default();
        let shapes = dims.shapes().unwrap();
        let surface = half_extents(&shapes[0]);

        // short rails cover the full depth including the long rails' thickness
        let short = half_extents(&shapes[3]);
        let long_outer = shapes[1].offset.z + half_extents(&shapes[1]).z;
        assert!(short.z >= long_outer - 1e-4);

        // inner faces of the rails sit exactly on the surface edges
        let long_inner = shapes[1].offset.z - half_extents(&shapes[1]).z;
        assert!((long_inner - surface.z).abs() < 1e-4);
        let short_inner = shapes[4].offset.x - short.x;
        assert!((short_inner - surface.x).abs() < 1e-4);
    }

    #[test]
    fn non_positive_extent_fails_fast() {
        let dims = TableDimensions {
            margin: 20.0,
            ..Default::default()
        };
        let err = dims.shapes().unwrap_err();
        assert!(matches!(err, ConfigError::NonPositiveExtent { shape: "cuboid", .. }));

        let mut world = PhysicsWorld::new(Vec3::ZERO);
        let config = TableConfig {
            dimensions: TableDimensions {
                rail_height: 0.0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(TableCollider::build(&mut world, &config).is_err());
        assert_eq!(world.body_count(), 0);
    }

    #[test]
    fn non_finite_measurements_fail_fast() {
        for bad in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            let dims = TableDimensions {
                rail_height: bad,
                ..Default::default()
            };
            assert!(matches!(dims.shapes(), Err(ConfigError::NonFinite { field: "rail_height", .. })));

            let dims = TableDimensions {
                surface_y: bad,
                ..Default::default()
            };
            assert!(matches!(dims.shapes(), Err(ConfigError::NonFinite { field: "surface_y", .. })));

            let mut world = PhysicsWorld::new(Vec3::ZERO);
            let config = TableConfig {
                position: [0.0, bad, 0.0],
                ..Default::default()
            };
            assert!(TableCollider::build(&mut world, &config).is_err());
            let config = TableConfig {
                scale: bad,
                ..Default::default()
            };
            assert!(config.validate().is_err());
            assert_eq!(world.body_count(), 0);
        }
    }

    #[test]
    fn play_height_and_bounds_follow_position() {
        let mut world = PhysicsWorld::new(Vec3::ZERO);
        let config = TableConfig {
            position: [1.0, 2.0, 3.0],
            ..Default::default()
        };
        let table = TableCollider::build(&mut world, &config).unwrap();
        assert!((table.play_height() - 7.2).abs() < 1e-4);

        let (min, max) = table.play_bounds();
        assert!((min - Vec2::new(1.0 - 8.02, 3.0 - 4.14)).length() < 1e-4);
        assert!((max - Vec2::new(1.0 + 8.02, 3.0 + 4.14)).length() < 1e-4);
        assert_eq!(table.visual_transform(), (Vec3::new(1.0, 2.0, 3.0), 7.0));
        assert!(world.is_static(&table.body()));
    }

    fn table_world() -> (PhysicsWorld, TableCollider) {
        let mut world = PhysicsWorld::new(Vec3::new(0.0, -9.81, 0.0));
        world.set_dt(1.0 / 60.0);
        let table = TableCollider::build(&mut world, &TableConfig::default()).unwrap();
        (world, table)
    }

    #[test]
    fn resting_ball_settles_on_surface() {
        let (mut world, table) = table_world();
        let config = BallConfig::new("White", Vec3::new(0.0, 5.5, 0.0), 0xffffff);
        let mut ball = Ball::spawn(&mut world, BallId(1), &config, Vec2::ZERO).unwrap();

        let mut samples = Vec::new();
        for i in 0..300 {
            world.step();
            if i >= 240 {
                ball.update(&world);
                samples.push(ball.position());
            }
        }

        let rest_y = table.play_height() + ball.radius();
        let last = *samples.last().unwrap();
        assert!((last.y - rest_y).abs() < 0.02, "rest y={}, expected {}", last.y, rest_y);

        let drift = samples
            .windows(2)
            .map(|w| (w[1] - w[0]).length())
            .fold(0.0f32, f32::max);
        assert!(drift < 1e-3, "ball still drifting: {}", drift);
    }

    #[test]
    fn corner_shots_stay_inside_the_rails() {
        let angles = [0.0f32, 2.0, 5.0, 10.0, 30.0, 45.0, 60.0, 80.0, 85.0, 88.0, 90.0];
        let speeds = [10.0f32, 20.0, 30.0, 36.0, 38.0, 40.0, 42.0, 45.0, 50.0, MAX_HIT_POWER];
        for offset in [0.5f32, 1.0, 2.0] {
            for speed in speeds {
                for angle_deg in angles {
                    let (mut world, table) = table_world();
                    let (min, max) = table.play_bounds();
                    let start = Vec3::new(max.x - offset, table.play_height() + 0.3, max.y - offset);
                    let config = BallConfig::new("White", start, 0xffffff);
                    let mut ball = Ball::spawn(&mut world, BallId(1), &config, Vec2::ZERO).unwrap();

                    let a = angle_deg.to_radians();
                    world.set_velocity(&ball.body(), Vec3::new(a.cos(), 0.0, a.sin()) * speed);

                    for _ in 0..120 {
                        world.step();
                        ball.update(&world);
                        let p = ball.position();
                        assert!(
                            p.x > min.x - 1e-2 && p.x < max.x + 1e-2 && p.z > min.y - 1e-2 && p.z < max.y + 1e-2,
                            "ball escaped: offset {} speed {} angle {}: {:?}",
                            offset,
                            speed,
                            angle_deg,
                            p
                        );
                        assert!(
                            p.y > table.play_height(),
                            "ball fell through: offset {} speed {} angle {}: {:?}",
                            offset,
                            speed,
                            angle_deg,
                            p
                        );
                    }
                }
            }
        }
    }
}
