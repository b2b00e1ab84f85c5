use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::api::types::{AimOutcome, BallId};
use crate::controllers::arrow::AimIndicator;
use crate::core::physics::PhysicsWorld;
use crate::core::scene::BallSet;
use crate::error::ConfigError;
use crate::input::pointer::Ray;

/// Strongest strike accepted, in units per second. Shots up to this speed are
/// held by the rails at the default 60 Hz step.
pub const MAX_HIT_POWER: f32 = 60.0;

/// Strike settings, fixed for the controller's lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CueConfig {
    /// Speed given to the cue ball on a confirmed strike.
    pub hit_power: f32,
    pub cue_ball_name: String,
}

impl Default for CueConfig {
    fn default() -> Self {
        Self {
            hit_power: 10.0,
            cue_ball_name: "White".to_string(),
        }
    }
}

impl CueConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let power = self.hit_power;
        if !(power.is_finite() && power > 0.0 && power <= MAX_HIT_POWER) {
            return Err(ConfigError::InvalidHitPower(self.hit_power));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AimState {
    #[default]
    Idle,
    Aiming,
}

/// Horizontal unit vector from `hit_point` through `ball_center`.
/// `None` when the two differ only in height.
pub fn strike_direction(ball_center: Vec3, hit_point: Vec3) -> Option<Vec3> {
    let d = ball_center - hit_point;
    Vec3::new(d.x, 0.0, d.z).try_normalize()
}

/// What the controller needs from the room to handle one event.
pub struct CueContext<'a> {
    pub balls: &'a BallSet,
    pub world: &'a mut PhysicsWorld,
    /// Fallback aim plane when the pointer leaves the ball.
    pub play_height: f32,
    pub indicator: &'a mut dyn AimIndicator,
}

/// Turns pointer rays into a strike on the cue ball.
///
/// Idle → Aiming on a click on the cue ball. While aiming, pointer moves steer the
/// indicator. A second click on the ball fires, a secondary click cancels.
pub struct CueController {
    config: CueConfig,
    state: AimState,
    enabled: bool,
    cue_ball: Option<BallId>,
    direction: Option<Vec3>,
}

impl CueController {
    pub fn new(config: CueConfig) -> Self {
        Self {
            config,
            state: AimState::Idle,
            enabled: false,
            cue_ball: None,
            direction: None,
        }
    }

    pub fn config(&self) -> &CueConfig {
        &self.config
    }

    pub fn state(&self) -> AimState {
        self.state
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Last direction fed to the indicator while aiming.
    pub fn direction(&self) -> Option<Vec3> {
        self.direction
    }

    /// Start accepting pointer input.
    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// Stop accepting pointer input. Always ends in Idle with the indicator hidden.
    pub fn disable(&mut self, indicator: &mut dyn AimIndicator) {
        self.enabled = false;
        self.reset(indicator);
    }

    fn reset(&mut self, indicator: &mut dyn AimIndicator) {
        self.state = AimState::Idle;
        self.direction = None;
        indicator.hide();
    }

    /// Resolve the cue ball by name, caching the ID once found.
    pub fn resolve_cue_ball(&mut self, balls: &BallSet) -> Option<BallId> {
        if let Some(id) = self.cue_ball {
            if balls.get(id).is_some() {
                return Some(id);
            }
            self.cue_ball = None;
        }
        let id = balls.find_by_name(&self.config.cue_ball_name)?;
        log::debug!("cue ball '{}' resolved to {:?}", self.config.cue_ball_name, id);
        self.cue_ball = Some(id);
        Some(id)
    }

    pub fn on_pointer_move(&mut self, ray: &Ray, ctx: CueContext<'_>) -> AimOutcome {
        if !self.enabled || self.state != AimState::Aiming {
            return AimOutcome::Ignored;
        }
        let Some(id) = self.resolve_cue_ball(ctx.balls) else {
            return AimOutcome::Ignored;
        };
        let Some(ball) = ctx.balls.get(id) else {
            return AimOutcome::Ignored;
        };

        let hit_point = match ball.intersect_ray(ray) {
            Some(t) => ray.at(t),
            None => match ray.intersect_plane_y(ctx.play_height) {
                Some(t) => ray.at(t),
                None => return AimOutcome::Ignored,
            },
        };

        let (center, _) = ctx.world.body_pose(&ball.body());
        let Some(direction) = strike_direction(center, hit_point) else {
            return AimOutcome::Ignored;
        };

        self.direction = Some(direction);
        ctx.indicator.update(center, direction);
        AimOutcome::AimUpdated { direction }
    }

    pub fn on_primary_click(&mut self, ray: &Ray, ctx: CueContext<'_>) -> AimOutcome {
        if !self.enabled {
            return AimOutcome::Ignored;
        }
        let Some(id) = self.resolve_cue_ball(ctx.balls) else {
            return AimOutcome::Ignored;
        };
        let Some(ball) = ctx.balls.get(id) else {
            return AimOutcome::Ignored;
        };
        let Some(t) = ball.intersect_ray(ray) else {
            return AimOutcome::Ignored;
        };

        match self.state {
            AimState::Idle => {
                self.state = AimState::Aiming;
                ctx.indicator.show();
                log::debug!("aiming '{}'", ball.name());
                AimOutcome::AimStarted
            }
            AimState::Aiming => {
                let body = ball.body();
                let (center, _) = ctx.world.body_pose(&body);
                let Some(direction) = strike_direction(center, ray.at(t)) else {
                    return AimOutcome::Ignored;
                };

                let velocity = direction * self.config.hit_power;
                ctx.world.set_velocity(&body, velocity);
                log::info!("strike '{}': velocity {:?}", ball.name(), velocity);

                self.reset(ctx.indicator);
                AimOutcome::Fired { velocity }
            }
        }
    }

    pub fn on_secondary_click(&mut self, indicator: &mut dyn AimIndicator) -> AimOutcome {
        if !self.enabled || self.state != AimState::Aiming {
            return AimOutcome::Ignored;
        }
        self.reset(indicator);
        AimOutcome::Cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::arrow::ArrowIndicator;
    use crate::objects::ball::{Ball, BallConfig};
    use glam::Vec2;

    struct Rig {
        world: PhysicsWorld,
        balls: BallSet,
        arrow: ArrowIndicator,
        cue: CueController,
        white: BallId,
    }

    impl Rig {
        fn new() -> Self {
            let mut world = PhysicsWorld::new(Vec3::ZERO);
            world.set_dt(1.0 / 60.0);
            let mut balls = BallSet::new();
            for (name, x) in [("White", 0.0), ("Red", 3.0)] {
                let id = balls.next_id();
                let config = BallConfig::new(name, Vec3::new(x, 0.0, 0.0), 0xffffff);
                balls
                    .insert(Ball::spawn(&mut world, id, &config, Vec2::ZERO).unwrap())
                    .unwrap();
            }
            let white = balls.find_by_name("White").unwrap();
            let mut cue = CueController::new(CueConfig::default());
            cue.enable();
            Self {
                world,
                balls,
                arrow: ArrowIndicator::default(),
                cue,
                white,
            }
        }

        fn click(&mut self, ray: Ray) -> AimOutcome {
            self.cue.on_primary_click(
                &ray,
                CueContext {
                    balls: &self.balls,
                    world: &mut self.world,
                    play_height: -0.3,
                    indicator: &mut self.arrow,
                },
            )
        }

        fn pointer(&mut self, ray: Ray) -> AimOutcome {
            self.cue.on_pointer_move(
                &ray,
                CueContext {
                    balls: &self.balls,
                    world: &mut self.world,
                    play_height: -0.3,
                    indicator: &mut self.arrow,
                },
            )
        }

        fn white_velocity(&self) -> Vec3 {
            let body = self.balls.get(self.white).unwrap().body();
            self.world.velocity(&body)
        }
    }

    fn at_white_from_left() -> Ray {
        Ray::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::X)
    }

    fn missing() -> Ray {
        Ray::new(Vec3::new(-5.0, 5.0, 0.0), Vec3::X)
    }

    #[test]
    fn strike_direction_is_flat_unit() {
        let center = Vec3::new(1.0, 5.5, -2.0);
        for lat in -8..=8 {
            for lon in 0..24 {
                let theta = lat as f32 / 9.0 * std::f32::consts::FRAC_PI_2;
                let phi = lon as f32 / 24.0 * std::f32::consts::TAU;
                let offset = Vec3::new(theta.cos() * phi.cos(), theta.sin(), theta.cos() * phi.sin()) * 0.3;

                let d = strike_direction(center, center + offset).unwrap();
                assert!((d.length() - 1.0).abs() < 1e-5, "lat {} lon {}: {:?}", lat, lon, d);
                assert_eq!(d.y, 0.0);
                let flat = Vec3::new(-offset.x, 0.0, -offset.z).normalize();
                assert!((d - flat).length() < 1e-4, "lat {} lon {}: {:?}", lat, lon, d);
            }
        }
        assert!(strike_direction(center, center + Vec3::new(0.0, 0.3, 0.0)).is_none());
        assert!(strike_direction(center, center - Vec3::new(0.0, 0.3, 0.0)).is_none());
    }

    #[test]
    fn click_off_ball_while_idle_is_noop() {
        let mut rig = Rig::new();
        assert_eq!(rig.click(missing()), AimOutcome::Ignored);
        assert_eq!(rig.cue.state(), AimState::Idle);
        assert!(!rig.arrow.is_visible());
    }

    #[test]
    fn click_on_other_ball_does_not_aim() {
        let mut rig = Rig::new();
        let at_red = Ray::new(Vec3::new(3.0, 5.0, 0.0), -Vec3::Y);
        assert_eq!(rig.click(at_red), AimOutcome::Ignored);
        assert_eq!(rig.cue.state(), AimState::Idle);
    }

    #[test]
    fn click_on_cue_ball_starts_aiming() {
        let mut rig = Rig::new();
        assert_eq!(rig.click(at_white_from_left()), AimOutcome::AimStarted);
        assert_eq!(rig.cue.state(), AimState::Aiming);
        assert!(rig.arrow.is_visible());
    }

    #[test]
    fn pointer_move_steers_indicator() {
        let mut rig = Rig::new();
        rig.click(at_white_from_left());

        let outcome = rig.pointer(Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z));
        match outcome {
            AimOutcome::AimUpdated { direction } => {
                assert!((direction - Vec3::Z).length() < 1e-4, "dir={:?}", direction)
            }
            other => panic!("expected AimUpdated, got {:?}", other),
        }
        let (start, end) = rig.arrow.segment();
        assert!(start.length() < 1e-5);
        assert!((end - Vec3::new(0.0, 0.0, 2.0)).length() < 1e-4);
    }

    #[test]
    fn pointer_move_off_ball_uses_play_plane() {
        let mut rig = Rig::new();
        rig.click(at_white_from_left());

        // lands on the plane y = -0.3 at (-2, -0.3, 0)
        let ray = Ray::new(Vec3::new(-2.0, 5.0, 0.0), -Vec3::Y);
        match rig.pointer(ray) {
            AimOutcome::AimUpdated { direction } => {
                assert!((direction - Vec3::X).length() < 1e-4, "dir={:?}", direction)
            }
            other => panic!("expected AimUpdated, got {:?}", other),
        }
    }

    #[test]
    fn pointer_move_while_idle_is_ignored() {
        let mut rig = Rig::new();
        assert_eq!(rig.pointer(at_white_from_left()), AimOutcome::Ignored);
        assert!(rig.cue.direction().is_none());
    }

    #[test]
    fn confirm_sets_velocity_and_returns_to_idle() {
        let mut rig = Rig::new();
        rig.click(at_white_from_left());
        let outcome = rig.click(at_white_from_left());

        match outcome {
            AimOutcome::Fired { velocity } => {
                assert!((velocity - Vec3::new(10.0, 0.0, 0.0)).length() < 1e-4)
            }
            other => panic!("expected Fired, got {:?}", other),
        }
        assert!((rig.white_velocity() - Vec3::new(10.0, 0.0, 0.0)).length() < 1e-4);
        assert_eq!(rig.cue.state(), AimState::Idle);
        assert!(!rig.arrow.is_visible());
    }

    #[test]
    fn confirm_overwrites_existing_velocity() {
        let mut rig = Rig::new();
        let body = rig.balls.get(rig.white).unwrap().body();
        rig.world.set_velocity(&body, Vec3::new(0.0, 3.0, 7.0));

        rig.click(at_white_from_left());
        rig.click(at_white_from_left());
        assert!((rig.white_velocity() - Vec3::new(10.0, 0.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn confirm_click_off_ball_keeps_aiming() {
        let mut rig = Rig::new();
        rig.click(at_white_from_left());
        assert_eq!(rig.click(missing()), AimOutcome::Ignored);
        assert_eq!(rig.cue.state(), AimState::Aiming);
        assert!(rig.white_velocity().length() < 1e-6);
    }

    #[test]
    fn secondary_click_cancels_without_velocity() {
        let mut rig = Rig::new();
        rig.click(at_white_from_left());
        assert_eq!(rig.cue.on_secondary_click(&mut rig.arrow), AimOutcome::Cancelled);
        assert_eq!(rig.cue.state(), AimState::Idle);
        assert!(!rig.arrow.is_visible());
        assert!(rig.white_velocity().length() < 1e-6);

        // cancelling while idle does nothing
        assert_eq!(rig.cue.on_secondary_click(&mut rig.arrow), AimOutcome::Ignored);
    }

    #[test]
    fn disable_resets_from_aiming() {
        let mut rig = Rig::new();
        rig.click(at_white_from_left());
        rig.cue.disable(&mut rig.arrow);
        assert_eq!(rig.cue.state(), AimState::Idle);
        assert!(!rig.arrow.is_visible());
        assert!(!rig.cue.is_enabled());
        assert_eq!(rig.click(at_white_from_left()), AimOutcome::Ignored);

        rig.cue.enable();
        assert_eq!(rig.click(at_white_from_left()), AimOutcome::AimStarted);
    }

    #[test]
    fn missing_cue_ball_makes_handlers_noops() {
        let mut rig = Rig::new();
        rig.cue = CueController::new(CueConfig {
            cue_ball_name: "Black".to_string(),
            ..Default::default()
        });
        rig.cue.enable();
        assert_eq!(rig.click(at_white_from_left()), AimOutcome::Ignored);
        assert_eq!(rig.pointer(at_white_from_left()), AimOutcome::Ignored);
        assert!(rig.cue.resolve_cue_ball(&rig.balls).is_none());
    }

    #[test]
    fn invalid_hit_power_rejected() {
        let config = CueConfig {
            hit_power: 0.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidHitPower(_))));
        for bad in [f32::NAN, f32::INFINITY, MAX_HIT_POWER + 1.0] {
            let config = CueConfig {
                hit_power: bad,
                ..Default::default()
            };
            assert!(matches!(config.validate(), Err(ConfigError::InvalidHitPower(_))), "{}", bad);
        }
        assert!(CueConfig::default().validate().is_ok());
        let strongest = CueConfig {
            hit_power: MAX_HIT_POWER,
            ..Default::default()
        };
        assert!(strongest.validate().is_ok());
    }
}
