use glam::{Vec2, Vec3};

use crate::api::config::RoomConfig;
use crate::api::types::{AimOutcome, BallId};
use crate::assets::loading::AssetState;
use crate::controllers::arrow::ArrowIndicator;
use crate::controllers::cue::{CueContext, CueController};
use crate::core::physics::PhysicsWorld;
use crate::core::rng::Rng;
use crate::core::scene::BallSet;
use crate::core::time::SimulationClock;
use crate::error::ConfigError;
use crate::input::pointer::PointerRays;
use crate::input::queue::{InputEvent, InputQueue};
use crate::objects::ball::Ball;
use crate::objects::floor::Floor;
use crate::objects::table::TableCollider;
use crate::objects::wall::BoundaryWall;
use crate::renderer::camera::PerspectiveCamera;
use crate::renderer::instance::RenderBuffer;
use crate::systems::hover::HoverHighlighter;

/// A billiards room: table, walls, floor and balls in one physics world,
/// driven by pointer input and a fixed-step clock.
///
/// Per frame (`tick`): drain input → physics steps → ball pose sync → render buffer.
pub struct BilliardsRoom {
    config: RoomConfig,
    world: PhysicsWorld,
    clock: SimulationClock,
    table: TableCollider,
    walls: Vec<BoundaryWall>,
    floor: Floor,
    balls: BallSet,
    rng: Rng,
    camera: PerspectiveCamera,
    pointer: PointerRays,
    hover: HoverHighlighter,
    cue: CueController,
    arrow: ArrowIndicator,
    input: InputQueue,
    render: RenderBuffer,
    table_asset: AssetState,
    outcomes: Vec<AimOutcome>,
}

impl BilliardsRoom {
    /// Validate the config and build every static body. Balls wait for the
    /// table asset's completion signal.
    pub fn new(config: RoomConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut world = PhysicsWorld::new(Vec3::from(config.gravity));
        world.set_dt(config.fixed_time_step);
        for pairing in &config.pairings {
            world.register_pairing(*pairing);
        }

        let floor = Floor::build(&mut world)?;
        let walls = config
            .walls
            .iter()
            .map(|wall| BoundaryWall::build(&mut world, wall))
            .collect::<Result<Vec<_>, _>>()?;
        let table = TableCollider::build(&mut world, &config.table)?;

        let [width, height] = config.viewport;
        let camera = config.camera.to_camera(width / height);

        let mut cue = CueController::new(config.cue.clone());
        cue.enable();

        log::info!(
            "room ready: {} walls, {} balls pending, {} pairings",
            walls.len(),
            config.balls.len(),
            world.pairings().len()
        );

        Ok(Self {
            clock: SimulationClock::new(config.fixed_time_step, config.max_sub_steps),
            rng: Rng::new(config.seed),
            pointer: PointerRays::new(width, height),
            camera,
            world,
            table,
            walls,
            floor,
            balls: BallSet::new(),
            hover: HoverHighlighter::new(),
            cue,
            arrow: ArrowIndicator::default(),
            input: InputQueue::new(),
            render: RenderBuffer::new(),
            table_asset: AssetState::Pending,
            outcomes: Vec::new(),
            config,
        })
    }

    /// The table model finished loading.
    pub fn on_table_loaded(&mut self) -> Result<(), ConfigError> {
        self.settle_table(Ok(()))
    }

    /// The table model failed to load. The collider stays in place and the
    /// balls are still spawned.
    pub fn on_table_load_failed(&mut self, reason: &str) -> Result<(), ConfigError> {
        log::error!("table model failed to load: {}", reason);
        self.settle_table(Err(reason.to_string()))
    }

    fn settle_table(&mut self, outcome: Result<(), String>) -> Result<(), ConfigError> {
        if !self.table_asset.settle(outcome) {
            log::warn!("table completion signal repeated; ignoring");
            return Ok(());
        }
        self.spawn_balls()?;
        self.sync_render();
        Ok(())
    }

    fn spawn_balls(&mut self) -> Result<(), ConfigError> {
        let amount = self.config.jitter;
        for config in &self.config.balls {
            self.balls.check_name(&config.name)?;
            let id = self.balls.next_id();
            let jitter = Vec2::new(self.rng.jitter(amount), self.rng.jitter(amount));
            let ball = Ball::spawn(&mut self.world, id, config, jitter)?;
            self.balls.insert(ball)?;
        }
        log::info!("spawned {} balls", self.balls.len());
        Ok(())
    }

    /// Queue a pointer event for the next tick.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Run one frame at wall-clock time `now_secs`. Returns the physics steps run.
    pub fn tick(&mut self, now_secs: f64) -> u32 {
        self.outcomes.clear();
        for event in self.input.drain() {
            self.handle_event(event);
        }

        let steps = self.clock.tick(now_secs);
        for _ in 0..steps {
            self.world.step();
        }

        for ball in self.balls.iter_mut() {
            ball.update(&self.world);
        }
        self.sync_render();
        steps
    }

    fn handle_event(&mut self, event: InputEvent) {
        let outcome = match event {
            InputEvent::PointerMove { x, y } => {
                let ray = self.pointer.ray(Vec2::new(x, y), &self.camera);
                self.hover.update(&mut self.balls, &ray);
                self.cue.on_pointer_move(
                    &ray,
                    CueContext {
                        balls: &self.balls,
                        world: &mut self.world,
                        play_height: self.table.play_height(),
                        indicator: &mut self.arrow,
                    },
                )
            }
            InputEvent::PrimaryClick { x, y } => {
                let ray = self.pointer.ray(Vec2::new(x, y), &self.camera);
                self.cue.on_primary_click(
                    &ray,
                    CueContext {
                        balls: &self.balls,
                        world: &mut self.world,
                        play_height: self.table.play_height(),
                        indicator: &mut self.arrow,
                    },
                )
            }
            InputEvent::SecondaryClick { .. } => self.cue.on_secondary_click(&mut self.arrow),
        };
        if outcome != AimOutcome::Ignored {
            self.outcomes.push(outcome);
        }
    }

    fn sync_render(&mut self) {
        self.render.clear();
        for ball in self.balls.iter() {
            self.render.push(ball.instance());
        }
    }

    pub fn enable_cue(&mut self) {
        self.cue.enable();
    }

    /// Stop aiming and drop the indicator, whatever the current state.
    pub fn disable_cue(&mut self) {
        self.cue.disable(&mut self.arrow);
    }

    pub fn set_camera(&mut self, eye: Vec3, target: Vec3) {
        self.camera.look_at(eye, target);
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.camera.resize(width, height);
        self.pointer.resize(width, height);
    }

    pub fn config(&self) -> &RoomConfig {
        &self.config
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn table(&self) -> &TableCollider {
        &self.table
    }

    pub fn walls(&self) -> &[BoundaryWall] {
        &self.walls
    }

    pub fn floor(&self) -> &Floor {
        &self.floor
    }

    pub fn balls(&self) -> &BallSet {
        &self.balls
    }

    pub fn ball_by_name(&self, name: &str) -> Option<&Ball> {
        self.balls.find_by_name(name).and_then(|id| self.balls.get(id))
    }

    pub fn hovered(&self) -> Option<BallId> {
        self.hover.hovered()
    }

    pub fn cue(&self) -> &CueController {
        &self.cue
    }

    pub fn arrow(&self) -> &ArrowIndicator {
        &self.arrow
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn render_buffer(&self) -> &RenderBuffer {
        &self.render
    }

    pub fn table_asset(&self) -> &AssetState {
        &self.table_asset
    }

    /// Non-ignored aim outcomes from the last tick.
    pub fn outcomes(&self) -> &[AimOutcome] {
        &self.outcomes
    }
}
