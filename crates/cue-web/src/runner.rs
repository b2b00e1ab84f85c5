use cue_engine::{AimOutcome, BilliardsRoom, ConfigError, InputEvent, RoomConfig};
use glam::Vec3;

/// Floats per packed aim outcome: kind, x, y, z.
pub const OUTCOME_FLOATS: usize = 4;
/// Floats in the packed arrow: visible, start xyz, end xyz, yaw.
pub const ARROW_FLOATS: usize = 8;

/// Owns the room and adapts browser-side units (milliseconds, JSON strings,
/// flat float buffers) to the engine API.
///
/// The WASM exports keep one of these in a `thread_local!`, because
/// wasm-bindgen cannot hand out references to Rust structs across calls.
pub struct RoomRunner {
    room: BilliardsRoom,
    /// Aim outcomes of the last tick, packed for JS reads.
    outcome_buffer: Vec<f32>,
}

impl RoomRunner {
    pub fn new(config: RoomConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            room: BilliardsRoom::new(config)?,
            outcome_buffer: Vec::with_capacity(OUTCOME_FLOATS * 8),
        })
    }

    /// Build from a JSON config, or the standard room when `json` is `None`.
    pub fn from_json(json: Option<&str>) -> Result<Self, ConfigError> {
        let config = match json {
            Some(json) => RoomConfig::from_json(json)?,
            None => RoomConfig::default(),
        };
        Self::new(config)
    }

    pub fn room(&self) -> &BilliardsRoom {
        &self.room
    }

    pub fn room_mut(&mut self) -> &mut BilliardsRoom {
        &mut self.room
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.room.push_input(event);
    }

    /// Run one frame. `time_ms` is the animation-frame timestamp.
    pub fn tick(&mut self, time_ms: f64) -> u32 {
        let steps = self.room.tick(time_ms / 1000.0);

        self.outcome_buffer.clear();
        for outcome in self.room.outcomes() {
            self.outcome_buffer.extend_from_slice(&pack_outcome(outcome));
        }
        steps
    }

    pub fn table_loaded(&mut self) -> Result<(), ConfigError> {
        self.room.on_table_loaded()
    }

    pub fn table_load_failed(&mut self, reason: &str) -> Result<(), ConfigError> {
        self.room.on_table_load_failed(reason)
    }

    // ---- Pointer accessors for direct memory reads ----

    pub fn instances_ptr(&self) -> *const f32 {
        self.room.render_buffer().instances_ptr()
    }

    pub fn instance_count(&self) -> u32 {
        self.room.render_buffer().instance_count()
    }

    pub fn outcomes_ptr(&self) -> *const f32 {
        self.outcome_buffer.as_ptr()
    }

    pub fn outcome_count(&self) -> u32 {
        (self.outcome_buffer.len() / OUTCOME_FLOATS) as u32
    }

    pub fn arrow(&self) -> [f32; ARROW_FLOATS] {
        let arrow = self.room.arrow();
        let (start, end) = arrow.segment();
        [
            if arrow.is_visible() { 1.0 } else { 0.0 },
            start.x,
            start.y,
            start.z,
            end.x,
            end.y,
            end.z,
            arrow.yaw(),
        ]
    }
}

/// `[kind, x, y, z]`; kind 1 = aim started, 2 = aim updated (direction),
/// 3 = fired (velocity), 4 = cancelled.
pub fn pack_outcome(outcome: &AimOutcome) -> [f32; OUTCOME_FLOATS] {
    let (kind, v) = match *outcome {
        AimOutcome::Ignored => (0.0, Vec3::ZERO),
        AimOutcome::AimStarted => (1.0, Vec3::ZERO),
        AimOutcome::AimUpdated { direction } => (2.0, direction),
        AimOutcome::Fired { velocity } => (3.0, velocity),
        AimOutcome::Cancelled => (4.0, Vec3::ZERO),
    };
    [kind, v.x, v.y, v.z]
}
