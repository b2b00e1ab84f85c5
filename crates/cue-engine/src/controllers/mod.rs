pub mod arrow;
pub mod cue;

pub use arrow::{AimIndicator, ArrowIndicator};
pub use cue::{strike_direction, AimState, MAX_HIT_POWER, CueConfig, CueContext, CueController};
