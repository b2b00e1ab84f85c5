use thiserror::Error;

/// Malformed static configuration. Raised at construction, never at runtime.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("ball `{name}`: radius must be positive and finite, got {radius}")]
    NonPositiveRadius { name: String, radius: f32 },

    #[error("ball `{name}`: mass must be positive and finite, got {mass}")]
    NonPositiveMass { name: String, mass: f32 },

    #[error("body mass must be finite and not negative, got {0}")]
    InvalidBodyMass(f32),

    #[error("duplicate ball name `{0}`")]
    DuplicateBallName(String),

    #[error("{shape}: half-extents must be positive and finite, got {half_extents:?}")]
    NonPositiveExtent {
        shape: &'static str,
        half_extents: glam::Vec3,
    },

    #[error("wall {index} faces away from the room centre")]
    WallFacesOutward { index: usize },

    #[error("fixed timestep must be positive, got {0}")]
    InvalidTimestep(f32),

    #[error("max sub-steps must be at least 1")]
    ZeroSubSteps,

    #[error("hit power must be in (0, {max}], got {0}", max = crate::controllers::cue::MAX_HIT_POWER)]
    InvalidHitPower(f32),

    #[error("{field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f32 },

    #[error("viewport must be positive and finite, got {0}x{1}")]
    InvalidViewport(f32, f32),

    #[error("spawn jitter must be finite and not negative, got {0}")]
    InvalidJitter(f32),

    #[error("invalid room config: {0}")]
    Parse(#[from] serde_json::Error),
}
