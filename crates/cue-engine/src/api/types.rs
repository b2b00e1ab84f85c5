/// Stable identifier for a ball in the room.
/// Names are display labels only; all lookups after spawn go through this id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BallId(pub u32);

/// Outcome of routing one pointer event through the cue controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AimOutcome {
    /// The event did not apply (controller disabled, no cue ball, ray missed).
    Ignored,
    /// Idle → Aiming.
    AimStarted,
    /// Direction preview recomputed while aiming.
    AimUpdated { direction: glam::Vec3 },
    /// Aiming → Idle with a strike; `velocity` was written to the cue ball.
    Fired { velocity: glam::Vec3 },
    /// Aiming → Idle without a strike.
    Cancelled,
}
