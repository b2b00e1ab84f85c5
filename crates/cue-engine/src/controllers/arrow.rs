use glam::Vec3;

/// Consumer of the aim vector. Draws (or records) where the shot will go.
pub trait AimIndicator {
    fn show(&mut self);
    fn hide(&mut self);
    /// `origin` is the cue ball centre, `direction` the unit strike direction.
    fn update(&mut self, origin: Vec3, direction: Vec3);
}

/// Default indicator: a flat segment from the ball centre along the aim,
/// plus the yaw of its arrowhead.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrowIndicator {
    length: f32,
    visible: bool,
    start: Vec3,
    end: Vec3,
    yaw: f32,
}

impl ArrowIndicator {
    pub const DEFAULT_LENGTH: f32 = 2.0;

    pub fn new(length: f32) -> Self {
        Self {
            length,
            visible: false,
            start: Vec3::ZERO,
            end: Vec3::ZERO,
            yaw: 0.0,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// (start, end) of the shaft; the end is where the head sits.
    pub fn segment(&self) -> (Vec3, Vec3) {
        (self.start, self.end)
    }

    /// Heading around +Y, `atan2(dx, dz)`.
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn length(&self) -> f32 {
        self.length
    }
}

impl Default for ArrowIndicator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LENGTH)
    }
}

impl AimIndicator for ArrowIndicator {
    fn show(&mut self) {
        self.visible = true;
    }

    fn hide(&mut self) {
        self.visible = false;
    }

    fn update(&mut self, origin: Vec3, direction: Vec3) {
        self.start = origin;
        // y stays at the ball centre regardless of the direction's y
        self.end = Vec3::new(
            origin.x + direction.x * self.length,
            origin.y,
            origin.z + direction.z * self.length,
        );
        self.yaw = direction.x.atan2(direction.z);
    }
}
