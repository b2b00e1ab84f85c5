use crate::api::types::BallId;
use crate::core::scene::BallSet;
use crate::input::pointer::Ray;

/// Nearest ball hit by `ray`, with its distance.
pub fn pick_ball(balls: &BallSet, ray: &Ray) -> Option<(BallId, f32)> {
    balls
        .iter()
        .filter_map(|ball| ball.intersect_ray(ray).map(|t| (ball.id(), t)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

/// Highlights the ball under the pointer. At most one ball is lit at a time.
#[derive(Debug, Default, Clone)]
pub struct HoverHighlighter {
    hovered: Option<BallId>,
}

impl HoverHighlighter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Light the nearest ball hit by `ray` and clear every other one.
    /// Returns the highlighted ball, if any.
    pub fn update(&mut self, balls: &mut BallSet, ray: &Ray) -> Option<BallId> {
        let hit = pick_ball(balls, ray).map(|(id, _)| id);
        for ball in balls.iter_mut() {
            ball.set_highlight(Some(ball.id()) == hit);
        }
        if hit != self.hovered {
            log::trace!("hover: {:?} -> {:?}", self.hovered, hit);
        }
        self.hovered = hit;
        hit
    }

    pub fn hovered(&self) -> Option<BallId> {
        self.hovered
    }
}
