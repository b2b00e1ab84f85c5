use glam::{Vec2, Vec3};

use crate::core::physics::is_positive;
use crate::renderer::camera::Viewpoint;

/// A half-line in world space. `direction` is unit length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point at distance `t` along the ray.
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Nearest non-negative distance at which the ray meets the sphere.
    /// An origin inside the sphere yields the exit point.
    pub fn intersect_sphere(&self, center: Vec3, radius: f32) -> Option<f32> {
        let oc = self.origin - center;
        let b = oc.dot(self.direction);
        let c = oc.length_squared() - radius * radius;
        let disc = b * b - c;
        if disc < 0.0 {
            return None;
        }
        let sqrt_disc = disc.sqrt();
        let near = -b - sqrt_disc;
        if near >= 0.0 {
            return Some(near);
        }
        let far = -b + sqrt_disc;
        (far >= 0.0).then_some(far)
    }

    /// Distance to the horizontal plane `y = height`, if it lies ahead.
    pub fn intersect_plane_y(&self, height: f32) -> Option<f32> {
        if self.direction.y.abs() < 1e-6 {
            return None;
        }
        let t = (height - self.origin.y) / self.direction.y;
        (t >= 0.0).then_some(t)
    }
}

/// Pixel coordinates (origin top-left, y down) to normalized device coordinates.
pub fn pixel_to_ndc(pixel: Vec2, viewport: Vec2) -> Vec2 {
    Vec2::new(
        pixel.x / viewport.x * 2.0 - 1.0,
        -(pixel.y / viewport.y) * 2.0 + 1.0,
    )
}

/// World-space ray through an NDC point of the viewpoint.
pub fn ray_from_pointer(ndc: Vec2, viewpoint: &dyn Viewpoint) -> Ray {
    let inv = viewpoint.view_projection().inverse();
    let near = inv.project_point3(Vec3::new(ndc.x, ndc.y, 0.0));
    let far = inv.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));
    Ray::new(near, far - near)
}

/// Converts raw pointer pixels into world rays for the current viewport size.
#[derive(Debug, Clone, Copy)]
pub struct PointerRays {
    viewport: Vec2,
}

impl PointerRays {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            viewport: Vec2::new(width, height),
        }
    }

    /// Degenerate sizes are ignored, as in [`PerspectiveCamera::resize`].
    ///
    /// [`PerspectiveCamera::resize`]: crate::renderer::camera::PerspectiveCamera::resize
    pub fn resize(&mut self, width: f32, height: f32) {
        if is_positive(width) && is_positive(height) {
            self.viewport = Vec2::new(width, height);
        }
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn ray(&self, pixel: Vec2, viewpoint: &dyn Viewpoint) -> Ray {
        ray_from_pointer(pixel_to_ndc(pixel, self.viewport), viewpoint)
    }
}
