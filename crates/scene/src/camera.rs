//! Perspective map camera with pan, orbit and zoom.
//!
//! The camera itself only translates. Orbiting rotates the model about the
//! scene origin instead: the model transform applies the azimuth rotation
//! about +Y first, then the elevation rotation about +X. Picking rays are
//! carried back into model space through the inverse of that transform so
//! they can be tested against untransformed primitive geometry.

use foundation::math::{Vec3, clamp};

use crate::picking::Ray;

/// Elevation limits in degrees.
pub const MIN_ELEVATION_DEG: f64 = -90.0;
pub const MAX_ELEVATION_DEG: f64 = 0.0;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn aspect(&self) -> Option<f64> {
        (self.width > 0.0 && self.height > 0.0).then(|| self.width / self.height)
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MapCamera {
    pub position: Vec3,
    pub look: Vec3,
    pub up: Vec3,
    /// Horizontal field of view in degrees.
    pub fov_deg: f64,
    pub near: f64,
    pub far: f64,
    /// Model rotation about +X, in degrees, kept within the elevation limits.
    pub elevation_deg: f64,
    /// Model rotation about +Y, in degrees.
    pub azimuth_deg: f64,
}

impl Default for MapCamera {
    fn default() -> Self {
        Self::top_down(2000.0, 60.0, 1.0, 10_000.0)
    }
}

impl MapCamera {
    /// Camera above the origin looking straight down, with screen-up along -Z.
    pub fn top_down(height: f64, fov_deg: f64, near: f64, far: f64) -> Self {
        Self {
            position: Vec3::new(0.0, height, 0.0),
            look: Vec3::new(0.0, -1.0, 0.0),
            up: Vec3::new(0.0, 0.0, -1.0),
            fov_deg,
            near,
            far,
            elevation_deg: 0.0,
            azimuth_deg: 0.0,
        }
    }

    pub fn right(&self) -> Vec3 {
        self.look.cross(self.up)
    }

    /// Moves the camera against the pointer delta so the map follows the drag.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.position = self.position + self.right() * -dx + self.up * dy;
    }

    /// Orbits the model: `dy` adds elevation, `dx` adds azimuth.
    pub fn rotate(&mut self, dx: f64, dy: f64) {
        self.elevation_deg = clamp(self.elevation_deg + dy, MIN_ELEVATION_DEG, MAX_ELEVATION_DEG);
        self.azimuth_deg += dx;
    }

    pub fn zoom(&mut self, delta: f64) {
        self.position = self.position + self.look * delta;
    }

    pub fn model_to_world(&self, p: Vec3) -> Vec3 {
        rotate_x(rotate_y(p, self.azimuth_deg), self.elevation_deg)
    }

    pub fn world_to_model(&self, p: Vec3) -> Vec3 {
        rotate_y(rotate_x(p, -self.elevation_deg), -self.azimuth_deg)
    }

    /// Ray in world space from the eye through pixel `(x_px, y_px)`.
    pub fn world_ray(&self, x_px: f64, y_px: f64, viewport: Viewport) -> Option<Ray> {
        let aspect = viewport.aspect()?;
        let look = self.look.normalized()?;
        let right = self.right().normalized()?;
        let up = right.cross(look);

        let ndc_x = 2.0 * x_px / viewport.width - 1.0;
        let ndc_y = 1.0 - 2.0 * y_px / viewport.height;
        let half_w = (self.fov_deg.to_radians() * 0.5).tan();
        let half_h = half_w / aspect;

        let dir = (look + right * (ndc_x * half_w) + up * (ndc_y * half_h)).normalized()?;
        Some(Ray::new(self.position, dir))
    }

    /// Picking ray in model space, ready to test against scene primitives.
    pub fn screen_ray(&self, x_px: f64, y_px: f64, viewport: Viewport) -> Option<Ray> {
        let ray = self.world_ray(x_px, y_px, viewport)?;
        Some(Ray::new(
            self.world_to_model(ray.origin),
            self.world_to_model(ray.dir),
        ))
    }
}

fn rotate_x(p: Vec3, deg: f64) -> Vec3 {
    let (s, c) = deg.to_radians().sin_cos();
    Vec3::new(p.x, p.y * c - p.z * s, p.y * s + p.z * c)
}

fn rotate_y(p: Vec3, deg: f64) -> Vec3 {
    let (s, c) = deg.to_radians().sin_cos();
    Vec3::new(p.x * c + p.z * s, p.y, -p.x * s + p.z * c)
}
