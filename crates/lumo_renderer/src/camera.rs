//! Pinhole camera for ray generation.

use crate::{Ray, Vec2, Vec3};

/// Pinhole camera mapping sensor coordinates to world-space rays.
///
/// The basis is derived once at construction: `right = forward × up_hint`,
/// `up = right × forward`, both normalized, giving a right-handed
/// orthonormal frame with `forward` as the viewing axis. The focal length is
/// the pinhole's distance from the sensor plane in sensor half-width units.
#[derive(Clone, Debug)]
pub struct PinholeCamera {
    position: Vec3,
    forward: Vec3,
    right: Vec3,
    up: Vec3,
    focal_length: f32,
}

impl PinholeCamera {
    /// Create a camera using world up `(0, 1, 0)` as the basis hint.
    ///
    /// `fov` is the full field-of-view angle in radians.
    pub fn new(position: Vec3, forward: Vec3, fov: f32) -> Self {
        Self::with_up(position, forward, Vec3::Y, fov)
    }

    /// Create a camera with an explicit up hint.
    ///
    /// The hint only fixes the roll; the stored `up` is re-orthogonalized
    /// against `forward`.
    pub fn with_up(position: Vec3, forward: Vec3, up_hint: Vec3, fov: f32) -> Self {
        let forward = forward.normalize();
        let right = forward.cross(up_hint).normalize();
        let up = right.cross(forward).normalize();

        let focal_length = 1.0 / (0.5 * fov).tan();

        log::debug!(
            "PinholeCamera: position {:?}, forward {:?}, right {:?}, up {:?}, focal length {}",
            position,
            forward,
            right,
            up,
            focal_length
        );

        Self {
            position,
            forward,
            right,
            up,
            focal_length,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    pub fn focal_length(&self) -> f32 {
        self.focal_length
    }

    /// Generate the ray for a sensor coordinate.
    ///
    /// `uv` lives on the sensor plane in `[-1, 1]²`. The ray starts at the
    /// sensor point and passes through the pinhole; its direction is unit
    /// length and the returned pdf is always 1 (the mapping is
    /// deterministic). Coordinates outside `[-1, 1]²` are not rejected here;
    /// if the sampling distribution cares, the caller filters them.
    pub fn sample_ray(&self, uv: Vec2) -> (Ray, f32) {
        let pinhole = self.position + self.focal_length * self.forward;
        let sensor = self.position + uv.x * self.right + uv.y * self.up;

        let ray = Ray::new(sensor, (pinhole - sensor).normalize());
        (ray, 1.0)
    }
}
