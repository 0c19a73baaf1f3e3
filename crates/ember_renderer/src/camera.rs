//! Camera for ray generation.

use crate::sampling::{random_in_unit_disk, sample_square};
use crate::Ray;
use ember_math::Vec3;
use rand::RngCore;

/// Produces world-space primary rays for pixel coordinates.
pub trait RayGenerator: Send + Sync {
    /// Image size in pixels as (width, height).
    fn resolution(&self) -> (u32, u32);

    /// Ray through pixel (x, y), counted from the top-left.
    ///
    /// With `jitter`, the sample point is offset uniformly within
    /// [-0.5, 0.5] pixels on each image axis; otherwise it is the pixel center.
    fn get_ray(&self, x: u32, y: u32, jitter: bool, rng: &mut dyn RngCore) -> Ray;
}

/// Image-plane geometry derived from the camera settings.
#[derive(Debug, Clone, Copy, Default)]
struct Projection {
    eye: Vec3,
    /// Center of pixel (0, 0) on the focus plane
    first_pixel: Vec3,
    /// One pixel step right and down
    step_x: Vec3,
    step_y: Vec3,
    /// Lens disk axes, zero for a pinhole
    lens_x: Vec3,
    lens_y: Vec3,
}

/// Look-at camera with an optional thin-lens defocus disk.
///
/// Configure with the `with_*` builders, then call [`Camera::initialize`]
/// before asking for rays.
#[derive(Debug, Clone)]
pub struct Camera {
    width: u32,
    height: u32,

    look_from: Vec3,
    look_at: Vec3,
    vup: Vec3,

    vfov: f32,          // degrees, top to bottom
    defocus_angle: f32, // degrees, cone apex at the focus plane
    focus_dist: f32,

    projection: Projection,
}

impl Camera {
    pub fn new() -> Self {
        Self {
            width: 800,
            height: 450,
            look_from: Vec3::ZERO,
            look_at: -Vec3::Z,
            vup: Vec3::Y,
            vfov: 90.0,
            defocus_angle: 0.0,
            focus_dist: 1.0,
            projection: Projection::default(),
        }
    }

    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Vertical field of view, defocus cone angle (both in degrees) and the
    /// distance to the plane in perfect focus.
    pub fn with_lens(mut self, vfov: f32, defocus_angle: f32, focus_dist: f32) -> Self {
        self.vfov = vfov;
        self.defocus_angle = defocus_angle;
        self.focus_dist = focus_dist;
        self
    }

    /// Current (look_from, look_at).
    pub fn position(&self) -> (Vec3, Vec3) {
        (self.look_from, self.look_at)
    }

    /// Current (vfov, defocus_angle, focus_dist).
    pub fn lens(&self) -> (f32, f32, f32) {
        (self.vfov, self.defocus_angle, self.focus_dist)
    }

    /// Derive the projection from the current settings.
    pub fn initialize(&mut self) {
        let width = self.width.max(1) as f32;
        let height = self.height.max(1) as f32;

        // Right-handed basis; the camera looks down -backward
        let backward = (self.look_from - self.look_at).normalize();
        let right = self.vup.cross(backward).normalize();
        let up = backward.cross(right);

        let half_height = self.focus_dist * (0.5 * self.vfov.to_radians()).tan();
        let half_width = half_height * width / height;
        let span_x = 2.0 * half_width * right;
        let span_y = -2.0 * half_height * up;

        let step_x = span_x / width;
        let step_y = span_y / height;
        let top_left = self.look_from - self.focus_dist * backward - 0.5 * (span_x + span_y);

        let lens_radius = self.focus_dist * (0.5 * self.defocus_angle).to_radians().tan();

        self.projection = Projection {
            eye: self.look_from,
            first_pixel: top_left + 0.5 * (step_x + step_y),
            step_x,
            step_y,
            lens_x: lens_radius * right,
            lens_y: lens_radius * up,
        };

        log::debug!(
            "Camera at {:?} looking at {:?}, {}x{}, vfov {}",
            self.look_from,
            self.look_at,
            self.width,
            self.height,
            self.vfov
        );
    }

    fn ray_origin(&self, rng: &mut dyn RngCore) -> Vec3 {
        let proj = &self.projection;
        if self.defocus_angle <= 0.0 {
            return proj.eye;
        }
        let disk = random_in_unit_disk(rng);
        proj.eye + disk.x * proj.lens_x + disk.y * proj.lens_y
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

impl RayGenerator for Camera {
    fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn get_ray(&self, x: u32, y: u32, jitter: bool, rng: &mut dyn RngCore) -> Ray {
        let offset = if jitter { sample_square(rng) } else { Vec3::ZERO };

        let proj = &self.projection;
        let target = proj.first_pixel
            + (x as f32 + offset.x) * proj.step_x
            + (y as f32 + offset.y) * proj.step_y;

        let origin = self.ray_origin(rng);
        // Not normalized; spans origin to the focus plane
        Ray::new(origin, target - origin)
    }
}
