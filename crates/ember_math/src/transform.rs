// Affine transforms for instancing objects in the scene
//
// Stores the forward linear map together with its inverse so rays can be
// pulled back into object space without inverting per hit.

use crate::Aabb;
use glam::{Mat3, Vec3};

/// Translation plus a 3x3 linear map (rotation combined with scale).
///
/// Points map as `translation + linear * p`; vectors ignore the translation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineTransform {
    translation: Vec3,
    linear: Mat3,
    inverse_linear: Mat3,
}

impl AffineTransform {
    pub const IDENTITY: AffineTransform = AffineTransform {
        translation: Vec3::ZERO,
        linear: Mat3::IDENTITY,
        inverse_linear: Mat3::IDENTITY,
    };

    /// Scale first, then rotate, then translate.
    ///
    /// `rotation` is expected to be orthonormal and `scale` free of zeros.
    pub fn new(translation: Vec3, rotation: Mat3, scale: Vec3) -> Self {
        Self::from_linear(translation, rotation * Mat3::from_diagonal(scale))
    }

    /// Build from an arbitrary invertible linear map.
    pub fn from_linear(translation: Vec3, linear: Mat3) -> Self {
        Self {
            translation,
            linear,
            inverse_linear: linear.inverse(),
        }
    }

    pub fn from_translation(translation: Vec3) -> Self {
        Self::from_linear(translation, Mat3::IDENTITY)
    }

    pub fn from_scale(scale: Vec3) -> Self {
        Self::new(Vec3::ZERO, Mat3::IDENTITY, scale)
    }

    /// Rotation about +Y by `degrees`, counter-clockwise looking down the axis.
    pub fn from_rotation_y_degrees(degrees: f32) -> Self {
        Self::from_linear(Vec3::ZERO, Mat3::from_rotation_y(degrees.to_radians()))
    }

    /// Same linear map, with `translation` replacing the current offset.
    pub fn with_translation(mut self, translation: Vec3) -> Self {
        self.translation = translation;
        self
    }

    pub fn translation(&self) -> Vec3 {
        self.translation
    }

    pub fn linear(&self) -> Mat3 {
        self.linear
    }

    pub fn inverse_linear(&self) -> Mat3 {
        self.inverse_linear
    }

    /// Object space to world space.
    #[inline]
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.translation + self.linear * point
    }

    /// Applies the linear map only; translation does not affect vectors.
    #[inline]
    pub fn transform_vector(&self, vector: Vec3) -> Vec3 {
        self.linear * vector
    }

    /// World space to object space.
    #[inline]
    pub fn inverse_transform_point(&self, point: Vec3) -> Vec3 {
        self.inverse_linear * (point - self.translation)
    }

    #[inline]
    pub fn inverse_transform_vector(&self, vector: Vec3) -> Vec3 {
        self.inverse_linear * vector
    }

    /// Transform an axis-aligned bounding box.
    /// Computes the bounding box of all 8 transformed corners. An empty box
    /// stays empty.
    pub fn transform_aabb(&self, aabb: &Aabb) -> Aabb {
        if aabb.is_empty() {
            return Aabb::EMPTY;
        }

        let min_point = aabb.min();
        let max_point = aabb.max();

        let corners = [
            Vec3::new(min_point.x, min_point.y, min_point.z),
            Vec3::new(max_point.x, min_point.y, min_point.z),
            Vec3::new(min_point.x, max_point.y, min_point.z),
            Vec3::new(max_point.x, max_point.y, min_point.z),
            Vec3::new(min_point.x, min_point.y, max_point.z),
            Vec3::new(max_point.x, min_point.y, max_point.z),
            Vec3::new(min_point.x, max_point.y, max_point.z),
            Vec3::new(max_point.x, max_point.y, max_point.z),
        ];

        corners
            .iter()
            .fold(Aabb::EMPTY, |acc, &corner| acc.expand_point(self.transform_point(corner)))
    }
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
