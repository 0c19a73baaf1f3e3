//! Planar parallelogram primitive.

use std::sync::Arc;

use crate::{
    hittable::{HitRecord, Hittable},
    Material, Ray,
};
use ember_math::{Aabb, Interval, Vec3};

/// Rays with |dot(normal, direction)| below this are treated as parallel.
const PARALLEL_EPSILON: f32 = 1e-8;

const UNIT_INTERVAL: Interval = Interval::new(0.0, 1.0);

/// A parallelogram spanned by `side1` and `side2` from `corner`.
///
/// The sides need not be orthogonal or unit length. Hits report (u, v) as the
/// coefficients of `side1` and `side2` at the hit point.
pub struct Quad {
    corner: Vec3,
    side1: Vec3,
    side2: Vec3,
    material: Arc<dyn Material>,

    // Cached plane: normal . p = d, with w for recovering (u, v)
    normal: Vec3,
    d: f32,
    w: Vec3,

    bbox: Aabb,
}

impl Quad {
    pub fn new(corner: Vec3, side1: Vec3, side2: Vec3, material: Arc<dyn Material>) -> Self {
        let n = side1.cross(side2);
        // Collinear sides leave a zero normal, which then misses every ray
        let normal = n.normalize_or_zero();
        let d = normal.dot(corner);
        let w = if n == Vec3::ZERO { Vec3::ZERO } else { n / n.dot(n) };

        let bbox = Aabb::EMPTY
            .expand_point(corner)
            .expand_point(corner + side1)
            .expand_point(corner + side2)
            .expand_point(corner + side1 + side2)
            .pad_to_minimums();

        Self {
            corner,
            side1,
            side2,
            material,
            normal,
            d,
            w,
            bbox,
        }
    }

    pub fn corner(&self) -> Vec3 {
        self.corner
    }

    pub fn side1(&self) -> Vec3 {
        self.side1
    }

    pub fn side2(&self) -> Vec3 {
        self.side2
    }

    pub fn material(&self) -> &Arc<dyn Material> {
        &self.material
    }

    /// Unit normal of the supporting plane, `side1 x side2` normalized.
    pub fn plane_normal(&self) -> Vec3 {
        self.normal
    }

    /// D in the plane equation `normal . p = D`.
    pub fn plane_d(&self) -> f32 {
        self.d
    }
}

impl Hittable for Quad {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        let denom = self.normal.dot(ray.direction());
        if denom.abs() < PARALLEL_EPSILON {
            return false;
        }

        let t = (self.d - self.normal.dot(ray.origin())) / denom;
        if !ray_t.surrounds(t) {
            return false;
        }

        let p = ray.at(t);
        let planar = p - self.corner;
        let u = self.w.dot(planar.cross(self.side2));
        let v = self.w.dot(self.side1.cross(planar));
        if !UNIT_INTERVAL.contains(u) || !UNIT_INTERVAL.contains(v) {
            return false;
        }

        rec.t = t;
        rec.p = p;
        rec.set_face_normal(ray, self.normal);
        rec.u = u;
        rec.v = v;
        rec.material = self.material.as_ref();

        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
