//! Affine instancing wrapper around another hittable.

use std::sync::Arc;

use crate::{HitRecord, Hittable, Ray};
use ember_math::{Aabb, AffineTransform, Interval};

/// Places a child hittable in the world through an [`AffineTransform`].
///
/// Rays are pulled back into the child's space, so `t` is shared between the
/// two spaces. Hit normals are pushed forward by the linear map itself (not its
/// inverse transpose) and renormalized, which is exact for rotations and
/// uniform scale only.
pub struct Transform {
    object: Arc<dyn Hittable>,
    transform: AffineTransform,
    bbox: Aabb,
}

impl Transform {
    pub fn new(object: Arc<dyn Hittable>, transform: AffineTransform) -> Self {
        let bbox = transform.transform_aabb(&object.bounding_box());
        Self {
            object,
            transform,
            bbox,
        }
    }

    pub fn object(&self) -> &Arc<dyn Hittable> {
        &self.object
    }

    pub fn transform(&self) -> &AffineTransform {
        &self.transform
    }
}

impl Hittable for Transform {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        let local_ray = Ray::new(
            self.transform.inverse_transform_point(ray.origin()),
            self.transform.inverse_transform_vector(ray.direction()),
        );

        if !self.object.hit(&local_ray, ray_t, rec) {
            return false;
        }

        rec.p = self.transform.transform_point(rec.p);
        rec.normal = self.transform.transform_vector(rec.normal).normalize_or_zero();

        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
