//! Ember renderer - CPU path tracing
//!
//! A Monte Carlo path tracer for physically-based rendering. Scenes are
//! built once from shared, immutable hittables, materials and textures and
//! then rendered bucket by bucket in parallel.

mod bucket;
mod bvh;
mod camera;
mod hittable;
mod material;
mod quad;
mod renderer;
pub mod sampling;
mod sphere;
mod texture;
mod transform;

#[cfg(test)]
mod test_util;

pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use bvh::BvhNode;
pub use camera::{Camera, RayGenerator};
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{
    reflect, refract, Dielectric, DiffuseLight, Lambertian, Material, Metal, ScatterResult,
};
pub use quad::Quad;
pub use renderer::{
    pixel_rng, ray_color, render, render_image, render_pixel, Background, PixelSink,
    RenderConfig, T_MIN,
};
pub use sphere::Sphere;
pub use texture::{CheckerTexture, ImageTexture, SolidColor, Texture, MISSING_TEXTURE_COLOR};
pub use transform::Transform;

/// Re-export the pixel buffer and common math types
pub use ember_core::{Color, ImageBuffer};
pub use ember_math::{Aabb, AffineTransform, Interval, Ray, Vec3};
