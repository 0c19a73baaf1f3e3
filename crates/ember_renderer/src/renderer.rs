//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive ray tracing with a hard bounce limit
//! - Anti-aliasing via jittered multi-sampling
//! - A reproducible random stream per pixel

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use crate::bucket::{generate_buckets, render_bucket, BucketResult, DEFAULT_BUCKET_SIZE};
use crate::{Color, HitRecord, Hittable, ImageBuffer, Ray, RayGenerator};
use ember_math::Interval;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;

/// Smallest accepted hit distance; keeps bounced rays off their own surface.
pub const T_MIN: f32 = 1e-3;

/// Radiance returned by rays that leave the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Background {
    /// The same color in every direction.
    Solid(Color),
    /// White at the horizon blending to light blue overhead.
    SkyGradient,
}

impl Background {
    pub fn color(&self, ray: &Ray) -> Color {
        match self {
            Background::Solid(color) => *color,
            Background::SkyGradient => {
                let unit_direction = ray.direction().normalize_or_zero();
                let a = 0.5 * (unit_direction.y + 1.0);
                let white = Color::new(1.0, 1.0, 1.0);
                let blue = Color::new(0.5, 0.7, 1.0);
                white * (1.0 - a) + blue * a
            }
        }
    }
}

impl Default for Background {
    fn default() -> Self {
        Background::Solid(Color::ZERO)
    }
}

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Scatter events allowed after the camera ray
    pub max_bounces: u32,
    /// Environment seen by escaping rays
    pub background: Background,
    /// Base seed for the per-pixel random streams
    pub seed: u64,
    /// Edge length of a render bucket in pixels
    pub bucket_size: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples_per_pixel: 100,
            max_bounces: 50,
            background: Background::default(),
            seed: 0,
            bucket_size: DEFAULT_BUCKET_SIZE,
        }
    }
}

/// Destination for rendered pixel colors.
pub trait PixelSink {
    /// Size of the pixel grid as (width, height).
    fn dimensions(&self) -> (u32, u32);

    fn set_pixel(&mut self, x: u32, y: u32, color: Color);
}

impl PixelSink for ImageBuffer {
    fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        self.set(x, y, color);
    }
}

/// Compute the color seen by a ray.
///
/// This is the core path tracing function. Each hit contributes the
/// material's emission plus its attenuation times the color of the
/// scattered ray, traced with `depth - 1`. Below depth zero the path
/// carries no light.
pub fn ray_color(
    ray: &Ray,
    world: &dyn Hittable,
    depth: i32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    if depth < 0 {
        return Color::ZERO;
    }

    let mut rec = HitRecord::default();

    if !world.hit(ray, Interval::new(T_MIN, f32::INFINITY), &mut rec) {
        return config.background.color(ray);
    }

    let emission = rec.material.emitted(rec.u, rec.v, rec.p);

    match rec.material.scatter(ray, &rec, rng) {
        Some(result) => {
            let scattered_color = ray_color(&result.scattered, world, depth - 1, config, rng);
            emission + result.attenuation * scattered_color
        }
        // Absorbed
        None => emission,
    }
}

/// SplitMix64 finalizer.
fn mix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Independent random stream for one pixel.
///
/// Depends only on the seed and the pixel coordinates, so a render is
/// reproducible no matter how work is spread over threads.
pub fn pixel_rng(seed: u64, x: u32, y: u32) -> StdRng {
    let pixel_index = ((y as u64) << 32) | x as u64;
    StdRng::seed_from_u64(mix64(seed ^ mix64(pixel_index)))
}

/// Render a single pixel with multi-sampling.
pub fn render_pixel(
    camera: &dyn RayGenerator,
    world: &dyn Hittable,
    x: u32,
    y: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    if config.samples_per_pixel == 0 {
        return Color::ZERO;
    }

    let depth = i32::try_from(config.max_bounces).unwrap_or(i32::MAX);
    let mut pixel_color = Color::ZERO;

    for _ in 0..config.samples_per_pixel {
        let ray = camera.get_ray(x, y, true, rng);
        pixel_color += ray_color(&ray, world, depth, config, rng);
    }

    pixel_color / config.samples_per_pixel as f32
}

/// Render the scene into `sink`, one bucket per rayon task.
///
/// Pixels outside the sink's dimensions are skipped.
pub fn render(
    camera: &dyn RayGenerator,
    world: &dyn Hittable,
    config: &RenderConfig,
    sink: &mut dyn PixelSink,
) {
    let (width, height) = camera.resolution();
    if sink.dimensions() != (width, height) {
        log::warn!(
            "Camera resolution {}x{} does not match sink {:?}",
            width,
            height,
            sink.dimensions()
        );
    }

    let buckets = generate_buckets(width, height, config.bucket_size);
    log::info!(
        "Rendering {}x{} @ {} spp, {} bounces, {} buckets on {} threads",
        width,
        height,
        config.samples_per_pixel,
        config.max_bounces,
        buckets.len(),
        rayon::current_num_threads()
    );

    let start = Instant::now();
    let remaining = AtomicUsize::new(buckets.len());

    let results: Vec<BucketResult> = buckets
        .par_iter()
        .map(|bucket| {
            let pixels = render_bucket(bucket, camera, world, config);
            let left = remaining.fetch_sub(1, Ordering::Relaxed) - 1;
            log::debug!("Bucket {} done, {} buckets remaining", bucket.index, left);
            BucketResult::new(*bucket, pixels)
        })
        .collect();

    let (sink_width, sink_height) = sink.dimensions();
    for result in &results {
        let bucket = &result.bucket;
        for (i, color) in result.pixels.iter().enumerate() {
            let x = bucket.x + i as u32 % bucket.width;
            let y = bucket.y + i as u32 / bucket.width;
            if x < sink_width && y < sink_height {
                sink.set_pixel(x, y, *color);
            }
        }
    }

    log::info!("Render finished in {:.2?}", start.elapsed());
}

/// Render the scene into a new image sized to the camera.
pub fn render_image(
    camera: &dyn RayGenerator,
    world: &dyn Hittable,
    config: &RenderConfig,
) -> ImageBuffer {
    let (width, height) = camera.resolution();
    let mut image = ImageBuffer::new(width, height);
    render(camera, world, config, &mut image);
    image
}
