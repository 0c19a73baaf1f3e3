//! Material trait for surface scattering.

use std::sync::Arc;

use crate::sampling::{gen_f32, random_unit_vector};
use crate::texture::{SolidColor, Texture};
use crate::{hittable::HitRecord, Color, Ray, Vec3};
use rand::RngCore;

/// Result of a successful scatter: the surviving ray and its color filter.
#[derive(Debug, Clone, Copy)]
pub struct ScatterResult {
    pub attenuation: Color,
    pub scattered: Ray,
}

/// Trait for materials that describe how light interacts with surfaces.
pub trait Material: Send + Sync {
    /// Scatter an incoming ray.
    ///
    /// Returns None if the path ends here (absorbed, or an emitter).
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore)
        -> Option<ScatterResult>;

    /// Get emitted light from this material.
    ///
    /// Most materials return black (no emission).
    fn emitted(&self, _u: f32, _v: f32, _p: Vec3) -> Color {
        Color::ZERO
    }
}

/// Lambertian (diffuse) material.
#[derive(Clone)]
pub struct Lambertian {
    texture: Arc<dyn Texture>,
}

impl Lambertian {
    /// Create a new Lambertian material with the given albedo color.
    pub fn new(albedo: Color) -> Self {
        Self::from_texture(Arc::new(SolidColor::new(albedo)))
    }

    pub fn from_texture(texture: Arc<dyn Texture>) -> Self {
        Self { texture }
    }
}

impl Material for Lambertian {
    fn scatter(
        &self,
        _ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        // Normal plus a point on the unit sphere gives a cosine-weighted direction
        let mut scatter_direction = rec.normal + random_unit_vector(rng);

        // Catch degenerate scatter direction
        if scatter_direction.length_squared() < 1e-8 {
            scatter_direction = rec.normal;
        }

        Some(ScatterResult {
            attenuation: self.texture.value(rec.u, rec.v, rec.p),
            scattered: Ray::new(rec.p, scatter_direction),
        })
    }
}

/// Metal (specular) material.
#[derive(Clone)]
pub struct Metal {
    texture: Arc<dyn Texture>,
    fuzz: f32,
}

impl Metal {
    /// Create a new Metal material.
    ///
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, 1.0 = very rough
    pub fn new(albedo: Color, fuzz: f32) -> Self {
        Self::from_texture(Arc::new(SolidColor::new(albedo)), fuzz)
    }

    pub fn from_texture(texture: Arc<dyn Texture>, fuzz: f32) -> Self {
        Self {
            texture,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }

    pub fn fuzz(&self) -> f32 {
        self.fuzz
    }
}

impl Material for Metal {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let reflected = reflect(ray_in.direction().normalize(), rec.normal);
        let scattered_dir = reflected + self.fuzz * random_unit_vector(rng);

        // Fuzz can push the ray below the surface; absorb it
        if scattered_dir.dot(rec.normal) > 0.0 {
            Some(ScatterResult {
                attenuation: self.texture.value(rec.u, rec.v, rec.p),
                scattered: Ray::new(rec.p, scattered_dir),
            })
        } else {
            None
        }
    }
}

/// Dielectric (glass) material.
#[derive(Debug, Clone, Copy)]
pub struct Dielectric {
    /// Index of refraction relative to the enclosing medium
    ior: f32,
}

impl Dielectric {
    /// Create a new Dielectric material.
    ///
    /// - `ior`: Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    pub fn new(ior: f32) -> Self {
        Self { ior }
    }

    pub fn ior(&self) -> f32 {
        self.ior
    }

    /// Schlick's approximation for reflectance
    fn reflectance(cosine: f32, ior_ratio: f32) -> f32 {
        let r0 = ((1.0 - ior_ratio) / (1.0 + ior_ratio)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
    }
}

impl Material for Dielectric {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let refraction_ratio = if rec.front_face {
            1.0 / self.ior
        } else {
            self.ior
        };

        let unit_direction = ray_in.direction().normalize();
        let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();

        // One draw per event, even under total internal reflection
        let sample = gen_f32(rng);
        let cannot_refract = refraction_ratio * sin_theta > 1.0;

        let direction =
            if cannot_refract || sample < Self::reflectance(cos_theta, refraction_ratio) {
                reflect(unit_direction, rec.normal)
            } else {
                refract(unit_direction, rec.normal, refraction_ratio)
            };

        Some(ScatterResult {
            attenuation: Color::ONE,
            scattered: Ray::new(rec.p, direction),
        })
    }
}

/// Diffuse light emitter. Emits its texture and never scatters.
#[derive(Clone)]
pub struct DiffuseLight {
    texture: Arc<dyn Texture>,
}

impl DiffuseLight {
    /// Create a new diffuse light with the given emission color.
    pub fn new(emit: Color) -> Self {
        Self::from_texture(Arc::new(SolidColor::new(emit)))
    }

    pub fn from_texture(texture: Arc<dyn Texture>) -> Self {
        Self { texture }
    }
}

impl Material for DiffuseLight {
    fn scatter(
        &self,
        _ray_in: &Ray,
        _rec: &HitRecord,
        _rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        None
    }

    fn emitted(&self, u: f32, v: f32, p: Vec3) -> Color {
        self.texture.value(u, v, p)
    }
}

// =============================================================================
// Helper functions
// =============================================================================

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a unit vector through a surface with unit normal `n`.
#[inline]
pub fn refract(uv: Vec3, n: Vec3, etai_over_etat: f32) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).max(0.0).sqrt() * n;
    r_out_perp + r_out_parallel
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::CheckerTexture;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn record<'a>(material: &'a dyn Material, normal: Vec3, front_face: bool) -> HitRecord<'a> {
        HitRecord {
            p: Vec3::new(1.0, 2.0, 3.0),
            normal,
            material,
            u: 0.25,
            v: 0.75,
            t: 1.0,
            front_face,
        }
    }

    #[test]
    fn test_lambertian_scatters_into_hemisphere() {
        let material = Lambertian::new(Color::new(0.8, 0.3, 0.3));
        let rec = record(&material, Vec3::Y, true);
        let ray = Ray::new(Vec3::new(1.0, 5.0, 3.0), -Vec3::Y);
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..500 {
            let result = material.scatter(&ray, &rec, &mut rng).unwrap();
            assert_eq!(result.attenuation, Color::new(0.8, 0.3, 0.3));
            assert_eq!(result.scattered.origin(), rec.p);
            assert!(result.scattered.direction().dot(Vec3::Y) >= 0.0);
            assert!(result.scattered.direction().length_squared() > 0.0);
        }
        assert_eq!(material.emitted(0.0, 0.0, Vec3::ZERO), Color::ZERO);
    }

    #[test]
    fn test_lambertian_samples_texture_at_hit() {
        let checker = CheckerTexture::from_colors(1.0, Color::X, Color::Y);
        let material = Lambertian::from_texture(Arc::new(checker));
        let mut rng = StdRng::seed_from_u64(1);

        // p = (1, 2, 3) sums to an even cell
        let rec = record(&material, Vec3::Y, true);
        let result = material.scatter(&Ray::new(Vec3::ZERO, Vec3::ONE), &rec, &mut rng);
        assert_eq!(result.unwrap().attenuation, Color::X);
    }

    #[test]
    fn test_metal_mirror() {
        let material = Metal::new(Color::new(0.8, 0.8, 0.8), 0.0);
        let rec = record(&material, Vec3::Y, true);
        let ray = Ray::new(Vec3::new(0.0, 3.0, 3.0), Vec3::new(1.0, -1.0, 0.0));
        let mut rng = StdRng::seed_from_u64(42);

        let result = material.scatter(&ray, &rec, &mut rng).unwrap();
        let expected = Vec3::new(1.0, 1.0, 0.0).normalize();
        assert!((result.scattered.direction() - expected).length() < 1e-6);
        assert_eq!(result.attenuation, Color::splat(0.8));
    }

    #[test]
    fn test_metal_fuzz_clamped() {
        assert_eq!(Metal::new(Color::ONE, 5.0).fuzz(), 1.0);
        assert_eq!(Metal::new(Color::ONE, -1.0).fuzz(), 0.0);
    }

    #[test]
    fn test_metal_absorbs_below_surface() {
        let material = Metal::new(Color::ONE, 1.0);
        let rec = record(&material, Vec3::Y, true);
        // Grazing incidence: fuzz sends many reflections under the surface
        let ray = Ray::new(Vec3::ZERO, Vec3::new(1.0, -0.01, 0.0));
        let mut rng = StdRng::seed_from_u64(42);

        let mut absorbed = 0;
        for _ in 0..1000 {
            match material.scatter(&ray, &rec, &mut rng) {
                Some(result) => assert!(result.scattered.direction().dot(Vec3::Y) > 0.0),
                None => absorbed += 1,
            }
        }
        assert!(absorbed > 100 && absorbed < 900, "absorbed {absorbed}");
    }

    #[test]
    fn test_dielectric_ior_one_passes_straight_through() {
        let material = Dielectric::new(1.0);
        let mut rng = StdRng::seed_from_u64(42);

        // Head-on: Schlick reflectance is exactly zero
        let rec = record(&material, Vec3::Z, true);
        let ray = Ray::new(Vec3::new(1.0, 2.0, 5.0), -Vec3::Z);
        for _ in 0..100 {
            let result = material.scatter(&ray, &rec, &mut rng).unwrap();
            assert_eq!(result.attenuation, Color::ONE);
            assert!((result.scattered.direction() + Vec3::Z).length() < 1e-6);
        }

        // Oblique: anything not reflected continues undeviated
        let direction = Vec3::new(1.0, 0.0, -1.0).normalize();
        let ray = Ray::new(Vec3::ZERO, direction);
        let reflected = reflect(direction, Vec3::Z);
        for _ in 0..100 {
            let out = material.scatter(&ray, &rec, &mut rng).unwrap().scattered.direction();
            assert!(
                (out - direction).length() < 1e-5 || (out - reflected).length() < 1e-5,
                "unexpected direction {out:?}"
            );
        }
    }

    #[test]
    fn test_dielectric_total_internal_reflection() {
        let material = Dielectric::new(1.5);
        // Inside the glass, so the stored normal faces back into it
        let rec = record(&material, Vec3::Y, false);
        let direction = Vec3::new(1.0, -0.2, 0.0).normalize();
        let ray = Ray::new(Vec3::ZERO, direction);
        let mut rng = StdRng::seed_from_u64(42);

        let expected = Vec3::new(1.0, 0.2, 0.0).normalize();
        for _ in 0..100 {
            let result = material.scatter(&ray, &rec, &mut rng).unwrap();
            assert!((result.scattered.direction() - expected).length() < 1e-5);
        }
    }

    #[test]
    fn test_dielectric_fresnel_fraction() {
        let material = Dielectric::new(1.5);
        let rec = record(&material, Vec3::Z, true);
        let ray = Ray::new(Vec3::ZERO, -Vec3::Z);
        let mut rng = StdRng::seed_from_u64(42);

        let trials = 20_000;
        let reflected = (0..trials)
            .filter(|_| {
                let result = material.scatter(&ray, &rec, &mut rng).unwrap();
                result.scattered.direction().z > 0.0
            })
            .count();

        // r0 = (0.5 / 2.5)^2 = 0.04 at normal incidence
        let fraction = reflected as f32 / trials as f32;
        assert!((fraction - 0.04).abs() < 0.01, "reflected fraction {fraction}");
    }

    #[test]
    fn test_dielectric_draws_one_sample_per_event() {
        let material = Dielectric::new(1.5);
        let mut rng = StdRng::seed_from_u64(9);
        let mut reference = StdRng::seed_from_u64(9);

        // Total internal reflection still consumes a draw
        let rec = record(&material, Vec3::Y, false);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(1.0, -0.2, 0.0));
        let _ = material.scatter(&ray, &rec, &mut rng);
        let _ = gen_f32(&mut reference);

        assert_eq!(gen_f32(&mut rng), gen_f32(&mut reference));
    }

    #[test]
    fn test_refract_snell() {
        // 45 degrees in, ratio 1 / 1.5
        let incident = Vec3::new(1.0, -1.0, 0.0).normalize();
        let out = refract(incident, Vec3::Y, 1.0 / 1.5);
        let sin_out = out.x / out.length();
        assert!((sin_out - (45.0_f32.to_radians().sin() / 1.5)).abs() < 1e-5);
        assert!((out.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_diffuse_light() {
        let light = DiffuseLight::new(Color::new(4.0, 4.0, 4.0));
        let rec = record(&light, Vec3::Y, true);
        let mut rng = StdRng::seed_from_u64(42);

        assert!(light
            .scatter(&Ray::new(Vec3::ZERO, Vec3::ONE), &rec, &mut rng)
            .is_none());
        assert_eq!(light.emitted(0.5, 0.5, Vec3::ZERO), Color::splat(4.0));

        let textured = DiffuseLight::from_texture(Arc::new(CheckerTexture::from_colors(
            1.0,
            Color::ONE,
            Color::ZERO,
        )));
        assert_eq!(textured.emitted(0.0, 0.0, Vec3::new(0.5, 0.5, 0.5)), Color::ONE);
        assert_eq!(textured.emitted(0.0, 0.0, Vec3::new(1.5, 0.5, 0.5)), Color::ZERO);
    }
}
