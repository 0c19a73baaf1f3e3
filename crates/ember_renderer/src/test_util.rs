//! Shared assertions for hittable tests.

use crate::{HitRecord, Hittable, Lambertian, Material, Ray};
use ember_math::{Interval, Vec3};

/// The closed-open positive half line, for "anything in front of the origin".
pub(crate) const POSITIVE: Interval = Interval::new(0.0, f32::INFINITY);

/// True if both references point at the same material instance.
pub(crate) fn material_eq(a: &dyn Material, b: &dyn Material) -> bool {
    std::ptr::eq(a as *const _ as *const (), b as *const _ as *const ())
}

fn assert_vec_near(expected: Vec3, actual: Vec3, tolerance: f32, what: &str) {
    assert!(
        (expected - actual).abs().max_element() <= tolerance,
        "{what}: expected {expected:?}, got {actual:?}"
    );
}

/// Assert two hit records match within `tolerance`, and share a material.
pub(crate) fn assert_hit_eq(expected: &HitRecord, actual: &HitRecord, tolerance: f32) {
    assert!(
        (expected.t - actual.t).abs() <= tolerance,
        "t: expected {}, got {}",
        expected.t,
        actual.t
    );
    assert_vec_near(expected.p, actual.p, tolerance, "point");
    assert_vec_near(expected.normal, actual.normal, tolerance, "normal");
    assert_eq!(expected.front_face, actual.front_face, "front_face");
    assert!(
        (expected.u - actual.u).abs() <= tolerance && (expected.v - actual.v).abs() <= tolerance,
        "uv: expected ({}, {}), got ({}, {})",
        expected.u,
        expected.v,
        actual.u,
        actual.v
    );
    assert!(material_eq(expected.material, actual.material), "material");
}

/// Assert the ray misses and the record passed in comes back untouched.
pub(crate) fn assert_miss(hittable: &dyn Hittable, ray: &Ray, ray_t: Interval) {
    let nonsense = Lambertian::new(Vec3::splat(-100.0));
    let mut rec = HitRecord {
        p: Vec3::splat(100.0),
        normal: Vec3::splat(-100.0),
        material: &nonsense,
        u: 100.0,
        v: 100.0,
        t: 100.0,
        front_face: true,
    };
    let before = rec.clone();

    assert!(
        !hittable.hit(ray, ray_t, &mut rec),
        "expected miss for {ray:?} in {ray_t:?}, got hit at t={}",
        rec.t
    );
    assert_hit_eq(&before, &rec, 0.0);
}

/// Assert the ray hits and the record matches `expected`.
pub(crate) fn assert_hit(
    hittable: &dyn Hittable,
    ray: &Ray,
    ray_t: Interval,
    expected: &HitRecord,
    tolerance: f32,
) {
    let mut rec = HitRecord::default();
    assert!(
        hittable.hit(ray, ray_t, &mut rec),
        "expected hit for {ray:?} in {ray_t:?}"
    );
    assert_hit_eq(expected, &rec, tolerance);
}

/// Sweep the t range around a known hit at `expect_t`, forwards and reversed.
///
/// Requires `expect_t > safe_dist > 0` and no other intersection within
/// `safe_dist` of the expected one.
pub(crate) fn check_t_range(
    hittable: &dyn Hittable,
    ray: &Ray,
    expected: &HitRecord,
    expect_t: f32,
    safe_dist: f32,
    tolerance: f32,
) {
    // Positive t
    {
        let mut expected = expected.clone();
        expected.t = expect_t;

        assert_hit(hittable, ray, POSITIVE, &expected, tolerance);
        assert_hit(
            hittable,
            ray,
            Interval::new(expect_t - safe_dist, expect_t + safe_dist),
            &expected,
            tolerance,
        );
        assert_miss(hittable, ray, Interval::new(0.0, expect_t - safe_dist));
        assert_miss(
            hittable,
            ray,
            Interval::new(expect_t + 0.5 * safe_dist, expect_t + safe_dist),
        );
    }

    // Reversed ray, negative t. Only a window around the hit is checked since a
    // more negative second intersection could legitimately win over (-inf, 0).
    {
        let reversed = Ray::new(ray.origin(), -ray.direction());
        let mut expected = expected.clone();
        expected.normal = -expected.normal;
        expected.front_face = !expected.front_face;
        expected.t = -expect_t;

        assert_hit(
            hittable,
            &reversed,
            Interval::new(-expect_t - safe_dist, -expect_t + safe_dist),
            &expected,
            tolerance,
        );
        assert_miss(hittable, &reversed, Interval::new(-expect_t + safe_dist, 0.0));
        assert_miss(
            hittable,
            &reversed,
            Interval::new(-expect_t - safe_dist, -expect_t - 0.5 * safe_dist),
        );
    }

    // Degenerate and inverted ranges
    assert_miss(hittable, ray, Interval::new(expect_t, expect_t));
    assert_miss(
        hittable,
        ray,
        Interval::new(expect_t + safe_dist, expect_t + safe_dist),
    );
    assert_miss(
        hittable,
        ray,
        Interval::new(expect_t + safe_dist, expect_t - safe_dist),
    );
}

/// [`check_t_range`] repeated with the ray direction scaled up and down.
pub(crate) fn check_t_scales_and_range(
    hittable: &dyn Hittable,
    ray: &Ray,
    expected: &HitRecord,
    expect_t: f32,
    safe_dist: f32,
    tolerance: f32,
) {
    check_t_range(hittable, ray, expected, expect_t, safe_dist, tolerance);
    for scale in [0.1, 0.5, 3.0, 10.0] {
        let scaled = Ray::new(ray.origin(), ray.direction() * scale);
        check_t_range(
            hittable,
            &scaled,
            expected,
            expect_t / scale,
            safe_dist / scale,
            tolerance,
        );
    }
}
