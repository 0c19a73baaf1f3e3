//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! Binary tree built by object median split: sort by bounding box minimum on
//! the longest axis, split in half, recurse.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::{HitRecord, Hittable, HittableList, Ray};
use ember_math::{Aabb, Interval};

/// BVH node - a branch with two children, a single-object leaf, or empty.
pub enum BvhNode {
    /// Internal node with two children.
    Branch {
        left: Arc<dyn Hittable>,
        right: Arc<dyn Hittable>,
        bbox: Aabb,
    },
    /// Leaf holding one primitive.
    Leaf {
        object: Arc<dyn Hittable>,
        bbox: Aabb,
    },
    /// Empty node; never hit.
    Empty,
}

impl BvhNode {
    /// Build a BVH, consuming the list of objects.
    pub fn new(objects: Vec<Arc<dyn Hittable>>) -> Self {
        if objects.is_empty() {
            return BvhNode::Empty;
        }

        let count = objects.len();
        let node = Self::build(objects);
        log::debug!(
            "Built BVH over {} primitives, bounds {:?} to {:?}",
            count,
            node.bounding_box().min(),
            node.bounding_box().max()
        );
        node
    }

    /// Build a BVH over the objects of a list. The list itself is not modified.
    pub fn from_list(list: &HittableList) -> Self {
        Self::new(list.objects().to_vec())
    }

    fn build(mut objects: Vec<Arc<dyn Hittable>>) -> Self {
        let bbox = objects
            .iter()
            .fold(Aabb::EMPTY, |acc, o| acc.expand(&o.bounding_box()))
            .pad_to_minimums();

        match objects.len() {
            1 => {
                let object = objects.remove(0);
                BvhNode::Leaf { object, bbox }
            }
            2 => {
                let right = objects.remove(1);
                let left = objects.remove(0);
                BvhNode::Branch { left, right, bbox }
            }
            n => {
                let axis = bbox.longest_axis();

                // Stable, so equal keys keep their input order
                objects.sort_by(|a, b| {
                    let a_min = a.bounding_box().axis_interval(axis).min;
                    let b_min = b.bounding_box().axis_interval(axis).min;
                    a_min.partial_cmp(&b_min).unwrap_or(Ordering::Equal)
                });

                let right_objects = objects.split_off(n / 2);
                let left = Arc::new(Self::build(objects));
                let right = Arc::new(Self::build(right_objects));

                BvhNode::Branch { left, right, bbox }
            }
        }
    }
}

impl Hittable for BvhNode {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        match self {
            BvhNode::Empty => false,

            BvhNode::Leaf { object, bbox } => bbox.hit(ray, ray_t) && object.hit(ray, ray_t, rec),

            BvhNode::Branch { left, right, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return false;
                }

                let hit_left = left.hit(ray, ray_t, rec);

                // Only check right up to closest hit
                let right_max = if hit_left { rec.t } else { ray_t.max };
                let hit_right = right.hit(ray, Interval::new(ray_t.min, right_max), rec);

                hit_left || hit_right
            }
        }
    }

    fn bounding_box(&self) -> Aabb {
        match self {
            BvhNode::Empty => Aabb::EMPTY,
            BvhNode::Leaf { bbox, .. } => *bbox,
            BvhNode::Branch { bbox, .. } => *bbox,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::gen_range_f32;
    use crate::test_util::{assert_hit_eq, assert_miss, POSITIVE};
    use crate::{Lambertian, Material, Quad, Sphere, Transform};
    use ember_math::{AffineTransform, Vec3};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    type Color = Vec3;

    fn sphere(center: Vec3, radius: f32, material: Arc<dyn Material>) -> Arc<dyn Hittable> {
        Arc::new(Sphere::new(center, radius, material))
    }

    fn random_vec(rng: &mut StdRng, min: f32, max: f32) -> Vec3 {
        Vec3::new(
            gen_range_f32(rng, min, max),
            gen_range_f32(rng, min, max),
            gen_range_f32(rng, min, max),
        )
    }

    /// Spheres, quads, and a transformed quad, each with its own material.
    fn random_scene(rng: &mut StdRng, count: usize) -> Vec<Arc<dyn Hittable>> {
        (0..count)
            .map(|i| {
                let material: Arc<dyn Material> =
                    Arc::new(Lambertian::new(Color::new(i as f32, 0.5, 0.5)));
                let center = random_vec(rng, -10.0, 10.0);
                match i % 3 {
                    0 => sphere(center, gen_range_f32(rng, 0.1, 1.5), material),
                    1 => Arc::new(Quad::new(
                        center,
                        random_vec(rng, -2.0, 2.0),
                        random_vec(rng, -2.0, 2.0),
                        material,
                    )),
                    _ => Arc::new(Transform::new(
                        Arc::new(Quad::new(
                            Vec3::ZERO,
                            Vec3::new(2.0, 0.0, 0.0),
                            Vec3::new(0.0, 0.0, 2.0),
                            material,
                        )),
                        AffineTransform::from_rotation_y_degrees(gen_range_f32(rng, 0.0, 360.0))
                            .with_translation(center),
                    )),
                }
            })
            .collect()
    }

    #[test]
    fn test_bvh_empty() {
        let bvh = BvhNode::new(vec![]);
        assert!(matches!(bvh, BvhNode::Empty));
        assert!(bvh.bounding_box().is_empty());
        assert_miss(&bvh, &Ray::new(Vec3::ZERO, Vec3::X), Interval::UNIVERSE);
    }

    #[test]
    fn test_bvh_single_sphere() {
        let material: Arc<dyn Material> = Arc::new(Lambertian::new(Color::splat(0.5)));
        let bvh = BvhNode::new(vec![sphere(Vec3::new(0.0, 0.0, -1.0), 0.5, material)]);

        // Should create a leaf
        assert!(matches!(bvh, BvhNode::Leaf { .. }));

        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let mut rec = HitRecord::default();
        assert!(bvh.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec));
        assert!((rec.t - 0.5).abs() < 1e-6);

        assert_miss(&bvh, &Ray::new(Vec3::ZERO, Vec3::X), POSITIVE);
    }

    #[test]
    fn test_bvh_two_objects_branch_directly() {
        let material: Arc<dyn Material> = Arc::new(Lambertian::new(Color::splat(0.5)));
        let bvh = BvhNode::new(vec![
            sphere(Vec3::new(-2.0, 0.0, 0.0), 0.5, material.clone()),
            sphere(Vec3::new(2.0, 0.0, 0.0), 0.5, material),
        ]);

        match &bvh {
            BvhNode::Branch { left, right, .. } => {
                assert_eq!(left.bounding_box().centroid(), Vec3::new(-2.0, 0.0, 0.0));
                assert_eq!(right.bounding_box().centroid(), Vec3::new(2.0, 0.0, 0.0));
            }
            _ => panic!("expected branch"),
        }
    }

    #[test]
    fn test_bvh_multiple_spheres() {
        let material: Arc<dyn Material> = Arc::new(Lambertian::new(Color::splat(0.5)));
        let spheres = (0..10)
            .map(|i| sphere(Vec3::new(i as f32, 0.0, -5.0), 0.5, material.clone()))
            .collect();

        let bvh = BvhNode::new(spheres);

        // Test ray that hits sphere at x=5
        let ray = Ray::new(Vec3::new(5.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0));
        let mut rec = HitRecord::default();
        assert!(bvh.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec));

        // Hit point should be near z = -4.5 (sphere at z=-5, radius 0.5)
        assert!((rec.p.z - (-4.5)).abs() < 0.01);

        let bbox = bvh.bounding_box();
        assert_eq!(bbox.min(), Vec3::new(-0.5, -0.5, -5.5));
        assert_eq!(bbox.max(), Vec3::new(9.5, 0.5, -4.5));
    }

    #[test]
    fn test_split_sorts_by_longest_axis() {
        let material: Arc<dyn Material> = Arc::new(Lambertian::new(Color::splat(0.5)));
        // Inserted out of order along Y, which is the longest axis
        let objects = [3.0, -6.0, 9.0, 0.0]
            .into_iter()
            .map(|y| sphere(Vec3::new(0.0, y, 0.0), 0.5, material.clone()))
            .collect();

        let bvh = BvhNode::new(objects);
        let BvhNode::Branch { left, right, .. } = &bvh else {
            panic!("expected branch");
        };
        assert_eq!(left.bounding_box().min().y, -6.5);
        assert_eq!(left.bounding_box().max().y, 0.5);
        assert_eq!(right.bounding_box().min().y, 2.5);
        assert_eq!(right.bounding_box().max().y, 9.5);
    }

    #[test]
    fn test_bvh_grazing_hit_on_box_face() {
        let material: Arc<dyn Material> = Arc::new(Lambertian::new(Color::splat(0.5)));
        let mut list = HittableList::new();
        list.add(sphere(Vec3::ZERO, 1.0, material.clone()));
        list.add(sphere(Vec3::new(0.0, 0.0, -6.0), 1.0, material));
        let bvh = BvhNode::from_list(&list);
        assert!(matches!(bvh, BvhNode::Branch { .. }));

        // Touches the first sphere at (1, 0, 0), on the x = 1 face of its box
        let ray = Ray::new(Vec3::ONE, Vec3::new(0.0, -1.0, -1.0));
        assert!(bvh.bounding_box().hit(&ray, POSITIVE));

        let mut list_rec = HitRecord::default();
        let mut bvh_rec = HitRecord::default();
        assert!(list.hit(&ray, POSITIVE, &mut list_rec));
        assert!(bvh.hit(&ray, POSITIVE, &mut bvh_rec));
        assert_eq!(bvh_rec.t, 1.0);
        assert_eq!(bvh_rec.p, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(bvh_rec.normal, Vec3::X);
        assert!(bvh_rec.front_face);
        assert_hit_eq(&list_rec, &bvh_rec, 0.0);
    }

    #[test]
    fn test_bvh_matches_list() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut objects = random_scene(&mut rng, 60);

        // Unit spheres above the random objects, for rays tangent to them
        let material: Arc<dyn Material> = Arc::new(Lambertian::new(Color::splat(0.5)));
        let centers: Vec<Vec3> = (0..4)
            .map(|i| Vec3::new(-6.0 + 4.0 * i as f32, 20.0, (i % 2) as f32 * 3.0))
            .collect();
        objects.extend(centers.iter().map(|&c| sphere(c, 1.0, material.clone())));

        let mut list = HittableList::new();
        for object in &objects {
            list.add(object.clone());
        }
        let bvh = BvhNode::from_list(&list);
        assert_eq!(list.len(), 64);

        // Each ray lies in a face plane of its sphere's box
        for &c in &centers {
            let grazing = [
                Ray::new(c + Vec3::new(1.0, 0.0, -30.0), Vec3::Z),
                Ray::new(c + Vec3::new(-1.0, 0.0, 30.0), -Vec3::Z),
                Ray::new(c + Vec3::new(0.0, 20.0, 1.0), -Vec3::Y),
                Ray::new(c + Vec3::new(30.0, 1.0, 0.0), -Vec3::X),
            ];
            for ray in grazing {
                let mut list_rec = HitRecord::default();
                let mut bvh_rec = HitRecord::default();
                assert!(list.hit(&ray, POSITIVE, &mut list_rec), "list missed {ray:?}");
                assert!(bvh.hit(&ray, POSITIVE, &mut bvh_rec), "bvh missed {ray:?}");
                assert_hit_eq(&list_rec, &bvh_rec, 0.0);
            }
        }

        let mut hits = 0;
        for _ in 0..2000 {
            let origin = random_vec(&mut rng, -15.0, 15.0);
            let target = random_vec(&mut rng, -10.0, 10.0);
            let ray = Ray::new(origin, target - origin);

            let mut list_rec = HitRecord::default();
            let mut bvh_rec = HitRecord::default();
            let list_hit = list.hit(&ray, POSITIVE, &mut list_rec);
            let bvh_hit = bvh.hit(&ray, POSITIVE, &mut bvh_rec);

            assert_eq!(list_hit, bvh_hit, "disagreement for {ray:?}");
            if list_hit {
                hits += 1;
                assert_hit_eq(&list_rec, &bvh_rec, 0.0);
            }
        }
        // Make sure the comparison is not vacuous
        assert!(hits > 100);
    }
}
