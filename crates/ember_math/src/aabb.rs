use crate::{Interval, Ray, Vec3};

/// Axis-Aligned Bounding Box for spatial acceleration structures (BVH).
///
/// An AABB is defined by three intervals (one per axis) that bound a 3D volume.
/// The default box is empty and is the identity for [`Aabb::expand`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    /// Minimum extent along any axis after [`Aabb::pad_to_minimums`].
    pub const MIN_THICKNESS: f32 = 0.0001;

    /// Create a new AABB from three intervals.
    pub const fn new(x: Interval, y: Interval, z: Interval) -> Self {
        Self { x, y, z }
    }

    /// Create an AABB from two corner points, in any order.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        let x = Interval::new(a.x.min(b.x), a.x.max(b.x));
        let y = Interval::new(a.y.min(b.y), a.y.max(b.y));
        let z = Interval::new(a.z.min(b.z), a.z.max(b.z));
        Self { x, y, z }
    }

    /// Create an AABB that surrounds two other AABBs.
    pub fn surrounding(box0: &Aabb, box1: &Aabb) -> Self {
        box0.expand(box1)
    }

    /// True if any axis is empty.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty() || self.y.is_empty() || self.z.is_empty()
    }

    /// Smallest box containing both boxes. Empty operands are absorbed.
    pub fn expand(&self, other: &Aabb) -> Aabb {
        Self {
            x: self.x.expand(&other.x),
            y: self.y.expand(&other.y),
            z: self.z.expand(&other.z),
        }
    }

    /// Smallest box containing this box and the point `p`.
    pub fn expand_point(&self, p: Vec3) -> Aabb {
        Self {
            x: self.x.expand_point(p.x),
            y: self.y.expand_point(p.y),
            z: self.z.expand_point(p.z),
        }
    }

    /// Get the interval for a specific axis (0=X, 1=Y, 2=Z).
    pub fn axis_interval(&self, n: usize) -> Interval {
        match n {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Test if a ray intersects this AABB within the given interval.
    ///
    /// Slab method. A zero direction component divides to +-infinity, or to
    /// NaN when the origin lies on a slab plane. A NaN bound leaves that side
    /// of the range unconstrained, since such an origin is inside the closed
    /// slab.
    pub fn hit(&self, r: &Ray, mut ray_t: Interval) -> bool {
        if self.is_empty() || r.direction() == Vec3::ZERO {
            return false;
        }

        let origin = r.origin();
        let direction = r.direction();

        for axis in 0..3 {
            let slab = self.axis_interval(axis);
            let t0 = (slab.min - origin[axis]) / direction[axis];
            let t1 = (slab.max - origin[axis]) / direction[axis];

            let (entry, exit) = if t0.is_nan() || t1.is_nan() {
                (f32::NEG_INFINITY, f32::INFINITY)
            } else {
                (t0.min(t1), t0.max(t1))
            };
            if entry > ray_t.min {
                ray_t.min = entry;
            }
            if exit < ray_t.max {
                ray_t.max = exit;
            }

            if ray_t.min >= ray_t.max {
                return false;
            }
        }

        true
    }

    /// Pad intervals thinner than [`Aabb::MIN_THICKNESS`] to avoid zero-width AABBs.
    pub fn pad_to_minimums(&self) -> Aabb {
        let pad = |interval: Interval| {
            if interval.size() < Self::MIN_THICKNESS {
                interval.pad(Self::MIN_THICKNESS)
            } else {
                interval
            }
        };
        Self {
            x: pad(self.x),
            y: pad(self.y),
            z: pad(self.z),
        }
    }

    /// Translate (move) the AABB by an offset vector.
    pub fn translate(&self, offset: Vec3) -> Aabb {
        Aabb::new(
            self.x.add_scalar(offset.x),
            self.y.add_scalar(offset.y),
            self.z.add_scalar(offset.z),
        )
    }

    /// Returns the index (0=X, 1=Y, 2=Z) of the axis with the longest extent.
    ///
    /// Ties go to the lower axis: X beats Y, and that winner beats Z.
    pub fn longest_axis(&self) -> usize {
        let x_size = self.x.size();
        let y_size = self.y.size();
        let z_size = self.z.size();

        if x_size >= y_size {
            if x_size >= z_size {
                0
            } else {
                2
            }
        } else if y_size >= z_size {
            1
        } else {
            2
        }
    }

    /// Smallest corner of the box.
    pub fn min(&self) -> Vec3 {
        Vec3::new(self.x.min, self.y.min, self.z.min)
    }

    /// Largest corner of the box.
    pub fn max(&self) -> Vec3 {
        Vec3::new(self.x.max, self.y.max, self.z.max)
    }

    /// Returns the center point of the bounding box.
    pub fn centroid(&self) -> Vec3 {
        (self.min() + self.max()) * 0.5
    }

    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };

    pub const UNIVERSE: Aabb = Aabb {
        x: Interval::UNIVERSE,
        y: Interval::UNIVERSE,
        z: Interval::UNIVERSE,
    };
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}
