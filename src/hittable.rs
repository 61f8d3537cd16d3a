//! Ray-object intersection system.
//!
//! Defines the Hittable trait for geometric primitives and HitRecord for
//! storing intersection data.

use glam::Vec3A;
use crate::ray::Ray;
use crate::interval::Interval;
use crate::material::Material;

/// Ray-object intersection information.
///
/// Lives only for a single intersection + scatter step.
#[derive(Debug, Clone, Copy)]
pub struct HitRecord<'a> {
    /// Point where the ray intersects the object
    pub p: Vec3A,
    /// Outward surface normal at the intersection point.
    ///
    /// Not flipped against the incoming ray. For a sphere with negative
    /// radius this points inward.
    pub normal: Vec3A,
    /// Ray parameter of the intersection point
    pub t: f32,
    /// Material of the object at the hit point
    pub material: &'a Material,
}

/// Trait for objects that can be intersected by rays.
///
/// Must be thread-safe (Sync + Send) so rows can be rendered in parallel.
pub trait Hittable: Sync + Send {
    /// Test for ray intersection with `t` strictly inside `ray_t`.
    fn hit(&self, r: &Ray, ray_t: Interval) -> Option<HitRecord<'_>>;
}

/// Collection of objects forming a scene.
///
/// Uses linear search for intersection testing.
#[derive(Default)]
pub struct HittableList {
    /// Vector of boxed hittable objects
    pub objects: Vec<Box<dyn Hittable>>,
}

impl HittableList {
    /// Create a new empty scene.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
        }
    }

    /// Add an object to the scene.
    pub fn add(&mut self, object: Box<dyn Hittable>) {
        self.objects.push(object);
    }

    /// Number of objects in the scene.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// True if the scene holds no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Hittable for HittableList {
    fn hit(&self, r: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let mut closest: Option<HitRecord<'_>> = None;
        let mut closest_so_far = ray_t.max;

        for object in &self.objects {
            if let Some(rec) = object.hit(r, Interval::new(ray_t.min, closest_so_far)) {
                closest_so_far = rec.t;
                closest = Some(rec);
            }
        }

        closest
    }
}
