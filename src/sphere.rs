//! Sphere primitive for ray tracing.
//!
//! Implements ray-sphere intersection using the half-b quadratic formula.

use glam::Vec3A;
use crate::ray::Ray;
use crate::hittable::{Hittable, HitRecord};
use crate::interval::Interval;
use crate::material::Material;
use crate::scene::SceneError;

/// Sphere primitive defined by center, radius, and material.
#[derive(Debug, Clone)]
pub struct Sphere {
    center: Vec3A,
    radius: f32,
    material: Material,
}

impl Sphere {
    /// Create a new sphere.
    ///
    /// The radius keeps its sign: a negative radius turns the reported normals
    /// inward, which is how a hollow glass shell is modelled (an outer sphere
    /// plus a slightly smaller inner one with negative radius). A zero or
    /// non-finite radius is rejected.
    pub fn new(center: Vec3A, radius: f32, material: Material) -> Result<Self, SceneError> {
        if radius == 0.0 || !radius.is_finite() {
            return Err(SceneError::DegenerateSphere { center: center.into(), radius });
        }
        Ok(Self { center, radius, material })
    }

    /// Center point of the sphere in world coordinates.
    pub fn center(&self) -> Vec3A {
        self.center
    }

    /// Signed radius.
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Material attached to the sphere.
    pub fn material(&self) -> &Material {
        &self.material
    }
}

impl Hittable for Sphere {
    fn hit(&self, r: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let oc = self.center - r.origin;

        let a = r.direction.length_squared();
        let h = r.direction.dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root that lies in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return None;
            }
        }

        let p = r.at(root);
        Some(HitRecord {
            p,
            // signed radius on purpose
            normal: (p - self.center) / self.radius,
            t: root,
            material: &self.material,
        })
    }
}
