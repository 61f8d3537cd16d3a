//! The fixed demo scene: three spheres resting on a large ground sphere,
//! the left one a hollow glass shell, seen through a wide-open lens.

use glam::Vec3A;
use thiserror::Error;

use crate::camera::CameraSettings;
use crate::hittable::HittableList;
use crate::material::Material;
use crate::sphere::Sphere;

/// Errors raised while building a scene.
#[derive(Debug, Error)]
pub enum SceneError {
    /// A sphere would divide by its radius when computing normals.
    #[error("degenerate sphere at {center:?} with radius {radius}")]
    DegenerateSphere {
        /// Sphere center
        center: [f32; 3],
        /// Offending radius
        radius: f32,
    },
}

/// Build the five-sphere scene.
pub fn create_scene() -> Result<HittableList, SceneError> {
    let mut world = HittableList::new();

    let center = Material::Lambertian { albedo: Vec3A::new(0.1, 0.2, 0.5) };
    let ground = Material::Lambertian { albedo: Vec3A::new(0.8, 0.8, 0.0) };
    let metal = Material::Metal { albedo: Vec3A::new(0.8, 0.6, 0.2), fuzz: 0.3 };
    let glass = Material::Dielectric { refraction_index: 1.5 };

    world.add(Box::new(Sphere::new(Vec3A::new(0.0, 0.0, -1.0), 0.5, center)?));
    world.add(Box::new(Sphere::new(Vec3A::new(0.0, -100.5, -1.0), 100.0, ground)?));
    world.add(Box::new(Sphere::new(Vec3A::new(1.0, 0.0, -1.0), 0.5, metal)?));
    world.add(Box::new(Sphere::new(Vec3A::new(-1.0, 0.0, -1.0), 0.5, glass)?));
    // Negative radius: inward normals turn the pair into a hollow shell
    world.add(Box::new(Sphere::new(Vec3A::new(-1.0, 0.0, -1.0), -0.45, glass)?));

    Ok(world)
}

/// Camera for the scene, focused on the center sphere.
pub fn camera_settings(image_width: u32, image_height: u32) -> CameraSettings {
    let lookfrom = Vec3A::new(3.0, 3.0, 2.0);
    let lookat = Vec3A::new(0.0, 0.0, -1.0);
    CameraSettings {
        lookfrom,
        lookat,
        vup: Vec3A::Y,
        vfov: 20.0,
        aspect_ratio: image_width as f32 / image_height.max(1) as f32,
        aperture: 2.0,
        focus_dist: (lookfrom - lookat).length(),
    }
}
