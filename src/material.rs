//! Material system for ray tracing.
//!
//! Implements three material types: Lambertian (diffuse), Metal (specular),
//! and Dielectric (transparent).

use glam::Vec3A;
use crate::ray::Ray;
use crate::hittable::HitRecord;
use crate::random::{self, Sampler};

/// RGB color type using Vec3A for SIMD optimization.
pub type Color = Vec3A;

/// Outcome of a successful scatter event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scatter {
    /// Per-channel color multiplier applied to light arriving along `scattered`.
    pub attenuation: Color,
    /// Ray leaving the surface.
    pub scattered: Ray,
}

/// Material types for ray tracing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Material {
    /// Lambertian diffuse material for matte surfaces.
    Lambertian {
        /// Surface color/reflectance.
        albedo: Color,
    },

    /// Metallic material with specular reflection.
    Metal {
        /// Metal color.
        albedo: Color,
        /// Surface roughness (0.0 = mirror), scales the random offset.
        fuzz: f32,
    },

    /// Dielectric (transparent) material with refraction.
    Dielectric {
        /// Index of refraction (1.0 = air, 1.5 = glass, etc.).
        refraction_index: f32,
    },
}

impl Material {
    /// Compute ray scattering for this material.
    ///
    /// Returns `None` when the ray is absorbed.
    pub fn scatter(&self, r_in: &Ray, rec: &HitRecord<'_>, sampler: &mut dyn Sampler) -> Option<Scatter> {
        match *self {
            Material::Lambertian { albedo } => Some(scatter_lambertian(albedo, rec, sampler)),
            Material::Metal { albedo, fuzz } => scatter_metal(albedo, fuzz, r_in, rec, sampler),
            Material::Dielectric { refraction_index } => {
                Some(scatter_dielectric(refraction_index, r_in, rec, sampler))
            }
        }
    }
}

fn scatter_lambertian(albedo: Color, rec: &HitRecord<'_>, sampler: &mut dyn Sampler) -> Scatter {
    let mut scatter_direction = rec.normal + random::random_in_unit_sphere(sampler);

    // Catch degenerate scatter direction
    if scatter_direction.length_squared() < 1e-8 {
        scatter_direction = rec.normal;
    }

    Scatter {
        attenuation: albedo,
        scattered: Ray::new(rec.p, scatter_direction),
    }
}

fn scatter_metal(
    albedo: Color,
    fuzz: f32,
    r_in: &Ray,
    rec: &HitRecord<'_>,
    sampler: &mut dyn Sampler,
) -> Option<Scatter> {
    let reflected = reflect(r_in.direction.normalize(), rec.normal);
    let direction = reflected + fuzz * random::random_in_unit_sphere(sampler);

    // Rays fuzzed below the surface are absorbed
    (direction.dot(rec.normal) > 0.0).then(|| Scatter {
        attenuation: albedo,
        scattered: Ray::new(rec.p, direction),
    })
}

fn scatter_dielectric(
    refraction_index: f32,
    r_in: &Ray,
    rec: &HitRecord<'_>,
    sampler: &mut dyn Sampler,
) -> Scatter {
    let d = r_in.direction;
    let d_dot_n = d.dot(rec.normal);

    let (outward_normal, ratio, cosine) = if d_dot_n > 0.0 {
        // Leaving the medium
        (-rec.normal, refraction_index, refraction_index * d_dot_n / d.length())
    } else {
        (rec.normal, 1.0 / refraction_index, -d_dot_n / d.length())
    };

    let direction = match refract(d, outward_normal, ratio) {
        Some(refracted) if reflectance(cosine, refraction_index) <= sampler.next_f32() => refracted,
        _ => reflect(d, rec.normal),
    };

    Scatter {
        attenuation: Color::ONE,
        scattered: Ray::new(rec.p, direction),
    }
}

/// Reflect a vector off a surface using the law of reflection.
pub fn reflect(v: Vec3A, n: Vec3A) -> Vec3A {
    v - 2.0 * v.dot(n) * n
}

/// Refract a vector through an interface using Snell's law.
///
/// `n` must face the incoming side. Returns `None` on total internal reflection.
pub fn refract(v: Vec3A, n: Vec3A, ni_over_nt: f32) -> Option<Vec3A> {
    let uv = v.normalize();
    let dt = uv.dot(n);
    let discriminant = 1.0 - ni_over_nt * ni_over_nt * (1.0 - dt * dt);
    if discriminant < 0.0 {
        return None;
    }
    Some(ni_over_nt * (uv - n * dt) - n * discriminant.sqrt())
}

/// Compute Fresnel reflectance using Schlick's approximation.
///
/// An index-matched interface (`r0 == 0`) does not reflect at all.
pub fn reflectance(cosine: f32, refraction_index: f32) -> f32 {
    let r0 = (1.0 - refraction_index) / (1.0 + refraction_index);
    let r0 = r0 * r0;
    if r0 == 0.0 {
        return 0.0;
    }
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Replays a fixed list of samples, cycling when exhausted.
    struct Replay {
        values: Vec<f32>,
        next: usize,
    }

    impl Replay {
        fn new(values: &[f32]) -> Self {
            Self { values: values.to_vec(), next: 0 }
        }
    }

    impl Sampler for Replay {
        fn next_f32(&mut self) -> f32 {
            let value = self.values[self.next % self.values.len()];
            self.next += 1;
            value
        }
    }

    fn record(material: &Material, normal: Vec3A) -> HitRecord<'_> {
        HitRecord { p: Vec3A::ZERO, normal, t: 1.0, material }
    }

    fn parallel(a: Vec3A, b: Vec3A) -> bool {
        a.normalize().dot(b.normalize()) > 1.0 - 1e-5
    }

    #[test]
    fn lambertian_always_scatters_around_normal() {
        let material = Material::Lambertian { albedo: Vec3A::new(0.1, 0.2, 0.5) };
        let rec = record(&material, Vec3A::Y);
        let ray = Ray::new(Vec3A::new(0.0, 1.0, 0.0), Vec3A::new(0.0, -1.0, 0.0));

        // 0.5 maps to 0.0 in [-1, 1), so the random offset vanishes
        let scatter = material.scatter(&ray, &rec, &mut Replay::new(&[0.5])).unwrap();
        assert_eq!(scatter.attenuation, Vec3A::new(0.1, 0.2, 0.5));
        assert_eq!(scatter.scattered.origin, rec.p);
        assert_eq!(scatter.scattered.direction, Vec3A::Y);

        let scatter = material.scatter(&ray, &rec, &mut Replay::new(&[0.7, 0.3, 0.6])).unwrap();
        assert!(scatter.scattered.direction.dot(Vec3A::Y) > 0.0);
    }

    #[test]
    fn metal_without_fuzz_is_a_mirror() {
        let material = Material::Metal { albedo: Vec3A::new(0.8, 0.6, 0.2), fuzz: 0.0 };
        let n = Vec3A::new(0.0, 1.0, 0.0);
        let rec = record(&material, n);
        let ray = Ray::new(Vec3A::new(-1.0, 1.0, -0.5), Vec3A::new(1.0, -1.0, 0.5));
        let d = ray.direction.normalize();

        let scatter = material.scatter(&ray, &rec, &mut Replay::new(&[0.6, 0.4, 0.5])).unwrap();
        assert_eq!(scatter.scattered.direction, d - 2.0 * d.dot(n) * n);
        assert_eq!(scatter.attenuation, Vec3A::new(0.8, 0.6, 0.2));
    }

    #[test]
    fn metal_fuzz_scales_the_sphere_offset() {
        let material = Material::Metal { albedo: Vec3A::ONE, fuzz: 3.0 };
        let n = Vec3A::Y;
        let rec = record(&material, n);
        let ray = Ray::new(Vec3A::new(-1.0, 1.0, 0.0), Vec3A::new(1.0, -1.0, 0.0));

        // 0.75 maps to 0.5 on every axis, inside the unit sphere on the first round
        let scatter = material.scatter(&ray, &rec, &mut Replay::new(&[0.75])).unwrap();
        let expected = reflect(ray.direction.normalize(), n) + 3.0 * Vec3A::splat(0.5);
        assert_eq!(scatter.scattered.direction, expected);
        assert!((expected - Vec3A::new(2.2071068, 2.2071068, 1.5)).length() < 1e-5);
    }

    #[test]
    fn metal_absorbs_rays_pushed_below_surface() {
        let material = Material::Metal { albedo: Vec3A::ONE, fuzz: 1.0 };
        let rec = record(&material, Vec3A::Y);
        // Grazing incidence: the mirror direction is nearly tangent
        let ray = Ray::new(Vec3A::ZERO, Vec3A::new(1.0, -0.01, 0.0));
        // Offset of (0, -0.9, 0) drags it under the surface
        let sampler = &mut Replay::new(&[0.5, 0.05, 0.5]);
        assert!(material.scatter(&ray, &rec, sampler).is_none());
    }

    #[test]
    fn index_matched_glass_never_bends() {
        let material = Material::Dielectric { refraction_index: 1.0 };
        let n = Vec3A::new(0.0, 0.0, 1.0);
        let rec = record(&material, n);

        for d in [
            Vec3A::new(0.0, 0.0, -1.0),
            Vec3A::new(0.3, 0.2, -1.0),
            Vec3A::new(5.0, 0.0, -0.2),
            Vec3A::new(1.0, 1.0, -0.001),
            // exiting the surface
            Vec3A::new(0.4, -0.1, 1.0),
        ] {
            let ray = Ray::new(Vec3A::ZERO, d);
            for draw in [0.0, 0.5, 0.999] {
                let scatter = material.scatter(&ray, &rec, &mut Replay::new(&[draw])).unwrap();
                assert!(parallel(scatter.scattered.direction, d), "{:?} bent", d);
                assert_eq!(scatter.attenuation, Vec3A::ONE);
            }
        }
    }

    #[test]
    fn glass_bends_toward_normal_when_entering() {
        let material = Material::Dielectric { refraction_index: 1.5 };
        let n = Vec3A::Y;
        let rec = record(&material, n);
        let d = Vec3A::new(1.0, -1.0, 0.0).normalize();
        let ray = Ray::new(Vec3A::ZERO, d);

        // A draw of 0.999 exceeds the Schlick reflectance at 45 degrees
        let scatter = material.scatter(&ray, &rec, &mut Replay::new(&[0.999])).unwrap();
        let out = scatter.scattered.direction.normalize();
        let sin_in = d.x;
        let sin_out = out.x;
        assert!(out.y < 0.0);
        assert!((sin_in - 1.5 * sin_out).abs() < 1e-4);

        // A draw of 0.0 always loses to the reflectance
        let scatter = material.scatter(&ray, &rec, &mut Replay::new(&[0.0])).unwrap();
        assert!(parallel(scatter.scattered.direction, reflect(d, n)));
    }

    #[test]
    fn total_internal_reflection_when_exiting_steeply() {
        let material = Material::Dielectric { refraction_index: 1.5 };
        // Normal is outward, ray travels from inside toward the surface at a grazing angle
        let n = Vec3A::Y;
        let rec = record(&material, n);
        let d = Vec3A::new(1.0, 0.3, 0.0);
        assert!(refract(d, -n, 1.5).is_none());

        let ray = Ray::new(Vec3A::ZERO, d);
        let scatter = material.scatter(&ray, &rec, &mut Replay::new(&[0.999])).unwrap();
        assert!(parallel(scatter.scattered.direction, reflect(d, n)));
    }

    #[test]
    fn schlick_limits() {
        assert!((reflectance(1.0, 1.5) - 0.04).abs() < 1e-6);
        assert!((reflectance(0.0, 1.5) - 1.0).abs() < 1e-6);
        assert_eq!(reflectance(0.0, 1.0), 0.0);
    }
}
