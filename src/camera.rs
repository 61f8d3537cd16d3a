//! Thin-lens camera for ray generation.

use glam::Vec3A;

use crate::ray::Ray;
use crate::random::{self, Sampler};

/// Placement and optics of a [`Camera`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSettings {
    /// Point camera is looking from (camera position)
    pub lookfrom: Vec3A,
    /// Point camera is looking at (look target)
    pub lookat: Vec3A,
    /// Camera-relative "up" direction vector
    pub vup: Vec3A,
    /// Vertical field of view in degrees
    pub vfov: f32,
    /// Viewport width divided by viewport height
    pub aspect_ratio: f32,
    /// Lens diameter; 0.0 gives a pinhole camera
    pub aperture: f32,
    /// Distance from lookfrom to the plane of perfect focus
    pub focus_dist: f32,
}

/// Camera with depth of field.
///
/// All derived quantities are computed once in [`Camera::new`]; the camera is
/// immutable afterwards and can be shared across render threads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    origin: Vec3A,
    lower_left_corner: Vec3A,
    viewport_width: f32,
    viewport_height: f32,
    u: Vec3A,
    v: Vec3A,
    w: Vec3A,
    lens_radius: f32,
}

impl Camera {
    /// Derive the camera frame and viewport from `settings`.
    pub fn new(settings: CameraSettings) -> Self {
        let theta = settings.vfov.to_radians();
        let viewport_height = 2.0 * (theta / 2.0).tan() * settings.focus_dist;
        let viewport_width = settings.aspect_ratio * viewport_height;

        let w = (settings.lookfrom - settings.lookat).normalize(); // Points opposite view direction
        let u = settings.vup.cross(w).normalize();
        let v = w.cross(u);

        let origin = settings.lookfrom;
        let lower_left_corner = origin
            - w * settings.focus_dist
            - v * viewport_height / 2.0
            - u * viewport_width / 2.0;

        Self {
            origin,
            lower_left_corner,
            viewport_width,
            viewport_height,
            u,
            v,
            w,
            lens_radius: settings.aperture / 2.0,
        }
    }

    /// Ray through normalized screen coordinates `(s, t)`, (0, 0) being the
    /// bottom-left corner of the focus plane.
    ///
    /// Coordinates outside [0, 1] extrapolate past the viewport edges. The ray
    /// starts at a random point of the lens disk.
    pub fn get_ray(&self, s: f32, t: f32, sampler: &mut dyn Sampler) -> Ray {
        let rd = self.lens_radius * random::random_in_unit_disk(sampler);
        let offset = self.u * rd.x + self.v * rd.y;

        let screen_point = self.lower_left_corner
            + s * self.viewport_width * self.u
            + t * self.viewport_height * self.v;

        Ray::new(self.origin + offset, screen_point - self.origin - offset)
    }

    /// Camera position (center of the lens).
    pub fn origin(&self) -> Vec3A {
        self.origin
    }

    /// Radius of the lens disk.
    pub fn lens_radius(&self) -> f32 {
        self.lens_radius
    }

    /// Orthonormal camera basis `(u, v, w)`: right, up, and backwards.
    pub fn basis(&self) -> (Vec3A, Vec3A, Vec3A) {
        (self.u, self.v, self.w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::RandomSampler;

    /// Always lands on the lens center.
    struct Centered;

    impl Sampler for Centered {
        fn next_f32(&mut self) -> f32 {
            0.5
        }
    }

    fn close(a: Vec3A, b: Vec3A) -> bool {
        (a - b).length() < 1e-4
    }

    fn pinhole() -> CameraSettings {
        CameraSettings {
            lookfrom: Vec3A::ZERO,
            lookat: Vec3A::new(0.0, 0.0, -1.0),
            vup: Vec3A::Y,
            vfov: 90.0,
            aspect_ratio: 2.0,
            aperture: 0.0,
            focus_dist: 1.0,
        }
    }

    #[test]
    fn basis_is_orthonormal() {
        let camera = Camera::new(CameraSettings {
            lookfrom: Vec3A::new(3.0, 3.0, 2.0),
            lookat: Vec3A::new(0.0, 0.0, -1.0),
            ..pinhole()
        });
        let (u, v, w) = camera.basis();
        for axis in [u, v, w] {
            assert!((axis.length() - 1.0).abs() < 1e-5);
        }
        assert!(u.dot(v).abs() < 1e-5);
        assert!(v.dot(w).abs() < 1e-5);
        assert!(w.dot(u).abs() < 1e-5);
        assert!(close(w, Vec3A::new(3.0, 3.0, 3.0).normalize()));
    }

    #[test]
    fn pinhole_corners_match_viewport() {
        let camera = Camera::new(pinhole());
        let sampler = &mut Centered;

        // vfov 90 at focus distance 1: viewport is 2 high and 4 wide
        let center = camera.get_ray(0.5, 0.5, sampler);
        assert_eq!(center.origin, Vec3A::ZERO);
        assert!(close(center.direction, Vec3A::new(0.0, 0.0, -1.0)));

        let bottom_left = camera.get_ray(0.0, 0.0, sampler);
        assert!(close(bottom_left.direction, Vec3A::new(-2.0, -1.0, -1.0)));

        let top_right = camera.get_ray(1.0, 1.0, sampler);
        assert!(close(top_right.direction, Vec3A::new(2.0, 1.0, -1.0)));

        // Out of range coordinates extrapolate
        let beyond = camera.get_ray(1.5, 0.5, sampler);
        assert!(close(beyond.direction, Vec3A::new(4.0, 0.0, -1.0)));
    }

    #[test]
    fn aperture_jitters_origin_within_lens() {
        let camera = Camera::new(CameraSettings { aperture: 2.0, focus_dist: 5.0, ..pinhole() });
        assert_eq!(camera.lens_radius(), 1.0);

        let mut sampler = RandomSampler::new(3, 0);
        let mut moved = false;
        for _ in 0..64 {
            let ray = camera.get_ray(0.5, 0.5, &mut sampler);
            let offset = ray.origin - camera.origin();
            assert!(offset.length() < 1.0 + 1e-5);
            // The lens lies in the u/v plane
            assert!(offset.z.abs() < 1e-6);
            moved |= offset.length() > 1e-3;
        }
        assert!(moved);
    }

    #[test]
    fn lens_rays_converge_on_focus_plane() {
        let camera = Camera::new(CameraSettings { aperture: 2.0, focus_dist: 5.0, ..pinhole() });
        let mut sampler = RandomSampler::new(11, 0);
        for _ in 0..16 {
            let ray = camera.get_ray(0.5, 0.5, &mut sampler);
            // The lens offset is removed from the direction, so every sample
            // passes through the same point of the focus plane
            assert!(close(ray.at(1.0), Vec3A::new(0.0, 0.0, -5.0)));
        }
    }
}
