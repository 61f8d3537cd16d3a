//! Defocus ray tracer
//!
//! Renders a fixed scene of Lambertian, metal and glass spheres through a
//! thin-lens camera with depth of field. Outputs an 8-bit PNG.

#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod ray;
pub mod sphere;
pub mod hittable;
pub mod interval;
pub mod camera;
pub mod random;
pub mod material;
pub mod renderer;
pub mod scene;
pub mod output;
