//! CPU renderer: the recursive integrator and the per-pixel sampling loop.

use glam::Vec3A;
use image::RgbImage;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, trace};
use rayon::prelude::*;
use thiserror::Error;

use crate::camera::Camera;
use crate::hittable::Hittable;
use crate::interval::Interval;
use crate::material::Color;
use crate::random::{RandomSampler, Sampler};
use crate::ray::Ray;

/// Default bounce limit.
pub const MAX_DEPTH: u32 = 50;

/// Smallest accepted hit distance. Keeps scattered rays from re-hitting the
/// surface they start on (shadow acne).
pub const T_MIN: f32 = 0.001;

/// Errors raised while rendering or writing an image.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Width or height is zero.
    #[error("image dimensions must be non-zero, got {width}x{height}")]
    EmptyImage {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
    },
    /// Zero samples per pixel.
    #[error("samples per pixel must be at least 1")]
    NoSamples,
    /// The pixel buffer does not match the image dimensions.
    #[error("pixel buffer does not fit a {width}x{height} image")]
    BufferSize {
        /// Image width
        width: u32,
        /// Image height
        height: u32,
    },
    /// Image encoding or file I/O failed.
    #[error("failed to write image: {0}")]
    Image(#[from] image::ImageError),
}

/// Image and sampling parameters of a render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSettings {
    /// Rendered image width in pixel count
    pub image_width: u32,
    /// Rendered image height in pixel count
    pub image_height: u32,
    /// Number of random samples for each pixel (for anti-aliasing)
    pub samples_per_pixel: u32,
    /// Maximum number of ray bounces (recursion depth limit)
    pub max_depth: u32,
    /// Seed of the per-row sample streams; drawn at random when `None`
    pub seed: Option<u64>,
    /// Draw a progress bar on stderr
    pub show_progress: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            image_width: 400,
            image_height: 200,
            samples_per_pixel: 100,
            max_depth: MAX_DEPTH,
            seed: None,
            show_progress: true,
        }
    }
}

/// Renders a scene through a camera into an 8-bit RGB image.
#[derive(Debug, Clone)]
pub struct Renderer {
    settings: RenderSettings,
}

impl Renderer {
    /// Create a renderer, rejecting empty images and zero sample counts.
    pub fn new(settings: RenderSettings) -> Result<Self, RenderError> {
        if settings.image_width == 0 || settings.image_height == 0 {
            return Err(RenderError::EmptyImage {
                width: settings.image_width,
                height: settings.image_height,
            });
        }
        if settings.samples_per_pixel == 0 {
            return Err(RenderError::NoSamples);
        }
        Ok(Self { settings })
    }

    /// Settings this renderer was built with.
    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Render with ChaCha20 sample streams, one per image row.
    ///
    /// With a fixed seed the output is identical run to run, independent of
    /// how rows are scheduled across threads.
    pub fn render(&self, camera: &Camera, world: &dyn Hittable) -> Result<RgbImage, RenderError> {
        let seed = self.settings.seed.unwrap_or_else(RandomSampler::random_seed);
        info!("Sampling with seed {}", seed);
        self.render_with(camera, world, |row| RandomSampler::new(seed, row as u64))
    }

    /// Render using `make_sampler(row)` as the sample source of each image row
    /// (row 0 is the top of the image).
    pub fn render_with<S, F>(&self, camera: &Camera, world: &dyn Hittable, make_sampler: F) -> Result<RgbImage, RenderError>
    where
        S: Sampler,
        F: Fn(usize) -> S + Sync,
    {
        let width = self.settings.image_width;
        let height = self.settings.image_height;
        let mut buffer = vec![0u8; width as usize * height as usize * 3];

        info!(
            "Rendering {}x{} at {} samples per pixel using {} CPU cores...",
            width,
            height,
            self.settings.samples_per_pixel,
            rayon::current_num_threads()
        );
        let generation_start = std::time::Instant::now();
        let pb = self.progress_bar(height as u64);

        buffer
            .par_chunks_mut(width as usize * 3)
            .enumerate()
            .for_each(|(y, row)| {
                let mut sampler = make_sampler(y);
                self.render_row(y, row, camera, world, &mut sampler);
                trace!("Row {} done", y);
                pb.inc(1);
            });

        pb.finish();
        info!("Image generated in {:.2?}", generation_start.elapsed());

        RgbImage::from_raw(width, height, buffer).ok_or(RenderError::BufferSize { width, height })
    }

    fn progress_bar(&self, rows: u64) -> ProgressBar {
        if !self.settings.show_progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(rows);
        match ProgressStyle::default_bar().template("{bar:40} {pos}/{len} rows ETA: {eta}") {
            Ok(style) => pb.set_style(style),
            Err(e) => debug!("Falling back to default progress style: {}", e),
        }
        pb
    }

    /// Fill one row of RGB8 pixels. Rows are counted from the top, while the
    /// camera's `v` coordinate grows upward.
    fn render_row(&self, y: usize, row: &mut [u8], camera: &Camera, world: &dyn Hittable, sampler: &mut dyn Sampler) {
        let width = self.settings.image_width as f32;
        let height = self.settings.image_height as f32;
        let flipped = (self.settings.image_height as usize - 1 - y) as f32;

        for (x, pixel) in row.chunks_exact_mut(3).enumerate() {
            let mut pixel_color = Color::ZERO;

            for _sample in 0..self.settings.samples_per_pixel {
                let v = (flipped + sampler.next_f32()) / height;
                let u = (x as f32 + sampler.next_f32()) / width;
                let r = camera.get_ray(u, v, sampler);
                pixel_color += ray_color(&r, world, 0, self.settings.max_depth, sampler);
            }

            pixel_color /= self.settings.samples_per_pixel as f32;
            pixel.copy_from_slice(&to_rgb8(pixel_color));
        }
    }
}

/// Trace a ray and compute its color contribution.
///
/// `depth` counts bounces so far; a hit at `depth >= max_depth` gathers no
/// more light.
pub fn ray_color(r: &Ray, world: &dyn Hittable, depth: u32, max_depth: u32, sampler: &mut dyn Sampler) -> Color {
    if let Some(rec) = world.hit(r, Interval::new(T_MIN, f32::INFINITY)) {
        if depth < max_depth {
            if let Some(scatter) = rec.material.scatter(r, &rec, sampler) {
                return scatter.attenuation
                    * ray_color(&scatter.scattered, world, depth + 1, max_depth, sampler);
            }
        }
        return Color::ZERO;
    }

    sky_color(r.direction)
}

/// Background gradient from white (straight down) to light blue (straight up).
pub fn sky_color(direction: Vec3A) -> Color {
    let unit_direction = direction.normalize();
    let a = 0.5 * (unit_direction.y + 1.0);
    (1.0 - a) * Color::ONE + a * Color::new(0.5, 0.7, 1.0)
}

/// Gamma-2 encode a linear color and quantize it to 8 bits per channel.
pub fn to_rgb8(color: Color) -> [u8; 3] {
    let encode = |linear: f32| (Interval::UNIT.clamp(linear.sqrt()) * 255.0).round() as u8;
    [encode(color.x), encode(color.y), encode(color.z)]
}
