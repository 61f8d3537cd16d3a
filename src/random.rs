//! Random number generation for ray tracing.
//!
//! The core never touches a global generator: every function that needs
//! randomness takes a [`Sampler`]. [`RandomSampler`] is the ChaCha20 backed
//! implementation used by the renderer, one independent stream per image row.

use glam::Vec3A;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, error};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Upper bound on rejection sampling rounds before the sampler is deemed broken.
///
/// A healthy uniform source is accepted with probability ~0.79 (disk) or
/// ~0.52 (sphere) per round, so this is never reached in practice.
pub const MAX_REJECTION_ATTEMPTS: u32 = 1000;

static EXHAUSTION_REPORTED: AtomicBool = AtomicBool::new(false);

/// Log a gave-up rejection loop: `error` the first time in the process,
/// `debug` afterwards. Returns true for the first report.
fn report_exhausted(shape: &str) -> bool {
    let first = !EXHAUSTION_REPORTED.swap(true, Ordering::Relaxed);
    if first {
        error!(
            "Unit {} sampling gave up after {} attempts, sampler is degenerate (further occurrences logged at debug)",
            shape, MAX_REJECTION_ATTEMPTS
        );
    } else {
        debug!("Unit {} sampling gave up after {} attempts", shape, MAX_REJECTION_ATTEMPTS);
    }
    first
}

/// Source of uniform samples in [0, 1).
pub trait Sampler {
    /// Next uniform sample in [0.0, 1.0).
    fn next_f32(&mut self) -> f32;

    /// Next uniform sample in [min, max).
    fn next_f32_range(&mut self, min: f32, max: f32) -> f32 {
        min + (max - min) * self.next_f32()
    }
}

/// ChaCha20 PRNG sampler.
#[derive(Debug, Clone)]
pub struct RandomSampler {
    rng: ChaCha20Rng,
}

impl RandomSampler {
    /// Create a sampler for `stream` of the sequence identified by `seed`.
    ///
    /// Distinct streams of the same seed are statistically independent, which
    /// lets parallel workers draw reproducible numbers without sharing state.
    pub fn new(seed: u64, stream: u64) -> Self {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        rng.set_stream(stream);
        Self { rng }
    }

    /// Draw a fresh seed from the thread-local OS-seeded generator.
    pub fn random_seed() -> u64 {
        rand::rng().random()
    }
}

impl Sampler for RandomSampler {
    fn next_f32(&mut self) -> f32 {
        self.rng.random()
    }
}

/// Generate random point inside the unit disk (z = 0) using rejection sampling.
pub fn random_in_unit_disk(sampler: &mut dyn Sampler) -> Vec3A {
    for _ in 0..MAX_REJECTION_ATTEMPTS {
        let p = Vec3A::new(
            sampler.next_f32_range(-1.0, 1.0),
            sampler.next_f32_range(-1.0, 1.0),
            0.0,
        );
        if p.length_squared() < 1.0 {
            return p;
        }
    }
    report_exhausted("disk");
    Vec3A::ZERO
}

/// Generate random point inside the unit sphere using rejection sampling.
pub fn random_in_unit_sphere(sampler: &mut dyn Sampler) -> Vec3A {
    for _ in 0..MAX_REJECTION_ATTEMPTS {
        let p = Vec3A::new(
            sampler.next_f32_range(-1.0, 1.0),
            sampler.next_f32_range(-1.0, 1.0),
            sampler.next_f32_range(-1.0, 1.0),
        );
        if p.length_squared() < 1.0 {
            return p;
        }
    }
    report_exhausted("sphere");
    Vec3A::ZERO
}
