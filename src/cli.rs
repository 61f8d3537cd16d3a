use clap::{Parser, ValueEnum};
use log::LevelFilter;

use defocus::renderer::{RenderSettings, MAX_DEPTH};

/// Custom enum for log levels that can be used with clap's ValueEnum
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convert our custom LogLevel enum to log crate's LevelFilter
impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Command line arguments structure using clap derive macros
#[derive(Debug, Parser)]
#[command(name = "defocus")]
#[command(about = "Renders spheres through a thin-lens camera")]
pub struct Args {
    /// Set the logging level (defaults to "info")
    #[arg(long, default_value = "info", help = "Set the logging level")]
    pub debug_level: LogLevel,

    /// Image width in pixels
    #[arg(long, default_value = "400", help = "Image width in pixels")]
    pub width: u32,

    /// Image height in pixels
    #[arg(long, default_value = "200", help = "Image height in pixels")]
    pub height: u32,

    /// Number of samples per pixel
    #[arg(long, short = 's', default_value = "100", help = "Number of samples per pixel")]
    pub samples_per_pixel: u32,

    /// Maximum number of bounces per path
    #[arg(long, default_value_t = MAX_DEPTH, help = "Maximum number of bounces per path")]
    pub max_depth: u32,

    /// Seed for reproducible renders
    #[arg(long, help = "Seed for reproducible renders (random when omitted)")]
    pub seed: Option<u64>,

    /// Output file path
    #[arg(short, long, default_value = "output.png", help = "Output file path (8-bit, gamma corrected)")]
    pub output: String,

    /// Hide the progress bar
    #[arg(long, help = "Hide the progress bar")]
    pub no_progress: bool,
}

impl Args {
    /// Render settings described by these arguments.
    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            image_width: self.width,
            image_height: self.height,
            samples_per_pixel: self.samples_per_pixel,
            max_depth: self.max_depth,
            seed: self.seed,
            show_progress: !self.no_progress,
        }
    }
}
