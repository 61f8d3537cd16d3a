use clap::Parser;
use log::{error, info};

mod cli;
mod logger;

use cli::Args;
use defocus::camera::Camera;
use defocus::output::save_image;
use defocus::renderer::Renderer;
use defocus::scene::{camera_settings, create_scene};
use logger::init_logger;

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let settings = args.render_settings();
    let renderer = Renderer::new(settings)?;

    let world = create_scene()?;
    let camera = Camera::new(camera_settings(settings.image_width, settings.image_height));

    let image = renderer.render(&camera, &world)?;
    save_image(&image, &args.output)?;
    Ok(())
}

fn main() {
    let args = Args::parse();

    init_logger(args.debug_level.clone().into());

    info!("Defocus - Git Version {} ({})", env!("GIT_HASH"), env!("GIT_DATE"));
    info!(
        "Image resolution: {}x{}, samples per pixel: {}",
        args.width, args.height, args.samples_per_pixel
    );

    if let Err(e) = run(&args) {
        error!("{}", e);
        std::process::exit(1);
    }
}
