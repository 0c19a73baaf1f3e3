//! `ember` - render a built-in scene to an image file.
//!
//! Usage: `ember [settings.json]`. Without a settings file the defaults are
//! used (random spheres, 800x450, 100 spp, written to `render.png`).

mod scenes;
mod settings;

use std::env;
use std::time::Instant;

use anyhow::{Context, Result};
use ember_renderer::{render_image, RenderConfig, DEFAULT_BUCKET_SIZE};

use crate::settings::RenderSettings;

fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    log::info!("Starting Ember");

    let settings = match env::args_os().nth(1) {
        Some(path) => RenderSettings::load(path)?,
        None => {
            log::info!("No settings file given, using defaults");
            RenderSettings::default()
        }
    };

    let start = Instant::now();
    let scene = scenes::build(&settings);
    log::info!("Scene built in {:.2?}", start.elapsed());

    let config = RenderConfig {
        samples_per_pixel: settings.samples_per_pixel,
        max_bounces: settings.max_bounces,
        background: scene.background,
        seed: settings.seed,
        bucket_size: DEFAULT_BUCKET_SIZE,
    };

    let image = render_image(&scene.camera, &scene.world, &config);

    image
        .gamma_corrected(settings.gamma)
        .save(&settings.output)
        .with_context(|| format!("Failed to save {}", settings.output.display()))?;

    Ok(())
}
