mod config;
mod scene;

use anyhow::{Context, Result};
use sparkle_paint::GradientRasterizer;
use sparkle_paint::logging::init_logging;

use crate::config::{StudioConfig, USAGE};
use crate::scene::Scene;

fn main() -> Result<()> {
    let Some(config) = StudioConfig::from_args(std::env::args().skip(1))? else {
        print!("{USAGE}");
        return Ok(());
    };

    init_logging(config.logging.clone());
    run(&config)
}

fn run(config: &StudioConfig) -> Result<()> {
    let scene = Scene::load(&config.scene)?;
    log::info!(
        "loaded {} ({}x{}, {} layers)",
        config.scene.display(),
        scene.canvas.width,
        scene.canvas.height,
        scene.layers.len()
    );

    let rasterizer = GradientRasterizer::new(config.raster.clone());
    let image = scene.render(&rasterizer)?;

    let output = config.output_path();
    image
        .save(&output)
        .with_context(|| format!("failed to write {}", output.display()))?;
    log::info!("wrote {}", output.display());

    Ok(())
}
