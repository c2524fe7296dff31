//! Opens a window showing a random staggered tile map.
//!
//! Usage: `isomap [config.toml]`. Right click recenters the map at the clicked position.

use std::env;

use anyhow::Result;
use log::{error, info};
use winit::event_loop::EventLoop;

use isomap_renderer::SpriteCatalog;
use isomap_terrain::TileGrid;

mod app;
mod config;

use app::MapApp;
use config::MapConfig;

fn main() -> Result<()> {
    env_logger::init();

    let result = run();
    if let Err(e) = &result {
        error!("{e:?}");
    }
    result
}

fn run() -> Result<()> {
    let config = MapConfig::from_args(env::args().skip(1))?;
    let catalog = SpriteCatalog::load(&config.assets, &config.terrains)?;

    let seed = config.seed.unwrap_or_else(rand::random);
    info!(
        "Generating a {}x{} map from {} terrains, seed {seed}",
        config.width,
        config.height,
        catalog.len()
    );
    let grid = TileGrid::seeded(config.width, config.height, catalog.len(), seed);

    let event_loop = EventLoop::new()?;
    let mut app = MapApp::new(config, catalog, grid);
    info!("Entering event loop");
    event_loop.run_app(&mut app)?;
    info!("Exiting event loop");

    app.into_result()
}
