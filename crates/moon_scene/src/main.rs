//! Headless driver for the moon scene.
//!
//! Builds the scene from `moonscene.ron` (or the path given as the first
//! argument), runs a fixed number of frames and tears everything down.

use anyhow::{Context, Result};
use moon_scene::{DelayedLoader, RoverAsset, SceneConfig, Simulation};
use std::path::PathBuf;
use std::time::{Duration, Instant};

const DEFAULT_FRAME_LIMIT: u64 = 600;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => SceneConfig::load_from(&PathBuf::from(path))?,
        None => SceneConfig::load(),
    };
    let frame_limit = config.frame_limit.unwrap_or(DEFAULT_FRAME_LIMIT);
    let frame_dt = Duration::from_secs_f32(config.physics.dt);

    log::info!("Starting moon scene ({} frames)", frame_limit);

    let loader = DelayedLoader::ready(config.loader_delay_frames, RoverAsset::default());
    let started = Instant::now();
    let mut sim = Simulation::new(config, Box::new(loader)).context("generating moon terrain")?;
    log::info!("Terrain generated in {:.1?}", started.elapsed());

    let mut frame = 0;
    while sim.is_running() && frame < frame_limit {
        if let Some(out) = sim.tick(frame_dt) {
            if frame % 60 == 0 {
                match out.status.altitude {
                    Some(alt) => log::info!("{} (altitude {:.2})", out.status, alt),
                    None => log::info!("{}", out.status),
                }
            }
        }
        frame += 1;
    }

    sim.shutdown();
    Ok(())
}
