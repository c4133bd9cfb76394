//! Meadow demo: an apple sliding across a slowly spreading patch of grass.
//!
//! Reads `meadow.json` (or the path given as the first argument) for window,
//! logging, texture and grass settings. Press Escape or close the window to
//! quit.

mod grass;
mod player;

use std::path::PathBuf;
use std::rc::Rc;

use meadow::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Deserialize;

use grass::{Grass, GrassSettings};
use player::Player;

const CONFIG_PATH: &str = "meadow.json";

/// Textures used when the config file lists none.
const DEFAULT_TEXTURES: [(&str, &str); 2] = [
    ("./assets/apple.png", "apple"),
    ("./assets/grass1.png", "grass1"),
];

/// Demo-only settings living next to the engine's in the same file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DemoConfig {
    grass: GrassSettings,
}

fn main() -> anyhow::Result<()> {
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(CONFIG_PATH));

    let config = EngineConfig::load_or_default(&path)?;
    meadow::logger::init(&config.log)?;
    let demo: DemoConfig = if path.exists() {
        log::info!("Loaded config from {}", path.display());
        read_json(&path)?
    } else {
        log::info!("No config at {}, using defaults", path.display());
        DemoConfig::default()
    };

    let backend = Desktop::new(&config)?;
    let mut engine = Engine::from_config(backend, &config)?;
    if config.textures.is_empty() {
        for (file, name) in DEFAULT_TEXTURES {
            engine.register_texture(file, name)?;
        }
    }
    engine.load_textures()?;

    engine.add_entity(Player::new("Player 1"));

    let (width, height) = engine.backend().viewport_size();
    let seed = Grass::new(
        width as f32 / 2.0,
        height as f32 / 2.0,
        Rc::new(demo.grass),
        StdRng::from_entropy(),
    );
    engine.add_entity(seed);

    let frames = engine.run();
    log::info!("Bye after {frames} frames");
    Ok(())
}
