//! Engine configuration, read from a JSON file.
//!
//! Every field has a default, so an empty object (or no file at all) gives
//! the stock 800x600 window with `./game.log` logging:
//!
//! ```json
//! {
//!   "window": { "title": "Meadow", "width": 1024, "height": 768 },
//!   "log": { "log_file": "./game.log", "level": "debug" },
//!   "textures": [{ "name": "apple", "path": "./assets/apple.png" }],
//!   "escape_closes": true,
//!   "clear_color": [0.1, 0.2, 0.1, 1.0]
//! }
//! ```
//!
//! Games can keep their own settings in the same file and read them with
//! [`read_json`]; unknown keys are ignored.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Game Engine Example".into(),
            width: 800,
            height: 600,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Append-only log file. `None` logs to the console only.
    pub log_file: Option<PathBuf>,
    /// Default filter when `RUST_LOG` is unset (`error`..`trace`).
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_file: Some(PathBuf::from("./game.log")),
            level: "info".into(),
        }
    }
}

/// A texture to register at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureEntry {
    pub name: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub window: WindowConfig,
    pub log: LogConfig,
    pub textures: Vec<TextureEntry>,
    /// Escape requests close.
    pub escape_closes: bool,
    /// Background color, RGBA in `0..=1`.
    pub clear_color: [f64; 4],
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            log: LogConfig::default(),
            textures: Vec::new(),
            escape_closes: true,
            clear_color: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

impl EngineConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        read_json(path)
    }

    /// Like [`load`](Self::load), but a missing file yields the defaults.
    /// A file that exists and does not parse is still an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }
}

/// Deserialize `T` from the JSON file at `path`.
pub fn read_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, ConfigError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
