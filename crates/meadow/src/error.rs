//! Error types for the engine.
//!
//! Startup and load failures are fatal to the caller and carry enough context
//! to print a useful message. Per-entity failures are not represented here:
//! entity callbacks return [`anyhow::Result`] and the scene logs and isolates
//! them.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::entity::EntityId;

/// Window or graphics bring-up failed. Nothing has entered the frame loop yet.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("failed to create rendering surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),
    #[error("failed to create GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    /// The platform event loop exited before a window was ever created.
    #[error("event loop exited with code {0} before the window was created")]
    Exited(i32),
}

/// An image could not be turned into a texture.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read image {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode image {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("no graphics device available to upload {}", path.display())]
    NoDevice { path: PathBuf },
}

impl LoadError {
    /// The file that failed to load.
    pub fn path(&self) -> &Path {
        match self {
            LoadError::Io { path, .. }
            | LoadError::Decode { path, .. }
            | LoadError::NoDevice { path } => path,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("texture name '{0}' is already registered")]
    DuplicateName(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SceneError {
    #[error("entity {0} is not in the scene")]
    NotFound(EntityId),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
