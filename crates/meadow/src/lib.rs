//! # Meadow: a minimal 2D game engine
//!
//! A frame loop, a flat ordered entity list, and textures looked up by name.
//! Games implement [`Entity`](entity::Entity), register textures, and hand
//! everything to an [`Engine`](engine::Engine) running on a backend:
//!
//! - [`Desktop`](desktop::Desktop): a winit window rendered with wgpu
//! - [`HeadlessBackend`](headless::HeadlessBackend): in memory, for tests
//!
//! Start with `use meadow::prelude::*`.

pub mod config;
pub mod desktop;
pub mod engine;
pub mod entity;
pub mod error;
pub mod headless;
pub mod input;
pub mod logger;
pub mod math;
pub mod platform;
pub mod prelude;
pub mod scene;
pub mod texture;
pub mod time;

mod render;
mod render2d;
