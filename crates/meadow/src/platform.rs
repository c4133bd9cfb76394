//! The capabilities the engine needs from the outside world.
//!
//! The frame loop never talks to winit or wgpu directly. It drives a backend
//! through three small traits:
//!
//! - [`Window`]: close requests, event polling, presenting, keyboard, size
//! - [`Canvas`]: one textured rectangle per call
//! - [`TextureLoader`]: image file to [`TextureHandle`]
//!
//! [`Desktop`](crate::desktop::Desktop) implements all three on top of
//! winit + wgpu, and [`HeadlessBackend`](crate::headless::HeadlessBackend)
//! implements them in memory.

use std::path::Path;

use crate::error::LoadError;
use crate::input::KeyCode;
use crate::math::Rect;
use crate::texture::TextureHandle;

pub trait Window {
    fn should_close(&self) -> bool;
    fn request_close(&mut self);
    /// Process pending OS events without blocking.
    fn poll_events(&mut self);
    /// Show everything drawn since the previous present.
    fn present_frame(&mut self);
    fn is_key_pressed(&self, key: KeyCode) -> bool;
    /// Drawable area in pixels.
    fn viewport_size(&self) -> (u32, u32);
}

pub trait Canvas {
    /// Draw `texture` stretched over `rect`, projected for `viewport`.
    fn draw_textured_rect(&mut self, texture: TextureHandle, rect: Rect, viewport: (u32, u32));
}

pub trait TextureLoader {
    fn load_texture(&mut self, path: &Path) -> Result<TextureHandle, LoadError>;
}

/// Everything the [`Engine`](crate::engine::Engine) needs from a backend.
pub trait Backend: Window + Canvas + TextureLoader {}

impl<T: Window + Canvas + TextureLoader> Backend for T {}
