//! In-memory backend.
//!
//! Implements every backend trait without a window or GPU: draws are recorded,
//! textures are issued without reading files, and closing is scripted. Used by
//! the engine's own tests and by games that want to test entities against a
//! real frame loop.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::LoadError;
use crate::input::{KeyCode, KeyState};
use crate::math::Rect;
use crate::platform::{Canvas, TextureLoader, Window};
use crate::texture::TextureHandle;

/// One recorded `draw_textured_rect` call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCall {
    pub texture: TextureHandle,
    pub rect: Rect,
    pub viewport: (u32, u32),
}

/// Backend calls in the order they happened.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackendCall {
    Poll,
    Draw(DrawCall),
    Present,
}

#[derive(Debug)]
pub struct HeadlessBackend {
    size: (u32, u32),
    keys: KeyState,
    close_requested: bool,
    close_after: Option<u64>,
    frames_presented: u64,
    events_polled: u64,
    calls: Vec<BackendCall>,
    loaded: Vec<PathBuf>,
    failures: HashSet<PathBuf>,
}

impl HeadlessBackend {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: (width, height),
            keys: KeyState::new(),
            close_requested: false,
            close_after: None,
            frames_presented: 0,
            events_polled: 0,
            calls: Vec::new(),
            loaded: Vec::new(),
            failures: HashSet::new(),
        }
    }

    /// Report `should_close` once `frames` frames have been presented.
    pub fn close_after_frames(&mut self, frames: u64) {
        self.close_after = Some(frames);
    }

    /// Hold `key` down until [`release`](Self::release).
    pub fn press(&mut self, key: KeyCode) {
        self.keys.press(key);
    }

    pub fn release(&mut self, key: KeyCode) {
        self.keys.release(key);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }

    /// Make every later load of `path` fail with a not-found error.
    pub fn fail_on(&mut self, path: impl Into<PathBuf>) {
        self.failures.insert(path.into());
    }

    pub fn clear_failures(&mut self) {
        self.failures.clear();
    }

    /// Paths that loaded successfully, in load order.
    pub fn loaded_paths(&self) -> &[PathBuf] {
        &self.loaded
    }

    pub fn calls(&self) -> &[BackendCall] {
        &self.calls
    }

    pub fn draws(&self) -> Vec<DrawCall> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                BackendCall::Draw(draw) => Some(*draw),
                _ => None,
            })
            .collect()
    }

    /// Draw calls made since the most recent present.
    pub fn pending_draws(&self) -> Vec<DrawCall> {
        self.calls
            .iter()
            .rev()
            .take_while(|call| **call != BackendCall::Present)
            .filter_map(|call| match call {
                BackendCall::Draw(draw) => Some(*draw),
                _ => None,
            })
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect()
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    pub fn events_polled(&self) -> u64 {
        self.events_polled
    }
}

impl Window for HeadlessBackend {
    fn should_close(&self) -> bool {
        self.close_requested
            || self
                .close_after
                .is_some_and(|frames| self.frames_presented >= frames)
    }

    fn request_close(&mut self) {
        self.close_requested = true;
    }

    fn poll_events(&mut self) {
        self.events_polled += 1;
        self.calls.push(BackendCall::Poll);
    }

    fn present_frame(&mut self) {
        self.frames_presented += 1;
        self.calls.push(BackendCall::Present);
    }

    fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys.is_pressed(key)
    }

    fn viewport_size(&self) -> (u32, u32) {
        self.size
    }
}

impl Canvas for HeadlessBackend {
    fn draw_textured_rect(&mut self, texture: TextureHandle, rect: Rect, viewport: (u32, u32)) {
        self.calls.push(BackendCall::Draw(DrawCall {
            texture,
            rect,
            viewport,
        }));
    }
}

impl TextureLoader for HeadlessBackend {
    fn load_texture(&mut self, path: &Path) -> Result<TextureHandle, LoadError> {
        if self.failures.contains(path) {
            return Err(LoadError::Io {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            });
        }
        self.loaded.push(path.to_path_buf());
        Ok(TextureHandle::from_raw(self.loaded.len() as u32))
    }
}
