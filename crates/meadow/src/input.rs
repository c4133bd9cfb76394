//! Keyboard state.
//!
//! The engine only asks one question of the keyboard ("is Escape down?"), but
//! backends track every physical key so that question is a plain lookup.

use std::collections::HashSet;

pub use winit::keyboard::KeyCode;

/// Set of keys currently held down, fed by the backend's event handler.
#[derive(Debug, Default)]
pub struct KeyState {
    held: HashSet<KeyCode>,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pressed(&self, key: KeyCode) -> bool {
        self.held.contains(&key)
    }

    pub fn press(&mut self, key: KeyCode) {
        self.held.insert(key);
    }

    pub fn release(&mut self, key: KeyCode) {
        self.held.remove(&key);
    }

    /// Forget every held key. Called when the window loses focus, since the
    /// matching release events will never arrive.
    pub fn release_all(&mut self) {
        self.held.clear();
    }
}
