//! # Textures by name
//!
//! Entities never deal with image files. At startup the game registers
//! `(path, name)` pairs, the engine loads them all in one explicit phase, and
//! from then on entities look textures up by name and get back a copyable
//! [`TextureHandle`].
//!
//! ```text
//! TextureRegistry
//! ┌──────────────────────────────────────────────┐
//! │ entries (registration order)                 │
//! │   [0] "apple"  ./assets/apple.png   -> #1    │
//! │   [1] "grass1" ./assets/grass1.png  -> #2    │
//! │                                              │
//! │ by_name: "apple" -> 0, "grass1" -> 1         │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Loading is fail-fast: the first file that cannot be loaded stops the
//! phase. Entries before it keep their handles, the failing entry and the
//! ones after it stay unloaded. Calling [`TextureRegistry::load_all`] again
//! only retries entries that are still unloaded.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{LoadError, RegistryError};
use crate::platform::TextureLoader;

/// Opaque texture id issued by a [`TextureLoader`]. Zero means "not loaded".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TextureHandle(u32);

impl TextureHandle {
    pub const UNLOADED: Self = Self(0);

    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    pub const fn is_loaded(self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for TextureHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tex#{}", self.0)
    }
}

/// A registered texture: its unique name, source file and current handle.
#[derive(Debug, Clone)]
pub struct NamedTexture {
    name: String,
    path: PathBuf,
    handle: TextureHandle,
}

impl NamedTexture {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn handle(&self) -> TextureHandle {
        self.handle
    }
}

/// Flat name -> handle lookup. Lives as long as the engine.
#[derive(Debug, Default)]
pub struct TextureRegistry {
    entries: Vec<NamedTexture>,
    by_name: HashMap<String, usize>,
}

impl TextureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `path` under `name`. Names are case-sensitive and unique.
    pub fn register(
        &mut self,
        path: impl Into<PathBuf>,
        name: impl Into<String>,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        if self.by_name.contains_key(&name) {
            return Err(RegistryError::DuplicateName(name));
        }
        self.by_name.insert(name.clone(), self.entries.len());
        self.entries.push(NamedTexture {
            name,
            path: path.into(),
            handle: TextureHandle::UNLOADED,
        });
        Ok(())
    }

    /// Load every unloaded entry in registration order, stopping at the
    /// first failure.
    pub fn load_all<L: TextureLoader + ?Sized>(&mut self, loader: &mut L) -> Result<(), LoadError> {
        for entry in self.entries.iter_mut().filter(|e| !e.handle.is_loaded()) {
            match loader.load_texture(&entry.path) {
                Ok(handle) => {
                    log::info!(
                        "Loaded texture '{}' from {} as {handle}",
                        entry.name,
                        entry.path.display()
                    );
                    entry.handle = handle;
                }
                Err(e) => {
                    log::error!("Failed to load texture '{}': {e}", entry.name);
                    return Err(e);
                }
            }
        }
        Ok(())
    }

    /// Handle for `name`, if it is registered and loaded.
    pub fn lookup(&self, name: &str) -> Option<TextureHandle> {
        let entry = &self.entries[*self.by_name.get(name)?];
        entry.handle.is_loaded().then_some(entry.handle)
    }

    pub fn is_loaded(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NamedTexture> {
        self.entries.iter()
    }
}
