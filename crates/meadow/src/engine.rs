//! The frame loop.
//!
//! [`Engine`] owns the backend, the clock, the texture registry and the
//! scene, and drives them in a fixed order every iteration:
//!
//! ```text
//! ┌► stop? ── yes ─► return
//! │    │ no
//! │  clock.tick()
//! │  backend.poll_events()   (Escape ─► request_close)
//! │  scene.update_all()      (frame start: queued spawns/despawns applied)
//! │  scene.render_all()
//! └─ backend.present_frame()
//! ```
//!
//! # Example
//!
//! ```ignore
//! use meadow::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = EngineConfig::load_or_default("meadow.json")?;
//!     let backend = Desktop::new(&config)?;
//!     let mut engine = Engine::from_config(backend, &config)?;
//!     engine.load_textures()?;
//!     engine.add_entity(MyEntity::default());
//!     engine.run();
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;

use crate::config::EngineConfig;
use crate::entity::{Entity, EntityId};
use crate::error::{LoadError, RegistryError, SceneError};
use crate::input::KeyCode;
use crate::platform::Backend;
use crate::scene::Scene;
use crate::texture::TextureRegistry;
use crate::time::Clock;

pub struct Engine<B: Backend> {
    backend: B,
    clock: Clock,
    textures: TextureRegistry,
    scene: Scene,
    escape_closes: bool,
}

impl<B: Backend> Engine<B> {
    /// An engine on wall-clock time with an empty registry and scene.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            clock: Clock::wall(),
            textures: TextureRegistry::new(),
            scene: Scene::new(),
            escape_closes: true,
        }
    }

    /// Register the config's textures and apply its loop settings.
    pub fn from_config(backend: B, config: &EngineConfig) -> Result<Self, RegistryError> {
        let mut engine = Self::new(backend);
        engine.escape_closes = config.escape_closes;
        for entry in &config.textures {
            engine.register_texture(&entry.path, &entry.name)?;
        }
        Ok(engine)
    }

    /// Replace the clock, e.g. with one driven by [`ManualTime`](crate::time::ManualTime).
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn set_escape_closes(&mut self, enabled: bool) {
        self.escape_closes = enabled;
    }

    pub fn register_texture(
        &mut self,
        path: impl Into<PathBuf>,
        name: impl Into<String>,
    ) -> Result<(), RegistryError> {
        self.textures.register(path, name)
    }

    /// Load every registered texture through the backend. Fail-fast.
    pub fn load_textures(&mut self) -> Result<(), LoadError> {
        self.textures.load_all(&mut self.backend)
    }

    /// Add an entity outside of the loop; it is started immediately.
    pub fn add_entity<E: Entity>(&mut self, entity: E) -> EntityId {
        self.scene.add_entity(entity, &self.textures)
    }

    pub fn remove_entity(&mut self, id: EntityId) -> Result<(), SceneError> {
        self.scene.remove_entity(id)
    }

    /// One loop iteration without the stop check.
    pub fn frame(&mut self) {
        self.clock.tick();

        self.backend.poll_events();
        if self.escape_closes
            && self.backend.is_key_pressed(KeyCode::Escape)
            && !self.backend.should_close()
        {
            log::info!("Escape pressed, closing");
            self.backend.request_close();
        }

        let time = self.clock.time();
        self.scene.update_all(time, &self.textures);

        let viewport = self.backend.viewport_size();
        self.scene.render_all(&mut self.backend, viewport, &self.textures);

        self.backend.present_frame();
    }

    /// Run frames until `stop` returns true. The predicate is checked before
    /// every frame, so one that is already true runs none. Returns the number
    /// of frames run.
    pub fn run_until(&mut self, mut stop: impl FnMut(&B) -> bool) -> u64 {
        let mut frames = 0;
        while !stop(&self.backend) {
            self.frame();
            frames += 1;
        }
        frames
    }

    /// Run until the window asks to close, then destroy every entity.
    pub fn run(&mut self) -> u64 {
        log::info!(
            "Entering frame loop with {} entities and {} textures",
            self.scene.len(),
            self.textures.len()
        );
        let frames = self.run_until(|backend| backend.should_close());
        log::info!("Frame loop stopped after {frames} frames");
        self.scene.clear();
        frames
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn textures(&self) -> &TextureRegistry {
        &self.textures
    }

    pub fn textures_mut(&mut self) -> &mut TextureRegistry {
        &mut self.textures
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    /// Tear down, returning the backend.
    pub fn into_backend(mut self) -> B {
        self.scene.clear();
        self.backend
    }
}
