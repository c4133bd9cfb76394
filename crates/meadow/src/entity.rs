//! # Entities
//!
//! Anything that lives in the [`Scene`](crate::scene::Scene) implements
//! [`Entity`]: four lifecycle callbacks the scene calls in a fixed order.
//!
//! ```text
//! spawn ──► start ──► update(dt) ─► render ─► update(dt) ─► render ... ──► destroy
//!                     └──────── one pair per frame ────────┘
//! ```
//!
//! Entities do not keep a pointer back to the engine. Each callback receives
//! a context instead:
//!
//! - [`EntityCtx`] in `start`/`update`: frame time, texture lookup, and the
//!   scene's spawn/despawn/census API.
//! - [`RenderCtx`] in `render`: the canvas, the viewport size and texture
//!   lookup.
//!
//! Errors returned from `update` or `render` are logged by the scene and do
//! not stop the frame.

use std::any::{Any, TypeId};
use std::fmt;

use crate::error::SceneError;
use crate::math::Rect;
use crate::platform::Canvas;
use crate::scene::Roster;
use crate::texture::{TextureHandle, TextureRegistry};
use crate::time::Time;

/// Identity of an entity within one scene. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u64);

impl EntityId {
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Downcasting support for [`Entity`] trait objects.
///
/// Implemented for every `'static` type; you never implement it yourself.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A participant in the frame loop.
pub trait Entity: AsAny {
    /// Called once, right after the entity joins the scene.
    fn start(&mut self, _ctx: &mut EntityCtx<'_>) {}

    /// Called once per frame with the seconds since the previous frame.
    fn update(&mut self, ctx: &mut EntityCtx<'_>, dt: f32) -> anyhow::Result<()>;

    /// Called once per frame after every entity has been updated.
    fn render(&self, ctx: &mut RenderCtx<'_>) -> anyhow::Result<()>;

    /// Called once, immediately before the entity leaves the scene.
    fn destroy(&mut self) {}
}

/// What an entity can see and do during `start` and `update`.
pub struct EntityCtx<'a> {
    id: EntityId,
    time: Time,
    textures: &'a TextureRegistry,
    roster: &'a mut Roster,
}

impl<'a> EntityCtx<'a> {
    pub(crate) fn new(
        id: EntityId,
        time: Time,
        textures: &'a TextureRegistry,
        roster: &'a mut Roster,
    ) -> Self {
        Self {
            id,
            time,
            textures,
            roster,
        }
    }

    /// The entity being called.
    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn time(&self) -> Time {
        self.time
    }

    pub fn textures(&self) -> &TextureRegistry {
        self.textures
    }

    /// Shorthand for `textures().lookup(name)`.
    pub fn texture(&self, name: &str) -> Option<TextureHandle> {
        self.textures.lookup(name)
    }

    /// Queue `entity` for insertion. It is started at the next frame start
    /// and first updated in that frame.
    pub fn spawn<E: Entity>(&mut self, entity: E) -> EntityId {
        self.roster.spawn(entity)
    }

    /// Queue `id` for removal. It receives no further calls; its `destroy`
    /// runs at the next frame start.
    pub fn despawn(&mut self, id: EntityId) -> Result<(), SceneError> {
        self.roster.despawn(id)
    }

    /// Queue the calling entity for removal.
    pub fn despawn_self(&mut self) -> Result<(), SceneError> {
        self.roster.despawn(self.id)
    }

    /// Live entities of type `E`, counting queued spawns and excluding queued
    /// removals.
    pub fn count<E: Entity>(&self) -> usize {
        self.roster.count_of(TypeId::of::<E>())
    }

    /// Live entities of any type, with the same accounting as [`count`](Self::count).
    pub fn population(&self) -> usize {
        self.roster.population()
    }

    pub fn is_alive(&self, id: EntityId) -> bool {
        self.roster.is_alive(id)
    }
}

/// What an entity can see and do during `render`.
pub struct RenderCtx<'a> {
    id: EntityId,
    canvas: &'a mut dyn Canvas,
    viewport: (u32, u32),
    textures: &'a TextureRegistry,
}

impl<'a> RenderCtx<'a> {
    pub(crate) fn new(
        id: EntityId,
        canvas: &'a mut dyn Canvas,
        viewport: (u32, u32),
        textures: &'a TextureRegistry,
    ) -> Self {
        Self {
            id,
            canvas,
            viewport,
            textures,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Drawable area in pixels.
    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    pub fn textures(&self) -> &TextureRegistry {
        self.textures
    }

    /// Draw `texture` over `rect` (pixels, top-left origin).
    pub fn draw(&mut self, texture: TextureHandle, rect: Rect) {
        self.canvas.draw_textured_rect(texture, rect, self.viewport);
    }
}
