//! Convenience re-exports: `use meadow::prelude::*` for the common items.

pub use crate::config::{EngineConfig, LogConfig, TextureEntry, WindowConfig, read_json};
pub use crate::desktop::Desktop;
pub use crate::engine::Engine;
pub use crate::entity::{Entity, EntityCtx, EntityId, RenderCtx};
pub use crate::error::{ConfigError, LoadError, RegistryError, SceneError, StartupError};
pub use crate::headless::HeadlessBackend;
pub use crate::input::KeyCode;
pub use crate::math::{Rect, Vec2};
pub use crate::platform::{Backend, Canvas, TextureLoader, Window};
pub use crate::scene::Scene;
pub use crate::texture::{TextureHandle, TextureRegistry};
pub use crate::time::{Clock, ManualTime, Time, TimeSource, WallTime};
