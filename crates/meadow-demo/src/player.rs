//! An apple sliding across the top of the window.

use meadow::prelude::*;

/// Horizontal speed in pixels per second.
const SPEED: f32 = 300.0;
const SIZE: f32 = 100.0;

pub struct Player {
    name: String,
    x: f32,
    texture: Option<TextureHandle>,
}

impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            x: 0.0,
            texture: None,
        }
    }

    pub fn x(&self) -> f32 {
        self.x
    }
}

impl Entity for Player {
    fn start(&mut self, ctx: &mut EntityCtx<'_>) {
        self.texture = ctx.texture("apple");
        match self.texture {
            Some(texture) => log::info!("{} ready with apple texture {texture}", self.name),
            None => log::error!("Failed to load apple texture for {}", self.name),
        }
    }

    fn update(&mut self, _ctx: &mut EntityCtx<'_>, dt: f32) -> anyhow::Result<()> {
        self.x += SPEED * dt;
        Ok(())
    }

    fn render(&self, ctx: &mut RenderCtx<'_>) -> anyhow::Result<()> {
        if let Some(texture) = self.texture {
            ctx.draw(texture, Rect::new(self.x, 0.0, SIZE, SIZE));
        }
        Ok(())
    }
}
