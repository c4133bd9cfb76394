//! Self-spreading grass.
//!
//! A tuft starts as a point, grows a little every tick until it reaches full
//! size, and from then on plants a new tuft nearby every `cooldown` seconds,
//! as long as the meadow holds fewer than `population_limit` tufts.

use std::rc::Rc;

use meadow::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

/// Tuning shared by every tuft. Read from the `"grass"` section of the
/// config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrassSettings {
    /// Growth added per tick, toward `1.0`.
    pub growth_rate: f32,
    pub max_width: f32,
    pub max_height: f32,
    /// Seconds between reproductions, drawn once per tuft.
    pub cooldown_min: f32,
    pub cooldown_max: f32,
    /// Children land within this many pixels of the parent on each axis.
    pub spread_radius: f32,
    pub population_limit: usize,
    pub texture: String,
}

impl Default for GrassSettings {
    fn default() -> Self {
        Self {
            growth_rate: 0.001,
            max_width: 256.0 * 0.3,
            max_height: 247.0 * 0.3,
            cooldown_min: 3.0,
            cooldown_max: 15.0,
            spread_radius: 150.0,
            population_limit: 10,
            texture: "grass1".into(),
        }
    }
}

pub struct Grass {
    settings: Rc<GrassSettings>,
    bounds: Rect,
    growth: f32,
    cooldown: f32,
    last_reproduction: Option<f32>,
    texture: Option<TextureHandle>,
    rng: StdRng,
}

impl Grass {
    /// A seedling centered on `(x, y)`.
    pub fn new(x: f32, y: f32, settings: Rc<GrassSettings>, mut rng: StdRng) -> Self {
        let (lo, hi) = if settings.cooldown_min <= settings.cooldown_max {
            (settings.cooldown_min, settings.cooldown_max)
        } else {
            (settings.cooldown_max, settings.cooldown_min)
        };
        let cooldown = rng.gen_range(lo..=hi);
        Self {
            settings,
            bounds: Rect::new(x, y, 0.0, 0.0),
            growth: 0.0,
            cooldown,
            last_reproduction: None,
            texture: None,
            rng,
        }
    }

    pub fn seeded(x: f32, y: f32, settings: Rc<GrassSettings>, seed: u64) -> Self {
        Self::new(x, y, settings, StdRng::seed_from_u64(seed))
    }

    pub fn growth(&self) -> f32 {
        self.growth
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn cooldown(&self) -> f32 {
        self.cooldown
    }

    /// Engine time (seconds) of the most recent reproduction.
    pub fn last_reproduction(&self) -> Option<f32> {
        self.last_reproduction
    }

    fn grow(&mut self) {
        self.growth = (self.growth + self.settings.growth_rate.max(0.0)).min(1.0);
        self.bounds.resize_centered(
            (self.settings.max_width * self.growth).max(0.0),
            (self.settings.max_height * self.growth).max(0.0),
        );
    }

    fn ready_to_reproduce(&self, ctx: &EntityCtx<'_>, now: f32) -> bool {
        if self.growth < 1.0 || ctx.count::<Grass>() >= self.settings.population_limit {
            return false;
        }
        match self.last_reproduction {
            None => true,
            Some(last) => now - last >= self.cooldown,
        }
    }

    fn reproduce(&mut self, ctx: &mut EntityCtx<'_>, now: f32) -> EntityId {
        self.last_reproduction = Some(now);

        let r = self.settings.spread_radius.abs();
        let (x, y) = (self.bounds.x, self.bounds.y);
        let child_x = self.rng.gen_range(x - r..=x + r).max(0.0);
        let child_y = self.rng.gen_range(y - r..=y + r).max(0.0);

        let child = Grass::seeded(
            child_x,
            child_y,
            Rc::clone(&self.settings),
            self.rng.next_u64(),
        );
        let id = ctx.spawn(child);
        log::debug!(
            "Grass {} planted {id} at ({child_x:.1}, {child_y:.1}), population {}",
            ctx.id(),
            ctx.count::<Grass>()
        );
        id
    }
}

impl Entity for Grass {
    fn start(&mut self, ctx: &mut EntityCtx<'_>) {
        self.texture = ctx.texture(&self.settings.texture);
        if self.texture.is_none() {
            log::error!(
                "Failed to load grass texture: {} not found",
                self.settings.texture
            );
        }
    }

    fn update(&mut self, ctx: &mut EntityCtx<'_>, _dt: f32) -> anyhow::Result<()> {
        self.grow();
        let now = ctx.time().elapsed_secs();
        if self.ready_to_reproduce(ctx, now) {
            self.reproduce(ctx, now);
        }
        Ok(())
    }

    fn render(&self, ctx: &mut RenderCtx<'_>) -> anyhow::Result<()> {
        if let Some(texture) = self.texture {
            ctx.draw(texture, self.bounds);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn textures() -> TextureRegistry {
        let mut textures = TextureRegistry::new();
        textures.register("assets/grass1.png", "grass1").unwrap();
        textures
            .load_all(&mut HeadlessBackend::new(800, 600))
            .unwrap();
        textures
    }

    fn at(secs: f32, frame: u64) -> Time {
        Time::new(
            Duration::from_millis(16),
            Duration::from_secs_f32(secs),
            frame,
        )
    }

    /// Full-grown after one tick, fixed five second cooldown.
    fn eager() -> Rc<GrassSettings> {
        Rc::new(GrassSettings {
            growth_rate: 1.0,
            cooldown_min: 5.0,
            cooldown_max: 5.0,
            ..GrassSettings::default()
        })
    }

    #[test]
    fn growth_is_monotonic_and_capped() {
        let settings = Rc::new(GrassSettings {
            growth_rate: 0.003,
            population_limit: 1,
            ..GrassSettings::default()
        });
        let textures = textures();
        let mut scene = Scene::new();
        let id = scene.add_entity(Grass::seeded(200.0, 150.0, settings, 1), &textures);

        let mut previous = 0.0;
        for frame in 1..=1000 {
            scene.update_all(at(frame as f32 * 0.016, frame), &textures);
            let grass = scene.get::<Grass>(id).unwrap();
            assert!(grass.growth() >= previous);
            assert!(grass.growth() <= 1.0);
            assert!(grass.bounds().w >= 0.0 && grass.bounds().h >= 0.0);
            previous = grass.growth();
        }

        let grass = scene.get::<Grass>(id).unwrap();
        assert_eq!(grass.growth(), 1.0);
        assert!((grass.bounds().w - 256.0 * 0.3).abs() < 1e-3);
        let center = grass.bounds().center();
        assert!((center.x - 200.0).abs() < 1e-3 && (center.y - 150.0).abs() < 1e-3);
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn cooldown_spaces_out_reproduction() {
        let textures = textures();
        let mut scene = Scene::new();
        let id = scene.add_entity(Grass::seeded(300.0, 300.0, eager(), 7), &textures);
        assert_eq!(scene.get::<Grass>(id).unwrap().cooldown(), 5.0);

        scene.update_all(at(0.0, 1), &textures);
        assert_eq!(scene.get::<Grass>(id).unwrap().last_reproduction(), Some(0.0));

        scene.update_all(at(2.0, 2), &textures);
        scene.update_all(at(4.0, 3), &textures);
        assert_eq!(scene.get::<Grass>(id).unwrap().last_reproduction(), Some(0.0));

        scene.update_all(at(6.0, 4), &textures);
        assert_eq!(scene.get::<Grass>(id).unwrap().last_reproduction(), Some(6.0));
    }

    #[test]
    fn child_appears_next_frame_near_parent() {
        let textures = textures();
        let mut scene = Scene::new();
        scene.add_entity(Grass::seeded(0.0, 0.0, eager(), 3), &textures);

        scene.update_all(at(0.0, 1), &textures);
        assert_eq!(scene.len(), 1);
        assert_eq!(scene.count::<Grass>(), 2);

        scene.update_all(at(0.016, 2), &textures);
        assert_eq!(scene.len(), 2);
        let (_, child) = scene.iter_of::<Grass>().nth(1).unwrap();
        let center = child.bounds().center();
        assert!((0.0..=150.0).contains(&center.x));
        assert!((0.0..=150.0).contains(&center.y));
    }

    #[test]
    fn full_meadow_does_not_grow() {
        let settings = eager();
        let textures = textures();
        let mut scene = Scene::new();
        for seed in 0..10 {
            scene.add_entity(
                Grass::seeded(100.0, 100.0, Rc::clone(&settings), seed),
                &textures,
            );
        }

        scene.update_all(at(0.0, 1), &textures);
        scene.update_all(at(10.0, 2), &textures);
        assert_eq!(scene.count::<Grass>(), 10);
        assert_eq!(scene.len(), 10);
        assert!(scene.iter_of::<Grass>().all(|(_, g)| g.last_reproduction().is_none()));
    }

    #[test]
    fn same_frame_reproduction_respects_the_limit() {
        let settings = eager();
        let textures = textures();
        let mut scene = Scene::new();
        for seed in 0..9 {
            scene.add_entity(
                Grass::seeded(100.0, 100.0, Rc::clone(&settings), seed),
                &textures,
            );
        }

        // All nine are full-grown and eligible in the same update pass.
        scene.update_all(at(0.0, 1), &textures);
        assert_eq!(scene.count::<Grass>(), 10);

        scene.update_all(at(0.016, 2), &textures);
        assert_eq!(scene.len(), 10);
        let parents = scene
            .iter_of::<Grass>()
            .filter(|(_, g)| g.last_reproduction().is_some())
            .count();
        assert_eq!(parents, 1);
    }

    #[test]
    fn missing_texture_draws_nothing() {
        let textures = TextureRegistry::new();
        let mut scene = Scene::new();
        scene.add_entity(Grass::seeded(10.0, 10.0, eager(), 0), &textures);

        let mut backend = HeadlessBackend::new(800, 600);
        scene.update_all(at(0.0, 1), &textures);
        scene.render_all(&mut backend, (800, 600), &textures);
        assert!(backend.draws().is_empty());
    }

    #[test]
    fn inverted_cooldown_range_is_accepted() {
        let settings = Rc::new(GrassSettings {
            cooldown_min: 15.0,
            cooldown_max: 3.0,
            ..GrassSettings::default()
        });
        let grass = Grass::seeded(0.0, 0.0, settings, 11);
        assert!((3.0..=15.0).contains(&grass.cooldown()));
    }

    #[test]
    fn negative_max_size_is_clamped_to_zero() {
        let settings: GrassSettings =
            serde_json::from_str(r#"{ "max_width": -50.0, "growth_rate": 1.0 }"#).unwrap();
        let textures = textures();
        let mut scene = Scene::new();
        let id = scene.add_entity(Grass::seeded(150.0, 100.0, Rc::new(settings), 3), &textures);

        scene.update_all(at(0.0, 1), &textures);
        let bounds = scene.get::<Grass>(id).unwrap().bounds();
        assert_eq!(bounds.w, 0.0);
        assert!(bounds.h > 0.0);
        assert!((bounds.center().x - 150.0).abs() < 1e-3);
    }

    #[test]
    fn settings_fill_in_defaults() {
        let settings: GrassSettings =
            serde_json::from_str(r#"{ "population_limit": 25, "texture": "grass2" }"#).unwrap();
        assert_eq!(settings.population_limit, 25);
        assert_eq!(settings.texture, "grass2");
        assert_eq!(settings.growth_rate, 0.001);
        assert_eq!(settings.spread_radius, 150.0);
    }
}
