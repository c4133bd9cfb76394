//! # Scene: the ordered entity list
//!
//! The scene owns every live [`Entity`] in insertion order. That order is the
//! only ordering there is: entities update in it and render in it, so later
//! entities draw on top of earlier ones.
//!
//! ## Structural changes during a pass
//!
//! Entities can spawn and despawn other entities from inside `update` (grass
//! reproduces, for example). Mutating the list while iterating it would skip
//! or repeat elements, so requests made through [`EntityCtx`] are buffered in
//! the [`Roster`] and applied as one batch at the next frame start:
//!
//! ```text
//! frame N   update pass ── a.update() ─ spawn(c) ─ despawn(b)   (queued)
//!           render pass ── a.render()                           (b skipped)
//! frame N+1 frame start ── push c, c.start() ─ b.destroy(), drop b
//!           update pass ── a.update() ─ c.update()
//! ```
//!
//! A despawned entity stops receiving calls immediately; its `destroy` runs
//! when the batch is applied. The roster's census (`count`, `population`)
//! reflects queued spawns and despawns right away, so a population cap
//! checked by several entities in the same pass cannot be overshot.
//!
//! Outside of a pass, [`Scene::add_entity`] and [`Scene::remove_entity`] take
//! effect immediately.
//!
//! An entity whose `update` returns an error is logged and sits out the
//! render pass of that frame. It is updated again on the next frame.

use std::any::TypeId;
use std::collections::{HashMap, HashSet};

use crate::entity::{Entity, EntityCtx, EntityId, RenderCtx};
use crate::error::SceneError;
use crate::platform::Canvas;
use crate::texture::TextureRegistry;
use crate::time::Time;

struct Slot {
    id: EntityId,
    type_name: &'static str,
    entity: Box<dyn Entity>,
}

impl Slot {
    fn new<E: Entity>(id: EntityId, entity: E) -> Self {
        Self {
            id,
            type_name: std::any::type_name::<E>(),
            entity: Box::new(entity),
        }
    }

    fn label(&self) -> String {
        format!("{} {}", short_type_name(self.type_name), self.id)
    }
}

/// Id allocation, census and the queue of pending structural changes.
pub(crate) struct Roster {
    next_id: u64,
    alive: HashMap<EntityId, TypeId>,
    spawned: Vec<Slot>,
    despawned: Vec<EntityId>,
}

impl Roster {
    fn new() -> Self {
        Self {
            next_id: 0,
            alive: HashMap::new(),
            spawned: Vec::new(),
            despawned: Vec::new(),
        }
    }

    fn admit<E: Entity>(&mut self) -> EntityId {
        self.next_id += 1;
        let id = EntityId::from_raw(self.next_id);
        self.alive.insert(id, TypeId::of::<E>());
        id
    }

    pub(crate) fn spawn<E: Entity>(&mut self, entity: E) -> EntityId {
        let id = self.admit::<E>();
        self.spawned.push(Slot::new(id, entity));
        id
    }

    pub(crate) fn despawn(&mut self, id: EntityId) -> Result<(), SceneError> {
        if self.alive.remove(&id).is_none() {
            return Err(SceneError::NotFound(id));
        }
        self.despawned.push(id);
        Ok(())
    }

    pub(crate) fn count_of(&self, ty: TypeId) -> usize {
        self.alive.values().filter(|t| **t == ty).count()
    }

    pub(crate) fn population(&self) -> usize {
        self.alive.len()
    }

    pub(crate) fn is_alive(&self, id: EntityId) -> bool {
        self.alive.contains_key(&id)
    }

    fn reset(&mut self) {
        self.alive.clear();
        self.spawned.clear();
        self.despawned.clear();
    }
}

/// The ordered collection of live entities.
pub struct Scene {
    slots: Vec<Slot>,
    roster: Roster,
    time: Time,
    /// Entities whose `update` failed this frame.
    failed: HashSet<EntityId>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            roster: Roster::new(),
            time: Time::default(),
            failed: HashSet::new(),
        }
    }

    /// Append `entity` and start it immediately.
    pub fn add_entity<E: Entity>(&mut self, entity: E, textures: &TextureRegistry) -> EntityId {
        let id = self.roster.admit::<E>();
        self.slots.push(Slot::new(id, entity));
        let index = self.slots.len() - 1;
        self.start_at(index, textures);
        id
    }

    /// Destroy and remove `id` immediately.
    ///
    /// An entity whose spawn is still queued is removed at the next frame
    /// start instead (after its `start`). Removing the same id twice is a
    /// [`SceneError::NotFound`] and never destroys twice.
    pub fn remove_entity(&mut self, id: EntityId) -> Result<(), SceneError> {
        self.roster.despawn(id)?;
        if let Some(index) = self.position(id) {
            self.roster.despawned.retain(|queued| *queued != id);
            self.destroy_at(index);
        }
        Ok(())
    }

    /// Frame start plus update pass.
    ///
    /// Applies queued spawns (push + `start`) and despawns (`destroy` + drop),
    /// then calls `update` on every live entity in list order. Entities spawned
    /// during this pass wait for the next frame. An entity whose `update`
    /// fails is skipped by the following [`render_all`](Self::render_all).
    pub fn update_all(&mut self, time: Time, textures: &TextureRegistry) {
        self.time = time;
        self.failed.clear();
        self.apply_pending(textures);

        let dt = time.delta_secs();
        for slot in &mut self.slots {
            if !self.roster.is_alive(slot.id) {
                continue;
            }
            let mut ctx = EntityCtx::new(slot.id, time, textures, &mut self.roster);
            if let Err(e) = slot.entity.update(&mut ctx, dt) {
                log::error!("{} update failed: {e:#}", slot.label());
                self.failed.insert(slot.id);
            }
        }
    }

    /// Render pass: `render` on every live entity in list order, except those
    /// whose `update` failed this frame.
    pub fn render_all(
        &self,
        canvas: &mut dyn Canvas,
        viewport: (u32, u32),
        textures: &TextureRegistry,
    ) {
        for slot in &self.slots {
            if !self.roster.is_alive(slot.id) || self.failed.contains(&slot.id) {
                continue;
            }
            let mut ctx = RenderCtx::new(slot.id, &mut *canvas, viewport, textures);
            if let Err(e) = slot.entity.render(&mut ctx) {
                log::error!("{} render failed: {e:#}", slot.label());
            }
        }
    }

    /// Destroy every entity in list order and forget queued changes.
    ///
    /// Queued spawns were never started, so they are dropped without a
    /// `destroy`.
    pub fn clear(&mut self) {
        for mut slot in self.slots.drain(..) {
            slot.entity.destroy();
        }
        self.roster.reset();
        self.failed.clear();
    }

    fn apply_pending(&mut self, textures: &TextureRegistry) {
        let spawned = std::mem::take(&mut self.roster.spawned);
        for slot in spawned {
            self.slots.push(slot);
            let index = self.slots.len() - 1;
            self.start_at(index, textures);
        }

        let despawned = std::mem::take(&mut self.roster.despawned);
        for id in despawned {
            if let Some(index) = self.position(id) {
                self.destroy_at(index);
            }
        }
    }

    fn start_at(&mut self, index: usize, textures: &TextureRegistry) {
        let slot = &mut self.slots[index];
        let mut ctx = EntityCtx::new(slot.id, self.time, textures, &mut self.roster);
        slot.entity.start(&mut ctx);
        log::debug!("Started {}", slot.label());
    }

    fn destroy_at(&mut self, index: usize) {
        self.slots[index].entity.destroy();
        let slot = self.slots.remove(index);
        log::debug!("Destroyed {}", slot.label());
    }

    fn position(&self, id: EntityId) -> Option<usize> {
        self.slots.iter().position(|slot| slot.id == id)
    }

    /// Entities in the list, including ones whose removal is queued.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Ids in list (update/render) order.
    pub fn ids(&self) -> Vec<EntityId> {
        self.slots.iter().map(|slot| slot.id).collect()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.position(id).is_some()
    }

    /// Live entities of type `E`, counting queued spawns.
    pub fn count<E: Entity>(&self) -> usize {
        self.roster.count_of(TypeId::of::<E>())
    }

    pub fn population(&self) -> usize {
        self.roster.population()
    }

    /// Borrow entity `id` as its concrete type.
    pub fn get<E: Entity>(&self, id: EntityId) -> Option<&E> {
        let slot = &self.slots[self.position(id)?];
        let entity: &dyn Entity = &*slot.entity;
        entity.as_any().downcast_ref::<E>()
    }

    pub fn get_mut<E: Entity>(&mut self, id: EntityId) -> Option<&mut E> {
        let index = self.position(id)?;
        let entity: &mut dyn Entity = &mut *self.slots[index].entity;
        entity.as_any_mut().downcast_mut::<E>()
    }

    /// Every entity of type `E` in the list, in order.
    pub fn iter_of<E: Entity>(&self) -> impl Iterator<Item = (EntityId, &E)> {
        self.slots.iter().filter_map(|slot| {
            let entity: &dyn Entity = &*slot.entity;
            entity.as_any().downcast_ref::<E>().map(|e| (slot.id, e))
        })
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

/// `"meadow_demo::grass::Grass"` -> `"Grass"`, `"a::Wrapper<b::Inner>"` -> `"Wrapper<Inner>"`.
fn short_type_name(full: &str) -> String {
    if let Some(angle) = full.find('<') {
        let prefix = &full[..angle];
        let short_prefix = prefix.rsplit("::").next().unwrap_or(prefix);
        let inner = &full[angle + 1..full.len() - 1];
        format!("{}<{}>", short_prefix, short_type_name(inner))
    } else {
        full.rsplit("::").next().unwrap_or(full).to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    use super::*;
    use crate::headless::HeadlessBackend;

    type Journal = Rc<RefCell<Vec<String>>>;
    type Hook = Box<dyn FnMut(&mut EntityCtx<'_>) -> anyhow::Result<()>>;

    /// Records every lifecycle call into a shared journal.
    struct Probe {
        name: &'static str,
        journal: Journal,
        on_update: Option<Hook>,
        fail_render: bool,
    }

    impl Probe {
        fn new(name: &'static str, journal: &Journal) -> Self {
            Self {
                name,
                journal: Rc::clone(journal),
                on_update: None,
                fail_render: false,
            }
        }

        fn on_update(
            mut self,
            hook: impl FnMut(&mut EntityCtx<'_>) -> anyhow::Result<()> + 'static,
        ) -> Self {
            self.on_update = Some(Box::new(hook));
            self
        }

        fn log(&self, event: &str) {
            self.journal.borrow_mut().push(format!("{event}:{}", self.name));
        }
    }

    impl Entity for Probe {
        fn start(&mut self, _ctx: &mut EntityCtx<'_>) {
            self.log("start");
        }

        fn update(&mut self, ctx: &mut EntityCtx<'_>, _dt: f32) -> anyhow::Result<()> {
            self.log("update");
            match self.on_update.as_mut() {
                Some(hook) => hook(ctx),
                None => Ok(()),
            }
        }

        fn render(&self, _ctx: &mut RenderCtx<'_>) -> anyhow::Result<()> {
            self.log("render");
            if self.fail_render {
                anyhow::bail!("nothing to draw");
            }
            Ok(())
        }

        fn destroy(&mut self) {
            self.log("destroy");
        }
    }

    struct Other;

    impl Entity for Other {
        fn update(&mut self, _ctx: &mut EntityCtx<'_>, _dt: f32) -> anyhow::Result<()> {
            Ok(())
        }

        fn render(&self, _ctx: &mut RenderCtx<'_>) -> anyhow::Result<()> {
            Ok(())
        }
    }

    fn frame(scene: &mut Scene, textures: &TextureRegistry, n: u64) {
        let time = Time::new(Duration::from_millis(16), Duration::from_millis(16 * n), n);
        let mut canvas = HeadlessBackend::new(320, 240);
        scene.update_all(time, textures);
        scene.render_all(&mut canvas, (320, 240), textures);
    }

    fn take(journal: &Journal) -> Vec<String> {
        std::mem::take(&mut *journal.borrow_mut())
    }

    #[test]
    fn passes_run_in_insertion_order() {
        let journal = Journal::default();
        let textures = TextureRegistry::new();
        let mut scene = Scene::new();
        scene.add_entity(Probe::new("a", &journal), &textures);
        scene.add_entity(Probe::new("b", &journal), &textures);
        assert_eq!(take(&journal), ["start:a", "start:b"]);

        frame(&mut scene, &textures, 1);
        assert_eq!(take(&journal), ["update:a", "update:b", "render:a", "render:b"]);
    }

    #[test]
    fn spawn_during_update_waits_for_next_frame() {
        let journal = Journal::default();
        let textures = TextureRegistry::new();
        let mut scene = Scene::new();
        let child_journal = Rc::clone(&journal);
        let mut spawned = false;
        scene.add_entity(
            Probe::new("a", &journal).on_update(move |ctx| {
                if !spawned {
                    spawned = true;
                    ctx.spawn(Probe::new("c", &child_journal));
                }
                Ok(())
            }),
            &textures,
        );
        scene.add_entity(Probe::new("b", &journal), &textures);
        take(&journal);

        frame(&mut scene, &textures, 1);
        assert_eq!(take(&journal), ["update:a", "update:b", "render:a", "render:b"]);
        assert_eq!(scene.len(), 2);
        assert_eq!(scene.count::<Probe>(), 3);

        frame(&mut scene, &textures, 2);
        assert_eq!(
            take(&journal),
            ["start:c", "update:a", "update:b", "update:c", "render:a", "render:b", "render:c"]
        );
        assert_eq!(scene.len(), 3);
    }

    #[test]
    fn despawn_during_update_silences_target_then_destroys_at_frame_start() {
        let journal = Journal::default();
        let textures = TextureRegistry::new();
        let mut scene = Scene::new();
        let a = scene.add_entity(Probe::new("a", &journal), &textures);
        // Ids are sequential: b gets a+1, c gets a+2.
        let target = EntityId::from_raw(a.raw() + 2);
        scene.add_entity(
            Probe::new("b", &journal).on_update(move |ctx| {
                if ctx.is_alive(target) {
                    ctx.despawn(target)?;
                }
                Ok(())
            }),
            &textures,
        );
        scene.add_entity(Probe::new("c", &journal), &textures);
        take(&journal);

        // b removes c (later in the list) while the pass is running.
        frame(&mut scene, &textures, 1);
        assert_eq!(take(&journal), ["update:a", "update:b", "render:a", "render:b"]);
        assert!(scene.contains(target));

        frame(&mut scene, &textures, 2);
        assert_eq!(
            take(&journal),
            ["destroy:c", "update:a", "update:b", "render:a", "render:b"]
        );
        assert!(!scene.contains(target));
    }

    #[test]
    fn despawning_an_earlier_entity_skips_its_render() {
        let journal = Journal::default();
        let textures = TextureRegistry::new();
        let mut scene = Scene::new();
        let a = scene.add_entity(Probe::new("a", &journal), &textures);
        scene.add_entity(
            Probe::new("b", &journal).on_update(move |ctx| {
                let _ = ctx.despawn(a);
                Ok(())
            }),
            &textures,
        );
        take(&journal);

        frame(&mut scene, &textures, 1);
        assert_eq!(take(&journal), ["update:a", "update:b", "render:b"]);
        frame(&mut scene, &textures, 2);
        assert_eq!(take(&journal), ["destroy:a", "update:b", "render:b"]);
    }

    #[test]
    fn despawn_twice_in_a_pass_is_reported() {
        let textures = TextureRegistry::new();
        let journal = Journal::default();
        let outcomes = Rc::new(RefCell::new(Vec::new()));
        let seen = Rc::clone(&outcomes);
        let mut scene = Scene::new();
        let victim = scene.add_entity(Probe::new("v", &journal), &textures);
        scene.add_entity(
            Probe::new("k", &journal).on_update(move |ctx| {
                seen.borrow_mut().push(ctx.despawn(victim));
                seen.borrow_mut().push(ctx.despawn(victim));
                Ok(())
            }),
            &textures,
        );

        frame(&mut scene, &textures, 1);
        frame(&mut scene, &textures, 2);
        let outcomes = outcomes.borrow();
        assert_eq!(outcomes[0], Ok(()));
        assert_eq!(outcomes[1], Err(SceneError::NotFound(victim)));
        let destroys = journal.borrow().iter().filter(|e| *e == "destroy:v").count();
        assert_eq!(destroys, 1);
    }

    #[test]
    fn remove_entity_is_idempotent() {
        let journal = Journal::default();
        let textures = TextureRegistry::new();
        let mut scene = Scene::new();
        let a = scene.add_entity(Probe::new("a", &journal), &textures);
        take(&journal);

        assert_eq!(scene.remove_entity(a), Ok(()));
        assert_eq!(scene.remove_entity(a), Err(SceneError::NotFound(a)));
        assert_eq!(take(&journal), ["destroy:a"]);
        assert!(scene.is_empty());

        let unknown = EntityId::from_raw(999);
        assert_eq!(scene.remove_entity(unknown), Err(SceneError::NotFound(unknown)));
    }

    #[test]
    fn failed_update_skips_render_but_not_the_pass() {
        let journal = Journal::default();
        let textures = TextureRegistry::new();
        let mut scene = Scene::new();
        scene.add_entity(
            Probe::new("a", &journal).on_update(|_| anyhow::bail!("texture missing")),
            &textures,
        );
        let mut b = Probe::new("b", &journal);
        b.fail_render = true;
        scene.add_entity(b, &textures);
        scene.add_entity(Probe::new("c", &journal), &textures);
        take(&journal);

        frame(&mut scene, &textures, 1);
        assert_eq!(
            take(&journal),
            ["update:a", "update:b", "update:c", "render:b", "render:c"]
        );
    }

    #[test]
    fn failed_update_only_costs_one_frame() {
        let journal = Journal::default();
        let textures = TextureRegistry::new();
        let mut scene = Scene::new();
        let mut calls = 0;
        scene.add_entity(
            Probe::new("a", &journal).on_update(move |_| {
                calls += 1;
                if calls == 1 {
                    anyhow::bail!("first frame only");
                }
                Ok(())
            }),
            &textures,
        );
        take(&journal);

        frame(&mut scene, &textures, 1);
        assert_eq!(take(&journal), ["update:a"]);

        frame(&mut scene, &textures, 2);
        assert_eq!(take(&journal), ["update:a", "render:a"]);
    }

    #[test]
    fn census_tracks_queued_changes() {
        let journal = Journal::default();
        let textures = TextureRegistry::new();
        let mut scene = Scene::new();
        scene.add_entity(Other, &textures);
        let spawner_journal = Rc::clone(&journal);
        let counts = Rc::new(RefCell::new(Vec::new()));
        let seen = Rc::clone(&counts);
        scene.add_entity(
            Probe::new("p", &journal).on_update(move |ctx| {
                seen.borrow_mut().push(ctx.count::<Probe>());
                ctx.spawn(Probe::new("q", &spawner_journal));
                seen.borrow_mut().push(ctx.count::<Probe>());
                ctx.despawn_self()?;
                seen.borrow_mut().push(ctx.count::<Probe>());
                seen.borrow_mut().push(ctx.population());
                Ok(())
            }),
            &textures,
        );

        frame(&mut scene, &textures, 1);
        assert_eq!(*counts.borrow(), [1, 2, 1, 2]);
        assert_eq!(scene.count::<Other>(), 1);
    }

    #[test]
    fn spawn_then_despawn_in_same_frame_starts_and_destroys_once() {
        let journal = Journal::default();
        let textures = TextureRegistry::new();
        let mut scene = Scene::new();
        let child_journal = Rc::clone(&journal);
        let mut done = false;
        scene.add_entity(
            Probe::new("a", &journal).on_update(move |ctx| {
                if !done {
                    done = true;
                    let id = ctx.spawn(Probe::new("ghost", &child_journal));
                    ctx.despawn(id)?;
                }
                Ok(())
            }),
            &textures,
        );
        take(&journal);

        frame(&mut scene, &textures, 1);
        frame(&mut scene, &textures, 2);
        assert_eq!(
            take(&journal),
            [
                "update:a",
                "render:a",
                "start:ghost",
                "destroy:ghost",
                "update:a",
                "render:a"
            ]
        );
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn clear_destroys_everything_in_order() {
        let journal = Journal::default();
        let textures = TextureRegistry::new();
        let mut scene = Scene::new();
        scene.add_entity(Probe::new("a", &journal), &textures);
        scene.add_entity(Probe::new("b", &journal), &textures);
        take(&journal);

        scene.clear();
        assert_eq!(take(&journal), ["destroy:a", "destroy:b"]);
        assert_eq!(scene.population(), 0);
    }

    #[test]
    fn typed_access() {
        let journal = Journal::default();
        let textures = TextureRegistry::new();
        let mut scene = Scene::new();
        let a = scene.add_entity(Probe::new("a", &journal), &textures);
        let o = scene.add_entity(Other, &textures);

        assert_eq!(scene.get::<Probe>(a).map(|p| p.name), Some("a"));
        assert!(scene.get::<Probe>(o).is_none());
        scene.get_mut::<Probe>(a).unwrap().name = "renamed";
        assert_eq!(scene.iter_of::<Probe>().count(), 1);
        assert_eq!(scene.iter_of::<Probe>().next().unwrap().1.name, "renamed");
        assert_eq!(scene.ids(), vec![a, o]);
    }

    #[test]
    fn short_names() {
        assert_eq!(short_type_name("meadow_demo::grass::Grass"), "Grass");
        assert_eq!(short_type_name("a::Wrap<b::c::Inner>"), "Wrap<Inner>");
    }
}
