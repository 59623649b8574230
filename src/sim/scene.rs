//! Entity registry, frame update and level transitions
//!
//! Per frame:
//! 1. Apply a pending level load (tear down, respawn from the level text)
//! 2. Update every live entity, newest first
//! 3. Drop every entity marked dead
//!
//! Entities are updated by index over a growing list, so an entity spawned
//! during the pass is appended behind the cursor and first runs next frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::behavior;
use super::entity::{Entity, EntityId, EntityKind};
use super::error::SimError;
use super::level::{LevelTransition, parse_level};
use super::movement;
use super::rect::Rect;
use crate::assets::AssetSource;
use crate::render::{RenderTarget, draw_entity};
use crate::settings::{HeroTuning, Settings};

/// Input snapshot for one frame, supplied by the host
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

/// The live entity set plus level state
pub struct Scene {
    /// Insertion order. A slot is `None` only while its entity is updating.
    entities: Vec<Option<Entity>>,
    assets: Box<dyn AssetSource>,
    transition: LevelTransition,
    current_level: Option<String>,
    input: FrameInput,
    tuning: HeroTuning,
    world_bounds: Rect,
    next_id: u32,
    frame: u64,
    /// Runs after each entity's own update
    #[cfg(test)]
    update_hook: Option<fn(&mut Entity, &mut Scene)>,
}

impl Scene {
    /// Empty scene with default settings
    pub fn new(assets: impl AssetSource + 'static) -> Self {
        Self::with_settings(assets, &Settings::default())
    }

    pub fn with_settings(assets: impl AssetSource + 'static, settings: &Settings) -> Self {
        Self {
            entities: Vec::new(),
            assets: Box::new(assets),
            transition: LevelTransition::Idle,
            current_level: None,
            input: FrameInput::default(),
            tuning: settings.hero,
            world_bounds: settings.world_bounds,
            next_id: 0,
            frame: 0,
            #[cfg(test)]
            update_hook: None,
        }
    }

    // ------------------------------------------------------------------
    // Registry
    // ------------------------------------------------------------------

    /// Append an entity and bind its assets
    pub fn spawn(&mut self, mut entity: Entity) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        entity.id = id;
        entity.create(self.assets.as_mut());
        self.entities.push(Some(entity));
        id
    }

    /// Live entities in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().flatten().find(|e| e.id == id)
    }

    /// First live entity matching `predicate`; the oldest surviving spawn wins
    pub fn find_first(&self, mut predicate: impl FnMut(&Entity) -> bool) -> Option<&Entity> {
        self.iter().find(|e| predicate(e))
    }

    pub fn find_first_mut(
        &mut self,
        mut predicate: impl FnMut(&Entity) -> bool,
    ) -> Option<&mut Entity> {
        self.entities.iter_mut().flatten().find(|e| predicate(e))
    }

    pub fn hero(&self) -> Option<&Entity> {
        self.find_first(Entity::is_hero)
    }

    /// Coins shown by the HUD, if one is live
    pub fn coins(&self) -> Option<u32> {
        match self.find_first(Entity::is_hud)?.kind {
            EntityKind::Hud { coins } => Some(coins),
            _ => None,
        }
    }

    // ------------------------------------------------------------------
    // Frame
    // ------------------------------------------------------------------

    pub fn set_input(&mut self, input: FrameInput) {
        self.input = input;
    }

    pub fn input(&self) -> &FrameInput {
        &self.input
    }

    pub fn tuning(&self) -> &HeroTuning {
        &self.tuning
    }

    /// Area the hero must stay inside
    pub fn world_bounds(&self) -> Rect {
        self.world_bounds
    }

    /// Number of completed updates
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Advance one frame
    ///
    /// A failed level load is returned before any entity runs; the previous
    /// level stays live (minus anything already marked dead) and the next
    /// call proceeds normally.
    pub fn update(&mut self, dt: f32) -> Result<(), SimError> {
        if let Err(err) = self.apply_transition() {
            self.remove_dead();
            return Err(err);
        }

        for index in (0..self.entities.len()).rev() {
            let Some(mut entity) = self.entities[index].take() else {
                continue;
            };
            if let Err(err) = behavior::update(&mut entity, self, dt) {
                log::warn!(
                    "{} {} update failed: {}",
                    entity.kind.name(),
                    entity.id.0,
                    err
                );
            }
            #[cfg(test)]
            if let Some(hook) = self.update_hook {
                hook(&mut entity, self);
            }
            self.entities[index] = Some(entity);
        }

        self.remove_dead();
        self.frame += 1;
        Ok(())
    }

    fn remove_dead(&mut self) {
        let before = self.entities.len();
        self.entities
            .retain(|slot| slot.as_ref().is_some_and(|e| !e.dead));
        let removed = before - self.entities.len();
        if removed > 0 {
            log::debug!("Frame {}: removed {} dead entities", self.frame, removed);
        }
    }

    /// Draw every entity, oldest first
    pub fn render(&self, target: &mut dyn RenderTarget) {
        for entity in self.iter() {
            draw_entity(entity, target);
        }
    }

    // ------------------------------------------------------------------
    // Movement
    // ------------------------------------------------------------------

    /// Move `mover` against every live solid entity
    ///
    /// The mover must not be registered in this scene (entities being
    /// updated are detached from their slot, so they qualify).
    pub fn try_move(&self, mover: &mut Entity, displacement: Vec2) -> Result<bool, SimError> {
        let solids: Vec<Rect> = self
            .iter()
            .filter(|e| e.is_solid())
            .map(Entity::bounds)
            .collect();
        movement::try_move(mover, &solids, displacement)
    }

    /// Move a registered entity by ID
    pub fn try_move_entity(&mut self, id: EntityId, displacement: Vec2) -> Result<bool, SimError> {
        let index = self
            .entities
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|e| e.id == id))
            .ok_or(SimError::UnknownEntity(id))?;
        let Some(mut entity) = self.entities[index].take() else {
            return Err(SimError::UnknownEntity(id));
        };
        let result = self.try_move(&mut entity, displacement);
        self.entities[index] = Some(entity);
        result
    }

    // ------------------------------------------------------------------
    // Levels
    // ------------------------------------------------------------------

    /// Schedule `name` to load at the start of the next update
    pub fn request_load(&mut self, name: impl Into<String>) {
        self.transition = LevelTransition::Pending(name.into());
    }

    /// Schedule the current level to load again from scratch
    pub fn reload(&mut self) {
        match &self.current_level {
            Some(name) => self.transition = LevelTransition::Pending(name.clone()),
            None => log::warn!("Reload requested but no level is loaded"),
        }
    }

    pub fn current_level(&self) -> Option<&str> {
        self.current_level.as_deref()
    }

    pub fn pending_level(&self) -> Option<&str> {
        self.transition.pending()
    }

    fn apply_transition(&mut self) -> Result<(), SimError> {
        let Some(name) = self.transition.take() else {
            return Ok(());
        };
        log::info!("Loading level '{}'", name);

        // Resolve and parse before touching the live set
        let text = self.assets.level_text(&name)?;
        let commands = parse_level(&text)?;

        self.entities.clear();
        self.spawn(Entity::background());
        self.spawn(Entity::hud());
        for command in commands {
            self.spawn(command.into_entity());
        }
        log::info!("Level '{}' loaded with {} entities", name, self.entities.len());
        self.current_level = Some(name);
        Ok(())
    }

    /// Live entities as pretty JSON, for debugging and tooling
    pub fn snapshot_json(&self) -> Result<String, SimError> {
        let entities: Vec<&Entity> = self.iter().collect();
        serde_json::to_string_pretty(&entities).map_err(|e| SimError::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::MemoryAssets;
    use crate::consts::SIM_DT;

    const EXAMPLE_LEVEL: &str = "h 10 20\nw 0 50 # ground\nc 30 20";

    fn loaded_scene(text: &str) -> Scene {
        let mut scene = Scene::new(MemoryAssets::new().with_level("level0", text));
        scene.request_load("level0");
        scene.update(0.0).expect("level should load");
        scene
    }

    #[test]
    fn test_spawn_assigns_ids_and_keeps_order() {
        let mut scene = Scene::new(MemoryAssets::new());
        let a = scene.spawn(Entity::coin(Vec2::ZERO));
        let b = scene.spawn(Entity::key(Vec2::ZERO));
        assert_ne!(a, b);
        let ids: Vec<EntityId> = scene.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![a, b]);
        assert!(scene.get(b).unwrap().texture.is_some());
    }

    #[test]
    fn test_dead_entities_removed_after_one_update() {
        let mut scene = Scene::new(MemoryAssets::new());
        for i in 0..10 {
            scene.spawn(Entity::platform(Vec2::new(i as f32 * 18.0, 0.0)));
        }
        assert_eq!(scene.len(), 10);
        for i in 0..10 {
            scene.get_mut(EntityId(i)).unwrap().dead = true;
        }
        scene.update(SIM_DT).unwrap();
        assert!(scene.is_empty());
    }

    #[test]
    fn test_removal_keeps_survivor_order() {
        let mut scene = Scene::new(MemoryAssets::new());
        let ids: Vec<EntityId> = (0..5)
            .map(|i| scene.spawn(Entity::platform(Vec2::new(i as f32 * 18.0, 0.0))))
            .collect();
        scene.get_mut(ids[1]).unwrap().dead = true;
        scene.get_mut(ids[3]).unwrap().dead = true;
        scene.update(SIM_DT).unwrap();
        let left: Vec<EntityId> = scene.iter().map(|e| e.id).collect();
        assert_eq!(left, vec![ids[0], ids[2], ids[4]]);
    }

    #[test]
    fn test_find_first_returns_oldest() {
        let mut scene = Scene::new(MemoryAssets::new());
        let first = scene.spawn(Entity::coin(Vec2::new(1.0, 0.0)));
        scene.spawn(Entity::coin(Vec2::new(2.0, 0.0)));
        let found = scene.find_first(|e| matches!(e.kind, EntityKind::Coin));
        assert_eq!(found.map(|e| e.id), Some(first));

        scene.get_mut(first).unwrap().dead = true;
        scene.update(0.0).unwrap();
        let found = scene.find_first(|e| matches!(e.kind, EntityKind::Coin));
        assert_eq!(found.map(|e| e.position.x), Some(2.0));
        assert!(scene.hero().is_none());
    }

    #[test]
    fn test_level_load_spawns_declared_entities() {
        let scene = loaded_scene(EXAMPLE_LEVEL);
        assert_eq!(scene.current_level(), Some("level0"));
        assert_eq!(scene.pending_level(), None);

        let kinds: Vec<&str> = scene.iter().map(|e| e.kind.name()).collect();
        assert_eq!(kinds, vec!["background", "hud", "hero", "platform", "coin"]);

        let heroes: Vec<&Entity> = scene.iter().filter(|e| e.is_hero()).collect();
        assert_eq!(heroes.len(), 1);
        assert_eq!(heroes[0].position, Vec2::new(10.0, 20.0));
        let platform = scene.find_first(Entity::is_solid).unwrap();
        assert_eq!(platform.position, Vec2::new(0.0, 50.0));
        let coin = scene
            .find_first(|e| matches!(e.kind, EntityKind::Coin))
            .unwrap();
        assert_eq!(coin.position, Vec2::new(30.0, 20.0));
        assert_eq!(scene.coins(), Some(0));
    }

    #[test]
    fn test_reload_respawns_at_declared_positions() {
        let mut scene = loaded_scene(EXAMPLE_LEVEL);
        let original_id = scene.hero().unwrap().id;

        for _ in 0..30 {
            scene.update(SIM_DT).unwrap();
        }
        assert_ne!(scene.hero().unwrap().position, Vec2::new(10.0, 20.0));

        scene.reload();
        assert_eq!(scene.pending_level(), Some("level0"));
        scene.update(0.0).unwrap();

        let hero = scene.hero().unwrap();
        assert_eq!(hero.position, Vec2::new(10.0, 20.0));
        assert_ne!(hero.id, original_id);
        assert_eq!(scene.len(), 5);
    }

    #[test]
    fn test_missing_level_keeps_current_scene() {
        let mut scene = loaded_scene(EXAMPLE_LEVEL);
        scene.request_load("nowhere");
        let err = scene.update(SIM_DT).unwrap_err();
        assert!(matches!(err, SimError::ResourceNotFound { ref name, .. } if name == "nowhere"));
        assert_eq!(scene.current_level(), Some("level0"));
        assert_eq!(scene.pending_level(), None);
        assert_eq!(scene.len(), 5);

        // Next frame runs normally on the old level
        scene.update(SIM_DT).unwrap();
        assert_eq!(scene.len(), 5);
    }

    #[test]
    fn test_failed_load_still_drops_dead_entities() {
        let mut scene = loaded_scene(EXAMPLE_LEVEL);
        let coin = scene
            .find_first(|e| matches!(e.kind, EntityKind::Coin))
            .map(|e| e.id)
            .unwrap();
        scene.get_mut(coin).unwrap().dead = true;

        scene.request_load("nowhere");
        assert!(scene.update(SIM_DT).is_err());
        assert!(scene.get(coin).is_none());
        assert_eq!(scene.len(), 4);
    }

    #[test]
    fn test_malformed_level_is_not_partially_loaded() {
        let assets = MemoryAssets::new()
            .with_level("level0", EXAMPLE_LEVEL)
            .with_level("broken", "w 0 0\nw 18 0\nd 40 0");
        let mut scene = Scene::new(assets);
        scene.request_load("level0");
        scene.update(0.0).unwrap();

        scene.request_load("broken");
        match scene.update(0.0) {
            Err(SimError::LevelParse(err)) => {
                assert_eq!(err.line, 3);
                assert_eq!(err.tag, "d");
            }
            other => panic!("expected parse error, got {:?}", other),
        }
        assert_eq!(scene.current_level(), Some("level0"));
        assert_eq!(scene.iter().filter(|e| e.is_solid()).count(), 1);
    }

    #[test]
    fn test_reload_without_level_is_noop() {
        let mut scene = Scene::new(MemoryAssets::new());
        scene.reload();
        assert_eq!(scene.pending_level(), None);
        scene.update(SIM_DT).unwrap();
        assert!(scene.is_empty());
    }

    #[test]
    fn test_try_move_entity_against_registered_solids() {
        let mut scene = Scene::new(MemoryAssets::new());
        scene.spawn(Entity::platform(Vec2::new(0.0, 50.0)));
        let key = scene.spawn(Entity::key(Vec2::new(0.0, 20.0)));

        let collided = scene.try_move_entity(key, Vec2::new(0.0, 20.0)).unwrap();
        assert!(collided);
        assert_eq!(scene.get(key).unwrap().position, Vec2::new(0.0, 32.0));

        let collided = scene.try_move_entity(key, Vec2::ZERO).unwrap();
        assert!(!collided);
        assert_eq!(
            scene.try_move_entity(EntityId(99), Vec2::ZERO),
            Err(SimError::UnknownEntity(EntityId(99)))
        );
    }

    #[test]
    fn test_snapshot_json_lists_entities() {
        let scene = loaded_scene(EXAMPLE_LEVEL);
        let json = scene.snapshot_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(5));
        assert!(json.contains("\"Platform\""));
    }

    #[test]
    fn test_entity_error_does_not_stop_the_pass() {
        let mut scene = Scene::new(MemoryAssets::new());
        scene.spawn(Entity::hud());
        scene.spawn(Entity::coin(Vec2::new(10.0, 100.0)));
        // 2px gap between the walls, the hero is 18px wide
        scene.spawn(Entity::platform(Vec2::new(0.0, 100.0)));
        scene.spawn(Entity::platform(Vec2::new(20.0, 100.0)));
        let hero = scene.spawn(Entity::hero(Vec2::new(10.0, 100.0)));

        // The hero runs first and fails to resolve; the older coin still runs
        scene.update(SIM_DT).unwrap();
        assert_eq!(scene.get(hero).unwrap().position, Vec2::new(10.0, 100.0));
        assert_eq!(scene.coins(), Some(1));
        assert!(scene.find_first(|e| matches!(e.kind, EntityKind::Coin)).is_none());
    }

    fn spawn_coin_from_keys(entity: &mut Entity, scene: &mut Scene) {
        match entity.kind {
            EntityKind::Key => {
                scene.spawn(Entity::coin(Vec2::new(500.0, 0.0)));
            }
            // Count coin updates in the x coordinate
            EntityKind::Coin => entity.position.x += 1.0,
            _ => {}
        }
    }

    #[test]
    fn test_spawned_during_update_runs_next_frame() {
        let mut scene = Scene::new(MemoryAssets::new());
        scene.update_hook = Some(spawn_coin_from_keys as fn(&mut Entity, &mut Scene));
        let key = scene.spawn(Entity::key(Vec2::ZERO));

        scene.update(SIM_DT).unwrap();
        let coins: Vec<(EntityId, f32)> = scene
            .iter()
            .filter(|e| matches!(e.kind, EntityKind::Coin))
            .map(|e| (e.id, e.position.x))
            .collect();
        assert_eq!(coins, vec![(EntityId(1), 500.0)]);

        scene.update(SIM_DT).unwrap();
        let ids: Vec<EntityId> = scene.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![key, EntityId(1), EntityId(2)]);
        assert_eq!(scene.get(EntityId(1)).unwrap().position.x, 501.0);
        assert_eq!(scene.get(EntityId(2)).unwrap().position.x, 500.0);
    }
}
