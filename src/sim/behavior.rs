//! Per-kind update hooks
//!
//! Gameplay here only uses the core's primitives: registry lookups, the
//! movement resolver, the intersection test and level requests.

use glam::Vec2;

use super::collision::rectangle_intersect;
use super::entity::{Entity, EntityKind};
use super::error::SimError;
use super::scene::Scene;

/// Run one frame of `entity`'s logic. `entity` is detached from the scene
/// for the duration of the call.
pub(crate) fn update(entity: &mut Entity, scene: &mut Scene, dt: f32) -> Result<(), SimError> {
    match entity.kind {
        EntityKind::Hero(_) => update_hero(entity, scene, dt),
        EntityKind::Coin => {
            update_coin(entity, scene);
            Ok(())
        }
        EntityKind::Key => {
            update_key(entity, scene);
            Ok(())
        }
        EntityKind::Door { .. } => {
            update_door(entity, scene);
            Ok(())
        }
        EntityKind::Background | EntityKind::Hud { .. } | EntityKind::Platform => Ok(()),
    }
}

fn touches_hero(entity: &Entity, scene: &Scene) -> bool {
    scene
        .hero()
        .is_some_and(|hero| rectangle_intersect(entity.bounds(), hero.bounds()).is_some())
}

/// Keep the first movement failure, report whether the move collided
fn record(failure: &mut Option<SimError>, result: Result<bool, SimError>) -> bool {
    match result {
        Ok(collided) => collided,
        Err(err) => {
            failure.get_or_insert(err);
            false
        }
    }
}

fn update_hero(entity: &mut Entity, scene: &mut Scene, dt: f32) -> Result<(), SimError> {
    let EntityKind::Hero(mut hero) = entity.kind else {
        return Ok(());
    };
    let tuning = *scene.tuning();
    let input = *scene.input();
    let mut failure = None;

    if input.left {
        record(&mut failure, scene.try_move(entity, Vec2::new(-tuning.walk_speed * dt, 0.0)));
        hero.facing_right = false;
    } else if input.right {
        record(&mut failure, scene.try_move(entity, Vec2::new(tuning.walk_speed * dt, 0.0)));
        hero.facing_right = true;
    }

    // Jump fires on the press, not while held
    if input.jump {
        if hero.grounded && !hero.jump_held {
            hero.vertical_speed = -tuning.jump_force;
        }
        hero.jump_held = true;
    } else {
        hero.jump_held = false;
    }

    hero.vertical_speed = (hero.vertical_speed + tuning.gravity * dt).min(tuning.max_fall_speed);
    hero.grounded = false;
    let fall = Vec2::new(0.0, hero.vertical_speed * dt);
    if record(&mut failure, scene.try_move(entity, fall)) {
        if hero.vertical_speed > 0.0 {
            hero.grounded = true;
            hero.vertical_speed = 0.0;
        } else {
            // Bumped a ceiling
            hero.vertical_speed = -0.5 * hero.vertical_speed;
        }
    }
    entity.kind = EntityKind::Hero(hero);

    if !scene.world_bounds().contains_point(entity.position) {
        log::info!("Hero left the world at {}, reloading", entity.position);
        scene.reload();
    }

    failure.map_or(Ok(()), Err)
}

fn update_coin(entity: &mut Entity, scene: &mut Scene) {
    if !touches_hero(entity, scene) {
        return;
    }
    if let Some(hud) = scene.find_first_mut(Entity::is_hud) {
        if let EntityKind::Hud { coins } = &mut hud.kind {
            *coins += 1;
        }
    }
    entity.dead = true;
}

fn update_key(entity: &mut Entity, scene: &mut Scene) {
    if !touches_hero(entity, scene) {
        return;
    }
    match scene.find_first_mut(Entity::is_door) {
        Some(door) => {
            if let EntityKind::Door { unlocked, .. } = &mut door.kind {
                *unlocked = true;
            }
        }
        None => log::warn!("Key {} picked up with no door in the level", entity.id.0),
    }
    entity.dead = true;
}

fn update_door(entity: &Entity, scene: &mut Scene) {
    let EntityKind::Door {
        next_level,
        unlocked: true,
    } = &entity.kind
    else {
        return;
    };
    if scene.pending_level().is_none() && touches_hero(entity, scene) {
        log::info!("Door {} opened onto '{}'", entity.id.0, next_level);
        scene.request_load(next_level.clone());
    }
}
