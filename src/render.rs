//! Rendering seam
//!
//! The core decides what to draw and in which order; the host owns the
//! window and turns [`SpriteDraw`]s into pixels.

use std::cmp::Ordering;

use glam::Vec2;

use crate::assets::TextureHandle;
use crate::consts::{BACKGROUND_TILE, HORIZON_ROW, HUD_MARGIN};
use crate::sim::{Entity, EntityKind, Rect, SpriteFrame};

/// One textured quad
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteDraw {
    pub texture: Option<TextureHandle>,
    pub frame: SpriteFrame,
    /// Where the origin lands in world space
    pub position: Vec2,
    pub origin: Vec2,
    /// Mirror horizontally around the origin
    pub flip_x: bool,
    /// Draw as a silhouette (opened doors)
    pub darkened: bool,
}

/// Recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Sprite(SpriteDraw),
    Text { text: String, position: Vec2 },
}

/// Something the scene can draw into
pub trait RenderTarget {
    /// Visible world area
    fn view(&self) -> Rect;
    fn draw_sprite(&mut self, sprite: SpriteDraw);
    fn draw_text(&mut self, text: &str, position: Vec2);
}

/// Target that only records what was drawn
#[derive(Debug, Clone)]
pub struct RecordingTarget {
    pub view: Rect,
    pub commands: Vec<DrawCommand>,
}

impl RecordingTarget {
    pub fn new(view: Rect) -> Self {
        Self {
            view,
            commands: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn sprite_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Sprite(_)))
            .count()
    }
}

impl RenderTarget for RecordingTarget {
    fn view(&self) -> Rect {
        self.view
    }

    fn draw_sprite(&mut self, sprite: SpriteDraw) {
        self.commands.push(DrawCommand::Sprite(sprite));
    }

    fn draw_text(&mut self, text: &str, position: Vec2) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            position,
        });
    }
}

/// Draw hook for a single entity
pub fn draw_entity(entity: &Entity, target: &mut dyn RenderTarget) {
    match &entity.kind {
        EntityKind::Background => draw_background(entity, target),
        EntityKind::Hud { coins } => {
            let anchor = target.view().min + Vec2::splat(HUD_MARGIN);
            target.draw_text(&format!("Coins: {}", coins), anchor);
        }
        EntityKind::Hero(hero) => draw_sprite(entity, target, hero.facing_right, false),
        EntityKind::Door { unlocked, .. } => draw_sprite(entity, target, false, *unlocked),
        EntityKind::Platform | EntityKind::Key | EntityKind::Coin => {
            draw_sprite(entity, target, false, false)
        }
    }
}

fn draw_sprite(entity: &Entity, target: &mut dyn RenderTarget, flip_x: bool, darkened: bool) {
    let Some(sprite) = entity.sprite() else {
        return;
    };
    target.draw_sprite(SpriteDraw {
        texture: entity.texture,
        frame: sprite.frame,
        position: entity.position,
        origin: sprite.origin,
        flip_x,
        darkened,
    });
}

/// Tile the whole view: sky above the horizon row, ground below it
fn draw_background(entity: &Entity, target: &mut dyn RenderTarget) {
    let view = target.view();
    let tiles_x = (view.size.x / BACKGROUND_TILE).ceil() as i32;
    let tiles_y = (view.size.y / BACKGROUND_TILE).ceil() as i32;
    let tile = BACKGROUND_TILE as i32;

    for row in 0..=tiles_y {
        let frame_x = match row.cmp(&HORIZON_ROW) {
            Ordering::Less => 0,
            Ordering::Equal => tile,
            Ordering::Greater => 2 * tile,
        };
        for col in 0..tiles_x {
            target.draw_sprite(SpriteDraw {
                texture: entity.texture,
                frame: SpriteFrame::new(frame_x, 0, tile, tile),
                position: view.min + BACKGROUND_TILE * Vec2::new(col as f32, row as f32),
                origin: Vec2::ZERO,
                flip_x: false,
                darkened: false,
            });
        }
    }
}
