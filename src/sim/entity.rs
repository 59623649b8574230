//! Entities and their shared contract
//!
//! Every simulated object is an [`Entity`]: a position, a dead flag and an
//! [`EntityKind`] carrying the per-kind state. Bounds, solidity and sprite
//! placement are all derived from the kind, so the contract stays flat:
//! position, bounds, solid, dead, create, update, render.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::assets::{AssetSource, TextureHandle};

/// Scene-unique identifier, assigned on spawn and never reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    /// Placeholder for entities that have not been spawned yet
    pub const UNASSIGNED: EntityId = EntityId(u32::MAX);
}

/// Sub-rectangle of a texture, in texels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteFrame {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl SpriteFrame {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }
}

/// Static sprite layout for an entity kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    /// Texture name, resolved through the asset source on create
    pub texture: &'static str,
    pub frame: SpriteFrame,
    /// Offset from the sprite's top-left corner to the entity position
    pub origin: Vec2,
}

impl Sprite {
    /// World-space box covered by the sprite drawn at `position`
    pub fn bounds_at(&self, position: Vec2) -> Rect {
        Rect::new(position - self.origin, self.frame.size())
    }
}

const BACKGROUND_SPRITE: Sprite = Sprite {
    texture: "background",
    frame: SpriteFrame::new(0, 0, 24, 24),
    origin: Vec2::new(9.0, 9.0),
};
const PLATFORM_SPRITE: Sprite = Sprite {
    texture: "tileset",
    frame: SpriteFrame::new(0, 0, 18, 18),
    origin: Vec2::new(9.0, 9.0),
};
const DOOR_SPRITE: Sprite = Sprite {
    texture: "tileset",
    frame: SpriteFrame::new(180, 103, 18, 23),
    origin: Vec2::new(9.0, 9.0),
};
const KEY_SPRITE: Sprite = Sprite {
    texture: "tileset",
    frame: SpriteFrame::new(126, 18, 18, 18),
    origin: Vec2::new(9.0, 9.0),
};
const HERO_SPRITE: Sprite = Sprite {
    texture: "characters",
    frame: SpriteFrame::new(0, 0, 24, 24),
    origin: Vec2::new(12.0, 12.0),
};
const COIN_SPRITE: Sprite = Sprite {
    texture: "tileset",
    frame: SpriteFrame::new(200, 127, 16, 16),
    origin: Vec2::new(8.0, 8.0),
};

/// Hero controller state
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HeroState {
    /// Pixels per second, positive is down
    pub vertical_speed: f32,
    /// Standing on something solid after the last vertical move
    pub grounded: bool,
    /// Jump input was already held last frame
    pub jump_held: bool,
    pub facing_right: bool,
}

/// The closed set of entity kinds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntityKind {
    /// Tiled backdrop, always spawned first
    Background,
    /// Coin counter overlay
    Hud { coins: u32 },
    /// Static solid tile
    Platform,
    /// Exit to another level, opened by a key
    Door { next_level: String, unlocked: bool },
    Key,
    Hero(HeroState),
    Coin,
}

impl EntityKind {
    /// Short lowercase name, for logs
    pub fn name(&self) -> &'static str {
        match self {
            EntityKind::Background => "background",
            EntityKind::Hud { .. } => "hud",
            EntityKind::Platform => "platform",
            EntityKind::Door { .. } => "door",
            EntityKind::Key => "key",
            EntityKind::Hero(_) => "hero",
            EntityKind::Coin => "coin",
        }
    }
}

/// A simulated object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub position: Vec2,
    /// Removed at the end of the frame once set
    pub dead: bool,
    pub kind: EntityKind,
    /// Bound by [`Entity::create`]
    #[serde(skip)]
    pub texture: Option<TextureHandle>,
}

impl Entity {
    pub fn new(kind: EntityKind, position: Vec2) -> Self {
        Self {
            id: EntityId::UNASSIGNED,
            position,
            dead: false,
            kind,
            texture: None,
        }
    }

    pub fn background() -> Self {
        Self::new(EntityKind::Background, Vec2::ZERO)
    }

    pub fn hud() -> Self {
        Self::new(EntityKind::Hud { coins: 0 }, Vec2::ZERO)
    }

    pub fn platform(position: Vec2) -> Self {
        Self::new(EntityKind::Platform, position)
    }

    pub fn door(position: Vec2, next_level: impl Into<String>) -> Self {
        Self::new(
            EntityKind::Door {
                next_level: next_level.into(),
                unlocked: false,
            },
            position,
        )
    }

    pub fn key(position: Vec2) -> Self {
        Self::new(EntityKind::Key, position)
    }

    pub fn hero(position: Vec2) -> Self {
        Self::new(EntityKind::Hero(HeroState::default()), position)
    }

    pub fn coin(position: Vec2) -> Self {
        Self::new(EntityKind::Coin, position)
    }

    /// Sprite layout, `None` for the text-only HUD
    pub fn sprite(&self) -> Option<Sprite> {
        match self.kind {
            EntityKind::Background => Some(BACKGROUND_SPRITE),
            EntityKind::Hud { .. } => None,
            EntityKind::Platform => Some(PLATFORM_SPRITE),
            EntityKind::Door { .. } => Some(DOOR_SPRITE),
            EntityKind::Key => Some(KEY_SPRITE),
            EntityKind::Hero(_) => Some(HERO_SPRITE),
            EntityKind::Coin => Some(COIN_SPRITE),
        }
    }

    /// World-space bounding box
    pub fn bounds(&self) -> Rect {
        let Some(sprite) = self.sprite() else {
            return Rect::new(self.position, Vec2::ZERO);
        };
        let bounds = sprite.bounds_at(self.position);
        match self.kind {
            // Trim the transparent margin around the character art
            EntityKind::Hero(_) => bounds.inset(3.0, 3.0, 3.0, 0.0),
            _ => bounds,
        }
    }

    /// Other entities are pushed out of solid ones
    pub fn is_solid(&self) -> bool {
        matches!(self.kind, EntityKind::Platform)
    }

    pub fn is_hero(&self) -> bool {
        matches!(self.kind, EntityKind::Hero(_))
    }

    pub fn is_hud(&self) -> bool {
        matches!(self.kind, EntityKind::Hud { .. })
    }

    pub fn is_door(&self) -> bool {
        matches!(self.kind, EntityKind::Door { .. })
    }

    /// Bind the sprite texture. Called once by the scene on spawn.
    pub fn create(&mut self, assets: &mut dyn AssetSource) {
        self.texture = self.sprite().map(|sprite| assets.texture(sprite.texture));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::MemoryAssets;

    #[test]
    fn test_platform_bounds_centered_on_origin() {
        let platform = Entity::platform(Vec2::new(0.0, 50.0));
        let bounds = platform.bounds();
        assert_eq!(bounds.min, Vec2::new(-9.0, 41.0));
        assert_eq!(bounds.size, Vec2::new(18.0, 18.0));
        assert!(platform.is_solid());
    }

    #[test]
    fn test_hero_bounds_are_trimmed() {
        let hero = Entity::hero(Vec2::new(100.0, 100.0));
        let bounds = hero.bounds();
        assert_eq!(bounds.min, Vec2::new(91.0, 91.0));
        assert_eq!(bounds.size, Vec2::new(18.0, 21.0));
        assert!(!hero.is_solid());
    }

    #[test]
    fn test_only_platforms_are_solid() {
        let others = [
            Entity::background(),
            Entity::hud(),
            Entity::door(Vec2::ZERO, "level1"),
            Entity::key(Vec2::ZERO),
            Entity::coin(Vec2::ZERO),
        ];
        assert!(others.iter().all(|e| !e.is_solid()));
    }

    #[test]
    fn test_hud_has_no_sprite() {
        let hud = Entity::hud();
        assert!(hud.sprite().is_none());
        assert_eq!(hud.bounds().size, Vec2::ZERO);
    }

    #[test]
    fn test_create_binds_shared_textures() {
        let mut assets = MemoryAssets::new();
        let mut key = Entity::key(Vec2::ZERO);
        let mut coin = Entity::coin(Vec2::ZERO);
        let mut hero = Entity::hero(Vec2::ZERO);
        let mut hud = Entity::hud();
        key.create(&mut assets);
        coin.create(&mut assets);
        hero.create(&mut assets);
        hud.create(&mut assets);

        assert!(key.texture.is_some());
        assert_eq!(key.texture, coin.texture);
        assert_ne!(key.texture, hero.texture);
        assert_eq!(hud.texture, None);
        assert_eq!(assets.textures().len(), 2);
    }
}
