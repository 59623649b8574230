//! Platformer simulation core
//!
//! Everything that decides what happens in a frame lives here:
//! - `rect`/`collision`: axis-aligned boxes and the overlap test
//! - `movement`: push-out resolution against solid entities
//! - `entity`/`behavior`: the entity contract and per-kind logic
//! - `scene`: registry, frame update and level transitions
//! - `level`: level text format
//!
//! No windowing or file access happens here; both come in through
//! [`crate::assets::AssetSource`] and [`crate::render::RenderTarget`].

mod behavior;
pub mod collision;
pub mod entity;
pub mod error;
pub mod level;
pub mod movement;
pub mod rect;
pub mod scene;

pub use collision::{Hit, rectangle_intersect};
pub use entity::{Entity, EntityId, EntityKind, HeroState, Sprite, SpriteFrame};
pub use error::{LevelParseError, ParseErrorKind, SimError};
pub use level::{LevelCommand, LevelTransition, parse_level};
pub use movement::{MOVE_RESOLVE_SLACK, try_move};
pub use rect::Rect;
pub use scene::{FrameInput, Scene};
