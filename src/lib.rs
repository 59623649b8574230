//! Tile Hop - simulation core for a tile-based 2D platformer
//!
//! Core modules:
//! - `sim`: Geometry, movement resolution, entities, scene and levels
//! - `assets`: Level text and texture lookup
//! - `render`: Draw-call seam between the core and a host renderer
//! - `settings`: Data-driven tuning loaded from JSON

pub mod assets;
pub mod render;
pub mod settings;
pub mod sim;

pub use assets::{AssetSource, FsAssets, MemoryAssets};
pub use settings::{HeroTuning, Settings};
pub use sim::{Entity, EntityId, FrameInput, Rect, Scene, SimError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Leaving this area restarts the level
    pub const WORLD_WIDTH: f32 = 800.0;
    pub const WORLD_HEIGHT: f32 = 600.0;
    /// Visible area
    pub const VIEW_WIDTH: f32 = 400.0;
    pub const VIEW_HEIGHT: f32 = 300.0;

    /// Hero movement (pixels/s, pixels/s²)
    pub const HERO_WALK_SPEED: f32 = 100.0;
    pub const HERO_JUMP_FORCE: f32 = 250.0;
    pub const GRAVITY: f32 = 400.0;
    pub const MAX_FALL_SPEED: f32 = 500.0;

    /// Background tile edge, in pixels
    pub const BACKGROUND_TILE: f32 = 24.0;
    /// Background row drawn with the horizon frame; rows below use ground
    pub const HORIZON_ROW: i32 = 5;
    /// HUD text inset from the view corner
    pub const HUD_MARGIN: f32 = 4.0;

    pub const START_LEVEL: &str = "level0";
    pub const ASSET_DIR: &str = "assets";
}
