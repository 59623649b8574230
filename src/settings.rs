//! Game settings
//!
//! Loaded from a JSON file next to the binary. Every field has a default, so
//! a partial file only overrides what it names.

use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::{Rect, SimError};

/// Hero movement tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeroTuning {
    /// Horizontal speed (px/s)
    pub walk_speed: f32,
    /// Upward speed at the start of a jump (px/s)
    pub jump_force: f32,
    /// Downward acceleration (px/s²)
    pub gravity: f32,
    /// Terminal falling speed (px/s)
    pub max_fall_speed: f32,
}

impl Default for HeroTuning {
    fn default() -> Self {
        Self {
            walk_speed: HERO_WALK_SPEED,
            jump_force: HERO_JUMP_FORCE,
            gravity: GRAVITY,
            max_fall_speed: MAX_FALL_SPEED,
        }
    }
}

/// Settings for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory holding level text and textures
    pub asset_dir: PathBuf,
    /// Level loaded on startup
    pub start_level: String,
    /// Leaving this area restarts the level
    pub world_bounds: Rect,
    /// Visible area handed to the renderer
    pub view: Rect,
    /// Maximum fixed steps per host frame
    pub max_substeps: u32,
    pub hero: HeroTuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            asset_dir: PathBuf::from(ASSET_DIR),
            start_level: START_LEVEL.to_string(),
            world_bounds: Rect::new(Vec2::ZERO, Vec2::new(WORLD_WIDTH, WORLD_HEIGHT)),
            view: Rect::new(Vec2::ZERO, Vec2::new(VIEW_WIDTH, VIEW_HEIGHT)),
            max_substeps: MAX_SUBSTEPS,
            hero: HeroTuning::default(),
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        serde_json::from_str(json).map_err(|e| SimError::Settings(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, SimError> {
        serde_json::to_string_pretty(self).map_err(|e| SimError::Settings(e.to_string()))
    }

    /// Read settings from `path`
    pub fn try_load(path: &Path) -> Result<Self, SimError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| SimError::Settings(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    /// Read settings from `path`, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(err) => {
                log::info!("Using default settings ({})", err);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), SimError> {
        let json = self.to_json()?;
        std::fs::write(path, json)
            .map_err(|e| SimError::Settings(format!("{}: {}", path.display(), e)))?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
