//! Asset resolution for the simulation core
//!
//! The core never decodes images or touches a GPU. It only needs two lookups:
//! - level name -> level description text
//! - texture name -> opaque handle the host renderer understands

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::sim::SimError;

/// Opaque texture reference handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextureHandle(pub u32);

/// Name -> handle cache. A name always resolves to the same handle.
#[derive(Debug, Clone, Default)]
pub struct TextureCache {
    by_name: HashMap<String, TextureHandle>,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a handle, allocating one on first use
    pub fn resolve(&mut self, name: &str) -> TextureHandle {
        if let Some(handle) = self.by_name.get(name) {
            return *handle;
        }
        let handle = TextureHandle(self.by_name.len() as u32);
        self.by_name.insert(name.to_string(), handle);
        handle
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// Where level text and textures come from
pub trait AssetSource {
    /// Full text of the level called `name`
    fn level_text(&self, name: &str) -> Result<String, SimError>;

    /// Handle for the texture called `name`
    fn texture(&mut self, name: &str) -> TextureHandle;
}

/// Assets on disk: `<root>/<name>.txt` for levels, `<root>/<name>.png` for textures
#[derive(Debug, Clone)]
pub struct FsAssets {
    root: PathBuf,
    textures: TextureCache,
}

impl FsAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            textures: TextureCache::new(),
        }
    }

    pub fn level_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{}.txt", name))
    }
}

impl AssetSource for FsAssets {
    fn level_text(&self, name: &str) -> Result<String, SimError> {
        let path = self.level_path(name);
        std::fs::read_to_string(&path).map_err(|err| SimError::ResourceNotFound {
            name: name.to_string(),
            reason: format!("{}: {}", path.display(), err),
        })
    }

    fn texture(&mut self, name: &str) -> TextureHandle {
        let known = self.textures.len();
        let handle = self.textures.resolve(name);
        if self.textures.len() > known {
            log::debug!("Texture '{}' -> {:?}", name, self.root.join(format!("{}.png", name)));
        }
        handle
    }
}

/// Assets held in memory (embedded builds, tests)
#[derive(Debug, Clone, Default)]
pub struct MemoryAssets {
    levels: HashMap<String, String>,
    textures: TextureCache,
}

impl MemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style level registration
    pub fn with_level(mut self, name: &str, text: &str) -> Self {
        self.insert_level(name, text);
        self
    }

    pub fn insert_level(&mut self, name: &str, text: &str) {
        self.levels.insert(name.to_string(), text.to_string());
    }

    pub fn textures(&self) -> &TextureCache {
        &self.textures
    }
}

impl AssetSource for MemoryAssets {
    fn level_text(&self, name: &str) -> Result<String, SimError> {
        self.levels
            .get(name)
            .cloned()
            .ok_or_else(|| SimError::ResourceNotFound {
                name: name.to_string(),
                reason: "not registered".to_string(),
            })
    }

    fn texture(&mut self, name: &str) -> TextureHandle {
        self.textures.resolve(name)
    }
}
