// Asset file access: path resolution and raw reads

use super::AssetError;
use std::path::{Path, PathBuf};

/// Supported asset types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetType {
    Image,
    Sound,
}

impl AssetType {
    /// Get supported file extensions for this asset type
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            AssetType::Image => &["png", "jpg", "jpeg"],
            AssetType::Sound => &["wav", "ogg", "mp3"],
        }
    }

    /// Guess the asset type of a path from its extension
    pub fn of_path(path: &str) -> Option<Self> {
        let ext = Path::new(path).extension()?.to_string_lossy().to_ascii_lowercase();
        [AssetType::Image, AssetType::Sound]
            .into_iter()
            .find(|t| t.extensions().contains(&ext.as_str()))
    }
}

/// Asset loader responsible for finding and reading asset files
///
/// Game code refers to assets by the relative paths the level was authored
/// with (`images/player/p-idle.png`); the loader anchors them at a base
/// directory.
#[derive(Debug, Clone)]
pub struct AssetLoader {
    base_path: PathBuf,
}

impl AssetLoader {
    /// Create a new asset loader with the given base path
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Get the full path for an asset
    pub fn resolve_path(&self, name: &str) -> PathBuf {
        self.base_path.join(name)
    }

    /// Load asset bytes from disk
    pub fn load_bytes(&self, name: &str) -> Result<Vec<u8>, AssetError> {
        let path = self.resolve_path(name);

        if !path.exists() {
            return Err(AssetError::NotFound(path.to_string_lossy().to_string()));
        }

        Ok(std::fs::read(&path)?)
    }
}
