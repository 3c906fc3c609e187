// Asset management system
//
// Images are requested by path, decoded once and looked up every frame.

mod cache;
mod handle;
mod loader;

pub use cache::{AssetCache, DecodedImage};
pub use handle::{AssetHandle, AssetId, ImageHandle, SoundHandle};
pub use loader::{AssetLoader, AssetType};

/// Asset loading errors
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("Asset not found: {0}")]
    NotFound(String),

    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_error_display() {
        let err = AssetError::NotFound("images/player/p-idle.png".to_string());
        assert_eq!(err.to_string(), "Asset not found: images/player/p-idle.png");
    }
}
