// Image cache: load once, look up every frame

use super::{AssetError, AssetHandle, AssetId, AssetLoader, AssetType, ImageHandle};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::path::Path;

/// A decoded RGBA8 image ready for upload
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl DecodedImage {
    /// Decode PNG/JPEG bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AssetError> {
        let rgba = image::load_from_memory(bytes)?.to_rgba8();
        Ok(Self {
            width: rgba.width(),
            height: rgba.height(),
            rgba: rgba.into_raw(),
        })
    }
}

/// Load state of a single path
#[derive(Debug)]
enum Slot {
    Pending,
    Ready(DecodedImage),
    Failed,
}

/// Central image cache for the game
///
/// `load` queues paths, `poll` decodes whatever is queued, `get` hands out a
/// handle once the image is ready. Callbacks registered with `on_ready` fire
/// once nothing is left pending.
pub struct AssetCache {
    /// Asset loader
    loader: AssetLoader,

    /// Load state per image
    slots: HashMap<AssetId, Slot>,

    /// Path to ID mapping, in request order
    paths: Vec<(String, AssetId)>,

    /// Fired once every requested path has resolved
    ready_callbacks: Vec<Box<dyn FnOnce()>>,
}

impl AssetCache {
    /// Create a new asset cache rooted at `asset_path`
    pub fn new<P: AsRef<Path>>(asset_path: P) -> Self {
        Self {
            loader: AssetLoader::new(asset_path),
            slots: HashMap::new(),
            paths: Vec::new(),
            ready_callbacks: Vec::new(),
        }
    }

    /// Queue one or more image paths; already known paths are ignored
    pub fn load<I, S>(&mut self, paths: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for path in paths {
            let path = path.as_ref();
            let id = AssetId::from_path(path);
            if self.slots.contains_key(&id) {
                continue;
            }

            if AssetType::of_path(path) != Some(AssetType::Image) {
                warn!("Not an image, skipping: {}", path);
                self.slots.insert(id, Slot::Failed);
            } else {
                self.slots.insert(id, Slot::Pending);
            }
            self.paths.push((path.to_string(), id));
        }
    }

    /// Decode every pending image and fire ready callbacks when done
    pub fn poll(&mut self) {
        for (path, id) in &self.paths {
            let Some(slot) = self.slots.get_mut(id) else {
                continue;
            };
            if !matches!(slot, Slot::Pending) {
                continue;
            }

            *slot = match self
                .loader
                .load_bytes(path)
                .and_then(|bytes| DecodedImage::from_bytes(&bytes))
            {
                Ok(image) => {
                    debug!("Loaded {} ({}x{})", path, image.width, image.height);
                    Slot::Ready(image)
                }
                Err(e) => {
                    warn!("Could not load {}: {}", path, e);
                    Slot::Failed
                }
            };
        }

        if self.is_ready() && !self.ready_callbacks.is_empty() {
            info!("All {} images resolved", self.paths.len());
            for callback in self.ready_callbacks.drain(..) {
                callback();
            }
        }
    }

    /// Register a callback for when every requested image has resolved
    ///
    /// Fires on the next `poll` if nothing is pending.
    pub fn on_ready(&mut self, callback: impl FnOnce() + 'static) {
        self.ready_callbacks.push(Box::new(callback));
    }

    /// True when no requested path is still pending
    pub fn is_ready(&self) -> bool {
        !self.slots.values().any(|s| matches!(s, Slot::Pending))
    }

    /// Handle to a decoded image, `None` while pending or if loading failed
    pub fn get(&self, path: &str) -> Option<ImageHandle> {
        let id = AssetId::from_path(path);
        match self.slots.get(&id) {
            Some(Slot::Ready(_)) => Some(AssetHandle::new(id)),
            _ => None,
        }
    }

    /// Decoded pixels behind a handle
    pub fn image(&self, handle: ImageHandle) -> Option<&DecodedImage> {
        match self.slots.get(&handle.id()) {
            Some(Slot::Ready(image)) => Some(image),
            _ => None,
        }
    }

    /// Every decoded image with its handle
    pub fn images(&self) -> impl Iterator<Item = (ImageHandle, &DecodedImage)> {
        self.slots.iter().filter_map(|(id, slot)| match slot {
            Slot::Ready(image) => Some((AssetHandle::new(*id), image)),
            _ => None,
        })
    }

    /// Insert an already decoded image under a path
    pub fn insert(&mut self, path: &str, image: DecodedImage) -> ImageHandle {
        let id = AssetId::from_path(path);
        if self.slots.insert(id, Slot::Ready(image)).is_none() {
            self.paths.push((path.to_string(), id));
        }
        AssetHandle::new(id)
    }

    /// Get statistics about requested images
    pub fn stats(&self) -> AssetStats {
        let mut stats = AssetStats::default();
        for slot in self.slots.values() {
            match slot {
                Slot::Pending => stats.pending += 1,
                Slot::Ready(_) => stats.ready += 1,
                Slot::Failed => stats.failed += 1,
            }
        }
        stats
    }
}

/// Statistics about requested images
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssetStats {
    pub ready: usize,
    pub pending: usize,
    pub failed: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn temp_asset_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("slime-dungeon-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(dir.join("images")).unwrap();
        dir
    }

    #[test]
    fn test_get_before_load_is_none() {
        let cache = AssetCache::new("/nowhere");
        assert!(cache.get("images/player/p-idle.png").is_none());
        assert!(cache.is_ready());
    }

    #[test]
    fn test_missing_image_fails_without_panicking() {
        let mut cache = AssetCache::new("/nowhere");
        cache.load(["images/player/p-idle.png"]);
        assert!(!cache.is_ready());
        assert_eq!(cache.stats().pending, 1);

        cache.poll();
        assert!(cache.is_ready());
        assert!(cache.get("images/player/p-idle.png").is_none());
        assert_eq!(cache.stats().failed, 1);
    }

    #[test]
    fn test_loads_and_decodes_png() {
        let dir = temp_asset_dir("decode");
        let img = image::RgbaImage::from_pixel(4, 2, image::Rgba([255, 0, 0, 255]));
        img.save(dir.join("images/red.png")).unwrap();

        let mut cache = AssetCache::new(&dir);
        cache.load(["images/red.png"]);
        cache.poll();

        let handle = cache.get("images/red.png").expect("image should be ready");
        let decoded = cache.image(handle).unwrap();
        assert_eq!((decoded.width, decoded.height), (4, 2));
        assert_eq!(decoded.rgba.len(), 4 * 2 * 4);

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_garbage_bytes_fail_to_decode() {
        let err = DecodedImage::from_bytes(b"not an image").unwrap_err();
        assert!(matches!(err, AssetError::Decode(_)));
    }

    #[test]
    fn test_ready_callbacks_fire_once() {
        let fired = Rc::new(Cell::new(0));
        let mut cache = AssetCache::new("/nowhere");
        cache.load(vec!["images/a.png", "images/b.png"]);

        let counter = fired.clone();
        cache.on_ready(move || counter.set(counter.get() + 1));

        cache.poll();
        cache.poll();
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn test_duplicate_load_is_ignored() {
        let mut cache = AssetCache::new("/nowhere");
        cache.load(["images/a.png", "images/a.png"]);
        assert_eq!(cache.stats().pending, 1);
    }

    #[test]
    fn test_non_image_is_rejected() {
        let mut cache = AssetCache::new("/nowhere");
        cache.load(["audio/intro.mp3"]);
        assert!(cache.is_ready());
        assert_eq!(cache.stats().failed, 1);
    }

    #[test]
    fn test_insert_makes_image_available() {
        let mut cache = AssetCache::new("/nowhere");
        let handle = cache.insert(
            "images/white.png",
            DecodedImage {
                width: 1,
                height: 1,
                rgba: vec![255; 4],
            },
        );
        assert_eq!(cache.get("images/white.png"), Some(handle));
        assert_eq!(cache.stats().ready, 1);
    }
}
