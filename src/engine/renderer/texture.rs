// GPU textures for decoded images

use anyhow::Result;
use std::collections::HashMap;

use crate::engine::assets::{AssetId, DecodedImage};

/// Key of an uploaded texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureKey {
    /// Image uploaded from the asset cache
    Image(AssetId),
    /// 1x1 white texture used for solid fills
    White,
}

/// A loaded texture with GPU resources
///
/// The view keeps the underlying GPU texture alive.
pub struct Texture {
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    pub width: u32,
    pub height: u32,
}

impl Texture {
    /// Upload RGBA8 pixels
    pub fn from_rgba(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        rgba: &[u8],
        width: u32,
        height: u32,
        label: Option<&str>,
    ) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if width == 0 || height == 0 || rgba.len() != expected {
            anyhow::bail!(
                "Invalid texture data for {:?}: {}x{} with {} bytes",
                label,
                width,
                height,
                rgba.len()
            );
        }

        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label,
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            rgba,
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        // Pixel art: sample nearest in both directions
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Ok(Self {
            view,
            sampler,
            width,
            height,
        })
    }

    /// Upload a decoded image
    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: &DecodedImage,
        label: Option<&str>,
    ) -> Result<Self> {
        Self::from_rgba(device, queue, &image.rgba, image.width, image.height, label)
    }

    /// Create a solid color texture
    pub fn from_color(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        color: [u8; 4],
        label: Option<&str>,
    ) -> Result<Self> {
        Self::from_rgba(device, queue, &color, 1, 1, label)
    }
}

/// Owns every texture on the GPU
pub struct TextureManager {
    textures: HashMap<TextureKey, Texture>,
}

impl TextureManager {
    /// Create a new texture manager holding the white fill texture
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Result<Self> {
        let mut textures = HashMap::new();
        textures.insert(
            TextureKey::White,
            Texture::from_color(device, queue, [255, 255, 255, 255], Some("White"))?,
        );
        Ok(Self { textures })
    }

    /// Upload an image unless it is already on the GPU
    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        id: AssetId,
        image: &DecodedImage,
    ) -> Result<bool> {
        let key = TextureKey::Image(id);
        if self.textures.contains_key(&key) {
            return Ok(false);
        }

        let texture = Texture::from_image(device, queue, image, Some("Image"))?;
        self.textures.insert(key, texture);
        Ok(true)
    }

    /// Get a texture by key
    pub fn get(&self, key: TextureKey) -> Option<&Texture> {
        self.textures.get(&key)
    }

    pub fn contains(&self, key: TextureKey) -> bool {
        self.textures.contains_key(&key)
    }

    /// Get the number of loaded textures
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }
}
