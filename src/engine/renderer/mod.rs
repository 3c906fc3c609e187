// Rendering system using wgpu
//
// The game draws into a `DrawList` through the `Surface` trait; the
// `Renderer` replays that list on the GPU as textured quads.

mod camera;
mod sprite;
pub mod surface;
pub mod texture;
mod vertex;

pub use camera::{Camera, CameraUniform};
pub use sprite::{SpriteBatch, SpriteRenderer};
pub use surface::DrawList;
pub use texture::{TextureKey, TextureManager};
pub use vertex::Vertex;

use anyhow::Result;
use glam::Vec2;
use log::{info, warn};
use std::sync::Arc;
use winit::window::Window;

use crate::core::math::SurfaceSize;
use crate::engine::assets::AssetCache;

/// Main renderer responsible for initializing wgpu and coordinating rendering
pub struct Renderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: winit::dpi::PhysicalSize<u32>,
    sprite_renderer: SpriteRenderer,
    sprite_batch: SpriteBatch,
    texture_manager: TextureManager,
    camera: Camera,
}

impl Renderer {
    /// Create a new renderer for the given window and logical play surface
    pub async fn new(window: Arc<Window>, play_surface: SurfaceSize) -> Result<Self> {
        let size = window.inner_size();

        // Create wgpu instance
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        // Create surface
        let surface = instance.create_surface(window.clone())?;

        // Request adapter
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("Failed to find suitable GPU adapter"))?;

        info!("Using GPU: {}", adapter.get_info().name);

        // Request device and queue
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Main Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                        .using_resolution(adapter.limits()),
                },
                None,
            )
            .await?;

        // Configure surface
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("Surface reports no supported formats"))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        surface.configure(&device, &config);

        let sprite_renderer = SpriteRenderer::new(&device, &config)?;
        let texture_manager = TextureManager::new(&device, &queue)?;

        // The camera always spans the play surface, whatever the window size
        let camera = Camera::new(play_surface.width, play_surface.height);

        info!(
            "Renderer initialized with {}x{} resolution",
            size.width, size.height
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            sprite_renderer,
            sprite_batch: SpriteBatch::new(),
            texture_manager,
            camera,
        })
    }

    /// Resize the renderer
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            info!("Renderer resized to {}x{}", new_size.width, new_size.height);
        }
    }

    /// Reconfigure the surface at its current size (after it was lost)
    pub fn reconfigure(&mut self) {
        self.resize(self.size);
    }

    /// Upload every decoded image not yet on the GPU
    pub fn upload_images(&mut self, assets: &AssetCache) {
        let mut uploaded = 0;
        for (handle, image) in assets.images() {
            if self.texture_manager.contains(TextureKey::Image(handle.id())) {
                continue;
            }
            match self
                .texture_manager
                .upload(&self.device, &self.queue, handle.id(), image)
            {
                Ok(_) => uploaded += 1,
                Err(e) => warn!("Could not upload texture {:?}: {}", handle.id(), e),
            }
        }

        if uploaded > 0 {
            info!(
                "Uploaded {} textures ({} on the GPU)",
                uploaded,
                self.texture_manager.texture_count()
            );
        }
    }

    /// Render a recorded frame
    pub fn render(&mut self, frame: &DrawList) -> Result<()> {
        let textures = &self.texture_manager;
        self.sprite_batch.build(frame.commands(), |id| {
            textures
                .get(TextureKey::Image(id))
                .map(|t| Vec2::new(t.width as f32, t.height as f32))
        });

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        self.sprite_renderer.prepare(
            &self.device,
            &self.queue,
            &self.texture_manager,
            &self.camera,
            &self.sprite_batch,
        );

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.sprite_renderer
                .render(&mut render_pass, &self.sprite_batch);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}
