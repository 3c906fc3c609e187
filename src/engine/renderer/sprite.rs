// Sprite batching and the quad pipeline

use super::surface::{Color, DrawCommand, Rect};
use super::texture::{TextureKey, TextureManager};
use super::{Camera, CameraUniform, Vertex};
use anyhow::Result;
use glam::{Mat4, Vec2, Vec4};
use std::collections::HashMap;
use std::ops::Range;
use wgpu::util::DeviceExt;

use crate::engine::assets::AssetId;

/// Vertices per quad (two triangles, no index buffer)
const QUAD_VERTICES: u32 = 6;

/// Consecutive quads sharing a texture
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    pub texture: TextureKey,
    pub vertices: Range<u32>,
}

/// CPU-side list of textured quads built from a frame's draw commands
#[derive(Debug, Default)]
pub struct SpriteBatch {
    vertices: Vec<Vertex>,
    batches: Vec<Batch>,
}

impl SpriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the batch from recorded commands
    ///
    /// `image_size` reports the pixel size of an uploaded image; blits of
    /// images it does not know are skipped. Text is left to the UI layer.
    pub fn build<F>(&mut self, commands: &[DrawCommand], image_size: F)
    where
        F: Fn(AssetId) -> Option<Vec2>,
    {
        self.clear();

        for command in commands {
            match command {
                DrawCommand::Clear => self.clear(),
                DrawCommand::Image { image, src, dst } => {
                    let Some(size) = image_size(image.id()) else {
                        continue;
                    };
                    if size.x <= 0.0 || size.y <= 0.0 {
                        continue;
                    }
                    let uv = Rect::new(
                        src.x / size.x,
                        src.y / size.y,
                        src.w / size.x,
                        src.h / size.y,
                    );
                    self.push_quad(TextureKey::Image(image.id()), *dst, uv, Color::WHITE);
                }
                DrawCommand::FillRect { rect, color } => {
                    self.push_fill(*rect, *color);
                }
                DrawCommand::StrokeRect {
                    rect,
                    color,
                    line_width,
                } => {
                    let half = line_width / 2.0;
                    let (x, y, w, h, lw) = (rect.x, rect.y, rect.w, rect.h, *line_width);
                    self.push_fill(Rect::new(x - half, y - half, w + lw, lw), *color);
                    self.push_fill(Rect::new(x - half, y + h - half, w + lw, lw), *color);
                    self.push_fill(Rect::new(x - half, y + half, lw, h - lw), *color);
                    self.push_fill(Rect::new(x + w - half, y + half, lw, h - lw), *color);
                }
                DrawCommand::Text { .. } => {}
            }
        }
    }

    fn push_fill(&mut self, rect: Rect, color: Color) {
        self.push_quad(TextureKey::White, rect, Rect::new(0.0, 0.0, 1.0, 1.0), color);
    }

    fn push_quad(&mut self, texture: TextureKey, dst: Rect, uv: Rect, color: Color) {
        if dst.is_empty() {
            return;
        }

        let tint = Vec4::from_array(color.0);
        let (x0, y0, x1, y1) = (dst.x, dst.y, dst.x + dst.w, dst.y + dst.h);
        let (u0, v0, u1, v1) = (uv.x, uv.y, uv.x + uv.w, uv.y + uv.h);

        let top_left = Vertex::new(Vec2::new(x0, y0), Vec2::new(u0, v0), tint);
        let top_right = Vertex::new(Vec2::new(x1, y0), Vec2::new(u1, v0), tint);
        let bottom_left = Vertex::new(Vec2::new(x0, y1), Vec2::new(u0, v1), tint);
        let bottom_right = Vertex::new(Vec2::new(x1, y1), Vec2::new(u1, v1), tint);

        let start = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&[
            top_left,
            bottom_left,
            bottom_right,
            top_left,
            bottom_right,
            top_right,
        ]);
        let end = start + QUAD_VERTICES;

        match self.batches.last_mut() {
            Some(batch) if batch.texture == texture => batch.vertices.end = end,
            _ => self.batches.push(Batch {
                texture,
                vertices: start..end,
            }),
        }
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.batches.clear();
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn batches(&self) -> &[Batch] {
        &self.batches
    }

    /// Number of quads in the batch
    #[cfg(test)]
    pub fn quad_count(&self) -> usize {
        self.vertices.len() / QUAD_VERTICES as usize
    }
}

/// Draws a `SpriteBatch` with one pipeline and a bind group per texture
pub struct SpriteRenderer {
    render_pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    vertex_capacity: usize,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_groups: HashMap<TextureKey, wgpu::BindGroup>,
}

impl SpriteRenderer {
    /// Create a new sprite renderer
    pub fn new(device: &wgpu::Device, config: &wgpu::SurfaceConfiguration) -> Result<Self> {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Sprite Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/sprite.wgsl").into()),
        });

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let texture_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Texture Bind Group Layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            multisampled: false,
                            view_dimension: wgpu::TextureViewDimension::D2,
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Sprite Pipeline Layout"),
            bind_group_layouts: &[&camera_bind_group_layout, &texture_bind_group_layout],
            push_constant_ranges: &[],
        });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Sprite Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[Vertex::desc()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // The y-down projection flips winding
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
        });

        let vertex_capacity = 1024;
        let vertex_buffer = Self::create_vertex_buffer(device, vertex_capacity);

        let camera_uniform = CameraUniform {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
        };

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[camera_uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        Ok(Self {
            render_pipeline,
            vertex_buffer,
            vertex_capacity,
            camera_buffer,
            camera_bind_group,
            bind_group_layout: texture_bind_group_layout,
            bind_groups: HashMap::new(),
        })
    }

    fn create_vertex_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Sprite Vertex Buffer"),
            size: (capacity * std::mem::size_of::<Vertex>()) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    /// Upload the batch and camera, creating missing bind groups
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        textures: &TextureManager,
        camera: &Camera,
        batch: &SpriteBatch,
    ) {
        queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[CameraUniform::new(camera)]),
        );

        let vertices = batch.vertices();
        if vertices.len() > self.vertex_capacity {
            self.vertex_capacity = vertices.len().next_power_of_two();
            self.vertex_buffer = Self::create_vertex_buffer(device, self.vertex_capacity);
        }
        if !vertices.is_empty() {
            queue.write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(vertices));
        }

        for entry in batch.batches() {
            if self.bind_groups.contains_key(&entry.texture) {
                continue;
            }
            let Some(texture) = textures.get(entry.texture) else {
                continue;
            };
            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Texture Bind Group"),
                layout: &self.bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&texture.view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(&texture.sampler),
                    },
                ],
            });
            self.bind_groups.insert(entry.texture, bind_group);
        }
    }

    /// Record draw calls for a prepared batch
    pub fn render<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>, batch: &SpriteBatch) {
        if batch.batches().is_empty() {
            return;
        }

        render_pass.set_pipeline(&self.render_pipeline);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_bind_group(0, &self.camera_bind_group, &[]);

        for entry in batch.batches() {
            let Some(bind_group) = self.bind_groups.get(&entry.texture) else {
                continue;
            };
            render_pass.set_bind_group(1, bind_group, &[]);
            render_pass.draw(entry.vertices.clone(), 0..1);
        }
    }
}
