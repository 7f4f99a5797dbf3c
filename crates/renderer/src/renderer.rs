//! Main renderer managing wgpu state and the frame pipeline.
//!
//! A frame is collect-then-execute: `begin_frame` resets the queue, lights,
//! and statistics; the scene submits models and lights; `end_frame` uploads
//! the camera and light uniforms once, draws the opaque commands, sorts and
//! draws the transparent commands, and presents. Collecting first decouples
//! draw ordering from scene traversal order, which is what makes the
//! transparency sort possible at all.

use crate::camera::{Camera, CameraUniform};
use crate::light::{DirectionalLight, LightRig, PointLight, SpotLight};
use crate::mesh::{Mesh, MeshHandle};
use crate::model::Model;
use crate::pipeline::{
    create_camera_bind_group_layout, create_lights_bind_group_layout, create_opaque_pipeline,
    create_transparent_pipeline,
};
use crate::queue::{RenderCommand, RenderQueue};
use crate::texture::Texture;
use crate::vertex::InstanceData;
use anyhow::Result;
use glam::Vec3;
use procgen::MeshData;
use std::sync::Arc;
use thiserror::Error;
use wgpu::util::DeviceExt;
use winit::window::Window;

/// Capacity of the shared per-draw instance buffer. One slot per queued
/// command; submissions past this are dropped for the frame.
const MAX_DRAWS: u32 = 1024;

/// Per-frame render failure.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The swapchain could not provide a frame. `Lost`/`Outdated` are
    /// handled internally by reconfiguring; what escapes here is fatal.
    #[error("failed to acquire surface frame: {0}")]
    Surface(#[from] wgpu::SurfaceError),
}

/// Main renderer state.
pub struct Renderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: winit::dpi::PhysicalSize<u32>,
    window: Arc<Window>,

    // Pipelines: same shader, different blend/depth-write state.
    opaque_pipeline: wgpu::RenderPipeline,
    transparent_pipeline: wgpu::RenderPipeline,

    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    camera_uniform: CameraUniform,
    /// Camera position cached at `set_camera`, read by transparent-distance
    /// classification during `submit`.
    camera_position: Vec3,

    lights_buffer: wgpu::Buffer,
    lights_bind_group: wgpu::BindGroup,
    lights: LightRig,

    /// One region per queued command, rewritten every frame.
    instance_buffer: wgpu::Buffer,

    depth_texture: Texture,

    meshes: Vec<Mesh>,
    render_queue: RenderQueue,

    clear_color: wgpu::Color,

    // Statistics for the current frame.
    draw_call_count: u32,
    triangle_count: u32,
}

impl Renderer {
    /// Create a new renderer for the given window.
    pub async fn new(window: Arc<Window>) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("Failed to find suitable GPU adapter"))?;

        log::info!("Using GPU: {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Main Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
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
            .unwrap_or(surface_caps.formats[0]);

        // Prefer Mailbox (low-latency vsync) if available; otherwise AutoVsync.
        let present_mode = surface_caps
            .present_modes
            .iter()
            .find(|m| matches!(m, wgpu::PresentMode::Mailbox))
            .copied()
            .unwrap_or(wgpu::PresentMode::AutoVsync);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 1,
        };
        surface.configure(&device, &config);

        // Camera uniform
        let camera_uniform = CameraUniform::new();
        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[camera_uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_bind_group_layout = create_camera_bind_group_layout(&device);
        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        // Lights uniform: every slot written each frame, so a zeroed start
        // state means "all disabled".
        let lights = LightRig::new();
        let lights_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Lights Buffer"),
            contents: bytemuck::cast_slice(&[lights.to_uniform()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let lights_bind_group_layout = create_lights_bind_group_layout(&device);
        let lights_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Lights Bind Group"),
            layout: &lights_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: lights_buffer.as_entire_binding(),
            }],
        });

        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Instance Buffer"),
            size: MAX_DRAWS as u64 * std::mem::size_of::<InstanceData>() as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let depth_texture = Texture::create_depth_texture(&device, &config);

        let opaque_pipeline = create_opaque_pipeline(
            &device,
            &camera_bind_group_layout,
            &lights_bind_group_layout,
            surface_format,
        );
        let transparent_pipeline = create_transparent_pipeline(
            &device,
            &camera_bind_group_layout,
            &lights_bind_group_layout,
            surface_format,
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            window,
            opaque_pipeline,
            transparent_pipeline,
            camera_buffer,
            camera_bind_group,
            camera_uniform,
            camera_position: Vec3::ZERO,
            lights_buffer,
            lights_bind_group,
            lights,
            instance_buffer,
            depth_texture,
            meshes: Vec::new(),
            render_queue: RenderQueue::new(),
            clear_color: wgpu::Color {
                r: 0.1,
                g: 0.1,
                b: 0.15,
                a: 1.0,
            },
            draw_call_count: 0,
            triangle_count: 0,
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn size(&self) -> winit::dpi::PhysicalSize<u32> {
        self.size
    }

    pub fn aspect(&self) -> f32 {
        self.config.width as f32 / self.config.height.max(1) as f32
    }

    pub fn set_clear_color(&mut self, r: f64, g: f64, b: f64) {
        self.clear_color = wgpu::Color { r, g, b, a: 1.0 };
    }

    /// Handle window resize.
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.size = new_size;
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture = Texture::create_depth_texture(&self.device, &self.config);
    }

    // Mesh registry

    /// Upload mesh data and return a handle for submissions.
    pub fn upload_mesh(&mut self, data: &MeshData) -> MeshHandle {
        self.meshes.push(Mesh::from_data(&self.device, data));
        MeshHandle(self.meshes.len() as u32 - 1)
    }

    // Frame pipeline

    /// Start a frame: clear the command queue, the light aggregate, and the
    /// frame statistics.
    pub fn begin_frame(&mut self) {
        self.draw_call_count = 0;
        self.triangle_count = 0;
        self.render_queue.clear();
        self.lights.clear();
    }

    /// Cache the camera matrices and position for this frame. Call before
    /// submitting models so transparent distances are measured from the
    /// current view point.
    pub fn set_camera(&mut self, camera: &Camera) {
        self.camera_uniform.update(camera, self.aspect());
        self.camera_position = camera.position();
    }

    /// Set the directional light for this frame (last one wins).
    pub fn set_directional_light(&mut self, light: DirectionalLight) {
        self.lights.set_directional(light);
    }

    /// Add a point light for this frame; over-capacity submissions are
    /// silently dropped.
    pub fn add_point_light(&mut self, light: PointLight) {
        self.lights.add_point(light);
    }

    /// Add a spot light for this frame; over-capacity submissions are
    /// silently dropped.
    pub fn add_spot_light(&mut self, light: SpotLight) {
        self.lights.add_spot(light);
    }

    /// Queue every visible part of a model for this frame. Transparency is
    /// classified per part from its material's current opacity.
    pub fn submit(&mut self, model: &Model) {
        if !model.is_visible() {
            return;
        }
        for part in model.parts() {
            self.render_queue.push(
                part.mesh,
                part.material,
                model.part_world(part),
                self.camera_position,
            );
        }
    }

    /// Execute the frame: upload uniforms once, draw opaque then sorted
    /// transparent commands, and present.
    pub fn end_frame(&mut self) -> std::result::Result<(), RenderError> {
        self.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[self.camera_uniform]),
        );
        self.queue.write_buffer(
            &self.lights_buffer,
            0,
            bytemuck::cast_slice(&[self.lights.to_uniform()]),
        );

        self.render_queue.sort_transparent();

        // Resolve commands to instance slots up front. A handle that does
        // not resolve is skipped, not an error.
        let mut instances: Vec<InstanceData> = Vec::with_capacity(self.render_queue.len());
        let mut opaque_draws: Vec<(u32, u32)> = Vec::new(); // (mesh index, slot)
        let mut transparent_draws: Vec<(u32, u32)> = Vec::new();

        {
            let mut resolve = |commands: &[RenderCommand], draws: &mut Vec<(u32, u32)>| {
                for command in commands {
                    if instances.len() as u32 >= MAX_DRAWS {
                        log::warn!("instance buffer full, dropping remaining draws this frame");
                        break;
                    }
                    if command.mesh.0 as usize >= self.meshes.len() {
                        log::debug!("skipping draw with stale mesh handle {:?}", command.mesh);
                        continue;
                    }
                    let slot = instances.len() as u32;
                    instances.push(InstanceData::new(&command.world, &command.material));
                    draws.push((command.mesh.0, slot));
                }
            };
            resolve(self.render_queue.opaque(), &mut opaque_draws);
            resolve(self.render_queue.transparent(), &mut transparent_draws);
        }

        if !instances.is_empty() {
            self.queue
                .write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));
        }

        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                // Swapchain went away (resize, minimize): reconfigure and
                // skip this frame.
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(e) => return Err(RenderError::Surface(e)),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        // Opaque pass: clears color and depth, writes depth, no blending.
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Opaque Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            pass.set_pipeline(&self.opaque_pipeline);
            pass.set_bind_group(0, &self.camera_bind_group, &[]);
            pass.set_bind_group(1, &self.lights_bind_group, &[]);
            pass.set_vertex_buffer(1, self.instance_buffer.slice(..));

            for &(mesh_index, slot) in &opaque_draws {
                let mesh = &self.meshes[mesh_index as usize];
                pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..mesh.num_indices, 0, slot..slot + 1);
                self.draw_call_count += 1;
                self.triangle_count += mesh.triangle_count();
            }
        }

        // Transparent pass: loads the opaque result, depth test without
        // writes, alpha blending, back-to-front order from the sort.
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Transparent Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            pass.set_pipeline(&self.transparent_pipeline);
            pass.set_bind_group(0, &self.camera_bind_group, &[]);
            pass.set_bind_group(1, &self.lights_bind_group, &[]);
            pass.set_vertex_buffer(1, self.instance_buffer.slice(..));

            for &(mesh_index, slot) in &transparent_draws {
                let mesh = &self.meshes[mesh_index as usize];
                pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..mesh.num_indices, 0, slot..slot + 1);
                self.draw_call_count += 1;
                self.triangle_count += mesh.triangle_count();
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    // Statistics

    /// Draw calls issued by the last `end_frame`.
    pub fn draw_call_count(&self) -> u32 {
        self.draw_call_count
    }

    /// Triangles drawn by the last `end_frame`.
    pub fn triangle_count(&self) -> u32 {
        self.triangle_count
    }
}
