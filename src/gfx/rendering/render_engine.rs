//! WGPU-based rendering engine for the editor
//!
//! Owns the surface, device and pipelines. Each frame draws the visible scene
//! meshes with flat colors, then the transform handle lines on top, then hands
//! the encoder to an optional UI callback.

use std::{collections::HashMap, sync::Arc};

use cgmath::Matrix4;
use wgpu::{util::DeviceExt, Device, TextureFormat};
use winit::window::Window;

use crate::{
    error::EditorError,
    gfx::{
        camera::camera_utils::CameraUniform,
        resources::{
            global_bindings::{update_global_ubo, GlobalBindings, GlobalUBO},
            material::{FlatMaterial, MeshUniform},
            texture_resource::TextureResource,
        },
        scene::{
            node::{MeshData, NodeId},
            scene::Scene,
            vertex::{LineVertex, Vertex3D},
        },
    },
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

use super::pipeline_manager::{PipelineConfig, PipelineManager};

const FLAT_PIPELINE: &str = "Flat";
const FLAT_DOUBLE_SIDED_PIPELINE: &str = "FlatDoubleSided";
const LINE_PIPELINE: &str = "Lines";

/// Initial capacity of the line overlay buffer, in vertices
const INITIAL_LINE_CAPACITY: usize = 1024;

/// GPU resources of one drawn mesh node
struct MeshGpu {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    uniform: UniformBuffer<MeshUniform>,
    bind_group: wgpu::BindGroup,
    double_sided: bool,
}

/// Growable vertex buffer for the per-frame line overlay
struct LineBuffer {
    buffer: wgpu::Buffer,
    capacity: usize,
    len: u32,
}

impl LineBuffer {
    fn new(device: &Device, capacity: usize) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Line Overlay Buffer"),
            size: (capacity * std::mem::size_of::<LineVertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self {
            buffer,
            capacity,
            len: 0,
        }
    }

    fn upload(&mut self, device: &Device, queue: &wgpu::Queue, vertices: &[LineVertex]) {
        if vertices.len() > self.capacity {
            *self = Self::new(device, vertices.len().next_power_of_two());
        }
        if !vertices.is_empty() {
            queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(vertices));
        }
        self.len = vertices.len() as u32;
    }
}

fn mesh_uniform(world: Matrix4<f32>, material: &FlatMaterial) -> MeshUniform {
    MeshUniform {
        model: world.into(),
        color: material.color.to_array(),
    }
}

/// Core rendering engine managing GPU resources and draw calls
///
/// The RenderEngine handles all low-level graphics operations including:
/// - Surface and device management
/// - Pipeline creation and management
/// - Depth buffer handling
/// - Camera uniform updates
/// - UI overlay rendering
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    format: TextureFormat,
    pub pipeline_manager: PipelineManager,
    global_ubo: GlobalUBO,
    global_bindings: GlobalBindings,
    mesh_layout: BindGroupLayoutWithDesc,
    meshes: HashMap<NodeId, MeshGpu>,
    lines: LineBuffer,
    clear_color: wgpu::Color,
}

impl RenderEngine {
    /// Creates a new render engine for the given window
    ///
    /// # Arguments
    /// * `window` - Window surface target for rendering
    /// * `width` - Initial surface width in pixels
    /// * `height` - Initial surface height in pixels
    /// * `clear_color` - Background color as linear RGBA
    ///
    /// # Errors
    /// Fails when no surface, adapter or device can be created.
    pub async fn new(
        window: Arc<Window>,
        width: u32,
        height: u32,
        clear_color: [f32; 4],
    ) -> Result<RenderEngine, EditorError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        log::info!("Using adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits::downlevel_defaults(),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        // material colors are already sRGB-encoded
        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .unwrap_or(TextureFormat::Bgra8Unorm);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture =
            TextureResource::create_depth_texture(&device, &config, "depth_texture");

        let global_ubo = GlobalUBO::new(&device);
        let global_bindings = GlobalBindings::new(&device, &global_ubo);

        let mesh_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform())
            .create(&device, "Mesh Bind Group Layout");

        let lines = LineBuffer::new(&device, INITIAL_LINE_CAPACITY);

        let device_handle: Arc<Device> = device.into();
        let queue_handle: Arc<wgpu::Queue> = queue.into();
        let mut pipeline_manager = PipelineManager::new(device_handle.clone());

        pipeline_manager.load_shader("flat", include_str!("flat.wgsl"));
        pipeline_manager.load_shader("line", include_str!("line.wgsl"));

        let color_target = |blend| {
            vec![Some(wgpu::ColorTargetState {
                format,
                blend: Some(blend),
                write_mask: wgpu::ColorWrites::ALL,
            })]
        };

        let flat = PipelineConfig::default()
            .with_label("FLAT")
            .with_shader("flat")
            .with_depth_stencil(TextureResource::DEPTH_FORMAT)
            .with_bind_group_layouts(vec![
                global_bindings.bind_group_layout().clone(),
                mesh_layout.layout.clone(),
            ])
            .with_vertex_layouts(vec![Vertex3D::desc()])
            .with_color_targets(color_target(wgpu::BlendState::REPLACE));
        pipeline_manager.register_pipeline(FLAT_PIPELINE, flat.clone());
        pipeline_manager.register_pipeline(
            FLAT_DOUBLE_SIDED_PIPELINE,
            flat.with_label("FLAT DOUBLE SIDED").with_cull_mode(None),
        );

        // Handles are drawn over everything so they stay grabbable
        pipeline_manager.register_pipeline(
            LINE_PIPELINE,
            PipelineConfig::default()
                .with_label("LINES")
                .with_shader("line")
                .with_cull_mode(None)
                .with_primitive_topology(wgpu::PrimitiveTopology::LineList)
                .with_depth_stencil(TextureResource::DEPTH_FORMAT)
                .with_depth_test(wgpu::CompareFunction::Always, false)
                .with_bind_group_layouts(vec![global_bindings.bind_group_layout().clone()])
                .with_vertex_layouts(vec![LineVertex::desc()])
                .with_color_targets(color_target(wgpu::BlendState::ALPHA_BLENDING)),
        );

        if let Err(errors) = pipeline_manager.create_all_pipelines() {
            for error in errors {
                log::error!("{}", error);
            }
        }

        let [r, g, b, a] = clear_color;
        Ok(RenderEngine {
            surface,
            device: device_handle,
            queue: queue_handle,
            config,
            depth_texture,
            format,
            pipeline_manager,
            global_ubo,
            global_bindings,
            mesh_layout,
            meshes: HashMap::new(),
            lines,
            clear_color: wgpu::Color {
                r: r as f64,
                g: g as f64,
                b: b as f64,
                a: a as f64,
            },
        })
    }

    /// Creates GPU buffers for newly drawn meshes, refreshes their uniforms and
    /// drops buffers of meshes that are no longer drawn
    fn sync_meshes(&mut self, scene: &Scene) -> Vec<NodeId> {
        let visible = scene.visible_meshes();
        let mut drawn = Vec::with_capacity(visible.len());

        for (id, world, mesh) in visible {
            let uniform = mesh_uniform(world, &mesh.material);
            match self.meshes.get_mut(&id) {
                Some(gpu) => {
                    gpu.uniform.update_content(&self.queue, uniform);
                    gpu.double_sided = mesh.material.double_sided;
                }
                None => {
                    let gpu = self.create_mesh_gpu(id, mesh, uniform);
                    self.meshes.insert(id, gpu);
                }
            }
            drawn.push(id);
        }

        self.meshes.retain(|id, _| drawn.contains(id));
        drawn
    }

    fn create_mesh_gpu(&self, id: NodeId, mesh: &MeshData, uniform: MeshUniform) -> MeshGpu {
        let label = format!("{:?}", id);
        let vertices = mesh.geometry.to_vertices();

        let vertex_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("Vertex Buffer {}", label)),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("Index Buffer {}", label)),
                contents: bytemuck::cast_slice(&mesh.geometry.indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        let uniform = UniformBuffer::new_with_data(&self.device, &uniform);
        let bind_group = BindGroupBuilder::new(&self.mesh_layout)
            .resource(uniform.binding_resource())
            .create(&self.device, "Mesh Bind Group");

        MeshGpu {
            vertex_buffer,
            index_buffer,
            index_count: mesh.geometry.indices.len() as u32,
            uniform,
            bind_group,
            double_sided: mesh.material.double_sided,
        }
    }

    /// Renders one frame: scene meshes, then the line overlay, then the UI
    ///
    /// # Arguments
    /// * `scene` - Scene whose visible meshes are drawn
    /// * `lines` - World-space line list drawn on top of the scene
    /// * `ui_callback` - Optional function that renders UI elements
    ///
    /// # Errors
    /// Returns the surface error when no frame could be acquired; nothing is drawn.
    pub fn render_frame<F>(
        &mut self,
        scene: &Scene,
        lines: &[LineVertex],
        ui_callback: Option<F>,
    ) -> Result<(), wgpu::SurfaceError>
    where
        F: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        let surface_texture = self.surface.get_current_texture()?;
        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let drawn = self.sync_meshes(scene);
        self.lines.upload(&self.device, &self.queue, lines);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
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
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);

            for id in &drawn {
                let Some(gpu) = self.meshes.get(id) else {
                    continue;
                };
                let pipeline_name = if gpu.double_sided {
                    FLAT_DOUBLE_SIDED_PIPELINE
                } else {
                    FLAT_PIPELINE
                };
                let Some(pipeline) = self.pipeline_manager.pipeline(pipeline_name) else {
                    continue;
                };
                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(1, &gpu.bind_group, &[]);
                render_pass.set_vertex_buffer(0, gpu.vertex_buffer.slice(..));
                render_pass.set_index_buffer(gpu.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..gpu.index_count, 0, 0..1);
            }

            if self.lines.len > 0 {
                if let Some(pipeline) = self.pipeline_manager.pipeline(LINE_PIPELINE) {
                    render_pass.set_pipeline(pipeline);
                    render_pass.set_vertex_buffer(0, self.lines.buffer.slice(..));
                    render_pass.draw(0..self.lines.len, 0..1);
                }
            }
        }

        if let Some(ui_callback) = ui_callback {
            ui_callback(
                &self.device,
                &self.queue,
                &mut encoder,
                &surface_texture_view,
            );
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        Ok(())
    }

    /// Updates the camera uniform buffer
    pub fn update(&mut self, camera_uniform: CameraUniform) {
        update_global_ubo(&mut self.global_ubo, &self.queue, camera_uniform);
    }

    /// Resizes the render engine surface and recreates depth buffer
    ///
    /// Zero sizes (minimized windows) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if self.config.width == width && self.config.height == height {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.reconfigure();
    }

    /// Reconfigures the surface at its current size, after it was lost or outdated
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
    }

    /// Returns current surface dimensions
    pub fn get_surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Returns reference to the wgpu device
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// Returns reference to the wgpu queue
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.format
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::resources::material::Color;
    use cgmath::{SquareMatrix, Vector3};

    #[test]
    fn test_mesh_uniform_carries_world_matrix_and_color() {
        let world = Matrix4::from_translation(Vector3::new(10.0, 0.0, -5.0));
        let uniform = mesh_uniform(world, &FlatMaterial::new(Color::rgb(0.5, 0.25, 1.0)));

        assert_eq!(uniform.model[3], [10.0, 0.0, -5.0, 1.0]);
        assert_eq!(uniform.color, [0.5, 0.25, 1.0, 1.0]);

        let identity = mesh_uniform(Matrix4::identity(), &FlatMaterial::new(Color::WHITE));
        assert_eq!(identity.model[0], [1.0, 0.0, 0.0, 0.0]);
    }
}
