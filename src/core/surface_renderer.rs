use std::collections::HashMap;
use std::sync::Arc;

use wgpu::util::DeviceExt;
use wgpu::{BindGroup, Buffer, Device, RenderPipeline, Surface, SurfaceConfiguration, TextureView};
use winit::event::WindowEvent;
use winit::window::Window;

use super::backend::{FrameContext, OverlayAction, RenderBackend};
use super::display_context::Viewport;
use super::gpu_context::GpuContext;
use super::overlay::Overlay;
use crate::camera::CameraUniform;
use crate::error::{Result, ViewerError};
use crate::math::srgb_to_linear;
use crate::scene::{MeshHandle, SceneMesh};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Interleaved vertex with the mesh color baked in
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct MeshVertex {
    position: [f32; 3],
    normal: [f32; 3],
    color: [f32; 3],
}

impl MeshVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x3];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Buffers of one uploaded mesh, in world space
struct GpuMesh {
    vertex_buffer: Buffer,
    index_buffer: Buffer,
    index_count: u32,
}

impl GpuMesh {
    fn upload(device: &Device, mesh: &SceneMesh) -> Self {
        let color = srgb_to_linear(mesh.spec.rgb());
        let vertices: Vec<MeshVertex> = mesh
            .data
            .positions
            .iter()
            .zip(&mesh.data.normals)
            .map(|(position, normal)| MeshVertex {
                position: (*position + mesh.position).to_array(),
                normal: normal.to_array(),
                color,
            })
            .collect();

        let label = format!("{} ({})", mesh.handle, mesh.spec.kind);
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} vertices")),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} indices")),
            contents: bytemuck::cast_slice(&mesh.data.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.data.indices.len() as u32,
        }
    }

    fn destroy(&self) {
        self.vertex_buffer.destroy();
        self.index_buffer.destroy();
    }
}

/// wgpu implementation of [`RenderBackend`] drawing into a winit window.
///
/// The device is acquired in [`WgpuBackend::new`]; the surface is configured
/// on mount and given back on `release_surface`.
pub struct WgpuBackend {
    window: Arc<Window>,
    gpu: GpuContext,
    surface: Option<Surface<'static>>,
    surface_config: SurfaceConfiguration,
    depth_view: Option<TextureView>,
    pipeline: RenderPipeline,
    camera_buffer: Buffer,
    camera_bind_group: BindGroup,
    meshes: HashMap<MeshHandle, GpuMesh>,
    overlay: Option<Overlay>,
}

impl WgpuBackend {
    pub async fn new(window: Arc<Window>, show_ui: bool) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });
        let surface = instance.create_surface(window.clone())?;
        let gpu = GpuContext::for_surface(&instance, &surface).await?;

        let surface_caps = surface.get_capabilities(gpu.adapter());
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(ViewerError::UnsupportedSurface)?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let surface_config = SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        let camera_buffer = gpu.device().create_buffer(&wgpu::BufferDescriptor {
            label: Some("Camera Uniform Buffer"),
            size: std::mem::size_of::<CameraUniform>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let (pipeline, camera_bind_group) =
            Self::create_mesh_pipeline(gpu.device(), &camera_buffer, surface_format);

        let overlay = show_ui.then(|| Overlay::new(&window, gpu.device(), surface_format));

        Ok(Self {
            window,
            gpu,
            surface: Some(surface),
            surface_config,
            depth_view: None,
            pipeline,
            camera_buffer,
            camera_bind_group,
            meshes: HashMap::new(),
            overlay,
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Offer a window event to the overlay. Returns true when the overlay
    /// consumed it.
    pub fn on_window_event(&mut self, event: &WindowEvent) -> bool {
        match &mut self.overlay {
            Some(overlay) => overlay.on_window_event(&self.window, event),
            None => false,
        }
    }

    fn configure_surface(&mut self, width: u32, height: u32) -> Result<()> {
        let surface = self
            .surface
            .as_ref()
            .ok_or(ViewerError::AlreadyReleased("surface"))?;
        self.surface_config.width = width.max(1);
        self.surface_config.height = height.max(1);
        surface.configure(self.gpu.device(), &self.surface_config);
        self.depth_view = Some(Self::create_depth_view(self.gpu.device(), &self.surface_config));
        Ok(())
    }

    fn create_depth_view(device: &Device, config: &SurfaceConfiguration) -> TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: config.width,
                height: config.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    fn create_mesh_pipeline(
        device: &Device,
        camera_buffer: &Buffer,
        surface_format: wgpu::TextureFormat,
    ) -> (RenderPipeline, BindGroup) {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Mesh Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../mesh.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Camera Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Mesh Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Mesh Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[MeshVertex::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        (pipeline, bind_group)
    }
}

impl RenderBackend for WgpuBackend {
    fn mount(&mut self, viewport: Viewport) -> Result<()> {
        self.configure_surface(viewport.width as u32, viewport.height as u32)?;
        log::info!(
            "Surface configured: {}x{} {:?}",
            self.surface_config.width,
            self.surface_config.height,
            self.surface_config.format
        );
        Ok(())
    }

    fn add_mesh(&mut self, mesh: &SceneMesh) -> Result<()> {
        let gpu_mesh = GpuMesh::upload(self.gpu.device(), mesh);
        if let Some(previous) = self.meshes.insert(mesh.handle, gpu_mesh) {
            previous.destroy();
        }
        Ok(())
    }

    fn remove_mesh(&mut self, handle: MeshHandle) {
        if let Some(mesh) = self.meshes.remove(&handle) {
            mesh.destroy();
        }
    }

    fn resize(&mut self, viewport: Viewport) {
        if let Err(e) = self.configure_surface(viewport.width as u32, viewport.height as u32) {
            log::warn!("Ignoring resize: {}", e);
        }
    }

    fn render(&mut self, frame: &FrameContext<'_>) -> Result<Vec<OverlayAction>> {
        let surface = self
            .surface
            .as_ref()
            .ok_or(ViewerError::AlreadyReleased("surface"))?;
        let depth_view = self
            .depth_view
            .as_ref()
            .ok_or(ViewerError::AlreadyReleased("depth buffer"))?;

        let output = match surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("Surface lost or outdated, reconfiguring");
                surface.configure(self.gpu.device(), &self.surface_config);
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.gpu.queue().write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[frame.camera.to_uniform()]),
        );

        let mut encoder = self
            .gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Mesh Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.camera_bind_group, &[]);

            for mesh in frame.scene.meshes() {
                let Some(gpu_mesh) = self.meshes.get(&mesh.handle) else {
                    continue;
                };
                render_pass.set_vertex_buffer(0, gpu_mesh.vertex_buffer.slice(..));
                render_pass.set_index_buffer(gpu_mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..gpu_mesh.index_count, 0, 0..1);
            }
        }

        let actions = match &mut self.overlay {
            Some(overlay) => overlay.draw(
                &self.window,
                self.gpu.device(),
                self.gpu.queue(),
                &mut encoder,
                &view,
                [self.surface_config.width, self.surface_config.height],
                frame,
            ),
            None => Vec::new(),
        };

        self.gpu.queue().submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(actions)
    }

    fn release_meshes(&mut self) -> Result<()> {
        let count = self.meshes.len();
        for (_, mesh) in self.meshes.drain() {
            mesh.destroy();
        }
        log::debug!("Released {} meshes", count);
        Ok(())
    }

    fn release_surface(&mut self) -> Result<()> {
        self.overlay = None;
        self.depth_view = None;
        self.camera_buffer.destroy();
        let surface = self
            .surface
            .take()
            .ok_or(ViewerError::AlreadyReleased("surface"))?;
        drop(surface);
        log::debug!("Surface released");
        Ok(())
    }

    fn mesh_count(&self) -> usize {
        self.meshes.len()
    }
}
