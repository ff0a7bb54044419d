use anyhow::Result;

use crate::error::Error;
use crate::render::layout::{compute_layout, POSITION_3D_COLOR_ATTRIBUTES};

/// Device limits the shader contract actually needs. Constructed fresh per
/// device request; the named fields document what the viewer relies on
/// instead of inheriting an all-default limits table.
#[derive(Clone, Copy, Debug)]
pub struct RequiredLimits {
    /// Position and color.
    pub max_vertex_attributes: u32,
    /// One interleaved buffer.
    pub max_vertex_buffers: u32,
    /// Wide enough for the widest attribute contract.
    pub max_vertex_buffer_array_stride: u32,
    pub max_bind_groups: u32,
    pub max_uniform_buffers_per_shader_stage: u32,
    pub max_uniform_buffer_binding_size: u32,
}

impl Default for RequiredLimits {
    fn default() -> Self {
        Self {
            max_vertex_attributes: 2,
            max_vertex_buffers: 1,
            max_vertex_buffer_array_stride: compute_layout(&POSITION_3D_COLOR_ATTRIBUTES)
                .stride_bytes as u32,
            max_bind_groups: 1,
            max_uniform_buffers_per_shader_stage: 1,
            max_uniform_buffer_binding_size: 64,
        }
    }
}

impl RequiredLimits {
    fn to_wgpu(self) -> wgpu::Limits {
        wgpu::Limits {
            max_vertex_attributes: self.max_vertex_attributes,
            max_vertex_buffers: self.max_vertex_buffers,
            max_vertex_buffer_array_stride: self.max_vertex_buffer_array_stride,
            max_bind_groups: self.max_bind_groups,
            max_uniform_buffers_per_shader_stage: self.max_uniform_buffers_per_shader_stage,
            max_uniform_buffer_binding_size: self.max_uniform_buffer_binding_size,
            ..wgpu::Limits::downlevel_defaults()
        }
    }
}

pub struct RenderSystemState {
    #[allow(dead_code)]
    pub instance: wgpu::Instance,
    pub surface: wgpu::Surface<'static>,
    pub surface_config: wgpu::SurfaceConfiguration,
    #[allow(dead_code)]
    pub adapter: wgpu::Adapter,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub uniform_bind_group_layout: wgpu::BindGroupLayout,
    pub view_dimensions: winit::dpi::PhysicalSize<u32>,
}

impl RenderSystemState {
    pub async fn from_window(window: std::sync::Arc<winit::window::Window>) -> Result<Self> {
        let view_dimensions = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            #[cfg(target_arch = "wasm32")]
            backends: wgpu::Backends::GL,
            #[cfg(not(target_arch = "wasm32"))]
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
        {
            Some(adapter) => adapter,
            None => return Err(Error::new("Failed to retrieve adapter.").into()),
        };

        log::info!("Using adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: RequiredLimits::default().to_wgpu(),
                    label: None,
                    ..Default::default()
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);

        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: view_dimensions.width,
            height: view_dimensions.height,
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        surface.configure(&device, &surface_config);

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("SCENE_UNIFORM_BIND_GROUP_LAYOUT"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        Ok(Self {
            instance,
            surface,
            surface_config,
            adapter,
            device,
            queue,
            uniform_bind_group_layout,
            view_dimensions,
        })
    }

    pub fn set_view_dimensions(&mut self, view_dimensions: winit::dpi::PhysicalSize<u32>) {
        self.view_dimensions = view_dimensions;
        self.surface_config.width = view_dimensions.width;
        self.surface_config.height = view_dimensions.height;
        self.surface.configure(&self.device, &self.surface_config);
    }
}
