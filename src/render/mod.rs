use std::path::Path;

use anyhow::Result;

use crate::error::Error;
use crate::render::buffer::allocator::GeometryBufferAllocator;
use crate::render::buffer::GeometryBuffers;
use crate::render::layout::POSITION_COLOR_ATTRIBUTES;
use crate::render::pipeline::RenderPipeline;
use crate::render::shader::ShaderModulePackage;
use crate::render::state::RenderSystemState;
use crate::render::uniform::SceneUniforms;
use crate::resource::geometry::GeometryRecord;

mod buffer;
pub mod layout;
mod pipeline;
mod shader;
mod state;
pub mod uniform;

pub struct RenderSystem {
    state: RenderSystemState,
    pipeline: RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    geometry: Option<GeometryBuffers>,
}

impl RenderSystem {
    pub async fn from_window(
        window: std::sync::Arc<winit::window::Window>,
        shader_path: &Path,
    ) -> Result<Self> {
        let state = RenderSystemState::from_window(window).await?;

        let shader = ShaderModulePackage::from_wgsl_path(shader_path, "MESH", &state.device)?;

        let pipeline = RenderPipeline::from_attributes(
            &POSITION_COLOR_ATTRIBUTES,
            "MESH",
            &state.device,
            &[&state.uniform_bind_group_layout],
            &shader,
            state.surface_config.format,
        );

        let uniform_buffer = state.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("SCENE_UNIFORM_BUFFER"),
            size: SceneUniforms::padded_size(),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_bind_group = state.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("SCENE_UNIFORM_BIND_GROUP"),
            layout: &state.uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        Ok(Self {
            state,
            pipeline,
            uniform_buffer,
            uniform_bind_group,
            geometry: None,
        })
    }

    /// Uploads a parsed geometry record. The record is consumed by value;
    /// its arrays are no longer needed once the bytes reach the GPU.
    pub fn load_geometry(&mut self, record: GeometryRecord) -> Result<()> {
        let components_per_vertex = self.pipeline.layout.components_per_vertex();

        if !record.indices_in_bounds(components_per_vertex) {
            return Err(Error::new(format!(
                "Geometry indices reference vertices past the {} loaded",
                record.vertex_count(components_per_vertex)
            ))
            .into());
        }

        let buffers = GeometryBufferAllocator::new(String::from("MESH")).finish(
            &self.state.device,
            &self.state.queue,
            &self.pipeline.layout,
            &record,
        )?;

        log::info!(
            "Uploaded geometry: {} vertices, {} indices",
            buffers.vertex_buffer.vertex_count,
            buffers.index_buffer.count
        );

        self.geometry = Some(buffers);

        Ok(())
    }

    pub fn aspect_ratio(&self) -> f32 {
        uniform::aspect_ratio(self.state.view_dimensions)
    }

    pub fn sync_view_dimensions(&mut self) {
        self.set_view_dimensions(self.state.view_dimensions);
    }

    pub fn set_view_dimensions(&mut self, view_dimensions: winit::dpi::PhysicalSize<u32>) {
        if view_dimensions.width == 0 || view_dimensions.height == 0 {
            return;
        }

        self.state.set_view_dimensions(view_dimensions);
    }

    pub fn render(&mut self, uniforms: SceneUniforms) -> Result<()> {
        self.state
            .queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));

        let output = self.state.surface.get_current_texture()?;

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder =
            self.state
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("RENDER_SYSTEM_COMMAND_ENCODER"),
                });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("RENDER_SYSTEM_RENDER_PASS"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.05,
                            g: 0.05,
                            b: 0.05,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if let Some(geometry) = &self.geometry {
                if geometry.index_buffer.count > 0 {
                    render_pass.set_pipeline(&self.pipeline.gpu_pipeline);
                    render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
                    render_pass
                        .set_vertex_buffer(0, geometry.vertex_buffer.gpu_buffer.slice(..));
                    render_pass.set_index_buffer(
                        geometry.index_buffer.gpu_buffer.slice(..),
                        geometry.index_buffer.format,
                    );
                    render_pass.draw_indexed(0..geometry.index_buffer.count, 0, 0..1);
                }
            }
        }

        self.state.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}
