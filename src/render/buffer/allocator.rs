use anyhow::Result;

use crate::render::buffer::{GeometryBuffers, IndexBuffer, VertexBuffer};
use crate::render::layout::{index_buffer_size, BufferLayout};
use crate::resource::geometry::GeometryRecord;

/// Sizes and uploads the vertex and index buffers for one geometry record.
/// The record is only borrowed; its arrays can be dropped once this
/// allocator finishes.
pub struct GeometryBufferAllocator {
    label: String,
}

impl GeometryBufferAllocator {
    pub fn new(label: String) -> Self {
        Self { label }
    }

    pub fn finish(
        self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &BufferLayout,
        record: &GeometryRecord,
    ) -> Result<GeometryBuffers> {
        let vertex_buffer = self.allocate_vertex_buffer(device, queue, layout, record);
        let index_buffer = self.allocate_index_buffer(device, queue, record);

        queue.submit([]);

        Ok(GeometryBuffers {
            vertex_buffer,
            index_buffer,
        })
    }

    fn allocate_vertex_buffer(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &BufferLayout,
        record: &GeometryRecord,
    ) -> VertexBuffer {
        let gpu_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{}_VERTEX_BUFFER", self.label)),
            size: record.point_byte_size(),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        queue.write_buffer(&gpu_buffer, 0, bytemuck::cast_slice(&record.points));

        VertexBuffer {
            gpu_buffer,
            vertex_count: record.vertex_count(layout.components_per_vertex()),
        }
    }

    fn allocate_index_buffer(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        record: &GeometryRecord,
    ) -> IndexBuffer {
        let size = index_buffer_size(record.indices.len());
        debug_assert_eq!(size, record.index_byte_size());

        // Copies into GPU buffers must be 4-byte aligned, so an odd index
        // count gets trailing zero bytes past the real data.
        let padded_size = size.next_multiple_of(wgpu::COPY_BUFFER_ALIGNMENT);

        let gpu_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{}_INDEX_BUFFER", self.label)),
            size: padded_size,
            usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        if padded_size > 0 {
            let mut data = bytemuck::cast_slice::<u16, u8>(&record.indices).to_vec();
            data.resize(padded_size as usize, 0);
            queue.write_buffer(&gpu_buffer, 0, &data);
        }

        IndexBuffer {
            gpu_buffer,
            format: wgpu::IndexFormat::Uint16,
            count: record.indices.len() as u32,
        }
    }
}
