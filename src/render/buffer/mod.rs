pub mod allocator;

pub struct VertexBuffer {
    pub gpu_buffer: wgpu::Buffer,
    pub vertex_count: usize,
}

pub struct IndexBuffer {
    pub gpu_buffer: wgpu::Buffer,
    pub format: wgpu::IndexFormat,
    pub count: u32,
}

/// GPU-resident copy of one loaded geometry record.
pub struct GeometryBuffers {
    pub vertex_buffer: VertexBuffer,
    pub index_buffer: IndexBuffer,
}
