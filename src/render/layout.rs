/// Minimum alignment for uniform block sizes on the backends we target.
pub const UNIFORM_ALIGNMENT: u64 = 16;

/// One entry of the shader contract: a vertex attribute with a fixed format
/// bound to a fixed shader location.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VertexAttributeSpec {
    pub format: wgpu::VertexFormat,
    pub shader_location: u32,
}

/// The attribute list the default shader expects: an interleaved 2D position
/// followed by an RGB color, 5 floats per vertex.
pub const POSITION_COLOR_ATTRIBUTES: [VertexAttributeSpec; 2] = [
    VertexAttributeSpec {
        format: wgpu::VertexFormat::Float32x2,
        shader_location: 0,
    },
    VertexAttributeSpec {
        format: wgpu::VertexFormat::Float32x3,
        shader_location: 1,
    },
];

/// The 3D variant of the contract: xyz position followed by an RGB color,
/// 6 floats per vertex.
pub const POSITION_3D_COLOR_ATTRIBUTES: [VertexAttributeSpec; 2] = [
    VertexAttributeSpec {
        format: wgpu::VertexFormat::Float32x3,
        shader_location: 0,
    },
    VertexAttributeSpec {
        format: wgpu::VertexFormat::Float32x3,
        shader_location: 1,
    },
];

/// Derived byte layout for one interleaved vertex buffer. Constructed only
/// through [`compute_layout`], so stride and offsets cannot drift from the
/// attribute list handed to pipeline creation.
#[derive(Clone, Debug, PartialEq)]
pub struct BufferLayout {
    pub stride_bytes: wgpu::BufferAddress,
    pub attribute_offsets: Vec<wgpu::BufferAddress>,
    attributes: Vec<wgpu::VertexAttribute>,
}

impl BufferLayout {
    pub fn buffer_layout(&self) -> wgpu::VertexBufferLayout {
        wgpu::VertexBufferLayout {
            array_stride: self.stride_bytes,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &self.attributes,
        }
    }

    /// All contract attributes are float-component formats, so the component
    /// count is the stride in f32 units.
    pub fn components_per_vertex(&self) -> usize {
        (self.stride_bytes as usize) / std::mem::size_of::<f32>()
    }
}

/// Computes stride and per-attribute offsets for an interleaved vertex
/// record: each offset is the running sum of the preceding attribute sizes,
/// and the stride is the total. Pure; identical inputs yield identical
/// layouts.
pub fn compute_layout(attributes: &[VertexAttributeSpec]) -> BufferLayout {
    let mut attribute_offsets = Vec::with_capacity(attributes.len());
    let mut gpu_attributes = Vec::with_capacity(attributes.len());
    let mut stride_bytes: wgpu::BufferAddress = 0;

    for attribute in attributes {
        attribute_offsets.push(stride_bytes);
        gpu_attributes.push(wgpu::VertexAttribute {
            format: attribute.format,
            offset: stride_bytes,
            shader_location: attribute.shader_location,
        });
        stride_bytes += attribute.format.size();
    }

    BufferLayout {
        stride_bytes,
        attribute_offsets,
        attributes: gpu_attributes,
    }
}

/// Rounds a raw uniform struct size up to the backend alignment unit. The
/// bytes past the raw size are unused padding.
pub fn pad_uniform_size(raw_size: u64, alignment_unit: u64) -> u64 {
    let padded = raw_size.div_ceil(alignment_unit) * alignment_unit;
    padded.max(raw_size)
}

/// Index buffers are sized by the index element type, never by the point
/// element type. Sizing them from the vertex component width either
/// truncates the upload or over-allocates.
pub fn index_buffer_size(index_count: usize) -> u64 {
    (index_count * std::mem::size_of::<u16>()) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_color_contract_has_expected_stride_and_offsets() {
        let layout = compute_layout(&POSITION_COLOR_ATTRIBUTES);

        assert_eq!(layout.stride_bytes, 20);
        assert_eq!(layout.attribute_offsets, vec![0, 8]);
        assert_eq!(layout.components_per_vertex(), 5);
    }

    #[test]
    fn position_3d_color_contract_has_expected_stride_and_offsets() {
        let layout = compute_layout(&POSITION_3D_COLOR_ATTRIBUTES);

        assert_eq!(layout.stride_bytes, 24);
        assert_eq!(layout.attribute_offsets, vec![0, 12]);
        assert_eq!(layout.components_per_vertex(), 6);
    }

    #[test]
    fn compute_layout_is_pure() {
        assert_eq!(
            compute_layout(&POSITION_COLOR_ATTRIBUTES),
            compute_layout(&POSITION_COLOR_ATTRIBUTES)
        );
    }

    #[test]
    fn offsets_are_running_sums_of_attribute_sizes() {
        let attributes = [
            VertexAttributeSpec {
                format: wgpu::VertexFormat::Float32x3,
                shader_location: 0,
            },
            VertexAttributeSpec {
                format: wgpu::VertexFormat::Float32x3,
                shader_location: 1,
            },
            VertexAttributeSpec {
                format: wgpu::VertexFormat::Float32x2,
                shader_location: 2,
            },
        ];

        let layout = compute_layout(&attributes);

        assert_eq!(layout.attribute_offsets, vec![0, 12, 24]);
        assert_eq!(layout.stride_bytes, 32);
    }

    #[test]
    fn uniform_padding_rounds_up_to_the_alignment_unit() {
        assert_eq!(pad_uniform_size(20, UNIFORM_ALIGNMENT), 32);
        assert_eq!(pad_uniform_size(16, UNIFORM_ALIGNMENT), 16);
        assert_eq!(pad_uniform_size(1, UNIFORM_ALIGNMENT), 16);
        assert_eq!(pad_uniform_size(0, UNIFORM_ALIGNMENT), 0);
    }

    #[test]
    fn uniform_padding_holds_for_arbitrary_raw_sizes() {
        for raw_size in 0..256 {
            let padded = pad_uniform_size(raw_size, UNIFORM_ALIGNMENT);
            assert_eq!(padded % UNIFORM_ALIGNMENT, 0);
            assert!(padded >= raw_size);
        }
    }

    #[test]
    fn index_buffer_is_sized_by_the_index_element() {
        assert_eq!(index_buffer_size(3), 6);
        assert_eq!(index_buffer_size(0), 0);
    }
}
