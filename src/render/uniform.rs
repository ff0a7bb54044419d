use crate::render::layout::{pad_uniform_size, UNIFORM_ALIGNMENT};

/// Uniform block shared by both shader stages. The trailing padding brings
/// the struct up to the backend's 16-byte alignment unit; the shader never
/// reads it.
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneUniforms {
    pub color: [f32; 4],
    pub time: f32,
    pub aspect_ratio: f32,
    pub _padding: [f32; 2],
}

impl SceneUniforms {
    /// Size of the fields the shader actually reads, before padding.
    pub const RAW_SIZE: u64 =
        (std::mem::size_of::<[f32; 4]>() + 2 * std::mem::size_of::<f32>()) as u64;

    pub fn new(color: [f32; 4], time: f32, aspect_ratio: f32) -> Self {
        Self {
            color,
            time,
            aspect_ratio,
            _padding: [0.0; 2],
        }
    }

    pub fn padded_size() -> u64 {
        pad_uniform_size(Self::RAW_SIZE, UNIFORM_ALIGNMENT)
    }
}

/// Width over height of the drawable area, used by the vertex shader to keep
/// the mesh proportions square when the window is not. A zero-sized
/// dimension falls back to 1.
pub fn aspect_ratio(view_dimensions: winit::dpi::PhysicalSize<u32>) -> f32 {
    if view_dimensions.width == 0 || view_dimensions.height == 0 {
        return 1.0;
    }

    view_dimensions.width as f32 / view_dimensions.height as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padded_size_matches_the_repr_c_struct() {
        assert_eq!(SceneUniforms::RAW_SIZE, 24);
        assert_eq!(SceneUniforms::padded_size(), 32);
        assert_eq!(
            SceneUniforms::padded_size(),
            std::mem::size_of::<SceneUniforms>() as u64
        );
    }

    #[test]
    fn padding_is_zeroed() {
        let uniforms = SceneUniforms::new([1.0, 0.5, 0.0, 1.0], 2.0, 1.5);

        assert_eq!(uniforms.aspect_ratio, 1.5);
        assert_eq!(uniforms._padding, [0.0; 2]);
    }

    #[test]
    fn aspect_ratio_follows_the_view_dimensions() {
        let ratio = aspect_ratio(winit::dpi::PhysicalSize::new(640, 480));

        assert_eq!(ratio, 640.0 / 480.0);
    }

    #[test]
    fn zero_sized_views_fall_back_to_a_square_ratio() {
        assert_eq!(aspect_ratio(winit::dpi::PhysicalSize::new(0, 480)), 1.0);
        assert_eq!(aspect_ratio(winit::dpi::PhysicalSize::new(640, 0)), 1.0);
    }
}
