use std::path::Path;

use anyhow::Result;

/// Shader module holding both the vertex and fragment entry points
/// (`vs_main` / `fs_main`) of one WGSL source file.
pub struct ShaderModulePackage {
    pub gpu_module: wgpu::ShaderModule,
}

impl ShaderModulePackage {
    pub fn from_wgsl_path(path: &Path, name: &str, device: &wgpu::Device) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;

        log::debug!("Creating shader module {name} from {}", path.display());

        Ok(Self::from_wgsl_source(&source, name, device))
    }

    pub fn from_wgsl_source(source: &str, name: &str, device: &wgpu::Device) -> Self {
        Self {
            gpu_module: device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(&format!("{name}_SHADER_MODULE")),
                source: wgpu::ShaderSource::Wgsl(source.into()),
            }),
        }
    }
}
