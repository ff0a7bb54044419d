use std::path::Path;
use std::time::Instant;

use anyhow::Result;

use crate::render::uniform::SceneUniforms;
use crate::render::RenderSystem;

const MESH_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

pub struct ViewSystem {
    pub window: std::sync::Arc<winit::window::Window>,
    pub render_system: RenderSystem,
    start_time: Instant,
}

impl ViewSystem {
    pub async fn from_window(window: winit::window::Window, shader_path: &Path) -> Result<Self> {
        let window = std::sync::Arc::new(window);

        let render_system = RenderSystem::from_window(window.clone(), shader_path).await?;

        Ok(Self {
            window,
            render_system,
            start_time: Instant::now(),
        })
    }

    pub fn update_view(&mut self) -> Result<()> {
        let time = self.start_time.elapsed().as_secs_f32();
        let aspect_ratio = self.render_system.aspect_ratio();

        self.render_system
            .render(SceneUniforms::new(MESH_COLOR, time, aspect_ratio))?;

        Ok(())
    }
}
