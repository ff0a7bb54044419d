use std::path::Path;

use winit::application::ApplicationHandler;
use winit::error::EventLoopError;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop, EventLoopProxy};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::args::Args;
use crate::resource::geometry::file::load_geometry;
use crate::view::ViewSystem;

const DEFAULT_GEOMETRY_PATH: &str = "resources/webgpu.txt";
const DEFAULT_SHADER_PATH: &str = "resources/shader.wgsl";

pub struct App {
    event_loop_proxy: EventLoopProxy<UserEvent>,
    args: Args,
    view_system: Option<ViewSystem>,
}

impl App {
    pub fn new(event_loop: &EventLoop<UserEvent>, args: Args) -> Self {
        App {
            event_loop_proxy: event_loop.create_proxy(),
            args,
            view_system: None,
        }
    }

    pub fn create_event_loop() -> Result<EventLoop<UserEvent>, EventLoopError> {
        EventLoop::<UserEvent>::with_user_event().build()
    }

    fn create_window(event_loop: &ActiveEventLoop) -> Window {
        cfg_if::cfg_if! {
            if #[cfg(target_arch="wasm32")] {
                todo!()
            } else {
                event_loop.create_window(
                    Window::default_attributes().with_title("Mesh Viewer"),
                ).unwrap()
            }
        }
    }

    async fn initialize_view_system(
        event_loop_proxy: EventLoopProxy<UserEvent>,
        window: Window,
        shader_path: String,
    ) {
        let view_system = ViewSystem::from_window(window, Path::new(&shader_path))
            .await
            .unwrap();
        assert!(event_loop_proxy
            .send_event(UserEvent::ViewSystemReady(view_system))
            .is_ok());
    }
}

impl ApplicationHandler<UserEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        log::info!("Application resumed");

        let window = App::create_window(event_loop);
        let event_loop_proxy = self.event_loop_proxy.clone();
        let shader_path = self
            .args
            .shader
            .clone()
            .unwrap_or_else(|| String::from(DEFAULT_SHADER_PATH));

        let future = async move {
            App::initialize_view_system(event_loop_proxy, window, shader_path).await;
        };

        cfg_if::cfg_if! {
            if #[cfg(target_arch="wasm32")] {
                wasm_bindgen_futures::spawn_local(future);
            } else {
                pollster::block_on(future);
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let view_system = match &mut self.view_system {
            Some(view_system) => view_system,
            None => return,
        };

        if view_system.window.id() != window_id {
            return;
        }

        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::Resized(new_size) => {
                view_system.render_system.set_view_dimensions(new_size)
            }
            WindowEvent::RedrawRequested => {
                match view_system.update_view() {
                    Ok(_) => {}
                    Err(error) => {
                        if let Some(error) = error.downcast_ref::<wgpu::SurfaceError>() {
                            match error {
                                wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
                                    view_system.render_system.sync_view_dimensions()
                                }
                                wgpu::SurfaceError::OutOfMemory => {
                                    log::error!("OutOfMemory");
                                    event_loop.exit();
                                }
                                wgpu::SurfaceError::Timeout => {
                                    log::warn!("Surface timeout");
                                }
                            }
                        }
                    }
                }

                view_system.window.request_redraw();
            }
            _ => {}
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: UserEvent) {
        let UserEvent::ViewSystemReady(mut view_system) = event;

        log::info!("View system created");

        let geometry_path = self
            .args
            .geometry
            .clone()
            .unwrap_or_else(|| String::from(DEFAULT_GEOMETRY_PATH));

        // Geometry loads once at startup; a load failure aborts the run
        // instead of presenting an empty scene.
        let record = match load_geometry(Path::new(&geometry_path)) {
            Ok(record) => record,
            Err(error) => {
                log::error!("Could not load geometry: {error}");
                event_loop.exit();
                return;
            }
        };

        if let Err(error) = view_system.render_system.load_geometry(record) {
            log::error!("Could not upload geometry: {error}");
            event_loop.exit();
            return;
        }

        view_system.window.request_redraw();
        self.view_system = Some(view_system);
    }
}

pub enum UserEvent {
    ViewSystemReady(ViewSystem),
}
