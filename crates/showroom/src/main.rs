//! AutoHall - a real-time car showroom viewer.

mod animation;
mod car;
mod config;
mod scene;
mod state;

use anyhow::Result;
use state::ShowroomApp;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Fullscreen, Window, WindowId},
};

/// Application handler for winit.
struct App {
    state: Option<ShowroomApp>,
}

impl App {
    fn new() -> Self {
        Self { state: None }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_none() {
            let config = config::ShowroomConfig::load();
            let mut window_attrs = Window::default_attributes()
                .with_title("AutoHall")
                .with_inner_size(winit::dpi::LogicalSize::new(
                    config.window_width,
                    config.window_height,
                ));
            if config.fullscreen {
                window_attrs = window_attrs.with_fullscreen(Some(Fullscreen::Borderless(None)));
            }

            let window = match event_loop.create_window(window_attrs) {
                Ok(w) => Arc::new(w),
                Err(e) => {
                    log::error!("Failed to create window: {}", e);
                    event_loop.exit();
                    return;
                }
            };

            match pollster::block_on(ShowroomApp::new(window.clone(), config)) {
                Ok(s) => {
                    self.state = Some(s);
                    window.request_redraw();
                }
                Err(e) => {
                    log::error!("Failed to initialize viewer: {}", e);
                    event_loop.exit();
                }
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let Some(state) = &mut self.state {
            if state.handle_window_event(event) || !state.running {
                event_loop.exit();
            }
        }
    }

    fn device_event(&mut self, _: &ActiveEventLoop, _: DeviceId, event: DeviceEvent) {
        if let Some(state) = &mut self.state {
            state.handle_device_event(event);
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("=== AutoHall Car Showroom ===");
    println!("  WASD / arrows - Move camera   |  Mouse  - Look around");
    println!("  Scroll        - Zoom          |  Click  - Capture cursor");
    println!("  1 / 2 / 3     - Free-roam / orbit / driver seat camera");
    println!("  I/K           - Drive car     |  J/L    - Turn car");
    println!("  O             - Toggle door   |  H      - Headlights");
    println!("  T             - Showroom lights");
    println!("  R             - Reset car     |  Escape - Release cursor / quit");
    println!("=============================");

    log::info!("Starting AutoHall");

    let event_loop = EventLoop::new()?;
    // Poll keeps input latency low; Wait would delay RedrawRequested.
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new();
    event_loop.run_app(&mut app)?;

    Ok(())
}
