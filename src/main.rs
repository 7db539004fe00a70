use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use shape_viewer::cli::Cli;
use shape_viewer::core::{OverlayAction, PointerEvent, Viewport, WgpuBackend, WinitController};
use shape_viewer::frame::FrameIterator;
use shape_viewer::{ShapeCanvas, ShapeStore};

// === Application ===

struct App {
    cli: Cli,
    store: ShapeStore,
    window: Option<Arc<Window>>,
    canvas: Option<ShapeCanvas<WgpuBackend>>,
    input: WinitController,
    frames: FrameIterator,
    /// Why startup failed, returned from `main` once the loop exits
    init_error: Option<anyhow::Error>,
}

impl App {
    fn new(cli: Cli, store: ShapeStore) -> Self {
        Self {
            cli,
            store,
            window: None,
            canvas: None,
            input: WinitController::new(),
            frames: FrameIterator::new(),
            init_error: None,
        }
    }

    fn mount(&mut self, window: Arc<Window>) -> shape_viewer::Result<ShapeCanvas<WgpuBackend>> {
        let size = window.inner_size();
        let backend = pollster::block_on(WgpuBackend::new(window, !self.cli.no_ui))?;
        let mut canvas = ShapeCanvas::mount(backend, Viewport::from_size(size.width, size.height))?;
        canvas.set_shapes(self.store.shapes())?;
        Ok(canvas)
    }

    fn unmount(&mut self) {
        if let Some(canvas) = self.canvas.take() {
            let report = canvas.unmount();
            if !report.is_clean() {
                log::warn!("Teardown finished with {} failures", report.failures.len());
            }
        }
    }

    /// Apply overlay edits to the store, persist them and resync the canvas
    fn apply_actions(&mut self, actions: Vec<OverlayAction>) {
        let mut changed = false;
        for action in actions {
            match action {
                OverlayAction::CreateShape { name, shape_type } => {
                    match self.store.create(&name, &shape_type) {
                        Ok(shape) => {
                            log::info!("Created shape {} ({}, {})", shape.id, shape.name, shape.shape_type);
                            changed = true;
                        }
                        Err(e) => log::warn!("Rejected new shape: {}", e),
                    }
                }
                OverlayAction::DeleteShape(id) => {
                    if let Some(shape) = self.store.delete(id) {
                        log::info!("Deleted shape {} ({})", shape.id, shape.name);
                        changed = true;
                    }
                }
                OverlayAction::ClearSelection => {}
            }
        }

        if !changed {
            return;
        }
        if let Err(e) = self.store.save(&self.cli.shapes) {
            log::error!("{}", e);
        }
        if let Some(canvas) = &mut self.canvas {
            if let Err(e) = canvas.set_shapes(self.store.shapes()) {
                log::error!("Scene update failed: {}", e);
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match event_loop.create_window(
            Window::default_attributes()
                .with_title("Shape Viewer")
                .with_inner_size(winit::dpi::LogicalSize::new(self.cli.width, self.cli.height)),
        ) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                self.init_error = Some(anyhow::Error::new(e).context("Failed to create window"));
                event_loop.exit();
                return;
            }
        };

        match self.mount(window.clone()) {
            Ok(canvas) => {
                self.window = Some(window);
                self.canvas = Some(canvas);
            }
            Err(e) => {
                self.init_error = Some(anyhow::Error::new(e).context("Failed to initialize the 3D view"));
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        // Let the overlay handle the event first
        let consumed = self
            .canvas
            .as_mut()
            .is_some_and(|canvas| canvas.backend_mut().on_window_event(&event));

        // Button state is tracked even for events the overlay kept
        let pointer = self.input.process_event(&event);
        if let (Some(pointer), Some(canvas)) = (pointer, &mut self.canvas) {
            // Releases always reach the canvas so a drag cannot outlive its button
            if !consumed || matches!(pointer, PointerEvent::Released { .. }) {
                if let Some(pick) = canvas.handle_pointer(pointer, self.input.buttons()) {
                    log::info!("Selected shape {} ({})", pick.id, pick.name);
                }
            }
        }

        if consumed {
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
            } => {
                self.unmount();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(canvas) = &mut self.canvas {
                    canvas.resize(Viewport::from_size(size.width, size.height));
                }
            }
            WindowEvent::RedrawRequested => {
                let (Some(canvas), Some(info)) = (&mut self.canvas, self.frames.next()) else {
                    return;
                };
                match canvas.frame(info) {
                    Ok(actions) => self.apply_actions(actions),
                    Err(e) => log::error!("Render error: {}", e),
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.unmount();
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let store = if cli.demo && !cli.shapes.exists() {
        log::info!("Seeding demo shapes");
        ShapeStore::demo()
    } else {
        ShapeStore::load(&cli.shapes)
            .with_context(|| format!("Failed to load shapes from {}", cli.shapes.display()))?
    };

    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    let mut app = App::new(cli, store);

    log::info!("Shape Viewer - left drag orbits, right drag pans, wheel zooms, Escape quits");
    event_loop.run_app(&mut app)?;

    match app.init_error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
