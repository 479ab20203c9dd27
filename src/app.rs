//! Windowed application
//!
//! [`EditorApp`] runs the winit event loop: it creates the window, the GPU renderer
//! and the ImGui overlay on resume, translates window events into editor input and
//! drives one editor frame per redraw until the scene host stops.

use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{ElementState, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowAttributes, WindowId},
};

use crate::{
    config::EditorConfig,
    editor::Editor,
    error::EditorError,
    gfx::rendering::RenderEngine,
    host::NoUi,
    input::{KeyboardFocus, PointerEvent},
    ui::{mode_panel, ModeIndicator, UiAction, UiManager},
};

/// Pixels of trackpad scrolling treated as one wheel line
const PIXELS_PER_LINE: f32 = 100.0;

pub struct EditorApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    config: EditorConfig,
    editor: Editor,
    window: Option<Arc<Window>>,
    ui_manager: Option<UiManager>,
    indicator: ModeIndicator,
    cursor: (f32, f32),
    shift: bool,
    startup_error: Option<EditorError>,
}

impl EditorApp {
    /// Wraps an editor (usually already seeded) in a windowed application
    pub fn new(config: EditorConfig, mut editor: Editor) -> Result<Self, EditorError> {
        let event_loop = EventLoop::new()?;

        let indicator = ModeIndicator::new();
        editor.set_mode_display(Box::new(indicator.clone()));

        Ok(Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                config,
                editor,
                window: None,
                ui_manager: None,
                indicator,
                cursor: (0.0, 0.0),
                shift: false,
                startup_error: None,
            },
        })
    }

    /// Run the application until the window closes
    pub fn run(mut self) -> Result<(), EditorError> {
        let Some(event_loop) = self.event_loop.take() else {
            return Ok(());
        };
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(&mut self.app_state)?;

        self.app_state.editor.teardown();
        match self.app_state.startup_error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn init_graphics(&mut self, event_loop: &ActiveEventLoop) -> Result<(), EditorError> {
        let window = event_loop.create_window(
            WindowAttributes::default()
                .with_title(self.config.window.title.clone())
                .with_inner_size(LogicalSize::new(
                    self.config.window.width,
                    self.config.window.height,
                )),
        )?;
        let window_handle = Arc::new(window);
        let PhysicalSize { width, height } = window_handle.inner_size();

        let renderer = pollster::block_on(RenderEngine::new(
            window_handle.clone(),
            width,
            height,
            self.config.clear_color,
        ))?;

        let ui_manager = UiManager::new(
            renderer.device(),
            renderer.queue(),
            renderer.surface_format(),
            &window_handle,
        );

        self.editor.host_mut().attach_renderer(renderer);
        self.ui_manager = Some(ui_manager);
        self.window = Some(window_handle);
        log::info!("Window and renderer ready at {}x{}", width, height);
        Ok(())
    }

    fn keyboard_focus(&self) -> KeyboardFocus {
        match self.ui_manager.as_ref() {
            Some(ui) if ui.want_text_input() => KeyboardFocus::TextEntry,
            _ => KeyboardFocus::Viewport,
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let snap_enabled = self.editor.selection().is_snap_enabled();
        let mut actions: Vec<UiAction> = Vec::new();

        let keep_running = match (self.ui_manager.as_mut(), self.window.as_ref()) {
            (Some(ui_manager), Some(window)) => {
                let indicator = &self.indicator;
                let actions_out = &mut actions;
                self.editor.frame(Some(
                    |device: &wgpu::Device,
                     queue: &wgpu::Queue,
                     encoder: &mut wgpu::CommandEncoder,
                     view: &wgpu::TextureView| {
                        ui_manager.draw(device, queue, encoder, window, view, |ui| {
                            *actions_out = mode_panel(ui, indicator, snap_enabled);
                        });
                    },
                ))
            }
            _ => self.editor.frame(None::<NoUi>),
        };

        for action in actions {
            match action {
                UiAction::SetMode(mode) => self.editor.set_mode(mode),
                UiAction::ToggleSnap(enabled) => self.editor.toggle_snap(enabled),
            }
        }

        if !keep_running {
            event_loop.exit();
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(err) = self.init_graphics(event_loop) {
            log::error!("Startup failed: {}", err);
            self.startup_error = Some(err);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(window) = self.window.clone() else {
            return;
        };

        // Releases always reach the editor so a handle drag cannot get stuck
        let is_release = matches!(
            event,
            WindowEvent::MouseInput {
                state: ElementState::Released,
                ..
            }
        );
        if let Some(ui_manager) = self.ui_manager.as_mut() {
            if ui_manager.handle_input(&window, window_id, &event) && !is_release {
                return;
            }
        }

        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = (position.x as f32, position.y as f32);
                self.editor.pointer_move(self.cursor.0, self.cursor.1);
            }
            WindowEvent::MouseInput { state, button, .. } => match state {
                ElementState::Pressed => {
                    let (x, y) = self.cursor;
                    self.editor
                        .pointer_down(PointerEvent::new(x, y, button), self.shift);
                }
                ElementState::Released => self.editor.pointer_up(button),
            },
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32 / PIXELS_PER_LINE,
                };
                self.editor.wheel(lines);
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.shift = modifiers.state().shift_key();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed {
                    let focus = self.keyboard_focus();
                    self.editor.key_down(&event.logical_key, focus);
                }
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                self.editor.resize(width, height);
            }
            WindowEvent::CloseRequested => {
                self.editor.teardown();
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}
