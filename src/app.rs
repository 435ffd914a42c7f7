//! Winit host: one window, one demo, one render loop.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes, WindowId},
};

use crate::{
    assets::{AssetEvent, AssetLoader},
    config::AppSettings,
    context::DemoContext,
    demos::Demo,
    error::VitrineError,
    gfx::RenderEngine,
    render_loop::{Frame, FrameLimit, FrameRenderer, LoopControl, RenderLoop},
    ui::{ParamChange, UiManager},
    viewport::{SurfaceResize, ViewportState, WinitFullscreen},
};

/// Draws frames into a window: the scene through the render engine, then
/// the debug panel through imgui.
pub struct WindowRenderer {
    engine: RenderEngine,
    ui: UiManager,
    window: Arc<Window>,
}

impl WindowRenderer {
    pub fn new(engine: RenderEngine, window: Arc<Window>) -> Self {
        let ui = UiManager::new(engine.device(), engine.queue(), engine.surface_format(), &window);
        Self { engine, ui, window }
    }
}

impl<K: Copy + PartialEq + fmt::Debug> FrameRenderer<K> for WindowRenderer {
    fn render(&mut self, frame: Frame<'_, K>) -> Result<Vec<ParamChange<K>>, VitrineError> {
        let Frame {
            scene,
            camera,
            panel,
        } = frame;

        let (width, height) = self.engine.surface_size();
        self.ui.update_display_size(width, height);

        let ui = &mut self.ui;
        let window = &self.window;
        let changes = self
            .engine
            .render_frame(scene, camera, |device, queue, encoder, view| {
                ui.draw(device, queue, encoder, window, view, |imgui| panel.draw(imgui))
            })?;
        Ok(changes.unwrap_or_default())
    }
}

impl SurfaceResize for WindowRenderer {
    fn set_size(&mut self, width: u32, height: u32) {
        self.engine.set_size(width, height);
    }

    fn set_pixel_ratio(&mut self, ratio: f64) {
        self.engine.set_pixel_ratio(ratio);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyAction {
    Exit,
    TogglePanel,
}

/// Keyboard shortcuts. None fire while a panel text field has focus, so
/// typing `h` or cancelling an edit with Escape stays inside the field.
fn key_action(code: KeyCode, text_input: bool) -> Option<KeyAction> {
    if text_input {
        return None;
    }
    match code {
        KeyCode::Escape => Some(KeyAction::Exit),
        KeyCode::KeyH => Some(KeyAction::TogglePanel),
        _ => None,
    }
}

struct Running<D: Demo> {
    window: Arc<Window>,
    renderer: WindowRenderer,
    context: DemoContext<D>,
}

impl<D: Demo> Running<D> {
    fn resize_to(&mut self, size: PhysicalSize<u32>, scale_factor: f64) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        let logical: LogicalSize<u32> = size.to_logical(scale_factor);
        self.context
            .resize(logical.width, logical.height, scale_factor, &mut self.renderer);
    }
}

/// Winit application running one demo.
pub struct VitrineApp<D: Demo> {
    settings: AppSettings,
    demo: Option<D>,
    proxy: EventLoopProxy<AssetEvent>,
    running: Option<Running<D>>,
    render_loop: RenderLoop<FrameLimit>,
    error: Option<VitrineError>,
}

impl<D: Demo> VitrineApp<D> {
    pub fn new(demo: D, settings: AppSettings, proxy: EventLoopProxy<AssetEvent>) -> Self {
        let render_loop = RenderLoop::new(FrameLimit::from_option(settings.frame_limit));
        Self {
            settings,
            demo: Some(demo),
            proxy,
            running: None,
            render_loop,
            error: None,
        }
    }

    /// Opens the window, builds the scene and starts loading its assets.
    fn start(&mut self, event_loop: &ActiveEventLoop, demo: D) -> Result<Running<D>, VitrineError> {
        let attributes = WindowAttributes::default()
            .with_title(format!("vitrine - {}", demo.title()))
            .with_inner_size(LogicalSize::new(self.settings.width, self.settings.height));
        let window = Arc::new(event_loop.create_window(attributes)?);

        let scale_factor = window.scale_factor();
        let logical: LogicalSize<u32> = window.inner_size().to_logical(scale_factor);
        let viewport = ViewportState::new(logical.width.max(1), logical.height.max(1), scale_factor);

        let engine = pollster::block_on(RenderEngine::new(
            window.clone(),
            viewport.width,
            viewport.height,
            viewport.pixel_ratio(),
        ))?;
        let renderer = WindowRenderer::new(engine, window.clone());
        let context = DemoContext::new(demo, viewport);

        let loader = AssetLoader::new(&self.settings.asset_root, self.proxy.clone());
        loader.load_textures(context.scene.textures.pending());
        if let Some(font) = context.demo.font_file() {
            loader.load_font(font);
        }

        Ok(Running {
            window,
            renderer,
            context,
        })
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: VitrineError) {
        log::error!("{}", error);
        self.error = Some(error);
        event_loop.exit();
    }

    /// The error that stopped the event loop, if any.
    pub fn take_error(&mut self) -> Option<VitrineError> {
        self.error.take()
    }
}

impl<D: Demo> ApplicationHandler<AssetEvent> for VitrineApp<D> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let Some(demo) = self.demo.take() else {
            return;
        };
        match self.start(event_loop, demo) {
            Ok(running) => self.running = Some(running),
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: AssetEvent) {
        let Some(running) = self.running.as_mut() else {
            return;
        };
        match event {
            AssetEvent::TextureLoaded { id, asset } => running.context.texture_loaded(id, asset),
            AssetEvent::FontLoaded(font) => running.context.font_loaded(font),
            AssetEvent::Failed(e) => log::error!("{}", e),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(running) = self.running.as_mut() else {
            return;
        };
        let window = running.window.clone();
        let captured = running.renderer.ui.handle_event(&window, window_id, &event);

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => running.resize_to(size, window.scale_factor()),
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                running.resize_to(window.inner_size(), scale_factor)
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => match key_action(code, running.renderer.ui.wants_text_input()) {
                Some(KeyAction::Exit) => event_loop.exit(),
                Some(KeyAction::TogglePanel) => running.context.toggle_panel(),
                None => {}
            },
            WindowEvent::ModifiersChanged(modifiers) => {
                running.context.controller.set_shift(modifiers.state().shift_key())
            }
            WindowEvent::CursorMoved { position, .. } => {
                let position = position.to_logical::<f64>(window.scale_factor());
                running.context.viewport.pointer_moved(position.x, position.y);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                // Releases always reach the controller so a drag never sticks.
                if captured && state == ElementState::Pressed {
                    return;
                }
                if button == MouseButton::Left && state == ElementState::Pressed {
                    let mut host = WinitFullscreen::new(&window);
                    running.context.viewport.left_pressed(Instant::now(), &mut host);
                }
                running.context.controller.process_mouse_button(button, state);
            }
            WindowEvent::MouseWheel { delta, .. } if !captured => {
                running.context.controller.process_scroll(&delta)
            }
            WindowEvent::Focused(false) => running.context.controller.release_all(),
            WindowEvent::RedrawRequested => {
                match self
                    .render_loop
                    .tick(&mut running.context, &mut running.renderer)
                {
                    Ok(LoopControl::Continue) => {}
                    Ok(LoopControl::Exit) => event_loop.exit(),
                    Err(e) => self.fail(event_loop, e),
                }
            }
            _ => {}
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        let Some(running) = self.running.as_mut() else {
            return;
        };
        if let DeviceEvent::MouseMotion { delta } = event {
            if !running.renderer.ui.wants_pointer() {
                running.context.controller.process_motion(delta.0, delta.1);
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(running) = self.running.as_ref() {
            running.window.request_redraw();
        }
    }
}

/// Runs `demo` in a new window until it is closed or the frame limit is hit.
pub fn run<D: Demo>(demo: D, settings: AppSettings) -> Result<(), VitrineError> {
    let event_loop = EventLoop::<AssetEvent>::with_user_event().build()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = VitrineApp::new(demo, settings, event_loop.create_proxy());
    event_loop.run_app(&mut app)?;

    match app.take_error() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
