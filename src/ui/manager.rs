//! Dear ImGui integration with winit and wgpu.

use std::time::Instant;

use imgui::{Context, FontConfig, FontSource, MouseCursor};
use imgui_wgpu::{Renderer, RendererConfig};
use imgui_winit_support::{HiDpiMode, WinitPlatform};
use wgpu::{CommandEncoder, Device, Queue, TextureFormat, TextureView};
use winit::{
    event::{Event, WindowEvent},
    window::{Window, WindowId},
};

use crate::error::VitrineError;

const FONT_SIZE: f32 = 18.0;

/// Owns the imgui context, its winit platform glue and the wgpu renderer.
///
/// The DPI mode is locked to 1.0 so imgui works in physical pixels, the same
/// space the surface is configured in.
pub struct UiManager {
    context: Context,
    platform: WinitPlatform,
    renderer: Renderer,
    last_frame: Instant,
    last_cursor: Option<MouseCursor>,
}

impl UiManager {
    /// Creates the imgui context, its winit platform and its wgpu renderer
    ///
    /// # Arguments
    /// * `device` - WGPU device for creating renderer resources
    /// * `queue` - WGPU queue for font atlas uploads
    /// * `output_color_format` - Format of the surface the panel is drawn into
    /// * `window` - Window the platform attaches to
    pub fn new(
        device: &Device,
        queue: &Queue,
        output_color_format: TextureFormat,
        window: &Window,
    ) -> Self {
        let mut context = Context::create();
        context.set_ini_filename(None);

        let mut platform = WinitPlatform::new(&mut context);
        platform.attach_window(context.io_mut(), window, HiDpiMode::Locked(1.0));

        context.fonts().add_font(&[FontSource::DefaultFontData {
            config: Some(FontConfig {
                oversample_h: 1,
                pixel_snap_h: true,
                size_pixels: FONT_SIZE,
                ..Default::default()
            }),
        }]);

        let renderer_config = RendererConfig {
            texture_format: output_color_format,
            ..Default::default()
        };
        let renderer = Renderer::new(&mut context, device, queue, renderer_config);

        Self {
            context,
            platform,
            renderer,
            last_frame: Instant::now(),
            last_cursor: None,
        }
    }

    /// Call whenever the render target changes size.
    pub fn update_display_size(&mut self, width: u32, height: u32) {
        self.context.io_mut().display_size = [width as f32, height as f32];
    }

    pub fn display_size(&self) -> [f32; 2] {
        self.context.io().display_size
    }

    /// Feeds an input event to imgui
    ///
    /// # Arguments
    /// * `window` - Window the event came from
    /// * `window_id` - Id winit reported with the event
    /// * `event` - Input event to process
    ///
    /// # Returns
    /// True when imgui wants the event for itself, in which case camera and
    /// shortcut handling skip it
    pub fn handle_event(&mut self, window: &Window, window_id: WindowId, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::CursorMoved { .. }
            | WindowEvent::MouseInput { .. }
            | WindowEvent::MouseWheel { .. }
            | WindowEvent::KeyboardInput { .. }
            | WindowEvent::ModifiersChanged(_)
            | WindowEvent::Focused(_) => {
                let wrapped: Event<()> = Event::WindowEvent {
                    window_id,
                    event: event.clone(),
                };
                self.platform
                    .handle_event(self.context.io_mut(), window, &wrapped);

                match event {
                    WindowEvent::KeyboardInput { .. } => self.wants_keyboard(),
                    WindowEvent::ModifiersChanged(_) | WindowEvent::Focused(_) => false,
                    _ => self.wants_pointer(),
                }
            }
            _ => false,
        }
    }

    pub fn wants_pointer(&self) -> bool {
        self.context.io().want_capture_mouse
    }

    pub fn wants_keyboard(&self) -> bool {
        self.context.io().want_capture_keyboard
    }

    /// True while a text field has focus; single-key shortcuts must not fire.
    pub fn wants_text_input(&self) -> bool {
        self.context.io().want_text_input
    }

    /// Builds one imgui frame with `run_ui` and draws it over `color_attachment`,
    /// keeping the scene already rendered there. Returns what `run_ui` returned.
    pub fn draw<F, R>(
        &mut self,
        device: &Device,
        queue: &Queue,
        encoder: &mut CommandEncoder,
        window: &Window,
        color_attachment: &TextureView,
        run_ui: F,
    ) -> Result<R, VitrineError>
    where
        F: FnOnce(&imgui::Ui) -> R,
    {
        let now = Instant::now();
        self.context
            .io_mut()
            .update_delta_time(now - self.last_frame);
        self.last_frame = now;

        self.platform
            .prepare_frame(self.context.io_mut(), window)
            .map_err(|e| VitrineError::Overlay(e.to_string()))?;

        let ui = self.context.frame();
        let output = run_ui(ui);

        if self.last_cursor != ui.mouse_cursor() {
            self.last_cursor = ui.mouse_cursor();
            self.platform.prepare_render(ui, window);
        }

        let draw_data = self.context.render();
        if draw_data.display_size[0] <= 0.0 || draw_data.display_size[1] <= 0.0 {
            return Ok(output);
        }

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("imgui_render_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: color_attachment,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        self.renderer
            .render(draw_data, queue, device, &mut render_pass)
            .map_err(|e| VitrineError::Overlay(e.to_string()))?;

        Ok(output)
    }
}
