//! Viewport state, resize propagation and fullscreen toggling.

use std::time::{Duration, Instant};

use thiserror::Error;
use winit::{
    monitor::MonitorHandle,
    window::{Fullscreen, Window},
};

use crate::gfx::camera::OrbitCamera;

/// Highest device pixel ratio the surface is rendered at.
pub const MAX_PIXEL_RATIO: f64 = 2.0;

/// Current logical size, device pixel ratio and fullscreen flag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportState {
    pub width: u32,
    pub height: u32,
    pub device_pixel_ratio: f64,
    pub fullscreen: bool,
}

impl ViewportState {
    pub fn new(width: u32, height: u32, device_pixel_ratio: f64) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio,
            fullscreen: false,
        }
    }

    /// Device pixel ratio clamped to [`MAX_PIXEL_RATIO`].
    pub fn pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio.min(MAX_PIXEL_RATIO)
    }

    pub fn aspect(&self) -> f32 {
        self.width.max(1) as f32 / self.height.max(1) as f32
    }

    pub fn min_dimension(&self) -> u32 {
        self.width.min(self.height)
    }
}

/// The render target side of a resize.
pub trait SurfaceResize {
    /// Logical size in window coordinates.
    fn set_size(&mut self, width: u32, height: u32);
    fn set_pixel_ratio(&mut self, ratio: f64);
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("fullscreen unsupported: {reason}")]
pub struct FullscreenUnsupported {
    pub reason: &'static str,
}

/// Request/exit capability for fullscreen presentation.
pub trait FullscreenHost {
    fn is_fullscreen(&self) -> bool;
    fn request_fullscreen(&mut self) -> Result<(), FullscreenUnsupported>;
    fn exit_fullscreen(&mut self) -> Result<(), FullscreenUnsupported>;
}

/// Borderless fullscreen on the window's current monitor.
pub struct WinitFullscreen<'a> {
    window: &'a Window,
}

impl<'a> WinitFullscreen<'a> {
    pub fn new(window: &'a Window) -> Self {
        Self { window }
    }
}

impl FullscreenHost for WinitFullscreen<'_> {
    fn is_fullscreen(&self) -> bool {
        self.window.fullscreen().is_some()
    }

    fn request_fullscreen(&mut self) -> Result<(), FullscreenUnsupported> {
        self.window
            .set_fullscreen(Some(borderless(self.window.current_monitor())));
        Ok(())
    }

    fn exit_fullscreen(&mut self) -> Result<(), FullscreenUnsupported> {
        self.window.set_fullscreen(None);
        Ok(())
    }
}

/// Borderless fullscreen on `monitor`. Without one winit picks the monitor
/// the window is on, which is all some platforms can say before mapping.
fn borderless(monitor: Option<MonitorHandle>) -> Fullscreen {
    Fullscreen::Borderless(monitor)
}

/// Turns left-button presses into double clicks.
#[derive(Debug, Clone)]
pub struct DoubleClickDetector {
    interval: Duration,
    max_distance: f64,
    last_press: Option<(Instant, (f64, f64))>,
}

impl Default for DoubleClickDetector {
    fn default() -> Self {
        Self::new(Duration::from_millis(300), 6.0)
    }
}

impl DoubleClickDetector {
    pub fn new(interval: Duration, max_distance: f64) -> Self {
        Self {
            interval,
            max_distance,
            last_press: None,
        }
    }

    /// Records a press; true when it completes a double click. The press
    /// that completes one does not start the next.
    pub fn press(&mut self, position: (f64, f64), at: Instant) -> bool {
        if let Some((last_at, last_pos)) = self.last_press {
            let dx = position.0 - last_pos.0;
            let dy = position.1 - last_pos.1;
            let close = (dx * dx + dy * dy).sqrt() <= self.max_distance;
            if close && at.saturating_duration_since(last_at) <= self.interval {
                self.last_press = None;
                return true;
            }
        }
        self.last_press = Some((at, position));
        false
    }
}

/// Keeps camera projection and render surface in step with the window.
#[derive(Debug, Clone)]
pub struct ViewportController {
    state: ViewportState,
    cursor: (f64, f64),
    double_click: DoubleClickDetector,
}

impl ViewportController {
    pub fn new(state: ViewportState) -> Self {
        Self {
            state,
            cursor: (0.0, 0.0),
            double_click: DoubleClickDetector::default(),
        }
    }

    pub fn state(&self) -> &ViewportState {
        &self.state
    }

    pub fn resize(
        &mut self,
        width: u32,
        height: u32,
        device_pixel_ratio: f64,
        camera: &mut OrbitCamera,
        surface: &mut impl SurfaceResize,
    ) {
        self.state.width = width;
        self.state.height = height;
        self.state.device_pixel_ratio = device_pixel_ratio;

        camera.resize_projection(width, height);
        camera.update_view_proj();
        surface.set_size(width, height);
        surface.set_pixel_ratio(self.state.pixel_ratio());
        log::debug!(
            "Viewport {}x{} @ {:.2} (device {:.2})",
            width,
            height,
            self.state.pixel_ratio(),
            device_pixel_ratio
        );
    }

    /// Requests fullscreen when windowed and exits it otherwise. Without the
    /// capability nothing changes. Returns whether the state flipped.
    pub fn toggle_fullscreen(&mut self, host: &mut impl FullscreenHost) -> bool {
        let was_fullscreen = host.is_fullscreen();
        let result = if was_fullscreen {
            host.exit_fullscreen()
        } else {
            host.request_fullscreen()
        };
        match result {
            Ok(()) => {
                self.state.fullscreen = !was_fullscreen;
                log::info!("Fullscreen: {}", self.state.fullscreen);
                true
            }
            Err(e) => {
                log::warn!("{e}");
                false
            }
        }
    }

    /// Pointer position in logical window coordinates.
    pub fn pointer_moved(&mut self, x: f64, y: f64) {
        self.cursor = (x, y);
    }

    /// Left-button press. A double click toggles fullscreen; returns true if
    /// the press completed one.
    pub fn left_pressed(&mut self, at: Instant, host: &mut impl FullscreenHost) -> bool {
        if !self.double_click.press(self.cursor, at) {
            return false;
        }
        self.toggle_fullscreen(host);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::camera::CameraSetup;

    #[derive(Default)]
    struct RecordingSurface {
        size: Option<(u32, u32)>,
        ratio: Option<f64>,
    }

    impl SurfaceResize for RecordingSurface {
        fn set_size(&mut self, width: u32, height: u32) {
            self.size = Some((width, height));
        }

        fn set_pixel_ratio(&mut self, ratio: f64) {
            self.ratio = Some(ratio);
        }
    }

    struct MockHost {
        supported: bool,
        fullscreen: bool,
        requests: usize,
    }

    impl MockHost {
        fn new(supported: bool) -> Self {
            Self {
                supported,
                fullscreen: false,
                requests: 0,
            }
        }
    }

    impl FullscreenHost for MockHost {
        fn is_fullscreen(&self) -> bool {
            self.fullscreen
        }

        fn request_fullscreen(&mut self) -> Result<(), FullscreenUnsupported> {
            self.requests += 1;
            if !self.supported {
                return Err(FullscreenUnsupported {
                    reason: "mock without fullscreen",
                });
            }
            self.fullscreen = true;
            Ok(())
        }

        fn exit_fullscreen(&mut self) -> Result<(), FullscreenUnsupported> {
            self.fullscreen = false;
            Ok(())
        }
    }

    fn controller() -> ViewportController {
        ViewportController::new(ViewportState::new(1280, 800, 1.0))
    }

    #[test]
    fn test_resize_updates_camera_and_surface() {
        let mut viewport = controller();
        let mut camera = OrbitCamera::from_setup(&CameraSetup::default(), 1.6);
        let mut surface = RecordingSurface::default();

        viewport.resize(1024, 768, 1.5, &mut camera, &mut surface);

        assert_eq!(camera.aspect, 1024.0 / 768.0);
        assert_eq!(surface.size, Some((1024, 768)));
        assert_eq!(surface.ratio, Some(1.5));
        assert_eq!(viewport.state().min_dimension(), 768);
    }

    #[test]
    fn test_pixel_ratio_is_clamped_to_two() {
        let mut viewport = controller();
        let mut camera = OrbitCamera::from_setup(&CameraSetup::default(), 1.6);
        let mut surface = RecordingSurface::default();

        viewport.resize(800, 600, 3.0, &mut camera, &mut surface);

        assert_eq!(surface.ratio, Some(2.0));
        assert_eq!(viewport.state().pixel_ratio(), 2.0);
        assert_eq!(viewport.state().device_pixel_ratio, 3.0);
    }

    #[test]
    fn test_double_click_enters_then_exits_fullscreen() {
        let mut viewport = controller();
        let mut host = MockHost::new(true);
        let t0 = Instant::now();

        assert!(!viewport.left_pressed(t0, &mut host));
        assert!(viewport.left_pressed(t0 + Duration::from_millis(120), &mut host));
        assert!(host.fullscreen);
        assert!(viewport.state().fullscreen);

        let t1 = t0 + Duration::from_secs(2);
        viewport.left_pressed(t1, &mut host);
        viewport.left_pressed(t1 + Duration::from_millis(100), &mut host);
        assert!(!host.fullscreen);
        assert!(!viewport.state().fullscreen);
    }

    #[test]
    fn test_unsupported_fullscreen_is_a_no_op() {
        let mut viewport = controller();
        let mut host = MockHost::new(false);
        let before = *viewport.state();

        assert!(!viewport.toggle_fullscreen(&mut host));
        assert_eq!(host.requests, 1);
        assert_eq!(*viewport.state(), before);
    }

    #[test]
    fn test_slow_or_distant_presses_are_not_double_clicks() {
        let mut detector = DoubleClickDetector::default();
        let t0 = Instant::now();
        assert!(!detector.press((10.0, 10.0), t0));
        assert!(!detector.press((10.0, 10.0), t0 + Duration::from_millis(500)));
        assert!(!detector.press((40.0, 10.0), t0 + Duration::from_millis(550)));
        assert!(detector.press((42.0, 11.0), t0 + Duration::from_millis(600)));
        // A third press right after starts over.
        assert!(!detector.press((42.0, 11.0), t0 + Duration::from_millis(650)));
    }

    #[test]
    fn test_unknown_monitor_still_requests_borderless() {
        assert_eq!(borderless(None), Fullscreen::Borderless(None));
    }
}
