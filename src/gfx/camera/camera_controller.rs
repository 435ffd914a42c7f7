use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, MouseButton, MouseScrollDelta},
};

use super::orbit_camera::OrbitCamera;

/// Camera motion not yet applied.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OrbitDelta {
    pub yaw: f32,
    pub pitch: f32,
    /// Log-scale distance change.
    pub zoom: f32,
    pub pan: (f32, f32),
}

impl OrbitDelta {
    fn scaled(self, factor: f32) -> Self {
        Self {
            yaw: self.yaw * factor,
            pitch: self.pitch * factor,
            zoom: self.zoom * factor,
            pan: (self.pan.0 * factor, self.pan.1 * factor),
        }
    }

    pub fn is_negligible(&self) -> bool {
        const EPS: f32 = 1e-6;
        self.yaw.abs() < EPS
            && self.pitch.abs() < EPS
            && self.zoom.abs() < EPS
            && self.pan.0.abs() < EPS
            && self.pan.1.abs() < EPS
    }
}

/// Orbit controls: left drag orbits, shift+drag or right drag pans, the
/// wheel zooms. Input accumulates into a pending delta; [`update`] applies it
/// once per frame, easing it out over several frames when damping is on.
///
/// [`update`]: CameraController::update
pub struct CameraController {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pending: OrbitDelta,
    is_left_pressed: bool,
    is_right_pressed: bool,
    is_shift_held: bool,
}

impl CameraController {
    pub fn new(rotate_speed: f32, zoom_speed: f32) -> Self {
        Self {
            rotate_speed,
            zoom_speed,
            pan_speed: 0.01,
            enable_damping: false,
            damping_factor: 0.05,
            pending: OrbitDelta::default(),
            is_left_pressed: false,
            is_right_pressed: false,
            is_shift_held: false,
        }
    }

    pub fn with_damping(mut self, enable: bool) -> Self {
        self.enable_damping = enable;
        self
    }

    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        let pressed = state == ElementState::Pressed;
        match button {
            MouseButton::Left => self.is_left_pressed = pressed,
            MouseButton::Right => self.is_right_pressed = pressed,
            _ => (),
        }
    }

    pub fn set_shift(&mut self, held: bool) {
        self.is_shift_held = held;
    }

    /// Raw pointer motion in pixels.
    pub fn process_motion(&mut self, dx: f64, dy: f64) {
        let (dx, dy) = (dx as f32, dy as f32);
        if self.is_panning() {
            self.pending.pan.0 -= dx * self.pan_speed;
            self.pending.pan.1 += dy * self.pan_speed;
        } else if self.is_rotating() {
            self.pending.yaw -= dx * self.rotate_speed;
            self.pending.pitch += dy * self.rotate_speed;
        }
    }

    pub fn process_scroll(&mut self, delta: &MouseScrollDelta) {
        let lines = match delta {
            MouseScrollDelta::LineDelta(_, y) => *y,
            MouseScrollDelta::PixelDelta(PhysicalPosition { y, .. }) => *y as f32 / 40.0,
        };
        // Scrolling up zooms in.
        self.pending.zoom -= lines * self.zoom_speed;
    }

    pub fn is_panning(&self) -> bool {
        self.is_right_pressed || (self.is_left_pressed && self.is_shift_held)
    }

    pub fn is_rotating(&self) -> bool {
        self.is_left_pressed && !self.is_shift_held
    }

    pub fn pending(&self) -> OrbitDelta {
        self.pending
    }

    /// Drops any button state, e.g. when the pointer is captured elsewhere.
    pub fn release_all(&mut self) {
        self.is_left_pressed = false;
        self.is_right_pressed = false;
    }

    /// Applies the pending motion to `camera`. Without damping everything is
    /// applied at once; with damping only `damping_factor` of it is, and the
    /// rest decays by `1 - damping_factor` for the following frames.
    pub fn update(&mut self, camera: &mut OrbitCamera) {
        if self.pending.is_negligible() {
            self.pending = OrbitDelta::default();
            camera.update_view_proj();
            return;
        }

        let (step, remainder) = if self.enable_damping {
            (
                self.pending.scaled(self.damping_factor),
                self.pending.scaled(1.0 - self.damping_factor),
            )
        } else {
            (self.pending, OrbitDelta::default())
        };

        camera.add_yaw(step.yaw);
        camera.add_pitch(step.pitch);
        camera.add_distance(step.zoom);
        camera.pan(step.pan);
        camera.update_view_proj();
        self.pending = remainder;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::camera::orbit_camera::CameraSetup;

    fn camera() -> OrbitCamera {
        OrbitCamera::from_setup(&CameraSetup::default(), 1.0)
    }

    #[test]
    fn test_without_damping_applies_everything_at_once() {
        let mut controller = CameraController::new(0.01, 0.1);
        let mut camera = camera();
        let yaw = camera.yaw;

        controller.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        controller.process_motion(-10.0, 0.0);
        controller.update(&mut camera);

        assert!((camera.yaw - (yaw + 0.1)).abs() < 1e-5);
        assert!(controller.pending().is_negligible());
    }

    #[test]
    fn test_damping_eases_towards_target() {
        let mut controller = CameraController::new(0.01, 0.1).with_damping(true);
        let mut camera = camera();
        let yaw = camera.yaw;

        controller.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        controller.process_motion(-10.0, 0.0);
        controller.update(&mut camera);

        // One frame applies 5% of the drag, 95% remains pending.
        assert!((camera.yaw - (yaw + 0.005)).abs() < 1e-6);
        assert!((controller.pending().yaw - 0.095).abs() < 1e-6);

        for _ in 0..400 {
            controller.update(&mut camera);
        }
        assert!((camera.yaw - (yaw + 0.1)).abs() < 1e-4);
    }

    #[test]
    fn test_shift_drag_pans_instead_of_orbiting() {
        let mut controller = CameraController::new(0.01, 0.1);
        controller.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        controller.set_shift(true);
        controller.process_motion(5.0, 5.0);

        assert!(controller.is_panning());
        assert_eq!(controller.pending().yaw, 0.0);
        assert_ne!(controller.pending().pan, (0.0, 0.0));
    }

    #[test]
    fn test_motion_without_button_is_ignored() {
        let mut controller = CameraController::new(0.01, 0.1);
        controller.process_motion(50.0, 50.0);
        assert!(controller.pending().is_negligible());
    }

    #[test]
    fn test_scroll_up_zooms_in() {
        let mut controller = CameraController::new(0.01, 0.1);
        let mut camera = camera();
        let distance = camera.distance;
        controller.process_scroll(&MouseScrollDelta::LineDelta(0.0, 1.0));
        controller.update(&mut camera);
        assert!(camera.distance < distance);
    }
}
