use super::camera_utils::{Camera, CameraUniform};
use cgmath::*;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

/// Where a demo puts its camera at startup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSetup {
    pub position: Vector3<f32>,
    pub target: Vector3<f32>,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub damping: bool,
}

impl Default for CameraSetup {
    fn default() -> Self {
        Self {
            position: Vector3::new(1.0, 1.0, 2.0),
            target: Vector3::zero(),
            fov_degrees: 75.0,
            near: 0.1,
            far: 100.0,
            damping: true,
        }
    }
}

/// Y-up camera orbiting `target` at `distance`, steered by pitch and yaw.
#[derive(Debug, Clone, Copy)]
pub struct OrbitCamera {
    pub distance: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub eye: Vector3<f32>,
    pub target: Vector3<f32>,
    pub up: Vector3<f32>,
    pub bounds: OrbitCameraBounds,
    pub aspect: f32,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
    projection: Matrix4<f32>,
    pub uniform: CameraUniform,
}

impl Camera for OrbitCamera {
    fn build_view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(
            Point3::from_vec(self.eye),
            Point3::from_vec(self.target),
            self.up,
        )
    }

    fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        self.projection * self.build_view_matrix()
    }
}

impl OrbitCamera {
    pub fn new(distance: f32, pitch: f32, yaw: f32, target: Vector3<f32>, aspect: f32) -> Self {
        let mut camera = Self {
            distance,
            pitch,
            yaw,
            eye: Vector3::zero(), // Will be auto-calculated in `update()` nevertheless.
            target,
            up: Vector3::unit_y(),
            bounds: OrbitCameraBounds::default(),
            aspect,
            fovy: Rad(std::f32::consts::PI / 4.0),
            znear: 0.1,
            zfar: 100.0,
            projection: Matrix4::identity(),
            uniform: CameraUniform::default(),
        };
        camera.update();
        camera.update_projection();
        camera
    }

    /// Places the camera at `setup.position` looking at `setup.target`.
    pub fn from_setup(setup: &CameraSetup, aspect: f32) -> Self {
        let offset = setup.position - setup.target;
        let distance = offset.magnitude().max(f32::EPSILON);
        let pitch = (offset.y / distance).clamp(-1.0, 1.0).asin();
        let yaw = offset.x.atan2(offset.z);

        let mut camera = Self::new(distance, pitch, yaw, setup.target, aspect);
        camera.fovy = Deg(setup.fov_degrees).into();
        camera.znear = setup.near;
        camera.zfar = setup.far;
        camera.bounds.max_distance = Some(setup.far * 0.5);
        camera.update_projection();
        camera.update_view_proj();
        camera
    }

    pub fn set_distance(&mut self, distance: f32) {
        self.distance = distance.clamp(
            self.bounds.min_distance.unwrap_or(f32::EPSILON),
            self.bounds.max_distance.unwrap_or(f32::MAX),
        );
        self.update();
    }

    /// Multiplicative zoom: `delta` is a log-scale step, positive moves away.
    pub fn add_distance(&mut self, delta: f32) {
        self.set_distance(self.distance * delta.exp());
    }

    pub fn set_pitch(&mut self, pitch: f32) {
        self.pitch = pitch.clamp(self.bounds.min_pitch, self.bounds.max_pitch);
        self.update();
    }

    pub fn add_pitch(&mut self, delta: f32) {
        self.set_pitch(self.pitch + delta);
    }

    pub fn set_yaw(&mut self, yaw: f32) {
        let mut bounded_yaw = yaw;
        if let Some(min_yaw) = self.bounds.min_yaw {
            bounded_yaw = bounded_yaw.max(min_yaw);
        }
        if let Some(max_yaw) = self.bounds.max_yaw {
            bounded_yaw = bounded_yaw.min(max_yaw);
        }
        self.yaw = bounded_yaw;
        self.update();
    }

    pub fn add_yaw(&mut self, delta: f32) {
        self.set_yaw(self.yaw + delta);
    }

    /// Pans the camera relative to the current view direction
    /// delta.0 = horizontal pan (left/right relative to camera view)
    /// delta.1 = vertical pan (up/down relative to camera view)
    pub fn pan(&mut self, delta: (f32, f32)) {
        let forward = (self.target - self.eye).normalize();
        let right = forward.cross(self.up).normalize();
        let up = right.cross(forward).normalize();

        // Scale by distance for a consistent feel at all zoom levels
        let pan_scale = self.distance * 0.1;
        let movement = right * delta.0 * pan_scale + up * delta.1 * pan_scale;

        self.target += movement;
        self.update();
    }

    /// Updates the camera after changing `distance`, `pitch`, `yaw` or `target`.
    fn update(&mut self) {
        self.eye =
            calculate_cartesian_eye_position(self.pitch, self.yaw, self.distance, self.target);
    }

    /// New viewport size: aspect ratio and projection follow.
    pub fn resize_projection(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
        self.update_projection();
    }

    pub fn update_projection(&mut self) {
        self.projection =
            OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar);
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection
    }

    pub fn update_view_proj(&mut self) {
        self.uniform.view_position = [self.eye.x, self.eye.y, self.eye.z, 1.0];
        self.uniform.view = self.build_view_matrix().into();
        self.uniform.view_proj = self.build_view_projection_matrix().into();
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OrbitCameraBounds {
    pub min_distance: Option<f32>,
    pub max_distance: Option<f32>,
    pub min_pitch: f32,
    pub max_pitch: f32,
    pub min_yaw: Option<f32>,
    pub max_yaw: Option<f32>,
}

impl Default for OrbitCameraBounds {
    fn default() -> Self {
        Self {
            min_distance: Some(0.1),
            max_distance: Some(50.0),
            min_pitch: -std::f32::consts::FRAC_PI_2 + 0.001,
            max_pitch: std::f32::consts::FRAC_PI_2 - 0.001,
            min_yaw: None,
            max_yaw: None,
        }
    }
}

fn calculate_cartesian_eye_position(
    pitch: f32,
    yaw: f32,
    distance: f32,
    target: Vector3<f32>,
) -> Vector3<f32> {
    Vector3::new(
        distance * yaw.sin() * pitch.cos(),
        distance * pitch.sin(),
        distance * yaw.cos() * pitch.cos(),
    ) + target
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vector3<f32>, b: Vector3<f32>) -> bool {
        (a - b).magnitude() < 1e-4
    }

    #[test]
    fn test_from_setup_reproduces_position() {
        let setup = CameraSetup {
            position: Vector3::new(2.5, 1.0, 10.0),
            ..Default::default()
        };
        let camera = OrbitCamera::from_setup(&setup, 1.6);
        assert!(approx(camera.eye, setup.position));
        assert_eq!(camera.zfar, 100.0);
    }

    #[test]
    fn test_resize_recomputes_projection() {
        let mut camera = OrbitCamera::from_setup(&CameraSetup::default(), 1.0);
        let before = camera.projection_matrix();
        camera.resize_projection(1600, 800);

        assert_eq!(camera.aspect, 2.0);
        assert_ne!(camera.projection_matrix(), before);
        let expected = OPENGL_TO_WGPU_MATRIX * perspective(camera.fovy, 2.0, 0.1, 100.0);
        assert_eq!(camera.projection_matrix(), expected);
    }

    #[test]
    fn test_pan_moves_target_and_eye_together() {
        let mut camera = OrbitCamera::from_setup(&CameraSetup::default(), 1.0);
        let offset = camera.eye - camera.target;
        camera.pan((1.0, 0.5));
        assert!(camera.target.magnitude() > 0.0);
        assert!(approx(camera.eye - camera.target, offset));
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut camera = OrbitCamera::from_setup(&CameraSetup::default(), 1.0);
        camera.add_pitch(10.0);
        assert!(camera.pitch < std::f32::consts::FRAC_PI_2);
    }
}
