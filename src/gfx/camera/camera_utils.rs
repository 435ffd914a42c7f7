use cgmath::{Matrix4, SquareMatrix};

pub trait Camera: Sized {
    fn build_view_matrix(&self) -> Matrix4<f32>;
    fn build_view_projection_matrix(&self) -> Matrix4<f32>;
}

/// Camera state the renderer copies into the global uniform each frame.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug, PartialEq)]
pub struct CameraUniform {
    /// The eye position of the camera in homogenous coordinates.
    ///
    /// Homogenous coordinates are used to fullfill the 16 byte alignment requirement.
    pub view_position: [f32; 4],

    /// World to view space, used for matcap lookups.
    pub view: [[f32; 4]; 4],

    /// Contains the view projection matrix.
    pub view_proj: [[f32; 4]; 4],
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self {
            view_position: [0.0; 4],
            view: Matrix4::<f32>::identity().into(),
            view_proj: Matrix4::<f32>::identity().into(),
        }
    }
}
