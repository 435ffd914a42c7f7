//! Global uniform bindings for camera and scene data
//!
//! Per-frame state shared by every draw: camera matrices, eye position and
//! the scene lights. Bound to slot 0 in all render pipelines.

use crate::{
    gfx::{camera::camera_utils::CameraUniform, color::Color, scene::light::Light},
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

/// Global uniform buffer content structure
///
/// MUST match the `Globals` struct in `scene.wgsl` exactly.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUBOContent {
    pub view_proj: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub eye: [f32; 4],
    /// Summed ambient radiance (rgb), w unused.
    pub ambient: [f32; 4],
    /// xyz position, w = 1 when a point light is present.
    pub light_position: [f32; 4],
    /// rgb scaled by intensity.
    pub light_color: [f32; 4],
}

impl GlobalUBOContent {
    /// Folds the scene lights into the fixed uniform layout: all ambient
    /// lights are summed, the first point light is used.
    pub fn new(camera: &CameraUniform, lights: &[Light]) -> Self {
        let mut content = Self {
            view_proj: camera.view_proj,
            view: camera.view,
            eye: camera.view_position,
            ambient: [0.0; 4],
            light_position: [0.0; 4],
            light_color: [0.0; 4],
        };

        let mut point_used = false;
        for light in lights {
            match *light {
                Light::Ambient { color, intensity } => {
                    let c = color.scaled(intensity);
                    for i in 0..3 {
                        content.ambient[i] += c[i];
                    }
                }
                Light::Point {
                    color,
                    intensity,
                    position,
                } => {
                    if point_used {
                        log::debug!("Ignoring extra point light at {:?}", position);
                        continue;
                    }
                    point_used = true;
                    content.light_position = [position.x, position.y, position.z, 1.0];
                    content.light_color = color.scaled(intensity);
                }
            }
        }
        content
    }
}

impl Default for GlobalUBOContent {
    fn default() -> Self {
        Self::new(&CameraUniform::default(), &[Light::ambient(Color::WHITE, 1.0)])
    }
}

/// Type alias for the global uniform buffer
pub type GlobalUBO = UniformBuffer<GlobalUBOContent>;

/// Bind group layout and bind group for the global uniform
pub struct GlobalBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
    bind_group: wgpu::BindGroup,
}

impl GlobalBindings {
    pub fn new(device: &wgpu::Device, ubo: &GlobalUBO) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform())
            .create(device, "Globals Bind Group");
        let bind_group = BindGroupBuilder::new(&bind_group_layout)
            .resource(ubo.binding_resource())
            .create(device, "Global Bind Group");

        GlobalBindings {
            bind_group_layout,
            bind_group,
        }
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector3;

    #[test]
    fn test_lights_fold_into_uniform() {
        let lights = [
            Light::ambient(Color::WHITE, 1.0),
            Light::point(Color::WHITE, 30.0, Vector3::new(2.0, 3.0, 4.0)),
            Light::point(Color::WHITE, 5.0, Vector3::new(9.0, 9.0, 9.0)),
        ];
        let content = GlobalUBOContent::new(&CameraUniform::default(), &lights);

        assert_eq!(content.ambient, [1.0, 1.0, 1.0, 0.0]);
        assert_eq!(content.light_position, [2.0, 3.0, 4.0, 1.0]);
        assert_eq!(content.light_color, [30.0, 30.0, 30.0, 1.0]);
    }

    #[test]
    fn test_no_point_light_leaves_it_disabled() {
        let content = GlobalUBOContent::new(&CameraUniform::default(), &[]);
        assert_eq!(content.light_position[3], 0.0);
    }
}
