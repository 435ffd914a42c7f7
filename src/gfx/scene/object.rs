use cgmath::{Matrix, Matrix4, Rad, SquareMatrix, Vector3};

use crate::gfx::{geometry::GeometryId, resources::material::Material};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub(crate) u64);

/// Position, Euler rotation (XYZ order, radians) and per-axis scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    pub rotation: Vector3<f32>,
    pub scale: Vector3<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            rotation: Vector3::new(0.0, 0.0, 0.0),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// T * Rx * Ry * Rz * S
    pub fn matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * Matrix4::from_angle_x(Rad(self.rotation.x))
            * Matrix4::from_angle_y(Rad(self.rotation.y))
            * Matrix4::from_angle_z(Rad(self.rotation.z))
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }

    /// Inverse transpose of the model matrix, identity when it is singular.
    pub fn normal_matrix(&self) -> Matrix4<f32> {
        self.matrix()
            .invert()
            .map(|inverse| inverse.transpose())
            .unwrap_or_else(Matrix4::identity)
    }
}

/// Per-object GPU data, matching `ObjectUniform` in `scene.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
}

impl From<&Transform> for ObjectUniform {
    fn from(transform: &Transform) -> Self {
        Self {
            model: transform.matrix().into(),
            normal_matrix: transform.normal_matrix().into(),
        }
    }
}

/// A mesh in the scene: shared geometry, own material and transform.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub name: String,
    pub geometry: GeometryId,
    pub material: Material,
    pub transform: Transform,
    pub visible: bool,
}

impl SceneObject {
    pub fn new(name: impl Into<String>, geometry: GeometryId, material: Material) -> Self {
        Self {
            name: name.into(),
            geometry,
            material,
            transform: Transform::default(),
            visible: true,
        }
    }

    /// Builder pattern: set position
    pub fn with_position(mut self, x: f32, y: f32, z: f32) -> Self {
        self.transform.position = Vector3::new(x, y, z);
        self
    }

    /// Builder pattern: set Euler rotation in radians
    pub fn with_rotation(mut self, x: f32, y: f32, z: f32) -> Self {
        self.transform.rotation = Vector3::new(x, y, z);
        self
    }

    /// Builder pattern: set uniform scale
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.transform.scale = Vector3::new(scale, scale, scale);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Vector4, Zero};

    #[test]
    fn test_identity_transform() {
        assert_eq!(Transform::default().matrix(), Matrix4::identity());
    }

    #[test]
    fn test_scale_then_rotate_then_translate() {
        let transform = Transform {
            position: Vector3::new(1.0, 2.0, 3.0),
            rotation: Vector3::new(0.0, std::f32::consts::FRAC_PI_2, 0.0),
            scale: Vector3::new(2.0, 2.0, 2.0),
        };
        // +x scaled to 2, rotated a quarter turn about y to -z, then moved.
        let p = transform.matrix() * Vector4::new(1.0, 0.0, 0.0, 1.0);
        assert!((p.x - 1.0).abs() < 1e-5);
        assert!((p.y - 2.0).abs() < 1e-5);
        assert!((p.z - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_zero_scale_normal_matrix_falls_back() {
        let mut transform = Transform::default();
        transform.scale = Vector3::zero();
        assert_eq!(transform.normal_matrix(), Matrix4::identity());
    }
}
