use cgmath::Vector3;

use crate::gfx::color::Color;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    /// Uniform light from every direction.
    Ambient { color: Color, intensity: f32 },
    /// Light radiating from a point, falling off with the squared distance.
    Point {
        color: Color,
        intensity: f32,
        position: Vector3<f32>,
    },
}

impl Light {
    pub fn ambient(color: Color, intensity: f32) -> Self {
        Light::Ambient { color, intensity }
    }

    pub fn point(color: Color, intensity: f32, position: Vector3<f32>) -> Self {
        Light::Point {
            color,
            intensity,
            position,
        }
    }
}
