//! Surface materials.
//!
//! A [`Material`] is plain scene data: a color, a shading model and a
//! wireframe flag. The renderer turns it into a [`MaterialUniform`] every
//! frame, so edits from the debug panel show up on the next draw.

use crate::gfx::color::Color;
use crate::gfx::resources::texture_library::TextureId;

/// Shading model, mirroring the three.js material families the sketches use.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shading {
    /// Unlit flat color.
    Basic,
    Standard { metalness: f32, roughness: f32 },
    Physical { metalness: f32, roughness: f32 },
    /// Color looked up from a matcap texture by view-space normal.
    Matcap { matcap: Option<TextureId> },
}

impl Shading {
    fn kind(&self) -> f32 {
        match self {
            Shading::Basic => 0.0,
            Shading::Standard { .. } => 1.0,
            Shading::Physical { .. } => 2.0,
            Shading::Matcap { .. } => 3.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub color: Color,
    pub shading: Shading,
    pub wireframe: bool,
    /// Render back faces too (planes seen from behind).
    pub double_sided: bool,
}

impl Material {
    pub fn basic(color: Color) -> Self {
        Self {
            color,
            shading: Shading::Basic,
            wireframe: false,
            double_sided: false,
        }
    }

    pub fn standard(color: Color, metalness: f32, roughness: f32) -> Self {
        Self {
            shading: Shading::Standard {
                metalness: metalness.clamp(0.0, 1.0),
                roughness: roughness.clamp(0.0, 1.0),
            },
            ..Self::basic(color)
        }
    }

    pub fn physical(color: Color, metalness: f32, roughness: f32) -> Self {
        Self {
            shading: Shading::Physical {
                metalness: metalness.clamp(0.0, 1.0),
                roughness: roughness.clamp(0.0, 1.0),
            },
            ..Self::basic(color)
        }
    }

    pub fn matcap(matcap: Option<TextureId>) -> Self {
        Self {
            shading: Shading::Matcap { matcap },
            ..Self::basic(Color::WHITE)
        }
    }

    /// Builder pattern: render as edges only
    pub fn with_wireframe(mut self, wireframe: bool) -> Self {
        self.wireframe = wireframe;
        self
    }

    /// Builder pattern: disable back-face culling
    pub fn with_double_sided(mut self, double_sided: bool) -> Self {
        self.double_sided = double_sided;
        self
    }

    /// Matcap texture sampled by this material, if any.
    pub fn matcap_texture(&self) -> Option<TextureId> {
        match self.shading {
            Shading::Matcap { matcap } => matcap,
            _ => None,
        }
    }

    pub fn uniform(&self) -> MaterialUniform {
        let (metalness, roughness) = match self.shading {
            Shading::Standard {
                metalness,
                roughness,
            }
            | Shading::Physical {
                metalness,
                roughness,
            } => (metalness, roughness),
            _ => (0.0, 1.0),
        };
        MaterialUniform {
            color: self.color.to_array(),
            params: [metalness, roughness, self.shading.kind(), 0.0],
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::standard(Color::new(0.8, 0.8, 0.8), 0.0, 0.5)
    }
}

/// GPU uniform data for materials
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    pub color: [f32; 4],
    /// metalness, roughness, shading kind, unused
    pub params: [f32; 4],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_uniform_encodes_shading() {
        let uniform = Material::physical(Color::WHITE, 0.25, 0.5).uniform();
        assert_eq!(uniform.params, [0.25, 0.5, 2.0, 0.0]);

        let uniform = Material::matcap(None).uniform();
        assert_eq!(uniform.params[2], 3.0);
    }

    #[test]
    fn test_factors_are_clamped() {
        let material = Material::standard(Color::WHITE, 2.0, -1.0);
        assert_eq!(
            material.shading,
            Shading::Standard {
                metalness: 1.0,
                roughness: 0.0
            }
        );
    }
}
