//! Randomly placed wireframe figures.

use std::f32::consts::PI;

use rand::Rng;

use crate::gfx::{
    color::Color,
    geometry::{GeometryId, Primitive},
    resources::Material,
    scene::{ObjectId, Scene, SceneObject},
};

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterConfig {
    pub count: usize,
    /// Shapes to pick from; each is generated once and shared.
    pub geometry_pool: Vec<Primitive>,
    /// Positions fall in [-half, half] on every axis.
    pub cube_half_extent: f32,
    /// X and Y rotations fall in [0, max]; Z stays 0.
    pub max_rotation: f32,
    pub scale_range: (f32, f32),
    pub color: Color,
    pub wireframe: bool,
}

impl Default for ScatterConfig {
    fn default() -> Self {
        Self {
            count: 50,
            geometry_pool: vec![
                Primitive::torus(0.5, 0.25, 20, 45),
                Primitive::sphere(1.0, 64, 64),
                Primitive::cube(1.6, 1.6, 1.6, 6),
                Primitive::cone(0.9, 2.4, 32),
            ],
            cube_half_extent: 5.0,
            max_rotation: PI,
            scale_range: (0.3, 1.0),
            color: Color::from_hex(0xc0c0c0),
            wireframe: true,
        }
    }
}

/// Adds `config.count` figures and returns their ids in creation order.
pub fn scatter(scene: &mut Scene, config: &ScatterConfig, rng: &mut impl Rng) -> Vec<ObjectId> {
    if config.geometry_pool.is_empty() {
        log::warn!("Scatter requested with an empty geometry pool");
        return Vec::new();
    }

    let pool: Vec<GeometryId> = config
        .geometry_pool
        .iter()
        .map(|primitive| scene.geometries.insert_primitive(*primitive))
        .collect();

    let half = config.cube_half_extent;
    let (min_scale, max_scale) = config.scale_range;

    (0..config.count)
        .map(|i| {
            let geometry = pool[rng.random_range(0..pool.len())];
            let material = Material::physical(config.color, 0.0, 0.0).with_wireframe(config.wireframe);
            let scale = min_scale + rng.random::<f32>() * (max_scale - min_scale);

            let figure = SceneObject::new(format!("figure-{i}"), geometry, material)
                .with_position(
                    (rng.random::<f32>() - 0.5) * 2.0 * half,
                    (rng.random::<f32>() - 0.5) * 2.0 * half,
                    (rng.random::<f32>() - 0.5) * 2.0 * half,
                )
                .with_rotation(
                    rng.random::<f32>() * config.max_rotation,
                    rng.random::<f32>() * config.max_rotation,
                    0.0,
                )
                .with_scale(scale);
            scene.add(figure)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_fifty_figures_within_bounds() {
        let mut scene = Scene::new();
        let config = ScatterConfig::default();
        let mut rng = StdRng::seed_from_u64(7);

        let ids = scatter(&mut scene, &config, &mut rng);

        assert_eq!(ids.len(), 50);
        assert_eq!(scene.mesh_count(), 50);
        for id in ids {
            let figure = scene.get(id).unwrap();
            let t = figure.transform;
            for p in [t.position.x, t.position.y, t.position.z] {
                assert!((-5.0..=5.0).contains(&p), "position {p}");
            }
            for r in [t.rotation.x, t.rotation.y] {
                assert!((0.0..=PI).contains(&r), "rotation {r}");
            }
            assert_eq!(t.rotation.z, 0.0);
            assert!((0.3..=1.0).contains(&t.scale.x));
            assert_eq!(t.scale.x, t.scale.y);
            assert_eq!(t.scale.x, t.scale.z);
            assert!(figure.material.wireframe);
        }
    }

    #[test]
    fn test_pool_geometry_is_shared() {
        let mut scene = Scene::new();
        let mut rng = StdRng::seed_from_u64(1);
        scatter(&mut scene, &ScatterConfig::default(), &mut rng);
        assert_eq!(scene.geometries.live_count(), 4);
    }

    #[test]
    fn test_empty_pool_adds_nothing() {
        let mut scene = Scene::new();
        let config = ScatterConfig {
            geometry_pool: Vec::new(),
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(1);
        assert!(scatter(&mut scene, &config, &mut rng).is_empty());
        assert_eq!(scene.mesh_count(), 0);
    }
}
