//! # Scene Management Module
//!
//! The scene is plain CPU data that demos mutate directly: objects with a
//! transform, a material and a shared geometry id, plus lights, a background
//! color, the geometry store and the matcap texture slots. Nothing here
//! touches the GPU; the renderer mirrors it lazily.
//!
//! ## Key Components
//!
//! - [`Scene`] - objects addressed by [`ObjectId`], lights and resource stores
//! - [`SceneObject`] - one mesh: geometry id, [`Material`](crate::gfx::resources::Material), [`Transform`]
//! - [`Light`] - ambient and point lights
//!
//! ## Usage
//!
//! ```rust
//! use vitrine::gfx::{geometry::Primitive, resources::Material, scene::{Scene, SceneObject}};
//!
//! let mut scene = Scene::new();
//! let sphere = scene.geometries.insert_primitive(Primitive::sphere(0.5, 64, 64));
//! let id = scene.add(SceneObject::new("sphere", sphere, Material::default()).with_position(-1.5, 0.0, 0.0));
//! scene.get_mut(id).unwrap().transform.rotation.y = 0.3;
//! ```

pub mod light;
pub mod object;
pub mod scene;

pub use light::Light;
pub use object::{ObjectId, ObjectUniform, SceneObject, Transform};
pub use scene::Scene;
