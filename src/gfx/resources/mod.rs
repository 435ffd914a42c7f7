//! GPU resource management
//!
//! Materials, texture slots and the GPU-side textures and uniforms the
//! renderer builds from them.

pub mod global_bindings;
pub mod material;
pub mod texture_library;
pub mod texture_resource;

pub use global_bindings::{GlobalBindings, GlobalUBO, GlobalUBOContent};
pub use material::{Material, MaterialUniform, Shading};
pub use texture_library::{TextureAsset, TextureId, TextureLibrary};
pub use texture_resource::TextureResource;
