//! WGPU utility functions and helpers
//!
//! Small wrappers for the buffer and bind group boilerplate the renderer
//! repeats for every object, material and matcap.

pub mod binding_builder;
pub mod binding_types;
pub mod uniform_buffer;

pub use binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc};
pub use uniform_buffer::UniformBuffer;
