//! # Graphics Module
//!
//! Everything between the demos and the GPU.
//!
//! - **Geometry** ([`geometry`]) - procedural primitives and extruded text
//! - **Scene** ([`scene`]) - objects, lights and the resource stores demos mutate
//! - **Resources** ([`resources`]) - materials, texture slots, GPU uniforms
//! - **Camera** ([`camera`]) - orbit camera and its damped controller
//! - **Rendering** ([`rendering`]) - pipelines and the frame renderer
//!
//! The scene never touches wgpu. [`RenderEngine`] mirrors it each frame, so
//! everything above the rendering module is testable without a device.

pub mod camera;
pub mod color;
pub mod geometry;
pub mod rendering;
pub mod resources;
pub mod scene;

pub use camera::orbit_camera::OrbitCamera;
pub use color::Color;
pub use rendering::render_engine::RenderEngine;
