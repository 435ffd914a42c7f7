//! Core rendering functionality
//!
//! Pipeline management, the vertex layout, the scene-to-GPU bookkeeping and
//! the engine that draws a [`Scene`](crate::gfx::scene::Scene) into a window
//! surface.

pub mod pipeline_manager;
pub mod render_engine;
pub mod scene_mirror;
pub mod vertex;

pub use pipeline_manager::{PipelineConfig, PipelineManager};
pub use render_engine::RenderEngine;
pub use scene_mirror::{Released, SceneMirror};
pub use vertex::Vertex3D;
