//! Vitrine
//!
//! Interactive 3D scene sketches on wgpu and winit: a cube wired to a debug
//! panel, a materials gallery, and extruded text among scattered figures.
//! Each sketch is a [`demos::Demo`]; [`app::run`] opens a window for one.

pub mod app;
pub mod assets;
pub mod config;
pub mod context;
pub mod demos;
pub mod error;
pub mod gfx;
pub mod render_loop;
pub mod ui;
pub mod viewport;
pub mod wgpu_utils;

pub use app::{run, VitrineApp};
pub use config::{AppSettings, Cli, DemoKind};
pub use context::DemoContext;
pub use error::{AssetError, VitrineError};
