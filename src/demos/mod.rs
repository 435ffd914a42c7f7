//! The three scene sketches.
//!
//! A demo owns its typed parameter state. Panel changes are translated into
//! the demo's command enum by [`Demo::command`] and applied by a single
//! [`Demo::update`], which either rebuilds geometry or tweaks a material.

use std::{fmt, path::PathBuf};

use crate::{
    assets::FontHandle,
    gfx::{camera::CameraSetup, scene::Scene},
    ui::{ParamChange, ParameterPanel},
    viewport::ViewportState,
};

pub mod debug_cube;
pub mod materials;
pub mod scatter;
pub mod text_figures;

pub use debug_cube::DebugCube;
pub use materials::MaterialsGallery;
pub use scatter::{scatter, ScatterConfig};
pub use text_figures::TextFigures;

pub trait Demo {
    /// Keys of the panel entries.
    type Param: Copy + PartialEq + fmt::Debug;
    /// What a panel change asks the scene to do.
    type Command: fmt::Debug;

    fn title(&self) -> &str;

    fn camera(&self) -> CameraSetup;

    /// Font to load, relative to the asset root.
    fn font_file(&self) -> Option<PathBuf> {
        None
    }

    /// Populates the scene. Images the demo needs are reserved in
    /// `scene.textures` here and loaded by the host afterwards.
    fn build(&mut self, scene: &mut Scene, viewport: &ViewportState);

    fn register(&self, panel: &mut ParameterPanel<Self::Param>);

    fn command(&self, change: &ParamChange<Self::Param>) -> Option<Self::Command>;

    fn update(&mut self, scene: &mut Scene, command: Self::Command);

    /// Time-driven changes; `elapsed` is in seconds since start.
    fn animate(&mut self, scene: &mut Scene, elapsed: f32);

    fn on_font(
        &mut self,
        _scene: &mut Scene,
        _panel: &mut ParameterPanel<Self::Param>,
        _font: FontHandle,
        _viewport: &ViewportState,
    ) {
    }

    fn on_resize(&mut self, _scene: &mut Scene, _viewport: &ViewportState) {}
}
