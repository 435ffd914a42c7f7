//! Debug panel: typed parameter entries drawn as a Dear ImGui window.
//!
//! Each demo declares its tunables as [`ParameterEntry`] values keyed by its
//! own parameter enum. [`ParameterPanel`] owns their current values, draws
//! them and reports [`ParamChange`]s according to each entry's [`Notify`]
//! mode. [`UiManager`] is the imgui/winit/wgpu glue that hosts the panel.

pub mod manager;
pub mod panel;
pub mod params;

pub use manager::UiManager;
pub use panel::ParameterPanel;
pub use params::{EditPhase, Notify, ParamChange, ParamValue, ParameterEntry, Widget};
