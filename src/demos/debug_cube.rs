//! A subdivided cube wired to every kind of panel widget.

use std::f32::consts::TAU;

use crate::{
    gfx::{
        camera::CameraSetup,
        color::Color,
        geometry::{GeometryId, Primitive},
        resources::Material,
        scene::{ObjectId, Scene, SceneObject},
    },
    ui::{ParamChange, ParamValue, ParameterEntry, ParameterPanel},
    viewport::ViewportState,
};

use super::Demo;

const SPIN_DURATION: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CubeParam {
    Elevation,
    Visible,
    Wireframe,
    Color,
    Spin,
    Subdivision,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CubeCommand {
    SetElevation(f32),
    SetVisible(bool),
    SetWireframe(bool),
    SetColor(Color),
    Spin,
    Subdivide(u32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CubeParams {
    pub color: Color,
    pub elevation: f32,
    pub visible: bool,
    pub wireframe: bool,
    pub subdivision: u32,
}

impl Default for CubeParams {
    fn default() -> Self {
        Self {
            color: Color::from_hex(0xa778d8),
            elevation: 0.0,
            visible: true,
            wireframe: true,
            subdivision: 2,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct SpinState {
    from: f32,
    /// Set by the first frame after the button press.
    started_at: Option<f32>,
}

fn ease_out_quad(t: f32) -> f32 {
    1.0 - (1.0 - t) * (1.0 - t)
}

#[derive(Debug, Default)]
pub struct DebugCube {
    pub params: CubeParams,
    cube: Option<ObjectId>,
    spin: Option<SpinState>,
}

impl DebugCube {
    pub fn new(params: CubeParams) -> Self {
        Self {
            params,
            cube: None,
            spin: None,
        }
    }

    pub fn cube(&self) -> Option<ObjectId> {
        self.cube
    }

    pub fn is_spinning(&self) -> bool {
        self.spin.is_some()
    }

    fn cube_mut<'a>(&self, scene: &'a mut Scene) -> Option<&'a mut SceneObject> {
        self.cube.and_then(|id| scene.get_mut(id))
    }

    fn insert_geometry(&self, scene: &mut Scene) -> GeometryId {
        scene
            .geometries
            .insert_primitive(Primitive::cube(1.0, 1.0, 1.0, self.params.subdivision))
    }
}

impl Demo for DebugCube {
    type Param = CubeParam;
    type Command = CubeCommand;

    fn title(&self) -> &str {
        "Debug Cube"
    }

    fn camera(&self) -> CameraSetup {
        CameraSetup::default()
    }

    fn build(&mut self, scene: &mut Scene, _viewport: &ViewportState) {
        let geometry = self.insert_geometry(scene);
        let material = Material::basic(self.params.color).with_wireframe(self.params.wireframe);
        let mut cube = SceneObject::new("cube", geometry, material).with_position(0.0, self.params.elevation, 0.0);
        cube.visible = self.params.visible;
        self.cube = Some(scene.add(cube));
    }

    fn register(&self, panel: &mut ParameterPanel<CubeParam>) {
        let p = &self.params;
        panel
            .add(ParameterEntry::slider(CubeParam::Elevation, "elevation", p.elevation, -3.0, 3.0, 0.01))
            .add(ParameterEntry::checkbox(CubeParam::Visible, "visible", p.visible))
            .add(ParameterEntry::checkbox(CubeParam::Wireframe, "wireframe", p.wireframe))
            .add(ParameterEntry::color(CubeParam::Color, "color", p.color.to_srgb()))
            .add(ParameterEntry::button(CubeParam::Spin, "spin"))
            .add(
                ParameterEntry::int_slider(CubeParam::Subdivision, "subdivision", p.subdivision as i32, 1, 20)
                    .on_commit(),
            );
    }

    fn command(&self, change: &ParamChange<CubeParam>) -> Option<CubeCommand> {
        let value = &change.value;
        match change.key {
            CubeParam::Elevation => value.as_f32().map(CubeCommand::SetElevation),
            CubeParam::Visible => value.as_bool().map(CubeCommand::SetVisible),
            CubeParam::Wireframe => value.as_bool().map(CubeCommand::SetWireframe),
            CubeParam::Color => value
                .as_color()
                .map(|srgb| CubeCommand::SetColor(Color::from_srgb(srgb))),
            CubeParam::Spin => (*value == ParamValue::Trigger).then_some(CubeCommand::Spin),
            CubeParam::Subdivision => value
                .as_i32()
                .map(|segments| CubeCommand::Subdivide(segments.max(1) as u32)),
        }
    }

    fn update(&mut self, scene: &mut Scene, command: CubeCommand) {
        match command {
            CubeCommand::SetElevation(y) => {
                self.params.elevation = y;
                if let Some(cube) = self.cube_mut(scene) {
                    cube.transform.position.y = y;
                }
            }
            CubeCommand::SetVisible(visible) => {
                self.params.visible = visible;
                if let Some(cube) = self.cube_mut(scene) {
                    cube.visible = visible;
                }
            }
            CubeCommand::SetWireframe(wireframe) => {
                self.params.wireframe = wireframe;
                if let Some(cube) = self.cube_mut(scene) {
                    cube.material.wireframe = wireframe;
                }
            }
            CubeCommand::SetColor(color) => {
                self.params.color = color;
                if let Some(cube) = self.cube_mut(scene) {
                    cube.material.color = color;
                }
            }
            CubeCommand::Spin => {
                if let Some(cube) = self.cube_mut(scene) {
                    let from = cube.transform.rotation.y;
                    self.spin = Some(SpinState {
                        from,
                        started_at: None,
                    });
                }
            }
            CubeCommand::Subdivide(segments) => {
                self.params.subdivision = segments;
                let geometry = self.insert_geometry(scene);
                let Some(cube) = self.cube_mut(scene) else {
                    scene.geometries.dispose(geometry);
                    return;
                };
                let previous = std::mem::replace(&mut cube.geometry, geometry);
                scene.geometries.dispose(previous);
                log::info!("Cube rebuilt with {} segments", segments);
            }
        }
    }

    fn animate(&mut self, scene: &mut Scene, elapsed: f32) {
        let Some(spin) = self.spin.as_mut() else {
            return;
        };
        let start = *spin.started_at.get_or_insert(elapsed);
        let t = ((elapsed - start) / SPIN_DURATION).clamp(0.0, 1.0);
        let rotation = spin.from + TAU * ease_out_quad(t);
        if t >= 1.0 {
            self.spin = None;
        }
        if let Some(cube) = self.cube_mut(scene) {
            cube.transform.rotation.y = rotation;
        }
    }
}
