//! Matcap-shaded 3D text surrounded by floating wireframe figures.
//!
//! The text waits for its font. Once the font arrives the mesh is built and
//! the text entries appear on the panel; every structural edit or window
//! resize rebuilds it, disposing the previous geometry first.

use std::path::PathBuf;

use cgmath::Vector3;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    assets::FontHandle,
    gfx::{
        camera::CameraSetup,
        color::Color,
        geometry::TextDescriptor,
        resources::{Material, TextureId},
        scene::{Light, ObjectId, Scene, SceneObject},
    },
    ui::{ParamChange, ParamValue, ParameterEntry, ParameterPanel},
    viewport::ViewportState,
};

use super::{
    materials::{matcap_path, MATCAP_COUNT},
    scatter::{scatter, ScatterConfig},
    Demo,
};

pub const FONT_FILE: &str = "fonts/helvetiker_regular.ttf";
const DEFAULT_MATCAP: usize = 2;
/// Text em size per pixel of the smaller window dimension.
const SCREEN_FACTOR: f32 = 0.0006;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextParam {
    Content,
    BaseSize,
    Depth,
    BevelEnabled,
    BevelThickness,
    BevelSize,
    RandomMatcap,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TextCommand {
    SetContent(String),
    SetBaseSize(f32),
    SetDepth(f32),
    SetBevelEnabled(bool),
    SetBevelThickness(f32),
    SetBevelSize(f32),
    RandomMatcap,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextParams {
    pub content: String,
    pub base_size: f32,
    pub depth: f32,
    pub bevel_enabled: bool,
    pub bevel_thickness: f32,
    pub bevel_size: f32,
}

impl Default for TextParams {
    fn default() -> Self {
        Self {
            content: "<Creative Design/>".to_string(),
            base_size: 1.5,
            depth: 0.15,
            bevel_enabled: true,
            bevel_thickness: 0.02,
            bevel_size: 0.015,
        }
    }
}

impl TextParams {
    /// Geometry parameters for a viewport whose smaller side is `min_dimension`.
    pub fn descriptor(&self, min_dimension: u32) -> TextDescriptor {
        TextDescriptor {
            content: self.content.clone(),
            size: min_dimension as f32 * SCREEN_FACTOR * self.base_size,
            depth: self.depth,
            curve_segments: 5,
            bevel_enabled: self.bevel_enabled,
            bevel_thickness: self.bevel_thickness,
            bevel_size: self.bevel_size,
            bevel_offset: 0.0,
            bevel_segments: 3,
        }
    }
}

pub struct TextFigures {
    pub params: TextParams,
    pub scatter: ScatterConfig,
    rng: StdRng,
    font: Option<FontHandle>,
    text: Option<ObjectId>,
    figures: Vec<ObjectId>,
    matcaps: Vec<TextureId>,
    matcap: Option<TextureId>,
    min_dimension: u32,
}

impl Default for TextFigures {
    fn default() -> Self {
        Self::new(StdRng::from_os_rng())
    }
}

impl TextFigures {
    pub fn new(rng: StdRng) -> Self {
        Self {
            params: TextParams::default(),
            scatter: ScatterConfig::default(),
            rng,
            font: None,
            text: None,
            figures: Vec::new(),
            matcaps: Vec::new(),
            matcap: None,
            min_dimension: 0,
        }
    }

    pub fn text(&self) -> Option<ObjectId> {
        self.text
    }

    pub fn figures(&self) -> &[ObjectId] {
        &self.figures
    }

    pub fn matcap(&self) -> Option<TextureId> {
        self.matcap
    }

    /// Replaces the text mesh. Does nothing until the font has arrived.
    fn rebuild_text(&mut self, scene: &mut Scene) {
        let Some(font) = self.font.as_ref() else {
            return;
        };

        if let Some(previous) = self.text.take() {
            if let Some(mesh) = scene.remove(previous) {
                scene.geometries.dispose(mesh.geometry);
            }
        }

        let descriptor = self.params.descriptor(self.min_dimension);
        let geometry = scene.geometries.insert_text(descriptor, font);
        let mesh = SceneObject::new("text", geometry, Material::matcap(self.matcap));
        self.text = Some(scene.add(mesh));
        log::info!("Text rebuilt: {:?}", self.params.content);
    }

    fn register_text_entries(&self, panel: &mut ParameterPanel<TextParam>) {
        let p = &self.params;
        panel
            .add(ParameterEntry::text(TextParam::Content, "Text", p.content.clone()).on_commit())
            .add(ParameterEntry::slider(TextParam::BaseSize, "baseSize", p.base_size, 1.0, 10.0, 0.5).on_commit())
            .add(ParameterEntry::slider(TextParam::Depth, "depth", p.depth, 0.05, 0.5, 0.05).on_commit())
            .add(ParameterEntry::checkbox(TextParam::BevelEnabled, "bevelEnabled", p.bevel_enabled).on_commit())
            .add(
                ParameterEntry::slider(TextParam::BevelThickness, "bevelThickness", p.bevel_thickness, 0.005, 0.05, 0.005)
                    .on_commit(),
            )
            .add(
                ParameterEntry::slider(TextParam::BevelSize, "bevelSize", p.bevel_size, 0.005, 0.05, 0.005)
                    .on_commit(),
            )
            .add(ParameterEntry::button(TextParam::RandomMatcap, "Random Matcap"));
    }
}

impl Demo for TextFigures {
    type Param = TextParam;
    type Command = TextCommand;

    fn title(&self) -> &str {
        "Text & Scene Controls"
    }

    fn camera(&self) -> CameraSetup {
        CameraSetup {
            position: Vector3::new(2.5, 1.0, 10.0),
            ..Default::default()
        }
    }

    fn font_file(&self) -> Option<PathBuf> {
        Some(PathBuf::from(FONT_FILE))
    }

    fn build(&mut self, scene: &mut Scene, viewport: &ViewportState) {
        self.min_dimension = viewport.min_dimension();
        self.matcaps = (0..MATCAP_COUNT)
            .map(|i| scene.textures.reserve(matcap_path(i)))
            .collect();
        self.matcap = self.matcaps.get(DEFAULT_MATCAP).copied();

        self.figures = scatter(scene, &self.scatter, &mut self.rng);

        scene.add_light(Light::ambient(Color::WHITE, 1.0));
        scene.add_light(Light::point(Color::WHITE, 300.0, Vector3::new(2.0, 3.0, 4.0)));
    }

    fn register(&self, panel: &mut ParameterPanel<TextParam>) {
        panel.set_width(300.0);
        panel.set_start_collapsed(true);
        if self.font.is_some() {
            self.register_text_entries(panel);
        }
    }

    fn command(&self, change: &ParamChange<TextParam>) -> Option<TextCommand> {
        let value = &change.value;
        match change.key {
            TextParam::Content => value.as_text().map(|s| TextCommand::SetContent(s.to_string())),
            TextParam::BaseSize => value.as_f32().map(TextCommand::SetBaseSize),
            TextParam::Depth => value.as_f32().map(TextCommand::SetDepth),
            TextParam::BevelEnabled => value.as_bool().map(TextCommand::SetBevelEnabled),
            TextParam::BevelThickness => value.as_f32().map(TextCommand::SetBevelThickness),
            TextParam::BevelSize => value.as_f32().map(TextCommand::SetBevelSize),
            TextParam::RandomMatcap => (*value == ParamValue::Trigger).then_some(TextCommand::RandomMatcap),
        }
    }

    fn update(&mut self, scene: &mut Scene, command: TextCommand) {
        match command {
            TextCommand::SetContent(content) => self.params.content = content,
            TextCommand::SetBaseSize(v) => self.params.base_size = v,
            TextCommand::SetDepth(v) => self.params.depth = v,
            TextCommand::SetBevelEnabled(v) => self.params.bevel_enabled = v,
            TextCommand::SetBevelThickness(v) => self.params.bevel_thickness = v,
            TextCommand::SetBevelSize(v) => self.params.bevel_size = v,
            TextCommand::RandomMatcap => {
                if self.matcaps.is_empty() {
                    return;
                }
                let picked = self.matcaps[self.rng.random_range(0..self.matcaps.len())];
                self.matcap = Some(picked);
                if let Some(text) = self.text.and_then(|id| scene.get_mut(id)) {
                    text.material = Material::matcap(self.matcap);
                }
                return;
            }
        }
        self.rebuild_text(scene);
    }

    fn animate(&mut self, scene: &mut Scene, elapsed: f32) {
        for (index, id) in self.figures.iter().enumerate() {
            if let Some(figure) = scene.get_mut(*id) {
                let t = &mut figure.transform;
                t.rotation.y += 0.01;
                t.rotation.x += 0.005;
                t.position.y += (elapsed + index as f32 * 0.2).sin() * 0.005;
            }
        }
    }

    fn on_font(
        &mut self,
        scene: &mut Scene,
        panel: &mut ParameterPanel<TextParam>,
        font: FontHandle,
        viewport: &ViewportState,
    ) {
        self.font = Some(font);
        self.min_dimension = viewport.min_dimension();
        self.rebuild_text(scene);
        self.register_text_entries(panel);
    }

    fn on_resize(&mut self, scene: &mut Scene, viewport: &ViewportState) {
        self.min_dimension = viewport.min_dimension();
        self.rebuild_text(scene);
    }
}
