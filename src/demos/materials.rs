//! Sphere, plane and torus sharing one tunable material.

use cgmath::Vector3;

use crate::{
    gfx::{
        camera::CameraSetup,
        color::Color,
        geometry::Primitive,
        resources::{Material, TextureId},
        scene::{Light, ObjectId, Scene, SceneObject},
    },
    ui::{ParamChange, ParameterEntry, ParameterPanel},
    viewport::ViewportState,
};

use super::Demo;

pub const MATCAP_COUNT: usize = 8;

pub(crate) fn matcap_path(index: usize) -> String {
    format!("matcaps/{}.png", index + 1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialParam {
    Shading,
    Metalness,
    Roughness,
    Color,
    Wireframe,
    Matcap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadingChoice {
    Standard,
    Matcap,
}

impl ShadingChoice {
    const LABELS: [&'static str; 2] = ["standard", "matcap"];

    fn index(self) -> usize {
        match self {
            ShadingChoice::Standard => 0,
            ShadingChoice::Matcap => 1,
        }
    }

    fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(ShadingChoice::Standard),
            1 => Some(ShadingChoice::Matcap),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MaterialCommand {
    SetShading(ShadingChoice),
    SetMetalness(f32),
    SetRoughness(f32),
    SetColor(Color),
    SetWireframe(bool),
    SetMatcap(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MaterialParams {
    pub shading: ShadingChoice,
    pub metalness: f32,
    pub roughness: f32,
    pub color: Color,
    pub wireframe: bool,
    /// Index into the matcap images.
    pub matcap: usize,
}

impl Default for MaterialParams {
    fn default() -> Self {
        Self {
            shading: ShadingChoice::Standard,
            metalness: 0.7,
            roughness: 0.2,
            color: Color::WHITE,
            wireframe: false,
            matcap: 0,
        }
    }
}

#[derive(Debug, Default)]
pub struct MaterialsGallery {
    pub params: MaterialParams,
    meshes: Vec<ObjectId>,
    matcaps: Vec<TextureId>,
}

impl MaterialsGallery {
    pub fn new(params: MaterialParams) -> Self {
        Self {
            params,
            ..Default::default()
        }
    }

    pub fn meshes(&self) -> &[ObjectId] {
        &self.meshes
    }

    pub fn matcaps(&self) -> &[TextureId] {
        &self.matcaps
    }

    /// The material every mesh currently shares.
    pub fn material(&self) -> Material {
        let p = &self.params;
        let material = match p.shading {
            ShadingChoice::Standard => Material::standard(p.color, p.metalness, p.roughness),
            ShadingChoice::Matcap => Material {
                color: p.color,
                ..Material::matcap(self.matcaps.get(p.matcap).copied())
            },
        };
        material.with_wireframe(p.wireframe).with_double_sided(true)
    }

    fn apply_material(&self, scene: &mut Scene) {
        let material = self.material();
        for id in &self.meshes {
            if let Some(mesh) = scene.get_mut(*id) {
                mesh.material = material.clone();
            }
        }
    }
}

impl Demo for MaterialsGallery {
    type Param = MaterialParam;
    type Command = MaterialCommand;

    fn title(&self) -> &str {
        "Materials"
    }

    fn camera(&self) -> CameraSetup {
        CameraSetup::default()
    }

    fn build(&mut self, scene: &mut Scene, _viewport: &ViewportState) {
        self.matcaps = (0..MATCAP_COUNT)
            .map(|i| scene.textures.reserve(matcap_path(i)))
            .collect();

        let sphere = scene.geometries.insert_primitive(Primitive::sphere(0.5, 64, 64));
        let plane = scene.geometries.insert_primitive(Primitive::plane(1.0, 1.0, 100, 100));
        let torus = scene.geometries.insert_primitive(Primitive::torus(0.3, 0.2, 64, 128));

        let material = self.material();
        self.meshes = vec![
            scene.add(SceneObject::new("sphere", sphere, material.clone()).with_position(-1.5, 0.0, 0.0)),
            scene.add(SceneObject::new("plane", plane, material.clone())),
            scene.add(SceneObject::new("torus", torus, material).with_position(1.5, 0.0, 0.0)),
        ];

        scene.add_light(Light::ambient(Color::WHITE, 1.0));
        scene.add_light(Light::point(Color::WHITE, 30.0, Vector3::new(2.0, 3.0, 4.0)));
    }

    fn register(&self, panel: &mut ParameterPanel<MaterialParam>) {
        let p = &self.params;
        let matcap_labels: Vec<String> = (0..MATCAP_COUNT).map(|i| format!("matcap {}", i + 1)).collect();
        let matcap_labels: Vec<&str> = matcap_labels.iter().map(String::as_str).collect();

        panel
            .add(ParameterEntry::select(
                MaterialParam::Shading,
                "shading",
                &ShadingChoice::LABELS,
                p.shading.index(),
            ))
            .add(ParameterEntry::slider(MaterialParam::Metalness, "metalness", p.metalness, 0.0, 1.0, 0.0001))
            .add(ParameterEntry::slider(MaterialParam::Roughness, "roughness", p.roughness, 0.0, 1.0, 0.0001))
            .add(ParameterEntry::color(MaterialParam::Color, "color", p.color.to_srgb()))
            .add(ParameterEntry::checkbox(MaterialParam::Wireframe, "wireframe", p.wireframe))
            .add(ParameterEntry::select(MaterialParam::Matcap, "matcap", &matcap_labels, p.matcap));
    }

    fn command(&self, change: &ParamChange<MaterialParam>) -> Option<MaterialCommand> {
        let value = &change.value;
        match change.key {
            MaterialParam::Shading => value
                .as_choice()
                .and_then(ShadingChoice::from_index)
                .map(MaterialCommand::SetShading),
            MaterialParam::Metalness => value.as_f32().map(MaterialCommand::SetMetalness),
            MaterialParam::Roughness => value.as_f32().map(MaterialCommand::SetRoughness),
            MaterialParam::Color => value
                .as_color()
                .map(|srgb| MaterialCommand::SetColor(Color::from_srgb(srgb))),
            MaterialParam::Wireframe => value.as_bool().map(MaterialCommand::SetWireframe),
            MaterialParam::Matcap => value.as_choice().map(MaterialCommand::SetMatcap),
        }
    }

    fn update(&mut self, scene: &mut Scene, command: MaterialCommand) {
        match command {
            MaterialCommand::SetShading(shading) => self.params.shading = shading,
            MaterialCommand::SetMetalness(v) => self.params.metalness = v,
            MaterialCommand::SetRoughness(v) => self.params.roughness = v,
            MaterialCommand::SetColor(color) => self.params.color = color,
            MaterialCommand::SetWireframe(wireframe) => self.params.wireframe = wireframe,
            MaterialCommand::SetMatcap(index) => self.params.matcap = index.min(MATCAP_COUNT - 1),
        }
        self.apply_material(scene);
    }

    fn animate(&mut self, scene: &mut Scene, elapsed: f32) {
        for id in &self.meshes {
            if let Some(mesh) = scene.get_mut(*id) {
                mesh.transform.rotation.y = 0.1 * elapsed;
                mesh.transform.rotation.x = -0.15 * elapsed;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        context::DemoContext,
        gfx::resources::Shading,
        ui::{EditPhase, ParamValue},
    };

    fn context() -> DemoContext<MaterialsGallery> {
        DemoContext::new(MaterialsGallery::default(), ViewportState::new(800, 600, 1.0))
    }

    fn edit(context: &mut DemoContext<MaterialsGallery>, key: MaterialParam, value: ParamValue) {
        if let Some(change) = context.panel.edit(key, value, EditPhase::Changed) {
            context.apply_change(&change);
        }
    }

    #[test]
    fn test_build_creates_three_meshes_and_lights() {
        let context = context();
        assert_eq!(context.scene.mesh_count(), 3);
        assert_eq!(context.scene.lights.len(), 2);
        assert_eq!(context.scene.textures.len(), MATCAP_COUNT);
        assert_eq!(context.scene.textures.pending()[2].1, std::path::PathBuf::from("matcaps/3.png"));
    }

    #[test]
    fn test_metalness_updates_every_mesh() {
        let mut context = context();
        edit(&mut context, MaterialParam::Metalness, ParamValue::Float(0.25));

        for id in context.demo.meshes() {
            match context.scene.get(*id).unwrap().material.shading {
                Shading::Standard { metalness, .. } => assert!((metalness - 0.25).abs() < 1e-4),
                other => panic!("unexpected shading {other:?}"),
            }
        }
    }

    #[test]
    fn test_matcap_shading_uses_selected_image() {
        let mut context = context();
        edit(&mut context, MaterialParam::Matcap, ParamValue::Choice(4));
        edit(&mut context, MaterialParam::Shading, ParamValue::Choice(1));

        let expected = context.demo.matcaps()[4];
        for id in context.demo.meshes() {
            let material = &context.scene.get(*id).unwrap().material;
            assert_eq!(material.matcap_texture(), Some(expected));
        }
    }

    #[test]
    fn test_wireframe_keeps_geometry() {
        let mut context = context();
        let geometries = context.scene.geometries.live_count();
        edit(&mut context, MaterialParam::Wireframe, ParamValue::Bool(true));

        assert!(context
            .demo
            .meshes()
            .iter()
            .all(|id| context.scene.get(*id).unwrap().material.wireframe));
        assert_eq!(context.scene.geometries.live_count(), geometries);
    }

    #[test]
    fn test_rotation_follows_elapsed_time() {
        let mut context = context();
        context.demo.animate(&mut context.scene, 2.0);
        let torus = context.scene.get(context.demo.meshes()[2]).unwrap();
        assert!((torus.transform.rotation.y - 0.2).abs() < 1e-6);
        assert!((torus.transform.rotation.x + 0.3).abs() < 1e-6);
    }
}
