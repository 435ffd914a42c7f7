use crate::{
    assets::FontHandle,
    demos::Demo,
    gfx::{
        camera::{CameraController, OrbitCamera},
        resources::{TextureAsset, TextureId},
        scene::Scene,
    },
    ui::{ParamChange, ParameterPanel},
    viewport::{SurfaceResize, ViewportController, ViewportState},
};

const ROTATE_SPEED: f32 = 0.005;
const ZOOM_SPEED: f32 = 0.1;

/// Everything one running demo owns: its state, the scene it built, the
/// panel bound to its parameters, and the camera and viewport.
pub struct DemoContext<D: Demo> {
    pub demo: D,
    pub scene: Scene,
    pub panel: ParameterPanel<D::Param>,
    pub camera: OrbitCamera,
    pub controller: CameraController,
    pub viewport: ViewportController,
}

impl<D: Demo> DemoContext<D> {
    /// Builds the scene and registers the panel entries.
    pub fn new(mut demo: D, viewport: ViewportState) -> Self {
        let setup = demo.camera();
        let mut camera = OrbitCamera::from_setup(&setup, viewport.aspect());
        camera.update_view_proj();
        let controller = CameraController::new(ROTATE_SPEED, ZOOM_SPEED).with_damping(setup.damping);

        let mut scene = Scene::new();
        demo.build(&mut scene, &viewport);

        let mut panel = ParameterPanel::new(demo.title());
        demo.register(&mut panel);

        log::info!(
            "Built {:?}: {} meshes, {} panel entries",
            demo.title(),
            scene.mesh_count(),
            panel.len()
        );

        Self {
            demo,
            scene,
            panel,
            camera,
            controller,
            viewport: ViewportController::new(viewport),
        }
    }

    /// Applies panel changes in the order they were reported.
    pub fn apply_changes(&mut self, changes: Vec<ParamChange<D::Param>>) {
        for change in changes {
            self.apply_change(&change);
        }
    }

    pub fn apply_change(&mut self, change: &ParamChange<D::Param>) {
        match self.demo.command(change) {
            Some(command) => {
                log::debug!("{:?}", command);
                self.demo.update(&mut self.scene, command);
            }
            None => log::debug!("No command for {:?}", change.key),
        }
    }

    pub fn texture_loaded(&mut self, id: TextureId, asset: TextureAsset) {
        self.scene.textures.fulfil(id, asset);
    }

    pub fn font_loaded(&mut self, font: FontHandle) {
        let viewport = *self.viewport.state();
        self.demo
            .on_font(&mut self.scene, &mut self.panel, font, &viewport);
    }

    pub fn resize(
        &mut self,
        width: u32,
        height: u32,
        device_pixel_ratio: f64,
        surface: &mut impl SurfaceResize,
    ) {
        self.viewport
            .resize(width, height, device_pixel_ratio, &mut self.camera, surface);
        let viewport = *self.viewport.state();
        self.demo.on_resize(&mut self.scene, &viewport);
    }

    pub fn toggle_panel(&mut self) {
        self.panel.toggle_visible();
    }
}
