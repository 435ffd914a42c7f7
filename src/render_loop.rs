//! Frame-driven loop with an explicit exit condition.
//!
//! One [`RenderLoop::tick`] per frame: sample the clock, animate the demo,
//! advance camera damping, render. Hosts with an event loop call `tick`
//! from their redraw handler; [`RenderLoop::run`] drives it directly.

use std::time::Instant;

use crate::{
    context::DemoContext,
    demos::Demo,
    error::VitrineError,
    gfx::{camera::OrbitCamera, scene::Scene},
    ui::{ParamChange, ParameterPanel},
};

/// Monotonic seconds since start.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    start: Instant,
}

impl Clock {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

/// The frame that was just rendered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    /// Zero-based frame number.
    pub index: u64,
    pub elapsed: f32,
}

pub trait ExitCondition {
    fn should_exit(&mut self, frame: &FrameInfo) -> bool;
}

impl<F: FnMut(&FrameInfo) -> bool> ExitCondition for F {
    fn should_exit(&mut self, frame: &FrameInfo) -> bool {
        self(frame)
    }
}

/// Exits after this many frames. The check follows each rendered frame, so
/// a limit of 0 still draws one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLimit(pub u64);

impl FrameLimit {
    /// Runs until the host closes.
    pub const UNLIMITED: Self = FrameLimit(u64::MAX);

    pub fn from_option(frames: Option<u64>) -> Self {
        frames.map_or(Self::UNLIMITED, FrameLimit)
    }
}

impl ExitCondition for FrameLimit {
    fn should_exit(&mut self, frame: &FrameInfo) -> bool {
        frame.index.saturating_add(1) >= self.0
    }
}

/// What one frame draws: the scene, from the camera, with the panel on top.
pub struct Frame<'a, K> {
    pub scene: &'a mut Scene,
    pub camera: &'a OrbitCamera,
    pub panel: &'a mut ParameterPanel<K>,
}

pub trait FrameRenderer<K> {
    /// Draws one frame and returns the panel changes made while drawing it.
    fn render(&mut self, frame: Frame<'_, K>) -> Result<Vec<ParamChange<K>>, VitrineError>;
}

pub struct RenderLoop<E> {
    clock: Clock,
    exit: E,
    frames: u64,
}

impl<E: ExitCondition> RenderLoop<E> {
    pub fn new(exit: E) -> Self {
        Self {
            clock: Clock::start(),
            exit,
            frames: 0,
        }
    }

    /// Frames rendered so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn tick<D, R>(
        &mut self,
        context: &mut DemoContext<D>,
        renderer: &mut R,
    ) -> Result<LoopControl, VitrineError>
    where
        D: Demo,
        R: FrameRenderer<D::Param>,
    {
        let elapsed = self.clock.elapsed();
        self.tick_at(elapsed, context, renderer)
    }

    /// A tick at a given time. A render error is returned as is and the
    /// frame does not count.
    pub fn tick_at<D, R>(
        &mut self,
        elapsed: f32,
        context: &mut DemoContext<D>,
        renderer: &mut R,
    ) -> Result<LoopControl, VitrineError>
    where
        D: Demo,
        R: FrameRenderer<D::Param>,
    {
        context.demo.animate(&mut context.scene, elapsed);
        context.controller.update(&mut context.camera);

        let changes = renderer.render(Frame {
            scene: &mut context.scene,
            camera: &context.camera,
            panel: &mut context.panel,
        })?;
        context.apply_changes(changes);

        let info = FrameInfo {
            index: self.frames,
            elapsed,
        };
        self.frames += 1;

        if self.exit.should_exit(&info) {
            log::info!("Exit condition met after {} frames", self.frames);
            Ok(LoopControl::Exit)
        } else {
            Ok(LoopControl::Continue)
        }
    }

    /// Ticks until the exit condition fires or rendering fails.
    pub fn run<D, R>(&mut self, context: &mut DemoContext<D>, renderer: &mut R) -> Result<u64, VitrineError>
    where
        D: Demo,
        R: FrameRenderer<D::Param>,
    {
        while self.tick(context, renderer)? == LoopControl::Continue {}
        Ok(self.frames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        gfx::{
            camera::CameraSetup,
            geometry::Primitive,
            resources::Material,
            scene::{ObjectId, SceneObject},
        },
        ui::{ParamValue, ParameterEntry},
        viewport::ViewportState,
    };

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Key {
        Speed,
    }

    #[derive(Debug)]
    enum Command {
        Speed(f32),
    }

    #[derive(Default)]
    struct Spinner {
        cube: Option<ObjectId>,
        speed: f32,
        animated: Vec<f32>,
    }

    impl Demo for Spinner {
        type Param = Key;
        type Command = Command;

        fn title(&self) -> &str {
            "spinner"
        }

        fn camera(&self) -> CameraSetup {
            CameraSetup {
                damping: false,
                ..Default::default()
            }
        }

        fn build(&mut self, scene: &mut Scene, _viewport: &ViewportState) {
            let geometry = scene.geometries.insert_primitive(Primitive::cube(1.0, 1.0, 1.0, 1));
            self.cube = Some(scene.add(SceneObject::new("cube", geometry, Material::default())));
            self.speed = 1.0;
        }

        fn register(&self, panel: &mut ParameterPanel<Key>) {
            panel.add(ParameterEntry::slider(Key::Speed, "speed", self.speed, 0.0, 10.0, 0.5));
        }

        fn command(&self, change: &ParamChange<Key>) -> Option<Command> {
            change.value.as_f32().map(Command::Speed)
        }

        fn update(&mut self, _scene: &mut Scene, command: Command) {
            let Command::Speed(speed) = command;
            self.speed = speed;
        }

        fn animate(&mut self, scene: &mut Scene, elapsed: f32) {
            self.animated.push(elapsed);
            if let Some(cube) = self.cube.and_then(|id| scene.get_mut(id)) {
                cube.transform.rotation.y = elapsed * self.speed;
            }
        }
    }

    /// Records the cube rotation each frame sees, optionally editing the
    /// panel or failing on a given frame.
    #[derive(Default)]
    struct RecordingRenderer {
        seen_rotations: Vec<f32>,
        edit_on_frame: Option<(usize, f32)>,
        fail_on_frame: Option<usize>,
    }

    impl FrameRenderer<Key> for RecordingRenderer {
        fn render(&mut self, frame: Frame<'_, Key>) -> Result<Vec<ParamChange<Key>>, VitrineError> {
            let index = self.seen_rotations.len();
            if self.fail_on_frame == Some(index) {
                return Err(VitrineError::Overlay("lost device".into()));
            }
            let rotation = frame
                .scene
                .objects()
                .next()
                .map(|(_, o)| o.transform.rotation.y)
                .unwrap_or_default();
            self.seen_rotations.push(rotation);

            let mut changes = Vec::new();
            if let Some((at, speed)) = self.edit_on_frame {
                if at == index {
                    changes.extend(frame.panel.edit(
                        Key::Speed,
                        ParamValue::Float(speed),
                        crate::ui::EditPhase::Changed,
                    ));
                }
            }
            Ok(changes)
        }
    }

    fn context() -> DemoContext<Spinner> {
        DemoContext::new(Spinner::default(), ViewportState::new(800, 600, 1.0))
    }

    #[test]
    fn test_animation_happens_before_render() {
        let mut context = context();
        let mut renderer = RecordingRenderer::default();
        let mut render_loop = RenderLoop::new(FrameLimit(10));

        render_loop.tick_at(0.5, &mut context, &mut renderer).unwrap();
        render_loop.tick_at(1.0, &mut context, &mut renderer).unwrap();

        assert_eq!(renderer.seen_rotations, vec![0.5, 1.0]);
        assert_eq!(context.demo.animated, vec![0.5, 1.0]);
    }

    #[test]
    fn test_panel_changes_apply_after_the_frame() {
        let mut context = context();
        let mut renderer = RecordingRenderer {
            edit_on_frame: Some((0, 2.0)),
            ..Default::default()
        };
        let mut render_loop = RenderLoop::new(FrameLimit(10));

        render_loop.tick_at(1.0, &mut context, &mut renderer).unwrap();
        render_loop.tick_at(2.0, &mut context, &mut renderer).unwrap();

        assert_eq!(renderer.seen_rotations, vec![1.0, 4.0]);
    }

    #[test]
    fn test_frame_limit_stops_run() {
        let mut context = context();
        let mut renderer = RecordingRenderer::default();
        let mut render_loop = RenderLoop::new(FrameLimit(3));

        let frames = render_loop.run(&mut context, &mut renderer).unwrap();

        assert_eq!(frames, 3);
        assert_eq!(renderer.seen_rotations.len(), 3);
    }

    #[test]
    fn test_zero_frame_limit_still_draws_once() {
        let mut context = context();
        let mut renderer = RecordingRenderer::default();
        let mut render_loop = RenderLoop::new(FrameLimit(0));

        assert_eq!(render_loop.run(&mut context, &mut renderer).unwrap(), 1);
        assert_eq!(renderer.seen_rotations.len(), 1);
    }

    #[test]
    fn test_closure_exit_condition() {
        let mut context = context();
        let mut renderer = RecordingRenderer::default();
        let mut render_loop = RenderLoop::new(|frame: &FrameInfo| frame.elapsed >= 2.0);

        let first = render_loop.tick_at(1.0, &mut context, &mut renderer).unwrap();
        let second = render_loop.tick_at(2.0, &mut context, &mut renderer).unwrap();

        assert_eq!(first, LoopControl::Continue);
        assert_eq!(second, LoopControl::Exit);
    }

    #[test]
    fn test_render_error_halts_the_loop() {
        let mut context = context();
        let mut renderer = RecordingRenderer {
            fail_on_frame: Some(2),
            ..Default::default()
        };
        let mut render_loop = RenderLoop::new(FrameLimit::from_option(None));

        let result = render_loop.run(&mut context, &mut renderer);

        assert!(matches!(result, Err(VitrineError::Overlay(_))));
        assert_eq!(render_loop.frames(), 2);
    }
}
