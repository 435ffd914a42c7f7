//! WGPU-based rendering engine
//!
//! Mirrors the CPU scene onto the GPU lazily: geometry buffers are created
//! the first frame a geometry is drawn and dropped when the store reports it
//! disposed, per-object uniforms follow object removal, and matcap images
//! are uploaded once when their slot is fulfilled.

use std::collections::HashMap;
use std::sync::Arc;

use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::{
    error::VitrineError,
    gfx::{
        camera::OrbitCamera,
        geometry::{GeometryData, GeometryId},
        resources::{
            global_bindings::{GlobalBindings, GlobalUBO, GlobalUBOContent},
            material::{Material, MaterialUniform},
            texture_library::TextureId,
            texture_resource::TextureResource,
        },
        scene::{ObjectId, ObjectUniform, Scene, SceneObject},
    },
    viewport::SurfaceResize,
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

use super::{
    pipeline_manager::{PipelineConfig, PipelineManager},
    scene_mirror::SceneMirror,
    vertex::Vertex3D,
};

const SHADER: &str = "scene";
const LIT: &str = "Lit";
const LIT_DOUBLE_SIDED: &str = "LitDoubleSided";
const WIREFRAME: &str = "Wireframe";

/// Vertex data plus triangle and edge index buffers of one geometry.
struct GeometryBuffers {
    vertices: wgpu::Buffer,
    triangles: wgpu::Buffer,
    triangle_count: u32,
    edges: wgpu::Buffer,
    edge_count: u32,
}

impl GeometryBuffers {
    fn new(device: &wgpu::Device, id: GeometryId, data: &GeometryData) -> Self {
        let vertices = Vertex3D::interleave(data);
        let edges = data.wireframe_indices();
        let label = format!("{:?}", id);

        Self {
            vertices: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label} Vertices")),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            }),
            triangles: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label} Triangles")),
                contents: bytemuck::cast_slice(&data.indices),
                usage: wgpu::BufferUsages::INDEX,
            }),
            triangle_count: data.indices.len() as u32,
            edges: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label} Edges")),
                contents: bytemuck::cast_slice(&edges),
                usage: wgpu::BufferUsages::INDEX,
            }),
            edge_count: edges.len() as u32,
        }
    }
}

/// Transform and material uniforms of one object, bound at group 1.
struct ObjectBindings {
    transform: UniformBuffer<ObjectUniform>,
    material: UniformBuffer<MaterialUniform>,
    bind_group: wgpu::BindGroup,
}

impl ObjectBindings {
    fn new(device: &wgpu::Device, layout: &BindGroupLayoutWithDesc, id: ObjectId) -> Self {
        let transform = UniformBuffer::<ObjectUniform>::new(device);
        let material = UniformBuffer::<MaterialUniform>::new(device);
        let bind_group = BindGroupBuilder::new(layout)
            .resource(transform.binding_resource())
            .resource(material.binding_resource())
            .create(device, &format!("{:?} Bind Group", id));
        Self {
            transform,
            material,
            bind_group,
        }
    }

    fn update(&mut self, queue: &wgpu::Queue, object: &SceneObject) {
        self.transform
            .update_content(queue, ObjectUniform::from(&object.transform));
        self.material.update_content(queue, object.material.uniform());
    }
}

/// Core rendering engine managing GPU resources and draw calls
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    format: wgpu::TextureFormat,
    depth_texture: TextureResource,
    pipeline_manager: PipelineManager,
    global_ubo: GlobalUBO,
    global_bindings: GlobalBindings,
    object_layout: BindGroupLayoutWithDesc,
    matcap_layout: BindGroupLayoutWithDesc,
    fallback_matcap: wgpu::BindGroup,

    mirror: SceneMirror<GeometryBuffers, ObjectBindings>,
    matcaps: HashMap<TextureId, wgpu::BindGroup>,

    /// CSS-style size the viewport reports; the surface is this times `pixel_ratio`.
    logical_size: (u32, u32),
    pixel_ratio: f64,
}

impl RenderEngine {
    /// Creates a render engine drawing into `window`
    ///
    /// # Arguments
    /// * `window` - Window surface target for rendering
    /// * `width`, `height` - Logical size of the viewport
    /// * `pixel_ratio` - Device pixels per logical pixel, already capped
    pub async fn new(
        window: Arc<Window>,
        width: u32,
        height: u32,
        pixel_ratio: f64,
    ) -> Result<RenderEngine, VitrineError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        log::info!("Using adapter {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: 4096,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let capabilities = surface.get_capabilities(&adapter);
        // The shader gamma-encodes its output, so prefer a linear format.
        let format = capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| capabilities.formats.first().copied())
            .ok_or(VitrineError::UnsupportedSurface)?;
        let alpha_mode = capabilities
            .alpha_modes
            .first()
            .copied()
            .ok_or(VitrineError::UnsupportedSurface)?;

        let (surface_width, surface_height) = physical_size(width, height, pixel_ratio);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: surface_width.max(1),
            height: surface_height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        let depth_texture = TextureResource::create_depth_texture(&device, &config, "depth_texture");

        let global_ubo = GlobalUBO::new(&device);
        let global_bindings = GlobalBindings::new(&device, &global_ubo);

        let object_layout = BindGroupLayoutBuilder::new()
            .next_binding_vertex(binding_types::uniform())
            .next_binding_fragment(binding_types::uniform())
            .create(&device, "Object Bind Group Layout");
        let matcap_layout = BindGroupLayoutBuilder::new()
            .next_binding_fragment(binding_types::texture_2d())
            .next_binding_fragment(binding_types::sampler(wgpu::SamplerBindingType::Filtering))
            .create(&device, "Matcap Bind Group Layout");

        let white = TextureResource::white(&device, &queue);
        let fallback_matcap = matcap_bind_group(&device, &matcap_layout, &white, "Fallback Matcap");

        let device: Arc<wgpu::Device> = device.into();
        let queue: Arc<wgpu::Queue> = queue.into();
        let mut pipeline_manager = PipelineManager::new(device.clone());
        pipeline_manager.load_shader(SHADER, include_str!("scene.wgsl"));

        let lit = PipelineConfig::default()
            .with_shader(SHADER)
            .with_depth_format(TextureResource::DEPTH_FORMAT)
            .with_color_target(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })
            .with_bind_group_layouts(vec![
                global_bindings.bind_group_layout().clone(),
                object_layout.layout.clone(),
                matcap_layout.layout.clone(),
            ]);

        pipeline_manager.register_pipeline(LIT, lit.clone().with_label("LIT"));
        pipeline_manager.register_pipeline(
            LIT_DOUBLE_SIDED,
            lit.clone().with_label("LIT DOUBLE SIDED").with_cull_mode(None),
        );
        pipeline_manager.register_pipeline(
            WIREFRAME,
            lit.with_label("WIREFRAME")
                .with_primitive_topology(wgpu::PrimitiveTopology::LineList)
                .with_cull_mode(None),
        );

        if let Err(errors) = pipeline_manager.create_all_pipelines() {
            for error in errors {
                log::error!("{}", error);
            }
        }

        Ok(RenderEngine {
            surface,
            device,
            queue,
            config,
            format,
            depth_texture,
            pipeline_manager,
            global_ubo,
            global_bindings,
            object_layout,
            matcap_layout,
            fallback_matcap,
            mirror: SceneMirror::new(),
            matcaps: HashMap::new(),
            logical_size: (width, height),
            pixel_ratio,
        })
    }

    /// Renders the scene, then lets `overlay` draw on top in the same frame.
    ///
    /// Returns `Ok(None)` when the surface was outdated or lost: it is
    /// reconfigured and the frame is skipped.
    pub fn render_frame<F, R>(
        &mut self,
        scene: &mut Scene,
        camera: &OrbitCamera,
        overlay: F,
    ) -> Result<Option<R>, VitrineError>
    where
        F: FnOnce(
            &wgpu::Device,
            &wgpu::Queue,
            &mut wgpu::CommandEncoder,
            &wgpu::TextureView,
        ) -> Result<R, VitrineError>,
    {
        self.sync_resources(scene);
        self.global_ubo.update_content(
            &self.queue,
            GlobalUBOContent::new(&camera.uniform, &scene.lights),
        );
        self.prepare_objects(scene);

        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost) => {
                log::debug!("Surface outdated, skipping frame");
                self.configure_surface();
                return Ok(None);
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Timed out acquiring the next frame");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let [r, g, b] = scene.background.to_srgb();
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);

            for (id, object) in scene.objects() {
                if !object.visible {
                    continue;
                }
                let (Some(buffers), Some(bindings)) =
                    (self.mirror.geometry(object.geometry), self.mirror.object(id))
                else {
                    continue;
                };
                let Some(pipeline) = self.pipeline_manager.pipeline(pipeline_for(&object.material)) else {
                    continue;
                };

                let (indices, count) = if object.material.wireframe {
                    (&buffers.edges, buffers.edge_count)
                } else {
                    (&buffers.triangles, buffers.triangle_count)
                };
                if count == 0 {
                    continue;
                }

                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(1, &bindings.bind_group, &[]);
                render_pass.set_bind_group(2, self.matcap_for(&object.material), &[]);
                render_pass.set_vertex_buffer(0, buffers.vertices.slice(..));
                render_pass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..count, 0, 0..1);
            }
        }

        let overlay_result = overlay(&self.device, &self.queue, &mut encoder, &view)?;

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        Ok(Some(overlay_result))
    }

    /// Drops GPU resources the scene released and uploads fresh matcaps.
    fn sync_resources(&mut self, scene: &mut Scene) {
        self.mirror.release(scene);
        for (id, asset) in scene.textures.drain_loaded() {
            let texture = TextureResource::from_asset(&self.device, &self.queue, &asset);
            let bind_group = matcap_bind_group(&self.device, &self.matcap_layout, &texture, &asset.label);
            self.matcaps.insert(id, bind_group);
            log::debug!("Uploaded matcap {:?} ({}x{})", id, asset.width, asset.height);
        }
    }

    /// Creates missing buffers and bind groups and refreshes uniforms of
    /// every visible object.
    fn prepare_objects(&mut self, scene: &Scene) {
        let device = &self.device;
        let queue = &self.queue;
        let object_layout = &self.object_layout;
        self.mirror.prepare(
            scene,
            |id, data| GeometryBuffers::new(device, id, data),
            |id| ObjectBindings::new(device, object_layout, id),
            |bindings, object| bindings.update(queue, object),
        );
    }

    fn matcap_for(&self, material: &Material) -> &wgpu::BindGroup {
        material
            .matcap_texture()
            .and_then(|id| self.matcaps.get(&id))
            .unwrap_or(&self.fallback_matcap)
    }

    fn configure_surface(&mut self) {
        let (width, height) = physical_size(self.logical_size.0, self.logical_size.1, self.pixel_ratio);
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
    }

    /// Current surface size in device pixels.
    pub fn surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.format
    }

}

impl SurfaceResize for RenderEngine {
    fn set_size(&mut self, width: u32, height: u32) {
        if self.logical_size != (width, height) {
            self.logical_size = (width, height);
            self.configure_surface();
        }
    }

    fn set_pixel_ratio(&mut self, ratio: f64) {
        if self.pixel_ratio != ratio {
            self.pixel_ratio = ratio;
            self.configure_surface();
        }
    }
}

fn pipeline_for(material: &Material) -> &'static str {
    if material.wireframe {
        WIREFRAME
    } else if material.double_sided {
        LIT_DOUBLE_SIDED
    } else {
        LIT
    }
}

fn matcap_bind_group(
    device: &wgpu::Device,
    layout: &BindGroupLayoutWithDesc,
    texture: &TextureResource,
    label: &str,
) -> wgpu::BindGroup {
    BindGroupBuilder::new(layout)
        .texture(&texture.view)
        .sampler(&texture.sampler)
        .create(device, label)
}

/// Logical size times pixel ratio, rounded, at least 1x1 unless a side is 0.
pub fn physical_size(width: u32, height: u32, pixel_ratio: f64) -> (u32, u32) {
    let scale = |v: u32| {
        if v == 0 {
            0
        } else {
            ((v as f64 * pixel_ratio).round() as u32).max(1)
        }
    };
    (scale(width), scale(height))
}
