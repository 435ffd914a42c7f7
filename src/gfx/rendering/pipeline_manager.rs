//! Render pipeline management
//!
//! Pipelines are described by a [`PipelineConfig`], registered by name and
//! compiled together once every layout they need exists. Shader modules are
//! loaded once and shared between pipelines by name.

use std::collections::HashMap;
use std::sync::Arc;

use wgpu::{
    BindGroupLayout, ColorTargetState, CompareFunction, DepthBiasState, DepthStencilState, Device,
    Face, FragmentState, FrontFace, MultisampleState, PipelineCompilationOptions,
    PipelineLayoutDescriptor, PolygonMode, PrimitiveState, PrimitiveTopology, RenderPipeline,
    RenderPipelineDescriptor, ShaderModule, ShaderModuleDescriptor, ShaderSource, StencilState,
    TextureFormat, VertexState,
};

use super::vertex::Vertex3D;

/// Configuration for creating a render pipeline
#[derive(Clone)]
pub struct PipelineConfig {
    pub label: String,
    /// Name of a shader loaded with [`PipelineManager::load_shader`].
    pub shader: String,
    pub vertex_entry: String,
    pub fragment_entry: String,
    pub bind_group_layouts: Vec<BindGroupLayout>,
    pub color_targets: Vec<Option<ColorTargetState>>,
    pub primitive_topology: PrimitiveTopology,
    pub cull_mode: Option<Face>,
    pub depth_format: Option<TextureFormat>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            label: "Default Pipeline".to_string(),
            shader: "default".to_string(),
            vertex_entry: "vs_main".to_string(),
            fragment_entry: "fs_main".to_string(),
            bind_group_layouts: Vec::new(),
            color_targets: Vec::new(),
            primitive_topology: PrimitiveTopology::TriangleList,
            cull_mode: Some(Face::Back),
            depth_format: None,
        }
    }
}

impl PipelineConfig {
    /// Sets the debug label (builder pattern)
    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }

    /// Sets the shader identifier (builder pattern)
    pub fn with_shader(mut self, shader: &str) -> Self {
        self.shader = shader.to_string();
        self
    }

    /// Sets all bind group layouts at once (builder pattern)
    pub fn with_bind_group_layouts(mut self, layouts: Vec<BindGroupLayout>) -> Self {
        self.bind_group_layouts = layouts;
        self
    }

    /// Enables depth testing against a buffer of `format` (builder pattern)
    pub fn with_depth_format(mut self, format: TextureFormat) -> Self {
        self.depth_format = Some(format);
        self
    }

    /// Sets a single color target (builder pattern)
    pub fn with_color_target(mut self, target: ColorTargetState) -> Self {
        self.color_targets = vec![Some(target)];
        self
    }

    /// Sets primitive topology (builder pattern)
    pub fn with_primitive_topology(mut self, topology: PrimitiveTopology) -> Self {
        self.primitive_topology = topology;
        self
    }

    /// Sets face culling, `None` draws both sides (builder pattern)
    pub fn with_cull_mode(mut self, cull_mode: Option<Face>) -> Self {
        self.cull_mode = cull_mode;
        self
    }
}

/// Compiles and caches render pipelines by name.
pub struct PipelineManager {
    device: Arc<Device>,
    pipelines: HashMap<String, RenderPipeline>,
    pipeline_configs: HashMap<String, PipelineConfig>,
    shader_modules: HashMap<String, ShaderModule>,
    pending_pipelines: Vec<String>,
}

impl PipelineManager {
    pub fn new(device: Arc<Device>) -> Self {
        Self {
            device,
            pipelines: HashMap::new(),
            pipeline_configs: HashMap::new(),
            shader_modules: HashMap::new(),
            pending_pipelines: Vec::new(),
        }
    }

    /// Compiles a WGSL module and stores it under `name`.
    pub fn load_shader(&mut self, name: &str, source: &str) {
        let module = self.device.create_shader_module(ShaderModuleDescriptor {
            label: Some(name),
            source: ShaderSource::Wgsl(source.into()),
        });
        self.shader_modules.insert(name.to_string(), module);
    }

    /// Registers a pipeline configuration without creating it
    ///
    /// # Arguments
    /// * `name` - Key later passed to [`Self::pipeline`]
    /// * `config` - Pipeline description; its shader must be loaded before
    ///   [`Self::create_all_pipelines`] runs
    pub fn register_pipeline(&mut self, name: &str, config: PipelineConfig) {
        self.pipeline_configs.insert(name.to_string(), config);
        self.pending_pipelines.push(name.to_string());
    }

    /// Creates every registered pipeline that does not exist yet.
    ///
    /// # Returns
    /// The messages of the pipelines that failed, if any
    pub fn create_all_pipelines(&mut self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        for name in std::mem::take(&mut self.pending_pipelines) {
            let Some(config) = self.pipeline_configs.get(&name) else {
                continue;
            };
            match self.create_pipeline_from_config(config) {
                Ok(pipeline) => {
                    log::debug!("Created pipeline {:?}", name);
                    self.pipelines.insert(name, pipeline);
                }
                Err(e) => errors.push(format!("Pipeline '{}': {}", name, e)),
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn pipeline(&self, name: &str) -> Option<&RenderPipeline> {
        self.pipelines.get(name)
    }

    fn create_pipeline_from_config(&self, config: &PipelineConfig) -> Result<RenderPipeline, String> {
        let shader = self
            .shader_modules
            .get(&config.shader)
            .ok_or_else(|| format!("Shader '{}' not found", config.shader))?;

        let layouts: Vec<&BindGroupLayout> = config.bind_group_layouts.iter().collect();
        let pipeline_layout = self.device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some(&format!("{} Layout", config.label)),
            bind_group_layouts: &layouts,
            push_constant_ranges: &[],
        });

        let depth_stencil = config.depth_format.map(|format| DepthStencilState {
            format,
            depth_write_enabled: true,
            depth_compare: CompareFunction::Less,
            stencil: StencilState::default(),
            bias: DepthBiasState::default(),
        });

        Ok(self.device.create_render_pipeline(&RenderPipelineDescriptor {
            label: Some(&config.label),
            layout: Some(&pipeline_layout),
            vertex: VertexState {
                module: shader,
                entry_point: Some(&config.vertex_entry),
                buffers: &[Vertex3D::desc()],
                compilation_options: PipelineCompilationOptions::default(),
            },
            fragment: Some(FragmentState {
                module: shader,
                entry_point: Some(&config.fragment_entry),
                targets: &config.color_targets,
                compilation_options: PipelineCompilationOptions::default(),
            }),
            primitive: PrimitiveState {
                topology: config.primitive_topology,
                strip_index_format: None,
                front_face: FrontFace::Ccw,
                cull_mode: config.cull_mode,
                polygon_mode: PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil,
            multisample: MultisampleState::default(),
            multiview: None,
            cache: None,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sets_fields() {
        let config = PipelineConfig::default()
            .with_label("Wireframe")
            .with_shader("scene")
            .with_primitive_topology(PrimitiveTopology::LineList)
            .with_cull_mode(None)
            .with_depth_format(TextureFormat::Depth32Float);

        assert_eq!(config.label, "Wireframe");
        assert_eq!(config.shader, "scene");
        assert_eq!(config.primitive_topology, PrimitiveTopology::LineList);
        assert_eq!(config.cull_mode, None);
        assert_eq!(config.depth_format, Some(TextureFormat::Depth32Float));
        assert_eq!(config.vertex_entry, "vs_main");
    }
}
