//! wgpu implementation of [`ShaderBackend`].
//!
//! A "stage" is a WGSL `ShaderModule`; "linking" builds the render pipeline
//! from the vertex and fragment modules. Both steps run inside a validation
//! error scope so failures come back as diagnostics instead of reaching the
//! device's uncaptured-error handler.

use std::borrow::Cow;

use crate::shader_program::{ShaderBackend, ShaderStage};

pub const VERTEX_ENTRY: &str = "vs_main";
pub const FRAGMENT_ENTRY: &str = "fs_main";

pub struct WgpuShaderBackend {
    device: wgpu::Device,
    pipeline_layout: wgpu::PipelineLayout,
    vertex_layout: wgpu::VertexBufferLayout<'static>,
    target_format: wgpu::TextureFormat,
}

impl WgpuShaderBackend {
    pub fn new(
        device: &wgpu::Device,
        target_format: wgpu::TextureFormat,
        bind_group_layouts: &[&wgpu::BindGroupLayout],
        vertex_layout: wgpu::VertexBufferLayout<'static>,
    ) -> Self {
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Program Layout"),
            bind_group_layouts,
            push_constant_ranges: &[],
        });
        Self {
            device: device.clone(),
            pipeline_layout,
            vertex_layout,
            target_format,
        }
    }

    fn scoped<T>(&self, create: impl FnOnce(&wgpu::Device) -> T) -> Result<T, String> {
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let value = create(&self.device);
        match pollster::block_on(self.device.pop_error_scope()) {
            Some(err) => Err(err.to_string()),
            None => Ok(value),
        }
    }
}

impl ShaderBackend for WgpuShaderBackend {
    type Stage = wgpu::ShaderModule;
    type Program = wgpu::RenderPipeline;
    type Target = wgpu::RenderPass<'static>;

    fn compile_stage(
        &mut self,
        stage: ShaderStage,
        source: &str,
    ) -> Result<wgpu::ShaderModule, String> {
        let label = match stage {
            ShaderStage::Vertex => "Scene Vertex Stage",
            ShaderStage::Fragment => "Scene Fragment Stage",
        };
        self.scoped(|device| {
            device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(label),
                source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(source)),
            })
        })
    }

    fn link_program(
        &mut self,
        vertex: &wgpu::ShaderModule,
        fragment: &wgpu::ShaderModule,
    ) -> Result<wgpu::RenderPipeline, String> {
        self.scoped(|device| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Scene Program"),
                layout: Some(&self.pipeline_layout),
                vertex: wgpu::VertexState {
                    module: vertex,
                    entry_point: Some(VERTEX_ENTRY),
                    buffers: &[self.vertex_layout.clone()],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: fragment,
                    entry_point: Some(FRAGMENT_ENTRY),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: self.target_format,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
        })
    }

    fn delete_stage(&mut self, stage: wgpu::ShaderModule) {
        drop(stage);
    }

    fn delete_program(&mut self, program: wgpu::RenderPipeline) {
        log::debug!("Releasing scene program");
        drop(program);
    }

    fn use_program(&self, program: &wgpu::RenderPipeline, target: &mut wgpu::RenderPass<'static>) {
        target.set_pipeline(program);
    }
}
