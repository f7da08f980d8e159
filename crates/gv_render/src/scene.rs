//! Static scene: one textured quad drawn with the viewer's shader program.

use wgpu::util::DeviceExt;

use crate::camera::CameraUniform;
use crate::gpu_context::GpuContext;
use crate::shader_program::ShaderProgram;
use crate::texture::{ImageData, Texture};
use crate::vertex::{SceneVertex, QUAD_INDICES, QUAD_VERTICES};
use crate::wgpu_backend::WgpuShaderBackend;

pub type SceneProgram = ShaderProgram<WgpuShaderBackend>;

pub const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.2,
    g: 0.3,
    b: 0.3,
    a: 1.0,
};

/// Bind group layouts shared by the program's pipeline layout and the scene's
/// bind groups: group 0 is the camera, group 1 the texture.
pub struct SceneLayouts {
    pub camera: wgpu::BindGroupLayout,
    pub texture: wgpu::BindGroupLayout,
}

impl SceneLayouts {
    pub fn new(device: &wgpu::Device) -> Self {
        let camera = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Camera Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        Self {
            camera,
            texture: Texture::bind_group_layout(device),
        }
    }

    pub fn shader_backend(&self, gpu: &GpuContext) -> WgpuShaderBackend {
        WgpuShaderBackend::new(
            &gpu.device,
            gpu.surface_format,
            &[&self.camera, &self.texture],
            SceneVertex::layout(),
        )
    }
}

pub struct SceneRenderer {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    _texture: Texture,
    texture_bind_group: wgpu::BindGroup,
    pub clear_color: wgpu::Color,
}

impl SceneRenderer {
    pub fn new(gpu: &GpuContext, layouts: &SceneLayouts, image: &ImageData) -> Self {
        let vertex_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Quad Vertex Buffer"),
                contents: bytemuck::cast_slice(&QUAD_VERTICES),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Quad Index Buffer"),
                contents: bytemuck::cast_slice(&QUAD_INDICES),
                usage: wgpu::BufferUsages::INDEX,
            });

        let camera_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Uniform Buffer"),
                contents: bytemuck::cast_slice(&[CameraUniform::from_matrix(glam::Mat4::IDENTITY)]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let camera_bind_group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &layouts.camera,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let texture = Texture::from_image(&gpu.device, &gpu.queue, image, "Scene Texture");
        let texture_bind_group = texture.create_bind_group(&gpu.device, &layouts.texture);
        log::info!(
            "Scene uploaded: {} vertices, {} indices, texture {}x{}",
            QUAD_VERTICES.len(),
            QUAD_INDICES.len(),
            texture.size.0,
            texture.size.1
        );

        Self {
            vertex_buffer,
            index_buffer,
            index_count: QUAD_INDICES.len() as u32,
            camera_buffer,
            camera_bind_group,
            _texture: texture,
            texture_bind_group,
            clear_color: CLEAR_COLOR,
        }
    }

    /// Clear, bind the program, draw the quad and present. Skips the frame if
    /// no surface texture is available.
    pub fn render(&self, gpu: &GpuContext, program: &SceneProgram, uniform: &CameraUniform) {
        let Some((output, view)) = gpu.begin_frame() else {
            return;
        };

        gpu.queue
            .write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&[*uniform]));

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Scene Encoder"),
            });

        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Scene Render Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(self.clear_color),
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();

            program.use_program(&mut pass);
            pass.set_bind_group(0, &self.camera_bind_group, &[]);
            pass.set_bind_group(1, &self.texture_bind_group, &[]);
            pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..self.index_count, 0, 0..1);
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }
}
