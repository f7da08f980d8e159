#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub tex_coords: [f32; 2],
}

impl SceneVertex {
    pub const fn new(position: [f32; 3], color: [f32; 3], tex_coords: [f32; 2]) -> Self {
        Self {
            position,
            color,
            tex_coords,
        }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SceneVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                // position
                wgpu::VertexAttribute {
                    offset: std::mem::offset_of!(SceneVertex, position) as wgpu::BufferAddress,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                // color
                wgpu::VertexAttribute {
                    offset: std::mem::offset_of!(SceneVertex, color) as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                // tex_coords
                wgpu::VertexAttribute {
                    offset: std::mem::offset_of!(SceneVertex, tex_coords) as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/// Textured, vertex-coloured quad in the z = 0 plane. Texture v runs downward.
pub const QUAD_VERTICES: [SceneVertex; 4] = [
    SceneVertex::new([0.8, 0.8, 0.0], [1.0, 0.0, 0.0], [1.0, 0.0]), // top right
    SceneVertex::new([0.8, -0.8, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0]), // bottom right
    SceneVertex::new([-0.8, -0.8, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0]), // bottom left
    SceneVertex::new([-0.8, 0.8, 0.0], [1.0, 1.0, 0.0], [0.0, 0.0]), // top left
];

pub const QUAD_INDICES: [u32; 6] = [0, 1, 3, 1, 2, 3];
