pub mod camera;
pub mod gpu_context;
pub mod scene;
pub mod shader_program;
pub mod texture;
pub mod vertex;
pub mod wgpu_backend;

pub use camera::{CameraUniform, Projection};
pub use gpu_context::GpuContext;
pub use scene::{SceneLayouts, SceneProgram, SceneRenderer};
pub use shader_program::{ShaderBackend, ShaderError, ShaderProgram, ShaderStage};
pub use texture::{checkerboard, decode_image, load_image_from_path, ImageData, Texture};
pub use vertex::SceneVertex;
pub use wgpu_backend::WgpuShaderBackend;
