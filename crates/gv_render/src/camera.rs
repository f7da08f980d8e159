use glam::Mat4;
use gv_core::FrameView;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn from_matrix(view_proj: Mat4) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
        }
    }
}

/// Scene-side projection parameters. The vertical FOV comes from the camera
/// each frame; aspect and clip planes are owned here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Projection {
    pub fn new(width: u32, height: u32, near: f32, far: f32) -> Self {
        let mut projection = Self {
            aspect: 1.0,
            near,
            far,
        };
        projection.resize(width, height);
        projection
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn matrix(&self, fov_degrees: f32) -> Mat4 {
        Mat4::perspective_rh(fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn build_uniform(&self, frame: &FrameView) -> CameraUniform {
        CameraUniform::from_matrix(self.matrix(frame.fov_degrees) * frame.view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec3, Vec4};
    use gv_core::FlyCamera;

    fn frame_for(camera: &FlyCamera) -> FrameView {
        FrameView {
            view: camera.view_matrix(),
            fov_degrees: camera.zoom(),
            delta: 0.0,
            frame: 1,
        }
    }

    #[test]
    fn resize_ignores_zero_dimensions() {
        let mut projection = Projection::new(800, 400, 0.1, 100.0);
        assert_eq!(projection.aspect, 2.0);
        projection.resize(0, 300);
        assert_eq!(projection.aspect, 2.0);
    }

    #[test]
    fn quad_centre_lands_in_clip_volume() {
        let camera = FlyCamera::new(Vec3::new(0.0, 0.0, 3.0));
        let projection = Projection::new(512, 512, 0.1, 100.0);
        let uniform = projection.build_uniform(&frame_for(&camera));
        let view_proj = Mat4::from_cols_array_2d(&uniform.view_proj);

        let clip = view_proj * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!((0.0..=1.0).contains(&ndc.z));
    }

    #[test]
    fn point_behind_camera_has_negative_w() {
        let camera = FlyCamera::new(Vec3::new(0.0, 0.0, 3.0));
        let projection = Projection::new(512, 512, 0.1, 100.0);
        let view_proj = projection.matrix(camera.zoom()) * camera.view_matrix();
        let clip = view_proj * Vec4::new(0.0, 0.0, 10.0, 1.0);
        assert!(clip.w < 0.0);
    }
}
