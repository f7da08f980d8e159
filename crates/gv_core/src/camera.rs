//! Free-flying Euler-angle camera.
//!
//! Orientation is stored as yaw/pitch in degrees. The `front`, `right` and `up`
//! vectors are derived from those angles and recomputed after every orientation
//! change, so they can never drift out of sync with the reported angles.
//!
//! Yaw accumulates without wrapping; only its sine and cosine are consumed.
//! Pitch is clamped before the basis is rebuilt, never after.

use glam::{Mat4, Vec3};
use serde::Deserialize;

const DEFAULT_PITCH_LIMIT: f32 = 89.0;
const DEFAULT_ZOOM_RANGE: (f32, f32) = (1.0, 90.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraMovement {
    Forward,
    Backward,
    Left,
    Right,
}

/// Tunables for a [`FlyCamera`]. Angles are in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub position: [f32; 3],
    pub yaw: f32,
    pub pitch: f32,
    pub movement_speed: f32,
    pub mouse_sensitivity: f32,
    pub zoom: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
    pub scroll_step: f32,
    pub pitch_limit: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 3.0],
            yaw: -90.0,
            pitch: 0.0,
            movement_speed: 2.5,
            mouse_sensitivity: 0.1,
            zoom: 45.0,
            min_zoom: DEFAULT_ZOOM_RANGE.0,
            max_zoom: DEFAULT_ZOOM_RANGE.1,
            scroll_step: 1.0,
            pitch_limit: DEFAULT_PITCH_LIMIT,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FlyCamera {
    position: Vec3,
    world_up: Vec3,
    yaw: f32,
    pitch: f32,
    front: Vec3,
    right: Vec3,
    up: Vec3,
    zoom: f32,
    pub movement_speed: f32,
    pub mouse_sensitivity: f32,
    pub scroll_step: f32,
    min_zoom: f32,
    max_zoom: f32,
    pitch_limit: f32,
}

impl FlyCamera {
    /// Camera at `position` looking down -Z with +Y up and default tunables.
    pub fn new(position: Vec3) -> Self {
        Self::with_settings(CameraSettings {
            position: position.to_array(),
            ..CameraSettings::default()
        })
    }

    pub fn with_settings(settings: CameraSettings) -> Self {
        let (min_zoom, max_zoom) = zoom_bounds(settings.min_zoom, settings.max_zoom);
        let pitch_limit = pitch_bound(settings.pitch_limit);
        let mut camera = Self {
            position: Vec3::from_array(settings.position),
            world_up: Vec3::Y,
            yaw: settings.yaw,
            pitch: settings.pitch.clamp(-pitch_limit, pitch_limit),
            front: Vec3::NEG_Z,
            right: Vec3::X,
            up: Vec3::Y,
            zoom: settings.zoom.clamp(min_zoom, max_zoom),
            movement_speed: settings.movement_speed,
            mouse_sensitivity: settings.mouse_sensitivity,
            scroll_step: settings.scroll_step,
            min_zoom,
            max_zoom,
            pitch_limit,
        };
        camera.update_vectors();
        camera
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn world_up(&self) -> Vec3 {
        self.world_up
    }

    /// Current vertical field of view in degrees.
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn zoom_range(&self) -> (f32, f32) {
        (self.min_zoom, self.max_zoom)
    }

    pub fn pitch_limit(&self) -> f32 {
        self.pitch_limit
    }

    /// Look-at transform from `position` towards `position + front`.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    /// Right-handed perspective with the current zoom as vertical FOV.
    /// Aspect and clip planes belong to the scene, not the camera.
    pub fn projection_matrix(&self, aspect: f32, near: f32, far: f32) -> Mat4 {
        Mat4::perspective_rh(self.zoom.to_radians(), aspect, near, far)
    }

    pub fn process_keyboard(&mut self, direction: CameraMovement, delta_seconds: f32) {
        let velocity = self.movement_speed * delta_seconds;
        match direction {
            CameraMovement::Forward => self.position += self.front * velocity,
            CameraMovement::Backward => self.position -= self.front * velocity,
            CameraMovement::Left => self.position -= self.right * velocity,
            CameraMovement::Right => self.position += self.right * velocity,
        }
    }

    pub fn process_mouse_movement(&mut self, x_offset: f32, y_offset: f32, constrain_pitch: bool) {
        self.yaw += x_offset * self.mouse_sensitivity;
        self.pitch += y_offset * self.mouse_sensitivity;

        if constrain_pitch {
            self.pitch = self.pitch.clamp(-self.pitch_limit, self.pitch_limit);
        }

        self.update_vectors();
    }

    pub fn process_mouse_scroll(&mut self, y_offset: f32) {
        self.zoom = (self.zoom - y_offset * self.scroll_step).clamp(self.min_zoom, self.max_zoom);
    }

    fn update_vectors(&mut self) {
        let (yaw_sin, yaw_cos) = self.yaw.to_radians().sin_cos();
        let (pitch_sin, pitch_cos) = self.pitch.to_radians().sin_cos();
        self.front = Vec3::new(yaw_cos * pitch_cos, pitch_sin, yaw_sin * pitch_cos).normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}

impl Default for FlyCamera {
    fn default() -> Self {
        Self::with_settings(CameraSettings::default())
    }
}

/// Non-finite bounds fall back to the defaults; reversed bounds are swapped.
fn zoom_bounds(a: f32, b: f32) -> (f32, f32) {
    if !(a.is_finite() && b.is_finite()) {
        return DEFAULT_ZOOM_RANGE;
    }
    (a.min(b), a.max(b))
}

/// Limits must stay below vertical; anything else (NaN included) uses the default.
fn pitch_bound(limit: f32) -> f32 {
    let limit = limit.abs();
    if limit < 90.0 {
        limit
    } else {
        DEFAULT_PITCH_LIMIT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn approx_vec(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < EPS
    }

    fn assert_orthonormal(camera: &FlyCamera) {
        let (f, r, u) = (camera.front(), camera.right(), camera.up());
        assert!((f.length() - 1.0).abs() < EPS, "front not unit: {f:?}");
        assert!((r.length() - 1.0).abs() < EPS, "right not unit: {r:?}");
        assert!((u.length() - 1.0).abs() < EPS, "up not unit: {u:?}");
        assert!(f.dot(r).abs() < EPS);
        assert!(f.dot(u).abs() < EPS);
        assert!(r.dot(u).abs() < EPS);
        // right-handed: right x up == -front for a look-along-front camera
        assert!(approx_vec(r.cross(u), -f));
        // up stays in the plane spanned by world up and front
        assert!(u.dot(camera.world_up()) >= -EPS);
    }

    #[test]
    fn default_basis_looks_down_negative_z() {
        let camera = FlyCamera::new(Vec3::new(0.0, 0.0, 3.0));
        assert!(approx_vec(camera.front(), Vec3::NEG_Z));
        assert!(approx_vec(camera.right(), Vec3::X));
        assert!(approx_vec(camera.up(), Vec3::Y));
        assert_eq!(camera.yaw(), -90.0);
        assert_eq!(camera.pitch(), 0.0);
        assert_eq!(camera.zoom(), 45.0);
        assert_orthonormal(&camera);
    }

    #[test]
    fn forward_one_second_moves_along_front() {
        let mut camera = FlyCamera::new(Vec3::new(0.0, 0.0, 3.0));
        camera.movement_speed = 2.5;
        camera.process_keyboard(CameraMovement::Forward, 1.0);
        assert!(approx_vec(camera.position(), Vec3::new(0.0, 0.0, 0.5)));
    }

    #[test]
    fn backward_left_right_use_current_basis() {
        let mut camera = FlyCamera::new(Vec3::ZERO);
        camera.process_keyboard(CameraMovement::Backward, 1.0);
        assert!(approx_vec(camera.position(), Vec3::new(0.0, 0.0, 2.5)));

        camera.set_position(Vec3::ZERO);
        camera.process_keyboard(CameraMovement::Right, 1.0);
        assert!(approx_vec(camera.position(), Vec3::new(2.5, 0.0, 0.0)));
        camera.process_keyboard(CameraMovement::Left, 2.0);
        assert!(approx_vec(camera.position(), Vec3::new(-2.5, 0.0, 0.0)));

        // Turn 90 degrees right; forward is now +X.
        camera.set_position(Vec3::ZERO);
        camera.mouse_sensitivity = 1.0;
        camera.process_mouse_movement(90.0, 0.0, true);
        camera.process_keyboard(CameraMovement::Forward, 1.0);
        assert!(approx_vec(camera.position(), Vec3::new(2.5, 0.0, 0.0)));
    }

    #[test]
    fn mouse_offset_scales_by_sensitivity() {
        let mut camera = FlyCamera::new(Vec3::new(0.0, 0.0, 3.0));
        camera.mouse_sensitivity = 0.05;
        let before = camera.view_matrix();
        camera.process_mouse_movement(100.0, 0.0, true);
        assert!((camera.yaw() - (-85.0)).abs() < EPS);
        let after = camera.view_matrix();
        assert!(!before.abs_diff_eq(after, 1e-4));
        assert_orthonormal(&camera);
    }

    #[test]
    fn pitch_clamps_exactly_at_limit() {
        let mut camera = FlyCamera::default();
        camera.mouse_sensitivity = 1.0;
        for _ in 0..10 {
            camera.process_mouse_movement(0.0, 30.0, true);
        }
        assert_eq!(camera.pitch(), 89.0);
        assert_orthonormal(&camera);

        for _ in 0..20 {
            camera.process_mouse_movement(3.0, -45.0, true);
        }
        assert_eq!(camera.pitch(), -89.0);
        assert_orthonormal(&camera);
    }

    #[test]
    fn basis_matches_pitch_after_clamp() {
        let mut camera = FlyCamera::default();
        camera.mouse_sensitivity = 1.0;
        camera.process_mouse_movement(0.0, 500.0, true);
        let expected_y = 89.0_f32.to_radians().sin();
        assert!((camera.front().y - expected_y).abs() < EPS);
    }

    #[test]
    fn unconstrained_pitch_is_not_clamped() {
        let mut camera = FlyCamera::default();
        camera.mouse_sensitivity = 1.0;
        camera.process_mouse_movement(0.0, 120.0, false);
        assert_eq!(camera.pitch(), 120.0);
    }

    #[test]
    fn zero_mouse_movement_is_idempotent() {
        let mut camera = FlyCamera::default();
        camera.process_mouse_movement(37.0, -12.0, true);
        let (yaw, pitch) = (camera.yaw(), camera.pitch());
        let (f, r, u) = (camera.front(), camera.right(), camera.up());
        camera.process_mouse_movement(0.0, 0.0, true);
        assert_eq!(camera.yaw(), yaw);
        assert_eq!(camera.pitch(), pitch);
        assert!(approx_vec(camera.front(), f));
        assert!(approx_vec(camera.right(), r));
        assert!(approx_vec(camera.up(), u));
    }

    #[test]
    fn yaw_accumulates_without_wrapping() {
        let mut camera = FlyCamera::default();
        camera.mouse_sensitivity = 1.0;
        camera.process_mouse_movement(720.0, 0.0, true);
        assert_eq!(camera.yaw(), 630.0);
        assert!(approx_vec(camera.front(), Vec3::NEG_Z));
    }

    #[test]
    fn scroll_stays_within_zoom_range() {
        let mut camera = FlyCamera::default();
        let (min_zoom, max_zoom) = camera.zoom_range();
        assert_eq!((min_zoom, max_zoom), (1.0, 90.0));
        for offset in [3.0, 500.0, -1.0e6, 0.5, 1.0e6, -7.0, f32::MAX] {
            camera.process_mouse_scroll(offset);
            let zoom = camera.zoom();
            assert!((min_zoom..=max_zoom).contains(&zoom), "zoom escaped range: {zoom}");
        }
        camera.process_mouse_scroll(1.0e6);
        assert_eq!(camera.zoom(), 1.0);
        camera.process_mouse_scroll(-1.0e6);
        assert_eq!(camera.zoom(), 90.0);
    }

    #[test]
    fn scroll_up_narrows_field_of_view() {
        let mut camera = FlyCamera::default();
        camera.process_mouse_scroll(2.0);
        assert_eq!(camera.zoom(), 43.0);
    }

    #[test]
    fn custom_bounds_are_honoured() {
        let mut camera = FlyCamera::with_settings(CameraSettings {
            min_zoom: 10.0,
            max_zoom: 60.0,
            pitch_limit: 45.0,
            mouse_sensitivity: 1.0,
            ..CameraSettings::default()
        });
        camera.process_mouse_scroll(100.0);
        assert_eq!(camera.zoom(), 10.0);
        camera.process_mouse_movement(0.0, 80.0, true);
        assert_eq!(camera.pitch(), 45.0);
        assert_orthonormal(&camera);
    }

    #[test]
    fn view_matrix_maps_target_onto_negative_z() {
        let camera = FlyCamera::new(Vec3::new(0.0, 0.0, 3.0));
        let eye_space = camera.view_matrix().transform_point3(Vec3::ZERO);
        assert!(approx_vec(eye_space, Vec3::new(0.0, 0.0, -3.0)));
    }

    #[test]
    fn projection_uses_zoom_as_fov() {
        let mut camera = FlyCamera::default();
        let wide = camera.projection_matrix(1.0, 0.1, 100.0);
        camera.process_mouse_scroll(20.0);
        let narrow = camera.projection_matrix(1.0, 0.1, 100.0);
        // Narrower FOV means a larger focal scale on x.
        assert!(narrow.x_axis.x > wide.x_axis.x);
    }

    #[test]
    fn nan_pitch_limit_falls_back_to_default() {
        let mut camera = FlyCamera::with_settings(CameraSettings {
            pitch_limit: f32::NAN,
            pitch: 30.0,
            mouse_sensitivity: 1.0,
            ..CameraSettings::default()
        });
        assert_eq!(camera.pitch_limit(), 89.0);
        assert_eq!(camera.pitch(), 30.0);
        camera.process_mouse_movement(0.0, 500.0, true);
        assert_eq!(camera.pitch(), 89.0);
        assert_orthonormal(&camera);
    }

    #[test]
    fn out_of_range_bounds_are_sanitized() {
        let camera = FlyCamera::with_settings(CameraSettings {
            pitch_limit: -120.0,
            min_zoom: f32::NAN,
            max_zoom: 30.0,
            ..CameraSettings::default()
        });
        assert_eq!(camera.pitch_limit(), 89.0);
        assert_eq!(camera.zoom_range(), (1.0, 90.0));

        let negative = FlyCamera::with_settings(CameraSettings {
            pitch_limit: -45.0,
            min_zoom: 60.0,
            max_zoom: 10.0,
            ..CameraSettings::default()
        });
        assert_eq!(negative.pitch_limit(), 45.0);
        assert_eq!(negative.zoom_range(), (10.0, 60.0));
        assert_eq!(negative.zoom(), 45.0);
    }
}
