use winit::event::MouseScrollDelta;
use winit::keyboard::KeyCode;

use gv_core::Key;

/// Pixels per wheel "line" for touchpads that report pixel deltas.
const PIXELS_PER_LINE: f64 = 40.0;

pub fn map_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::KeyW => Some(Key::W),
        KeyCode::KeyA => Some(Key::A),
        KeyCode::KeyS => Some(Key::S),
        KeyCode::KeyD => Some(Key::D),
        KeyCode::ArrowUp => Some(Key::Up),
        KeyCode::ArrowDown => Some(Key::Down),
        KeyCode::ArrowLeft => Some(Key::Left),
        KeyCode::ArrowRight => Some(Key::Right),
        KeyCode::Escape => Some(Key::Escape),
        KeyCode::KeyR => Some(Key::R),
        KeyCode::F5 => Some(Key::F5),
        _ => None,
    }
}

pub fn wheel_lines(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => y,
        MouseScrollDelta::PixelDelta(pos) => (pos.y / PIXELS_PER_LINE) as f32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;

    #[test]
    fn movement_keys_map_to_both_layouts() {
        assert_eq!(map_key(KeyCode::KeyW), Some(Key::W));
        assert_eq!(map_key(KeyCode::ArrowUp), Some(Key::Up));
        assert_eq!(map_key(KeyCode::KeyD), Some(Key::D));
        assert_eq!(map_key(KeyCode::ArrowRight), Some(Key::Right));
    }

    #[test]
    fn unbound_keys_are_ignored() {
        assert_eq!(map_key(KeyCode::KeyQ), None);
        assert_eq!(map_key(KeyCode::Tab), None);
        assert_eq!(map_key(KeyCode::Space), None);
    }

    #[test]
    fn wheel_line_delta_passes_through() {
        assert_eq!(wheel_lines(MouseScrollDelta::LineDelta(0.0, -2.0)), -2.0);
    }

    #[test]
    fn wheel_pixel_delta_is_scaled_to_lines() {
        let delta = MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 80.0));
        assert_eq!(wheel_lines(delta), 2.0);
    }
}
