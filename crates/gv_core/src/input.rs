//! Input state tracking for the viewer.
//!
//! - **Key table:** level-triggered `is_held(key)` drives continuous camera
//!   motion every tick; edge-triggered `is_just_pressed(key)` is true only for
//!   the tick in which the transition arrived and is cleared by `end_frame()`.
//!
//! - **Mouse tracker:** converts absolute pointer samples into incremental
//!   look offsets. Only the newest sample matters, so a burst of motion events
//!   collapses into one offset when it is taken.

use std::collections::HashSet;

use crate::camera::CameraMovement;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
    Up,
    Down,
    Left,
    Right,
    Escape,
    R,
    F5,
}

/// Window-library independent input event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Quit,
    KeyDown(Key),
    KeyUp(Key),
    /// Absolute pointer position in window pixels (y grows downward).
    MouseMove { x: f64, y: f64 },
    MouseWheel { delta_y: f32 },
}

/// Keys that translate the camera while held.
pub fn movement_for(key: Key) -> Option<CameraMovement> {
    match key {
        Key::W | Key::Up => Some(CameraMovement::Forward),
        Key::S | Key::Down => Some(CameraMovement::Backward),
        Key::A | Key::Left => Some(CameraMovement::Left),
        Key::D | Key::Right => Some(CameraMovement::Right),
        _ => None,
    }
}

pub struct KeyTable {
    held: HashSet<Key>,
    just_pressed: HashSet<Key>,
    just_released: HashSet<Key>,
}

impl KeyTable {
    pub fn new() -> Self {
        Self {
            held: HashSet::new(),
            just_pressed: HashSet::new(),
            just_released: HashSet::new(),
        }
    }

    pub fn key_down(&mut self, key: Key) {
        if self.held.insert(key) {
            self.just_pressed.insert(key);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        if self.held.remove(&key) {
            self.just_released.insert(key);
        }
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn is_just_pressed(&self, key: Key) -> bool {
        self.just_pressed.contains(&key)
    }

    pub fn is_just_released(&self, key: Key) -> bool {
        self.just_released.contains(&key)
    }

    /// Movement directions for every held key that maps to one.
    /// Opposing keys both contribute and cancel out.
    pub fn held_movements(&self) -> impl Iterator<Item = CameraMovement> + '_ {
        self.held.iter().filter_map(|&key| movement_for(key))
    }

    pub fn any_movement_held(&self) -> bool {
        self.held_movements().next().is_some()
    }

    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
    }

    pub fn clear(&mut self) {
        self.held.clear();
        self.end_frame();
    }
}

impl Default for KeyTable {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct MouseTracker {
    first_sample: bool,
    last: (f64, f64),
    latest: Option<(f64, f64)>,
}

impl MouseTracker {
    pub fn new() -> Self {
        Self {
            first_sample: true,
            last: (0.0, 0.0),
            latest: None,
        }
    }

    /// Record the newest absolute pointer position. Earlier unconsumed samples
    /// are superseded.
    pub fn sample(&mut self, x: f64, y: f64) {
        self.latest = Some((x, y));
    }

    /// Offset from the last consumed sample to the newest one, with y reversed
    /// so that moving the pointer up yields a positive pitch offset. The very
    /// first sample only establishes the reference point.
    pub fn take_offset(&mut self) -> Option<(f32, f32)> {
        let (x, y) = self.latest.take()?;
        if self.first_sample {
            self.first_sample = false;
            self.last = (x, y);
            return None;
        }
        let offset = ((x - self.last.0) as f32, (self.last.1 - y) as f32);
        self.last = (x, y);
        Some(offset)
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for MouseTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_down_sets_held_and_just_pressed() {
        let mut keys = KeyTable::new();
        keys.key_down(Key::W);
        assert!(keys.is_held(Key::W));
        assert!(keys.is_just_pressed(Key::W));
    }

    #[test]
    fn key_up_clears_held_sets_just_released() {
        let mut keys = KeyTable::new();
        keys.key_down(Key::W);
        keys.key_up(Key::W);
        assert!(!keys.is_held(Key::W));
        assert!(keys.is_just_released(Key::W));
    }

    #[test]
    fn key_up_without_down_is_no_op() {
        let mut keys = KeyTable::new();
        keys.key_up(Key::A);
        assert!(!keys.is_just_released(Key::A));
        assert!(!keys.is_held(Key::A));
    }

    #[test]
    fn end_frame_keeps_held_state() {
        let mut keys = KeyTable::new();
        keys.key_down(Key::A);
        keys.key_down(Key::F5);
        keys.end_frame();
        assert!(!keys.is_just_pressed(Key::A));
        assert!(keys.is_held(Key::A));
        assert!(keys.is_held(Key::F5));
    }

    #[test]
    fn held_movements_skip_unmapped_keys() {
        let mut keys = KeyTable::new();
        keys.key_down(Key::R);
        assert!(!keys.any_movement_held());
        keys.key_down(Key::Up);
        keys.key_down(Key::D);
        let mut dirs: Vec<_> = keys.held_movements().collect();
        dirs.sort_by_key(|d| *d as u8);
        assert_eq!(dirs, vec![CameraMovement::Forward, CameraMovement::Right]);
    }

    #[test]
    fn clear_drops_everything() {
        let mut keys = KeyTable::new();
        keys.key_down(Key::S);
        keys.clear();
        assert!(!keys.is_held(Key::S));
        assert!(!keys.is_just_pressed(Key::S));
    }

    #[test]
    fn first_mouse_sample_yields_no_offset() {
        let mut mouse = MouseTracker::new();
        mouse.sample(400.0, 300.0);
        assert_eq!(mouse.take_offset(), None);
        mouse.sample(410.0, 290.0);
        assert_eq!(mouse.take_offset(), Some((10.0, 10.0)));
    }

    #[test]
    fn burst_of_samples_collapses_to_newest() {
        let mut mouse = MouseTracker::new();
        mouse.sample(0.0, 0.0);
        mouse.take_offset();
        for i in 1..=50 {
            mouse.sample(i as f64 * 2.0, i as f64);
        }
        assert_eq!(mouse.take_offset(), Some((100.0, -50.0)));
        assert_eq!(mouse.take_offset(), None);
    }

    #[test]
    fn reset_restores_first_sample_state() {
        let mut mouse = MouseTracker::new();
        mouse.sample(5.0, 5.0);
        mouse.take_offset();
        mouse.reset();
        mouse.sample(100.0, 100.0);
        assert_eq!(mouse.take_offset(), None);
    }

    #[test]
    fn movement_mapping_covers_wasd_and_arrows() {
        assert_eq!(movement_for(Key::W), Some(CameraMovement::Forward));
        assert_eq!(movement_for(Key::Down), Some(CameraMovement::Backward));
        assert_eq!(movement_for(Key::A), Some(CameraMovement::Left));
        assert_eq!(movement_for(Key::Right), Some(CameraMovement::Right));
        assert_eq!(movement_for(Key::Escape), None);
    }
}
