//! Frame loop with event coalescing and a bounded wait.
//!
//! One iteration ("tick"):
//!
//!   1. measure the delta since the previous tick (`FrameClock`)
//!   2. apply continuous motion for every held movement key
//!   3. render if a render is due
//!   4. wait for input up to `wait_timeout`; on timeout go back to 1
//!   5. drain **every** queued event in one pass: key events update the key
//!      table, wheel events zoom immediately, pointer samples only update the
//!      mouse tracker. One look update is applied from the newest sample
//!      after the drain, so a burst of motion costs one camera update.
//!
//! `Quit` or an Escape press moves the loop to `Stopped`. That state is
//! terminal: `tick` and `ingest` do nothing afterwards.
//!
//! `run` drives all of this against an [`EventSource`]. A windowing backend
//! that owns its own blocking wait (winit's `ControlFlow::WaitUntil`) calls
//! `ingest` with each delivered batch and then `tick` instead.

use std::time::{Duration, Instant};

use glam::Mat4;

use crate::camera::FlyCamera;
use crate::config::{FrameLoopSettings, RedrawPolicy};
use crate::input::{InputEvent, Key, KeyTable, MouseTracker};
use crate::time::FrameClock;

pub trait EventSource {
    /// Block for at most `timeout` waiting for the next event.
    fn wait_event(&mut self, timeout: Duration) -> Option<InputEvent>;

    /// Next already-queued event, without blocking.
    fn poll_event(&mut self) -> Option<InputEvent>;
}

pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Quit,
    Escape,
}

/// What the render callback gets each time a frame is due.
#[derive(Debug, Clone, Copy)]
pub struct FrameView {
    pub view: Mat4,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub delta: f32,
    pub frame: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub ticks: u64,
    pub renders: u64,
    pub events: u64,
    pub look_updates: u64,
}

pub struct FrameLoop {
    state: LoopState,
    stop_reason: Option<StopReason>,
    keys: KeyTable,
    mouse: MouseTracker,
    clock: FrameClock,
    wait_timeout: Duration,
    redraw: RedrawPolicy,
    render_due: bool,
    stats: LoopStats,
}

impl FrameLoop {
    pub fn new(settings: FrameLoopSettings, now: Instant) -> Self {
        let mut clock = FrameClock::new(now);
        clock.max_delta = settings.max_delta_seconds;
        Self {
            state: LoopState::Running,
            stop_reason: None,
            keys: KeyTable::new(),
            mouse: MouseTracker::new(),
            clock,
            wait_timeout: settings.wait_timeout(),
            redraw: settings.redraw,
            render_due: true,
            stats: LoopStats::default(),
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    pub fn stop_reason(&self) -> Option<StopReason> {
        self.stop_reason
    }

    pub fn keys(&self) -> &KeyTable {
        &self.keys
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn stats(&self) -> LoopStats {
        self.stats
    }

    pub fn wait_timeout(&self) -> Duration {
        self.wait_timeout
    }

    pub fn redraw_policy(&self) -> RedrawPolicy {
        self.redraw
    }

    pub fn set_redraw_policy(&mut self, redraw: RedrawPolicy) {
        self.redraw = redraw;
    }

    /// Force the next tick to render (resize, shader swap).
    pub fn request_render(&mut self) {
        self.render_due = true;
    }

    /// Forget held keys and the pointer reference, e.g. after focus loss.
    pub fn reset_input(&mut self) {
        self.keys.clear();
        self.mouse.reset();
    }

    /// Clear edge-triggered key state for a wake-up that does not tick, such
    /// as while the window is minimized. Held keys are kept.
    pub fn end_input_frame(&mut self) {
        self.keys.end_frame();
    }

    pub fn stop(&mut self, reason: StopReason) {
        if self.state == LoopState::Stopped {
            return;
        }
        log::info!("Frame loop stopping: {:?}", reason);
        self.state = LoopState::Stopped;
        self.stop_reason = Some(reason);
    }

    /// Apply one batch of queued events. Returns how many were consumed;
    /// events after a stop request are left unconsumed.
    pub fn ingest<I>(&mut self, events: I, camera: &mut FlyCamera) -> usize
    where
        I: IntoIterator<Item = InputEvent>,
    {
        if !self.is_running() {
            return 0;
        }

        let mut consumed = 0;
        for event in events {
            consumed += 1;
            match event {
                InputEvent::Quit => {
                    self.stop(StopReason::Quit);
                    break;
                }
                InputEvent::KeyDown(Key::Escape) => {
                    self.stop(StopReason::Escape);
                    break;
                }
                InputEvent::KeyDown(key) => self.keys.key_down(key),
                InputEvent::KeyUp(key) => self.keys.key_up(key),
                InputEvent::MouseMove { x, y } => self.mouse.sample(x, y),
                InputEvent::MouseWheel { delta_y } => camera.process_mouse_scroll(delta_y),
            }
        }
        self.stats.events += consumed as u64;

        if !self.is_running() {
            return consumed;
        }

        if let Some((dx, dy)) = self.mouse.take_offset() {
            camera.process_mouse_movement(dx, dy, true);
            self.stats.look_updates += 1;
        }
        if consumed > 0 {
            self.render_due = true;
        }
        consumed
    }

    /// Steps 1-3 of a tick. Returns whether `render` was invoked.
    pub fn tick<R>(&mut self, now: Instant, camera: &mut FlyCamera, mut render: R) -> bool
    where
        R: FnMut(&FrameView),
    {
        if !self.is_running() {
            return false;
        }

        let delta = self.clock.tick(now);
        let mut moved = false;
        for direction in self.keys.held_movements() {
            camera.process_keyboard(direction, delta);
            moved = true;
        }
        self.end_input_frame();
        self.stats.ticks += 1;

        let due = self.render_due || moved || self.redraw == RedrawPolicy::Continuous;
        if due {
            render(&FrameView {
                view: camera.view_matrix(),
                fov_degrees: camera.zoom(),
                delta,
                frame: self.clock.frame_count,
            });
            self.render_due = false;
            self.stats.renders += 1;
        }
        due
    }

    /// Run until stopped: tick, wait up to the timeout, drain what arrived.
    pub fn run<S, C, R>(
        &mut self,
        source: &mut S,
        clock: &C,
        camera: &mut FlyCamera,
        mut render: R,
    ) -> StopReason
    where
        S: EventSource,
        C: Clock,
        R: FnMut(&FrameView),
    {
        while self.is_running() {
            self.tick(clock.now(), camera, &mut render);

            let Some(first) = source.wait_event(self.wait_timeout) else {
                continue;
            };
            let batch = std::iter::once(first).chain(std::iter::from_fn(|| source.poll_event()));
            self.ingest(batch, camera);
        }
        self.stop_reason.unwrap_or(StopReason::Quit)
    }
}
