use std::time::Instant;

const FPS_SAMPLE_COUNT: usize = 60;

/// Monotonic tick timer. Each `tick(now)` yields the seconds elapsed since the
/// previous tick; the first tick measures from construction.
pub struct FrameClock {
    pub max_delta: f32,
    last_tick: Instant,
    pub delta: f32,
    pub frame_count: u64,

    fps_samples: [f32; FPS_SAMPLE_COUNT],
    fps_sample_index: usize,
    pub smoothed_fps: f32,
    pub smoothed_frame_time_ms: f32,
}

impl FrameClock {
    pub fn new(start: Instant) -> Self {
        Self {
            max_delta: 0.25,
            last_tick: start,
            delta: 0.0,
            frame_count: 0,
            fps_samples: [1.0 / 60.0; FPS_SAMPLE_COUNT],
            fps_sample_index: 0,
            smoothed_fps: 60.0,
            smoothed_frame_time_ms: 16.667,
        }
    }

    pub fn last_tick(&self) -> Instant {
        self.last_tick
    }

    pub fn tick(&mut self, now: Instant) -> f32 {
        // saturating: a clock that hands back an earlier instant yields zero
        let elapsed = now.saturating_duration_since(self.last_tick);
        self.last_tick = now;
        let mut delta = elapsed.as_secs_f32();

        // A stalled window (drag, breakpoint) must not fling the camera away.
        if delta > self.max_delta {
            log::warn!(
                "Tick took {:.1}ms; capping delta to {}ms",
                delta * 1000.0,
                self.max_delta * 1000.0
            );
            delta = self.max_delta;
        }

        self.delta = delta;
        self.frame_count += 1;

        self.fps_samples[self.fps_sample_index] = delta;
        self.fps_sample_index = (self.fps_sample_index + 1) % FPS_SAMPLE_COUNT;
        let avg_dt: f32 = self.fps_samples.iter().sum::<f32>() / FPS_SAMPLE_COUNT as f32;
        self.smoothed_frame_time_ms = avg_dt * 1000.0;
        self.smoothed_fps = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };

        delta
    }

    /// Restart timing from `now` without producing a delta.
    pub fn reset(&mut self, now: Instant) {
        self.last_tick = now;
        self.delta = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn tick_measures_elapsed_seconds() {
        let start = Instant::now();
        let mut clock = FrameClock::new(start);
        let dt = clock.tick(start + Duration::from_millis(100));
        assert!((dt - 0.1).abs() < 1e-6);
        let dt = clock.tick(start + Duration::from_millis(120));
        assert!((dt - 0.02).abs() < 1e-6);
        assert_eq!(clock.frame_count, 2);
    }

    #[test]
    fn long_stall_is_capped() {
        let start = Instant::now();
        let mut clock = FrameClock::new(start);
        let dt = clock.tick(start + Duration::from_secs(5));
        assert_eq!(dt, 0.25);
        assert_eq!(clock.last_tick(), start + Duration::from_secs(5));
    }

    #[test]
    fn backwards_instant_gives_zero_delta() {
        let start = Instant::now() + Duration::from_secs(1);
        let mut clock = FrameClock::new(start);
        let dt = clock.tick(start - Duration::from_millis(500));
        assert_eq!(dt, 0.0);
    }

    #[test]
    fn smoothed_fps_converges_to_steady_rate() {
        let start = Instant::now();
        let mut clock = FrameClock::new(start);
        let step = Duration::from_millis(20);
        let mut now = start;
        for _ in 0..FPS_SAMPLE_COUNT {
            now += step;
            clock.tick(now);
        }
        assert!((clock.smoothed_fps - 50.0).abs() < 0.5);
    }

    #[test]
    fn reset_restarts_measurement() {
        let start = Instant::now();
        let mut clock = FrameClock::new(start);
        clock.reset(start + Duration::from_secs(10));
        let dt = clock.tick(start + Duration::from_millis(10_050));
        assert!((dt - 0.05).abs() < 1e-6);
    }
}
