use std::time::Instant;

const FPS_SAMPLE_COUNT: usize = 60;

/// Source of per-frame elapsed time in seconds. Implementations must never
/// report a negative value.
pub trait FrameClock {
    fn elapsed(&mut self) -> f64;
}

/// Wall clock: elapsed time since the previous call.
pub struct SystemClock {
    last_instant: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            last_instant: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock for SystemClock {
    fn elapsed(&mut self) -> f64 {
        let now = Instant::now();
        let dt = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;
        dt
    }
}

/// Constant step, for replays and tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    pub step: f64,
}

impl FixedClock {
    pub fn new(step: f64) -> Self {
        Self { step }
    }
}

impl FrameClock for FixedClock {
    fn elapsed(&mut self) -> f64 {
        self.step
    }
}

/// Per-session frame bookkeeping: caps long frames and tracks a smoothed rate.
pub struct TimeState {
    pub max_dt: f64,
    pub total_time: f64,
    pub tick_count: u64,
    pub last_dt: f64,

    fps_samples: [f64; FPS_SAMPLE_COUNT],
    fps_sample_index: usize,
    pub smoothed_fps: f64,
    pub smoothed_frame_time_ms: f64,
}

impl TimeState {
    pub fn new() -> Self {
        Self {
            max_dt: 0.25,
            total_time: 0.0,
            tick_count: 0,
            last_dt: 0.0,
            fps_samples: [1.0 / 60.0; FPS_SAMPLE_COUNT],
            fps_sample_index: 0,
            smoothed_fps: 60.0,
            smoothed_frame_time_ms: 16.667,
        }
    }

    /// Accounts for one tick and returns the dt the simulation should use.
    ///
    /// # Panics
    /// If `raw_dt` is negative or not finite; the clock contract forbids it.
    pub fn begin_tick(&mut self, raw_dt: f64) -> f32 {
        assert!(
            raw_dt.is_finite() && raw_dt >= 0.0,
            "frame clock reported an invalid elapsed time: {raw_dt}"
        );

        let mut dt = raw_dt;
        // A stalled frame (debugger, window drag) would otherwise move the body
        // far enough to skip whole cells.
        if dt > self.max_dt {
            log::warn!(
                "Frame took {:.1}ms, capping tick to {}ms",
                dt * 1000.0,
                self.max_dt * 1000.0
            );
            dt = self.max_dt;
        }

        self.last_dt = dt;
        self.total_time += dt;
        self.tick_count += 1;

        self.fps_samples[self.fps_sample_index] = dt;
        self.fps_sample_index = (self.fps_sample_index + 1) % FPS_SAMPLE_COUNT;
        let avg_dt: f64 = self.fps_samples.iter().sum::<f64>() / FPS_SAMPLE_COUNT as f64;
        self.smoothed_frame_time_ms = avg_dt * 1000.0;
        self.smoothed_fps = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };

        dt as f32
    }
}

impl Default for TimeState {
    fn default() -> Self {
        Self::new()
    }
}
