use std::time::{Duration, Instant};

/// Longest frame delta handed to the camera by default.
pub const DEFAULT_MAX_DELTA: Duration = Duration::from_millis(100);

/// Measures wall-clock time between frames.
///
/// Built on [`Instant`], so deltas are never negative. Deltas are capped at
/// `max_delta`: a frame that stalls (window drag, breakpoint) moves the
/// camera as if it took `max_delta`.
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    last: Instant,
    max_delta: Duration,
    frames: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(start: Instant) -> Self {
        Self {
            last: start,
            max_delta: DEFAULT_MAX_DELTA,
            frames: 0,
        }
    }

    pub fn with_max_delta(mut self, max_delta: Duration) -> Self {
        self.max_delta = max_delta;
        self
    }

    /// Seconds since the previous tick (or since construction, for the first).
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    /// [`tick`](Self::tick) against an explicit timestamp. A timestamp earlier
    /// than the previous one yields zero.
    pub fn tick_at(&mut self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.last);
        if elapsed > self.max_delta {
            tracing::debug!(
                elapsed_ms = elapsed.as_secs_f64() * 1000.0,
                "frame delta capped"
            );
        }
        self.last = self.last.max(now);
        self.frames += 1;
        elapsed.min(self.max_delta).as_secs_f32()
    }

    /// Number of ticks so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn max_delta(&self) -> Duration {
        self.max_delta
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
