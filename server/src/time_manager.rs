use std::time::{Duration, Instant};

/// Tracks wall-clock time between ticks and the interval the scene actually
/// achieves, which may drift from the configured one under load.
pub struct TimeManager {
    tick_interval: Duration,
    buffer_delay_ticks: u32,
    smoothing: f32,
    last_tick: Instant,
    actual_interval_millis: f32,
    last_tick_duration: Duration,
    measuring: bool,
}

impl TimeManager {
    pub fn new(
        tick_interval: Duration,
        buffer_delay_ticks: u32,
        smoothing: f32,
        now: Instant,
    ) -> Self {
        Self {
            tick_interval,
            buffer_delay_ticks,
            smoothing: smoothing.clamp(0.0, 1.0),
            last_tick: now,
            actual_interval_millis: tick_interval.as_secs_f32() * 1000.0,
            last_tick_duration: Duration::ZERO,
            measuring: false,
        }
    }

    /// Restarts timing from `now` without crediting the time since the last tick
    pub fn reset(&mut self, now: Instant) {
        self.last_tick = now;
        self.measuring = false;
    }

    /// Marks a tick at `now`, returning the milliseconds elapsed since the previous one
    pub fn advance(&mut self, now: Instant) -> i64 {
        let elapsed = now.saturating_duration_since(self.last_tick);
        let elapsed_millis = i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX);

        // carry sub-millisecond remainders into the next tick
        self.last_tick += Duration::from_millis(elapsed_millis.max(0) as u64);

        if self.measuring {
            let sample = elapsed_millis as f32;
            self.actual_interval_millis += (sample - self.actual_interval_millis) * self.smoothing;
        }
        self.measuring = true;

        elapsed_millis
    }

    pub fn record_tick_duration(&mut self, duration: Duration) {
        self.last_tick_duration = duration;
    }

    /// Milliseconds since the last tick, used to estimate the scene clock between ticks
    pub fn millis_since_last_tick(&self, now: Instant) -> i64 {
        i64::try_from(now.saturating_duration_since(self.last_tick).as_millis()).unwrap_or(i64::MAX)
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// The smoothed interval measured between recent ticks, in milliseconds
    pub fn actual_interval(&self) -> i64 {
        (self.actual_interval_millis.round() as i64).max(1)
    }

    pub fn ticks_per_second(&self) -> u32 {
        (1000 / self.actual_interval()).max(1) as u32
    }

    /// How far behind the scene clock clients should display state, in milliseconds
    pub fn buffer_delay(&self) -> i64 {
        self.actual_interval() * i64::from(self.buffer_delay_ticks)
    }

    pub fn last_tick_duration(&self) -> Duration {
        self.last_tick_duration
    }
}
