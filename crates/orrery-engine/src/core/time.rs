/// Fixed-interval throttle driven by frame deltas.
/// Fires at most once per `interval_ms`, independent of frame rate.
#[derive(Debug, Clone)]
pub struct IntervalTimer {
    /// Interval between firings, in milliseconds.
    interval_ms: f64,
    /// Time accumulated since the last firing.
    elapsed_ms: f64,
}

impl IntervalTimer {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            elapsed_ms: 0.0,
        }
    }

    /// Add frame time. Returns true when the interval has elapsed.
    /// The overshoot carries into the next interval, but whole missed
    /// intervals are dropped: a long frame fires once.
    pub fn tick(&mut self, frame_dt_ms: f64) -> bool {
        if frame_dt_ms > 0.0 {
            self.elapsed_ms += frame_dt_ms;
        }
        if self.elapsed_ms >= self.interval_ms {
            self.elapsed_ms = if self.interval_ms > 0.0 {
                self.elapsed_ms % self.interval_ms
            } else {
                0.0
            };
            true
        } else {
            false
        }
    }

    /// Restart the interval from zero.
    pub fn reset(&mut self) {
        self.elapsed_ms = 0.0;
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }
}
