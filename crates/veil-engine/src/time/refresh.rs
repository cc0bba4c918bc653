/// Refresh rate assumed when the monitor does not report one.
pub const FALLBACK_REFRESH_MILLIHERTZ: u32 = 60_000;

/// Display-refresh cadence for hosts without a vsync'd present.
///
/// Serving a frame is allowed once at least one refresh interval has passed
/// since the previous one. The first frame is always due.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RefreshPacer {
    interval_ms: f64,
    last_frame: Option<f64>,
}

impl RefreshPacer {
    pub fn new(interval_ms: f64) -> Self {
        let interval_ms = if interval_ms > 0.0 && interval_ms.is_finite() {
            interval_ms
        } else {
            1_000_000.0 / FALLBACK_REFRESH_MILLIHERTZ as f64
        };
        Self { interval_ms, last_frame: None }
    }

    /// Builds a pacer from a monitor refresh rate; `None` or 0 falls back to 60 Hz.
    pub fn from_millihertz(millihertz: Option<u32>) -> Self {
        let mhz = millihertz
            .filter(|m| *m > 0)
            .unwrap_or(FALLBACK_REFRESH_MILLIHERTZ);
        Self::new(1_000_000.0 / mhz as f64)
    }

    #[inline]
    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    /// Earliest host time (ms) at which the next frame may be served.
    #[inline]
    pub fn next_deadline(&self) -> f64 {
        match self.last_frame {
            Some(last) => last + self.interval_ms,
            None => f64::NEG_INFINITY,
        }
    }

    #[inline]
    pub fn is_due(&self, now: f64) -> bool {
        now >= self.next_deadline()
    }

    /// Records a served frame at `now`.
    #[inline]
    pub fn mark(&mut self, now: f64) {
        self.last_frame = Some(now);
    }
}

impl Default for RefreshPacer {
    fn default() -> Self {
        Self::from_millihertz(None)
    }
}
