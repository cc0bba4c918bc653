use super::host::{FrameHandle, FrameHost};
use super::publish::TimeSink;

/// What a single host frame did to the clock.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum FrameOutcome {
    /// The callback did not belong to the live registration and was ignored.
    Stale,
    /// Arrived before the minimum frame interval elapsed; `t` is unchanged.
    Skipped,
    /// `t` was advanced (possibly by zero) and published.
    Advanced(f64),
}

impl FrameOutcome {
    #[inline]
    pub fn is_advanced(self) -> bool {
        matches!(self, FrameOutcome::Advanced(_))
    }
}

/// Rate-limited logical clock fed by host frame callbacks.
///
/// `PacingClock` turns an irregular stream of display refreshes into a logical
/// time `t` (seconds) that advances at most `max_rate` times per second.
///
/// Invariants:
/// - a frame registration is held iff the clock is running and `max_rate > 0`
/// - at most one registration is outstanding at any time
/// - `t` never decreases and survives `stop`/`start` pairs
///
/// A `max_rate` of 0 suppresses animation: `start` publishes the current `t`
/// once and the clock never registers for further frames.
#[derive(Debug, Clone)]
pub struct PacingClock {
    max_rate: f64,
    t: f64,
    last_frame: f64,
    handle: Option<FrameHandle>,
}

impl PacingClock {
    /// Creates a stopped clock at `t = 0`.
    ///
    /// Negative or NaN rates clamp to 0.
    pub fn new(max_rate: f64) -> Self {
        Self {
            max_rate: sanitize_rate(max_rate),
            t: 0.0,
            last_frame: 0.0,
            handle: None,
        }
    }

    #[inline]
    pub fn max_rate(&self) -> f64 {
        self.max_rate
    }

    /// Current logical time in seconds.
    #[inline]
    pub fn t(&self) -> f64 {
        self.t
    }

    /// Host timestamp (ms) at which `t` last advanced.
    #[inline]
    pub fn last_frame_time(&self) -> f64 {
        self.last_frame
    }

    #[inline]
    pub fn handle(&self) -> Option<FrameHandle> {
        self.handle
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Shortest accepted gap between two advances, in milliseconds.
    #[inline]
    pub fn min_interval_ms(&self) -> f64 {
        if self.max_rate > 0.0 {
            1000.0 / self.max_rate
        } else {
            f64::INFINITY
        }
    }

    /// Changes the rate cap.
    ///
    /// Dropping the cap to 0 while running voids the pending registration, since a
    /// suppressed clock holds none.
    pub fn set_max_rate<H>(&mut self, max_rate: f64, host: &mut H)
    where
        H: FrameHost + ?Sized,
    {
        self.max_rate = sanitize_rate(max_rate);
        if self.max_rate == 0.0 {
            self.stop(host);
        }
    }

    /// Sets `t` and publishes it.
    pub fn set_t<S>(&mut self, t: f64, sink: &mut S)
    where
        S: TimeSink + ?Sized,
    {
        self.t = t;
        sink.publish(t);
    }

    /// Starts (or restarts) pacing with `now` as the baseline.
    ///
    /// The baseline frame is processed immediately with `dt = 0`, so the consumer
    /// always receives the current `t` on start. A registration left over from a
    /// previous run is cancelled first.
    pub fn start<H, S>(&mut self, now: f64, host: &mut H, sink: &mut S) -> FrameOutcome
    where
        H: FrameHost + ?Sized,
        S: TimeSink + ?Sized,
    {
        if let Some(previous) = self.handle.take() {
            log::debug!("pacing clock restarted; cancelling frame {}", previous.id());
            host.cancel_frame(previous);
        }

        self.last_frame = now;
        log::debug!("pacing clock started at {now:.3}ms (max_rate={})", self.max_rate);

        self.step(now, host, sink)
    }

    /// Handles one host frame callback.
    ///
    /// Callbacks whose handle is not the live registration (cancelled, already
    /// served, or owned by someone else) are ignored.
    pub fn on_host_frame<H, S>(
        &mut self,
        handle: FrameHandle,
        host_time: f64,
        host: &mut H,
        sink: &mut S,
    ) -> FrameOutcome
    where
        H: FrameHost + ?Sized,
        S: TimeSink + ?Sized,
    {
        if self.handle != Some(handle) {
            log::debug!("ignoring stale frame {}", handle.id());
            return FrameOutcome::Stale;
        }

        self.handle = None;
        self.step(host_time, host, sink)
    }

    /// Cancels the pending registration, if any. Idempotent.
    pub fn stop<H>(&mut self, host: &mut H)
    where
        H: FrameHost + ?Sized,
    {
        if let Some(handle) = self.handle.take() {
            host.cancel_frame(handle);
            log::debug!("pacing clock stopped at t={:.3}", self.t);
        }
    }

    fn step<H, S>(&mut self, host_time: f64, host: &mut H, sink: &mut S) -> FrameOutcome
    where
        H: FrameHost + ?Sized,
        S: TimeSink + ?Sized,
    {
        // Register before anything else so no early return can end the chain.
        if self.max_rate > 0.0 {
            self.handle = Some(host.request_frame());
        }

        if !host_time.is_finite() {
            return FrameOutcome::Skipped;
        }

        let dt = host_time - self.last_frame;

        // dt == 0 is the baseline frame and must not be skipped.
        if dt > 0.0 && dt < self.min_interval_ms() {
            log::trace!("frame skipped (dt={dt:.3}ms)");
            return FrameOutcome::Skipped;
        }

        // Host jitter can put a frame slightly before the baseline; treat it as
        // a zero-length frame rather than moving `t` backwards.
        let dt = if dt > 0.0 {
            self.last_frame = host_time;
            dt
        } else {
            0.0
        };

        self.set_t(self.t + dt / 1000.0, sink);
        FrameOutcome::Advanced(self.t)
    }
}

impl Default for PacingClock {
    fn default() -> Self {
        Self::new(0.0)
    }
}

#[inline]
fn sanitize_rate(rate: f64) -> f64 {
    if rate > 0.0 { rate } else { 0.0 }
}
