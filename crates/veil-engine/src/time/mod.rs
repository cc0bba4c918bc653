//! Time subsystem.
//!
//! Turns host frame callbacks into a paced logical clock without coupling to
//! any particular runtime.
//! Intended usage:
//! - one `PacingClock` per animated element
//! - the host (windowed runtime, or `ManualFrameHost` in tests) serves
//!   single-shot frame registrations; each served handle is routed back to
//!   `PacingClock::on_host_frame`

mod host;
mod pacing_clock;
mod publish;
mod refresh;

pub use host::{FrameHandle, FrameHost, FrameQueue, ManualFrameHost};
pub use pacing_clock::{FrameOutcome, PacingClock};
pub use publish::{SharedTime, TimeSink};
pub use refresh::{RefreshPacer, FALLBACK_REFRESH_MILLIHERTZ};
