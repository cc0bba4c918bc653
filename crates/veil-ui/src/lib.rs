//! Veil UI: spoiler overlays on top of `veil-engine`.
//!
//! A [`SpoilerController`](spoiler::SpoilerController) binds to one element,
//! keeps it obscured until revealed, and while obscured publishes a paced
//! logical time (`--t`) that an external renderer animates the overlay with.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use veil_ui::prelude::*;
//!
//! let mut host = ManualFrameHost::new(0.0);
//! let element = MemoryElement::new(Display::Inline)
//!     .fragment(Rect::new(0.0, 0.0, 180.0, 20.0));
//!
//! let mut spoiler = SpoilerController::new(
//!     element,
//!     SpoilerOptions::default().fps(30.0),
//!     Environment::from_env(),
//!     &mut host,
//! );
//!
//! // Once per display refresh:
//! for handle in host.begin_frame(now) {
//!     spoiler.on_host_frame(handle, now, &mut host);
//! }
//!
//! // On click:
//! spoiler.reveal(&mut host);
//! ```

pub mod element;
pub mod environment;
pub mod geometry;
pub mod options;
pub mod spoiler;

pub use spoiler::SpoilerController;

/// Everything needed to bind spoilers; import this in host code.
pub mod prelude {
    pub use crate::element::{Display, Element, MemoryElement};
    pub use crate::environment::Environment;
    pub use crate::geometry::GeometryHint;
    pub use crate::options::{SpoilerOptions, DEFAULT_FPS};
    pub use crate::spoiler::{SpoilerController, Visibility};

    // Re-export the engine primitives every host needs.
    pub use veil_engine::coords::{Rect, Vec2};
    pub use veil_engine::time::{FrameHandle, FrameHost, FrameOutcome, ManualFrameHost};
}
