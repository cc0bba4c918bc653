//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and Window and acts as the display-refresh
//! frame source for everything running inside it.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig, WindowFrameHost};
