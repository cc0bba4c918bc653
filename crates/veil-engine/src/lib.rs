//! Veil engine crate.
//!
//! Host-facing primitives for paced animation: the frame source contract,
//! the pacing clock, geometry, logging, and a winit runtime that serves
//! frame registrations from the window's redraw cycle.

pub mod window;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
