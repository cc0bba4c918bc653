use winit::event::WindowEvent;

use super::ctx::{FrameCtx, HostCtx};

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by higher layers.
pub trait App {
    /// Called once after the window exists, before the first frame.
    ///
    /// This is where frame registrations are usually made for the first time.
    fn on_start(&mut self, ctx: &mut HostCtx<'_>) -> AppControl {
        let _ = ctx;
        AppControl::Continue
    }

    /// Called for window events.
    fn on_window_event(&mut self, ctx: &mut HostCtx<'_>, event: &WindowEvent) -> AppControl {
        let _ = (ctx, event);
        AppControl::Continue
    }

    /// Called once per display refresh that serves at least one registration,
    /// and for OS-initiated redraws (with an empty `due` list).
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl;
}
