use winit::window::Window;

use crate::time::FrameHandle;
use crate::window::WindowFrameHost;

/// Per-window handles and immutable window metadata.
pub struct WindowCtx<'a> {
    pub window: &'a Window,
}

impl WindowCtx<'_> {
    /// Returns the logical window size as `(width, height)` in logical pixels.
    pub fn logical_size(&self) -> (f32, f32) {
        let phys  = self.window.inner_size();
        let scale = self.window.scale_factor();
        let logi: winit::dpi::LogicalSize<f64> = phys.to_logical(scale);
        (logi.width as f32, logi.height as f32)
    }

    pub fn set_title(&self, title: &str) {
        self.window.set_title(title);
    }
}

/// Context for callbacks outside a display refresh.
pub struct HostCtx<'a> {
    pub window: WindowCtx<'a>,
    pub host:   &'a mut WindowFrameHost,
}

/// Per-frame context passed to `core::App::on_frame`.
///
/// `due` lists the registrations served by this refresh. Each one must be routed
/// back to whoever requested it; registrations made while handling them are
/// served on the next refresh.
pub struct FrameCtx<'a> {
    pub window: WindowCtx<'a>,
    pub host:   &'a mut WindowFrameHost,
    /// Host timestamp of this refresh, in milliseconds.
    pub now:    f64,
    pub due:    Vec<FrameHandle>,
}
