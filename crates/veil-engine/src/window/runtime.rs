use anyhow::{Context, Result};
use std::time::{Duration, Instant};

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App as CoreApp, AppControl, FrameCtx, HostCtx, WindowCtx};
use crate::time::{FrameHandle, FrameHost, FrameQueue, RefreshPacer};

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "veil".to_string(),
            initial_size: LogicalSize::new(640.0, 360.0),
        }
    }
}

/// Frame source backed by the window's redraw cycle.
///
/// Without a vsync'd present nothing throttles `RedrawRequested`, so the host
/// paces itself: pending registrations are served at most once per monitor
/// refresh interval, and the loop sleeps until the next deadline in between.
/// With nothing registered the loop sleeps indefinitely.
#[derive(Debug)]
pub struct WindowFrameHost {
    origin: Instant,
    queue: FrameQueue,
    pacer: RefreshPacer,
}

impl WindowFrameHost {
    fn new() -> Self {
        Self {
            origin: Instant::now(),
            queue: FrameQueue::new(),
            pacer: RefreshPacer::default(),
        }
    }

    #[inline]
    pub fn has_pending(&self) -> bool {
        !self.queue.is_empty()
    }

    fn set_refresh_rate(&mut self, millihertz: Option<u32>) {
        self.pacer = RefreshPacer::from_millihertz(millihertz);
        log::debug!("frame host pacing at {:.3}ms per refresh", self.pacer.interval_ms());
    }

    /// Host time (ms) at which pending registrations may next be served, or
    /// `None` when nothing is registered.
    fn next_redraw(&self) -> Option<f64> {
        self.has_pending().then(|| self.pacer.next_deadline())
    }

    /// Serves every pending registration if a refresh is due at `now`.
    ///
    /// Redraws that arrive early (OS-initiated, resize) serve nothing.
    fn serve(&mut self, now: f64) -> Vec<FrameHandle> {
        if self.queue.is_empty() || !self.pacer.is_due(now) {
            return Vec::new();
        }
        self.pacer.mark(now);
        self.queue.take_due()
    }

    fn instant_at(&self, ms: f64) -> Instant {
        self.origin + Duration::from_secs_f64(ms.max(0.0) / 1000.0)
    }
}

impl FrameHost for WindowFrameHost {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }

    fn request_frame(&mut self) -> FrameHandle {
        self.queue.request()
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.queue.cancel(handle);
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    pub fn run<A>(initial: RuntimeConfig, app: A) -> Result<()>
    where
        A: 'static + CoreApp,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(initial, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        Ok(())
    }
}

struct AppState<A>
where
    A: CoreApp + 'static,
{
    initial: RuntimeConfig,
    app: A,

    window: Option<Window>,
    host: WindowFrameHost,
    exit_requested: bool,
}

impl<A> AppState<A>
where
    A: CoreApp + 'static,
{
    fn new(initial: RuntimeConfig, app: A) -> Self {
        Self {
            initial,
            app,
            window: None,
            host: WindowFrameHost::new(),
            exit_requested: false,
        }
    }

    fn request_exit(&mut self, event_loop: &ActiveEventLoop) {
        self.exit_requested = true;
        event_loop.exit();
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.initial.title.clone())
            .with_inner_size(self.initial.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        log::debug!("window {:?} created", window.id());
        self.host
            .set_refresh_rate(window.current_monitor().and_then(|m| m.refresh_rate_millihertz()));
        self.window = Some(window);
        Ok(())
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: CoreApp + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(e) = self.create_window(event_loop) {
            log::error!("failed to create initial window: {e:#}");
            self.request_exit(event_loop);
            return;
        }

        let Some(window) = self.window.as_ref() else {
            return;
        };

        let mut ctx = HostCtx {
            window: WindowCtx { window },
            host: &mut self.host,
        };

        if self.app.on_start(&mut ctx) == AppControl::Exit {
            self.request_exit(event_loop);
            return;
        }

        window.request_redraw();
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        // Redraws are demand-driven: only pending frame registrations keep the
        // loop ticking, and never faster than the refresh interval.
        let Some(deadline) = self.host.next_redraw() else {
            event_loop.set_control_flow(ControlFlow::Wait);
            return;
        };

        if self.host.now() >= deadline {
            event_loop.set_control_flow(ControlFlow::Wait);
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        } else {
            event_loop.set_control_flow(ControlFlow::WaitUntil(self.host.instant_at(deadline)));
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.as_ref() else {
            return;
        };
        if window.id() != window_id {
            return;
        }

        let control = match &event {
            WindowEvent::RedrawRequested => {
                let now = self.host.now();
                let due = self.host.serve(now);
                let mut ctx = FrameCtx {
                    window: WindowCtx { window },
                    host: &mut self.host,
                    now,
                    due,
                };
                self.app.on_frame(&mut ctx)
            }
            _ => {
                let mut ctx = HostCtx {
                    window: WindowCtx { window },
                    host: &mut self.host,
                };
                self.app.on_window_event(&mut ctx, &event)
            }
        };

        if control == AppControl::Exit {
            self.request_exit(event_loop);
            return;
        }

        match &event {
            WindowEvent::CloseRequested => {
                self.window = None;
                self.request_exit(event_loop);
            }

            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                window.request_redraw();
            }

            _ => {}
        }
    }
}
