use anyhow::Result;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use veil_engine::core::{App, AppControl, FrameCtx, HostCtx, WindowCtx};
use veil_engine::logging::{init_logging, LoggingConfig};
use veil_engine::window::{Runtime, RuntimeConfig};
use veil_ui::prelude::*;
use veil_ui::spoiler::TIME_PROPERTY;

/// Optional frame cap override for the demo spoiler.
const FPS_ENV: &str = "VEIL_FPS";

/// Drives one spoiler from the window's redraw cycle and mirrors its state
/// into the title bar.
struct Studio {
    options: SpoilerOptions,
    env: Environment,
    spoiler: Option<SpoilerController<MemoryElement>>,
}

impl Studio {
    fn new(options: SpoilerOptions, env: Environment) -> Self {
        Self { options, env, spoiler: None }
    }

    fn show_state(&self, window: &WindowCtx<'_>) {
        let Some(spoiler) = &self.spoiler else {
            return;
        };

        let t = spoiler.element().property(TIME_PROPERTY).unwrap_or("-");
        let state = if spoiler.is_revealed() { "revealed" } else { "hidden" };
        window.set_title(&format!(
            "veil studio  ·  {state}  ·  --t {t}  ·  {} fps",
            spoiler.effective_fps()
        ));
    }
}

impl App for Studio {
    fn on_start(&mut self, ctx: &mut HostCtx<'_>) -> AppControl {
        let element = MemoryElement::new(Display::Block).fragment(content_box(&ctx.window));

        self.spoiler = Some(SpoilerController::new(element, self.options, self.env, ctx.host));
        self.show_state(&ctx.window);
        AppControl::Continue
    }

    fn on_window_event(&mut self, ctx: &mut HostCtx<'_>, event: &WindowEvent) -> AppControl {
        if let WindowEvent::Resized(_) = event {
            if let Some(spoiler) = &mut self.spoiler {
                spoiler.element_mut().set_fragments(vec![content_box(&ctx.window)]);
                spoiler.update(self.options, ctx.host);
            }
            return AppControl::Continue;
        }

        let WindowEvent::KeyboardInput { event, .. } = event else {
            return AppControl::Continue;
        };
        if event.state != ElementState::Pressed || event.repeat {
            return AppControl::Continue;
        }

        match event.physical_key {
            PhysicalKey::Code(KeyCode::Escape) => return AppControl::Exit,
            PhysicalKey::Code(KeyCode::Space) => {
                if let Some(spoiler) = &mut self.spoiler {
                    if spoiler.is_revealed() {
                        spoiler.hide(ctx.host);
                    } else {
                        spoiler.reveal(ctx.host);
                    }
                }
            }
            _ => return AppControl::Continue,
        }

        self.show_state(&ctx.window);
        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl {
        let Some(spoiler) = &mut self.spoiler else {
            return AppControl::Continue;
        };

        let mut advanced = false;
        for handle in std::mem::take(&mut ctx.due) {
            advanced |= spoiler.on_host_frame(handle, ctx.now, ctx.host).is_advanced();
        }

        if advanced {
            self.show_state(&ctx.window);
        }
        AppControl::Continue
    }
}

/// The spoiled block: centered, 80% wide, a fifth of the window tall.
fn content_box(window: &WindowCtx<'_>) -> Rect {
    let (w, h) = window.logical_size();
    Rect::new(w * 0.1, h * 0.4, w * 0.8, h * 0.2)
}

fn options_from_env() -> SpoilerOptions {
    let options = SpoilerOptions::default();

    match std::env::var(FPS_ENV) {
        Ok(raw) => match raw.trim().parse::<f64>() {
            Ok(fps) => options.fps(fps),
            Err(e) => {
                log::warn!("ignoring {FPS_ENV}={raw:?}: {e}");
                options
            }
        },
        Err(_) => options,
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    println!();
    println!("  veil studio");
    println!("  space  toggle reveal / hide");
    println!("  esc    quit");
    println!();

    let options = options_from_env();
    let env = Environment::from_env();
    log::info!("starting with fps cap {}", env.effective_fps(options.resolved_fps()));

    Runtime::run(
        RuntimeConfig {
            title: "veil studio".to_string(),
            initial_size: LogicalSize::new(640.0, 360.0),
        },
        Studio::new(options, env),
    )
}
