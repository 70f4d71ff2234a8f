use std::time::Instant;

use anyhow::{Context as _, Result};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::config::{BackendChoice, EngineSettings};
use crate::context::{GlContext, NativeContext};
use crate::event::{Event, EventTranslator};
use crate::render::Gfx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Control {
    Continue,
    Exit,
}

/// Handles the runtime lends to app callbacks for one invocation.
pub struct EngineCtx<'a> {
    pub window: &'a Window,
    pub context: &'a mut GlContext,
    pub gfx: &'a Gfx,
    /// Seconds since the previous frame (0 on the first).
    pub dt: f32,
}

impl EngineCtx<'_> {
    /// Current drawable size in physical pixels.
    pub fn physical_size(&self) -> (u32, u32) {
        let size = self.window.inner_size();
        (size.width, size.height)
    }
}

/// Application contract implemented by higher layers.
pub trait App {
    /// Called once, after the window, context and GL dispatch are live.
    fn init(&mut self, ctx: &mut EngineCtx<'_>) -> Result<()> {
        let _ = ctx;
        Ok(())
    }

    /// Called for each translated window/input event.
    fn event(&mut self, ctx: &mut EngineCtx<'_>, event: &Event) -> Control {
        let _ = (ctx, event);
        Control::Continue
    }

    /// Called once per presented frame.
    fn frame(&mut self, ctx: &mut EngineCtx<'_>) -> Control;
}

/// Entry point for the windowed runtime.
pub struct Runtime;

impl Runtime {
    /// Runs `app` against a window and native GL context built from
    /// `settings`. Returns when the app exits or the window closes.
    pub fn run<A>(settings: EngineSettings, app: A) -> Result<()>
    where
        A: App + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create winit event loop")?;
        let mut state = RuntimeState {
            settings,
            app,
            live: None,
            translator: EventTranslator::new(),
            last_frame: None,
        };

        event_loop
            .run_app(&mut state)
            .context("event loop terminated with error")?;
        Ok(())
    }
}

struct LiveWindow {
    gfx: Gfx,
    context: GlContext,
    // Dropped last: the surface inside `context` holds raw handles into it.
    window: Window,
}

struct RuntimeState<A> {
    settings: EngineSettings,
    app: A,
    live: Option<LiveWindow>,
    translator: EventTranslator,
    last_frame: Option<Instant>,
}

impl<A: App> RuntimeState<A> {
    fn ctx_and_app(&mut self, dt: f32) -> Option<(EngineCtx<'_>, &mut A)> {
        let live = self.live.as_mut()?;
        let ctx = EngineCtx {
            window: &live.window,
            context: &mut live.context,
            gfx: &live.gfx,
            dt,
        };
        Some((ctx, &mut self.app))
    }
}

impl<A: App> ApplicationHandler for RuntimeState<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.live.is_some() {
            return;
        }

        if self.settings.context.backend != BackendChoice::Native {
            log::error!(
                "the window runtime needs the native backend, settings request {:?}",
                self.settings.context.backend
            );
            event_loop.exit();
            return;
        }

        let win = &self.settings.window;
        let attributes = Window::default_attributes()
            .with_title(win.title.clone())
            .with_inner_size(LogicalSize::new(f64::from(win.width), f64::from(win.height)))
            .with_resizable(win.resizable);

        let window = match event_loop.create_window(attributes) {
            Ok(window) => window,
            Err(e) => {
                log::error!("failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let context = match NativeContext::new(&window, self.settings.gl()) {
            Ok(context) => GlContext::Native(context),
            Err(e) => {
                // Acquisition already logged the failing step.
                log::error!("context acquisition failed: {e}");
                event_loop.exit();
                return;
            }
        };

        let gfx = match Gfx::new(&context) {
            Ok(gfx) => gfx,
            Err(e) => {
                log::error!("GL dispatch setup failed: {e}");
                event_loop.exit();
                return;
            }
        };

        self.live = Some(LiveWindow { gfx, context, window });

        if let Some((mut ctx, app)) = self.ctx_and_app(0.0) {
            if let Err(e) = app.init(&mut ctx) {
                log::error!("app initialization failed: {e:#}");
                event_loop.exit();
                return;
            }
        }

        if let Some(live) = &self.live {
            live.window.request_redraw();
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);
        // Continuous redraw; invalidation-driven scheduling can come later.
        if let Some(live) = &self.live {
            live.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(live) = self.live.as_ref() else {
            return;
        };
        if window_id != live.window.id() {
            return;
        }

        if let WindowEvent::RedrawRequested = event {
            let now = Instant::now();
            let dt = self
                .last_frame
                .map(|prev| (now - prev).as_secs_f32())
                .unwrap_or(0.0);
            self.last_frame = Some(now);

            let Some((mut ctx, app)) = self.ctx_and_app(dt) else {
                return;
            };
            let control = app.frame(&mut ctx);

            if let Some(live) = &self.live {
                if let Err(e) = live.context.swap_buffers() {
                    log::error!("presenting the frame failed: {e}");
                    event_loop.exit();
                    return;
                }
                live.window.request_redraw();
            }

            if control == Control::Exit {
                event_loop.exit();
            }
            return;
        }

        if let WindowEvent::Resized(size) = &event {
            if let Some(live) = &self.live {
                live.context.resize(size.width, size.height);
                live.gfx.viewport(size.width, size.height);
            }
        }

        let Some(translated) = self.translator.translate(&event) else {
            return;
        };

        let Some((mut ctx, app)) = self.ctx_and_app(0.0) else {
            return;
        };
        let control = app.event(&mut ctx, &translated);

        if control == Control::Exit || translated == Event::CloseRequested {
            event_loop.exit();
        }
    }
}
