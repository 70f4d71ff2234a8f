use std::ffi::{c_void, CStr};
use std::num::NonZeroU32;
use std::rc::Rc;

use glutin::config::{Config, ConfigTemplateBuilder};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentGlContext, PossiblyCurrentContext,
    PossiblyCurrentGlContext, Version,
};
use glutin::display::{Display, DisplayApiPreference, GlDisplay};
use glutin::surface::{GlSurface, Surface, SurfaceAttributesBuilder, SwapInterval, WindowSurface};
use raw_window_handle::{HasDisplayHandle, HasWindowHandle, RawWindowHandle};
use winit::window::Window;

use super::{ContextError, ContextMode, GlSettings};

/// GL context bound to a native window surface.
///
/// Created standalone from a window, or split off a live standalone
/// context with [`share`](NativeContext::share) to obtain a resource
/// context whose buffers/textures/programs live in the same namespace.
pub struct NativeContext {
    state: State,
}

enum State {
    Valid(Box<Inner>),
    Released,
}

struct Inner {
    display: Display,
    config: Config,
    // Shared with any resource contexts split off this one, so releasing
    // the primary first cannot leave them with a dangling surface.
    surface: Rc<Surface<WindowSurface>>,
    context: PossiblyCurrentContext,
    window_handle: RawWindowHandle,
    settings: GlSettings,
    mode: ContextMode,
}

impl NativeContext {
    /// Acquires a display, config, surface and current context for `window`.
    ///
    /// Each step failure is logged with the failing driver call and
    /// surfaced as a [`ContextError`]; everything acquired up to that point
    /// is dropped, so an `Err` leaves no native resources behind.
    pub fn new(window: &Window, settings: GlSettings) -> Result<Self, ContextError> {
        let raw_display = window.display_handle()?.as_raw();
        let raw_window = window.window_handle()?.as_raw();

        let display = unsafe { Display::new(raw_display, display_preference()) }.map_err(|e| {
            log::error!("opening the platform display failed: {e}");
            ContextError::Display(e)
        })?;
        log::debug!("platform display opened");

        let template = ConfigTemplateBuilder::new().with_depth_size(8).build();
        let config = unsafe { display.find_configs(template) }
            .map_err(|e| {
                log::error!("config enumeration failed: {e}");
                ContextError::Display(e)
            })?
            .next()
            .ok_or_else(|| {
                log::error!("no GL config offers 8-bit RGB and depth on this display");
                ContextError::NoConfig
            })?;

        let size = window.inner_size();
        let surface_attributes = SurfaceAttributesBuilder::<WindowSurface>::new().build(
            raw_window,
            NonZeroU32::new(size.width).unwrap_or(NonZeroU32::MIN),
            NonZeroU32::new(size.height).unwrap_or(NonZeroU32::MIN),
        );
        let surface =
            unsafe { display.create_window_surface(&config, &surface_attributes) }.map_err(|e| {
                log::error!("window surface creation failed: {e}");
                ContextError::SurfaceCreation(e)
            })?;

        let (major, minor) = settings.version;
        let context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(major, minor))))
            .with_profile(GlProfile::Core)
            .with_debug(settings.debug)
            .build(Some(raw_window));
        let context = unsafe { display.create_context(&config, &context_attributes) }
            .map_err(|e| {
                log::error!("GL {major}.{minor} core context creation failed: {e}");
                ContextError::ContextCreation(e)
            })?
            .make_current(&surface)
            .map_err(|e| {
                log::error!("make-current failed: {e}");
                ContextError::MakeCurrent(e)
            })?;

        let interval = if settings.vsync {
            SwapInterval::Wait(NonZeroU32::MIN)
        } else {
            SwapInterval::DontWait
        };
        if let Err(e) = surface.set_swap_interval(&context, interval) {
            // Not a hard failure; presentation still works, just untimed.
            log::warn!("setting the swap interval failed: {e}");
        }

        log::debug!("native GL {major}.{minor} context is current");
        Ok(Self {
            state: State::Valid(Box::new(Inner {
                display,
                config,
                surface: Rc::new(surface),
                context,
                window_handle: raw_window,
                settings,
                mode: ContextMode::Standalone,
            })),
        })
    }

    /// Creates a resource context sharing this context's object namespace.
    ///
    /// The new context is made current against the same surface, so it
    /// replaces this one as the thread's current context. Fails with
    /// [`ContextError::NoCurrentContext`] when this context is released or
    /// not current.
    pub fn share(&self) -> Result<NativeContext, ContextError> {
        let State::Valid(inner) = &self.state else {
            return Err(ContextError::NoCurrentContext);
        };
        if !inner.context.is_current() {
            return Err(ContextError::NoCurrentContext);
        }

        let (major, minor) = inner.settings.version;
        let context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(major, minor))))
            .with_profile(GlProfile::Core)
            .with_debug(inner.settings.debug)
            .with_sharing(&inner.context)
            .build(Some(inner.window_handle));
        let context = unsafe { inner.display.create_context(&inner.config, &context_attributes) }
            .map_err(|e| {
                log::error!("shared context creation failed: {e}");
                ContextError::ContextCreation(e)
            })?
            .make_current(&*inner.surface)
            .map_err(|e| {
                log::error!("make-current on the shared context failed: {e}");
                ContextError::MakeCurrent(e)
            })?;

        log::debug!("shared GL context is current");
        Ok(NativeContext {
            state: State::Valid(Box::new(Inner {
                display: inner.display.clone(),
                config: inner.config.clone(),
                surface: Rc::clone(&inner.surface),
                context,
                window_handle: inner.window_handle,
                settings: inner.settings.clone(),
                mode: ContextMode::Shared,
            })),
        })
    }

    pub fn enter(&mut self) -> Result<(), ContextError> {
        match &self.state {
            State::Valid(inner) => inner
                .context
                .make_current(&*inner.surface)
                .map_err(ContextError::MakeCurrent),
            State::Released => Err(ContextError::Released),
        }
    }

    pub fn exit(&mut self) -> Result<(), ContextError> {
        match &self.state {
            State::Valid(inner) => inner
                .context
                .make_not_current_in_place()
                .map_err(ContextError::MakeCurrent),
            State::Released => Err(ContextError::Released),
        }
    }

    /// Destroys the driver context; further calls are no-ops. The display
    /// stays open for the rest of the process.
    pub fn release(&mut self) {
        if matches!(self.state, State::Valid(_)) {
            log::debug!("releasing native GL context");
        }
        self.state = State::Released;
    }

    pub fn is_valid(&self) -> bool {
        matches!(self.state, State::Valid(_))
    }

    pub fn load(&self, symbol: &CStr) -> *const c_void {
        match &self.state {
            State::Valid(inner) => inner.display.get_proc_address(symbol),
            State::Released => std::ptr::null(),
        }
    }

    pub fn swap_buffers(&self) -> Result<(), ContextError> {
        match &self.state {
            State::Valid(inner) => inner
                .surface
                .swap_buffers(&inner.context)
                .map_err(ContextError::Present),
            State::Released => Err(ContextError::Released),
        }
    }

    /// Resizes the surface after the window changed size.
    ///
    /// Required on EGL platforms (Wayland in particular); elsewhere the
    /// call is cheap and harmless.
    pub fn resize(&self, width: u32, height: u32) {
        if let State::Valid(inner) = &self.state {
            inner.surface.resize(
                &inner.context,
                NonZeroU32::new(width).unwrap_or(NonZeroU32::MIN),
                NonZeroU32::new(height).unwrap_or(NonZeroU32::MIN),
            );
        }
    }

    pub fn mode(&self) -> ContextMode {
        match &self.state {
            State::Valid(inner) => inner.mode,
            State::Released => ContextMode::Standalone,
        }
    }
}

fn display_preference() -> DisplayApiPreference {
    #[cfg(target_os = "windows")]
    return DisplayApiPreference::Wgl(None);
    #[cfg(target_os = "macos")]
    return DisplayApiPreference::Cgl;
    #[cfg(all(unix, not(target_os = "macos")))]
    DisplayApiPreference::Egl
}
