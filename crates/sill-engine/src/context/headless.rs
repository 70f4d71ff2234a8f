use std::ffi::{c_void, CStr};

use glutin::api::egl::context::PossiblyCurrentContext;
use glutin::api::egl::device::Device;
use glutin::api::egl::display::Display as EglDisplay;
use glutin::config::{ConfigSurfaceTypes, ConfigTemplateBuilder};
use glutin::context::{ContextApi, ContextAttributesBuilder, GlProfile, Version};
use glutin::display::GlDisplay;
use glutin::prelude::PossiblyCurrentGlContext;

use super::{ContextError, GlSettings};

/// Off-screen GL context on an EGL device, independent of any window
/// system.
///
/// The context is made current against no surface at all (surfaceless);
/// rendering targets must be framebuffer objects. Used for compute-style
/// workloads and driver smoke tests on displayless hosts.
pub struct HeadlessContext {
    state: State,
}

enum State {
    Valid(Box<Inner>),
    Released,
}

struct Inner {
    display: EglDisplay,
    context: PossiblyCurrentContext,
}

impl HeadlessContext {
    /// Enumerates EGL devices, opens a display on the selected one and
    /// makes a fresh core-profile context current surfacelessly.
    ///
    /// Device selection is by index into the enumeration order; an index
    /// past the end fails with [`ContextError::NoDevice`]. Step failures
    /// are logged with the failing driver call, and an `Err` leaves no
    /// native resources behind.
    pub fn new(settings: GlSettings) -> Result<Self, ContextError> {
        let devices: Vec<Device> = Device::query_devices()
            .map_err(|e| {
                log::error!("EGL device enumeration failed: {e}");
                ContextError::DeviceEnumeration(e)
            })?
            .collect();
        log::debug!("{} EGL device(s) reported", devices.len());

        let device = devices.get(settings.device_index).ok_or(ContextError::NoDevice {
            index: settings.device_index,
            available: devices.len(),
        })?;
        if let Some(name) = device.name() {
            log::debug!("using EGL device {name:?}");
        }

        let display = unsafe { EglDisplay::with_device(device, None) }.map_err(|e| {
            log::error!("opening a display on the EGL device failed: {e}");
            ContextError::Display(e)
        })?;

        // Off-screen buffer support plus the usual 8-bit RGB + depth floor.
        let template = ConfigTemplateBuilder::new()
            .with_surface_type(ConfigSurfaceTypes::PBUFFER)
            .with_depth_size(8)
            .build();
        let config = unsafe { display.find_configs(template) }
            .map_err(|e| {
                log::error!("config enumeration failed: {e}");
                ContextError::Display(e)
            })?
            .next()
            .ok_or_else(|| {
                log::error!("no off-screen-capable GL config on this device");
                ContextError::NoConfig
            })?;

        let (major, minor) = settings.version;
        let context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(major, minor))))
            .with_profile(GlProfile::Core)
            .with_debug(settings.debug)
            .build(None);
        let context = unsafe { display.create_context(&config, &context_attributes) }
            .map_err(|e| {
                log::error!("GL {major}.{minor} core context creation failed: {e}");
                ContextError::ContextCreation(e)
            })?
            .make_current_surfaceless()
            .map_err(|e| {
                log::error!("surfaceless make-current failed: {e}");
                ContextError::MakeCurrent(e)
            })?;

        log::debug!("headless GL {major}.{minor} context is current");
        Ok(Self { state: State::Valid(Box::new(Inner { display, context })) })
    }

    pub fn enter(&mut self) -> Result<(), ContextError> {
        match &self.state {
            State::Valid(inner) => inner
                .context
                .make_current_surfaceless()
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

    /// Destroys the driver context; further calls are no-ops. The device
    /// display is left initialized for the rest of the process.
    pub fn release(&mut self) {
        if matches!(self.state, State::Valid(_)) {
            log::debug!("releasing headless GL context");
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
}
