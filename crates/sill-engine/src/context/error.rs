use thiserror::Error;

/// Failure while acquiring a context or operating on a dead one.
///
/// Acquisition errors name the driver call that failed and carry the
/// driver's own error; they are recoverable, and the caller decides whether to
/// abort, fall back to another backend, or retry with a fresh object and a
/// corrected environment.
#[derive(Debug, Error)]
pub enum ContextError {
    #[error("failed to enumerate graphics devices: {0}")]
    DeviceEnumeration(#[source] glutin::error::Error),

    #[error("no graphics device at index {index} ({available} available)")]
    NoDevice { index: usize, available: usize },

    #[error("failed to open the platform display: {0}")]
    Display(#[source] glutin::error::Error),

    #[error("no display config matches the required surface capabilities")]
    NoConfig,

    #[error("failed to create the window surface: {0}")]
    SurfaceCreation(#[source] glutin::error::Error),

    #[error("failed to create the GL context: {0}")]
    ContextCreation(#[source] glutin::error::Error),

    #[error("failed to make the GL context current: {0}")]
    MakeCurrent(#[source] glutin::error::Error),

    #[error("failed to present the surface: {0}")]
    Present(#[source] glutin::error::Error),

    #[error("no GL context is current; a shared context needs a live, current primary")]
    NoCurrentContext,

    #[error("context was released")]
    Released,

    #[error("required GL entry point {name:?} is missing")]
    MissingSymbol { name: String },

    #[error("window handle unavailable: {0}")]
    WindowHandle(#[from] raw_window_handle::HandleError),
}
