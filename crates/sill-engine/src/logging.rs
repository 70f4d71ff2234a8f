//! Logger bootstrap.
//!
//! Centralizes `env_logger` initialization behind the standard `log`
//! facade; nothing else in the engine knows which backend is installed.

use std::sync::Once;

static INIT: Once = Once::new();

/// Initializes the global logger once; later calls are ignored.
///
/// Filter precedence: the explicit `filter` argument (usually from the
/// settings file), then `RUST_LOG`, then `info`. The filter string follows
/// the `env_logger` syntax, e.g. `"sill_engine=debug,winit=warn"`.
pub fn init(filter: Option<&str>) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Some(filter) = filter {
            builder.parse_filters(filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.filter_level(log::LevelFilter::Info);
        }

        builder.init();
        log::debug!("logging initialized");
    });
}
