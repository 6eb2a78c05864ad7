use tracing::warn;
use tracing_subscriber::{fmt, prelude::*, reload, EnvFilter, Registry};

/// Handle to the installed subscriber's filter.
///
/// Logging starts before the configuration is read so that config load
/// failures are visible; the `debug` flag is applied afterwards.
pub struct LogLevel {
    handle: Option<reload::Handle<EnvFilter, Registry>>,
    from_env: bool,
}

fn default_directive(debug: bool) -> &'static str {
    if debug {
        "debug"
    } else {
        "info"
    }
}

/// Install the global fmt subscriber at `info`. `RUST_LOG` wins when set.
///
/// Safe to call more than once; later calls return an inert handle.
pub fn init() -> LogLevel {
    let from_env = std::env::var_os(EnvFilter::DEFAULT_ENV).is_some();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(false)));
    let (filter, handle) = reload::Layer::new(filter);

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init()
        .is_ok();

    LogLevel {
        handle: installed.then_some(handle),
        from_env,
    }
}

impl LogLevel {
    /// Raise the default level to `debug` when the config asks for it.
    /// Does nothing when `RUST_LOG` chose the filter.
    pub fn apply_debug(&self, debug: bool) {
        if self.from_env || !debug {
            return;
        }
        if let Some(handle) = &self.handle {
            if let Err(err) = handle.reload(EnvFilter::new(default_directive(true))) {
                warn!(error = %err, "Failed to raise log level");
            }
        }
    }

    pub fn is_installed(&self) -> bool {
        self.handle.is_some()
    }
}
