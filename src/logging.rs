use std::{any::Any, backtrace::Backtrace, panic::PanicHookInfo};

use tracing_subscriber::{EnvFilter, fmt};

/// Installs the fmt subscriber and routes panics through it. `RUST_LOG`
/// overrides `log_level`. A second call is a no-op, so the startup failure
/// path can install logging before the configured filter is known.
pub fn init_tracing(log_level: &str) {
    let installed = fmt()
        .with_env_filter(env_filter(log_level))
        .with_target(false)
        .try_init()
        .is_ok();
    if installed {
        std::panic::set_hook(Box::new(log_panic));
    }
}

fn env_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Text of a panic payload; `&str` and `String` payloads cover `panic!`.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic"
    }
}

fn log_panic(info: &PanicHookInfo<'_>) {
    let message = panic_message(info.payload());
    let backtrace = Backtrace::capture();
    match info.location() {
        Some(location) => tracing::error!(
            panic = %message,
            location = %location,
            backtrace = %backtrace,
            "panic"
        ),
        None => tracing::error!(panic = %message, backtrace = %backtrace, "panic"),
    }
}
