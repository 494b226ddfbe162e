// crates/gcb-cli/src/logging.rs

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initializes a compact, uptime-timestamped tracing subscriber honoring
/// RUST_LOG (default "info" when unset). Returns a guard whose drop is a
/// no-op; it exists so callers can hold it for the lifetime of `main`.
pub fn init() -> impl Drop {
    if std::env::var_os("RUST_LOG").is_none() {
        std::env::set_var("RUST_LOG", "info");
    }

    let evt_fmt = fmt::format()
        .with_timer(fmt::time::Uptime::default())
        .compact();
    let fmt_layer = fmt::layer().event_format(evt_fmt);

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(EnvFilter::from_default_env())
        .init();

    Guard {}
}

struct Guard {}

impl Drop for Guard {
    fn drop(&mut self) {}
}
