use std::env;

use tracing_subscriber::{EnvFilter, fmt};

/// Installs the global subscriber. `RUST_LOG` wins, then `LOG_LEVEL`, then `info`.
/// `LOG_FORMAT=json` switches to line-delimited JSON. Logs go to stderr so report
/// output on stdout stays clean.
pub fn init() {
    let level = env::var("LOG_LEVEL")
        .ok()
        .map(|v| v.trim().to_ascii_lowercase())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "info".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&level));
    let json = env::var("LOG_FORMAT")
        .map(|v| v.trim().eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let builder = fmt().with_env_filter(filter).with_writer(std::io::stderr);
    let res = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if res.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
