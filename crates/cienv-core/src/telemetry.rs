//! Tracing initialisation for hosts embedding cienv.
//!
//! Filter precedence: `CIENV_LOG` (any `EnvFilter` directive, e.g.
//! `cienv_core=debug`), then `RUST_LOG`, then the supplied default level.
//! Only the first initialisation in a process takes effect.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

pub const ENV_LOG: &str = "CIENV_LOG";
pub const ENV_LOG_FORMAT: &str = "CIENV_LOG_FORMAT";

/// Initialise the global subscriber with `level` as the default verbosity.
///
/// Set `json` for newline-delimited JSON output.
pub fn init_tracing(json: bool, level: Level) {
    let directive = std::env::var(ENV_LOG).ok();
    install(json, log_filter(directive.as_deref(), level));
}

/// Like [`init_tracing`], with the format taken from `CIENV_LOG_FORMAT`
/// (`json` or `text`) and an `INFO` default.
pub fn init_tracing_from_env() {
    let json = std::env::var(ENV_LOG_FORMAT)
        .map(|v| v.trim().eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    init_tracing(json, Level::INFO);
}

/// Build the filter from an optional `CIENV_LOG` directive.
///
/// An unparsable directive is ignored rather than failing the build.
fn log_filter(directive: Option<&str>, default: Level) -> EnvFilter {
    directive
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(default.as_str()))
}

fn install(json: bool, filter: EnvFilter) {
    let layer = fmt::layer().with_target(false);
    let registry = tracing_subscriber::registry().with(filter);
    let installed = if json {
        registry.with(layer.json()).try_init()
    } else {
        registry.with(layer).try_init()
    };
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
