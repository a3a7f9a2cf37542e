//! telemetry
//!
//! Tracing subscriber setup for the binary.
//!
//! Call [`init_tracing`] once at program start. `RUST_LOG` overrides the
//! default level derived from the verbosity flags. Diagnostics are written
//! to stderr so they never mix with the changelog on stdout.
//!
//! Calling it more than once is harmless; only the first call takes effect.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialise the global tracing subscriber.
pub fn init_tracing(level: Level) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(level)));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init()
        .ok();
}

/// Crate diagnostics at `level`; dependencies (AWS SDK, hyper) at most warn.
fn default_directive(level: Level) -> String {
    let deps = if level < Level::WARN { "error" } else { "warn" };
    format!("{},gen_aws_changelog={}", deps, level.as_str().to_lowercase())
}
