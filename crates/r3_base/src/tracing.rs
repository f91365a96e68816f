use crate::R3Result;
use tracing_error::ErrorLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Environment variable holding the tracing filter directives, e.g. `R3_LOG=r3_engine=debug`.
pub const LOG_ENV_VAR: &str = "R3_LOG";

/* 📖 # Why log to stderr with a `warn` default?

Standard output carries the rename report, which users pipe and grep. Diagnostics go to
standard error and stay quiet unless something needs attention or `R3_LOG` asks for more.
*/

pub fn init_tracing() -> R3Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(ErrorLayer::default())
        .try_init()
        .map_err(|e| crate::err!("failed to initialize tracing: {}", e))
}
