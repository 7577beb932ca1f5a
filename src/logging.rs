// Logging is tracing-subscriber's fmt layer on stderr, so stdout stays clean for `-o -`.

use tracing::debug;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Base level for a count of `-v` flags.
pub fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Builds the filter: `RUST_LOG` wins, otherwise `level` for this crate and
/// `warn` for the HTTP stack underneath.
fn build_env_filter(level: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    let directives = format!("{level},ureq=warn,ureq_proto=warn,rustls=warn");
    EnvFilter::try_new(&directives).unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Installs the global subscriber. Calling it twice is harmless.
pub fn init(verbosity: u8) {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    if let Err(e) = tracing_subscriber::registry()
        .with(build_env_filter(level_for(verbosity)))
        .with(fmt_layer)
        .try_init()
    {
        debug!("Logging already initialised: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_raises_the_level() {
        assert_eq!(level_for(0), "warn");
        assert_eq!(level_for(1), "info");
        assert_eq!(level_for(5), "debug");
    }

    #[test]
    fn init_twice_does_not_panic() {
        init(0);
        init(2);
        assert!(tracing::dispatcher::has_been_set());
    }
}
