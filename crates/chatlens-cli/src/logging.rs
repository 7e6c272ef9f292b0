use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;

const FALLBACK_FILTER: &str = "warn";

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
///
/// Records go to stderr; stdout carries command output only.
pub fn init_tracing(log: &LogConfig) {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(f) => f,
        Err(_) => match log.level.parse::<EnvFilter>() {
            Ok(f) => f,
            Err(e) => {
                eprintln!(
                    "WARN: log level '{}' is not a valid tracing filter ({}); \
                     falling back to '{}'",
                    log.level, e, FALLBACK_FILTER
                );
                EnvFilter::new(FALLBACK_FILTER)
            }
        },
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    // A second init (tests) keeps the first subscriber.
    let installed = if log.json {
        subscriber.json().try_init()
    } else {
        subscriber.try_init()
    };
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
