//! Structured logging.
//!
//! `RUST_LOG` wins over the configured filter. JSON output is used when
//! requested in config or when running in production mode.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ServiceConfig;

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(config: &ServiceConfig) -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.observability.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if use_json(config) {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer()).try_init()
    }
}

fn use_json(config: &ServiceConfig) -> bool {
    config.observability.json_logs || config.runtime.production
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_in_production() {
        let mut config = ServiceConfig::default();
        assert!(!use_json(&config));

        config.runtime.production = true;
        assert!(use_json(&config));

        config.runtime.production = false;
        config.observability.json_logs = true;
        assert!(use_json(&config));
    }
}
