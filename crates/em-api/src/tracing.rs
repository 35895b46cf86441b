//! Log subscriber setup: pretty output for development, JSON for production.

use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Environment;

const DEV_FILTER: &str = "debug,tower_http=debug,sqlx=warn,hyper=info";
const PROD_FILTER: &str = "info,tower_http=info,sqlx=warn";

/// Install the global subscriber. `RUST_LOG` overrides the per-environment
/// default filter.
pub fn init_tracing(env: &Environment) {
    if env.is_development() {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEV_FILTER));

        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .pretty()
                    .with_filter(filter),
            )
            .init();
    } else {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(PROD_FILTER));

        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(true)
                    .with_target(true)
                    .with_filter(filter),
            )
            .init();
    }

    tracing::info!("tracing initialized ({env:?})");
}
