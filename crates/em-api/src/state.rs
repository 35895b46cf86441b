use std::sync::Arc;

use sqlx::PgPool;
use tokio::sync::Mutex;

use crate::config::{ApiConfig, Environment};
use crate::content::{ContentClient, ContentProvider};

#[derive(Clone)]
pub struct ApiState {
    pub pool: PgPool,
    pub content: Arc<dyn ContentProvider>,
    pub environment: Environment,
    /// Serializes load→mutate→rebalance→persist passes. Mutations queue here
    /// instead of interleaving, so the last full set applied is the one that
    /// ends up persisted.
    pub plan_lock: Arc<Mutex<()>>,
}

impl ApiState {
    pub fn new(config: &ApiConfig, pool: PgPool) -> Self {
        let content = ContentClient::new(&config.content_api_url, &config.content_api_key);

        Self {
            pool,
            content: Arc::new(content),
            environment: config.env,
            plan_lock: Arc::new(Mutex::new(())),
        }
    }
}
