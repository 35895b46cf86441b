use em_api::{config::ApiConfig, state::ApiState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment variables
    dotenvy::dotenv().ok();
    let config = ApiConfig::from_env()?;

    em_api::tracing::init_tracing(&config.env);

    // Database pool and migrations
    let pool = em_db::create_pool(&config.database_url, 10).await?;
    em_db::ensure_db_and_migrate(&config.database_url, &pool).await?;

    let metrics_handle = em_api::metrics::init_metrics()?;
    let state = ApiState::new(&config, pool);

    // Daily rebalance job; handles live as long as the process does
    let _jobs = em_api::jobs::start_background_jobs(state.clone());

    let app = em_api::router::router()
        .route(
            "/metrics",
            axum::routing::get(move || std::future::ready(metrics_handle.render())),
        )
        .layer(axum::middleware::from_fn(em_api::metrics::track_metrics))
        .layer(axum::middleware::from_fn(
            em_api::middleware::request_id::request_id_middleware,
        ))
        .layer(em_api::middleware::cors::create_cors_layer(&config))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("server running on http://{}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
