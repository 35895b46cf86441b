//! Prometheus metrics for API and scheduler health.

use axum::{
    extract::Request,
    middleware::Next,
    response::Response,
};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Instant;

use em_planner::ExamSession;

/// Initialize the Prometheus exporter and return the render handle.
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let builder = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0],
        )?
        .set_buckets_for_metric(
            Matcher::Full("plan_rebalance_duration_seconds".to_string()),
            &[0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0],
        )?;

    let handle = builder.install_recorder()?;

    Ok(handle)
}

/// Middleware recording request count and duration per normalized route.
pub async fn track_metrics(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let path = normalize_path(req.uri().path());

    let response = next.run(req).await;

    let status = response.status().as_u16().to_string();
    counter!(
        "http_requests_total",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status.clone()
    )
    .increment(1);
    histogram!(
        "http_request_duration_seconds",
        "method" => method,
        "path" => path,
        "status" => status
    )
    .record(start.elapsed().as_secs_f64());

    response
}

/// Record one scheduler pass: how long it took and how much of the plan it
/// could not place.
pub fn record_rebalance(duration_secs: f64, sessions: &[ExamSession]) {
    counter!("plan_rebalance_total").increment(1);
    histogram!("plan_rebalance_duration_seconds").record(duration_secs);

    let unplaced = sessions
        .iter()
        .filter(|s| !s.is_passed)
        .flat_map(|s| &s.material.study_plan)
        .filter(|m| m.assigned_date.is_none())
        .count();
    gauge!("plan_unplaced_modules").set(unplaced as f64);
}

/// Record a call to the content provider.
pub fn record_content_event(endpoint: &str, success: bool) {
    let status = if success { "success" } else { "failure" };

    counter!(
        "content_requests_total",
        "endpoint" => endpoint.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Collapse id-bearing path segments so route labels stay low-cardinality.
fn normalize_path(path: &str) -> String {
    let uuid_pattern = regex::Regex::new(
        r"[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}",
    )
    .unwrap();
    let module_pattern = regex::Regex::new(r"/modules/[^/]+").unwrap();
    let index_pattern = regex::Regex::new(r"/tasks/\d+").unwrap();

    let normalized = uuid_pattern.replace_all(path, ":id");
    let normalized = module_pattern.replace_all(&normalized, "/modules/:uid");
    index_pattern.replace_all(&normalized, "/tasks/:index").to_string()
}
