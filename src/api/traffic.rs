use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde_json::Value;
use tracing::{info, warn};

use super::AppState;
use crate::{
    metrics,
    models::{MetricQuery, SiteConfig, TrafficParams},
    request, EdgeMetricsError, Result,
};

/// `GET /traffic`: resolve credentials, classify, build, dispatch once.
pub async fn get_traffic(
    State(state): State<AppState>,
    params: std::result::Result<Query<TrafficParams>, QueryRejection>,
) -> Result<Json<Value>> {
    metrics::record_traffic_request();

    let credentials = state.resolver.resolve().await.map_err(|err| {
        metrics::record_missing_credentials();
        warn!("No credentials in environment or key file");
        err
    })?;

    // A malformed query string is a failed call like any other, not a 400.
    let Query(params) = params.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "Rejected traffic query");
        EdgeMetricsError::InvalidQuery(rejection.body_text())
    })?;

    let query = MetricQuery::from_params(params, Utc::now());
    info!(
        metric = %query.metric,
        start_time = %query.start_time,
        end_time = %query.end_time,
        interval = ?query.interval,
        "Requesting metric"
    );

    let category = state.classifier.classify(&query.metric);
    let backend_request = request::build(category, &query);
    let data = state
        .dispatcher
        .dispatch(category, &backend_request, &credentials)
        .await?;

    Ok(Json(data))
}

pub async fn get_config(State(state): State<AppState>) -> Json<SiteConfig> {
    Json(SiteConfig {
        site_name: state.config.site_name.clone(),
        site_icon: state.config.site_icon.clone(),
    })
}

pub async fn get_metrics() -> Result<impl IntoResponse> {
    let body = metrics::render()?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    ))
}
