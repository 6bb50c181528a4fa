pub mod traffic;

use axum::{routing::get, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{
    backend::{ClientConnector, TeoConnector},
    classifier::Classifier,
    config::AppConfig,
    credentials::CredentialResolver,
    dispatcher::Dispatcher,
    EdgeMetricsError, Result,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub classifier: Arc<Classifier>,
    pub resolver: Arc<CredentialResolver>,
    pub dispatcher: Dispatcher,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        resolver: CredentialResolver,
        connector: Arc<dyn ClientConnector>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            classifier: Arc::new(Classifier::default()),
            resolver: Arc::new(resolver),
            dispatcher: Dispatcher::new(connector),
        }
    }

    /// Wires the production sources and the EdgeOne connector.
    pub fn from_config(config: AppConfig) -> Result<Self> {
        let resolver = CredentialResolver::from_config(&config);
        let connector = Arc::new(TeoConnector::new(config.client.clone())?);
        Ok(Self::new(config, resolver, connector))
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/traffic", get(traffic::get_traffic))
        .route("/config", get(traffic::get_config))
        .route("/metrics", get(traffic::get_metrics))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

pub async fn serve(config: AppConfig) -> Result<()> {
    let addr = format!("0.0.0.0:{}", config.port);
    let app = router(AppState::from_config(config)?);

    info!("Starting edge metrics server on {}", addr);

    let listener = TcpListener::bind(&addr).await.map_err(|e|
        EdgeMetricsError::Internal(format!("Failed to bind to address: {}", e)))?;

    axum::serve(listener, app).await.map_err(|e|
        EdgeMetricsError::Internal(format!("Server error: {}", e)))?;

    Ok(())
}
