use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::backend::{ClientConnector, ClientKind};
use crate::classifier::MetricCategory;
use crate::credentials::Credentials;
use crate::metrics::{self, BackendCallTimer};
use crate::models::BackendRequest;
use crate::Result;

/// Web-protection data is not modelled by the typed client.
pub const fn client_kind(category: MetricCategory) -> ClientKind {
    match category {
        MetricCategory::Security => ClientKind::Generic,
        MetricCategory::TopAnalysis | MetricCategory::OriginPull | MetricCategory::TimingAnalysis => {
            ClientKind::Typed
        }
    }
}

/// Issues exactly one backend call per request. No caching, batching or
/// retries; failures are returned as-is.
#[derive(Clone)]
pub struct Dispatcher {
    connector: Arc<dyn ClientConnector>,
}

impl Dispatcher {
    pub fn new(connector: Arc<dyn ClientConnector>) -> Self {
        Self { connector }
    }

    pub async fn dispatch(
        &self,
        category: MetricCategory,
        request: &BackendRequest,
        credentials: &Credentials,
    ) -> Result<Value> {
        let action = category.action();
        let kind = client_kind(category);

        info!(%category, action, ?kind, "Calling cloud API");
        if let Ok(params) = serde_json::to_string(request) {
            debug!(action, %params, "Request parameters");
        }

        let client = self.connector.connect(kind, credentials);
        let _timer = BackendCallTimer::new(action);

        client.invoke(action, request).await.map_err(|err| {
            metrics::record_backend_failure(action);
            error!(action, error = %err, "Cloud API call failed");
            err
        })
    }
}
