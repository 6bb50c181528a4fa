//! Clients for the EdgeOne metrics API.
//!
//! Both clients share one capability, [`BackendClient::invoke`]; the
//! dispatcher picks which one answers a category through a
//! [`ClientConnector`].

pub mod common;
pub mod signer;
pub mod transport;
pub mod typed;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::ClientProfile;
use crate::credentials::Credentials;
use crate::models::BackendRequest;
use crate::{EdgeMetricsError, Result};

pub use common::CommonClient;
pub use transport::Transport;
pub use typed::TeoClient;

#[async_trait]
pub trait BackendClient: Send + Sync {
    async fn invoke(&self, action: &str, request: &BackendRequest) -> Result<Value>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientKind {
    /// One method per modelled operation.
    Typed,
    /// Raw action name plus parameters.
    Generic,
}

/// Builds a client bound to one call's credentials.
pub trait ClientConnector: Send + Sync {
    fn connect(&self, kind: ClientKind, credentials: &Credentials) -> Box<dyn BackendClient>;
}

/// Production connector. The HTTP pool is shared across calls; the clients
/// themselves are per call because credentials are.
pub struct TeoConnector {
    http: reqwest::Client,
    profile: ClientProfile,
}

impl TeoConnector {
    pub fn new(profile: ClientProfile) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("edge-metrics/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| EdgeMetricsError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { http, profile })
    }
}

impl ClientConnector for TeoConnector {
    fn connect(&self, kind: ClientKind, credentials: &Credentials) -> Box<dyn BackendClient> {
        match kind {
            ClientKind::Typed => Box::new(TeoClient::new(Transport::new(
                self.http.clone(),
                self.profile.clone(),
                credentials.clone(),
            ))),
            ClientKind::Generic => Box::new(CommonClient::new(
                self.http.clone(),
                &self.profile.endpoint,
                &self.profile.api_version,
                &self.profile,
                credentials.clone(),
            )),
        }
    }
}
