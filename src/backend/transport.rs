use chrono::Utc;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HOST};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::signer::{self, SigningInput};
use crate::config::ClientProfile;
use crate::credentials::Credentials;
use crate::{EdgeMetricsError, Result};

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "Response")]
    response: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ApiError {
    code: Option<String>,
    message: Option<String>,
}

/// Signs and posts API 3.0 calls for one endpoint and one set of credentials.
#[derive(Clone)]
pub struct Transport {
    http: reqwest::Client,
    profile: ClientProfile,
    credentials: Credentials,
}

impl Transport {
    pub fn new(http: reqwest::Client, profile: ClientProfile, credentials: Credentials) -> Self {
        Self {
            http,
            profile,
            credentials,
        }
    }

    /// Sends `action` and returns the inner `Response` object verbatim.
    pub async fn call<P: Serialize + ?Sized>(&self, action: &str, params: &P) -> Result<Value> {
        let payload = serde_json::to_string(params)?;
        let timestamp = Utc::now().timestamp();

        let authorization = signer::authorization(
            &self.credentials,
            &SigningInput {
                service: &self.profile.service,
                host: &self.profile.endpoint,
                action,
                payload: &payload,
                timestamp,
            },
        )?;

        debug!(action, url = %self.profile.url(), "Sending signed request");

        let mut request = self
            .http
            .post(self.profile.url())
            .header(HOST, &self.profile.endpoint)
            .header(CONTENT_TYPE, signer::CONTENT_TYPE)
            .header(AUTHORIZATION, authorization)
            .header("X-TC-Action", action)
            .header("X-TC-Version", &self.profile.api_version)
            .header("X-TC-Timestamp", timestamp.to_string())
            .body(payload);

        if !self.profile.region.is_empty() {
            request = request.header("X-TC-Region", &self.profile.region);
        }
        if let Some(timeout) = self.profile.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        let envelope: Envelope = match serde_json::from_slice(&body) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => {
                return Err(EdgeMetricsError::Transport(format!(
                    "{} returned HTTP {}",
                    action, status
                )));
            }
            Err(err) => return Err(err.into()),
        };

        if let Some(error) = envelope.response.get("Error") {
            let error: ApiError = serde_json::from_value(error.clone())?;
            return Err(EdgeMetricsError::Backend {
                message: error
                    .message
                    .unwrap_or_else(|| format!("{} failed", action)),
                code: error.code,
            });
        }

        Ok(envelope.response)
    }
}
