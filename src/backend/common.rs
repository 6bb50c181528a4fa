use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use super::transport::Transport;
use super::BackendClient;
use crate::config::ClientProfile;
use crate::credentials::Credentials;
use crate::models::BackendRequest;
use crate::Result;

/// Untyped client: any action name, any parameters. Used for operations the
/// typed client does not model.
pub struct CommonClient {
    transport: Transport,
}

impl CommonClient {
    /// Endpoint and version are explicit, as for the SDKs' common client; the
    /// rest of the profile (scheme, region, timeout) is shared.
    pub fn new(
        http: reqwest::Client,
        endpoint: &str,
        version: &str,
        profile: &ClientProfile,
        credentials: Credentials,
    ) -> Self {
        let profile = ClientProfile {
            endpoint: endpoint.to_string(),
            api_version: version.to_string(),
            ..profile.clone()
        };
        Self {
            transport: Transport::new(http, profile, credentials),
        }
    }

    pub async fn request<P: Serialize + ?Sized + Sync>(&self, action: &str, params: &P) -> Result<Value> {
        self.transport.call(action, params).await
    }
}

#[async_trait]
impl BackendClient for CommonClient {
    async fn invoke(&self, action: &str, request: &BackendRequest) -> Result<Value> {
        self.request(action, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::transport::test_server;
    use crate::models::TimingRequest;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[tokio::test]
    async fn test_web_protection_call() {
        let (profile, captured) = test_server::spawn(json!({
            "Response": { "Data": [{ "MetricName": "ccAcl_interceptNum" }], "RequestId": "r" }
        }))
        .await;
        let endpoint = profile.endpoint.clone();
        let client = CommonClient::new(
            reqwest::Client::new(),
            &endpoint,
            "2022-09-01",
            &profile,
            Credentials {
                secret_id: "id".to_string(),
                secret_key: "key".to_string(),
            },
        );

        let request = BackendRequest::Timing(TimingRequest {
            start_time: "2024-01-01T00:00:00Z".to_string(),
            end_time: "2024-01-02T00:00:00Z".to_string(),
            metric_names: vec!["ccAcl_interceptNum".to_string()],
            zone_ids: vec!["*".to_string()],
            interval: None,
        });
        let result = client.invoke("DescribeWebProtectionData", &request).await.unwrap();
        assert_eq!(result["RequestId"], json!("r"));

        let captured = captured.lock().unwrap();
        assert_eq!(captured[0].headers["x-tc-action"], "DescribeWebProtectionData");
        assert_eq!(captured[0].headers["x-tc-version"], "2022-09-01");
        assert_eq!(
            captured[0].body,
            json!({
                "StartTime": "2024-01-01T00:00:00Z",
                "EndTime": "2024-01-02T00:00:00Z",
                "MetricNames": ["ccAcl_interceptNum"],
                "ZoneIds": ["*"]
            })
        );
    }
}
