use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::{EdgeMetricsError, Result};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_SITE_NAME: &str = "AcoFork 的 EdgeOne 监控大屏";
pub const DEFAULT_SITE_ICON: &str = "https://q2.qlogo.cn/headimg_dl?dst_uin=2726730791&spec=0";
pub const DEFAULT_ENDPOINT: &str = "teo.tencentcloudapi.com";
pub const DEFAULT_API_VERSION: &str = "2022-09-01";
pub const DEFAULT_SERVICE: &str = "teo";
pub const DEFAULT_KEY_FILE: &str = "key.txt";

/// Connection settings shared by the typed and the generic API clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientProfile {
    pub scheme: String,
    pub endpoint: String,
    pub service: String,
    pub api_version: String,
    pub region: String,
    pub timeout: Option<Duration>,
}

impl Default for ClientProfile {
    fn default() -> Self {
        Self {
            scheme: "https".to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            service: DEFAULT_SERVICE.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            region: String::new(),
            timeout: None,
        }
    }
}

impl ClientProfile {
    pub fn url(&self) -> String {
        format!("{}://{}/", self.scheme, self.endpoint)
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub site_name: String,
    pub site_icon: String,
    pub secret_id_var: String,
    pub secret_key_var: String,
    pub key_file: PathBuf,
    pub client: ClientProfile,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            site_name: DEFAULT_SITE_NAME.to_string(),
            site_icon: DEFAULT_SITE_ICON.to_string(),
            secret_id_var: "SECRET_ID".to_string(),
            secret_key_var: "SECRET_KEY".to_string(),
            key_file: PathBuf::from(DEFAULT_KEY_FILE),
            client: ClientProfile::default(),
        }
    }
}

impl AppConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup. Unset or empty
    /// values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let port = match get("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|e| EdgeMetricsError::Config(format!("invalid PORT {:?}: {}", raw, e)))?,
            None => defaults.port,
        };

        let timeout = match get("TEO_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|e| {
                    EdgeMetricsError::Config(format!("invalid TEO_TIMEOUT_SECS {:?}: {}", raw, e))
                })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        let client = ClientProfile {
            scheme: get("TEO_SCHEME").unwrap_or(defaults.client.scheme),
            endpoint: get("TEO_ENDPOINT").unwrap_or(defaults.client.endpoint),
            service: get("TEO_SERVICE").unwrap_or(defaults.client.service),
            api_version: get("TEO_API_VERSION").unwrap_or(defaults.client.api_version),
            // An empty region is meaningful (global endpoint), so no filtering here.
            region: lookup("TEO_REGION").unwrap_or_default(),
            timeout,
        };

        Ok(Self {
            port,
            site_name: get("SITE_NAME").unwrap_or(defaults.site_name),
            site_icon: get("SITE_ICON").unwrap_or(defaults.site_icon),
            secret_id_var: defaults.secret_id_var,
            secret_key_var: defaults.secret_key_var,
            key_file: get("KEY_FILE").map(PathBuf::from).unwrap_or(defaults.key_file),
            client,
        })
    }
}
