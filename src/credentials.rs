use async_trait::async_trait;
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::{EdgeMetricsError, Result};

/// Delimiter used by the key file template (`SecretId：AKID...`).
pub const KEY_FILE_DELIMITER: char = '：';

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub secret_id: String,
    pub secret_key: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("secret_id", &self.secret_id)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// What a single source was able to provide. Empty strings are never stored.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PartialCredentials {
    pub secret_id: Option<String>,
    pub secret_key: Option<String>,
}

impl PartialCredentials {
    pub fn new(secret_id: Option<String>, secret_key: Option<String>) -> Self {
        let non_empty = |v: Option<String>| v.filter(|s| !s.is_empty());
        Self {
            secret_id: non_empty(secret_id),
            secret_key: non_empty(secret_key),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.secret_id.is_some() && self.secret_key.is_some()
    }

    /// Fills only the fields that are still missing.
    pub fn merge(&mut self, other: PartialCredentials) {
        if self.secret_id.is_none() {
            self.secret_id = other.secret_id;
        }
        if self.secret_key.is_none() {
            self.secret_key = other.secret_key;
        }
    }

    pub fn into_credentials(self) -> Option<Credentials> {
        Some(Credentials {
            secret_id: self.secret_id?,
            secret_key: self.secret_key?,
        })
    }
}

#[async_trait]
pub trait CredentialSource: Send + Sync {
    fn name(&self) -> &str;

    /// Never fails; problems are logged and yield empty fields.
    async fn load(&self) -> PartialCredentials;
}

pub struct EnvCredentialSource {
    id_var: String,
    key_var: String,
}

impl EnvCredentialSource {
    pub fn new(id_var: impl Into<String>, key_var: impl Into<String>) -> Self {
        Self {
            id_var: id_var.into(),
            key_var: key_var.into(),
        }
    }
}

#[async_trait]
impl CredentialSource for EnvCredentialSource {
    fn name(&self) -> &str {
        "environment"
    }

    async fn load(&self) -> PartialCredentials {
        PartialCredentials::new(
            std::env::var(&self.id_var).ok(),
            std::env::var(&self.key_var).ok(),
        )
    }
}

pub struct KeyFileCredentialSource {
    path: PathBuf,
}

impl KeyFileCredentialSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn read(&self) -> Result<Option<String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(EdgeMetricsError::ConfigFileUnreadable {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

#[async_trait]
impl CredentialSource for KeyFileCredentialSource {
    fn name(&self) -> &str {
        "key file"
    }

    async fn load(&self) -> PartialCredentials {
        match self.read().await {
            Ok(Some(content)) => parse_key_file(&content),
            Ok(None) => {
                debug!(path = %self.path.display(), "No credential file present");
                PartialCredentials::default()
            }
            Err(err) => {
                warn!(error = %err, "Ignoring credential file");
                PartialCredentials::default()
            }
        }
    }
}

/// Scans `SecretId：...` / `SecretKey：...` lines. The first non-empty value
/// per field wins.
pub fn parse_key_file(content: &str) -> PartialCredentials {
    let mut found = PartialCredentials::default();

    for (index, line) in content.lines().enumerate() {
        let slot = if line.contains("SecretId") {
            &mut found.secret_id
        } else if line.contains("SecretKey") {
            &mut found.secret_key
        } else {
            continue;
        };

        if slot.is_some() {
            continue;
        }

        match line.split(KEY_FILE_DELIMITER).nth(1) {
            Some(value) if !value.trim().is_empty() => *slot = Some(value.trim().to_string()),
            Some(_) => {}
            None => warn!(line = index + 1, "Credential line has no full-width colon delimiter"),
        }
    }

    found
}

/// Ordered credential sources merged field by field; earlier sources win.
pub struct CredentialResolver {
    sources: Vec<Box<dyn CredentialSource>>,
}

impl CredentialResolver {
    pub fn new(sources: Vec<Box<dyn CredentialSource>>) -> Self {
        Self { sources }
    }

    /// Environment first, then the key file.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(vec![
            Box::new(EnvCredentialSource::new(
                config.secret_id_var.clone(),
                config.secret_key_var.clone(),
            )),
            Box::new(KeyFileCredentialSource::new(config.key_file.clone())),
        ])
    }

    pub async fn resolve(&self) -> Result<Credentials> {
        let mut merged = PartialCredentials::default();

        for source in &self.sources {
            if merged.is_complete() {
                break;
            }
            let partial = source.load().await;
            debug!(
                source = source.name(),
                secret_id = partial.secret_id.is_some(),
                secret_key = partial.secret_key.is_some(),
                "Loaded credential source"
            );
            merged.merge(partial);
        }

        merged
            .into_credentials()
            .ok_or(EdgeMetricsError::MissingCredentials)
    }
}
