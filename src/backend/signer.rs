//! TC3-HMAC-SHA256 request signing for Tencent Cloud API 3.0.

use chrono::DateTime;
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use crate::credentials::Credentials;
use crate::{EdgeMetricsError, Result};

pub const ALGORITHM: &str = "TC3-HMAC-SHA256";
pub const CONTENT_TYPE: &str = "application/json; charset=utf-8";
const SIGNED_HEADERS: &str = "content-type;host;x-tc-action";

type HmacSha256 = Hmac<Sha256>;

/// Everything that goes into one signature.
#[derive(Debug, Clone, Copy)]
pub struct SigningInput<'a> {
    pub service: &'a str,
    pub host: &'a str,
    pub action: &'a str,
    pub payload: &'a str,
    pub timestamp: i64,
}

fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| EdgeMetricsError::Internal(format!("HMAC key rejected: {}", e)))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

pub fn canonical_request(input: &SigningInput<'_>) -> String {
    format!(
        "POST\n/\n\ncontent-type:{}\nhost:{}\nx-tc-action:{}\n\n{}\n{}",
        CONTENT_TYPE,
        input.host,
        input.action.to_lowercase(),
        SIGNED_HEADERS,
        sha256_hex(input.payload.as_bytes())
    )
}

pub fn credential_scope(input: &SigningInput<'_>) -> Result<String> {
    let date = DateTime::from_timestamp(input.timestamp, 0)
        .ok_or_else(|| EdgeMetricsError::Internal(format!("invalid timestamp {}", input.timestamp)))?
        .format("%Y-%m-%d")
        .to_string();
    Ok(format!("{}/{}/tc3_request", date, input.service))
}

/// Returns the value of the `Authorization` header.
pub fn authorization(credentials: &Credentials, input: &SigningInput<'_>) -> Result<String> {
    let scope = credential_scope(input)?;
    let string_to_sign = format!(
        "{}\n{}\n{}\n{}",
        ALGORITHM,
        input.timestamp,
        scope,
        sha256_hex(canonical_request(input).as_bytes())
    );

    let date = scope.split('/').next().unwrap_or_default();
    let secret_date = hmac_sha256(format!("TC3{}", credentials.secret_key).as_bytes(), date.as_bytes())?;
    let secret_service = hmac_sha256(&secret_date, input.service.as_bytes())?;
    let secret_signing = hmac_sha256(&secret_service, b"tc3_request")?;
    let signature = hex::encode(hmac_sha256(&secret_signing, string_to_sign.as_bytes())?);

    Ok(format!(
        "{} Credential={}/{}, SignedHeaders={}, Signature={}",
        ALGORITHM, credentials.secret_id, scope, SIGNED_HEADERS, signature
    ))
}
