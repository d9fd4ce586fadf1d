use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Deserializer, Serialize};
use sha2::Sha256;

use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

const SUPPORTED_ALGORITHM: &str = "HMAC-SHA256";

/// Tolerated clock drift for requests issued slightly in the future.
const MAX_CLOCK_SKEW_SECS: i64 = 60;

/// Proof of an external workplace account, kept in the session until the
/// link is confirmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedRequest {
    #[serde(deserialize_with = "id_from_number_or_string")]
    pub community_id: i64,
    /// External identity of the user on the workplace platform.
    #[serde(deserialize_with = "string_from_number_or_string")]
    pub user_id: String,
    /// Where the platform expects the user to go once linked.
    pub redirect: String,
}

#[derive(Debug, Deserialize)]
struct SignedRequestPayload {
    algorithm: String,
    #[serde(deserialize_with = "id_from_number_or_string")]
    community_id: i64,
    #[serde(deserialize_with = "string_from_number_or_string")]
    user_id: String,
    #[serde(default)]
    redirect: Option<String>,
    /// Unix timestamp (seconds) at which the platform issued the request.
    issued_at: i64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(i64),
    String(String),
}

fn id_from_number_or_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::String(s) => s.parse().map_err(serde::de::Error::custom),
    }
}

fn string_from_number_or_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<String, D::Error> {
    Ok(match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => n.to_string(),
        NumberOrString::String(s) => s,
    })
}

fn decode_segment(segment: &str) -> Result<Vec<u8>, AppError> {
    URL_SAFE_NO_PAD
        .decode(segment.trim_end_matches('='))
        .map_err(|e| AppError::BadRequest(format!("Malformed signed request: {e}")))
}

/// Verify and decode a platform signed request.
///
/// The format is `base64url(signature).base64url(payload)` where the
/// signature is the HMAC-SHA256 of the encoded payload keyed with the app
/// secret. Requests issued more than `max_age` ago are rejected.
pub fn parse_signed_request(
    raw: &str,
    app_secret: &str,
    max_age: Duration,
) -> Result<SignedRequest, AppError> {
    parse_signed_request_at(raw, app_secret, max_age, Utc::now())
}

fn parse_signed_request_at(
    raw: &str,
    app_secret: &str,
    max_age: Duration,
    now: DateTime<Utc>,
) -> Result<SignedRequest, AppError> {
    if app_secret.is_empty() {
        return Err(AppError::BadRequest(
            "Signed requests are not accepted: no app secret configured".into(),
        ));
    }

    let (encoded_signature, encoded_payload) = raw
        .split_once('.')
        .ok_or_else(|| AppError::BadRequest("Malformed signed request".into()))?;

    let signature = decode_segment(encoded_signature)?;

    let mut mac = HmacSha256::new_from_slice(app_secret.as_bytes())
        .map_err(|e| AppError::Internal(format!("Invalid app secret: {e}")))?;
    mac.update(encoded_payload.as_bytes());
    mac.verify_slice(&signature)
        .map_err(|_| AppError::BadRequest("Invalid signed request signature".into()))?;

    let payload: SignedRequestPayload = serde_json::from_slice(&decode_segment(encoded_payload)?)
        .map_err(|e| AppError::BadRequest(format!("Invalid signed request payload: {e}")))?;

    if !payload.algorithm.eq_ignore_ascii_case(SUPPORTED_ALGORITHM) {
        return Err(AppError::BadRequest(format!(
            "Unsupported signed request algorithm '{}'",
            payload.algorithm
        )));
    }

    let issued_at = DateTime::<Utc>::from_timestamp(payload.issued_at, 0)
        .ok_or_else(|| AppError::BadRequest("Invalid signed request issue time".into()))?;
    let age = now - issued_at;
    if age > max_age || age < -Duration::seconds(MAX_CLOCK_SKEW_SECS) {
        return Err(AppError::BadRequest("Signed request has expired".into()));
    }

    Ok(SignedRequest {
        community_id: payload.community_id,
        user_id: payload.user_id,
        redirect: payload.redirect.unwrap_or_else(|| "/".to_string()),
    })
}
