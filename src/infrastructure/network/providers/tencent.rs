//! Tencent machine translation (TMT) adapter.
//!
//! Speaks the cloud API directly: `TextTranslate` and `LanguageDetect`
//! on tmt.tencentcloudapi.com, signed with the TC3-HMAC-SHA256 scheme
//! the official SDKs implement.
//! Docs: https://cloud.tencent.com/document/product/551/15619

use crate::domain::error::{ProviderError, ProviderErrorKind};
use crate::domain::model::{ProviderKind, ProviderPayload, QueryWordInfo, TencentPayload};
use crate::domain::traits::TranslateProvider;
use crate::infrastructure::language;
use crate::infrastructure::network::providers::race_cancel;
use async_trait::async_trait;
use chrono::DateTime;
use hmac::{Hmac, Mac};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio_util::sync::CancellationToken;
use tracing::debug;

const TENCENT_HOST: &str = "tmt.tencentcloudapi.com";
const TENCENT_SERVICE: &str = "tmt";
const TENCENT_VERSION: &str = "2018-03-21";
const TENCENT_REGION: &str = "ap-guangzhou";
const TENCENT_PROJECT_ID: i64 = 0;

type HmacSha256 = Hmac<Sha256>;

#[derive(Serialize)]
struct TextTranslateRequest<'a> {
    #[serde(rename = "SourceText")]
    source_text: &'a str,
    #[serde(rename = "Source")]
    source: &'a str,
    #[serde(rename = "Target")]
    target: &'a str,
    #[serde(rename = "ProjectId")]
    project_id: i64,
}

#[derive(Serialize)]
struct LanguageDetectRequest<'a> {
    #[serde(rename = "Text")]
    text: &'a str,
    #[serde(rename = "ProjectId")]
    project_id: i64,
}

#[derive(Deserialize, Debug)]
struct TencentEnvelope {
    #[serde(rename = "Response")]
    response: serde_json::Value,
}

#[derive(Deserialize, Debug)]
struct TencentError {
    #[serde(rename = "Code")]
    code: String,
    #[serde(rename = "Message")]
    message: String,
}

#[derive(Deserialize, Debug)]
struct TextTranslateBody {
    #[serde(rename = "TargetText")]
    target_text: String,
    #[serde(rename = "Source")]
    source: String,
    #[serde(rename = "Target")]
    target: String,
}

#[derive(Deserialize, Debug)]
struct LanguageDetectBody {
    #[serde(rename = "Lang")]
    lang: String,
}

fn sha256_hex(data: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data.as_bytes());
    hex::encode(hasher.finalize())
}

fn hmac_sha256(key: &[u8], data: &str) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("hmac accepts any key length");
    mac.update(data.as_bytes());
    mac.finalize().into_bytes().to_vec()
}

/// Build the TC3-HMAC-SHA256 Authorization header for a JSON POST to
/// the TMT endpoint.
pub fn authorization(
    secret_id: &str,
    secret_key: &str,
    payload: &str,
    timestamp: i64,
) -> String {
    let date = DateTime::from_timestamp(timestamp, 0)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default();

    let canonical_request = format!(
        "POST\n/\n\ncontent-type:application/json; charset=utf-8\nhost:{}\n\ncontent-type;host\n{}",
        TENCENT_HOST,
        sha256_hex(payload)
    );
    let credential_scope = format!("{}/{}/tc3_request", date, TENCENT_SERVICE);
    let string_to_sign = format!(
        "TC3-HMAC-SHA256\n{}\n{}\n{}",
        timestamp,
        credential_scope,
        sha256_hex(&canonical_request)
    );

    let secret_date = hmac_sha256(format!("TC3{}", secret_key).as_bytes(), &date);
    let secret_service = hmac_sha256(&secret_date, TENCENT_SERVICE);
    let secret_signing = hmac_sha256(&secret_service, "tc3_request");
    let signature = hex::encode(hmac_sha256(&secret_signing, &string_to_sign));

    format!(
        "TC3-HMAC-SHA256 Credential={}/{}, SignedHeaders=content-type;host, Signature={}",
        secret_id, credential_scope, signature
    )
}

pub struct TencentProvider {
    client: Client,
    secret_id: String,
    secret_key: String,
}

impl TencentProvider {
    pub fn new(client: Client, secret_id: String, secret_key: String) -> Self {
        Self {
            client,
            secret_id,
            secret_key,
        }
    }

    async fn call<T: serde::de::DeserializeOwned>(
        &self,
        action: &str,
        payload: String,
        cancel: &CancellationToken,
    ) -> Result<T, ProviderError> {
        let timestamp = chrono::Utc::now().timestamp();
        let authorization =
            authorization(&self.secret_id, &self.secret_key, &payload, timestamp);

        let request = self
            .client
            .post(format!("https://{}", TENCENT_HOST))
            .header("Authorization", authorization)
            .header("Content-Type", "application/json; charset=utf-8")
            .header("Host", TENCENT_HOST)
            .header("X-TC-Action", action)
            .header("X-TC-Timestamp", timestamp.to_string())
            .header("X-TC-Version", TENCENT_VERSION)
            .header("X-TC-Region", TENCENT_REGION)
            .body(payload)
            .send();
        let response = race_cancel(ProviderKind::Tencent, cancel, request).await?;
        let body = race_cancel(ProviderKind::Tencent, cancel, response.text()).await?;
        debug!("tencent {action} response: {body}");

        let envelope: TencentEnvelope = serde_json::from_str(&body).map_err(|e| {
            ProviderError::new(ProviderKind::Tencent, ProviderErrorKind::Parse, e.to_string())
        })?;
        if let Some(error) = envelope.response.get("Error") {
            let error: TencentError = serde_json::from_value(error.clone()).map_err(|e| {
                ProviderError::new(ProviderKind::Tencent, ProviderErrorKind::Parse, e.to_string())
            })?;
            return Err(ProviderError::rejected(
                ProviderKind::Tencent,
                error.code,
                error.message,
            ));
        }
        serde_json::from_value(envelope.response).map_err(|e| {
            ProviderError::new(ProviderKind::Tencent, ProviderErrorKind::Parse, e.to_string())
        })
    }

    /// Detect the language of `text`, returning Tencent's language id
    /// (which coincides with the canonical id for supported languages).
    pub async fn detect_language(
        &self,
        text: &str,
        cancel: &CancellationToken,
    ) -> Result<String, ProviderError> {
        let payload = serde_json::to_string(&LanguageDetectRequest {
            text,
            project_id: TENCENT_PROJECT_ID,
        })
        .unwrap_or_default();
        let body: LanguageDetectBody = self.call("LanguageDetect", payload, cancel).await?;
        Ok(body.lang)
    }
}

#[async_trait]
impl TranslateProvider for TencentProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Tencent
    }

    async fn translate(
        &self,
        query: &QueryWordInfo,
        cancel: &CancellationToken,
    ) -> Result<ProviderPayload, ProviderError> {
        let source = language::tencent_id(&query.from_language).unwrap_or("auto");
        // Fail fast: a target outside Tencent's code space cannot be
        // degraded to auto-detect.
        let target = language::tencent_id(&query.to_language).ok_or_else(|| {
            ProviderError::new(
                ProviderKind::Tencent,
                ProviderErrorKind::UnsupportedLanguagePair,
                format!("tencent cannot target {}", query.to_language),
            )
        })?;

        let payload = serde_json::to_string(&TextTranslateRequest {
            source_text: &query.word,
            source,
            target,
            project_id: TENCENT_PROJECT_ID,
        })
        .unwrap_or_default();
        let body: TextTranslateBody = self.call("TextTranslate", payload, cancel).await?;
        Ok(ProviderPayload::Tencent(TencentPayload {
            translation: body.target_text,
            source: body.source,
            target: body.target,
        }))
    }
}
