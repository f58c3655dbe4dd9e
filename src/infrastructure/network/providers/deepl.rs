//! DeepL adapter emulating the web client against the free jsonrpc
//! endpoint.
//!
//! The endpoint authenticates requests through two covert channels:
//! the timestamp must be a multiple of (number of 'i' characters in the
//! source text + 1), and the byte-level spacing around the `"method"`
//! key depends on the request id. The body is therefore serialized once
//! and patched as a raw string; re-encoding it would break the check.

use crate::domain::error::{ProviderError, ProviderErrorKind};
use crate::domain::model::{DeeplPayload, ProviderKind, ProviderPayload, QueryWordInfo};
use crate::domain::traits::TranslateProvider;
use crate::infrastructure::language;
use crate::infrastructure::network::providers::race_cancel;
use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio_util::sync::CancellationToken;
use tracing::debug;

const DEEPL_JSONRPC_URL: &str = "https://www2.deepl.com/jsonrpc";

#[derive(Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'static str,
    params: JsonRpcParams<'a>,
    id: u64,
}

#[derive(Serialize)]
struct JsonRpcParams<'a> {
    texts: Vec<TextItem<'a>>,
    lang: LangParams<'a>,
    timestamp: u64,
}

#[derive(Serialize)]
struct TextItem<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct LangParams<'a> {
    target_lang: &'a str,
    source_lang_user_selected: &'a str,
}

#[derive(Deserialize, Debug)]
struct JsonRpcResponse {
    result: Option<DeeplResult>,
    error: Option<DeeplError>,
}

#[derive(Deserialize, Debug)]
struct DeeplResult {
    texts: Vec<DeeplText>,
}

#[derive(Deserialize, Debug)]
struct DeeplText {
    text: String,
}

#[derive(Deserialize, Debug)]
struct DeeplError {
    code: Option<i64>,
    message: Option<String>,
}

pub struct DeeplProvider {
    client: Client,
    /// Random base chosen once, incremented per request, as the web
    /// client does.
    request_id: AtomicU64,
}

impl DeeplProvider {
    pub fn new(client: Client) -> Self {
        let base = rand::thread_rng().gen_range(10_000_000u64..100_000_000u64);
        Self {
            client,
            request_id: AtomicU64::new(base),
        }
    }
}

/// Perturb the timestamp so it is a multiple of (i_count + 1) while
/// staying within a millisecond of the real clock.
pub fn forge_timestamp(text: &str, now_ms: u64) -> u64 {
    let divisor = text.matches('i').count() as u64 + 1;
    now_ms - now_ms % divisor
}

/// The id-dependent spacing variant for the `"method"` key.
pub fn method_spacing(request_id: u64) -> &'static str {
    if (request_id + 3) % 13 == 0 || (request_id + 5) % 29 == 0 {
        "\"method\" : \""
    } else {
        "\"method\": \""
    }
}

/// Serialize the envelope and patch in the exact spacing the server
/// inspects. The returned string is sent verbatim.
pub fn build_body(
    text: &str,
    source_lang: &str,
    target_lang: &str,
    request_id: u64,
    now_ms: u64,
) -> String {
    let request = JsonRpcRequest {
        jsonrpc: "2.0",
        method: "LMT_handle_texts",
        params: JsonRpcParams {
            texts: vec![TextItem { text }],
            lang: LangParams {
                target_lang,
                source_lang_user_selected: source_lang,
            },
            timestamp: forge_timestamp(text, now_ms),
        },
        id: request_id,
    };
    // Serializing a struct cannot fail here.
    let body = serde_json::to_string(&request).unwrap_or_default();
    body.replace("\"method\":\"", method_spacing(request_id))
}

#[async_trait]
impl TranslateProvider for DeeplProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Deepl
    }

    async fn translate(
        &self,
        query: &QueryWordInfo,
        cancel: &CancellationToken,
    ) -> Result<ProviderPayload, ProviderError> {
        let target = language::deepl_id(&query.to_language).ok_or_else(|| {
            ProviderError::new(
                ProviderKind::Deepl,
                ProviderErrorKind::UnsupportedLanguagePair,
                format!("deepl cannot target {}", query.to_language),
            )
        })?;
        let source = language::deepl_id(&query.from_language).unwrap_or("auto");

        let request_id = self.request_id.fetch_add(1, Ordering::Relaxed) + 1;
        let now_ms = Utc::now().timestamp_millis() as u64;
        let body = build_body(&query.word, source, target, request_id, now_ms);
        debug!("deepl request body: {body}");

        let request = self
            .client
            .post(DEEPL_JSONRPC_URL)
            .header("content-type", "application/json")
            .body(body)
            .send();
        let response = race_cancel(ProviderKind::Deepl, cancel, request).await?;
        let text = race_cancel(ProviderKind::Deepl, cancel, response.text()).await?;

        let parsed: JsonRpcResponse = serde_json::from_str(&text).map_err(|e| {
            ProviderError::new(ProviderKind::Deepl, ProviderErrorKind::Parse, e.to_string())
        })?;
        if let Some(error) = parsed.error {
            return Err(ProviderError::rejected(
                ProviderKind::Deepl,
                error.code.map(|c| c.to_string()).unwrap_or_default(),
                error.message.unwrap_or_else(|| "jsonrpc error".to_string()),
            ));
        }
        let result = parsed.result.ok_or_else(|| {
            ProviderError::new(
                ProviderKind::Deepl,
                ProviderErrorKind::Parse,
                "response carries neither result nor error",
            )
        })?;
        Ok(ProviderPayload::Deepl(DeeplPayload {
            translations: result.texts.into_iter().map(|t| t.text).collect(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forged_timestamp_satisfies_congruence() {
        for (text, now) in [
            ("if it is alive", 1657597450312u64),
            ("no letter here", 1657597450312),
            ("iiiii", 1700000000001),
            ("", 42),
        ] {
            let divisor = text.matches('i').count() as u64 + 1;
            let forged = forge_timestamp(text, now);
            assert_eq!(forged % divisor, 0);
            assert!(now - forged < divisor);
        }
    }

    #[test]
    fn timestamp_without_i_is_unchanged() {
        // i_count = 0, divisor 1, every value is a multiple.
        assert_eq!(forge_timestamp("good", 1657597450312), 1657597450312);
    }

    #[test]
    fn method_spacing_follows_id_rule() {
        // (10 + 3) % 13 == 0
        assert_eq!(method_spacing(10), "\"method\" : \"");
        // (24 + 5) % 29 == 0
        assert_eq!(method_spacing(24), "\"method\" : \"");
        assert_eq!(method_spacing(11), "\"method\": \"");
    }

    #[test]
    fn body_contains_exact_method_variant() {
        let wide = build_body("hi", "EN", "ZH", 10, 1_000_000);
        assert!(wide.contains("\"method\" : \"LMT_handle_texts\""));
        assert!(!wide.contains("\"method\": \"LMT_handle_texts\""));

        let narrow = build_body("hi", "EN", "ZH", 11, 1_000_000);
        assert!(narrow.contains("\"method\": \"LMT_handle_texts\""));
        assert!(!narrow.contains("\"method\" : \"LMT_handle_texts\""));
    }

    #[test]
    fn body_carries_forged_timestamp_and_langs() {
        let now = 1657597450312u64;
        let body = build_body("if it is alive", "EN", "ZH", 11, now);
        let forged = forge_timestamp("if it is alive", now);
        assert!(body.contains(&format!("\"timestamp\":{}", forged)));
        assert!(body.contains("\"target_lang\":\"ZH\""));
        assert!(body.contains("\"source_lang_user_selected\":\"EN\""));
    }

    #[test]
    fn response_parses_texts() {
        let body = r#"{"jsonrpc":"2.0","id":1,"result":{"texts":[{"text":"好"}],"lang":"EN"}}"#;
        let parsed: JsonRpcResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.result.unwrap().texts[0].text, "好");
    }

    #[test]
    fn error_response_parses_code_and_message() {
        let body = r#"{"jsonrpc":"2.0","error":{"code":1042,"message":"too many requests"}}"#;
        let parsed: JsonRpcResponse = serde_json::from_str(body).unwrap();
        let error = parsed.error.unwrap();
        assert_eq!(error.code, Some(1042));
        assert_eq!(error.message.as_deref(), Some("too many requests"));
    }
}
