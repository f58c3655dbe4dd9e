//! Caiyun (彩云小译) adapter.
//!
//! Docs: https://docs.caiyunapp.com/blog/2018/09/03/lingocloud-api/
//! Caiyun only serves a fixed set of direction pairs; anything else is
//! rejected locally, before a network call.

use crate::domain::error::{ProviderError, ProviderErrorKind};
use crate::domain::model::{CaiyunPayload, ProviderKind, ProviderPayload, QueryWordInfo};
use crate::domain::traits::TranslateProvider;
use crate::infrastructure::language;
use crate::infrastructure::network::providers::race_cancel;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::debug;

const CAIYUN_API_URL: &str = "https://api.interpreter.caiyunai.com/v1/translator";

const SUPPORTED_TRANS_TYPES: [&str; 4] = ["zh2en", "zh2ja", "en2zh", "ja2zh"];

#[derive(Serialize)]
struct CaiyunRequest<'a> {
    /// Newline-delimited segments, translated in parallel server-side.
    source: Vec<&'a str>,
    trans_type: String,
    detect: bool,
}

#[derive(Deserialize, Debug)]
struct CaiyunResponse {
    target: Vec<String>,
}

pub struct CaiyunProvider {
    client: Client,
    token: String,
}

impl CaiyunProvider {
    pub fn new(client: Client, token: String) -> Self {
        Self { client, token }
    }
}

/// Resolve the `from2to` direction Caiyun expects, or `None` when either
/// side has no Caiyun id or the direction is outside the allow-list.
pub fn trans_type(from_youdao_id: &str, to_youdao_id: &str) -> Option<String> {
    let from = language::caiyun_id(from_youdao_id)?;
    let to = language::caiyun_id(to_youdao_id)?;
    let trans_type = format!("{}2{}", from, to);
    SUPPORTED_TRANS_TYPES
        .contains(&trans_type.as_str())
        .then_some(trans_type)
}

#[async_trait]
impl TranslateProvider for CaiyunProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Caiyun
    }

    async fn translate(
        &self,
        query: &QueryWordInfo,
        cancel: &CancellationToken,
    ) -> Result<ProviderPayload, ProviderError> {
        let trans_type =
            trans_type(&query.from_language, &query.to_language).ok_or_else(|| {
                ProviderError::new(
                    ProviderKind::Caiyun,
                    ProviderErrorKind::UnsupportedLanguagePair,
                    format!(
                        "caiyun does not serve {} -> {}",
                        query.from_language, query.to_language
                    ),
                )
            })?;

        let body = CaiyunRequest {
            source: query.word.split('\n').collect(),
            detect: trans_type.starts_with("auto2"),
            trans_type,
        };

        let request = self
            .client
            .post(CAIYUN_API_URL)
            .header("content-type", "application/json")
            .header("x-authorization", format!("token {}", self.token))
            .json(&body)
            .send();
        let response = race_cancel(ProviderKind::Caiyun, cancel, request).await?;

        let status = response.status();
        let text = race_cancel(ProviderKind::Caiyun, cancel, response.text()).await?;
        debug!("caiyun response ({status}): {text}");
        if !status.is_success() {
            return Err(ProviderError::rejected(
                ProviderKind::Caiyun,
                status.as_str(),
                status.canonical_reason().unwrap_or("request rejected"),
            ));
        }

        let parsed: CaiyunResponse = serde_json::from_str(&text).map_err(|e| {
            ProviderError::new(ProviderKind::Caiyun, ProviderErrorKind::Parse, e.to_string())
        })?;
        Ok(ProviderPayload::Caiyun(CaiyunPayload {
            translations: parsed.target,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allow_listed_directions_resolve() {
        assert_eq!(trans_type("zh-CHS", "en").as_deref(), Some("zh2en"));
        assert_eq!(trans_type("zh-CHS", "ja").as_deref(), Some("zh2ja"));
        assert_eq!(trans_type("en", "zh-CHS").as_deref(), Some("en2zh"));
        assert_eq!(trans_type("ja", "zh-CHS").as_deref(), Some("ja2zh"));
    }

    #[test]
    fn off_list_directions_are_rejected_locally() {
        // auto-detect is not on the allow-list either.
        assert_eq!(trans_type("auto", "zh-CHS"), None);
        assert_eq!(trans_type("en", "ja"), None);
        assert_eq!(trans_type("ja", "en"), None);
        // Korean has no Caiyun id at all.
        assert_eq!(trans_type("ko", "zh-CHS"), None);
        assert_eq!(trans_type("fr", "zh-CHS"), None);
    }

    #[tokio::test]
    async fn unsupported_pair_fails_without_network_call() {
        let provider = CaiyunProvider::new(Client::new(), "token".to_string());
        let query = QueryWordInfo::new("bonjour", "fr", "en");
        let err = provider
            .translate(&query, &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ProviderErrorKind::UnsupportedLanguagePair);
    }

    #[test]
    fn response_target_is_an_array() {
        let parsed: CaiyunResponse =
            serde_json::from_str(r#"{"target": ["你好", "世界"]}"#).unwrap();
        assert_eq!(parsed.target, vec!["你好", "世界"]);
    }
}
