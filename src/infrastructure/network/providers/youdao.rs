//! Youdao dictionary adapter.
//!
//! Docs: https://ai.youdao.com/DOCSIRMA/html/trans/api/wbfy/index.html
//! Youdao always answers HTTP 200; failure lives in the `errorCode`
//! field of the payload.

use crate::domain::error::{ProviderError, ProviderErrorKind};
use crate::domain::model::{
    KeyValues, ProviderKind, ProviderPayload, QueryWordInfo, WordForm, YoudaoPayload,
};
use crate::domain::traits::TranslateProvider;
use crate::infrastructure::network::providers::race_cancel;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio_util::sync::CancellationToken;
use tracing::debug;

const YOUDAO_API_URL: &str = "https://openapi.youdao.com/api";

#[derive(Deserialize, Debug)]
struct YoudaoResponse {
    #[serde(rename = "errorCode")]
    error_code: String,
    translation: Option<Vec<String>>,
    basic: Option<YoudaoBasic>,
    web: Option<Vec<YoudaoWeb>>,
    #[serde(rename = "isWord", default)]
    is_word: bool,
    #[serde(rename = "speakUrl")]
    speak_url: Option<String>,
    /// Resolved direction, e.g. "en2zh-CHS".
    l: Option<String>,
}

#[derive(Deserialize, Debug)]
struct YoudaoBasic {
    phonetic: Option<String>,
    #[serde(rename = "us-phonetic")]
    us_phonetic: Option<String>,
    #[serde(rename = "uk-phonetic")]
    uk_phonetic: Option<String>,
    explains: Option<Vec<String>>,
    #[serde(rename = "exam_type")]
    exam_types: Option<Vec<String>>,
    wfs: Option<Vec<YoudaoWfWrapper>>,
}

#[derive(Deserialize, Debug)]
struct YoudaoWfWrapper {
    wf: Option<YoudaoWf>,
}

#[derive(Deserialize, Debug)]
struct YoudaoWf {
    name: Option<String>,
    value: Option<String>,
}

#[derive(Deserialize, Debug)]
struct YoudaoWeb {
    key: String,
    value: Vec<String>,
}

pub struct YoudaoProvider {
    client: Client,
    app_id: String,
    app_secret: String,
}

impl YoudaoProvider {
    pub fn new(client: Client, app_id: String, app_secret: String) -> Self {
        Self {
            client,
            app_id,
            app_secret,
        }
    }
}

/// Sign-input truncation mandated by the v3 signing scheme: texts longer
/// than 20 characters become first 10 + length + last 10.
pub fn truncate(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();
    if len <= 20 {
        text.to_string()
    } else {
        let head: String = chars[..10].iter().collect();
        let tail: String = chars[len - 10..].iter().collect();
        format!("{}{}{}", head, len, tail)
    }
}

/// sign = sha256(appId + input(q) + salt + curtime + appSecret)
pub fn sign(app_id: &str, text: &str, salt: &str, curtime: &str, app_secret: &str) -> String {
    let raw = format!("{}{}{}{}{}", app_id, truncate(text), salt, curtime, app_secret);
    let mut hasher = Sha256::new();
    hasher.update(raw);
    hex::encode(hasher.finalize())
}

fn error_message(code: &str) -> &'static str {
    match code {
        "101" => "Missing required parameter",
        "102" => "Unsupported language type",
        "103" => "Text too long",
        "108" => "Invalid appKey or signature error",
        "202" => "Missing signature",
        "203" => "Signature verification failed",
        "301" => "Dictionary query failed",
        "302" => "Translation query failed",
        "303" => "Server-side exception",
        "401" => "Account balance insufficient",
        "411" => "Access frequency limited",
        _ => "Unknown error",
    }
}

fn map_response(response: YoudaoResponse) -> Result<ProviderPayload, ProviderError> {
    if response.error_code != "0" {
        return Err(ProviderError::rejected(
            ProviderKind::Youdao,
            response.error_code.clone(),
            error_message(&response.error_code),
        ));
    }

    let mut payload = YoudaoPayload {
        translations: response.translation.unwrap_or_default(),
        is_word: response.is_word,
        speech_url: response.speak_url,
        language_direction: response.l,
        ..YoudaoPayload::default()
    };

    if let Some(basic) = response.basic {
        // us-phonetic may carry two variants "a; b", keep the second.
        payload.us_phonetic = basic
            .us_phonetic
            .map(|p| p.split("; ").last().unwrap_or(&p).to_string());
        payload.uk_phonetic = basic.uk_phonetic;
        payload.phonetic = basic.phonetic;
        payload.explanations = basic.explains.unwrap_or_default();
        payload.exam_types = basic.exam_types;
        payload.forms = basic
            .wfs
            .unwrap_or_default()
            .into_iter()
            .filter_map(|w| w.wf)
            .filter_map(|wf| match (wf.name, wf.value) {
                (Some(name), Some(value)) => Some(WordForm { name, value }),
                _ => None,
            })
            .collect();
    }

    if let Some(web) = response.web {
        let mut entries = web
            .into_iter()
            .map(|w| KeyValues {
                key: w.key,
                values: w.value,
            })
            .collect::<Vec<_>>();
        if !entries.is_empty() {
            payload.web_translation = Some(entries.remove(0));
            payload.web_phrases = entries;
        }
    }

    Ok(ProviderPayload::Youdao(payload))
}

#[async_trait]
impl TranslateProvider for YoudaoProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Youdao
    }

    async fn translate(
        &self,
        query: &QueryWordInfo,
        cancel: &CancellationToken,
    ) -> Result<ProviderPayload, ProviderError> {
        let curtime = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| {
                ProviderError::new(ProviderKind::Youdao, ProviderErrorKind::Network, e.to_string())
            })?
            .as_secs()
            .to_string();
        // The v3 scheme uses the timestamp itself as salt.
        let salt = curtime.clone();
        let sign = sign(&self.app_id, &query.word, &salt, &curtime, &self.app_secret);

        let params = [
            ("sign", sign.as_str()),
            ("salt", salt.as_str()),
            ("from", query.from_language.as_str()),
            ("signType", "v3"),
            ("q", query.word.as_str()),
            ("appKey", self.app_id.as_str()),
            ("curtime", curtime.as_str()),
            ("to", query.to_language.as_str()),
        ];

        let request = self.client.post(YOUDAO_API_URL).form(&params).send();
        let response = race_cancel(ProviderKind::Youdao, cancel, request).await?;
        let body = race_cancel(ProviderKind::Youdao, cancel, response.text()).await?;
        debug!("youdao response: {body}");

        let parsed: YoudaoResponse = serde_json::from_str(&body).map_err(|e| {
            ProviderError::new(ProviderKind::Youdao, ProviderErrorKind::Parse, e.to_string())
        })?;
        map_response(parsed)
    }
}
