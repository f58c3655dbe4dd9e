//! Baidu translate adapter.
//!
//! Docs: https://fanyi-api.baidu.com/doc/21
//! Baidu answers HTTP 200 even on failure; rejection is signalled by an
//! `error_code`/`error_msg` pair instead of a `trans_result`.

use crate::domain::error::{ProviderError, ProviderErrorKind};
use crate::domain::model::{BaiduPayload, ProviderKind, ProviderPayload, QueryWordInfo};
use crate::domain::traits::TranslateProvider;
use crate::infrastructure::language;
use crate::infrastructure::network::providers::race_cancel;
use async_trait::async_trait;
use rand::Rng;
use reqwest::Client;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::debug;

const BAIDU_API_URL: &str = "https://fanyi-api.baidu.com/api/trans/vip/translate";

#[derive(Deserialize, Debug)]
struct BaiduResponse {
    from: Option<String>,
    to: Option<String>,
    trans_result: Option<Vec<BaiduTransResult>>,
    error_code: Option<String>,
    error_msg: Option<String>,
}

#[derive(Deserialize, Debug)]
struct BaiduTransResult {
    dst: String,
}

pub struct BaiduProvider {
    client: Client,
    app_id: String,
    app_secret: String,
}

impl BaiduProvider {
    pub fn new(client: Client, app_id: String, app_secret: String) -> Self {
        Self {
            client,
            app_id,
            app_secret,
        }
    }
}

/// sign = md5(appid + q + salt + secret)
pub fn sign(app_id: &str, text: &str, salt: &str, app_secret: &str) -> String {
    let raw = format!("{}{}{}{}", app_id, text, salt, app_secret);
    format!("{:x}", md5::compute(raw))
}

#[async_trait]
impl TranslateProvider for BaiduProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Baidu
    }

    async fn translate(
        &self,
        query: &QueryWordInfo,
        cancel: &CancellationToken,
    ) -> Result<ProviderPayload, ProviderError> {
        let from = language::baidu_id(&query.from_language);
        let to = language::baidu_id(&query.to_language);
        // Fresh per-request salt.
        let salt = rand::thread_rng().gen_range(32768u32..u32::MAX).to_string();
        let sign = sign(&self.app_id, &query.word, &salt, &self.app_secret);

        let params = [
            ("q", query.word.as_str()),
            ("from", from),
            ("to", to),
            ("appid", self.app_id.as_str()),
            ("salt", salt.as_str()),
            ("sign", sign.as_str()),
        ];

        let request = self.client.get(BAIDU_API_URL).query(&params).send();
        let response = race_cancel(ProviderKind::Baidu, cancel, request).await?;
        let body = race_cancel(ProviderKind::Baidu, cancel, response.text()).await?;
        debug!("baidu response: {body}");

        let parsed: BaiduResponse = serde_json::from_str(&body).map_err(|e| {
            ProviderError::new(ProviderKind::Baidu, ProviderErrorKind::Parse, e.to_string())
        })?;

        match parsed.trans_result {
            Some(results) => Ok(ProviderPayload::Baidu(BaiduPayload {
                translations: results.into_iter().map(|r| r.dst).collect(),
                from: parsed.from.unwrap_or_else(|| from.to_string()),
                to: parsed.to.unwrap_or_else(|| to.to_string()),
            })),
            None => Err(ProviderError::rejected(
                ProviderKind::Baidu,
                parsed.error_code.unwrap_or_default(),
                parsed.error_msg.unwrap_or_else(|| "missing trans_result".to_string()),
            )),
        }
    }
}
