//! Google translate adapter.
//!
//! No public API: scrapes the mobile web endpoint and extracts the
//! `result-container` element. The endpoint TLD follows the caller's
//! detected locale (translate.google.cn inside China).

use crate::domain::error::{ProviderError, ProviderErrorKind};
use crate::domain::model::{GooglePayload, ProviderKind, ProviderPayload, QueryWordInfo};
use crate::domain::traits::TranslateProvider;
use crate::infrastructure::language;
use crate::infrastructure::locale::{google_tld, LocaleResolver};
use crate::infrastructure::network::providers::race_cancel;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use std::borrow::Cow;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

static RESULT_CONTAINER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<div[^>]*?class="result-container"[^>]*>.*?</div>"#).unwrap()
});
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"</?[^>]+>").unwrap());

pub struct GoogleProvider {
    client: Client,
    locale: Arc<LocaleResolver>,
}

impl GoogleProvider {
    pub fn new(client: Client, locale: Arc<LocaleResolver>) -> Self {
        Self { client, locale }
    }
}

/// Pull the translation out of the mobile page: first `result-container`
/// div, tags stripped, percent-escapes decoded. Kept narrow so the regex
/// extraction can be swapped for a structured HTML parser.
pub fn extract_translation(html: &str) -> Option<String> {
    let fragment = RESULT_CONTAINER.find(html)?.as_str();
    let stripped = TAG.replace_all(fragment, "");
    let decoded = urlencoding::decode(&stripped)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| stripped.into_owned());
    Some(decoded.trim().to_string())
}

#[async_trait]
impl TranslateProvider for GoogleProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Google
    }

    async fn translate(
        &self,
        query: &QueryWordInfo,
        cancel: &CancellationToken,
    ) -> Result<ProviderPayload, ProviderError> {
        let sl = language::google_id(&query.from_language);
        let tl = language::google_id(&query.to_language);
        let tld = google_tld(self.locale.is_chinese_ip().await);

        let url = format!("https://translate.google.{}/m", tld);
        let request = self
            .client
            .get(&url)
            // hl matches tl: the page renders in the target language.
            .query(&[("sl", sl), ("tl", tl), ("hl", tl), ("q", &query.word)])
            .send();
        let response = race_cancel(ProviderKind::Google, cancel, request).await?;
        let html = race_cancel(ProviderKind::Google, cancel, response.text()).await?;
        debug!("google page length: {}", html.len());

        let translation = extract_translation(&html).ok_or_else(|| {
            ProviderError::new(
                ProviderKind::Google,
                ProviderErrorKind::Parse,
                "result-container not found in page",
            )
        })?;
        Ok(ProviderPayload::Google(GooglePayload { translation }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_first_result_container() {
        let html = r#"<html><body>
            <div class="result-container">好</div>
            <div class="result-container">second</div>
        </body></html>"#;
        assert_eq!(extract_translation(html).as_deref(), Some("好"));
    }

    #[test]
    fn strips_nested_tags() {
        let html = r#"<div lang="zh" class="result-container"><span>你</span>好</div>"#;
        assert_eq!(extract_translation(html).as_deref(), Some("你好"));
    }

    #[test]
    fn missing_container_yields_none() {
        assert_eq!(extract_translation("<html><body>captcha</body></html>"), None);
    }
}
