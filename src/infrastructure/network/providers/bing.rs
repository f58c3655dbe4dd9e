//! Bing web translator adapter.
//!
//! No public API: the translator page embeds an instance group id, a
//! signing key/timestamp and a token in inline script text. Those are
//! scraped once, cached (in memory and in the persisted store) and
//! reused until the expiry interval elapses. An empty translate response
//! means the cached token was rejected server-side or the regional
//! endpoint is wrong; both are handled by one locale re-check plus
//! session refresh, followed by exactly one retry.

use crate::domain::error::{ProviderError, ProviderErrorKind};
use crate::domain::model::{BingPayload, ProviderKind, ProviderPayload, QueryWordInfo};
use crate::domain::traits::TranslateProvider;
use crate::infrastructure::language;
use crate::infrastructure::locale::{bing_tld, LocaleResolver};
use crate::infrastructure::network::providers::race_cancel;
use crate::infrastructure::storage::kv::KvStore;
use async_trait::async_trait;
use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

const BING_SESSION_KEY: &str = "bing_session";

static IG: Lazy<Regex> = Lazy::new(|| Regex::new(r#"IG:"(.*?)""#).unwrap());
static IID: Lazy<Regex> = Lazy::new(|| Regex::new(r#"data-iid="(.*?)""#).unwrap());
static RICH_TRANSLATE_PARAMS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"var params_RichTranslateHelper = (.*?);").unwrap());

/// Scraped session state. `key` doubles as the token issue timestamp in
/// milliseconds; `count` is the monotonically increasing request counter
/// for the lifetime of one token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BingSession {
    pub ig: String,
    pub iid: String,
    pub key: u64,
    pub token: String,
    pub expiry_interval_ms: u64,
    pub count: u64,
}

impl BingSession {
    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.key) > self.expiry_interval_ms
    }
}

/// Extract the session values from the translator page's inline script.
pub fn parse_session(html: &str) -> Option<BingSession> {
    let ig = IG.captures(html)?.get(1)?.as_str().to_string();
    let iid = IID
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| "translator.5023".to_string());
    let params = RICH_TRANSLATE_PARAMS.captures(html)?.get(1)?.as_str();
    // [1663259642763, "token", 3600000, ...]
    let params: Vec<serde_json::Value> = serde_json::from_str(params).ok()?;
    let key = params.first()?.as_u64()?;
    let token = params.get(1)?.as_str()?.to_string();
    let expiry_interval_ms = params.get(2)?.as_u64()?;
    Some(BingSession {
        ig,
        iid,
        key,
        token,
        expiry_interval_ms,
        count: 0,
    })
}

#[derive(Deserialize, Debug)]
struct BingTranslateItem {
    translations: Vec<BingTranslation>,
    #[serde(rename = "detectedLanguage")]
    detected_language: Option<BingDetectedLanguage>,
}

#[derive(Deserialize, Debug)]
struct BingTranslation {
    text: String,
}

#[derive(Deserialize, Debug)]
struct BingDetectedLanguage {
    language: String,
}

pub struct BingProvider {
    client: Client,
    locale: Arc<LocaleResolver>,
    store: Arc<KvStore>,
    /// Guards the session so concurrent expired callers share one
    /// in-flight refresh instead of racing.
    session: Mutex<Option<BingSession>>,
    /// Endpoint override used by tests; live traffic always goes to
    /// `{tld}.bing.com`.
    base_url: Option<String>,
}

impl BingProvider {
    pub fn new(client: Client, locale: Arc<LocaleResolver>, store: Arc<KvStore>) -> Self {
        Self {
            client,
            locale,
            store,
            session: Mutex::new(None),
            base_url: None,
        }
    }

    pub fn with_base_url(
        client: Client,
        locale: Arc<LocaleResolver>,
        store: Arc<KvStore>,
        base_url: String,
    ) -> Self {
        Self {
            base_url: Some(base_url),
            ..Self::new(client, locale, store)
        }
    }

    fn base(&self, tld: &str) -> String {
        match &self.base_url {
            Some(base) => base.clone(),
            None => format!("https://{}.bing.com", tld),
        }
    }

    async fn fetch_session(
        &self,
        tld: &str,
        cancel: &CancellationToken,
    ) -> Result<BingSession, ProviderError> {
        let url = format!("{}/translator", self.base(tld));
        info!("fetching bing session from {url}");
        let request = self.client.get(&url).send();
        let response = race_cancel(ProviderKind::Bing, cancel, request).await?;
        let html = race_cancel(ProviderKind::Bing, cancel, response.text()).await?;
        parse_session(&html).ok_or_else(|| {
            ProviderError::new(
                ProviderKind::Bing,
                ProviderErrorKind::Parse,
                "session values not found in translator page",
            )
        })
    }

    /// Hand out a usable session with its counter already advanced for
    /// this request. Held under the mutex end to end, so only one caller
    /// performs a refresh at a time.
    async fn checkout_session(
        &self,
        tld: &str,
        force_refresh: bool,
        cancel: &CancellationToken,
    ) -> Result<BingSession, ProviderError> {
        let mut guard = self.session.lock().await;

        if guard.is_none() && !force_refresh {
            *guard = self.store.get::<BingSession>(BING_SESSION_KEY);
        }

        let now_ms = Utc::now().timestamp_millis() as u64;
        let stale = match guard.as_ref() {
            Some(session) => session.is_expired(now_ms),
            None => true,
        };
        if stale || force_refresh {
            *guard = Some(self.fetch_session(tld, cancel).await?);
        }

        let session = guard.as_mut().unwrap();
        session.count += 1;
        let snapshot = session.clone();
        if let Err(e) = self.store.set(BING_SESSION_KEY, &snapshot) {
            warn!("failed to persist bing session: {e}");
        }
        Ok(snapshot)
    }

    async fn request_translate(
        &self,
        query: &QueryWordInfo,
        tld: &str,
        session: &BingSession,
        cancel: &CancellationToken,
    ) -> Result<String, ProviderError> {
        let from = language::bing_id(&query.from_language);
        let to = language::bing_id(&query.to_language);
        let url = format!(
            "{}/ttranslatev3?isVertical=1&IG={}&IID={}.{}",
            self.base(tld),
            session.ig,
            session.iid,
            session.count
        );
        let key = session.key.to_string();
        let form = [
            ("fromLang", from),
            ("text", query.word.as_str()),
            ("to", to),
            ("token", session.token.as_str()),
            ("key", key.as_str()),
        ];
        let request = self.client.post(&url).form(&form).send();
        let response = race_cancel(ProviderKind::Bing, cancel, request).await?;
        race_cancel(ProviderKind::Bing, cancel, response.text()).await
    }

    fn parse_translate(&self, body: &str) -> Result<ProviderPayload, ProviderError> {
        let items: Vec<BingTranslateItem> = serde_json::from_str(body).map_err(|e| {
            ProviderError::new(ProviderKind::Bing, ProviderErrorKind::Parse, e.to_string())
        })?;
        let detected_language = items
            .first()
            .and_then(|i| i.detected_language.as_ref())
            .map(|d| d.language.clone());
        let translations = items
            .into_iter()
            .flat_map(|i| i.translations)
            .map(|t| t.text)
            .collect();
        Ok(ProviderPayload::Bing(BingPayload {
            translations,
            detected_language,
        }))
    }
}

#[async_trait]
impl TranslateProvider for BingProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Bing
    }

    async fn translate(
        &self,
        query: &QueryWordInfo,
        cancel: &CancellationToken,
    ) -> Result<ProviderPayload, ProviderError> {
        let tld = bing_tld(self.locale.is_chinese_ip().await);
        let session = self.checkout_session(tld, false, cancel).await?;
        let body = self
            .request_translate(query, tld, &session, cancel)
            .await?;

        if !body.trim().is_empty() {
            return self.parse_translate(&body);
        }

        // Empty body: either the endpoint region is wrong or the token
        // was rejected. Re-resolve both once, then retry exactly once.
        debug!("empty bing response, refreshing locale and session");
        let tld = bing_tld(self.locale.refresh().await);
        let session = self.checkout_session(tld, true, cancel).await?;
        let body = self
            .request_translate(query, tld, &session, cancel)
            .await?;
        if body.trim().is_empty() {
            return Err(ProviderError::rejected(
                ProviderKind::Bing,
                "empty",
                "empty response after session refresh",
            ));
        }
        self.parse_translate(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_PAGE: &str = r#"
        <html><head><script>
        var x = 1; IG:"C064D2C8D4F84111B96C9F14E2F5CE07"; var y = 2;
        var params_RichTranslateHelper = [1663259642763, "ETrbGhqGa5PwV8WL3sTYSBxsYRagh5bl", 3600000, true, null, false, "必应翻译", false, false, null, null];
        </script></head>
        <body><div id="t" data-iid="translator.5023"></div></body></html>
    "#;

    #[test]
    fn parses_session_from_page() {
        let session = parse_session(SAMPLE_PAGE).unwrap();
        assert_eq!(session.ig, "C064D2C8D4F84111B96C9F14E2F5CE07");
        assert_eq!(session.iid, "translator.5023");
        assert_eq!(session.key, 1663259642763);
        assert_eq!(session.token, "ETrbGhqGa5PwV8WL3sTYSBxsYRagh5bl");
        assert_eq!(session.expiry_interval_ms, 3600000);
        assert_eq!(session.count, 0);
    }

    #[test]
    fn missing_script_values_yield_none() {
        assert!(parse_session("<html><body>nothing here</body></html>").is_none());
    }

    #[test]
    fn expiry_is_measured_from_key_timestamp() {
        let session = parse_session(SAMPLE_PAGE).unwrap();
        assert!(!session.is_expired(session.key + session.expiry_interval_ms));
        assert!(session.is_expired(session.key + session.expiry_interval_ms + 1));
    }

    #[tokio::test]
    async fn counter_increments_by_one_per_checkout() {
        let store = Arc::new(KvStore::in_memory());
        let fresh = BingSession {
            key: Utc::now().timestamp_millis() as u64,
            ..parse_session(SAMPLE_PAGE).unwrap()
        };
        store.set(BING_SESSION_KEY, &fresh).unwrap();

        let locale = Arc::new(LocaleResolver::new(Client::new(), store.clone()));
        let provider = BingProvider::new(Client::new(), locale, store.clone());

        let cancel = CancellationToken::new();
        let first = provider.checkout_session("www", false, &cancel).await.unwrap();
        assert_eq!(first.count, 1);
        let second = provider.checkout_session("www", false, &cancel).await.unwrap();
        assert_eq!(second.count, 2);
        assert_eq!(second.token, fresh.token);

        // Counter survives in the persisted store as well.
        let persisted: BingSession = store.get(BING_SESSION_KEY).unwrap();
        assert_eq!(persisted.count, 2);
    }

    #[test]
    fn translate_payload_parses_shape() {
        let body = r#"[{
            "detectedLanguage": {"language": "en", "score": 1.0},
            "translations": [{"text": "好", "to": "zh-Hans"}]
        }]"#;
        let store = Arc::new(KvStore::in_memory());
        let locale = Arc::new(LocaleResolver::new(Client::new(), store.clone()));
        let provider = BingProvider::new(Client::new(), locale, store);
        let ProviderPayload::Bing(payload) = provider.parse_translate(body).unwrap() else {
            panic!("expected bing payload");
        };
        assert_eq!(payload.translations, vec!["好"]);
        assert_eq!(payload.detected_language.as_deref(), Some("en"));
    }

    #[test]
    fn unexpected_shape_is_a_parse_failure() {
        let store = Arc::new(KvStore::in_memory());
        let locale = Arc::new(LocaleResolver::new(Client::new(), store.clone()));
        let provider = BingProvider::new(Client::new(), locale, store);
        let err = provider
            .parse_translate(r#"{"statusCode": 400}"#)
            .unwrap_err();
        assert_eq!(err.kind, ProviderErrorKind::Parse);
    }
}
