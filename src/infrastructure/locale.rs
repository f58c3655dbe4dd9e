//! IP-locale resolution.
//!
//! Some providers serve different regional endpoints depending on where
//! the caller's traffic originates (Google `translate.google.cn` vs
//! `.com`, Bing `cn.bing.com` vs `www.bing.com`). The answer rarely
//! changes, so it is cached both in-process and in the persisted store.

use crate::infrastructure::storage::kv::KvStore;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

const IS_CHINESE_IP_KEY: &str = "is_chinese_ip";
const IP_INFO_URL: &str = "https://ipinfo.io";

#[derive(Deserialize)]
struct IpInfo {
    country: Option<String>,
}

pub struct LocaleResolver {
    client: Client,
    store: Arc<KvStore>,
    /// Endpoint override used by tests; live resolution always asks
    /// ipinfo.io.
    endpoint: String,
    cached: Mutex<Option<bool>>,
}

impl LocaleResolver {
    pub fn new(client: Client, store: Arc<KvStore>) -> Self {
        Self::with_endpoint(client, store, IP_INFO_URL.to_string())
    }

    pub fn with_endpoint(client: Client, store: Arc<KvStore>, endpoint: String) -> Self {
        Self {
            client,
            store,
            endpoint,
            cached: Mutex::new(None),
        }
    }

    /// Whether the caller's network origin is inside China. Consults the
    /// in-process cache, then the persisted flag, then the network.
    pub async fn is_chinese_ip(&self) -> bool {
        let mut cached = self.cached.lock().await;
        if let Some(value) = *cached {
            return value;
        }
        if let Some(stored) = self.store.get::<bool>(IS_CHINESE_IP_KEY) {
            *cached = Some(stored);
            return stored;
        }
        let value = self.fetch().await;
        *cached = Some(value);
        if let Err(e) = self.store.set(IS_CHINESE_IP_KEY, &value) {
            warn!("failed to persist locale flag: {e}");
        }
        value
    }

    /// Bypass both caches and re-resolve from the network. Used when a
    /// provider's empty response suggests the endpoint region is wrong.
    pub async fn refresh(&self) -> bool {
        let value = self.fetch().await;
        let mut cached = self.cached.lock().await;
        *cached = Some(value);
        if let Err(e) = self.store.set(IS_CHINESE_IP_KEY, &value) {
            warn!("failed to persist locale flag: {e}");
        }
        value
    }

    async fn fetch(&self) -> bool {
        match self.lookup_country().await {
            Ok(country) => {
                debug!("resolved ip country: {country}");
                country == "CN"
            }
            Err(e) => {
                // Unreachable ipinfo most often means a mainland network,
                // so the lookup defaults to the Chinese endpoints.
                warn!("ip lookup failed, assuming Chinese ip: {e}");
                true
            }
        }
    }

    async fn lookup_country(&self) -> Result<String, reqwest::Error> {
        let info = self
            .client
            .get(&self.endpoint)
            .header("Accept", "application/json")
            .send()
            .await?
            .json::<IpInfo>()
            .await?;
        Ok(info.country.unwrap_or_default())
    }
}

/// Google endpoint TLD for the resolved locale.
pub fn google_tld(is_chinese_ip: bool) -> &'static str {
    if is_chinese_ip {
        "cn"
    } else {
        "com"
    }
}

/// Bing host prefix for the resolved locale.
pub fn bing_tld(is_chinese_ip: bool) -> &'static str {
    if is_chinese_ip {
        "cn"
    } else {
        "www"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tld_selection_follows_locale() {
        assert_eq!(google_tld(true), "cn");
        assert_eq!(google_tld(false), "com");
        assert_eq!(bing_tld(true), "cn");
        assert_eq!(bing_tld(false), "www");
    }

    #[tokio::test]
    async fn persisted_flag_short_circuits_network() {
        let store = Arc::new(KvStore::in_memory());
        store.set(IS_CHINESE_IP_KEY, &false).unwrap();
        let resolver = LocaleResolver::new(Client::new(), store);
        assert!(!resolver.is_chinese_ip().await);
        // Second call hits the in-process cache.
        assert!(!resolver.is_chinese_ip().await);
    }
}
