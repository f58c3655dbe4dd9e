use crate::domain::error::FyError;
use crate::domain::model::LookupResult;
use crate::domain::traits::TranslateProvider;
use crate::infrastructure::config::Config;
use crate::infrastructure::locale::LocaleResolver;
use crate::infrastructure::network::http::create_client;
use crate::infrastructure::network::providers::{
    baidu::BaiduProvider, bing::BingProvider, caiyun::CaiyunProvider, deepl::DeeplProvider,
    google::GoogleProvider, linguee::LingueeProvider, tencent::TencentProvider,
    youdao::YoudaoProvider,
};
use crate::infrastructure::storage::kv::KvStore;
use dashmap::DashMap;
use reqwest::Client;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<DashMap<String, LookupResult>>,
    pub config: Arc<Config>,
    pub http_client: Client,
    pub store: Arc<KvStore>,
    pub locale: Arc<LocaleResolver>,
    pub providers: Vec<Arc<dyn TranslateProvider>>,
    /// Resolves `auto` source languages through Tencent's LanguageDetect.
    /// Present only when Tencent credentials are configured.
    pub detector: Option<Arc<TencentProvider>>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, FyError> {
        let http_client = create_client(config.http_proxy.as_deref())?;
        let store = Arc::new(KvStore::open_default());
        let locale = Arc::new(LocaleResolver::new(http_client.clone(), store.clone()));
        let providers = build_providers(&config, &http_client, &locale, &store);
        let detector = match (&config.tencent.secret_id, &config.tencent.secret_key) {
            (Some(id), Some(key)) => Some(Arc::new(TencentProvider::new(
                http_client.clone(),
                id.clone(),
                key.clone(),
            ))),
            _ => None,
        };

        Ok(Self {
            cache: Arc::new(DashMap::new()),
            config: Arc::new(config),
            http_client,
            store,
            locale,
            providers,
            detector,
        })
    }
}

/// Keyed providers join only when credentials are configured; keyless
/// ones join unless disabled.
fn build_providers(
    config: &Config,
    client: &Client,
    locale: &Arc<LocaleResolver>,
    store: &Arc<KvStore>,
) -> Vec<Arc<dyn TranslateProvider>> {
    let mut providers: Vec<Arc<dyn TranslateProvider>> = Vec::new();

    if let (Some(app_id), Some(app_secret)) =
        (config.youdao.app_id.clone(), config.youdao.app_secret.clone())
    {
        providers.push(Arc::new(YoudaoProvider::new(
            client.clone(),
            app_id,
            app_secret,
        )));
    }
    if config.deepl.enable {
        providers.push(Arc::new(DeeplProvider::new(client.clone())));
    }
    if config.google.enable {
        providers.push(Arc::new(GoogleProvider::new(client.clone(), locale.clone())));
    }
    if config.bing.enable {
        providers.push(Arc::new(BingProvider::new(
            client.clone(),
            locale.clone(),
            store.clone(),
        )));
    }
    if let (Some(app_id), Some(app_secret)) =
        (config.baidu.app_id.clone(), config.baidu.app_secret.clone())
    {
        providers.push(Arc::new(BaiduProvider::new(
            client.clone(),
            app_id,
            app_secret,
        )));
    }
    if let (Some(secret_id), Some(secret_key)) =
        (config.tencent.secret_id.clone(), config.tencent.secret_key.clone())
    {
        providers.push(Arc::new(TencentProvider::new(
            client.clone(),
            secret_id,
            secret_key,
        )));
    }
    if let Some(token) = config.caiyun.token.clone() {
        providers.push(Arc::new(CaiyunProvider::new(client.clone(), token)));
    }
    if config.linguee.enable {
        providers.push(Arc::new(LingueeProvider::new(client.clone())));
    }

    providers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyless_providers_join_by_default() {
        let state = AppState::new(Config::default()).unwrap();
        let names: Vec<_> = state.providers.iter().map(|p| p.kind().name()).collect();
        assert_eq!(names, vec!["DeepL", "Google", "Bing", "Linguee"]);
        assert!(state.detector.is_none());
    }

    #[test]
    fn credentials_enable_keyed_providers() {
        let mut config = Config::default();
        config.youdao.app_id = Some("id".to_string());
        config.youdao.app_secret = Some("secret".to_string());
        config.caiyun.token = Some("token".to_string());
        let state = AppState::new(config).unwrap();
        let names: Vec<_> = state.providers.iter().map(|p| p.kind().name()).collect();
        assert!(names.contains(&"Youdao"));
        assert!(names.contains(&"Caiyun"));
        assert!(!names.contains(&"Baidu"));
    }

    #[test]
    fn tencent_credentials_enable_language_detection() {
        let mut config = Config::default();
        config.tencent.secret_id = Some("id".to_string());
        config.tencent.secret_key = Some("key".to_string());
        let state = AppState::new(config).unwrap();
        assert!(state.detector.is_some());
        let names: Vec<_> = state.providers.iter().map(|p| p.kind().name()).collect();
        assert!(names.contains(&"Tencent"));
    }
}
