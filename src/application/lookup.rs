use crate::domain::model::{LookupResult, ProviderResponse, QueryWordInfo};
use crate::infrastructure::language;
use crate::presentation::display::build_sections;
use crate::state::AppState;
use chrono::Utc;
use futures_util::future::join_all;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

fn cache_key(text: &str, from: &str, to: &str) -> String {
    format!("{}:{}:{}", from, to, text)
}

/// Fan a lookup out over every configured provider and assemble the
/// display sections. Individual provider failures are collected, never
/// propagated: the lookup completes with whatever subset succeeded.
pub async fn lookup(
    state: &AppState,
    text: &str,
    from: &str,
    to: &str,
    no_cache: bool,
    provider_filter: Option<&[String]>,
    cancel: &CancellationToken,
) -> LookupResult {
    let key = cache_key(text, from, to);
    if !no_cache && provider_filter.is_none() {
        if let Some(cached) = state.cache.get(&key) {
            return cached.clone();
        }
    }

    let from = match from {
        "auto" => resolve_auto_source(state, text, cancel)
            .await
            .unwrap_or_else(|| from.to_string()),
        _ => from.to_string(),
    };
    let query = QueryWordInfo::new(text, from, to);

    let providers = state.providers.iter().filter(|p| match provider_filter {
        Some(names) => names
            .iter()
            .any(|n| n.eq_ignore_ascii_case(p.kind().name())),
        None => true,
    });

    let futures = providers.map(|provider| {
        let query = &query;
        async move {
            let result = provider.translate(query, cancel).await;
            if let Err(e) = &result {
                warn!("{e}");
            }
            ProviderResponse {
                provider: provider.kind(),
                result,
            }
        }
    });
    let responses = join_all(futures).await;

    let sections = build_sections(&query, &responses);
    let mut result = LookupResult {
        query,
        responses,
        sections,
        cached_at: None,
    };

    let any_success = result.responses.iter().any(|r| r.result.is_ok());
    if !no_cache && provider_filter.is_none() && any_success {
        result.cached_at = Some(Utc::now().timestamp());
        state.cache.insert(key, result.clone());
    }

    result
}

/// Pin down an `auto` source through Tencent's LanguageDetect when
/// credentials are configured. `None` keeps `auto`, leaving detection to
/// each provider's own auto mode.
async fn resolve_auto_source(
    state: &AppState,
    text: &str,
    cancel: &CancellationToken,
) -> Option<String> {
    let detector = state.detector.as_ref()?;
    match detector.detect_language(text, cancel).await {
        Ok(lang) => {
            debug!("detected source language: {lang}");
            language::from_tencent_id(&lang).map(str::to_string)
        }
        Err(e) => {
            warn!("{e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_key_separates_directions() {
        assert_ne!(cache_key("good", "en", "zh-CHS"), cache_key("good", "zh-CHS", "en"));
        assert_eq!(cache_key("good", "en", "zh-CHS"), "en:zh-CHS:good");
    }
}
