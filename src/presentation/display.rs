//! Result normalization.
//!
//! Turns whatever subset of providers settled — successes, failures,
//! empty payloads — into one ordered sequence of display sections.
//! Failures and empty results simply contribute nothing; they can never
//! drop another provider's sections.

use crate::domain::model::{
    DisplayItem, DisplaySection, DisplayType, ProviderKind, ProviderPayload, ProviderResponse,
    QueryWordInfo, YoudaoPayload, PROVIDER_PRIORITY,
};

const DETAILS_TITLE: &str = "Details";

/// Assemble display sections from settled provider results.
///
/// Translation sections come first, in fixed provider priority order;
/// provider-specific rich content follows under one "Details" heading.
/// Deterministic: the same settled set always yields identical sections.
pub fn build_sections(
    query: &QueryWordInfo,
    responses: &[ProviderResponse],
) -> Vec<DisplaySection> {
    let payload_for = |kind: ProviderKind| {
        responses
            .iter()
            .find(|r| r.provider == kind)
            .and_then(|r| r.result.as_ref().ok())
    };

    // Youdao's dictionary response enriches the query with phonetic and
    // word metadata; every item references the enriched form.
    let query = match payload_for(ProviderKind::Youdao) {
        Some(ProviderPayload::Youdao(p)) => enrich_query(query, p),
        _ => query.clone(),
    };

    let mut sections = Vec::new();

    for kind in PROVIDER_PRIORITY {
        let Some(payload) = payload_for(kind) else {
            continue;
        };
        let translations = payload.plain_translations();
        if translations.is_empty() {
            continue;
        }
        let one_line = translations.join(" ");
        sections.push(DisplaySection {
            provider: kind,
            title: Some(kind.name().to_string()),
            items: vec![DisplayItem {
                display_type: DisplayType::Translation,
                title: one_line.clone(),
                subtitle: query
                    .phonetic
                    .as_ref()
                    .filter(|_| kind == ProviderKind::Youdao)
                    .map(|p| format!("[{}]", p)),
                tooltip: "Translate".to_string(),
                copy_text: one_line,
                query: query.clone(),
            }],
        });
    }

    let mut details_title_pending = true;
    let mut next_title = |pending: &mut bool| {
        if *pending {
            *pending = false;
            Some(DETAILS_TITLE.to_string())
        } else {
            None
        }
    };

    if let Some(ProviderPayload::Youdao(payload)) = payload_for(ProviderKind::Youdao) {
        push_youdao_details(
            &mut sections,
            payload,
            &query,
            &mut details_title_pending,
            &mut next_title,
        );
    }
    if let Some(ProviderPayload::Linguee(payload)) = payload_for(ProviderKind::Linguee) {
        push_linguee_details(
            &mut sections,
            payload,
            &query,
            &mut details_title_pending,
            &mut next_title,
        );
    }

    sections
}

fn enrich_query(query: &QueryWordInfo, payload: &YoudaoPayload) -> QueryWordInfo {
    let mut query = query.clone();
    query.phonetic = payload
        .us_phonetic
        .clone()
        .or_else(|| payload.phonetic.clone());
    query.is_word = Some(payload.is_word);
    query.exam_types = payload.exam_types.clone();
    query.speech_url = payload.speech_url.clone();
    query
}

fn push_youdao_details(
    sections: &mut Vec<DisplaySection>,
    payload: &YoudaoPayload,
    query: &QueryWordInfo,
    pending: &mut bool,
    next_title: &mut impl FnMut(&mut bool) -> Option<String>,
) {
    for explanation in &payload.explanations {
        sections.push(DisplaySection {
            provider: ProviderKind::Youdao,
            title: next_title(pending),
            items: vec![DisplayItem {
                display_type: DisplayType::Explanation,
                title: explanation.clone(),
                subtitle: None,
                tooltip: DisplayType::Explanation.label().to_string(),
                copy_text: explanation.clone(),
                query: query.clone(),
            }],
        });
    }

    if !payload.forms.is_empty() {
        // [ 复数 goods   比较级 better   最高级 best ]
        let forms_text = payload
            .forms
            .iter()
            .map(|f| format!("{} {}", f.name, f.value))
            .collect::<Vec<_>>()
            .join("   ");
        sections.push(DisplaySection {
            provider: ProviderKind::Youdao,
            title: next_title(pending),
            items: vec![DisplayItem {
                display_type: DisplayType::Forms,
                title: String::new(),
                subtitle: Some(format!("[ {} ]", forms_text)),
                tooltip: DisplayType::Forms.label().to_string(),
                copy_text: forms_text,
                query: query.clone(),
            }],
        });
    }

    if let Some(web) = &payload.web_translation {
        let value = web.values.join("；");
        sections.push(DisplaySection {
            provider: ProviderKind::Youdao,
            title: next_title(pending),
            items: vec![DisplayItem {
                display_type: DisplayType::WebTranslation,
                title: web.key.clone(),
                subtitle: Some(value.clone()),
                tooltip: DisplayType::WebTranslation.label().to_string(),
                copy_text: format!("{} {}", web.key, value),
                query: query.clone(),
            }],
        });
    }

    for phrase in &payload.web_phrases {
        let value = phrase.values.join("；");
        sections.push(DisplaySection {
            provider: ProviderKind::Youdao,
            title: next_title(pending),
            items: vec![DisplayItem {
                display_type: DisplayType::WebPhrase,
                title: phrase.key.clone(),
                subtitle: Some(value.clone()),
                tooltip: DisplayType::WebPhrase.label().to_string(),
                copy_text: format!("{} {}", phrase.key, value),
                query: query.clone(),
            }],
        });
    }
}

fn push_linguee_details(
    sections: &mut Vec<DisplaySection>,
    payload: &crate::domain::model::LingueePayload,
    query: &QueryWordInfo,
    pending: &mut bool,
    next_title: &mut impl FnMut(&mut bool) -> Option<String>,
) {
    for item in &payload.word_items {
        let explanations = item
            .explanations
            .iter()
            .map(|e| e.explanation.clone())
            .collect::<Vec<_>>()
            .join("；");
        sections.push(DisplaySection {
            provider: ProviderKind::Linguee,
            title: next_title(pending),
            items: vec![DisplayItem {
                display_type: DisplayType::WordItem,
                title: format!("{} {}", item.word, item.pos).trim().to_string(),
                subtitle: Some(explanations.clone()),
                tooltip: DisplayType::WordItem.label().to_string(),
                copy_text: explanations,
                query: query.clone(),
            }],
        });
    }

    for example in &payload.examples {
        sections.push(DisplaySection {
            provider: ProviderKind::Linguee,
            title: next_title(pending),
            items: vec![DisplayItem {
                display_type: DisplayType::Example,
                title: example.example.clone(),
                subtitle: Some(example.translation.clone()),
                tooltip: DisplayType::Example.label().to_string(),
                copy_text: format!("{} {}", example.example, example.translation),
                query: query.clone(),
            }],
        });
    }

    if !payload.related_words.is_empty() {
        let related = payload.related_words.join("   ");
        sections.push(DisplaySection {
            provider: ProviderKind::Linguee,
            title: next_title(pending),
            items: vec![DisplayItem {
                display_type: DisplayType::RelatedWord,
                title: related.clone(),
                subtitle: None,
                tooltip: DisplayType::RelatedWord.label().to_string(),
                copy_text: related,
                query: query.clone(),
            }],
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::{ProviderError, ProviderErrorKind};
    use crate::domain::model::{GooglePayload, KeyValues, WordForm};

    fn youdao_ok(translations: Vec<&str>) -> ProviderResponse {
        ProviderResponse {
            provider: ProviderKind::Youdao,
            result: Ok(ProviderPayload::Youdao(YoudaoPayload {
                translations: translations.into_iter().map(String::from).collect(),
                ..YoudaoPayload::default()
            })),
        }
    }

    fn failing(provider: ProviderKind) -> ProviderResponse {
        ProviderResponse {
            provider,
            result: Err(ProviderError::new(
                provider,
                ProviderErrorKind::Network,
                "connection reset",
            )),
        }
    }

    #[test]
    fn single_success_yields_single_translation_section() {
        let query = QueryWordInfo::new("good", "en", "zh-CHS");
        let responses = vec![
            youdao_ok(vec!["好"]),
            failing(ProviderKind::Google),
            failing(ProviderKind::Bing),
            failing(ProviderKind::Deepl),
            failing(ProviderKind::Baidu),
        ];
        let sections = build_sections(&query, &responses);
        assert_eq!(sections.len(), 1);
        let section = &sections[0];
        assert_eq!(section.provider, ProviderKind::Youdao);
        assert_eq!(section.items[0].display_type, DisplayType::Translation);
        assert_eq!(section.items[0].title, "好");
        assert!(!sections
            .iter()
            .any(|s| s.title.as_deref() == Some("Details")));
    }

    #[test]
    fn assembly_is_deterministic() {
        let query = QueryWordInfo::new("good", "en", "zh-CHS");
        let responses = vec![
            youdao_ok(vec!["好"]),
            ProviderResponse {
                provider: ProviderKind::Google,
                result: Ok(ProviderPayload::Google(GooglePayload {
                    translation: "好的".to_string(),
                })),
            },
            failing(ProviderKind::Bing),
        ];
        let first = build_sections(&query, &responses);
        let second = build_sections(&query, &responses);
        assert_eq!(first, second);
    }

    #[test]
    fn failed_provider_never_drops_other_sections() {
        let query = QueryWordInfo::new("good", "en", "zh-CHS");
        let with_failures = vec![
            youdao_ok(vec!["好"]),
            failing(ProviderKind::Deepl),
            failing(ProviderKind::Tencent),
        ];
        let without_failures = vec![youdao_ok(vec!["好"])];
        assert_eq!(
            build_sections(&query, &with_failures),
            build_sections(&query, &without_failures)
        );
    }

    #[test]
    fn translation_sections_follow_provider_priority() {
        let query = QueryWordInfo::new("good", "en", "zh-CHS");
        // Deliberately out of priority order.
        let responses = vec![
            ProviderResponse {
                provider: ProviderKind::Google,
                result: Ok(ProviderPayload::Google(GooglePayload {
                    translation: "好的".to_string(),
                })),
            },
            youdao_ok(vec!["好"]),
        ];
        let sections = build_sections(&query, &responses);
        assert_eq!(sections[0].provider, ProviderKind::Youdao);
        assert_eq!(sections[1].provider, ProviderKind::Google);
    }

    #[test]
    fn empty_payload_contributes_nothing() {
        let query = QueryWordInfo::new("good", "en", "zh-CHS");
        let responses = vec![ProviderResponse {
            provider: ProviderKind::Google,
            result: Ok(ProviderPayload::Google(GooglePayload {
                translation: String::new(),
            })),
        }];
        assert!(build_sections(&query, &responses).is_empty());
    }

    #[test]
    fn youdao_details_render_under_one_heading() {
        let query = QueryWordInfo::new("good", "en", "zh-CHS");
        let payload = YoudaoPayload {
            translations: vec!["好".to_string()],
            phonetic: Some("ɡʊd".to_string()),
            explanations: vec!["adj. 好的".to_string(), "n. 好处".to_string()],
            forms: vec![WordForm {
                name: "复数".to_string(),
                value: "goods".to_string(),
            }],
            web_translation: Some(KeyValues {
                key: "good".to_string(),
                values: vec!["好".to_string(), "良好".to_string()],
            }),
            web_phrases: vec![KeyValues {
                key: "good morning".to_string(),
                values: vec!["早上好".to_string()],
            }],
            ..YoudaoPayload::default()
        };
        let responses = vec![ProviderResponse {
            provider: ProviderKind::Youdao,
            result: Ok(ProviderPayload::Youdao(payload)),
        }];
        let sections = build_sections(&query, &responses);

        // 1 translation + 2 explanations + forms + web translation + web phrase
        assert_eq!(sections.len(), 6);
        let details: Vec<_> = sections
            .iter()
            .filter(|s| s.title.as_deref() == Some("Details"))
            .collect();
        assert_eq!(details.len(), 1);
        assert_eq!(
            sections[1].items[0].display_type,
            DisplayType::Explanation
        );
        assert_eq!(sections[3].items[0].subtitle.as_deref(), Some("[ 复数 goods ]"));
        assert_eq!(sections[4].items[0].copy_text, "good 好；良好");
        // Enriched query flows into every item.
        assert_eq!(sections[0].items[0].query.phonetic.as_deref(), Some("ɡʊd"));
        assert_eq!(sections[0].items[0].subtitle.as_deref(), Some("[ɡʊd]"));
    }
}
