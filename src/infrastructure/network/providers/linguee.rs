//! Linguee dictionary adapter.
//!
//! Linguee has no API; the search page is fetched and lemma blocks are
//! pulled out with pattern matches. The extraction is deliberately kept
//! behind `parse_linguee_html` so it can be replaced by a structured
//! HTML parser without touching the adapter control flow.

use crate::domain::error::{ProviderError, ProviderErrorKind};
use crate::domain::model::{
    LingueeExample, LingueeExplanation, LingueePayload, LingueeWordItem, ProviderKind,
    ProviderPayload, QueryWordInfo,
};
use crate::domain::traits::TranslateProvider;
use crate::infrastructure::network::providers::race_cancel;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use tokio_util::sync::CancellationToken;
use tracing::debug;

static DICT_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<a[^>]*class="dictLink[^"]*"[^>]*>(.*?)</a>"#).unwrap());
static WORD_TYPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<span class="tag_wordtype"[^>]*>(.*?)</span>"#).unwrap());
static USAGE_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<span class="tag_usage"[^>]*>(.*?)</span>"#).unwrap());
static EXAMPLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<span class="tag_s"[^>]*>(.*?)</span>.*?<span class="tag_t"[^>]*>(.*?)</span>"#)
        .unwrap()
});
static RELATED_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?s)<div class="related_words[^"]*">(.*?)</div>"#).unwrap());
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"</?[^>]+>").unwrap());

fn strip_tags(fragment: &str) -> String {
    TAG.replace_all(fragment, "").trim().to_string()
}

fn linguee_language(youdao_id: &str) -> Option<&'static str> {
    match youdao_id {
        "en" => Some("english"),
        "zh-CHS" => Some("chinese"),
        "fr" => Some("french"),
        "de" => Some("german"),
        "es" => Some("spanish"),
        "it" => Some("italian"),
        "pt" => Some("portuguese"),
        "ja" => Some("japanese"),
        "ru" => Some("russian"),
        _ => None,
    }
}

/// Reduce the search page to the dictionary model: lemma word items with
/// their translations, example sentence pairs and related words.
pub fn parse_linguee_html(html: &str) -> LingueePayload {
    let mut payload = LingueePayload::default();

    const LEMMA_MARKER: &str = "<div class=\"lemma";

    for block in html.split(LEMMA_MARKER).skip(1) {
        // A lemma block runs until the next non-lemma section.
        let end = ["<div class=\"example", "<div class=\"related_words"]
            .iter()
            .filter_map(|marker| block.find(marker))
            .min()
            .unwrap_or(block.len());
        let block = &block[..end];
        let mut links = DICT_LINK.captures_iter(block);
        let Some(word) = links.next().map(|c| strip_tags(&c[1])) else {
            continue;
        };
        let mut word_types = WORD_TYPE.captures_iter(block).map(|c| strip_tags(&c[1]));
        let pos = word_types.next().unwrap_or_default();
        let mut usage_tags = USAGE_TAG.captures_iter(block).map(|c| strip_tags(&c[1]));

        let explanations = links
            .map(|c| LingueeExplanation {
                explanation: strip_tags(&c[1]),
                pos: word_types.next().unwrap_or_default(),
                tag: usage_tags.next(),
            })
            .collect::<Vec<_>>();
        if explanations.is_empty() {
            continue;
        }
        payload.word_items.push(LingueeWordItem {
            word,
            pos,
            explanations,
        });
    }

    payload.examples = EXAMPLE
        .captures_iter(html)
        .map(|c| LingueeExample {
            example: strip_tags(&c[1]),
            translation: strip_tags(&c[2]),
        })
        .collect();

    if let Some(related) = RELATED_BLOCK.captures(html) {
        payload.related_words = DICT_LINK
            .captures_iter(&related[1])
            .map(|c| strip_tags(&c[1]))
            .collect();
    }

    payload
}

pub struct LingueeProvider {
    client: Client,
}

impl LingueeProvider {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TranslateProvider for LingueeProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Linguee
    }

    async fn translate(
        &self,
        query: &QueryWordInfo,
        cancel: &CancellationToken,
    ) -> Result<ProviderPayload, ProviderError> {
        let pair = linguee_language(&query.from_language)
            .zip(linguee_language(&query.to_language))
            .ok_or_else(|| {
                ProviderError::new(
                    ProviderKind::Linguee,
                    ProviderErrorKind::UnsupportedLanguagePair,
                    format!(
                        "linguee does not serve {} -> {}",
                        query.from_language, query.to_language
                    ),
                )
            })?;

        let url = format!("https://www.linguee.com/{}-{}/search", pair.0, pair.1);
        let request = self
            .client
            .get(&url)
            .query(&[("source", "auto"), ("query", query.word.as_str())])
            .send();
        let response = race_cancel(ProviderKind::Linguee, cancel, request).await?;
        let html = race_cancel(ProviderKind::Linguee, cancel, response.text()).await?;
        debug!("linguee page length: {}", html.len());

        Ok(ProviderPayload::Linguee(parse_linguee_html(&html)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r##"
        <div class="lemma featured">
          <span class="tag_lemma"><a class="dictLink" href="#">good</a></span>
          <span class="tag_wordtype">adjective</span>
          <span class="translation">
            <a class="dictLink featured" href="#">好的</a>
            <span class="tag_wordtype">adj</span>
            <span class="tag_usage">(often used)</span>
          </span>
          <span class="translation">
            <a class="dictLink" href="#">良好的</a>
            <span class="tag_wordtype">adj</span>
          </span>
        </div>
        <div class="example">
          <span class="tag_s">a good idea</span>
          <span class="tag_t">一个好主意</span>
        </div>
        <div class="related_words"><a class="dictLink" href="#">goodness</a></div>
    "##;

    #[test]
    fn parses_lemma_with_explanations() {
        let payload = parse_linguee_html(SAMPLE);
        assert_eq!(payload.word_items.len(), 1);
        let item = &payload.word_items[0];
        assert_eq!(item.word, "good");
        assert_eq!(item.pos, "adjective");
        assert_eq!(item.explanations.len(), 2);
        assert_eq!(item.explanations[0].explanation, "好的");
        assert_eq!(item.explanations[0].tag.as_deref(), Some("(often used)"));
        assert_eq!(item.explanations[1].explanation, "良好的");
    }

    #[test]
    fn parses_examples_and_related_words() {
        let payload = parse_linguee_html(SAMPLE);
        assert_eq!(payload.examples.len(), 1);
        assert_eq!(payload.examples[0].example, "a good idea");
        assert_eq!(payload.examples[0].translation, "一个好主意");
        assert_eq!(payload.related_words, vec!["goodness"]);
    }

    #[test]
    fn consecutive_lemma_blocks_all_parse() {
        let html = r#"
            <div class="lemma"><a class="dictLink">good</a>
              <span class="tag_wordtype">adj</span>
              <a class="dictLink">好的</a><span class="tag_wordtype">adj</span>
            </div>
            <div class="lemma"><a class="dictLink">goods</a>
              <span class="tag_wordtype">noun</span>
              <a class="dictLink">货物</a><span class="tag_wordtype">n</span>
            </div>
        "#;
        let payload = parse_linguee_html(html);
        assert_eq!(payload.word_items.len(), 2);
        assert_eq!(payload.word_items[1].word, "goods");
        assert_eq!(payload.word_items[1].explanations[0].explanation, "货物");
    }

    #[test]
    fn empty_page_yields_empty_payload() {
        let payload = parse_linguee_html("<html><body>no results</body></html>");
        assert!(payload.word_items.is_empty());
        assert!(payload.examples.is_empty());
        assert!(payload.related_words.is_empty());
    }

    #[test]
    fn language_pair_requires_linguee_support() {
        assert_eq!(linguee_language("en"), Some("english"));
        assert_eq!(linguee_language("ko"), None);
    }
}
