use serde::{Deserialize, Serialize};

/// Identifies one upstream translation/dictionary service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderKind {
    Youdao,
    Deepl,
    Google,
    Bing,
    Baidu,
    Tencent,
    Caiyun,
    Linguee,
}

/// Fixed priority used when assembling display sections.
pub const PROVIDER_PRIORITY: [ProviderKind; 8] = [
    ProviderKind::Youdao,
    ProviderKind::Deepl,
    ProviderKind::Google,
    ProviderKind::Bing,
    ProviderKind::Baidu,
    ProviderKind::Tencent,
    ProviderKind::Caiyun,
    ProviderKind::Linguee,
];

impl ProviderKind {
    pub fn name(&self) -> &'static str {
        match self {
            ProviderKind::Youdao => "Youdao",
            ProviderKind::Deepl => "DeepL",
            ProviderKind::Google => "Google",
            ProviderKind::Bing => "Bing",
            ProviderKind::Baidu => "Baidu",
            ProviderKind::Tencent => "Tencent",
            ProviderKind::Caiyun => "Caiyun",
            ProviderKind::Linguee => "Linguee",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The normalized query. Built once per lookup, never mutated afterwards;
/// all adapters derive their request parameters from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryWordInfo {
    pub word: String,
    /// Canonical (Youdao-convention) language ids. Every other provider's
    /// code is derived from these via the language table.
    pub from_language: String,
    pub to_language: String,
    pub phonetic: Option<String>,
    pub is_word: Option<bool>,
    pub exam_types: Option<Vec<String>>,
    pub speech_url: Option<String>,
}

impl QueryWordInfo {
    pub fn new(word: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            from_language: from.into(),
            to_language: to.into(),
            phonetic: None,
            is_word: None,
            exam_types: None,
            speech_url: None,
        }
    }
}

/// `key: values` pair as Youdao reports web translations and phrases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyValues {
    pub key: String,
    pub values: Vec<String>,
}

/// A word form, e.g. 复数 goods, 比较级 better.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordForm {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct YoudaoPayload {
    pub translations: Vec<String>,
    pub phonetic: Option<String>,
    pub us_phonetic: Option<String>,
    pub uk_phonetic: Option<String>,
    pub explanations: Vec<String>,
    pub forms: Vec<WordForm>,
    pub exam_types: Option<Vec<String>>,
    pub web_translation: Option<KeyValues>,
    pub web_phrases: Vec<KeyValues>,
    pub is_word: bool,
    pub speech_url: Option<String>,
    /// Direction the service resolved, e.g. "en2zh-CHS".
    pub language_direction: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaiduPayload {
    pub translations: Vec<String>,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TencentPayload {
    pub translation: String,
    pub source: String,
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaiyunPayload {
    pub translations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GooglePayload {
    pub translation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BingPayload {
    pub translations: Vec<String>,
    pub detected_language: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeeplPayload {
    pub translations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct LingueePayload {
    pub word_items: Vec<LingueeWordItem>,
    pub examples: Vec<LingueeExample>,
    pub related_words: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LingueeWordItem {
    pub word: String,
    /// Part of speech, e.g. noun, verb, adj.
    pub pos: String,
    pub explanations: Vec<LingueeExplanation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LingueeExplanation {
    pub explanation: String,
    pub pos: String,
    /// Usage tag, e.g. (often used), (almost always used).
    pub tag: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LingueeExample {
    pub example: String,
    pub translation: String,
}

/// One typed variant per provider. Parsing code validates shape up front
/// and maps mismatches to a parse failure instead of poking optional
/// chains into dynamic JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProviderPayload {
    Youdao(YoudaoPayload),
    Baidu(BaiduPayload),
    Tencent(TencentPayload),
    Caiyun(CaiyunPayload),
    Google(GooglePayload),
    Bing(BingPayload),
    Deepl(DeeplPayload),
    Linguee(LingueePayload),
}

impl ProviderPayload {
    /// Plain one-line translations, used for the primary display section.
    pub fn plain_translations(&self) -> Vec<String> {
        match self {
            ProviderPayload::Youdao(p) => p.translations.clone(),
            ProviderPayload::Baidu(p) => p.translations.clone(),
            ProviderPayload::Tencent(p) => {
                if p.translation.is_empty() {
                    Vec::new()
                } else {
                    vec![p.translation.clone()]
                }
            }
            ProviderPayload::Caiyun(p) => p.translations.clone(),
            ProviderPayload::Google(p) => {
                if p.translation.is_empty() {
                    Vec::new()
                } else {
                    vec![p.translation.clone()]
                }
            }
            ProviderPayload::Bing(p) => p.translations.clone(),
            ProviderPayload::Deepl(p) => p.translations.clone(),
            // Linguee is a dictionary, it has no one-line translation.
            ProviderPayload::Linguee(_) => Vec::new(),
        }
    }
}

/// Settled outcome of one adapter invocation.
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    pub provider: ProviderKind,
    pub result: Result<ProviderPayload, crate::domain::error::ProviderError>,
}

/// Aggregate outcome of one lookup: the settled provider results plus
/// the normalized sections built from them.
#[derive(Debug, Clone)]
pub struct LookupResult {
    pub query: QueryWordInfo,
    pub responses: Vec<ProviderResponse>,
    pub sections: Vec<DisplaySection>,
    pub cached_at: Option<i64>,
}

/// Display-type tag carried by every rendered item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayType {
    Translation,
    Explanation,
    Forms,
    WebTranslation,
    WebPhrase,
    WordItem,
    Example,
    RelatedWord,
}

impl DisplayType {
    pub fn label(&self) -> &'static str {
        match self {
            DisplayType::Translation => "Translation",
            DisplayType::Explanation => "Explanation",
            DisplayType::Forms => "Forms",
            DisplayType::WebTranslation => "Web Translation",
            DisplayType::WebPhrase => "Web Phrase",
            DisplayType::WordItem => "Word Item",
            DisplayType::Example => "Example",
            DisplayType::RelatedWord => "Related Word",
        }
    }
}

/// One row in the rendered output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayItem {
    pub display_type: DisplayType,
    pub title: String,
    pub subtitle: Option<String>,
    pub tooltip: String,
    pub copy_text: String,
    /// Back-reference to the originating query.
    pub query: QueryWordInfo,
}

/// An ordered group of display items, optionally titled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplaySection {
    pub provider: ProviderKind,
    pub title: Option<String>,
    pub items: Vec<DisplayItem>,
}
