//! Language code table.
//!
//! The Youdao id is the hub of the code space: every other provider's id
//! is derived from it through this one-way table, never the reverse.

/// One language with all provider-specific spellings of its code.
/// `None` means the provider does not support the language at all; the
/// adapter then fails fast instead of issuing a doomed request.
#[derive(Debug, Clone, Copy)]
pub struct LanguageItem {
    pub youdao_id: &'static str,
    pub english_name: &'static str,
    pub baidu_id: Option<&'static str>,
    pub tencent_id: Option<&'static str>,
    pub caiyun_id: Option<&'static str>,
    pub google_id: Option<&'static str>,
    pub bing_id: Option<&'static str>,
    pub deepl_id: Option<&'static str>,
}

const LANGUAGES: &[LanguageItem] = &[
    LanguageItem {
        youdao_id: "auto",
        english_name: "Auto",
        baidu_id: Some("auto"),
        tencent_id: Some("auto"),
        caiyun_id: Some("auto"),
        google_id: Some("auto"),
        bing_id: Some("auto-detect"),
        deepl_id: None,
    },
    LanguageItem {
        youdao_id: "zh-CHS",
        english_name: "Chinese-Simplified",
        baidu_id: Some("zh"),
        tencent_id: Some("zh"),
        caiyun_id: Some("zh"),
        google_id: Some("zh-CN"),
        bing_id: Some("zh-Hans"),
        deepl_id: Some("ZH"),
    },
    LanguageItem {
        youdao_id: "zh-CHT",
        english_name: "Chinese-Traditional",
        baidu_id: Some("cht"),
        tencent_id: Some("zh-TW"),
        caiyun_id: None,
        google_id: Some("zh-TW"),
        bing_id: Some("zh-Hant"),
        deepl_id: None,
    },
    LanguageItem {
        youdao_id: "en",
        english_name: "English",
        baidu_id: Some("en"),
        tencent_id: Some("en"),
        caiyun_id: Some("en"),
        google_id: Some("en"),
        bing_id: Some("en"),
        deepl_id: Some("EN"),
    },
    LanguageItem {
        youdao_id: "ja",
        english_name: "Japanese",
        baidu_id: Some("jp"),
        tencent_id: Some("ja"),
        caiyun_id: Some("ja"),
        google_id: Some("ja"),
        bing_id: Some("ja"),
        deepl_id: Some("JA"),
    },
    LanguageItem {
        youdao_id: "ko",
        english_name: "Korean",
        baidu_id: Some("kor"),
        tencent_id: Some("ko"),
        caiyun_id: None,
        google_id: Some("ko"),
        bing_id: Some("ko"),
        deepl_id: None,
    },
    LanguageItem {
        youdao_id: "fr",
        english_name: "French",
        baidu_id: Some("fra"),
        tencent_id: Some("fr"),
        caiyun_id: None,
        google_id: Some("fr"),
        bing_id: Some("fr"),
        deepl_id: Some("FR"),
    },
    LanguageItem {
        youdao_id: "es",
        english_name: "Spanish",
        baidu_id: Some("spa"),
        tencent_id: Some("es"),
        caiyun_id: None,
        google_id: Some("es"),
        bing_id: Some("es"),
        deepl_id: Some("ES"),
    },
    LanguageItem {
        youdao_id: "pt",
        english_name: "Portuguese",
        baidu_id: Some("pt"),
        tencent_id: Some("pt"),
        caiyun_id: None,
        google_id: Some("pt"),
        bing_id: Some("pt"),
        deepl_id: Some("PT"),
    },
    LanguageItem {
        youdao_id: "it",
        english_name: "Italian",
        baidu_id: Some("it"),
        tencent_id: Some("it"),
        caiyun_id: None,
        google_id: Some("it"),
        bing_id: Some("it"),
        deepl_id: Some("IT"),
    },
    LanguageItem {
        youdao_id: "ru",
        english_name: "Russian",
        baidu_id: Some("ru"),
        tencent_id: Some("ru"),
        caiyun_id: None,
        google_id: Some("ru"),
        bing_id: Some("ru"),
        deepl_id: Some("RU"),
    },
    LanguageItem {
        youdao_id: "de",
        english_name: "German",
        baidu_id: Some("de"),
        tencent_id: Some("de"),
        caiyun_id: None,
        google_id: Some("de"),
        bing_id: Some("de"),
        deepl_id: Some("DE"),
    },
    LanguageItem {
        youdao_id: "ar",
        english_name: "Arabic",
        baidu_id: Some("ara"),
        tencent_id: Some("ar"),
        caiyun_id: None,
        google_id: Some("ar"),
        bing_id: Some("ar"),
        deepl_id: None,
    },
    LanguageItem {
        youdao_id: "th",
        english_name: "Thai",
        baidu_id: Some("th"),
        tencent_id: Some("th"),
        caiyun_id: None,
        google_id: Some("th"),
        bing_id: Some("th"),
        deepl_id: None,
    },
    LanguageItem {
        youdao_id: "vi",
        english_name: "Vietnamese",
        baidu_id: Some("vie"),
        tencent_id: Some("vi"),
        caiyun_id: None,
        google_id: Some("vi"),
        bing_id: Some("vi"),
        deepl_id: None,
    },
];

/// Look up a language by its canonical (Youdao) id. Total: an unknown id
/// is a representable absence, not an error.
pub fn lookup(youdao_id: &str) -> Option<&'static LanguageItem> {
    LANGUAGES.iter().find(|item| item.youdao_id == youdao_id)
}

/// Baidu id, falling back to Baidu's own auto-detect for unknown ids.
pub fn baidu_id(youdao_id: &str) -> &'static str {
    lookup(youdao_id).and_then(|l| l.baidu_id).unwrap_or("auto")
}

/// Tencent id. `None` when Tencent cannot express the language, which
/// callers must treat as an unsupported pair.
pub fn tencent_id(youdao_id: &str) -> Option<&'static str> {
    lookup(youdao_id).and_then(|l| l.tencent_id)
}

/// Caiyun id. `None` when Caiyun cannot express the language.
pub fn caiyun_id(youdao_id: &str) -> Option<&'static str> {
    lookup(youdao_id).and_then(|l| l.caiyun_id)
}

/// Google id, falling back to the canonical id itself (Google's web
/// endpoint accepts most ISO codes unchanged).
pub fn google_id(youdao_id: &str) -> &'static str {
    match lookup(youdao_id) {
        Some(item) => item.google_id.unwrap_or(item.youdao_id),
        None => "auto",
    }
}

/// Bing id, falling back to auto-detect.
pub fn bing_id(youdao_id: &str) -> &'static str {
    lookup(youdao_id)
        .and_then(|l| l.bing_id)
        .unwrap_or("auto-detect")
}

/// DeepL id. `None` when DeepL cannot express the language.
pub fn deepl_id(youdao_id: &str) -> Option<&'static str> {
    lookup(youdao_id).and_then(|l| l.deepl_id)
}

/// Reverse-map a Tencent detection result onto the canonical id.
pub fn from_tencent_id(tencent_id: &str) -> Option<&'static str> {
    LANGUAGES
        .iter()
        .find(|item| item.tencent_id == Some(tencent_id))
        .map(|item| item.youdao_id)
}
