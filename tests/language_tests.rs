//! Language table and per-provider id mapping tests.

use fy::infrastructure::language;
use fy::infrastructure::network::providers::caiyun;

#[test]
fn canonical_ids_resolve() {
    for id in ["auto", "zh-CHS", "zh-CHT", "en", "ja", "ko", "fr", "de", "ru"] {
        assert!(language::lookup(id).is_some(), "missing {}", id);
    }
    assert!(language::lookup("klingon").is_none());
}

#[test]
fn baidu_ids_fall_back_to_auto() {
    assert_eq!(language::baidu_id("zh-CHS"), "zh");
    assert_eq!(language::baidu_id("ja"), "jp");
    assert_eq!(language::baidu_id("klingon"), "auto");
}

#[test]
fn partial_tables_return_none_for_unsupported() {
    assert_eq!(language::tencent_id("zh-CHS"), Some("zh"));
    assert!(language::tencent_id("klingon").is_none());
    assert_eq!(language::deepl_id("zh-CHS"), Some("ZH"));
    assert!(language::deepl_id("auto").is_none());
}

#[test]
fn bing_auto_maps_to_auto_detect() {
    assert_eq!(language::bing_id("auto"), "auto-detect");
    assert_eq!(language::bing_id("zh-CHS"), "zh-Hans");
}

#[test]
fn caiyun_supports_exactly_four_directions() {
    assert_eq!(caiyun::trans_type("zh-CHS", "en").as_deref(), Some("zh2en"));
    assert_eq!(caiyun::trans_type("zh-CHS", "ja").as_deref(), Some("zh2ja"));
    assert_eq!(caiyun::trans_type("en", "zh-CHS").as_deref(), Some("en2zh"));
    assert_eq!(caiyun::trans_type("ja", "zh-CHS").as_deref(), Some("ja2zh"));

    assert!(caiyun::trans_type("auto", "zh-CHS").is_none());
    assert!(caiyun::trans_type("en", "ja").is_none());
    assert!(caiyun::trans_type("fr", "zh-CHS").is_none());
}
