//! Tests for the forged DeepL web-client request shape.

use fy::infrastructure::network::providers::deepl::{build_body, forge_timestamp, method_spacing};

#[test]
fn forged_timestamp_is_a_multiple_of_i_count_plus_one() {
    for (text, now) in [
        ("hi", 1_700_000_000_123u64),
        ("virtuellement", 1_700_000_000_123),
        ("no dotted letters", 1_700_000_000_124),
        ("", 1_700_000_000_125),
    ] {
        let n = text.matches('i').count() as u64 + 1;
        let forged = forge_timestamp(text, now);
        assert_eq!(forged % n, 0);
        assert!(now - forged < n);
    }
}

#[test]
fn method_spacing_follows_id_congruences() {
    // (10 + 3) % 13 == 0
    assert_eq!(method_spacing(10), "\"method\" : \"");
    // (24 + 5) % 29 == 0
    assert_eq!(method_spacing(24), "\"method\" : \"");
    // Neither congruence holds.
    assert_eq!(method_spacing(11), "\"method\": \"");
}

#[test]
fn body_is_valid_json_with_patched_method_key() {
    let body = build_body("good", "auto", "ZH", 10, 1_700_000_000_000);
    assert!(body.contains("\"method\" : \"LMT_handle_texts\""));

    let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(parsed["jsonrpc"], "2.0");
    assert_eq!(parsed["method"], "LMT_handle_texts");
    assert_eq!(parsed["id"], 10);
    assert_eq!(parsed["params"]["texts"][0]["text"], "good");
    assert_eq!(parsed["params"]["lang"]["target_lang"], "ZH");
    assert_eq!(parsed["params"]["lang"]["source_lang_user_selected"], "auto");
}

#[test]
fn body_uses_plain_spacing_for_other_ids() {
    let body = build_body("good", "EN", "ZH", 11, 1_700_000_000_000);
    assert!(body.contains("\"method\": \"LMT_handle_texts\""));
    assert!(!body.contains("\"method\" : \""));
}
