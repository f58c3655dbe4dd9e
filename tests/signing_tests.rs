//! Request signing tests for the keyed providers.

use fy::infrastructure::network::providers::{baidu, tencent, youdao};

#[test]
fn youdao_short_input_is_kept_whole() {
    assert_eq!(youdao::truncate("good"), "good");
    assert_eq!(youdao::truncate(&"x".repeat(20)), "x".repeat(20));
}

#[test]
fn youdao_long_input_truncates_around_length() {
    let text: String = ('a'..='z').collect();
    let truncated = youdao::truncate(&text);
    assert_eq!(truncated, format!("abcdefghij{}qrstuvwxyz", text.chars().count()));
}

#[test]
fn youdao_truncation_counts_characters_not_bytes() {
    let text = "好".repeat(21);
    let truncated = youdao::truncate(&text);
    assert_eq!(truncated, format!("{}21{}", "好".repeat(10), "好".repeat(10)));
}

#[test]
fn youdao_sign_is_lowercase_sha256_hex() {
    let sign = youdao::sign("appid", "good", "1700000000", "1700000000", "secret");
    assert_eq!(sign.len(), 64);
    assert!(sign.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    // Deterministic for identical inputs.
    assert_eq!(
        sign,
        youdao::sign("appid", "good", "1700000000", "1700000000", "secret")
    );
}

#[test]
fn youdao_sign_depends_on_every_component() {
    let base = youdao::sign("appid", "good", "1", "1", "secret");
    assert_ne!(base, youdao::sign("appid2", "good", "1", "1", "secret"));
    assert_ne!(base, youdao::sign("appid", "bad", "1", "1", "secret"));
    assert_ne!(base, youdao::sign("appid", "good", "2", "1", "secret"));
    assert_ne!(base, youdao::sign("appid", "good", "1", "1", "secret2"));
}

#[test]
fn baidu_sign_is_md5_of_concatenation() {
    // md5("appidgood12345secret")
    let sign = baidu::sign("appid", "good", "12345", "secret");
    assert_eq!(sign.len(), 32);
    assert_eq!(sign, format!("{:x}", md5::compute("appidgood12345secret")));
}

#[test]
fn tencent_authorization_carries_scope_and_signed_headers() {
    // 2023-09-15 (UTC) in seconds.
    let auth = tencent::authorization("AKIDexample", "key", r#"{"SourceText":"good"}"#, 1694736000);
    assert!(auth.starts_with("TC3-HMAC-SHA256 Credential=AKIDexample/2023-09-15/tmt/tc3_request, "));
    assert!(auth.contains("SignedHeaders=content-type;host, Signature="));
    let signature = auth.rsplit('=').next().unwrap();
    assert_eq!(signature.len(), 64);
}

#[test]
fn tencent_signature_changes_with_payload() {
    let a = tencent::authorization("id", "key", r#"{"SourceText":"good"}"#, 1694736000);
    let b = tencent::authorization("id", "key", r#"{"SourceText":"bad"}"#, 1694736000);
    assert_ne!(a, b);
}
