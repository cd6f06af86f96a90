use super::*;

#[test]
fn defaults_match_documented_values() {
    let cfg = ClientConfig::default();
    assert!(cfg.endpoint.ends_with("gemini-2.0-flash:generateContent"));
    assert_eq!(cfg.timeout(), Duration::from_secs(15));
    assert_eq!(cfg.max_attempts, 3);
    cfg.validate().unwrap();

    let policy = cfg.retry_policy();
    assert_eq!(policy.base_delay, Duration::from_secs(1));
    assert_eq!(policy.max_jitter, Duration::from_secs(1));
}

#[test]
fn partial_json_keeps_other_defaults() {
    let cfg = ClientConfig::from_reader(r#"{"max_attempts": 5}"#.as_bytes()).unwrap();
    assert_eq!(cfg.max_attempts, 5);
    assert_eq!(cfg.timeout_ms, 15_000);
}

#[test]
fn invalid_configs_are_rejected() {
    for json in [
        r#"{"max_attempts": 0}"#,
        r#"{"timeout_ms": 0}"#,
        r#"{"endpoint": "ftp://example.com"}"#,
        r#"{"endpoint": "nope"}"#,
    ] {
        assert!(ClientConfig::from_reader(json.as_bytes()).is_err(), "{json}");
    }
    assert!(matches!(
        ClientConfig::from_reader("{".as_bytes()),
        Err(LuminaError::Serde(_))
    ));
}

#[test]
fn missing_file_is_a_validation_error() {
    let err = ClientConfig::from_path("/definitely/not/here.json").unwrap_err();
    assert!(err.to_string().contains("open client config"));
}
