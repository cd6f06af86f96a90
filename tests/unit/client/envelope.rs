use serde_json::json;

use super::*;

#[test]
fn extract_text_takes_first_candidate_part() {
    let body = json!({
        "candidates": [
            { "content": { "parts": [{ "text": "first" }, { "text": "second" }] }, "finishReason": "STOP" },
            { "content": { "parts": [{ "text": "other" }] } }
        ]
    });
    assert_eq!(extract_text(body.to_string().as_bytes()).unwrap(), "first");
}

#[test]
fn missing_content_is_a_protocol_error() {
    for body in [
        json!({}),
        json!({ "candidates": [{}] }),
        json!({ "candidates": [{ "content": { "parts": [] } }] }),
        json!({ "candidates": [{ "content": { "parts": [{ "inlineData": {} }] } }] }),
    ] {
        let f = extract_text(body.to_string().as_bytes()).unwrap_err();
        assert_eq!(f.kind, FailureKind::ProtocolError, "{body}");
    }
    assert_eq!(
        extract_text(b"<html>").unwrap_err().kind,
        FailureKind::ProtocolError
    );
}

#[test]
fn blocked_prompt_reason_is_reported() {
    let body = json!({ "promptFeedback": { "blockReason": "SAFETY" } });
    let f = extract_text(body.to_string().as_bytes()).unwrap_err();
    assert!(f.message.contains("SAFETY"));
}

#[test]
fn strip_code_fences_removes_markers() {
    assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```\n"), "{\"a\":1}");
    assert_eq!(strip_code_fences("  {}  "), "{}");
}

#[test]
fn payload_accepts_string_or_array_hashtags() {
    let p = parse_payload(r##"{"headline":"H","caption":"C","hashtags":"#a  #b\n#c"}"##).unwrap();
    assert_eq!(p.hashtags, vec!["#a", "#b", "#c"]);
    assert!(p.design.is_none());

    let p = parse_payload(
        r##"{"headline":"H","hashtags":["#x", " ", "#y "],"design":{"font_mood":"bold"}}"##,
    )
    .unwrap();
    assert_eq!(p.hashtags, vec!["#x", "#y"]);
    assert_eq!(p.caption, "");
    assert_eq!(p.design.unwrap()["font_mood"], "bold");

    let p = parse_payload(r#"{"headline":"H","hashtags":null}"#).unwrap();
    assert!(p.hashtags.is_empty());
}

#[test]
fn invalid_payloads_are_classified() {
    for text in ["not json", "[1, 2]", r#"{"headline": 7}"#, "```json\n```"] {
        assert_eq!(
            parse_payload(text).unwrap_err().kind,
            FailureKind::InvalidPayload,
            "{text}"
        );
    }
}
