//! Wire types for the `generateContent` endpoint and the post payload nested in its text.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::client::generate::{Failure, FailureKind};

/// Request body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GeminiRequest {
    /// Conversation turns; always a single user turn here.
    pub contents: Vec<RequestContent>,
}

impl GeminiRequest {
    /// Single-turn request carrying `prompt`.
    pub fn from_prompt(prompt: String) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        }
    }
}

/// One turn of a request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RequestContent {
    /// Content parts.
    pub parts: Vec<RequestPart>,
}

/// Text part of a request turn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RequestPart {
    /// Prompt text.
    pub text: String,
}

/// Response body. Every field is optional so that partial responses still deserialize and the
/// missing piece can be reported precisely.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiResponse {
    /// Candidate completions.
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    /// Present when the prompt was blocked.
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

/// One candidate completion.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Generated content.
    #[serde(default)]
    pub content: Option<Content>,
    /// Why generation stopped.
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Content of a candidate.
#[derive(Debug, Default, Deserialize)]
pub struct Content {
    /// Content parts.
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// One content part.
#[derive(Debug, Default, Deserialize)]
pub struct Part {
    /// Text, absent for non-text parts.
    #[serde(default)]
    pub text: Option<String>,
}

/// Prompt feedback.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    /// Reason the prompt was blocked.
    #[serde(default)]
    pub block_reason: Option<String>,
}

/// Pull the first candidate's first text part out of a 2xx response body.
pub fn extract_text(body: &[u8]) -> Result<String, Failure> {
    let resp: GeminiResponse = serde_json::from_slice(body).map_err(|e| {
        Failure::new(
            FailureKind::ProtocolError,
            format!("response body is not a generateContent envelope: {e}"),
        )
    })?;

    let text = resp
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().next())
        .and_then(|p| p.text);

    match text {
        Some(text) => Ok(text),
        None => {
            let reason = resp
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .map(|r| format!(" (prompt blocked: {r})"))
                .unwrap_or_default();
            Err(Failure::new(
                FailureKind::ProtocolError,
                format!("response has no candidate text{reason}"),
            ))
        }
    }
}

/// Remove Markdown code-fence markers (```` ```json ```` and ```` ``` ````) and surrounding space.
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_owned()
}

/// Structured post returned by the model.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratedPost {
    /// Short text for the image.
    pub headline: String,
    /// Post caption.
    pub caption: String,
    /// Hashtags, each including its `#`.
    #[serde(deserialize_with = "deserialize_hashtags")]
    pub hashtags: Vec<String>,
    /// Raw, unvalidated design object; interpreted only by [`crate::design::normalize_with`].
    pub design: Option<Value>,
}

/// Parse the (possibly fenced) payload text into a [`GeneratedPost`].
pub fn parse_payload(text: &str) -> Result<GeneratedPost, Failure> {
    let cleaned = strip_code_fences(text);
    let value: Value = serde_json::from_str(&cleaned).map_err(|e| {
        Failure::new(
            FailureKind::InvalidPayload,
            format!("model output is not JSON: {e}"),
        )
    })?;
    if !value.is_object() {
        return Err(Failure::new(
            FailureKind::InvalidPayload,
            "model output is JSON but not an object",
        ));
    }
    serde_json::from_value(value).map_err(|e| {
        Failure::new(
            FailureKind::InvalidPayload,
            format!("model output has unexpected shape: {e}"),
        )
    })
}

fn deserialize_hashtags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        List(Vec<String>),
        Null(()),
    }

    let tags: Vec<String> = match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s.split_whitespace().map(str::to_owned).collect(),
        Raw::List(list) => list,
        Raw::Null(()) => Vec::new(),
    };
    Ok(tags
        .into_iter()
        .map(|t| t.trim().to_owned())
        .filter(|t| !t.is_empty())
        .collect())
}

#[cfg(test)]
#[path = "../../tests/unit/client/envelope.rs"]
mod tests;
