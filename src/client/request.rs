use std::fmt;

use serde::{Deserialize, Serialize};

use crate::client::{
    envelope::GeminiRequest,
    generate::{Failure, FailureKind},
};

/// Business details woven into the prompt.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrandContext {
    /// Display name, also used for the watermark handle.
    #[serde(alias = "businessName")]
    pub business_name: Option<String>,
    /// Industry or vertical.
    pub industry: Option<String>,
    /// Free-form description of what the business offers.
    pub description: Option<String>,
    /// Voice the copy should use.
    pub tone: Option<String>,
}

impl BrandContext {
    fn field<'a>(value: &'a Option<String>, fallback: &'a str) -> &'a str {
        value
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(fallback)
    }

    /// Business name or `Generic Brand`.
    pub fn name(&self) -> &str {
        Self::field(&self.business_name, "Generic Brand")
    }

    /// Industry or `General`.
    pub fn industry(&self) -> &str {
        Self::field(&self.industry, "General")
    }

    /// Description or `No description provided`.
    pub fn description(&self) -> &str {
        Self::field(&self.description, "No description provided")
    }

    /// Tone or `Professional`.
    pub fn tone(&self) -> &str {
        Self::field(&self.tone, "Professional")
    }
}

/// User profile as stored by the surrounding application.
///
/// Accepts both snake_case keys and the camelCase keys of the stored profile documents.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    /// API key for the generation endpoint.
    #[serde(alias = "geminiApiKey")]
    pub credential: Option<String>,
    /// Brand fields, flattened into the profile document.
    #[serde(flatten)]
    pub brand: BrandContext,
    /// Uploaded logo as a `data:` URL.
    #[serde(alias = "logoBase64")]
    pub logo_data_url: Option<String>,
}

impl Profile {
    /// Parse a profile document.
    pub fn from_json(s: &str) -> crate::LuminaResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| crate::LuminaError::serde(format!("parse profile JSON: {e}")))
    }

    /// Trimmed, non-empty credential.
    pub fn credential(&self) -> Option<&str> {
        self.credential
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

impl fmt::Debug for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Profile")
            .field("credential", &self.credential.as_ref().map(|_| "<redacted>"))
            .field("brand", &self.brand)
            .field("logo_data_url", &self.logo_data_url.as_ref().map(String::len))
            .finish()
    }
}

/// One generation request, built per call and never mutated.
#[derive(Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    topic: String,
    brand: BrandContext,
    credential: String,
}

impl GenerationRequest {
    /// Check preconditions and capture the inputs for one call.
    pub fn from_profile(topic: &str, profile: &Profile) -> Result<Self, Failure> {
        let credential = profile.credential().ok_or_else(|| {
            Failure::new(
                FailureKind::MissingCredential,
                "no API key: set one in the profile or pass --api-key",
            )
        })?;
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(Failure::new(FailureKind::InvalidRequest, "topic is empty"));
        }
        Ok(Self {
            topic: topic.to_owned(),
            brand: profile.brand.clone(),
            credential: credential.to_owned(),
        })
    }

    /// Trimmed topic.
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Brand context used in the prompt.
    pub fn brand(&self) -> &BrandContext {
        &self.brand
    }

    pub(crate) fn credential(&self) -> &str {
        &self.credential
    }

    /// Prompt text sent to the model.
    pub fn prompt(&self) -> String {
        let brand = &self.brand;
        let topic = &self.topic;
        format!(
            r#"Business Name: {name}
Industry: {industry}
Business Description: {description}
Tone: {tone}

Act as a senior social media manager for the business described above.

TASK: Create an engaging Instagram post about: "{topic}".

STRATEGY:
1. Analyze the Business Description to understand the brand's unique value.
2. Connect the topic ("{topic}") to the brand's products/services.
3. Use the specified Tone.

OUTPUT format (Raw JSON only):
{{
    "headline": "Creative, short text for the image design (max 6 words)",
    "caption": "Engaging caption incorporating the business context and topic. Use emojis.",
    "hashtags": "5-7 relevant hashtags mixed (niche + broad)",
    "design": {{
        "image_prompt": "A detailed, photorealistic English description of a background image. It MUST visually combine the Industry, the Brand Tone, and the Topic. Do not use text.",
        "composition": "One of: 'centered', 'hero-bottom', 'minimal-top', 'magazine-layout'",
        "overlay_style": "One of: 'gradient-bottom', 'vignette', 'solid-dim', 'glass'",
        "image_filter": "One of: 'none', 'sepia', 'warm', 'cool', 'muted'",
        "background_color": "Fallback Hex code",
        "text_color": "Hex code (usually #ffffff if using image background)",
        "accent_color": "Hex code for emphasis",
        "font_mood": "One of: 'modern', 'classic', 'handwritten', 'bold'"
    }}
}}"#,
            name = brand.name(),
            industry = brand.industry(),
            description = brand.description(),
            tone = brand.tone(),
        )
    }

    /// JSON request body: `{"contents":[{"parts":[{"text": prompt}]}]}`.
    pub fn body(&self) -> GeminiRequest {
        GeminiRequest::from_prompt(self.prompt())
    }
}

impl fmt::Debug for GenerationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationRequest")
            .field("topic", &self.topic)
            .field("brand", &self.brand)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/client/request.rs"]
mod tests;
