//! Analysis request building.
//!
//! A request pairs the drawing (inline PNG) with a fixed instruction asking
//! for five labeled sections. Serializes to the `generateContent` wire shape.

use inkwell_core::LanguageInfo;
use inkwell_renderer::split_data_url;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AnalysisResult;

/// Section headers the model is asked for, in order.
pub const SECTION_HEADERS: [&str; 5] = [
    "Current Stroke Quality",
    "Letter Formation",
    "Next Expected Strokes",
    "Common Mistakes to Avoid",
    "Overall Quality Score (%)",
];

/// Sampling parameters sent with every request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Sampling temperature.
    pub temperature: f32,
    /// Top-K sampling.
    pub top_k: u32,
    /// Nucleus sampling.
    pub top_p: f32,
    /// Upper bound on reply length.
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 1024,
        }
    }
}

/// Base64 image embedded in a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    /// MIME type of the payload.
    pub mime_type: String,
    /// Raw base64 payload, without the data URL prefix.
    pub data: String,
}

/// One part of a multimodal message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Part {
    /// Inline binary data.
    InlineData(InlineData),
    /// Plain text.
    Text(String),
}

/// A message in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    /// Author role.
    pub role: String,
    /// Message parts.
    pub parts: Vec<Part>,
}

/// A complete analysis request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    /// Correlation ID for logs. Not sent.
    #[serde(skip, default = "Uuid::new_v4")]
    pub id: Uuid,
    /// Conversation contents.
    pub contents: Vec<Content>,
    /// Sampling parameters.
    pub generation_config: GenerationConfig,
}

impl AnalysisRequest {
    /// The inline image, if present.
    #[must_use]
    pub fn image(&self) -> Option<&InlineData> {
        self.parts().find_map(|part| match part {
            Part::InlineData(data) => Some(data),
            Part::Text(_) => None,
        })
    }

    /// The instruction text, if present.
    #[must_use]
    pub fn prompt(&self) -> Option<&str> {
        self.parts().find_map(|part| match part {
            Part::Text(text) => Some(text.as_str()),
            Part::InlineData(_) => None,
        })
    }

    fn parts(&self) -> impl Iterator<Item = &Part> {
        self.contents.iter().flat_map(|c| c.parts.iter())
    }
}

/// Build the instruction text for a drawing.
#[must_use]
pub fn build_prompt(info: &LanguageInfo) -> String {
    let language = &info.language;
    let level = &info.level;
    let character = info.character.as_deref().unwrap_or_default();
    let [quality, formation, next, mistakes, score] = SECTION_HEADERS;

    format!(
        "Analyze this handwritten {language} character \"{character}\" at {level} level.\n\
         Please provide feedback in the following format:\n\
         \n\
         1. {quality}:\n\
         How smooth, confident and consistent are the strokes drawn so far?\n\
         \n\
         2. {formation}:\n\
         Are the shape, proportions and stroke order right for this character?\n\
         \n\
         3. {next}:\n\
         Which strokes should come next to complete the character?\n\
         \n\
         4. {mistakes}:\n\
         What mistakes do {level} learners commonly make with this character?\n\
         \n\
         5. {score}:\n\
         A single number from 0 to 100."
    )
}

/// Build an analysis request from a rendered drawing.
///
/// # Errors
///
/// Returns [`crate::AnalysisError::InvalidImage`] if `image_data_url` is not a
/// base64 data URL.
pub fn build_analysis_request(
    image_data_url: &str,
    info: &LanguageInfo,
) -> AnalysisResult<AnalysisRequest> {
    let (_, payload) = split_data_url(image_data_url)?;

    Ok(AnalysisRequest {
        id: Uuid::new_v4(),
        contents: vec![Content {
            role: "user".to_string(),
            parts: vec![
                Part::InlineData(InlineData {
                    mime_type: "image/png".to_string(),
                    data: payload.to_string(),
                }),
                Part::Text(build_prompt(info)),
            ],
        }],
        generation_config: GenerationConfig::default(),
    })
}
