//! DTOs for the Gemini `generateContent` request and response bodies.

use serde::{Deserialize, Serialize};

const RESPONSE_MIME_TYPE: &str = "application/json";
const TEMPERATURE: f32 = 0.4;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct GenerateContentRequestDto<'a> {
    pub(super) contents: Vec<ContentDto<'a>>,
    pub(super) generation_config: GenerationConfigDto,
}

#[derive(Debug, Serialize)]
pub(super) struct ContentDto<'a> {
    pub(super) parts: Vec<PartDto<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub(super) enum PartDto<'a> {
    Text {
        text: &'a str,
    },
    #[serde(rename_all = "camelCase")]
    InlineData {
        inline_data: InlineDataDto<'a>,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct InlineDataDto<'a> {
    pub(super) mime_type: &'a str,
    pub(super) data: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct GenerationConfigDto {
    pub(super) response_mime_type: &'static str,
    pub(super) temperature: f32,
}

impl<'a> GenerateContentRequestDto<'a> {
    /// One user turn holding the prompt followed by the image.
    pub(super) fn for_image(prompt: &'a str, mime_type: &'a str, data: &'a str) -> Self {
        Self {
            contents: vec![ContentDto {
                parts: vec![
                    PartDto::Text { text: prompt },
                    PartDto::InlineData {
                        inline_data: InlineDataDto { mime_type, data },
                    },
                ],
            }],
            generation_config: GenerationConfigDto {
                response_mime_type: RESPONSE_MIME_TYPE,
                temperature: TEMPERATURE,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct GenerateContentResponseDto {
    #[serde(default)]
    pub(super) candidates: Vec<CandidateDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CandidateDto {
    pub(super) content: Option<CandidateContentDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CandidateContentDto {
    #[serde(default)]
    pub(super) parts: Vec<ResponsePartDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ResponsePartDto {
    pub(super) text: Option<String>,
}

impl GenerateContentResponseDto {
    /// Concatenated text parts of the first candidate.
    pub(super) fn into_text(self) -> Result<String, String> {
        let candidate = self
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| "response has no candidates".to_owned())?;
        let text: String = candidate
            .content
            .map(|content| content.parts)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|part| part.text)
            .collect();
        if text.trim().is_empty() {
            return Err("first candidate carries no text".to_owned());
        }
        Ok(text)
    }
}
