//! Reqwest-backed Gemini receipt extractor.
//!
//! This adapter owns transport details only: request serialisation, timeout
//! and HTTP error mapping, and unwrapping the candidate text. The text itself
//! is validated by the domain.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::debug;
use zeroize::Zeroizing;

use super::dto::{GenerateContentRequestDto, GenerateContentResponseDto};
use crate::domain::DataUrl;
use crate::domain::ports::{ReceiptExtractor, ReceiptExtractorError};

/// Base URL of the public Gemini API.
pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/";
/// Model used when none is configured.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Receipt extractor that POSTs one `generateContent` call per receipt.
pub struct GeminiReceiptExtractor {
    client: Client,
    url: Url,
    api_key: Option<Zeroizing<String>>,
}

impl GeminiReceiptExtractor {
    /// Build an adapter for `model` under `endpoint`.
    ///
    /// Without an API key the adapter still constructs, and every call fails
    /// with [`ReceiptExtractorError::Unconfigured`].
    ///
    /// # Errors
    ///
    /// Returns a transport error when the model path cannot be joined onto
    /// the endpoint or the reqwest client cannot be built.
    pub fn new(
        endpoint: &Url,
        model: &str,
        api_key: Option<Zeroizing<String>>,
        timeout: Duration,
    ) -> Result<Self, ReceiptExtractorError> {
        let url = endpoint
            .join(&format!("models/{model}:generateContent"))
            .map_err(|err| {
                ReceiptExtractorError::transport(format!("invalid Gemini endpoint: {err}"))
            })?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ReceiptExtractorError::transport(err.to_string()))?;
        Ok(Self {
            client,
            url,
            api_key: api_key.filter(|key| !key.is_empty()),
        })
    }

    /// Fully resolved `generateContent` URL.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl ReceiptExtractor for GeminiReceiptExtractor {
    async fn extract(&self, image: &DataUrl, prompt: &str) -> Result<String, ReceiptExtractorError> {
        let Some(api_key) = self.api_key.as_ref() else {
            return Err(ReceiptExtractorError::Unconfigured);
        };
        let body = GenerateContentRequestDto::for_image(prompt, image.mime_type(), image.data());

        let response = self
            .client
            .post(self.url.clone())
            .header(API_KEY_HEADER, api_key.as_str())
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, bytes.as_ref()));
        }
        debug!(bytes = bytes.len(), "Gemini response received");
        parse_text(bytes.as_ref())
    }
}

fn parse_text(body: &[u8]) -> Result<String, ReceiptExtractorError> {
    let decoded: GenerateContentResponseDto = serde_json::from_slice(body).map_err(|error| {
        ReceiptExtractorError::decode(format!("invalid Gemini JSON payload: {error}"))
    })?;
    decoded.into_text().map_err(ReceiptExtractorError::decode)
}

fn map_transport_error(error: reqwest::Error) -> ReceiptExtractorError {
    if error.is_timeout() {
        ReceiptExtractorError::timeout(error.to_string())
    } else {
        ReceiptExtractorError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> ReceiptExtractorError {
    let preview = body_preview(body);
    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            ReceiptExtractorError::timeout(format!("status {}", status.as_u16()))
        }
        _ => ReceiptExtractorError::status(status.as_u16(), preview),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    //! Coverage for the non-network request and response helpers.

    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn endpoint() -> Url {
        Url::parse(DEFAULT_GEMINI_ENDPOINT).expect("endpoint")
    }

    #[test]
    fn joins_model_onto_endpoint() {
        let extractor = GeminiReceiptExtractor::new(
            &endpoint(),
            DEFAULT_GEMINI_MODEL,
            None,
            Duration::from_secs(5),
        )
        .expect("adapter builds");
        assert_eq!(
            extractor.url().as_str(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn request_body_holds_prompt_then_inline_image() {
        let body = GenerateContentRequestDto::for_image("read it", "image/png", "AAAA");
        let value = serde_json::to_value(&body).expect("serialise");
        assert_eq!(
            value,
            json!({
                "contents": [{
                    "parts": [
                        { "text": "read it" },
                        { "inlineData": { "mimeType": "image/png", "data": "AAAA" } }
                    ]
                }],
                "generationConfig": {
                    "responseMimeType": "application/json",
                    "temperature": 0.4_f32
                }
            })
        );
    }

    #[test]
    fn concatenates_candidate_text_parts() {
        let body = r#"{
            "candidates": [
                { "content": { "parts": [ { "text": "{\"orders\":" }, { "text": "[]}" } ] } },
                { "content": { "parts": [ { "text": "ignored" } ] } }
            ]
        }"#;
        assert_eq!(parse_text(body.as_bytes()).expect("text"), "{\"orders\":[]}");
    }

    #[rstest]
    #[case::no_candidates(r#"{"candidates": []}"#)]
    #[case::blocked(r#"{"candidates": [{"finishReason": "SAFETY"}]}"#)]
    #[case::not_json("<html>")]
    fn unusable_envelopes_are_decode_errors(#[case] body: &str) {
        let error = parse_text(body.as_bytes()).expect_err("decode should fail");
        assert!(matches!(error, ReceiptExtractorError::Decode { .. }));
    }

    #[rstest]
    #[case::request_timeout(StatusCode::REQUEST_TIMEOUT, true)]
    #[case::gateway_timeout(StatusCode::GATEWAY_TIMEOUT, true)]
    #[case::bad_key(StatusCode::FORBIDDEN, false)]
    #[case::overloaded(StatusCode::SERVICE_UNAVAILABLE, false)]
    fn maps_http_statuses(#[case] status: StatusCode, #[case] is_timeout: bool) {
        let error = map_status_error(status, b"{\"error\": {\"message\": \"nope\"}}");
        if is_timeout {
            assert!(matches!(error, ReceiptExtractorError::Timeout { .. }));
        } else {
            assert!(matches!(
                error,
                ReceiptExtractorError::Status { status: code, .. } if code == status.as_u16()
            ));
        }
    }

    #[test]
    fn body_preview_compacts_and_truncates() {
        let body = format!("line one\n\n   line two {}", "x".repeat(400));
        let preview = body_preview(body.as_bytes());
        assert!(preview.starts_with("line one line two"));
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), 163);
    }

    #[tokio::test]
    async fn missing_api_key_is_unconfigured() {
        let extractor = GeminiReceiptExtractor::new(
            &endpoint(),
            DEFAULT_GEMINI_MODEL,
            Some(Zeroizing::new(String::new())),
            Duration::from_secs(5),
        )
        .expect("adapter builds");
        let image = DataUrl::from_bytes("image/png", b"x");
        let error = extractor
            .extract(&image, "prompt")
            .await
            .expect_err("unconfigured");
        assert_eq!(error, ReceiptExtractorError::Unconfigured);
    }
}
