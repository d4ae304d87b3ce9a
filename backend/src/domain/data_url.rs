//! Base64 data URL envelope used for every stored image.
//!
//! Images are persisted as text of the form `data:{mime};base64,{payload}` so
//! the key-value store only ever holds strings.

use std::fmt;
use std::str::FromStr;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use thiserror::Error;

const DATA_URL_SCHEME: &str = "data:";
const BASE64_MARKER: &str = ";base64,";

/// Parsed `data:` URL holding base64 image bytes.
///
/// # Examples
/// ```
/// use routeslip::domain::DataUrl;
///
/// let url: DataUrl = "data:image/png;base64,iVBORw0K".parse().expect("valid");
/// assert_eq!(url.mime_type(), "image/png");
/// assert_eq!(url.to_string(), "data:image/png;base64,iVBORw0K");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    mime_type: String,
    data: String,
}

/// Reasons a string is not an acceptable data URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataUrlError {
    #[error("data URL must start with 'data:'")]
    MissingScheme,
    #[error("data URL must carry a ';base64,' payload")]
    NotBase64,
    #[error("data URL mime type must not be empty")]
    EmptyMimeType,
    #[error("data URL payload must not be empty")]
    EmptyPayload,
    #[error("data URL payload is not valid base64: {message}")]
    InvalidPayload { message: String },
}

impl DataUrl {
    /// Encode raw bytes.
    #[must_use]
    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: STANDARD.encode(bytes),
        }
    }

    /// Wrap an already-encoded payload without decoding it.
    pub fn from_base64(
        mime_type: impl Into<String>,
        data: impl Into<String>,
    ) -> Result<Self, DataUrlError> {
        let mime_type = mime_type.into();
        let data = data.into();
        if mime_type.is_empty() {
            return Err(DataUrlError::EmptyMimeType);
        }
        if data.is_empty() {
            return Err(DataUrlError::EmptyPayload);
        }
        Ok(Self { mime_type, data })
    }

    #[must_use]
    pub fn mime_type(&self) -> &str {
        self.mime_type.as_str()
    }

    /// Base64 payload, still encoded.
    #[must_use]
    pub fn data(&self) -> &str {
        self.data.as_str()
    }

    /// Decode the payload into an [`ImagePayload`].
    pub fn decode(&self) -> Result<ImagePayload, DataUrlError> {
        let bytes = STANDARD
            .decode(self.data.as_bytes())
            .map_err(|err| DataUrlError::InvalidPayload {
                message: err.to_string(),
            })?;
        Ok(ImagePayload {
            mime_type: self.mime_type.clone(),
            bytes,
        })
    }
}

impl FromStr for DataUrl {
    type Err = DataUrlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s
            .strip_prefix(DATA_URL_SCHEME)
            .ok_or(DataUrlError::MissingScheme)?;
        let (mime_type, data) = rest
            .rsplit_once(BASE64_MARKER)
            .ok_or(DataUrlError::NotBase64)?;
        Self::from_base64(mime_type, data)
    }
}

impl fmt::Display for DataUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{DATA_URL_SCHEME}{}{BASE64_MARKER}{}",
            self.mime_type, self.data
        )
    }
}

/// Decoded image bytes with their content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}
